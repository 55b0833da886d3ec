//! Deterministic identifiers.
//!
//! The upstream site never exposes primary keys, so every league, team and
//! match gets a synthetic id derived from a namespaced seed string. The hash
//! is FNV-1a over UTF-16 code units, which keeps ids bit-for-bit reproducible
//! across runs and platforms. Referential identity only — never security.

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a over the UTF-16 code units of `s`.
pub fn fnv1a_utf16(s: &str) -> u32 {
    let mut h = FNV_OFFSET_BASIS;
    for unit in s.encode_utf16() {
        h ^= u32::from(unit);
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

/// Stable numeric id for an arbitrary seed. Empty seed hashes the empty
/// string, yielding the FNV offset basis.
pub fn stable_id(seed: &str) -> u32 {
    fnv1a_utf16(seed)
}

/// Seed for a league entity. Two leagues with the same normalized name
/// collapse to the same id; same-name disambiguation is out of scope.
pub fn league_seed(name: &str) -> String {
    format!("league:{name}")
}

/// Seed for a team entity, scoped under its league id.
pub fn team_seed(league_id: u32, name: &str) -> String {
    format!("team:{league_id}:{name}")
}

/// Seed for a match, built from the league plus the raw card fields so the id
/// survives re-scrapes of an unchanged card.
pub fn match_seed(
    league: &str,
    start_time_text: &str,
    home: &str,
    away: &str,
    handicap_text: &str,
    ou_text: &str,
) -> String {
    format!("match:{league}:{start_time_text}:{home}:{away}:{handicap_text}:{ou_text}")
}
