//! Odds notation parser.
//!
//! The site renders every odds quote as a compact `<base><sign><gap>` token,
//! e.g. `1+75` or `=-30`, where `=` marks a level (pick'em) line. The sign
//! rule is asymmetric on purpose: the gap is always signed, but the total only
//! carries the sign when the base is the level marker. That matches the
//! upstream book's convention and must not be "fixed".

use std::sync::LazyLock;

use regex::Regex;

use crate::text::normalize;

static ODDS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(=|\d+(?:\.\d+)?)([+-])(\d{1,3})$").expect("odds grammar"));

/// One parsed odds token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OddsValue {
    /// Numeric magnitude before the sign; 0 for the level marker.
    pub base: f64,
    /// +1 or -1, from the middle token.
    pub sign: i8,
    /// Gap digits divided by 100, always non-negative.
    pub fraction: f64,
    /// Signed total: `sign * fraction` for a level line, else `base + fraction`.
    pub value: f64,
    /// `sign * fraction`, regardless of the base.
    pub gap: f64,
}

/// Parse a raw odds token. Returns `None` on any grammar or numeric miss;
/// never panics. Leading zeros in the gap are decimal (`+05` is 0.05).
pub fn parse_odds(raw: &str) -> Option<OddsValue> {
    let s = normalize(raw);
    let caps = ODDS_RE.captures(&s)?;

    let sign: i8 = if &caps[2] == "-" { -1 } else { 1 };
    let fraction = caps[3].parse::<f64>().ok()? / 100.0;

    let (base, value) = if &caps[1] == "=" {
        (0.0, f64::from(sign) * fraction)
    } else {
        let base = caps[1].parse::<f64>().ok()?;
        (base, base + fraction)
    };
    if !base.is_finite() || !fraction.is_finite() {
        return None;
    }

    Some(OddsValue { base, sign, fraction, value, gap: f64::from(sign) * fraction })
}

/// True when the (normalized) text is a well-formed odds token. The card
/// classifier uses this to tell odds leaves from name/label text.
pub fn is_odds_token(raw: &str) -> bool {
    ODDS_RE.is_match(&normalize(raw))
}
