//! Final document assembly.
//!
//! A single pure pass from deduplicated raw records to the output document:
//! normalize names, hash namespaced seeds into stable ids, parse the odds
//! tokens and the start stamp with defined fallbacks, then impose the total
//! (league name, raw start-time text) order so repeated scrapes of the same
//! page serialize identically regardless of DOM discovery order.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::ScraperConfig;
use crate::ids::{league_seed, match_seed, stable_id, team_seed};
use crate::localtime::parse_start_time;
use crate::models::{LeagueEntry, MatchEntry, OddsFeed, RawMatchRecord, TeamEntry};
use crate::odds::parse_odds;
use crate::text::normalize;

/// League label used when the classifier found none.
pub const UNKNOWN_LEAGUE: &str = "Unknown";

pub fn assemble(
    mut records: Vec<RawMatchRecord>,
    cfg: &ScraperConfig,
    now: DateTime<Utc>,
) -> OddsFeed {
    for record in &mut records {
        let name = normalize(&record.league_name);
        record.league_name = if name.is_empty() { UNKNOWN_LEAGUE.to_string() } else { name };
    }

    // Ordinal string order on (league, raw stamp): total and reproducible.
    records.sort_by(|a, b| {
        (a.league_name.as_str(), a.start_time_text.as_str())
            .cmp(&(b.league_name.as_str(), b.start_time_text.as_str()))
    });

    let matches = records
        .iter()
        .enumerate()
        .map(|(index, record)| build_match(index, record, cfg, now))
        .collect();

    OddsFeed::new(now, matches)
}

fn build_match(
    index: usize,
    record: &RawMatchRecord,
    cfg: &ScraperConfig,
    now: DateTime<Utc>,
) -> MatchEntry {
    let league_id = stable_id(&league_seed(&record.league_name));
    let league = LeagueEntry {
        id: league_id,
        league_id,
        name: record.league_name.clone(),
    };

    let home_name = normalize(&record.home_name);
    let away_name = normalize(&record.away_name);
    let seq = index as u32;

    let home = TeamEntry {
        id: 2 * seq + 1,
        team_id: stable_id(&team_seed(league_id, &home_name)),
        name: home_name.clone(),
        eng_name: home_name,
        league: league.clone(),
    };
    let away = TeamEntry {
        id: 2 * seq + 2,
        team_id: stable_id(&team_seed(league_id, &away_name)),
        name: away_name.clone(),
        eng_name: away_name,
        league,
    };

    // Parse misses default to zero odds and a "now" start, never an error.
    let handicap = parse_odds(&record.handicap_text);
    let ou = parse_odds(&record.ou_text);
    let start = parse_start_time(&record.start_time_text, cfg.local_offset_minutes, now)
        .unwrap_or(now);
    let start_iso = start.to_rfc3339_opts(SecondsFormat::Secs, true);

    MatchEntry {
        id: seq + 1,
        match_id: stable_id(&match_seed(
            &record.league_name,
            &record.start_time_text,
            &home.name,
            &away.name,
            &record.handicap_text,
            &record.ou_text,
        )),
        home,
        away,
        odds: handicap.map_or(0.0, |o| o.value),
        price: handicap.map_or(0.0, |o| o.gap),
        goal_total: ou.map_or(0.0, |o| o.value),
        goal_total_price: ou.map_or(0.0, |o| o.gap),
        close_time: start_iso.clone(),
        start_time: start_iso,
        finished: record.status == cfg.markers.finished,
        calculating: false,
        hdp_finished: false,
        ou_finished: false,
        canceled: false,
        active: true,
        status: 0,
        single_bet: false,
        high_tax: false,
        auto_update: true,
    }
}
