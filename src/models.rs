use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

// ── Raw extraction layer ─────────────────────────────────────────────────────

/// One card as lifted from a single DOM snapshot, all fields already
/// whitespace-normalized. Any field may be empty when the card was only
/// partially resolvable; assembly decides what to do with the gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMatchRecord {
    pub league_name: String,
    /// Raw stamp text, e.g. `"Start Time: 4/7 - 8:30 PM"`.
    pub start_time_text: String,
    /// Free status text preceding the time marker, possibly a finished marker.
    pub status: String,
    pub home_name: String,
    pub away_name: String,
    pub handicap_text: String,
    pub ou_text: String,
}

impl RawMatchRecord {
    /// Dedup key across scroll passes: two records are the same real-world
    /// entity only when every field matches verbatim.
    pub fn identity_key(&self) -> String {
        [
            self.league_name.as_str(),
            self.start_time_text.as_str(),
            self.status.as_str(),
            self.home_name.as_str(),
            self.away_name.as_str(),
            self.handicap_text.as_str(),
            self.ou_text.as_str(),
        ]
        .join("|")
    }
}

// ── Output document ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueEntry {
    pub id: u32,
    pub league_id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamEntry {
    /// Spectator-facing number, `2*index+1` home / `2*index+2` away in final
    /// sort order.
    pub id: u32,
    /// Stable hash identity of the team.
    pub team_id: u32,
    pub name: String,
    pub eng_name: String,
    pub league: LeagueEntry,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchEntry {
    /// 1-based sequence number in final sort order.
    pub id: u32,
    /// Stable hash over league + time + teams + raw odds tokens.
    pub match_id: u32,
    pub home: TeamEntry,
    pub away: TeamEntry,
    /// Handicap total (`value`); 0 when the token was absent or malformed.
    pub odds: f64,
    /// Handicap signed gap.
    pub price: f64,
    /// Over/under total.
    pub goal_total: f64,
    /// Over/under signed gap.
    pub goal_total_price: f64,
    /// ISO-8601 UTC instants.
    pub start_time: String,
    pub close_time: String,
    pub finished: bool,
    // Bookkeeping flags: fixed defaults, not computed by this pipeline.
    pub calculating: bool,
    pub hdp_finished: bool,
    pub ou_finished: bool,
    pub canceled: bool,
    pub active: bool,
    pub status: i32,
    pub single_bet: bool,
    pub high_tax: bool,
    pub auto_update: bool,
}

/// Top-level document. `completed` stays `false` at emission; finalization is
/// a later, external process. Only `id` and `date` vary between otherwise
/// identical runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OddsFeed {
    pub author: String,
    pub website: String,
    pub country: String,
    pub copyright: String,
    /// Generation instant, epoch milliseconds.
    pub id: i64,
    /// Generation instant, ISO-8601 UTC.
    pub date: String,
    pub completed: bool,
    pub matches: Vec<MatchEntry>,
}

impl OddsFeed {
    pub fn new(generated_at: DateTime<Utc>, matches: Vec<MatchEntry>) -> Self {
        Self {
            author: "GGWP API".to_string(),
            website: "https://ggwp-api.render.com".to_string(),
            country: "Thailand".to_string(),
            copyright: "GGWP".to_string(),
            id: generated_at.timestamp_millis(),
            date: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            completed: false,
            matches,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_key_separates_fields() {
        let a = RawMatchRecord {
            league_name: "EPL".into(),
            start_time_text: "Start Time: 4/7 - 8:30 PM".into(),
            status: String::new(),
            home_name: "Arsenal".into(),
            away_name: "Chelsea".into(),
            handicap_text: "1+75".into(),
            ou_text: "2-45".into(),
        };
        let mut b = a.clone();
        assert_eq!(a.identity_key(), b.identity_key());
        b.ou_text = "2-40".into();
        assert_ne!(a.identity_key(), b.identity_key());
    }

    #[test]
    fn feed_serializes_camel_case() {
        let feed = OddsFeed::new("2024-07-04T14:00:00Z".parse().unwrap(), vec![]);
        let json = serde_json::to_value(&feed).unwrap();
        assert_eq!(json["completed"], false);
        assert!(json.get("matches").is_some());
        assert_eq!(json["date"], "2024-07-04T14:00:00.000Z");
        assert_eq!(json["author"], "GGWP API");
    }
}
