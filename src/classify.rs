//! Card classification over a single DOM snapshot.
//!
//! The odds page never labels its markup, so cards are reconstructed from
//! positional and textual heuristics: a `<time>` element carrying the
//! start-time sentinel anchors each card, a bounded ancestor walk finds the
//! card root, preceding siblings are scanned for a league header, and odds
//! leaves are told apart by the section marker next to them. A malformed card
//! degrades to empty fields; it never aborts the pass.

use crate::config::MarkerConfig;
use crate::dom::{NodeId, Snapshot};
use crate::models::RawMatchRecord;
use crate::odds::is_odds_token;
use crate::text::normalize;

/// Ancestor levels searched above a time marker for the card root.
pub const MAX_CARD_ANCESTOR_DEPTH: usize = 10;
/// Ancestor levels searched above a card root for a league header.
pub const MAX_LEAGUE_ANCESTOR_LEVELS: usize = 12;
/// League-looking text must not exceed this many characters.
pub const LEAGUE_NAME_MAX_LEN: usize = 80;

/// Lift every resolvable card out of the snapshot. Pure: no waiting, no
/// further loading, one consistent view.
pub fn classify(snap: &Snapshot, markers: &MarkerConfig) -> Vec<RawMatchRecord> {
    let mut records = Vec::new();

    for id in snap.ids() {
        if snap.node(id).tag != "time" {
            continue;
        }
        let stamp = snap.text(id);
        if !stamp.contains(&markers.start_time) {
            continue;
        }
        let Some(card) = card_root(snap, id, markers) else {
            // No enclosing card with both section markers: unparseable.
            continue;
        };

        let (hdp_leaf, ou_leaf) = odds_leaves(snap, card, markers);
        let (home_name, away_name) = match hdp_leaf {
            Some(leaf) => team_names(snap, leaf),
            None => (String::new(), String::new()),
        };

        records.push(RawMatchRecord {
            league_name: league_name(snap, card, markers),
            start_time_text: stamp,
            status: status_text(snap, id),
            home_name,
            away_name,
            handicap_text: hdp_leaf.map(|l| snap.text(l)).unwrap_or_default(),
            ou_text: ou_leaf.map(|l| snap.text(l)).unwrap_or_default(),
        });
    }

    records
}

fn contains_ou_marker(text: &str, markers: &MarkerConfig) -> bool {
    markers.over_under.iter().any(|m| text.contains(m))
}

/// Nearest ancestor whose combined text carries both the start-time sentinel
/// and an over/under section marker.
fn card_root(snap: &Snapshot, time_id: NodeId, markers: &MarkerConfig) -> Option<NodeId> {
    snap.ancestors(time_id).take(MAX_CARD_ANCESTOR_DEPTH).find(|&anc| {
        let text = snap.text(anc);
        text.contains(&markers.start_time) && contains_ou_marker(&text, markers)
    })
}

fn looks_like_league(text: &str, markers: &MarkerConfig) -> bool {
    !text.is_empty()
        && text.chars().count() <= LEAGUE_NAME_MAX_LEN
        && !text.contains(&markers.start_time)
        && !contains_ou_marker(text, markers)
        && text != markers.finished
        && !is_odds_token(text)
        && text.chars().any(|c| c.is_ascii_alphabetic())
}

/// Walk up from the card root; at each level scan preceding siblings, nearest
/// first, for league-looking text. First match wins; absence is an empty name.
fn league_name(snap: &Snapshot, card: NodeId, markers: &MarkerConfig) -> String {
    let levels = std::iter::once(card).chain(snap.ancestors(card));
    for level in levels.take(MAX_LEAGUE_ANCESTOR_LEVELS) {
        for &sibling in snap.preceding_siblings(level).iter().rev() {
            let text = snap.text(sibling);
            if looks_like_league(&text, markers) {
                return text;
            }
        }
    }
    String::new()
}

/// First handicap leaf and first over/under leaf in document order. A leaf is
/// over/under when its parent's or grandparent's text carries a section marker
/// (and not the start-time sentinel); any other odds leaf is handicap.
fn odds_leaves(
    snap: &Snapshot,
    card: NodeId,
    markers: &MarkerConfig,
) -> (Option<NodeId>, Option<NodeId>) {
    let mut hdp = None;
    let mut ou = None;

    for id in snap.subtree(card) {
        if !snap.is_leaf(id) || !is_odds_token(&snap.text(id)) {
            continue;
        }
        let is_ou = snap
            .parent(id)
            .into_iter()
            .chain(snap.parent(id).and_then(|p| snap.parent(p)))
            .any(|a| {
                let text = snap.text(a);
                contains_ou_marker(&text, markers) && !text.contains(&markers.start_time)
            });
        if is_ou {
            if ou.is_none() {
                ou = Some(id);
            }
        } else if hdp.is_none() {
            hdp = Some(id);
        }
        if hdp.is_some() && ou.is_some() {
            break;
        }
    }

    (hdp, ou)
}

/// Home = the handicap leaf's container text minus the odds token; away = the
/// container's next sibling, falling back to the first other child of the
/// shared parent.
fn team_names(snap: &Snapshot, hdp_leaf: NodeId) -> (String, String) {
    let Some(container) = snap.parent(hdp_leaf) else {
        return (String::new(), String::new());
    };

    let token = snap.text(hdp_leaf);
    let home = normalize(&snap.text(container).replacen(&token, "", 1));

    let away = snap
        .next_sibling(container)
        .or_else(|| {
            snap.parent(container).and_then(|shared| {
                snap.children(shared).iter().copied().find(|&c| c != container)
            })
        })
        .map(|n| snap.text(n))
        .unwrap_or_default();

    (home, away)
}

/// Free status text preceding the time marker inside its parent; the finished
/// flag is derived later from exact equality with the finished sentinel.
fn status_text(snap: &Snapshot, time_id: NodeId) -> String {
    let joined = snap
        .preceding_siblings(time_id)
        .into_iter()
        .map(|s| snap.text(s))
        .collect::<Vec<_>>()
        .join(" ");
    normalize(&joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeSpec;

    fn snap(json: serde_json::Value) -> Snapshot {
        Snapshot::from_spec(&serde_json::from_value::<NodeSpec>(json).unwrap())
    }

    fn card_json(status: &str, home: &str, hdp: &str, away: &str, ou: &str) -> serde_json::Value {
        serde_json::json!({
            "tag": "div",
            "children": [
                {
                    "tag": "div",
                    "children": [
                        { "tag": "span", "text": status },
                        { "tag": "time", "text": "Start Time: 4/7 - 8:30 PM" }
                    ]
                },
                {
                    "tag": "div",
                    "children": [
                        {
                            "tag": "div",
                            "children": [
                                { "tag": "span", "text": home },
                                { "tag": "span", "text": hdp }
                            ]
                        },
                        { "tag": "div", "text": away }
                    ]
                },
                {
                    "tag": "div",
                    "children": [
                        { "tag": "span", "text": "O/U" },
                        { "tag": "span", "text": ou }
                    ]
                }
            ]
        })
    }

    fn page(children: Vec<serde_json::Value>) -> Snapshot {
        snap(serde_json::json!({ "tag": "html", "children": children }))
    }

    #[test]
    fn lifts_a_full_card() {
        let snap = page(vec![
            serde_json::json!({ "tag": "h3", "text": "English Premier League" }),
            card_json("", "Arsenal", "1+75", "Chelsea", "2-45"),
        ]);
        let markers = MarkerConfig::default();

        let records = classify(&snap, &markers);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.league_name, "English Premier League");
        assert_eq!(r.start_time_text, "Start Time: 4/7 - 8:30 PM");
        assert_eq!(r.home_name, "Arsenal");
        assert_eq!(r.away_name, "Chelsea");
        assert_eq!(r.handicap_text, "1+75");
        assert_eq!(r.ou_text, "2-45");
        assert_eq!(r.status, "");
    }

    #[test]
    fn finished_status_text_survives() {
        let snap = page(vec![
            serde_json::json!({ "tag": "h3", "text": "La Liga" }),
            card_json("Full Time", "Sevilla", "=-30", "Betis", "3+10"),
        ]);
        let records = classify(&snap, &MarkerConfig::default());
        assert_eq!(records[0].status, "Full Time");
    }

    #[test]
    fn time_without_enclosing_card_is_skipped() {
        let snap = page(vec![serde_json::json!({
            "tag": "div",
            "children": [{ "tag": "time", "text": "Start Time: 4/7 - 8:30 PM" }]
        })]);
        assert!(classify(&snap, &MarkerConfig::default()).is_empty());
    }

    #[test]
    fn time_without_sentinel_is_ignored() {
        let snap = page(vec![serde_json::json!({
            "tag": "time", "text": "4/7 - 8:30 PM"
        })]);
        assert!(classify(&snap, &MarkerConfig::default()).is_empty());
    }

    #[test]
    fn missing_odds_leaves_still_emit_a_record() {
        // Card root qualifies (sentinel + O/U label) but carries no odds
        // tokens at all: the record survives with empty fields.
        let snap = page(vec![serde_json::json!({
            "tag": "div",
            "children": [
                { "tag": "time", "text": "Start Time: 4/7 - 8:30 PM" },
                { "tag": "span", "text": "O/U" }
            ]
        })]);
        let records = classify(&snap, &MarkerConfig::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].home_name, "");
        assert_eq!(records[0].handicap_text, "");
        assert_eq!(records[0].ou_text, "");
    }

    #[test]
    fn league_header_may_sit_levels_above() {
        let snap = page(vec![
            serde_json::json!({ "tag": "h3", "text": "Serie A" }),
            serde_json::json!({
                "tag": "section",
                "children": [ card_json("", "Milan", "1-25", "Inter", "2+50") ]
            }),
        ]);
        let records = classify(&snap, &MarkerConfig::default());
        assert_eq!(records[0].league_name, "Serie A");
    }

    #[test]
    fn numeric_or_odds_text_is_not_a_league() {
        let snap = page(vec![
            serde_json::json!({ "tag": "div", "text": "1+75" }),
            serde_json::json!({ "tag": "div", "text": "12345" }),
            card_json("", "Lyon", "1+75", "Nice", "2-45"),
        ]);
        let records = classify(&snap, &MarkerConfig::default());
        assert_eq!(records[0].league_name, "");
    }

    #[test]
    fn extra_odds_leaves_are_ignored() {
        // Two handicap-looking leaves: only the first (document order) is kept.
        let snap = page(vec![serde_json::json!({
            "tag": "div",
            "children": [
                { "tag": "time", "text": "Start Time: 4/7 - 8:30 PM" },
                {
                    "tag": "div",
                    "children": [
                        { "tag": "span", "text": "Ajax" },
                        { "tag": "span", "text": "1+10" },
                        { "tag": "span", "text": "2+20" }
                    ]
                },
                {
                    "tag": "div",
                    "children": [
                        { "tag": "span", "text": "Over/Under" },
                        { "tag": "span", "text": "3+30" }
                    ]
                }
            ]
        })]);
        let records = classify(&snap, &MarkerConfig::default());
        assert_eq!(records[0].handicap_text, "1+10");
        assert_eq!(records[0].ou_text, "3+30");
    }

    #[test]
    fn away_falls_back_to_other_child_of_shared_parent() {
        let snap = page(vec![serde_json::json!({
            "tag": "div",
            "children": [
                { "tag": "time", "text": "Start Time: 4/7 - 8:30 PM" },
                {
                    "tag": "div",
                    "children": [
                        { "tag": "div", "text": "Porto" },
                        {
                            "tag": "div",
                            "children": [
                                { "tag": "span", "text": "Braga" },
                                { "tag": "span", "text": "=-15" }
                            ]
                        }
                    ]
                },
                {
                    "tag": "div",
                    "children": [
                        { "tag": "span", "text": "O/U" },
                        { "tag": "span", "text": "2+05" }
                    ]
                }
            ]
        })]);
        let records = classify(&snap, &MarkerConfig::default());
        // Container is the last child of its parent: no next sibling, so the
        // first other child of the shared parent provides the away name.
        assert_eq!(records[0].home_name, "Braga");
        assert_eq!(records[0].away_name, "Porto");
    }
}
