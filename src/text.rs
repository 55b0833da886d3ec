/// Collapse every whitespace run to a single space and trim the ends.
///
/// Pure and total: any input (including empty) yields a valid string.
/// Every other component normalizes through this before comparing or
/// hashing text, so identity keys never depend on markup indentation.
pub fn normalize(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `normalize` over an optional source, mapping absence to the empty string.
pub fn normalize_opt(raw: Option<&str>) -> String {
    raw.map(normalize).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_runs_and_trims() {
        assert_eq!(normalize("  Start   Time:\n 4/7 \t- 8:30 PM  "), "Start Time: 4/7 - 8:30 PM");
    }

    #[test]
    fn empty_and_blank_are_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \t\n "), "");
        assert_eq!(normalize_opt(None), "");
    }
}
