//! Explicit pipeline configuration.
//!
//! Everything the heuristics depend on — scroll thresholds, locale markers,
//! the fixed local offset — lives here with documented defaults, so a run is
//! fully described by one value instead of ambient process state. `from_env`
//! only overrides the deployment-specific fields.

use std::env;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};

/// Card classifier marker strings. These are the only locale-specific text
/// anchors in the DOM heuristics.
#[derive(Debug, Clone)]
pub struct MarkerConfig {
    /// Sentinel phrase inside every card's `<time>` element.
    pub start_time: String,
    /// Section labels that distinguish the over/under odds group.
    pub over_under: Vec<String>,
    /// Exact (normalized) status text of a finished match.
    pub finished: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            start_time: "Start Time".to_string(),
            over_under: vec!["O/U".to_string(), "Over/Under".to_string()],
            finished: "Full Time".to_string(),
        }
    }
}

/// Scroll collector tuning. Defaults bound a worst-case run to
/// `max_iterations * settle_delay` even against a page that never settles.
#[derive(Debug, Clone)]
pub struct ScrollConfig {
    /// Hard iteration budget. Default 40.
    pub max_iterations: u32,
    /// Minimum scroll advance per iteration, px. Default 400.
    pub min_step_px: f64,
    /// Advance as a fraction of the container's client height. Default 0.8.
    pub step_ratio: f64,
    /// Delay between iterations so lazy content can load. Default 400 ms.
    pub settle_delay: Duration,
    /// Streak (no-new and no-move) both required at-bottom to converge. Default 2.
    pub stable_streak: u32,
    /// Hard stop: consecutive iterations without a new record. Default 8.
    pub max_no_new_streak: u32,
    /// Hard stop: consecutive iterations without scroll movement. Default 6.
    pub max_no_move_streak: u32,
    /// How close to the maximum offset counts as "at bottom", px. Default 2.
    pub bottom_tolerance_px: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            max_iterations: 40,
            min_step_px: 400.0,
            step_ratio: 0.8,
            settle_delay: Duration::from_millis(400),
            stable_streak: 2,
            max_no_new_streak: 8,
            max_no_move_streak: 6,
            bottom_tolerance_px: 2.0,
        }
    }
}

/// Top-level configuration for one scraper deployment.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Target site root, no trailing slash.
    pub base_url: String,
    /// Login credentials for the sign-in form.
    pub usercode: String,
    pub password: String,
    /// W3C WebDriver endpoint (chromedriver/geckodriver).
    pub webdriver_url: String,
    /// Where the latest document is persisted after a successful scrape.
    pub output_path: String,
    /// Fixed local offset of on-page timestamps, minutes east of UTC.
    /// Default 390 (+6:30, no DST).
    pub local_offset_minutes: i32,
    pub markers: MarkerConfig,
    pub scroll: ScrollConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sportsxzone.com".to_string(),
            usercode: String::new(),
            password: String::new(),
            webdriver_url: "http://localhost:9515".to_string(),
            output_path: "output.json".to_string(),
            local_offset_minutes: 6 * 60 + 30,
            markers: MarkerConfig::default(),
            scroll: ScrollConfig::default(),
        }
    }
}

impl ScraperConfig {
    /// Defaults overridden by `SXZ_BASE_URL`, `SXZ_USERCODE`, `SXZ_PASSWORD`,
    /// `WEBDRIVER_URL` and `OUTPUT_PATH` when set.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(v) = env::var("SXZ_BASE_URL") {
            cfg.base_url = v;
        }
        if let Ok(v) = env::var("SXZ_USERCODE") {
            cfg.usercode = v;
        }
        if let Ok(v) = env::var("SXZ_PASSWORD") {
            cfg.password = v;
        }
        if let Ok(v) = env::var("WEBDRIVER_URL") {
            cfg.webdriver_url = v;
        }
        if let Ok(v) = env::var("OUTPUT_PATH") {
            cfg.output_path = v;
        }
        cfg
    }

    /// The fixed offset as a chrono zone.
    pub fn local_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.local_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}
