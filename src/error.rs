use thiserror::Error;

/// Hard failures that abort a scrape atomically. Parse misses and malformed
/// cards are not errors — they default fields downstream. Only the session
/// boundary (driver transport, login, navigation) reaches this enum.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("login failed: {0}")]
    Login(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("webdriver transport error: {0}")]
    Driver(#[from] reqwest::Error),

    #[error("webdriver protocol error: {0}")]
    Protocol(String),

    #[error("snapshot decode failed: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("page never became ready: {0}")]
    NotReady(String),
}
