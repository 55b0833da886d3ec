//! Scrape orchestration.
//!
//! One scrape is a single sequential flow: authenticate, open the odds page,
//! collect to convergence or budget exhaustion, assemble. Session and
//! navigation failures abort the whole scrape atomically — no partial
//! document is ever produced.

use chrono::{DateTime, Utc};

use crate::assemble::assemble;
use crate::collect::ScrollCollector;
use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::models::OddsFeed;
use crate::page::Page;
use crate::webdriver::WebDriverPage;

/// Run the extraction pipeline against an already-positioned page.
pub async fn run<P: Page>(
    page: &mut P,
    cfg: &ScraperConfig,
    now: DateTime<Utc>,
) -> Result<OddsFeed, ScrapeError> {
    let collector = ScrollCollector::new(page, cfg.scroll.clone(), cfg.markers.clone());
    let records = collector.run().await?;
    tracing::info!("parsed {} unique matches", records.len());
    Ok(assemble(records, cfg, now))
}

/// Full scrape against the live site: browser session, login, odds page,
/// pipeline, teardown. The session is closed on both success and failure.
pub async fn scrape_site(cfg: &ScraperConfig) -> Result<OddsFeed, ScrapeError> {
    let mut page = WebDriverPage::connect(cfg).await?;

    let result = async {
        page.login(cfg).await?;
        page.open_odds_page(cfg).await?;
        run(&mut page, cfg, Utc::now()).await
    }
    .await;

    if let Err(e) = page.close().await {
        tracing::warn!("session teardown failed: {}", e);
    }
    result
}
