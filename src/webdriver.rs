//! W3C WebDriver implementation of the [`Page`] capability surface.
//!
//! Talks plain HTTP+JSON to a chromedriver/geckodriver endpoint: session
//! lifecycle, navigation, the sign-in form, and two injected scripts — one
//! that serializes the element tree into the [`NodeSpec`] wire shape (same
//! preorder the snapshot uses for node ids) and one that writes a scroll
//! offset back to the element at a given preorder position.

use std::time::Duration;

use serde_json::{json, Value};

use crate::config::ScraperConfig;
use crate::dom::{NodeId, NodeSpec, Snapshot};
use crate::error::ScrapeError;
use crate::page::Page;

const SIGN_IN_PATH: &str = "/sign-in";
const ODDS_PATH: &str = "/body";
const USERCODE_SELECTOR: &str = "#usercode";
const PASSWORD_SELECTOR: &str = "#password";
const SUBMIT_SELECTOR: &str = "button[type=\"submit\"]";

const READY_POLL_INTERVAL: Duration = Duration::from_millis(200);
const READY_POLL_ATTEMPTS: u32 = 50;
const LOGIN_POLL_ATTEMPTS: u32 = 50;

const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Serializes the document into the `NodeSpec` tree. Children are visited in
/// order, so the driver and `Snapshot::from_spec` agree on preorder ids.
const SNAPSHOT_SCRIPT: &str = r#"
const walk = (el) => {
  let own = '';
  for (const n of el.childNodes) {
    if (n.nodeType === Node.TEXT_NODE) own += n.textContent + ' ';
  }
  const cs = window.getComputedStyle(el);
  return {
    tag: el.tagName.toLowerCase(),
    text: own,
    overflowY: cs.overflowY,
    scrollTop: el.scrollTop,
    scrollHeight: el.scrollHeight,
    clientHeight: el.clientHeight,
    children: Array.from(el.children).map(walk),
  };
};
return walk(document.documentElement);
"#;

/// Scrolls the element at preorder position `arguments[0]` to offset
/// `arguments[1]`. The root element scrolls the window.
const SCROLL_SCRIPT: &str = r#"
const target = arguments[0];
const offset = arguments[1];
let index = 0;
let found = null;
const walk = (el) => {
  if (found) return;
  if (index === target) { found = el; return; }
  index += 1;
  for (const c of el.children) walk(c);
};
walk(document.documentElement);
if (!found) return false;
if (found === document.documentElement) {
  window.scrollTo(0, offset);
} else {
  found.scrollTop = offset;
}
return true;
"#;

pub struct WebDriverPage {
    http: reqwest::Client,
    driver_url: String,
    session_id: String,
}

impl WebDriverPage {
    /// Open a fresh headless browser session against the WebDriver endpoint.
    pub async fn connect(cfg: &ScraperConfig) -> Result<Self, ScrapeError> {
        let http = reqwest::Client::new();
        let body = json!({
            "capabilities": {
                "alwaysMatch": {
                    "goog:chromeOptions": {
                        "args": ["--headless=new", "--no-sandbox", "--disable-dev-shm-usage"]
                    }
                }
            }
        });

        let resp: Value = http
            .post(format!("{}/session", cfg.webdriver_url))
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        let session_id = resp["value"]["sessionId"]
            .as_str()
            .ok_or_else(|| ScrapeError::Protocol(format!("no sessionId in {resp}")))?
            .to_string();

        tracing::info!("webdriver session {} created", session_id);
        Ok(Self { http, driver_url: cfg.webdriver_url.clone(), session_id })
    }

    /// Navigate–fill–submit–verify sign-in. A URL still on the sign-in page
    /// after submission is a hard [`ScrapeError::Login`] abort.
    pub async fn login(&mut self, cfg: &ScraperConfig) -> Result<(), ScrapeError> {
        tracing::info!("logging in");
        self.goto(&format!("{}{}", cfg.base_url, SIGN_IN_PATH)).await?;
        self.wait_ready().await?;

        self.fill(USERCODE_SELECTOR, &cfg.usercode).await?;
        self.fill(PASSWORD_SELECTOR, &cfg.password).await?;
        self.click(SUBMIT_SELECTOR).await?;

        for _ in 0..LOGIN_POLL_ATTEMPTS {
            if !self.current_url().await?.contains(SIGN_IN_PATH) {
                return Ok(());
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
        Err(ScrapeError::Login("still on sign-in page after submit".to_string()))
    }

    /// Navigate to the odds page.
    pub async fn open_odds_page(&mut self, cfg: &ScraperConfig) -> Result<(), ScrapeError> {
        tracing::info!("opening {}", ODDS_PATH);
        self.goto(&format!("{}{}", cfg.base_url, ODDS_PATH)).await
    }

    /// Tear down the browser session. Best-effort; callers may ignore errors.
    pub async fn close(self) -> Result<(), ScrapeError> {
        self.http
            .delete(format!("{}/session/{}", self.driver_url, self.session_id))
            .send()
            .await?;
        Ok(())
    }

    // ── Wire protocol helpers ────────────────────────────────────────────────

    fn session_url(&self, path: &str) -> String {
        format!("{}/session/{}{}", self.driver_url, self.session_id, path)
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, ScrapeError> {
        let resp = self.http.post(self.session_url(path)).json(&body).send().await?;
        let status = resp.status();
        let payload: Value = resp.json().await?;
        if !status.is_success() {
            let message = payload["value"]["message"].as_str().unwrap_or("").to_string();
            return Err(ScrapeError::Protocol(format!("POST {path}: {status}: {message}")));
        }
        Ok(payload["value"].clone())
    }

    async fn get(&self, path: &str) -> Result<Value, ScrapeError> {
        let resp = self.http.get(self.session_url(path)).send().await?;
        let status = resp.status();
        let payload: Value = resp.json().await?;
        if !status.is_success() {
            return Err(ScrapeError::Protocol(format!("GET {path}: {status}")));
        }
        Ok(payload["value"].clone())
    }

    async fn goto(&self, url: &str) -> Result<(), ScrapeError> {
        self.post("/url", json!({ "url": url }))
            .await
            .map_err(|e| ScrapeError::Navigation(format!("{url}: {e}")))?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, ScrapeError> {
        Ok(self.get("/url").await?.as_str().unwrap_or_default().to_string())
    }

    async fn find_element(&self, css: &str) -> Result<String, ScrapeError> {
        let value = self
            .post("/element", json!({ "using": "css selector", "value": css }))
            .await?;
        value[ELEMENT_KEY]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ScrapeError::Protocol(format!("no element ref for {css}")))
    }

    async fn fill(&self, css: &str, text: &str) -> Result<(), ScrapeError> {
        let element = self.find_element(css).await?;
        self.post(&format!("/element/{element}/value"), json!({ "text": text })).await?;
        Ok(())
    }

    async fn click(&self, css: &str) -> Result<(), ScrapeError> {
        let element = self.find_element(css).await?;
        self.post(&format!("/element/{element}/click"), json!({})).await?;
        Ok(())
    }

    async fn execute(&self, script: &str, args: Value) -> Result<Value, ScrapeError> {
        self.post("/execute/sync", json!({ "script": script, "args": args })).await
    }
}

impl Page for WebDriverPage {
    async fn wait_ready(&mut self) -> Result<(), ScrapeError> {
        for _ in 0..READY_POLL_ATTEMPTS {
            let state = self.execute("return document.readyState;", json!([])).await?;
            if state.as_str() == Some("complete") {
                return Ok(());
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
        Err(ScrapeError::NotReady("document.readyState never reached complete".to_string()))
    }

    async fn snapshot(&mut self) -> Result<Snapshot, ScrapeError> {
        let value = self.execute(SNAPSHOT_SCRIPT, json!([])).await?;
        let spec: NodeSpec = serde_json::from_value(value)?;
        Ok(Snapshot::from_spec(&spec))
    }

    async fn set_scroll(&mut self, target: NodeId, offset: f64) -> Result<(), ScrapeError> {
        self.execute(SCROLL_SCRIPT, json!([target, offset])).await?;
        Ok(())
    }
}
