//! Capability surface of a live, rendered page.
//!
//! This is the whole of what the pipeline may assume about its input: it can
//! wait for readiness, take a consistent snapshot, and write a scroll offset.
//! Any automation engine that can serialize its DOM into a [`Snapshot`] tree
//! can drive the pipeline; tests use scripted in-memory pages.

use crate::dom::{NodeId, Snapshot};
use crate::error::ScrapeError;

#[allow(async_fn_in_trait)]
pub trait Page {
    /// Block until the document is in a usable state for a snapshot pass.
    async fn wait_ready(&mut self) -> Result<(), ScrapeError>;

    /// One consistent view of the current DOM.
    async fn snapshot(&mut self) -> Result<Snapshot, ScrapeError>;

    /// Set the vertical scroll offset of the element at preorder position
    /// `target` in the most recent snapshot.
    async fn set_scroll(&mut self, target: NodeId, offset: f64) -> Result<(), ScrapeError>;
}
