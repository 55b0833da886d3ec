//! Incremental scroll collection.
//!
//! Virtualized pages only render what is near the viewport, so one snapshot
//! never sees every card. The collector drives the page toward the bottom in
//! bounded steps, re-classifies after each advance, and folds results into an
//! identity-keyed accumulator. Termination is an explicit state machine:
//! `Converged` needs the container at its maximum offset plus short no-new and
//! no-move streaks together, so an async burst of late content cannot end the
//! run early; `Exhausted` caps the worst case against a page that never
//! settles. Either terminal state returns everything accumulated.

use std::collections::HashSet;

use crate::classify::classify;
use crate::config::{MarkerConfig, ScrollConfig};
use crate::error::ScrapeError;
use crate::models::RawMatchRecord;
use crate::page::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorState {
    Collecting,
    Converged,
    Exhausted,
}

pub struct ScrollCollector<'a, P: Page> {
    page: &'a mut P,
    scroll: ScrollConfig,
    markers: MarkerConfig,
    seen: HashSet<String>,
    records: Vec<RawMatchRecord>,
    state: CollectorState,
    iterations: u32,
    no_new_streak: u32,
    no_move_streak: u32,
    last_offset: Option<f64>,
}

impl<'a, P: Page> ScrollCollector<'a, P> {
    pub fn new(page: &'a mut P, scroll: ScrollConfig, markers: MarkerConfig) -> Self {
        Self {
            page,
            scroll,
            markers,
            seen: HashSet::new(),
            records: Vec::new(),
            state: CollectorState::Collecting,
            iterations: 0,
            no_new_streak: 0,
            no_move_streak: 0,
            last_offset: None,
        }
    }

    pub fn state(&self) -> CollectorState {
        self.state
    }

    pub fn is_converged(&self) -> bool {
        self.state == CollectorState::Converged
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == CollectorState::Exhausted
    }

    /// Records accumulated so far, first-seen order.
    pub fn records(&self) -> &[RawMatchRecord] {
        &self.records
    }

    /// One classify–merge–scroll iteration. No-op once terminal.
    pub async fn step(&mut self) -> Result<(), ScrapeError> {
        if self.state != CollectorState::Collecting {
            return Ok(());
        }

        self.page.wait_ready().await?;
        let snap = self.page.snapshot().await?;

        let found = classify(&snap, &self.markers);
        let added = self.merge(found);
        if added == 0 {
            self.no_new_streak += 1;
        } else {
            self.no_new_streak = 0;
        }

        let container = snap.scrollable_container();
        let offset = snap.node(container).scroll_top;
        let moved = self.last_offset.map_or(true, |prev| (offset - prev).abs() > f64::EPSILON);
        if moved {
            self.no_move_streak = 0;
        } else {
            self.no_move_streak += 1;
        }
        self.last_offset = Some(offset);

        let at_bottom = snap.at_bottom(container, self.scroll.bottom_tolerance_px);
        if !at_bottom {
            let advance =
                self.scroll.min_step_px.max(snap.node(container).client_height * self.scroll.step_ratio);
            let target = (offset + advance).min(snap.max_scroll(container));
            self.page.set_scroll(container, target).await?;
        }

        self.iterations += 1;
        tracing::debug!(
            "scroll pass {}: {} new, {} total, offset {}, at_bottom {}",
            self.iterations,
            added,
            self.records.len(),
            offset,
            at_bottom
        );

        if at_bottom
            && self.no_new_streak >= self.scroll.stable_streak
            && self.no_move_streak >= self.scroll.stable_streak
        {
            self.state = CollectorState::Converged;
        } else if self.no_new_streak >= self.scroll.max_no_new_streak
            || self.no_move_streak >= self.scroll.max_no_move_streak
            || self.iterations >= self.scroll.max_iterations
        {
            self.state = CollectorState::Exhausted;
        }

        Ok(())
    }

    /// Iterate to a terminal state and hand back the deduplicated records.
    pub async fn run(mut self) -> Result<Vec<RawMatchRecord>, ScrapeError> {
        while self.state == CollectorState::Collecting {
            self.step().await?;
            if self.state == CollectorState::Collecting {
                tokio::time::sleep(self.scroll.settle_delay).await;
            }
        }
        tracing::info!(
            "collection finished: {} records in {} iterations (converged: {})",
            self.records.len(),
            self.iterations,
            self.is_converged()
        );
        Ok(self.records)
    }

    fn merge(&mut self, found: Vec<RawMatchRecord>) -> usize {
        let mut added = 0;
        for record in found {
            if self.seen.insert(record.identity_key()) {
                self.records.push(record);
                added += 1;
            }
        }
        added
    }
}
