//! Politeness pacing for sequential scraping
//!
//! This module handles:
//! - The delay before every non-first page fetch within a source
//! - The delay before moving on to every non-first source
//!
//! Pacing is a value injected into the walker and coordinator, so tests can
//! run the same orchestration with `Pacing::none()`.

use crate::config::ScraperConfig;
use std::time::Duration;

/// Delays observed between requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Pause before fetching page N of a source, for N >= 1
    pub page_delay: Duration,

    /// Pause before starting source N of the roster, for N >= 1
    pub source_delay: Duration,
}

impl Pacing {
    pub fn new(page_delay: Duration, source_delay: Duration) -> Self {
        Self {
            page_delay,
            source_delay,
        }
    }

    /// Builds the pacing policy from the `[scraper]` table
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self::new(
            Duration::from_millis(config.page_delay_ms),
            Duration::from_millis(config.source_delay_ms),
        )
    }

    /// A policy that never waits
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Delay owed before fetching page `index` of a source
    pub fn page_wait(&self, index: u32) -> Duration {
        if index == 0 {
            Duration::ZERO
        } else {
            self.page_delay
        }
    }

    /// Delay owed before starting the source at roster `position`
    pub fn source_wait(&self, position: usize) -> Duration {
        if position == 0 {
            Duration::ZERO
        } else {
            self.source_delay
        }
    }

    /// Sleeps for the page delay unless this is the first page
    pub async fn before_page(&self, index: u32) {
        pause(self.page_wait(index)).await;
    }

    /// Sleeps for the source delay unless this is the first source
    pub async fn before_source(&self, position: usize) {
        pause(self.source_wait(position)).await;
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::from_config(&ScraperConfig::default())
    }
}

async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tracing::trace!("Pacing for {:?}", delay);
        tokio::time::sleep(delay).await;
    }
}
