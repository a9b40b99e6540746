//! State wait predicate.
//!
//! A UI state is detected by its marker: a piece of visible text that
//! appears once the state is entered. Waiting is a bounded poll, never a
//! bare delay; on timeout a distinct [`VerifyError::StateTimeout`] is
//! raised, which the workflow driver converts into a terminal failure.

use tokio::time::{sleep, Duration, Instant};

use crate::driver::{eval_json, UiDriver};
use crate::query::ElementQuery;
use crate::result::{VerifyError, VerifyResult};

/// Polling interval for marker waits (50ms)
pub const POLL_INTERVAL_MS: u64 = 50;

/// Timeout tiers assigned per transition based on expected UI latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Major view transitions (10 seconds)
    Long,
    /// Local confirmations, e.g. reopening a previous view (5 seconds)
    Short,
}

impl Tier {
    /// Timeout duration for this tier
    #[must_use]
    pub const fn timeout(self) -> Duration {
        match self {
            Self::Long => Duration::from_millis(10_000),
            Self::Short => Duration::from_millis(5_000),
        }
    }
}

/// Block until `marker` is visible somewhere in the DOM, or the tier's
/// timeout elapses.
///
/// # Errors
///
/// Returns [`VerifyError::StateTimeout`] if the marker never appears, or
/// any driver error raised while polling.
pub async fn wait_for_text<D: UiDriver + ?Sized>(
    driver: &D,
    marker: &str,
    tier: Tier,
) -> VerifyResult<()> {
    let count_js = ElementQuery::new("*").with_text(marker).to_count_js();
    let deadline = Instant::now() + tier.timeout();

    loop {
        let count: u64 = eval_json(driver, &count_js).await?;
        if count > 0 {
            tracing::debug!(marker, "state marker observed");
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(VerifyError::StateTimeout {
                marker: marker.to_string(),
                ms: tier.timeout().as_millis() as u64,
            });
        }
        sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
    }
}
