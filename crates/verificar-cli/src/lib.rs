//! Shared session plumbing for the verification binaries.
//!
//! Every binary follows the same shape: initialize tracing, acquire a
//! browser session, run one scenario, release the session on every exit
//! path, and let the printed ledger speak for the run.

#![warn(missing_docs)]

use tracing_subscriber::EnvFilter;
use verificar::{Browser, BrowserConfig, CdpPage, VerifyResult};

/// Initialize tracing from `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Launch a headless browser and open the page driving the run.
///
/// # Errors
///
/// Returns an error when the browser cannot be launched or no page can be
/// opened.
pub async fn session() -> VerifyResult<(Browser, CdpPage)> {
    let browser = Browser::launch(BrowserConfig::default()).await?;
    let page = browser.page().await?;
    tracing::info!("browser session acquired");
    Ok((browser, page))
}
