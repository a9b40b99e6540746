//! Layout verification against the stub backend.
//!
//! Installs the `window.go.main.App` stub, loads the frontend, and confirms
//! the transaction list and the rule-card placeholder render. Writes
//! `verification/layout_with_placeholder.png` on success, `error.png` on
//! failure.

use std::process::ExitCode;

use verificar::{run_layout, VerifyConfig, VerifyResult};
use verificar_cli::{init_tracing, session};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> VerifyResult<bool> {
    let (browser, page) = session().await?;
    let outcome = run_layout(&page, &VerifyConfig::default()).await;
    println!("Summary: {}", outcome.ledger.summary());
    browser.close().await?;
    Ok(outcome.success)
}
