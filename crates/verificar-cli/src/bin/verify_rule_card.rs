//! Rule-card verification against the stub backend.
//!
//! Installs the `window.go.main.App` stub, selects text across the seeded
//! transaction description with a pointer drag, and confirms the rule
//! creation card opens. Writes `verification/initial_state.png` and
//! `rule_card_visible.png` on success, `error.png` on failure.

use std::process::ExitCode;

use verificar::{run_rule_card, VerifyConfig, VerifyResult};
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
    let outcome = run_rule_card(&page, &VerifyConfig::default()).await;
    println!("Summary: {}", outcome.ledger.summary());
    browser.close().await?;
    Ok(outcome.success)
}
