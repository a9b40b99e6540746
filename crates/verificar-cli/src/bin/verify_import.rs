//! End-to-end import workflow verification.
//!
//! Drives the full flow against the application already serving on
//! `http://localhost:5173`: file upload, column mapping, account selection,
//! range selection, review assertions, and reverse navigation. Prints the
//! PASS/FAIL/WARNING ledger and writes `verification/success.png` or
//! `verification/error_final.png`.

use std::process::ExitCode;

use verificar::{ImportWorkflow, VerifyConfig, VerifyResult, WorkflowState};
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
    let outcome = ImportWorkflow::new(&page, VerifyConfig::default()).run().await;
    println!("Summary: {}", outcome.ledger.summary());
    browser.close().await?;
    Ok(outcome.state == WorkflowState::Done && !outcome.ledger.has_failures())
}
