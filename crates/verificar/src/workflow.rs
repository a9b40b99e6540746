//! Import workflow driver.
//!
//! A linear state machine over the import flow: upload the sample file, map
//! the columns by dragging, resolve the account, advance to the range view,
//! run the review assertions, navigate back, and finish. Exactly one state
//! is current at any time, and no view is interacted with before its entry
//! marker has been confirmed.
//!
//! The driver never panics and never propagates an error to its caller:
//! an unrecovered error lands in [`WorkflowState::Aborted`] with an error
//! screenshot, and the printed ledger is the run's outcome either way.

use crate::account::resolve_account;
use crate::config::VerifyConfig;
use crate::driver::UiDriver;
use crate::interact::{click, click_forced, drag, is_enabled};
use crate::query::{resolve, ElementQuery, ElementSnapshot, Scope};
use crate::report::{write_artifact, Ledger, ERROR_ARTIFACT, SUCCESS_ARTIFACT};
use crate::result::VerifyResult;
use crate::wait::{wait_for_text, Tier};

/// Entry marker of the column-mapping view
pub const MARKER_MAP_COLUMNS: &str = "Map Columns";
/// Entry marker of the range-selection view
pub const MARKER_SELECT_RANGE: &str = "Select Range";

/// Source column names, dragged in this fixed order
pub const COLUMN_FIELDS: [&str; 5] = ["Date", "Description", "Amount", "Owner", "Account"];

/// Placeholder text of an unmapped drop target
const DROP_PLACEHOLDER: &str = "Drop column";
/// CSS selector of the upload control
const FILE_INPUT_SELECTOR: &str = "input[type='file']";

const BTN_NEXT: &str = "Next Step";
const BTN_BACK: &str = "Back";
const BTN_IMPORT: &str = "Import";

/// Position in the import flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// Nothing done yet
    Start,
    /// Sample file submitted, mapping view confirmed
    FileUploaded,
    /// Column drags issued
    ColumnsMapped,
    /// Account selection strategy applied
    AccountResolved,
    /// Range-selection view confirmed
    RangeSelected,
    /// Review assertions executed
    ReviewVisible,
    /// Reverse navigation confirmed
    BackToColumns,
    /// Terminal success
    Done,
    /// Terminal failure
    Aborted,
}

/// Final state plus the assertion ledger.
#[derive(Debug)]
pub struct WorkflowOutcome {
    /// Terminal state ([`WorkflowState::Done`] or [`WorkflowState::Aborted`])
    pub state: WorkflowState,
    /// Every assertion recorded during the run
    pub ledger: Ledger,
}

fn source_query(field: &str) -> ElementQuery {
    ElementQuery::scoped(Scope::LeftPanel, "div[draggable='true']")
        .with_text(field)
        .first()
}

fn target_query(field: &str) -> ElementQuery {
    ElementQuery::scoped(Scope::RightPanel, "div")
        .with_text(field)
        .with_text(DROP_PLACEHOLDER)
        .last()
}

/// The import verification workflow.
pub struct ImportWorkflow<'a, D: UiDriver + ?Sized> {
    driver: &'a D,
    config: VerifyConfig,
    state: WorkflowState,
    ledger: Ledger,
}

impl<'a, D: UiDriver + ?Sized> ImportWorkflow<'a, D> {
    /// Create a workflow over an already-acquired driver session
    pub fn new(driver: &'a D, config: VerifyConfig) -> Self {
        Self {
            driver,
            config,
            state: WorkflowState::Start,
            ledger: Ledger::new(),
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> WorkflowState {
        self.state
    }

    /// Run the workflow to a terminal state. Errors are terminal, not
    /// propagated: the outcome carries `Done` or `Aborted` plus the ledger.
    pub async fn run(mut self) -> WorkflowOutcome {
        match self.drive().await {
            Ok(()) => {
                self.state = WorkflowState::Done;
                self.capture(SUCCESS_ARTIFACT).await;
            }
            Err(e) => {
                tracing::error!(error = %e, state = ?self.state, "workflow aborted");
                self.ledger.fail("Workflow ran to completion", e.to_string());
                self.state = WorkflowState::Aborted;
                self.capture(ERROR_ARTIFACT).await;
            }
        }
        tracing::info!(summary = %self.ledger.summary(), "workflow finished");
        WorkflowOutcome {
            state: self.state,
            ledger: self.ledger,
        }
    }

    async fn drive(&mut self) -> VerifyResult<()> {
        self.driver.goto(&self.config.app_url).await?;
        self.driver
            .set_file_input(FILE_INPUT_SELECTOR, &self.config.csv_path)
            .await?;
        wait_for_text(self.driver, MARKER_MAP_COLUMNS, Tier::Long).await?;
        self.state = WorkflowState::FileUploaded;

        self.map_columns().await?;
        self.state = WorkflowState::ColumnsMapped;

        let selection = resolve_account(self.driver, &self.config).await?;
        tracing::info!(?selection, "account selection applied");
        self.state = WorkflowState::AccountResolved;

        self.advance_to_range().await?;
        self.state = WorkflowState::RangeSelected;

        self.review_assertions().await?;
        self.state = WorkflowState::ReviewVisible;

        click(self.driver, &ElementQuery::new("button").with_text(BTN_BACK)).await?;
        wait_for_text(self.driver, MARKER_MAP_COLUMNS, Tier::Short).await?;
        self.state = WorkflowState::BackToColumns;
        Ok(())
    }

    /// Drag every source column onto its drop target. Each drag is
    /// independently skippable: a missing side means that column is already
    /// mapped or absent from the sample, which later assertions will judge.
    async fn map_columns(&mut self) -> VerifyResult<()> {
        for field in COLUMN_FIELDS {
            let result = drag(self.driver, &source_query(field), &target_query(field)).await?;
            if result.was_skipped() {
                tracing::info!(field, reason = result.skip_reason.as_deref(), "drag skipped");
            } else {
                tracing::debug!(field, "column mapped");
            }
        }
        Ok(())
    }

    /// Advance from the mapping view to the range view. When the advance
    /// control is disabled the Date mapping gets one bounded retry, then the
    /// click is forced and the following wait surfaces any failure.
    async fn advance_to_range(&mut self) -> VerifyResult<()> {
        let next = ElementQuery::new("button").with_text(BTN_NEXT);
        match is_enabled(self.driver, &next).await? {
            Some(true) => {
                click(self.driver, &next).await?;
            }
            enabled => {
                tracing::warn!(?enabled, "advance control not ready, retrying Date mapping");
                drag(self.driver, &source_query("Date"), &target_query("Date")).await?;
                click_forced(self.driver, &next).await?;
            }
        }
        wait_for_text(self.driver, MARKER_SELECT_RANGE, Tier::Long).await
    }

    /// Run every review assertion. Assertions are independent: each one
    /// records its own verdict and none blocks the rest.
    async fn review_assertions(&mut self) -> VerifyResult<()> {
        let import = ElementQuery::new("button").with_text(BTN_IMPORT);
        let buttons = resolve(self.driver, &import).await?;
        assess_import_button(&mut self.ledger, &buttons);

        let headers = resolve(self.driver, &ElementQuery::new("th")).await?;
        assess_headers(&mut self.ledger, &headers);

        let cells = resolve(self.driver, &ElementQuery::new("td")).await?;
        assess_owner(&mut self.ledger, &cells);
        assess_account(&mut self.ledger, &cells, &self.config);
        Ok(())
    }

    /// Best-effort screenshot; a capture failure never masks the outcome.
    async fn capture(&self, name: &str) {
        let written = match self.driver.screenshot().await {
            Ok(bytes) => write_artifact(&self.config.artifact_dir, name, &bytes),
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            tracing::warn!(error = %e, name, "screenshot capture failed");
        }
    }
}

/// The import control must carry the centering style class.
fn assess_import_button(ledger: &mut Ledger, buttons: &[ElementSnapshot]) {
    let description = "Import control is centered";
    match buttons.first() {
        Some(button) if button.class_name.contains("justify-center") => {
            ledger.pass(description);
        }
        Some(button) => {
            ledger.fail(description, format!("class=\"{}\"", button.class_name));
        }
        None => ledger.fail(description, "no Import control found"),
    }
}

/// The review table headers must include an Account column.
fn assess_headers(ledger: &mut Ledger, headers: &[ElementSnapshot]) {
    let description = "Review headers include an Account column";
    if headers
        .iter()
        .any(|h| h.text.to_uppercase().contains("ACCOUNT"))
    {
        ledger.pass(description);
    } else {
        let observed: Vec<&str> = headers.iter().map(|h| h.text.as_str()).collect();
        ledger.fail(description, format!("headers: {observed:?}"));
    }
}

/// The owner value "Me" must appear verbatim in some review cell.
/// Trimmed-exact match: substring matching would accept unrelated text.
fn assess_owner(ledger: &mut Ledger, cells: &[ElementSnapshot]) {
    let description = "Owner value 'Me' appears in the review table";
    if cells.iter().any(|c| c.text.trim() == "Me") {
        ledger.pass(description);
    } else {
        ledger.fail(description, format!("{} cells, none matching", cells.len()));
    }
}

/// Exactly one of: the mapped account appears (pass), the fallback account
/// appears (warning, degraded path taken), neither appears (fail).
fn assess_account(ledger: &mut Ledger, cells: &[ElementSnapshot], cfg: &VerifyConfig) {
    let description = format!("Review table carries account '{}'", cfg.mapped_account);
    if cells.iter().any(|c| c.text.contains(&cfg.mapped_account)) {
        ledger.pass(description);
    } else if cells.iter().any(|c| c.text.contains(&cfg.fallback_account)) {
        ledger.warn(
            description,
            format!("fallback account '{}' observed instead", cfg.fallback_account),
        );
    } else {
        let observed: Vec<&str> = cells.iter().map(|c| c.text.as_str()).collect();
        ledger.fail(description, format!("cells: {observed:?}"));
    }
}
