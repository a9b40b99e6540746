//! Verificar: browser-driven UI verification for the transaction importer
//!
//! Verificar (Spanish: "to verify") drives a real Chromium instance over the
//! Chrome DevTools Protocol against a locally served web application and
//! checks that the import flow behaves: file upload, drag-based column
//! mapping, account selection, range selection, review assertions, and
//! reverse navigation. Two additional scenarios run the frontend against an
//! injected backend stub to check layout and rule-card behavior.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   VERIFICAR Architecture                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌────────────┐   ┌────────────┐            │
//! │  │ Workflow / │   │ UiDriver   │   │ Headless   │            │
//! │  │ Scenarios  │──►│ (CDP page  │──►│ Browser    │            │
//! │  │ + Ledger   │   │ or script) │   │ (chromium) │            │
//! │  └────────────┘   └────────────┘   └────────────┘            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The run's observable outcome is the printed PASS/FAIL/WARNING ledger
//! plus screenshot artifacts; the workflow never panics and converts every
//! unrecovered error into a terminal `Aborted` state.

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

/// Account-selection strategy (native select, custom dropdown, or absent)
pub mod account;
/// Injected `window.go.main.App` backend stub
pub mod backend;
/// Chromium session control over CDP
#[allow(clippy::missing_errors_doc)]
pub mod browser;
/// Run configuration with fixture defaults
pub mod config;
/// The driver capability seam
pub mod driver;
/// Interaction primitives (drag, click, select, text range)
#[allow(clippy::missing_errors_doc)]
pub mod interact;
/// Element queries and resolution
#[allow(clippy::missing_errors_doc)]
pub mod query;
/// Assertion ledger and screenshot artifacts
pub mod report;
/// Error taxonomy
pub mod result;
/// Stub-backend layout and rule-card scenarios
pub mod scenario;
/// Browser-free scripted driver for unit tests
pub mod scripted;
/// Bounded marker waits
pub mod wait;
/// The import workflow state machine
#[allow(missing_debug_implementations)]
pub mod workflow;

pub use account::AccountSelection;
pub use backend::{BackendStub, StubTransaction};
pub use browser::{Browser, BrowserConfig, CdpPage};
pub use config::VerifyConfig;
pub use driver::{MouseAction, UiDriver};
pub use interact::InteractionResult;
pub use query::{ElementQuery, ElementSnapshot, Ordinal, Scope};
pub use report::{Ledger, Verdict};
pub use result::{VerifyError, VerifyResult};
pub use scenario::{run_layout, run_rule_card, ScenarioOutcome};
pub use scripted::ScriptedDriver;
pub use wait::{wait_for_text, Tier};
pub use workflow::{ImportWorkflow, WorkflowOutcome, WorkflowState};
