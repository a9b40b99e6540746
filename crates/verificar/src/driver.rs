//! Abstract UI driver trait.
//!
//! The browser engine is a capability provider: navigate, evaluate script,
//! inject an init script, feed a file input, dispatch raw mouse events,
//! capture a screenshot. Everything above this seam is written against the
//! trait, so the workflow can be exercised by the CDP implementation
//! ([`crate::browser::CdpPage`]) or by the scripted test double
//! ([`crate::scripted::ScriptedDriver`]).

use std::path::Path;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::result::{VerifyError, VerifyResult};

/// Raw mouse event kinds, used only by the geometric text-range selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    /// Button press
    Press,
    /// Pointer move
    Move,
    /// Button release
    Release,
}

/// Capability seam over the browser engine.
#[async_trait]
pub trait UiDriver: Send + Sync {
    /// Navigate to a URL
    async fn goto(&self, url: &str) -> VerifyResult<()>;

    /// Evaluate a JavaScript expression, returning its JSON value.
    /// Expressions with no value yield `Value::Null`.
    async fn evaluate(&self, js: &str) -> VerifyResult<Value>;

    /// Register a script evaluated on every new document before the
    /// application's own code runs
    async fn add_init_script(&self, source: &str) -> VerifyResult<()>;

    /// Submit a local file path to a file-input control
    async fn set_file_input(&self, selector: &str, path: &Path) -> VerifyResult<()>;

    /// Dispatch a raw mouse event at viewport coordinates
    async fn mouse(&self, action: MouseAction, x: f64, y: f64) -> VerifyResult<()>;

    /// Capture a PNG screenshot of the page
    async fn screenshot(&self) -> VerifyResult<Vec<u8>>;
}

/// Evaluate a script and deserialize its JSON result.
pub async fn eval_json<D: UiDriver + ?Sized, T: DeserializeOwned>(
    driver: &D,
    js: &str,
) -> VerifyResult<T> {
    let value = driver.evaluate(js).await?;
    serde_json::from_value(value).map_err(|e| VerifyError::Evaluate {
        message: format!("unexpected evaluation result shape: {e}"),
    })
}
