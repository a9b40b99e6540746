//! Scripted driver: a browser-free [`UiDriver`] for unit tests.
//!
//! Evaluation responses are keyed by substring of the submitted script;
//! the first key (in registration order) contained in the script wins.
//! Each key holds a queue of responses, and the final response in a queue
//! is sticky, so a key can model both a fixed DOM and a DOM that changes
//! between polls (e.g. a control that becomes enabled after a retry).
//!
//! Every call is logged so tests can assert on interaction counts, which
//! scripts ran, and mouse geometry.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::driver::{MouseAction, UiDriver};
use crate::result::VerifyResult;

/// One recorded driver call.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCall {
    /// Navigation
    Goto(String),
    /// Script evaluation (full script text)
    Evaluate(String),
    /// Init-script registration (source text)
    InitScript(String),
    /// File-input submission
    SetFileInput {
        /// Target selector
        selector: String,
        /// Submitted path
        path: PathBuf,
    },
    /// Raw mouse event
    Mouse {
        /// Event kind
        action: MouseAction,
        /// Viewport x
        x: f64,
        /// Viewport y
        y: f64,
    },
    /// Screenshot capture
    Screenshot,
}

#[derive(Debug)]
struct Responder {
    key: String,
    queue: VecDeque<Value>,
}

/// Scripted [`UiDriver`] implementation.
#[derive(Debug, Default)]
pub struct ScriptedDriver {
    responders: Mutex<Vec<Responder>>,
    log: Mutex<Vec<DriverCall>>,
}

impl ScriptedDriver {
    /// Create a driver with no scripted responses; unmatched evaluations
    /// return an empty array (the zero-matches DOM).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sticky response for scripts containing `key`.
    pub fn respond(&self, key: impl Into<String>, value: Value) {
        self.respond_seq(key, vec![value]);
    }

    /// Register a sequence of responses for scripts containing `key`; the
    /// last response is sticky once the earlier ones are consumed.
    pub fn respond_seq(&self, key: impl Into<String>, values: Vec<Value>) {
        let mut responders = self.responders.lock().expect("responders lock");
        responders.push(Responder {
            key: key.into(),
            queue: values.into(),
        });
    }

    fn response_for(&self, js: &str) -> Value {
        let mut responders = self.responders.lock().expect("responders lock");
        for responder in responders.iter_mut() {
            if js.contains(&responder.key) {
                return if responder.queue.len() > 1 {
                    responder.queue.pop_front().unwrap_or(Value::Null)
                } else {
                    responder.queue.front().cloned().unwrap_or(Value::Null)
                };
            }
        }
        // Unmatched resolution sees an empty DOM
        Value::Array(vec![])
    }

    fn record(&self, call: DriverCall) {
        self.log.lock().expect("log lock").push(call);
    }

    /// Full call log
    #[must_use]
    pub fn calls(&self) -> Vec<DriverCall> {
        self.log.lock().expect("log lock").clone()
    }

    /// Number of evaluated scripts containing every given needle
    #[must_use]
    pub fn evaluations_containing(&self, needles: &[&str]) -> usize {
        self.log
            .lock()
            .expect("log lock")
            .iter()
            .filter(|call| match call {
                DriverCall::Evaluate(js) => needles.iter().all(|n| js.contains(n)),
                _ => false,
            })
            .count()
    }

    /// Recorded mouse events, in order
    #[must_use]
    pub fn mouse_events(&self) -> Vec<(MouseAction, f64, f64)> {
        self.log
            .lock()
            .expect("log lock")
            .iter()
            .filter_map(|call| match call {
                DriverCall::Mouse { action, x, y } => Some((*action, *x, *y)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl UiDriver for ScriptedDriver {
    async fn goto(&self, url: &str) -> VerifyResult<()> {
        self.record(DriverCall::Goto(url.to_string()));
        Ok(())
    }

    async fn evaluate(&self, js: &str) -> VerifyResult<Value> {
        self.record(DriverCall::Evaluate(js.to_string()));
        Ok(self.response_for(js))
    }

    async fn add_init_script(&self, source: &str) -> VerifyResult<()> {
        self.record(DriverCall::InitScript(source.to_string()));
        Ok(())
    }

    async fn set_file_input(&self, selector: &str, path: &Path) -> VerifyResult<()> {
        self.record(DriverCall::SetFileInput {
            selector: selector.to_string(),
            path: path.to_path_buf(),
        });
        Ok(())
    }

    async fn mouse(&self, action: MouseAction, x: f64, y: f64) -> VerifyResult<()> {
        self.record(DriverCall::Mouse { action, x, y });
        Ok(())
    }

    async fn screenshot(&self) -> VerifyResult<Vec<u8>> {
        self.record(DriverCall::Screenshot);
        // Minimal PNG header; enough for artifact-writing tests
        Ok(vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unmatched_evaluation_is_empty_dom() {
        let driver = ScriptedDriver::new();
        let value = driver.evaluate("whatever").await.unwrap();
        assert_eq!(value, Value::Array(vec![]));
    }

    #[tokio::test]
    async fn test_first_registered_key_wins() {
        let driver = ScriptedDriver::new();
        driver.respond("querySelectorAll(\"th\")", serde_json::json!(1));
        driver.respond("th", serde_json::json!(2));
        let value = driver.evaluate("Array.from(document.querySelectorAll(\"th\")).length").await;
        assert_eq!(value.unwrap(), serde_json::json!(1));
    }

    #[tokio::test]
    async fn test_sequenced_responses_stick_on_last() {
        let driver = ScriptedDriver::new();
        driver.respond_seq("Next Step", vec![serde_json::json!(false), serde_json::json!(true)]);
        assert_eq!(driver.evaluate("Next Step").await.unwrap(), serde_json::json!(false));
        assert_eq!(driver.evaluate("Next Step").await.unwrap(), serde_json::json!(true));
        assert_eq!(driver.evaluate("Next Step").await.unwrap(), serde_json::json!(true));
    }

    #[tokio::test]
    async fn test_log_records_calls() {
        let driver = ScriptedDriver::new();
        driver.goto("http://localhost:5173").await.unwrap();
        driver.evaluate("1 + 1").await.unwrap();
        driver.mouse(MouseAction::Press, 3.0, 4.0).await.unwrap();
        let calls = driver.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], DriverCall::Goto("http://localhost:5173".to_string()));
        assert_eq!(driver.mouse_events(), vec![(MouseAction::Press, 3.0, 4.0)]);
        assert_eq!(driver.evaluations_containing(&["1 + 1"]), 1);
    }
}
