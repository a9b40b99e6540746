//! Interaction primitives.
//!
//! Every primitive resolves its targets fresh, acts inside a single atomic
//! script evaluation, and reports an [`InteractionResult`] instead of
//! erroring when a target is absent: partial column mapping is a normal
//! outcome, and the workflow decides what to do with a skip.

use serde::Deserialize;
use tokio::time::{sleep, Duration};

use crate::driver::{eval_json, MouseAction, UiDriver};
use crate::query::{resolve, ElementQuery};
use crate::result::VerifyResult;

/// Pause after a successful drag so the application's reactive state can
/// settle before the next locator resolution. Heuristic: the UI under test
/// exposes no "settled" signal to poll for.
pub const DRAG_SETTLE_MS: u64 = 200;

/// Horizontal distance of the text-selection pointer drag, in pixels.
pub const TEXT_SELECT_DRAG_PX: f64 = 100.0;

/// Outcome of one interaction attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionResult {
    /// Whether the interaction was issued at all
    pub attempted: bool,
    /// Whether the issued interaction succeeded
    pub succeeded: bool,
    /// Why the interaction was skipped, when it was
    pub skip_reason: Option<String>,
}

impl InteractionResult {
    /// An interaction that was issued and succeeded
    #[must_use]
    pub const fn performed() -> Self {
        Self {
            attempted: true,
            succeeded: true,
            skip_reason: None,
        }
    }

    /// An interaction that was not issued
    #[must_use]
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            attempted: false,
            succeeded: false,
            skip_reason: Some(reason.into()),
        }
    }

    /// Whether the interaction was skipped
    #[must_use]
    pub const fn was_skipped(&self) -> bool {
        !self.attempted
    }
}

#[derive(Debug, Deserialize)]
struct ActOutcome {
    #[serde(alias = "clicked", alias = "applied")]
    done: bool,
    reason: Option<String>,
}

/// Drag a source element onto a target element.
///
/// Only proceeds when both queries resolve to at least one element; an empty
/// side yields a skipped result, never an error. Dispatches the HTML5 drag
/// event sequence with a shared DataTransfer in one evaluation, then pauses
/// for [`DRAG_SETTLE_MS`].
pub async fn drag<D: UiDriver + ?Sized>(
    driver: &D,
    source: &ElementQuery,
    target: &ElementQuery,
) -> VerifyResult<InteractionResult> {
    let sources = resolve(driver, source).await?;
    let targets = resolve(driver, target).await?;
    if sources.is_empty() || targets.is_empty() {
        let reason = if sources.is_empty() {
            "drag source not found"
        } else {
            "drag target not found"
        };
        tracing::info!(reason, "skipping drag");
        return Ok(InteractionResult::skipped(reason));
    }

    let js = format!(
        "(() => {{ const src = {src}; const dst = {dst}; \
         if (!src || !dst) return false; \
         const dt = new DataTransfer(); \
         const fire = (el, type) => el.dispatchEvent(new DragEvent(type, \
         {{ bubbles: true, cancelable: true, dataTransfer: dt }})); \
         fire(src, \"dragstart\"); fire(dst, \"dragenter\"); fire(dst, \"dragover\"); \
         fire(dst, \"drop\"); fire(src, \"dragend\"); return true; }})()",
        src = source.to_pick_js(),
        dst = target.to_pick_js(),
    );
    let dropped: bool = eval_json(driver, &js).await?;
    if !dropped {
        return Ok(InteractionResult::skipped("drag target vanished"));
    }

    sleep(Duration::from_millis(DRAG_SETTLE_MS)).await;
    Ok(InteractionResult::performed())
}

fn click_js(query: &ElementQuery, force: bool) -> String {
    let guard = if force {
        String::new()
    } else {
        "if (el.disabled) return { clicked: false, reason: \"disabled\" }; ".to_string()
    };
    format!(
        "(() => {{ const el = {pick}; \
         if (!el) return {{ clicked: false, reason: \"not-found\" }}; \
         {guard}el.click(); return {{ clicked: true, reason: null }}; }})()",
        pick = query.to_pick_js(),
    )
}

/// Click the resolved target. A present-but-disabled element is not clicked;
/// callers branch on the result rather than relying on a silent no-op.
pub async fn click<D: UiDriver + ?Sized>(
    driver: &D,
    query: &ElementQuery,
) -> VerifyResult<InteractionResult> {
    let outcome: ActOutcome = eval_json(driver, &click_js(query, false)).await?;
    Ok(to_result(outcome))
}

/// Click the resolved target even if it is disabled. The browser no-ops a
/// disabled control, and the missing transition surfaces at the next wait.
pub async fn click_forced<D: UiDriver + ?Sized>(
    driver: &D,
    query: &ElementQuery,
) -> VerifyResult<InteractionResult> {
    let outcome: ActOutcome = eval_json(driver, &click_js(query, true)).await?;
    Ok(to_result(outcome))
}

fn to_result(outcome: ActOutcome) -> InteractionResult {
    if outcome.done {
        InteractionResult::performed()
    } else {
        InteractionResult::skipped(outcome.reason.unwrap_or_else(|| "skipped".to_string()))
    }
}

/// Whether the ordinally-selected element is enabled. `None` when the query
/// resolves to nothing.
pub async fn is_enabled<D: UiDriver + ?Sized>(
    driver: &D,
    query: &ElementQuery,
) -> VerifyResult<Option<bool>> {
    let matches = resolve(driver, query).await?;
    Ok(query.select(&matches).map(|snap| !snap.disabled))
}

/// Select an option on a native `<select>` by position. Acting on a disabled
/// control is expected behavior (the selection is implied by prior mapping)
/// and reports a skip, not a failure.
pub async fn select_option_by_index<D: UiDriver + ?Sized>(
    driver: &D,
    query: &ElementQuery,
    index: usize,
) -> VerifyResult<InteractionResult> {
    let js = format!(
        "(() => {{ const el = {pick}; \
         if (!el) return {{ applied: false, reason: \"not-found\" }}; \
         if (el.disabled) return {{ applied: false, reason: \"disabled\" }}; \
         el.selectedIndex = {index}; \
         el.dispatchEvent(new Event(\"input\", {{ bubbles: true }})); \
         el.dispatchEvent(new Event(\"change\", {{ bubbles: true }})); \
         return {{ applied: true, reason: null }}; }})()",
        pick = query.to_pick_js(),
    );
    let outcome: ActOutcome = eval_json(driver, &js).await?;
    Ok(to_result(outcome))
}

/// Simulate a pointer drag across a text-bearing element's bounding box:
/// press at the left edge at mid-height, move `dx` to the right, release.
/// The only primitive that depends on geometric coordinates, because the
/// triggering event is the browser's native text-selection mechanism.
pub async fn select_text_range<D: UiDriver + ?Sized>(
    driver: &D,
    query: &ElementQuery,
    dx: f64,
) -> VerifyResult<InteractionResult> {
    let matches = resolve(driver, query).await?;
    let Some(snap) = query.select(&matches) else {
        return Ok(InteractionResult::skipped("text element not found"));
    };

    let y = snap.mid_height();
    driver.mouse(MouseAction::Press, snap.x, y).await?;
    driver.mouse(MouseAction::Move, snap.x + dx, y).await?;
    driver.mouse(MouseAction::Release, snap.x + dx, y).await?;
    Ok(InteractionResult::performed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{ElementSnapshot, Scope};
    use crate::scripted::ScriptedDriver;
    use serde_json::json;

    fn snapshots(snaps: Vec<ElementSnapshot>) -> serde_json::Value {
        serde_json::to_value(snaps).unwrap()
    }

    fn snap(text: &str, disabled: bool) -> ElementSnapshot {
        ElementSnapshot {
            index: 0,
            tag: "div".to_string(),
            text: text.to_string(),
            disabled,
            class_name: String::new(),
            x: 10.0,
            y: 20.0,
            width: 200.0,
            height: 30.0,
        }
    }

    #[tokio::test]
    async fn test_drag_with_empty_source_is_skipped() {
        let driver = ScriptedDriver::new();
        // Source resolves to nothing (driver default); target exists
        driver.respond("div.dst", snapshots(vec![snap("Drop column", false)]));

        let source = ElementQuery::new("div.src").with_text("Date");
        let target = ElementQuery::new("div.dst");
        let result = drag(&driver, &source, &target).await.unwrap();

        assert!(result.was_skipped());
        assert_eq!(result.skip_reason.as_deref(), Some("drag source not found"));
        // No drag script was dispatched
        assert_eq!(driver.evaluations_containing(&["DataTransfer"]), 0);
    }

    #[tokio::test]
    async fn test_drag_with_empty_target_is_skipped() {
        let driver = ScriptedDriver::new();
        driver.respond("div.src", snapshots(vec![snap("Date", false)]));

        let result = drag(
            &driver,
            &ElementQuery::new("div.src"),
            &ElementQuery::new("div.dst"),
        )
        .await
        .unwrap();
        assert!(result.was_skipped());
        assert_eq!(result.skip_reason.as_deref(), Some("drag target not found"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drag_dispatches_event_sequence() {
        let driver = ScriptedDriver::new();
        // Registered first: the drag script embeds both pick expressions, so
        // it must match before the per-query snapshot responders.
        driver.respond("DataTransfer", json!(true));
        driver.respond("div.src", snapshots(vec![snap("Date", false)]));
        driver.respond("div.dst", snapshots(vec![snap("Drop column", false)]));

        let source = ElementQuery::new("div.src").with_text("Date").first();
        let target = ElementQuery::scoped(Scope::Css("div.dst".to_string()), "div").last();
        let result = drag(&driver, &source, &target).await.unwrap();

        assert!(result.succeeded);
        assert_eq!(
            driver.evaluations_containing(&["dragstart", "dragover", "drop", "dragend"]),
            1
        );
    }

    #[tokio::test]
    async fn test_click_refuses_disabled() {
        let driver = ScriptedDriver::new();
        driver.respond(
            "el.click()",
            json!({ "clicked": false, "reason": "disabled" }),
        );
        let result = click(&driver, &ElementQuery::new("button")).await.unwrap();
        assert!(result.was_skipped());
        assert_eq!(result.skip_reason.as_deref(), Some("disabled"));
    }

    #[tokio::test]
    async fn test_forced_click_has_no_disabled_guard() {
        let q = ElementQuery::new("button").with_text("Next Step");
        assert!(click_js(&q, false).contains("el.disabled"));
        assert!(!click_js(&q, true).contains("el.disabled"));
    }

    #[tokio::test]
    async fn test_is_enabled_none_when_absent() {
        let driver = ScriptedDriver::new();
        let state = is_enabled(&driver, &ElementQuery::new("button"))
            .await
            .unwrap();
        assert_eq!(state, None);
    }

    #[tokio::test]
    async fn test_is_enabled_reads_disabled_property() {
        let driver = ScriptedDriver::new();
        driver.respond("button", snapshots(vec![snap("Next Step", true)]));
        let state = is_enabled(&driver, &ElementQuery::new("button"))
            .await
            .unwrap();
        assert_eq!(state, Some(false));
    }

    #[tokio::test]
    async fn test_select_disabled_is_expected_skip() {
        let driver = ScriptedDriver::new();
        driver.respond(
            "selectedIndex",
            json!({ "applied": false, "reason": "disabled" }),
        );
        let result = select_option_by_index(&driver, &ElementQuery::new("select"), 1)
            .await
            .unwrap();
        assert!(result.was_skipped());
        assert_eq!(result.skip_reason.as_deref(), Some("disabled"));
    }

    #[tokio::test]
    async fn test_text_range_selection_geometry() {
        let driver = ScriptedDriver::new();
        driver.respond("div.card", snapshots(vec![snap("STARBUCKS COFFEE", false)]));

        let q = ElementQuery::new("div.card");
        let result = select_text_range(&driver, &q, TEXT_SELECT_DRAG_PX)
            .await
            .unwrap();
        assert!(result.succeeded);

        let events = driver.mouse_events();
        assert_eq!(events.len(), 3);
        // Press at left edge mid-height, move right, release at the same point
        assert_eq!(events[0], (MouseAction::Press, 10.0, 35.0));
        assert_eq!(events[1], (MouseAction::Move, 110.0, 35.0));
        assert_eq!(events[2], (MouseAction::Release, 110.0, 35.0));
    }

    #[tokio::test]
    async fn test_text_range_selection_skips_when_absent() {
        let driver = ScriptedDriver::new();
        let result = select_text_range(&driver, &ElementQuery::new("div.card"), 100.0)
            .await
            .unwrap();
        assert!(result.was_skipped());
        assert!(driver.mouse_events().is_empty());
    }
}
