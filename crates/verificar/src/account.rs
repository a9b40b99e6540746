//! Account selection strategy.
//!
//! The mapper view exposes the account in one of three shapes depending on
//! how the column mapping landed: a native `<select>` (enabled when the
//! account still needs choosing, disabled when the mapping already assigned
//! it), a custom dropdown opened by a trigger button, or nothing at all.
//! Detection happens once per attempt and the chosen strategy is applied in
//! full; a missing option in the custom dropdown is a degraded-but-viable
//! outcome, logged and tolerated.

use crate::config::VerifyConfig;
use crate::driver::UiDriver;
use crate::interact::{click, select_option_by_index};
use crate::query::{ElementQuery, Scope};
use crate::result::VerifyResult;

/// Which account-selection mechanism the current view exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountSelection {
    /// A native `<select>` in the drop-target panel
    Native {
        /// Whether the control accepts input
        enabled: bool,
    },
    /// A custom dropdown opened by a trigger button
    CustomDropdown,
    /// No account selector present; the application default stands
    Unavailable,
}

fn native_select_query() -> ElementQuery {
    ElementQuery::scoped(Scope::RightPanel, "select")
}

fn trigger_query(trigger: &str) -> ElementQuery {
    ElementQuery::new("button").with_text(trigger)
}

/// Detect which selection mechanism is present. Checks the native select
/// first; a trigger button is only consulted when no select exists.
pub async fn detect<D: UiDriver + ?Sized>(
    driver: &D,
    trigger: &str,
) -> VerifyResult<AccountSelection> {
    let query = native_select_query();
    let selects = crate::query::resolve(driver, &query).await?;
    if let Some(select) = query.select(&selects) {
        return Ok(AccountSelection::Native {
            enabled: !select.disabled,
        });
    }

    let triggers = crate::query::resolve(driver, &trigger_query(trigger)).await?;
    if triggers.is_empty() {
        Ok(AccountSelection::Unavailable)
    } else {
        Ok(AccountSelection::CustomDropdown)
    }
}

/// Detect and apply the account selection. Returns the detected mechanism
/// so the caller can log the path taken.
///
/// # Errors
///
/// Propagates driver errors only; every expected degradation (disabled
/// select, missing dropdown option) is absorbed here.
pub async fn resolve_account<D: UiDriver + ?Sized>(
    driver: &D,
    cfg: &VerifyConfig,
) -> VerifyResult<AccountSelection> {
    let selection = detect(driver, &cfg.dropdown_trigger).await?;

    match selection {
        AccountSelection::Native { enabled: true } => {
            // Index 0 is the placeholder entry
            let result = select_option_by_index(driver, &native_select_query(), 1).await?;
            if result.was_skipped() {
                tracing::warn!(
                    reason = result.skip_reason.as_deref(),
                    "native account select could not be applied"
                );
            } else {
                tracing::info!("account chosen via native select");
            }
        }
        AccountSelection::Native { enabled: false } => {
            tracing::info!("account select disabled; mapping already assigned the account");
        }
        AccountSelection::CustomDropdown => {
            let opened = click(driver, &trigger_query(&cfg.dropdown_trigger)).await?;
            if opened.was_skipped() {
                tracing::warn!("could not open the custom account dropdown, continuing");
                return Ok(selection);
            }
            // The deepest matching node comes last in document order
            let option = ElementQuery::new("*").with_text(&cfg.fallback_account).last();
            let picked = click(driver, &option).await?;
            if picked.was_skipped() {
                tracing::warn!(
                    account = %cfg.fallback_account,
                    "could not select the custom account option, continuing"
                );
            } else {
                tracing::info!(account = %cfg.fallback_account, "account chosen via custom dropdown");
            }
        }
        AccountSelection::Unavailable => {
            tracing::info!("no account selector present; leaving the application default");
        }
    }

    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ElementSnapshot;
    use crate::scripted::ScriptedDriver;
    use serde_json::json;

    fn snapshots(snaps: Vec<ElementSnapshot>) -> serde_json::Value {
        serde_json::to_value(snaps).unwrap()
    }

    fn snap(tag: &str, text: &str, disabled: bool) -> ElementSnapshot {
        ElementSnapshot {
            index: 0,
            tag: tag.to_string(),
            text: text.to_string(),
            disabled,
            class_name: String::new(),
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 20.0,
        }
    }

    #[tokio::test]
    async fn test_detect_prefers_native_select() {
        let driver = ScriptedDriver::new();
        driver.respond("/3 select", snapshots(vec![snap("select", "", false)]));
        let selection = detect(&driver, "Select account").await.unwrap();
        assert_eq!(selection, AccountSelection::Native { enabled: true });
    }

    #[tokio::test]
    async fn test_detect_disabled_native_select() {
        let driver = ScriptedDriver::new();
        driver.respond("/3 select", snapshots(vec![snap("select", "", true)]));
        let selection = detect(&driver, "Select account").await.unwrap();
        assert_eq!(selection, AccountSelection::Native { enabled: false });
    }

    #[tokio::test]
    async fn test_detect_falls_back_to_custom_dropdown() {
        let driver = ScriptedDriver::new();
        driver.respond(
            "Select account",
            snapshots(vec![snap("button", "Select account", false)]),
        );
        let selection = detect(&driver, "Select account").await.unwrap();
        assert_eq!(selection, AccountSelection::CustomDropdown);
    }

    #[tokio::test]
    async fn test_detect_unavailable_when_nothing_matches() {
        let driver = ScriptedDriver::new();
        let selection = detect(&driver, "Select account").await.unwrap();
        assert_eq!(selection, AccountSelection::Unavailable);
    }

    #[tokio::test]
    async fn test_enabled_native_select_applies_index_one() {
        let cfg = VerifyConfig::default();
        let driver = ScriptedDriver::new();
        // Registered first: the option script embeds the select query, so it
        // must match before the snapshot responder.
        driver.respond("selectedIndex", json!({ "applied": true, "reason": null }));
        driver.respond("/3 select", snapshots(vec![snap("select", "", false)]));

        let selection = resolve_account(&driver, &cfg).await.unwrap();
        assert_eq!(selection, AccountSelection::Native { enabled: true });
        assert_eq!(driver.evaluations_containing(&["selectedIndex = 1"]), 1);
    }

    #[tokio::test]
    async fn test_disabled_native_select_is_left_alone() {
        let cfg = VerifyConfig::default();
        let driver = ScriptedDriver::new();
        driver.respond("/3 select", snapshots(vec![snap("select", "", true)]));

        let selection = resolve_account(&driver, &cfg).await.unwrap();
        assert_eq!(selection, AccountSelection::Native { enabled: false });
        assert_eq!(driver.evaluations_containing(&["selectedIndex"]), 0);
    }

    #[tokio::test]
    async fn test_missing_dropdown_option_is_tolerated() {
        let cfg = VerifyConfig::default();
        let driver = ScriptedDriver::new();
        // Trigger click lands, option click misses
        driver.respond_seq(
            "el.click()",
            vec![
                json!({ "clicked": true, "reason": null }),
                json!({ "clicked": false, "reason": "not-found" }),
            ],
        );
        driver.respond(
            "Select account",
            snapshots(vec![snap("button", "Select account", false)]),
        );

        let selection = resolve_account(&driver, &cfg).await.unwrap();
        assert_eq!(selection, AccountSelection::CustomDropdown);
        // Both clicks were issued despite the miss
        assert_eq!(driver.evaluations_containing(&["el.click()"]), 2);
    }
}
