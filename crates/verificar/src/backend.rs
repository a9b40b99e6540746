//! Injected backend stub.
//!
//! The layout and rule-card scenarios run the frontend without its real
//! backend by installing a `window.go.main.App` object before any page
//! script executes. The stub controls return values only; it performs no
//! call recording and no validation, so the frontend behaves exactly as it
//! would against a quiet backend.

use serde::{Deserialize, Serialize};

use crate::result::VerifyResult;

/// One uncategorized transaction served by the stub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StubTransaction {
    /// Transaction id
    pub id: i64,
    /// ISO date string
    pub date: String,
    /// Statement description (the text-selection target)
    pub description: String,
    /// Signed amount
    pub amount: f64,
    /// Assigned category id, if any
    pub category_id: Option<i64>,
    /// Assigned category name
    pub category_name: String,
    /// Owning account id
    pub account_id: i64,
    /// Owner id, if any
    pub owner_id: Option<i64>,
}

impl StubTransaction {
    /// The seeded transaction the scenarios key their waits on.
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            id: 1,
            date: String::from("2024-01-15"),
            description: String::from("STARBUCKS COFFEE #123 TORONTO"),
            amount: -5.75,
            category_id: None,
            category_name: String::new(),
            account_id: 1,
            owner_id: None,
        }
    }
}

/// Backend stub definition.
#[derive(Debug, Clone, Default)]
pub struct BackendStub {
    /// Transactions returned by `GetUncategorizedTransactions`
    pub transactions: Vec<StubTransaction>,
}

impl BackendStub {
    /// Stub serving the seeded transaction
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            transactions: vec![StubTransaction::seeded()],
        }
    }

    /// Render the init script installing `window.go.main.App`.
    ///
    /// # Errors
    ///
    /// Returns a JSON error if the transaction list fails to serialize.
    pub fn init_script(&self) -> VerifyResult<String> {
        let transactions = serde_json::to_string(&self.transactions)?;
        Ok(format!(
            "window.go = {{ main: {{ App: {{ \
             GetUncategorizedTransactions: async () => ({transactions}), \
             SearchCategories: async () => ([]), \
             SaveCategorizationRule: async () => ({{}}), \
             CategorizeTransaction: async () => ({{}}) \
             }} }} }};"
        ))
    }
}
