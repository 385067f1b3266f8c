use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::ConnectionStatus;
use crate::types::{cache_key_for, AccountId, CacheKey};

/// A linked financial account as supplied by the account snapshot.
///
/// Accounts are never patched in place; a new snapshot replaces the whole
/// collection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Account {
    /// Internal sequence id, stable within a session.
    #[serde(rename = "id")]
    pub account_id: AccountId,
    /// Provider account id, absent for manually entered accounts.
    #[serde(default)]
    pub external_id: Option<String>,
    pub name: String,
    pub institution: String,
    /// Open enumeration: Checking, Savings, Investment, Credit Card, ...
    #[serde(rename = "type")]
    pub account_type: String,
    pub balance: Decimal,
    /// Signed 30-day change in percent.
    #[serde(rename = "change_30d")]
    pub change: Decimal,
    #[serde(default)]
    pub last_sync: String,
    pub status: ConnectionStatus,
    #[serde(default)]
    pub next_bill_due: Option<String>,
    #[serde(default)]
    pub next_bill_amount: Option<Decimal>
}

impl Account {
    pub fn new(account_id: AccountId, name: &str, institution: &str, account_type: &str, balance: Decimal) -> Self {
        Self {
            account_id,
            external_id: None,
            name: name.to_string(),
            institution: institution.to_string(),
            account_type: account_type.to_string(),
            balance,
            change: Decimal::ZERO,
            last_sync: String::new(),
            status: ConnectionStatus::Active,
            next_bill_due: None,
            next_bill_amount: None
        }
    }

    pub fn with_external_id(mut self, external_id: &str) -> Self {
        self.external_id = Some(external_id.to_string());
        self
    }

    pub fn with_status(mut self, status: ConnectionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_change(mut self, change: Decimal) -> Self {
        self.change = change;
        self
    }

    /// The key this account's transactions are fetched and cached under.
    pub fn cache_key(&self) -> CacheKey {
        cache_key_for(self.account_id, self.external_id.as_deref())
    }

    /// Whether the reconnect affordance should be offered.
    pub fn needs_reconnect(&self) -> bool {
        self.status == ConnectionStatus::NeedsUpdate
    }
}
