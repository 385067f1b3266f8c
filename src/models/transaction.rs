use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::{CacheKey, TransactionId};

/// A single dated movement belonging to an account.
///
/// Transactions are produced by the fetch collaborator and never mutated
/// afterwards. The `account` column only exists in the CSV-backed provider
/// and holds the owning account's cache key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transaction {
    #[serde(rename = "id")]
    pub transaction_id: TransactionId,
    #[serde(default)]
    pub account: CacheKey,
    /// ISO-8601 date, so lexical order is chronological order.
    pub date: String,
    pub merchant: String,
    pub amount: Decimal,
    pub category: String,
    #[serde(default)]
    pub icon: String
}
