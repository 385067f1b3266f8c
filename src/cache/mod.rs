mod csv_source;
mod detail_cache;

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::models::{FetchError, Transaction};

pub use csv_source::CsvTransactionSource;
pub use detail_cache::TransactionCache;

/// External provider of an account's recent transactions.
pub trait TransactionSource: Send + Sync + 'static {
    fn fetch(&self, key: &str, limit: usize) -> impl Future<Output = Result<Vec<Transaction>, FetchError>> + Send;
}

/// Result of asking the cache to make sure a key is loaded.
#[derive(Debug)]
pub enum LoadOutcome {
    Hit,
    InFlight,
    /// A fetch was started. Dropping the handle does not cancel it.
    Started(JoinHandle<()>),
    /// No tokio runtime was reachable, so no fetch was started.
    Unavailable
}

/// What a detail row can show for a key.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    NotRequested,
    Loading,
    Loaded(Arc<[Transaction]>),
    /// The last fetch failed. Nothing is cached, so the next expand retries.
    Failed(String)
}
