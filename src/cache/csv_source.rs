use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use csv::{ReaderBuilder, Trim};
use tokio::task::spawn_blocking;
use tokio::time::sleep;
use tracing::error;

use crate::cache::TransactionSource;
use crate::models::{FetchError, Transaction};

/// Mock provider backed by a CSV file of transactions for every account.
pub struct CsvTransactionSource {
    path: PathBuf,
    latency: Duration
}

impl CsvTransactionSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            latency: Duration::ZERO
        }
    }

    /// Simulated provider round-trip applied before each read.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl TransactionSource for CsvTransactionSource {
    async fn fetch(&self, key: &str, limit: usize) -> Result<Vec<Transaction>, FetchError> {
        if !self.latency.is_zero() {
            sleep(self.latency).await;
        }

        let path = self.path.clone();
        let account = key.to_string();

        spawn_blocking(move || read_recent(&path, &account, limit))
            .await
            .map_err(|error| FetchError::transport(key, error.to_string()))?
    }
}

fn read_recent(path: &Path, key: &str, limit: usize) -> Result<Vec<Transaction>, FetchError> {
    let file = File::open(path).map_err(|error| {
        FetchError::transport(key, format!("unable to open [{}]: {error}", path.display()))
    })?;

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut transactions = Vec::new();

    for result in reader.deserialize::<Transaction>() {
        match result {
            Ok(transaction) if transaction.account == key => transactions.push(transaction),
            Ok(_) => {}
            Err(error) => {
                error!("Transaction CSV deserialization error: {error}");
            }
        }
    }

    // Most recent first; same-day rows keep file order.
    transactions.sort_by(|left, right| right.date.cmp(&left.date));
    transactions.truncate(limit);

    Ok(transactions)
}
