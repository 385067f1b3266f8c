mod account;
mod errors;
mod snapshot;
mod transaction;

use std::fmt::{self, Display, Formatter};

use serde::Deserialize;

pub use account::Account;
pub use errors::{FetchError, SnapshotError};
pub use snapshot::load_accounts;
pub use transaction::Transaction;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Active,
    NeedsUpdate,
    Disconnected
}

impl Display for ConnectionStatus {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Active => write!(formatter, "active"),
            ConnectionStatus::NeedsUpdate => write!(formatter, "needs_update"),
            ConnectionStatus::Disconnected => write!(formatter, "disconnected")
        }
    }
}
