use std::io;

use thiserror::Error;

use crate::types::CacheKey;

/// Failures raised by a transaction fetch collaborator.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Transport failure while fetching transactions for account [{key}]: {message}")]
    Transport {
        key: CacheKey,
        message: String
    },
    #[error("Provider rejected transaction request for account [{key}]: {message}")]
    Provider {
        key: CacheKey,
        message: String
    }
}

impl FetchError {
    pub fn transport(key: &str, message: impl Into<String>) -> Self {
        Self::Transport { key: key.to_string(), message: message.into() }
    }

    pub fn provider(key: &str, message: impl Into<String>) -> Self {
        Self::Provider { key: key.to_string(), message: message.into() }
    }
}

/// Failures while reading an account snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Unable to open account snapshot at [{path}]: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error
    },
    #[error("Account snapshot at [{path}] has an unreadable header: {source}")]
    Header {
        path: String,
        #[source]
        source: csv::Error
    }
}
