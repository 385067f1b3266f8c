use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::{error, info, warn};

use crate::models::errors::SnapshotError;
use crate::models::Account;

/// Reads an account snapshot from a CSV file.
///
/// Malformed rows and repeated account ids are logged and skipped; only a
/// missing file or an unreadable header fails the whole snapshot.
pub fn load_accounts(path: impl AsRef<Path>) -> Result<Vec<Account>, SnapshotError> {
    let path = path.as_ref();
    let path_label = path.display().to_string();

    let file = File::open(path).map_err(|source| SnapshotError::Open { path: path_label.clone(), source })?;

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(BufReader::new(file));

    reader.headers().map_err(|source| SnapshotError::Header { path: path_label.clone(), source })?;

    let mut accounts = Vec::new();
    let mut seen = HashSet::new();

    for result in reader.deserialize::<Account>() {
        match result {
            Ok(account) if !seen.insert(account.account_id) => {
                warn!("Skipping duplicate account [{}] in [{path_label}]", account.account_id);
            }
            Ok(account) => accounts.push(account),
            Err(error) => {
                error!("Account snapshot deserialization error: {error}");
            }
        }
    }

    info!("Loaded [{}] accounts from [{path_label}]", accounts.len());

    Ok(accounts)
}
