mod flatten;

use std::fmt::{self, Display, Formatter};

use crate::models::Account;
use crate::types::{AccountId, CacheKey};

pub use flatten::flatten;

/// Stable identity of a row across regenerations of the row list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    Group(String),
    Account(AccountId),
    Detail(AccountId)
}

impl Display for RowKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Group(key) => write!(formatter, "group:{key}"),
            RowKey::Account(account_id) => write!(formatter, "account:{account_id}"),
            RowKey::Detail(account_id) => write!(formatter, "detail:{account_id}")
        }
    }
}

/// One entry of the flattened render list.
#[derive(Debug, Clone, PartialEq)]
pub enum VirtualRow<'a> {
    Group {
        label: String,
        count: usize,
        collapsed: bool
    },
    Account {
        account: &'a Account,
        ignored: bool,
        cache_key: CacheKey
    },
    Detail {
        account: &'a Account,
        cache_key: CacheKey
    }
}

impl VirtualRow<'_> {
    pub fn key(&self) -> RowKey {
        match self {
            VirtualRow::Group { label, .. } => RowKey::Group(label.clone()),
            VirtualRow::Account { account, .. } => RowKey::Account(account.account_id),
            VirtualRow::Detail { account, .. } => RowKey::Detail(account.account_id)
        }
    }

    pub fn kind(&self) -> RowKind {
        match self {
            VirtualRow::Group { .. } => RowKind::Group,
            VirtualRow::Account { .. } => RowKind::Account,
            VirtualRow::Detail { .. } => RowKind::Detail
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Group,
    Account,
    Detail
}
