//! Pure account pipeline stages: filter, then sort, then group.
//!
//! Every stage borrows from the snapshot and returns references, so the
//! pipeline never clones an account.

mod filter;
mod group;
mod sort;

use std::collections::BTreeSet;

pub use filter::filter;
pub use group::{group, AccountGroup, AccountGroups};
pub use sort::sort;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub hide_zero_balance: bool,
    /// Empty means every type is kept.
    pub type_filters: BTreeSet<String>
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortField {
    #[default]
    Name,
    Balance,
    Change
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum GroupBy {
    #[default]
    None,
    Institution,
    Type
}
