use std::cmp::Ordering;

use crate::models::Account;
use crate::pipeline::{SortDirection, SortField};

/// Stable sort; equal keys keep their incoming relative order in both directions.
pub fn sort<'a>(mut accounts: Vec<&'a Account>, field: SortField, direction: SortDirection) -> Vec<&'a Account> {
    accounts.sort_by(|left, right| {
        let ordering = compare(left, right, field);

        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse()
        }
    });

    accounts
}

fn compare(left: &Account, right: &Account, field: SortField) -> Ordering {
    match field {
        SortField::Name => left.name.to_lowercase().cmp(&right.name.to_lowercase()),
        SortField::Balance => left.balance.cmp(&right.balance),
        SortField::Change => left.change.cmp(&right.change)
    }
}
