use std::collections::{BTreeSet, HashSet};

use crate::models::Account;
use crate::pipeline::{filter, group, sort, FilterOptions, GroupBy, SortDirection, SortField};
use crate::rows::{flatten, VirtualRow};
use crate::types::AccountId;

/// State transitions driven by user gestures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerAction {
    Sort(SortField),
    GroupBy(GroupBy),
    HideZeroBalance(bool),
    ToggleTypeFilter(String),
    ClearTypeFilters,
    ToggleExpanded(AccountId),
    ToggleGroup(String),
    ToggleIgnored(AccountId)
}

/// Everything the ledger view derives its rows from, apart from the accounts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerState {
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub group_by: GroupBy,
    pub filters: FilterOptions,
    /// At most one account is expanded at a time.
    pub expanded: Option<AccountId>,
    pub ignored: HashSet<AccountId>,
    pub collapsed: BTreeSet<String>
}

impl LedgerState {
    pub fn reduce(mut self, action: LedgerAction) -> Self {
        match action {
            LedgerAction::Sort(field) => self.toggle_sort(field),
            LedgerAction::GroupBy(group_by) => Self { group_by, ..self },
            LedgerAction::HideZeroBalance(hide_zero_balance) => {
                self.filters.hide_zero_balance = hide_zero_balance;
                self
            }
            LedgerAction::ToggleTypeFilter(account_type) => self.toggle_type_filter(account_type),
            LedgerAction::ClearTypeFilters => {
                self.filters.type_filters.clear();
                self
            }
            LedgerAction::ToggleExpanded(account_id) => self.toggle_expanded(account_id),
            LedgerAction::ToggleGroup(key) => self.toggle_group(key),
            LedgerAction::ToggleIgnored(account_id) => self.toggle_ignored(account_id)
        }
    }

    /// Same field flips direction; a new field always starts ascending.
    pub fn toggle_sort(mut self, field: SortField) -> Self {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Asc;
        }

        self
    }

    pub fn toggle_expanded(mut self, account_id: AccountId) -> Self {
        self.expanded = match self.expanded {
            Some(current) if current == account_id => None,
            _ => Some(account_id)
        };

        self
    }

    pub fn toggle_group(mut self, key: String) -> Self {
        if !self.collapsed.remove(&key) {
            self.collapsed.insert(key);
        }

        self
    }

    pub fn toggle_ignored(mut self, account_id: AccountId) -> Self {
        if !self.ignored.remove(&account_id) {
            self.ignored.insert(account_id);
        }

        self
    }

    fn toggle_type_filter(mut self, account_type: String) -> Self {
        if !self.filters.type_filters.remove(&account_type) {
            self.filters.type_filters.insert(account_type);
        }

        self
    }

    /// Drops per-account state for ids missing from a new snapshot.
    ///
    /// Collapsed groups are keyed by label and are kept as they are.
    pub fn retain_accounts(mut self, accounts: &[Account]) -> Self {
        let present: HashSet<AccountId> = accounts.iter().map(|account| account.account_id).collect();

        self.expanded = self.expanded.filter(|account_id| present.contains(account_id));
        self.ignored.retain(|account_id| present.contains(account_id));

        self
    }

    /// Runs filter, sort, group and flatten over `accounts`.
    pub fn rows<'a>(&self, accounts: &'a [Account]) -> Vec<VirtualRow<'a>> {
        let filtered = filter(accounts, &self.filters);
        let sorted = sort(filtered, self.sort_field, self.sort_direction);
        let groups = group(sorted, self.group_by);

        flatten(&groups, &self.collapsed, self.expanded, &self.ignored)
    }
}
