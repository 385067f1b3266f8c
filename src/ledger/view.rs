use std::collections::HashSet;
use std::mem::take;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{DetailState, LoadOutcome, TransactionCache, TransactionSource};
use crate::config::LedgerConfig;
use crate::ledger::{AccountLinking, LedgerAction, LedgerState};
use crate::models::Account;
use crate::rows::VirtualRow;
use crate::types::AccountId;
use crate::viewport::{ColumnLayout, LedgerColumn, RenderWindow, Viewport};

/// Row-level and toolbar gestures surfaced to the page shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    Action(LedgerAction),
    SortColumn(LedgerColumn),
    Reconnect(AccountId),
    Disconnect(AccountId),
    Link(String),
    /// Drops cached transaction detail; the open account, if any, reloads.
    SyncNow,
    Scroll(i64)
}

impl From<LedgerAction> for LedgerEvent {
    fn from(action: LedgerAction) -> Self {
        LedgerEvent::Action(action)
    }
}

/// The account ledger: snapshot, interaction state, detail cache and viewport.
pub struct LedgerView<S: TransactionSource, L: AccountLinking> {
    accounts: Vec<Account>,
    state: LedgerState,
    cache: Arc<TransactionCache<S>>,
    linking: L,
    viewport: Viewport,
    columns: ColumnLayout
}

impl<S: TransactionSource, L: AccountLinking> LedgerView<S, L> {
    pub fn new(accounts: Vec<Account>, cache: Arc<TransactionCache<S>>, linking: L, config: &LedgerConfig) -> Self {
        let mut view = Self {
            accounts: unique_accounts(accounts),
            state: LedgerState::default(),
            cache,
            linking,
            viewport: Viewport::new(config.metrics, config.overscan),
            columns: config.columns.clone()
        };

        view.refresh();
        view
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn cache(&self) -> &Arc<TransactionCache<S>> {
        &self.cache
    }

    pub fn linking(&self) -> &L {
        &self.linking
    }

    pub fn columns(&self) -> &ColumnLayout {
        &self.columns
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn rows(&self) -> Vec<VirtualRow<'_>> {
        self.state.rows(&self.accounts)
    }

    pub fn window(&self) -> RenderWindow {
        self.viewport.window()
    }

    pub fn account(&self, account_id: AccountId) -> Option<&Account> {
        self.accounts.iter().find(|account| account.account_id == account_id)
    }

    pub fn detail_state(&self, account: &Account) -> DetailState {
        self.cache.detail_state(&account.cache_key())
    }

    /// Applies one gesture. Returns the cache outcome when the gesture opened
    /// an account's detail.
    pub fn dispatch(&mut self, event: LedgerEvent) -> Option<LoadOutcome> {
        match event {
            LedgerEvent::Action(action) => self.apply(action),
            LedgerEvent::SortColumn(column) => {
                let field = column.sort_field()?;
                self.apply(LedgerAction::Sort(field))
            }
            LedgerEvent::Reconnect(account_id) => {
                match self.account(account_id) {
                    Some(account) if account.needs_reconnect() => self.linking.reconnect(account),
                    Some(_) => debug!("Ignoring reconnect for account [{account_id}]: connection does not need an update"),
                    None => debug!("Ignoring reconnect for unknown account [{account_id}]")
                }
                None
            }
            LedgerEvent::Disconnect(account_id) => {
                if let Some(account) = self.account(account_id) {
                    self.linking.disconnect(account);
                }
                None
            }
            LedgerEvent::Link(institution) => {
                self.linking.link(&institution);
                None
            }
            LedgerEvent::SyncNow => {
                self.cache.clear();
                self.load_expanded()
            }
            LedgerEvent::Scroll(delta) => {
                self.viewport.scroll_by(delta);
                None
            }
        }
    }

    /// Replaces the account collection wholesale, keeping per-account state
    /// only for accounts that still exist.
    pub fn replace_snapshot(&mut self, accounts: Vec<Account>) {
        info!("Replacing account snapshot: [{}] -> [{}] accounts", self.accounts.len(), accounts.len());

        self.accounts = unique_accounts(accounts);
        self.state = take(&mut self.state).retain_accounts(&self.accounts);
        self.refresh();
    }

    fn apply(&mut self, action: LedgerAction) -> Option<LoadOutcome> {
        let previously_expanded = self.state.expanded;

        self.state = take(&mut self.state).reduce(action);
        self.refresh();

        if self.state.expanded != previously_expanded {
            return self.load_expanded();
        }

        None
    }

    fn load_expanded(&self) -> Option<LoadOutcome> {
        let account = self.account(self.state.expanded?)?;

        Some(self.cache.ensure_loaded(&account.cache_key()))
    }

    fn refresh(&mut self) {
        let rows = self.state.rows(&self.accounts);
        self.viewport.update(&rows);
    }
}

/// Keeps the first account for each id; row keys and expansion rely on ids
/// being unique.
fn unique_accounts(mut accounts: Vec<Account>) -> Vec<Account> {
    let mut seen = HashSet::new();

    accounts.retain(|account| {
        let first = seen.insert(account.account_id);

        if !first {
            warn!("Dropping duplicate account [{}] from snapshot", account.account_id);
        }

        first
    });

    accounts
}
