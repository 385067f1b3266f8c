use super::{AccountLinking, LedgerAction, LedgerEvent, LedgerState, LedgerView};

use std::cell::RefCell;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use rust_decimal::Decimal;

use crate::cache::{DetailState, LoadOutcome, TransactionCache, TransactionSource};
use crate::config::LedgerConfig;
use crate::models::{Account, ConnectionStatus, FetchError, Transaction};
use crate::pipeline::{GroupBy, SortDirection, SortField};
use crate::rows::{RowKey, RowKind, VirtualRow};
use crate::types::AccountId;
use crate::viewport::LedgerColumn;

struct StaticSource {
    calls: AtomicUsize,
    transactions: HashMap<String, Vec<Transaction>>
}

impl StaticSource {
    fn new(transactions: HashMap<String, Vec<Transaction>>) -> Self {
        Self { calls: AtomicUsize::new(0), transactions }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TransactionSource for StaticSource {
    async fn fetch(&self, key: &str, limit: usize) -> Result<Vec<Transaction>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        Ok(self.transactions.get(key).map(|transactions| transactions.iter().take(limit).cloned().collect()).unwrap_or_default())
    }
}

#[derive(Default)]
struct RecordingLinking {
    requests: RefCell<Vec<String>>
}

impl AccountLinking for RecordingLinking {
    fn link(&self, institution: &str) {
        self.requests.borrow_mut().push(format!("link:{institution}"));
    }

    fn reconnect(&self, account: &Account) {
        self.requests.borrow_mut().push(format!("reconnect:{}", account.account_id));
    }

    fn disconnect(&self, account: &Account) {
        self.requests.borrow_mut().push(format!("disconnect:{}", account.account_id));
    }
}

fn create_account(account_id: AccountId, name: &str, institution: &str, balance: &str) -> Result<Account> {
    Ok(Account::new(account_id, name, institution, "Checking", Decimal::from_str(balance)?))
}

fn create_transaction(transaction_id: &str) -> Result<Transaction> {
    Ok(Transaction {
        transaction_id: transaction_id.to_string(),
        account: "plaid-acc-7".to_string(),
        date: "2026-10-01".to_string(),
        merchant: "Grocer".to_string(),
        amount: Decimal::from_str("-20.00")?,
        category: "Groceries".to_string(),
        icon: "cart".to_string()
    })
}

fn sample_accounts() -> Result<Vec<Account>> {
    Ok(vec![
        create_account(1, "Everyday Checking", "Chase", "500")?,
        create_account(2, "Sapphire", "Chase", "-200")?,
        create_account(3, "Brokerage", "Fidelity", "9000")?
            .with_external_id("plaid-acc-7")
            .with_status(ConnectionStatus::NeedsUpdate)
    ])
}

fn account_ids(rows: &[VirtualRow<'_>]) -> Vec<AccountId> {
    rows.iter().filter_map(|row| match row {
        VirtualRow::Account { account, .. } => Some(account.account_id),
        _ => None
    }).collect()
}

fn detail_keys(rows: &[VirtualRow<'_>]) -> Vec<RowKey> {
    rows.iter().filter(|row| row.kind() == RowKind::Detail).map(VirtualRow::key).collect()
}

fn create_view(accounts: Vec<Account>) -> Result<(LedgerView<StaticSource, RecordingLinking>, Arc<StaticSource>)> {
    let transactions = HashMap::from([
        ("plaid-acc-7".to_string(), vec![create_transaction("t1")?, create_transaction("t2")?])
    ]);
    let source = Arc::new(StaticSource::new(transactions));
    let config = LedgerConfig::default();
    let cache = Arc::new(TransactionCache::new(source.clone(), &config.cache));

    Ok((LedgerView::new(accounts, cache, RecordingLinking::default(), &config), source))
}

async fn finish(outcome: Option<LoadOutcome>) -> Result<()> {
    match outcome {
        Some(LoadOutcome::Started(handle)) => Ok(handle.await?),
        other => bail!("expected a fetch to start, got {other:?}")
    }
}

#[test]
fn test_repeated_sort_flips_direction() -> Result<()> {
    let accounts = vec![
        create_account(1, "A", "Chase", "500")?,
        create_account(2, "B", "Chase", "-200")?
    ];
    let state = LedgerState::default()
        .reduce(LedgerAction::Sort(SortField::Balance))
        .reduce(LedgerAction::Sort(SortField::Balance));

    assert_eq!(state.sort_direction, SortDirection::Desc);
    assert_eq!(account_ids(&state.rows(&accounts)), vec![1, 2]);

    let state = state.reduce(LedgerAction::Sort(SortField::Balance));

    assert_eq!(state.sort_direction, SortDirection::Asc);
    assert_eq!(account_ids(&state.rows(&accounts)), vec![2, 1]);

    Ok(())
}

#[test]
fn test_new_sort_field_starts_ascending() -> Result<()> {
    let accounts = sample_accounts()?;
    let state = LedgerState { sort_field: SortField::Balance, sort_direction: SortDirection::Desc, ..LedgerState::default() }
        .reduce(LedgerAction::Sort(SortField::Name));

    assert_eq!((state.sort_field, state.sort_direction), (SortField::Name, SortDirection::Asc));
    assert_eq!(account_ids(&state.rows(&accounts)), vec![3, 1, 2]);

    Ok(())
}

#[test]
fn test_group_by_institution_flattens_headers_and_members() -> Result<()> {
    let accounts = sample_accounts()?;
    let state = LedgerState::default()
        .reduce(LedgerAction::Sort(SortField::Balance))
        .reduce(LedgerAction::GroupBy(GroupBy::Institution));
    let rows = state.rows(&accounts);
    let kinds: Vec<_> = rows.iter().map(VirtualRow::kind).collect();

    assert_eq!(kinds, vec![RowKind::Group, RowKind::Account, RowKind::Account, RowKind::Group, RowKind::Account]);
    assert!(matches!(&rows[0], VirtualRow::Group { label, count: 2, .. } if label == "Chase"));
    assert!(matches!(&rows[3], VirtualRow::Group { label, count: 1, .. } if label == "Fidelity"));

    Ok(())
}

#[test]
fn test_expansion_is_exclusive() -> Result<()> {
    let accounts = sample_accounts()?;
    let state = LedgerState::default()
        .reduce(LedgerAction::ToggleExpanded(1))
        .reduce(LedgerAction::ToggleExpanded(2));

    assert_eq!(detail_keys(&state.rows(&accounts)), vec![RowKey::Detail(2)]);

    let state = state.reduce(LedgerAction::ToggleExpanded(2));

    assert_eq!(state.expanded, None);
    assert!(detail_keys(&state.rows(&accounts)).is_empty());

    Ok(())
}

#[test]
fn test_group_collapse_is_orthogonal_to_expansion() -> Result<()> {
    let accounts = sample_accounts()?;
    let state = LedgerState::default()
        .reduce(LedgerAction::GroupBy(GroupBy::Institution))
        .reduce(LedgerAction::ToggleExpanded(1))
        .reduce(LedgerAction::ToggleGroup("Chase".to_string()));
    let rows = state.rows(&accounts);

    assert_eq!(state.expanded, Some(1));
    assert_eq!(account_ids(&rows), vec![3]);
    assert!(detail_keys(&rows).is_empty());
    assert_eq!(rows.iter().filter(|row| row.kind() == RowKind::Group).count(), 2);

    let state = state.reduce(LedgerAction::ToggleGroup("Chase".to_string()));

    assert_eq!(detail_keys(&state.rows(&accounts)), vec![RowKey::Detail(1)]);

    Ok(())
}

#[test]
fn test_ignore_toggle_only_flags_rows() -> Result<()> {
    let accounts = sample_accounts()?;
    let before = LedgerState::default();
    let after = before.clone().reduce(LedgerAction::ToggleIgnored(2));
    let rows = after.rows(&accounts);

    assert_eq!(account_ids(&rows), account_ids(&before.rows(&accounts)));
    assert!(matches!(&rows[2], VirtualRow::Account { account, ignored: true, .. } if account.account_id == 2));

    let restored = after.reduce(LedgerAction::ToggleIgnored(2));

    assert!(restored.ignored.is_empty());

    Ok(())
}

#[test]
fn test_filters_apply_through_state() -> Result<()> {
    let mut accounts = sample_accounts()?;
    accounts.push(create_account(4, "Dormant", "Ally", "0")?);
    accounts[2].account_type = "Investment".to_string();

    let state = LedgerState::default().reduce(LedgerAction::HideZeroBalance(true));

    assert_eq!(account_ids(&state.rows(&accounts)), vec![3, 1, 2]);

    let state = state.reduce(LedgerAction::ToggleTypeFilter("Investment".to_string()));

    assert_eq!(account_ids(&state.rows(&accounts)), vec![3]);

    let state = state.reduce(LedgerAction::ClearTypeFilters).reduce(LedgerAction::HideZeroBalance(false));

    assert_eq!(account_ids(&state.rows(&accounts)).len(), 4);

    Ok(())
}

#[tokio::test]
async fn test_expanding_account_loads_detail_once() -> Result<()> {
    let (mut view, source) = create_view(sample_accounts()?)?;

    let outcome = view.dispatch(LedgerAction::ToggleExpanded(3).into());

    assert_eq!(view.cache().in_flight_keys(), vec!["plaid-acc-7".to_string()]);

    finish(outcome).await?;

    let Some(account) = view.account(3) else { bail!("account 3 missing") };

    assert!(matches!(view.detail_state(account), DetailState::Loaded(transactions) if transactions.len() == 2));
    assert!(view.cache().in_flight_keys().is_empty());

    assert!(view.dispatch(LedgerAction::ToggleExpanded(3).into()).is_none());
    assert!(matches!(view.dispatch(LedgerAction::ToggleExpanded(3).into()), Some(LoadOutcome::Hit)));
    assert_eq!(source.calls(), 1);
    assert_eq!(detail_keys(&view.rows()), vec![RowKey::Detail(3)]);

    Ok(())
}

#[tokio::test]
async fn test_manual_account_uses_internal_id_as_cache_key() -> Result<()> {
    let (mut view, source) = create_view(sample_accounts()?)?;

    finish(view.dispatch(LedgerAction::ToggleExpanded(1).into())).await?;

    assert!(view.cache().get("1").is_some());
    assert_eq!(source.calls(), 1);

    Ok(())
}

#[tokio::test]
async fn test_sync_now_reloads_open_account() -> Result<()> {
    let (mut view, source) = create_view(sample_accounts()?)?;

    finish(view.dispatch(LedgerAction::ToggleExpanded(3).into())).await?;
    finish(view.dispatch(LedgerEvent::SyncNow)).await?;

    assert_eq!(source.calls(), 2);

    view.dispatch(LedgerAction::ToggleExpanded(3).into());

    assert!(view.dispatch(LedgerEvent::SyncNow).is_none());
    assert!(view.cache().get("plaid-acc-7").is_none());

    Ok(())
}

#[test]
fn test_reconnect_only_forwarded_when_update_needed() -> Result<()> {
    let source = Arc::new(StaticSource::new(HashMap::new()));
    let config = LedgerConfig::default();
    let cache = Arc::new(TransactionCache::new(source, &config.cache));
    let linking = RecordingLinking::default();
    let mut view = LedgerView::new(sample_accounts()?, cache, linking, &config);

    view.dispatch(LedgerEvent::Reconnect(1));
    view.dispatch(LedgerEvent::Reconnect(3));
    view.dispatch(LedgerEvent::Reconnect(99));
    view.dispatch(LedgerEvent::Disconnect(2));
    view.dispatch(LedgerEvent::Link("Ally".to_string()));

    assert_eq!(view.linking().requests.borrow().as_slice(), ["reconnect:3", "disconnect:2", "link:Ally"]);

    Ok(())
}

#[test]
fn test_sort_column_click_maps_to_sort_field() -> Result<()> {
    let source = Arc::new(StaticSource::new(HashMap::new()));
    let config = LedgerConfig::default();
    let cache = Arc::new(TransactionCache::new(source, &config.cache));
    let mut view = LedgerView::new(sample_accounts()?, cache, RecordingLinking::default(), &config);

    view.dispatch(LedgerEvent::SortColumn(LedgerColumn::Status));

    assert_eq!(view.state().sort_field, SortField::Name);

    view.dispatch(LedgerEvent::SortColumn(LedgerColumn::Balance));
    view.dispatch(LedgerEvent::SortColumn(LedgerColumn::Balance));

    assert_eq!((view.state().sort_field, view.state().sort_direction), (SortField::Balance, SortDirection::Desc));
    assert_eq!(account_ids(&view.rows()), vec![3, 1, 2]);

    Ok(())
}

#[test]
fn test_replace_snapshot_matches_state_by_id() -> Result<()> {
    let source = Arc::new(StaticSource::new(HashMap::new()));
    let config = LedgerConfig::default();
    let cache = Arc::new(TransactionCache::new(source, &config.cache));
    let mut view = LedgerView::new(sample_accounts()?, cache, RecordingLinking::default(), &config);

    view.dispatch(LedgerAction::ToggleIgnored(1).into());
    view.dispatch(LedgerAction::ToggleIgnored(2).into());
    view.dispatch(LedgerAction::ToggleGroup("Chase".to_string()).into());

    view.replace_snapshot(vec![
        create_account(2, "Sapphire", "Chase", "-150")?,
        create_account(4, "Savings", "Ally", "75")?
    ]);

    assert!(view.state().ignored.contains(&2));
    assert!(!view.state().ignored.contains(&1));
    assert!(view.state().collapsed.contains("Chase"));
    assert_eq!(view.window().total_rows, 2);

    Ok(())
}

#[test]
fn test_expand_without_runtime_shows_failed_detail() -> Result<()> {
    let (mut view, source) = create_view(sample_accounts()?)?;

    let outcome = view.dispatch(LedgerAction::ToggleExpanded(3).into());

    assert!(matches!(outcome, Some(LoadOutcome::Unavailable)));
    assert_eq!(detail_keys(&view.rows()), vec![RowKey::Detail(3)]);

    let account = view.account(3).ok_or_else(|| anyhow!("account 3 missing"))?;

    assert!(matches!(view.detail_state(account), DetailState::Failed(_)));
    assert_eq!(source.calls(), 0);

    Ok(())
}

#[test]
fn test_duplicate_ids_yield_a_single_detail_row() -> Result<()> {
    let accounts = vec![
        create_account(1, "Joint Checking", "Chase", "500")?,
        create_account(1, "Joint Checking Copy", "Chase", "500")?
    ];
    let (mut view, _) = create_view(accounts)?;

    assert_eq!(view.accounts().len(), 1);

    view.dispatch(LedgerAction::ToggleExpanded(1).into());

    assert_eq!(detail_keys(&view.rows()), vec![RowKey::Detail(1)]);

    view.replace_snapshot(vec![
        create_account(2, "Savings", "Ally", "20")?,
        create_account(2, "Savings Copy", "Ally", "20")?
    ]);

    assert_eq!(account_ids(&view.rows()), vec![2]);

    Ok(())
}
