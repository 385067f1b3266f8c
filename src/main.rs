use std::io::{stderr, stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

use ledger_view::cache::{CsvTransactionSource, DetailState, LoadOutcome, TransactionCache, TransactionSource};
use ledger_view::config::{LedgerConfig, DEFAULT_FETCH_LIMIT, DEFAULT_OVERSCAN};
use ledger_view::ledger::{AccountLinking, LedgerAction, LedgerEvent, LedgerView, NoopLinking};
use ledger_view::models::load_accounts;
use ledger_view::pipeline::{GroupBy, SortDirection, SortField};
use ledger_view::rows::VirtualRow;
use ledger_view::types::AccountId;
use ledger_view::viewport::RowMetrics;

/// Prints the visible window of an account ledger built from CSV snapshots.
#[derive(Debug, Parser)]
#[command(name = "ledger-view", version)]
struct Cli {
    /// Account snapshot CSV.
    accounts: PathBuf,
    /// Transactions CSV served as the detail provider.
    transactions: PathBuf,
    #[arg(long, value_enum, default_value_t = GroupBy::None)]
    group: GroupBy,
    #[arg(long, value_enum)]
    sort: Option<SortField>,
    /// Sort descending instead of ascending.
    #[arg(long, requires = "sort")]
    desc: bool,
    #[arg(long)]
    hide_zero: bool,
    /// Keep only accounts of this type; repeatable.
    #[arg(long = "type")]
    types: Vec<String>,
    /// Collapse a group by label; repeatable.
    #[arg(long)]
    collapse: Vec<String>,
    #[arg(long)]
    expand: Option<AccountId>,
    /// Mark an account as ignored; repeatable.
    #[arg(long)]
    ignore: Vec<AccountId>,
    /// Maximum container height in pixels.
    #[arg(long, default_value_t = RowMetrics::default().max_container_height)]
    viewport: u32,
    /// Pixels to scroll before printing.
    #[arg(long, default_value_t = 0)]
    scroll: i64,
    /// Container width used for column layout.
    #[arg(long, default_value_t = 1000)]
    width: u32,
    #[arg(long, default_value_t = DEFAULT_FETCH_LIMIT)]
    limit: usize,
    #[arg(long, default_value_t = DEFAULT_OVERSCAN)]
    overscan: usize,
    /// Simulated provider latency in milliseconds.
    #[arg(long, default_value_t = 0)]
    latency: u64,
    /// error, warn, info, debug or trace.
    #[arg(long, default_value = "error")]
    log_level: String
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(parse_log_level(&cli.log_level));

    let config = LedgerConfig::default()
        .with_fetch_limit(cli.limit)
        .with_overscan(cli.overscan)
        .with_metrics(RowMetrics { max_container_height: cli.viewport, ..RowMetrics::default() });

    let accounts = load_accounts(&cli.accounts)?;
    let source = CsvTransactionSource::new(&cli.transactions).with_latency(Duration::from_millis(cli.latency));
    let cache = Arc::new(TransactionCache::new(Arc::new(source), &config.cache));
    let mut view = LedgerView::new(accounts, cache, NoopLinking, &config);

    let timer = Instant::now();
    let pending = apply_cli(&mut view, &cli);

    if let Some(LoadOutcome::Started(handle)) = pending {
        if let Err(error) = handle.await {
            error!("Transaction fetch task failed: {error}");
        }
    }

    info!("Built ledger view in: {:?}", timer.elapsed());

    write_ledger_to_stdout(&view, cli.width)?;

    Ok(())
}

fn apply_cli<S: TransactionSource, L: AccountLinking>(view: &mut LedgerView<S, L>, cli: &Cli) -> Option<LoadOutcome> {
    view.dispatch(LedgerAction::GroupBy(cli.group).into());

    if let Some(field) = cli.sort {
        let direction = if cli.desc { SortDirection::Desc } else { SortDirection::Asc };

        //NOTE: sorting toggles, so click until the header shows the requested order
        view.dispatch(LedgerAction::Sort(field).into());

        if view.state().sort_direction != direction {
            view.dispatch(LedgerAction::Sort(field).into());
        }
    }

    if cli.hide_zero {
        view.dispatch(LedgerAction::HideZeroBalance(true).into());
    }

    for account_type in &cli.types {
        view.dispatch(LedgerAction::ToggleTypeFilter(account_type.clone()).into());
    }

    for key in &cli.collapse {
        view.dispatch(LedgerAction::ToggleGroup(key.clone()).into());
    }

    for account_id in &cli.ignore {
        view.dispatch(LedgerAction::ToggleIgnored(*account_id).into());
    }

    let pending = cli.expand.and_then(|account_id| view.dispatch(LedgerAction::ToggleExpanded(account_id).into()));

    view.dispatch(LedgerEvent::Scroll(cli.scroll));

    pending
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "info" => LevelFilter::INFO,
        "warn" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to 'error'", level);
            LevelFilter::ERROR
        }
    }
}

fn setup_logging(level: LevelFilter) {
    //NOTE: stdout carries the ledger output, so logging goes to stderr
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}

fn write_ledger_to_stdout<S: TransactionSource, L: AccountLinking>(view: &LedgerView<S, L>, width: u32) -> Result<()> {
    let mut output = BufWriter::new(stdout().lock());
    let window = view.window();
    let rows = view.rows();

    writeln!(
        output,
        "window,{},{},{},{},{},{}",
        window.range.start,
        window.range.end,
        window.total_rows,
        window.content_height,
        window.container_height,
        window.scroll_top
    )?;

    let columns: Vec<_> = view.columns().widths(width).into_iter()
        .map(|(column, width)| format!("{}:{}", column.title(), width))
        .collect();

    writeln!(output, "columns,{}", columns.join(","))?;

    for visible in &window.rows {
        let Some(row) = rows.get(visible.index) else { continue };

        match row {
            VirtualRow::Group { label, count, collapsed } => {
                writeln!(output, "group,{},{},{}", label, count, if *collapsed { "collapsed" } else { "open" })?;
            }
            VirtualRow::Account { account, ignored, .. } => {
                writeln!(
                    output,
                    "account,{},{},{},{},{:.2},{:.2},{},{}",
                    account.account_id,
                    account.name,
                    account.institution,
                    account.account_type,
                    account.balance,
                    account.change,
                    account.status,
                    if *ignored { "ignored" } else { "counted" }
                )?;
            }
            VirtualRow::Detail { account, cache_key } => match view.cache().detail_state(cache_key) {
                DetailState::Loaded(transactions) if !transactions.is_empty() => {
                    writeln!(output, "detail,{},loaded,{}", account.account_id, transactions.len())?;

                    for transaction in transactions.iter() {
                        writeln!(
                            output,
                            "transaction,{},{},{},{:.2},{}",
                            transaction.transaction_id,
                            transaction.date,
                            transaction.merchant,
                            transaction.amount,
                            transaction.category
                        )?;
                    }
                }
                DetailState::Loaded(_) | DetailState::NotRequested => {
                    writeln!(output, "detail,{},empty", account.account_id)?;
                }
                DetailState::Loading => {
                    writeln!(output, "detail,{},loading", account.account_id)?;
                }
                DetailState::Failed(message) => {
                    writeln!(output, "detail,{},failed,{}", account.account_id, message)?;
                }
            }
        }
    }

    output.flush()?;

    Ok(())
}
