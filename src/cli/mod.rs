//! Command-line surface over [`FinanceManager`].

pub mod io;
pub mod output;

use std::{path::PathBuf, sync::Arc};

use chrono::NaiveDate;
use clap::{Args as ClapArgs, Parser, Subcommand};
use uuid::Uuid;

use crate::config::{Config, ConfigManager};
use crate::core::services::ServiceError;
use crate::core::{FinanceManager, SystemClock, TracingNotifier};
use crate::currency::Amount;
use crate::domain::{
    categories_for, Displayable, TransactionDraft, TransactionKind, TransactionStatus,
};
use crate::errors::FinanceError;
use crate::ledger::{parse_time, HistoryFilter, HistoryScope, MonthKey};
use crate::storage::JsonStore;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] FinanceError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Track expenses and income with due dates, recurring bills and reminders.
#[derive(Parser, Debug)]
#[command(name = "finance_core_cli", version)]
pub struct Args {
    /// Directory holding config.json (defaults to FINANCE_CORE_HOME or ~/.finance_core)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Transaction file, overriding the configured one
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Disable coloured output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Answer yes to confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Totals for a month (current month by default)
    Summary {
        #[arg(long)]
        month: Option<MonthKey>,
    },

    /// Next pending transactions of the current month
    Upcoming,

    /// List transactions, latest due date first
    History {
        #[arg(long, default_value_t = HistoryFilter::All)]
        filter: HistoryFilter,
        #[arg(long, conflicts_with = "all_time")]
        month: Option<MonthKey>,
        #[arg(long)]
        all_time: bool,
    },

    /// List recurring series
    Series,

    /// Record a transaction, or a monthly series with --recurring
    Add(AddArgs),

    /// Mark a pending transaction as paid
    Pay { id: Uuid },

    /// Delete one transaction
    Delete { id: Uuid },

    /// Delete every transaction of the series the given transaction belongs to
    DeleteSeries { id: Uuid },

    /// Show or change reminder settings
    Settings(SettingsArgs),

    /// List the default categories
    Categories {
        #[arg(long = "type")]
        kind: Option<TransactionKind>,
    },

    /// Delete all transactions
    Clear,
}

#[derive(Debug, ClapArgs)]
pub struct AddArgs {
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub category: String,
    /// Amount such as 12.50 or 12,50
    #[arg(long)]
    pub amount: Amount,
    #[arg(long = "type", default_value = "expense")]
    pub kind: TransactionKind,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: NaiveDate,
    /// Create one pending instance per month
    #[arg(long)]
    pub recurring: bool,
    /// Record as already paid (ignored for recurring series)
    #[arg(long)]
    pub paid: bool,
}

#[derive(Debug, ClapArgs)]
pub struct SettingsArgs {
    #[arg(long, conflicts_with = "disable")]
    pub enable: bool,
    #[arg(long)]
    pub disable: bool,
    #[arg(long)]
    pub days_before: Option<u32>,
    /// Reminder time (HH:MM)
    #[arg(long)]
    pub time: Option<String>,
}

impl SettingsArgs {
    fn is_empty(&self) -> bool {
        !self.enable && !self.disable && self.days_before.is_none() && self.time.is_none()
    }
}

pub fn run_cli() -> Result<(), CliError> {
    run(Args::parse())
}

pub fn run(args: Args) -> Result<(), CliError> {
    let config_manager = match &args.config_dir {
        Some(dir) => ConfigManager::with_base_dir(dir.clone())?,
        None => ConfigManager::new()?,
    };
    let mut config = config_manager.load()?;
    if args.no_color || !config.ui_color_enabled {
        output::disable_color();
    }

    if let Command::Categories { kind } = &args.command {
        print_categories(*kind);
        return Ok(());
    }

    let data_file = args
        .data
        .clone()
        .unwrap_or_else(|| config_manager.data_file(&config));
    let clock = Arc::new(SystemClock);
    let store = JsonStore::with_clock(data_file, clock.clone())?;
    let mut manager =
        FinanceManager::from_config(&config, Box::new(store), Box::new(TracingNotifier), clock);
    manager.load()?;
    let format = config.currency_format();
    let now = manager.now();

    match args.command {
        Command::Summary { month } => {
            let month = month.unwrap_or_else(|| manager.current_month());
            output::summary(&manager.summary(month), &format);
        }
        Command::Upcoming => {
            output::section(format!("Upcoming in {}", manager.current_month()));
            output::transactions(&manager.upcoming(), now, &format);
        }
        Command::History {
            filter,
            month,
            all_time,
        } => {
            let scope = if all_time {
                HistoryScope::AllTime
            } else {
                HistoryScope::Month(month.unwrap_or_else(|| manager.current_month()))
            };
            output::transactions(&manager.history(filter, scope), now, &format);
        }
        Command::Series => output::series(&manager.series(), &format),
        Command::Add(add) => {
            let mut draft =
                TransactionDraft::new(add.description, add.category, add.amount, add.kind, add.due);
            if add.recurring {
                draft = draft.recurring();
            } else if add.paid {
                draft.status = TransactionStatus::Paid;
            }
            let created = manager.add(draft)?;
            output::success(format!("Added {} transaction(s).", created.len()));
            for txn in &created {
                output::info(output::transaction_line(txn, now, &format));
            }
        }
        Command::Pay { id } => {
            let paid = manager.mark_paid(id)?;
            output::success(format!("Marked `{}` as paid.", paid.description));
        }
        Command::Delete { id } => {
            let (description, label) = manager
                .transaction(id)
                .map(|txn| (txn.description.clone(), txn.display_label()))
                .ok_or(FinanceError::NotFound(id))?;
            if !io::confirm_action(&format!("Delete {label}?"), args.yes)? {
                output::warning("Nothing deleted.");
                return Ok(());
            }
            manager.delete(id)?;
            output::success(format!("Deleted `{description}`."));
        }
        Command::DeleteSeries { id } => {
            let series = manager.find_series_of(id).ok_or_else(|| {
                CliError::Input(format!("{id} is not part of a recurring series"))
            })?;
            let prompt = format!(
                "Delete all {} transactions of `{}`?",
                series.len(),
                series.key.description
            );
            if !io::confirm_action(&prompt, args.yes)? {
                output::warning("Nothing deleted.");
                return Ok(());
            }
            let deleted = manager.delete_series(&series.key)?;
            output::success(format!("Deleted {} transaction(s).", deleted.len()));
        }
        Command::Settings(settings) => {
            apply_settings(&mut manager, &mut config, &config_manager, settings)?;
        }
        Command::Categories { .. } => {}
        Command::Clear => {
            let count = manager.transactions().len();
            if !io::confirm_action(&format!("Delete all {count} transactions?"), args.yes)? {
                output::warning("Nothing deleted.");
                return Ok(());
            }
            let deleted = manager.clear_all()?;
            output::success(format!("Deleted {deleted} transaction(s)."));
        }
    }
    Ok(())
}

fn apply_settings(
    manager: &mut FinanceManager,
    config: &mut Config,
    config_manager: &ConfigManager,
    args: SettingsArgs,
) -> Result<(), CliError> {
    if !args.is_empty() {
        let mut settings = config.notifications;
        if args.enable {
            settings.enabled = true;
        }
        if args.disable {
            settings.enabled = false;
        }
        if let Some(days) = args.days_before {
            settings.days_before = days;
        }
        if let Some(time) = args.time.as_deref() {
            settings.time = parse_time(time).map_err(FinanceError::from)?;
        }
        let scheduled = manager.update_notification_settings(settings)?;
        config.notifications = settings;
        config_manager.save(config)?;
        output::success(format!("Settings saved; {scheduled} reminder(s) scheduled."));
    }
    let current = manager.notification_settings();
    output::info(format!(
        "Reminders {}: {} day(s) before at {}",
        if current.enabled { "on" } else { "off" },
        current.days_before,
        current.time.format("%H:%M")
    ));
    Ok(())
}

fn print_categories(kind: Option<TransactionKind>) {
    let kinds = match kind {
        Some(kind) => vec![kind],
        None => vec![TransactionKind::Expense, TransactionKind::Income],
    };
    for kind in kinds {
        output::section(kind);
        for category in categories_for(kind) {
            output::info(&category.name);
        }
    }
}
