use std::fmt;

use chrono::NaiveDateTime;
use colored::{ColoredString, Colorize};

use crate::currency::CurrencyFormat;
use crate::domain::Transaction;
use crate::ledger::{days_label, days_until_due, DueState, MonthlySummary, RecurringSeries};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Section,
}

/// Disables ANSI styling for the rest of the process.
pub fn disable_color() {
    colored::control::set_override(false);
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()).bold().to_string(),
        MessageKind::Info => text,
        MessageKind::Success => format!("[ok] {text}").bright_green().to_string(),
        MessageKind::Warning => format!("[!] {text}").bright_yellow().to_string(),
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    println!("{}", apply_style(kind, message));
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

fn due_note(txn: &Transaction, now: NaiveDateTime) -> ColoredString {
    if txn.is_paid() {
        return "paid".green();
    }
    match DueState::classify(txn.due_date, now) {
        DueState::Overdue => "overdue".bright_red(),
        DueState::DueToday => "due today".bright_yellow(),
        DueState::Upcoming => {
            format!("in {}", days_label(days_until_due(txn.due_date, now))).normal()
        }
    }
}

/// One line per transaction: due date, state, signed amount, description.
pub fn transaction_line(txn: &Transaction, now: NaiveDateTime, format: &CurrencyFormat) -> String {
    format!(
        "{}  {:<12} {:>14}  {} [{}]  {}",
        txn.due_date,
        due_note(txn, now),
        format.format(txn.signed_amount()),
        txn.description,
        txn.category,
        txn.id.to_string().dimmed()
    )
}

pub fn transactions(items: &[&Transaction], now: NaiveDateTime, format: &CurrencyFormat) {
    if items.is_empty() {
        info("No transactions.");
        return;
    }
    for txn in items {
        info(transaction_line(txn, now, format));
    }
}

pub fn summary(summary: &MonthlySummary, format: &CurrencyFormat) {
    section(format!("Summary {}", summary.month));
    let rows = [
        ("Income paid", format.format(summary.total_income_paid)),
        ("Expense paid", format.format(summary.total_expense_paid)),
        ("Balance", format.format(summary.balance)),
        ("Pending expense", format.format(summary.pending_expense_total)),
        ("Pending", summary.pending_count.to_string()),
        ("Overdue", summary.overdue_count.to_string()),
        ("Due today", summary.due_today_count.to_string()),
    ];
    for (label, value) in rows {
        info(format!("{label:<16} {value:>14}"));
    }
}

pub fn series(items: &[RecurringSeries], format: &CurrencyFormat) {
    if items.is_empty() {
        info("No recurring series.");
        return;
    }
    for series in items {
        info(format!(
            "{} [{}] {}  next {}  {} pending / {} total",
            series.key.description,
            series.key.category,
            format.format(series.key.amount.value() * series.key.kind.sign()),
            series.next_due_date,
            series.pending_count,
            series.len()
        ));
    }
}
