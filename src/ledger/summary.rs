use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use super::dates::{is_due_today, is_overdue};
use super::month::{belongs_to_month, MonthKey};
use crate::domain::{Transaction, TransactionKind, TransactionStatus};

/// Financial totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    pub month: MonthKey,
    pub total_income_paid: Decimal,
    pub total_expense_paid: Decimal,
    /// Paid income minus paid expense.
    pub balance: Decimal,
    pub pending_expense_total: Decimal,
    pub overdue_count: usize,
    pub due_today_count: usize,
    pub pending_count: usize,
    pub transaction_count: usize,
}

impl MonthlySummary {
    fn empty(month: MonthKey) -> Self {
        Self {
            month,
            total_income_paid: Decimal::ZERO,
            total_expense_paid: Decimal::ZERO,
            balance: Decimal::ZERO,
            pending_expense_total: Decimal::ZERO,
            overdue_count: 0,
            due_today_count: 0,
            pending_count: 0,
            transaction_count: 0,
        }
    }
}

/// Aggregates the month bucket of `snapshot`. Pure: the snapshot is only read.
pub fn summarize_month(
    snapshot: &[Transaction],
    month: MonthKey,
    now: NaiveDateTime,
) -> MonthlySummary {
    let mut summary = MonthlySummary::empty(month);

    for txn in snapshot.iter().filter(|txn| belongs_to_month(txn, month)) {
        summary.transaction_count += 1;
        let amount = txn.amount.value();
        match (txn.kind, txn.status) {
            (TransactionKind::Income, TransactionStatus::Paid) => {
                summary.total_income_paid += amount;
            }
            (TransactionKind::Expense, TransactionStatus::Paid) => {
                summary.total_expense_paid += amount;
            }
            (TransactionKind::Expense, TransactionStatus::Pending) => {
                summary.pending_expense_total += amount;
            }
            (TransactionKind::Income, TransactionStatus::Pending) => {}
        }
        if txn.is_pending() {
            summary.pending_count += 1;
            if is_overdue(txn.due_date, now) {
                summary.overdue_count += 1;
            }
            if is_due_today(txn.due_date, now) {
                summary.due_today_count += 1;
            }
        }
    }

    summary.balance = summary.total_income_paid - summary.total_expense_paid;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Amount;
    use crate::domain::TransactionDraft;
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    fn txn(
        kind: TransactionKind,
        cents: i64,
        status: TransactionStatus,
        due: NaiveDate,
    ) -> Transaction {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut draft = TransactionDraft::new(
            "Item",
            "Misc",
            Amount::from_minor_units(cents).unwrap(),
            kind,
            due,
        );
        draft.status = status;
        Transaction::from_draft(draft, Uuid::new_v4(), created)
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn totals_follow_type_and_status() {
        let snapshot = vec![
            txn(TransactionKind::Income, 10_000, TransactionStatus::Paid, date(5)),
            txn(TransactionKind::Expense, 4_000, TransactionStatus::Paid, date(6)),
            txn(TransactionKind::Expense, 1_000, TransactionStatus::Pending, date(20)),
        ];
        let now = date(10).and_hms_opt(8, 0, 0).unwrap();
        let summary = summarize_month(&snapshot, MonthKey::new(2024, 1).unwrap(), now);

        assert_eq!(summary.total_income_paid, Decimal::new(100, 0));
        assert_eq!(summary.total_expense_paid, Decimal::new(40, 0));
        assert_eq!(summary.balance, Decimal::new(60, 0));
        assert_eq!(summary.pending_expense_total, Decimal::new(10, 0));
        assert_eq!(summary.pending_count, 1);
        assert_eq!(summary.transaction_count, 3);
    }

    #[test]
    fn counts_overdue_and_due_today_pending_only() {
        let snapshot = vec![
            txn(TransactionKind::Expense, 500, TransactionStatus::Pending, date(3)),
            txn(TransactionKind::Expense, 500, TransactionStatus::Paid, date(3)),
            txn(TransactionKind::Income, 500, TransactionStatus::Pending, date(10)),
            txn(TransactionKind::Expense, 500, TransactionStatus::Pending, date(10)),
            txn(TransactionKind::Expense, 500, TransactionStatus::Pending, date(25)),
        ];
        let now = date(10).and_hms_opt(18, 30, 0).unwrap();
        let summary = summarize_month(&snapshot, MonthKey::new(2024, 1).unwrap(), now);
        assert_eq!(summary.overdue_count, 1);
        assert_eq!(summary.due_today_count, 2);
    }

    #[test]
    fn cents_sum_exactly() {
        let snapshot: Vec<Transaction> = (0..10)
            .map(|_| txn(TransactionKind::Income, 10, TransactionStatus::Paid, date(2)))
            .collect();
        let now = date(2).and_hms_opt(0, 0, 0).unwrap();
        let summary = summarize_month(&snapshot, MonthKey::new(2024, 1).unwrap(), now);
        assert_eq!(summary.total_income_paid, Decimal::ONE);
    }

    #[test]
    fn other_months_are_ignored() {
        let feb = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let snapshot = vec![txn(TransactionKind::Income, 999, TransactionStatus::Paid, feb)];
        let now = date(15).and_hms_opt(0, 0, 0).unwrap();
        let summary = summarize_month(&snapshot, MonthKey::new(2024, 1).unwrap(), now);
        assert_eq!(summary, MonthlySummary::empty(MonthKey::new(2024, 1).unwrap()));
    }

    #[test]
    fn ceiling_amounts_sum_without_overflow() {
        let ceiling_cents = 100_000_000_000;
        let mut snapshot: Vec<Transaction> = (0..10_000)
            .map(|_| txn(TransactionKind::Expense, ceiling_cents, TransactionStatus::Paid, date(4)))
            .collect();
        snapshot.push(txn(TransactionKind::Income, ceiling_cents, TransactionStatus::Paid, date(4)));
        let now = date(4).and_hms_opt(0, 0, 0).unwrap();
        let summary = summarize_month(&snapshot, MonthKey::new(2024, 1).unwrap(), now);

        let ceiling = crate::currency::MAX_AMOUNT;
        assert_eq!(summary.total_expense_paid, ceiling * Decimal::from(10_000));
        assert_eq!(summary.balance, ceiling - ceiling * Decimal::from(10_000));
    }
}
