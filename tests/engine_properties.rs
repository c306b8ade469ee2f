mod common;

use chrono::{Datelike, Duration, TimeZone, Utc};
use common::{date, expense, income};
use finance_core::{
    domain::{Transaction, TransactionDraft, TransactionStatus},
    ledger::{
        add_months, belongs_to_month, expand_template, group_series, is_due_today, is_overdue,
        month_bucket, summarize_month, MonthKey, MonthOverflow, RecurrencePolicy,
    },
};
use rust_decimal::Decimal;
use uuid::Uuid;

fn stored(draft: TransactionDraft) -> Transaction {
    Transaction::from_draft(
        draft,
        Uuid::new_v4(),
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    )
}

fn with_status(mut draft: TransactionDraft, status: TransactionStatus) -> TransactionDraft {
    draft.status = status;
    draft
}

#[test]
fn same_calendar_day_is_due_today_not_overdue() {
    let today = date(2024, 2, 29);
    for hour in [0, 9, 23] {
        let now = today.and_hms_opt(hour, 59, 59).unwrap();
        assert!(!is_overdue(today, now));
        assert!(is_due_today(today, now));
    }
}

#[test]
fn every_earlier_day_is_overdue() {
    let now = date(2024, 3, 1).and_hms_opt(0, 0, 1).unwrap();
    for back in 1..=400 {
        let due = now.date() - Duration::days(back);
        assert!(is_overdue(due, now), "{due} should be overdue");
        assert!(!is_due_today(due, now));
    }
    assert!(!is_overdue(date(2024, 3, 2), now));
}

#[test]
fn day_fifteen_template_expands_to_twelve_monthly_pending_instances() {
    let template = expense("Internet", 9_990, date(2024, 5, 15)).recurring();
    let drafts = expand_template(&template, &RecurrencePolicy::default()).unwrap();
    assert_eq!(drafts.len(), 12);
    for pair in drafts.windows(2) {
        let (a, b) = (pair[0].due_date, pair[1].due_date);
        assert_eq!(b.day(), 15);
        assert_eq!(add_months(a, 1, MonthOverflow::Rollover), Some(b));
    }
    assert_eq!(drafts[11].due_date, date(2025, 4, 15));
    assert!(drafts
        .iter()
        .all(|draft| draft.status == TransactionStatus::Pending && draft.is_recurring));
}

#[test]
fn rent_pair_groups_into_one_series() {
    let snapshot = vec![
        stored(expense("Rent", 100_000, date(2024, 1, 1)).recurring()),
        stored(expense("Rent", 100_000, date(2024, 2, 1)).recurring()),
    ];
    let series = group_series(&snapshot);
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].pending_count, 2);
    assert_eq!(series[0].next_due_date, date(2024, 1, 1));
}

#[test]
fn summary_matches_reference_month() {
    let snapshot = vec![
        stored(with_status(income("Salary", 10_000, date(2024, 1, 5)), TransactionStatus::Paid)),
        stored(with_status(expense("Power", 4_000, date(2024, 1, 8)), TransactionStatus::Paid)),
        stored(expense("Water", 1_000, date(2024, 1, 20))),
    ];
    let now = date(2024, 1, 10).and_hms_opt(9, 0, 0).unwrap();
    let summary = summarize_month(&snapshot, MonthKey::new(2024, 1).unwrap(), now);
    assert_eq!(summary.total_income_paid, Decimal::new(100, 0));
    assert_eq!(summary.total_expense_paid, Decimal::new(40, 0));
    assert_eq!(summary.balance, Decimal::new(60, 0));
    assert_eq!(summary.pending_expense_total, Decimal::new(10, 0));
}

#[test]
fn summary_is_idempotent_and_leaves_snapshot_untouched() {
    let snapshot: Vec<Transaction> = (1..=28)
        .map(|day| stored(expense("Daily", 1_234, date(2024, 2, day))))
        .collect();
    let before = snapshot.clone();
    let now = date(2024, 2, 14).and_hms_opt(12, 0, 0).unwrap();
    let month = MonthKey::new(2024, 2).unwrap();

    let first = summarize_month(&snapshot, month, now);
    let second = summarize_month(&snapshot, month, now);
    assert_eq!(first, second);
    assert_eq!(snapshot, before);
    assert_eq!(first.overdue_count, 13);
    assert_eq!(first.due_today_count, 1);
}

#[test]
fn month_boundary_days_land_in_exactly_one_bucket() {
    let jan = MonthKey::new(2024, 1).unwrap();
    let feb = MonthKey::new(2024, 2).unwrap();
    let last_jan = stored(expense("Edge", 100, date(2024, 1, 31)));
    let first_feb = stored(expense("Edge", 100, date(2024, 2, 1)));

    for txn in [&last_jan, &first_feb] {
        let hits = [jan, feb]
            .into_iter()
            .filter(|month| belongs_to_month(txn, *month))
            .count();
        assert_eq!(hits, 1, "{} must land in exactly one month", txn.due_date);
    }

    let snapshot = vec![last_jan.clone(), first_feb.clone()];
    assert_eq!(month_bucket(&snapshot, jan)[0].id, last_jan.id);
    assert_eq!(month_bucket(&snapshot, feb)[0].id, first_feb.id);
}
