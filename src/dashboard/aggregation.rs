//! Transaction totals and per-bucket series for the dashboard charts.
//!
//! A bucket is one slot on the chart's x-axis: a weekday for [Period::Week],
//! a day of the month for [Period::Month] and a month for [Period::Year].

use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::{
    dashboard::window::{DatedTransaction, Period, last_day_of_month},
    transaction::TransactionType,
};

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Sums the values of the transactions of type `kind`.
///
/// A sum past the range of [Decimal] saturates instead of panicking.
pub fn total_by_type(transactions: &[DatedTransaction], kind: TransactionType) -> Decimal {
    transactions
        .iter()
        .filter(|transaction| transaction.kind == kind)
        .fold(Decimal::ZERO, |total, transaction| {
            saturating_add(total, transaction.value, "total")
        })
}

/// Credits minus debits.
pub fn net_total(transactions: &[DatedTransaction]) -> Decimal {
    saturating_add(
        total_by_type(transactions, TransactionType::Credit),
        -total_by_type(transactions, TransactionType::Debit),
        "net total",
    )
}

fn saturating_add(total: Decimal, value: Decimal, what: &str) -> Decimal {
    total.checked_add(value).unwrap_or_else(|| {
        tracing::warn!("{what} overflowed adding {value} to {total}, saturating");
        total.saturating_add(value)
    })
}

/// The number of buckets for `period`, given the month `now` is in.
pub fn bucket_count(period: Period, now: OffsetDateTime) -> usize {
    match period {
        Period::Week => WEEKDAY_LABELS.len(),
        Period::Month => last_day_of_month(now.year(), now.month()).into(),
        Period::Year => MONTH_LABELS.len(),
    }
}

/// The bucket `date` belongs to.
///
/// The index is only meaningful for dates inside the current window, so
/// callers should drop indices at or past [bucket_count].
pub fn bucket_index(date: OffsetDateTime, period: Period) -> usize {
    match period {
        Period::Week => date.weekday().number_days_from_sunday().into(),
        Period::Month => usize::from(date.day()) - 1,
        Period::Year => usize::from(u8::from(date.month())) - 1,
    }
}

/// The x-axis labels for `period`, in chronological order.
///
/// Days of the month are 1-based and zero-padded, e.g. "01", "02", ..., "31".
pub fn bucket_labels(period: Period, now: OffsetDateTime) -> Vec<String> {
    match period {
        Period::Week => WEEKDAY_LABELS.iter().map(|&label| label.to_owned()).collect(),
        Period::Month => (1..=bucket_count(period, now))
            .map(|day| format!("{day:02}"))
            .collect(),
        Period::Year => MONTH_LABELS.iter().map(|&label| label.to_owned()).collect(),
    }
}

/// Per-bucket sums, all three vectors have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSeries {
    /// Net movement: credits minus debits.
    ///
    /// Named "income" on the wire even though it is not gross income.
    pub income: Vec<Decimal>,
    /// Gross credits.
    pub amount: Vec<Decimal>,
    /// Gross debits.
    pub expenses: Vec<Decimal>,
}

/// Accumulates `transactions` into per-bucket sums.
///
/// `transactions` should already be restricted to the current window of
/// `period` relative to `now`.
pub fn build_series(
    transactions: &[DatedTransaction],
    period: Period,
    now: OffsetDateTime,
) -> PeriodSeries {
    let count = bucket_count(period, now);
    let mut series = PeriodSeries {
        income: vec![Decimal::ZERO; count],
        amount: vec![Decimal::ZERO; count],
        expenses: vec![Decimal::ZERO; count],
    };

    for transaction in transactions {
        let index = bucket_index(transaction.date, period);

        if index >= count {
            tracing::debug!(
                "dropping transaction dated {} outside of {count} {period} buckets",
                transaction.date
            );
            continue;
        }

        match transaction.kind {
            TransactionType::Credit => {
                series.income[index] =
                    saturating_add(series.income[index], transaction.value, "bucket income");
                series.amount[index] =
                    saturating_add(series.amount[index], transaction.value, "bucket amount");
            }
            TransactionType::Debit => {
                series.income[index] =
                    saturating_add(series.income[index], -transaction.value, "bucket income");
                series.expenses[index] =
                    saturating_add(series.expenses[index], transaction.value, "bucket expenses");
            }
        }
    }

    series
}
