//! Assembles the dashboard summary from a flat list of transactions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    dashboard::{
        aggregation::{bucket_labels, build_series, net_total, total_by_type},
        movement::{FinancialMovement, compute_movement},
        window::{Period, date_transactions, filter_transactions, resolve_windows},
    },
    transaction::{Transaction, TransactionType},
};

/// Net movement for one chart bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBucketPoint {
    /// The bucket label, e.g. "Mon", "05" or "Jan".
    pub period: String,
    /// Credits minus debits in the bucket.
    ///
    /// This is the net movement, not gross income. The name is kept because
    /// chart consumers read this field.
    pub income: Decimal,
}

/// Gross credits and debits for one chart bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountExpensesBucketPoint {
    /// The bucket label, e.g. "Mon", "05" or "Jan".
    pub period: String,
    /// The sum of credits in the bucket.
    pub amount: Decimal,
    /// The sum of debits in the bucket.
    pub expenses: Decimal,
}

/// Everything the dashboard displays for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    /// Net balance (credits minus debits) of the current period.
    pub amount: FinancialMovement,
    /// Gross credits of the current period.
    pub income: FinancialMovement,
    /// Gross debits of the current period.
    pub expenses: FinancialMovement,
    /// Net movement per bucket, oldest first.
    pub income_by_range: Vec<PeriodBucketPoint>,
    /// Gross credits and debits per bucket, oldest first.
    pub amount_and_expenses_by_range: Vec<AmountExpensesBucketPoint>,
}

/// Build the dashboard for `period` as of `now`.
///
/// The offset of `now` is the local time zone: window boundaries are local
/// midnights and each transaction's date is viewed in that offset before it is
/// compared or bucketed. Capture `now` once and pass the same value for every
/// part of a response.
///
/// Transactions with an unparseable date are left out entirely.
pub fn build_dashboard(
    transactions: &[Transaction],
    period: Period,
    now: OffsetDateTime,
) -> DashboardData {
    let windows = resolve_windows(period, now);
    let dated = date_transactions(transactions, now.offset());
    let current = filter_transactions(&dated, &windows.current);
    let previous = filter_transactions(&dated, &windows.previous);

    tracing::debug!(
        "building {period} dashboard from {} transactions: {} current, {} previous",
        transactions.len(),
        current.len(),
        previous.len()
    );

    let amount = compute_movement(net_total(&current), net_total(&previous));
    let income = compute_movement(
        total_by_type(&current, TransactionType::Credit),
        total_by_type(&previous, TransactionType::Credit),
    );
    let expenses = compute_movement(
        total_by_type(&current, TransactionType::Debit),
        total_by_type(&previous, TransactionType::Debit),
    );

    let series = build_series(&current, period, now);
    let labels = bucket_labels(period, now);

    let income_by_range = labels
        .iter()
        .zip(&series.income)
        .map(|(label, &income)| PeriodBucketPoint {
            period: label.clone(),
            income,
        })
        .collect();

    let amount_and_expenses_by_range = labels
        .into_iter()
        .zip(series.amount.into_iter().zip(series.expenses))
        .map(|(period, (amount, expenses))| AmountExpensesBucketPoint {
            period,
            amount,
            expenses,
        })
        .collect();

    DashboardData {
        amount,
        income,
        expenses,
        income_by_range,
        amount_and_expenses_by_range,
    }
}
