//! Current and previous period windows for the dashboard comparison.

use std::fmt::Display;

use rust_decimal::Decimal;
use time::{Date, Duration, Month, OffsetDateTime, UtcOffset, util::is_leap_year};

use crate::transaction::{Transaction, TransactionType};

/// The period a dashboard summarises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    /// Seven days starting on Sunday.
    Week,
    /// A calendar month.
    Month,
    /// A calendar year.
    #[default]
    Year,
}

impl Period {
    /// Parse a period token, falling back to [Period::Year] for a missing or
    /// unrecognised token.
    pub fn from_token(token: Option<&str>) -> Self {
        match token.map(str::trim) {
            Some("week") => Self::Week,
            Some("month") => Self::Month,
            Some("year") => Self::Year,
            Some(other) => {
                tracing::debug!("unrecognised period {other:?}, falling back to year");
                Self::Year
            }
            None => Self::Year,
        }
    }

    /// The wire token for this period.
    pub fn as_token(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_token())
    }
}

/// A half-open `[start, end)` range of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindow {
    /// The first instant in the window.
    pub start: OffsetDateTime,
    /// The first instant after the window.
    pub end: OffsetDateTime,
}

impl PeriodWindow {
    fn from_dates(start: Date, end: Date, offset: UtcOffset) -> Self {
        Self {
            start: start.midnight().assume_offset(offset),
            end: end.midnight().assume_offset(offset),
        }
    }

    /// Whether `instant` falls in the window. `end` is excluded so that an
    /// instant on a boundary belongs to exactly one window.
    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// The window being reported on and the window it is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindows {
    /// The period containing `now`.
    pub current: PeriodWindow,
    /// The period of the same kind immediately before `current`.
    pub previous: PeriodWindow,
}

/// Compute the current and previous windows for `period` relative to `now`.
///
/// Boundaries are midnights in the offset of `now`.
pub fn resolve_windows(period: Period, now: OffsetDateTime) -> PeriodWindows {
    let offset = now.offset();
    let today = now.date();

    match period {
        Period::Week => {
            let start = start_of_week(today);
            let end = start + Duration::days(7);
            let previous_start = start - Duration::days(7);

            PeriodWindows {
                current: PeriodWindow::from_dates(start, end, offset),
                previous: PeriodWindow::from_dates(previous_start, start, offset),
            }
        }
        Period::Month => {
            let start = first_day_of_month(today);
            let end = start + Duration::days(last_day_of_month(today.year(), today.month()).into());
            let previous_start = first_day_of_month(start - Duration::days(1));

            PeriodWindows {
                current: PeriodWindow::from_dates(start, end, offset),
                previous: PeriodWindow::from_dates(previous_start, start, offset),
            }
        }
        Period::Year => {
            let start = first_day_of_year(today);
            let end = start + Duration::days(days_in_year(today.year()));
            let previous_start = first_day_of_year(start - Duration::days(1));

            PeriodWindows {
                current: PeriodWindow::from_dates(start, end, offset),
                previous: PeriodWindow::from_dates(previous_start, start, offset),
            }
        }
    }
}

/// A transaction whose date has been parsed and converted to the dashboard's
/// local offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatedTransaction {
    /// Credit or debit.
    pub kind: TransactionType,
    /// The amount of the transaction.
    pub value: Decimal,
    /// When the transaction happened, in the local offset.
    pub date: OffsetDateTime,
}

/// Parse the dates of `transactions` in `local_offset`.
///
/// Transactions with an unparseable date or a negative value are logged and
/// dropped, the rest keep their original order.
pub fn date_transactions(
    transactions: &[Transaction],
    local_offset: UtcOffset,
) -> Vec<DatedTransaction> {
    transactions
        .iter()
        .filter(|transaction| {
            if transaction.value < Decimal::ZERO {
                tracing::warn!(
                    "skipping transaction {} with negative value {}",
                    transaction.id,
                    transaction.value
                );
                return false;
            }
            true
        })
        .filter_map(|transaction| match transaction.local_date_time(local_offset) {
            Some(date) => Some(DatedTransaction {
                kind: transaction.kind,
                value: transaction.value,
                date,
            }),
            None => {
                tracing::warn!(
                    "skipping transaction {} with unparseable date {:?}",
                    transaction.id,
                    transaction.date
                );
                None
            }
        })
        .collect()
}

/// The transactions that fall inside `window`, in their original order.
pub fn filter_transactions(
    transactions: &[DatedTransaction],
    window: &PeriodWindow,
) -> Vec<DatedTransaction> {
    transactions
        .iter()
        .filter(|transaction| window.contains(transaction.date))
        .copied()
        .collect()
}

/// The Sunday on or before `date`.
fn start_of_week(date: Date) -> Date {
    date - Duration::days(date.weekday().number_days_from_sunday().into())
}

fn first_day_of_month(date: Date) -> Date {
    date - Duration::days(i64::from(date.day()) - 1)
}

fn first_day_of_year(date: Date) -> Date {
    date - Duration::days(i64::from(date.ordinal()) - 1)
}

fn days_in_year(year: i32) -> i64 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// The number of days in `month` of `year`.
pub fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}
