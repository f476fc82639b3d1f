//! Dashboard module
//!
//! Turns a flat list of ledger transactions into the dashboard summary:
//! current-vs-previous period totals and per-bucket series for charts.

mod aggregation;
mod builder;
mod handlers;
mod movement;
mod window;

pub use aggregation::{PeriodSeries, bucket_count, bucket_index, bucket_labels, build_series};
pub use builder::{AmountExpensesBucketPoint, DashboardData, PeriodBucketPoint, build_dashboard};
pub use handlers::{DashboardQuery, DashboardState, post_dashboard};
pub use movement::{FinancialMovement, compute_movement, format_percentage};
pub use window::{
    DatedTransaction, Period, PeriodWindow, PeriodWindows, date_transactions, filter_transactions,
    resolve_windows,
};
