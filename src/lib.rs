//! Dashboard engine for a ledger of credit and debit transactions.
//!
//! Turns a flat list of transactions into the dashboard summary: totals for
//! the current week, month or year compared against the previous one, and
//! per-bucket series for charts.
//!
//! The same [build_dashboard] is used by the HTTP server and by the offline
//! `dashboard` command, so both front ends always agree.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod dashboard;
mod endpoints;
mod logging;
mod routing;
mod timezone;
mod transaction;

pub use app_state::{AppState, Clock};
pub use dashboard::{
    AmountExpensesBucketPoint, DashboardData, DashboardQuery, DashboardState, DatedTransaction,
    FinancialMovement, Period, PeriodBucketPoint, PeriodSeries, PeriodWindow, PeriodWindows,
    bucket_count, bucket_index, bucket_labels, build_dashboard, build_series, compute_movement,
    date_transactions, filter_transactions, format_percentage, post_dashboard, resolve_windows,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timezone::get_local_offset;
pub use transaction::{Transaction, TransactionType, parse_transaction_date};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
///
/// Building a dashboard never fails, these come from the code around it:
/// configuration, reading input and writing output.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// A date-time given by the user could not be parsed.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not parse date-time string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// The transactions could not be read from the input.
    #[error("could not read transactions: {0}")]
    ReadInput(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::InvalidDateFormat(..) | Error::ReadInput(_) => StatusCode::BAD_REQUEST,
            Error::InvalidTimezoneError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ref error => {
                tracing::error!("An unexpected error occurred: {}", error);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (
            status,
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn not_found_maps_to_404() {
        let response = Error::NotFound.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_timezone_maps_to_500() {
        let response = Error::InvalidTimezoneError("Mars/Olympus".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn invalid_input_maps_to_400() {
        let response =
            Error::InvalidDateFormat("bad".to_owned(), "tomorrow".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
