//! Dashboard HTTP handlers.
//!
//! The server front end of the dashboard: it accepts the caller's transactions
//! as JSON and responds with the summary built by [build_dashboard].

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    app_state::Clock,
    dashboard::{DashboardData, Period, build_dashboard},
    timezone::get_local_offset,
    transaction::Transaction,
};

/// The state needed for building the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The source of the current time.
    pub clock: Clock,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            clock: state.clock,
        }
    }
}

/// The query string of the dashboard endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// "week", "month" or "year". Anything else, or nothing, means "year".
    pub period: Option<String>,
}

/// Build the dashboard for the transactions in the request body.
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if the server's timezone is not a
/// valid canonical timezone name.
pub async fn post_dashboard(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
    Json(transactions): Json<Vec<Transaction>>,
) -> Result<Json<DashboardData>, Error> {
    let period = Period::from_token(query.period.as_deref());

    let now = (state.clock)();
    let local_offset = get_local_offset(&state.local_timezone, now).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    Ok(Json(build_dashboard(
        &transactions,
        period,
        now.to_offset(local_offset),
    )))
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use serde_json::{Value, json};
    use time::{OffsetDateTime, macros::datetime};

    use crate::endpoints;

    use super::{DashboardState, post_dashboard};

    fn fixed_clock() -> OffsetDateTime {
        datetime!(2024-05-15 13:00 UTC)
    }

    fn get_test_server(local_timezone: &str) -> TestServer {
        let app = Router::new()
            .route(endpoints::DASHBOARD_API, post(post_dashboard))
            .with_state(DashboardState {
                local_timezone: local_timezone.to_owned(),
                clock: fixed_clock,
            });

        TestServer::new(app)
    }

    fn month_scenario() -> Value {
        json!([
            {"id": 1, "type": "credit", "value": 1000, "date": "2024-05-05T10:00:00Z"},
            {"id": 2, "type": "debit", "value": 400, "date": "2024-05-05T12:00:00Z"},
        ])
    }

    #[tokio::test]
    async fn builds_month_dashboard() {
        let server = get_test_server("Etc/UTC");

        let response = server
            .post(endpoints::DASHBOARD_API)
            .add_query_param("period", "month")
            .json(&month_scenario())
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["amount"]["total"], json!(600.0));
        assert_eq!(body["amount"]["increasePercentage"], json!("+100%"));
        assert_eq!(body["incomeByRange"].as_array().map(Vec::len), Some(31));
        assert_eq!(
            body["incomeByRange"][4],
            json!({"period": "05", "income": 600.0})
        );
        assert_eq!(
            body["amountAndExpensesByRange"][4],
            json!({"period": "05", "amount": 1000.0, "expenses": 400.0})
        );
    }

    #[tokio::test]
    async fn missing_period_falls_back_to_year() {
        let server = get_test_server("Etc/UTC");

        let response = server
            .post(endpoints::DASHBOARD_API)
            .json(&month_scenario())
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["incomeByRange"].as_array().map(Vec::len), Some(12));
        assert_eq!(body["incomeByRange"][4], json!({"period": "May", "income": 600.0}));
    }

    #[tokio::test]
    async fn unknown_period_falls_back_to_year() {
        let server = get_test_server("Etc/UTC");

        let response = server
            .post(endpoints::DASHBOARD_API)
            .add_query_param("period", "decade")
            .json(&json!([]))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["amountAndExpensesByRange"].as_array().map(Vec::len), Some(12));
        assert_eq!(body["income"], json!({"total": 0.0, "increasePercentage": "0%"}));
    }

    #[tokio::test]
    async fn uses_server_timezone_for_buckets() {
        let server = get_test_server("Pacific/Auckland");

        // 2024-05-04 23:00 UTC is 2024-05-05 11:00 in Auckland (UTC+12 in May).
        let response = server
            .post(endpoints::DASHBOARD_API)
            .add_query_param("period", "month")
            .json(&json!([
                {"type": "credit", "value": 5, "date": "2024-05-04T23:00:00Z"},
            ]))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["incomeByRange"][4]["income"], json!(5.0));
        assert_eq!(body["incomeByRange"][3]["income"], json!(0.0));
    }

    #[tokio::test]
    async fn invalid_timezone_is_a_server_error() {
        let server = get_test_server("Not/AZone");

        let response = server
            .post(endpoints::DASHBOARD_API)
            .json(&json!([]))
            .expect_failure()
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert!(body["error"].as_str().is_some_and(|e| e.contains("Not/AZone")));
    }

    #[tokio::test]
    async fn rejects_malformed_transactions() {
        let server = get_test_server("Etc/UTC");

        let response = server
            .post(endpoints::DASHBOARD_API)
            .json(&json!([{"type": "refund", "value": 1, "date": "2024-05-01"}]))
            .expect_failure()
            .await;

        assert!(response.status_code().is_client_error());
    }
}
