//! The API endpoints URIs.

/// The route for building a dashboard from a list of transactions.
pub const DASHBOARD_API: &str = "/api/dashboard";
/// The route for checking that the server is up.
pub const HEALTH: &str = "/api/health";
