//! Implements a struct that holds the state of the REST server.

use time::OffsetDateTime;

/// A source of the current time.
///
/// Handlers call the clock once per request so that every window in a
/// response is computed from the same instant. Tests substitute a function
/// returning a fixed instant.
pub type Clock = fn() -> OffsetDateTime;

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The source of the current time.
    pub clock: Clock,
}

impl AppState {
    /// Create a new [AppState] that reads the system clock.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Pacific/Auckland".
    pub fn new(local_timezone: &str) -> Self {
        Self::with_clock(local_timezone, OffsetDateTime::now_utc)
    }

    /// Create a new [AppState] with a custom `clock`.
    pub fn with_clock(local_timezone: &str, clock: Clock) -> Self {
        Self {
            local_timezone: local_timezone.to_owned(),
            clock,
        }
    }
}
