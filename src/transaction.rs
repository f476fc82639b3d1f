//! The ledger transaction supplied by callers and the date parsing used to
//! place it in time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset, format_description::well_known::Rfc3339,
    macros::format_description,
};

/// Whether a transaction adds funds to, or removes funds from, the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in.
    Credit,
    /// Money going out.
    Debit,
}

/// A single ledger entry as supplied by the transaction source.
///
/// The `date` is kept as the raw string from the wire so that a malformed
/// timestamp only excludes that transaction from aggregation instead of
/// rejecting the whole request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque identifier, ignored by aggregation.
    #[serde(default)]
    pub id: serde_json::Value,
    /// Credit or debit.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The non-negative amount of the transaction. Negative values are
    /// dropped before aggregation.
    pub value: Decimal,
    /// An ISO-8601 timestamp, e.g. "2024-05-15T10:00:00Z".
    pub date: String,
}

impl Transaction {
    /// Create a transaction with a null ID.
    pub fn new(kind: TransactionType, value: Decimal, date: impl Into<String>) -> Self {
        Self {
            id: serde_json::Value::Null,
            kind,
            value,
            date: date.into(),
        }
    }

    /// Set the ID of the transaction.
    pub fn id(mut self, id: impl Into<serde_json::Value>) -> Self {
        self.id = id.into();
        self
    }

    /// The instant of the transaction, viewed in `local_offset`.
    ///
    /// Returns `None` if `date` is not a supported ISO-8601 format, see
    /// [parse_transaction_date].
    pub fn local_date_time(&self, local_offset: UtcOffset) -> Option<OffsetDateTime> {
        parse_transaction_date(&self.date, local_offset)
    }
}

/// Parse an ISO-8601 timestamp into an instant viewed in `local_offset`.
///
/// Accepted formats:
/// - RFC 3339 with an explicit offset, e.g. "2024-05-15T10:00:00.5+12:00".
/// - A date-time without an offset, e.g. "2024-05-15T10:00:00" or
///   "2024-05-15T10:00". This is read as a wall-clock time in `local_offset`.
/// - A bare date, e.g. "2024-05-15". This is read as midnight UTC, the same
///   way an ECMAScript `Date` reads it.
pub fn parse_transaction_date(text: &str, local_offset: UtcOffset) -> Option<OffsetDateTime> {
    let text = text.trim();

    if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(date_time.to_offset(local_offset));
    }

    let with_seconds = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
    );
    let without_seconds = format_description!("[year]-[month]-[day]T[hour]:[minute]");

    if let Ok(date_time) = PrimitiveDateTime::parse(text, &with_seconds)
        .or_else(|_| PrimitiveDateTime::parse(text, &without_seconds))
    {
        return Some(date_time.assume_offset(local_offset));
    }

    Date::parse(text, &format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc().to_offset(local_offset))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use time::{UtcOffset, macros::datetime, macros::offset};

    use super::{Transaction, TransactionType, parse_transaction_date};

    #[test]
    fn parses_rfc3339_with_zulu_offset() {
        let got = parse_transaction_date("2024-05-15T10:30:00Z", UtcOffset::UTC);

        assert_eq!(got, Some(datetime!(2024-05-15 10:30 UTC)));
    }

    #[test]
    fn parses_rfc3339_with_fraction_and_converts_to_local_offset() {
        let got = parse_transaction_date("2024-05-15T10:30:00.250Z", offset!(+12));

        assert_eq!(got, Some(datetime!(2024-05-15 22:30:00.25 +12)));
    }

    #[test]
    fn date_time_without_offset_is_local_wall_clock() {
        let got = parse_transaction_date("2024-05-15T23:30:00", offset!(-5));

        assert_eq!(got, Some(datetime!(2024-05-15 23:30 -5)));
    }

    #[test]
    fn date_time_without_seconds_is_accepted() {
        let got = parse_transaction_date("2024-05-15T08:15", UtcOffset::UTC);

        assert_eq!(got, Some(datetime!(2024-05-15 08:15 UTC)));
    }

    #[test]
    fn bare_date_is_utc_midnight() {
        let got = parse_transaction_date("2024-05-15", offset!(-3));

        // Midnight UTC is still the previous evening three hours behind UTC.
        assert_eq!(got, Some(datetime!(2024-05-14 21:00 -3)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_transaction_date("not a date", UtcOffset::UTC), None);
        assert_eq!(parse_transaction_date("", UtcOffset::UTC), None);
        assert_eq!(parse_transaction_date("2024-13-01", UtcOffset::UTC), None);
    }

    #[test]
    fn deserializes_wire_format() {
        let json = r#"{"id": "abc", "type": "debit", "value": 12.5, "date": "2024-05-15"}"#;

        let transaction: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(
            transaction,
            Transaction::new(TransactionType::Debit, dec!(12.5), "2024-05-15").id("abc")
        );
    }

    #[test]
    fn deserializes_without_id() {
        let json = r#"{"type": "credit", "value": 3, "date": "2024-05-15"}"#;

        let transaction: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(transaction.id, serde_json::Value::Null);
        assert_eq!(transaction.kind, TransactionType::Credit);
        assert_eq!(transaction.value, dec!(3));
    }

    #[test]
    fn rejects_unknown_transaction_type() {
        let json = r#"{"type": "refund", "value": 3, "date": "2024-05-15"}"#;

        assert!(serde_json::from_str::<Transaction>(json).is_err());
    }
}
