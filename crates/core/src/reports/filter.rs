//! Transaction search filters.
//!
//! A search is a list of `{operation, operator, value}` triples combined with
//! AND. `operator` names the field (`created_at`, `type`, `payment_method`)
//! and `operation` the comparison. Enum fields only support `eq` and `ne`.
//! A `created_at` value given as a bare date stands for the whole UTC day,
//! so `eq 2026-01-15` matches anything recorded that day.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::error::ReportError;
use super::period::ReportWindow;
use crate::ledger::{LedgerError, PaymentMethod, TradeType, Transaction};

/// A filter as received from the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionFilter {
    /// `eq`, `ne`, `gt`, `lt`, `gte` or `lte`.
    pub operation: String,
    /// `created_at`, `type` or `payment_method`.
    pub operator: String,
    /// Value to compare against.
    pub value: String,
}

/// Comparison applied by a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperation {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Less than.
    Lt,
    /// Greater than or equal.
    Gte,
    /// Less than or equal.
    Lte,
}

impl std::str::FromStr for FilterOperation {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eq" => Ok(Self::Eq),
            "ne" => Ok(Self::Ne),
            "gt" => Ok(Self::Gt),
            "lt" => Ok(Self::Lt),
            "gte" => Ok(Self::Gte),
            "lte" => Ok(Self::Lte),
            other => Err(ReportError::InvalidFilter(format!("unknown operation '{other}'"))),
        }
    }
}

/// A resolved condition on `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePredicate {
    /// Exactly at the instant.
    At(DateTime<Utc>),
    /// Anything but the instant.
    NotAt(DateTime<Utc>),
    /// Strictly before.
    Before(DateTime<Utc>),
    /// At or after.
    AtOrAfter(DateTime<Utc>),
    /// Strictly after.
    After(DateTime<Utc>),
    /// At or before.
    AtOrBefore(DateTime<Utc>),
    /// Inside the window.
    Within(ReportWindow),
    /// Outside the window.
    Outside(ReportWindow),
}

impl TimePredicate {
    fn from_instant(operation: FilterOperation, at: DateTime<Utc>) -> Self {
        match operation {
            FilterOperation::Eq => Self::At(at),
            FilterOperation::Ne => Self::NotAt(at),
            FilterOperation::Gt => Self::After(at),
            FilterOperation::Lt => Self::Before(at),
            FilterOperation::Gte => Self::AtOrAfter(at),
            FilterOperation::Lte => Self::AtOrBefore(at),
        }
    }

    fn from_day(operation: FilterOperation, day: ReportWindow) -> Self {
        match operation {
            FilterOperation::Eq => Self::Within(day),
            FilterOperation::Ne => Self::Outside(day),
            FilterOperation::Gt => Self::AtOrAfter(day.end),
            FilterOperation::Lt => Self::Before(day.start),
            FilterOperation::Gte => Self::AtOrAfter(day.start),
            FilterOperation::Lte => Self::Before(day.end),
        }
    }

    /// Returns true if `at` satisfies the predicate.
    #[must_use]
    pub fn matches(&self, at: DateTime<Utc>) -> bool {
        match *self {
            Self::At(t) => at == t,
            Self::NotAt(t) => at != t,
            Self::Before(t) => at < t,
            Self::AtOrAfter(t) => at >= t,
            Self::After(t) => at > t,
            Self::AtOrBefore(t) => at <= t,
            Self::Within(w) => w.contains(at),
            Self::Outside(w) => !w.contains(at),
        }
    }
}

/// A validated filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterCondition {
    /// Condition on the creation time.
    CreatedAt(TimePredicate),
    /// `type` equals (`equal = true`) or differs from the value.
    TradeType {
        /// `eq` when true, `ne` when false.
        equal: bool,
        /// Value compared against.
        value: TradeType,
    },
    /// `payment_method` equals (`equal = true`) or differs from the value.
    PaymentMethod {
        /// `eq` when true, `ne` when false.
        equal: bool,
        /// Value compared against.
        value: PaymentMethod,
    },
}

impl FilterCondition {
    /// Returns true if the transaction satisfies the condition.
    #[must_use]
    pub fn matches(&self, tx: &Transaction) -> bool {
        match *self {
            Self::CreatedAt(predicate) => predicate.matches(tx.created_at),
            Self::TradeType { equal, value } => (tx.trade_type == value) == equal,
            Self::PaymentMethod { equal, value } => (tx.payment_method == value) == equal,
        }
    }
}

fn equality(operation: FilterOperation, field: &str) -> Result<bool, ReportError> {
    match operation {
        FilterOperation::Eq => Ok(true),
        FilterOperation::Ne => Ok(false),
        _ => Err(ReportError::InvalidFilter(format!(
            "{field} only supports eq and ne"
        ))),
    }
}

fn parse_time(operation: FilterOperation, value: &str) -> Result<TimePredicate, ReportError> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(TimePredicate::from_day(operation, ReportWindow::day(date)?));
    }
    DateTime::parse_from_rfc3339(value)
        .map(|at| TimePredicate::from_instant(operation, at.with_timezone(&Utc)))
        .map_err(|_| {
            ReportError::InvalidFilter(format!(
                "created_at must be YYYY-MM-DD or RFC 3339, got '{value}'"
            ))
        })
}

impl TransactionFilter {
    /// Validates the filter.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidFilter` for unknown operations, fields or
    /// values, and for ordering comparisons on enum fields.
    pub fn parse(&self) -> Result<FilterCondition, ReportError> {
        let operation: FilterOperation = self.operation.parse()?;
        let value = self.value.trim();

        match self.operator.as_str() {
            "created_at" => parse_time(operation, value).map(FilterCondition::CreatedAt),
            "type" => Ok(FilterCondition::TradeType {
                equal: equality(operation, "type")?,
                value: value
                    .parse()
                    .map_err(|e: LedgerError| ReportError::InvalidFilter(e.to_string()))?,
            }),
            "payment_method" => Ok(FilterCondition::PaymentMethod {
                equal: equality(operation, "payment_method")?,
                value: value
                    .parse()
                    .map_err(|e: LedgerError| ReportError::InvalidFilter(e.to_string()))?,
            }),
            other => Err(ReportError::InvalidFilter(format!("unknown field '{other}'"))),
        }
    }
}

/// Validates a list of filters.
///
/// # Errors
///
/// Returns the first filter's error.
pub fn parse_filters(filters: &[TransactionFilter]) -> Result<Vec<FilterCondition>, ReportError> {
    filters.iter().map(TransactionFilter::parse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{NewTransaction, Trade};
    use chrono::TimeZone;
    use goldbook_shared::types::{AdminId, CustomerId, StoreId, TransactionId};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn filter(operation: &str, operator: &str, value: &str) -> TransactionFilter {
        TransactionFilter {
            operation: operation.to_string(),
            operator: operator.to_string(),
            value: value.to_string(),
        }
    }

    fn tx_at(trade_type: TradeType, method: PaymentMethod, at: DateTime<Utc>) -> Transaction {
        let new = NewTransaction {
            id: TransactionId::new(),
            customer_id: CustomerId::new(),
            store_id: StoreId::new(),
            posted_by: AdminId::new(),
            trade: Trade::new(trade_type, method, dec!(1), dec!(1)).unwrap(),
            description: String::new(),
        };
        Transaction::recorded(&new, at)
    }

    fn noon(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, day, 12, 0, 0).unwrap()
    }

    #[rstest]
    #[case("eq", 15, true)]
    #[case("eq", 16, false)]
    #[case("ne", 15, false)]
    #[case("gt", 15, false)]
    #[case("gt", 16, true)]
    #[case("gte", 15, true)]
    #[case("lt", 15, false)]
    #[case("lt", 14, true)]
    #[case("lte", 15, true)]
    #[case("lte", 16, false)]
    fn test_date_filters_cover_whole_day(
        #[case] operation: &str,
        #[case] day: u32,
        #[case] expected: bool,
    ) {
        let condition = filter(operation, "created_at", "2026-01-15").parse().unwrap();
        let tx = tx_at(TradeType::Buy, PaymentMethod::Cash, noon(day));
        assert_eq!(condition.matches(&tx), expected);
    }

    #[test]
    fn test_rfc3339_filter_is_exact() {
        let condition = filter("lt", "created_at", "2026-01-15T12:00:00Z").parse().unwrap();
        assert_eq!(
            condition,
            FilterCondition::CreatedAt(TimePredicate::Before(noon(15)))
        );
        assert!(!condition.matches(&tx_at(TradeType::Buy, PaymentMethod::Cash, noon(15))));
        assert!(condition.matches(&tx_at(TradeType::Buy, PaymentMethod::Cash, noon(14))));
    }

    #[test]
    fn test_enum_filters() {
        let sell = tx_at(TradeType::Sell, PaymentMethod::Upi, noon(1));

        assert!(filter("eq", "type", "sell").parse().unwrap().matches(&sell));
        assert!(!filter("ne", "type", "sell").parse().unwrap().matches(&sell));
        assert!(filter("ne", "payment_method", "cash").parse().unwrap().matches(&sell));
        assert!(filter("eq", "payment_method", "upi").parse().unwrap().matches(&sell));
    }

    #[rstest]
    #[case(filter("gt", "type", "buy"))]
    #[case(filter("lte", "payment_method", "cash"))]
    #[case(filter("eq", "type", "lend"))]
    #[case(filter("eq", "payment_method", "iou"))]
    #[case(filter("like", "type", "buy"))]
    #[case(filter("eq", "amount", "5"))]
    #[case(filter("eq", "created_at", "15/01/2026"))]
    fn test_invalid_filters(#[case] f: TransactionFilter) {
        assert!(matches!(f.parse(), Err(ReportError::InvalidFilter(_))));
    }

    #[test]
    fn test_parse_filters_stops_at_first_error() {
        let filters = vec![filter("eq", "type", "buy"), filter("gt", "type", "sell")];
        assert!(parse_filters(&filters).is_err());

        let filters = vec![
            filter("eq", "type", "buy"),
            filter("gte", "created_at", "2026-01-01"),
        ];
        assert_eq!(parse_filters(&filters).unwrap().len(), 2);
    }
}
