//! CSV export of transaction reports.

use rust_decimal::Decimal;
use serde::Serialize;

use super::error::ReportError;
use crate::ledger::Transaction;

/// File name offered for report downloads.
pub const REPORT_FILE_NAME: &str = "transactions_report.csv";

/// Column header of the report.
pub const REPORT_HEADER: [&str; 8] = [
    "customer_name",
    "amount",
    "transaction_type",
    "gold_weight",
    "gold_price",
    "payment_method",
    "time",
    "description",
];

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A transaction joined with its customer's name.
#[derive(Debug, Clone)]
pub struct ReportLine {
    /// Name of the customer the trade was made with.
    pub customer_name: String,
    /// The transaction.
    pub transaction: Transaction,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    customer_name: &'a str,
    amount: Decimal,
    transaction_type: &'static str,
    gold_weight: Decimal,
    gold_price: Decimal,
    payment_method: &'static str,
    time: String,
    description: &'a str,
}

impl<'a> From<&'a ReportLine> for CsvRow<'a> {
    fn from(line: &'a ReportLine) -> Self {
        let tx = &line.transaction;
        Self {
            customer_name: &line.customer_name,
            amount: tx.amount,
            transaction_type: tx.trade_type.as_str(),
            gold_weight: tx.gold_weight,
            gold_price: tx.gold_price,
            payment_method: tx.payment_method.as_str(),
            time: tx.created_at.format(TIME_FORMAT).to_string(),
            description: &tx.description,
        }
    }
}

/// Renders report lines as CSV, grouped by payment method.
///
/// Rows are ordered by payment method name, then by time. The header is
/// written even when there are no rows.
///
/// # Errors
///
/// Returns `ReportError::Export` if serialization fails.
pub fn transactions_csv(mut lines: Vec<ReportLine>) -> Result<Vec<u8>, ReportError> {
    lines.sort_by(|a, b| {
        a.transaction
            .payment_method
            .as_str()
            .cmp(b.transaction.payment_method.as_str())
            .then(a.transaction.created_at.cmp(&b.transaction.created_at))
    });

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(REPORT_HEADER)?;
    for line in &lines {
        writer.serialize(CsvRow::from(line))?;
    }

    writer
        .into_inner()
        .map_err(|e| ReportError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{NewTransaction, PaymentMethod, Trade, TradeType};
    use chrono::{TimeZone, Utc};
    use goldbook_shared::types::{AdminId, CustomerId, StoreId, TransactionId};
    use rust_decimal_macros::dec;

    fn line(name: &str, method: PaymentMethod, hour: u32, description: &str) -> ReportLine {
        let new = NewTransaction {
            id: TransactionId::new(),
            customer_id: CustomerId::new(),
            store_id: StoreId::new(),
            posted_by: AdminId::new(),
            trade: Trade::new(TradeType::Sell, method, dec!(10), dec!(5000)).unwrap(),
            description: description.to_string(),
        };
        ReportLine {
            customer_name: name.to_string(),
            transaction: Transaction::recorded(
                &new,
                Utc.with_ymd_and_hms(2026, 1, 15, hour, 30, 0).unwrap(),
            ),
        }
    }

    #[test]
    fn test_empty_report_has_header() {
        let csv = String::from_utf8(transactions_csv(Vec::new()).unwrap()).unwrap();
        assert_eq!(
            csv,
            "customer_name,amount,transaction_type,gold_weight,gold_price,payment_method,time,description\n"
        );
    }

    #[test]
    fn test_rows_sorted_by_payment_method() {
        let lines = vec![
            line("Ravi", PaymentMethod::Upi, 9, "chain"),
            line("Asha", PaymentMethod::Cash, 11, "ring"),
            line("Meena", PaymentMethod::BorrowedGold, 10, "coin, 24k"),
        ];
        let csv = String::from_utf8(transactions_csv(lines).unwrap()).unwrap();
        let rows: Vec<&str> = csv.lines().collect();

        assert_eq!(rows.len(), 4);
        assert_eq!(
            rows[1],
            "Meena,50000,sell,10,5000,borrowed_gold,2026-01-15 10:30:00,\"coin, 24k\""
        );
        assert!(rows[2].starts_with("Asha,"));
        assert!(rows[3].starts_with("Ravi,"));
    }
}
