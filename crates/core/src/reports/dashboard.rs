//! Dashboard totals.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::{PaymentMethod, TradeType, Transaction};

/// Totals over the transactions in a dashboard window.
///
/// The given/taken split follows the store balance rules: buys on deferred
/// settlement count as given, sells as taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    /// Money advanced on `buy` + `borrowed_money`.
    pub amount_given: Decimal,
    /// Money received on `sell` + `borrowed_money`.
    pub amount_taken: Decimal,
    /// Gold advanced on `buy` + `borrowed_gold`.
    pub gold_given: Decimal,
    /// Gold received on `sell` + `borrowed_gold`.
    pub gold_taken: Decimal,
    /// Gold weight over every transaction.
    pub total_gold_transaction: Decimal,
    /// Amount over every transaction.
    pub total_amount_transaction: Decimal,
}

impl DashboardSummary {
    /// Adds one transaction to the totals.
    pub fn record(&mut self, tx: &Transaction) {
        match (tx.trade_type, tx.payment_method) {
            (TradeType::Buy, PaymentMethod::BorrowedMoney) => {
                self.amount_given = self.amount_given.saturating_add(tx.amount);
            }
            (TradeType::Buy, PaymentMethod::BorrowedGold) => {
                self.gold_given = self.gold_given.saturating_add(tx.gold_weight);
            }
            (TradeType::Sell, PaymentMethod::BorrowedMoney) => {
                self.amount_taken = self.amount_taken.saturating_add(tx.amount);
            }
            (TradeType::Sell, PaymentMethod::BorrowedGold) => {
                self.gold_taken = self.gold_taken.saturating_add(tx.gold_weight);
            }
            (_, PaymentMethod::Cash | PaymentMethod::Upi) => {}
        }
        self.total_gold_transaction = self.total_gold_transaction.saturating_add(tx.gold_weight);
        self.total_amount_transaction = self.total_amount_transaction.saturating_add(tx.amount);
    }

    /// Totals over a set of transactions.
    #[must_use]
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        transactions.into_iter().fold(Self::default(), |mut summary, tx| {
            summary.record(tx);
            summary
        })
    }
}
