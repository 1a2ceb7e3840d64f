//! Postgres enum types.

use goldbook_core::ledger;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `trade_type` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "trade_type")]
pub enum TradeType {
    /// Store buys gold from the customer.
    #[sea_orm(string_value = "buy")]
    Buy,
    /// Store sells gold to the customer.
    #[sea_orm(string_value = "sell")]
    Sell,
}

/// `payment_method` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
pub enum PaymentMethod {
    /// Settled in cash.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Gold settlement deferred.
    #[sea_orm(string_value = "borrowed_gold")]
    BorrowedGold,
    /// Money settlement deferred.
    #[sea_orm(string_value = "borrowed_money")]
    BorrowedMoney,
    /// Settled by UPI transfer.
    #[sea_orm(string_value = "upi")]
    Upi,
}

impl From<ledger::TradeType> for TradeType {
    fn from(value: ledger::TradeType) -> Self {
        match value {
            ledger::TradeType::Buy => Self::Buy,
            ledger::TradeType::Sell => Self::Sell,
        }
    }
}

impl From<TradeType> for ledger::TradeType {
    fn from(value: TradeType) -> Self {
        match value {
            TradeType::Buy => Self::Buy,
            TradeType::Sell => Self::Sell,
        }
    }
}

impl From<ledger::PaymentMethod> for PaymentMethod {
    fn from(value: ledger::PaymentMethod) -> Self {
        match value {
            ledger::PaymentMethod::Cash => Self::Cash,
            ledger::PaymentMethod::BorrowedGold => Self::BorrowedGold,
            ledger::PaymentMethod::BorrowedMoney => Self::BorrowedMoney,
            ledger::PaymentMethod::Upi => Self::Upi,
        }
    }
}

impl From<PaymentMethod> for ledger::PaymentMethod {
    fn from(value: PaymentMethod) -> Self {
        match value {
            PaymentMethod::Cash => Self::Cash,
            PaymentMethod::BorrowedGold => Self::BorrowedGold,
            PaymentMethod::BorrowedMoney => Self::BorrowedMoney,
            PaymentMethod::Upi => Self::Upi,
        }
    }
}
