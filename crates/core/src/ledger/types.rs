//! Ledger domain types for gold trades.
//!
//! Customers and stores carry running balance mirrors that only the
//! transaction poster mutates. Transactions are immutable once recorded.

use chrono::{DateTime, Utc};
use goldbook_shared::types::{AdminId, CustomerId, StoreId, TransactionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;

/// Largest number of decimal places accepted for weight and price.
pub const MAX_INPUT_SCALE: u32 = 4;

/// Exclusive bound on the magnitude of every stored quantity, 10^20.
///
/// Ledger columns are `NUMERIC(28, 8)`. Inputs carry at most
/// [`MAX_INPUT_SCALE`] places, so any product below this bound has at most
/// 28 significant digits and is computed without rounding.
pub const MAX_MAGNITUDE: Decimal = Decimal::from_parts(0x6310_0000, 0x6BC7_5E2D, 0x5, false, 0);

/// Returns true if `value` fits the ledger columns.
#[must_use]
pub fn within_magnitude(value: Decimal) -> bool {
    value.abs() < MAX_MAGNITUDE
}

/// Longest accepted transaction description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Direction of a trade, seen from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    /// The store buys gold from the customer.
    Buy,
    /// The store sells gold to the customer.
    Sell,
}

impl TradeType {
    /// Returns the wire name of the trade type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl std::fmt::Display for TradeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TradeType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            other => Err(LedgerError::UnknownTradeType(other.to_string())),
        }
    }
}

/// How a trade is settled.
///
/// `Cash` and `Upi` settle immediately. The borrowed methods defer settlement
/// and move the running debt balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Settled in cash.
    Cash,
    /// Settlement deferred as gold owed.
    BorrowedGold,
    /// Settlement deferred as money owed.
    BorrowedMoney,
    /// Settled by UPI transfer.
    Upi,
}

impl PaymentMethod {
    /// Returns the wire name of the payment method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::BorrowedGold => "borrowed_gold",
            Self::BorrowedMoney => "borrowed_money",
            Self::Upi => "upi",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "borrowed_gold" => Ok(Self::BorrowedGold),
            "borrowed_money" => Ok(Self::BorrowedMoney),
            "upi" => Ok(Self::Upi),
            other => Err(LedgerError::UnknownPaymentMethod(other.to_string())),
        }
    }
}

/// Running totals kept on a customer.
///
/// `borrowed_gold` and `borrowed_amount` are signed: positive means the store
/// owes the customer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerBalance {
    /// Net gold owed between store and customer, in grams.
    pub borrowed_gold: Decimal,
    /// Gold the store bought from this customer, in grams.
    pub total_bought: Decimal,
    /// Gold the store sold to this customer, in grams.
    pub total_sold: Decimal,
    /// Net money owed between store and customer.
    pub borrowed_amount: Decimal,
}

/// Running totals kept on a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreBalance {
    /// Net gold on hand, in grams.
    pub total_gold: Decimal,
    /// Net money on hand. Not moved by posting.
    pub total_amount: Decimal,
    /// Gold received from customers on deferred settlement.
    pub gold_taken: Decimal,
    /// Money received from customers on deferred settlement.
    pub amount_taken: Decimal,
    /// Gold advanced to customers on deferred settlement.
    pub gold_given: Decimal,
    /// Money advanced to customers on deferred settlement.
    pub amount_given: Decimal,
}

/// A customer of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer ID.
    pub id: CustomerId,
    /// Display name.
    pub name: String,
    /// Unique phone number.
    pub phone: String,
    /// Postal address.
    pub address: String,
    /// Running totals.
    #[serde(flatten)]
    pub balance: CustomerBalance,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// A store and the admins allowed to post against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    /// Store ID.
    pub id: StoreId,
    /// Unique store name.
    pub name: String,
    /// Admin who created the store, if still present.
    pub created_by: Option<AdminId>,
    /// Admins allowed to manage the store.
    pub managers: Vec<AdminId>,
    /// Running totals.
    #[serde(flatten)]
    pub balance: StoreBalance,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// An operator account. The password hash never leaves the db crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    /// Admin ID.
    pub id: AdminId,
    /// Display name.
    pub name: String,
    /// Unique email.
    pub email: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A validated trade: positive weight and price with a computed amount.
///
/// Only [`Trade::new`] and recorded transactions produce values, so every
/// `Trade` satisfies `amount == gold_weight * gold_price` exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trade {
    trade_type: TradeType,
    payment_method: PaymentMethod,
    gold_weight: Decimal,
    gold_price: Decimal,
    amount: Decimal,
}

impl Trade {
    /// Validates weight and price and computes the amount.
    ///
    /// # Errors
    ///
    /// Returns a validation error if weight or price is not strictly
    /// positive, carries more than [`MAX_INPUT_SCALE`] decimal places, is not
    /// below [`MAX_MAGNITUDE`], or if the amount reaches [`MAX_MAGNITUDE`].
    pub fn new(
        trade_type: TradeType,
        payment_method: PaymentMethod,
        gold_weight: Decimal,
        gold_price: Decimal,
    ) -> Result<Self, LedgerError> {
        if gold_weight <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveWeight(gold_weight));
        }
        if gold_price <= Decimal::ZERO {
            return Err(LedgerError::NonPositivePrice(gold_price));
        }
        if gold_weight.normalize().scale() > MAX_INPUT_SCALE {
            return Err(LedgerError::ExcessivePrecision {
                field: "gold_weight",
                max_scale: MAX_INPUT_SCALE,
            });
        }
        if gold_price.normalize().scale() > MAX_INPUT_SCALE {
            return Err(LedgerError::ExcessivePrecision {
                field: "gold_price",
                max_scale: MAX_INPUT_SCALE,
            });
        }
        if !within_magnitude(gold_weight) {
            return Err(LedgerError::ExcessiveMagnitude { field: "gold_weight" });
        }
        if !within_magnitude(gold_price) {
            return Err(LedgerError::ExcessiveMagnitude { field: "gold_price" });
        }
        let amount = gold_weight
            .checked_mul(gold_price)
            .filter(|amount| within_magnitude(*amount))
            .ok_or(LedgerError::AmountOverflow)?;

        Ok(Self {
            trade_type,
            payment_method,
            gold_weight,
            gold_price,
            amount,
        })
    }

    /// Buy or sell.
    #[must_use]
    pub const fn trade_type(&self) -> TradeType {
        self.trade_type
    }

    /// Settlement method.
    #[must_use]
    pub const fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Gold weight in grams.
    #[must_use]
    pub const fn gold_weight(&self) -> Decimal {
        self.gold_weight
    }

    /// Price per gram.
    #[must_use]
    pub const fn gold_price(&self) -> Decimal {
        self.gold_price
    }

    /// `gold_weight * gold_price`.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }
}

/// A transaction ready to be written to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// Pre-generated ID.
    pub id: TransactionId,
    /// Customer the trade was made with.
    pub customer_id: CustomerId,
    /// Store the trade was posted against.
    pub store_id: StoreId,
    /// Admin who posted it.
    pub posted_by: AdminId,
    /// The validated trade.
    pub trade: Trade,
    /// Free-text description.
    pub description: String,
}

/// A recorded, immutable gold transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID.
    pub id: TransactionId,
    /// Customer the trade was made with.
    pub customer_id: CustomerId,
    /// Store the trade was posted against.
    pub store_id: StoreId,
    /// Admin who posted it, if that admin still exists.
    pub posted_by: Option<AdminId>,
    /// Buy or sell.
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    /// Gold weight in grams.
    pub gold_weight: Decimal,
    /// Price per gram.
    pub gold_price: Decimal,
    /// `gold_weight * gold_price`.
    pub amount: Decimal,
    /// Settlement method.
    pub payment_method: PaymentMethod,
    /// Free-text description.
    pub description: String,
    /// Time the transaction was recorded.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Builds the recorded form of a new transaction.
    #[must_use]
    pub fn recorded(new: &NewTransaction, created_at: DateTime<Utc>) -> Self {
        Self {
            id: new.id,
            customer_id: new.customer_id,
            store_id: new.store_id,
            posted_by: Some(new.posted_by),
            trade_type: new.trade.trade_type,
            gold_weight: new.trade.gold_weight,
            gold_price: new.trade.gold_price,
            amount: new.trade.amount,
            payment_method: new.trade.payment_method,
            description: new.description.clone(),
            created_at,
        }
    }

    /// Returns the trade this transaction recorded.
    #[must_use]
    pub const fn trade(&self) -> Trade {
        Trade {
            trade_type: self.trade_type,
            payment_method: self.payment_method,
            gold_weight: self.gold_weight,
            gold_price: self.gold_price,
            amount: self.amount,
        }
    }
}

/// Input to [`super::TransactionPoster::post`].
#[derive(Debug, Clone)]
pub struct PostTransactionInput {
    /// Admin posting the trade.
    pub admin_id: AdminId,
    /// Customer the trade is made with.
    pub customer_id: CustomerId,
    /// Name of the store to post against.
    pub store_name: String,
    /// Buy or sell.
    pub trade_type: TradeType,
    /// Gold weight in grams.
    pub gold_weight: Decimal,
    /// Price per gram.
    pub gold_price: Decimal,
    /// Settlement method.
    pub payment_method: PaymentMethod,
    /// Free-text description.
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_trade_computes_exact_amount() {
        let trade = Trade::new(TradeType::Sell, PaymentMethod::Cash, dec!(10), dec!(5000)).unwrap();
        assert_eq!(trade.amount(), dec!(50000));

        let trade =
            Trade::new(TradeType::Buy, PaymentMethod::Upi, dec!(0.1), dec!(0.2)).unwrap();
        assert_eq!(trade.amount(), dec!(0.02));
    }

    #[rstest]
    #[case(dec!(0), dec!(5000))]
    #[case(dec!(-1), dec!(5000))]
    fn test_trade_rejects_non_positive_weight(#[case] weight: Decimal, #[case] price: Decimal) {
        let err = Trade::new(TradeType::Buy, PaymentMethod::Cash, weight, price).unwrap_err();
        assert!(matches!(err, LedgerError::NonPositiveWeight(_)));
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-0.5))]
    fn test_trade_rejects_non_positive_price(#[case] price: Decimal) {
        let err = Trade::new(TradeType::Buy, PaymentMethod::Cash, dec!(1), price).unwrap_err();
        assert!(matches!(err, LedgerError::NonPositivePrice(_)));
    }

    #[test]
    fn test_trade_rejects_excess_precision() {
        let err = Trade::new(TradeType::Buy, PaymentMethod::Cash, dec!(1.00001), dec!(1))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::ExcessivePrecision {
                field: "gold_weight",
                ..
            }
        ));

        // Trailing zeros do not count.
        assert!(Trade::new(TradeType::Buy, PaymentMethod::Cash, dec!(1.50000), dec!(1)).is_ok());
    }

    #[test]
    fn test_max_magnitude_is_ten_to_the_twentieth() {
        assert_eq!(MAX_MAGNITUDE, dec!(100000000000000000000));
        assert!(within_magnitude(dec!(99999999999999999999.99999999)));
        assert!(!within_magnitude(dec!(-100000000000000000000)));
    }

    #[rstest]
    #[case(Decimal::MAX, dec!(2), "gold_weight")]
    #[case(dec!(100000000000000000000), dec!(1), "gold_weight")]
    #[case(dec!(1234567890123456789012.3456), dec!(1.0001), "gold_weight")]
    #[case(dec!(1), dec!(100000000000000000000), "gold_price")]
    fn test_trade_rejects_quantities_outside_columns(
        #[case] weight: Decimal,
        #[case] price: Decimal,
        #[case] expected: &str,
    ) {
        let err = Trade::new(TradeType::Buy, PaymentMethod::Cash, weight, price).unwrap_err();
        assert!(matches!(err, LedgerError::ExcessiveMagnitude { field } if field == expected));
    }

    #[rstest]
    #[case(dec!(100000000000), dec!(10000000000))]
    #[case(dec!(1000000000000000), dec!(10000000000))]
    #[case(dec!(12345678901.2345), dec!(12345678901.2345))]
    fn test_trade_rejects_amount_outside_columns(#[case] weight: Decimal, #[case] price: Decimal) {
        let err = Trade::new(TradeType::Sell, PaymentMethod::Cash, weight, price).unwrap_err();
        assert!(matches!(err, LedgerError::AmountOverflow));
    }

    #[test]
    fn test_largest_accepted_amount_is_exact() {
        let trade = Trade::new(
            TradeType::Buy,
            PaymentMethod::BorrowedMoney,
            dec!(9999999999.9999),
            dec!(9999999999.9999),
        )
        .unwrap();
        assert_eq!(trade.amount(), dec!(99999999999998000000.00000001));
        assert_eq!(trade.amount().scale(), 8);
    }

    #[rstest]
    #[case("buy", TradeType::Buy)]
    #[case("sell", TradeType::Sell)]
    fn test_trade_type_parse(#[case] raw: &str, #[case] expected: TradeType) {
        assert_eq!(TradeType::from_str(raw).unwrap(), expected);
        assert_eq!(expected.to_string(), raw);
    }

    #[rstest]
    #[case("cash", PaymentMethod::Cash)]
    #[case("borrowed_gold", PaymentMethod::BorrowedGold)]
    #[case("borrowed_money", PaymentMethod::BorrowedMoney)]
    #[case("upi", PaymentMethod::Upi)]
    fn test_payment_method_parse(#[case] raw: &str, #[case] expected: PaymentMethod) {
        assert_eq!(PaymentMethod::from_str(raw).unwrap(), expected);
        assert_eq!(expected.to_string(), raw);
    }

    #[test]
    fn test_unknown_enum_values_are_validation_errors() {
        assert!(matches!(
            TradeType::from_str("lend"),
            Err(LedgerError::UnknownTradeType(v)) if v == "lend"
        ));
        assert!(matches!(
            PaymentMethod::from_str("CASH"),
            Err(LedgerError::UnknownPaymentMethod(_))
        ));
    }

    #[test]
    fn test_transaction_serializes_type_field() {
        let new = NewTransaction {
            id: TransactionId::new(),
            customer_id: CustomerId::new(),
            store_id: StoreId::new(),
            posted_by: AdminId::new(),
            trade: Trade::new(TradeType::Sell, PaymentMethod::BorrowedGold, dec!(10), dec!(5000))
                .unwrap(),
            description: "ring".to_string(),
        };
        let tx = Transaction::recorded(&new, Utc::now());
        let json = serde_json::to_value(&tx).unwrap();

        assert_eq!(json["type"], "sell");
        assert_eq!(json["payment_method"], "borrowed_gold");
        assert_eq!(json["amount"], "50000");
        assert_eq!(tx.trade(), new.trade);
    }
}
