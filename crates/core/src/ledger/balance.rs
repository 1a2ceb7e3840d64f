//! Balance update rules.
//!
//! | Type | Payment method | Customer | Store |
//! |---|---|---|---|
//! | buy | any | `total_bought += weight` | `total_gold -= weight` |
//! | buy | borrowed_gold | `borrowed_gold += weight` | `gold_given += weight` |
//! | buy | borrowed_money | `borrowed_amount += amount` | `amount_given += amount` |
//! | sell | any | `total_sold += weight` | `total_gold += weight` |
//! | sell | borrowed_gold | `borrowed_gold -= weight` | `gold_taken += weight` |
//! | sell | borrowed_money | `borrowed_amount -= amount` | `amount_taken += amount` |
//!
//! Cash and UPI only get the unconditional rows. `total_amount` is never moved.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{
    CustomerBalance, PaymentMethod, StoreBalance, Trade, TradeType, Transaction, within_magnitude,
};

/// New balances produced by applying one trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceUpdate {
    /// Customer balance after the trade.
    pub customer: CustomerBalance,
    /// Store balance after the trade.
    pub store: StoreBalance,
}

fn add(value: Decimal, delta: Decimal) -> Result<Decimal, LedgerError> {
    value
        .checked_add(delta)
        .filter(|total| within_magnitude(*total))
        .ok_or(LedgerError::AmountOverflow)
}

fn sub(value: Decimal, delta: Decimal) -> Result<Decimal, LedgerError> {
    value
        .checked_sub(delta)
        .filter(|total| within_magnitude(*total))
        .ok_or(LedgerError::AmountOverflow)
}

/// Applies a trade to customer and store balance snapshots.
///
/// Pure: the inputs are left untouched and no I/O happens.
///
/// # Errors
///
/// Returns `LedgerError::AmountOverflow` if a running total would reach
/// [`super::types::MAX_MAGNITUDE`].
pub fn apply_trade(
    trade: &Trade,
    customer: &CustomerBalance,
    store: &StoreBalance,
) -> Result<BalanceUpdate, LedgerError> {
    let mut customer = *customer;
    let mut store = *store;
    let weight = trade.gold_weight();
    let amount = trade.amount();

    match trade.trade_type() {
        TradeType::Buy => {
            customer.total_bought = add(customer.total_bought, weight)?;
            store.total_gold = sub(store.total_gold, weight)?;

            match trade.payment_method() {
                PaymentMethod::BorrowedGold => {
                    customer.borrowed_gold = add(customer.borrowed_gold, weight)?;
                    store.gold_given = add(store.gold_given, weight)?;
                }
                PaymentMethod::BorrowedMoney => {
                    customer.borrowed_amount = add(customer.borrowed_amount, amount)?;
                    store.amount_given = add(store.amount_given, amount)?;
                }
                PaymentMethod::Cash | PaymentMethod::Upi => {}
            }
        }
        TradeType::Sell => {
            customer.total_sold = add(customer.total_sold, weight)?;
            store.total_gold = add(store.total_gold, weight)?;

            match trade.payment_method() {
                PaymentMethod::BorrowedGold => {
                    customer.borrowed_gold = sub(customer.borrowed_gold, weight)?;
                    store.gold_taken = add(store.gold_taken, weight)?;
                }
                PaymentMethod::BorrowedMoney => {
                    customer.borrowed_amount = sub(customer.borrowed_amount, amount)?;
                    store.amount_taken = add(store.amount_taken, amount)?;
                }
                PaymentMethod::Cash | PaymentMethod::Upi => {}
            }
        }
    }

    Ok(BalanceUpdate { customer, store })
}

/// Rebuilds a customer's balance from zero by replaying its transactions.
///
/// # Errors
///
/// Returns `LedgerError::AmountOverflow` if a running total overflows.
pub fn replay_customer<'a, I>(transactions: I) -> Result<CustomerBalance, LedgerError>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let store = StoreBalance::default();
    transactions
        .into_iter()
        .try_fold(CustomerBalance::default(), |customer, tx| {
            apply_trade(&tx.trade(), &customer, &store).map(|update| update.customer)
        })
}

/// Rebuilds a store's balance from zero by replaying its transactions.
///
/// `total_amount` starts at `opening_total_amount` since posting never moves
/// it. Every other field starts at zero.
///
/// # Errors
///
/// Returns `LedgerError::AmountOverflow` if a running total overflows.
pub fn replay_store<'a, I>(
    opening_total_amount: Decimal,
    transactions: I,
) -> Result<StoreBalance, LedgerError>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let customer = CustomerBalance::default();
    let opening = StoreBalance {
        total_amount: opening_total_amount,
        ..StoreBalance::default()
    };
    transactions.into_iter().try_fold(opening, |store, tx| {
        apply_trade(&tx.trade(), &customer, &store).map(|update| update.store)
    })
}
