//! Property-based tests for the balance update rules.
//!
//! - Buy/cash only moves `total_bought` and `total_gold`
//! - Sell/borrowed_gold moves `borrowed_gold`, `gold_taken` and `total_gold`
//! - The amount is exactly weight times price
//! - Customer and store mirrors stay in step over any trade sequence
//! - Replaying a history reproduces the incrementally applied balances

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::{apply_trade, replay_customer, replay_store};
use super::types::{
    CustomerBalance, NewTransaction, PaymentMethod, StoreBalance, Trade, TradeType, Transaction,
};
use chrono::Utc;
use goldbook_shared::types::{AdminId, CustomerId, StoreId, TransactionId};

/// Weights from 0.0001 g to 10 kg, at most 4 decimal places.
fn weight() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

/// Prices from 0.01 to 100,000.00 per gram.
fn price() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|v| Decimal::new(v, 2))
}

fn trade_type() -> impl Strategy<Value = TradeType> {
    prop_oneof![Just(TradeType::Buy), Just(TradeType::Sell)]
}

fn payment_method() -> impl Strategy<Value = PaymentMethod> {
    prop_oneof![
        Just(PaymentMethod::Cash),
        Just(PaymentMethod::BorrowedGold),
        Just(PaymentMethod::BorrowedMoney),
        Just(PaymentMethod::Upi),
    ]
}

fn trade() -> impl Strategy<Value = Trade> {
    (trade_type(), payment_method(), weight(), price())
        .prop_map(|(t, m, w, p)| Trade::new(t, m, w, p).unwrap())
}

/// Arbitrary (possibly negative) starting balances.
fn customer_balance() -> impl Strategy<Value = CustomerBalance> {
    let v = || (-1_000_000_000i64..1_000_000_000i64).prop_map(|n| Decimal::new(n, 4));
    (v(), v(), v(), v()).prop_map(|(borrowed_gold, total_bought, total_sold, borrowed_amount)| {
        CustomerBalance {
            borrowed_gold,
            total_bought,
            total_sold,
            borrowed_amount,
        }
    })
}

fn store_balance() -> impl Strategy<Value = StoreBalance> {
    let v = || (-1_000_000_000i64..1_000_000_000i64).prop_map(|n| Decimal::new(n, 4));
    (v(), v(), v(), v(), v(), v()).prop_map(
        |(total_gold, total_amount, gold_taken, amount_taken, gold_given, amount_given)| {
            StoreBalance {
                total_gold,
                total_amount,
                gold_taken,
                amount_taken,
                gold_given,
                amount_given,
            }
        },
    )
}

fn recorded(trade: Trade) -> Transaction {
    let new = NewTransaction {
        id: TransactionId::new(),
        customer_id: CustomerId::new(),
        store_id: StoreId::new(),
        posted_by: AdminId::new(),
        trade,
        description: String::new(),
    };
    Transaction::recorded(&new, Utc::now())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_buy_cash_moves_only_unconditional_fields(
        w in weight(),
        p in price(),
        customer in customer_balance(),
        store in store_balance(),
    ) {
        let t = Trade::new(TradeType::Buy, PaymentMethod::Cash, w, p).unwrap();
        let update = apply_trade(&t, &customer, &store).unwrap();

        prop_assert_eq!(update.customer, CustomerBalance {
            total_bought: customer.total_bought + w,
            ..customer
        });
        prop_assert_eq!(update.store, StoreBalance {
            total_gold: store.total_gold - w,
            ..store
        });
    }

    #[test]
    fn prop_sell_borrowed_gold(
        w in weight(),
        p in price(),
        customer in customer_balance(),
        store in store_balance(),
    ) {
        let t = Trade::new(TradeType::Sell, PaymentMethod::BorrowedGold, w, p).unwrap();
        let update = apply_trade(&t, &customer, &store).unwrap();

        prop_assert_eq!(update.customer, CustomerBalance {
            borrowed_gold: customer.borrowed_gold - w,
            total_sold: customer.total_sold + w,
            ..customer
        });
        prop_assert_eq!(update.store, StoreBalance {
            total_gold: store.total_gold + w,
            gold_taken: store.gold_taken + w,
            ..store
        });
    }

    #[test]
    fn prop_amount_is_exact_product(t in trade_type(), m in payment_method(), w in weight(), p in price()) {
        let trade = Trade::new(t, m, w, p).unwrap();
        prop_assert_eq!(trade.amount(), w * p);
        // At most 4 + 2 decimal places, so nothing was rounded away.
        prop_assert!(trade.amount().scale() <= 6);
    }

    #[test]
    fn prop_total_amount_is_never_moved(t in trade(), store in store_balance()) {
        let update = apply_trade(&t, &CustomerBalance::default(), &store).unwrap();
        prop_assert_eq!(update.store.total_amount, store.total_amount);
    }

    #[test]
    fn prop_mirrors_stay_in_step(trades in prop::collection::vec(trade(), 0..40)) {
        let mut customer = CustomerBalance::default();
        let mut store = StoreBalance::default();
        for t in &trades {
            let update = apply_trade(t, &customer, &store).unwrap();
            customer = update.customer;
            store = update.store;
        }

        // One customer against one store: both sides describe the same debts.
        prop_assert_eq!(customer.borrowed_gold, store.gold_given - store.gold_taken);
        prop_assert_eq!(customer.borrowed_amount, store.amount_given - store.amount_taken);
        prop_assert_eq!(store.total_gold, customer.total_sold - customer.total_bought);
    }

    #[test]
    fn prop_replay_matches_incremental(trades in prop::collection::vec(trade(), 0..40)) {
        let mut customer = CustomerBalance::default();
        let mut store = StoreBalance::default();
        for t in &trades {
            let update = apply_trade(t, &customer, &store).unwrap();
            customer = update.customer;
            store = update.store;
        }

        let history: Vec<Transaction> = trades.into_iter().map(recorded).collect();
        prop_assert_eq!(replay_customer(&history).unwrap(), customer);
        prop_assert_eq!(replay_store(Decimal::ZERO, &history).unwrap(), store);
    }
}
