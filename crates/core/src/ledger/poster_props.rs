//! Property-based tests for the transaction poster.
//!
//! - Rejected posts leave customer, store and log unchanged
//! - A committed post moves both mirrors exactly as the balance rules say
//! - Concurrent posts against one customer and store serialize cleanly

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::balance::apply_trade;
use super::error::ErrorKind;
use super::memory::InMemoryLedger;
use super::poster::TransactionPoster;
use super::types::{PaymentMethod, PostTransactionInput, Trade, TradeType};
use goldbook_shared::types::AdminId;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
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

fn weight() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

fn price() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|v| Decimal::new(v, 2))
}

/// Non-positive quantities, including zero.
fn non_positive() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..=0i64).prop_map(|v| Decimal::new(v, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_committed_post_applies_rules(
        t in trade_type(),
        m in payment_method(),
        w in weight(),
        p in price(),
    ) {
        let ledger = InMemoryLedger::default();
        let admin = AdminId::new();
        ledger.add_store("Main", &[admin]);
        let customer_id = ledger.add_customer("C");
        let customer_before = ledger.customer(customer_id).unwrap();
        let store_before = ledger.store("Main").unwrap();

        let poster = TransactionPoster::new(ledger.clone());
        let tx = runtime().block_on(poster.post(PostTransactionInput {
            admin_id: admin,
            customer_id,
            store_name: "Main".to_string(),
            trade_type: t,
            gold_weight: w,
            gold_price: p,
            payment_method: m,
            description: String::new(),
        })).unwrap();

        let expected = apply_trade(
            &Trade::new(t, m, w, p).unwrap(),
            &customer_before.balance,
            &store_before.balance,
        ).unwrap();

        prop_assert_eq!(tx.amount, w * p);
        prop_assert_eq!(ledger.customer(customer_id).unwrap().balance, expected.customer);
        prop_assert_eq!(ledger.store("Main").unwrap().balance, expected.store);
        prop_assert_eq!(ledger.transactions().len(), 1);
    }

    #[test]
    fn prop_non_positive_quantities_have_no_side_effects(
        t in trade_type(),
        m in payment_method(),
        bad in non_positive(),
        good in price(),
        bad_weight in any::<bool>(),
    ) {
        let ledger = InMemoryLedger::default();
        let admin = AdminId::new();
        ledger.add_store("Main", &[admin]);
        let customer_id = ledger.add_customer("C");
        let before = ledger.snapshot();

        let (gold_weight, gold_price) = if bad_weight { (bad, good) } else { (good, bad) };
        let poster = TransactionPoster::new(ledger.clone());
        let err = runtime().block_on(poster.post(PostTransactionInput {
            admin_id: admin,
            customer_id,
            store_name: "Main".to_string(),
            trade_type: t,
            gold_weight,
            gold_price,
            payment_method: m,
            description: String::new(),
        })).unwrap_err();

        prop_assert_eq!(err.kind(), ErrorKind::Validation);
        prop_assert_eq!(ledger.snapshot(), before);
        prop_assert_eq!(ledger.stats().begun, 0);
    }

    #[test]
    fn prop_outsider_posts_have_no_side_effects(
        t in trade_type(),
        m in payment_method(),
        w in weight(),
        p in price(),
    ) {
        let ledger = InMemoryLedger::default();
        ledger.add_store("Main", &[AdminId::new()]);
        let customer_id = ledger.add_customer("C");
        let before = ledger.snapshot();

        let poster = TransactionPoster::new(ledger.clone());
        let err = runtime().block_on(poster.post(PostTransactionInput {
            admin_id: AdminId::new(),
            customer_id,
            store_name: "Main".to_string(),
            trade_type: t,
            gold_weight: w,
            gold_price: p,
            payment_method: m,
            description: String::new(),
        })).unwrap_err();

        prop_assert_eq!(err.kind(), ErrorKind::Forbidden);
        prop_assert_eq!(ledger.snapshot(), before);
    }
}

#[test]
fn concurrent_posts_serialize() {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .unwrap();

    let ledger = InMemoryLedger::default();
    let admin = AdminId::new();
    ledger.add_store("Main", &[admin]);
    let customer_id = ledger.add_customer("C");
    let poster = std::sync::Arc::new(TransactionPoster::new(ledger.clone()));

    rt.block_on(async {
        let handles: Vec<_> = (0..32)
            .map(|i| {
                let poster = std::sync::Arc::clone(&poster);
                let trade_type = if i % 2 == 0 { TradeType::Buy } else { TradeType::Sell };
                tokio::spawn(async move {
                    poster
                        .post(PostTransactionInput {
                            admin_id: admin,
                            customer_id,
                            store_name: "Main".to_string(),
                            trade_type,
                            gold_weight: Decimal::ONE,
                            gold_price: Decimal::ONE_HUNDRED,
                            payment_method: PaymentMethod::BorrowedGold,
                            description: format!("post {i}"),
                        })
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
    });

    let customer = ledger.customer(customer_id).unwrap();
    let store = ledger.store("Main").unwrap();
    assert_eq!(ledger.transactions().len(), 32);
    assert_eq!(customer.balance.total_bought, Decimal::from(16));
    assert_eq!(customer.balance.total_sold, Decimal::from(16));
    assert_eq!(customer.balance.borrowed_gold, Decimal::ZERO);
    assert_eq!(store.balance.gold_given, Decimal::from(16));
    assert_eq!(store.balance.gold_taken, Decimal::from(16));
    assert_eq!(store.balance.total_gold, Decimal::ZERO);
}
