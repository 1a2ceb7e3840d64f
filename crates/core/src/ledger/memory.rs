//! In-memory ledger used by the poster tests.
//!
//! Each unit of work holds a global gate for its whole lifetime, so units are
//! serialized the way row locks serialize posts in the database. Writes go to
//! a private copy of the state that only `commit` publishes.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use goldbook_shared::types::{AdminId, CustomerId, StoreId};
use tokio::sync::OwnedMutexGuard;

use super::error::LedgerError;
use super::ports::{CustomerStore, StoreStore, TransactionLog, UnitOfWork, UnitOfWorkProvider};
use super::types::{
    Customer, CustomerBalance, NewTransaction, Store, StoreBalance, Transaction,
};

/// Where to inject a storage failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Begin,
    InsertTransaction,
    SaveCustomer,
    SaveStore,
    Commit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerState {
    pub customers: BTreeMap<CustomerId, Customer>,
    pub stores: BTreeMap<StoreId, Store>,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub begun: usize,
    pub committed: usize,
    pub rolled_back: usize,
}

#[derive(Debug, Default)]
struct Inner {
    state: LedgerState,
    stats: Stats,
    fail_at: Option<FailPoint>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    inner: Arc<Mutex<Inner>>,
    gate: Arc<tokio::sync::Mutex<()>>,
}

impl InMemoryLedger {
    pub fn add_store(&self, name: &str, managers: &[AdminId]) -> StoreId {
        let now = Utc::now();
        let store = Store {
            id: StoreId::new(),
            name: name.to_string(),
            created_by: managers.first().copied(),
            managers: managers.to_vec(),
            balance: StoreBalance::default(),
            created_at: now,
            updated_at: now,
        };
        let id = store.id;
        self.inner.lock().unwrap().state.stores.insert(id, store);
        id
    }

    pub fn add_customer(&self, name: &str) -> CustomerId {
        let now = Utc::now();
        let customer = Customer {
            id: CustomerId::new(),
            name: name.to_string(),
            phone: format!("+91-{}", CustomerId::new()),
            address: "Zaveri Bazaar".to_string(),
            balance: CustomerBalance::default(),
            created_at: now,
            updated_at: now,
        };
        let id = customer.id;
        self.inner
            .lock()
            .unwrap()
            .state
            .customers
            .insert(id, customer);
        id
    }

    pub fn customer(&self, id: CustomerId) -> Option<Customer> {
        self.inner.lock().unwrap().state.customers.get(&id).cloned()
    }

    pub fn store(&self, name: &str) -> Option<Store> {
        self.inner
            .lock()
            .unwrap()
            .state
            .stores
            .values()
            .find(|s| s.name == name)
            .cloned()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.inner.lock().unwrap().state.transactions.clone()
    }

    pub fn snapshot(&self) -> LedgerState {
        self.inner.lock().unwrap().state.clone()
    }

    pub fn stats(&self) -> Stats {
        self.inner.lock().unwrap().stats
    }

    pub fn fail_at(&self, point: FailPoint) {
        self.inner.lock().unwrap().fail_at = Some(point);
    }
}

fn injected() -> LedgerError {
    LedgerError::Persistence("injected failure".to_string())
}

pub struct InMemoryUnit {
    ledger: InMemoryLedger,
    working: LedgerState,
    fail_at: Option<FailPoint>,
    _gate: OwnedMutexGuard<()>,
}

impl InMemoryUnit {
    fn check(&self, point: FailPoint) -> Result<(), LedgerError> {
        if self.fail_at == Some(point) {
            Err(injected())
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UnitOfWorkProvider for InMemoryLedger {
    type Unit = InMemoryUnit;

    async fn begin(&self) -> Result<InMemoryUnit, LedgerError> {
        let gate = Arc::clone(&self.gate).lock_owned().await;
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_at == Some(FailPoint::Begin) {
            return Err(injected());
        }
        inner.stats.begun += 1;
        Ok(InMemoryUnit {
            ledger: self.clone(),
            working: inner.state.clone(),
            fail_at: inner.fail_at,
            _gate: gate,
        })
    }
}

#[async_trait]
impl CustomerStore for InMemoryUnit {
    async fn customer_by_id(&mut self, id: CustomerId) -> Result<Option<Customer>, LedgerError> {
        Ok(self.working.customers.get(&id).cloned())
    }

    async fn save_customer(&mut self, customer: &Customer) -> Result<(), LedgerError> {
        self.check(FailPoint::SaveCustomer)?;
        self.working.customers.insert(customer.id, customer.clone());
        Ok(())
    }
}

#[async_trait]
impl StoreStore for InMemoryUnit {
    async fn store_by_name(&mut self, name: &str) -> Result<Option<Store>, LedgerError> {
        Ok(self
            .working
            .stores
            .values()
            .find(|s| s.name == name)
            .cloned())
    }

    async fn save_store(&mut self, store: &Store) -> Result<(), LedgerError> {
        self.check(FailPoint::SaveStore)?;
        self.working.stores.insert(store.id, store.clone());
        Ok(())
    }
}

#[async_trait]
impl TransactionLog for InMemoryUnit {
    async fn insert_transaction(&mut self, tx: &NewTransaction) -> Result<Transaction, LedgerError> {
        self.check(FailPoint::InsertTransaction)?;
        let recorded = Transaction::recorded(tx, Utc::now());
        self.working.transactions.push(recorded.clone());
        Ok(recorded)
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnit {
    async fn commit(self) -> Result<(), LedgerError> {
        self.check(FailPoint::Commit)?;
        let mut inner = self.ledger.inner.lock().unwrap();
        inner.state = self.working;
        inner.stats.committed += 1;
        Ok(())
    }

    async fn rollback(self) -> Result<(), LedgerError> {
        self.ledger.inner.lock().unwrap().stats.rolled_back += 1;
        Ok(())
    }
}
