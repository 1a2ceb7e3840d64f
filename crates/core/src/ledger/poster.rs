//! The transaction poster.
//!
//! Posting walks `validating -> authorizing -> computing -> persisting` and
//! ends either `committed` or `aborted`. Input checks that need no storage
//! run before a unit of work is opened. Once a unit is open every failure
//! rolls it back explicitly before the error is returned.

use goldbook_shared::types::TransactionId;
use tracing::{error, info, instrument, warn};

use super::authorization::ensure_can_manage;
use super::balance::apply_trade;
use super::error::{ErrorKind, LedgerError};
use super::ports::{UnitOfWork, UnitOfWorkProvider};
use super::types::{MAX_DESCRIPTION_LEN, NewTransaction, PostTransactionInput, Trade, Transaction};

/// Message returned to callers for any storage failure while posting.
pub const PERSISTENCE_FAILURE_MESSAGE: &str = "transaction could not be recorded";

/// Stages of a single post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingStage {
    /// Checking inputs and loading the store and customer.
    Validating,
    /// Checking the admin manages the store.
    Authorizing,
    /// Applying balance rules in memory.
    Computing,
    /// Writing the transaction and both balances.
    Persisting,
    /// All writes are visible.
    Committed,
    /// Nothing was written.
    Aborted,
}

impl PostingStage {
    /// Returns the stage name used in logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Authorizing => "authorizing",
            Self::Computing => "computing",
            Self::Persisting => "persisting",
            Self::Committed => "committed",
            Self::Aborted => "aborted",
        }
    }
}

impl std::fmt::Display for PostingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks everything about a post that needs no storage access.
///
/// # Errors
///
/// Returns a validation error for non-positive or over-precise weight and
/// price, an overflowing amount, or an over-long description.
pub fn validate_input(input: &PostTransactionInput) -> Result<Trade, LedgerError> {
    if input.description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(LedgerError::DescriptionTooLong(MAX_DESCRIPTION_LEN));
    }
    Trade::new(
        input.trade_type,
        input.payment_method,
        input.gold_weight,
        input.gold_price,
    )
}

/// Posts gold trades against the ledgers behind a [`UnitOfWorkProvider`].
#[derive(Debug, Clone)]
pub struct TransactionPoster<P> {
    provider: P,
}

impl<P: UnitOfWorkProvider> TransactionPoster<P> {
    /// Creates a poster over the given provider.
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Records a trade and updates the customer and store balances as one
    /// atomic unit.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the store or customer does not exist
    /// - `Validation` for invalid quantities or description
    /// - `Forbidden` if the admin does not manage the store
    /// - `Persistence` if any write or the commit fails; nothing is written
    #[instrument(
        skip(self, input),
        fields(
            admin_id = %input.admin_id,
            customer_id = %input.customer_id,
            store = %input.store_name,
            trade_type = %input.trade_type,
            payment_method = %input.payment_method
        )
    )]
    pub async fn post(&self, input: PostTransactionInput) -> Result<Transaction, LedgerError> {
        let trade = validate_input(&input).map_err(|e| aborted(PostingStage::Validating, e))?;

        let mut unit = self
            .provider
            .begin()
            .await
            .map_err(|e| aborted(PostingStage::Validating, storage_failure(e)))?;

        match record(&mut unit, &input, trade).await {
            Ok(tx) => {
                if let Err(e) = unit.commit().await {
                    return Err(aborted(PostingStage::Persisting, storage_failure(e)));
                }
                info!(
                    stage = %PostingStage::Committed,
                    transaction_id = %tx.id,
                    amount = %tx.amount,
                    "Transaction posted"
                );
                Ok(tx)
            }
            Err((stage, err)) => {
                if let Err(rollback_err) = unit.rollback().await {
                    warn!(error = %rollback_err, "Rollback of aborted post failed");
                }
                Err(aborted(stage, err))
            }
        }
    }
}

async fn record<U: UnitOfWork>(
    unit: &mut U,
    input: &PostTransactionInput,
    trade: Trade,
) -> Result<Transaction, (PostingStage, LedgerError)> {
    let loading = |e: LedgerError| {
        let e = if e.kind() == ErrorKind::Persistence {
            storage_failure(e)
        } else {
            e
        };
        (PostingStage::Validating, e)
    };

    // Store first, then customer: every post locks in the same order.
    let mut store = unit
        .store_by_name(&input.store_name)
        .await
        .map_err(loading)?
        .ok_or_else(|| {
            (
                PostingStage::Validating,
                LedgerError::StoreNotFound(input.store_name.clone()),
            )
        })?;
    let mut customer = unit
        .customer_by_id(input.customer_id)
        .await
        .map_err(loading)?
        .ok_or((
            PostingStage::Validating,
            LedgerError::CustomerNotFound(input.customer_id),
        ))?;

    ensure_can_manage(&store, input.admin_id).map_err(|e| (PostingStage::Authorizing, e))?;

    let update = apply_trade(&trade, &customer.balance, &store.balance)
        .map_err(|e| (PostingStage::Computing, e))?;
    customer.balance = update.customer;
    store.balance = update.store;

    let new_tx = NewTransaction {
        id: TransactionId::new(),
        customer_id: customer.id,
        store_id: store.id,
        posted_by: input.admin_id,
        trade,
        description: input.description.clone(),
    };

    let persisting = |e: LedgerError| (PostingStage::Persisting, storage_failure(e));
    let tx = unit.insert_transaction(&new_tx).await.map_err(persisting)?;
    unit.save_customer(&customer).await.map_err(persisting)?;
    unit.save_store(&store).await.map_err(persisting)?;

    Ok(tx)
}

/// Logs the underlying storage error and replaces it with a generic one.
fn storage_failure(err: LedgerError) -> LedgerError {
    error!(error = %err, "Storage failure while posting transaction");
    LedgerError::Persistence(PERSISTENCE_FAILURE_MESSAGE.to_string())
}

fn aborted(stage: PostingStage, err: LedgerError) -> LedgerError {
    warn!(
        stage = %PostingStage::Aborted,
        failed_at = %stage,
        code = err.error_code(),
        error = %err,
        "Transaction post aborted"
    );
    err
}
