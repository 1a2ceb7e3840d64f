//! Transaction repository for reading the transaction log.
//!
//! Writes only happen through the transaction poster and
//! [`crate::SeaOrmLedger`].

use goldbook_core::ledger::{LedgerError, Transaction};
use goldbook_core::reports::{FilterCondition, ReportLine, ReportWindow, TimePredicate};
use goldbook_shared::types::{CustomerId, PageRequest, PageResponse, StoreId, TransactionId};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select,
};

use crate::entities::sea_orm_active_enums::{PaymentMethod, TradeType};
use crate::entities::{customers, transactions};
use crate::error::ledger_error;

fn time_condition(predicate: TimePredicate) -> Condition {
    let col = transactions::Column::CreatedAt;
    match predicate {
        TimePredicate::At(t) => Condition::all().add(col.eq(t)),
        TimePredicate::NotAt(t) => Condition::all().add(col.ne(t)),
        TimePredicate::Before(t) => Condition::all().add(col.lt(t)),
        TimePredicate::AtOrAfter(t) => Condition::all().add(col.gte(t)),
        TimePredicate::After(t) => Condition::all().add(col.gt(t)),
        TimePredicate::AtOrBefore(t) => Condition::all().add(col.lte(t)),
        TimePredicate::Within(w) => window_condition(w),
        TimePredicate::Outside(w) => Condition::any()
            .add(col.lt(w.start))
            .add(col.gte(w.end)),
    }
}

fn window_condition(window: ReportWindow) -> Condition {
    Condition::all()
        .add(transactions::Column::CreatedAt.gte(window.start))
        .add(transactions::Column::CreatedAt.lt(window.end))
}

/// Translates a validated search filter into a SQL condition.
#[must_use]
pub fn filter_condition(condition: &FilterCondition) -> Condition {
    match *condition {
        FilterCondition::CreatedAt(predicate) => time_condition(predicate),
        FilterCondition::TradeType { equal, value } => {
            let value = TradeType::from(value);
            let col = transactions::Column::TradeType;
            Condition::all().add(if equal { col.eq(value) } else { col.ne(value) })
        }
        FilterCondition::PaymentMethod { equal, value } => {
            let value = PaymentMethod::from(value);
            let col = transactions::Column::PaymentMethod;
            Condition::all().add(if equal { col.eq(value) } else { col.ne(value) })
        }
    }
}

/// Read access to the transaction log.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn page(
        &self,
        query: Select<transactions::Entity>,
        page: &PageRequest,
    ) -> Result<PageResponse<Transaction>, LedgerError> {
        let page = page.clamped();
        let total = query.clone().count(&self.db).await.map_err(ledger_error)?;
        let rows = query
            .order_by_desc(transactions::Column::CreatedAt)
            .order_by_desc(transactions::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(ledger_error)?;

        Ok(PageResponse::new(
            rows.into_iter().map(Transaction::from).collect(),
            page.page,
            page.per_page,
            total,
        ))
    }

    /// Lists transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, page: &PageRequest) -> Result<PageResponse<Transaction>, LedgerError> {
        self.page(transactions::Entity::find(), page).await
    }

    /// Lists transactions matching every condition, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn search(
        &self,
        conditions: &[FilterCondition],
        page: &PageRequest,
    ) -> Result<PageResponse<Transaction>, LedgerError> {
        let filter = conditions
            .iter()
            .fold(Condition::all(), |acc, c| acc.add(filter_condition(c)));
        self.page(transactions::Entity::find().filter(filter), page)
            .await
    }

    /// Finds a transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: TransactionId) -> Result<Option<Transaction>, LedgerError> {
        let model = transactions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(ledger_error)?;
        Ok(model.map(Transaction::from))
    }

    /// Every transaction of a customer, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn for_customer(&self, customer_id: CustomerId) -> Result<Vec<Transaction>, LedgerError> {
        self.history(transactions::Column::CustomerId.eq(customer_id.into_inner()))
            .await
    }

    /// Every transaction posted against a store, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn for_store(&self, store_id: StoreId) -> Result<Vec<Transaction>, LedgerError> {
        self.history(transactions::Column::StoreId.eq(store_id.into_inner()))
            .await
    }

    async fn history(
        &self,
        filter: sea_orm::sea_query::SimpleExpr,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let rows = transactions::Entity::find()
            .filter(filter)
            .order_by_asc(transactions::Column::CreatedAt)
            .order_by_asc(transactions::Column::Id)
            .all(&self.db)
            .await
            .map_err(ledger_error)?;
        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    /// Transactions recorded inside the window, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn in_window(&self, window: ReportWindow) -> Result<Vec<Transaction>, LedgerError> {
        let rows = transactions::Entity::find()
            .filter(window_condition(window))
            .order_by_asc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(ledger_error)?;
        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    /// Transactions inside the window joined with their customer's name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn report_lines(&self, window: ReportWindow) -> Result<Vec<ReportLine>, LedgerError> {
        let rows = transactions::Entity::find()
            .filter(window_condition(window))
            .find_also_related(customers::Entity)
            .order_by_asc(transactions::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(ledger_error)?;

        Ok(rows
            .into_iter()
            .map(|(tx, customer)| ReportLine {
                customer_name: customer.map(|c| c.name).unwrap_or_default(),
                transaction: Transaction::from(tx),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use goldbook_core::reports::TransactionFilter;
    use rstest::rstest;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql(condition: &FilterCondition) -> String {
        transactions::Entity::find()
            .filter(filter_condition(condition))
            .build(DbBackend::Postgres)
            .to_string()
    }

    fn parse(operation: &str, operator: &str, value: &str) -> FilterCondition {
        TransactionFilter {
            operation: operation.to_string(),
            operator: operator.to_string(),
            value: value.to_string(),
        }
        .parse()
        .unwrap()
    }

    #[test]
    fn test_day_equality_becomes_half_open_range() {
        let sql = sql(&parse("eq", "created_at", "2026-01-15"));
        assert!(sql.contains(r#""created_at" >= '2026-01-15 00:00:00"#), "{sql}");
        assert!(sql.contains(r#""created_at" < '2026-01-16 00:00:00"#), "{sql}");
        assert!(sql.contains(" AND "), "{sql}");
    }

    #[test]
    fn test_day_inequality_is_outside_the_day() {
        let sql = sql(&parse("ne", "created_at", "2026-01-15"));
        assert!(sql.contains(" OR "), "{sql}");
    }

    #[rstest]
    #[case("eq", "=")]
    #[case("ne", "<>")]
    fn test_enum_conditions(#[case] operation: &str, #[case] op: &str) {
        let sql = sql(&parse(operation, "payment_method", "borrowed_gold"));
        assert!(sql.contains(&format!(r#""payment_method" {op}"#)), "{sql}");
        assert!(sql.contains("borrowed_gold"), "{sql}");
    }

    #[test]
    fn test_window_condition_uses_bounds() {
        let window = ReportWindow::day(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()).unwrap();
        let sql = transactions::Entity::find()
            .filter(window_condition(window))
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains("2026-03-01 00:00:00"), "{sql}");
        assert!(sql.contains("2026-03-02 00:00:00"), "{sql}");
    }
}
