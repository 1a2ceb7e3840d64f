//! `SeaORM` Entity for stores table.

use goldbook_core::ledger;
use goldbook_shared::types::AdminId;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "stores")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub created_by: Option<Uuid>,
    #[sea_orm(column_type = "Decimal(Some((28, 8)))")]
    pub total_gold: Decimal,
    #[sea_orm(column_type = "Decimal(Some((28, 8)))")]
    pub total_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((28, 8)))")]
    pub gold_taken: Decimal,
    #[sea_orm(column_type = "Decimal(Some((28, 8)))")]
    pub amount_taken: Decimal,
    #[sea_orm(column_type = "Decimal(Some((28, 8)))")]
    pub gold_given: Decimal,
    #[sea_orm(column_type = "Decimal(Some((28, 8)))")]
    pub amount_given: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::admins::Entity",
        from = "Column::CreatedBy",
        to = "super::admins::Column::Id",
        on_delete = "SetNull"
    )]
    Creator,
    #[sea_orm(has_many = "super::store_admins::Entity")]
    StoreAdmins,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::store_admins::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StoreAdmins.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Converts the row into a domain store with its managing admins.
    #[must_use]
    pub fn into_store(self, managers: Vec<AdminId>) -> ledger::Store {
        ledger::Store {
            id: self.id.into(),
            name: self.name,
            created_by: self.created_by.map(AdminId::from),
            managers,
            balance: ledger::StoreBalance {
                total_gold: self.total_gold.normalize(),
                total_amount: self.total_amount.normalize(),
                gold_taken: self.gold_taken.normalize(),
                amount_taken: self.amount_taken.normalize(),
                gold_given: self.gold_given.normalize(),
                amount_given: self.amount_given.normalize(),
            },
            created_at: self.created_at.to_utc(),
            updated_at: self.updated_at.to_utc(),
        }
    }
}
