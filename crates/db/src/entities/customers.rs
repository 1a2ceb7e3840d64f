//! `SeaORM` Entity for customers table.

use goldbook_core::ledger;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub phone: String,
    pub address: String,
    #[sea_orm(column_type = "Decimal(Some((28, 8)))")]
    pub borrowed_gold: Decimal,
    #[sea_orm(column_type = "Decimal(Some((28, 8)))")]
    pub total_bought: Decimal,
    #[sea_orm(column_type = "Decimal(Some((28, 8)))")]
    pub total_sold: Decimal,
    #[sea_orm(column_type = "Decimal(Some((28, 8)))")]
    pub borrowed_amount: Decimal,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ledger::Customer {
    fn from(model: Model) -> Self {
        Self {
            id: model.id.into(),
            name: model.name,
            phone: model.phone,
            address: model.address,
            balance: ledger::CustomerBalance {
                borrowed_gold: model.borrowed_gold.normalize(),
                total_bought: model.total_bought.normalize(),
                total_sold: model.total_sold.normalize(),
                borrowed_amount: model.borrowed_amount.normalize(),
            },
            created_at: model.created_at.to_utc(),
            updated_at: model.updated_at.to_utc(),
        }
    }
}
