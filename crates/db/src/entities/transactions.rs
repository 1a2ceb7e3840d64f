//! `SeaORM` Entity for transactions table.

use goldbook_core::ledger;
use goldbook_shared::types::AdminId;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{PaymentMethod, TradeType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub store_id: Uuid,
    pub posted_by: Option<Uuid>,
    pub trade_type: TradeType,
    #[sea_orm(column_type = "Decimal(Some((28, 8)))")]
    pub gold_weight: Decimal,
    #[sea_orm(column_type = "Decimal(Some((28, 8)))")]
    pub gold_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((28, 8)))")]
    pub amount: Decimal,
    pub payment_method: PaymentMethod,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id",
        on_delete = "Restrict"
    )]
    Customers,
    #[sea_orm(
        belongs_to = "super::stores::Entity",
        from = "Column::StoreId",
        to = "super::stores::Column::Id",
        on_delete = "Restrict"
    )]
    Stores,
    #[sea_orm(
        belongs_to = "super::admins::Entity",
        from = "Column::PostedBy",
        to = "super::admins::Column::Id",
        on_delete = "SetNull"
    )]
    Admins,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::stores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stores.def()
    }
}

impl Related<super::admins::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Admins.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ledger::Transaction {
    fn from(model: Model) -> Self {
        Self {
            id: model.id.into(),
            customer_id: model.customer_id.into(),
            store_id: model.store_id.into(),
            posted_by: model.posted_by.map(AdminId::from),
            trade_type: model.trade_type.into(),
            gold_weight: model.gold_weight.normalize(),
            gold_price: model.gold_price.normalize(),
            amount: model.amount.normalize(),
            payment_method: model.payment_method.into(),
            description: model.description,
            created_at: model.created_at.to_utc(),
        }
    }
}
