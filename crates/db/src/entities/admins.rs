//! `SeaORM` Entity for admins table.

use goldbook_core::ledger;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "admins")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::store_admins::Entity")]
    StoreAdmins,
}

impl Related<super::store_admins::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StoreAdmins.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ledger::Admin {
    fn from(model: Model) -> Self {
        Self {
            id: model.id.into(),
            name: model.name,
            email: model.email,
            created_at: model.created_at.to_utc(),
        }
    }
}
