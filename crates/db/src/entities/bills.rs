//! `SeaORM` Entity for the bills table (vendor bills and customer invoices).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use khata_core::billing::Bill;
use khata_shared::types::{BillId, CounterpartyId};

use super::sea_orm_active_enums::{BillKind, BillStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "bills")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: BillKind,
    /// Owned by the external CRM/procurement collaborator; opaque here.
    pub counterparty_id: Uuid,
    #[sea_orm(unique)]
    pub bill_number: String,
    pub issue_date: Date,
    pub due_date: Date,
    pub total_amount: Decimal,
    pub paid_amount: Decimal,
    pub status: BillStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Bill {
    fn from(model: Model) -> Self {
        Self {
            id: BillId::from_uuid(model.id),
            kind: model.kind.into(),
            counterparty_id: CounterpartyId::from_uuid(model.counterparty_id),
            bill_number: model.bill_number,
            issue_date: model.issue_date,
            due_date: model.due_date,
            total_amount: model.total_amount,
            paid_amount: model.paid_amount,
            status: model.status.into(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}
