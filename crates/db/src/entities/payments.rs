//! `SeaORM` Entity for the payments table.
//!
//! Payments are append-only; a row is never updated after insertion.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use khata_core::billing::Payment;
use khata_shared::types::{BankAccountId, BillId, PaymentId};

use super::sea_orm_active_enums::PaymentMethod;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub bill_id: Uuid,
    pub amount: Decimal,
    pub payment_date: Date,
    pub method: PaymentMethod,
    pub bank_account_id: Option<Uuid>,
    /// The journal entry this payment posted; a payment row never exists
    /// without it.
    pub journal_entry_id: Uuid,
    #[sea_orm(unique)]
    pub idempotency_key: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bills::Entity",
        from = "Column::BillId",
        to = "super::bills::Column::Id"
    )]
    Bills,
    #[sea_orm(
        belongs_to = "super::journal_entries::Entity",
        from = "Column::JournalEntryId",
        to = "super::journal_entries::Column::Id"
    )]
    JournalEntries,
}

impl Related<super::bills::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bills.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Payment {
    fn from(model: Model) -> Self {
        Self {
            id: PaymentId::from_uuid(model.id),
            bill_id: BillId::from_uuid(model.bill_id),
            amount: model.amount,
            payment_date: model.payment_date,
            method: model.method.into(),
            bank_account_id: model.bank_account_id.map(BankAccountId::from_uuid),
            idempotency_key: model.idempotency_key,
            created_at: model.created_at.into(),
        }
    }
}
