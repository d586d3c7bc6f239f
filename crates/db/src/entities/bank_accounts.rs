//! `SeaORM` Entity for the bank accounts table (bank, UPI, cash).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use khata_core::transfer::BankAccountRef;
use khata_shared::types::BankAccountId;

use super::sea_orm_active_enums::BankAccountKind;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "bank_accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub kind: BankAccountKind,
    pub account_number: Option<String>,
    /// UPI handles link back to the bank account they draw on.
    pub linked_account_id: Option<Uuid>,
    pub opening_balance: Decimal,
    pub current_balance: Decimal,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::LinkedAccountId",
        to = "Column::Id"
    )]
    LinkedAccount,
    #[sea_orm(has_many = "super::bank_transactions::Entity")]
    BankTransactions,
}

impl Related<super::bank_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The account facts the transfer coordinator validates against.
    #[must_use]
    pub fn as_ref_for_transfer(&self) -> BankAccountRef {
        BankAccountRef {
            id: BankAccountId::from_uuid(self.id),
            kind: self.kind.into(),
            is_active: self.is_active,
            current_balance: self.current_balance,
        }
    }
}
