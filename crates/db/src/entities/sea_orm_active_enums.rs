//! `SeaORM` active enums mirroring the Postgres enum types.
//!
//! Each enum converts to and from its `khata-core` counterpart so that
//! repositories can hand rows to the domain layer without string plumbing.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The five fundamental account types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[sea_orm(string_value = "asset")]
    Asset,
    #[sea_orm(string_value = "liability")]
    Liability,
    #[sea_orm(string_value = "equity")]
    Equity,
    #[sea_orm(string_value = "revenue")]
    Revenue,
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl From<AccountType> for khata_core::chart::AccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Revenue => Self::Revenue,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<khata_core::chart::AccountType> for AccountType {
    fn from(value: khata_core::chart::AccountType) -> Self {
        match value {
            khata_core::chart::AccountType::Asset => Self::Asset,
            khata_core::chart::AccountType::Liability => Self::Liability,
            khata_core::chart::AccountType::Equity => Self::Equity,
            khata_core::chart::AccountType::Revenue => Self::Revenue,
            khata_core::chart::AccountType::Expense => Self::Expense,
        }
    }
}

/// Journal entry status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "journal_status")]
#[serde(rename_all = "lowercase")]
pub enum JournalStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "posted")]
    Posted,
}

impl From<JournalStatus> for khata_core::journal::JournalStatus {
    fn from(value: JournalStatus) -> Self {
        match value {
            JournalStatus::Draft => Self::Draft,
            JournalStatus::Posted => Self::Posted,
        }
    }
}

impl From<khata_core::journal::JournalStatus> for JournalStatus {
    fn from(value: khata_core::journal::JournalStatus) -> Self {
        match value {
            khata_core::journal::JournalStatus::Draft => Self::Draft,
            khata_core::journal::JournalStatus::Posted => Self::Posted,
        }
    }
}

/// Payable (vendor bill) or receivable (customer invoice).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "bill_kind")]
#[serde(rename_all = "lowercase")]
pub enum BillKind {
    #[sea_orm(string_value = "payable")]
    Payable,
    #[sea_orm(string_value = "receivable")]
    Receivable,
}

impl From<BillKind> for khata_core::billing::BillKind {
    fn from(value: BillKind) -> Self {
        match value {
            BillKind::Payable => Self::Payable,
            BillKind::Receivable => Self::Receivable,
        }
    }
}

impl From<khata_core::billing::BillKind> for BillKind {
    fn from(value: khata_core::billing::BillKind) -> Self {
        match value {
            khata_core::billing::BillKind::Payable => Self::Payable,
            khata_core::billing::BillKind::Receivable => Self::Receivable,
        }
    }
}

/// Bill settlement status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "bill_status")]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "partially_paid")]
    PartiallyPaid,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "overdue")]
    Overdue,
}

impl From<BillStatus> for khata_core::billing::BillStatus {
    fn from(value: BillStatus) -> Self {
        match value {
            BillStatus::Pending => Self::Pending,
            BillStatus::PartiallyPaid => Self::PartiallyPaid,
            BillStatus::Paid => Self::Paid,
            BillStatus::Overdue => Self::Overdue,
        }
    }
}

impl From<khata_core::billing::BillStatus> for BillStatus {
    fn from(value: khata_core::billing::BillStatus) -> Self {
        match value {
            khata_core::billing::BillStatus::Pending => Self::Pending,
            khata_core::billing::BillStatus::PartiallyPaid => Self::PartiallyPaid,
            khata_core::billing::BillStatus::Paid => Self::Paid,
            khata_core::billing::BillStatus::Overdue => Self::Overdue,
        }
    }
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    #[sea_orm(string_value = "upi")]
    Upi,
    #[sea_orm(string_value = "cheque")]
    Cheque,
    #[sea_orm(string_value = "card")]
    Card,
}

impl From<PaymentMethod> for khata_core::billing::PaymentMethod {
    fn from(value: PaymentMethod) -> Self {
        match value {
            PaymentMethod::Cash => Self::Cash,
            PaymentMethod::BankTransfer => Self::BankTransfer,
            PaymentMethod::Upi => Self::Upi,
            PaymentMethod::Cheque => Self::Cheque,
            PaymentMethod::Card => Self::Card,
        }
    }
}

impl From<khata_core::billing::PaymentMethod> for PaymentMethod {
    fn from(value: khata_core::billing::PaymentMethod) -> Self {
        match value {
            khata_core::billing::PaymentMethod::Cash => Self::Cash,
            khata_core::billing::PaymentMethod::BankTransfer => Self::BankTransfer,
            khata_core::billing::PaymentMethod::Upi => Self::Upi,
            khata_core::billing::PaymentMethod::Cheque => Self::Cheque,
            khata_core::billing::PaymentMethod::Card => Self::Card,
        }
    }
}

/// Kind of money account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "bank_account_kind")]
#[serde(rename_all = "lowercase")]
pub enum BankAccountKind {
    #[sea_orm(string_value = "bank")]
    Bank,
    #[sea_orm(string_value = "upi")]
    Upi,
    #[sea_orm(string_value = "cash")]
    Cash,
}

impl From<BankAccountKind> for khata_core::transfer::BankAccountKind {
    fn from(value: BankAccountKind) -> Self {
        match value {
            BankAccountKind::Bank => Self::Bank,
            BankAccountKind::Upi => Self::Upi,
            BankAccountKind::Cash => Self::Cash,
        }
    }
}

impl From<khata_core::transfer::BankAccountKind> for BankAccountKind {
    fn from(value: khata_core::transfer::BankAccountKind) -> Self {
        match value {
            khata_core::transfer::BankAccountKind::Bank => Self::Bank,
            khata_core::transfer::BankAccountKind::Upi => Self::Upi,
            khata_core::transfer::BankAccountKind::Cash => Self::Cash,
        }
    }
}

/// Direction of a bank transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "bank_txn_direction")]
#[serde(rename_all = "lowercase")]
pub enum BankTxnDirection {
    #[sea_orm(string_value = "deposit")]
    Deposit,
    #[sea_orm(string_value = "withdrawal")]
    Withdrawal,
}

impl From<BankTxnDirection> for khata_core::transfer::TxnDirection {
    fn from(value: BankTxnDirection) -> Self {
        match value {
            BankTxnDirection::Deposit => Self::Deposit,
            BankTxnDirection::Withdrawal => Self::Withdrawal,
        }
    }
}

impl From<khata_core::transfer::TxnDirection> for BankTxnDirection {
    fn from(value: khata_core::transfer::TxnDirection) -> Self {
        match value {
            khata_core::transfer::TxnDirection::Deposit => Self::Deposit,
            khata_core::transfer::TxnDirection::Withdrawal => Self::Withdrawal,
        }
    }
}
