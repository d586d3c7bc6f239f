//! Account domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use khata_shared::types::AccountId;

/// The five fundamental account types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned (cash, receivables, inventory).
    Asset,
    /// Obligations owed (payables, loans).
    Liability,
    /// Owner's residual interest.
    Equity,
    /// Income earned.
    Revenue,
    /// Costs incurred.
    Expense,
}

impl AccountType {
    /// Returns the normal balance side for this account type.
    ///
    /// The normal balance is fixed by the type and never stored
    /// independently: Asset/Expense are debit-normal, the rest
    /// credit-normal.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }

    /// All account types, in reporting order.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Equity,
        Self::Revenue,
        Self::Expense,
    ];
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "liability" => Ok(Self::Liability),
            "equity" => Ok(Self::Equity),
            "revenue" => Ok(Self::Revenue),
            "expense" => Ok(Self::Expense),
            other => Err(format!("unknown account type: {other}")),
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        };
        write!(f, "{s}")
    }
}

/// The side on which an account naturally increases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Debit-normal (Asset, Expense).
    Debit,
    /// Credit-normal (Liability, Equity, Revenue).
    Credit,
}

impl NormalBalance {
    /// Calculates the signed balance effect of a ledger line.
    ///
    /// Debit-normal: `balance += debit - credit`.
    /// Credit-normal: `balance += credit - debit`.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// A chart of accounts entry.
///
/// Accounts form a tree via `parent_account_id`; an account references its
/// parent but owns no other accounts. `current_balance` is a cache over
/// the posted line log and is only written by the journal posting path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Unique account code (e.g., "2100").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Account type, which fixes the normal balance.
    pub account_type: AccountType,
    /// Optional parent in the account tree.
    pub parent_account_id: Option<AccountId>,
    /// Balance carried in at setup.
    pub opening_balance: Decimal,
    /// Cached balance, re-derivable from posted lines.
    pub current_balance: Decimal,
    /// Inactive accounts reject new postings but keep their history.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Returns the normal balance side, derived from the type.
    #[must_use]
    pub const fn normal_balance(&self) -> NormalBalance {
        self.account_type.normal_balance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normal_balance_fixed_by_type() {
        assert_eq!(AccountType::Asset.normal_balance(), NormalBalance::Debit);
        assert_eq!(AccountType::Expense.normal_balance(), NormalBalance::Debit);
        assert_eq!(
            AccountType::Liability.normal_balance(),
            NormalBalance::Credit
        );
        assert_eq!(AccountType::Equity.normal_balance(), NormalBalance::Credit);
        assert_eq!(AccountType::Revenue.normal_balance(), NormalBalance::Credit);
    }

    #[test]
    fn test_debit_normal_balance_change() {
        let nb = NormalBalance::Debit;
        assert_eq!(nb.balance_change(dec!(100), dec!(0)), dec!(100));
        assert_eq!(nb.balance_change(dec!(0), dec!(40)), dec!(-40));
        assert_eq!(nb.balance_change(dec!(100), dec!(30)), dec!(70));
    }

    #[test]
    fn test_credit_normal_balance_change() {
        let nb = NormalBalance::Credit;
        assert_eq!(nb.balance_change(dec!(0), dec!(100)), dec!(100));
        assert_eq!(nb.balance_change(dec!(25), dec!(0)), dec!(-25));
        assert_eq!(nb.balance_change(dec!(30), dec!(100)), dec!(70));
    }

    #[test]
    fn test_account_type_parse() {
        assert_eq!("ASSET".parse::<AccountType>().unwrap(), AccountType::Asset);
        assert_eq!(
            "revenue".parse::<AccountType>().unwrap(),
            AccountType::Revenue
        );
        assert!("petty-cash".parse::<AccountType>().is_err());
    }

    #[test]
    fn test_account_type_display_roundtrip() {
        for t in AccountType::ALL {
            assert_eq!(t.to_string().parse::<AccountType>().unwrap(), t);
        }
    }
}
