//! Account-type roll-ups into summary financial metrics.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use khata_shared::types::AccountId;

use crate::chart::AccountType;

/// A single account's balance, as input to the roll-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalanceRow {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Net balance on the account's normal side.
    pub balance: Decimal,
}

/// Per-type subtotal with the accounts behind it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeSummary {
    /// Section total.
    pub total: Decimal,
    /// Accounts in this section.
    pub accounts: Vec<AccountBalanceRow>,
}

/// Summary financial metrics across the whole chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// Asset accounts.
    pub assets: TypeSummary,
    /// Liability accounts.
    pub liabilities: TypeSummary,
    /// Equity accounts.
    pub equity: TypeSummary,
    /// Revenue accounts.
    pub revenue: TypeSummary,
    /// Expense accounts.
    pub expenses: TypeSummary,
    /// Assets minus liabilities.
    pub working_capital: Decimal,
    /// Revenue minus expenses.
    pub net_income: Decimal,
    /// Whether assets equal liabilities + equity + net income.
    pub is_balanced: bool,
}

/// Rolls account balances up by type.
///
/// Types with no accounts contribute a zero total; an empty chart yields a
/// summary of zeros, not an error.
#[must_use]
pub fn summarize(rows: Vec<AccountBalanceRow>) -> FinancialSummary {
    let mut assets = TypeSummary::default();
    let mut liabilities = TypeSummary::default();
    let mut equity = TypeSummary::default();
    let mut revenue = TypeSummary::default();
    let mut expenses = TypeSummary::default();

    for row in rows {
        let section = match row.account_type {
            AccountType::Asset => &mut assets,
            AccountType::Liability => &mut liabilities,
            AccountType::Equity => &mut equity,
            AccountType::Revenue => &mut revenue,
            AccountType::Expense => &mut expenses,
        };
        section.total += row.balance;
        section.accounts.push(row);
    }

    let working_capital = assets.total - liabilities.total;
    let net_income = revenue.total - expenses.total;
    let is_balanced = assets.total == liabilities.total + equity.total + net_income;

    FinancialSummary {
        assets,
        liabilities,
        equity,
        revenue,
        expenses,
        working_capital,
        net_income,
        is_balanced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(code: &str, account_type: AccountType, balance: Decimal) -> AccountBalanceRow {
        AccountBalanceRow {
            account_id: AccountId::new(),
            code: code.to_string(),
            name: code.to_string(),
            account_type,
            balance,
        }
    }

    #[test]
    fn test_empty_chart_summarizes_to_zero() {
        let summary = summarize(vec![]);
        assert_eq!(summary.assets.total, Decimal::ZERO);
        assert_eq!(summary.net_income, Decimal::ZERO);
        assert_eq!(summary.working_capital, Decimal::ZERO);
        assert!(summary.is_balanced);
    }

    #[test]
    fn test_summarize_groups_by_type() {
        let summary = summarize(vec![
            row("1000", AccountType::Asset, dec!(500)),
            row("1100", AccountType::Asset, dec!(300)),
            row("2100", AccountType::Liability, dec!(200)),
            row("4000", AccountType::Revenue, dec!(900)),
            row("7010", AccountType::Expense, dec!(300)),
        ]);

        assert_eq!(summary.assets.total, dec!(800));
        assert_eq!(summary.assets.accounts.len(), 2);
        assert_eq!(summary.liabilities.total, dec!(200));
        assert_eq!(summary.working_capital, dec!(600));
        assert_eq!(summary.net_income, dec!(600));
        // 800 == 200 + 0 + 600
        assert!(summary.is_balanced);
    }

    #[test]
    fn test_unbalanced_books_flagged() {
        let summary = summarize(vec![
            row("1000", AccountType::Asset, dec!(100)),
            row("2100", AccountType::Liability, dec!(90)),
        ]);
        assert!(!summary.is_balanced);
    }

    #[test]
    fn test_worked_example_posting() {
        // Debit Expense 7010 by 500, credit Accounts Payable 2100 by 500:
        // both end at 500 on their normal side and the identity holds
        // (assets 0 == liabilities 500 + net income -500).
        let summary = summarize(vec![
            row("7010", AccountType::Expense, dec!(500)),
            row("2100", AccountType::Liability, dec!(500)),
        ]);
        assert_eq!(summary.expenses.total, dec!(500));
        assert_eq!(summary.liabilities.total, dec!(500));
        assert_eq!(summary.net_income, dec!(-500));
        assert!(summary.is_balanced);
    }
}
