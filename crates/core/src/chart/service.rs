//! Chart of accounts validation rules.
//!
//! Pure business logic with no database dependencies: the repository layer
//! supplies lookups as closures and performs the actual writes.

use khata_shared::types::AccountId;

use super::account::Account;
use super::error::ChartError;

/// Chart of accounts service for account validation.
pub struct ChartService;

impl ChartService {
    /// Validates a new account's code and parent before creation.
    ///
    /// # Errors
    ///
    /// Returns `ChartError::Validation` for an empty code or name,
    /// `ChartError::DuplicateCode` if the code is taken, and
    /// `ChartError::InvalidHierarchy` if the parent is inactive.
    pub fn validate_new_account(
        code: &str,
        name: &str,
        code_exists: bool,
        parent: Option<&Account>,
    ) -> Result<(), ChartError> {
        if code.trim().is_empty() {
            return Err(ChartError::Validation("account code is required".into()));
        }
        if name.trim().is_empty() {
            return Err(ChartError::Validation("account name is required".into()));
        }
        if code_exists {
            return Err(ChartError::DuplicateCode(code.to_string()));
        }
        if let Some(parent) = parent {
            if !parent.is_active {
                return Err(ChartError::InvalidHierarchy(format!(
                    "parent account {} is inactive",
                    parent.code
                )));
            }
        }
        Ok(())
    }

    /// Checks that re-parenting `account_id` under `new_parent_id` does not
    /// create a cycle in the account tree.
    ///
    /// Walks up the parent chain from the proposed parent; if it reaches
    /// `account_id` the move is rejected. The walk is bounded so a corrupt
    /// chain cannot loop forever.
    ///
    /// # Errors
    ///
    /// Returns `ChartError::InvalidHierarchy` on a cycle or a broken chain.
    pub fn validate_no_cycle<P>(
        account_id: AccountId,
        new_parent_id: AccountId,
        parent_lookup: P,
    ) -> Result<(), ChartError>
    where
        P: Fn(AccountId) -> Option<Option<AccountId>>,
    {
        const MAX_DEPTH: usize = 64;

        if account_id == new_parent_id {
            return Err(ChartError::InvalidHierarchy(
                "account cannot be its own parent".into(),
            ));
        }

        let mut cursor = new_parent_id;
        for _ in 0..MAX_DEPTH {
            let Some(parent) = parent_lookup(cursor) else {
                return Err(ChartError::InvalidHierarchy(format!(
                    "parent account {cursor} does not exist"
                )));
            };
            match parent {
                Some(next) if next == account_id => {
                    return Err(ChartError::InvalidHierarchy(
                        "account hierarchy would form a cycle".into(),
                    ));
                }
                Some(next) => cursor = next,
                None => return Ok(()),
            }
        }

        Err(ChartError::InvalidHierarchy(
            "account hierarchy exceeds maximum depth".into(),
        ))
    }

    /// Validates that an account may be deactivated.
    ///
    /// An account with postings or active children keeps its history and is
    /// never deleted; it can only be deactivated once both are gone.
    ///
    /// # Errors
    ///
    /// Returns `ChartError::HasActivity` if the account has journal lines
    /// or active children.
    pub fn validate_deactivate(
        account: &Account,
        has_journal_lines: bool,
        active_children: u64,
    ) -> Result<(), ChartError> {
        if has_journal_lines || active_children > 0 {
            return Err(ChartError::HasActivity(account.id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::account::AccountType;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::collections::HashMap;

    fn make_account(is_active: bool) -> Account {
        Account {
            id: AccountId::new(),
            code: "1000".to_string(),
            name: "Cash".to_string(),
            account_type: AccountType::Asset,
            parent_account_id: None,
            opening_balance: Decimal::ZERO,
            current_balance: Decimal::ZERO,
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_validate_new_account_ok() {
        let parent = make_account(true);
        assert!(ChartService::validate_new_account("1001", "Petty Cash", false, Some(&parent)).is_ok());
    }

    #[test]
    fn test_validate_new_account_duplicate_code() {
        assert!(matches!(
            ChartService::validate_new_account("1000", "Cash", true, None),
            Err(ChartError::DuplicateCode(_))
        ));
    }

    #[test]
    fn test_validate_new_account_empty_fields() {
        assert!(matches!(
            ChartService::validate_new_account("  ", "Cash", false, None),
            Err(ChartError::Validation(_))
        ));
        assert!(matches!(
            ChartService::validate_new_account("1000", "", false, None),
            Err(ChartError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_new_account_inactive_parent() {
        let parent = make_account(false);
        assert!(matches!(
            ChartService::validate_new_account("1001", "Petty Cash", false, Some(&parent)),
            Err(ChartError::InvalidHierarchy(_))
        ));
    }

    #[test]
    fn test_no_cycle_self_parent() {
        let id = AccountId::new();
        let result = ChartService::validate_no_cycle(id, id, |_| Some(None));
        assert!(matches!(result, Err(ChartError::InvalidHierarchy(_))));
    }

    #[test]
    fn test_no_cycle_detects_loop() {
        // a -> b -> a would form a cycle when re-parenting a under b.
        let a = AccountId::new();
        let b = AccountId::new();
        let mut parents: HashMap<AccountId, Option<AccountId>> = HashMap::new();
        parents.insert(b, Some(a));

        let result = ChartService::validate_no_cycle(a, b, |id| parents.get(&id).copied());
        assert!(matches!(result, Err(ChartError::InvalidHierarchy(_))));
    }

    #[test]
    fn test_no_cycle_accepts_chain_to_root() {
        let a = AccountId::new();
        let b = AccountId::new();
        let root = AccountId::new();
        let mut parents: HashMap<AccountId, Option<AccountId>> = HashMap::new();
        parents.insert(b, Some(root));
        parents.insert(root, None);

        assert!(ChartService::validate_no_cycle(a, b, |id| parents.get(&id).copied()).is_ok());
    }

    #[test]
    fn test_no_cycle_missing_parent() {
        let a = AccountId::new();
        let b = AccountId::new();
        let result = ChartService::validate_no_cycle(a, b, |_| None);
        assert!(matches!(result, Err(ChartError::InvalidHierarchy(_))));
    }

    #[test]
    fn test_validate_deactivate_ok() {
        let account = make_account(true);
        assert!(ChartService::validate_deactivate(&account, false, 0).is_ok());
    }

    #[test]
    fn test_validate_deactivate_with_lines() {
        let account = make_account(true);
        assert!(matches!(
            ChartService::validate_deactivate(&account, true, 0),
            Err(ChartError::HasActivity(_))
        ));
    }

    #[test]
    fn test_validate_deactivate_with_active_children() {
        let account = make_account(true);
        assert!(matches!(
            ChartService::validate_deactivate(&account, false, 2),
            Err(ChartError::HasActivity(_))
        ));
    }
}
