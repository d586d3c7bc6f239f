//! Account repository for chart of accounts database operations.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use khata_core::chart::{Account, AccountType, ChartError, ChartService};
use khata_shared::types::AccountId;

use crate::entities::{accounts, journal_lines};

/// Input for creating a chart account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account code (must be unique).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type; fixes the normal balance.
    pub account_type: AccountType,
    /// Parent account in the tree, if any.
    pub parent_account_id: Option<AccountId>,
    /// Balance carried in at setup.
    pub opening_balance: Decimal,
}

/// Filter options for listing accounts.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountFilter {
    /// Filter by account type.
    pub account_type: Option<AccountType>,
    /// Filter by active status.
    pub is_active: Option<bool>,
}

/// Account repository for chart of accounts operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new account with validation.
    ///
    /// # Errors
    ///
    /// Returns `ChartError::DuplicateCode` if the code is taken and
    /// `ChartError::InvalidHierarchy` if the parent is missing, inactive,
    /// or its chain does not reach a root.
    pub async fn create_account(&self, input: CreateAccountInput) -> Result<Account, ChartError> {
        let code_exists = accounts::Entity::find()
            .filter(accounts::Column::Code.eq(&input.code))
            .count(&self.db)
            .await
            .map_err(db_err)?
            > 0;

        let parent = match input.parent_account_id {
            Some(parent_id) => {
                let row = accounts::Entity::find_by_id(parent_id.into_inner())
                    .one(&self.db)
                    .await
                    .map_err(db_err)?
                    .ok_or_else(|| {
                        ChartError::InvalidHierarchy(format!(
                            "parent account {parent_id} does not exist"
                        ))
                    })?;
                Some(Account::from(row))
            }
            None => None,
        };

        ChartService::validate_new_account(&input.code, &input.name, code_exists, parent.as_ref())?;

        let id = AccountId::new();
        if let Some(parent) = &parent {
            let chain = self.ancestor_chain(parent.id).await?;
            ChartService::validate_no_cycle(id, parent.id, |cursor| chain.get(&cursor).copied())?;
        }

        let now = chrono::Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(id.into_inner()),
            code: Set(input.code),
            name: Set(input.name),
            account_type: Set(input.account_type.into()),
            parent_account_id: Set(input.parent_account_id.map(AccountId::into_inner)),
            opening_balance: Set(input.opening_balance),
            current_balance: Set(input.opening_balance),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let account = account.insert(&self.db).await.map_err(db_err)?;
        Ok(account.into())
    }

    /// Lists accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(&self, filter: AccountFilter) -> Result<Vec<Account>, ChartError> {
        let mut query = accounts::Entity::find().order_by_asc(accounts::Column::Code);

        if let Some(account_type) = filter.account_type {
            let db_type: crate::entities::sea_orm_active_enums::AccountType = account_type.into();
            query = query.filter(accounts::Column::AccountType.eq(db_type));
        }
        if let Some(is_active) = filter.is_active {
            query = query.filter(accounts::Column::IsActive.eq(is_active));
        }

        let rows = query.all(&self.db).await.map_err(db_err)?;
        Ok(rows.into_iter().map(Account::from).collect())
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `ChartError::NotFound` if the account does not exist.
    pub async fn find_by_id(&self, id: AccountId) -> Result<Account, ChartError> {
        let row = accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| ChartError::NotFound(id.to_string()))?;
        Ok(row.into())
    }

    /// Finds an account by code.
    ///
    /// Route handlers resolve codes here once and pass typed ids onward.
    ///
    /// # Errors
    ///
    /// Returns `ChartError::NotFound` if no account carries the code.
    pub async fn find_by_code(&self, code: &str) -> Result<Account, ChartError> {
        let row = accounts::Entity::find()
            .filter(accounts::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| ChartError::NotFound(code.to_string()))?;
        Ok(row.into())
    }

    /// Deactivates an account.
    ///
    /// Accounts with journal lines or active children keep their history
    /// and cannot be deactivated.
    ///
    /// # Errors
    ///
    /// Returns `ChartError::HasActivity` when the account has postings or
    /// active children.
    pub async fn deactivate(&self, id: AccountId) -> Result<Account, ChartError> {
        let row = accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| ChartError::NotFound(id.to_string()))?;

        let has_lines = journal_lines::Entity::find()
            .filter(journal_lines::Column::AccountId.eq(id.into_inner()))
            .count(&self.db)
            .await
            .map_err(db_err)?
            > 0;

        let active_children = accounts::Entity::find()
            .filter(accounts::Column::ParentAccountId.eq(id.into_inner()))
            .filter(accounts::Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .map_err(db_err)?;

        let account = Account::from(row.clone());
        ChartService::validate_deactivate(&account, has_lines, active_children)?;

        let mut active: accounts::ActiveModel = row.into();
        active.is_active = Set(false);
        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active.update(&self.db).await.map_err(db_err)?;
        Ok(updated.into())
    }

    /// Walks the parent chain upwards and returns `id -> parent_id` pairs
    /// for the hierarchy validator.
    async fn ancestor_chain(
        &self,
        start: AccountId,
    ) -> Result<HashMap<AccountId, Option<AccountId>>, ChartError> {
        const MAX_DEPTH: usize = 64;

        let mut chain = HashMap::new();
        let mut cursor = Some(start);
        for _ in 0..MAX_DEPTH {
            let Some(current) = cursor else { break };
            let row = accounts::Entity::find_by_id(current.into_inner())
                .one(&self.db)
                .await
                .map_err(db_err)?;
            let Some(row) = row else { break };
            let parent = row.parent_account_id.map(AccountId::from_uuid);
            chain.insert(current, parent);
            cursor = parent.filter(|p| !chain.contains_key(p));
        }
        Ok(chain)
    }
}

fn db_err(err: DbErr) -> ChartError {
    ChartError::Database(err.to_string())
}
