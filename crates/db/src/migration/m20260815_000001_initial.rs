//! Initial database migration.
//!
//! Creates all enums, tables, constraints, and indexes for the ledger core.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: CHART OF ACCOUNTS
        // ============================================================
        db.execute_unprepared(ACCOUNTS_SQL).await?;

        // ============================================================
        // PART 3: JOURNAL
        // ============================================================
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_LINES_SQL).await?;

        // ============================================================
        // PART 4: BILLING
        // ============================================================
        db.execute_unprepared(BILLS_SQL).await?;
        db.execute_unprepared(PAYMENTS_SQL).await?;

        // ============================================================
        // PART 5: BANK ACCOUNTS & TRANSACTIONS
        // ============================================================
        db.execute_unprepared(BANK_ACCOUNTS_SQL).await?;
        db.execute_unprepared(BANK_TRANSACTIONS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Account types
CREATE TYPE account_type AS ENUM (
    'asset',
    'liability',
    'equity',
    'revenue',
    'expense'
);

-- Journal entry status
CREATE TYPE journal_status AS ENUM ('draft', 'posted');

-- Bill kind (vendor bill vs customer invoice)
CREATE TYPE bill_kind AS ENUM ('payable', 'receivable');

-- Bill settlement status
CREATE TYPE bill_status AS ENUM (
    'pending',
    'partially_paid',
    'paid',
    'overdue'
);

-- Payment method
CREATE TYPE payment_method AS ENUM (
    'cash',
    'bank_transfer',
    'upi',
    'cheque',
    'card'
);

-- Money account kind
CREATE TYPE bank_account_kind AS ENUM ('bank', 'upi', 'cash');

-- Bank transaction direction
CREATE TYPE bank_txn_direction AS ENUM ('deposit', 'withdrawal');
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    code VARCHAR(20) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    account_type account_type NOT NULL,
    parent_account_id UUID REFERENCES accounts(id),
    opening_balance NUMERIC(18,2) NOT NULL DEFAULT 0,
    current_balance NUMERIC(18,2) NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_accounts_parent ON accounts(parent_account_id);
CREATE INDEX idx_accounts_type ON accounts(account_type);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY,
    journal_number VARCHAR(30) NOT NULL UNIQUE,
    entry_date DATE NOT NULL,
    description TEXT NOT NULL,
    reference VARCHAR(100),
    status journal_status NOT NULL DEFAULT 'draft',
    total_debit NUMERIC(18,2) NOT NULL DEFAULT 0,
    total_credit NUMERIC(18,2) NOT NULL DEFAULT 0,
    reverses_entry_id UUID REFERENCES journal_entries(id),
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_entry_totals_balanced CHECK (
        status != 'posted' OR total_debit = total_credit
    )
);

CREATE INDEX idx_journal_entries_date ON journal_entries(entry_date);
CREATE INDEX idx_journal_entries_status ON journal_entries(status);
";

const JOURNAL_LINES_SQL: &str = r"
CREATE TABLE journal_lines (
    id UUID PRIMARY KEY,
    journal_entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES accounts(id),
    debit NUMERIC(18,2) NOT NULL DEFAULT 0,
    credit NUMERIC(18,2) NOT NULL DEFAULT 0,
    balance_change NUMERIC(18,2) NOT NULL,
    memo TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_line_amounts_non_negative CHECK (debit >= 0 AND credit >= 0),
    -- Exactly one side of the line carries an amount
    CONSTRAINT chk_line_one_side CHECK ((debit = 0) != (credit = 0))
);

CREATE INDEX idx_journal_lines_entry ON journal_lines(journal_entry_id);
CREATE INDEX idx_journal_lines_account ON journal_lines(account_id);
";

const BILLS_SQL: &str = r"
CREATE TABLE bills (
    id UUID PRIMARY KEY,
    kind bill_kind NOT NULL,
    counterparty_id UUID NOT NULL,
    bill_number VARCHAR(50) NOT NULL UNIQUE,
    issue_date DATE NOT NULL,
    due_date DATE NOT NULL,
    total_amount NUMERIC(18,2) NOT NULL,
    paid_amount NUMERIC(18,2) NOT NULL DEFAULT 0,
    status bill_status NOT NULL DEFAULT 'pending',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_bill_total_positive CHECK (total_amount > 0),
    CONSTRAINT chk_bill_paid_within_total CHECK (
        paid_amount >= 0 AND paid_amount <= total_amount
    ),
    CONSTRAINT chk_bill_due_after_issue CHECK (due_date >= issue_date)
);

CREATE INDEX idx_bills_counterparty ON bills(counterparty_id);
CREATE INDEX idx_bills_kind_status ON bills(kind, status);
CREATE INDEX idx_bills_due_date ON bills(due_date);
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE payments (
    id UUID PRIMARY KEY,
    bill_id UUID NOT NULL REFERENCES bills(id),
    amount NUMERIC(18,2) NOT NULL,
    payment_date DATE NOT NULL,
    method payment_method NOT NULL,
    bank_account_id UUID,
    journal_entry_id UUID NOT NULL REFERENCES journal_entries(id),
    idempotency_key VARCHAR(100) NOT NULL UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_payment_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_payments_bill ON payments(bill_id);
";

const BANK_ACCOUNTS_SQL: &str = r"
CREATE TABLE bank_accounts (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    kind bank_account_kind NOT NULL,
    account_number VARCHAR(50),
    linked_account_id UUID REFERENCES bank_accounts(id),
    opening_balance NUMERIC(18,2) NOT NULL DEFAULT 0,
    -- Negative balances are permitted for every kind: cash floats are
    -- allowed to run negative transiently by policy.
    current_balance NUMERIC(18,2) NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const BANK_TRANSACTIONS_SQL: &str = r"
CREATE TABLE bank_transactions (
    id UUID PRIMARY KEY,
    bank_account_id UUID NOT NULL REFERENCES bank_accounts(id),
    direction bank_txn_direction NOT NULL,
    amount NUMERIC(18,2) NOT NULL,
    date DATE NOT NULL,
    description TEXT NOT NULL,
    reference VARCHAR(100) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_bank_txn_amount_positive CHECK (amount > 0),
    -- One withdrawal and one deposit may share a transfer reference, but
    -- never two movements of the same direction on the same account.
    CONSTRAINT uq_bank_txn_replay UNIQUE (bank_account_id, reference, direction)
);

CREATE INDEX idx_bank_transactions_account ON bank_transactions(bank_account_id);
CREATE INDEX idx_bank_transactions_reference ON bank_transactions(reference);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS bank_transactions CASCADE;
DROP TABLE IF EXISTS bank_accounts CASCADE;
DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS bills CASCADE;
DROP TABLE IF EXISTS journal_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS accounts CASCADE;

DROP TYPE IF EXISTS bank_txn_direction;
DROP TYPE IF EXISTS bank_account_kind;
DROP TYPE IF EXISTS payment_method;
DROP TYPE IF EXISTS bill_status;
DROP TYPE IF EXISTS bill_kind;
DROP TYPE IF EXISTS journal_status;
DROP TYPE IF EXISTS account_type;
";
