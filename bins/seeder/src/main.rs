//! Database seeder for Khata development and testing.
//!
//! Seeds the standard chart of accounts and default money accounts.
//! Safe to run repeatedly; existing rows are left alone.
//!
//! Usage: cargo run --bin seeder

use rust_decimal::Decimal;

use khata_core::chart::{AccountType, ChartError};
use khata_core::transfer::BankAccountKind;
use khata_db::repositories::account::CreateAccountInput;
use khata_db::repositories::transfer::CreateBankAccountInput;
use khata_db::{AccountRepository, TransferRepository};

/// The standard chart. The billing routes default to 1000 (cash), 1200
/// (accounts receivable), and 2100 (accounts payable).
const STANDARD_CHART: &[(&str, &str, AccountType)] = &[
    ("1000", "Cash", AccountType::Asset),
    ("1100", "Bank", AccountType::Asset),
    ("1200", "Accounts Receivable", AccountType::Asset),
    ("1300", "Inventory", AccountType::Asset),
    ("2100", "Accounts Payable", AccountType::Liability),
    ("2200", "Taxes Payable", AccountType::Liability),
    ("3000", "Owner's Equity", AccountType::Equity),
    ("4000", "Sales Revenue", AccountType::Revenue),
    ("4100", "Other Income", AccountType::Revenue),
    ("5000", "Cost of Goods Sold", AccountType::Expense),
    ("6000", "Salaries", AccountType::Expense),
    ("6100", "Rent", AccountType::Expense),
    ("6200", "Utilities", AccountType::Expense),
    ("6900", "Miscellaneous Expenses", AccountType::Expense),
];

const DEFAULT_BANK_ACCOUNTS: &[(&str, BankAccountKind)] = &[
    ("Cash Drawer", BankAccountKind::Cash),
    ("Main Current Account", BankAccountKind::Bank),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = khata_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding chart of accounts...");
    seed_chart(&AccountRepository::new(db.clone())).await;

    println!("Seeding money accounts...");
    seed_bank_accounts(&TransferRepository::new(db)).await;

    println!("Seeding complete!");
}

/// Seeds the standard chart of accounts, skipping codes already present.
async fn seed_chart(repo: &AccountRepository) {
    for (code, name, account_type) in STANDARD_CHART {
        match repo.find_by_code(code).await {
            Ok(_) => {
                println!("  Account {code} already exists, skipping...");
                continue;
            }
            Err(ChartError::NotFound(_)) => {}
            Err(e) => {
                eprintln!("Failed to check account {code}: {e}");
                continue;
            }
        }

        let input = CreateAccountInput {
            code: (*code).to_string(),
            name: (*name).to_string(),
            account_type: *account_type,
            parent_account_id: None,
            opening_balance: Decimal::ZERO,
        };
        match repo.create_account(input).await {
            Ok(account) => println!("  Created account {}: {}", account.code, account.name),
            Err(e) => eprintln!("Failed to insert account {code}: {e}"),
        }
    }
}

/// Seeds the default money accounts, skipping names already present.
async fn seed_bank_accounts(repo: &TransferRepository) {
    let existing = match repo.list_bank_accounts().await {
        Ok(accounts) => accounts,
        Err(e) => {
            eprintln!("Failed to list bank accounts: {e}");
            return;
        }
    };

    for (name, kind) in DEFAULT_BANK_ACCOUNTS {
        if existing.iter().any(|a| a.name == *name) {
            println!("  Money account '{name}' already exists, skipping...");
            continue;
        }

        let input = CreateBankAccountInput {
            name: (*name).to_string(),
            kind: *kind,
            account_number: None,
            linked_account_id: None,
            opening_balance: Decimal::ZERO,
        };
        match repo.create_bank_account(input).await {
            Ok(account) => println!("  Created money account: {}", account.name),
            Err(e) => eprintln!("Failed to insert money account '{name}': {e}"),
        }
    }
}
