//! Test fixtures for spendwise-core
//!
//! Builders for transaction records and a helper that loads them into a
//! database, shared by unit tests and the CLI crate's tests.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::db::Database;
use crate::error::Result;
use crate::models::{CategoryRef, CategoryType, NewTransaction, TransactionRecord};

/// Build a date, panicking on an invalid one
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

pub fn expense(amount: Decimal, on: NaiveDate, category: &str) -> TransactionRecord {
    TransactionRecord::new(amount, on, category, CategoryType::Expense)
}

pub fn income(amount: Decimal, on: NaiveDate, category: &str) -> TransactionRecord {
    TransactionRecord::new(amount, on, category, CategoryType::Income)
}

/// Insert `records` for `user_id`, creating categories by name as needed
///
/// Each record gets a distinct import hash, so identical records are all kept.
pub fn seed_records(db: &Database, user_id: i64, records: &[TransactionRecord]) -> Result<usize> {
    let mut inserted = 0;
    for (i, record) in records.iter().enumerate() {
        let tx = NewTransaction {
            user_id,
            category: CategoryRef::NewNamed {
                name: record.category_name.clone(),
                kind: record.category_type,
            },
            amount: record.amount,
            date: record.date,
            description: format!("fixture {}", i),
            import_hash: format!(
                "fixture:{}:{}:{}:{}:{}",
                user_id, i, record.date, record.category_name, record.amount
            ),
        };
        if db.insert_transaction(&tx)?.is_some() {
            inserted += 1;
        }
    }
    Ok(inserted)
}
