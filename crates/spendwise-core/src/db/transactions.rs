//! Transaction operations

use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, OptionalExtension};
use rust_decimal::Decimal;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{CategoryType, DateRange, NewTransaction, Transaction, TransactionRecord};
use crate::store::TransactionStore;

/// A row as stored, before amount/date/type are validated
struct RawRow {
    id: i64,
    user_id: i64,
    category_name: String,
    category_type: String,
    amount: Value,
    date: String,
    description: String,
    created_at: String,
}

fn parse_amount(id: i64, raw: &Value) -> Result<Decimal> {
    match raw {
        Value::Text(s) => Decimal::from_str(s.trim()).map_err(|_| {
            Error::DataFormat(format!(
                "Transaction {}: amount '{}' is not a decimal",
                id, s
            ))
        }),
        Value::Integer(i) => Ok(Decimal::from(*i)),
        Value::Real(f) => Decimal::try_from(*f).map_err(|_| {
            Error::DataFormat(format!(
                "Transaction {}: amount {} is not representable as a decimal",
                id, f
            ))
        }),
        Value::Null | Value::Blob(_) => Err(Error::DataFormat(format!(
            "Transaction {}: amount is missing or binary",
            id
        ))),
    }
}

impl RawRow {
    fn into_transaction(self) -> Result<Transaction> {
        let amount = parse_amount(self.id, &self.amount)?;
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|_| {
            Error::DataFormat(format!(
                "Transaction {}: date '{}' is not YYYY-MM-DD",
                self.id, self.date
            ))
        })?;
        let category_type = CategoryType::from_str(&self.category_type)
            .map_err(|e| Error::DataFormat(format!("Transaction {}: {}", self.id, e)))?;

        Ok(Transaction {
            id: self.id,
            user_id: self.user_id,
            category_name: self.category_name,
            category_type,
            amount,
            date,
            description: self.description,
            created_at: parse_datetime(&self.created_at),
        })
    }
}

// A deleted category leaves category_id NULL; such rows count as uncategorized expenses
const SELECT_TRANSACTIONS: &str = r#"
    SELECT t.id, t.user_id,
           COALESCE(c.name, 'Uncategorized') AS category_name,
           COALESCE(c.type, 'expense') AS category_type,
           t.amount, t.date, t.description, t.created_at
    FROM transactions t
    LEFT JOIN categories c ON c.id = t.category_id
"#;

fn raw_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        category_name: row.get(2)?,
        category_type: row.get(3)?,
        amount: row.get(4)?,
        date: row.get(5)?,
        description: row.get(6)?,
        created_at: row.get(7)?,
    })
}

impl Database {
    /// Insert a transaction (skips duplicates based on import_hash)
    ///
    /// The category reference is resolved first, creating a user category
    /// for a new name. Returns the new id, or None for a duplicate.
    pub fn insert_transaction(&self, tx: &NewTransaction) -> Result<Option<i64>> {
        let category_id = self.resolve_category(tx.user_id, &tx.category)?;
        let conn = self.conn()?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM transactions WHERE import_hash = ?",
                params![tx.import_hash],
                |row| row.get(0),
            )
            .optional()?;

        if existing.is_some() {
            return Ok(None); // Duplicate, skip
        }

        conn.execute(
            r#"
            INSERT INTO transactions (user_id, category_id, amount, date, description, import_hash)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                tx.user_id,
                category_id,
                tx.amount.to_string(),
                tx.date.to_string(),
                tx.description,
                tx.import_hash,
            ],
        )?;

        Ok(Some(conn.last_insert_rowid()))
    }

    /// Most recent transactions for a user (newest first)
    pub fn list_transactions(&self, user_id: i64, limit: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let sql = format!(
            "{} WHERE t.user_id = ? ORDER BY t.date DESC, t.id DESC LIMIT ?",
            SELECT_TRANSACTIONS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![user_id, limit], raw_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(RawRow::into_transaction).collect()
    }

    /// Number of transactions stored for a user
    pub fn count_transactions(&self, user_id: i64) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Transactions in a date range, optionally limited to a category type
    pub fn transactions_in_range(
        &self,
        user_id: i64,
        range: DateRange,
        kind: Option<CategoryType>,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let sql = format!(
            "{} WHERE t.user_id = ?1 AND t.date BETWEEN ?2 AND ?3 AND (?4 IS NULL OR COALESCE(c.type, 'expense') = ?4) ORDER BY t.date, t.id",
            SELECT_TRANSACTIONS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(
                params![
                    user_id,
                    range.from.to_string(),
                    range.to.to_string(),
                    kind.map(|k| k.as_str()),
                ],
                raw_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(RawRow::into_transaction).collect()
    }
}

impl TransactionStore for Database {
    fn query(
        &self,
        user_id: i64,
        range: DateRange,
        kind: Option<CategoryType>,
    ) -> Result<Vec<TransactionRecord>> {
        let transactions = self
            .transactions_in_range(user_id, range, kind)
            .map_err(Error::into_unavailable)?;
        Ok(transactions.iter().map(TransactionRecord::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_variants() {
        assert_eq!(
            parse_amount(1, &Value::Text("12.50".to_string())).unwrap(),
            Decimal::new(1250, 2)
        );
        assert_eq!(parse_amount(1, &Value::Integer(7)).unwrap(), Decimal::from(7));
        assert!(matches!(
            parse_amount(3, &Value::Text("twelve".to_string())),
            Err(Error::DataFormat(_))
        ));
        assert!(matches!(parse_amount(4, &Value::Null), Err(Error::DataFormat(_))));
    }
}
