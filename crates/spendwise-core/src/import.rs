//! CSV import of transaction exports
//!
//! Expected columns (header row required, matched case-insensitively):
//! `Date,Category,Type,Description,Amount[,Currency]`. Dates are
//! `YYYY-MM-DD`. The optional currency column is informational; amounts are
//! stored as given.

use std::collections::HashMap;
use std::io::Read;
use std::str::FromStr;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use rust_decimal::Decimal;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{CategoryRef, CategoryType, NewTransaction};

/// Category used when a row leaves the category blank
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Outcome of importing a batch into the database
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    pub parsed: usize,
    pub imported: usize,
    /// Rows already present (same import hash)
    pub skipped: usize,
}

/// Column positions resolved from the header row
struct Columns {
    date: usize,
    category: usize,
    kind: usize,
    description: usize,
    amount: usize,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| Error::InvalidData(format!("Missing CSV column: {}", name)))
        };

        Ok(Self {
            date: find("Date")?,
            category: find("Category")?,
            kind: find("Type")?,
            description: find("Description")?,
            amount: find("Amount")?,
        })
    }
}

/// Parse an exported CSV into transactions for `user_id`
pub fn parse_csv<R: Read>(reader: R, user_id: i64) -> Result<Vec<NewTransaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut transactions = Vec::new();
    // Identical rows are legitimate (two coffees on one day); number them
    let mut occurrences: HashMap<String, usize> = HashMap::new();

    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let field = |idx: usize, name: &str| {
            record
                .get(idx)
                .ok_or_else(|| Error::InvalidData(format!("Line {}: missing {}", line, name)))
        };

        let date = parse_date(field(columns.date, "date")?)
            .map_err(|e| Error::DataFormat(format!("Line {}: {}", line, e)))?;
        let amount = parse_amount(field(columns.amount, "amount")?)
            .map_err(|e| Error::DataFormat(format!("Line {}: {}", line, e)))?;
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidData(format!(
                "Line {}: amount must be positive, got {}",
                line, amount
            )));
        }
        let kind = CategoryType::from_str(field(columns.kind, "type")?)
            .map_err(|e| Error::InvalidData(format!("Line {}: {}", line, e)))?;

        let category = match field(columns.category, "category")? {
            "" => UNCATEGORIZED,
            name => name,
        };
        let description = record.get(columns.description).unwrap_or("").to_string();

        let key = row_key(user_id, &date, category, kind, &description, &amount);
        let occurrence = occurrences.entry(key.clone()).or_insert(0);
        let import_hash = generate_hash(&key, *occurrence);
        *occurrence += 1;

        transactions.push(NewTransaction {
            user_id,
            category: CategoryRef::NewNamed {
                name: category.to_string(),
                kind,
            },
            amount,
            date,
            description,
            import_hash,
        });
    }

    debug!(count = transactions.len(), "Parsed CSV transactions");
    Ok(transactions)
}

/// Insert parsed transactions, skipping ones already imported
pub fn import_transactions(db: &Database, transactions: &[NewTransaction]) -> Result<ImportStats> {
    let mut stats = ImportStats {
        parsed: transactions.len(),
        ..Default::default()
    };

    for tx in transactions {
        match db.insert_transaction(tx)? {
            Some(_) => stats.imported += 1,
            None => stats.skipped += 1,
        }
    }

    info!(
        parsed = stats.parsed,
        imported = stats.imported,
        skipped = stats.skipped,
        "Import complete"
    );
    Ok(stats)
}

/// Canonical text of a row, the input to its import hash
fn row_key(
    user_id: i64,
    date: &NaiveDate,
    category: &str,
    kind: CategoryType,
    description: &str,
    amount: &Decimal,
) -> String {
    // Unit separator keeps field boundaries unambiguous
    [
        user_id.to_string(),
        date.to_string(),
        category.to_lowercase(),
        kind.as_str().to_string(),
        description.to_string(),
        amount.normalize().to_string(),
    ]
    .join("\u{1f}")
}

/// Generate a unique hash for deduplication
fn generate_hash(row_key: &str, occurrence: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(row_key.as_bytes());
    hasher.update((occurrence as u64).to_be_bytes());
    hex::encode(hasher.finalize())
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Unable to parse date: {} (expected YYYY-MM-DD)", s))
}

/// Parse an amount, allowing currency symbols and thousands separators
fn parse_amount(s: &str) -> std::result::Result<Decimal, String> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '₹' | '€' | '£' | '¥' | ',' | ' '))
        .collect();

    Decimal::from_str(&cleaned).map_err(|_| format!("Unable to parse amount: {}", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const EXPORT: &str = "Date,Category,Type,Description,Amount,Currency
2024-03-02,Food,expense,Groceries,150.00,INR
2024-03-01,Salary,income,Monthly Salary,4000.00,INR
2024-03-02,Food,expense,Groceries,150.00,INR
";

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_amount("₹ 99.5").unwrap(), dec!(99.5));
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_parse_export() {
        let transactions = parse_csv(EXPORT.as_bytes(), 7).unwrap();
        assert_eq!(transactions.len(), 3);

        let first = &transactions[0];
        assert_eq!(first.user_id, 7);
        assert_eq!(first.amount, dec!(150.00));
        assert_eq!(first.description, "Groceries");
        assert_eq!(
            first.category,
            CategoryRef::NewNamed {
                name: "Food".to_string(),
                kind: CategoryType::Expense
            }
        );
        assert_eq!(transactions[1].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_identical_rows_get_distinct_hashes() {
        let transactions = parse_csv(EXPORT.as_bytes(), 1).unwrap();
        assert_ne!(transactions[0].import_hash, transactions[2].import_hash);

        // Stable across parses
        let again = parse_csv(EXPORT.as_bytes(), 1).unwrap();
        assert_eq!(transactions[0].import_hash, again[0].import_hash);

        // Scoped to the user
        let other = parse_csv(EXPORT.as_bytes(), 2).unwrap();
        assert_ne!(transactions[0].import_hash, other[0].import_hash);
    }

    #[test]
    fn test_columns_matched_by_name() {
        let csv = "amount,description,type,category,date\n12.5,Coffee,Expense,,2024-01-09\n";
        let transactions = parse_csv(csv.as_bytes(), 1).unwrap();
        assert_eq!(transactions[0].amount, dec!(12.5));
        assert_eq!(
            transactions[0].category,
            CategoryRef::NewNamed {
                name: UNCATEGORIZED.to_string(),
                kind: CategoryType::Expense
            }
        );
    }

    #[test]
    fn test_bad_amount_names_line() {
        let csv = "Date,Category,Type,Description,Amount\n2024-01-01,Food,expense,x,10\n2024-01-02,Food,expense,y,ten\n";
        let err = parse_csv(csv.as_bytes(), 1).unwrap_err();
        assert!(matches!(err, Error::DataFormat(_)));
        assert!(err.to_string().contains("Line 3"), "{}", err);
    }

    #[test]
    fn test_bad_date_is_data_format() {
        let csv = "Date,Category,Type,Description,Amount\n01/02/2024,Food,expense,x,10\n";
        assert!(matches!(
            parse_csv(csv.as_bytes(), 1),
            Err(Error::DataFormat(_))
        ));
    }

    #[test]
    fn test_unknown_type_is_invalid() {
        let csv = "Date,Category,Type,Description,Amount\n2024-01-02,Food,transfer,x,10\n";
        assert!(matches!(
            parse_csv(csv.as_bytes(), 1),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_missing_column() {
        let csv = "Date,Category,Description,Amount\n2024-01-02,Food,x,10\n";
        let err = parse_csv(csv.as_bytes(), 1).unwrap_err();
        assert!(err.to_string().contains("Type"));
    }

    #[test]
    fn test_import_skips_duplicates() {
        let db = Database::in_memory().unwrap();
        db.seed_default_categories().unwrap();

        let transactions = parse_csv(EXPORT.as_bytes(), 1).unwrap();
        let first = import_transactions(&db, &transactions).unwrap();
        assert_eq!(first.imported, 3);
        assert_eq!(first.skipped, 0);

        let second = import_transactions(&db, &transactions).unwrap();
        assert_eq!(second.imported, 0);
        assert_eq!(second.skipped, 3);
        assert_eq!(db.count_transactions(1).unwrap(), 3);
    }
}
