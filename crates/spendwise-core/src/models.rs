//! Domain models for Spendwise

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether a category records money coming in or going out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Income,
    Expense,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!(
                "Unknown category type: {} (valid: income, expense)",
                s
            )),
        }
    }
}

impl std::fmt::Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction as the analytics see it (read-only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category_name: String,
    pub category_type: CategoryType,
}

impl TransactionRecord {
    pub fn new(
        amount: Decimal,
        date: NaiveDate,
        category_name: impl Into<String>,
        category_type: CategoryType,
    ) -> Self {
        Self {
            amount,
            date,
            category_name: category_name.into(),
            category_type,
        }
    }
}

/// Inclusive date range used for store queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// The full calendar month containing `date`
    pub fn month_of(date: NaiveDate) -> Self {
        MonthBucket::from_date(date).range()
    }

    /// First day of `today`'s month through `today`
    pub fn month_to_date(today: NaiveDate) -> Self {
        Self::new(MonthBucket::from_date(today).first_day(), today)
    }

    /// Every date the store can hold (years 1 through 9999)
    ///
    /// Bounded so the dates keep their plain `YYYY-MM-DD` form, which SQLite
    /// compares as text.
    pub fn all_time() -> Self {
        Self::new(
            NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN),
            NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX),
        )
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// A calendar month, the aggregation key for monthly series
///
/// Held as the month's first day, so every value names a real month.
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthBucket {
    first: NaiveDate,
}

impl MonthBucket {
    /// `None` unless `month` is 1 through 12 within chrono's year range
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    /// `None` past the last month chrono can represent
    pub fn next(&self) -> Option<Self> {
        self.first
            .checked_add_months(Months::new(1))
            .map(|first| Self { first })
    }

    /// `None` before the first month chrono can represent
    pub fn previous(&self) -> Option<Self> {
        self.first
            .checked_sub_months(Months::new(1))
            .map(|first| Self { first })
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.first_day(), self.last_day())
    }

    /// Short chart label, e.g. "Mar 2024"
    pub fn label(&self) -> String {
        self.first.format("%b %Y").to_string()
    }
}

impl std::fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// A category row from the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub kind: CategoryType,
    /// None for global categories shared by every user
    pub user_id: Option<i64>,
}

/// Reference to the category of a new transaction
///
/// Either an existing category row or a custom name that is created on
/// demand. Resolved to an id before the transaction is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryRef {
    Existing(i64),
    NewNamed { name: String, kind: CategoryType },
}

/// A new transaction to be stored (before DB insertion)
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: i64,
    pub category: CategoryRef,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
    /// Hash for deduplication
    pub import_hash: String,
}

/// A stored transaction joined with its category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub category_name: String,
    pub category_type: CategoryType,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Transaction> for TransactionRecord {
    fn from(tx: &Transaction) -> Self {
        TransactionRecord::new(
            tx.amount,
            tx.date,
            tx.category_name.clone(),
            tx.category_type,
        )
    }
}

/// A savings goal (input to goal progress)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub name: String,
    pub target_amount: Decimal,
    pub saved_amount: Decimal,
    pub target_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_category_type_parsing() {
        assert_eq!(CategoryType::from_str("Expense").unwrap(), CategoryType::Expense);
        assert_eq!(CategoryType::from_str(" income ").unwrap(), CategoryType::Income);
        assert!(CategoryType::from_str("transfer").is_err());
    }

    fn month(year: i32, month: u32) -> MonthBucket {
        MonthBucket::new(year, month).unwrap()
    }

    #[test]
    fn test_month_bucket_bounds() {
        let feb = MonthBucket::from_date(date(2024, 2, 17));
        assert_eq!(feb.first_day(), date(2024, 2, 1));
        assert_eq!(feb.last_day(), date(2024, 2, 29));

        let dec = MonthBucket::from_date(date(2023, 12, 31));
        assert_eq!(dec.last_day(), date(2023, 12, 31));
        assert_eq!(dec.next(), Some(month(2024, 1)));
        assert_eq!(dec.next().and_then(|m| m.previous()), Some(dec));
    }

    #[test]
    fn test_month_bucket_rejects_invalid_month() {
        assert!(MonthBucket::new(2024, 13).is_none());
        assert!(MonthBucket::new(2024, 0).is_none());
        assert_eq!(month(2024, 12).month(), 12);
        assert_eq!(month(2024, 12).year(), 2024);
    }

    #[test]
    fn test_month_bucket_at_calendar_edges() {
        let last = MonthBucket::from_date(NaiveDate::MAX);
        assert!(last.next().is_none());
        assert_eq!(last.last_day(), NaiveDate::MAX);

        let first = MonthBucket::from_date(NaiveDate::MIN);
        assert!(first.previous().is_none());
    }

    #[test]
    fn test_month_bucket_ordering_is_chronological() {
        let mut months = vec![month(2024, 1), month(2023, 12), month(2023, 2)];
        months.sort();
        assert_eq!(months[0], month(2023, 2));
        assert_eq!(months[2], month(2024, 1));
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month(2024, 3).label(), "Mar 2024");
        assert_eq!(month(2024, 3).to_string(), "2024-03");
    }

    #[test]
    fn test_month_to_date_range() {
        let range = DateRange::month_to_date(date(2024, 5, 12));
        assert_eq!(range.from, date(2024, 5, 1));
        assert_eq!(range.to, date(2024, 5, 12));
        assert!(range.contains(date(2024, 5, 12)));
        assert!(!range.contains(date(2024, 5, 13)));
    }
}
