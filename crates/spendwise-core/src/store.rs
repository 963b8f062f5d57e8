//! Read interface over a user's transaction history
//!
//! The analytics never talk to a concrete database. They read through
//! [`TransactionStore`], which the SQLite [`Database`](crate::db::Database)
//! and the in-memory [`MemoryStore`] both implement.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::models::{CategoryType, DateRange, TransactionRecord};

/// Sum amounts, failing with `DataFormat` instead of overflowing
pub fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal> {
    amounts.into_iter().try_fold(Decimal::ZERO, |acc, amount| {
        acc.checked_add(amount).ok_or_else(|| Error::overflow("a total"))
    })
}

/// A queryable snapshot of transactions
///
/// Implementations report infrastructure failures as
/// [`Error::DataUnavailable`](crate::Error::DataUnavailable) and unreadable
/// rows as [`Error::DataFormat`](crate::Error::DataFormat).
pub trait TransactionStore: Send + Sync {
    /// Transactions for `user_id` dated within `range` (inclusive),
    /// optionally limited to one category type
    fn query(
        &self,
        user_id: i64,
        range: DateRange,
        kind: Option<CategoryType>,
    ) -> Result<Vec<TransactionRecord>>;

    /// Sum of amounts grouped by category name
    ///
    /// Categories with no transactions in the range are absent from the map.
    fn sum_by_category(
        &self,
        user_id: i64,
        range: DateRange,
        kind: Option<CategoryType>,
    ) -> Result<BTreeMap<String, Decimal>> {
        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for record in self.query(user_id, range, kind)? {
            let total = totals.entry(record.category_name).or_default();
            *total = total
                .checked_add(record.amount)
                .ok_or_else(|| Error::overflow("category totals"))?;
        }
        Ok(totals)
    }

    /// Sum of all amounts in the range
    fn total(&self, user_id: i64, range: DateRange, kind: Option<CategoryType>) -> Result<Decimal> {
        checked_sum(self.query(user_id, range, kind)?.iter().map(|r| r.amount))
    }
}

/// In-memory store over a fixed set of records
///
/// Useful for guest sessions that never touch the database, and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<(i64, TransactionRecord)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding `records` for a single user
    pub fn for_user(user_id: i64, records: impl IntoIterator<Item = TransactionRecord>) -> Self {
        let mut store = Self::new();
        for record in records {
            store.push(user_id, record);
        }
        store
    }

    pub fn push(&mut self, user_id: i64, record: TransactionRecord) {
        self.records.push((user_id, record));
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TransactionStore for MemoryStore {
    fn query(
        &self,
        user_id: i64,
        range: DateRange,
        kind: Option<CategoryType>,
    ) -> Result<Vec<TransactionRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|(uid, r)| {
                *uid == user_id
                    && range.contains(r.date)
                    && kind.map_or(true, |k| r.category_type == k)
            })
            .map(|(_, r)| r.clone())
            .collect())
    }
}
