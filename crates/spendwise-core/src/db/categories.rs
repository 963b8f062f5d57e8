//! Category operations

use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::error::{Error, Result};
use crate::models::{Category, CategoryRef, CategoryType};

/// Global categories available to every user
const DEFAULT_CATEGORIES: [(&str, CategoryType); 12] = [
    ("Salary", CategoryType::Income),
    ("Business", CategoryType::Income),
    ("Investment", CategoryType::Income),
    ("Other", CategoryType::Income),
    ("Food", CategoryType::Expense),
    ("Travel", CategoryType::Expense),
    ("Rent", CategoryType::Expense),
    ("Shopping", CategoryType::Expense),
    ("Bills", CategoryType::Expense),
    ("Entertainment", CategoryType::Expense),
    ("Health", CategoryType::Expense),
    ("Education", CategoryType::Expense),
];

fn kind_from_sql(idx: usize, raw: String) -> rusqlite::Result<CategoryType> {
    raw.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            Box::new(Error::DataFormat(e)),
        )
    })
}

impl Database {
    /// Seed the global categories (idempotent)
    ///
    /// Returns the number of categories created.
    pub fn seed_default_categories(&self) -> Result<usize> {
        let conn = self.conn()?;
        let mut created = 0;

        for (name, kind) in &DEFAULT_CATEGORIES {
            // NULL user_id needs IS, not =
            let exists: bool = conn
                .query_row(
                    "SELECT 1 FROM categories WHERE name = ? AND type = ? AND user_id IS NULL",
                    params![name, kind.as_str()],
                    |_| Ok(true),
                )
                .optional()?
                .unwrap_or(false);

            if !exists {
                conn.execute(
                    "INSERT INTO categories (name, type, user_id) VALUES (?, ?, NULL)",
                    params![name, kind.as_str()],
                )?;
                created += 1;
            }
        }

        Ok(created)
    }

    /// Categories visible to a user: the global ones plus their own
    pub fn list_categories(&self, user_id: i64) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, type, user_id
            FROM categories
            WHERE user_id IS NULL OR user_id = ?
            ORDER BY type, name
            "#,
        )?;

        let categories = stmt
            .query_map(params![user_id], |row| {
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    kind: kind_from_sql(2, row.get(2)?)?,
                    user_id: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(categories)
    }

    /// Resolve a category reference to a category id
    ///
    /// `Existing` ids must be visible to the user. `NewNamed` matches an
    /// existing global or user category by name and type (case-insensitive),
    /// creating a user category when none exists.
    pub fn resolve_category(&self, user_id: i64, category: &CategoryRef) -> Result<i64> {
        let conn = self.conn()?;

        match category {
            CategoryRef::Existing(id) => conn
                .query_row(
                    "SELECT id FROM categories WHERE id = ? AND (user_id IS NULL OR user_id = ?)",
                    params![id, user_id],
                    |row| row.get(0),
                )
                .optional()?
                .ok_or_else(|| Error::NotFound(format!("Category {}", id))),
            CategoryRef::NewNamed { name, kind } => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(Error::InvalidData("Category name is empty".to_string()));
                }

                let existing: Option<i64> = conn
                    .query_row(
                        r#"
                        SELECT id FROM categories
                        WHERE name = ? COLLATE NOCASE AND type = ?
                          AND (user_id IS NULL OR user_id = ?)
                        ORDER BY user_id IS NULL
                        LIMIT 1
                        "#,
                        params![name, kind.as_str(), user_id],
                        |row| row.get(0),
                    )
                    .optional()?;

                if let Some(id) = existing {
                    return Ok(id);
                }

                conn.execute(
                    "INSERT INTO categories (name, type, user_id) VALUES (?, ?, ?)",
                    params![name, kind.as_str(), user_id],
                )?;
                Ok(conn.last_insert_rowid())
            }
        }
    }
}
