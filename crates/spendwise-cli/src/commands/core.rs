//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` / `load_config` - Shared setup for every command
//! - `resolve_today`, `parse_date`, `parse_amount` - Argument parsing
//! - `cmd_init` - Initialize the database
//! - `cmd_categories` - List categories

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use spendwise_core::{AnalyticsConfig, CategoryType, Database};

use super::truncate;

pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .with_context(|| format!("Database path is not valid UTF-8: {}", db_path.display()))?;
    Database::new(path_str).context("Failed to open database")
}

/// Load analytics settings from `--config`, the user override, or the built-in defaults
pub fn load_config(path: Option<&Path>) -> Result<AnalyticsConfig> {
    let config = match path {
        Some(path) => AnalyticsConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AnalyticsConfig::load().context("Failed to load analytics config")?,
    };
    Ok(config)
}

/// `--today` if given, else the local date
pub fn resolve_today(today: Option<&str>) -> Result<NaiveDate> {
    match today {
        Some(s) => parse_date(s, "--today"),
        None => Ok(Local::now().date_naive()),
    }
}

pub fn parse_date(s: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid {} date format (use YYYY-MM-DD): {}", flag, s))
}

pub fn parse_amount(s: &str, flag: &str) -> Result<Decimal> {
    Decimal::from_str(s.trim()).with_context(|| format!("Invalid {} amount: {}", flag, s))
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;

    let seeded = db
        .seed_default_categories()
        .context("Failed to seed default categories")?;
    if seeded > 0 {
        println!("   Seeded {} default categories", seeded);
    } else {
        println!("   Default categories already present");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Import transactions: spendwise import --file transactions.csv");
    println!("  2. See this month's insights: spendwise insights");

    Ok(())
}

pub fn cmd_categories(db: &Database, user_id: i64) -> Result<()> {
    let categories = db.list_categories(user_id)?;

    if categories.is_empty() {
        println!("No categories found. Run 'spendwise init' to seed the defaults.");
        return Ok(());
    }

    for kind in [CategoryType::Income, CategoryType::Expense] {
        println!();
        println!("{}:", if kind == CategoryType::Income { "Income" } else { "Expense" });
        for category in categories.iter().filter(|c| c.kind == kind) {
            let scope = if category.user_id.is_some() { " (custom)" } else { "" };
            println!("   {:3}  {}{}", category.id, truncate(&category.name, 30), scope);
        }
    }
    println!();

    Ok(())
}
