//! Spendwise Core Library
//!
//! Shared functionality for the Spendwise personal finance tracker:
//! - Transaction store interface with SQLite and in-memory implementations
//! - CSV import of transaction exports
//! - Insight engine: month-over-month comparator and trend forecaster
//! - Yearly, period and balance reports
//! - Currency conversion for display
//! - Savings goal progress
//! - Analytics configuration with embedded defaults

pub mod config;
pub mod currency;
pub mod db;
pub mod error;
pub mod goals;
pub mod import;
pub mod insights;
pub mod models;
pub mod reports;
pub mod store;

/// Test fixtures shared with other crates' tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{AnalyticsConfig, AnchorMode, CurrencyConfig, ForecastConfig, InsightsConfig};
pub use currency::{currency_symbol, format_money, CurrencyConverter, RateLookup, StaticRates};
pub use db::Database;
pub use error::{Error, Result};
pub use goals::{GoalProgress, GoalStatus, SavingsBreakdown};
pub use import::{import_transactions, parse_csv, ImportStats};
pub use insights::{
    AnalysisContext, DashboardInsights, ForecastResult, InsightEngine, SpendingInsights,
};
pub use models::{
    Category, CategoryRef, CategoryType, DateRange, Goal, MonthBucket, NewTransaction,
    Transaction, TransactionRecord,
};
pub use reports::{
    balance_summary, period_summary, year_overview, BalanceSummary, PeriodSummary, YearOverview,
};
pub use store::{MemoryStore, TransactionStore};
