//! Insight Engine - spending analytics over a user's transaction history
//!
//! Both analyzers are pure functions of the store contents and a "today"
//! date; nothing is cached or persisted.
//!
//! ## Core Insight Types
//!
//! - **Spending Comparator** - This month vs last month, per category and overall
//! - **Trend Forecaster** - Least-squares projection of next month's expenses
//!   with saving suggestions
//!
//! ## Usage
//!
//! ```rust,ignore
//! use spendwise_core::insights::{AnalysisContext, InsightEngine};
//!
//! let engine = InsightEngine::with_config(&config);
//! let ctx = AnalysisContext::today(&db, user_id);
//! let dashboard = engine.dashboard(&ctx)?;
//! ```

pub mod engine;
pub mod regression;
pub mod spending_comparator;
pub mod trend_forecaster;
pub mod types;

pub use engine::{AnalysisContext, Insight, InsightEngine};
pub use regression::simple_linear_predict;
pub use spending_comparator::SpendingComparator;
pub use trend_forecaster::{ExpenseHistory, TrendForecaster, HISTORY_MONTHS, MAX_SUGGESTIONS};
pub use types::{
    CategoryInsight, DashboardInsights, ForecastResult, InsightStatus, InsightType,
    SpendingInsights, Suggestion, SuggestionKind, TotalInsight, TotalStatus,
};
