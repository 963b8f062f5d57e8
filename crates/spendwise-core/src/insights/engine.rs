//! Insight Engine - runs the analyzers for a user and assembles the dashboard

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::store::TransactionStore;

use super::types::{DashboardInsights, ForecastResult, InsightType, SpendingInsights};
use super::{SpendingComparator, TrendForecaster};

/// Context provided to insight analyzers
pub struct AnalysisContext<'a> {
    /// Store to read transactions from
    pub store: &'a dyn TransactionStore,
    pub user_id: i64,
    /// The "now" the analysis is relative to
    pub today: NaiveDate,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(store: &'a dyn TransactionStore, user_id: i64, today: NaiveDate) -> Self {
        Self {
            store,
            user_id,
            today,
        }
    }

    /// Create context relative to the local date
    pub fn today(store: &'a dyn TransactionStore, user_id: i64) -> Self {
        Self::new(store, user_id, chrono::Local::now().date_naive())
    }
}

/// Trait for insight analyzers
///
/// Analyzers are stateless apart from their configuration, so one instance
/// can serve many users concurrently.
pub trait Insight: Send + Sync {
    type Output;

    /// Unique identifier for this insight type
    fn id(&self) -> InsightType;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// Analyze the user's transactions
    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<Self::Output>;
}

/// The main insight engine that orchestrates analysis
pub struct InsightEngine {
    comparator: SpendingComparator,
    forecaster: TrendForecaster,
    /// Category insights kept on the dashboard
    dashboard_limit: usize,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightEngine {
    /// Create an engine with the default configuration
    pub fn new() -> Self {
        Self::with_config(&AnalyticsConfig::default())
    }

    pub fn with_config(config: &AnalyticsConfig) -> Self {
        Self {
            comparator: SpendingComparator::new(),
            forecaster: TrendForecaster::with_config(config.forecast.clone()),
            dashboard_limit: config.insights.dashboard_limit,
        }
    }

    /// Month-over-month comparison (full category list)
    pub fn spending_insights(&self, ctx: &AnalysisContext<'_>) -> Result<SpendingInsights> {
        run(&self.comparator, ctx)
    }

    /// Next-month forecast
    pub fn forecast(&self, ctx: &AnalysisContext<'_>) -> Result<ForecastResult> {
        run(&self.forecaster, ctx)
    }

    /// Run both analyzers for the dashboard
    ///
    /// A section whose data is unavailable is left out (None) and logged;
    /// any other failure is returned.
    pub fn dashboard(&self, ctx: &AnalysisContext<'_>) -> Result<DashboardInsights> {
        let spending = degrade(&self.comparator, self.spending_insights(ctx))?.map(|mut s| {
            s.category_insights.truncate(self.dashboard_limit);
            s
        });
        let forecast = degrade(&self.forecaster, self.forecast(ctx))?;

        Ok(DashboardInsights { spending, forecast })
    }

    /// Get list of registered insight types
    pub fn insight_types(&self) -> Vec<InsightType> {
        vec![self.comparator.id(), self.forecaster.id()]
    }
}

fn run<I: Insight>(insight: &I, ctx: &AnalysisContext<'_>) -> Result<I::Output> {
    let output = insight.analyze(ctx)?;
    debug!(
        insight = insight.id().as_str(),
        user_id = ctx.user_id,
        today = %ctx.today,
        "Insight analysis complete"
    );
    Ok(output)
}

/// Turn a `DataUnavailable` failure into an omitted section
fn degrade<I: Insight, T>(insight: &I, result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(output) => Ok(Some(output)),
        Err(e) if e.is_data_unavailable() => {
            warn!(
                insight = insight.id().as_str(),
                error = %e,
                "{} unavailable, omitting section",
                insight.name()
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::{CategoryType, DateRange, TransactionRecord};
    use crate::store::MemoryStore;
    use crate::test_utils::{date, expense};
    use rust_decimal_macros::dec;

    /// Store whose queries always fail with the given error
    struct FailingStore(fn() -> Error);

    impl TransactionStore for FailingStore {
        fn query(
            &self,
            _user_id: i64,
            _range: DateRange,
            _kind: Option<CategoryType>,
        ) -> Result<Vec<TransactionRecord>> {
            Err((self.0)())
        }
    }

    #[test]
    fn test_engine_creation() {
        let engine = InsightEngine::new();
        let types = engine.insight_types();

        assert!(types.contains(&InsightType::SpendingComparator));
        assert!(types.contains(&InsightType::TrendForecaster));
    }

    #[test]
    fn test_dashboard_empty_store() {
        let store = MemoryStore::new();
        let engine = InsightEngine::new();
        let ctx = AnalysisContext::new(&store, 1, date(2024, 6, 15));

        let dashboard = engine.dashboard(&ctx).unwrap();
        let spending = dashboard.spending.unwrap();
        assert!(spending.category_insights.is_empty());
        assert!(!spending.has_prev_data);

        let forecast = dashboard.forecast.unwrap();
        assert_eq!(forecast.prediction_total, dec!(0));
        assert_eq!(forecast.suggestions.len(), 1);
    }

    #[test]
    fn test_dashboard_trims_category_list() {
        let today = date(2024, 6, 15);
        let records = ["A", "B", "C", "D", "E", "F", "G"]
            .iter()
            .map(|name| expense(dec!(10), today, name))
            .collect::<Vec<_>>();
        let store = MemoryStore::for_user(1, records);
        let engine = InsightEngine::new();
        let ctx = AnalysisContext::new(&store, 1, today);

        assert_eq!(engine.spending_insights(&ctx).unwrap().category_insights.len(), 7);
        let dashboard = engine.dashboard(&ctx).unwrap();
        assert_eq!(dashboard.spending.unwrap().category_insights.len(), 5);
    }

    #[test]
    fn test_dashboard_degrades_when_unavailable() {
        let store = FailingStore(|| Error::DataUnavailable("connection refused".to_string()));
        let engine = InsightEngine::new();
        let ctx = AnalysisContext::new(&store, 1, date(2024, 6, 15));

        let dashboard = engine.dashboard(&ctx).unwrap();
        assert!(dashboard.spending.is_none());
        assert!(dashboard.forecast.is_none());

        // Direct calls surface the error
        assert!(engine.forecast(&ctx).unwrap_err().is_data_unavailable());
    }

    #[test]
    fn test_dashboard_propagates_format_errors() {
        let store = FailingStore(|| Error::DataFormat("amount 'abc'".to_string()));
        let engine = InsightEngine::new();
        let ctx = AnalysisContext::new(&store, 1, date(2024, 6, 15));

        assert!(matches!(engine.dashboard(&ctx), Err(Error::DataFormat(_))));
    }
}
