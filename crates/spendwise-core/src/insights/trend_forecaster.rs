//! Trend Forecaster Insight
//!
//! Projects next month's expenses from the trailing seven months (six back
//! plus the current one). The overall total and every category get their own
//! least-squares line; the forecast also carries saving suggestions for the
//! biggest categories and one note on the overall trend.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use crate::config::{AnchorMode, ForecastConfig};
use crate::error::{Error, Result};
use crate::models::{CategoryType, MonthBucket};
use crate::store::checked_sum;

use super::engine::{AnalysisContext, Insight};
use super::regression::{mean, pad_left, simple_linear_predict};
use super::types::{ForecastResult, InsightType, Suggestion, SuggestionKind};

/// Number of monthly anchors (6 back + current)
pub const HISTORY_MONTHS: usize = 7;

/// Upper bound on suggestions per forecast, whatever the config asks for
pub const MAX_SUGGESTIONS: usize = 4;

const NEXT_MONTH_LABEL: &str = "Next Month (Est.)";

/// Insight that forecasts next month's spending
#[derive(Debug, Clone, Default)]
pub struct TrendForecaster {
    config: ForecastConfig,
}

/// Expense history gathered for the forecast, oldest anchor first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseHistory {
    pub anchors: Vec<MonthBucket>,
    /// Total expense per anchor
    pub totals: Vec<Decimal>,
    /// Per category, one entry for each anchor the category had spending in
    pub by_category: BTreeMap<String, Vec<Decimal>>,
}

impl TrendForecaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ForecastConfig) -> Self {
        Self { config }
    }

    /// Months the forecast aggregates, oldest first
    pub fn anchors(&self, today: NaiveDate) -> Vec<MonthBucket> {
        match self.config.anchor_mode {
            AnchorMode::ThirtyDaySteps => (0..HISTORY_MONTHS as i64)
                .rev()
                .map(|i| {
                    let day = today
                        .checked_sub_signed(Duration::days(30 * i))
                        .unwrap_or(NaiveDate::MIN);
                    MonthBucket::from_date(day)
                })
                .collect(),
            AnchorMode::Calendar => {
                let mut anchors: Vec<MonthBucket> =
                    std::iter::successors(Some(MonthBucket::from_date(today)), |m| m.previous())
                        .take(HISTORY_MONTHS)
                        .collect();
                anchors.reverse();
                anchors
            }
        }
    }

    /// Build the forecast from gathered history
    ///
    /// Series too large for decimal arithmetic fail with `DataFormat`.
    pub fn project(&self, history: &ExpenseHistory) -> Result<ForecastResult> {
        let prediction = simple_linear_predict(&history.totals)?;
        let average = mean(&history.totals)?;

        let predicted_by_category = history
            .by_category
            .iter()
            .map(|(category, values)| {
                let series = pad_left(values, history.anchors.len());
                Ok((category.clone(), simple_linear_predict(&series)?.round_dp(2)))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        let mut suggestions = self.saving_suggestions(&history.by_category)?;
        if let Some(trend) = self.trend_suggestion(prediction, average) {
            suggestions.push(trend);
        }
        suggestions.truncate(self.config.max_suggestions.min(MAX_SUGGESTIONS));

        let mut chart_labels: Vec<String> = history.anchors.iter().map(|m| m.label()).collect();
        chart_labels.push(NEXT_MONTH_LABEL.to_string());

        let prediction_total = prediction.round_dp(2);
        let mut chart_values = history.totals.clone();
        chart_values.push(prediction_total);

        Ok(ForecastResult {
            prediction_total,
            predicted_by_category,
            suggestions,
            chart_labels,
            chart_values,
            historical_average: average.round_dp(2),
        })
    }

    /// Saving suggestions for the categories with the highest total spend
    fn saving_suggestions(
        &self,
        by_category: &BTreeMap<String, Vec<Decimal>>,
    ) -> Result<Vec<Suggestion>> {
        let mut ranked = by_category
            .iter()
            .map(|(category, values)| Ok((category, checked_sum(values.iter().copied())?, values)))
            .collect::<Result<Vec<(&String, Decimal, &Vec<Decimal>)>>>()?;
        // Stable: equal totals keep category name order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let percent = self
            .config
            .saving_rate
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or_else(|| Error::overflow("saving suggestions"))?
            .normalize();

        let mut suggestions = Vec::new();
        for (category, _, values) in ranked.into_iter().take(self.config.top_categories) {
            let average = mean(values)?;
            if average <= Decimal::ZERO {
                continue;
            }
            let saving = average
                .checked_mul(self.config.saving_rate)
                .ok_or_else(|| Error::overflow("saving suggestions"))?
                .round_dp(2);
            suggestions.push(Suggestion::new(
                SuggestionKind::Saving,
                format!(
                    "You can save about {}% on {} next month, which is roughly {:.2} based on your averages.",
                    percent, category, saving
                ),
            ));
        }
        Ok(suggestions)
    }

    /// At most one note on where the total is heading
    fn trend_suggestion(&self, prediction: Decimal, average: Decimal) -> Option<Suggestion> {
        // Ratios are positive, so an overflowing threshold lies above any prediction
        let rising = average
            .checked_mul(self.config.rising_ratio)
            .map_or(false, |threshold| prediction > threshold);
        let falling = average
            .checked_mul(self.config.falling_ratio)
            .map_or(true, |threshold| prediction < threshold);

        if average > Decimal::ZERO && rising {
            Some(Suggestion::new(
                SuggestionKind::Warning,
                "Your spending trend is increasing. Try to review your non-essential subscriptions.",
            ))
        } else if average > Decimal::ZERO && falling {
            Some(Suggestion::new(
                SuggestionKind::Success,
                "Great trend! You are on track to spend less than your average next month.",
            ))
        } else if average.is_zero() {
            Some(Suggestion::new(
                SuggestionKind::Info,
                "Start tracking your expenses to see personalized insights here!",
            ))
        } else {
            None
        }
    }

    /// Read the monthly expense history for the context's user
    pub fn gather(&self, ctx: &AnalysisContext<'_>) -> Result<ExpenseHistory> {
        let anchors = self.anchors(ctx.today);
        let mut totals = Vec::with_capacity(anchors.len());
        let mut by_category: BTreeMap<String, Vec<Decimal>> = BTreeMap::new();

        for anchor in &anchors {
            let sums =
                ctx.store
                    .sum_by_category(ctx.user_id, anchor.range(), Some(CategoryType::Expense))?;
            totals.push(checked_sum(sums.values().copied())?);
            for (category, amount) in sums {
                by_category.entry(category).or_default().push(amount);
            }
        }

        Ok(ExpenseHistory {
            anchors,
            totals,
            by_category,
        })
    }
}

impl Insight for TrendForecaster {
    type Output = ForecastResult;

    fn id(&self) -> InsightType {
        InsightType::TrendForecaster
    }

    fn name(&self) -> &'static str {
        "Trend Forecaster"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<ForecastResult> {
        let history = self.gather(ctx)?;
        let result = self.project(&history)?;

        tracing::debug!(
            months = history.anchors.len(),
            categories = history.by_category.len(),
            prediction = %result.prediction_total,
            suggestions = result.suggestions.len(),
            "Forecast computed"
        );

        Ok(result)
    }
}
