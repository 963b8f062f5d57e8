//! Core types for the Insight Engine

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Types of insights that can be generated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    /// Month-over-month spending deltas by category
    SpendingComparator,
    /// Next-month projection and saving suggestions
    TrendForecaster,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::SpendingComparator => "spending_comparator",
            InsightType::TrendForecaster => "trend_forecaster",
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spending_comparator" => Ok(InsightType::SpendingComparator),
            "trend_forecaster" => Ok(InsightType::TrendForecaster),
            _ => Err(format!("Unknown insight type: {}", s)),
        }
    }
}

/// How a category's spending moved against last month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightStatus {
    /// Nothing spent last month, something spent this month
    New,
    Increase,
    Decrease,
    /// Change rounds to 0.0%
    Neutral,
}

impl InsightStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightStatus::New => "new",
            InsightStatus::Increase => "increase",
            InsightStatus::Decrease => "decrease",
            InsightStatus::Neutral => "neutral",
        }
    }
}

impl fmt::Display for InsightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(InsightStatus::New),
            "increase" => Ok(InsightStatus::Increase),
            "decrease" => Ok(InsightStatus::Decrease),
            "neutral" => Ok(InsightStatus::Neutral),
            _ => Err(format!("Unknown insight status: {}", s)),
        }
    }
}

/// One category's month-over-month comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryInsight {
    pub category: String,
    /// Spent this month so far
    pub current: Decimal,
    /// Spent during the whole previous month
    pub prev: Decimal,
    /// Percent change rounded to one decimal (100.0 for new categories)
    #[serde(rename = "change")]
    pub change_percent: Decimal,
    pub status: InsightStatus,
    pub text: String,
}

/// Direction of the overall spending change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalStatus {
    Increase,
    Decrease,
}

impl TotalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TotalStatus::Increase => "increase",
            TotalStatus::Decrease => "decrease",
        }
    }
}

impl fmt::Display for TotalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Overall spending change against last month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalInsight {
    pub text: String,
    pub status: TotalStatus,
    /// Percent change rounded to one decimal
    pub change_percent: Decimal,
}

/// Comparator output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendingInsights {
    /// Sorted by absolute change, largest first
    pub category_insights: Vec<CategoryInsight>,
    pub total_insight: Option<TotalInsight>,
    /// True when anything was spent last month
    pub has_prev_data: bool,
}

/// Category of a forecast suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Saving,
    Warning,
    Success,
    Info,
}

impl SuggestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKind::Saving => "saving",
            SuggestionKind::Warning => "warning",
            SuggestionKind::Success => "success",
            SuggestionKind::Info => "info",
        }
    }

    /// Display icon shown next to the suggestion
    pub fn icon(&self) -> &'static str {
        match self {
            SuggestionKind::Saving => "💡",
            SuggestionKind::Warning => "📈",
            SuggestionKind::Success => "🤖",
            SuggestionKind::Info => "✨",
        }
    }

    /// Trend suggestions (at most one per forecast)
    pub fn is_trend(&self) -> bool {
        !matches!(self, SuggestionKind::Saving)
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SuggestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "saving" => Ok(SuggestionKind::Saving),
            "warning" => Ok(SuggestionKind::Warning),
            "success" => Ok(SuggestionKind::Success),
            "info" => Ok(SuggestionKind::Info),
            _ => Err(format!("Unknown suggestion kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub icon: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
}

impl Suggestion {
    pub fn new(kind: SuggestionKind, text: impl Into<String>) -> Self {
        Self {
            icon: kind.icon().to_string(),
            text: text.into(),
            kind,
        }
    }
}

/// Forecaster output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Projected expense total for next month, rounded to 2 decimals
    pub prediction_total: Decimal,
    /// Projected expense per category, rounded to 2 decimals
    #[serde(rename = "predicted_categories")]
    pub predicted_by_category: BTreeMap<String, Decimal>,
    pub suggestions: Vec<Suggestion>,
    /// One label per anchor month plus "Next Month (Est.)"
    pub chart_labels: Vec<String>,
    /// Monthly totals followed by the rounded prediction
    #[serde(rename = "chart_data")]
    pub chart_values: Vec<Decimal>,
    /// Mean of the monthly totals, rounded to 2 decimals
    #[serde(rename = "historical_avg")]
    pub historical_average: Decimal,
}

/// Everything the dashboard shows; a section is None when its data was unavailable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardInsights {
    pub spending: Option<SpendingInsights>,
    pub forecast: Option<ForecastResult>,
}
