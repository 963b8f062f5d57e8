//! Spending Comparator Insight
//!
//! Compares this month's expenses (month to date) with the whole previous
//! month, per category and overall. Categories that had no spending last
//! month are reported as new instead of dividing by zero.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::models::{CategoryType, DateRange, MonthBucket};
use crate::store::checked_sum;

use super::engine::{AnalysisContext, Insight};
use super::types::{
    CategoryInsight, InsightStatus, InsightType, SpendingInsights, TotalInsight, TotalStatus,
};

/// Insight that compares spending with last month
#[derive(Debug, Clone, Default)]
pub struct SpendingComparator;

impl SpendingComparator {
    pub fn new() -> Self {
        Self
    }

    /// Compare two category → amount maps
    ///
    /// Pure; the result is deterministic for given inputs. Amounts whose
    /// change cannot be represented fail with `DataFormat`.
    pub fn compare(
        current: &BTreeMap<String, Decimal>,
        previous: &BTreeMap<String, Decimal>,
    ) -> Result<SpendingInsights> {
        let categories: BTreeSet<&String> = current.keys().chain(previous.keys()).collect();
        let mut insights = Vec::with_capacity(categories.len());

        for category in categories {
            let cur = current.get(category).copied().unwrap_or_default();
            let prev = previous.get(category).copied().unwrap_or_default();

            if let Some(insight) = compare_category(category, cur, prev)? {
                insights.push(insight);
            }
        }

        // Stable: equal changes keep category name order
        insights.sort_by(|a, b| b.change_percent.abs().cmp(&a.change_percent.abs()));

        let current_total = checked_sum(current.values().copied())?;
        let previous_total = checked_sum(previous.values().copied())?;

        Ok(SpendingInsights {
            category_insights: insights,
            total_insight: total_insight(current_total, previous_total)?,
            has_prev_data: previous_total > Decimal::ZERO,
        })
    }
}

fn percent_change(current: Decimal, previous: Decimal) -> Result<Decimal> {
    current
        .checked_sub(previous)
        .and_then(|delta| delta.checked_div(previous))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|percent| percent.round_dp(1))
        .ok_or_else(|| Error::overflow("the change from last month"))
}

fn compare_category(
    category: &str,
    cur: Decimal,
    prev: Decimal,
) -> Result<Option<CategoryInsight>> {
    let (change_percent, status, text) = if prev.is_zero() {
        if cur <= Decimal::ZERO {
            return Ok(None);
        }
        (
            Decimal::ONE_HUNDRED,
            InsightStatus::New,
            format!("{} is a new expense this month.", category),
        )
    } else {
        let change = percent_change(cur, prev)?;
        if change > Decimal::ZERO {
            (
                change,
                InsightStatus::Increase,
                format!("You spent {:.1}% more on {} this month.", change, category),
            )
        } else if change < Decimal::ZERO {
            (
                change,
                InsightStatus::Decrease,
                format!("Your {} expenses decreased by {:.1}%.", category, change.abs()),
            )
        } else {
            (
                change,
                InsightStatus::Neutral,
                format!("Your spending on {} remained the same.", category),
            )
        }
    };

    Ok(Some(CategoryInsight {
        category: category.to_string(),
        current: cur,
        prev,
        change_percent,
        status,
        text,
    }))
}

fn total_insight(current_total: Decimal, previous_total: Decimal) -> Result<Option<TotalInsight>> {
    if previous_total <= Decimal::ZERO {
        return Ok(None);
    }

    let change = percent_change(current_total, previous_total)?;
    let insight = if change > Decimal::ZERO {
        Some(TotalInsight {
            text: format!(
                "Overall, your spending increased by {:.1}% compared to last month.",
                change
            ),
            status: TotalStatus::Increase,
            change_percent: change,
        })
    } else if change < Decimal::ZERO {
        Some(TotalInsight {
            text: format!(
                "Great job! Your overall spending decreased by {:.1}%.",
                change.abs()
            ),
            status: TotalStatus::Decrease,
            change_percent: change,
        })
    } else {
        None
    };
    Ok(insight)
}

impl Insight for SpendingComparator {
    type Output = SpendingInsights;

    fn id(&self) -> InsightType {
        InsightType::SpendingComparator
    }

    fn name(&self) -> &'static str {
        "Spending Comparator"
    }

    fn analyze(&self, ctx: &AnalysisContext<'_>) -> Result<SpendingInsights> {
        let current_range = DateRange::month_to_date(ctx.today);
        let previous_range = MonthBucket::from_date(ctx.today)
            .previous()
            .ok_or_else(|| Error::InvalidData(format!("No month before {}", ctx.today)))?
            .range();

        let current =
            ctx.store
                .sum_by_category(ctx.user_id, current_range, Some(CategoryType::Expense))?;
        let previous =
            ctx.store
                .sum_by_category(ctx.user_id, previous_range, Some(CategoryType::Expense))?;

        let insights = Self::compare(&current, &previous)?;

        tracing::debug!(
            current_categories = current.len(),
            previous_categories = previous.len(),
            insights = insights.category_insights.len(),
            "Compared spending with last month"
        );

        Ok(insights)
    }
}
