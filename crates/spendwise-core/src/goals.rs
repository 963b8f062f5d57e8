//! Savings goal progress

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Goal;

/// Average month length in days
const DAYS_PER_MONTH: Decimal = Decimal::from_parts(3044, 0, 0, false, 2);
/// Average quarter length in days
const DAYS_PER_QUARTER: Decimal = Decimal::from_parts(9125, 0, 0, false, 2);
/// Average year length in days
const DAYS_PER_YEAR: Decimal = Decimal::from_parts(36525, 0, 0, false, 2);
/// Yearly amounts are only shown for goals more than this many years out
const YEARLY_AFTER_YEARS: i64 = 5;

/// Progress band shown next to a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// Under 40% saved
    Danger,
    /// Under 80% saved
    Warning,
    Success,
}

impl GoalStatus {
    pub fn from_percent(percent: Decimal) -> Self {
        if percent < Decimal::from(40) {
            GoalStatus::Danger
        } else if percent < Decimal::from(80) {
            GoalStatus::Warning
        } else {
            GoalStatus::Success
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Danger => "danger",
            GoalStatus::Warning => "warning",
            GoalStatus::Success => "success",
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How much to put aside per period to reach a goal on time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsBreakdown {
    pub daily: Decimal,
    pub monthly: Decimal,
    pub quarterly: Decimal,
    /// Only for goals more than five years away
    pub yearly: Option<Decimal>,
    pub total_years: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub name: String,
    pub saved: Decimal,
    /// Percent saved, one decimal, capped at 100
    pub percent: Decimal,
    pub remaining: Decimal,
    pub status: GoalStatus,
    /// Days until the target date (negative once it has passed)
    pub days_left: Option<i64>,
    pub savings_breakdown: Option<SavingsBreakdown>,
}

impl GoalProgress {
    pub fn compute(goal: &Goal, today: NaiveDate) -> Self {
        let percent = if goal.target_amount > Decimal::ZERO {
            goal.saved_amount
                .checked_div(goal.target_amount)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map(|p| p.round_dp(1))
                // Only a saved amount far beyond the target overflows
                .unwrap_or(Decimal::ONE_HUNDRED)
                .min(Decimal::ONE_HUNDRED)
        } else {
            Decimal::ZERO
        };

        let remaining = goal
            .target_amount
            .saturating_sub(goal.saved_amount)
            .max(Decimal::ZERO);
        let days_left = goal.target_date.map(|d| (d - today).num_days());
        let savings_breakdown = days_left.and_then(|days| breakdown(remaining, days));

        Self {
            name: goal.name.clone(),
            saved: goal.saved_amount,
            percent,
            remaining,
            status: GoalStatus::from_percent(percent),
            days_left,
            savings_breakdown,
        }
    }
}

fn breakdown(remaining: Decimal, days_left: i64) -> Option<SavingsBreakdown> {
    if days_left <= 0 || remaining <= Decimal::ZERO {
        return None;
    }

    let days = Decimal::from(days_left);
    // Saturates for amounts too large to spread over the remaining periods
    let per = |period_days: Decimal| {
        remaining
            .checked_div(days / period_days)
            .unwrap_or(Decimal::MAX)
            .round_dp(2)
    };
    // days > 5 * 365.25
    let yearly = (days > DAYS_PER_YEAR * Decimal::from(YEARLY_AFTER_YEARS))
        .then(|| per(DAYS_PER_YEAR));

    Some(SavingsBreakdown {
        daily: (remaining / days).round_dp(2),
        monthly: per(DAYS_PER_MONTH),
        quarterly: per(DAYS_PER_QUARTER),
        yearly,
        total_years: (days / DAYS_PER_YEAR).round_dp(1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn goal(target: Decimal, saved: Decimal, target_date: Option<NaiveDate>) -> Goal {
        Goal {
            name: "Laptop".to_string(),
            target_amount: target,
            saved_amount: saved,
            target_date,
        }
    }

    #[test]
    fn test_constants() {
        assert_eq!(DAYS_PER_MONTH, dec!(30.44));
        assert_eq!(DAYS_PER_QUARTER, dec!(91.25));
        assert_eq!(DAYS_PER_YEAR, dec!(365.25));
    }

    #[test]
    fn test_percent_and_status() {
        let today = date(2024, 1, 1);
        let progress = GoalProgress::compute(&goal(dec!(1000), dec!(333), None), today);
        assert_eq!(progress.percent, dec!(33.3));
        assert_eq!(progress.status, GoalStatus::Danger);
        assert_eq!(progress.remaining, dec!(667));
        assert!(progress.savings_breakdown.is_none());

        let progress = GoalProgress::compute(&goal(dec!(1000), dec!(400), None), today);
        assert_eq!(progress.status, GoalStatus::Warning);

        let progress = GoalProgress::compute(&goal(dec!(1000), dec!(800), None), today);
        assert_eq!(progress.status, GoalStatus::Success);
    }

    #[test]
    fn test_overfunded_goal_capped() {
        let progress = GoalProgress::compute(&goal(dec!(500), dec!(750), None), date(2024, 1, 1));
        assert_eq!(progress.percent, dec!(100));
        assert_eq!(progress.remaining, Decimal::ZERO);
    }

    #[test]
    fn test_zero_target() {
        let progress =
            GoalProgress::compute(&goal(Decimal::ZERO, dec!(10), None), date(2024, 1, 1));
        assert_eq!(progress.percent, Decimal::ZERO);
        assert_eq!(progress.status, GoalStatus::Danger);
    }

    #[test]
    fn test_breakdown_within_a_year() {
        let today = date(2024, 1, 1);
        // 100 days out, 1000 remaining
        let progress = GoalProgress::compute(
            &goal(dec!(1000), Decimal::ZERO, Some(date(2024, 4, 10))),
            today,
        );
        assert_eq!(progress.days_left, Some(100));

        let b = progress.savings_breakdown.unwrap();
        assert_eq!(b.daily, dec!(10.00));
        assert_eq!(b.monthly, dec!(304.40));
        assert_eq!(b.quarterly, dec!(912.50));
        assert_eq!(b.yearly, None);
        assert_eq!(b.total_years, dec!(0.3));
    }

    #[test]
    fn test_breakdown_far_future_has_yearly() {
        let today = date(2024, 1, 1);
        let progress = GoalProgress::compute(
            &goal(dec!(60000), Decimal::ZERO, Some(date(2030, 1, 1))),
            today,
        );
        let b = progress.savings_breakdown.unwrap();
        assert!(b.yearly.is_some());
        assert_eq!(b.total_years, dec!(6.0));
    }

    #[test]
    fn test_no_breakdown_when_past_or_done() {
        let today = date(2024, 6, 1);
        let past = GoalProgress::compute(&goal(dec!(100), dec!(10), Some(date(2024, 5, 1))), today);
        assert!(past.savings_breakdown.is_none());
        assert_eq!(past.days_left, Some(-31));

        let done =
            GoalProgress::compute(&goal(dec!(100), dec!(100), Some(date(2025, 1, 1))), today);
        assert!(done.savings_breakdown.is_none());
    }

    #[test]
    fn test_extreme_amounts_saturate() {
        let today = date(2024, 1, 1);
        let progress = GoalProgress::compute(
            &goal(dec!(0.0000000000000000000000001), Decimal::MAX, None),
            today,
        );
        assert_eq!(progress.percent, dec!(100));
        assert_eq!(progress.remaining, Decimal::ZERO);

        let progress = GoalProgress::compute(
            &goal(Decimal::MAX, Decimal::ZERO, Some(date(2024, 1, 2))),
            today,
        );
        let b = progress.savings_breakdown.unwrap();
        assert_eq!(b.daily, Decimal::MAX);
        assert_eq!(b.monthly, Decimal::MAX);
    }
}
