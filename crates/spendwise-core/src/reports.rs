//! Income and expense reports
//!
//! All amounts are in the stored base currency; `converted` produces a copy
//! for display in another currency.

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::currency::CurrencyConverter;
use crate::error::{Error, Result};
use crate::models::{CategoryType, DateRange, MonthBucket};
use crate::store::{checked_sum, TransactionStore};

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: Decimal,
}

/// Category totals sorted by amount, largest first (ties by name)
fn ranked(totals: BTreeMap<String, Decimal>) -> Vec<CategoryAmount> {
    let mut ranked: Vec<CategoryAmount> = totals
        .into_iter()
        .map(|(category, amount)| CategoryAmount { category, amount })
        .collect();
    ranked.sort_by(|a, b| b.amount.cmp(&a.amount));
    ranked
}

fn convert_ranked(
    items: &[CategoryAmount],
    converter: &CurrencyConverter,
    target: &str,
) -> Vec<CategoryAmount> {
    items
        .iter()
        .map(|c| CategoryAmount {
            category: c.category.clone(),
            amount: converter.convert(c.amount, target),
        })
        .collect()
}

/// Monthly income and expense for one calendar year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearOverview {
    pub year: i32,
    pub month_labels: Vec<String>,
    pub monthly_income: Vec<Decimal>,
    pub monthly_expense: Vec<Decimal>,
    pub expense_by_category: Vec<CategoryAmount>,
}

impl YearOverview {
    pub fn total_income(&self) -> Result<Decimal> {
        checked_sum(self.monthly_income.iter().copied())
    }

    pub fn total_expense(&self) -> Result<Decimal> {
        checked_sum(self.monthly_expense.iter().copied())
    }

    pub fn converted(&self, converter: &CurrencyConverter, target: &str) -> Self {
        let convert_all = |values: &[Decimal]| {
            values
                .iter()
                .map(|v| converter.convert(*v, target))
                .collect::<Vec<_>>()
        };

        Self {
            year: self.year,
            month_labels: self.month_labels.clone(),
            monthly_income: convert_all(&self.monthly_income),
            monthly_expense: convert_all(&self.monthly_expense),
            expense_by_category: convert_ranked(&self.expense_by_category, converter, target),
        }
    }
}

/// Build the overview for `year`
pub fn year_overview(
    store: &dyn TransactionStore,
    user_id: i64,
    year: i32,
) -> Result<YearOverview> {
    let (first, last) = MonthBucket::new(year, 1)
        .zip(MonthBucket::new(year, 12))
        .ok_or_else(|| Error::InvalidData(format!("Year out of range: {}", year)))?;
    let range = DateRange::new(first.first_day(), last.last_day());

    let mut monthly_income = vec![Decimal::ZERO; 12];
    let mut monthly_expense = vec![Decimal::ZERO; 12];
    let mut by_category: BTreeMap<String, Decimal> = BTreeMap::new();

    let add = |total: &mut Decimal, amount: Decimal| -> Result<()> {
        *total = total
            .checked_add(amount)
            .ok_or_else(|| Error::overflow("the year overview"))?;
        Ok(())
    };

    for record in store.query(user_id, range, None)? {
        let idx = record.date.month0() as usize;
        match record.category_type {
            CategoryType::Income => add(&mut monthly_income[idx], record.amount)?,
            CategoryType::Expense => {
                add(&mut monthly_expense[idx], record.amount)?;
                add(by_category.entry(record.category_name).or_default(), record.amount)?;
            }
        }
    }

    tracing::debug!(year, categories = by_category.len(), "Built year overview");

    Ok(YearOverview {
        year,
        month_labels: MONTH_LABELS.iter().map(|m| m.to_string()).collect(),
        monthly_income,
        monthly_expense,
        expense_by_category: ranked(by_category),
    })
}

/// Income and expense over a date range, compared with the month before
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
    /// Expense over the same range one month earlier
    pub previous_expense: Decimal,
    /// One decimal; 100.0 when the previous period had no expense
    pub expense_change_percent: Decimal,
    pub expense_by_category: Vec<CategoryAmount>,
}

impl PeriodSummary {
    pub fn converted(&self, converter: &CurrencyConverter, target: &str) -> Self {
        let income = converter.convert(self.income, target);
        let expense = converter.convert(self.expense, target);

        Self {
            from: self.from,
            to: self.to,
            income,
            expense,
            net: income.saturating_sub(expense),
            previous_expense: converter.convert(self.previous_expense, target),
            expense_change_percent: self.expense_change_percent,
            expense_by_category: convert_ranked(&self.expense_by_category, converter, target),
        }
    }
}

/// Percent change from `previous` to `current`, one decimal
///
/// A zero baseline is 100.0 when anything was spent, else 0.0. A change too
/// large for `Decimal` is a `DataFormat` error.
pub fn change_percent(current: Decimal, previous: Decimal) -> Result<Decimal> {
    if previous.is_zero() {
        return Ok(if current > Decimal::ZERO {
            Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        });
    }
    current
        .checked_sub(previous)
        .and_then(|delta| delta.checked_div(previous))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|percent| percent.round_dp(1))
        .ok_or_else(|| Error::overflow("the expense change"))
}

pub fn period_summary(
    store: &dyn TransactionStore,
    user_id: i64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<PeriodSummary> {
    if from > to {
        return Err(Error::InvalidData(format!(
            "Period start {} is after its end {}",
            from, to
        )));
    }

    // Day is clamped to the shorter month (Mar 31 -> Feb 29)
    let shift = |d: NaiveDate| {
        d.checked_sub_months(Months::new(1))
            .ok_or_else(|| Error::InvalidData(format!("Date out of range: {}", d)))
    };
    let previous_range = DateRange::new(shift(from)?, shift(to)?);
    let range = DateRange::new(from, to);

    let income = store.total(user_id, range, Some(CategoryType::Income))?;
    let by_category = store.sum_by_category(user_id, range, Some(CategoryType::Expense))?;
    let expense = checked_sum(by_category.values().copied())?;
    let previous_expense = store.total(user_id, previous_range, Some(CategoryType::Expense))?;
    let net = income
        .checked_sub(expense)
        .ok_or_else(|| Error::overflow("the period net"))?;

    Ok(PeriodSummary {
        from,
        to,
        income,
        expense,
        net,
        previous_expense,
        expense_change_percent: change_percent(expense, previous_expense)?,
        expense_by_category: ranked(by_category),
    })
}

/// Running balance and this month's flows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceSummary {
    pub opening_balance: Decimal,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    /// Opening balance + all income - all expense
    pub balance: Decimal,
    pub month_income: Decimal,
    pub month_expense: Decimal,
}

impl BalanceSummary {
    pub fn converted(&self, converter: &CurrencyConverter, target: &str) -> Self {
        Self {
            opening_balance: converter.convert(self.opening_balance, target),
            total_income: converter.convert(self.total_income, target),
            total_expense: converter.convert(self.total_expense, target),
            balance: converter.convert(self.balance, target),
            month_income: converter.convert(self.month_income, target),
            month_expense: converter.convert(self.month_expense, target),
        }
    }
}

pub fn balance_summary(
    store: &dyn TransactionStore,
    user_id: i64,
    today: NaiveDate,
    opening_balance: Decimal,
) -> Result<BalanceSummary> {
    let all_time = DateRange::all_time();
    let month = DateRange::month_of(today);

    let total_income = store.total(user_id, all_time, Some(CategoryType::Income))?;
    let total_expense = store.total(user_id, all_time, Some(CategoryType::Expense))?;
    let balance = opening_balance
        .checked_add(total_income)
        .and_then(|b| b.checked_sub(total_expense))
        .ok_or_else(|| Error::overflow("the balance"))?;

    Ok(BalanceSummary {
        opening_balance,
        total_income,
        total_expense,
        balance,
        month_income: store.total(user_id, month, Some(CategoryType::Income))?,
        month_expense: store.total(user_id, month, Some(CategoryType::Expense))?,
    })
}
