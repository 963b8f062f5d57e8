//! Report command implementations (overview, summary)

use anyhow::{Context, Result};
use chrono::NaiveDate;
use spendwise_core::{
    format_money, period_summary, year_overview, AnalyticsConfig, CurrencyConverter, Database,
};

use super::truncate;

/// Display currency: `--currency` if given, else the configured base
fn display_currency(converter: &CurrencyConverter, currency: Option<&str>) -> String {
    currency.unwrap_or(converter.base()).trim().to_uppercase()
}

pub fn cmd_overview(
    db: &Database,
    config: &AnalyticsConfig,
    user_id: i64,
    year: i32,
    currency: Option<&str>,
) -> Result<()> {
    let converter = CurrencyConverter::from_config(&config.currency);
    let target = display_currency(&converter, currency);

    let overview = year_overview(db, user_id, year)
        .with_context(|| format!("Failed to build overview for {}", year))?
        .converted(&converter, &target);
    let total_income = overview.total_income().context("Failed to total income")?;
    let total_expense = overview.total_expense().context("Failed to total expense")?;

    println!();
    println!("📅 {} Overview ({})", overview.year, target);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {:5} │ {:>14} │ {:>14}", "Month", "Income", "Expense");
    for ((label, income), expense) in overview
        .month_labels
        .iter()
        .zip(&overview.monthly_income)
        .zip(&overview.monthly_expense)
    {
        println!(
            "   {:5} │ {:>14} │ {:>14}",
            label,
            format_money(*income, &target),
            format_money(*expense, &target)
        );
    }
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:5} │ {:>14} │ {:>14}",
        "Total",
        format_money(total_income, &target),
        format_money(total_expense, &target)
    );

    if !overview.expense_by_category.is_empty() {
        println!();
        println!("   Expense by category:");
        for item in &overview.expense_by_category {
            println!(
                "   {:25} {:>14}",
                truncate(&item.category, 25),
                format_money(item.amount, &target)
            );
        }
    }
    println!();

    Ok(())
}

pub fn cmd_summary(
    db: &Database,
    config: &AnalyticsConfig,
    user_id: i64,
    from: NaiveDate,
    to: NaiveDate,
    currency: Option<&str>,
) -> Result<()> {
    let converter = CurrencyConverter::from_config(&config.currency);
    let target = display_currency(&converter, currency);

    let summary = period_summary(db, user_id, from, to)
        .context("Failed to build period summary")?
        .converted(&converter, &target);

    println!();
    println!("📊 Summary");
    println!("   Period: {} to {}", summary.from, summary.to);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Income:  {}", format_money(summary.income, &target));
    println!("   Expense: {}", format_money(summary.expense, &target));
    println!("   Net:     {}", format_money(summary.net, &target));
    println!(
        "   Expense vs. a month earlier: {} ({:.1}% change)",
        format_money(summary.previous_expense, &target),
        summary.expense_change_percent
    );

    if summary.expense_by_category.is_empty() {
        println!();
        println!("   No spending found in this period.");
    } else {
        println!();
        for item in &summary.expense_by_category {
            println!(
                "   {:25} {:>14}",
                truncate(&item.category, 25),
                format_money(item.amount, &target)
            );
        }
    }
    println!();

    Ok(())
}
