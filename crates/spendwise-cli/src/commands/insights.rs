//! Insight command implementations (insights, forecast, dashboard)

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use spendwise_core::{
    balance_summary, format_money,
    insights::{InsightStatus, TotalStatus},
    AnalysisContext, AnalyticsConfig, CurrencyConverter, Database, ForecastResult,
    InsightEngine, SpendingInsights,
};

use super::truncate;

fn status_icon(status: InsightStatus) -> &'static str {
    match status {
        InsightStatus::New => "🆕",
        InsightStatus::Increase => "🔺",
        InsightStatus::Decrease => "🔻",
        InsightStatus::Neutral => "➖",
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

fn print_spending(insights: &SpendingInsights) {
    if insights.category_insights.is_empty() {
        println!("   No spending recorded this month or last month.");
        return;
    }

    if let Some(total) = &insights.total_insight {
        let icon = match total.status {
            TotalStatus::Increase => "📈",
            TotalStatus::Decrease => "📉",
        };
        println!("   {} {}", icon, total.text);
        println!();
    }

    println!(
        "   {:20} │ {:>10} │ {:>10} │ {:>8}",
        "Category", "This month", "Last month", "Change"
    );
    println!("   ─────────────────────┼────────────┼────────────┼─────────");
    for insight in &insights.category_insights {
        println!(
            "   {} {:17} │ {:>10.2} │ {:>10.2} │ {:>7.1}%",
            status_icon(insight.status),
            truncate(&insight.category, 17),
            insight.current,
            insight.prev,
            insight.change_percent
        );
    }

    println!();
    for insight in &insights.category_insights {
        println!("   • {}", insight.text);
    }

    if !insights.has_prev_data {
        println!();
        println!("   💡 No spending last month to compare against yet.");
    }
}

fn print_forecast(forecast: &ForecastResult) {
    println!("   Predicted total: {:.2}", forecast.prediction_total);
    println!("   Historical average: {:.2}", forecast.historical_average);

    if !forecast.predicted_by_category.is_empty() {
        println!();
        let mut predicted: Vec<(&String, &Decimal)> =
            forecast.predicted_by_category.iter().collect();
        predicted.sort_by(|a, b| b.1.cmp(a.1));
        for (category, amount) in predicted {
            println!("   {:20} {:>10.2}", truncate(category, 20), amount);
        }
    }

    println!();
    for (label, value) in forecast.chart_labels.iter().zip(&forecast.chart_values) {
        println!("   {:18} {:>10.2}", label, value);
    }

    println!();
    for suggestion in &forecast.suggestions {
        println!("   {} {}", suggestion.icon, suggestion.text);
    }
}

pub fn cmd_insights(
    db: &Database,
    config: &AnalyticsConfig,
    user_id: i64,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    let engine = InsightEngine::with_config(config);
    let ctx = AnalysisContext::new(db, user_id, today);
    let insights = engine
        .spending_insights(&ctx)
        .context("Failed to compute spending insights")?;

    if json {
        return print_json(&insights);
    }

    println!();
    println!("📊 Spending Insights ({})", today.format("%B %Y"));
    println!("   ─────────────────────────────────────────────────────────────");
    print_spending(&insights);
    println!();

    Ok(())
}

pub fn cmd_forecast(
    db: &Database,
    config: &AnalyticsConfig,
    user_id: i64,
    today: NaiveDate,
    json: bool,
) -> Result<()> {
    let engine = InsightEngine::with_config(config);
    let ctx = AnalysisContext::new(db, user_id, today);
    let forecast = engine
        .forecast(&ctx)
        .context("Failed to compute forecast")?;

    if json {
        return print_json(&forecast);
    }

    println!();
    println!("🔮 Next Month Forecast");
    println!("   ─────────────────────────────────────────────────────────────");
    print_forecast(&forecast);
    println!();

    Ok(())
}

pub fn cmd_dashboard(
    db: &Database,
    config: &AnalyticsConfig,
    user_id: i64,
    today: NaiveDate,
    opening_balance: Decimal,
    currency: Option<&str>,
) -> Result<()> {
    let converter = CurrencyConverter::from_config(&config.currency);
    let target = currency.unwrap_or(converter.base()).to_uppercase();

    let balance = balance_summary(db, user_id, today, opening_balance)
        .context("Failed to compute balance")?
        .converted(&converter, &target);

    let engine = InsightEngine::with_config(config);
    let ctx = AnalysisContext::new(db, user_id, today);
    let dashboard = engine.dashboard(&ctx).context("Failed to build dashboard")?;

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│         💰 Spendwise Dashboard          │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Balance:         {}", format_money(balance.balance, &target));
    println!("  Income (month):  {}", format_money(balance.month_income, &target));
    println!("  Expense (month): {}", format_money(balance.month_expense, &target));
    println!();

    println!("  📊 Spending Insights");
    match &dashboard.spending {
        Some(insights) => print_spending(insights),
        None => println!("   Insights are unavailable right now."),
    }
    println!();

    println!("  🔮 Forecast");
    match &dashboard.forecast {
        Some(forecast) => print_forecast(forecast),
        None => println!("   Forecast is unavailable right now."),
    }
    println!();

    Ok(())
}
