//! Integration tests for spendwise-core
//!
//! These tests exercise the full import → store → insights workflow.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use spendwise_core::{
    import::{import_transactions, parse_csv},
    insights::{InsightStatus, SuggestionKind, TotalStatus},
    AnalysisContext, AnalyticsConfig, CategoryType, CurrencyConverter, Database, InsightEngine,
    MemoryStore, TransactionRecord,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn expense(amount: Decimal, on: NaiveDate, category: &str) -> TransactionRecord {
    TransactionRecord::new(amount, on, category, CategoryType::Expense)
}

/// Two months of household spending in the export format
fn household_csv() -> &'static str {
    "Date,Category,Type,Description,Amount,Currency
2024-04-03,Food,expense,Groceries,120.00,INR
2024-04-17,Food,expense,Groceries,80.00,INR
2024-04-01,Salary,income,Monthly Salary,4000.00,INR
2024-05-02,Food,expense,Groceries,100.00,INR
2024-05-09,Food,expense,Restaurant,200.00,INR
2024-05-12,Travel,expense,Train tickets,100.00,INR
2024-05-01,Salary,income,Monthly Salary,4000.00,INR
"
}

// =============================================================================
// Import → Comparator
// =============================================================================

#[test]
fn test_import_then_compare_months() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    db.seed_default_categories().unwrap();

    let transactions = parse_csv(household_csv().as_bytes(), 1).expect("Failed to parse CSV");
    let stats = import_transactions(&db, &transactions).unwrap();
    assert_eq!(stats.imported, 7);

    let engine = InsightEngine::new();
    let ctx = AnalysisContext::new(&db, 1, date(2024, 5, 20));
    let insights = engine.spending_insights(&ctx).unwrap();

    let summary: Vec<_> = insights
        .category_insights
        .iter()
        .map(|i| (i.category.as_str(), i.status, i.change_percent))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Travel", InsightStatus::New, dec!(100.0)),
            ("Food", InsightStatus::Increase, dec!(50.0)),
        ]
    );

    let total = insights.total_insight.expect("total insight");
    assert_eq!(total.status, TotalStatus::Increase);
    assert_eq!(total.change_percent, dec!(100.0));
    assert!(insights.has_prev_data);
}

#[test]
fn test_reimport_is_idempotent() {
    let db = Database::in_memory().unwrap();
    let transactions = parse_csv(household_csv().as_bytes(), 1).unwrap();

    import_transactions(&db, &transactions).unwrap();
    let again = import_transactions(&db, &transactions).unwrap();

    assert_eq!(again.imported, 0);
    assert_eq!(again.skipped, 7);
    assert_eq!(db.count_transactions(1).unwrap(), 7);
}

#[test]
fn test_users_are_isolated() {
    let db = Database::in_memory().unwrap();
    import_transactions(&db, &parse_csv(household_csv().as_bytes(), 1).unwrap()).unwrap();

    let ctx = AnalysisContext::new(&db, 2, date(2024, 5, 20));
    let insights = InsightEngine::new().spending_insights(&ctx).unwrap();
    assert!(insights.category_insights.is_empty());
    assert!(!insights.has_prev_data);
}

// =============================================================================
// Forecaster
// =============================================================================

#[test]
fn test_flat_history_forecast() {
    let today = date(2024, 7, 15);
    let records = (1..=7).map(|m| expense(dec!(100), date(2024, m, 10), "Food"));
    let store = MemoryStore::for_user(1, records);

    let ctx = AnalysisContext::new(&store, 1, today);
    let forecast = InsightEngine::new().forecast(&ctx).unwrap();

    assert_eq!(forecast.historical_average, dec!(100.00));
    assert_eq!(forecast.prediction_total, dec!(100.00));
    assert_eq!(forecast.predicted_by_category["Food"], dec!(100.00));
    assert!(forecast.suggestions.iter().all(|s| !s.kind.is_trend()));
    assert_eq!(forecast.suggestions.len(), 1);
    assert_eq!(forecast.suggestions[0].kind, SuggestionKind::Saving);
    assert!(forecast.suggestions[0].text.contains("15.00"));
}

#[test]
fn test_forecast_from_database_matches_memory_store() {
    let today = date(2024, 5, 20);
    let db = Database::in_memory().unwrap();
    let transactions = parse_csv(household_csv().as_bytes(), 1).unwrap();
    import_transactions(&db, &transactions).unwrap();

    let memory = MemoryStore::for_user(
        1,
        vec![
            expense(dec!(120), date(2024, 4, 3), "Food"),
            expense(dec!(80), date(2024, 4, 17), "Food"),
            expense(dec!(100), date(2024, 5, 2), "Food"),
            expense(dec!(200), date(2024, 5, 9), "Food"),
            expense(dec!(100), date(2024, 5, 12), "Travel"),
        ],
    );

    let engine = InsightEngine::new();
    let from_db = engine.forecast(&AnalysisContext::new(&db, 1, today)).unwrap();
    let from_memory = engine
        .forecast(&AnalysisContext::new(&memory, 1, today))
        .unwrap();

    assert_eq!(from_db, from_memory);
    assert!(from_db.suggestions.len() <= 4);
    assert_eq!(from_db.chart_labels.last().unwrap(), "Next Month (Est.)");
    assert_eq!(from_db.chart_values[6], dec!(400));
}

#[test]
fn test_forecast_json_shape() {
    let store = MemoryStore::new();
    let ctx = AnalysisContext::new(&store, 1, date(2024, 7, 15));
    let forecast = InsightEngine::new().forecast(&ctx).unwrap();

    let json = serde_json::to_value(&forecast).unwrap();
    assert!(json["predicted_categories"].is_object());
    assert_eq!(json["chart_data"].as_array().unwrap().len(), 8);
    assert_eq!(json["suggestions"][0]["type"], "info");
    assert!(json.get("historical_avg").is_some());
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_calendar_anchor_config() {
    let config = AnalyticsConfig::from_toml(
        r#"
        [insights]
        dashboard_limit = 1

        [forecast]
        anchor_mode = "calendar"
        "#,
    )
    .unwrap();

    // 2024-03-31 would repeat March with thirty-day steps
    let store = MemoryStore::new();
    let ctx = AnalysisContext::new(&store, 1, date(2024, 3, 31));
    let forecast = InsightEngine::with_config(&config).forecast(&ctx).unwrap();

    assert_eq!(forecast.chart_labels[0], "Sep 2023");
    assert_eq!(forecast.chart_labels[6], "Mar 2024");
}

#[test]
fn test_dashboard_limit_from_config() {
    let config = AnalyticsConfig::from_toml("[insights]\ndashboard_limit = 1").unwrap();
    let db = Database::in_memory().unwrap();
    import_transactions(&db, &parse_csv(household_csv().as_bytes(), 1).unwrap()).unwrap();

    let ctx = AnalysisContext::new(&db, 1, date(2024, 5, 20));
    let dashboard = InsightEngine::with_config(&config).dashboard(&ctx).unwrap();

    let spending = dashboard.spending.unwrap();
    assert_eq!(spending.category_insights.len(), 1);
    assert_eq!(spending.category_insights[0].category, "Travel");
    assert!(dashboard.forecast.is_some());
}

#[test]
fn test_dashboard_surfaces_out_of_range_amounts() {
    let store = MemoryStore::for_user(
        1,
        vec![
            expense(dec!(100000), date(2024, 5, 3), "Food"),
            expense(dec!(0.0000000000000000000000001), date(2024, 4, 3), "Food"),
        ],
    );
    let ctx = AnalysisContext::new(&store, 1, date(2024, 5, 20));
    let engine = InsightEngine::new();

    let err = engine.spending_insights(&ctx).unwrap_err();
    assert!(matches!(err, spendwise_core::Error::DataFormat(_)));
    // Not an outage, so the dashboard does not hide it
    assert!(matches!(
        engine.dashboard(&ctx),
        Err(spendwise_core::Error::DataFormat(_))
    ));
}

// =============================================================================
// Reports
// =============================================================================

#[test]
fn test_reports_over_imported_data() {
    let db = Database::in_memory().unwrap();
    import_transactions(&db, &parse_csv(household_csv().as_bytes(), 1).unwrap()).unwrap();

    let overview = spendwise_core::year_overview(&db, 1, 2024).unwrap();
    assert_eq!(overview.monthly_expense[3], dec!(200));
    assert_eq!(overview.monthly_expense[4], dec!(400));
    assert_eq!(overview.total_income().unwrap(), dec!(8000));

    let summary =
        spendwise_core::period_summary(&db, 1, date(2024, 5, 1), date(2024, 5, 31)).unwrap();
    assert_eq!(summary.previous_expense, dec!(200));
    assert_eq!(summary.expense_change_percent, dec!(100.0));

    let balance =
        spendwise_core::balance_summary(&db, 1, date(2024, 5, 20), dec!(1000)).unwrap();
    assert_eq!(balance.balance, dec!(8400));

    let usd = balance.converted(&CurrencyConverter::default(), "USD");
    assert_eq!(usd.balance, dec!(100.80));
}
