//! Spendwise CLI - Personal finance tracker
//!
//! Usage:
//!   spendwise init                       Initialize database
//!   spendwise import --file CSV          Import transactions
//!   spendwise insights                   Month-over-month spending insights
//!   spendwise forecast                   Next month's spending forecast
//!   spendwise dashboard                  Balance, insights and forecast

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let user = cli.user;

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Import { file } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_import(&db, user, &file)
        }
        Commands::Categories => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_categories(&db, user)
        }
        Commands::Insights { today, json } => {
            let db = commands::open_db(&cli.db)?;
            let config = commands::load_config(cli.config.as_deref())?;
            let today = commands::resolve_today(today.as_deref())?;
            commands::cmd_insights(&db, &config, user, today, json)
        }
        Commands::Forecast { today, json } => {
            let db = commands::open_db(&cli.db)?;
            let config = commands::load_config(cli.config.as_deref())?;
            let today = commands::resolve_today(today.as_deref())?;
            commands::cmd_forecast(&db, &config, user, today, json)
        }
        Commands::Dashboard {
            today,
            opening_balance,
            currency,
        } => {
            let db = commands::open_db(&cli.db)?;
            let config = commands::load_config(cli.config.as_deref())?;
            let today = commands::resolve_today(today.as_deref())?;
            let opening_balance = commands::parse_amount(&opening_balance, "--opening-balance")?;
            commands::cmd_dashboard(
                &db,
                &config,
                user,
                today,
                opening_balance,
                currency.as_deref(),
            )
        }
        Commands::Overview { year, currency } => {
            let db = commands::open_db(&cli.db)?;
            let config = commands::load_config(cli.config.as_deref())?;
            let year = match year {
                Some(year) => year,
                None => chrono::Datelike::year(&commands::resolve_today(None)?),
            };
            commands::cmd_overview(&db, &config, user, year, currency.as_deref())
        }
        Commands::Summary { from, to, currency } => {
            let db = commands::open_db(&cli.db)?;
            let config = commands::load_config(cli.config.as_deref())?;
            let from = commands::parse_date(&from, "--from")?;
            let to = commands::parse_date(&to, "--to")?;
            commands::cmd_summary(&db, &config, user, from, to, currency.as_deref())
        }
        Commands::Goal {
            name,
            target,
            saved,
            target_date,
            today,
        } => {
            let goal = spendwise_core::Goal {
                name,
                target_amount: commands::parse_amount(&target, "--target")?,
                saved_amount: commands::parse_amount(&saved, "--saved")?,
                target_date: target_date
                    .as_deref()
                    .map(|d| commands::parse_date(d, "--target-date"))
                    .transpose()?,
            };
            let today = commands::resolve_today(today.as_deref())?;
            commands::cmd_goal(&goal, today)
        }
    }
}
