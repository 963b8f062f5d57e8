//! CLI argument definitions using clap
//!
//! This module contains the clap structs for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Spendwise - Understand where your money goes
#[derive(Parser)]
#[command(name = "spendwise")]
#[command(about = "Personal finance tracker with spending insights and forecasts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "spendwise.db", global = true)]
    pub db: PathBuf,

    /// User whose transactions are analyzed
    #[arg(long, default_value_t = 1, global = true)]
    pub user: i64,

    /// Analytics config file (defaults to the user override, then built-in values)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and seed default categories
    Init,

    /// Import transactions from CSV (Date,Category,Type,Description,Amount)
    Import {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List categories available to the user
    Categories,

    /// Compare this month's spending with last month's
    Insights {
        /// Analyze as of this date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        today: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Predict next month's spending from recent history
    Forecast {
        /// Analyze as of this date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        today: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show balance, top insights and the forecast together
    Dashboard {
        /// Analyze as of this date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        today: Option<String>,

        /// Balance before the first recorded transaction
        #[arg(long, default_value = "0")]
        opening_balance: String,

        /// Display currency (defaults to the configured base)
        #[arg(long)]
        currency: Option<String>,
    },

    /// Monthly income and expense for a year
    Overview {
        /// Year to report (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Display currency (defaults to the configured base)
        #[arg(long)]
        currency: Option<String>,
    },

    /// Income and expense over a date range, compared with a month earlier
    Summary {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: String,

        /// Display currency (defaults to the configured base)
        #[arg(long)]
        currency: Option<String>,
    },

    /// Show progress toward a savings goal
    Goal {
        /// Goal name
        #[arg(long, default_value = "Savings goal")]
        name: String,

        /// Amount to reach
        #[arg(long)]
        target: String,

        /// Amount saved so far
        #[arg(long, default_value = "0")]
        saved: String,

        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        target_date: Option<String>,

        /// Compute as of this date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        today: Option<String>,
    },
}
