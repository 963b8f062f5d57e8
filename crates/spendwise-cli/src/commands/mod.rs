//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and categories, plus shared utilities (open_db, argument parsing)
//! - `import` - CSV import
//! - `insights` - Spending insights, forecast and dashboard
//! - `reports` - Year overview and period summary
//! - `goals` - Savings goal progress

pub mod core;
pub mod goals;
pub mod import;
pub mod insights;
pub mod reports;

// Re-export command functions for main.rs
pub use core::*;
pub use goals::*;
pub use import::*;
pub use insights::*;
pub use reports::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
