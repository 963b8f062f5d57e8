//! Savings goal command implementation

use anyhow::{bail, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use spendwise_core::{Goal, GoalProgress, GoalStatus};

pub fn cmd_goal(goal: &Goal, today: NaiveDate) -> Result<()> {
    if goal.target_amount <= Decimal::ZERO {
        bail!("Goal target must be greater than zero");
    }
    if goal.saved_amount < Decimal::ZERO {
        bail!("Saved amount cannot be negative");
    }

    let progress = GoalProgress::compute(goal, today);

    let icon = match progress.status {
        GoalStatus::Danger => "🔴",
        GoalStatus::Warning => "🟡",
        GoalStatus::Success => "🟢",
    };

    println!();
    println!("🎯 {}", progress.name);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {} {:.1}% saved ({:.2} of {:.2})",
        icon, progress.percent, progress.saved, goal.target_amount
    );
    println!("   Remaining: {:.2}", progress.remaining);

    match progress.days_left {
        Some(days) if days > 0 => println!("   Days left: {}", days),
        Some(days) if days < 0 => println!("   Target date passed {} days ago", -days),
        Some(_) => println!("   Target date is today"),
        None => {}
    }

    if let Some(b) = &progress.savings_breakdown {
        println!();
        println!("   To reach it on time, put aside:");
        println!("      Daily:     {:.2}", b.daily);
        println!("      Monthly:   {:.2}", b.monthly);
        println!("      Quarterly: {:.2}", b.quarterly);
        if let Some(yearly) = b.yearly {
            println!("      Yearly:    {:.2}", yearly);
        }
        println!("   ({:.1} years to go)", b.total_years);
    }
    println!();

    Ok(())
}
