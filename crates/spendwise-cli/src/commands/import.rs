//! Import command implementation

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use spendwise_core::{import_transactions, parse_csv, Database};

pub fn cmd_import(db: &Database, user_id: i64, file: &Path) -> Result<()> {
    println!("📥 Importing {}...", file.display());

    let csv_file =
        File::open(file).with_context(|| format!("Failed to open file: {}", file.display()))?;
    let transactions = parse_csv(csv_file, user_id)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    println!("   Found {} transactions", transactions.len());

    let stats = import_transactions(db, &transactions)?;

    println!("✅ Import complete!");
    println!("   Imported: {}", stats.imported);
    println!("   Skipped (duplicates): {}", stats.skipped);

    Ok(())
}
