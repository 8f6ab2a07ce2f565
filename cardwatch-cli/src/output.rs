//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};

use cardwatch_core::{FraudType, TransactionTable};

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Render up to `limit` rows of a transaction table
pub fn transaction_table(table: &TransactionTable, limit: usize) -> Table {
    let mut out = create_table();
    out.set_header(table.headers().to_vec());
    for i in 0..table.len().min(limit) {
        out.add_row(table.row(i).to_vec());
    }
    out
}

/// Horizontal bar chart of the fraud-type distribution, largest first
pub fn distribution_chart(counts: &[(FraudType, usize)]) {
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    if total == 0 {
        return;
    }
    let max = counts.iter().map(|(_, n)| *n).max().unwrap_or(1);
    let label_width = counts
        .iter()
        .map(|(t, _)| t.as_str().len())
        .max()
        .unwrap_or(0);

    for (fraud_type, count) in counts {
        let bar_len = (count * 40).div_ceil(max);
        let share = 100.0 * *count as f64 / total as f64;
        println!(
            "  {:<width$}  {} {} ({:.1}%)",
            fraud_type.as_str(),
            "█".repeat(bar_len).cyan(),
            count,
            share,
            width = label_width
        );
    }
}
