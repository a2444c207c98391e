//! Terminal rendering for reports and watchlists.

use serde::Serialize;

use pulse_core::{CategoryChanges, ChangeReport, Watchlist};

use crate::error::CliError;

pub fn render_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}

pub fn render_report_table(report: &ChangeReport) {
    for group in &report.groups {
        render_group(group);
        println!();
    }
}

fn render_group(group: &CategoryChanges) {
    let decimals = group.category.decimals();
    let (previous_date, last_date) = header_dates(group);

    println!("{}", group.category.label());
    println!(
        "{:<28} {:>22} {:>22} {:>12} {:>10}",
        "Indicator",
        format!("Previous Close ({previous_date})"),
        format!("Last Close ({last_date})"),
        "Change",
        "Change %"
    );

    for record in &group.records {
        println!(
            "{:<28} {:>22} {:>22} {:>12} {:>10}",
            record.name,
            format_price(record.previous_close, decimals),
            format_price(record.last_close, decimals),
            format_signed(record.change, decimals),
            format_percent(record.percent_change),
        );
    }
}

pub fn render_watchlist_table(watchlist: &Watchlist) {
    for category in watchlist.categories() {
        println!("{}", category.label());
        for instrument in watchlist
            .instruments()
            .iter()
            .filter(|instrument| instrument.category == category)
        {
            println!("  {:<12} {}", instrument.symbol, instrument.name);
        }
        println!();
    }
}

/// Column-header dates come from the first record that has them; groups of
/// entirely not-available records fall back to N/A.
fn header_dates(group: &CategoryChanges) -> (String, String) {
    let record = group
        .records
        .iter()
        .find(|record| record.previous_date.is_some() && record.last_date.is_some());
    match record {
        Some(record) => (
            record
                .previous_date
                .map(|date| date.format_iso())
                .unwrap_or_else(|| String::from("N/A")),
            record
                .last_date
                .map(|date| date.format_iso())
                .unwrap_or_else(|| String::from("N/A")),
        ),
        None => (String::from("N/A"), String::from("N/A")),
    }
}

fn format_price(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(value) => format!("{value:.decimals$}"),
        None => String::from("N/A"),
    }
}

fn format_signed(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(value) => format!("{value:+.decimals$}"),
        None => String::from("N/A"),
    }
}

fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:+.2}%"),
        None => String::from("N/A"),
    }
}
