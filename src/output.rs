// Console rendering and file export.
//
// These are the stand-ins for the external renderer boundaries: the grid
// widget becomes a markdown table, the pie/gauge charts become share tables
// and a percentage line. Rendering is side-effecting presentation only;
// nothing flows back into the core.
use serde::Serialize;
use std::error::Error;
use tabled::{builder::Builder, settings::Style, Table};

use crate::types::{AggregateRow, Notice, RecordSet};
use crate::util::{format_int, format_number};

/// Export a record set as CSV, header first.
pub fn write_csv(path: &str, records: &RecordSet) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(&records.columns)?;
    for row in &records.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Print a record set as a markdown grid, capped at `max_rows` rows.
pub fn print_grid(records: &RecordSet, max_rows: usize) {
    if records.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(records.columns.iter().map(String::as_str));
    for row in records.rows.iter().take(max_rows) {
        builder.push_record(row.iter().map(String::as_str));
    }
    let table = builder.build().with(Style::markdown()).to_string();
    println!("{}", table);
    if records.len() > max_rows {
        println!(
            "... {} more rows ({} total)",
            format_int((records.len() - max_rows) as i64),
            format_int(records.len() as i64)
        );
    }
    println!();
}

/// Print a pie-style share table: one line per category with its share of
/// the grand total, followed by a total metric box.
pub fn print_share_table(title: &str, rows: &[AggregateRow]) {
    println!("{}", title);
    if rows.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let total: f64 = rows.iter().map(|r| r.value).sum();

    #[derive(tabled::Tabled)]
    struct ShareRow {
        #[tabled(rename = "Label")]
        label: String,
        #[tabled(rename = "Equipos")]
        value: String,
        #[tabled(rename = "Share")]
        share: String,
    }

    let share_rows: Vec<ShareRow> = rows
        .iter()
        .map(|r| ShareRow {
            label: r.label.clone(),
            value: format_number(r.value, 0),
            share: if total == 0.0 {
                "0.00%".to_string()
            } else {
                format!("{}%", format_number(r.value / total * 100.0, 2))
            },
        })
        .collect();
    let table = Table::new(share_rows).with(Style::markdown()).to_string();
    println!("{}", table);
    println!("[ Total de equipos: {} ]\n", format_number(total, 0));
}

/// Print a plain aggregate table (the area-style per-state series).
pub fn print_series(title: &str, rows: &[AggregateRow]) {
    println!("{}", title);
    if rows.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table = Table::new(rows).with(Style::markdown()).to_string();
    println!("{}\n", table);
}

/// Print a gauge line: a label and a 0-100 percentage with a bar.
pub fn print_gauge(label: &str, pct: f64) {
    let pct = pct.clamp(0.0, 100.0);
    let filled = (pct / 5.0).round() as usize;
    let bar: String = "#".repeat(filled) + &"-".repeat(20usize.saturating_sub(filled));
    println!("{} [{}] {}%\n", label, bar, format_number(pct, 1));
}

/// Surface the degradation notices a pipeline stage reported.
pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        println!("{}", notice);
    }
    if !notices.is_empty() {
        println!();
    }
}
