//! Output formatting for CLI commands.
//!
//! This module handles formatting output as either JSON or human-readable text.

use anyhow::Result;
use chrono::Datelike;
use serde::Serialize;

use super::types::{
    AppointmentSummary, ConversionView, DayBucketView, MonthView, WeekViewOutput,
};

const WEEKDAY_HEADER: &str = "  Su   Mo   Tu   We   Th   Fr   Sa";

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn describe(a: &AppointmentSummary) -> String {
    let mut line = format!(
        "#{} {} - {}",
        a.primary_key,
        a.start.format("%Y-%m-%d %H:%M"),
        a.end.format("%Y-%m-%d %H:%M")
    );
    if !a.title.is_empty() {
        line.push_str(&format!("  {}", a.title));
    }
    if let Some(customer) = &a.customer {
        line.push_str(&format!("  [customer: {}]", customer));
    }
    if let Some(user) = &a.user {
        line.push_str(&format!("  [user: {}]", user));
    }
    line
}

/// Print a month grid followed by the per-day placements.
pub fn print_month(view: &MonthView, json: bool) -> Result<()> {
    if json {
        return print_json(view);
    }

    println!("{} ({} days, {} rows)\n", view.month, view.days_in_month, view.rows);
    println!("{}", WEEKDAY_HEADER);
    let mut grid = vec![vec![String::from("    "); 7]; view.rows as usize];
    for cell in &view.cells {
        if let Some(pos) = cell.position {
            let marker = if cell.entries.is_empty() { ' ' } else { '*' };
            grid[pos.row as usize][pos.column as usize] =
                format!("{:>3}{}", cell.date.day(), marker);
        }
    }
    for row in grid {
        println!("{}", row.join(" "));
    }
    println!();

    let mut any = false;
    for cell in view.cells.iter().filter(|c| !c.entries.is_empty()) {
        any = true;
        println!("{}", cell.date.format("%a %Y-%m-%d"));
        for entry in &cell.entries {
            let prefix = if entry.continued_from_previous { "<" } else { " " };
            let suffix = if entry.continued_on_next { " >" } else { "" };
            println!("  {}{}{}", prefix, describe(&entry.appointment), suffix);
        }
    }
    if !any {
        println!("No appointments this month.");
    }
    Ok(())
}

/// Print day buckets.
pub fn print_buckets(buckets: &[DayBucketView], json: bool) -> Result<()> {
    if json {
        return print_json(buckets);
    }
    if buckets.is_empty() {
        println!("No appointments.");
        return Ok(());
    }
    for bucket in buckets {
        for entry in &bucket.entries {
            let date = if entry.is_first_of_day {
                bucket.date.format("%Y-%m-%d").to_string()
            } else {
                String::new()
            };
            println!("{:<12} {}", date, describe(&entry.appointment));
        }
    }
    println!("\nTotal: {} days", buckets.len());
    Ok(())
}

/// Print a week view.
pub fn print_week(view: &WeekViewOutput, json: bool) -> Result<()> {
    if json {
        return print_json(view);
    }
    println!("Week of {}\n", view.week_start.format("%Y-%m-%d"));
    for day in &view.days {
        println!("{}", day.date.format("%a %Y-%m-%d"));
        if day.appointments.is_empty() {
            println!("  -");
        }
        for a in &day.appointments {
            println!("  {}", describe(a));
        }
    }
    Ok(())
}

/// Print a zone conversion.
pub fn print_conversion(view: &ConversionView, json: bool) -> Result<()> {
    if json {
        return print_json(view);
    }
    println!("{} in {}", view.input, view.from_zone);
    println!("  same instant in {}: {}", view.to_zone, view.same_instant);
    println!("  same local in {}:   {}", view.to_zone, view.same_local);
    Ok(())
}
