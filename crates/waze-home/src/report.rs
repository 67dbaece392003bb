//! Presentation layer
//!
//! Renders a normalized route as a summary panel, a numbered directions
//! list, and an alternate-routes table.

use anyhow::{bail, Result};
use colored::Colorize;

use crate::route::{RouteData, RouteResult};

/// Travel time as whole minutes, e.g. "69 minutes".
fn format_minutes(total_seconds: u32) -> String {
    format!("{} minutes", total_seconds / 60)
}

/// Distance in kilometers with one decimal, e.g. "14.2 km".
fn format_km(total_meters: u32) -> String {
    format!("{:.1} km", f64::from(total_meters) / 1000.0)
}

/// Render a route result to stdout.
///
/// An error result becomes a bail without touching any summary fields, so
/// the caller exits non-zero with the message.
pub fn print_route(
    origin_name: &str,
    origin_address: &str,
    destination_name: &str,
    destination_address: &str,
    result: &RouteResult,
) -> Result<()> {
    let data = match result {
        RouteResult::Route(data) => data,
        RouteResult::Error { message } => bail!("{}", message),
    };

    print_summary(origin_name, origin_address, destination_name, destination_address, data);
    print_directions(data);
    print_alternates(data);

    Ok(())
}

fn print_summary(
    origin_name: &str,
    origin_address: &str,
    destination_name: &str,
    destination_address: &str,
    data: &RouteData,
) {
    let summary = &data.summary;

    println!("{}", "Route Summary".bold().green());
    println!();
    println!(
        "  {}        {} ({})",
        "From:".cyan(),
        origin_name,
        origin_address
    );
    println!(
        "  {}          {} ({})",
        "To:".cyan(),
        destination_name,
        destination_address
    );
    println!(
        "  {}   {}",
        "Departure:".cyan(),
        summary.departure.format("%H:%M")
    );
    println!(
        "  {}     {}",
        "Arrival:".cyan(),
        summary.arrival.format("%H:%M")
    );
    println!(
        "  {} {}",
        "Travel time:".cyan(),
        format_minutes(summary.total_seconds)
    );
    println!(
        "  {}    {}",
        "Distance:".cyan(),
        format_km(summary.total_meters)
    );
    println!("  {}     {}", "Traffic:".cyan(), data.traffic);
    println!();
}

fn print_directions(data: &RouteData) {
    println!("{}", "Directions".bold());
    println!();
    for (i, direction) in data.directions.iter().enumerate() {
        println!("  {} {}", format!("{}.", i + 1).dimmed(), direction);
    }
    println!();
}

fn print_alternates(data: &RouteData) {
    if data.alternates.is_empty() {
        return;
    }

    println!("{}", "Alternative Routes".bold());
    println!();
    // Pad before styling so the ANSI codes don't skew the columns
    println!(
        "{}",
        format!("  {:<36} {:<12} {}", "Route", "Time", "Distance").dimmed()
    );
    for alt in &data.alternates {
        println!(
            "  {:<36} {:<12} {}",
            alt.name,
            format_minutes(alt.total_seconds),
            format_km(alt.total_meters)
        );
    }
    println!();
}
