//! waze-home - Get the fastest route between home and work
//!
//! Usage:
//!   waze-home route [--from NAME] [--to NAME]   Route between two named locations
//!   waze-home work                              Shortcut: home to work
//!   waze-home home                              Shortcut: work to home
//!   waze-home set-location NAME ADDRESS         Save a named location
//!   waze-home locations [NAME]                  Show one or all locations

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use waze_home::adapter::{FallbackTables, RouteAdapter};
use waze_home::config::LocationStore;
use waze_home::provider::WazeProvider;
use waze_home::report;

/// Waze Home - Get the fastest route between home and work
#[derive(Parser)]
#[command(name = "waze-home")]
#[command(about = "Get the fastest route between home and work")]
#[command(version)]
#[command(after_help = r#"EXAMPLES:
    waze-home work                      # Route from home to work
    waze-home home                      # Route from work to home
    waze-home route --from home --to gym
    waze-home set-location gym "5 Fitness Ave, Perth"
    waze-home locations                 # List saved locations

CONFIGURATION:
    Locations live in ~/.config/waze-home/config.json. When the file is
    absent, WAZE_HOME_LOCATION and WAZE_WORK_LOCATION override the built-in
    defaults, and WAZE_API_KEY sets the API credential.
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get the fastest route between two named locations
    #[command(alias = "r")]
    Route {
        /// Starting location name
        #[arg(long = "from", value_name = "NAME", default_value = "home")]
        origin: String,

        /// Destination location name
        #[arg(long = "to", value_name = "NAME", default_value = "work")]
        destination: String,
    },

    /// Get the fastest route home from work
    Home,

    /// Get the fastest route to work from home
    Work,

    /// Save a named location
    #[command(name = "set-location")]
    SetLocation {
        /// Location name, e.g. "gym"
        name: String,

        /// Street address
        address: String,
    },

    /// Show a named location, or list all saved locations
    Locations {
        /// Location name to show
        name: Option<String>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let store = LocationStore::new(&LocationStore::default_dir());

    match cli.command {
        Commands::Route {
            origin,
            destination,
        } => cmd_route(&store, &origin.to_lowercase(), &destination.to_lowercase()),
        Commands::Home => cmd_route(&store, "work", "home"),
        Commands::Work => cmd_route(&store, "home", "work"),
        Commands::SetLocation { name, address } => cmd_set_location(&store, &name, &address),
        Commands::Locations { name } => cmd_locations(&store, name.as_deref()),
    }
}

/// Resolve a named location or fail with a hint.
fn lookup(store: &LocationStore, name: &str) -> Result<String> {
    match store.get_location(name)? {
        Some(address) => Ok(address),
        None => bail!(
            "Location '{}' not found. Use 'set-location' to add it.",
            name
        ),
    }
}

/// Compute and render a route between two named locations.
fn cmd_route(store: &LocationStore, origin: &str, destination: &str) -> Result<()> {
    let origin_address = lookup(store, origin)?;
    let destination_address = lookup(store, destination)?;

    println!(
        "{}",
        format!("Getting route from {} to {}...", origin, destination).dimmed()
    );
    println!();

    let provider = WazeProvider::new()?;
    let adapter = RouteAdapter::new(provider, FallbackTables::default());
    let result = adapter.get_route(&origin_address, &destination_address);

    report::print_route(
        origin,
        &origin_address,
        destination,
        &destination_address,
        &result,
    )
}

/// Save a named location.
fn cmd_set_location(store: &LocationStore, name: &str, address: &str) -> Result<()> {
    let name = name.to_lowercase();
    store.set_location(&name, address)?;
    println!(
        "{} Location '{}' set to '{}'",
        "[ok]".green(),
        name,
        address
    );
    Ok(())
}

/// Show one location or list them all.
fn cmd_locations(store: &LocationStore, name: Option<&str>) -> Result<()> {
    if let Some(name) = name {
        let name = name.to_lowercase();
        let address = lookup(store, &name)?;
        println!("{} {}", format!("{}:", name).bold(), address);
        return Ok(());
    }

    let config = store.load()?;
    if config.locations.is_empty() {
        println!("No locations set. Use 'set-location' to add locations.");
        return Ok(());
    }

    println!("{}", "Saved Locations".bold());
    println!();
    println!("{}", format!("  {:<12} {}", "Name", "Address").dimmed());
    for (name, address) in &config.locations {
        println!("  {:<12} {}", name, address);
    }

    Ok(())
}
