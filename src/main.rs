// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod airlines;
mod app;
mod config;
mod events;
mod flight;
mod geo;
mod geocode;
mod input;
mod ranking;
mod scheduler;
mod ui;

use std::io;
use std::process;
use std::time::Duration;

use clap::Parser;
use log::info;
use mimalloc::MiMalloc;
use opensky_client::{Client, ClientConfig};

use crate::app::{App, SessionConfig};
use crate::config::AppConfig;
use crate::geo::Location;
use crate::ui::Tui;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const LOG_FILE: &str = "nearflights.log";

/// Terminal tracker for aircraft near a fixed location
#[derive(Debug, Parser)]
#[command(name = "nearflights", version, about)]
struct Cli {
    /// Address to track, e.g. "Santa Monica, CA" (falls back to the
    /// configured default location)
    address: Option<String>,

    /// Origin latitude in decimal degrees (with --lon, skips geocoding)
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Origin longitude in decimal degrees
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Search radius in statute miles
    #[arg(short, long)]
    radius: Option<f64>,

    /// How many of the closest flights to show
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Seconds between automatic refreshes
    #[arg(short, long)]
    interval: Option<u64>,

    /// Print the configuration file path and exit
    #[arg(long)]
    config_path: bool,
}

/// Route logs to a file when `RUST_LOG` asks for them. The interface
/// owns the terminal, so nothing may write to stdout or stderr while
/// the session runs.
fn init_logging() -> io::Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }
    let file = std::fs::File::create(LOG_FILE)?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Pick the session origin. Precedence: explicit coordinates, then the
/// address argument, then the configured override, then the configured
/// default address.
async fn resolve_origin(cli: &Cli, config: &AppConfig) -> Result<(Location, String), String> {
    if let (Some(latitude), Some(longitude)) = (cli.lat, cli.lon) {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(format!("coordinates out of range: {latitude}, {longitude}"));
        }
        let location = Location {
            latitude,
            longitude,
        };
        return Ok((location, format!("{latitude:.4}, {longitude:.4}")));
    }

    if let Some(address) = cli.address.as_deref() {
        return geocode::resolve(address).await.map_err(|e| e.to_string());
    }

    if let Some(location) = config.override_location() {
        let label = format!("{:.4}, {:.4}", location.latitude, location.longitude);
        return Ok((location, label));
    }

    if let Some(address) = config.default_address.as_deref() {
        return geocode::resolve(address).await.map_err(|e| e.to_string());
    }

    Err("no location to track; pass an address or set one in the config file".to_string())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.config_path {
        match AppConfig::config_path() {
            Ok(path) => println!("{}", path.display()),
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = init_logging() {
        eprintln!("Warning: could not open {LOG_FILE}: {e}");
    }

    let config = AppConfig::load();
    let radius_miles = cli.radius.unwrap_or(config.radius_miles);
    let top_n = cli.count.unwrap_or(config.top_n);
    let refresh_secs = cli.interval.unwrap_or(config.refresh_secs);

    if !radius_miles.is_finite() || radius_miles <= 0.0 {
        eprintln!("Error: radius must be a positive number of miles");
        process::exit(2);
    }
    if top_n == 0 {
        eprintln!("Error: count must be at least 1");
        process::exit(2);
    }
    if refresh_secs == 0 {
        eprintln!("Error: interval must be at least 1 second");
        process::exit(2);
    }

    let (origin, origin_label) = match resolve_origin(&cli, &config).await {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };
    info!(
        "Tracking {:.4}, {:.4} ({origin_label})",
        origin.latitude, origin.longitude
    );

    let mut client_config = ClientConfig::default();
    if let Some(url) = config.feed_url.clone() {
        client_config.base_url = url;
    }
    let client = match Client::new(client_config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: could not build feed client: {e}");
            process::exit(1);
        }
    };

    let session = SessionConfig {
        origin,
        origin_label,
        radius_miles,
        top_n,
        refresh_interval: Duration::from_secs(refresh_secs),
    };
    let app = App::new(session, client);

    let tui = match Tui::new() {
        Ok(tui) => tui,
        Err(e) => {
            eprintln!("Error: could not initialize terminal: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = app.run(tui).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
