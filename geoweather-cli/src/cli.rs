use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use geoweather_core::{Config, Coordinate, Observation, server};
use inquire::{CustomType, Text};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "geoweather", version, about = "Weather and place summary for a coordinate")]
pub struct Cli {
    /// Log debug output from the service and HTTP layer.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Use this config file instead of the platform default.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server.
    Serve {
        /// Address to listen on, e.g. "0.0.0.0:8080". Overrides the config file.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Fetch the summary for one coordinate and print it.
    Lookup {
        /// Latitude in [-90, 90].
        #[arg(long, allow_hyphen_values = true)]
        lat: String,

        /// Longitude in [-180, 180].
        #[arg(long, allow_hyphen_values = true)]
        lon: String,

        /// Print the raw JSON payload.
        #[arg(long)]
        json: bool,
    },

    /// Interactively edit the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut config = load_config(self.config.as_deref())?;

        match self.command {
            Command::Serve { bind } => {
                if let Some(bind) = bind {
                    config.bind_addr = bind;
                    config.validate()?;
                }
                server::serve(&config).await
            }
            Command::Lookup { lat, lon, json } => {
                let observation = lookup(&config, &lat, &lon).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&observation.summary())?);
                } else {
                    println!("{}", render(&observation));
                }
                Ok(())
            }
            Command::Configure => configure(config, self.config.as_deref()),
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Same validation and fan-out as the HTTP endpoint, keeping the raw provider records.
async fn lookup(config: &Config, lat: &str, lon: &str) -> Result<Observation> {
    let coord = Coordinate::parse(Some(lat), Some(lon)).context("Lookup failed")?;
    let service = server::service_from_config(config)?;

    service
        .observe(&coord.normalize())
        .await
        .context("Lookup failed")
}

fn render(observation: &Observation) -> String {
    let summary = observation.summary();
    let mut lines = vec![format!("{}, {} ({})", summary.city, summary.country, summary.district)];

    if let Some(place) = &observation.location.display_name {
        lines.push(place.clone());
    }
    lines.push(format!("Temperature: {} °C", summary.temp));
    lines.push(format!("Wind: {} km/h from {}°", summary.windspeed, summary.winddirection));
    if let Some(observed_at) = observation.weather.observed_at {
        lines.push(format!("Observed at: {observed_at} UTC"));
    }

    lines.join("\n")
}

fn configure(mut config: Config, path: Option<&Path>) -> Result<()> {
    config.bind_addr = Text::new("Bind address:")
        .with_default(&config.bind_addr)
        .prompt()?;

    config.cache_max_age_secs = CustomType::<u64>::new("Cache max-age (seconds):")
        .with_default(config.cache_max_age_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()?;

    config.request_timeout_secs = CustomType::<u64>::new("Upstream request timeout (seconds):")
        .with_default(config.request_timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()?;

    config.user_agent = Text::new("User-Agent sent to Nominatim:")
        .with_default(&config.user_agent)
        .prompt()?;

    config.validate()?;

    let saved_to = match path {
        Some(path) => {
            config.save_to(path)?;
            path.to_path_buf()
        }
        None => config.save()?,
    };

    println!("Configuration saved to {}", saved_to.display());
    Ok(())
}
