use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use fireaq_core::provider::waqi::WaqiProvider;
use fireaq_core::{Config, Intensity, Resolver, WildfireCatalog};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "fireaq", version, about = "Wildfire & air-quality dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WAQI API token used for air-quality lookups.
    Configure,

    /// Render the dashboard for a city.
    Show {
        /// City name. Omit to search interactively.
        city: Option<String>,

        /// Only map wildfire events from this country.
        #[arg(long)]
        country: Option<String>,

        /// Only map events at or above this intensity: low, moderate, high, extreme.
        #[arg(long, value_parser = parse_intensity)]
        min_intensity: Option<Intensity>,

        /// Path to the wildfire dataset CSV.
        #[arg(long, default_value = "data/wildfires.csv")]
        data: PathBuf,
    },
}

fn parse_intensity(s: &str) -> Result<Intensity, String> {
    s.parse().map_err(|e: anyhow::Error| e.to_string())
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, country, min_intensity, data } => {
                show(city, country, min_intensity, &data).await
            }
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let token = inquire::Text::new("WAQI API token:")
        .with_help_message("Get one at https://aqicn.org/data-platform/token/")
        .prompt()
        .context("Token prompt aborted")?;

    config.set_api_token(token.trim().to_owned());
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(
    city: Option<String>,
    country: Option<String>,
    min_intensity: Option<Intensity>,
    data: &Path,
) -> Result<()> {
    let config = Config::load()?;
    let token = config.api_token()?;

    // Loaded once; every render cycle borrows it.
    let catalog = WildfireCatalog::load(data)?;
    let events = catalog.filter(country.as_deref(), min_intensity);
    log::debug!("{} events in catalog, {} after filters", catalog.events().len(), events.len());

    let provider = WaqiProvider::new(token);
    let resolver = Resolver::new(&provider);

    match city {
        Some(city) => {
            let resolution = resolver
                .resolve(&city)
                .await
                .context("Air quality is unavailable: even the fallback city failed")?;
            render::dashboard(&resolution, &events);
        }
        None => {
            // Interactive search: one Resolver -> Presenter pass per prompt,
            // each cycle superseding the last. Esc ends the session.
            loop {
                let input = inquire::Text::new("City:")
                    .with_help_message("Enter a city to look up, Esc to quit")
                    .prompt_skippable()
                    .context("City prompt aborted")?;

                let Some(input) = input else { break };

                let resolution = resolver
                    .resolve(&input)
                    .await
                    .context("Air quality is unavailable: even the fallback city failed")?;
                render::dashboard(&resolution, &events);
            }
        }
    }

    Ok(())
}
