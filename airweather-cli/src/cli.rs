use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{
    CustomUserError, Password, PasswordDisplayMode, Text, validator::Validation,
};

use airweather_core::{
    Config, Coordinates, FixedLocation, GazetteerLocation, GroupingStrategy, HttpFetcher,
    LocationProvider, ProviderId, pipeline, providers_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "airweather", version, about = "Daily forecast and nearest air-quality station")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials and endpoint for a provider.
    Configure {
        /// Provider short name: "openweather" or "aqms".
        provider: String,
    },

    /// Show the daily forecast and nearest air-quality station.
    Show {
        /// Latitude in decimal degrees.
        #[arg(long, requires = "lon", conflicts_with = "city", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude in decimal degrees.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// City name from the built-in list (see `airweather cities`).
        #[arg(long)]
        city: Option<String>,

        /// Restrict the city lookup to one province.
        #[arg(long, requires = "city")]
        province: Option<String>,

        /// How forecast samples are grouped into days: weekday or calendar-date.
        #[arg(long)]
        grouping: Option<GroupingStrategy>,

        /// Print the snapshot as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the built-in provinces and cities.
    Cities,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Show {
                lat,
                lon,
                city,
                province,
                grouping,
                json,
            } => {
                let locator = locator(lat, lon, city, province)?;
                show(locator.as_ref(), grouping, json).await
            }
            Command::Cities => {
                print!("{}", render::cities());
                Ok(())
            }
        }
    }
}

fn locator(
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    province: Option<String>,
) -> anyhow::Result<Box<dyn LocationProvider>> {
    match (lat, lon, city) {
        (Some(lat), Some(lon), _) => Ok(Box::new(FixedLocation(Coordinates::new(lat, lon)))),
        (_, _, Some(city)) => Ok(Box::new(GazetteerLocation { province, city })),
        _ => Err(anyhow!(
            "No location given.\n\
             Hint: pass `--lat <LAT> --lon <LON>` or `--city <NAME>`."
        )),
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    if id.requires_api_key() {
        let api_key = Password::new(&format!("API key for {id}:"))
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?;
        config.upsert_provider_api_key(id, api_key.trim().to_string());
    }

    let url = Text::new(&format!("Endpoint for {id}:"))
        .with_default(config.provider_url(id))
        .with_validator(endpoint_validator(id))
        .prompt()
        .context("Failed to read endpoint")?;
    let url = url.trim();
    if url != id.default_url() {
        config.set_provider_url(id, url.to_string());
    } else if let Some(entry) = config.providers.get_mut(id.as_str()) {
        entry.url = None;
    }

    config.save()?;
    println!("Saved {id} settings to {}", Config::config_file_path()?.display());

    Ok(())
}

fn endpoint_validator(
    id: ProviderId,
) -> impl Fn(&str) -> Result<Validation, CustomUserError> + Clone {
    move |input: &str| match id.parse_endpoint(input) {
        Ok(_) => Ok(Validation::Valid),
        Err(err) => Ok(Validation::Invalid(format!("{err:#}").into())),
    }
}

async fn show(
    locator: &dyn LocationProvider,
    grouping: Option<GroupingStrategy>,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load()?;
    let providers = providers_from_config(&config)?;
    let fetcher = HttpFetcher::new(config.request_timeout())?;

    let origin = locator.locate().await.context("Could not resolve location")?;
    let grouping = grouping.unwrap_or(config.grouping);
    tracing::debug!(%origin, %grouping, "resolved location");

    let snapshot = pipeline::run(&fetcher, &providers, origin, grouping.policy()).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render::snapshot(&snapshot));
    }

    Ok(())
}
