use anyhow::{Context, anyhow};
use citysky_core::{Action, Config, Session, TemperatureUnit, provider_from_config};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "citysky", version, about = "Look up current weather by city")]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and preferred unit.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City or place name.
        city: String,

        /// Temperature unit: "c"/"celsius" or "f"/"fahrenheit".
        #[arg(long)]
        unit: Option<String>,
    },

    /// Search interactively with place suggestions.
    Search {
        /// Optional initial query.
        query: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, unit } => show(city, unit).await,
            Command::Search { query } => {
                let config = Config::load()?;
                let session = start_session(&config)?;
                interactive::run(&session, query).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if api_key.trim().is_empty() {
        return Err(anyhow!("API key must not be empty"));
    }
    config.set_api_key(api_key);

    let units = vec![TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit];
    let start = units.iter().position(|u| *u == config.input.default_unit).unwrap_or(0);
    config.input.default_unit = Select::new("Default temperature unit:", units)
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read temperature unit")?;

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

async fn show(city: String, unit: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(unit) = unit {
        config.input.default_unit = TemperatureUnit::try_from(unit.as_str())?;
    }
    let session = start_session(&config)?;

    session.send(Action::QueryChanged(city)).await?;
    let state = session.send(Action::Submit).await?;
    if let Some(error) = state.error() {
        return Err(anyhow!("{error}"));
    }

    let state = session.settle().await?;
    if let Some(error) = state.error() {
        return Err(anyhow!("{error}"));
    }

    print!("{}", render::weather_card(&state));
    Ok(())
}

fn start_session(config: &Config) -> anyhow::Result<Session> {
    let service = provider_from_config(config)?;
    tracing::debug!(settings = ?config.input, "Starting lookup session");
    Ok(Session::spawn(service, config.input.clone()))
}
