use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use inquire::{Password, PasswordDisplayMode, Select, Text};
use realtime_core::{Config, Dashboard, ProviderId, QueryError};
use serde::Serialize;
use std::{fmt::Display, process::ExitCode};
use tracing::debug;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "realtime", version, about = "Live weather and currency exchange rates")]
pub struct Cli {
    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key for a provider.
    Configure {
        /// Provider short name: "openweather" or "exchangerate".
        provider: String,
    },

    /// Show current weather for a city.
    Weather {
        /// City name, e.g. "Paris".
        city: String,
    },

    /// Show the exchange rate between two currencies.
    Rate {
        /// Source currency code, e.g. USD.
        from: String,
        /// Target currency code, e.g. EUR.
        to: String,
    },

    /// Tabbed session: pick weather or exchange rates until you quit.
    Interactive,
}

const WEATHER_TAB: &str = "🌦 Weather";
const RATES_TAB: &str = "💱 Currency Exchange Rates";
const QUIT: &str = "Quit";

impl Cli {
    /// Query failures are printed in red and turn into a non-zero exit code.
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let shown = match self.command {
            Command::Configure { provider } => {
                let id = ProviderId::try_from(provider.as_str())?;
                configure(id)?;
                true
            }
            Command::Weather { city } => match dashboard()? {
                Some(dash) => show_outcome(dash.weather(&city).await, self.json)?,
                None => false,
            },
            Command::Rate { from, to } => match dashboard()? {
                Some(dash) => show_outcome(dash.exchange_rate(&from, &to).await, self.json)?,
                None => false,
            },
            Command::Interactive => {
                interactive(self.json).await?;
                true
            }
        };

        Ok(if shown { ExitCode::SUCCESS } else { ExitCode::FAILURE })
    }
}

fn configure(id: ProviderId) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new(&format!("Enter your {} API key:", id.label()))
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        anyhow::bail!("API key for '{id}' must not be empty.");
    }

    config.upsert_provider_api_key(id, api_key.trim().to_string());
    let path = config.save()?;

    println!("Saved {} API key to {}", id.label(), path.display());
    Ok(())
}

/// Config file overlaid with environment keys.
fn load_config() -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    config.apply_env();
    Ok(config)
}

/// `None` once the missing-key warning has been printed.
fn dashboard() -> anyhow::Result<Option<Dashboard>> {
    let config = load_config()?;

    match Dashboard::from_config(&config) {
        Ok(dash) => Ok(Some(dash)),
        Err(err) if err.is_input_missing() => {
            let missing: Vec<_> = config.missing_providers().iter().map(|id| id.as_str()).collect();
            eprintln!("{}", err.to_string().yellow());
            eprintln!(
                "Hint: run `realtime configure <provider>` or set {} (missing: {}).",
                ProviderId::all().iter().map(|id| id.env_var()).collect::<Vec<_>>().join(" / "),
                missing.join(", ")
            );
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

fn print_report<T: Serialize + Display>(report: &T, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

fn render_error(err: &QueryError) -> String {
    err.to_string().red().to_string()
}

/// Print the report, or the error in its place. Returns whether a report was shown.
fn show_outcome<T: Serialize + Display>(
    outcome: Result<T, QueryError>,
    json: bool,
) -> anyhow::Result<bool> {
    match outcome {
        Ok(report) => {
            print_report(&report, json)?;
            Ok(true)
        }
        Err(err) => {
            debug!(error = ?err, "query failed");
            eprintln!("{}", render_error(&err));
            Ok(false)
        }
    }
}

async fn interactive(json: bool) -> anyhow::Result<()> {
    let mut config = load_config()?;

    // Keys entered here live for this session only.
    for id in config.missing_providers() {
        let key = Password::new(&format!("Enter your {} API key:", id.label()))
            .with_display_mode(PasswordDisplayMode::Masked)
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?;
        config.upsert_provider_api_key(id, key);
    }

    let dash = match Dashboard::from_config(&config) {
        Ok(dash) => dash,
        Err(err) if err.is_input_missing() => {
            eprintln!("{}", err.to_string().yellow());
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    println!("{}", "Real-Time Data Application".bold());
    println!("Fetch current weather information or live currency exchange rates.\n");

    loop {
        let tab = Select::new("Choose a tab:", vec![WEATHER_TAB, RATES_TAB, QUIT])
            .prompt()
            .context("Failed to read tab selection")?;
        debug!(tab, "tab selected");

        match tab {
            WEATHER_TAB => {
                let city = Text::new("Enter a city name:").prompt()?;
                show_outcome(dash.weather(&city).await, json)?;
            }
            RATES_TAB => {
                let from = Text::new("From Currency (e.g., USD):").prompt()?;
                let to = Text::new("To Currency (e.g., EUR):").prompt()?;
                show_outcome(dash.exchange_rate(&from, &to).await, json)?;
            }
            _ => break,
        }

        println!();
    }

    Ok(())
}
