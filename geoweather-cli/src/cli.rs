use std::{process::ExitCode, sync::Arc};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use geoweather_core::{
    Config, Coordinate, GeolocationProvider, PositionSource, ViewState, WeatherApp,
    location::{FixedSource, IpApiSource},
    provider::provider_from_config,
};
use inquire::{InquireError, Password, PasswordDisplayMode, Select};

const QUIT: &str = "Quit";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "geoweather", version, about = "Current weather for where you are")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Show current weather for your location.
    Show {
        /// Latitude to use instead of looking up the current position.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude to use instead of looking up the current position.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Exit after the first attempt instead of offering a refresh.
        #[arg(long)]
        once: bool,

        /// Print the raw report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the location of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { lat, lon, once, json } => {
                let fixed = lat.zip(lon).map(|(lat, lon)| Coordinate::new(lat, lon));
                show(fixed, once, json).await
            }
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn configure() -> anyhow::Result<ExitCode> {
    let path = Config::config_file_path()?;
    // Read the file only, so an environment override never gets persisted.
    let mut cfg = Config::load_from(&path)?;

    let key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    cfg.set_api_key(key);
    cfg.save()?;

    println!("Saved API key to {}", path.display());
    Ok(ExitCode::SUCCESS)
}

async fn show(fixed: Option<Coordinate>, once: bool, json: bool) -> anyhow::Result<ExitCode> {
    let cfg = Config::load()?;

    let source: Arc<dyn PositionSource> = match fixed {
        Some(coord) => {
            tracing::debug!(lat = coord.lat, lon = coord.lon, "Using position from arguments");
            Arc::new(FixedSource::new(coord))
        }
        None => {
            tracing::debug!(url = %cfg.geolocation_url, "Using IP geolocation");
            Arc::new(IpApiSource::new(cfg.geolocation_url.clone()))
        }
    };
    let location = GeolocationProvider::new(source);
    let weather = provider_from_config(&cfg);
    let app = WeatherApp::new(Arc::new(location), Arc::new(weather));

    let mut first = true;
    loop {
        let state = observe_attempt(&app, first, json).await?;
        first = false;

        if once {
            return Ok(match state {
                ViewState::Error(_) => ExitCode::FAILURE,
                _ => ExitCode::SUCCESS,
            });
        }

        let Some(action) = state.action_label() else {
            return Ok(ExitCode::SUCCESS);
        };

        match Select::new("What next?", vec![action, QUIT]).prompt() {
            Ok(choice) if choice == action => continue,
            Ok(_) => return Ok(ExitCode::SUCCESS),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(ExitCode::SUCCESS);
            }
            Err(e) => return Err(e).context("Failed to read selection"),
        }
    }
}

/// Run one attempt, printing every state the app publishes while it runs.
async fn observe_attempt(app: &WeatherApp, initial: bool, json: bool) -> anyhow::Result<ViewState> {
    let mut rx = app.subscribe();
    let attempt = async {
        if initial { app.load().await } else { app.retry().await }
    };
    tokio::pin!(attempt);

    let state = loop {
        tokio::select! {
            biased;
            Ok(()) = rx.changed() => {
                let current = rx.borrow_and_update().clone();
                print_state(&current, json)?;
            }
            state = &mut attempt => break state,
        }
    };

    // The final transition lands in the same poll that completes the attempt.
    if rx.has_changed().unwrap_or(false) {
        let current = rx.borrow_and_update().clone();
        print_state(&current, json)?;
    }

    Ok(state)
}

fn print_state(state: &ViewState, json: bool) -> anyhow::Result<()> {
    match (state, json) {
        (ViewState::Loading, true) => {}
        (ViewState::Loaded(report), true) => {
            let out = serde_json::to_string_pretty(report)
                .context("Failed to serialize weather report")?;
            println!("{out}");
        }
        (ViewState::Error(message), true) => eprintln!("{message}"),
        _ => {
            println!();
            print!("{state}");
        }
    }
    Ok(())
}
