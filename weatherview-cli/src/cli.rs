use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use weatherview_core::{
    Config, Coordinates, FixedPosition, Geolocator, IpGeolocator, Key, OpenWeatherProvider,
    SearchField, WeatherViewModel, provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherview", version, about = "Current weather for where you are")]
pub struct Cli {
    /// Log debug diagnostics to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    /// Show current weather once.
    Show {
        /// Place name; when absent the current position is used.
        #[arg(conflicts_with_all = ["lat", "lon", "no_geolocate"])]
        place: Option<String>,

        #[command(flatten)]
        position: PositionArgs,
    },

    /// Show weather for the current position, then search by place name until an empty line.
    Watch {
        #[command(flatten)]
        position: PositionArgs,
    },
}

#[derive(Debug, clap::Args)]
pub struct PositionArgs {
    /// Latitude of the current position.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude of the current position.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Behave as if no geolocation is available and use the fallback location.
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub no_geolocate: bool,
}

impl PositionArgs {
    fn geolocator(&self) -> Option<Box<dyn Geolocator>> {
        if self.no_geolocate {
            tracing::debug!("Geolocation disabled, using the fallback location");
            return None;
        }
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => {
                tracing::debug!(lat, lon, "Using position from command line");
                Some(Box::new(FixedPosition(Coordinates::new(lat, lon))))
            }
            _ => {
                tracing::debug!("Locating by public IP address");
                Some(Box::new(IpGeolocator::new()))
            }
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { place, position } => {
                let mut vm = view_model()?;
                match place {
                    Some(place) => vm.search(&place).await,
                    None => vm.activate(position.geolocator().as_deref()).await,
                }
                println!("{}", render::render(vm.state()));
                Ok(())
            }
            Command::Watch { position } => {
                let mut vm = view_model()?;
                vm.activate(position.geolocator().as_deref()).await;
                println!("{}", render::render(vm.state()));
                watch(&mut vm).await
            }
        }
    }
}

fn view_model() -> anyhow::Result<WeatherViewModel<OpenWeatherProvider>> {
    let cfg = Config::load()?;
    tracing::debug!(
        fallback = %cfg.fallback_location,
        base_url = %cfg.base_url,
        "Loaded configuration"
    );
    let provider = provider_from_config(&cfg);
    Ok(WeatherViewModel::new(provider, cfg.fallback_location))
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    cfg.set_api_key(api_key.trim().to_string());
    let path = cfg.save()?;

    println!("Saved API key to {}", path.display());
    Ok(())
}

async fn watch(vm: &mut WeatherViewModel<OpenWeatherProvider>) -> anyhow::Result<()> {
    let mut field = SearchField::new();

    loop {
        let line = match Text::new("Enter Location:").prompt() {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read location"),
        };
        if line.trim().is_empty() {
            break;
        }

        field.set_text(line);
        if vm.handle_key(&mut field, Key::Enter).await {
            println!("{}", render::render(vm.state()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["weatherview", "show", "--lat", "40.71", "--lon", "-74.0"])
            .unwrap();

        let Command::Show { place, position } = cli.command else {
            panic!("expected show");
        };
        assert_eq!(place, None);
        assert_eq!(position.lat, Some(40.71));
        assert_eq!(position.lon, Some(-74.0));
        assert!(position.geolocator().is_some());
    }

    #[test]
    fn latitude_requires_longitude() {
        assert!(Cli::try_parse_from(["weatherview", "show", "--lat", "40.71"]).is_err());
    }

    #[test]
    fn no_geolocate_means_no_capability() {
        let cli = Cli::try_parse_from(["weatherview", "watch", "--no-geolocate"]).unwrap();

        let Command::Watch { position } = cli.command else {
            panic!("expected watch");
        };
        assert!(position.geolocator().is_none());
    }

    #[test]
    fn no_geolocate_conflicts_with_coordinates() {
        let res = Cli::try_parse_from([
            "weatherview", "show", "--no-geolocate", "--lat", "1", "--lon", "2",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn place_conflicts_with_position_flags() {
        let with_coords =
            Cli::try_parse_from(["weatherview", "show", "Tokyo", "--lat", "1", "--lon", "2"]);
        assert!(with_coords.is_err());

        let without_geo = Cli::try_parse_from(["weatherview", "show", "Tokyo", "--no-geolocate"]);
        assert!(without_geo.is_err());
    }

    #[test]
    fn place_name_and_verbose_flag_parse() {
        let cli = Cli::try_parse_from(["weatherview", "-v", "show", "Tokyo"]).unwrap();

        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Show { place: Some(ref p), .. } if p == "Tokyo"));
    }
}
