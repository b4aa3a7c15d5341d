use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use inquire::{CustomType, InquireError, Password, PasswordDisplayMode, Select, Text};
use tracing::debug;
use weather_widget_core::{Config, Coordinates, GeolocationConfig, Rendered, WeatherWidget};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather",
    version,
    about = "Current weather for a city or your location"
)]
pub struct Cli {
    #[command(flatten)]
    pub overrides: Overrides,

    /// Defaults to `interactive`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Per-run overrides for values normally read from the config file.
#[derive(Debug, Args)]
pub struct Overrides {
    /// OpenWeather API key.
    #[arg(
        long,
        global = true,
        env = "OPENWEATHER_API_KEY",
        hide_env_values = true
    )]
    pub api_key: Option<String>,

    /// Current-weather endpoint, e.g. https://api.openweathermap.org/data/2.5/weather.
    #[arg(long, global = true, env = "OPENWEATHER_BASE_URL")]
    pub base_url: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set the API key, endpoint, default city and location source.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name; the configured default city if absent.
        city: Option<String>,
    },

    /// Show weather for the current location.
    Locate {
        /// Use this latitude instead of the configured location source.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Use this longitude instead of the configured location source.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },

    /// Locate on start, then prompt for cities until Esc or Ctrl-C.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => configure(),
            Command::Show { city } => {
                let config = self.overrides.apply(Config::load()?);
                let widget = WeatherWidget::from_config(&config)?;
                if let Some(city) = city {
                    widget.set_query(city);
                }
                widget.search().await;
                print_rendered(&widget.render());
                Ok(())
            }
            Command::Locate { lat, lon } => {
                let mut config = self.overrides.apply(Config::load()?);
                if let (Some(latitude), Some(longitude)) = (lat, lon) {
                    let coords = Coordinates::new(latitude, longitude);
                    config.geolocation = GeolocationConfig::fixed(coords);
                }
                let widget = WeatherWidget::from_config(&config)?;
                widget.bootstrap().await;
                print_rendered(&widget.render());
                Ok(())
            }
            Command::Interactive => {
                let config = self.overrides.apply(Config::load()?);
                interactive(WeatherWidget::from_config(&config)?).await
            }
        }
    }
}

impl Overrides {
    fn apply(self, mut config: Config) -> Config {
        if let Some(api_key) = self.api_key {
            config.api_key = Some(api_key);
        }
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        config
    }
}

fn print_rendered(rendered: &Rendered) {
    if *rendered != Rendered::Nothing {
        println!("{rendered}\n");
    }
}

async fn interactive(widget: WeatherWidget) -> Result<()> {
    if let Some(bootstrap) = widget.mount() {
        bootstrap.await.context("Location bootstrap task failed")?;
    }
    print_rendered(&widget.render());

    loop {
        let current = widget.query();
        let input = tokio::task::spawn_blocking(move || {
            Text::new("City:")
                .with_placeholder("Enter city name")
                .with_initial_value(&current)
                .prompt()
        })
        .await
        .context("Prompt task failed")?;

        match input {
            Ok(city) => {
                widget.set_query(city);
                widget.search().await;
                print_rendered(&widget.render());
            }
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                debug!("prompt closed, leaving interactive mode");
                return Ok(());
            }
            Err(err) => return Err(err).context("Failed to read city name"),
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let base_url = Text::new("Current-weather endpoint:")
        .with_default(&config.base_url)
        .prompt()?;
    let default_city = Text::new("Default city:")
        .with_default(&config.default_city)
        .prompt()?;
    config.base_url = base_url;
    config.default_city = default_city;

    let sources = vec!["ip", "fixed", "off"];
    let source = Select::new("Location source:", sources).prompt()?;
    config.geolocation = match source {
        "fixed" => {
            let latitude = CustomType::<f64>::new("Latitude:").prompt()?;
            let longitude = CustomType::<f64>::new("Longitude:").prompt()?;
            GeolocationConfig::fixed(Coordinates::new(latitude, longitude))
        }
        "off" => GeolocationConfig::Off,
        _ => GeolocationConfig::Ip { endpoint: None },
    };

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}
