use std::fmt;

use crate::{
    model::{WeatherSnapshot, whole_degrees},
    view::{ViewError, ViewState},
};

pub const NOT_FOUND_MESSAGE: &str = "City not found!";
pub const SERVER_ERROR_MESSAGE: &str = "Internal server error!";

/// Display-ready strings for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub icon_url: String,
    pub description: String,
    pub temperature: String,
    pub feels_like: String,
    pub location: String,
    pub maximum: String,
    pub minimum: String,
    pub humidity: String,
    pub wind_speed: String,
    /// Observation time as "HH:MM UTC", when the API reported one.
    pub updated: Option<String>,
}

impl From<&WeatherSnapshot> for DetailView {
    fn from(s: &WeatherSnapshot) -> Self {
        Self {
            icon_url: s.icon_url(),
            description: s.description.clone(),
            temperature: degrees(s.temperature_c),
            feels_like: degrees(s.feels_like_c),
            location: s.location_name.clone(),
            maximum: degrees(s.temp_max_c),
            minimum: degrees(s.temp_min_c),
            humidity: format!("{}%", s.humidity_pct),
            wind_speed: format!("{}km/h", s.wind_speed_kmh()),
            updated: s.observed_at.map(|t| t.format("%H:%M UTC").to_string()),
        }
    }
}

fn degrees(celsius: f64) -> String {
    format!("{}°C", whole_degrees(celsius))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Detail(DetailView),
    Message(&'static str),
    /// Nothing below the search box. `LocationUnavailable` lands here too,
    /// since it has no message of its own.
    Nothing,
}

pub fn render(state: &ViewState) -> Rendered {
    match state {
        ViewState::Ready(snapshot) => Rendered::Detail(DetailView::from(snapshot)),
        ViewState::Failed {
            error: ViewError::NotFound,
            ..
        } => Rendered::Message(NOT_FOUND_MESSAGE),
        ViewState::Failed {
            error: ViewError::ServerError,
            ..
        } => Rendered::Message(SERVER_ERROR_MESSAGE),
        ViewState::Failed {
            error: ViewError::LocationUnavailable,
            ..
        }
        | ViewState::Empty => Rendered::Nothing,
    }
}

impl fmt::Display for DetailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.icon_url)?;
        writeln!(f, "{}", self.description)?;
        writeln!(f, "{}", self.temperature)?;
        writeln!(f, "Feels like {}", self.feels_like)?;
        writeln!(f, "{}", self.location)?;
        if let Some(updated) = &self.updated {
            writeln!(f, "Updated {updated}")?;
        }
        writeln!(f)?;
        writeln!(f, "{:<12}{}", "Maximum", self.maximum)?;
        writeln!(f, "{:<12}{}", "Minimum", self.minimum)?;
        writeln!(f, "{:<12}{}", "Humidity", self.humidity)?;
        write!(f, "{:<12}{}", "Wind Speed", self.wind_speed)
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rendered::Detail(detail) => write!(f, "{detail}"),
            Rendered::Message(message) => f.write_str(message),
            Rendered::Nothing => Ok(()),
        }
    }
}
