use chrono::{DateTime, Utc};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// What a weather lookup is keyed by. Exactly one form is active per request.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Free-text place name, forwarded to the API without validation.
    Place(String),
    Coordinates(Coordinates),
}

impl Query {
    pub fn place(name: impl Into<String>) -> Self {
        Query::Place(name.into())
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Query::Place(name) => write!(f, "place {name:?}"),
            Query::Coordinates(c) => write!(f, "lat={} lon={}", c.latitude, c.longitude),
        }
    }
}

/// Current conditions for one place, in metric units.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub description: String,
    pub icon: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub observed_at: Option<DateTime<Utc>>,
}

impl WeatherSnapshot {
    /// Wind speed in km/h, truncated toward zero.
    pub fn wind_speed_kmh(&self) -> i64 {
        (self.wind_speed_mps * 3.6).trunc() as i64
    }

    pub fn icon_url(&self) -> String {
        format!("{ICON_BASE_URL}/{}@2x.png", self.icon)
    }
}

/// Whole degrees as shown to the user (floor, so -0.5 shows as -1).
pub fn whole_degrees(celsius: f64) -> i64 {
    celsius.floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(wind_speed_mps: f64) -> WeatherSnapshot {
        WeatherSnapshot {
            location_name: "Kolkata".into(),
            description: "clear sky".into(),
            icon: "01d".into(),
            temperature_c: 30.7,
            feels_like_c: 33.2,
            temp_min_c: 29.0,
            temp_max_c: 31.0,
            humidity_pct: 60,
            wind_speed_mps,
            observed_at: None,
        }
    }

    #[test]
    fn wind_speed_is_converted_and_truncated() {
        assert_eq!(snapshot(2.5).wind_speed_kmh(), 9);
        assert_eq!(snapshot(1.0).wind_speed_kmh(), 3);
        assert_eq!(snapshot(0.0).wind_speed_kmh(), 0);
    }

    #[test]
    fn icon_url_uses_double_resolution_asset() {
        assert_eq!(
            snapshot(1.0).icon_url(),
            "https://openweathermap.org/img/wn/01d@2x.png"
        );
    }

    #[test]
    fn whole_degrees_floors() {
        assert_eq!(whole_degrees(30.7), 30);
        assert_eq!(whole_degrees(31.0), 31);
        assert_eq!(whole_degrees(-0.5), -1);
    }

    #[test]
    fn query_display() {
        assert_eq!(Query::place("kolkata").to_string(), "place \"kolkata\"");
        let q = Query::Coordinates(Coordinates::new(22.5, 88.25));
        assert_eq!(q.to_string(), "lat=22.5 lon=88.25");
    }
}
