//! Core library for the weather widget.
//!
//! This crate defines:
//! - Configuration handling
//! - The OpenWeather provider and device geolocation sources
//! - The widget itself: query state, search, location bootstrap, rendering
//!
//! It is used by `weather-widget` (the `weather` binary), but any front-end
//! that can drive a tokio runtime can host the widget.

pub mod config;
pub mod geolocation;
pub mod model;
pub mod provider;
pub mod render;
pub mod view;
pub mod widget;

pub use config::{Config, GeolocationConfig};
pub use geolocation::{Geolocator, LocationError};
pub use model::{Coordinates, Query, WeatherSnapshot};
pub use provider::{FetchError, WeatherProvider};
pub use render::{DetailView, Rendered, render};
pub use view::{ViewError, ViewState};
pub use widget::WeatherWidget;
