use crate::{model::WeatherSnapshot, provider::FetchError};

/// User-visible failure states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewError {
    /// The place name did not resolve (HTTP 404).
    NotFound,
    /// Any other upstream failure.
    ServerError,
    /// No position source, denied permission, or a failed coordinate fetch.
    LocationUnavailable,
}

impl ViewError {
    /// Classification for the search path. Failures without a status
    /// (transport, decode) count as server errors.
    pub fn from_fetch_error(err: &FetchError) -> Self {
        match err.status() {
            Some(404) => ViewError::NotFound,
            _ => ViewError::ServerError,
        }
    }
}

/// What the widget currently presents. Snapshot and error never coexist.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Empty,
    Ready(WeatherSnapshot),
    Failed {
        error: ViewError,
        /// Raw HTTP status behind `error`, if there was one.
        status: Option<u16>,
    },
}

impl ViewState {
    pub fn failed(error: ViewError) -> Self {
        ViewState::Failed {
            error,
            status: None,
        }
    }

    pub fn from_fetch_error(err: &FetchError) -> Self {
        ViewState::Failed {
            error: ViewError::from_fetch_error(err),
            status: err.status(),
        }
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match self {
            ViewState::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<ViewError> {
        match self {
            ViewState::Failed { error, .. } => Some(*error),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ViewState::Failed { status, .. } => *status,
            _ => None,
        }
    }
}
