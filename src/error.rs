//! Error types for the weather client, the icon cache and configuration.
//!
//! Errors that travel inside iced messages are `Clone`, so they carry
//! rendered strings rather than the underlying `reqwest` errors.

use thiserror::Error;

/// Failure of the current-weather lookup.
///
/// A city the provider does not know is not an error; see
/// [`SearchOutcome::NotFound`](crate::weather::SearchOutcome::NotFound).
#[derive(Debug, Clone, Error)]
pub enum WeatherError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl WeatherError {
    /// Text shown in the error dialog.
    pub fn dialog_message(&self) -> String {
        format!("Failed to fetch weather data: {}", self)
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WeatherError::Timeout
        } else if err.is_connect() {
            WeatherError::ConnectionFailed(err.to_string())
        } else if err.is_decode() {
            WeatherError::ParseError(err.to_string())
        } else {
            WeatherError::RequestFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::ParseError(err.to_string())
    }
}

/// Failure to produce an icon bitmap.
#[derive(Debug, Clone, Error)]
pub enum IconError {
    #[error("icon request failed: {0}")]
    Request(String),

    #[error("icon server answered {0}")]
    Status(u16),

    #[error("icon decode failed: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for IconError {
    fn from(err: reqwest::Error) -> Self {
        IconError::Request(err.to_string())
    }
}

impl From<image::ImageError> for IconError {
    fn from(err: image::ImageError) -> Self {
        IconError::Decode(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    MissingSetting(&'static str),

    #[error("Invalid URL for {field}: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("Configuration could not be loaded: {0}")]
    Load(#[from] config::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialog_message_wraps_error_text() {
        let err = WeatherError::ConnectionFailed("dns error".into());
        assert_eq!(
            err.dialog_message(),
            "Failed to fetch weather data: Connection failed: dns error"
        );
    }

    #[test]
    fn timeout_has_fixed_text() {
        assert_eq!(WeatherError::Timeout.to_string(), "Request timed out");
    }

    #[test]
    fn json_errors_become_parse_errors() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(WeatherError::from(err), WeatherError::ParseError(_)));
    }
}
