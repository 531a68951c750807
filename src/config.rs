//! Static application configuration.
//!
//! Defaults come from the serde defaults below, then an optional
//! `city-wx.{toml,yaml,json}` file in the working directory, then
//! `CITY_WX_*` environment variables (e.g. `CITY_WX_API_KEY`).

use crate::error::ConfigError;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// OpenWeatherMap API key. Required.
    pub api_key: String,
    pub weather_url: String,
    pub forecast_url: String,
    pub air_quality_url: String,
    /// Icon URL with a `{code}` placeholder for the provider's icon code.
    pub icon_url_template: String,
    pub request_timeout_secs: u64,
    /// Maximum number of (code, size) icons kept in memory.
    pub icon_cache_capacity: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            weather_url: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            forecast_url: "https://api.openweathermap.org/data/2.5/forecast".to_string(),
            air_quality_url: "https://api.openweathermap.org/data/2.5/air_pollution".to_string(),
            icon_url_template: "https://openweathermap.org/img/wn/{code}@2x.png".to_string(),
            request_timeout_secs: 10,
            icon_cache_capacity: 64,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(config::Environment::with_prefix("CITY_WX"))
    }

    /// Values stay strings until serde asks for a number, so an all-digit
    /// API key survives unchanged.
    fn load_with(environment: config::Environment) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("city-wx").required(false))
            .add_source(environment)
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Checks everything that must hold before the first request goes out.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingSetting("api_key"));
        }

        for (field, value) in [
            ("weather_url", &self.weather_url),
            ("forecast_url", &self.forecast_url),
            ("air_quality_url", &self.air_quality_url),
        ] {
            if Url::parse(value).is_err() {
                return Err(ConfigError::InvalidUrl {
                    field,
                    value: value.clone(),
                });
            }
        }

        if !self.icon_url_template.contains("{code}") {
            return Err(ConfigError::InvalidUrl {
                field: "icon_url_template",
                value: self.icon_url_template.clone(),
            });
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
