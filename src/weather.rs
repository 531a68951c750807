use crate::config::AppConfig;
use crate::error::WeatherError;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

// Wire payloads. Only the fields the UI consumes are modelled.

/// The provider reports `cod` as a number on some endpoints and as a string
/// on others (`200` vs `"200"`, `"404"`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ResponseCode {
    Number(i64),
    Text(String),
}

impl ResponseCode {
    pub fn as_u16(&self) -> Option<u16> {
        match self {
            ResponseCode::Number(n) => u16::try_from(*n).ok(),
            ResponseCode::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.as_u16() == Some(200)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct StatusEnvelope {
    cod: Option<ResponseCode>,
    message: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionSummary {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    pub humidity: f64,
    pub pressure: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeatherResponse {
    pub cod: Option<ResponseCode>,
    #[serde(default)]
    pub name: String,
    pub coord: Coordinates,
    /// Shift from UTC in seconds.
    #[serde(default)]
    pub timezone: i32,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<ConditionSummary>,
    pub wind: Wind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirQualityIndex {
    pub aqi: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirQualityEntry {
    pub main: AirQualityIndex,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirQualityResponse {
    pub cod: Option<ResponseCode>,
    #[serde(default)]
    pub list: Vec<AirQualityEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SampleReadings {
    pub temp: f64,
}

/// One 3-hour forecast sample.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastSample {
    pub dt: i64,
    pub main: SampleReadings,
    #[serde(default)]
    pub weather: Vec<ConditionSummary>,
}

impl ForecastSample {
    pub fn condition(&self) -> Option<&ConditionSummary> {
        self.weather.first()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    pub cod: Option<ResponseCode>,
    #[serde(default)]
    pub list: Vec<ForecastSample>,
}

impl ForecastResponse {
    pub fn is_available(&self) -> bool {
        self.cod.as_ref().is_some_and(ResponseCode::is_ok)
    }
}

/// Decoded payloads of one successful search.
#[derive(Debug, Clone)]
pub struct WeatherPayloads {
    pub current: CurrentWeatherResponse,
    pub air_quality: Option<AirQualityResponse>,
    pub forecast: Option<ForecastResponse>,
}

#[derive(Debug, Clone)]
pub enum SearchOutcome {
    Found(Box<WeatherPayloads>),
    /// The provider answered, but with a non-200 `cod` (unknown city,
    /// rejected key, ...).
    NotFound { code: u16, message: String },
}

// Domain types

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub location: String,
    pub utc_offset_secs: i32,
    pub temperature: f64,
    pub description: String,
    pub icon: Option<String>,
    pub humidity: f64,
    pub wind_speed: f64,
    pub pressure: f64,
}

impl CurrentWeatherResponse {
    pub fn conditions(&self) -> CurrentConditions {
        let summary = self.weather.first();
        CurrentConditions {
            location: self.name.clone(),
            utc_offset_secs: self.timezone,
            temperature: self.main.temp,
            description: summary.map(|w| w.description.clone()).unwrap_or_default(),
            icon: summary
                .map(|w| w.icon.clone())
                .filter(|icon| !icon.is_empty()),
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
            pressure: self.main.pressure,
        }
    }
}

impl CurrentConditions {
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_secs).unwrap_or_else(|| Utc.fix())
    }

    /// The location's wall clock at `now`.
    pub fn local_time(&self, now: DateTime<Utc>) -> DateTime<FixedOffset> {
        now.with_timezone(&self.utc_offset())
    }

    pub fn local_time_label(&self, now: DateTime<Utc>) -> String {
        self.local_time(now).format("%I:%M %p").to_string()
    }

    pub fn temperature_label(&self) -> String {
        format_temperature(self.temperature)
    }

    pub fn description_label(&self) -> String {
        title_case(&self.description)
    }

    pub fn humidity_label(&self) -> String {
        format!("Humidity: {}%", self.humidity)
    }

    pub fn wind_label(&self) -> String {
        format!("Wind: {} m/s", self.wind_speed)
    }

    pub fn pressure_label(&self) -> String {
        format!("Pressure: {} hPa", self.pressure)
    }
}

/// Provider air quality bucket, 1 (good) to 5 (very poor).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AqiLevel {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
    Unknown,
}

impl AqiLevel {
    pub fn from_index(index: i64) -> Self {
        match index {
            1 => AqiLevel::Good,
            2 => AqiLevel::Fair,
            3 => AqiLevel::Moderate,
            4 => AqiLevel::Poor,
            5 => AqiLevel::VeryPoor,
            _ => AqiLevel::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Fair => "Fair",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::Poor => "Poor",
            AqiLevel::VeryPoor => "Very Poor",
            AqiLevel::Unknown => "Unknown",
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            AqiLevel::Good => (0x4C, 0xAF, 0x50),
            AqiLevel::Fair => (0xFD, 0xD8, 0x35),
            AqiLevel::Moderate => (0xFF, 0x98, 0x00),
            AqiLevel::Poor => (0xF4, 0x43, 0x36),
            AqiLevel::VeryPoor => (0x9C, 0x27, 0xB0),
            AqiLevel::Unknown => (0x80, 0x80, 0x80),
        }
    }
}

impl AirQualityResponse {
    /// `None` when the provider has no reading for the coordinates.
    pub fn level(&self) -> Option<AqiLevel> {
        if self.cod.as_ref().and_then(ResponseCode::as_u16) == Some(404) {
            return None;
        }
        self.list
            .first()
            .map(|entry| AqiLevel::from_index(entry.main.aqi))
    }
}

// Display helpers

/// Rounds half to even (2.5 -> 2, 3.5 -> 4).
pub fn round_temperature(celsius: f64) -> i64 {
    celsius.round_ties_even() as i64
}

pub fn format_temperature(celsius: f64) -> String {
    format!("{}°C", round_temperature(celsius))
}

/// Upper-cases the first letter of every word, lower-cases the rest.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut previous_is_letter = false;
    for ch in input.chars() {
        if previous_is_letter {
            out.extend(ch.to_lowercase());
        } else {
            out.extend(ch.to_uppercase());
        }
        previous_is_letter = ch.is_alphabetic();
    }
    out
}

// Client

/// Issues the three lookups behind one search.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    api_key: String,
    weather_url: String,
    forecast_url: String,
    air_quality_url: String,
}

impl WeatherClient {
    pub fn new(config: &AppConfig) -> Result<Self, WeatherError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            weather_url: config.weather_url.clone(),
            forecast_url: config.forecast_url.clone(),
            air_quality_url: config.air_quality_url.clone(),
        })
    }

    /// Current weather, then air quality at its coordinates, then the
    /// forecast. Only the first call can fail the search; the other two
    /// degrade to `None`.
    #[instrument(skip(self))]
    pub async fn fetch(&self, city: &str) -> Result<SearchOutcome, WeatherError> {
        info!("Fetching weather");

        let current = match self.fetch_current(city).await? {
            Ok(current) => current,
            Err((code, message)) => {
                info!(code, %message, "Provider did not resolve city");
                return Ok(SearchOutcome::NotFound { code, message });
            }
        };

        let air_quality = self.fetch_air_quality(current.coord).await;
        let forecast = self.fetch_forecast(city).await;

        Ok(SearchOutcome::Found(Box::new(WeatherPayloads {
            current,
            air_quality,
            forecast,
        })))
    }

    async fn fetch_current(
        &self,
        city: &str,
    ) -> Result<Result<CurrentWeatherResponse, (u16, String)>, WeatherError> {
        debug!(url = %self.weather_url, "Requesting current weather");
        let response = self
            .http
            .get(&self.weather_url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(%status, "Got current weather response");

        let envelope: StatusEnvelope = serde_json::from_str(&body)?;
        let code = envelope
            .cod
            .as_ref()
            .and_then(ResponseCode::as_u16)
            .unwrap_or_else(|| status.as_u16());
        if code != 200 {
            return Ok(Err((code, envelope.message.unwrap_or_default())));
        }

        Ok(Ok(serde_json::from_str(&body)?))
    }

    async fn fetch_air_quality(&self, coord: Coordinates) -> Option<AirQualityResponse> {
        let query = [
            ("lat", coord.lat.to_string()),
            ("lon", coord.lon.to_string()),
            ("appid", self.api_key.clone()),
        ];
        match self.get_json(&self.air_quality_url, &query).await {
            Ok(payload) => Some(payload),
            Err(err) => {
                warn!(error = %err, "Air quality unavailable");
                None
            }
        }
    }

    async fn fetch_forecast(&self, city: &str) -> Option<ForecastResponse> {
        let query = [
            ("q", city.to_string()),
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
        ];
        match self.get_json(&self.forecast_url, &query).await {
            Ok(payload) => Some(payload),
            Err(err) => {
                warn!(error = %err, "Forecast unavailable");
                None
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        debug!(%url, "Requesting");
        let body = self.http.get(url).query(query).send().await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
