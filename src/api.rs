//! OpenWeatherMap current-weather client

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{looks_offline, QueryError};
use crate::state::WeatherResult;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_ICON_HOST: &str = "https://openweathermap.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    name: String,
    #[serde(default)]
    sys: Sys,
    main: Main,
    #[serde(default)]
    wind: Wind,
    weather: Vec<Condition>,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Default, Deserialize)]
struct Sys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Main {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Default, Deserialize)]
struct Wind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    main: String,
    description: String,
    icon: String,
}

/// Capitalize the first letter of every space-separated word.
pub fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl TryFrom<CurrentWeatherResponse> for WeatherResult {
    type Error = QueryError;

    fn try_from(response: CurrentWeatherResponse) -> Result<Self, Self::Error> {
        let condition = response
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| QueryError::Unknown("response has no weather condition".into()))?;

        Ok(WeatherResult {
            name: response.name,
            country: response.sys.country.unwrap_or_default(),
            temperature: response.main.temp,
            humidity: response.main.humidity,
            wind_speed: response.wind.speed,
            condition: condition.main,
            description: capitalize_words(&condition.description),
            icon: condition.icon,
            utc_offset_secs: response.timezone,
        })
    }
}

// ============================================================================
// Client
// ============================================================================

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    config: ClientConfig,
}

/// Sort a transport-level failure into the query error taxonomy.
fn classify(error: reqwest::Error) -> QueryError {
    if error.is_timeout() {
        QueryError::Timeout
    } else if error.is_connect() || looks_offline(&error) {
        QueryError::Transport(error.to_string())
    } else {
        QueryError::Unknown(error.to_string())
    }
}

impl WeatherClient {
    pub fn new(config: ClientConfig) -> Result<Self, QueryError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| QueryError::Unknown(e.to_string()))?;
        Ok(Self { http, config })
    }

    fn current_weather_url(&self, city: &str) -> String {
        format!(
            "{}/data/2.5/weather?q={}&appid={}&units=metric",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(city),
            urlencoding::encode(&self.config.api_key)
        )
    }

    /// Fetch current conditions for a city name.
    ///
    /// Any non-success status is reported as [`QueryError::NotFound`].
    pub async fn current_weather(&self, city: &str) -> Result<WeatherResult, QueryError> {
        debug!(city, "querying current weather");

        let response = self
            .http
            .get(self.current_weather_url(city))
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            warn!(city, %status, "weather query rejected");
            return Err(QueryError::NotFound);
        }

        let data: CurrentWeatherResponse = response.json().await.map_err(classify)?;
        WeatherResult::try_from(data)
    }
}
