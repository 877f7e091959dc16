use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A candidate place returned by the geocoding service for a partial query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub country: String,
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl Suggestion {
    /// Human-readable label, e.g. "Portland, US, Oregon".
    ///
    /// This is also the query text shown once a coordinate lookup succeeds.
    pub fn label(&self) -> String {
        match self.state.as_deref() {
            Some(state) if !state.is_empty() => {
                format!("{}, {}, {}", self.name, self.country, state)
            }
            _ => format!("{}, {}", self.name, self.country),
        }
    }
}

/// What to look the current weather up by.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    ByName(String),
    ByCoords { lat: f64, lon: f64, label: String },
}

impl WeatherQuery {
    /// Label that replaces the query text on success, if the caller supplied one.
    pub fn label(&self) -> Option<&str> {
        match self {
            WeatherQuery::ByName(_) => None,
            WeatherQuery::ByCoords { label, .. } => Some(label),
        }
    }
}

impl From<&Suggestion> for WeatherQuery {
    fn from(s: &Suggestion) -> Self {
        WeatherQuery::ByCoords { lat: s.lat, lon: s.lon, label: s.label() }
    }
}

/// Current conditions for a single place. Replaced wholesale on every search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub name: String,
    /// Primary condition label, e.g. "Clouds".
    pub condition: String,
    pub icon: String,
    pub description: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

impl WeatherResult {
    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{}@2x.png", self.icon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn toggle(self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "C",
            TemperatureUnit::Fahrenheit => "F",
        }
    }

    /// Convert a Celsius reading into this unit.
    pub fn convert(&self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "°{}", self.symbol())
    }
}

impl TryFrom<&str> for TemperatureUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "c" | "celsius" => Ok(TemperatureUnit::Celsius),
            "f" | "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown temperature unit '{value}'. Supported units: celsius (c), fahrenheit (f)."
            )),
        }
    }
}
