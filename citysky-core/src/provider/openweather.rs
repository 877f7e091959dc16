use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

use crate::{
    config::Endpoints,
    error::LookupError,
    model::{Suggestion, WeatherQuery, WeatherResult},
};

use super::WeatherService;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoints: Endpoints,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn with_endpoints(api_key: String, endpoints: Endpoints) -> Self {
        Self {
            api_key,
            endpoints,
            http: Client::new(),
        }
    }

    /// Send a request and read the body, mapping non-success statuses to
    /// `LookupError::Service` with the message OpenWeather puts in the body.
    async fn fetch(&self, request: RequestBuilder) -> Result<String, LookupError> {
        let res = request.send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            tracing::debug!(%status, body = %truncate_body(&body), "OpenWeather request failed");
            let message = serde_json::from_str::<OwError>(&body)
                .ok()
                .and_then(|e| e.message);
            return Err(LookupError::Service { status, message });
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct OwError {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwPlace {
    name: String,
    country: String,
    state: Option<String>,
    lat: f64,
    lon: f64,
}

impl From<OwPlace> for Suggestion {
    fn from(p: OwPlace) -> Self {
        Suggestion {
            name: p.name,
            country: p.country,
            state: p.state,
            lat: p.lat,
            lon: p.lon,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    sys: OwSys,
}

impl TryFrom<OwCurrentResponse> for WeatherResult {
    type Error = LookupError;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self, Self::Error> {
        let condition = parsed.weather.into_iter().next().ok_or_else(|| {
            LookupError::Parse("OpenWeather response contained no condition entries".into())
        })?;

        Ok(WeatherResult {
            name: parsed.name,
            condition: condition.main,
            icon: condition.icon,
            description: condition.description,
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            sunrise: unix_to_utc(parsed.sys.sunrise)?,
            sunset: unix_to_utc(parsed.sys.sunset)?,
        })
    }
}

#[async_trait]
impl WeatherService for OpenWeatherProvider {
    async fn suggest(&self, query: &str, limit: usize) -> Result<Vec<Suggestion>, LookupError> {
        tracing::debug!(query, limit, "Requesting place suggestions");

        let request = self.http.get(&self.endpoints.geocoding_url).query(&[
            ("q", query),
            ("limit", &limit.to_string()),
            ("appid", self.api_key.as_str()),
        ]);

        let body = self.fetch(request).await?;
        let places: Vec<OwPlace> = serde_json::from_str(&body)
            .map_err(|e| LookupError::Parse(format!("geocoding JSON: {e}")))?;

        Ok(places.into_iter().take(limit).map(Suggestion::from).collect())
    }

    async fn current_weather(&self, query: &WeatherQuery) -> Result<WeatherResult, LookupError> {
        tracing::debug!(?query, "Requesting current weather");

        let request = self.http.get(&self.endpoints.weather_url);
        let request = match query {
            WeatherQuery::ByName(name) => request.query(&[("q", name.as_str())]),
            WeatherQuery::ByCoords { lat, lon, .. } => {
                request.query(&[("lat", lat.to_string()), ("lon", lon.to_string())])
            }
        };
        let request = request.query(&[("appid", self.api_key.as_str()), ("units", "metric")]);

        let body = self.fetch(request).await?;
        let parsed: OwCurrentResponse = serde_json::from_str(&body)
            .map_err(|e| LookupError::Parse(format!("current weather JSON: {e}")))?;

        WeatherResult::try_from(parsed)
    }
}

fn unix_to_utc(ts: i64) -> Result<DateTime<Utc>, LookupError> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| LookupError::Parse(format!("timestamp out of range: {ts}")))
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
