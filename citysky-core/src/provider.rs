use crate::{
    Config, LookupError, Suggestion, WeatherQuery, WeatherResult,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// The two read-only lookups the widget needs from a weather backend.
#[async_trait]
pub trait WeatherService: Send + Sync + Debug {
    /// Candidate places for a partial query, at most `limit` of them.
    async fn suggest(&self, query: &str, limit: usize) -> Result<Vec<Suggestion>, LookupError>;

    async fn current_weather(&self, query: &WeatherQuery) -> Result<WeatherResult, LookupError>;
}

/// Construct the OpenWeather-backed service from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherService>> {
    let api_key = config.api_key()?;
    let provider = OpenWeatherProvider::with_endpoints(api_key, config.endpoints.clone());
    Ok(Arc::new(provider))
}
