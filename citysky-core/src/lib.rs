//! Core library for the `citysky` weather lookup.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather geocoding / current-weather client behind a service trait
//! - The view state, its transitions and the effects they request
//! - A session event loop that runs debounce timers and lookups on tokio
//!
//! It is used by `citysky-cli`, but the session can drive any front end that
//! can dispatch actions and render a [`ViewState`].

pub mod config;
pub mod debounce;
pub mod display;
pub mod error;
pub mod model;
pub mod provider;
pub mod session;
pub mod state;

pub use config::{Config, Endpoints, InputSettings};
pub use display::{BackgroundCondition, BackgroundTheme, format_temperature};
pub use error::LookupError;
pub use model::{Suggestion, TemperatureUnit, WeatherQuery, WeatherResult};
pub use provider::{WeatherService, provider_from_config};
pub use session::{Session, SessionClosed};
pub use state::{Action, Effect, ViewState};
