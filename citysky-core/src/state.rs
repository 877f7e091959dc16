//! The view state and its transitions.
//!
//! All mutation goes through [`ViewState::apply`], one [`Action`] at a time.
//! Side effects (timers, network calls) are not performed here; they are
//! returned as [`Effect`]s for the session loop to carry out, and their
//! completions come back as further actions.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::{
    config::InputSettings,
    display::{BackgroundCondition, format_temperature},
    error::LookupError,
    model::{Suggestion, TemperatureUnit, WeatherQuery, WeatherResult},
};

/// Everything that can happen to the widget.
#[derive(Debug)]
pub enum Action {
    /// The user edited the query text.
    QueryChanged(String),
    /// The query input lost focus.
    InputBlurred,
    /// The debounce timer started with `ticket` ran out.
    DebounceElapsed { ticket: u64 },
    /// The post-blur delay ran out.
    BlurElapsed,
    SuggestionsLoaded {
        generation: u64,
        result: Result<Vec<Suggestion>, LookupError>,
    },
    Submit,
    /// The user picked the suggestion at this index.
    SelectSuggestion(usize),
    WeatherLoaded {
        generation: u64,
        result: Result<WeatherResult, LookupError>,
    },
    ToggleUnit,
    NewSearch,
}

/// Work requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// (Re)start the debounce timer; any running one is cancelled first.
    StartDebounce { ticket: u64, delay: Duration },
    CancelDebounce,
    /// Clear suggestions after `delay`. The delay leaves room for a click on
    /// a suggestion to land before the list disappears; it is a UI
    /// tolerance, not an ordering guarantee.
    ScheduleSuggestionClear { delay: Duration },
    FetchSuggestions { generation: u64, query: String, limit: usize },
    FetchWeather { generation: u64, query: WeatherQuery },
}

#[derive(Debug, Clone, PartialEq)]
struct PendingWeather {
    generation: u64,
    label: Option<String>,
}

/// The complete set of values needed to render the widget.
///
/// `weather` and `error` are never both set. Completions that were
/// superseded by a newer request of the same kind are discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    query: String,
    weather: Option<WeatherResult>,
    suggestions: Vec<Suggestion>,
    unit: TemperatureUnit,
    error: Option<String>,

    debounce_ticket: u64,
    debounce_pending: bool,
    blur_pending: bool,
    suggestion_generation: u64,
    suggestions_pending: bool,
    weather_generation: u64,
    pending_weather: Option<PendingWeather>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(TemperatureUnit::default())
    }
}

impl ViewState {
    pub fn new(unit: TemperatureUnit) -> Self {
        Self {
            query: String::new(),
            weather: None,
            suggestions: Vec::new(),
            unit,
            error: None,
            debounce_ticket: 0,
            debounce_pending: false,
            blur_pending: false,
            suggestion_generation: 0,
            suggestions_pending: false,
            weather_generation: 0,
            pending_weather: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn weather(&self) -> Option<&WeatherResult> {
        self.weather.as_ref()
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// A weather lookup is in flight; the view shows a neutral state.
    pub fn is_loading(&self) -> bool {
        self.pending_weather.is_some()
    }

    /// Anything still outstanding: the debounce or blur timer, a suggestion
    /// lookup or a weather lookup.
    pub fn is_busy(&self) -> bool {
        self.debounce_pending || self.blur_pending || self.suggestions_pending || self.is_loading()
    }

    pub fn background_at(&self, now: DateTime<Utc>) -> Option<BackgroundCondition> {
        self.weather.as_ref().map(|w| BackgroundCondition::derive(w, now))
    }

    pub fn background(&self) -> Option<BackgroundCondition> {
        self.background_at(Utc::now())
    }

    /// Format a Celsius reading in the active unit.
    pub fn temperature(&self, celsius: f64) -> String {
        format_temperature(celsius, self.unit)
    }

    pub fn apply(&mut self, action: Action, settings: &InputSettings) -> Vec<Effect> {
        match action {
            Action::QueryChanged(text) => self.on_query_changed(text, settings),
            Action::InputBlurred => {
                self.blur_pending = true;
                vec![Effect::ScheduleSuggestionClear { delay: settings.blur_clear_delay() }]
            }
            Action::DebounceElapsed { ticket } => self.on_debounce_elapsed(ticket, settings),
            Action::BlurElapsed => {
                self.blur_pending = false;
                self.clear_suggestions();
                Vec::new()
            }
            Action::SuggestionsLoaded { generation, result } => {
                self.on_suggestions_loaded(generation, result);
                Vec::new()
            }
            Action::Submit => self.on_submit(),
            Action::SelectSuggestion(index) => self.on_select(index),
            Action::WeatherLoaded { generation, result } => self.on_weather_loaded(generation, result),
            Action::ToggleUnit => {
                self.unit = self.unit.toggle();
                Vec::new()
            }
            Action::NewSearch => self.on_new_search(),
        }
    }

    fn on_query_changed(&mut self, text: String, settings: &InputSettings) -> Vec<Effect> {
        self.query = text;
        self.debounce_ticket += 1;

        if self.query.trim().chars().count() < settings.min_query_len {
            self.debounce_pending = false;
            self.clear_suggestions();
            return vec![Effect::CancelDebounce];
        }

        self.debounce_pending = true;
        vec![Effect::StartDebounce {
            ticket: self.debounce_ticket,
            delay: settings.debounce_delay(),
        }]
    }

    fn on_debounce_elapsed(&mut self, ticket: u64, settings: &InputSettings) -> Vec<Effect> {
        if ticket != self.debounce_ticket || !self.debounce_pending {
            tracing::debug!(ticket, current = self.debounce_ticket, "Ignoring stale debounce timer");
            return Vec::new();
        }
        self.debounce_pending = false;

        self.suggestion_generation += 1;
        self.suggestions_pending = true;
        vec![Effect::FetchSuggestions {
            generation: self.suggestion_generation,
            query: self.query.clone(),
            limit: settings.suggestion_limit,
        }]
    }

    fn on_suggestions_loaded(
        &mut self,
        generation: u64,
        result: Result<Vec<Suggestion>, LookupError>,
    ) {
        if generation != self.suggestion_generation || !self.suggestions_pending {
            tracing::debug!(generation, current = self.suggestion_generation, "Discarding superseded suggestions");
            return;
        }
        self.suggestions_pending = false;

        // Suggestion failures never reach the user; the list just empties.
        self.suggestions = match result {
            Ok(suggestions) => suggestions,
            Err(e) => {
                tracing::warn!(error = %e, query = %self.query, "Failed to fetch suggestions");
                Vec::new()
            }
        };
    }

    fn on_submit(&mut self) -> Vec<Effect> {
        let trimmed = self.query.trim();
        if trimmed.is_empty() {
            self.weather = None;
            self.error = Some(LookupError::EmptyQuery.user_message());
            return Vec::new();
        }

        let query = WeatherQuery::ByName(trimmed.to_string());
        self.debounce_ticket += 1;
        self.debounce_pending = false;

        let mut effects = vec![Effect::CancelDebounce];
        effects.push(self.begin_weather(query));
        effects
    }

    fn on_select(&mut self, index: usize) -> Vec<Effect> {
        let Some(suggestion) = self.suggestions.get(index) else {
            tracing::warn!(index, available = self.suggestions.len(), "Selected suggestion does not exist");
            return Vec::new();
        };

        let query = WeatherQuery::from(suggestion);
        vec![self.begin_weather(query)]
    }

    /// Clear the previous outcome and issue a new lookup, superseding any in flight.
    fn begin_weather(&mut self, query: WeatherQuery) -> Effect {
        self.error = None;
        self.weather = None;

        self.weather_generation += 1;
        self.pending_weather = Some(PendingWeather {
            generation: self.weather_generation,
            label: query.label().map(str::to_string),
        });

        Effect::FetchWeather { generation: self.weather_generation, query }
    }

    fn on_weather_loaded(
        &mut self,
        generation: u64,
        result: Result<WeatherResult, LookupError>,
    ) -> Vec<Effect> {
        let pending = match self.pending_weather.take() {
            Some(p) if p.generation == generation => p,
            other => {
                tracing::debug!(generation, current = self.weather_generation, "Discarding superseded weather result");
                self.pending_weather = other;
                return Vec::new();
            }
        };

        match result {
            Ok(weather) => {
                self.query = pending.label.unwrap_or_else(|| weather.name.clone());
                self.weather = Some(weather);
                self.error = None;
                self.clear_suggestions();

                self.debounce_ticket += 1;
                self.debounce_pending = false;
                vec![Effect::CancelDebounce]
            }
            Err(e) => {
                tracing::info!(error = %e, "Weather lookup failed");
                self.weather = None;
                self.error = Some(e.user_message());
                Vec::new()
            }
        }
    }

    fn on_new_search(&mut self) -> Vec<Effect> {
        self.weather = None;
        self.error = None;
        self.query.clear();
        self.clear_suggestions();
        self.pending_weather = None;

        self.debounce_ticket += 1;
        self.debounce_pending = false;
        vec![Effect::CancelDebounce]
    }

    /// Empty the list and invalidate any lookup still in flight.
    fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.suggestion_generation += 1;
        self.suggestions_pending = false;
    }
}
