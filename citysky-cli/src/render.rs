use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};
use citysky_core::{BackgroundTheme, Suggestion, ViewState};

/// Render the result card for the current state, or the error if there is one.
pub fn weather_card(state: &ViewState) -> String {
    render_at(state, Utc::now())
}

fn render_at(state: &ViewState, now: DateTime<Utc>) -> String {
    let mut out = String::new();

    if let Some(error) = state.error() {
        let _ = writeln!(out, "error: {error}");
        return out;
    }
    let Some(weather) = state.weather() else {
        if state.is_loading() {
            out.push_str("Loading...\n");
        }
        return out;
    };

    let background = state.background_at(now);
    let theme = BackgroundTheme::for_state(background.as_ref());
    let unit = state.unit();

    let _ = writeln!(out, "{} {}  [{}]", theme.glyph(), weather.name, theme.name());
    let _ = writeln!(out, "  {}{}", state.temperature(weather.temperature_c), unit);
    let _ = writeln!(out, "  {}", capitalize(&weather.description));
    let _ = writeln!(out, "  Feels like {}{}", state.temperature(weather.feels_like_c), unit);
    let _ = writeln!(
        out,
        "  Sunrise {}  Sunset {}",
        local_time(weather.sunrise),
        local_time(weather.sunset)
    );
    let _ = writeln!(out, "  Icon: {}", weather.icon_url());
    out
}

pub fn suggestion_labels(suggestions: &[Suggestion]) -> Vec<String> {
    suggestions.iter().map(Suggestion::label).collect()
}

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M").to_string()
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
