//! Values derived from the view state for rendering: formatted temperatures,
//! the background condition and the theme it maps to.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{TemperatureUnit, WeatherResult};

/// Format a Celsius reading in `unit`, rounded to one decimal.
pub fn format_temperature(celsius: f64, unit: TemperatureUnit) -> String {
    format!("{:.1}", unit.convert(celsius))
}

/// The pair the background is chosen from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackgroundCondition {
    pub main: String,
    pub is_day: bool,
}

impl BackgroundCondition {
    /// Daytime is strictly between sunrise and sunset.
    pub fn derive(result: &WeatherResult, now: DateTime<Utc>) -> Self {
        Self {
            main: result.condition.clone(),
            is_day: now > result.sunrise && now < result.sunset,
        }
    }
}

/// Visual themes for the backdrop behind the weather card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundTheme {
    ClearDay,
    ClearNight,
    CloudyDay,
    CloudyNight,
    Rain,
    Thunderstorm,
    Snow,
    Mist,
    Neutral,
}

impl BackgroundTheme {
    pub fn for_condition(condition: &BackgroundCondition) -> Self {
        let day = condition.is_day;
        match condition.main.as_str() {
            "Clear" if day => Self::ClearDay,
            "Clear" => Self::ClearNight,
            "Clouds" if day => Self::CloudyDay,
            "Clouds" => Self::CloudyNight,
            "Rain" | "Drizzle" => Self::Rain,
            "Thunderstorm" => Self::Thunderstorm,
            "Snow" => Self::Snow,
            "Mist" | "Smoke" | "Haze" | "Dust" | "Fog" | "Sand" | "Ash" | "Squall" | "Tornado" => {
                Self::Mist
            }
            _ => Self::Neutral,
        }
    }

    /// Theme used before any weather has been loaded.
    pub fn for_state(condition: Option<&BackgroundCondition>) -> Self {
        condition.map_or(Self::Neutral, Self::for_condition)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ClearDay => "clear-day",
            Self::ClearNight => "clear-night",
            Self::CloudyDay => "cloudy-day",
            Self::CloudyNight => "cloudy-night",
            Self::Rain => "rain",
            Self::Thunderstorm => "thunderstorm",
            Self::Snow => "snow",
            Self::Mist => "mist",
            Self::Neutral => "neutral",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::ClearDay => "☀",
            Self::ClearNight => "☾",
            Self::CloudyDay | Self::CloudyNight => "☁",
            Self::Rain => "☂",
            Self::Thunderstorm => "⚡",
            Self::Snow => "❄",
            Self::Mist => "≋",
            Self::Neutral => "·",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn result_with(condition: &str, sunrise: i64, sunset: i64) -> WeatherResult {
        WeatherResult {
            name: "London".into(),
            condition: condition.into(),
            icon: "01d".into(),
            description: "clear sky".into(),
            temperature_c: 20.0,
            feels_like_c: 19.0,
            sunrise: DateTime::from_timestamp(sunrise, 0).unwrap(),
            sunset: DateTime::from_timestamp(sunset, 0).unwrap(),
        }
    }

    #[test]
    fn celsius_is_rounded_to_one_decimal() {
        assert_eq!(format_temperature(20.0, TemperatureUnit::Celsius), "20.0");
        assert_eq!(format_temperature(21.37, TemperatureUnit::Celsius), "21.4");
        assert_eq!(format_temperature(-3.04, TemperatureUnit::Celsius), "-3.0");
    }

    #[test]
    fn fahrenheit_uses_nine_fifths_plus_32() {
        assert_eq!(format_temperature(20.0, TemperatureUnit::Fahrenheit), "68.0");
        assert_eq!(format_temperature(-40.0, TemperatureUnit::Fahrenheit), "-40.0");
        // 21.37 * 9 / 5 + 32 = 70.466
        assert_eq!(format_temperature(21.37, TemperatureUnit::Fahrenheit), "70.5");
    }

    #[test]
    fn toggling_twice_restores_formatted_value() {
        for c in [-12.3, 0.0, 8.66, 37.77] {
            let unit = TemperatureUnit::Celsius;
            assert_eq!(
                format_temperature(c, unit.toggle().toggle()),
                format_temperature(c, unit)
            );
        }
    }

    #[test]
    fn daytime_is_strictly_between_sun_events() {
        let result = result_with("Clear", 1_000, 2_000);
        let at = |ts| DateTime::from_timestamp(ts, 0).unwrap();

        assert!(BackgroundCondition::derive(&result, at(1_500)).is_day);
        assert!(!BackgroundCondition::derive(&result, at(1_000)).is_day);
        assert!(!BackgroundCondition::derive(&result, at(2_000)).is_day);
        assert!(!BackgroundCondition::derive(&result, at(999)).is_day);
        assert!(!BackgroundCondition::derive(&result, at(2_000) + Duration::seconds(1)).is_day);
    }

    #[test]
    fn theme_follows_condition_and_daylight() {
        let cond = |main: &str, is_day| BackgroundCondition { main: main.into(), is_day };

        assert_eq!(BackgroundTheme::for_condition(&cond("Clear", true)), BackgroundTheme::ClearDay);
        assert_eq!(BackgroundTheme::for_condition(&cond("Clear", false)), BackgroundTheme::ClearNight);
        assert_eq!(BackgroundTheme::for_condition(&cond("Clouds", false)), BackgroundTheme::CloudyNight);
        assert_eq!(BackgroundTheme::for_condition(&cond("Drizzle", true)), BackgroundTheme::Rain);
        assert_eq!(BackgroundTheme::for_condition(&cond("Haze", true)), BackgroundTheme::Mist);
        assert_eq!(BackgroundTheme::for_condition(&cond("Volcano", true)), BackgroundTheme::Neutral);
        assert_eq!(BackgroundTheme::for_state(None), BackgroundTheme::Neutral);
    }
}
