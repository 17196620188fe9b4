//! Human-readable rendering of query results.

use serde::Serialize;
use std::fmt;

use crate::{ExchangeRateResult, WeatherResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub city: String,
    #[serde(flatten)]
    pub result: WeatherResult,
}

impl fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Weather in {}", title_case(&self.city))?;
        writeln!(f, "Temperature: {}°C", number(self.result.temperature))?;
        writeln!(f, "Description: {}", capitalize(&self.result.description))?;
        writeln!(f, "Humidity: {}%", self.result.humidity)?;
        write!(f, "Wind Speed: {} m/s", number(self.result.wind_speed))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateReport {
    pub from: String,
    pub to: String,
    #[serde(flatten)]
    pub result: ExchangeRateResult,
}

impl fmt::Display for RateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Exchange Rate: {} to {}", self.from, self.to)?;
        writeln!(f, "Rate: {}", number(self.result.rate))?;
        write!(f, "Last Updated: {}", self.result.last_updated)
    }
}

/// Whole values keep their `.0`, as in the JSON payload.
fn number(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}

/// Upper-case every letter that follows a non-letter, lower-case the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;

    for c in s.chars() {
        if prev_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }

    out
}

/// First character upper-cased, the rest lower-cased.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
