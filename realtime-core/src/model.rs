use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Current conditions for one city, in metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub temperature: f64,
    pub description: String,
    pub humidity: u8,
    pub wind_speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateResult {
    pub rate: f64,
    /// Timestamp exactly as the provider sent it.
    pub last_updated: String,
}

impl ExchangeRateResult {
    /// Parse `last_updated` as an RFC 2822 date, the format the provider uses.
    pub fn last_updated_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc2822(&self.last_updated).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn last_updated_parses_rfc2822() {
        let result = ExchangeRateResult {
            rate: 0.92,
            last_updated: "Mon, 01 Jan 2024 00:00:00 +0000".into(),
        };

        let at = result.last_updated_at().expect("timestamp should parse");
        assert_eq!(at, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn last_updated_stays_opaque_when_unparseable() {
        let result = ExchangeRateResult { rate: 1.0, last_updated: "yesterday".into() };

        assert!(result.last_updated_at().is_none());
        assert_eq!(result.last_updated, "yesterday");
    }
}
