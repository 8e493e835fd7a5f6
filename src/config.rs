use serde::Deserialize;
use std::fs;

use chrono::NaiveDate;

use crate::model::{ConfigError, TripRequest};
use crate::selectors::SelectorCatalog;

#[derive(Debug, Deserialize)]
pub struct TripConfig {
    pub origin_airport: String,
    pub destination_airport: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    #[serde(default = "default_passengers")]
    pub passengers: u32,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// WebDriver endpoint, e.g. a local chromedriver or geckodriver.
    pub webdriver_url: String,
    /// Booking page carrying the search form.
    pub base_url: String,
    pub trip: TripConfig,
    /// Deal alerts fire at or below this price; absent means disabled.
    pub deal_price_threshold: Option<f64>,
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,
    #[serde(default = "default_cycle_timeout_seconds")]
    pub cycle_timeout_seconds: u64,
    #[serde(default)]
    pub selectors: SelectorCatalog,
}

impl AppConfig {
    pub fn trip_request(&self) -> TripRequest {
        TripRequest {
            origin: self.trip.origin_airport.clone(),
            destination: self.trip.destination_airport.clone(),
            departure_date: self.trip.departure_date,
            return_date: self.trip.return_date,
            passengers: self.trip.passengers,
        }
    }
}

fn default_passengers() -> u32 {
    1
}

fn default_interval_minutes() -> u64 {
    30
}

fn default_cycle_timeout_seconds() -> u64 {
    120
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config.trip.passengers == 0 {
        return Err(ConfigError::Invalid("passengers must be at least 1".into()));
    }
    if config.interval_minutes == 0 {
        return Err(ConfigError::Invalid("interval_minutes must be at least 1".into()));
    }
    if config.trip.return_date < config.trip.departure_date {
        return Err(ConfigError::Invalid("return_date is before departure_date".into()));
    }
    if let Some(threshold) = config.deal_price_threshold {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ConfigError::Invalid(
                "deal_price_threshold must be a non-negative number".into(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "webdriver_url": "http://localhost:4444",
        "base_url": "https://www.southwest.com",
        "trip": {
            "origin_airport": "DAL",
            "destination_airport": "MDW",
            "departure_date": "2026-11-10",
            "return_date": "2026-11-17"
        }
    }"#;

    #[test]
    fn minimal_config_gets_defaults() {
        let config = parse_config(MINIMAL).unwrap();
        assert_eq!(config.trip.passengers, 1);
        assert_eq!(config.interval_minutes, 30);
        assert_eq!(config.cycle_timeout_seconds, 120);
        assert!(config.deal_price_threshold.is_none());
        assert_eq!(config.selectors.results_container, "#air-booking-product-0");
    }

    #[test]
    fn trip_request_carries_config_values() {
        let config = parse_config(MINIMAL).unwrap();
        let trip = config.trip_request();
        assert_eq!(trip.origin, "DAL");
        assert_eq!(trip.destination, "MDW");
        assert_eq!(trip.passengers, 1);
    }

    #[test]
    fn inverted_dates_are_rejected() {
        let broken = MINIMAL.replace("2026-11-17", "2026-11-01");
        assert!(matches!(
            parse_config(&broken),
            Err(ConfigError::Invalid(message)) if message.contains("return_date")
        ));
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let broken = MINIMAL.replacen(
            "\"trip\"",
            "\"deal_price_threshold\": -5, \"trip\"",
            1,
        );
        assert!(matches!(
            parse_config(&broken),
            Err(ConfigError::Invalid(message)) if message.contains("deal_price_threshold")
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            parse_config("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn unreadable_file_is_an_io_error() {
        assert!(matches!(
            load_config("no-such-config.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
