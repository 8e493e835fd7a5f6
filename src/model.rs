// Core structs: TripRequest, FareRecord, PollOutcome
use chrono::{DateTime, NaiveDate, Utc};
use std::fmt;
use thiserror::Error;

/// One origin/destination/date combination to watch. Built once from config
/// and never mutated.
#[derive(Debug, Clone)]
pub struct TripRequest {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub passengers: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Outbound,
    Return,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Outbound => "outbound",
            Direction::Return => "return",
        }
    }

    pub fn with_article(&self) -> &'static str {
        match self {
            Direction::Outbound => "an outbound",
            Direction::Return => "a return",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One parsed result row. `price` is always finite and non-negative; rows
/// that would violate that never make it out of the extractor.
#[derive(Debug, Clone)]
pub struct FareRecord {
    pub flight_number: String,
    pub price: f64,
    pub observed_at: DateTime<Utc>,
}

/// All parseable fare rows for one direction from a single poll, in page
/// order, plus the count of rows the extractor had to skip.
#[derive(Debug)]
pub struct DirectionalFareSet {
    pub direction: Direction,
    pub records: Vec<FareRecord>,
    pub skipped: usize,
}

/// Movement of a direction's cheapest fare relative to the previous poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceDiff {
    Down(f64),
    Up(f64),
    Unchanged,
}

impl fmt::Display for PriceDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceDiff::Down(amount) => write!(f, "(down ${})", fmt_amount(*amount)),
            PriceDiff::Up(amount) => write!(f, "(up ${})", fmt_amount(*amount)),
            PriceDiff::Unchanged => write!(f, "(no change)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirectionReport {
    pub direction: Direction,
    /// `None` when the direction produced no valid observation this poll.
    pub price: Option<f64>,
    /// `None` on the seeding transition and on discarded polls.
    pub diff: Option<PriceDiff>,
}

/// What one poll concluded, ready for the notifier to render without
/// re-deriving history.
#[derive(Debug)]
pub struct PollOutcome {
    pub outbound: DirectionReport,
    pub inbound: DirectionReport,
    /// Whether the fare history actually moved this poll.
    pub updated: bool,
    /// Alert message when a cheapest fare crossed the deal threshold.
    pub deal: Option<String>,
}

impl PollOutcome {
    pub fn log_lines(&self) -> Vec<String> {
        if !self.updated {
            let missing: Vec<&str> = [&self.outbound, &self.inbound]
                .into_iter()
                .filter(|r| r.price.is_none())
                .map(|r| r.direction.label())
                .collect();
            return vec![format!(
                "No valid {} fares this cycle; keeping previous lowest fares",
                missing.join(" or ")
            )];
        }
        let mut lines = Vec::new();
        for report in [&self.outbound, &self.inbound] {
            if let Some(price) = report.price {
                let mut line = format!(
                    "Lowest fare for {} flight is currently ${}",
                    report.direction.with_article(),
                    fmt_amount(price)
                );
                if let Some(diff) = report.diff {
                    line.push(' ');
                    line.push_str(&diff.to_string());
                }
                lines.push(line);
            }
        }
        lines
    }
}

/// Fares are whole dollars on the page today, but the parser tolerates
/// cents; render them only when present.
pub(crate) fn fmt_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("element not found: {0}")]
    NotFound(String),
    #[error("timed out waiting for page state")]
    Timeout,
    #[error("webdriver backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// A required element no longer resolves. The page structure has drifted
    /// out from under the selector catalog; retrying cannot help.
    #[error("required element missing, selector drift suspected: {0}")]
    SelectorNotFound(String),
    #[error("page did not reach the result state in time")]
    NavigationTimeout,
    #[error("driver failure: {0}")]
    Driver(#[from] DriverError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification API error: {0}")]
    ApiError(String),
    #[error("notification channel unreachable")]
    Unreachable,
}
