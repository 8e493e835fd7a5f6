// Fare row extraction from the rendered results snapshot.
use chrono::{DateTime, Utc};
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::model::{Direction, DirectionalFareSet, FareRecord};
use crate::search::ResultSurface;
use crate::selectors::SelectorCatalog;

pub struct FareExtractor<'a> {
    selectors: &'a SelectorCatalog,
}

impl<'a> FareExtractor<'a> {
    pub fn new(selectors: &'a SelectorCatalog) -> Self {
        Self { selectors }
    }

    /// Never fails: rows that cannot be parsed are skipped and counted, and
    /// a surface with nothing usable yields an empty set. All records share
    /// `captured_at`, the instant the poll began.
    pub fn extract(
        &self,
        surface: &ResultSurface,
        direction: Direction,
        captured_at: DateTime<Utc>,
    ) -> DirectionalFareSet {
        let document = Html::parse_document(&surface.html);

        // An explicit no-flights banner short-circuits before any row gets
        // blamed for failing to parse.
        if let Some(no_flights) = &self.selectors.no_flights {
            if let Ok(banner) = Selector::parse(no_flights) {
                if document.select(&banner).next().is_some() {
                    debug!("no flights available for the {direction} leg");
                    return DirectionalFareSet { direction, records: Vec::new(), skipped: 0 };
                }
            }
        }

        let row_selector = match direction {
            Direction::Outbound => &self.selectors.outbound_rows,
            Direction::Return => &self.selectors.return_rows,
        };
        let parsed = (
            Selector::parse(row_selector),
            Selector::parse(&self.selectors.flight_number),
            Selector::parse(&self.selectors.fare_price),
        );
        let (rows, number, price) = match parsed {
            (Ok(rows), Ok(number), Ok(price)) => (rows, number, price),
            _ => {
                warn!("invalid selector in catalog; no {direction} fares this cycle");
                return DirectionalFareSet { direction, records: Vec::new(), skipped: 0 };
            }
        };

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for row in document.select(&rows) {
            let number_node = row.select(&number).next();
            let price_node = row.select(&price).next();
            let (Some(number_node), Some(price_node)) = (number_node, price_node) else {
                skipped += 1;
                continue;
            };
            let price_text: String = price_node.text().collect();
            let Some(price) = parse_price(&price_text) else {
                skipped += 1;
                continue;
            };
            records.push(FareRecord {
                flight_number: number_node.text().collect::<String>().trim().to_string(),
                price,
                observed_at: captured_at,
            });
        }

        if skipped > 0 {
            warn!("skipped {skipped} unparseable {direction} fare rows");
        }
        DirectionalFareSet { direction, records, skipped }
    }
}

/// Strips the currency symbol and thousands separators, then parses the
/// rest as a decimal amount. Anything non-finite or negative is rejected.
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let price: f64 = cleaned.parse().ok()?;
    if !price.is_finite() || price < 0.0 {
        return None;
    }
    Some(price)
}
