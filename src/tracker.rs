// Cheapest-fare selection and the long-lived fare history.
use chrono::{DateTime, Utc};

use crate::model::{
    fmt_amount, Direction, DirectionReport, DirectionalFareSet, FareRecord, PollOutcome,
    PriceDiff,
};

/// Minimum-price record of the set. Ties keep the earlier-listed row, so
/// this is an explicit scan rather than `Iterator::min_by`, which keeps the
/// last of equal elements.
pub fn cheapest(set: &DirectionalFareSet) -> Option<&FareRecord> {
    let mut best: Option<&FareRecord> = None;
    for record in &set.records {
        match best {
            Some(current) if record.price < current.price => best = Some(record),
            None => best = Some(record),
            _ => {}
        }
    }
    best
}

/// Lowest fares seen so far, per direction, plus the full observed series.
/// Owned by the poll loop; `record` is the only mutation point and runs
/// without awaiting, so an abandoned cycle can never leave it half-written.
#[derive(Debug, Default)]
pub struct FareHistory {
    prev_outbound: Option<f64>,
    prev_return: Option<f64>,
    outbound_series: Vec<(DateTime<Utc>, f64)>,
    return_series: Vec<(DateTime<Utc>, f64)>,
}

impl FareHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous_lowest(&self, direction: Direction) -> Option<f64> {
        match direction {
            Direction::Outbound => self.prev_outbound,
            Direction::Return => self.prev_return,
        }
    }

    pub fn series(&self, direction: Direction) -> &[(DateTime<Utc>, f64)] {
        match direction {
            Direction::Outbound => &self.outbound_series,
            Direction::Return => &self.return_series,
        }
    }

    /// Folds one poll's cheapest fares into history.
    ///
    /// Both directions must have produced a valid observation for anything
    /// to move; a partial poll is a scraping hiccup, not a price change,
    /// and is discarded whole. The first full observation seeds the
    /// baseline without producing a diff.
    pub fn record(
        &mut self,
        outbound: Option<&FareRecord>,
        inbound: Option<&FareRecord>,
        threshold: Option<f64>,
    ) -> PollOutcome {
        let (Some(out), Some(ret)) = (outbound, inbound) else {
            return PollOutcome {
                outbound: DirectionReport {
                    direction: Direction::Outbound,
                    price: outbound.map(|r| r.price),
                    diff: None,
                },
                inbound: DirectionReport {
                    direction: Direction::Return,
                    price: inbound.map(|r| r.price),
                    diff: None,
                },
                updated: false,
                deal: None,
            };
        };

        let outbound_diff = self.prev_outbound.map(|prev| diff_of(prev, out.price));
        let return_diff = self.prev_return.map(|prev| diff_of(prev, ret.price));

        self.prev_outbound = Some(out.price);
        self.prev_return = Some(ret.price);
        self.outbound_series.push((out.observed_at, out.price));
        self.return_series.push((ret.observed_at, ret.price));

        // Inclusive threshold; fires on the same cycle that moved the state,
        // seeding included.
        let deal = threshold
            .filter(|limit| out.price <= *limit || ret.price <= *limit)
            .map(|_| {
                format!(
                    "Deal alert! Lowest fare has hit ${} (outbound) and ${} (return)",
                    fmt_amount(out.price),
                    fmt_amount(ret.price)
                )
            });

        PollOutcome {
            outbound: DirectionReport {
                direction: Direction::Outbound,
                price: Some(out.price),
                diff: outbound_diff,
            },
            inbound: DirectionReport {
                direction: Direction::Return,
                price: Some(ret.price),
                diff: return_diff,
            },
            updated: true,
            deal,
        }
    }
}

fn diff_of(prev: f64, current: f64) -> PriceDiff {
    let diff = prev - current;
    if diff > 0.0 {
        PriceDiff::Down(diff)
    } else if diff < 0.0 {
        PriceDiff::Up(-diff)
    } else {
        PriceDiff::Unchanged
    }
}
