// Search submission: fill the booking form, fire it, and hand back a
// snapshot of the rendered results.
use std::time::Duration;

use chrono::NaiveDate;
use futures::future::join3;
use tracing::debug;

use crate::driver::PageDriver;
use crate::model::{DriverError, SubmitError, TripRequest};
use crate::selectors::SelectorCatalog;

/// How long the booking form gets to render after the initial navigation.
pub const LOAD_GRACE: Duration = Duration::from_secs(5);
/// How long the search gets to produce results after the submit click.
pub const SUBMIT_GRACE: Duration = Duration::from_secs(30);

/// Rendered results page, captured once the fare rows are ready.
#[derive(Debug)]
pub struct ResultSurface {
    pub html: String,
}

pub struct SearchSubmitter<'a, D: PageDriver + ?Sized> {
    driver: &'a D,
    selectors: &'a SelectorCatalog,
    base_url: &'a str,
    load_timeout: Duration,
    submit_timeout: Duration,
}

impl<'a, D: PageDriver + ?Sized> SearchSubmitter<'a, D> {
    pub fn new(driver: &'a D, selectors: &'a SelectorCatalog, base_url: &'a str) -> Self {
        Self {
            driver,
            selectors,
            base_url,
            load_timeout: LOAD_GRACE,
            submit_timeout: SUBMIT_GRACE,
        }
    }

    pub async fn submit(&self, trip: &TripRequest) -> Result<ResultSurface, SubmitError> {
        let sel = self.selectors;

        self.driver.goto(self.base_url).await?;

        // The form renders asynchronously; the origin field is the readiness
        // sentinel. If it never shows up the page is structurally foreign.
        match self.driver.wait_for(&sel.origin_airport, self.load_timeout).await {
            Ok(()) => {}
            Err(DriverError::Timeout) | Err(DriverError::NotFound(_)) => {
                return Err(SubmitError::SelectorNotFound(sel.origin_airport.clone()));
            }
            Err(e) => return Err(e.into()),
        }

        // Every trip field must resolve before anything is typed, so drift
        // on any one of them is reported as drift, not as a timeout later.
        for (name, selector) in [
            ("origin airport", &sel.origin_airport),
            ("destination airport", &sel.destination_airport),
            ("departure date", &sel.departure_date),
            ("return date", &sel.return_date),
        ] {
            if !self.driver.exists(selector).await? {
                return Err(SubmitError::SelectorNotFound(format!("{name} ({selector})")));
            }
        }

        self.driver.fill(&sel.origin_airport, &trip.origin).await?;
        self.driver
            .fill(&sel.destination_airport, &trip.destination)
            .await?;
        self.driver
            .fill(&sel.departure_date, &format_date(trip.departure_date))
            .await?;
        self.driver
            .fill(&sel.return_date, &format_date(trip.return_date))
            .await?;
        self.driver
            .fill(&sel.passenger_count, &trip.passengers.to_string())
            .await?;

        // The date picker overlays the submit button until its field loses
        // focus.
        self.driver.press_escape(&sel.return_date).await?;

        debug!("submitting search {} -> {}", trip.origin, trip.destination);

        // The click causes the navigation. Both waits must already be in
        // flight when it lands, so all three futures are polled jointly;
        // awaiting the click first would race a fast navigation, awaiting a
        // wait first would never click at all.
        let click = self.driver.click(&sel.search_submit);
        let navigation = self.driver.wait_for_navigation(self.submit_timeout);
        let ready = self
            .driver
            .wait_for(&sel.results_container, self.submit_timeout);
        let (click_result, navigation_result, ready_result) =
            join3(click, navigation, ready).await;

        click_result?;
        for result in [navigation_result, ready_result] {
            match result {
                Ok(()) => {}
                Err(DriverError::Timeout) => return Err(SubmitError::NavigationTimeout),
                Err(e) => return Err(e.into()),
            }
        }

        let html = self.driver.source().await?;
        Ok(ResultSurface { html })
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}
