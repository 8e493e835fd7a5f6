mod config;
mod driver;
mod model;
mod notifier;
mod parser;
mod search;
mod selectors;
mod tracker;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::{interval, timeout};
use tracing::{error, info, warn};

use config::{load_config, AppConfig};
use driver::webdriver::WebDriverPage;
use driver::PageDriver;
use model::{fmt_amount, Direction, SubmitError, TripRequest};
use notifier::sms::SmsNotifier;
use notifier::{LogNotifier, Notifier};
use parser::FareExtractor;
use search::SearchSubmitter;
use tracker::{cheapest, FareHistory};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {panic_info:?}");
    }));

    let config = match load_config("config.json") {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {e}");
            return;
        }
    };

    let sms = SmsNotifier::from_env();
    let sms_recipient = sms.as_ref().map(|s| s.recipient().to_string());
    let notifier: Arc<dyn Notifier> = match sms {
        Some(sms) => Arc::new(sms),
        None => Arc::new(LogNotifier),
    };

    log_settings(&config, sms_recipient.as_deref());

    let trip = config.trip_request();
    let mut history = FareHistory::new();
    let cycle_budget = Duration::from_secs(config.cycle_timeout_seconds);
    let mut ticker = interval(Duration::from_secs(config.interval_minutes * 60));

    // One cycle at a time; the history has no synchronization and the tick
    // only fires again once the previous cycle has fully finished.
    loop {
        ticker.tick().await;
        info!("Starting poll cycle");

        let page = match WebDriverPage::connect(&config.webdriver_url).await {
            Ok(page) => page,
            Err(e) => {
                notifier.log(&[format!("Could not open a browser session: {e}")]);
                continue;
            }
        };

        let keep_going = run_cycle(
            &page,
            &config,
            &trip,
            &mut history,
            notifier.as_ref(),
            cycle_budget,
        )
        .await;

        // The session is never reused; stale navigation state from a failed
        // cycle must not leak into the next one.
        if let Err(e) = page.close().await {
            warn!("Failed to close browser session: {e}");
        }

        if !keep_going {
            error!("Page structure no longer matches the selector catalog; exiting");
            return;
        }
    }
}

/// One poll against the booking page, bounded by `budget`. Every outcome
/// produces at least one log line. Returns false only for the fatal
/// selector-drift failure; everything else is cycle-scoped.
async fn run_cycle<D: PageDriver>(
    page: &D,
    config: &AppConfig,
    trip: &TripRequest,
    history: &mut FareHistory,
    notifier: &dyn Notifier,
    budget: Duration,
) -> bool {
    let result = timeout(budget, poll_once(page, config, trip, history, notifier)).await;
    match result {
        Err(_) => {
            notifier.log(&[format!(
                "Poll cycle exceeded its {}s budget and was abandoned",
                budget.as_secs()
            )]);
            true
        }
        Ok(Err(SubmitError::SelectorNotFound(selector))) => {
            notifier.log(&[format!(
                "Required element missing ({selector}); the page structure has changed"
            )]);
            false
        }
        Ok(Err(SubmitError::NavigationTimeout)) => {
            notifier.log(&["Search did not reach the results page in time".to_string()]);
            true
        }
        Ok(Err(e)) => {
            notifier.log(&[format!("Poll cycle failed: {e}")]);
            true
        }
        Ok(Ok(())) => true,
    }
}

async fn poll_once<D: PageDriver>(
    page: &D,
    config: &AppConfig,
    trip: &TripRequest,
    history: &mut FareHistory,
    notifier: &dyn Notifier,
) -> Result<(), SubmitError> {
    let captured_at = Utc::now();

    let submitter = SearchSubmitter::new(page, &config.selectors, &config.base_url);
    let surface = submitter.submit(trip).await?;

    let extractor = FareExtractor::new(&config.selectors);
    let outbound = extractor.extract(&surface, Direction::Outbound, captured_at);
    let inbound = extractor.extract(&surface, Direction::Return, captured_at);

    let outcome = history.record(
        cheapest(&outbound),
        cheapest(&inbound),
        config.deal_price_threshold,
    );
    notifier.log(&outcome.log_lines());

    if let Some(message) = &outcome.deal {
        notifier.log(&[message.clone()]);
        if let Err(e) = notifier.alert(message).await {
            notifier.log(&[format!("Deal alert delivery failed: {e}")]);
        }
    }
    Ok(())
}

fn log_settings(config: &AppConfig, sms_recipient: Option<&str>) {
    let trip = &config.trip;
    info!("Origin airport: {}", trip.origin_airport);
    info!("Destination airport: {}", trip.destination_airport);
    info!("Outbound date: {}", trip.departure_date);
    info!("Return date: {}", trip.return_date);
    info!("Passengers: {}", trip.passengers);
    info!("Interval: {} minutes", config.interval_minutes);
    match config.deal_price_threshold {
        Some(threshold) => info!("Deal price: <= ${}", fmt_amount(threshold)),
        None => info!("Deal price: disabled"),
    }
    info!("SMS alerts: {}", sms_recipient.unwrap_or("disabled"));
}
