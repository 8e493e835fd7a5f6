// Selector catalog: every locator the pipeline touches, in one place.
//
// When the site's markup drifts, the fix is a config override for the
// affected entry, not a code change. Defaults match the booking page as
// last observed.
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorCatalog {
    pub origin_airport: String,
    pub destination_airport: String,
    pub departure_date: String,
    pub return_date: String,
    pub passenger_count: String,
    pub search_submit: String,
    /// Container that appears once the fare results have rendered.
    pub results_container: String,
    pub outbound_rows: String,
    pub return_rows: String,
    /// Resolved relative to a fare row.
    pub flight_number: String,
    /// Resolved relative to a fare row.
    pub fare_price: String,
    /// Explicit "no flights available" banner. Optional; when unset the
    /// extractor cannot tell an empty schedule from a parse failure.
    pub no_flights: Option<String>,
}

impl Default for SelectorCatalog {
    fn default() -> Self {
        Self {
            origin_airport: "#LandingAirBookingSearchForm_originationAirportCode".into(),
            destination_airport: "#LandingAirBookingSearchForm_destinationAirportCode".into(),
            departure_date: "#LandingAirBookingSearchForm_departureDate".into(),
            return_date: "#LandingAirBookingSearchForm_returnDate".into(),
            passenger_count: "#LandingAirBookingSearchForm_adultPassengersCount".into(),
            search_submit: "#LandingAirBookingSearchForm_submit-button".into(),
            results_container: "#air-booking-product-0".into(),
            outbound_rows: "#air-booking-product-0 .air-booking-select-detail".into(),
            return_rows: "#air-booking-product-1 .air-booking-select-detail".into(),
            flight_number:
                ".actionable.actionable_button.actionable_light.button.flight-numbers--flight-number"
                    .into(),
            fare_price: ".currency--symbol + span".into(),
            no_flights: Some(".air-booking-no-flights-message".into()),
        }
    }
}
