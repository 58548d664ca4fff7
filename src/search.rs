// Single-query client for the remote award-search GraphQL endpoint

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::fares::{has_award_business, Fare};
use crate::report::Flight;

pub const SEARCH_URL: &str = "https://book.virginatlantic.com/flights/search/api/graphql";

// Versioned query contract with the booking provider. The endpoint
// rejects requests whose query text deviates from this shape, so it is
// kept verbatim rather than generated.
pub const SEARCH_OFFERS_QUERY: &str = "query SearchOffers($request: FlightOfferRequestInput!) {\n  searchOffers(request: $request) {\n    result {\n      slices {\n        current\n        total\n        __typename\n      }\n      criteria {\n        origin {\n          code\n          cityName\n          countryName\n          airportName\n          __typename\n        }\n        destination {\n          code\n          cityName\n          countryName\n          airportName\n          __typename\n        }\n        departing\n        __typename\n      }\n      slice {\n        id\n        fareId\n        flightsAndFares {\n          flight {\n            segments {\n              metal {\n                family\n                name\n                __typename\n              }\n              airline {\n                code\n                name\n                __typename\n              }\n              flightNumber\n              operatingFlightNumber\n              operatingAirline {\n                code\n                name\n                __typename\n              }\n              origin {\n                code\n                cityName\n                countryName\n                airportName\n                __typename\n              }\n              destination {\n                code\n                cityName\n                countryName\n                airportName\n                __typename\n              }\n              duration\n              departure\n              arrival\n              stopCount\n              connection\n              legs {\n                duration\n                departure\n                arrival\n                stopOver\n                isDominantLeg\n                destination {\n                  code\n                  cityName\n                  countryName\n                  airportName\n                  __typename\n                }\n                origin {\n                  code\n                  cityName\n                  countryName\n                  airportName\n                  __typename\n                }\n                __typename\n              }\n              bookingClass\n              fareBasisCode\n              dominantFareProduct\n              __typename\n            }\n            duration\n            origin {\n              code\n              cityName\n              countryName\n              airportName\n              __typename\n            }\n            destination {\n              code\n              cityName\n              countryName\n              airportName\n              __typename\n            }\n            departure\n            arrival\n            __typename\n          }\n          fares {\n            availability\n            id\n            fareId\n            content {\n              cabinName\n              features {\n                type\n                description\n                __typename\n              }\n              __typename\n            }\n            price {\n              awardPoints\n              awardPointsDifference\n              awardPointsDifferenceSign\n              tax\n              amountIncludingTax\n              priceDifference\n              priceDifferenceSign\n              amount\n              currency\n              __typename\n            }\n            fareSegments {\n              cabinName\n              bookingClass\n              isDominantLeg\n              isSaverFare\n              __typename\n            }\n            available\n            fareFamilyType\n            availableSeatCount\n            cabinSelected\n            isSaverFare\n            promoCodeApplied\n            __typename\n          }\n          __typename\n        }\n        __typename\n      }\n      tripSummary {\n        sliceDetails {\n          sliceNumber\n          selectedCabin\n          selectedPrice\n          __typename\n        }\n        currency\n        totalAwardPoints\n        totalPrice\n        __typename\n      }\n      basketId\n      __typename\n    }\n    calendar {\n      fromPrices {\n        fromDate\n        price {\n          amount\n          awardPoints\n          currency\n          minimumPriceInWeek\n          minimumPriceInMonth\n          remaining\n          direct\n          __typename\n        }\n        __typename\n      }\n      from\n      to\n      __typename\n    }\n    priceGrid {\n      criteria {\n        destination {\n          cityName\n          __typename\n        }\n        __typename\n      }\n      returning\n      departures {\n        departing\n        prices {\n          price {\n            amount\n            currency\n            awardPoints\n            __typename\n          }\n          minPrice\n          __typename\n        }\n        __typename\n      }\n      __typename\n    }\n    __typename\n  }\n}";

// Request body for one (date, origin, destination) search. Always a
// single-slice, single-adult award search.
pub fn build_payload(date: &str, origin: &str, destination: &str) -> serde_json::Value {
    json!({
        "operationName": "SearchOffers",
        "variables": {
            "request": {
                "pos": null,
                "parties": null,
                "flightSearchRequest": {
                    "searchOriginDestinations": [
                        {
                            "origin": origin,
                            "destination": destination,
                            "departureDate": date
                        }
                    ],
                    "bundleOffer": false,
                    "awardSearch": true,
                    "calendarSearch": false,
                    "flexiDateSearch": false,
                    "nonStopOnly": false,
                    "currentTripIndexId": "0",
                    "checkInBaggageAllowance": false,
                    "carryOnBaggageAllowance": false,
                    "refundableOnly": false
                },
                "customerDetails": [
                    {
                        "custId": "ADT_0",
                        "ptc": "ADT"
                    }
                ]
            }
        },
        "query": SEARCH_OFFERS_QUERY
    })
}

// The response nests the fare records several optional layers deep, and
// the endpoint omits intermediate objects freely. Every layer is
// defaulted so a partial response decodes to "no fares" instead of a
// decode error.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchOffersResponse {
    pub errors: Option<serde_json::Value>,
    pub data: Option<ResponseData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResponseData {
    pub search_offers: Option<SearchOffers>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchOffers {
    pub result: Option<OfferResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OfferResult {
    pub slice: Option<OfferSlice>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OfferSlice {
    pub flights_and_fares: Vec<FlightAndFares>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FlightAndFares {
    pub fares: Vec<Fare>,
}

impl SearchOffersResponse {
    fn all_fares(self) -> Vec<Fare> {
        self.data
            .and_then(|data| data.search_offers)
            .and_then(|offers| offers.result)
            .and_then(|result| result.slice)
            .map(|slice| {
                slice
                    .flights_and_fares
                    .into_iter()
                    .flat_map(|entry| entry.fares)
                    .collect()
            })
            .unwrap_or_default()
    }
}

// Turn a decoded response into a search verdict. A response carrying a
// top-level `errors` field yields no flight; a response with missing
// intermediate layers still yields a flight, just without an award fare.
pub fn extract_flight(
    response: SearchOffersResponse,
    date: &str,
    origin: &str,
    destination: &str,
) -> Option<Flight> {
    if response.errors.is_some() {
        return None;
    }
    let fares = response.all_fares();
    Some(Flight::new(
        date,
        origin,
        destination,
        has_award_business(&fares),
    ))
}

// Seam between the scheduler and the wire. The scheduler only needs "one
// search, one optional flight"; tests substitute a canned implementation.
#[async_trait]
pub trait FareSearch: Send + Sync {
    async fn search(&self, date: &str, origin: &str, destination: &str) -> Option<Flight>;
}

// HTTP client for the live endpoint. Cheap to clone per reqwest's own
// connection pooling; one instance is shared across all search tasks.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    endpoint: String,
}

impl Default for SearchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchClient {
    pub fn new() -> Self {
        Self::with_endpoint(SEARCH_URL)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    async fn post_search(
        &self,
        date: &str,
        origin: &str,
        destination: &str,
    ) -> Result<SearchOffersResponse, reqwest::Error> {
        self.http
            .post(&self.endpoint)
            .json(&build_payload(date, origin, destination))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[async_trait]
impl FareSearch for SearchClient {
    // One search attempt, no retries. Network and decode failures stay
    // inside this call: the task result is simply absent.
    async fn search(&self, date: &str, origin: &str, destination: &str) -> Option<Flight> {
        match self.post_search(date, origin, destination).await {
            Ok(response) => match extract_flight(response, date, origin, destination) {
                Some(flight) => {
                    tracing::info!(%flight, "search completed");
                    Some(flight)
                }
                None => {
                    tracing::warn!(date, origin, destination, "search response carried errors");
                    None
                }
            },
            Err(err) => {
                tracing::warn!(date, origin, destination, %err, "search request failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(body: &str) -> SearchOffersResponse {
        serde_json::from_str(body).expect("response should decode")
    }

    #[test]
    fn test_payload_carries_search_parameters() {
        let payload = build_payload("2024-01-01", "JFK", "LHR");
        let slice = &payload["variables"]["request"]["flightSearchRequest"]
            ["searchOriginDestinations"][0];
        assert_eq!(slice["origin"], "JFK");
        assert_eq!(slice["destination"], "LHR");
        assert_eq!(slice["departureDate"], "2024-01-01");
        assert_eq!(payload["operationName"], "SearchOffers");
        assert_eq!(payload["query"], SEARCH_OFFERS_QUERY);
    }

    #[test]
    fn test_errors_field_yields_no_flight() {
        let response = decode(r#"{"errors": [{"message": "boom"}], "data": null}"#);
        assert!(extract_flight(response, "2024-01-01", "LHR", "JFK").is_none());
    }

    #[test]
    fn test_missing_layers_yield_flight_without_award() {
        for body in [
            r#"{}"#,
            r#"{"data": null}"#,
            r#"{"data": {}}"#,
            r#"{"data": {"searchOffers": {}}}"#,
            r#"{"data": {"searchOffers": {"result": {}}}}"#,
            r#"{"data": {"searchOffers": {"result": {"slice": {}}}}}"#,
        ] {
            let flight = extract_flight(decode(body), "2024-01-01", "LHR", "JFK")
                .expect("partial response still describes the flight");
            assert!(!flight.has_business, "no fares in {body}");
        }
    }

    #[test]
    fn test_qualifying_fare_marks_flight() {
        let body = r#"{
            "data": {
                "searchOffers": {
                    "result": {
                        "slice": {
                            "flightsAndFares": [
                                {"fares": [{"fareFamilyType": "ECONOMY", "availability": "AVAILABLE"}]},
                                {"fares": [{"fareFamilyType": "AWARD-BUSINESS-FIRST", "availability": "AVAILABLE"}]}
                            ]
                        }
                    }
                }
            }
        }"#;
        let flight = extract_flight(decode(body), "2024-01-01", "LHR", "JFK").unwrap();
        assert!(flight.has_business);
        assert_eq!(
            flight.to_string(),
            "Flight(date=2024-01-01, LHR ====> JFK, has_business)"
        );
    }

    #[test]
    fn test_sold_out_fares_do_not_mark_flight() {
        let body = r#"{
            "data": {
                "searchOffers": {
                    "result": {
                        "slice": {
                            "flightsAndFares": [
                                {"fares": [{"fareFamilyType": "AWARD-BUSINESS-FIRST", "availability": "SOLD_OUT"}]}
                            ]
                        }
                    }
                }
            }
        }"#;
        let flight = extract_flight(decode(body), "2024-01-01", "LHR", "JFK").unwrap();
        assert!(!flight.has_business);
    }

    #[test]
    fn test_unknown_fare_fields_are_ignored() {
        let body = r#"{
            "data": {
                "searchOffers": {
                    "result": {
                        "slice": {
                            "flightsAndFares": [
                                {
                                    "flight": {"duration": "PT7H"},
                                    "fares": [
                                        {
                                            "fareFamilyType": "AWARD-BUSINESS-FIRST",
                                            "availability": "AVAILABLE",
                                            "availableSeatCount": 2,
                                            "price": {"awardPoints": 47500}
                                        }
                                    ]
                                }
                            ]
                        }
                    }
                }
            }
        }"#;
        let flight = extract_flight(decode(body), "2024-01-01", "LHR", "JFK").unwrap();
        assert!(flight.has_business);
    }

    #[test]
    fn test_query_text_is_the_versioned_contract() {
        assert!(SEARCH_OFFERS_QUERY
            .starts_with("query SearchOffers($request: FlightOfferRequestInput!)"));
        assert!(SEARCH_OFFERS_QUERY.contains("flightsAndFares"));
        assert!(SEARCH_OFFERS_QUERY.contains("fareFamilyType"));
        assert!(SEARCH_OFFERS_QUERY.ends_with('}'));
    }
}
