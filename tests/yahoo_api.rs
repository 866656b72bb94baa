//! Integration tests for the Yahoo Finance chart adapter.
//!
//! Runs the adapter against a local mock server to verify request
//! shape, response parsing, and error mapping.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nse_screener::data::{FetchPeriod, MarketDataProvider, ProviderError, YahooFinanceAdapter};

const CHART_BODY: &str = r#"{
    "chart": {
        "result": [{
            "meta": {"symbol": "RELIANCE.NS"},
            "timestamp": [1735603200, 1735689600, 1735776000],
            "indicators": {
                "quote": [{
                    "open": [2880.0, 2905.5, null],
                    "high": [2910.0, 2930.0, null],
                    "low": [2870.0, 2890.0, null],
                    "close": [2901.0, 2925.5, null],
                    "volume": [4500000, 5100000, null]
                }]
            }
        }],
        "error": null
    }
}"#;

const NOT_FOUND_BODY: &str = r#"{
    "chart": {
        "result": null,
        "error": {
            "code": "Not Found",
            "description": "No data found, symbol may be delisted"
        }
    }
}"#;

#[tokio::test]
async fn fetches_and_parses_daily_bars() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/RELIANCE.NS"))
        .and(query_param("range", "3mo"))
        .and(query_param("interval", "1d"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(CHART_BODY, "application/json"))
        .mount(&server)
        .await;

    let adapter = YahooFinanceAdapter::with_base_url(server.uri());
    let bars = adapter
        .daily_bars("RELIANCE.NS", FetchPeriod::ThreeMonths)
        .await
        .unwrap();

    // The null-padded third row is dropped
    assert_eq!(bars.len(), 2);
    assert!(bars[0].date < bars[1].date);
    assert_eq!(bars[0].close, 2901.0);
    assert_eq!(bars[1].volume, 5100000.0);
}

#[tokio::test]
async fn one_month_range_is_requested() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/TCS.NS"))
        .and(query_param("range", "1mo"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(CHART_BODY, "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = YahooFinanceAdapter::with_base_url(server.uri());
    adapter
        .daily_bars("TCS.NS", FetchPeriod::OneMonth)
        .await
        .unwrap();
}

#[tokio::test]
async fn chart_error_maps_to_data_not_available() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v8/finance/chart/BOGUS.NS"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(NOT_FOUND_BODY, "application/json"))
        .mount(&server)
        .await;

    let adapter = YahooFinanceAdapter::with_base_url(server.uri());
    let err = adapter
        .daily_bars("BOGUS.NS", FetchPeriod::ThreeMonths)
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::DataNotAvailable(_)));
}

#[tokio::test]
async fn http_404_maps_to_data_not_available() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let adapter = YahooFinanceAdapter::with_base_url(server.uri());
    let err = adapter
        .daily_bars("GONE.NS", FetchPeriod::OneMonth)
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::DataNotAvailable(_)));
}

#[tokio::test]
async fn http_429_maps_to_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let adapter = YahooFinanceAdapter::with_base_url(server.uri());
    let err = adapter
        .daily_bars("RELIANCE.NS", FetchPeriod::OneMonth)
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::RateLimited { .. }));
}

#[tokio::test]
async fn http_500_maps_to_internal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let adapter = YahooFinanceAdapter::with_base_url(server.uri());
    let err = adapter
        .daily_bars("RELIANCE.NS", FetchPeriod::OneMonth)
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Internal(_)));
}
