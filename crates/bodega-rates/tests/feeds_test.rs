//! Feed client tests against wiremock.

use bodega_core::exchange::{BaseCurrency, RateKey, RateOrigin, RateTable};
use bodega_rates::{RateService, RatesConfig, RatesError};
use rust_decimal::Decimal;
use serde_json::json;
use std::collections::BTreeMap;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PEER_PATH: &str = "/bapi/c2c/v2/friendly/c2c/adv/search";

async fn setup() -> (MockServer, RateService) {
    let server = MockServer::start().await;
    let config = RatesConfig::new("test-key")
        .official_url(format!("{}/v6", server.uri()))
        .peer_url(format!("{}{}", server.uri(), PEER_PATH));
    let service = RateService::new(config).unwrap();
    (server, service)
}

async fn mount_peer(server: &MockServer, fiat: &str, price: &str) {
    Mock::given(method("POST"))
        .and(path(PEER_PATH))
        .and(body_partial_json(json!({ "fiat": fiat, "asset": "USDT", "tradeType": "SELL" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [ { "adv": { "price": price } } ]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_official_latest_uses_pivot_path() {
    let (server, service) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v6/test-key/latest/COP"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "success",
            "conversion_rates": { "COP": 1, "USD": 0.00025, "EUR": 0.0002 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let quote = service.official().latest("COP").await.unwrap();

    assert_eq!(quote.pivot, "COP");
    assert_eq!(quote.rate_per_usd("COP"), Some(Decimal::from(4000)));
}

#[tokio::test]
async fn test_peer_quote_applies_deduction() {
    let (server, service) = setup().await;
    mount_peer(&server, "VES", "734.456").await;

    let rate = service.peer().sell_rate("VES").await.unwrap();

    assert_eq!(rate, Decimal::new(71946, 2));
}

#[tokio::test]
async fn test_peer_without_adverts_is_missing_quote() {
    let (server, service) = setup().await;

    Mock::given(method("POST"))
        .and(path(PEER_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let err = service.peer().sell_rate("COP").await.unwrap_err();
    assert!(matches!(err, RatesError::MissingQuote(_)));
}

#[tokio::test]
async fn test_peer_quote_at_deduction_is_unavailable() {
    let (server, service) = setup().await;
    mount_peer(&server, "VES", "15").await;

    let err = service.peer().sell_rate("VES").await.unwrap_err();
    assert!(matches!(err, RatesError::MissingQuote(_)));
}

#[tokio::test]
async fn test_refresh_combines_feeds() {
    let (server, service) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v6/test-key/latest/USD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "conversion_rates": { "USD": 1, "COP": 4000, "VES": 36.5, "EUR": 0.9 }
        })))
        .mount(&server)
        .await;
    mount_peer(&server, "VES", "60.00").await;
    mount_peer(&server, "COP", "4215.00").await;

    let fetched = service.refresh(BaseCurrency::Dolares).await;

    assert!(fetched.official.is_some());
    assert_eq!(fetched.peer_ves, Some(Decimal::from(45)));
    assert_eq!(fetched.peer_cop, Some(Decimal::from(4200)));

    let table = RateTable::resolve(&fetched, &BTreeMap::new());
    assert_eq!(table.get(RateKey::Cop), Some(Decimal::from(4000)));
    assert_eq!(table.origin(RateKey::VesBinance), Some(RateOrigin::PeerMarket));
    assert!(table.defaulted_keys().is_empty());
}

#[tokio::test]
async fn test_refresh_falls_back_when_feeds_fail() {
    let (server, service) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v6/test-key/latest/VES"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(PEER_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetched = service.refresh(BaseCurrency::Bolivares).await;

    assert!(fetched.official.is_none());
    assert!(fetched.peer_ves.is_none());
    assert!(fetched.peer_cop.is_none());

    let table = RateTable::resolve(&fetched, &BTreeMap::new());
    assert_eq!(table.get(RateKey::VesBcv), RateKey::VesBcv.default_rate());
    assert_eq!(table.get(RateKey::CopBinance), None);
}

#[tokio::test]
async fn test_official_error_status() {
    let (server, service) = setup().await;

    Mock::given(method("GET"))
        .and(path("/v6/test-key/latest/EUR"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = service.official().latest("EUR").await.unwrap_err();
    assert!(matches!(err, RatesError::Status { status: 403, .. }));
}
