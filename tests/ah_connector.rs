//! Integration tests for the Albert Heijn connector.
//!
//! A local axum app stands in for the AH mobile API so the real HTTP client,
//! token flow, and payload decoding are exercised without network access.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower::ServiceExt;

use supermarkt_api::api::{create_router, AppState};
use supermarkt_api::config::Config;
use supermarkt_api::connector::{AhConnector, Connector};
use supermarkt_api::error::ConnectorError;

const TOKEN: &str = "anonymous-test-token";

/// Requests seen by the fake upstream.
#[derive(Clone, Default)]
struct Seen {
    search: Arc<Mutex<Vec<HashMap<String, String>>>>,
    headers: Arc<Mutex<Vec<HeaderMap>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false)
}

async fn token(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["clientId"] != "appie" {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "bad client"})));
    }
    (
        StatusCode::OK,
        Json(json!({"access_token": TOKEN, "refresh_token": "r", "expires_in": 7199})),
    )
}

async fn search(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    seen.search.lock().unwrap().push(params);
    seen.headers.lock().unwrap().push(headers);

    (
        StatusCode::OK,
        Json(json!({
            "page": {"size": 2, "totalElements": 2, "totalPages": 1, "number": 0},
            "products": [
                {
                    "webshopId": 1525,
                    "title": "AH Halfvolle melk",
                    "priceBeforeBonus": 3.0,
                    "discountLabels": [{"code": "DISCOUNT_X_PLUS_Y_FREE", "defaultDescription": "1 + 1 gratis"}],
                    "bonusMechanism": "1 + 1 gratis",
                    "salesUnitSize": "1 l",
                    "unitPriceDescription": "prijs per liter €3.00",
                    "availableOnline": true
                },
                {
                    "webshopId": 200,
                    "title": "AH Volkoren brood",
                    "priceBeforeBonus": 2.0
                }
            ]
        })),
    )
}

async fn categories(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({})));
    }
    (
        StatusCode::OK,
        Json(json!([{"id": 6401, "name": "Groente, aardappelen", "nix18": false}])),
    )
}

fn fake_ah(seen: Seen) -> Router {
    Router::new()
        .route("/mobile-auth/v1/auth/token/anonymous", post(token))
        .route("/mobile-services/product/search/v2", get(search))
        .route("/mobile-services/v1/product-shelves/categories", get(categories))
        .with_state(seen)
}

async fn spawn_upstream(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn connector_for(base_url: String) -> AhConnector {
    let config = Config {
        ah_base_url: base_url,
        http_timeout_ms: 2_000,
        ..Config::default()
    };
    AhConnector::new(&config).unwrap()
}

#[tokio::test]
async fn search_sends_token_and_parameters() {
    let seen = Seen::default();
    let base_url = spawn_upstream(fake_ah(seen.clone())).await;
    let connector = connector_for(base_url);

    let results = connector.search_products("melk", 2, 1).await.unwrap();

    let products = results.products();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].title.as_deref(), Some("AH Halfvolle melk"));
    assert_eq!(products[0].price_before_bonus, Some(dec!(3.0)));
    assert_eq!(products[1].discount_labels, None);

    let params = seen.search.lock().unwrap()[0].clone();
    assert_eq!(params.get("query").map(String::as_str), Some("melk"));
    assert_eq!(params.get("size").map(String::as_str), Some("2"));
    assert_eq!(params.get("page").map(String::as_str), Some("1"));
    assert_eq!(params.get("sortOn").map(String::as_str), Some("RELEVANCE"));

    let headers = seen.headers.lock().unwrap()[0].clone();
    assert_eq!(headers.get("x-application").unwrap(), "AHWEBSHOP");
    assert_eq!(headers.get("user-agent").unwrap(), "Appie/8.22.3");
}

#[tokio::test]
async fn categories_are_returned_verbatim() {
    let base_url = spawn_upstream(fake_ah(Seen::default())).await;
    let connector = connector_for(base_url);

    let categories = connector.get_categories().await.unwrap();
    assert_eq!(
        categories,
        json!([{"id": 6401, "name": "Groente, aardappelen", "nix18": false}])
    );
}

#[tokio::test]
async fn upstream_error_status_is_reported() {
    let router = Router::new()
        .route(
            "/mobile-auth/v1/auth/token/anonymous",
            post(|| async { Json(json!({"access_token": TOKEN})) }),
        )
        .route(
            "/mobile-services/product/search/v2",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );
    let connector = connector_for(spawn_upstream(router).await);

    let err = connector.search_products("melk", 1, 0).await.unwrap_err();
    assert!(matches!(
        err,
        ConnectorError::UpstreamStatus {
            endpoint: "search",
            status: 503
        }
    ));
}

#[tokio::test]
async fn token_without_access_token_is_auth_error() {
    let router = Router::new().route(
        "/mobile-auth/v1/auth/token/anonymous",
        post(|| async { Json(json!({"expires_in": 10})) }),
    );
    let connector = connector_for(spawn_upstream(router).await);

    let err = connector.get_categories().await.unwrap_err();
    assert!(matches!(err, ConnectorError::Auth(_)));
}

#[tokio::test]
async fn search_endpoint_normalizes_upstream_products() {
    let base_url = spawn_upstream(fake_ah(Seen::default())).await;
    let app = create_router(AppState::new(connector_for(base_url)));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/search?query=melk&size=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body,
        json!({
            "results": [
                {
                    "title": "AH Halfvolle melk",
                    "normal_price": 3.0,
                    "discounted_price": 1.5,
                    "bonus_description": "1 + 1 gratis",
                    "sales_unit_size": "1 l",
                    "unit_price_description": "prijs per liter €3.00",
                    "currency": "EUR",
                    "available_online": true
                },
                {
                    "title": "AH Volkoren brood",
                    "normal_price": 2.0,
                    "discounted_price": 2.0,
                    "bonus_description": null,
                    "sales_unit_size": null,
                    "unit_price_description": null,
                    "currency": "EUR",
                    "available_online": false
                }
            ]
        })
    );
}

#[tokio::test]
async fn unreachable_upstream_yields_generic_500() {
    // Bind and drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let app = create_router(AppState::new(connector_for(format!("http://{}", addr))));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/categories")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body,
        json!({"error": "An error occurred while processing your request"})
    );
}
