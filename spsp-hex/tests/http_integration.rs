//! Integration tests for the HTTP adapter.
//!
//! These drive the full router (rate limiting, caller extraction, handlers,
//! error mapping) against an in-memory connector.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Method, Request, StatusCode},
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use http_body_util::BodyExt;
use num_bigint::BigInt;
use tower::ServiceExt;

use spsp_hex::{NewAccountService, ProvisioningConfig, inbound::HttpServer};
use spsp_types::{
    AccountAdminClient, AccountId, AccountSettings, AddressPrefix, AssetDescriptor, AuthType,
    BalanceClient, ConnectorAccountBalance, OutgoingLinkSettings, RouteAdminClient, StaticRoute,
    UpstreamError, keys,
};

#[derive(Clone, Default)]
struct FakeConnector {
    accounts: Arc<Mutex<Vec<AccountSettings>>>,
    routes: Arc<Mutex<Vec<StaticRoute>>>,
    balance_tokens: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl AccountAdminClient for FakeConnector {
    async fn create_account(
        &self,
        settings: &AccountSettings,
    ) -> Result<AccountSettings, UpstreamError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|a| a.account_id == settings.account_id) {
            return Err(UpstreamError::Conflict(format!(
                "Account already exists: {}",
                settings.account_id
            )));
        }
        accounts.push(settings.clone());

        let mut echoed = settings.clone();
        if echoed
            .custom_settings
            .contains_key(keys::INCOMING_SIMPLE_AUTH_TOKEN)
        {
            echoed.custom_settings = echoed
                .custom_settings
                .with_replaced(keys::INCOMING_SIMPLE_AUTH_TOKEN, "enc:gcm:opaque")
                .unwrap();
        }
        Ok(echoed)
    }
}

#[async_trait]
impl RouteAdminClient for FakeConnector {
    async fn create_static_route(
        &self,
        _prefix: &AddressPrefix,
        route: &StaticRoute,
    ) -> Result<(), UpstreamError> {
        self.routes.lock().unwrap().push(route.clone());
        Ok(())
    }
}

#[async_trait]
impl BalanceClient for FakeConnector {
    async fn get_balance(
        &self,
        account_id: &AccountId,
        bearer_token: &str,
    ) -> Result<ConnectorAccountBalance, UpstreamError> {
        self.balance_tokens
            .lock()
            .unwrap()
            .push(bearer_token.to_string());
        if account_id.as_str() == "missing" {
            return Err(UpstreamError::NotFound(account_id.to_string()));
        }
        Ok(ConnectorAccountBalance::new(
            account_id.clone(),
            AssetDescriptor::xrp(),
            BigInt::from(-250),
            1000,
        ))
    }
}

fn config() -> ProvisioningConfig {
    ProvisioningConfig {
        link_settings: OutgoingLinkSettings {
            auth_type: AuthType::Simple,
            url: "https://connector.example/accounts/spsp/ilp".into(),
            simple_auth_token: Some("outgoing".into()),
            ..Default::default()
        },
        address_prefix: AddressPrefix::new("test.spsp").unwrap(),
        default_asset: AssetDescriptor::xrp(),
    }
}

fn server(connector: &FakeConnector, requests_per_minute: u32) -> axum::Router {
    let service = NewAccountService::new(connector.clone(), connector.clone(), config());
    HttpServer::with_rate_limit(service, connector.clone(), requests_per_minute).router()
}

fn jwt(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"alice","exp":{}}}"#, exp));
    format!("{}.{}.sig", header, payload)
}

fn create_request(auth: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/accounts")
        .header("Content-Type", "application/json");
    if let Some(auth) = auth {
        builder = builder.header("Authorization", auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = server(&FakeConnector::default(), 100);
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_create_account_without_body_generates_everything() {
    let connector = FakeConnector::default();
    let app = server(&connector, 100);

    let response = app.oneshot(create_request(None, "")).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;
    let submitted = connector.accounts.lock().unwrap()[0].clone();
    let token = submitted.incoming_simple_auth_token().unwrap().to_string();

    assert!(json["accountId"].as_str().unwrap().starts_with("user_"));
    assert_eq!(
        json["customSettings"][keys::INCOMING_SIMPLE_AUTH_TOKEN],
        token.as_str()
    );
    assert_eq!(connector.routes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_opaque_bearer_becomes_account_token() {
    let connector = FakeConnector::default();
    let app = server(&connector, 100);

    let response = app
        .oneshot(create_request(
            Some("Bearer callerSecret42"),
            r#"{"accountId":"alice","assetCode":"USD","assetScale":2}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;
    assert_eq!(json["accountId"], "alice");
    assert_eq!(json["assetCode"], "USD");
    assert_eq!(
        json["customSettings"][keys::INCOMING_SIMPLE_AUTH_TOKEN],
        "callerSecret42"
    );

    let routes = connector.routes.lock().unwrap();
    assert_eq!(routes[0].route_prefix.as_str(), "test.spsp.alice");
}

#[tokio::test]
async fn test_expired_jwt_is_rejected_before_creation() {
    let connector = FakeConnector::default();
    let app = server(&connector, 100);
    let expired = chrono::Utc::now().timestamp() - 3600;

    let response = app
        .oneshot(create_request(Some(&format!("Bearer {}", jwt(expired))), ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"], "JWT is expired");
    assert!(connector.accounts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_account_is_conflict() {
    let connector = FakeConnector::default();
    let app = server(&connector, 100);
    let body = r#"{"accountId":"dup"}"#;

    let first = app.clone().oneshot(create_request(None, body)).await.unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app.oneshot(create_request(None, body)).await.unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(connector.routes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_body_is_bad_request() {
    let app = server(&FakeConnector::default(), 100);
    let response = app
        .oneshot(create_request(None, r#"{"accountId":"not valid"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rainmaker() {
    let connector = FakeConnector::default();
    let app = server(&connector, 100);

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/accounts/rainmaker")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = json_body(response).await;
    assert_eq!(json["accountId"], "rainmaker");
    assert_eq!(json["accountRelationship"], "PEER");
    assert_eq!(json["assetScale"], 9);
    assert_eq!(
        json["customSettings"][keys::INCOMING_SIMPLE_AUTH_TOKEN],
        "password"
    );
}

#[tokio::test]
async fn test_balance_forwards_bearer() {
    let connector = FakeConnector::default();
    let app = server(&connector, 100);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/accounts/alice/balance")
                .header("Authorization", "Bearer alicesToken")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["netBalance"], "750");
    assert_eq!(json["clearingBalance"], "-250");
    assert_eq!(json["prepaidAmount"], 1000);
    assert_eq!(connector.balance_tokens.lock().unwrap()[0], "alicesToken");
}

#[tokio::test]
async fn test_balance_requires_bearer() {
    let app = server(&FakeConnector::default(), 100);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/accounts/alice/balance")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_balance_not_found() {
    let app = server(&FakeConnector::default(), 100);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/accounts/missing/balance")
                .header("Authorization", "Bearer t")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

fn from_peer(mut request: Request<Body>, peer: [u8; 4]) -> Request<Body> {
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from((peer, 40000))));
    request
}

#[tokio::test]
async fn test_rotating_bearer_tokens_does_not_escape_rate_limit() {
    let app = server(&FakeConnector::default(), 2);

    for i in 1..=2 {
        let auth = format!("Bearer rotating-{}", i);
        let response = app
            .clone()
            .oneshot(from_peer(create_request(Some(&auth), ""), [192, 0, 2, 1]))
            .await
            .unwrap();
        assert_ne!(
            response.status(),
            StatusCode::TOO_MANY_REQUESTS,
            "Request {} should not be rate limited",
            i
        );
    }

    let response = app
        .clone()
        .oneshot(from_peer(
            create_request(Some("Bearer rotating-3"), ""),
            [192, 0, 2, 1],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(json_body(response).await["retry_after_seconds"], 60);

    // Another client still has its own budget
    let response = app
        .clone()
        .oneshot(from_peer(create_request(None, ""), [192, 0, 2, 2]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Health is never throttled
    let response = app
        .oneshot(from_peer(
            Request::builder().uri("/health").body(Body::empty()).unwrap(),
            [192, 0, 2, 1],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_requests_without_peer_share_one_bucket() {
    let app = server(&FakeConnector::default(), 1);

    let first = app
        .clone()
        .oneshot(create_request(Some("Bearer one"), ""))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(create_request(Some("Bearer two"), ""))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = server(&FakeConnector::default(), 100);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(json_body(response).await["paths"]["/accounts"].is_object());
}
