//! # Connector Client
//!
//! A typed client for the connector's admin API. Implements the
//! provisioning ports so it can be injected into `NewAccountService`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use spsp_types::{
    AccountAdminClient, AccountId, AccountSettings, AddressPrefix, BalanceClient,
    ConnectorAccountBalance, RouteAdminClient, StaticRoute, UpstreamError,
};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connector admin API client.
#[derive(Clone)]
pub struct ConnectorClient {
    base_url: String,
    username: String,
    password: String,
    http: Client,
}

impl ConnectorClient {
    /// Creates a new client authenticating admin calls with HTTP basic auth.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, UpstreamError> {
        Self::with_timeout(base_url, username, password, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn admin(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.basic_auth(&self.username, Some(&self.password))
    }

    async fn send(&self, req: RequestBuilder) -> Result<reqwest::Response, UpstreamError> {
        let resp = req
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = error_message(&body);
        Err(match status.as_u16() {
            404 => UpstreamError::NotFound(message),
            409 => UpstreamError::Conflict(message),
            code => UpstreamError::Rejected {
                status: code,
                message,
            },
        })
    }

    async fn json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, UpstreamError> {
        let body = resp
            .text()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

/// Pulls a readable message out of a problem-details style error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["title", "detail", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(|m| m.as_str()).map(String::from))
        })
        .unwrap_or_else(|| body.to_string())
}

#[async_trait]
impl AccountAdminClient for ConnectorClient {
    async fn create_account(
        &self,
        settings: &AccountSettings,
    ) -> Result<AccountSettings, UpstreamError> {
        tracing::debug!(account_id = %settings.account_id, "Submitting account to connector");
        let req = self
            .admin(self.http.post(format!("{}/accounts", self.base_url)))
            .json(settings);
        let resp = self.send(req).await?;
        Self::json(resp).await
    }
}

#[async_trait]
impl RouteAdminClient for ConnectorClient {
    async fn create_static_route(
        &self,
        prefix: &AddressPrefix,
        route: &StaticRoute,
    ) -> Result<(), UpstreamError> {
        let req = self
            .admin(
                self.http
                    .put(format!("{}/routes/static/{}", self.base_url, prefix)),
            )
            .json(route);
        self.send(req).await?;
        Ok(())
    }
}

#[async_trait]
impl BalanceClient for ConnectorClient {
    async fn get_balance(
        &self,
        account_id: &AccountId,
        bearer_token: &str,
    ) -> Result<ConnectorAccountBalance, UpstreamError> {
        let req = self
            .http
            .get(format!("{}/accounts/{}/balance", self.base_url, account_id))
            .bearer_auth(bearer_token);
        let resp = self.send(req).await?;
        Self::json(resp).await
    }
}
