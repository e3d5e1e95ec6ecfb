//! Account Provisioning Service
//!
//! Orchestrates account creation on the connector through the admin ports.
//! Contains NO infrastructure logic - pure business orchestration.

use spsp_types::{
    AccountAdminClient, AccountSettings, AppError, AuthType, CreateAccountRequest,
    CustomSettings, DomainError, RouteAdminClient, StaticRoute, keys,
};

use crate::settings::{ProvisioningConfig, build_account_settings, seed_peer_settings};

/// Replaces the connector's stored form of the incoming SIMPLE token with the
/// plaintext the account was created with.
///
/// Every other entry is copied unchanged; the key must already be present.
pub fn reconcile_simple_auth_token(
    returned: &CustomSettings,
    plaintext: &str,
) -> Result<CustomSettings, DomainError> {
    returned.with_replaced(keys::INCOMING_SIMPLE_AUTH_TOKEN, plaintext)
}

/// Application service that provisions accounts on the connector.
///
/// Generic over the two admin ports so either can be swapped or mocked.
/// Holds only immutable configuration and is safe to share across requests.
pub struct NewAccountService<A: AccountAdminClient, R: RouteAdminClient> {
    admin: A,
    routes: R,
    config: ProvisioningConfig,
}

impl<A: AccountAdminClient, R: RouteAdminClient> NewAccountService<A, R> {
    /// Creates a new provisioning service.
    pub fn new(admin: A, routes: R, config: ProvisioningConfig) -> Self {
        Self {
            admin,
            routes,
            config,
        }
    }

    /// Returns the static configuration.
    pub fn config(&self) -> &ProvisioningConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Entry points
    // ─────────────────────────────────────────────────────────────────────────────

    /// Creates an account from a partial request.
    ///
    /// Missing fields come from the service defaults; a missing `auth_token`
    /// is generated and returned to the caller in plaintext.
    pub async fn create_account_from_request(
        &self,
        auth_token: Option<String>,
        request: Option<CreateAccountRequest>,
    ) -> Result<AccountSettings, AppError> {
        let built = build_account_settings(request, auth_token, &self.config)?;
        self.create_account(built.settings).await
    }

    /// Creates the well-known bootstrap peer account.
    ///
    /// Every call is a fresh creation attempt against the connector.
    pub async fn create_seed_peer_account(&self) -> Result<AccountSettings, AppError> {
        self.create_account(seed_peer_settings(&self.config)?).await
    }

    /// Creates an account from complete settings.
    ///
    /// 1. Submits the settings to the connector; failures are returned as-is.
    /// 2. Registers a static route to the new account; failures are logged.
    /// 3. For SIMPLE accounts, puts the plaintext token back into the result.
    pub async fn create_account(
        &self,
        settings: AccountSettings,
    ) -> Result<AccountSettings, AppError> {
        let plaintext = match settings.incoming_auth_type() {
            Some(AuthType::Simple) => Some(
                settings
                    .incoming_simple_auth_token()
                    .map(str::to_string)
                    .ok_or_else(|| {
                        AppError::BadRequest("SIMPLE auth requires an incoming auth token".into())
                    })?,
            ),
            _ => None,
        };

        let created = self.admin.create_account(&settings).await?;
        tracing::info!(account_id = %created.account_id, "Account created successfully");

        self.register_route(&created).await;

        match plaintext {
            Some(token) => {
                let custom = reconcile_simple_auth_token(&created.custom_settings, &token)
                    .map_err(|e| {
                        tracing::error!(
                            account_id = %created.account_id,
                            "Connector response is missing the incoming auth token: {}",
                            e
                        );
                        AppError::from(e)
                    })?;
                Ok(created.with_custom_settings(custom))
            }
            None => Ok(created),
        }
    }

    /// Routes `<prefix>.<account id>` to the account. Never fails the caller.
    async fn register_route(&self, account: &AccountSettings) {
        let route = StaticRoute::to_account(&self.config.address_prefix, &account.account_id);
        match self
            .routes
            .create_static_route(&route.route_prefix, &route)
            .await
        {
            Ok(()) => {
                tracing::debug!(route_prefix = %route.route_prefix, "Static route registered")
            }
            Err(e) => tracing::warn!(
                account_id = %account.account_id,
                route_prefix = %route.route_prefix,
                "Failed to create route: {}",
                e
            ),
        }
    }
}
