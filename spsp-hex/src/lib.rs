//! # SPSP Hex
//!
//! Account provisioning service and HTTP adapter.
//!
//! ## Architecture
//!
//! - `credentials` - Default token and account id generation
//! - `settings` - Builds connector-ready account settings from partial requests
//! - `service` - Provisioning orchestration (create, route, reconcile)
//! - `token` - Bearer token inspection
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over the connector admin ports, allowing
//! different client implementations to be injected.

pub mod credentials;
pub mod inbound;
pub mod openapi;
pub mod service;
pub mod settings;
pub mod token;


pub use service::{NewAccountService, reconcile_simple_auth_token};
pub use settings::{BuiltAccount, ProvisioningConfig, build_account_settings};
pub use token::inspect_bearer_token;

use spsp_types::{AccountAdminClient, BalanceClient, RouteAdminClient};

/// Everything the HTTP adapter needs from the connector.
pub trait Connector: AccountAdminClient + RouteAdminClient + BalanceClient {}

impl<T: AccountAdminClient + RouteAdminClient + BalanceClient> Connector for T {}
