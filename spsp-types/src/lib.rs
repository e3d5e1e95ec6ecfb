//! # SPSP Types
//!
//! Domain types and port traits for the SPSP account provisioning service.
//! This crate has ZERO external IO dependencies - only data structures,
//! validation rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Account settings, link configuration, routes, balances, tokens
//! - `ports/` - Connector admin traits that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain, upstream and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    AccountId, AccountRelationship, AccountSettings, AddressPrefix, AssetDescriptor, AuthType,
    ConnectorAccountBalance, CustomSettings, DecodedToken, ILP_OVER_HTTP, OutgoingLinkSettings,
    StaticRoute, TokenClaims, keys,
};
pub use dto::*;
pub use error::{AppError, DomainError, TokenError, UpstreamError};
pub use ports::{AccountAdminClient, BalanceClient, RouteAdminClient};
