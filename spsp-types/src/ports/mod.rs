//! Port traits (interfaces for adapters).
//!
//! These are the contracts the connector adapter must implement.
//! The application layer depends on these traits, not concrete implementations.

mod connector;

pub use connector::{AccountAdminClient, BalanceClient, RouteAdminClient};
