//! Domain models for the provisioning service.

pub mod account;
pub mod asset;
pub mod balance;
pub mod link;
pub mod route;
pub mod token;

pub use account::{AccountId, AccountRelationship, AccountSettings, ILP_OVER_HTTP};
pub use asset::AssetDescriptor;
pub use balance::ConnectorAccountBalance;
pub use link::{AuthType, CustomSettings, OutgoingLinkSettings, keys};
pub use route::{AddressPrefix, StaticRoute};
pub use token::{Audience, DecodedToken, TokenClaims};
