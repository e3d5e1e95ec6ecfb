//! Account settings assembly.
//!
//! Turns a partial [`CreateAccountRequest`] into complete, connector-ready
//! [`AccountSettings`]. Pure: no IO, only the request and the static
//! [`ProvisioningConfig`].

use spsp_types::{
    AccountId, AccountRelationship, AccountSettings, AddressPrefix, AssetDescriptor, AuthType,
    CreateAccountRequest, CustomSettings, DomainError, ILP_OVER_HTTP, OutgoingLinkSettings, keys,
};

use crate::credentials::{generate_account_id, generate_token};

/// Account id of the bootstrap peer.
pub const SEED_PEER_ACCOUNT_ID: &str = "rainmaker";
/// Incoming SIMPLE token of the bootstrap peer.
pub const SEED_PEER_AUTH_TOKEN: &str = "password";

/// Service-wide settings, fixed at construction.
#[derive(Debug, Clone)]
pub struct ProvisioningConfig {
    /// Outgoing link defaults merged into every account
    pub link_settings: OutgoingLinkSettings,
    /// Base prefix; each account is routed at `<prefix>.<account id>`
    pub address_prefix: AddressPrefix,
    pub default_asset: AssetDescriptor,
}

/// Settings ready for submission, plus the plaintext incoming credential.
#[derive(Debug, Clone)]
pub struct BuiltAccount {
    pub settings: AccountSettings,
    pub credential: String,
}

/// A creation request with every default applied.
struct ResolvedRequest {
    account_id: AccountId,
    asset: AssetDescriptor,
    relationship: AccountRelationship,
    auth_type: AuthType,
    description: String,
    credential: String,
}

impl ResolvedRequest {
    /// The single place where missing request fields get their fallbacks.
    fn resolve(
        request: Option<CreateAccountRequest>,
        auth_token: Option<String>,
        config: &ProvisioningConfig,
    ) -> Result<Self, DomainError> {
        let request = request.unwrap_or_default();
        let asset = AssetDescriptor::new(
            request
                .asset_code
                .unwrap_or_else(|| config.default_asset.code.clone()),
            request.asset_scale.unwrap_or(config.default_asset.scale),
        )?;

        let account_id = match request.account_id {
            Some(id) => id,
            None => generate_account_id()?,
        };

        Ok(Self {
            account_id,
            asset,
            relationship: request.account_relationship.unwrap_or_default(),
            auth_type: request.auth_type.unwrap_or_default(),
            description: request.description.unwrap_or_default(),
            credential: auth_token.unwrap_or_else(generate_token),
        })
    }
}

/// Encodes the incoming auth configuration for `auth_type`.
fn incoming_auth_settings(
    auth_type: AuthType,
    account_id: &AccountId,
    credential: &str,
) -> CustomSettings {
    let mut settings = CustomSettings::new();
    settings.insert(keys::INCOMING_AUTH_TYPE, auth_type.to_string());
    match auth_type {
        AuthType::Simple => {
            settings.insert(keys::INCOMING_SIMPLE_AUTH_TOKEN, credential);
        }
        AuthType::JwtHs256 => {
            settings.insert(keys::INCOMING_SHARED_SECRET, credential);
            settings.insert(keys::INCOMING_TOKEN_SUBJECT, account_id.as_str());
        }
        AuthType::JwtRs256 => {
            settings.insert(keys::INCOMING_TOKEN_SUBJECT, account_id.as_str());
        }
    }
    settings
}

/// Builds complete account settings from an optional partial request.
///
/// `auth_token` is the caller's credential; when absent one is generated.
/// Either way it is returned as [`BuiltAccount::credential`].
pub fn build_account_settings(
    request: Option<CreateAccountRequest>,
    auth_token: Option<String>,
    config: &ProvisioningConfig,
) -> Result<BuiltAccount, DomainError> {
    if matches!(&auth_token, Some(token) if token.trim().is_empty()) {
        return Err(DomainError::ValidationError(
            "Auth token cannot be empty".into(),
        ));
    }

    let resolved = ResolvedRequest::resolve(request, auth_token, config)?;

    let mut custom_settings =
        incoming_auth_settings(resolved.auth_type, &resolved.account_id, &resolved.credential);
    custom_settings.extend(config.link_settings.to_custom_settings());

    let settings = AccountSettings {
        account_id: resolved.account_id,
        description: resolved.description,
        account_relationship: resolved.relationship,
        asset_code: resolved.asset.code,
        asset_scale: resolved.asset.scale,
        link_type: ILP_OVER_HTTP.to_string(),
        maximum_packet_amount: None,
        custom_settings,
    };

    Ok(BuiltAccount {
        settings,
        credential: resolved.credential,
    })
}

/// Settings of the well-known bootstrap peer.
pub fn seed_peer_settings(config: &ProvisioningConfig) -> Result<AccountSettings, DomainError> {
    let account_id = AccountId::new(SEED_PEER_ACCOUNT_ID)?;
    let mut custom_settings =
        incoming_auth_settings(AuthType::Simple, &account_id, SEED_PEER_AUTH_TOKEN);
    custom_settings.extend(config.link_settings.to_custom_settings());

    let asset = AssetDescriptor::xrp();
    Ok(AccountSettings {
        account_id,
        description: String::new(),
        account_relationship: AccountRelationship::Peer,
        asset_code: asset.code,
        asset_scale: asset.scale,
        link_type: ILP_OVER_HTTP.to_string(),
        maximum_packet_amount: None,
        custom_settings,
    })
}
