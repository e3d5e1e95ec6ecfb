//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use spsp_types::domain::{
    AccountId, AccountRelationship, AccountSettings, AddressPrefix, AssetDescriptor, AuthType,
    ConnectorAccountBalance, StaticRoute,
};
use spsp_types::dto::{CreateAccountRequest, ErrorResponse};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};

// Dummy functions to generate path documentation
// These are not the actual handlers, just for OpenAPI path generation

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = inline(serde_json::Value), example = json!({"status": "healthy"}))
    )
)]
async fn health() {}

/// Create an account
///
/// The body is optional. When the Authorization header carries an opaque
/// token it becomes the account's SIMPLE credential; otherwise one is
/// generated and returned in plaintext.
#[utoipa::path(
    post,
    path = "/accounts",
    tag = "accounts",
    request_body = CreateAccountRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Account created", body = AccountSettings),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Bearer JWT is expired", body = ErrorResponse),
        (status = 409, description = "Account already exists", body = ErrorResponse),
        (status = 502, description = "Connector unavailable", body = ErrorResponse)
    )
)]
async fn create_account() {}

/// Create the bootstrap peer account
#[utoipa::path(
    post,
    path = "/accounts/rainmaker",
    tag = "accounts",
    responses(
        (status = 201, description = "Seed peer created", body = AccountSettings),
        (status = 409, description = "Seed peer already exists", body = ErrorResponse)
    )
)]
async fn create_rainmaker() {}

/// Get an account's connector balance
#[utoipa::path(
    get,
    path = "/accounts/{id}/balance",
    tag = "accounts",
    security(("bearer_auth" = [])),
    params(
        ("id" = String, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Balance snapshot", body = ConnectorAccountBalance),
        (status = 401, description = "Missing or expired bearer token", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse)
    )
)]
async fn get_balance() {}

/// OpenAPI documentation for the provisioning API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SPSP Account Provisioning API",
        version = "1.0.0",
        description = "Creates ILP-over-HTTP accounts on an upstream connector and registers their routes.\n\n## Authentication\n\nBearer tokens are either JWTs (decoded and expiry-checked) or opaque SIMPLE tokens:\n\n```\nAuthorization: Bearer <token>\n```",
        license(name = "MIT"),
    ),
    paths(health, create_account, create_rainmaker, get_balance),
    components(
        schemas(
            CreateAccountRequest,
            AccountSettings,
            AccountId,
            AccountRelationship,
            AssetDescriptor,
            AuthType,
            AddressPrefix,
            StaticRoute,
            ConnectorAccountBalance,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "accounts", description = "Account provisioning operations"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for Bearer token authentication.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_account_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/accounts"));
        assert!(doc.paths.paths.contains_key("/accounts/{id}/balance"));
    }
}
