//! SPSP CLI
//!
//! Operator tool that provisions accounts directly against the connector.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use connector_client::ConnectorClient;
use spsp_hex::{NewAccountService, ProvisioningConfig, inspect_bearer_token};
use spsp_types::{
    AccountId, AccountRelationship, AddressPrefix, AssetDescriptor, AuthType, BalanceClient,
    CreateAccountRequest, OutgoingLinkSettings,
};

#[derive(Parser)]
#[command(name = "spsp")]
#[command(author, version, about = "SPSP account provisioning CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ConnectorArgs {
    /// Base URL of the connector admin API
    #[arg(long, env = "CONNECTOR_URL", default_value = "http://localhost:8080")]
    connector_url: String,

    #[arg(long, env = "CONNECTOR_ADMIN_USERNAME", default_value = "admin")]
    admin_username: String,

    #[arg(long, env = "CONNECTOR_ADMIN_PASSWORD", default_value = "")]
    admin_password: String,

    /// Base address prefix for account routes
    #[arg(long, env = "SPSP_ADDRESS_PREFIX", default_value = "test.spsp")]
    address_prefix: AddressPrefix,

    #[arg(long, env = "DEFAULT_ASSET_CODE", default_value = "XRP")]
    default_asset_code: String,

    #[arg(long, env = "DEFAULT_ASSET_SCALE", default_value_t = 9)]
    default_asset_scale: u8,

    /// Outgoing ILP-over-HTTP endpoint given to every account
    #[arg(long, env = "SPSP_OUTGOING_URL")]
    outgoing_url: String,

    #[arg(long, env = "SPSP_OUTGOING_AUTH_TYPE", default_value = "SIMPLE")]
    outgoing_auth_type: AuthType,

    #[arg(long, env = "SPSP_OUTGOING_SIMPLE_AUTH_TOKEN")]
    outgoing_simple_auth_token: Option<String>,

    #[arg(long, env = "SPSP_OUTGOING_SHARED_SECRET")]
    outgoing_shared_secret: Option<String>,

    #[arg(long, env = "SPSP_OUTGOING_TOKEN_SUBJECT")]
    outgoing_token_subject: Option<String>,

    #[arg(long, env = "SPSP_OUTGOING_TOKEN_ISSUER")]
    outgoing_token_issuer: Option<String>,

    #[arg(long, env = "SPSP_OUTGOING_TOKEN_AUDIENCE")]
    outgoing_token_audience: Option<String>,

    /// ISO-8601 duration, e.g. PT2H
    #[arg(long, env = "SPSP_OUTGOING_TOKEN_EXPIRY")]
    outgoing_token_expiry: Option<String>,
}

impl ConnectorArgs {
    fn client(&self) -> Result<ConnectorClient> {
        Ok(ConnectorClient::new(
            &self.connector_url,
            &self.admin_username,
            &self.admin_password,
        )?)
    }

    fn provisioning(&self) -> Result<ProvisioningConfig> {
        if self.outgoing_url.trim().is_empty() {
            anyhow::bail!("SPSP_OUTGOING_URL cannot be empty");
        }

        Ok(ProvisioningConfig {
            link_settings: OutgoingLinkSettings {
                auth_type: self.outgoing_auth_type,
                url: self.outgoing_url.clone(),
                simple_auth_token: self.outgoing_simple_auth_token.clone(),
                shared_secret: self.outgoing_shared_secret.clone(),
                token_subject: self.outgoing_token_subject.clone(),
                token_issuer: self.outgoing_token_issuer.clone(),
                token_audience: self.outgoing_token_audience.clone(),
                token_expiry: self.outgoing_token_expiry.clone(),
            },
            address_prefix: self.address_prefix.clone(),
            default_asset: AssetDescriptor::new(
                &self.default_asset_code,
                self.default_asset_scale,
            )?,
        })
    }

    fn service(&self) -> Result<NewAccountService<ConnectorClient, ConnectorClient>> {
        let client = self.client()?;
        Ok(NewAccountService::new(
            client.clone(),
            client,
            self.provisioning()?,
        ))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Account operations
    Account {
        #[command(flatten)]
        connector: ConnectorArgs,
        #[command(subcommand)]
        action: AccountCommands,
    },
    /// Bearer token operations
    Token {
        #[command(subcommand)]
        action: TokenCommands,
    },
}

#[derive(Subcommand)]
enum AccountCommands {
    /// Create a new account; omitted fields use the service defaults
    Create {
        #[arg(long)]
        account_id: Option<AccountId>,
        #[arg(long)]
        asset_code: Option<String>,
        #[arg(long)]
        asset_scale: Option<u8>,
        /// PEER, CHILD or PARENT
        #[arg(long)]
        relationship: Option<AccountRelationship>,
        /// SIMPLE, JWT_HS_256 or JWT_RS_256
        #[arg(long)]
        auth_type: Option<AuthType>,
        /// Incoming credential; generated when omitted
        #[arg(long)]
        auth_token: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Create the bootstrap peer account
    Rainmaker,
    /// Show an account's balance
    Balance {
        /// Account ID
        id: AccountId,
        /// Bearer token of the account
        #[arg(long)]
        token: String,
    },
}

#[derive(Subcommand)]
enum TokenCommands {
    /// Decode an Authorization header value
    Inspect {
        /// e.g. "Bearer eyJ..."
        header: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Account { connector, action } => match action {
            AccountCommands::Create {
                account_id,
                asset_code,
                asset_scale,
                relationship,
                auth_type,
                auth_token,
                description,
            } => {
                let request = CreateAccountRequest {
                    account_id,
                    asset_code,
                    asset_scale,
                    account_relationship: relationship,
                    auth_type,
                    description,
                };
                let account = connector
                    .service()?
                    .create_account_from_request(auth_token, Some(request))
                    .await?;
                println!("{}", serde_json::to_string_pretty(&account)?);
            }
            AccountCommands::Rainmaker => {
                let account = connector.service()?.create_seed_peer_account().await?;
                println!("{}", serde_json::to_string_pretty(&account)?);
            }
            AccountCommands::Balance { id, token } => {
                let balance = connector.client()?.get_balance(&id, &token).await?;
                println!("{}", serde_json::to_string_pretty(&balance)?);
            }
        },

        Commands::Token { action } => match action {
            TokenCommands::Inspect { header } => {
                match inspect_bearer_token(&header, chrono::Utc::now())? {
                    Some(decoded) => println!("{}", serde_json::to_string_pretty(&decoded)?),
                    None => println!(
                        "{}",
                        serde_json::to_string_pretty(&serde_json::json!({ "type": "SIMPLE" }))?
                    ),
                }
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use spsp_types::keys;

    fn connector_args(extra: &[&str]) -> Result<ConnectorArgs, clap::Error> {
        let mut argv = vec!["spsp", "account"];
        argv.extend_from_slice(extra);
        argv.push("rainmaker");
        match Cli::try_parse_from(argv)?.command {
            Commands::Account { connector, .. } => Ok(connector),
            Commands::Token { .. } => unreachable!(),
        }
    }

    #[test]
    fn test_outgoing_jwt_settings_reach_accounts() {
        let args = connector_args(&[
            "--outgoing-url",
            "https://spsp.example/ilp",
            "--outgoing-auth-type",
            "JWT_HS_256",
            "--outgoing-shared-secret",
            "shh",
            "--outgoing-token-subject",
            "spsp",
            "--outgoing-token-issuer",
            "https://issuer.example",
            "--outgoing-token-audience",
            "https://connector.example",
            "--outgoing-token-expiry",
            "PT2H",
        ])
        .unwrap();

        let custom = args.provisioning().unwrap().link_settings.to_custom_settings();
        assert_eq!(custom.get_str(keys::OUTGOING_AUTH_TYPE), Some("JWT_HS_256"));
        assert_eq!(
            custom.get_str(keys::OUTGOING_TOKEN_ISSUER),
            Some("https://issuer.example")
        );
        assert_eq!(
            custom.get_str(keys::OUTGOING_TOKEN_AUDIENCE),
            Some("https://connector.example")
        );
        assert_eq!(custom.get_str(keys::OUTGOING_TOKEN_EXPIRY), Some("PT2H"));
        assert_eq!(
            custom.get_str(keys::OUTGOING_URL),
            Some("https://spsp.example/ilp")
        );
    }

    #[test]
    fn test_blank_outgoing_url_rejected() {
        let args = connector_args(&["--outgoing-url", "  "]).unwrap();
        assert!(args.provisioning().is_err());
    }

    #[test]
    fn test_defaults() {
        let args = connector_args(&["--outgoing-url", "https://spsp.example/ilp"]).unwrap();
        let config = args.provisioning().unwrap();
        assert_eq!(config.address_prefix.as_str(), "test.spsp");
        assert_eq!(config.default_asset, AssetDescriptor::xrp());
        assert_eq!(config.link_settings.auth_type, AuthType::Simple);
        assert!(config.link_settings.token_expiry.is_none());
    }
}
