//! Default credential and identifier generation.
//!
//! These values are convenience defaults for callers that do not bring their
//! own. They come from the thread-local RNG and are fine as initial SIMPLE
//! tokens, but this is not a secret-management primitive.

use rand::Rng;
use rand::distr::Alphanumeric;

use spsp_types::{AccountId, DomainError};

/// Length of generated tokens and of the random part of account ids.
pub const GENERATED_LEN: usize = 13;

/// Prefix marking account ids chosen by the service rather than the caller.
pub const GENERATED_ACCOUNT_PREFIX: &str = "user_";

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generates an opaque SIMPLE auth token.
pub fn generate_token() -> String {
    random_alphanumeric(GENERATED_LEN)
}

/// Generates an account id of the form `user_<13 alphanumerics>`.
pub fn generate_account_id() -> Result<AccountId, DomainError> {
    AccountId::new(format!(
        "{}{}",
        GENERATED_ACCOUNT_PREFIX,
        random_alphanumeric(GENERATED_LEN)
    ))
}
