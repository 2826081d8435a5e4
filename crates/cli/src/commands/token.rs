//! Mint a bearer token for manual testing.
//!
//! ```bash
//! TOKEN=$(cm-cli token)
//! curl -H "Authorization: Bearer $TOKEN" localhost:8000/api/v1/cart
//! ```

use cloudmart_api::config::ApiConfig;
use cloudmart_api::services::token::TokenService;

use super::CommandError;

/// Print a token for `username` to stdout.
///
/// # Errors
///
/// Returns `CommandError::Config` if configuration is invalid and
/// `CommandError::Token` if signing fails.
pub fn run(username: &str) -> Result<(), CommandError> {
    let config = ApiConfig::from_env()?;
    if let Some(warning) = config.token.secret_warning() {
        tracing::warn!("{warning}");
    }

    let tokens = TokenService::new(&config.token);
    let token = tokens.issue(username)?;

    tracing::info!(
        username,
        ttl_minutes = tokens.ttl().num_minutes(),
        "Issued token"
    );

    #[allow(clippy::print_stdout)]
    {
        println!("{token}");
    }

    Ok(())
}
