//! Credential store seam used by the authentication flow

use crate::auth::keyring;
use crate::error::BwAuthError;
use crate::types::{SessionToken, TOKEN_ACCOUNT};
use tracing::info;

/// Persists secrets in an OS-managed store
pub trait CredentialStore {
    /// Write `secret` for `(service, account)`, replacing any previous value
    fn store(&self, service: &str, account: &str, secret: &str) -> Result<(), BwAuthError>;
}

/// The system keychain
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemKeyring;

impl CredentialStore for SystemKeyring {
    fn store(&self, service: &str, account: &str, secret: &str) -> Result<(), BwAuthError> {
        keyring::store_secret(service, account, secret)
    }
}

/// Store the session token under the `token` account of `service`
pub fn store_token<S: CredentialStore + ?Sized>(
    store: &S,
    service: &str,
    token: &SessionToken,
) -> Result<(), BwAuthError> {
    store.store(service, TOKEN_ACCOUNT, token.expose())?;
    info!("Stored session token in keychain service {}", service);
    Ok(())
}
