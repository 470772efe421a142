//! Keychain operations for the session token
//!
//! Uses the system keyring (macOS Keychain, Secret Service on Linux) through
//! the keyring crate. Writing an entry replaces any previous value.

use crate::error::{BwAuthError, KeyringError};
use keyring::Entry;
use tracing::debug;

/// Store a secret, overwriting any existing value for `(service, account)`
pub fn store_secret(service: &str, account: &str, secret: &str) -> Result<(), BwAuthError> {
    let entry = Entry::new(service, account).map_err(|e| {
        debug!("Keychain entry for {}/{} unavailable: {}", service, account, e);
        BwAuthError::Keyring(KeyringError::ServiceUnavailable)
    })?;

    entry.set_password(secret).map_err(|e| {
        BwAuthError::Keyring(KeyringError::StoreFailed {
            reason: e.to_string(),
        })
    })
}
