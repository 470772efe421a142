//! Mock keyring implementation for testing
//!
//! Provides an in-memory keyring that doesn't require system keychain
//! access. Used in unit tests and, via the `mock-keyring` feature, in CI.

use crate::error::{BwAuthError, KeyringError};
use std::collections::HashMap;
use std::sync::Mutex;

lazy_static::lazy_static! {
    static ref MOCK_KEYRING: Mutex<HashMap<String, String>> = Mutex::new(HashMap::new());
}

fn make_key(service: &str, account: &str) -> String {
    format!("{}:{}", service, account)
}

/// Store a secret in the mock keyring, overwriting any previous value
pub fn store_secret(service: &str, account: &str, secret: &str) -> Result<(), BwAuthError> {
    let mut keyring = MOCK_KEYRING
        .lock()
        .map_err(|_| BwAuthError::Keyring(KeyringError::ServiceUnavailable))?;
    keyring.insert(make_key(service, account), secret.to_string());
    Ok(())
}

/// Retrieve a secret from the mock keyring
///
/// Lets tests inspect what the flow wrote.
pub fn retrieve_secret(service: &str, account: &str) -> Result<String, BwAuthError> {
    let keyring = MOCK_KEYRING
        .lock()
        .map_err(|_| BwAuthError::Keyring(KeyringError::RetrieveFailed))?;
    keyring
        .get(&make_key(service, account))
        .cloned()
        .ok_or(BwAuthError::Keyring(KeyringError::NotFound))
}

/// Delete a secret from the mock keyring
pub fn delete_secret(service: &str, account: &str) -> Result<(), BwAuthError> {
    let mut keyring = MOCK_KEYRING
        .lock()
        .map_err(|_| BwAuthError::Keyring(KeyringError::ServiceUnavailable))?;
    keyring.remove(&make_key(service, account));
    Ok(())
}
