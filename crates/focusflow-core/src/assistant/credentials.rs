//! OS keyring access for the Gemini API key.

use crate::error::AssistantError;

const SERVICE: &str = "focusflow";
const API_KEY_ENTRY: &str = "gemini_api_key";

/// Environment variable consulted when no key is configured.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

pub fn get(key: &str) -> Result<Option<String>, AssistantError> {
    let entry = keyring::Entry::new(SERVICE, key)?;
    match entry.get_password() {
        Ok(pw) => Ok(Some(pw)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn set(key: &str, value: &str) -> Result<(), AssistantError> {
    let entry = keyring::Entry::new(SERVICE, key)?;
    entry.set_password(value)?;
    Ok(())
}

pub fn delete(key: &str) -> Result<(), AssistantError> {
    let entry = keyring::Entry::new(SERVICE, key)?;
    match entry.delete_credential() {
        Ok(()) => Ok(()),
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Persist the API key in the OS keyring.
pub fn store_api_key(value: &str) -> Result<(), AssistantError> {
    set(API_KEY_ENTRY, value)
}

pub fn clear_api_key() -> Result<(), AssistantError> {
    delete(API_KEY_ENTRY)
}

/// Find the API key: configured value, then `GEMINI_API_KEY`, then the keyring.
pub fn resolve_api_key(configured: &str) -> Result<String, AssistantError> {
    pick_api_key(configured, std::env::var(API_KEY_ENV).ok(), || {
        get(API_KEY_ENTRY).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "keyring unavailable");
            None
        })
    })
}

fn pick_api_key(
    configured: &str,
    env: Option<String>,
    keyring: impl FnOnce() -> Option<String>,
) -> Result<String, AssistantError> {
    let non_empty = |s: String| {
        let s = s.trim().to_string();
        (!s.is_empty()).then_some(s)
    };
    non_empty(configured.to_string())
        .or_else(|| env.and_then(non_empty))
        .or_else(|| keyring().and_then(non_empty))
        .ok_or(AssistantError::MissingApiKey)
}
