//! Credential handling for authenticated API calls.
//!
//! The API client never reads a global token; it asks an injected
//! [`CredentialProvider`] for the current one on every request.

/// Wrapper for sensitive strings that prevents accidental logging.
///
/// The inner value is never exposed via Debug or Display traits.
/// Use `expose()` to access the actual value when needed for API calls.
#[derive(Clone, PartialEq, Eq)]
pub struct SecureString(String);

impl SecureString {
    /// Create a new secure string.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Expose the inner value.
    ///
    /// Use sparingly and only when actually sending to APIs.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureString(••••••••)")
    }
}

impl std::fmt::Display for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "••••••••")
    }
}

/// Source of the bearer token attached to outgoing requests.
///
/// Called on every request and never cached by the client, so a login or
/// logout takes effect on the next call.
pub trait CredentialProvider: Send + Sync {
    fn token(&self) -> Option<SecureString>;
}

/// Provider with a fixed token (or none), for anonymous clients and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials(Option<SecureString>);

impl StaticCredentials {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        let token = token.into();
        if token.is_empty() {
            return Self(None);
        }
        Self(Some(SecureString::new(token)))
    }
}

impl CredentialProvider for StaticCredentials {
    fn token(&self) -> Option<SecureString> {
        self.0.clone()
    }
}

/// Build the `Authorization` header value for the current credentials.
pub fn bearer_header(provider: &dyn CredentialProvider) -> Option<String> {
    provider
        .token()
        .map(|token| format!("Bearer {}", token.expose()))
}
