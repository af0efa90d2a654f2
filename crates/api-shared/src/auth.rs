//! Bearer-token authentication shared by API surfaces.
//!
//! Tokens are configured at startup as `token=userId` pairs; a request is authenticated when it
//! presents one of the configured tokens, and acts as the mapped user.

use std::collections::HashMap;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing credentials")]
    MissingCredentials,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("malformed token entry '{0}' (expected token=userId)")]
    MalformedEntry(String),
    #[error("no API tokens configured")]
    NoTokens,
}

/// The user a request acts as once authenticated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

/// Known API tokens and the users they authenticate.
#[derive(Clone, Debug, Default)]
pub struct TokenRegistry {
    tokens: HashMap<String, String>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a comma-separated list of `token=userId` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MalformedEntry`] for an entry without `=` or with an empty side, and
    /// [`AuthError::NoTokens`] if the value holds no entries at all.
    pub fn from_env_value(value: &str) -> Result<Self, AuthError> {
        let mut registry = Self::new();
        for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (token, user_id) = entry
                .split_once('=')
                .map(|(t, u)| (t.trim(), u.trim()))
                .filter(|(t, u)| !t.is_empty() && !u.is_empty())
                .ok_or_else(|| AuthError::MalformedEntry(entry.to_string()))?;
            registry.insert(token, user_id);
        }

        if registry.is_empty() {
            return Err(AuthError::NoTokens);
        }
        Ok(registry)
    }

    pub fn insert(&mut self, token: impl Into<String>, user_id: impl Into<String>) {
        self.tokens.insert(token.into(), user_id.into());
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Resolves a presented token to its user.
    pub fn authenticate(&self, provided: &str) -> Result<AuthenticatedUser, AuthError> {
        if provided.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        self.tokens
            .get(provided)
            .map(|user_id| AuthenticatedUser {
                user_id: user_id.clone(),
            })
            .ok_or(AuthError::InvalidCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_value_parses_pairs() {
        let registry = TokenRegistry::from_env_value(" abc=alice , def=bob ").unwrap();

        assert_eq!(registry.authenticate("abc").unwrap().user_id, "alice");
        assert_eq!(registry.authenticate("def").unwrap().user_id, "bob");
    }

    #[test]
    fn test_from_env_value_rejects_malformed_entries() {
        assert_eq!(
            TokenRegistry::from_env_value("abc").unwrap_err(),
            AuthError::MalformedEntry("abc".into())
        );
        assert!(TokenRegistry::from_env_value("=alice").is_err());
        assert_eq!(
            TokenRegistry::from_env_value(" , ").unwrap_err(),
            AuthError::NoTokens
        );
    }

    #[test]
    fn test_authenticate_rejects_unknown_and_empty_tokens() {
        let registry = TokenRegistry::from_env_value("abc=alice").unwrap();

        assert_eq!(
            registry.authenticate("nope").unwrap_err(),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            registry.authenticate("").unwrap_err(),
            AuthError::MissingCredentials
        );
    }
}
