use std::fmt;

use uuid::Uuid;

/// Opaque session token.
///
/// Generated from a version 4 UUID (OS-level CSPRNG) rendered as 32
/// lowercase hex characters. The token carries no embedded claims; the
/// server-side user record is the source of truth for session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generate a new unguessable session token.
    ///
    /// # Returns
    /// SessionToken with 128 bits of randomness, fixed 32-char length
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Get the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the token, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = SessionToken::generate();
        assert_eq!(token.as_str().len(), 32);
        assert!(token.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let first = SessionToken::generate();
        let second = SessionToken::generate();
        assert_ne!(first, second);
    }
}
