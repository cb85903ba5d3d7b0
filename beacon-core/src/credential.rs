//! GitHub credential handling
//!
//! A credential is a personal access token supplied by the user. It is held in
//! memory only and attached to each request; nothing here writes it to disk.

use std::fmt;

use tracing::debug;

/// GitHub personal access token
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token, trimming surrounding whitespace
    pub fn new(token: impl AsRef<str>) -> Self {
        Self(token.as_ref().trim().to_string())
    }

    /// Build a credential from optional user input
    ///
    /// Absent or blank input yields `None` so callers fall back to
    /// unauthenticated requests.
    pub fn from_input(input: Option<String>) -> Option<Self> {
        let token = input?;
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        debug!("Using GitHub token supplied by the caller");
        Some(Self::new(token))
    }

    /// Value for the `Authorization` header
    pub fn authorization_value(&self) -> String {
        format!("token {}", self.0)
    }

    /// Raw token text
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(****)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_trimmed() {
        let credential = Credential::new("  ghp_xxxxxxxxxxxx  ");
        assert_eq!(credential.expose(), "ghp_xxxxxxxxxxxx");
    }

    #[test]
    fn test_authorization_value() {
        let credential = Credential::new("ghp_abc");
        assert_eq!(credential.authorization_value(), "token ghp_abc");
    }

    #[test]
    fn test_blank_input_is_none() {
        assert!(Credential::from_input(None).is_none());
        assert!(Credential::from_input(Some(String::new())).is_none());
        assert!(Credential::from_input(Some("   ".to_string())).is_none());
        assert_eq!(
            Credential::from_input(Some("ghp_abc\n".to_string())),
            Some(Credential::new("ghp_abc"))
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let credential = Credential::new("ghp_secret");
        let printed = format!("{:?}", credential);
        assert!(!printed.contains("ghp_secret"));
    }
}
