//! Identity resolution settings.
//!
//! Credentials are not handled here: the acting user is named by email and
//! trusted as already authenticated.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Email of the user to act as when `--as` is not given.
    #[serde(default)]
    pub default_user: String,

    /// Restrict new user emails to this domain (e.g. `coopercard.com.br`).
    /// Empty allows any domain.
    #[serde(default)]
    pub allowed_email_domain: String,
}

impl AuthConfig {
    #[must_use]
    pub fn has_default_user(&self) -> bool {
        !self.default_user.trim().is_empty()
    }

    #[must_use]
    pub fn restricts_domain(&self) -> bool {
        !self.allowed_email_domain.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unrestricted() {
        let config = AuthConfig::default();
        assert!(!config.has_default_user());
        assert!(!config.restricts_domain());
    }

    #[test]
    fn whitespace_only_counts_as_unset() {
        let config = AuthConfig {
            default_user: "   ".into(),
            allowed_email_domain: "coopercard.com.br".into(),
        };
        assert!(!config.has_default_user());
        assert!(config.restricts_domain());
    }
}
