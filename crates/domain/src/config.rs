//! Credential configuration for the CityPermit service

use crate::errors::{CityPermitError, Result};

/// Login credentials and service endpoint
///
/// Immutable for the lifetime of a client instance. The base endpoint is
/// stored without a trailing slash so request paths can be appended directly.
#[derive(Debug, Clone)]
pub struct Credentials {
    username: String,
    password: String,
    base_url: String,
}

impl Credentials {
    /// Create validated credentials
    ///
    /// # Errors
    ///
    /// Returns `Config` if the username, password, or base endpoint is empty
    /// or whitespace-only.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let username = username.into();
        let password = password.into();
        let base_url = base_url.into();

        if username.trim().is_empty() {
            return Err(CityPermitError::Config("username must be a non-empty string".into()));
        }
        if password.trim().is_empty() {
            return Err(CityPermitError::Config("password must be a non-empty string".into()));
        }
        if base_url.trim().is_empty() {
            return Err(CityPermitError::Config("base_url must be a non-empty string".into()));
        }

        Ok(Self { username, password, base_url: base_url.trim_end_matches('/').to_string() })
    }

    /// Account identifier used as the login `identifier` field
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Login password
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Service endpoint without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_credentials() {
        let creds = Credentials::new("user", "pass", "https://example.test").unwrap();
        assert_eq!(creds.username(), "user");
        assert_eq!(creds.base_url(), "https://example.test");
    }

    #[test]
    fn strips_trailing_slash_from_base_url() {
        let creds = Credentials::new("user", "pass", "https://example.test/").unwrap();
        assert_eq!(creds.base_url(), "https://example.test");
    }

    #[test]
    fn rejects_empty_fields() {
        assert!(matches!(
            Credentials::new("", "pass", "https://example.test"),
            Err(CityPermitError::Config(_))
        ));
        assert!(matches!(
            Credentials::new("user", "  ", "https://example.test"),
            Err(CityPermitError::Config(_))
        ));
        assert!(matches!(
            Credentials::new("user", "pass", ""),
            Err(CityPermitError::Config(_))
        ));
    }
}
