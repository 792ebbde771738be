//! Credentials for private release repositories.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;

/// Credentials configured for the private release repository.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Access token, sent as a bearer token.
    pub access_token: Option<String>,
    /// User name for basic authentication.
    pub username: Option<String>,
    /// Password for basic authentication.
    pub password: Option<String>,
}

impl Credentials {
    /// Values that must never appear in logs.
    pub fn secrets(&self) -> impl Iterator<Item = &str> {
        [self.access_token.as_deref(), self.password.as_deref()]
            .into_iter()
            .flatten()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "***");
        f.debug_struct("Credentials")
            .field("access_token", &redact(&self.access_token))
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .finish()
    }
}

/// Build the `Authorization` header for a download.
///
/// Public downloads (empty `releases_repo`) carry no header. For private
/// repositories an access token wins over a username/password pair.
#[must_use]
pub fn authorization_header(releases_repo: &str, credentials: &Credentials) -> Option<String> {
    if releases_repo.is_empty() {
        return None;
    }
    if let Some(token) = &credentials.access_token {
        return Some(format!("Bearer {token}"));
    }
    match (&credentials.username, &credentials.password) {
        (Some(user), Some(password)) => Some(format!(
            "Basic {}",
            STANDARD.encode(format!("{user}:{password}"))
        )),
        _ => None,
    }
}
