//! Primitive types and newtypes for the login sequence.
//!
//! Each remote step hands its output to the next one through a distinct
//! type, so the steps cannot be called out of order or fed each other's
//! keys by mistake.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the app-type suffix (`-100`) at the end of a client id.
pub const APP_TYPE_SUFFIX_LEN: usize = 4;

/// A FYERS user id (e.g. `XY12345`).
///
/// # Example
///
/// ```
/// use fyers_autologin::UserId;
///
/// let user = UserId::new("XY12345");
/// assert_eq!(user.as_str(), "XY12345");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a new user id from a string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the user id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An API app's client id, in `<APPID>-<APPTYPE>` form (e.g. `ABCD1234-100`).
///
/// # Example
///
/// ```
/// use fyers_autologin::ClientId;
///
/// let client_id = ClientId::new("ABCD1234-100").expect("valid client id");
/// assert_eq!(client_id.app_id(), "ABCD1234");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    /// Create a new client id, validating its shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not ASCII or is too short to carry
    /// an app-type suffix.
    pub fn new(s: impl Into<String>) -> crate::Result<Self> {
        let s = s.into();
        if !s.is_ascii() || s.len() <= APP_TYPE_SUFFIX_LEN {
            return Err(crate::Error::InvalidInput(format!(
                "Invalid client id: {}. Expected <APPID>-<APPTYPE>",
                s
            )));
        }
        Ok(Self(s))
    }

    /// The full client id, suffix included.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The client id without its app-type suffix.
    pub fn app_id(&self) -> &str {
        &self.0[..self.0.len() - APP_TYPE_SUFFIX_LEN]
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Request key returned by the send-OTP step; only verify-OTP accepts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpRequestKey(String);

impl OtpRequestKey {
    pub(crate) fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Request key returned by the verify-OTP step; only verify-PIN accepts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinRequestKey(String);

impl PinRequestKey {
    pub(crate) fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Short-lived bearer token granted by a successful PIN check.
///
/// Authorizes the auth-code request that follows it.
#[derive(Clone)]
pub struct PinSession(SecretString);

impl PinSession {
    pub(crate) fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Value for the `Authorization` header.
    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.0.expose_secret())
    }
}

impl fmt::Debug for PinSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PinSession([REDACTED])")
    }
}

/// Authorization code carried in the vendor's redirect URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCode(String);

impl AuthCode {
    /// Create a new auth code.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The long-lived access token used for trading API calls.
///
/// `Debug` output never contains the token itself.
#[derive(Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    /// Wrap a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Reveal the raw token.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl PartialEq for AccessToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose_secret() == other.expose_secret()
    }
}

impl Eq for AccessToken {}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id() {
        let user = UserId::new("XY12345");
        assert_eq!(user.as_str(), "XY12345");
        assert_eq!(user.to_string(), "XY12345");
    }

    #[test]
    fn test_client_id_strips_app_type() {
        let client_id = ClientId::new("ABCD1234-100").unwrap();
        assert_eq!(client_id.as_str(), "ABCD1234-100");
        assert_eq!(client_id.app_id(), "ABCD1234");
    }

    #[test]
    fn test_client_id_invalid() {
        assert!(ClientId::new("-100").is_err());
        assert!(ClientId::new("").is_err());
        assert!(ClientId::new("ÄBCD1234-100").is_err());
    }

    #[test]
    fn test_secrets_redacted() {
        let token = AccessToken::new("super-secret-token");
        let pin = PinSession::new("bearer-secret");
        assert!(!format!("{:?}", token).contains("super-secret-token"));
        assert!(!format!("{:?}", pin).contains("bearer-secret"));
        assert_eq!(token.expose_secret(), "super-secret-token");
        assert_eq!(pin.bearer(), "Bearer bearer-secret");
    }
}
