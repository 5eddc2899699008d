//! Error types for the FYERS login client.
//!
//! Every failure surfaces immediately: nothing in this crate retries, and
//! whatever the vendor sent back is preserved on the error so the caller can
//! tell an expired OTP from a wrong PIN.

use std::fmt;
use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for login operations.
pub type Result<T> = std::result::Result<T, Error>;

/// One remote call in the login sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStep {
    /// Request a login OTP for the user id.
    SendOtp,
    /// Submit the time-based OTP.
    VerifyOtp,
    /// Submit the trading PIN.
    VerifyPin,
    /// Request the authorization code for the app.
    AuthCode,
    /// Exchange the authorization code for the access token.
    TokenExchange,
    /// Any authorized API call made after login.
    Api,
}

impl LoginStep {
    /// Returns `true` for the steps that belong to the login sequence itself.
    pub fn is_login(&self) -> bool {
        !matches!(self, LoginStep::Api)
    }
}

impl fmt::Display for LoginStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoginStep::SendOtp => "send-otp",
            LoginStep::VerifyOtp => "verify-otp",
            LoginStep::VerifyPin => "verify-pin",
            LoginStep::AuthCode => "auth-code",
            LoginStep::TokenExchange => "token-exchange",
            LoginStep::Api => "api",
        };
        f.write_str(name)
    }
}

/// The main error type for all login and API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed (connection, TLS, timeout)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The vendor rejected the request
    #[error("{step} rejected by vendor: status={status}, code={code:?}, message={message}")]
    Vendor {
        /// Step that was rejected
        step: LoginStep,
        /// HTTP status code
        status: u16,
        /// Vendor error code, if any
        code: Option<i64>,
        /// Human-readable message from the vendor
        message: String,
        /// Raw response body for debugging
        body: Value,
    },

    /// A field the next step depends on was absent from the response
    #[error("unexpected response shape from {step}: missing `{field}`")]
    UnexpectedResponse {
        /// Step whose response was malformed
        step: LoginStep,
        /// Path of the missing field
        field: &'static str,
        /// Raw response body for debugging
        body: Value,
    },

    /// Reading or writing the token file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Credentials file could not be read
    #[error("cannot read credentials file {}: {source}", path.display())]
    CredentialsFile {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Credentials file could not be parsed
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// OTP generation failed
    #[error("OTP error: {0}")]
    Otp(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input provided to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Returns `true` if the vendor refused one of the login steps
    /// (bad OTP, bad PIN, bad app credentials).
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Vendor { step, .. } if step.is_login())
    }

    /// Returns `true` if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Http(err) if err.is_timeout())
    }

    /// The remote step this error came from, if any.
    pub fn step(&self) -> Option<LoginStep> {
        match self {
            Error::Vendor { step, .. } | Error::UnexpectedResponse { step, .. } => Some(*step),
            _ => None,
        }
    }

    /// Create a vendor error from a response body.
    ///
    /// FYERS reports failures as `{"s": "error", "code": -1006, "message": "..."}`.
    pub(crate) fn from_vendor_response(step: LoginStep, status: u16, body: Value) -> Self {
        let code = body.get("code").and_then(Value::as_i64);

        let message = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or("Unknown vendor error")
            .to_string();

        Error::Vendor {
            step,
            status,
            code,
            message,
            body,
        }
    }
}
