//! # fyers-autologin
//!
//! Unattended login for the FYERS trading API.
//!
//! The vendor expects a human to type an OTP and PIN every morning. This
//! crate performs that sequence itself (TOTP from the account's QR seed,
//! PIN, auth code, token exchange) and caches the resulting access token in
//! a file so scripts started later the same day reuse it.
//!
//! ## Features
//!
//! - **Typed login steps**: each step's output is a distinct type that only
//!   the next step accepts
//! - **Same-day cache**: the token file's modification date decides reuse
//! - **Fail fast**: no retries; vendor error bodies are kept on the error
//! - **Secrets stay secret**: PIN, seed, secret key and tokens are redacted
//!   from `Debug` output and logs
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fyers_autologin::{BrokerHandler, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> fyers_autologin::Result<()> {
//!     let handler = BrokerHandler::from_file(
//!         "credentials.toml",
//!         ClientConfig::default().with_token_file("access_token.txt"),
//!     )?;
//!
//!     // Logs in only if access_token.txt was not written today.
//!     let client = handler.instance().await?;
//!     let profile = client.profile().await?;
//!     println!("Logged in as {}", profile.fy_id);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod client;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use auth::{BrokerHandler, Credentials, FyersLogin, LoginFlow, TokenStore};
pub use client::{ClientConfig, Endpoints, FyersClient};
pub use error::{Error, LoginStep, Result};
pub use models::{AccessToken, AuthCode, ClientId, Profile, UserId};

/// Prelude module for convenient imports.
///
/// ```rust
/// use fyers_autologin::prelude::*;
/// ```
pub mod prelude {
    pub use crate::auth::{BrokerHandler, Credentials, FyersLogin, LoginFlow, TokenStore};
    pub use crate::client::{ClientConfig, Endpoints, FyersClient};
    pub use crate::error::{Error, LoginStep, Result};
    pub use crate::models::{AccessToken, AuthCode, ClientId, Profile, UserId};
}
