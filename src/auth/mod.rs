//! Automated login for the FYERS API.
//!
//! The vendor's login is a fixed chain of calls: send an OTP request for the
//! user id, verify the TOTP code, verify the PIN, fetch an auth code, and
//! exchange that code for an access token. [`LoginFlow`] performs the chain,
//! [`FyersLogin`] puts a same-day file cache in front of it, and
//! [`BrokerHandler`] builds an API client from whatever token that yields.
//!
//! ```no_run
//! use fyers_autologin::{ClientConfig, FyersLogin};
//!
//! # async fn example() -> fyers_autologin::Result<()> {
//! let login = FyersLogin::from_file(
//!     "credentials.toml",
//!     ClientConfig::default().with_token_file("access_token.txt"),
//! )?;
//!
//! // Reuses access_token.txt if it was written today.
//! let token = login.get_valid_token().await?;
//! # Ok(())
//! # }
//! ```

mod cache;
mod credentials;
mod login;
mod otp;
pub mod protocol;
mod session;

pub use cache::{modified_on, TokenStore};
pub use credentials::{Credentials, CREDENTIALS_SECTION};
pub use login::LoginFlow;
pub use otp::{encode_field, OtpGenerator};
pub use session::{BrokerHandler, FyersLogin};
