//! HTTP configuration and the authorized API client.
//!
//! [`ClientConfig`] controls timeouts, endpoints and the token file for the
//! whole crate; [`FyersClient`] makes API calls once a token is available.

mod config;
mod http;

pub use config::{ClientConfig, Endpoints, DEFAULT_REDIRECT_URI, DEFAULT_TOKEN_FILE};
pub use http::FyersClient;
