//! Client configuration options.

use std::path::PathBuf;
use std::time::Duration;

/// Default redirect URI registered for the API app.
pub const DEFAULT_REDIRECT_URI: &str = "https://127.0.0.1";

/// Default location of the cached access token.
pub const DEFAULT_TOKEN_FILE: &str = "access_token.txt";

const VAGATOR_BASE_URL: &str = "https://api-t2.fyers.in/vagator/v2";
const API_BASE_URL: &str = "https://api-t1.fyers.in/api/v3";

/// URLs of the vendor endpoints used during login and afterwards.
///
/// # Example
///
/// ```
/// use fyers_autologin::Endpoints;
///
/// let endpoints = Endpoints::from_bases("http://127.0.0.1:8080/vagator/v2", "http://127.0.0.1:8080/api/v3");
/// assert_eq!(endpoints.verify_otp, "http://127.0.0.1:8080/vagator/v2/verify_otp");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Send-OTP endpoint
    pub send_login_otp: String,
    /// Verify-OTP endpoint
    pub verify_otp: String,
    /// Verify-PIN endpoint
    pub verify_pin: String,
    /// Auth-code endpoint
    pub auth_code: String,
    /// Auth-code to access-token exchange endpoint
    pub validate_auth_code: String,
    /// Base URL for authorized API calls
    pub api_base: String,
}

impl Endpoints {
    /// Derive the full endpoint set from the login-host and API-host bases.
    pub fn from_bases(vagator_base: &str, api_base: &str) -> Self {
        let vagator_base = vagator_base.trim_end_matches('/');
        let api_base = api_base.trim_end_matches('/');
        Self {
            send_login_otp: format!("{}/send_login_otp_v2", vagator_base),
            verify_otp: format!("{}/verify_otp", vagator_base),
            verify_pin: format!("{}/verify_pin_v2", vagator_base),
            auth_code: format!("{}/token", api_base),
            validate_auth_code: format!("{}/validate-authcode", api_base),
            api_base: api_base.to_string(),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::from_bases(VAGATOR_BASE_URL, API_BASE_URL)
    }
}

/// Configuration for the login flow and the API client.
///
/// # Example
///
/// ```
/// use fyers_autologin::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(60))
///     .with_token_file("/tmp/fyers_token.txt");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-request timeout
    pub timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Vendor endpoints
    pub endpoints: Endpoints,
    /// Redirect URI registered for the app
    pub redirect_uri: String,
    /// Where the access token is cached
    pub token_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("fyers-autologin/{} (Rust)", env!("CARGO_PKG_VERSION")),
            endpoints: Endpoints::default(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Point the client at different endpoints.
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Set the redirect URI.
    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = redirect_uri.into();
        self
    }

    /// Set the token cache file.
    pub fn with_token_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_file = path.into();
        self
    }

    /// Build the HTTP client every request goes through.
    ///
    /// Redirects are never followed: the auth-code step answers with a 308
    /// whose body, not its `Location`, carries the code.
    pub(crate) fn http_client(&self) -> crate::Result<reqwest::Client> {
        self.http_builder().build().map_err(Into::into)
    }

    pub(crate) fn http_builder(&self) -> reqwest::ClientBuilder {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(&self.user_agent)
            .redirect(reqwest::redirect::Policy::none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.redirect_uri, "https://127.0.0.1");
        assert_eq!(config.token_file, PathBuf::from("access_token.txt"));
    }

    #[test]
    fn test_default_endpoints() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.send_login_otp,
            "https://api-t2.fyers.in/vagator/v2/send_login_otp_v2"
        );
        assert_eq!(
            endpoints.verify_pin,
            "https://api-t2.fyers.in/vagator/v2/verify_pin_v2"
        );
        assert_eq!(endpoints.auth_code, "https://api-t1.fyers.in/api/v3/token");
        assert_eq!(
            endpoints.validate_auth_code,
            "https://api-t1.fyers.in/api/v3/validate-authcode"
        );
    }

    #[test]
    fn test_from_bases_trims_slash() {
        let endpoints = Endpoints::from_bases("http://localhost/v/", "http://localhost/a/");
        assert_eq!(endpoints.verify_otp, "http://localhost/v/verify_otp");
        assert_eq!(endpoints.api_base, "http://localhost/a");
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new()
            .with_timeout(Duration::from_secs(5))
            .with_redirect_uri("https://example.com/cb")
            .with_user_agent("bot/1.0");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.redirect_uri, "https://example.com/cb");
        assert_eq!(config.user_agent, "bot/1.0");
    }
}
