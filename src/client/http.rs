//! Authorized HTTP client for the FYERS API.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::auth::protocol;
use crate::error::LoginStep;
use crate::models::{AccessToken, ClientId, Profile};
use crate::{Error, Result};

use super::config::ClientConfig;

/// Client for authorized FYERS API calls.
///
/// Every request carries `Authorization: <client_id>:<access_token>`.
/// Cloning is cheap and shares the underlying connection pool.
///
/// # Example
///
/// ```no_run
/// use fyers_autologin::{AccessToken, ClientConfig, ClientId, FyersClient};
///
/// # async fn example() -> fyers_autologin::Result<()> {
/// let client = FyersClient::new(
///     ClientId::new("ABCD1234-100")?,
///     AccessToken::new("eyJ0eXAi..."),
///     ClientConfig::default(),
/// )?;
/// let profile = client.profile().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FyersClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    client_id: ClientId,
    access_token: AccessToken,
    config: ClientConfig,
}

impl FyersClient {
    /// Create a client authorized with `access_token`.
    pub fn new(client_id: ClientId, access_token: AccessToken, config: ClientConfig) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!(
            "{}:{}",
            client_id,
            access_token.expose_secret()
        ))
        .map_err(|_| Error::InvalidInput("Invalid token format".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = config.http_builder().default_headers(headers).build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                client_id,
                access_token,
                config,
            }),
        })
    }

    /// The app this client is authorized for.
    pub fn client_id(&self) -> &ClientId {
        &self.inner.client_id
    }

    /// The token this client was built with.
    pub fn access_token(&self) -> &AccessToken {
        &self.inner.access_token
    }

    /// Fetch the logged-in user's profile.
    pub async fn profile(&self) -> Result<Profile> {
        self.get("/profile").await
    }

    /// Make a GET request against the API base and unwrap the `data` envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.inner.config.endpoints.api_base, path);
        let response = self.inner.http.get(&url).send().await?;
        let body = protocol::read_response(LoginStep::Api, response, false).await?;

        let Some(data) = body.get("data").cloned() else {
            return Err(Error::UnexpectedResponse {
                step: LoginStep::Api,
                field: "data",
                body,
            });
        };
        Ok(serde_json::from_value::<T>(data)?)
    }
}

impl std::fmt::Debug for FyersClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FyersClient")
            .field("client_id", &self.inner.client_id)
            .field("access_token", &"[REDACTED]")
            .field("config", &self.inner.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_debug_redacts_token() {
        let client = FyersClient::new(
            ClientId::new("ABCD1234-100").unwrap(),
            AccessToken::new("super-secret-token"),
            ClientConfig::default(),
        )
        .unwrap();

        let debug_str = format!("{:?}", client);
        assert!(!debug_str.contains("super-secret-token"));
        assert!(debug_str.contains("REDACTED"));
        assert_eq!(client.client_id().as_str(), "ABCD1234-100");
    }

    #[test]
    fn test_rejects_unprintable_token() {
        let result = FyersClient::new(
            ClientId::new("ABCD1234-100").unwrap(),
            AccessToken::new("bad\ntoken"),
            ClientConfig::default(),
        );
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
