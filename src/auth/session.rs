//! Token gate and broker session provider.

use std::path::Path;

use tokio::sync::{Mutex, OnceCell};

use super::credentials::Credentials;
use super::login::LoginFlow;
use crate::client::{ClientConfig, FyersClient};
use crate::models::AccessToken;
use crate::Result;

/// Hands out a usable access token, logging in only when the cached one is
/// not from today.
///
/// Concurrent callers on the same `FyersLogin` share one refresh: the first
/// runs the login sequence, the rest wait and then read the file it wrote.
/// Separate processes sharing a token file are not coordinated.
///
/// # Example
///
/// ```no_run
/// use fyers_autologin::{ClientConfig, Credentials, FyersLogin};
///
/// # async fn example() -> fyers_autologin::Result<()> {
/// let credentials = Credentials::from_file("credentials.toml")?;
/// let login = FyersLogin::new(credentials, ClientConfig::default())?;
/// let token = login.get_valid_token().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FyersLogin {
    flow: LoginFlow,
    refresh: Mutex<()>,
}

impl FyersLogin {
    /// Create a login gate for the given credentials.
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        Ok(Self {
            flow: LoginFlow::new(credentials, config)?,
            refresh: Mutex::new(()),
        })
    }

    /// Load credentials from a TOML file and create a login gate.
    pub fn from_file(credentials_file: impl AsRef<Path>, config: ClientConfig) -> Result<Self> {
        Self::new(Credentials::from_file(credentials_file)?, config)
    }

    /// The underlying login sequence.
    pub fn flow(&self) -> &LoginFlow {
        &self.flow
    }

    /// Return today's cached token, or log in and cache a new one.
    pub async fn get_valid_token(&self) -> Result<AccessToken> {
        let store = self.flow.store();
        if let Some(token) = store.load_fresh().await? {
            tracing::info!(path = %store.path().display(), "using cached access token");
            return Ok(token);
        }

        let _guard = self.refresh.lock().await;
        // Another task may have refreshed while we waited.
        if let Some(token) = store.load_fresh().await? {
            tracing::debug!("token refreshed by a concurrent caller");
            return Ok(token);
        }

        tracing::info!(path = %store.path().display(), "cached access token missing or stale");
        self.auto_login().await
    }

    /// Run the full login sequence unconditionally.
    pub async fn auto_login(&self) -> Result<AccessToken> {
        self.flow.run().await
    }
}

/// Builds the authorized API client once and hands out the same instance.
///
/// The client keeps the token it was built with; if that token expires
/// while the process is running, the handler does not rebuild it.
///
/// # Example
///
/// ```no_run
/// use fyers_autologin::{BrokerHandler, ClientConfig};
///
/// # async fn example() -> fyers_autologin::Result<()> {
/// let handler = BrokerHandler::from_file("credentials.toml", ClientConfig::default())?;
/// let client = handler.instance().await?;
/// let profile = client.profile().await?;
/// println!("Logged in as {}", profile.fy_id);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct BrokerHandler {
    login: FyersLogin,
    client: OnceCell<FyersClient>,
}

impl BrokerHandler {
    /// Create a handler around an existing login gate.
    pub fn new(login: FyersLogin) -> Self {
        Self {
            login,
            client: OnceCell::new(),
        }
    }

    /// Load credentials from a TOML file and create a handler.
    pub fn from_file(credentials_file: impl AsRef<Path>, config: ClientConfig) -> Result<Self> {
        Ok(Self::new(FyersLogin::from_file(credentials_file, config)?))
    }

    /// The API client, built on first use from a valid token.
    ///
    /// A failed build leaves the handler empty so the next call tries again.
    pub async fn instance(&self) -> Result<&FyersClient> {
        self.client
            .get_or_try_init(|| async {
                let token = self.login.get_valid_token().await?;
                let flow = self.login.flow();
                FyersClient::new(
                    flow.credentials().client_id.clone(),
                    token,
                    flow.config().clone(),
                )
            })
            .await
    }

    /// Whether the API client has been built yet.
    pub fn is_initialized(&self) -> bool {
        self.client.initialized()
    }

    /// The login gate behind this handler.
    pub fn login(&self) -> &FyersLogin {
        &self.login
    }
}
