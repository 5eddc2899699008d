//! The five-step login sequence.

use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde_json::Value;

use super::cache::TokenStore;
use super::credentials::Credentials;
use super::otp::{encode_field, OtpGenerator};
use super::protocol::{self, AuthCodeRequest, SendLoginOtp, ValidateAuthCode, VerifyOtp, VerifyPin};
use crate::client::ClientConfig;
use crate::error::LoginStep;
use crate::models::{AccessToken, AuthCode, OtpRequestKey, PinRequestKey, PinSession};
use crate::Result;

/// Drives the vendor login endpoints from user id to access token.
///
/// Each step returns a typed value that only the following step accepts,
/// so the order is enforced by the signatures:
///
/// ```text
/// send_login_otp -> OtpRequestKey -> verify_otp -> PinRequestKey
///   -> verify_pin -> PinSession -> fetch_auth_code -> AuthCode
///   -> exchange_auth_code -> AccessToken
/// ```
///
/// Nothing is retried. Each step makes exactly one HTTP call.
pub struct LoginFlow {
    http: reqwest::Client,
    credentials: Credentials,
    otp: OtpGenerator,
    store: TokenStore,
    config: ClientConfig,
}

impl LoginFlow {
    /// Create a login flow for the given credentials.
    pub fn new(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        let otp = OtpGenerator::from_seed(credentials.totp_seed())?;
        let http = config.http_client()?;
        Ok(Self {
            http,
            credentials,
            otp,
            store: TokenStore::new(&config.token_file),
            config,
        })
    }

    /// The configuration this flow was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The token file this flow writes to.
    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// The credentials this flow logs in with.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Run every step and persist the resulting token to the configured file.
    pub async fn run(&self) -> Result<AccessToken> {
        tracing::info!(user = %self.credentials.user_id, "starting FYERS login sequence");

        let otp_key = self.send_login_otp().await?;
        let pin_key = self.verify_otp(otp_key).await?;
        let pin_session = self.verify_pin(pin_key).await?;
        let auth_code = self.fetch_auth_code(&pin_session).await?;
        let token = self.exchange_auth_code(auth_code).await?;

        self.store.store(&token).await?;
        tracing::info!(path = %self.store.path().display(), "access token refreshed");
        Ok(token)
    }

    /// Ask the vendor to start a login for the user id.
    pub async fn send_login_otp(&self) -> Result<OtpRequestKey> {
        let fy_id = encode_field(self.credentials.user_id.as_str())?;
        let body = self
            .post(
                LoginStep::SendOtp,
                &self.config.endpoints.send_login_otp,
                &SendLoginOtp {
                    fy_id: &fy_id,
                    app_id: protocol::LOGIN_APP_ID,
                },
            )
            .await?;

        let key = protocol::required_str(LoginStep::SendOtp, &body, protocol::REQUEST_KEY)?;
        Ok(OtpRequestKey::new(key))
    }

    /// Submit the current TOTP code.
    pub async fn verify_otp(&self, key: OtpRequestKey) -> Result<PinRequestKey> {
        let otp = self.otp.current()?;
        let body = self
            .post(
                LoginStep::VerifyOtp,
                &self.config.endpoints.verify_otp,
                &VerifyOtp {
                    request_key: key.as_str(),
                    otp: &otp,
                },
            )
            .await?;

        let key = protocol::required_str(LoginStep::VerifyOtp, &body, protocol::REQUEST_KEY)?;
        Ok(PinRequestKey::new(key))
    }

    /// Submit the PIN and receive the short-lived bearer token.
    pub async fn verify_pin(&self, key: PinRequestKey) -> Result<PinSession> {
        let identifier = encode_field(self.credentials.pin())?;
        let body = self
            .post(
                LoginStep::VerifyPin,
                &self.config.endpoints.verify_pin,
                &VerifyPin {
                    request_key: key.as_str(),
                    identity_type: protocol::IDENTITY_TYPE_PIN,
                    identifier: &identifier,
                },
            )
            .await?;

        let token =
            protocol::required_str(LoginStep::VerifyPin, &body, protocol::PIN_ACCESS_TOKEN)?;
        Ok(PinSession::new(token))
    }

    /// Request an auth code for the app and pull it out of the redirect URL.
    pub async fn fetch_auth_code(&self, session: &PinSession) -> Result<AuthCode> {
        let step = LoginStep::AuthCode;
        let payload = AuthCodeRequest::new(
            self.credentials.user_id.as_str(),
            &self.credentials.client_id,
            &self.config.redirect_uri,
        );

        tracing::debug!(%step, "sending request");
        let response = self
            .http
            .post(&self.config.endpoints.auth_code)
            .header(AUTHORIZATION, session.bearer())
            .json(&payload)
            .send()
            .await?;

        // Success arrives as a 308 with the redirect URL in the body.
        let body = protocol::read_response(step, response, true).await?;
        let url = protocol::required_str(step, &body, protocol::REDIRECT_URL)?;
        protocol::extract_auth_code(url)
    }

    /// Trade the auth code for the long-lived access token.
    pub async fn exchange_auth_code(&self, code: AuthCode) -> Result<AccessToken> {
        let app_id_hash =
            protocol::app_id_hash(&self.credentials.client_id, self.credentials.secret_key());
        let body = self
            .post(
                LoginStep::TokenExchange,
                &self.config.endpoints.validate_auth_code,
                &ValidateAuthCode {
                    grant_type: protocol::GRANT_TYPE,
                    app_id_hash,
                    code: code.as_str(),
                },
            )
            .await?;

        let token =
            protocol::required_str(LoginStep::TokenExchange, &body, protocol::ACCESS_TOKEN)?;
        Ok(AccessToken::new(token))
    }

    async fn post<B: Serialize>(&self, step: LoginStep, url: &str, body: &B) -> Result<Value> {
        tracing::debug!(%step, "sending request");
        let response = self.http.post(url).json(body).send().await?;
        protocol::read_response(step, response, false).await
    }
}

impl std::fmt::Debug for LoginFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginFlow")
            .field("credentials", &self.credentials)
            .field("config", &self.config)
            .finish()
    }
}
