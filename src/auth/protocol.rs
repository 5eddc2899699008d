//! Wire format of the FYERS login endpoints.
//!
//! Every request body and every response field the login flow depends on is
//! declared here. When the vendor changes its API, this is the file to edit.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use url::Url;

use crate::error::LoginStep;
use crate::models::{AuthCode, ClientId};
use crate::{Error, Result};

/// `app_id` the vendor expects on the send-OTP call.
pub const LOGIN_APP_ID: &str = "2";
/// Identity type submitted with the PIN.
pub const IDENTITY_TYPE_PIN: &str = "pin";
/// App type of a user-created API app.
pub const APP_TYPE: &str = "100";
/// OAuth grant type used for the final exchange.
pub const GRANT_TYPE: &str = "authorization_code";
/// OAuth response type requested with the auth code.
pub const RESPONSE_TYPE: &str = "code";

/// JSON pointer to the request key in send-OTP / verify-OTP responses.
pub(crate) const REQUEST_KEY: &str = "/request_key";
/// JSON pointer to the bearer token in the verify-PIN response.
pub(crate) const PIN_ACCESS_TOKEN: &str = "/data/access_token";
/// JSON pointer to the redirect URL in the auth-code response.
pub(crate) const REDIRECT_URL: &str = "/Url";
/// JSON pointer to the final token in the exchange response.
pub(crate) const ACCESS_TOKEN: &str = "/access_token";

#[derive(Debug, Serialize)]
pub(crate) struct SendLoginOtp<'a> {
    pub fy_id: &'a str,
    pub app_id: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct VerifyOtp<'a> {
    pub request_key: &'a str,
    pub otp: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct VerifyPin<'a> {
    pub request_key: &'a str,
    pub identity_type: &'static str,
    pub identifier: &'a str,
}

/// The fixed application descriptor sent to obtain an auth code.
#[derive(Debug, Serialize)]
pub(crate) struct AuthCodeRequest<'a> {
    pub fyers_id: &'a str,
    pub app_id: &'a str,
    pub redirect_uri: &'a str,
    #[serde(rename = "appType")]
    pub app_type: &'static str,
    pub code_challenge: &'static str,
    pub state: &'static str,
    pub scope: &'static str,
    pub nonce: &'static str,
    pub response_type: &'static str,
    pub create_cookie: bool,
}

impl<'a> AuthCodeRequest<'a> {
    pub(crate) fn new(fyers_id: &'a str, client_id: &'a ClientId, redirect_uri: &'a str) -> Self {
        Self {
            fyers_id,
            app_id: client_id.app_id(),
            redirect_uri,
            app_type: APP_TYPE,
            code_challenge: "",
            state: "None",
            scope: "",
            nonce: "",
            response_type: RESPONSE_TYPE,
            create_cookie: true,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ValidateAuthCode<'a> {
    pub grant_type: &'static str,
    #[serde(rename = "appIdHash")]
    pub app_id_hash: String,
    pub code: &'a str,
}

/// Hex SHA-256 of `<client_id>:<secret_key>`, which the exchange uses in
/// place of the raw secret.
pub fn app_id_hash(client_id: &ClientId, secret_key: &str) -> String {
    let digest = Sha256::digest(format!("{}:{}", client_id, secret_key).as_bytes());
    hex::encode(digest)
}

/// Read a vendor response, rejecting failures.
///
/// A response is a failure when its status is not 2xx (3xx too, when
/// `allow_redirect` is set) or when its body says `"s": "error"`. Bodies that
/// are not JSON are kept as a string so the caller still sees them.
pub(crate) async fn read_response(
    step: LoginStep,
    response: reqwest::Response,
    allow_redirect: bool,
) -> Result<Value> {
    let status = response.status();
    let text = response.text().await?;
    let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));

    let status_ok = status.is_success() || (allow_redirect && status.is_redirection());
    let vendor_error = body.get("s").and_then(Value::as_str) == Some("error");

    if !status_ok || vendor_error {
        tracing::warn!(%step, status = status.as_u16(), "vendor rejected request");
        return Err(Error::from_vendor_response(step, status.as_u16(), body));
    }

    Ok(body)
}

/// Pull a required string field out of a response body.
pub(crate) fn required_str<'a>(
    step: LoginStep,
    body: &'a Value,
    pointer: &'static str,
) -> Result<&'a str> {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::UnexpectedResponse {
            step,
            field: pointer.trim_start_matches('/'),
            body: body.clone(),
        })
}

/// Extract the auth code from the redirect URL's query string.
///
/// The vendor sends it as `auth_code`; a bare `code` parameter is accepted
/// when `auth_code` is absent, unless it is numeric. Vendor redirects carry
/// their HTTP status as `code=200`, which is never an auth code.
///
/// # Example
///
/// ```
/// use fyers_autologin::auth::protocol::extract_auth_code;
///
/// let code = extract_auth_code("https://127.0.0.1/?s=ok&code=200&auth_code=xyz&state=None").unwrap();
/// assert_eq!(code.as_str(), "xyz");
/// ```
pub fn extract_auth_code(redirect_url: &str) -> Result<AuthCode> {
    let url = Url::parse(redirect_url)?;

    let mut code = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "auth_code" => return Ok(AuthCode::new(value)),
            "code" if code.is_none() && !is_status_code(&value) => {
                code = Some(value.into_owned())
            }
            _ => {}
        }
    }

    code.map(AuthCode::new).ok_or_else(|| Error::UnexpectedResponse {
        step: LoginStep::AuthCode,
        field: "Url?auth_code",
        body: Value::String(redirect_url.to_string()),
    })
}

fn is_status_code(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
