//! Operator credentials, loaded from a TOML file.

use std::fmt;
use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::models::{ClientId, UserId};
use crate::{Error, Result};

/// Section of the credentials file holding the FYERS keys.
pub const CREDENTIALS_SECTION: &str = "FYERS";

/// Everything needed to log in without a human.
///
/// Loaded from a file shaped like:
///
/// ```toml
/// [FYERS]
/// USER_ID = "XY12345"
/// PIN = "1234"
/// APP_ID = "ABCD1234-100"
/// SECRET_KEY = "..."
/// QR_CODE_TEXT = "BASE32SEED"
/// ```
#[derive(Clone)]
pub struct Credentials {
    /// FYERS user id
    pub user_id: UserId,
    /// API app client id
    pub client_id: ClientId,
    pin: SecretString,
    secret_key: SecretString,
    totp_seed: SecretString,
}

#[derive(Deserialize)]
struct CredentialsFile {
    #[serde(rename = "FYERS")]
    fyers: Option<RawCredentials>,
}

#[derive(Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct RawCredentials {
    user_id: String,
    pin: Pin,
    app_id: String,
    secret_key: String,
    qr_code_text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Pin {
    Text(String),
    Number(u64),
}

impl Pin {
    fn into_string(self) -> String {
        match self {
            Pin::Text(s) => s,
            Pin::Number(n) => n.to_string(),
        }
    }
}

impl Credentials {
    /// Assemble credentials directly.
    pub fn new(
        user_id: impl Into<String>,
        pin: impl Into<String>,
        client_id: impl Into<String>,
        secret_key: impl Into<String>,
        totp_seed: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            user_id: UserId::new(user_id),
            client_id: ClientId::new(client_id)?,
            pin: SecretString::from(pin.into()),
            secret_key: SecretString::from(secret_key.into()),
            totp_seed: SecretString::from(totp_seed.into()),
        })
    }

    /// Load credentials from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|source| Error::CredentialsFile {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_toml_str(&contents)
    }

    /// Parse credentials from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: CredentialsFile = toml::from_str(contents)?;
        let raw = file.fyers.ok_or_else(|| {
            Error::Config(format!(
                "credentials file has no [{}] section",
                CREDENTIALS_SECTION
            ))
        })?;

        Self::new(
            raw.user_id,
            raw.pin.into_string(),
            raw.app_id,
            raw.secret_key,
            raw.qr_code_text,
        )
    }

    pub(crate) fn pin(&self) -> &str {
        self.pin.expose_secret()
    }

    pub(crate) fn secret_key(&self) -> &str {
        self.secret_key.expose_secret()
    }

    pub(crate) fn totp_seed(&self) -> &str {
        self.totp_seed.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("client_id", &self.client_id)
            .field("pin", &"[REDACTED]")
            .field("secret_key", &"[REDACTED]")
            .field("totp_seed", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [FYERS]
        USER_ID = "XY12345"
        PIN = "0912"
        APP_ID = "ABCD1234-100"
        SECRET_KEY = "S3CR3T"
        QR_CODE_TEXT = "GEZDGNBVGY3TQOJQ"
    "#;

    #[test]
    fn test_parse_credentials() {
        let creds = Credentials::from_toml_str(SAMPLE).unwrap();
        assert_eq!(creds.user_id.as_str(), "XY12345");
        assert_eq!(creds.client_id.app_id(), "ABCD1234");
        assert_eq!(creds.pin(), "0912");
        assert_eq!(creds.secret_key(), "S3CR3T");
        assert_eq!(creds.totp_seed(), "GEZDGNBVGY3TQOJQ");
    }

    #[test]
    fn test_numeric_pin() {
        let toml = SAMPLE.replace("PIN = \"0912\"", "PIN = 4321");
        let creds = Credentials::from_toml_str(&toml).unwrap();
        assert_eq!(creds.pin(), "4321");
    }

    #[test]
    fn test_missing_section() {
        let err = Credentials::from_toml_str("[OTHER]\nUSER_ID = \"x\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_key() {
        let toml = SAMPLE.replace("SECRET_KEY = \"S3CR3T\"", "");
        assert!(matches!(
            Credentials::from_toml_str(&toml),
            Err(Error::Toml(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let creds = Credentials::from_file(&path).unwrap();
        assert_eq!(creds.user_id.as_str(), "XY12345");

        let missing = Credentials::from_file(dir.path().join("nope.toml")).unwrap_err();
        match missing {
            Error::CredentialsFile { path, source } => {
                assert_eq!(path, dir.path().join("nope.toml"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("Expected CredentialsFile error, got {:?}", other),
        }
    }

    #[test]
    fn test_credentials_file_error_keeps_source() {
        use std::error::Error as _;

        let err = Credentials::from_file("/nonexistent/credentials.toml").unwrap_err();
        let source = err.source().expect("io error source");
        assert!(source.downcast_ref::<std::io::Error>().is_some());
        assert!(err.to_string().contains("/nonexistent/credentials.toml"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::from_toml_str(SAMPLE).unwrap();
        let debug_str = format!("{:?}", creds);
        assert!(!debug_str.contains("0912"));
        assert!(!debug_str.contains("S3CR3T"));
        assert!(!debug_str.contains("GEZDGNBVGY3TQOJQ"));
        assert!(debug_str.contains("REDACTED"));
    }
}
