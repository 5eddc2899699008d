//! One-time passwords and field encoding.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use totp_rs::{Algorithm, Secret, TOTP};

use crate::{Error, Result};

const OTP_DIGITS: usize = 6;
const OTP_STEP_SECS: u64 = 30;

/// Base64-encode a login field (user id, PIN) the way the vendor expects.
///
/// Only ASCII is accepted; the vendor decodes these fields as ASCII.
///
/// # Example
///
/// ```
/// use fyers_autologin::auth::encode_field;
///
/// assert_eq!(encode_field("1234").unwrap(), "MTIzNA==");
/// assert!(encode_field("१२३४").is_err());
/// ```
pub fn encode_field(value: &str) -> Result<String> {
    if !value.is_ascii() {
        return Err(Error::InvalidInput(
            "login fields must be ASCII".to_string(),
        ));
    }
    Ok(BASE64.encode(value.as_bytes()))
}

/// RFC 6238 generator (SHA-1, six digits, 30-second window) built from the
/// base32 seed shown under the account's TOTP QR code.
pub struct OtpGenerator {
    totp: TOTP,
}

impl OtpGenerator {
    /// Build a generator from a base32 seed.
    ///
    /// Whitespace and padding are ignored and lowercase is accepted.
    pub fn from_seed(seed: &str) -> Result<Self> {
        let normalized: String = seed
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '=')
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if normalized.is_empty() {
            return Err(Error::Otp("empty TOTP seed".to_string()));
        }

        let secret = Secret::Encoded(normalized)
            .to_bytes()
            .map_err(|e| Error::Otp(format!("invalid base32 seed: {:?}", e)))?;

        Ok(Self {
            totp: TOTP::new_unchecked(Algorithm::SHA1, OTP_DIGITS, 1, OTP_STEP_SECS, secret),
        })
    }

    /// The code for the current 30-second window.
    pub fn current(&self) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| Error::Otp(e.to_string()))?;
        Ok(self.at(now.as_secs()))
    }

    /// The code for an arbitrary Unix time.
    pub fn at(&self, unix_secs: u64) -> String {
        self.totp.generate(unix_secs)
    }
}

impl fmt::Debug for OtpGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OtpGenerator")
            .field("seed", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 6238 appendix B seed: ASCII "12345678901234567890".
    const RFC_SEED: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

    #[test]
    fn test_encode_field_round_trip() {
        for input in ["XY12345", "1234", "", "a b+c/d="] {
            let encoded = encode_field(input).unwrap();
            let decoded = BASE64.decode(encoded.as_bytes()).unwrap();
            assert_eq!(String::from_utf8(decoded).unwrap(), input);
        }
    }

    #[test]
    fn test_encode_field_rejects_non_ascii() {
        assert!(matches!(encode_field("XY1234é"), Err(Error::InvalidInput(_))));
        assert!(matches!(encode_field("１２３４"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_rfc6238_vectors() {
        let otp = OtpGenerator::from_seed(RFC_SEED).unwrap();
        assert_eq!(otp.at(59), "287082");
        assert_eq!(otp.at(1_111_111_109), "081804");
        assert_eq!(otp.at(1_234_567_890), "005924");
    }

    #[test]
    fn test_same_window_same_code() {
        let otp = OtpGenerator::from_seed(RFC_SEED).unwrap();
        assert_eq!(otp.at(60), otp.at(89));
        assert_ne!(otp.at(89), otp.at(90));
    }

    #[test]
    fn test_seed_normalization() {
        let otp = OtpGenerator::from_seed("gezd gnbv gy3t qojq gezd gnbv gy3t qojq").unwrap();
        assert_eq!(otp.at(59), "287082");
        assert_eq!(otp.current().unwrap().len(), 6);
    }

    #[test]
    fn test_invalid_seed() {
        assert!(OtpGenerator::from_seed("").is_err());
        assert!(OtpGenerator::from_seed("not-base32!").is_err());
    }

    #[test]
    fn test_debug_redacts_seed() {
        let otp = OtpGenerator::from_seed(RFC_SEED).unwrap();
        assert!(!format!("{:?}", otp).contains(RFC_SEED));
    }
}
