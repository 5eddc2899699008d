//! Account profile model.

use serde::{Deserialize, Serialize};

/// The logged-in user's profile, as returned by `GET /profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// FYERS user id
    pub fy_id: String,
    /// Full name
    #[serde(default)]
    pub name: Option<String>,
    /// Display name
    #[serde(default)]
    pub display_name: Option<String>,
    /// Registered email address
    #[serde(default)]
    pub email_id: Option<String>,
    /// Registered mobile number (masked by the vendor)
    #[serde(default)]
    pub mobile_number: Option<String>,
    /// Whether TOTP login is enabled for the account
    #[serde(default)]
    pub totp: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_deserialize() {
        let json = r#"{
            "fy_id": "XY12345",
            "name": "JOHN DOE",
            "display_name": null,
            "email_id": "john@example.com",
            "pin_change_date": "01-01-2024 10:00:00",
            "totp": true
        }"#;

        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.fy_id, "XY12345");
        assert_eq!(profile.name.as_deref(), Some("JOHN DOE"));
        assert!(profile.display_name.is_none());
        assert!(profile.mobile_number.is_none());
        assert_eq!(profile.totp, Some(true));
    }
}
