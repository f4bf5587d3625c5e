use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::BookingPayload;

#[derive(Clone, Serialize, Deserialize)]
pub struct Settings {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub client_id: String,
    /// Scheduling and booking host.
    pub api_io_base_url: Url,
    /// Studio directory host.
    pub api_co_base_url: Url,
    pub auth_url: Url,
    pub debug: bool,
    pub request_timeout_secs: u64,
    pub token_validity_secs: i64,
    pub booking_payload: BookingPayload,
    pub geolocation_url: Url,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("api_io_base_url", &self.api_io_base_url)
            .field("api_co_base_url", &self.api_co_base_url)
            .field("auth_url", &self.auth_url)
            .field("debug", &self.debug)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("token_validity_secs", &self.token_validity_secs)
            .field("booking_payload", &self.booking_payload)
            .field("geolocation_url", &self.geolocation_url)
            .finish()
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // OTF_API_IO_BASE_URL -> api_io_base_url
            .add_source(Environment::with_prefix("OTF").prefix_separator("_"))
            .set_default("debug", false)?
            .set_default("request_timeout_secs", 10)?
            .set_default("token_validity_secs", 3600)?
            .set_default("booking_payload", "class_id")?
            .set_default("geolocation_url", "http://ip-api.com/json/")?
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    const REQUIRED: [(&str, &str); 6] = [
        ("OTF_USERNAME", "runner@example.com"),
        ("OTF_PASSWORD", "hunter2"),
        ("OTF_CLIENT_ID", "client-123"),
        ("OTF_API_IO_BASE_URL", "https://io.example.com/v1/"),
        ("OTF_API_CO_BASE_URL", "https://co.example.com/mobile/v1/"),
        ("OTF_AUTH_URL", "https://auth.example.com/"),
    ];

    fn set_required() {
        for (key, value) in REQUIRED {
            unsafe { std::env::set_var(key, value) };
        }
    }

    fn clear_all() {
        for (key, _) in REQUIRED {
            unsafe { std::env::remove_var(key) };
        }
        unsafe {
            std::env::remove_var("OTF_BOOKING_PAYLOAD");
            std::env::remove_var("OTF_REQUEST_TIMEOUT_SECS");
        }
    }

    #[test]
    #[serial]
    fn test_from_env_applies_defaults() {
        clear_all();
        set_required();

        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.username, "runner@example.com");
        assert_eq!(settings.client_id, "client-123");
        assert_eq!(settings.api_io_base_url.as_str(), "https://io.example.com/v1/");
        assert_eq!(settings.request_timeout_secs, 10);
        assert_eq!(settings.token_validity_secs, 3600);
        assert_eq!(settings.booking_payload, BookingPayload::ClassId);
        assert_eq!(settings.geolocation_url.as_str(), "http://ip-api.com/json/");

        clear_all();
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_all();
        set_required();
        unsafe {
            std::env::set_var("OTF_BOOKING_PAYLOAD", "class_uuid");
            std::env::set_var("OTF_REQUEST_TIMEOUT_SECS", "3");
        }

        let settings = Settings::from_env().unwrap();
        assert_eq!(settings.booking_payload, BookingPayload::ClassUuid);
        assert_eq!(settings.request_timeout_secs, 3);

        clear_all();
    }

    #[test]
    #[serial]
    fn test_from_env_requires_base_urls() {
        clear_all();
        set_required();
        unsafe { std::env::remove_var("OTF_AUTH_URL") };

        assert!(Settings::from_env().is_err());

        clear_all();
    }

    #[test]
    #[serial]
    fn test_password_is_never_printed() {
        clear_all();
        set_required();

        let settings = Settings::from_env().unwrap();
        let debug = format!("{settings:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("runner@example.com"));
        let json = serde_json::to_string(&settings).unwrap();
        assert!(!json.contains("hunter2"));

        clear_all();
    }
}
