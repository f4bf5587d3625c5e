use chrono::{DateTime, Duration, Utc};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderName, HeaderValue};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::{OtfClient, is_success};
use crate::error::ApiError;
use crate::transport::{self, add_header};

const AUTH_FLOW: &str = "USER_PASSWORD_AUTH";
const AUTH_CONTENT_TYPE: &str = "application/x-amz-json-1.1";
const AUTH_TARGET: &str = "AWSCognitoIdentityProviderService.InitiateAuth";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    #[serde(rename = "USERNAME")]
    pub username: String,
    #[serde(rename = "PASSWORD")]
    pub password: String,
}

#[derive(Debug, Serialize)]
struct AuthenticateRequest<'a> {
    #[serde(rename = "AuthParameters")]
    auth_parameters: &'a Credentials,
    #[serde(rename = "AuthFlow")]
    auth_flow: &'static str,
    #[serde(rename = "ClientId")]
    client_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthenticateResponse {
    #[serde(rename = "AuthenticationResult")]
    authentication_result: AuthenticationResult,
}

#[derive(Debug, Deserialize)]
struct AuthenticationResult {
    #[serde(rename = "IdToken", default)]
    id_token: String,
}

/// Bearer token with an explicit validity window.
///
/// The server never tells us when the token dies, so the window comes from
/// configuration and starts when the token is received.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
    value: String,
    issued_at: DateTime<Utc>,
    valid_for: Duration,
}

impl BearerToken {
    pub fn new(value: impl Into<String>, issued_at: DateTime<Utc>, valid_for: Duration) -> Self {
        Self {
            value: value.into(),
            issued_at,
            valid_for,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.issued_at + self.valid_for
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerToken")
            .field("value", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .field("valid_for", &self.valid_for)
            .finish()
    }
}

impl OtfClient {
    /// True until a token has been obtained.
    pub fn need_auth(&self) -> bool {
        self.token.is_none()
    }

    /// Exchanges the credential pair for an id token and installs it on every
    /// later request made by this client. Does nothing when a token is
    /// already held.
    pub async fn authenticate(&mut self, username: &str, password: &str) -> Result<(), ApiError> {
        const OP: &str = "Authenticate";

        if !self.need_auth() {
            return Ok(());
        }

        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let body = serde_json::to_vec(&AuthenticateRequest {
            auth_parameters: &credentials,
            auth_flow: AUTH_FLOW,
            client_id: &self.client_id,
        })
        .map_err(|source| ApiError::Encode {
            operation: OP,
            source,
        })?;

        let request = Self::build(
            OP,
            self.request(Method::POST, self.auth_url.clone())
                .header(CONTENT_TYPE, AUTH_CONTENT_TYPE)
                .header(HeaderName::from_static("x-amz-target"), AUTH_TARGET)
                .body(body),
        )?;
        let response = self.send(OP, request).await?;
        let response = Self::check_status(OP, response, is_success).await?;
        let parsed: AuthenticateResponse = Self::decode(OP, response).await?;

        let id_token = parsed.authentication_result.id_token;
        if id_token.is_empty() {
            return Err(ApiError::MissingToken { operation: OP });
        }
        let bearer = HeaderValue::from_str(&format!("Bearer {id_token}"))
            .map_err(|_| ApiError::MissingToken { operation: OP })?;

        self.transport = transport::chain(
            Some(std::sync::Arc::new(self.http.clone())),
            vec![
                add_header(AUTHORIZATION, bearer),
                add_header(CONTENT_TYPE, HeaderValue::from_static("application/json")),
            ],
        );
        self.token = Some(BearerToken::new(id_token, Utc::now(), self.token_validity));

        info!("authenticated against the booking API");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_authenticate_request_shape() {
        let credentials = Credentials {
            username: "runner@example.com".into(),
            password: "hunter2".into(),
        };
        let body = serde_json::to_value(AuthenticateRequest {
            auth_parameters: &credentials,
            auth_flow: AUTH_FLOW,
            client_id: "client-123",
        })
        .unwrap();
        assert_eq!(
            body,
            json!({
                "AuthParameters": {"USERNAME": "runner@example.com", "PASSWORD": "hunter2"},
                "AuthFlow": "USER_PASSWORD_AUTH",
                "ClientId": "client-123"
            })
        );
    }

    #[test]
    fn test_token_expiry_window() {
        let issued = Utc::now();
        let token = BearerToken::new("abc", issued, Duration::minutes(60));
        assert_eq!(token.expires_at(), issued + Duration::minutes(60));
        assert!(!token.is_expired_at(issued + Duration::minutes(59)));
        assert!(token.is_expired_at(issued + Duration::minutes(60)));
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = BearerToken::new("secret-token", Utc::now(), Duration::minutes(1));
        let printed = format!("{token:?}");
        assert!(!printed.contains("secret-token"));
    }
}
