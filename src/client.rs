use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use http::StatusCode;
use reqwest::{Method, Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::auth::BearerToken;
use crate::error::ApiError;
use crate::models::BookingPayload;
use crate::settings::Settings;
use crate::transport::{self, Transport};

/// Client for the booking API.
///
/// Holds the three hosts the API is spread over, the bearer token once
/// [`OtfClient::authenticate`] has succeeded, and the transport every request
/// goes through.
pub struct OtfClient {
    pub(crate) io_base_url: Url,
    pub(crate) co_base_url: Url,
    pub(crate) auth_url: Url,
    pub(crate) client_id: String,
    pub(crate) token: Option<BearerToken>,
    pub(crate) token_validity: chrono::Duration,
    pub(crate) booking_payload: BookingPayload,
    pub(crate) http: reqwest::Client,
    pub(crate) transport: Arc<dyn Transport>,
}

impl OtfClient {
    pub fn new(settings: &Settings) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;
        let transport = transport::chain(Some(Arc::new(http.clone())), Vec::new());

        Ok(Self {
            io_base_url: settings.api_io_base_url.clone(),
            co_base_url: settings.api_co_base_url.clone(),
            auth_url: settings.auth_url.clone(),
            client_id: settings.client_id.clone(),
            token: None,
            token_validity: chrono::Duration::seconds(settings.token_validity_secs),
            booking_payload: settings.booking_payload,
            http,
            transport,
        })
    }

    pub fn token(&self) -> Option<&BearerToken> {
        self.token.as_ref()
    }

    /// Fails unless a live token is held. Resource calls never authenticate on
    /// their own.
    pub(crate) fn require_token(&self, operation: &'static str) -> Result<(), ApiError> {
        let token = self
            .token
            .as_ref()
            .ok_or(ApiError::NotAuthenticated { operation })?;
        if token.is_expired_at(Utc::now()) {
            return Err(ApiError::TokenExpired {
                operation,
                expired_at: token.expires_at(),
            });
        }
        Ok(())
    }

    /// Appends `segments` to `base`, whether or not `base` ends in a slash.
    pub(crate) fn endpoint(
        operation: &'static str,
        base: &Url,
        segments: &[&str],
    ) -> Result<Url, ApiError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Url {
                operation,
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url)
    }

    pub(crate) fn build(
        operation: &'static str,
        builder: RequestBuilder,
    ) -> Result<Request, ApiError> {
        builder
            .build()
            .map_err(|source| ApiError::Transport { operation, source })
    }

    pub(crate) async fn send(
        &self,
        operation: &'static str,
        request: Request,
    ) -> Result<Response, ApiError> {
        let method = request.method().clone();
        let url = request.url().clone();
        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|source| ApiError::Transport { operation, source })?;
        debug!(operation, %method, %url, status = %response.status(), "request completed");
        Ok(response)
    }

    /// Turns a response whose status `accept` rejects into [`ApiError::Status`]
    /// carrying the raw body.
    pub(crate) async fn check_status(
        operation: &'static str,
        response: Response,
        accept: impl Fn(StatusCode) -> bool,
    ) -> Result<Response, ApiError> {
        let status = response.status();
        if accept(status) {
            return Ok(response);
        }
        // gzip bodies are already inflated by the client's decoder here
        match response.text().await {
            Ok(body) => Err(ApiError::Status {
                operation,
                status: status.as_u16(),
                body,
            }),
            Err(source) => Err(ApiError::UnreadableBody {
                operation,
                status: status.as_u16(),
                source,
            }),
        }
    }

    pub(crate) async fn decode<T: DeserializeOwned>(
        operation: &'static str,
        response: Response,
    ) -> Result<T, ApiError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ApiError::Transport { operation, source })?;
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode { operation, source })
    }
}

pub(crate) fn is_success(status: StatusCode) -> bool {
    status.is_success()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_with_and_without_trailing_slash() {
        let with = Url::parse("https://api.example.com/v1/").unwrap();
        let without = Url::parse("https://api.example.com/v1").unwrap();
        for base in [with, without] {
            let url = OtfClient::endpoint("test", &base, &["bookings", "me"]).unwrap();
            assert_eq!(url.as_str(), "https://api.example.com/v1/bookings/me");
        }
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let base = Url::parse("https://api.example.com/").unwrap();
        let url = OtfClient::endpoint("test", &base, &["bookings", "me", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/bookings/me/a%20b%2Fc");
    }

    #[test]
    fn test_endpoint_rejects_opaque_base() {
        let base = Url::parse("mailto:someone@example.com").unwrap();
        assert!(matches!(
            OtfClient::endpoint("test", &base, &["x"]),
            Err(ApiError::Url { .. })
        ));
    }
}
