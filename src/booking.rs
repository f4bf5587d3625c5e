use chrono::{DateTime, SecondsFormat, Utc};
use http::StatusCode;
use reqwest::Method;
use tracing::info;

use crate::client::{OtfClient, is_success};
use crate::error::ApiError;
use crate::models::{Booking, BookingRequest, BookingsResult};

const BOOKINGS_PATH: [&str; 2] = ["bookings", "me"];

fn is_cancel_success(status: StatusCode) -> bool {
    status == StatusCode::OK || status == StatusCode::NO_CONTENT
}

impl OtfClient {
    /// Books `class_id`, or joins its waitlist when `waitlist` is set.
    pub async fn book_class(
        &self,
        class_id: &str,
        confirmed: bool,
        waitlist: bool,
    ) -> Result<(), ApiError> {
        self.submit_booking(&BookingRequest::new(class_id, confirmed, waitlist))
            .await
    }

    pub async fn submit_booking(&self, booking: &BookingRequest) -> Result<(), ApiError> {
        const OP: &str = "BookClass";

        self.require_token(OP)?;
        let body = booking
            .to_json(self.booking_payload)
            .map_err(|source| ApiError::Encode {
                operation: OP,
                source,
            })?;
        let url = Self::endpoint(OP, &self.io_base_url, &BOOKINGS_PATH)?;

        let request = Self::build(
            OP,
            self.request(Method::POST, url)
                .header(http::header::ACCEPT, "application/json")
                .body(body),
        )?;
        let response = self.send(OP, request).await?;
        Self::check_status(OP, response, is_success).await?;

        info!(class_id = %booking.class_id, waitlist = booking.waitlist, "class booked");
        Ok(())
    }

    /// Cancels a booking. The server decides whether it counts as a late
    /// cancellation.
    pub async fn cancel_booking(&self, booking_id: &str) -> Result<(), ApiError> {
        const OP: &str = "CancelBooking";

        self.require_token(OP)?;
        let url = Self::endpoint(
            OP,
            &self.io_base_url,
            &[BOOKINGS_PATH[0], BOOKINGS_PATH[1], booking_id],
        )?;

        let request = Self::build(
            OP,
            self.request(Method::DELETE, url)
                .header(http::header::ACCEPT, "application/json"),
        )?;
        let response = self.send(OP, request).await?;
        Self::check_status(OP, response, is_cancel_success).await?;

        info!(booking_id, "booking canceled");
        Ok(())
    }

    /// Bookings whose class falls between `starts_after` and `ends_before`.
    pub async fn get_bookings(
        &self,
        starts_after: DateTime<Utc>,
        ends_before: DateTime<Utc>,
        include_canceled: bool,
    ) -> Result<Vec<Booking>, ApiError> {
        const OP: &str = "GetBookings";

        self.require_token(OP)?;
        let mut url = Self::endpoint(OP, &self.io_base_url, &BOOKINGS_PATH)?;
        url.query_pairs_mut()
            .append_pair(
                "starts_after",
                &starts_after.to_rfc3339_opts(SecondsFormat::Secs, true),
            )
            .append_pair(
                "ends_before",
                &ends_before.to_rfc3339_opts(SecondsFormat::Secs, true),
            )
            .append_pair("include_canceled", &include_canceled.to_string());

        let request = Self::build(
            OP,
            self.request(Method::GET, url)
                .header(http::header::ACCEPT, "application/json"),
        )?;
        let response = self.send(OP, request).await?;
        let response = Self::check_status(OP, response, is_success).await?;
        let parsed: BookingsResult = Self::decode(OP, response).await?;
        Ok(parsed.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_accepts_only_ok_and_no_content() {
        assert!(is_cancel_success(StatusCode::OK));
        assert!(is_cancel_success(StatusCode::NO_CONTENT));
        assert!(!is_cancel_success(StatusCode::ACCEPTED));
        assert!(!is_cancel_success(StatusCode::NOT_FOUND));
    }
}
