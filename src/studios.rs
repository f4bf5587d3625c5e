use reqwest::Method;

use crate::client::{OtfClient, is_success};
use crate::error::ApiError;
use crate::models::StudioListResult;
use crate::validation::{validate_distance, validate_latitude, validate_longitude};

pub const LATITUDE_QUERY_PARAM: &str = "latitude";
pub const LONGITUDE_QUERY_PARAM: &str = "longitude";
pub const DISTANCE_QUERY_PARAM: &str = "distance";

/// Fixed-precision float formatting used for every coordinate query value.
pub(crate) fn format_coordinate(value: f64) -> String {
    format!("{value:.15}")
}

impl OtfClient {
    /// Studios within `distance_miles` of the given point. Only the first page
    /// of results is fetched.
    pub async fn list_studios(
        &self,
        latitude: f64,
        longitude: f64,
        distance_miles: f64,
    ) -> Result<StudioListResult, ApiError> {
        const OP: &str = "ListStudios";

        self.require_token(OP)?;
        let latitude = validate_latitude(OP, latitude)?;
        let longitude = validate_longitude(OP, longitude)?;
        let distance = validate_distance(OP, distance_miles)?;

        let mut url = Self::endpoint(OP, &self.co_base_url, &["studios"])?;
        url.query_pairs_mut()
            .append_pair(LATITUDE_QUERY_PARAM, &format_coordinate(latitude))
            .append_pair(LONGITUDE_QUERY_PARAM, &format_coordinate(longitude))
            .append_pair(DISTANCE_QUERY_PARAM, &format_coordinate(distance));

        let request = Self::build(OP, self.request(Method::GET, url))?;
        let response = self.send(OP, request).await?;
        let response = Self::check_status(OP, response, is_success).await?;
        Self::decode(OP, response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coordinate_fixed_precision() {
        assert_eq!(format_coordinate(50.0), "50.000000000000000");
        assert_eq!(format_coordinate(-97.5), "-97.500000000000000");
        assert_eq!(format_coordinate(30.25).len(), "30.".len() + 15);
    }
}
