use reqwest::Method;

use crate::client::{OtfClient, is_success};
use crate::error::ApiError;
use crate::models::{FilterResult, ScheduleResult};

pub const STUDIO_IDS_QUERY_PARAM: &str = "studio_ids";

impl OtfClient {
    /// Upcoming classes for every studio in `studio_ids`.
    pub async fn get_studios_schedules(
        &self,
        studio_ids: &[String],
    ) -> Result<ScheduleResult, ApiError> {
        const OP: &str = "GetStudiosSchedules";

        self.require_token(OP)?;
        let mut url = Self::endpoint(OP, &self.io_base_url, &["classes"])?;
        {
            let mut query = url.query_pairs_mut();
            for id in studio_ids {
                query.append_pair(STUDIO_IDS_QUERY_PARAM, id);
            }
        }

        let request = Self::build(OP, self.request(Method::GET, url))?;
        let response = self.send(OP, request).await?;
        let response = Self::check_status(OP, response, is_success).await?;
        Self::decode(OP, response).await
    }

    /// Class-type facets offered by the schedule endpoint.
    pub async fn get_class_type_filter(&self) -> Result<FilterResult, ApiError> {
        const OP: &str = "GetClassTypeFilter";

        self.require_token(OP)?;
        let url = Self::endpoint(OP, &self.io_base_url, &["classes", "filters"])?;

        let request = Self::build(OP, self.request(Method::GET, url))?;
        let response = self.send(OP, request).await?;
        let response = Self::check_status(OP, response, is_success).await?;
        Self::decode(OP, response).await
    }
}
