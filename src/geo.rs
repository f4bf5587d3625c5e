use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("lookup did not return a usable position")]
    NoPosition,
}

/// Approximate position of the caller derived from their public IP.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct IpLocation {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub city: String,
    #[serde(rename = "regionName", default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
}

impl IpLocation {
    pub fn describe(&self) -> String {
        format!("{}, {}, {}", self.city, self.region, self.country)
    }
}

/// Looks up the caller's position, giving up after `timeout`.
pub async fn locate(url: &Url, timeout: Duration) -> Result<IpLocation, GeoError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let location: IpLocation = client
        .get(url.as_str())
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    if location.lat == 0.0 && location.lon == 0.0 {
        return Err(GeoError::NoPosition);
    }
    Ok(location)
}
