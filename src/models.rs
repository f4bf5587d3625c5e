use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Reads an explicit `null` as the field's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Studio directory

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct StudioLocation {
    #[serde(rename = "physicalAddress", default, deserialize_with = "null_as_default")]
    pub physical_address_one: String,
    #[serde(rename = "physicalAddress2", default, deserialize_with = "null_as_default")]
    pub physical_address_two: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub physical_city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub physical_state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub physical_country: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub latitude: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub longitude: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Studio {
    #[serde(rename = "studioUUId")]
    pub id: String,
    #[serde(rename = "studioName", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "studioLocation", default, deserialize_with = "null_as_default")]
    pub location: StudioLocation,
    /// Miles from the query point.
    #[serde(default, deserialize_with = "null_as_default")]
    pub distance: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_index: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_size: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudioPage {
    pub studios: Vec<Studio>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pagination: Pagination,
}

/// Envelope returned by the studio search endpoint. Only the first page is
/// ever requested.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudioListResult {
    pub data: StudioPage,
}

// Schedules

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Address {
    #[serde(default, deserialize_with = "null_as_default")]
    pub line1: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub postal_code: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassStudio {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub latitude: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub longitude: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledClass {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub max_capacity: i32,
    /// Spots still open; zero or less means only the waitlist is left.
    #[serde(default, deserialize_with = "null_as_default")]
    pub booking_capacity: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub waitlist_size: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub waitlist_available: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub canceled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub studio: ClassStudio,
}

impl ScheduledClass {
    pub fn is_full(&self) -> bool {
        self.booking_capacity <= 0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScheduleResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<ScheduledClass>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterValue {
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub icon_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    #[serde(rename = "class_field_type", default, deserialize_with = "null_as_default")]
    pub class_field_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<FilterValue>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilterResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<FilterItem>,
}

// Bookings

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BookingStudio {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mbo_studio_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub time_zone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: Address,
    #[serde(default, deserialize_with = "null_as_default")]
    pub currency_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub latitude: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Coach {
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookedClass {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub class_type: String,
    /// Wall-clock start at the studio, without an offset.
    #[serde(default, deserialize_with = "null_as_default")]
    pub starts_at_local: String,
    pub starts_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub studio: BookingStudio,
    #[serde(default, deserialize_with = "null_as_default")]
    pub coach: Coach,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub paying_studio_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub person_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub member_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub checked_in: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cross_regional: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub late_canceled: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub intro: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mbo_booking_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mbo_unique_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mbo_paying_unique_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub canceled: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ratable: bool,
    pub class: BookedClass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Booked,
    LateCanceled,
    Canceled,
}

impl Booking {
    pub fn status(&self) -> BookingStatus {
        if self.canceled {
            BookingStatus::Canceled
        } else if self.late_canceled {
            BookingStatus::LateCanceled
        } else {
            BookingStatus::Booked
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookingsResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Booking>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking: Option<Booking>,
}

/// Which key the booking endpoint expects for the class identifier.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingPayload {
    /// `{confirmed, classId, waitlist}`
    #[default]
    ClassId,
    /// `{confirmed, classUUId, waitlist}`
    ClassUuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingRequest {
    pub confirmed: bool,
    #[serde(rename = "classId", alias = "classUUId")]
    pub class_id: String,
    pub waitlist: bool,
}

#[derive(Serialize)]
struct LegacyBookingRequest<'a> {
    confirmed: bool,
    #[serde(rename = "classUUId")]
    class_uuid: &'a str,
    waitlist: bool,
}

impl BookingRequest {
    pub fn new(class_id: impl Into<String>, confirmed: bool, waitlist: bool) -> Self {
        Self {
            confirmed,
            class_id: class_id.into(),
            waitlist,
        }
    }

    /// Serializes the request in the given payload shape.
    pub fn to_json(&self, shape: BookingPayload) -> serde_json::Result<Vec<u8>> {
        match shape {
            BookingPayload::ClassId => serde_json::to_vec(self),
            BookingPayload::ClassUuid => serde_json::to_vec(&LegacyBookingRequest {
                confirmed: self.confirmed,
                class_uuid: &self.class_id,
                waitlist: self.waitlist,
            }),
        }
    }
}
