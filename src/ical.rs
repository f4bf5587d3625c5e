use chrono::Duration;
use icalendar::{Calendar, Component, Event, EventLike};

use crate::models::{Address, Booking};

const DEFAULT_CLASS_LENGTH_MIN: i64 = 60;

#[derive(Clone, Default)]
pub struct ICalExporter;

impl ICalExporter {
    pub fn new() -> Self {
        Self
    }

    /// Calendar with one event per booking that is still active.
    pub fn generate(&self, bookings: &[Booking]) -> Vec<u8> {
        let active: Vec<&Booking> = bookings.iter().filter(|b| !b.canceled).collect();
        if active.is_empty() {
            return Vec::new();
        }

        let mut calendar = Calendar::new();
        calendar.name("Class Bookings");

        for booking in active {
            let class = &booking.class;
            let start = class.starts_at;
            let end = start + Duration::minutes(DEFAULT_CLASS_LENGTH_MIN);

            let mut event = Event::new();
            event.summary(&class.name);
            event.starts(start);
            event.ends(end);
            event.location(&location(&class.studio.name, &class.studio.address));
            let mut description = format!("Studio: {}", class.studio.name);
            if !class.coach.first_name.is_empty() {
                description.push_str(&format!("\nCoach: {}", class.coach.first_name));
            }
            description.push_str(&format!("\nBooking ID: {}", booking.id));
            event.description(&description);
            event.uid(&format!("{}-otf-booking", booking.id));
            calendar.push(event);
        }

        calendar.to_string().into_bytes()
    }
}

fn location(studio_name: &str, address: &Address) -> String {
    let parts: Vec<&str> = [
        studio_name,
        address.line1.as_str(),
        address.city.as_str(),
        address.state.as_str(),
        address.postal_code.as_str(),
        address.country.as_str(),
    ]
    .into_iter()
    .filter(|p| !p.is_empty())
    .collect();
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn booking(id: &str, canceled: bool) -> Booking {
        serde_json::from_value(json!({
            "id": id,
            "canceled": canceled,
            "class": {
                "id": "c-1",
                "name": "Orange 60",
                "starts_at": "2025-03-10T11:00:00Z",
                "studio": {
                    "name": "Austin East",
                    "address": {"line1": "1 Main St", "city": "Austin", "state": "TX"}
                },
                "coach": {"first_name": "Sam"}
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_generate_single_booking() {
        let exporter = ICalExporter::new();
        let bytes = exporter.generate(&[booking("b-1", false)]);
        let body = String::from_utf8(bytes).unwrap();
        assert!(body.contains("BEGIN:VCALENDAR"));
        assert!(body.contains("BEGIN:VEVENT"));
        assert!(body.contains("SUMMARY:Orange 60"));
        assert!(body.contains("b-1-otf-booking"));
    }

    #[test]
    fn test_generate_skips_canceled() {
        let exporter = ICalExporter::new();
        assert!(exporter.generate(&[booking("b-1", true)]).is_empty());
        assert!(exporter.generate(&[]).is_empty());
    }

    #[test]
    fn test_location_skips_blank_parts() {
        let address = Address {
            line1: "1 Main St".into(),
            city: "Austin".into(),
            ..Default::default()
        };
        assert_eq!(
            location("Austin East", &address),
            "Austin East, 1 Main St, Austin"
        );
    }
}
