//! Terminal presentation of studios, classes and bookings.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::models::{Booking, BookingStatus, ScheduledClass, Studio};

pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const WHITE: &str = "\x1b[37m";

    /// Cycled through to tell studios apart.
    pub const STUDIO_PALETTE: [&str; 7] = [RED, GREEN, YELLOW, BLUE, MAGENTA, CYAN, WHITE];

    pub fn paint(text: &str, color: &str) -> String {
        format!("{color}{text}{RESET}")
    }
}

const COLUMN_GAP: usize = 2;
const MIN_STUDIO_COLUMN: usize = 10;

/// Zone used to show class times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayZone {
    Local,
    Named(Tz),
}

impl DisplayZone {
    /// Falls back to the local zone when the preference is unset or not a
    /// known IANA name.
    pub fn from_preference(name: Option<&str>) -> Self {
        match name.filter(|n| !n.is_empty()) {
            None => DisplayZone::Local,
            Some(name) => match name.parse::<Tz>() {
                Ok(tz) => DisplayZone::Named(tz),
                Err(_) => {
                    warn!(timezone = name, "invalid timezone, using local timezone");
                    DisplayZone::Local
                }
            },
        }
    }

    fn format(&self, instant: DateTime<Utc>, fmt: &str) -> String {
        match self {
            DisplayZone::Local => instant.with_timezone(&chrono::Local).format(fmt).to_string(),
            DisplayZone::Named(tz) => instant.with_timezone(tz).format(fmt).to_string(),
        }
    }

    /// `6:05 AM CST`
    pub fn time(&self, instant: DateTime<Utc>) -> String {
        self.format(instant, "%-I:%M %p %Z")
    }

    /// `Mon Jan 2`
    pub fn day(&self, instant: DateTime<Utc>) -> String {
        self.format(instant, "%a %b %-d")
    }
}

pub fn day_header(day: &str) -> String {
    format!("=== {day} ===")
}

/// Pads with spaces or cuts to exactly `width` characters.
pub fn pad_or_truncate(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len > width {
        text.chars().take(width).collect()
    } else {
        format!("{text}{}", " ".repeat(width - len))
    }
}

/// Width of one schedule line for a terminal `columns` wide.
pub fn entry_width(columns: u16) -> usize {
    match columns {
        c if c >= 120 => 110,
        c if c >= 100 => 90,
        _ => 70,
    }
}

pub fn studio_option(studio: &Studio) -> String {
    format!(
        "{} (ID: {}, {:.2} miles)",
        studio.name, studio.id, studio.distance
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleRow<'a> {
    DayHeader(String),
    Class {
        label: String,
        class: &'a ScheduledClass,
    },
}

impl ScheduleRow<'_> {
    pub fn label(&self) -> &str {
        match self {
            ScheduleRow::DayHeader(header) => header,
            ScheduleRow::Class { label, .. } => label,
        }
    }
}

/// Lays the schedule out as aligned columns grouped under day headers.
/// Canceled classes are left out.
pub fn schedule_rows(
    classes: &[ScheduledClass],
    zone: DisplayZone,
    entry_width: usize,
) -> Vec<ScheduleRow<'_>> {
    let visible: Vec<&ScheduledClass> = classes.iter().filter(|c| !c.canceled).collect();

    let (mut name_w, mut start_w, mut end_w) = (0, 0, 0);
    for class in &visible {
        name_w = name_w.max(class.name.chars().count());
        start_w = start_w.max(zone.time(class.starts_at).chars().count());
        end_w = end_w.max(zone.time(class.ends_at).chars().count());
    }
    let studio_start = name_w + start_w + end_w + 3 * COLUMN_GAP;
    let studio_w = entry_width
        .saturating_sub(studio_start)
        .max(MIN_STUDIO_COLUMN);
    let gap = " ".repeat(COLUMN_GAP);

    let mut studio_colors: HashMap<&str, &str> = HashMap::new();
    let mut rows = Vec::new();
    let mut last_day = String::new();

    for class in visible {
        let next_color = colors::STUDIO_PALETTE[studio_colors.len() % colors::STUDIO_PALETTE.len()];
        let color = *studio_colors
            .entry(class.studio.id.as_str())
            .or_insert(next_color);

        let day = zone.day(class.starts_at);
        if day != last_day {
            rows.push(ScheduleRow::DayHeader(day_header(&day)));
            last_day = day;
        }

        let label = format!(
            "{}{gap}{}{gap}{}{gap}{}",
            pad_or_truncate(&class.name, name_w),
            pad_or_truncate(&zone.time(class.starts_at), start_w),
            pad_or_truncate(&zone.time(class.ends_at), end_w),
            colors::paint(&pad_or_truncate(&class.studio.name, studio_w), color),
        );
        rows.push(ScheduleRow::Class { label, class });
    }
    rows
}

pub fn class_details(class: &ScheduledClass, zone: DisplayZone) -> String {
    format!(
        "Class: {}\nStudio: {}\nTime: {} to {}\nAvailability: {}/{} spots\nClass ID: {}",
        class.name,
        class.studio.name,
        zone.time(class.starts_at),
        zone.time(class.ends_at),
        class.booking_capacity,
        class.max_capacity,
        class.id
    )
}

pub fn status_label(status: BookingStatus) -> String {
    match status {
        BookingStatus::Booked => colors::paint("Booked", colors::GREEN),
        BookingStatus::LateCanceled => colors::paint("Late Canceled", colors::YELLOW),
        BookingStatus::Canceled => colors::paint("Canceled", colors::RED),
    }
}

/// One-line description used when picking a booking.
pub fn booking_option(booking: &Booking, zone: DisplayZone) -> String {
    format!(
        "{} - {} at {} - {}",
        zone.day(booking.class.starts_at),
        booking.class.name,
        booking.class.studio.name,
        zone.time(booking.class.starts_at)
    )
}

pub fn booking_details(booking: &Booking, zone: DisplayZone) -> String {
    format!(
        "Class: {}\nStudio: {}\nTime: {}\nBooking ID: {}",
        booking.class.name,
        booking.class.studio.name,
        zone.time(booking.class.starts_at),
        booking.id
    )
}

/// Every booking grouped by day, with its status.
pub fn bookings_report(bookings: &[Booking], zone: DisplayZone) -> String {
    let mut out = format!("Your Bookings ({} total):\n\n", bookings.len());
    let mut last_day = String::new();

    for (i, booking) in bookings.iter().enumerate() {
        let day = zone.day(booking.class.starts_at);
        if day != last_day {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&day_header(&day));
            out.push('\n');
            last_day = day;
        }
        out.push_str(&format!(
            "{}\n   Studio: {}\n   Time: {}\n   Status: {}\n   Booking ID: {}\n\n",
            colors::paint(&booking.class.name, colors::CYAN),
            booking.class.studio.name,
            zone.time(booking.class.starts_at),
            status_label(booking.status()),
            booking.id
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::models::ClassStudio;

    fn class(id: &str, name: &str, studio: &str, hour: u32, canceled: bool) -> ScheduledClass {
        let starts_at = Utc.with_ymd_and_hms(2025, 3, 10, hour, 0, 0).unwrap();
        ScheduledClass {
            id: id.into(),
            name: name.into(),
            starts_at,
            ends_at: starts_at + chrono::Duration::hours(1),
            max_capacity: 24,
            booking_capacity: 5,
            waitlist_size: 0,
            waitlist_available: false,
            canceled,
            studio: ClassStudio {
                id: studio.into(),
                name: format!("Studio {studio}"),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_pad_or_truncate_counts_chars() {
        assert_eq!(pad_or_truncate("abc", 5), "abc  ");
        assert_eq!(pad_or_truncate("abcdef", 3), "abc");
        assert_eq!(pad_or_truncate("Rzeszów", 7), "Rzeszów");
        assert_eq!(pad_or_truncate("żółw", 2), "żó");
    }

    #[test]
    fn test_entry_width_breakpoints() {
        assert_eq!(entry_width(200), 110);
        assert_eq!(entry_width(120), 110);
        assert_eq!(entry_width(100), 90);
        assert_eq!(entry_width(80), 70);
    }

    #[test]
    fn test_named_zone_formatting() {
        let zone = DisplayZone::from_preference(Some("America/Chicago"));
        let instant = Utc.with_ymd_and_hms(2025, 1, 6, 12, 5, 0).unwrap();
        assert_eq!(zone.time(instant), "6:05 AM CST");
        assert_eq!(zone.day(instant), "Mon Jan 6");
    }

    #[test]
    fn test_invalid_zone_falls_back_to_local() {
        assert_eq!(
            DisplayZone::from_preference(Some("Mars/Olympus")),
            DisplayZone::Local
        );
        assert_eq!(DisplayZone::from_preference(Some("")), DisplayZone::Local);
        assert_eq!(DisplayZone::from_preference(None), DisplayZone::Local);
    }

    #[test]
    fn test_schedule_rows_group_by_day_and_skip_canceled() {
        let zone = DisplayZone::Named(chrono_tz::UTC);
        let classes = vec![
            class("c-1", "Orange 60", "a", 6, false),
            class("c-2", "Strength 50", "b", 7, true),
            class("c-3", "Tread 50", "b", 8, false),
        ];

        let rows = schedule_rows(&classes, zone, 70);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], ScheduleRow::DayHeader("=== Mon Mar 10 ===".into()));
        match &rows[2] {
            ScheduleRow::Class { class, label } => {
                assert_eq!(class.id, "c-3");
                assert!(label.starts_with("Tread 50 "));
                assert!(label.contains(colors::GREEN));
            }
            other => panic!("unexpected row {other:?}"),
        }
    }

    #[test]
    fn test_schedule_rows_reuse_color_per_studio() {
        let zone = DisplayZone::Named(chrono_tz::UTC);
        let classes = vec![
            class("c-1", "Orange 60", "a", 6, false),
            class("c-2", "Orange 60", "a", 9, false),
        ];
        let rows = schedule_rows(&classes, zone, 110);
        for row in &rows[1..] {
            assert!(row.label().contains(colors::RED));
        }
    }
}
