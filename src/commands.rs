//! Interactive command handlers.

use std::path::Path;
use std::time::Duration as StdDuration;

use anstream::println as aprintln;
use chrono::{DateTime, Duration, NaiveTime, Utc};
use dialoguer::{Confirm, Input, MultiSelect, Select};
use thiserror::Error;
use tracing::{info, warn};

use crate::client::OtfClient;
use crate::error::ApiError;
use crate::geo;
use crate::ical::ICalExporter;
use crate::preferences::{Preferences, PreferencesError, PreferencesStore};
use crate::render::{self, DisplayZone, ScheduleRow};
use crate::settings::Settings;

const PAGE_SIZE: usize = 15;
const BOOKINGS_WINDOW_DAYS: i64 = 60;
const JUST_VIEW: &str = "Just view bookings (no action)";
const SYSTEM_TIMEZONE: &str = "System Local Timezone";
const COMMON_TIMEZONES: [&str; 11] = [
    "America/New_York",
    "America/Chicago",
    "America/Denver",
    "America/Los_Angeles",
    "America/Anchorage",
    "Pacific/Honolulu",
    "America/Phoenix",
    "America/Detroit",
    "America/Indiana/Indianapolis",
    "America/Kentucky/Louisville",
    "America/Boise",
];

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Preferences(#[from] PreferencesError),
    #[error("error creating API client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("error reading input: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Usage(String),
}

async fn connect(settings: &Settings) -> Result<OtfClient, CommandError> {
    let mut client = OtfClient::new(settings)?;
    client
        .authenticate(&settings.username, &settings.password)
        .await?;
    Ok(client)
}

fn load_or_default(store: &PreferencesStore) -> Preferences {
    store.load().unwrap_or_else(|err| {
        warn!(error = %err, "could not load preferences");
        Preferences::default()
    })
}

fn confirm(prompt: &str) -> Result<bool, CommandError> {
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

/// From the start of the current UTC day to `days` from now.
pub(crate) fn upcoming_window(now: DateTime<Utc>, days: i64) -> (DateTime<Utc>, DateTime<Utc>) {
    let start_of_day = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    (start_of_day, now + Duration::days(days))
}

/// Explicit ids win; otherwise the saved preferred studios are used.
pub(crate) fn resolve_studio_ids(
    explicit: Vec<String>,
    preferences: &Preferences,
) -> Result<Vec<String>, CommandError> {
    let explicit: Vec<String> = explicit
        .into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();
    if !explicit.is_empty() {
        return Ok(explicit);
    }
    if preferences.preferred_studio_ids.is_empty() {
        return Err(CommandError::Usage(
            "no studio IDs provided via --studio-ids and no preferred studios found in configuration; run 'otf-cli configure studios' or provide the --studio-ids flag".into(),
        ));
    }
    Ok(preferences.preferred_studio_ids.clone())
}

pub async fn schedules(
    settings: &Settings,
    store: &PreferencesStore,
    studio_ids: Vec<String>,
) -> Result<(), CommandError> {
    let preferences = if studio_ids.is_empty() {
        store.load()?
    } else {
        load_or_default(store)
    };
    let ids = resolve_studio_ids(studio_ids, &preferences)?;
    info!(studio_ids = %ids.join(", "), "fetching schedules");

    let client = connect(settings).await?;
    let schedule = client.get_studios_schedules(&ids).await?;
    if schedule.items.is_empty() {
        aprintln!("No classes found for the selected studios.");
        return Ok(());
    }

    let zone = DisplayZone::from_preference(preferences.timezone.as_deref());
    let columns = crossterm::terminal::size().map(|(c, _)| c).unwrap_or(80);
    let rows = render::schedule_rows(&schedule.items, zone, render::entry_width(columns));
    if rows.is_empty() {
        aprintln!("No available classes found for the selected studios.");
        return Ok(());
    }
    let labels: Vec<&str> = rows.iter().map(ScheduleRow::label).collect();

    let class = loop {
        let picked = Select::new()
            .with_prompt("Select a class to book")
            .items(&labels)
            .max_length(PAGE_SIZE)
            .interact()?;
        match &rows[picked] {
            ScheduleRow::Class { class, .. } => break *class,
            ScheduleRow::DayHeader(_) => aprintln!("That is a day header, pick a class."),
        }
    };

    aprintln!("\nSelected Class Details:");
    aprintln!("{}", render::class_details(class, zone));

    if !confirm("Would you like to book this class?")? {
        aprintln!("Booking cancelled.");
        return Ok(());
    }

    let waitlist = class.is_full();
    if waitlist && !confirm("This class is full. Would you like to join the waitlist?")? {
        aprintln!("Booking cancelled.");
        return Ok(());
    }

    client.book_class(&class.id, false, waitlist).await?;
    let message = if waitlist {
        "Successfully added to waitlist!"
    } else {
        "Successfully booked the class!"
    };
    aprintln!("{}", render::colors::paint(message, render::colors::GREEN));
    Ok(())
}

pub async fn list_bookings(
    settings: &Settings,
    store: &PreferencesStore,
) -> Result<(), CommandError> {
    let client = connect(settings).await?;
    let (starts_after, ends_before) = upcoming_window(Utc::now(), BOOKINGS_WINDOW_DAYS);
    let bookings = client
        .get_bookings(starts_after, ends_before, true)
        .await?;

    if bookings.is_empty() {
        aprintln!("No bookings found.");
        return Ok(());
    }

    let zone = DisplayZone::from_preference(load_or_default(store).timezone.as_deref());
    let active: Vec<_> = bookings.iter().filter(|b| !b.canceled).collect();
    if active.is_empty() {
        aprintln!("No active bookings found.");
        return Ok(());
    }

    let mut options: Vec<String> = active
        .iter()
        .map(|b| render::booking_option(b, zone))
        .collect();
    options.push(JUST_VIEW.to_string());

    let picked = Select::new()
        .with_prompt("Select a booking to cancel (or just view)")
        .items(&options)
        .max_length(PAGE_SIZE)
        .interact()?;

    let Some(booking) = active.get(picked) else {
        aprintln!("\n{}", render::bookings_report(&bookings, zone));
        return Ok(());
    };

    aprintln!("\nSelected Booking:");
    aprintln!("{}", render::booking_details(booking, zone));
    if !confirm("Are you sure you want to cancel this booking?")? {
        aprintln!("Cancellation aborted.");
        return Ok(());
    }

    client.cancel_booking(&booking.id).await?;
    aprintln!(
        "Successfully canceled booking for {} at {}",
        booking.class.name,
        booking.class.studio.name
    );
    Ok(())
}

pub async fn cancel_booking(settings: &Settings, booking_id: &str) -> Result<(), CommandError> {
    let client = connect(settings).await?;

    if !confirm(&format!("Are you sure you want to cancel booking {booking_id}?"))? {
        aprintln!("Cancellation aborted.");
        return Ok(());
    }

    client.cancel_booking(booking_id).await?;
    aprintln!("Successfully canceled booking {booking_id}");
    Ok(())
}

pub async fn export_bookings(
    settings: &Settings,
    output: &Path,
    days: i64,
) -> Result<(), CommandError> {
    if days <= 0 {
        return Err(CommandError::Usage("--days must be positive".into()));
    }
    let client = connect(settings).await?;
    let (starts_after, ends_before) = upcoming_window(Utc::now(), days);
    let bookings = client
        .get_bookings(starts_after, ends_before, false)
        .await?;

    let body = ICalExporter::new().generate(&bookings);
    if body.is_empty() {
        aprintln!("No active bookings to export.");
        return Ok(());
    }
    std::fs::write(output, body)?;
    let exported = bookings.iter().filter(|b| !b.canceled).count();
    aprintln!("Wrote {exported} booking(s) to {}", output.display());
    Ok(())
}

fn prompt_coordinate(message: &str) -> Result<f64, CommandError> {
    Ok(Input::<f64>::new().with_prompt(message).interact_text()?)
}

pub async fn configure_studios(
    settings: &Settings,
    store: &PreferencesStore,
) -> Result<(), CommandError> {
    let client = connect(settings).await?;

    let geo_timeout = StdDuration::from_secs(settings.request_timeout_secs);
    let (latitude, longitude, source) =
        match geo::locate(&settings.geolocation_url, geo_timeout).await {
            Ok(location) => (
                location.lat,
                location.lon,
                format!("detected from your IP in {}", location.describe()),
            ),
            Err(err) => {
                warn!(error = %err, "could not detect location from IP");
                (
                    prompt_coordinate("Enter your latitude (e.g., 40.7128)")?,
                    prompt_coordinate("Enter your longitude (e.g., -74.0060)")?,
                    "manually entered".to_string(),
                )
            }
        };

    let distance = prompt_coordinate("Enter search distance in miles (e.g., 10)")?;

    aprintln!("Using location {source}: {latitude:.6}, {longitude:.6}");
    aprintln!("Fetching studios near you...");
    let result = client.list_studios(latitude, longitude, distance).await?;
    let studios = result.data.studios;
    if studios.is_empty() {
        aprintln!(
            "No studios found for the given location and distance. Try increasing the distance or checking your coordinates."
        );
        return Ok(());
    }

    let options: Vec<String> = studios.iter().map(render::studio_option).collect();
    let picked = MultiSelect::new()
        .with_prompt("Select your preferred studios (space to select, enter to confirm)")
        .items(&options)
        .max_length(PAGE_SIZE)
        .interact()?;

    let mut preferences = load_or_default(store);
    preferences.preferred_studio_ids = picked
        .into_iter()
        .map(|i| studios[i].id.clone())
        .collect();
    store.save(&preferences)?;

    if preferences.preferred_studio_ids.is_empty() {
        aprintln!("No studios selected. Preferred studios cleared.");
    } else {
        aprintln!(
            "Preferred studios saved: {}",
            preferences.preferred_studio_ids.join(", ")
        );
    }
    Ok(())
}

/// Timezone choices with the current preference kept and the system option
/// last.
pub(crate) fn timezone_options(current: Option<&str>) -> (Vec<String>, usize) {
    let mut options: Vec<String> = COMMON_TIMEZONES.iter().map(|tz| tz.to_string()).collect();
    if let Some(current) = current.filter(|c| !c.is_empty())
        && !options.iter().any(|tz| tz == current)
    {
        options.push(current.to_string());
    }
    options.push(SYSTEM_TIMEZONE.to_string());

    let default = current
        .and_then(|c| options.iter().position(|tz| tz == c))
        .unwrap_or(options.len() - 1);
    (options, default)
}

pub fn configure_timezone(store: &PreferencesStore) -> Result<(), CommandError> {
    let mut preferences = load_or_default(store);
    let (options, default) = timezone_options(preferences.timezone.as_deref());

    let picked = Select::new()
        .with_prompt("Select your preferred timezone")
        .items(&options)
        .default(default)
        .interact()?;

    preferences.timezone = match options[picked].as_str() {
        SYSTEM_TIMEZONE => None,
        tz => Some(tz.to_string()),
    };
    store.save(&preferences)?;

    match &preferences.timezone {
        Some(tz) => aprintln!("Timezone set to: {tz}"),
        None => aprintln!("Timezone set to use system local timezone."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_upcoming_window() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 15, 30, 0).unwrap();
        let (start, end) = upcoming_window(now, 60);
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 5, 9, 15, 30, 0).unwrap());
    }

    #[test]
    fn test_resolve_studio_ids_prefers_flag() {
        let prefs = Preferences {
            preferred_studio_ids: vec!["saved".into()],
            timezone: None,
        };
        let ids = resolve_studio_ids(vec![" a ".into(), "".into(), "b".into()], &prefs).unwrap();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(resolve_studio_ids(Vec::new(), &prefs).unwrap(), vec!["saved"]);
    }

    #[test]
    fn test_resolve_studio_ids_requires_some_source() {
        let err = resolve_studio_ids(Vec::new(), &Preferences::default()).unwrap_err();
        assert!(matches!(err, CommandError::Usage(_)));
    }

    #[test]
    fn test_timezone_options_keep_current_and_default_to_it() {
        let (options, default) = timezone_options(Some("Europe/Warsaw"));
        assert_eq!(options[default], "Europe/Warsaw");
        assert_eq!(options.last().unwrap(), SYSTEM_TIMEZONE);

        let (options, default) = timezone_options(Some("America/Denver"));
        assert_eq!(options.len(), COMMON_TIMEZONES.len() + 1);
        assert_eq!(options[default], "America/Denver");

        let (options, default) = timezone_options(None);
        assert_eq!(options[default], SYSTEM_TIMEZONE);
    }
}
