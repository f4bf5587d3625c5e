//! Command-line definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Browse studio schedules and manage class bookings.
#[derive(Debug, Parser)]
#[command(name = "otf-cli", version)]
#[command(about = "A CLI client for browsing class schedules and managing bookings", long_about = None)]
pub struct Cli {
    /// Override the preferences file location.
    #[arg(long, global = true, env = "OTF_PREFERENCES_PATH")]
    pub preferences: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch studio schedules and book a class.
    ///
    /// Uses the saved preferred studios when --studio-ids is not given.
    Schedules {
        /// Comma-separated list of studio IDs.
        #[arg(long, value_delimiter = ',')]
        studio_ids: Vec<String>,
    },
    /// Manage your bookings.
    Bookings(BookingsCommand),
    /// Configure preferred studios and timezone.
    Configure(ConfigureCommand),
}

#[derive(Debug, Parser)]
pub struct BookingsCommand {
    #[command(subcommand)]
    pub action: BookingsAction,
}

#[derive(Debug, Subcommand)]
pub enum BookingsAction {
    /// List upcoming bookings and optionally cancel one.
    List,
    /// Cancel a booking by ID.
    Cancel {
        /// Booking ID, as shown by `bookings list`.
        booking_id: String,
    },
    /// Write upcoming bookings to an iCalendar file.
    Export {
        /// Output file.
        #[arg(long, short, default_value = "otf_bookings.ics")]
        output: PathBuf,
        /// How many days ahead to include.
        #[arg(long, default_value_t = 60)]
        days: i64,
    },
}

#[derive(Debug, Parser)]
pub struct ConfigureCommand {
    #[command(subcommand)]
    pub action: ConfigureAction,
}

#[derive(Debug, Subcommand)]
pub enum ConfigureAction {
    /// Search studios near you and save your preferred ones.
    Studios,
    /// Set the timezone used to display class times.
    Timezone,
}
