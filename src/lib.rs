pub mod auth;
pub mod booking;
pub mod cli;
pub mod client;
pub mod commands;
pub mod error;
pub mod geo;
pub mod ical;
pub mod models;
pub mod preferences;
pub mod render;
pub mod schedule;
pub mod settings;
pub mod studios;
pub mod transport;
pub mod validation;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub use crate::client::OtfClient;
pub use crate::error::ApiError;

use crate::cli::{BookingsAction, Cli, Commands, ConfigureAction};
use crate::preferences::PreferencesStore;
use crate::settings::Settings;

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let store = match cli.preferences {
        Some(path) => PreferencesStore::new(path),
        None => PreferencesStore::default_location()?,
    };

    // the only command that never talks to the API
    if let Commands::Configure(ref configure) = cli.command
        && matches!(configure.action, ConfigureAction::Timezone)
    {
        init_tracing(false);
        commands::configure_timezone(&store)?;
        return Ok(());
    }

    let settings = Settings::from_env()?;
    init_tracing(settings.debug);

    match cli.command {
        Commands::Schedules { studio_ids } => {
            commands::schedules(&settings, &store, studio_ids).await?
        }
        Commands::Bookings(bookings) => match bookings.action {
            BookingsAction::List => commands::list_bookings(&settings, &store).await?,
            BookingsAction::Cancel { booking_id } => {
                commands::cancel_booking(&settings, &booking_id).await?
            }
            BookingsAction::Export { output, days } => {
                commands::export_bookings(&settings, &output, days).await?
            }
        },
        Commands::Configure(configure) => match configure.action {
            ConfigureAction::Studios => commands::configure_studios(&settings, &store).await?,
            ConfigureAction::Timezone => commands::configure_timezone(&store)?,
        },
    }
    Ok(())
}
