//! Parking system - interactive garage console
//!
//! Parks arriving vehicles, prices and releases leaving ones.
//!
//! Module structure:
//! - `domain/` - Core business types (ParkingSpot, Ticket, errors, fare constants)
//! - `io/` - External interfaces (storage traits, in-memory store, ledger, console)
//! - `services/` - Business logic (FareCalculator, SpotAllocator, ParkingService)
//! - `infra/` - Infrastructure (Config, Metrics)

use clap::Parser;
use parking_system::domain::InputError;
use parking_system::infra::{Config, Metrics};
use parking_system::io::{ConsoleInput, InputSource, LedgerTicketStore, MemoryStore, TicketStore};
use parking_system::services::{ExitingOutcome, IncomingOutcome, ParkingService};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

const MENU: &str = "Please select an option. Simply enter the number to choose an action\n\
                    1 New Vehicle Entering - Allocate Parking Space\n\
                    2 Vehicle Exiting - Generate Ticket Price\n\
                    3 Shutdown System";

/// Parking system - garage entry/exit console
#[derive(Parser, Debug)]
#[command(name = "parking-system", version, about)]
struct Args {
    /// Path to TOML configuration file (falls back to PARKING_CONFIG, then config/garage.toml)
    #[arg(short, long)]
    config: Option<String>,
}

fn main() -> anyhow::Result<()> {
    // Initialize structured logging with configurable level via RUST_LOG env var
    // Logs go to stderr so they stay out of the operator prompts
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!(git_hash = env!("GIT_HASH"), "parking-system starting");

    let args = Args::parse();
    let config_path = Config::resolve_config_path(args.config.as_deref());
    let config = Config::load_from_path(&config_path);

    info!(
        config_file = %config.config_file(),
        site_id = %config.site_id(),
        car_spots = %config.car_spots(),
        bike_spots = %config.bike_spots(),
        ledger_enabled = %config.ledger_enabled(),
        ledger_file = %config.ledger_file(),
        "config_loaded"
    );

    let store = Arc::new(MemoryStore::with_layout(config.car_spots(), config.bike_spots()));
    let tickets: Arc<dyn TicketStore> = if config.ledger_enabled() {
        Arc::new(LedgerTicketStore::new(store.clone(), config.ledger_file()))
    } else {
        store.clone()
    };

    let input = Arc::new(ConsoleInput::stdio());
    let metrics = Arc::new(Metrics::new());
    let service =
        ParkingService::new(input.clone(), store.clone(), tickets).with_metrics(metrics.clone());

    println!("Welcome to Parking System!");
    run_shell(input.as_ref(), &service);

    let (free_cars, free_bikes) = store.free_spots();
    info!(free_car_spots = %free_cars, free_bike_spots = %free_bikes, "garage_state");
    metrics.report().log();
    info!("parking-system shutdown complete");
    Ok(())
}

/// Menu loop: runs one sequence per selection until shutdown or end of input
fn run_shell(input: &dyn InputSource, service: &ParkingService) {
    loop {
        input.prompt(MENU);
        match input.read_selection() {
            Ok(1) => match service.process_incoming_vehicle() {
                Ok(outcome) => acknowledge_incoming(&outcome),
                Err(e) => println!("Unable to process incoming vehicle: {}", e),
            },
            Ok(2) => match service.process_exiting_vehicle() {
                Ok(outcome) => acknowledge_exiting(&outcome),
                Err(e) => println!("Unable to process exiting vehicle: {}", e),
            },
            Ok(3) => {
                println!("Exiting from the system!");
                break;
            }
            Ok(_) => {
                println!("Unsupported option. Please enter a number corresponding to the provided menu");
            }
            Err(InputError::Closed) => {
                info!("input_closed");
                break;
            }
            Err(e) => {
                warn!(error = %e, "menu_input_failed");
            }
        }
    }
}

fn acknowledge_incoming(outcome: &IncomingOutcome) {
    match outcome {
        IncomingOutcome::Parked { ticket, recurring } => {
            if *recurring {
                println!(
                    "Welcome back! As a recurring user of our parking lot, \
                     you'll benefit from a 5% discount."
                );
            }
            if let Some(spot_id) = ticket.spot_id() {
                println!("Please park your vehicle in spot number: {}", spot_id);
            }
            println!(
                "Recorded in-time for vehicle number: {} is: {}",
                ticket.vehicle_reg_number,
                ticket.in_time.format("%Y-%m-%d %H:%M:%S")
            );
        }
        IncomingOutcome::SpotNotReserved { .. } | IncomingOutcome::TicketNotSaved { .. } => {
            println!("Unable to process incoming vehicle");
        }
    }
}

fn acknowledge_exiting(outcome: &ExitingOutcome) {
    match outcome {
        ExitingOutcome::Released { ticket, .. } => {
            println!("Please pay the parking fare: {:.2}", ticket.price);
            if let Some(out_time) = ticket.out_time {
                println!(
                    "Recorded out-time for vehicle number: {} is: {}",
                    ticket.vehicle_reg_number,
                    out_time.format("%Y-%m-%d %H:%M:%S")
                );
            }
        }
        ExitingOutcome::SpotNotReleased { ticket, .. } => {
            println!("Please pay the parking fare: {:.2}", ticket.price);
            println!("Unable to release the parking spot, please contact an attendant");
        }
        ExitingOutcome::TicketNotUpdated { .. } => {
            println!("Unable to update ticket information. Error occurred");
        }
    }
}
