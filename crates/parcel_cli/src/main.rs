//! Command-line front end for the parcel tracker.
//!
//! # Responsibility
//! - Map flags and environment variables onto core configuration.
//! - Run one tracker use case per invocation and print plain-text results.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::warn;
use parcel_core::db::open_db;
use parcel_core::{
    default_log_level, init_logging, ClientId, Parcel, ParcelNumber, ParcelService,
    ParcelServiceError, ParcelStore, SqliteParcelStore,
};
use std::path::PathBuf;

const DEMO_CLIENT: ClientId = 1;
const DEMO_ADDRESS: &str = "Pskov, Pushkin street 5";
const DEMO_NEW_ADDRESS: &str = "Saratov, Kozlov street 25";

#[derive(Debug, Parser)]
#[command(name = "parcel-tracker", version, about = "Register and track parcels")]
struct Cli {
    /// SQLite database file; created and migrated when missing.
    #[arg(long, env = "PARCEL_TRACKER_DB", default_value = "tracker.db")]
    db: PathBuf,

    #[arg(long, env = "PARCEL_TRACKER_LOG_LEVEL", default_value = default_log_level())]
    log_level: String,

    /// Directory for rolling log files. Logging stays off when unset.
    #[arg(long, env = "PARCEL_TRACKER_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register a new parcel for a client.
    Register {
        #[arg(long)]
        client: ClientId,
        #[arg(long)]
        address: String,
    },
    /// Show one parcel.
    Get { number: ParcelNumber },
    /// List every parcel of a client.
    List {
        #[arg(long)]
        client: ClientId,
    },
    /// Advance a parcel to its next status.
    NextStatus { number: ParcelNumber },
    /// Change the address of a registered parcel.
    SetAddress {
        number: ParcelNumber,
        address: String,
    },
    /// Delete a registered parcel.
    Delete { number: ParcelNumber },
    /// Run a scripted walk through the whole parcel lifecycle.
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let log_dir = if log_dir.is_absolute() {
            log_dir.clone()
        } else {
            std::env::current_dir()
                .context("failed to resolve current directory")?
                .join(log_dir)
        };
        init_logging(&cli.log_level, &log_dir.to_string_lossy()).map_err(anyhow::Error::msg)?;
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let store = SqliteParcelStore::try_new(&conn).context("database is missing parcel schema")?;
    let service = ParcelService::new(store);

    run(&service, cli.command)
}

fn run<S: ParcelStore>(service: &ParcelService<S>, command: Command) -> Result<()> {
    match command {
        Command::Register { client, address } => {
            let parcel = service.register(client, address)?;
            print_registered(&parcel);
        }
        Command::Get { number } => print_parcel(&service.get(number)?),
        Command::List { client } => print_client_parcels(service, client)?,
        Command::NextStatus { number } => print_next_status(service, number)?,
        Command::SetAddress { number, address } => {
            service.change_address(number, &address)?;
            println!("Parcel #{number}: new address {address}");
        }
        Command::Delete { number } => {
            service.delete(number)?;
            println!("Parcel #{number} deleted");
        }
        Command::Demo => run_demo(service)?,
    }
    Ok(())
}

fn run_demo<S: ParcelStore>(service: &ParcelService<S>) -> Result<()> {
    let parcel = service.register(DEMO_CLIENT, DEMO_ADDRESS)?;
    print_registered(&parcel);
    print_client_parcels(service, DEMO_CLIENT)?;

    service.change_address(parcel.number, DEMO_NEW_ADDRESS)?;
    println!("Parcel #{}: new address {DEMO_NEW_ADDRESS}", parcel.number);
    print_next_status(service, parcel.number)?;
    print_client_parcels(service, DEMO_CLIENT)?;

    // Sent parcels must stay; the refusal is part of the walk-through.
    match service.delete(parcel.number) {
        Ok(()) => println!("Parcel #{} deleted", parcel.number),
        Err(err @ ParcelServiceError::NotRegistered { .. }) => {
            warn!("event=demo_delete module=cli status=refused number={}", parcel.number);
            println!("Not deleted: {err}");
        }
        Err(err) => return Err(err.into()),
    }
    print_client_parcels(service, DEMO_CLIENT)?;

    let extra = service.register(DEMO_CLIENT, DEMO_ADDRESS)?;
    print_registered(&extra);
    service.delete(extra.number)?;
    println!("Parcel #{} deleted", extra.number);
    print_client_parcels(service, DEMO_CLIENT)?;

    Ok(())
}

fn print_registered(parcel: &Parcel) {
    println!(
        "Parcel #{} to {} for client {} registered at {}",
        parcel.number, parcel.address, parcel.client, parcel.created_at
    );
}

fn print_parcel(parcel: &Parcel) {
    println!(
        "Parcel #{} to {} registered at {}, status {}",
        parcel.number, parcel.address, parcel.created_at, parcel.status
    );
}

fn print_client_parcels<S: ParcelStore>(service: &ParcelService<S>, client: ClientId) -> Result<()> {
    let parcels = service.client_parcels(client)?;
    println!("Parcels of client {client}:");
    for parcel in &parcels {
        print_parcel(parcel);
    }
    println!();
    Ok(())
}

fn print_next_status<S: ParcelStore>(
    service: &ParcelService<S>,
    number: ParcelNumber,
) -> Result<()> {
    match service.next_status(number)? {
        Some(status) => println!("Parcel #{number}: new status {status}"),
        None => println!("Parcel #{number} has no next status"),
    }
    Ok(())
}
