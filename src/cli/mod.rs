//! Command-line interface definition and dispatch for renta.
//!
//! Uses [`clap`] for argument parsing with derive macros. Each subcommand is
//! routed to its handler — thread operations live in the [`threads`]
//! submodule. The `cars` and `bookings` subcommands are the thin
//! presentation shell over the data layer (the original demo's pages);
//! `chat` is the door to the support agent.

mod threads;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::config::Config;
use crate::data::{confirm_booking, DataStore};
use crate::{chat, provider, seed};

/// Top-level CLI structure for renta.
#[derive(Parser)]
#[command(name = "renta", about = "A car-rental demo with a tool-calling support agent")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for the renta CLI.
///
/// Each variant maps to a top-level action. The `///` doc comments on variants
/// double as `--help` text rendered by clap.
#[derive(Subcommand)]
pub enum Commands {
    /// Talk to the customer support agent
    Chat {
        /// Sign in as this user id (defaults to the demo user)
        #[arg(short, long)]
        user: Option<i64>,
        /// Resume a specific thread
        #[arg(short, long)]
        thread: Option<String>,
        /// Provider to use (anthropic, openai, groq)
        #[arg(long)]
        provider: Option<String>,
        /// Model to use (overrides config)
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Create the demo tables and policy document
    Seed {
        /// Overwrite existing data files
        #[arg(long)]
        force: bool,
    },
    /// List the car inventory
    Cars,
    /// Inspect and confirm bookings
    Bookings {
        #[command(subcommand)]
        action: BookingAction,
    },
    /// Manage conversation threads
    Threads {
        #[command(subcommand)]
        action: ThreadAction,
    },
}

/// Subcommands for the `bookings` command.
#[derive(Subcommand)]
pub enum BookingAction {
    /// List bookings, optionally for a single user
    List {
        #[arg(short, long)]
        user: Option<i64>,
    },
    /// Confirm a pending booking (the reservations-page action)
    Confirm { id: i64 },
}

/// Subcommands for the `threads` command.
#[derive(Subcommand)]
pub enum ThreadAction {
    /// List all saved threads
    List,
    /// Delete a thread by ID (supports partial IDs)
    Delete { id: String },
}

/// Parses command-line arguments into a [`Cli`] struct.
///
/// Delegates to [`clap::Parser::parse`], which exits the process on invalid input.
pub fn parse() -> Cli {
    Cli::parse()
}

/// Dispatches the parsed CLI command to its handler.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Chat {
            user,
            thread,
            provider: provider_name,
            model,
        } => {
            let config = Config::load()?;
            let selection =
                provider::resolve_model(provider_name.as_deref(), model.as_deref(), &config)?;
            chat::run_chat(config, user, thread, &selection).await
        }
        Commands::Seed { force } => {
            let config = Config::load()?;
            seed::run(&config, force)
        }
        Commands::Cars => {
            let config = Config::load()?;
            let store = DataStore::new(config.tables_dir()?);
            let cars = store.load_cars()?;
            if cars.is_empty() {
                println!("No cars found. Run {} first.", "renta seed".bold());
                return Ok(());
            }
            for car in cars {
                println!(
                    "{:>3}  {:<24} {:<12} {:>4}/day  {}  {} km",
                    car.car_id.to_string().yellow(),
                    car.name,
                    car.car_type.dimmed(),
                    car.price,
                    car.year,
                    car.mileage,
                );
            }
            Ok(())
        }
        Commands::Bookings { action } => {
            let config = Config::load()?;
            let store = DataStore::new(config.tables_dir()?);
            match action {
                BookingAction::List { user } => {
                    let bookings = store.load_bookings()?;
                    let mut shown = 0;
                    for booking in bookings
                        .iter()
                        .filter(|b| user.map_or(true, |u| b.user_id == u))
                    {
                        println!(
                            "{:>3}  car {:<3} user {:<4} {} → {}  {:>5}  {}",
                            booking.booking_id.to_string().yellow(),
                            booking.car_id,
                            booking.user_id,
                            booking.start_date,
                            booking.end_date,
                            booking.total_price,
                            booking.status.to_string().cyan(),
                        );
                        shown += 1;
                    }
                    if shown == 0 {
                        println!("{}", "(no bookings)".dimmed());
                    }
                    Ok(())
                }
                BookingAction::Confirm { id } => match confirm_booking(&store, id) {
                    Ok(booking) => {
                        println!(
                            "{} booking {} ({} → {})",
                            "confirmed".bold().green(),
                            booking.booking_id,
                            booking.start_date,
                            booking.end_date,
                        );
                        Ok(())
                    }
                    Err(e) => {
                        eprintln!("{} {}", "error:".red().bold(), e);
                        Ok(())
                    }
                },
            }
        }
        Commands::Threads { action } => threads::handle_threads(action),
    }
}
