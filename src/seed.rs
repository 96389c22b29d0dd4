//! Demo data seeding.
//!
//! Writes the sample cars/users/bookings tables and the company policy
//! document into the data directory. Existing files are left alone unless
//! `--force` is given, so reseeding never clobbers live bookings by
//! accident.

use std::fs;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::Config;
use crate::data::{Booking, BookingStatus, Car, DataStore, User};

#[rustfmt::skip]
const CARS: [(i64, &str, &str, i64, i32, &str, &str, u32, &str); 20] = [
    (0, "Toyota Camry", "Sedan", 45, 2021, "Gasoline", "Automatic", 15000, "assets/images/toyota_camry.png"),
    (1, "Honda Civic", "Sedan", 50, 2020, "Gasoline", "Automatic", 20000, "assets/images/honda_civic.png"),
    (2, "Ford Mustang", "Sports", 70, 2022, "Gasoline", "Manual", 10000, "assets/images/ford_mustang.png"),
    (3, "Chevrolet Malibu", "Sedan", 55, 2021, "Gasoline", "Automatic", 12000, "assets/images/chevrolet_malibu.png"),
    (4, "BMW X5", "SUV", 80, 2022, "Gasoline", "Automatic", 18000, "assets/images/bmw_x5.png"),
    (5, "Audi Q7", "SUV", 85, 2021, "Diesel", "Automatic", 16000, "assets/images/audi_q7.png"),
    (6, "Mercedes-Benz E-Class", "Luxury", 95, 2023, "Gasoline", "Automatic", 5000, "assets/images/mercedes_benz_e_class.png"),
    (7, "Lexus RX 350", "SUV", 90, 2023, "Hybrid", "Automatic", 8000, "assets/images/lexus_rx_350.png"),
    (8, "Porsche 911", "Luxury", 120, 2022, "Gasoline", "Manual", 6000, "assets/images/porsche_911.png"),
    (9, "Chevrolet Corvette", "Luxury", 130, 2021, "Gasoline", "Automatic", 7000, "assets/images/chevrolet_corvette.png"),
    (10, "Jaguar F-Type", "Luxury", 140, 2022, "Gasoline", "Automatic", 4000, "assets/images/jaguar_f_type.png"),
    (11, "Mazda MX-5 Miata", "Convertible", 75, 2020, "Gasoline", "Manual", 12000, "assets/images/mazda_mx5_miata.png"),
    (12, "Volkswagen Jetta", "Sedan", 50, 2021, "Gasoline", "Automatic", 20000, "assets/images/volkswagen_jetta.png"),
    (13, "Hyundai Sonata", "Sedan", 55, 2022, "Gasoline", "Automatic", 18000, "assets/images/hyundai_sonata.png"),
    (14, "Nissan Altima", "Sedan", 60, 2021, "Gasoline", "Automatic", 17000, "assets/images/nissan_altima.png"),
    (15, "Kia Optima", "Sedan", 65, 2023, "Gasoline", "Automatic", 15000, "assets/images/kia_optima.png"),
    (16, "Ford Explorer", "SUV", 85, 2022, "Gasoline", "Automatic", 22000, "assets/images/ford_explorer.png"),
    (17, "Toyota Highlander", "SUV", 90, 2021, "Gasoline", "Automatic", 21000, "assets/images/toyota_highlander.png"),
    (18, "Honda Pilot", "SUV", 95, 2023, "Gasoline", "Automatic", 19000, "assets/images/honda_pilot.png"),
    (19, "Jeep Grand Cherokee", "SUV", 100, 2021, "Diesel", "Automatic", 20000, "assets/images/jeep_grand_cherokee.png"),
];

const POLICY_RULES: &str = "# Company Rental Policies

## Booking Policy
Bookings can be made up to 6 months in advance. A booking is created in a
pending state and must be confirmed by the customer on the reservations page
before the rental begins. Unconfirmed bookings do not reserve the vehicle.
Drivers must be at least 21 years old and hold a valid licence.

## Cancellation Policy
Confirmed bookings can be cancelled free of charge up to 48 hours before the
rental start date. Cancellations within 48 hours incur a fee of one daily
rate. Pending bookings can be cancelled at any time at no cost. A cancelled
booking cannot be reinstated; a new booking must be made instead.

## Modification Policy
Booking dates may be changed as long as the vehicle is available for the new
period. The total price is recalculated from the daily rate at the time of
the change. Date changes within 24 hours of the rental start require
customer support approval.

## Payment Policy
Payment is collected in full when a booking is confirmed. We accept major
credit and debit cards. A refundable security deposit of 200 is held from
the rental start until the vehicle is returned without damage.

## Insurance and Damage
All rentals include basic collision coverage with an excess of 500. Damage
beyond normal wear is charged against the deposit first. Optional full
coverage can be added at 15 per day at pickup.

## Late Returns
A grace period of 2 hours applies after the agreed return time. Beyond the
grace period each started day is charged at the full daily rate plus a late
fee of 25.
";

/// Seeds the demo tables and the policy document.
pub fn run(config: &Config, force: bool) -> Result<()> {
    let dir = config.tables_dir()?;
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create data directory {:?}", dir))?;
    let store = DataStore::new(&dir);

    seed_file(store.cars_path(), force, "cars", || {
        write_cars(&store)
    })?;
    seed_file(store.users_path(), force, "users", || {
        write_users(&store)
    })?;
    seed_file(store.bookings_path(), force, "bookings", || {
        write_bookings(&store)
    })?;
    seed_file(config.policy_path()?, force, "policy", || {
        fs::write(config.policy_path()?, POLICY_RULES)
            .context("Failed to write policy document")
    })?;

    println!("{} data directory: {}", "seeded".bold().green(), dir.display());
    Ok(())
}

fn seed_file(
    path: std::path::PathBuf,
    force: bool,
    label: &str,
    write: impl FnOnce() -> Result<()>,
) -> Result<()> {
    if path.exists() && !force {
        println!("{} {} (exists, skipped)", "·".dimmed(), label);
        return Ok(());
    }
    write()?;
    println!("{} {}", "+".green(), label);
    Ok(())
}

fn write_cars(store: &DataStore) -> Result<()> {
    let cars: Vec<Car> = CARS
        .iter()
        .map(
            |&(car_id, name, car_type, price, year, fuel, transmission, mileage, image)| Car {
                car_id,
                name: name.to_string(),
                car_type: car_type.to_string(),
                price,
                year,
                fuel_type: fuel.to_string(),
                transmission: transmission.to_string(),
                mileage,
                image_path: image.to_string(),
            },
        )
        .collect();
    store.save_cars(&cars)
}

fn write_users(store: &DataStore) -> Result<()> {
    let users = [
        User {
            user_id: 101,
            name: "John Doe".into(),
            email: "john@example.com".into(),
            phone: "555-1234".into(),
            address: "123 Elm St".into(),
        },
        User {
            user_id: 102,
            name: "Jane Smith".into(),
            email: "jane@example.com".into(),
            phone: "555-5678".into(),
            address: "456 Oak St".into(),
        },
    ];
    store.save_users(&users)
}

fn write_bookings(store: &DataStore) -> Result<()> {
    let bookings = [
        Booking {
            booking_id: 0,
            car_id: 0,
            user_id: 101,
            start_date: "01/08/2024".into(),
            end_date: "07/08/2024".into(),
            total_price: 315,
            status: BookingStatus::Cancelled,
        },
        Booking {
            booking_id: 1,
            car_id: 2,
            user_id: 102,
            start_date: "15/08/2024".into(),
            end_date: "20/08/2024".into(),
            total_price: 420,
            status: BookingStatus::Cancelled,
        },
    ];
    store.save_bookings(&bookings)?;
    Ok(())
}
