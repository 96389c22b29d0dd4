//! CSV-backed record store for cars, users, and bookings.
//!
//! Each table is a flat CSV file under a single data directory. Tables are
//! read whole and rewritten whole on every mutation; there is no locking and
//! no transaction guarantee. Two processes mutating the bookings table at
//! the same time can lose updates — an accepted limitation of the demo
//! persistence layer (see DESIGN.md).

mod rental;

pub use rental::{
    cancel_booking, confirm_booking, create_booking, is_car_available, update_booking,
    RentalError,
};

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::constants::{BOOKINGS_FILENAME, CARS_FILENAME, USERS_FILENAME};

/// A rentable car as stored in `cars.csv`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Car {
    pub car_id: i64,
    pub name: String,
    pub car_type: String,
    /// Daily rate.
    pub price: i64,
    pub year: i32,
    pub fuel_type: String,
    pub transmission: String,
    pub mileage: u32,
    pub image_path: String,
}

/// Lifecycle state of a booking. Only `Confirmed` bookings block
/// availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BookingStatus {
    Cancelled,
    Pending,
    Confirmed,
}

impl TryFrom<u8> for BookingStatus {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Cancelled),
            1 => Ok(Self::Pending),
            2 => Ok(Self::Confirmed),
            other => Err(format!("unknown booking status {other}")),
        }
    }
}

impl From<BookingStatus> for u8 {
    fn from(status: BookingStatus) -> Self {
        match status {
            BookingStatus::Cancelled => 0,
            BookingStatus::Pending => 1,
            BookingStatus::Confirmed => 2,
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancelled => write!(f, "cancelled"),
            Self::Pending => write!(f, "pending"),
            Self::Confirmed => write!(f, "confirmed"),
        }
    }
}

/// A rental booking as stored in `bookings.csv`. Dates are `dd/mm/YYYY`
/// strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: i64,
    pub car_id: i64,
    pub user_id: i64,
    pub start_date: String,
    pub end_date: String,
    pub total_price: i64,
    #[serde(rename = "booking_status")]
    pub status: BookingStatus,
}

/// A registered user as stored in `users.csv`. Doubles as the per-thread
/// user context rendered into the agent's system prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Handle to the CSV data directory. Cheap to clone; every read hits the
/// filesystem so callers always observe the latest table state.
#[derive(Debug, Clone)]
pub struct DataStore {
    dir: PathBuf,
}

impl DataStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn cars_path(&self) -> PathBuf {
        self.dir.join(CARS_FILENAME)
    }

    pub fn bookings_path(&self) -> PathBuf {
        self.dir.join(BOOKINGS_FILENAME)
    }

    pub fn users_path(&self) -> PathBuf {
        self.dir.join(USERS_FILENAME)
    }

    pub fn load_cars(&self) -> Result<Vec<Car>> {
        load_table(&self.cars_path())
    }

    pub fn load_bookings(&self) -> Result<Vec<Booking>> {
        load_table(&self.bookings_path())
    }

    pub fn load_users(&self) -> Result<Vec<User>> {
        load_table(&self.users_path())
    }

    /// Overwrites the whole bookings table.
    pub fn save_bookings(&self, bookings: &[Booking]) -> Result<()> {
        save_table(&self.bookings_path(), bookings)
    }

    pub fn save_cars(&self, cars: &[Car]) -> Result<()> {
        save_table(&self.cars_path(), cars)
    }

    pub fn save_users(&self, users: &[User]) -> Result<()> {
        save_table(&self.users_path(), users)
    }

    pub fn find_car(&self, car_id: i64) -> Result<Option<Car>> {
        Ok(self.load_cars()?.into_iter().find(|c| c.car_id == car_id))
    }

    pub fn find_user(&self, user_id: i64) -> Result<Option<User>> {
        Ok(self
            .load_users()?
            .into_iter()
            .find(|u| u.user_id == user_id))
    }
}

/// Reads a whole CSV table. A missing file is an empty table, matching the
/// behavior the rest of the app expects on first run.
fn load_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open table {:?}", path))?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: T =
            record.with_context(|| format!("Failed to parse row in {:?}", path))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Rewrites a whole CSV table.
fn save_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory {:?}", parent))?;
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to write table {:?}", path))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Creates a throwaway data directory seeded with a small fixture set.
    pub fn fixture_store(tag: &str) -> DataStore {
        let dir = std::env::temp_dir().join(format!(
            "renta_test_{}_{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let store = DataStore::new(&dir);

        let cars = vec![
            Car {
                car_id: 1,
                name: "Toyota Camry".into(),
                car_type: "Sedan".into(),
                price: 45,
                year: 2021,
                fuel_type: "Gasoline".into(),
                transmission: "Automatic".into(),
                mileage: 15000,
                image_path: "assets/images/toyota_camry.png".into(),
            },
            Car {
                car_id: 2,
                name: "Ford Mustang".into(),
                car_type: "Sports".into(),
                price: 70,
                year: 2022,
                fuel_type: "Gasoline".into(),
                transmission: "Manual".into(),
                mileage: 10000,
                image_path: "assets/images/ford_mustang.png".into(),
            },
        ];
        save_table(&store.cars_path(), &cars).unwrap();

        let users = vec![User {
            user_id: 101,
            name: "John Doe".into(),
            email: "john@example.com".into(),
            phone: "555-1234".into(),
            address: "123 Elm St".into(),
        }];
        save_table(&store.users_path(), &users).unwrap();

        store.save_bookings(&[]).unwrap();
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_table_reads_as_empty() {
        let dir = std::env::temp_dir().join(format!(
            "renta_test_missing_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        let store = DataStore::new(&dir);
        assert!(store.load_bookings().unwrap().is_empty());
    }

    #[test]
    fn bookings_round_trip_with_status() {
        let store = test_support::fixture_store("roundtrip");
        let bookings = vec![Booking {
            booking_id: 1,
            car_id: 1,
            user_id: 101,
            start_date: "01/08/2024".into(),
            end_date: "07/08/2024".into(),
            total_price: 270,
            status: BookingStatus::Confirmed,
        }];
        store.save_bookings(&bookings).unwrap();

        let loaded = store.load_bookings().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].status, BookingStatus::Confirmed);
        assert_eq!(loaded[0].total_price, 270);

        let _ = fs::remove_dir_all(store.dir());
    }

    #[test]
    fn unknown_status_is_a_parse_error() {
        let store = test_support::fixture_store("badstatus");
        fs::write(
            store.bookings_path(),
            "booking_id,car_id,user_id,start_date,end_date,total_price,booking_status\n\
             1,1,101,01/08/2024,07/08/2024,270,9\n",
        )
        .unwrap();
        assert!(store.load_bookings().is_err());
        let _ = fs::remove_dir_all(store.dir());
    }
}
