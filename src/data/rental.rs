//! Booking domain operations over the CSV store.
//!
//! Availability uses an inclusive overlap test and only `Confirmed`
//! bookings block a window; pending and cancelled bookings never do. The
//! day count for pricing is the plain date difference (start day excluded),
//! taken as an absolute value.

use anyhow::Result;
use chrono::NaiveDate;
use thiserror::Error;

use super::{Booking, BookingStatus, DataStore};
use crate::dates;

/// Domain failures surfaced to the model as structured tool failures.
#[derive(Debug, Error)]
pub enum RentalError {
    #[error("car {0} was not found")]
    CarNotFound(i64),
    #[error("booking {0} was not found or has already been cancelled")]
    BookingUnavailable(i64),
    #[error("booking {0} is not pending")]
    NotPending(i64),
    #[error("the car is not available for the requested dates")]
    CarUnavailable,
    #[error("invalid date format, expected dd/mm/YYYY")]
    BadDate,
    #[error("end date must be after the start date")]
    EndNotAfterStart,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Whether `car_id` is free over `[start, end]`.
///
/// A confirmed booking blocks the window when `booking_start <= end` and
/// `booking_end >= start` (boundary days collide). `exclude_booking` skips
/// one booking id, used when moving an existing booking's dates so it does
/// not collide with itself. Bookings with unparsable dates are skipped.
pub fn is_car_available(
    store: &DataStore,
    car_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    exclude_booking: Option<i64>,
) -> Result<bool> {
    let bookings = store.load_bookings()?;
    for booking in bookings
        .iter()
        .filter(|b| b.car_id == car_id && b.status == BookingStatus::Confirmed)
        .filter(|b| Some(b.booking_id) != exclude_booking)
    {
        let parsed = dates::parse_lenient(&booking.start_date)
            .zip(dates::parse_lenient(&booking.end_date));
        let Some((booked_start, booked_end)) = parsed else {
            log::warn!(
                "booking {} has unparsable dates, skipping in availability check",
                booking.booking_id
            );
            continue;
        };
        if booked_start <= end && booked_end >= start {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Creates a new `Pending` booking for the user, or fails if the car is
/// unknown or unavailable. Pricing: `|end - start|` days times the daily
/// rate.
pub fn create_booking(
    store: &DataStore,
    user_id: i64,
    car_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> std::result::Result<Booking, RentalError> {
    let car = store.find_car(car_id)?.ok_or(RentalError::CarNotFound(car_id))?;
    if !is_car_available(store, car_id, start, end, None)? {
        return Err(RentalError::CarUnavailable);
    }

    let mut bookings = store.load_bookings()?;
    let days = (end - start).num_days().abs();
    let booking = Booking {
        booking_id: next_booking_id(&bookings),
        car_id,
        user_id,
        start_date: dates::format(start),
        end_date: dates::format(end),
        total_price: days * car.price,
        status: BookingStatus::Pending,
    };
    bookings.push(booking.clone());
    store.save_bookings(&bookings)?;
    Ok(booking)
}

/// Cancels a booking. Fails if the id is unknown or the booking is already
/// cancelled; cancelling twice is an error, not a silent no-op.
pub fn cancel_booking(
    store: &DataStore,
    booking_id: i64,
) -> std::result::Result<Booking, RentalError> {
    let mut bookings = store.load_bookings()?;
    let booking = bookings
        .iter_mut()
        .find(|b| b.booking_id == booking_id && b.status != BookingStatus::Cancelled)
        .ok_or(RentalError::BookingUnavailable(booking_id))?;
    booking.status = BookingStatus::Cancelled;
    let updated = booking.clone();
    store.save_bookings(&bookings)?;
    Ok(updated)
}

/// Moves a booking to new dates (strict `dd/mm/YYYY`) and reprices it.
///
/// The availability check excludes the booking being moved, so shifting
/// dates on the same car does not reject against its own reservation.
pub fn update_booking(
    store: &DataStore,
    booking_id: i64,
    new_start: &str,
    new_end: &str,
) -> std::result::Result<Booking, RentalError> {
    let mut bookings = store.load_bookings()?;
    let index = bookings
        .iter()
        .position(|b| b.booking_id == booking_id && b.status != BookingStatus::Cancelled)
        .ok_or(RentalError::BookingUnavailable(booking_id))?;

    let start = dates::parse_strict(new_start).ok_or(RentalError::BadDate)?;
    let end = dates::parse_strict(new_end).ok_or(RentalError::BadDate)?;
    if end <= start {
        return Err(RentalError::EndNotAfterStart);
    }

    let car_id = bookings[index].car_id;
    let car = store.find_car(car_id)?.ok_or(RentalError::CarNotFound(car_id))?;
    if !is_car_available(store, car_id, start, end, Some(booking_id))? {
        return Err(RentalError::CarUnavailable);
    }

    let booking = &mut bookings[index];
    booking.start_date = dates::format(start);
    booking.end_date = dates::format(end);
    booking.total_price = (end - start).num_days() * car.price;
    let updated = booking.clone();
    store.save_bookings(&bookings)?;
    Ok(updated)
}

/// Confirms a pending booking. This is a host-application action (the
/// reservations page of the original UI), not an agent tool.
pub fn confirm_booking(
    store: &DataStore,
    booking_id: i64,
) -> std::result::Result<Booking, RentalError> {
    let mut bookings = store.load_bookings()?;
    let booking = bookings
        .iter_mut()
        .find(|b| b.booking_id == booking_id)
        .ok_or(RentalError::BookingUnavailable(booking_id))?;
    if booking.status != BookingStatus::Pending {
        return Err(RentalError::NotPending(booking_id));
    }
    booking.status = BookingStatus::Confirmed;
    let updated = booking.clone();
    store.save_bookings(&bookings)?;
    Ok(updated)
}

fn next_booking_id(bookings: &[Booking]) -> i64 {
    bookings.iter().map(|b| b.booking_id).max().unwrap_or(0) + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::fixture_store;

    fn date(s: &str) -> NaiveDate {
        dates::parse_strict(s).unwrap()
    }

    fn confirmed_fixture(store: &DataStore) {
        let booking =
            create_booking(store, 101, 1, date("01/08/2024"), date("07/08/2024")).unwrap();
        confirm_booking(store, booking.booking_id).unwrap();
    }

    #[test]
    fn booking_price_uses_exclusive_day_count() {
        let store = fixture_store("price");
        let booking =
            create_booking(&store, 101, 1, date("01/08/2024"), date("07/08/2024")).unwrap();
        // 6 days at 45/day; the start day is not counted.
        assert_eq!(booking.total_price, 270);
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.booking_id, 1);
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn availability_boundary_is_inclusive() {
        let store = fixture_store("boundary");
        confirmed_fixture(&store);

        // Shares the 07/08 boundary day: blocked.
        assert!(!is_car_available(&store, 1, date("07/08/2024"), date("10/08/2024"), None)
            .unwrap());
        // Starts the day after: free.
        assert!(is_car_available(&store, 1, date("08/08/2024"), date("10/08/2024"), None)
            .unwrap());
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn pending_bookings_do_not_block() {
        let store = fixture_store("pending");
        create_booking(&store, 101, 1, date("01/08/2024"), date("07/08/2024")).unwrap();
        assert!(is_car_available(&store, 1, date("03/08/2024"), date("05/08/2024"), None)
            .unwrap());
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn creating_over_a_confirmed_window_fails() {
        let store = fixture_store("overlap");
        confirmed_fixture(&store);
        let err = create_booking(&store, 101, 1, date("05/08/2024"), date("09/08/2024"))
            .unwrap_err();
        assert!(matches!(err, RentalError::CarUnavailable));
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn cancel_twice_is_an_error() {
        let store = fixture_store("cancel");
        let booking =
            create_booking(&store, 101, 1, date("01/08/2024"), date("07/08/2024")).unwrap();
        let cancelled = cancel_booking(&store, booking.booking_id).unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        let err = cancel_booking(&store, booking.booking_id).unwrap_err();
        assert!(matches!(err, RentalError::BookingUnavailable(_)));
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn update_excludes_own_reservation() {
        let store = fixture_store("update");
        let booking =
            create_booking(&store, 101, 1, date("01/08/2024"), date("07/08/2024")).unwrap();
        confirm_booking(&store, booking.booking_id).unwrap();

        // Shifting by one day overlaps the old window; must not self-reject.
        let updated =
            update_booking(&store, booking.booking_id, "02/08/2024", "08/08/2024").unwrap();
        assert_eq!(updated.start_date, "02/08/2024");
        assert_eq!(updated.total_price, 270);
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn update_validates_dates() {
        let store = fixture_store("baddates");
        let booking =
            create_booking(&store, 101, 1, date("01/08/2024"), date("07/08/2024")).unwrap();

        let err =
            update_booking(&store, booking.booking_id, "2024-08-02", "08/08/2024").unwrap_err();
        assert!(matches!(err, RentalError::BadDate));

        let err =
            update_booking(&store, booking.booking_id, "08/08/2024", "08/08/2024").unwrap_err();
        assert!(matches!(err, RentalError::EndNotAfterStart));
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn confirm_requires_pending() {
        let store = fixture_store("confirm");
        let booking =
            create_booking(&store, 101, 1, date("01/08/2024"), date("07/08/2024")).unwrap();
        confirm_booking(&store, booking.booking_id).unwrap();
        let err = confirm_booking(&store, booking.booking_id).unwrap_err();
        assert!(matches!(err, RentalError::NotPending(_)));
        let _ = std::fs::remove_dir_all(store.dir());
    }

    #[test]
    fn booking_ids_are_monotonic() {
        let store = fixture_store("ids");
        let first =
            create_booking(&store, 101, 1, date("01/08/2024"), date("02/08/2024")).unwrap();
        let second =
            create_booking(&store, 101, 2, date("01/08/2024"), date("02/08/2024")).unwrap();
        assert_eq!(first.booking_id, 1);
        assert_eq!(second.booking_id, 2);
        let _ = std::fs::remove_dir_all(store.dir());
    }
}
