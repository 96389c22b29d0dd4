//! Booking tools: availability check, creation, cancellation, and update.

use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{Tool, ToolCtx, ToolResult};
use crate::data::{
    cancel_booking, create_booking, is_car_available, update_booking, Booking, DataStore,
    RentalError,
};
use crate::dates;

/// Converts a domain outcome into a tool result: domain failures become
/// error-typed results for the model to explain, store faults propagate to
/// the dispatcher.
fn domain_result(
    result: std::result::Result<Booking, RentalError>,
    wrap: bool,
) -> Result<ToolResult> {
    match result {
        Ok(booking) if wrap => Ok(ToolResult::success_json(&json!({
            "success": true,
            "data": booking,
        }))),
        Ok(booking) => Ok(ToolResult::success_json(&serde_json::to_value(booking)?)),
        Err(RentalError::Store(e)) => Err(e),
        Err(e) => Ok(ToolResult::error(e.to_string())),
    }
}

/// Checks whether one car is free over a window.
pub struct IsCarAvailableTool {
    store: DataStore,
}

impl IsCarAvailableTool {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct AvailabilityInput {
    car_id: i64,
    start_date: String,
    end_date: String,
}

#[async_trait::async_trait]
impl Tool for IsCarAvailableTool {
    fn name(&self) -> &str {
        "is_car_available"
    }

    fn description(&self) -> &str {
        "Check if a specific car is available during the given rental period. \
         Dates are dd/mm/YYYY."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "car_id": {
                    "type": "integer",
                    "description": "ID of the car to check"
                },
                "start_date": {
                    "type": "string",
                    "description": "Rental start date in dd/mm/YYYY format"
                },
                "end_date": {
                    "type": "string",
                    "description": "Rental end date in dd/mm/YYYY format"
                }
            },
            "required": ["car_id", "start_date", "end_date"]
        })
    }

    async fn execute(&self, _ctx: &ToolCtx, input: Value) -> Result<ToolResult> {
        let input: AvailabilityInput = serde_json::from_value(input)?;
        let parsed =
            dates::parse_lenient(&input.start_date).zip(dates::parse_lenient(&input.end_date));
        let Some((start, end)) = parsed else {
            return Ok(ToolResult::error(
                "Invalid date format. Please provide dates in dd/mm/YYYY format.".to_string(),
            ));
        };

        let message = if is_car_available(&self.store, input.car_id, start, end, None)? {
            format!(
                "The car with ID {} is available for the specified dates.",
                input.car_id
            )
        } else {
            format!(
                "The car with ID {} is not available for the specified dates.",
                input.car_id
            )
        };
        Ok(ToolResult::success(message))
    }
}

/// Creates a pending booking for the signed-in user.
pub struct CarBookingTool {
    store: DataStore,
}

impl CarBookingTool {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct CarBookingInput {
    car_id: i64,
    start_date: String,
    end_date: String,
}

#[async_trait::async_trait]
impl Tool for CarBookingTool {
    fn name(&self) -> &str {
        "car_booking"
    }

    fn description(&self) -> &str {
        "Book a car for the user. The booking is created as pending; the user must \
         confirm it manually on the reservations page. Dates are dd/mm/YYYY."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "car_id": {
                    "type": "integer",
                    "description": "ID of the car to book"
                },
                "start_date": {
                    "type": "string",
                    "description": "Rental start date in dd/mm/YYYY format"
                },
                "end_date": {
                    "type": "string",
                    "description": "Rental end date in dd/mm/YYYY format"
                }
            },
            "required": ["car_id", "start_date", "end_date"]
        })
    }

    async fn execute(&self, ctx: &ToolCtx, input: Value) -> Result<ToolResult> {
        let input: CarBookingInput = serde_json::from_value(input)?;
        let parsed =
            dates::parse_lenient(&input.start_date).zip(dates::parse_lenient(&input.end_date));
        let Some((start, end)) = parsed else {
            return Ok(ToolResult::error(
                "Invalid date format. Please provide dates in dd/mm/YYYY format.".to_string(),
            ));
        };
        domain_result(
            create_booking(&self.store, ctx.user_id, input.car_id, start, end),
            false,
        )
    }
}

/// Cancels a booking by id.
pub struct BookingCancelTool {
    store: DataStore,
}

impl BookingCancelTool {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct BookingCancelInput {
    booking_id: i64,
}

#[async_trait::async_trait]
impl Tool for BookingCancelTool {
    fn name(&self) -> &str {
        "booking_canceling"
    }

    fn description(&self) -> &str {
        "Cancel a booking by setting its status to cancelled."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "booking_id": {
                    "type": "integer",
                    "description": "ID of the booking to cancel"
                }
            },
            "required": ["booking_id"]
        })
    }

    async fn execute(&self, _ctx: &ToolCtx, input: Value) -> Result<ToolResult> {
        let input: BookingCancelInput = serde_json::from_value(input)?;
        domain_result(cancel_booking(&self.store, input.booking_id), true)
    }
}

/// Moves an existing booking to new dates.
pub struct BookingUpdateTool {
    store: DataStore,
}

impl BookingUpdateTool {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct BookingUpdateInput {
    booking_id: i64,
    new_start_date: String,
    new_end_date: String,
}

#[async_trait::async_trait]
impl Tool for BookingUpdateTool {
    fn name(&self) -> &str {
        "booking_update"
    }

    fn description(&self) -> &str {
        "Update an existing booking with new start and end dates (dd/mm/YYYY), \
         checking the car is available for the new period."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "booking_id": {
                    "type": "integer",
                    "description": "ID of the booking to update"
                },
                "new_start_date": {
                    "type": "string",
                    "description": "New rental start date in dd/mm/YYYY format"
                },
                "new_end_date": {
                    "type": "string",
                    "description": "New rental end date in dd/mm/YYYY format"
                }
            },
            "required": ["booking_id", "new_start_date", "new_end_date"]
        })
    }

    async fn execute(&self, _ctx: &ToolCtx, input: Value) -> Result<ToolResult> {
        let input: BookingUpdateInput = serde_json::from_value(input)?;
        domain_result(
            update_booking(
                &self.store,
                input.booking_id,
                &input.new_start_date,
                &input.new_end_date,
            ),
            true,
        )
    }
}
