//! Account tools: the user's bookings, history, and personal details.

use anyhow::Result;
use serde_json::{json, Value};

use super::{Tool, ToolCtx, ToolResult};
use crate::data::{Booking, BookingStatus, Car, DataStore};

/// Number of past bookings shown by the history tool; beyond that the user
/// is pointed at the reservations page.
const HISTORY_LIMIT: usize = 5;

/// Merges a booking with its car's details into one flat object, like the
/// booking/car table join the UI pages show.
fn booked_car_json(booking: &Booking, cars: &[Car]) -> Result<Value> {
    let mut merged = match serde_json::to_value(booking)? {
        Value::Object(map) => map,
        _ => unreachable!("booking serializes to an object"),
    };
    if let Some(car) = cars.iter().find(|c| c.car_id == booking.car_id) {
        if let Value::Object(car_map) = serde_json::to_value(car)? {
            for (key, value) in car_map {
                merged.entry(key).or_insert(value);
            }
        }
    }
    Ok(Value::Object(merged))
}

fn user_bookings_json(
    store: &DataStore,
    user_id: i64,
    filter: impl Fn(&Booking) -> bool,
) -> Result<Vec<Value>> {
    let cars = store.load_cars()?;
    store
        .load_bookings()?
        .iter()
        .filter(|b| b.user_id == user_id && filter(b))
        .map(|b| booked_car_json(b, &cars))
        .collect()
}

/// The user's pending (not yet confirmed) bookings.
pub struct PendingBookingsTool {
    store: DataStore,
}

impl PendingBookingsTool {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for PendingBookingsTool {
    fn name(&self) -> &str {
        "show_my_pending_booked_cars"
    }

    fn description(&self) -> &str {
        "Retrieve the cars the user has booked but not yet confirmed."
    }

    fn schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, ctx: &ToolCtx, _input: Value) -> Result<ToolResult> {
        let rows =
            user_bookings_json(&self.store, ctx.user_id, |b| b.status == BookingStatus::Pending)?;
        Ok(ToolResult::success_json(&Value::Array(rows)))
    }
}

/// The user's confirmed bookings.
pub struct ConfirmedBookingsTool {
    store: DataStore,
}

impl ConfirmedBookingsTool {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for ConfirmedBookingsTool {
    fn name(&self) -> &str {
        "show_my_confirmed_booked_cars"
    }

    fn description(&self) -> &str {
        "Retrieve the cars the user currently has confirmed bookings for."
    }

    fn schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, ctx: &ToolCtx, _input: Value) -> Result<ToolResult> {
        let rows = user_bookings_json(&self.store, ctx.user_id, |b| {
            b.status == BookingStatus::Confirmed
        })?;
        Ok(ToolResult::success_json(&Value::Array(rows)))
    }
}

/// The user's last bookings, excluding pending ones.
pub struct BookingHistoryTool {
    store: DataStore,
}

impl BookingHistoryTool {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for BookingHistoryTool {
    fn name(&self) -> &str {
        "show_my_booking_history"
    }

    fn description(&self) -> &str {
        "Retrieve the user's last 5 non-pending bookings. For anything older the user \
         must check the reservations page."
    }

    fn schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, ctx: &ToolCtx, _input: Value) -> Result<ToolResult> {
        let mut rows = user_bookings_json(&self.store, ctx.user_id, |b| {
            b.status != BookingStatus::Pending
        })?;
        if rows.len() > HISTORY_LIMIT {
            rows = rows.split_off(rows.len() - HISTORY_LIMIT);
        }
        Ok(ToolResult::success_json(&Value::Array(rows)))
    }
}

/// The user's stored personal details.
pub struct PersonalInfoTool {
    store: DataStore,
}

impl PersonalInfoTool {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for PersonalInfoTool {
    fn name(&self) -> &str {
        "show_personal_info"
    }

    fn description(&self) -> &str {
        "Retrieve the personal information stored for the user."
    }

    fn schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, ctx: &ToolCtx, _input: Value) -> Result<ToolResult> {
        match self.store.find_user(ctx.user_id)? {
            Some(user) => Ok(ToolResult::success_json(&serde_json::to_value(user)?)),
            None => Ok(ToolResult::error(format!(
                "user {} was not found",
                ctx.user_id
            ))),
        }
    }
}

/// Pending bookings cannot be confirmed by the assistant; this tool exists
/// so the model has something accurate to say when asked.
pub struct ConfirmPendingTool;

#[async_trait::async_trait]
impl Tool for ConfirmPendingTool {
    fn name(&self) -> &str {
        "confirm_pending_bookings"
    }

    fn description(&self) -> &str {
        "Explains how pending reservations are confirmed."
    }

    fn schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _ctx: &ToolCtx, _input: Value) -> Result<ToolResult> {
        Ok(ToolResult::success(
            "Pending bookings cannot be confirmed by the assistant; the user needs to \
             confirm the booking manually on the reservations page."
                .to_string(),
        ))
    }
}
