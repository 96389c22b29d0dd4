//! Car inventory tools: search, full listing, and single-car details.

use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{Tool, ToolCtx, ToolResult};
use crate::data::{is_car_available, Car, DataStore};
use crate::dates;

/// Searches the inventory by name, type, price range, and an optional
/// availability window.
pub struct CarSearchTool {
    store: DataStore,
}

impl CarSearchTool {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct CarSearchInput {
    car_name: Option<String>,
    car_type: Option<String>,
    price_min: Option<i64>,
    price_max: Option<i64>,
    start_date: Option<String>,
    end_date: Option<String>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait::async_trait]
impl Tool for CarSearchTool {
    fn name(&self) -> &str {
        "car_search"
    }

    fn description(&self) -> &str {
        "Search for available cars by name, type, and price range, optionally restricted \
         to cars free between start_date and end_date (dd/mm/YYYY)."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "car_name": {
                    "type": "string",
                    "description": "Name of the car to search for"
                },
                "car_type": {
                    "type": "string",
                    "description": "Type of car (e.g. Sedan, SUV, Luxury)"
                },
                "price_min": {
                    "type": "integer",
                    "description": "Minimum daily price"
                },
                "price_max": {
                    "type": "integer",
                    "description": "Maximum daily price"
                },
                "start_date": {
                    "type": "string",
                    "description": "Rental start date in dd/mm/YYYY format"
                },
                "end_date": {
                    "type": "string",
                    "description": "Rental end date in dd/mm/YYYY format"
                }
            }
        })
    }

    async fn execute(&self, _ctx: &ToolCtx, input: Value) -> Result<ToolResult> {
        let input: CarSearchInput = serde_json::from_value(input)?;
        let mut cars = self.store.load_cars()?;

        if let Some(ref name) = input.car_name {
            let matched: Vec<Car> = cars
                .iter()
                .filter(|c| contains_ci(&c.name, name))
                .cloned()
                .collect();
            // A "name" that matches nothing is often a type ("an SUV").
            cars = if matched.is_empty() {
                cars.into_iter()
                    .filter(|c| contains_ci(&c.car_type, name))
                    .collect()
            } else {
                matched
            };
        }

        if let Some(ref car_type) = input.car_type {
            cars.retain(|c| contains_ci(&c.car_type, car_type));
        }

        if let Some(min) = input.price_min {
            cars.retain(|c| c.price >= min);
        }
        if let Some(max) = input.price_max {
            cars.retain(|c| c.price <= max);
        }

        if let (Some(start), Some(end)) = (&input.start_date, &input.end_date) {
            let parsed = dates::parse_lenient(start).zip(dates::parse_lenient(end));
            let Some((start, end)) = parsed else {
                return Ok(ToolResult::error(
                    "Invalid date format. Please provide dates in dd/mm/YYYY format."
                        .to_string(),
                ));
            };
            let mut free = Vec::with_capacity(cars.len());
            for car in cars {
                if is_car_available(&self.store, car.car_id, start, end, None)? {
                    free.push(car);
                }
            }
            cars = free;
        }

        Ok(ToolResult::success_json(&json!({ "available_cars": cars })))
    }
}

/// Lists the full car inventory.
pub struct ShowCarsTool {
    store: DataStore,
}

impl ShowCarsTool {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }
}

#[async_trait::async_trait]
impl Tool for ShowCarsTool {
    fn name(&self) -> &str {
        "show_cars"
    }

    fn description(&self) -> &str {
        "Retrieve information about all cars in the inventory."
    }

    fn schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _ctx: &ToolCtx, _input: Value) -> Result<ToolResult> {
        let cars = self.store.load_cars()?;
        Ok(ToolResult::success_json(&serde_json::to_value(cars)?))
    }
}

/// Details for a single car by id.
pub struct ShowCarInfoTool {
    store: DataStore,
}

impl ShowCarInfoTool {
    pub fn new(store: DataStore) -> Self {
        Self { store }
    }
}

#[derive(Deserialize)]
struct ShowCarInfoInput {
    car_id: i64,
}

#[async_trait::async_trait]
impl Tool for ShowCarInfoTool {
    fn name(&self) -> &str {
        "show_car_info"
    }

    fn description(&self) -> &str {
        "Retrieve details of a specific car by its car_id. Use car_search to find ids."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "car_id": {
                    "type": "integer",
                    "description": "ID of the car to look up"
                }
            },
            "required": ["car_id"]
        })
    }

    async fn execute(&self, _ctx: &ToolCtx, input: Value) -> Result<ToolResult> {
        let input: ShowCarInfoInput = serde_json::from_value(input)?;
        match self.store.find_car(input.car_id)? {
            Some(car) => Ok(ToolResult::success_json(&serde_json::to_value(car)?)),
            None => Ok(ToolResult::error(format!(
                "car {} was not found",
                input.car_id
            ))),
        }
    }
}
