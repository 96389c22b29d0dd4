//! Pure computation tools: arithmetic and date arithmetic.
//!
//! Both are deterministic and side-effect free; every expected failure
//! (unknown operation, division by zero, missing argument, bad date) is an
//! error-typed result, never a fault.

use anyhow::Result;
use chrono::{Duration, Local, NaiveDate};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{Tool, ToolCtx, ToolResult};
use crate::dates;

/// Basic arithmetic for price calculations.
pub struct CalculatorTool;

#[derive(Deserialize)]
struct CalculatorInput {
    operation: String,
    num1: f64,
    num2: f64,
}

#[async_trait::async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Perform a basic arithmetic calculation, e.g. multiplying a daily rate by a \
         number of rental days. Operations: add, subtract, multiply, divide."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "operation": {
                    "type": "string",
                    "enum": ["add", "subtract", "multiply", "divide"],
                    "description": "Arithmetic operation to perform"
                },
                "num1": {
                    "type": "number",
                    "description": "First operand"
                },
                "num2": {
                    "type": "number",
                    "description": "Second operand"
                }
            },
            "required": ["operation", "num1", "num2"]
        })
    }

    async fn execute(&self, _ctx: &ToolCtx, input: Value) -> Result<ToolResult> {
        let input: CalculatorInput = serde_json::from_value(input)?;
        let result = match input.operation.as_str() {
            "add" => input.num1 + input.num2,
            "subtract" => input.num1 - input.num2,
            "multiply" => input.num1 * input.num2,
            "divide" => {
                if input.num2 == 0.0 {
                    return Ok(ToolResult::error(
                        "Division by zero is not allowed.".to_string(),
                    ));
                }
                input.num1 / input.num2
            }
            other => {
                return Ok(ToolResult::error(format!(
                    "Invalid operation '{other}'. Valid operations are add, subtract, \
                     multiply, divide."
                )));
            }
        };
        Ok(ToolResult::success_json(&json!({ "result": result })))
    }
}

/// Date arithmetic for rental periods. Dates are strict `dd/mm/YYYY`.
pub struct DatesCalculatorTool {
    /// Fixed "today" for tests; `None` means the wall clock.
    today: Option<NaiveDate>,
}

impl DatesCalculatorTool {
    pub fn new() -> Self {
        Self { today: None }
    }

    #[cfg(test)]
    pub fn with_today(today: NaiveDate) -> Self {
        Self { today: Some(today) }
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

#[derive(Deserialize)]
struct DatesCalculatorInput {
    operation: String,
    start_date: String,
    end_date: Option<String>,
    days: Option<i64>,
}

#[async_trait::async_trait]
impl Tool for DatesCalculatorTool {
    fn name(&self) -> &str {
        "dates_calculator"
    }

    fn description(&self) -> &str {
        "Perform date calculations on dd/mm/YYYY dates. Operations: duration (days \
         from start_date until today), add_days, subtract_days, days_between."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "operation": {
                    "type": "string",
                    "enum": ["duration", "add_days", "subtract_days", "days_between"],
                    "description": "Date calculation to perform"
                },
                "start_date": {
                    "type": "string",
                    "description": "Reference date in dd/mm/YYYY format"
                },
                "end_date": {
                    "type": "string",
                    "description": "End date in dd/mm/YYYY format, required for days_between"
                },
                "days": {
                    "type": "integer",
                    "description": "Number of days, required for add_days and subtract_days"
                }
            },
            "required": ["operation", "start_date"]
        })
    }

    async fn execute(&self, _ctx: &ToolCtx, input: Value) -> Result<ToolResult> {
        let input: DatesCalculatorInput = serde_json::from_value(input)?;
        let Some(start) = dates::parse_strict(&input.start_date) else {
            return Ok(ToolResult::error(format!(
                "Date format error: '{}' is not a dd/mm/YYYY date.",
                input.start_date
            )));
        };

        let result = match input.operation.as_str() {
            "duration" => json!((self.today() - start).num_days()),
            "add_days" => {
                let Some(days) = input.days else {
                    return Ok(ToolResult::error(
                        "The 'days' argument is required for the 'add_days' operation."
                            .to_string(),
                    ));
                };
                json!(dates::format(start + Duration::days(days)))
            }
            "subtract_days" => {
                let Some(days) = input.days else {
                    return Ok(ToolResult::error(
                        "The 'days' argument is required for the 'subtract_days' operation."
                            .to_string(),
                    ));
                };
                json!(dates::format(start - Duration::days(days)))
            }
            "days_between" => {
                let Some(ref end_raw) = input.end_date else {
                    return Ok(ToolResult::error(
                        "The 'end_date' argument is required for the 'days_between' \
                         operation."
                            .to_string(),
                    ));
                };
                let Some(end) = dates::parse_strict(end_raw) else {
                    return Ok(ToolResult::error(format!(
                        "Date format error: '{end_raw}' is not a dd/mm/YYYY date."
                    )));
                };
                json!((end - start).num_days())
            }
            other => {
                return Ok(ToolResult::error(format!(
                    "Invalid operation '{other}'. Valid operations are duration, add_days, \
                     subtract_days, days_between."
                )));
            }
        };
        Ok(ToolResult::success_json(&json!({ "result": result })))
    }
}
