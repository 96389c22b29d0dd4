use std::sync::Arc;

use serde_json::json;

use super::*;
use crate::data::test_support::fixture_store;
use crate::retriever::{Retriever, ScoredDoc};
use chrono::NaiveDate;

use super::math::DatesCalculatorTool;

struct StaticRetriever;

#[async_trait::async_trait]
impl Retriever for StaticRetriever {
    async fn query(&self, _text: &str, k: usize) -> anyhow::Result<Vec<ScoredDoc>> {
        let docs = vec![
            ScoredDoc {
                content: "## Cancellations\nFull refund when cancelled 24 hours ahead.".into(),
                similarity: 0.9,
            },
            ScoredDoc {
                content: "## Payment\nCard payment only.".into(),
                similarity: 0.5,
            },
        ];
        Ok(docs.into_iter().take(k).collect())
    }
}

fn registry(tag: &str) -> (ToolRegistry, crate::data::DataStore) {
    let store = fixture_store(tag);
    let registry = ToolRegistry::with_builtins(store.clone(), Arc::new(StaticRetriever));
    (registry, store)
}

const CTX: ToolCtx = ToolCtx { user_id: 101 };

#[tokio::test]
async fn registry_exposes_full_tool_set() {
    let (registry, store) = registry("builtins");
    assert_eq!(registry.len(), 15);
    assert!(!registry.is_empty());

    let names: Vec<String> = registry.schemas().into_iter().map(|s| s.name).collect();
    for expected in [
        "car_search",
        "is_car_available",
        "car_booking",
        "booking_canceling",
        "booking_update",
        "lookup_policy",
        "calculator",
        "dates_calculator",
        "show_my_pending_booked_cars",
        "show_personal_info",
    ] {
        assert!(names.iter().any(|n| n == expected), "missing {expected}");
    }
    let _ = std::fs::remove_dir_all(store.dir());
}

#[tokio::test]
async fn unknown_tool_is_an_error() {
    let (registry, store) = registry("unknown");
    assert!(registry.execute(&CTX, "teleport_car", json!({})).await.is_err());
    let _ = std::fs::remove_dir_all(store.dir());
}

#[tokio::test]
async fn calculator_multiplies_rate_by_days() {
    let (registry, store) = registry("calc");
    let result = registry
        .execute(
            &CTX,
            "calculator",
            json!({"operation": "multiply", "num1": 30.0, "num2": 7.0}),
        )
        .await
        .unwrap();
    assert!(!result.is_error);
    assert_eq!(result.content, json!({"result": 210.0}).to_string());
    let _ = std::fs::remove_dir_all(store.dir());
}

#[tokio::test]
async fn calculator_rejects_division_by_zero_and_bad_ops() {
    let (registry, store) = registry("calc_err");
    let result = registry
        .execute(
            &CTX,
            "calculator",
            json!({"operation": "divide", "num1": 1.0, "num2": 0.0}),
        )
        .await
        .unwrap();
    assert!(result.is_error);
    assert!(result.content.contains("Division by zero"));

    let result = registry
        .execute(
            &CTX,
            "calculator",
            json!({"operation": "modulo", "num1": 1.0, "num2": 2.0}),
        )
        .await
        .unwrap();
    assert!(result.is_error);
    assert!(result.content.contains("Invalid operation"));
    let _ = std::fs::remove_dir_all(store.dir());
}

#[tokio::test]
async fn dates_calculator_adds_and_diffs() {
    let (registry, store) = registry("dates");
    let result = registry
        .execute(
            &CTX,
            "dates_calculator",
            json!({"operation": "add_days", "start_date": "01/01/2024", "days": 30}),
        )
        .await
        .unwrap();
    assert_eq!(result.content, json!({"result": "31/01/2024"}).to_string());

    let result = registry
        .execute(
            &CTX,
            "dates_calculator",
            json!({
                "operation": "days_between",
                "start_date": "01/01/2024",
                "end_date": "15/02/2024"
            }),
        )
        .await
        .unwrap();
    assert_eq!(result.content, json!({"result": 45}).to_string());
    let _ = std::fs::remove_dir_all(store.dir());
}

#[tokio::test]
async fn dates_calculator_reports_missing_arguments() {
    let (registry, store) = registry("dates_err");
    let result = registry
        .execute(
            &CTX,
            "dates_calculator",
            json!({"operation": "add_days", "start_date": "01/01/2024"}),
        )
        .await
        .unwrap();
    assert!(result.is_error);
    assert!(result.content.contains("'days' argument is required"));

    let result = registry
        .execute(
            &CTX,
            "dates_calculator",
            json!({"operation": "duration", "start_date": "January 1st"}),
        )
        .await
        .unwrap();
    assert!(result.is_error);
    assert!(result.content.contains("Date format error"));
    let _ = std::fs::remove_dir_all(store.dir());
}

#[tokio::test]
async fn dates_calculator_duration_counts_from_today() {
    let tool = DatesCalculatorTool::with_today(NaiveDate::from_ymd_opt(2024, 2, 15).unwrap());
    let result = tool
        .execute(
            &CTX,
            json!({"operation": "duration", "start_date": "01/01/2024"}),
        )
        .await
        .unwrap();
    assert_eq!(result.content, json!({"result": 45}).to_string());
}

#[tokio::test]
async fn car_search_filters_by_type_and_price() {
    let (registry, store) = registry("search");
    let result = registry
        .execute(&CTX, "car_search", json!({"car_type": "sedan"}))
        .await
        .unwrap();
    assert!(!result.is_error);
    let payload: serde_json::Value = serde_json::from_str(&result.content).unwrap();
    let cars = payload["available_cars"].as_array().unwrap();
    assert_eq!(cars.len(), 1);
    assert_eq!(cars[0]["name"], "Toyota Camry");

    let result = registry
        .execute(&CTX, "car_search", json!({"price_min": 60}))
        .await
        .unwrap();
    let payload: serde_json::Value = serde_json::from_str(&result.content).unwrap();
    let cars = payload["available_cars"].as_array().unwrap();
    assert_eq!(cars.len(), 1);
    assert_eq!(cars[0]["name"], "Ford Mustang");
    let _ = std::fs::remove_dir_all(store.dir());
}

#[tokio::test]
async fn car_search_excludes_booked_cars_in_window() {
    let (registry, store) = registry("search_window");
    let created = registry
        .execute(
            &CTX,
            "car_booking",
            json!({"car_id": 1, "start_date": "01/08/2024", "end_date": "07/08/2024"}),
        )
        .await
        .unwrap();
    assert!(!created.is_error);
    let booking: serde_json::Value = serde_json::from_str(&created.content).unwrap();
    crate::data::confirm_booking(&store, booking["booking_id"].as_i64().unwrap()).unwrap();

    let result = registry
        .execute(
            &CTX,
            "car_search",
            json!({"start_date": "05/08/2024", "end_date": "09/08/2024"}),
        )
        .await
        .unwrap();
    let payload: serde_json::Value = serde_json::from_str(&result.content).unwrap();
    let cars = payload["available_cars"].as_array().unwrap();
    assert_eq!(cars.len(), 1);
    assert_eq!(cars[0]["name"], "Ford Mustang");
    let _ = std::fs::remove_dir_all(store.dir());
}

#[tokio::test]
async fn availability_tool_reports_inclusive_overlap() {
    let (registry, store) = registry("avail");
    let created = registry
        .execute(
            &CTX,
            "car_booking",
            json!({"car_id": 1, "start_date": "01/08/2024", "end_date": "07/08/2024"}),
        )
        .await
        .unwrap();
    let booking: serde_json::Value = serde_json::from_str(&created.content).unwrap();
    crate::data::confirm_booking(&store, booking["booking_id"].as_i64().unwrap()).unwrap();

    let result = registry
        .execute(
            &CTX,
            "is_car_available",
            json!({"car_id": 1, "start_date": "07/08/2024", "end_date": "10/08/2024"}),
        )
        .await
        .unwrap();
    assert!(result.content.contains("not available"));

    let result = registry
        .execute(
            &CTX,
            "is_car_available",
            json!({"car_id": 1, "start_date": "08/08/2024", "end_date": "10/08/2024"}),
        )
        .await
        .unwrap();
    assert!(result.content.contains("is available"));
    let _ = std::fs::remove_dir_all(store.dir());
}

#[tokio::test]
async fn booking_tool_prices_by_exclusive_day_count() {
    let (registry, store) = registry("book_price");
    let result = registry
        .execute(
            &CTX,
            "car_booking",
            json!({"car_id": 1, "start_date": "01/08/2024", "end_date": "07/08/2024"}),
        )
        .await
        .unwrap();
    assert!(!result.is_error);
    let booking: serde_json::Value = serde_json::from_str(&result.content).unwrap();
    assert_eq!(booking["total_price"], 270);
    assert_eq!(booking["booking_status"], 1);
    let _ = std::fs::remove_dir_all(store.dir());
}

#[tokio::test]
async fn cancelling_twice_reports_an_error() {
    let (registry, store) = registry("cancel_twice");
    let created = registry
        .execute(
            &CTX,
            "car_booking",
            json!({"car_id": 1, "start_date": "01/08/2024", "end_date": "07/08/2024"}),
        )
        .await
        .unwrap();
    let booking: serde_json::Value = serde_json::from_str(&created.content).unwrap();
    let id = booking["booking_id"].as_i64().unwrap();

    let first = registry
        .execute(&CTX, "booking_canceling", json!({"booking_id": id}))
        .await
        .unwrap();
    assert!(!first.is_error);

    let second = registry
        .execute(&CTX, "booking_canceling", json!({"booking_id": id}))
        .await
        .unwrap();
    assert!(second.is_error);
    assert!(second.content.contains("already been cancelled"));
    let _ = std::fs::remove_dir_all(store.dir());
}

#[tokio::test]
async fn pending_bookings_join_car_details() {
    let (registry, store) = registry("pending_join");
    registry
        .execute(
            &CTX,
            "car_booking",
            json!({"car_id": 1, "start_date": "01/08/2024", "end_date": "07/08/2024"}),
        )
        .await
        .unwrap();

    let result = registry
        .execute(&CTX, "show_my_pending_booked_cars", json!({}))
        .await
        .unwrap();
    let rows: serde_json::Value = serde_json::from_str(&result.content).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Toyota Camry");
    assert_eq!(rows[0]["total_price"], 270);
    let _ = std::fs::remove_dir_all(store.dir());
}

#[tokio::test]
async fn personal_info_returns_the_signed_in_user() {
    let (registry, store) = registry("personal");
    let result = registry
        .execute(&CTX, "show_personal_info", json!({}))
        .await
        .unwrap();
    assert!(!result.is_error);
    assert!(result.content.contains("John Doe"));

    let stranger = ToolCtx { user_id: 999 };
    let result = registry
        .execute(&stranger, "show_personal_info", json!({}))
        .await
        .unwrap();
    assert!(result.is_error);
    let _ = std::fs::remove_dir_all(store.dir());
}

#[tokio::test]
async fn policy_lookup_joins_top_sections() {
    let (registry, store) = registry("policy");
    let result = registry
        .execute(&CTX, "lookup_policy", json!({"query": "cancellation refund"}))
        .await
        .unwrap();
    assert!(!result.is_error);
    assert!(result.content.contains("Cancellations"));
    assert!(result.content.contains("Payment"));
    let _ = std::fs::remove_dir_all(store.dir());
}

#[tokio::test]
async fn confirm_pending_points_at_the_reservations_page() {
    let (registry, store) = registry("confirm_msg");
    let result = registry
        .execute(&CTX, "confirm_pending_bookings", json!({}))
        .await
        .unwrap();
    assert!(result.content.contains("reservations page"));
    let _ = std::fs::remove_dir_all(store.dir());
}
