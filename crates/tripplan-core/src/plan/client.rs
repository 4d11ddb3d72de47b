//! Plan generation client.
//!
//! Validates criteria, sends them through a [`Transport`], and gates the
//! response shape before a plan is handed to the caller.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use tripplan_store::{DayPlan, Plan, PlanKind, ScheduleItem, TravelPlan};

use super::criteria::{Criteria, ValidationError};
use super::transport::Transport;

/// Message for a success response whose body is not a plan.
pub const INVALID_FORMAT_MESSAGE: &str = "Invalid AI response format";

/// Message for a failed response with no `error` field.
pub const GENERIC_SERVICE_MESSAGE: &str = "API Error";

/// Errors from [`GenerationClient::request_plan`].
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The endpoint failed or could not be reached.
    #[error("{0}")]
    Service(String),

    /// The endpoint answered but the body is not a usable plan.
    #[error("{INVALID_FORMAT_MESSAGE}")]
    Format,
}

/// Client for the generation endpoint.
#[derive(Debug, Clone)]
pub struct GenerationClient<T> {
    transport: T,
}

impl<T: Transport> GenerationClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Request a plan for `criteria`.
    ///
    /// Nothing is sent when a mandatory field is missing. The returned plan's
    /// variant always matches the criteria variant.
    pub async fn request_plan(&self, criteria: &Criteria) -> Result<Plan, GenerateError> {
        criteria.validate()?;

        let response = self
            .transport
            .send(&criteria.to_request())
            .await
            .map_err(|e| GenerateError::Service(e.to_string()))?;

        if !response.is_success() {
            let message = error_message(&response.body);
            warn!(status = response.status, %message, "request_plan: service error");
            return Err(GenerateError::Service(message));
        }

        let plan = parse_plan(criteria.plan_kind(), &response.body)?;
        debug!(kind = %plan.kind(), items = plan.item_count(), "request_plan: plan accepted");
        Ok(plan)
    }
}

/// The `error` string of a failure body, or the generic message.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_else(|| GENERIC_SERVICE_MESSAGE.to_string())
}

/// Gate a success body: it must be JSON with a `plan` array whose entries
/// match the item type for `kind`.
pub fn parse_plan(kind: PlanKind, body: &str) -> Result<Plan, GenerateError> {
    let value: Value = serde_json::from_str(body).map_err(|_| GenerateError::Format)?;
    let Some(entries) = value.get("plan").filter(|p| p.is_array()) else {
        return Err(GenerateError::Format);
    };

    match kind {
        PlanKind::Outing => entries_as::<ScheduleItem>(entries).map(Plan::Outing),
        PlanKind::Trip => entries_as::<DayPlan>(entries).map(|days| Plan::Trip(TravelPlan::new(days))),
    }
}

fn entries_as<E: DeserializeOwned>(entries: &Value) -> Result<Vec<E>, GenerateError> {
    Vec::<E>::deserialize(entries).map_err(|e| {
        debug!(error = %e, "entries do not match the plan schema");
        GenerateError::Format
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outing_body_parses() {
        let body = r#"{"plan":[{"timeRange":"10:00 - 11:00","spotName":"Cafe ABC","description":"coffee"}]}"#;
        let plan = parse_plan(PlanKind::Outing, body).unwrap();
        assert_eq!(
            plan,
            Plan::Outing(vec![ScheduleItem::new("10:00 - 11:00", "Cafe ABC", "coffee").unwrap()])
        );
    }

    #[test]
    fn trip_body_parses_with_defaults() {
        let body = r#"{"plan":[{"date":"2025-06-01","schedule":[{"timeRange":"09:00","spotName":"Gion"}]}]}"#;
        let plan = parse_plan(PlanKind::Trip, body).unwrap();
        match plan {
            Plan::Trip(trip) => {
                assert_eq!(trip.plan.len(), 1);
                assert_eq!(trip.plan[0].schedule[0].description, "");
                assert!(trip.plan[0].accommodation.is_none());
            }
            other => panic!("expected trip, got {other:?}"),
        }
    }

    #[test]
    fn non_json_body_is_format_error() {
        assert!(matches!(
            parse_plan(PlanKind::Outing, "<html>oops</html>"),
            Err(GenerateError::Format)
        ));
    }

    #[test]
    fn missing_or_non_array_plan_is_format_error() {
        assert!(matches!(parse_plan(PlanKind::Outing, "{}"), Err(GenerateError::Format)));
        assert!(matches!(
            parse_plan(PlanKind::Outing, r#"{"plan":"soon"}"#),
            Err(GenerateError::Format)
        ));
        assert!(matches!(parse_plan(PlanKind::Trip, "[]"), Err(GenerateError::Format)));
    }

    #[test]
    fn entry_missing_spot_name_is_format_error() {
        let body = r#"{"plan":[{"timeRange":"10:00 - 11:00"}]}"#;
        assert!(matches!(parse_plan(PlanKind::Outing, body), Err(GenerateError::Format)));
    }

    #[test]
    fn field_values_are_not_coerced() {
        let body = r#"{"plan":[{"timeRange":"whenever","spotName":" Park ","description":""}]}"#;
        match parse_plan(PlanKind::Outing, body).unwrap() {
            Plan::Outing(items) => {
                assert_eq!(items[0].time_range, "whenever");
                assert_eq!(items[0].spot_name, " Park ");
            }
            other => panic!("expected outing, got {other:?}"),
        }
    }

    #[test]
    fn numeric_temperatures_are_accepted() {
        let body = r#"{"plan":[{"date":"2025-06-01",
            "weather":{"icon":"sunny","highTemp":25,"lowTemp":18},
            "schedule":[{"timeRange":"09:00 - 11:00","spotName":"Fushimi Inari","description":"gates"}]}]}"#;
        match parse_plan(PlanKind::Trip, body).unwrap() {
            Plan::Trip(trip) => {
                assert_eq!(trip.plan[0].weather.high_temp, "25");
                assert_eq!(trip.plan[0].weather.low_temp, "18");
                assert_eq!(trip.plan[0].schedule[0].spot_name, "Fushimi Inari");
            }
            other => panic!("expected trip, got {other:?}"),
        }
    }

    #[test]
    fn null_description_is_accepted() {
        let body = r#"{"plan":[{"timeRange":"10:00 - 11:00","spotName":"Cafe ABC","description":null}]}"#;
        assert_eq!(
            parse_plan(PlanKind::Outing, body).unwrap(),
            Plan::Outing(vec![ScheduleItem::new("10:00 - 11:00", "Cafe ABC", "").unwrap()])
        );
    }

    #[test]
    fn null_weather_is_accepted() {
        let body = r#"{"plan":[{"date":"2025-06-01","weather":null,"schedule":[]}]}"#;
        match parse_plan(PlanKind::Trip, body).unwrap() {
            Plan::Trip(trip) => {
                assert_eq!(trip.plan[0].date, "2025-06-01");
                assert_eq!(trip.plan[0].weather, tripplan_store::WeatherInfo::default());
            }
            other => panic!("expected trip, got {other:?}"),
        }
    }

    #[test]
    fn non_string_time_range_is_format_error() {
        let body = r#"{"plan":[{"timeRange":null,"spotName":"Cafe ABC"}]}"#;
        assert!(matches!(parse_plan(PlanKind::Outing, body), Err(GenerateError::Format)));
    }

    #[test]
    fn error_message_falls_back_to_generic() {
        assert_eq!(error_message(r#"{"error":"Date and area are required"}"#), "Date and area are required");
        assert_eq!(error_message(r#"{"message":"nope"}"#), "API Error");
        assert_eq!(error_message("Internal Server Error"), "API Error");
    }

    #[test]
    fn format_error_message() {
        assert_eq!(GenerateError::Format.to_string(), "Invalid AI response format");
    }
}
