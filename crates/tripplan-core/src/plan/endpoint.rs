//! Status/body mapping for the generation endpoint.
//!
//! Shared by the HTTP handler and the in-process transport so both speak
//! exactly the same wire contract:
//!
//! | outcome            | status | body                        |
//! |--------------------|--------|-----------------------------|
//! | success            | 200    | parsed responder JSON       |
//! | missing fields     | 400    | `{"error"}`                 |
//! | upstream / empty   | 500    | `{"error"}`                 |
//! | unparseable output | 500    | `{"error", "rawOutput"}`    |

use serde_json::{Value, json};

use super::criteria::{Criteria, GenerationRequest};
use super::service::{PlanGenerator, ServiceFailure};

/// Status code and JSON body produced for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointResponse {
    pub status: u16,
    pub body: Value,
}

impl EndpointResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }
}

impl From<ServiceFailure> for EndpointResponse {
    fn from(failure: ServiceFailure) -> Self {
        let message = failure.to_string();
        match failure {
            ServiceFailure::Validation(_) => Self::error(400, message),
            ServiceFailure::ParseFailure { raw_output, .. } => Self {
                status: 500,
                body: json!({
                    "error": message,
                    "rawOutput": raw_output,
                }),
            },
            ServiceFailure::EmptyResponse | ServiceFailure::Upstream(_) => Self::error(500, message),
        }
    }
}

/// Handle one generation request end to end.
pub async fn handle_generate(generator: &PlanGenerator, request: GenerationRequest) -> EndpointResponse {
    let criteria = Criteria::from_request(request);
    match generator.generate(&criteria).await {
        Ok(value) => EndpointResponse::ok(value),
        Err(failure) => failure.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::criteria::ValidationError;
    use crate::responder::ResponderError;

    #[test]
    fn validation_maps_to_400() {
        let response: EndpointResponse = ServiceFailure::Validation(ValidationError {
            missing: vec!["date", "area"],
        })
        .into();
        assert_eq!(response.status, 400);
        assert_eq!(response.body["error"], "required fields are missing: date, area");
    }

    #[test]
    fn empty_response_maps_to_500() {
        let response: EndpointResponse = ServiceFailure::EmptyResponse.into();
        assert_eq!(response.status, 500);
        assert_eq!(response.body, json!({"error": "No response from AI"}));
    }

    #[test]
    fn upstream_maps_to_500_with_message() {
        let response: EndpointResponse = ServiceFailure::Upstream(ResponderError::Api {
            status: 429,
            message: "Rate limit reached".to_string(),
        })
        .into();
        assert_eq!(response.status, 500);
        assert_eq!(response.body["error"], "API error 429: Rate limit reached");
        assert!(response.body.get("rawOutput").is_none());
    }

    #[test]
    fn parse_failure_carries_raw_output() {
        let failure = super::super::service::parse_output("not json").unwrap_err();
        let response: EndpointResponse = failure.into();
        assert_eq!(response.status, 500);
        assert_eq!(response.body["error"], "Failed to parse AI response as JSON");
        assert_eq!(response.body["rawOutput"], "not json");
    }
}
