//! Generation criteria and their wire format.
//!
//! [`GenerationRequest`] is the JSON body accepted by the generation
//! endpoint. Every field is optional on the wire; [`Criteria::from_request`]
//! picks the single-day or multi-day variant and [`Criteria::validate`]
//! performs the presence checks.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use tripplan_store::PlanKind;

/// Raw request body of `POST /api/generatePlan`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transportation: Option<String>,
    /// `null` reads as no interests.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub interests: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Inputs for a single-day outing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutingCriteria {
    pub date: String,
    pub area: String,
    pub interests: Vec<String>,
    /// Per-person budget, free-form (e.g. "5000").
    pub budget: Option<String>,
}

/// Inputs for a multi-day trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripCriteria {
    pub start_date: String,
    pub end_date: String,
    pub area: String,
    pub transportation: String,
    pub interests: Vec<String>,
    pub budget: Option<String>,
}

/// User-supplied generation inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criteria {
    SingleDay(OutingCriteria),
    MultiDay(TripCriteria),
}

/// A mandatory criteria field is absent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("required fields are missing: {}", .missing.join(", "))]
pub struct ValidationError {
    /// Wire names of the missing fields, in declaration order.
    pub missing: Vec<&'static str>,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Treat an empty budget (the "not selected" form value) as no budget.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !is_blank(v))
}

impl Criteria {
    /// Choose the variant for a raw request.
    ///
    /// Any of `startDate`, `endDate` or `transportation` selects the
    /// multi-day variant; otherwise the request is a single-day outing.
    /// Absent fields become empty strings and are caught by [`Self::validate`].
    pub fn from_request(request: GenerationRequest) -> Self {
        let GenerationRequest {
            date,
            start_date,
            end_date,
            area,
            transportation,
            interests,
            budget,
        } = request;

        let multi_day = start_date.is_some() || end_date.is_some() || transportation.is_some();
        if multi_day {
            Self::MultiDay(TripCriteria {
                start_date: start_date.unwrap_or_default(),
                end_date: end_date.unwrap_or_default(),
                area: area.unwrap_or_default(),
                transportation: transportation.unwrap_or_default(),
                interests,
                budget: non_blank(budget),
            })
        } else {
            Self::SingleDay(OutingCriteria {
                date: date.unwrap_or_default(),
                area: area.unwrap_or_default(),
                interests,
                budget: non_blank(budget),
            })
        }
    }

    /// Convert back into the wire shape sent to the endpoint.
    pub fn to_request(&self) -> GenerationRequest {
        match self {
            Self::SingleDay(c) => GenerationRequest {
                date: Some(c.date.clone()),
                area: Some(c.area.clone()),
                interests: c.interests.clone(),
                budget: c.budget.clone(),
                ..GenerationRequest::default()
            },
            Self::MultiDay(c) => GenerationRequest {
                start_date: Some(c.start_date.clone()),
                end_date: Some(c.end_date.clone()),
                area: Some(c.area.clone()),
                transportation: Some(c.transportation.clone()),
                interests: c.interests.clone(),
                budget: c.budget.clone(),
                ..GenerationRequest::default()
            },
        }
    }

    /// The plan shape a successful generation yields.
    pub fn plan_kind(&self) -> PlanKind {
        match self {
            Self::SingleDay(_) => PlanKind::Outing,
            Self::MultiDay(_) => PlanKind::Trip,
        }
    }

    pub fn area(&self) -> &str {
        match self {
            Self::SingleDay(c) => &c.area,
            Self::MultiDay(c) => &c.area,
        }
    }

    /// Presence checks on the mandatory fields of the variant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required: Vec<(&'static str, &str)> = match self {
            Self::SingleDay(c) => vec![("date", c.date.as_str()), ("area", c.area.as_str())],
            Self::MultiDay(c) => vec![
                ("startDate", c.start_date.as_str()),
                ("endDate", c.end_date.as_str()),
                ("area", c.area.as_str()),
                ("transportation", c.transportation.as_str()),
            ],
        };

        let missing: Vec<&'static str> = required
            .into_iter()
            .filter(|(_, value)| is_blank(value))
            .map(|(name, _)| name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { missing })
        }
    }
}

impl From<OutingCriteria> for Criteria {
    fn from(c: OutingCriteria) -> Self {
        Self::SingleDay(c)
    }
}

impl From<TripCriteria> for Criteria {
    fn from(c: TripCriteria) -> Self {
        Self::MultiDay(c)
    }
}
