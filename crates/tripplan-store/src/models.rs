use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Identifier of a saved plan snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(Uuid);

impl PlanId {
    /// Generate a fresh random (v4) identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for PlanId {
    type Err = PlanIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| PlanIdParseError(s.to_owned()))
    }
}

/// Error returned when parsing an invalid [`PlanId`] string.
#[derive(Debug, Clone)]
pub struct PlanIdParseError(pub String);

impl fmt::Display for PlanIdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid plan id: {:?}", self.0)
    }
}

impl std::error::Error for PlanIdParseError {}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Errors raised when constructing plan entries from user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

fn require(field: &'static str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::MissingField(field));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Lenient descriptive fields
// ---------------------------------------------------------------------------

/// Read a descriptive text field: `null` becomes `""` and a number or
/// boolean its string form. Arrays and objects are still rejected.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected text, found {other}"
        ))),
    }
}

/// Read `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Plan entries
// ---------------------------------------------------------------------------

/// Weather snapshot for a day. Free-form and possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WeatherInfo {
    /// Short label such as "sunny" or an emoji.
    #[serde(deserialize_with = "lenient_text")]
    pub icon: String,
    #[serde(deserialize_with = "lenient_text")]
    pub high_temp: String,
    #[serde(deserialize_with = "lenient_text")]
    pub low_temp: String,
}

/// Lodging for a night of a multi-day trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accommodation {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
}

/// One timed activity within a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    /// Human-readable interval, e.g. "10:00 - 11:00". Not parsed.
    pub time_range: String,
    pub spot_name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
}

impl ScheduleItem {
    /// Build an item from user input, rejecting an empty time range or spot.
    pub fn new(
        time_range: impl Into<String>,
        spot_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let item = Self {
            time_range: time_range.into(),
            spot_name: spot_name.into(),
            description: description.into(),
        };
        item.validate()?;
        Ok(item)
    }

    /// Check the creation-time required fields.
    pub fn validate(&self) -> Result<(), ModelError> {
        require("timeRange", &self.time_range)?;
        require("spotName", &self.spot_name)
    }
}

/// One day of a multi-day trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    /// Calendar date (usually `YYYY-MM-DD`, sometimes "Day 1"). Not parsed.
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weather: WeatherInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub schedule: Vec<ScheduleItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accommodation: Option<Accommodation>,
}

impl DayPlan {
    /// Build an empty day from user input, rejecting an empty date.
    ///
    /// Weather starts blank and the schedule starts empty.
    pub fn new(
        date: impl Into<String>,
        accommodation: Option<Accommodation>,
    ) -> Result<Self, ModelError> {
        let day = Self {
            date: date.into(),
            weather: WeatherInfo::default(),
            schedule: Vec::new(),
            accommodation,
        };
        day.validate()?;
        Ok(day)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        require("date", &self.date)
    }
}

/// Multi-day envelope returned by the generation endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelPlan {
    pub plan: Vec<DayPlan>,
}

impl TravelPlan {
    pub fn new(days: Vec<DayPlan>) -> Self {
        Self { plan: days }
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// Which variant of plan a value holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanKind {
    Outing,
    Trip,
}

impl fmt::Display for PlanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Outing => "outing",
            Self::Trip => "trip",
        };
        f.write_str(s)
    }
}

/// A full itinerary.
///
/// A single-day outing is a flat item list and serializes as a JSON array; a
/// multi-day trip serializes as `{"plan": [...]}`. Snapshots use the same
/// encoding, so either shape loads back into the right variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Plan {
    Trip(TravelPlan),
    Outing(Vec<ScheduleItem>),
}

impl Plan {
    pub fn kind(&self) -> PlanKind {
        match self {
            Self::Outing(_) => PlanKind::Outing,
            Self::Trip(_) => PlanKind::Trip,
        }
    }

    /// Number of days; an outing always counts as one.
    pub fn day_count(&self) -> usize {
        match self {
            Self::Outing(_) => 1,
            Self::Trip(trip) => trip.plan.len(),
        }
    }

    /// Total number of schedule items across all days.
    pub fn item_count(&self) -> usize {
        match self {
            Self::Outing(items) => items.len(),
            Self::Trip(trip) => trip.plan.iter().map(|d| d.schedule.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Outing(items) => items.is_empty(),
            Self::Trip(trip) => trip.plan.is_empty(),
        }
    }
}
