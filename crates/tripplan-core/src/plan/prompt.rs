//! Prompt construction for plan generation.
//!
//! Embeds the criteria and a strict output-format template into the user
//! message sent to the responder. Pure logic, no I/O.

use chrono::NaiveDate;

use super::criteria::{Criteria, OutingCriteria, TripCriteria};

/// System message establishing the responder's role.
pub const SYSTEM_PROMPT: &str = "You are an excellent travel-planning AI.";

/// Output contract for a single-day outing.
const OUTING_FORMAT: &str = r#"{
  "plan": [
    {
      "timeRange": "xx:xx - xx:xx",
      "spotName": "Name of the spot",
      "description": "Overview and highlights"
    },
    ...
  ]
}"#;

/// Output contract for a multi-day trip.
const TRIP_FORMAT: &str = r#"{
  "plan": [
    {
      "date": "YYYY-MM-DD",
      "weather": {
        "icon": "Short weather label",
        "highTemp": "Expected high",
        "lowTemp": "Expected low"
      },
      "schedule": [
        {
          "timeRange": "xx:xx - xx:xx",
          "spotName": "Name of the spot",
          "description": "Overview and highlights"
        },
        ...
      ],
      "accommodation": {
        "name": "Where to stay that night",
        "description": "Why it suits the trip"
      }
    },
    ...
  ]
}"#;

fn interests_line(interests: &[String]) -> String {
    if interests.is_empty() {
        "no preference".to_string()
    } else {
        interests.join(", ")
    }
}

fn budget_line(budget: Option<&str>) -> String {
    match budget {
        Some(b) => format!("up to {b} yen per person"),
        None => "no particular budget".to_string(),
    }
}

/// Inclusive number of days between two `YYYY-MM-DD` dates.
///
/// Returns `None` when either date does not parse or the range is inverted;
/// the prompt then omits the day count.
pub fn trip_length_days(start_date: &str, end_date: &str) -> Option<i64> {
    let start = NaiveDate::parse_from_str(start_date.trim(), "%Y-%m-%d").ok()?;
    let end = NaiveDate::parse_from_str(end_date.trim(), "%Y-%m-%d").ok()?;
    let days = (end - start).num_days() + 1;
    (days > 0).then_some(days)
}

/// Build the user message for the given criteria.
pub fn build_prompt(criteria: &Criteria) -> String {
    match criteria {
        Criteria::SingleDay(c) => build_outing_prompt(c),
        Criteria::MultiDay(c) => build_trip_prompt(c),
    }
}

fn build_outing_prompt(c: &OutingCriteria) -> String {
    let mut prompt = String::with_capacity(1024);

    prompt.push_str("You are a travel planner.\n");
    prompt.push_str(
        "Suggest a simple one-day outing plan for the user based on the following conditions.\n\n",
    );
    prompt.push_str(&format!("Date: {}\n", c.date));
    prompt.push_str(&format!("Area: {}\n", c.area));
    prompt.push_str(&format!("Interests: {}\n", interests_line(&c.interests)));
    prompt.push_str(&format!("Budget: {}\n\n", budget_line(c.budget.as_deref())));

    prompt.push_str("Answer in the following format (JSON):\n");
    prompt.push_str(OUTING_FORMAT);
    prompt.push_str("\nYou must strictly follow the format above.\n");

    prompt
}

fn build_trip_prompt(c: &TripCriteria) -> String {
    let mut prompt = String::with_capacity(2048);

    prompt.push_str("You are a travel planner.\n");
    prompt.push_str(
        "Suggest a day-by-day trip plan for the user based on the following conditions. \
         Include one entry per day, a weather outlook for each day, and where to stay \
         each night except the last.\n\n",
    );
    prompt.push_str(&format!("Start date: {}\n", c.start_date));
    prompt.push_str(&format!("End date: {}\n", c.end_date));
    if let Some(days) = trip_length_days(&c.start_date, &c.end_date) {
        prompt.push_str(&format!("Length: {days} days\n"));
    }
    prompt.push_str(&format!("Area: {}\n", c.area));
    prompt.push_str(&format!("Transportation: {}\n", c.transportation));
    prompt.push_str(&format!("Interests: {}\n", interests_line(&c.interests)));
    prompt.push_str(&format!("Budget: {}\n\n", budget_line(c.budget.as_deref())));

    prompt.push_str("Answer in the following format (JSON):\n");
    prompt.push_str(TRIP_FORMAT);
    prompt.push_str("\nYou must strictly follow the format above.\n");

    prompt
}
