//! Edit commands over a whole [`Plan`].
//!
//! [`PlanEdit`] names one transition and its arguments, so edits can be
//! carried as JSON (`{"op": "move_day_up", "index": 1}`) from the CLI or a
//! session. Creation commands validate required fields; index arguments are
//! range-checked so a mistyped index is reported instead of silently ignored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tripplan_store::{DayPlan, ModelError, Plan, ScheduleItem, TravelPlan};

use super::{outing, trip};

/// One editing transition.
///
/// On a single-day outing the schedule commands address the flat item list
/// as day `0`; day-level commands are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PlanEdit {
    AddDay { entry: DayPlan },
    RemoveDay { index: usize },
    MoveDayUp { index: usize },
    MoveDayDown { index: usize },
    AddScheduleItem { day: usize, entry: ScheduleItem },
    RemoveScheduleItem { day: usize, item: usize },
    MoveScheduleItemUp { day: usize, item: usize },
    MoveScheduleItemDown { day: usize, item: usize },
    ReorderSchedule { day: usize, from: usize, to: usize },
    SetTimeRange { day: usize, item: usize, value: String },
    SetSpotName { day: usize, item: usize, value: String },
    SetDescription { day: usize, item: usize, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error(transparent)]
    Invalid(#[from] ModelError),

    #[error("day {index} does not exist (plan has {len} days)")]
    DayOutOfRange { index: usize, len: usize },

    #[error("item {index} does not exist on day {day} ({len} items)")]
    ItemOutOfRange { day: usize, index: usize, len: usize },

    #[error("{0} applies to multi-day plans only")]
    NotMultiDay(&'static str),
}

impl PlanEdit {
    /// Command name as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddDay { .. } => "add_day",
            Self::RemoveDay { .. } => "remove_day",
            Self::MoveDayUp { .. } => "move_day_up",
            Self::MoveDayDown { .. } => "move_day_down",
            Self::AddScheduleItem { .. } => "add_schedule_item",
            Self::RemoveScheduleItem { .. } => "remove_schedule_item",
            Self::MoveScheduleItemUp { .. } => "move_schedule_item_up",
            Self::MoveScheduleItemDown { .. } => "move_schedule_item_down",
            Self::ReorderSchedule { .. } => "reorder_schedule",
            Self::SetTimeRange { .. } => "set_time_range",
            Self::SetSpotName { .. } => "set_spot_name",
            Self::SetDescription { .. } => "set_description",
        }
    }

    /// Apply this edit to `plan`, returning the next plan.
    pub fn apply(&self, plan: &Plan) -> Result<Plan, EditError> {
        match plan {
            Plan::Trip(t) => self.apply_trip(t).map(Plan::Trip),
            Plan::Outing(items) => self.apply_outing(items).map(Plan::Outing),
        }
    }

    fn apply_trip(&self, plan: &TravelPlan) -> Result<TravelPlan, EditError> {
        let days = plan.plan.len();
        let check_day = |index: usize| -> Result<(), EditError> {
            if index < days {
                Ok(())
            } else {
                Err(EditError::DayOutOfRange { index, len: days })
            }
        };
        let check_item = |day: usize, index: usize| -> Result<(), EditError> {
            check_day(day)?;
            let len = plan.plan[day].schedule.len();
            if index < len {
                Ok(())
            } else {
                Err(EditError::ItemOutOfRange { day, index, len })
            }
        };

        let next = match self {
            Self::AddDay { entry } => {
                entry.validate()?;
                trip::add_day(plan, entry.clone())
            }
            Self::RemoveDay { index } => {
                check_day(*index)?;
                trip::remove_day(plan, *index)
            }
            Self::MoveDayUp { index } => {
                check_day(*index)?;
                trip::move_day_up(plan, *index)
            }
            Self::MoveDayDown { index } => {
                check_day(*index)?;
                trip::move_day_down(plan, *index)
            }
            Self::AddScheduleItem { day, entry } => {
                check_day(*day)?;
                entry.validate()?;
                trip::add_schedule_item(plan, *day, entry.clone())
            }
            Self::RemoveScheduleItem { day, item } => {
                check_item(*day, *item)?;
                trip::remove_schedule_item(plan, *day, *item)
            }
            Self::MoveScheduleItemUp { day, item } => {
                check_item(*day, *item)?;
                trip::move_schedule_item_up(plan, *day, *item)
            }
            Self::MoveScheduleItemDown { day, item } => {
                check_item(*day, *item)?;
                trip::move_schedule_item_down(plan, *day, *item)
            }
            Self::ReorderSchedule { day, from, to } => {
                check_item(*day, *from)?;
                check_item(*day, *to)?;
                trip::reorder_schedule(plan, *day, *from, *to)
            }
            Self::SetTimeRange { day, item, value } => {
                check_item(*day, *item)?;
                trip::set_time_range(plan, *day, *item, value)
            }
            Self::SetSpotName { day, item, value } => {
                check_item(*day, *item)?;
                trip::set_spot_name(plan, *day, *item, value)
            }
            Self::SetDescription { day, item, value } => {
                check_item(*day, *item)?;
                trip::set_description(plan, *day, *item, value)
            }
        };
        Ok(next)
    }

    fn apply_outing(&self, items: &[ScheduleItem]) -> Result<Vec<ScheduleItem>, EditError> {
        let len = items.len();
        let check_day = |day: usize| -> Result<(), EditError> {
            if day == 0 {
                Ok(())
            } else {
                Err(EditError::DayOutOfRange { index: day, len: 1 })
            }
        };
        let check_item = |day: usize, index: usize| -> Result<(), EditError> {
            check_day(day)?;
            if index < len {
                Ok(())
            } else {
                Err(EditError::ItemOutOfRange { day, index, len })
            }
        };

        let next = match self {
            Self::AddDay { .. }
            | Self::RemoveDay { .. }
            | Self::MoveDayUp { .. }
            | Self::MoveDayDown { .. } => return Err(EditError::NotMultiDay(self.name())),
            Self::AddScheduleItem { day, entry } => {
                check_day(*day)?;
                entry.validate()?;
                outing::add_item(items, entry.clone())
            }
            Self::RemoveScheduleItem { day, item } => {
                check_item(*day, *item)?;
                outing::remove_item(items, *item)
            }
            Self::MoveScheduleItemUp { day, item } => {
                check_item(*day, *item)?;
                outing::move_item_up(items, *item)
            }
            Self::MoveScheduleItemDown { day, item } => {
                check_item(*day, *item)?;
                outing::move_item_down(items, *item)
            }
            Self::ReorderSchedule { day, from, to } => {
                check_item(*day, *from)?;
                check_item(*day, *to)?;
                outing::reorder_items(items, *from, *to)
            }
            Self::SetTimeRange { day, item, value } => {
                check_item(*day, *item)?;
                outing::set_time_range(items, *item, value)
            }
            Self::SetSpotName { day, item, value } => {
                check_item(*day, *item)?;
                outing::set_spot_name(items, *item, value)
            }
            Self::SetDescription { day, item, value } => {
                check_item(*day, *item)?;
                outing::set_description(items, *item, value)
            }
        };
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tripplan_store::{Accommodation, WeatherInfo};

    fn trip() -> Plan {
        let mut first = DayPlan::new("2025-06-01", None).unwrap();
        first.schedule.push(ScheduleItem::new("09:00 - 10:00", "Shrine", "").unwrap());
        Plan::Trip(TravelPlan::new(vec![
            first,
            DayPlan::new("2025-06-02", None).unwrap(),
        ]))
    }

    fn outing() -> Plan {
        Plan::Outing(vec![
            ScheduleItem::new("10:00 - 11:00", "Cafe", "").unwrap(),
            ScheduleItem::new("11:00 - 12:00", "Museum", "").unwrap(),
        ])
    }

    #[test]
    fn parses_tagged_json() {
        let edit: PlanEdit = serde_json::from_str(r#"{"op":"move_day_up","index":1}"#).unwrap();
        assert_eq!(edit, PlanEdit::MoveDayUp { index: 1 });

        let edit: PlanEdit = serde_json::from_str(
            r#"{"op":"add_schedule_item","day":0,"entry":{"timeRange":"12:00 - 13:00","spotName":"Ramen"}}"#,
        )
        .unwrap();
        assert_eq!(edit.name(), "add_schedule_item");
    }

    #[test]
    fn add_day_rejects_blank_date() {
        let edit = PlanEdit::AddDay {
            entry: DayPlan {
                date: " ".to_string(),
                weather: WeatherInfo::default(),
                schedule: vec![],
                accommodation: Some(Accommodation::default()),
            },
        };
        assert_eq!(
            edit.apply(&trip()).unwrap_err(),
            EditError::Invalid(ModelError::MissingField("date"))
        );
    }

    #[test]
    fn add_schedule_item_rejects_blank_spot() {
        let edit = PlanEdit::AddScheduleItem {
            day: 0,
            entry: ScheduleItem {
                time_range: "10:00".to_string(),
                spot_name: String::new(),
                description: String::new(),
            },
        };
        assert_eq!(
            edit.apply(&outing()).unwrap_err(),
            EditError::Invalid(ModelError::MissingField("spotName"))
        );
    }

    #[test]
    fn set_spot_name_may_blank_field() {
        let edit = PlanEdit::SetSpotName {
            day: 0,
            item: 0,
            value: String::new(),
        };
        match edit.apply(&trip()).unwrap() {
            Plan::Trip(t) => assert_eq!(t.plan[0].schedule[0].spot_name, ""),
            other => panic!("expected trip, got {other:?}"),
        }
    }

    #[test]
    fn boundary_moves_are_noops() {
        let plan = trip();
        assert_eq!(PlanEdit::MoveDayUp { index: 0 }.apply(&plan).unwrap(), plan);
        assert_eq!(PlanEdit::MoveDayDown { index: 1 }.apply(&plan).unwrap(), plan);
    }

    #[test]
    fn out_of_range_indices_reported() {
        assert_eq!(
            PlanEdit::RemoveDay { index: 5 }.apply(&trip()).unwrap_err(),
            EditError::DayOutOfRange { index: 5, len: 2 }
        );
        assert_eq!(
            PlanEdit::RemoveScheduleItem { day: 1, item: 0 }
                .apply(&trip())
                .unwrap_err(),
            EditError::ItemOutOfRange {
                day: 1,
                index: 0,
                len: 0
            }
        );
    }

    #[test]
    fn outing_rejects_day_commands() {
        let err = PlanEdit::MoveDayUp { index: 0 }.apply(&outing()).unwrap_err();
        assert_eq!(err, EditError::NotMultiDay("move_day_up"));
        assert_eq!(err.to_string(), "move_day_up applies to multi-day plans only");
    }

    #[test]
    fn outing_schedule_commands_use_day_zero() {
        let moved = PlanEdit::MoveScheduleItemDown { day: 0, item: 0 }
            .apply(&outing())
            .unwrap();
        match moved {
            Plan::Outing(items) => assert_eq!(items[0].spot_name, "Museum"),
            other => panic!("expected outing, got {other:?}"),
        }
        assert_eq!(
            PlanEdit::RemoveScheduleItem { day: 1, item: 0 }
                .apply(&outing())
                .unwrap_err(),
            EditError::DayOutOfRange { index: 1, len: 1 }
        );
    }
}
