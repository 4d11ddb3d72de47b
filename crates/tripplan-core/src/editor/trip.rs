//! Transitions over a multi-day [`TravelPlan`].

use tripplan_store::{DayPlan, ScheduleItem, TravelPlan};

use super::list;

fn with_days(days: Vec<DayPlan>) -> TravelPlan {
    TravelPlan::new(days)
}

/// Apply `f` to the schedule of `day`; unchanged if `day` is out of range.
fn with_schedule(
    plan: &TravelPlan,
    day: usize,
    f: impl FnOnce(&[ScheduleItem]) -> Vec<ScheduleItem>,
) -> TravelPlan {
    with_days(list::update(&plan.plan, day, |d| d.schedule = f(&d.schedule)))
}

fn with_item(
    plan: &TravelPlan,
    day: usize,
    item: usize,
    f: impl FnOnce(&mut ScheduleItem),
) -> TravelPlan {
    with_schedule(plan, day, |schedule| list::update(schedule, item, f))
}

pub fn add_day(plan: &TravelPlan, day: DayPlan) -> TravelPlan {
    with_days(list::append(&plan.plan, day))
}

pub fn remove_day(plan: &TravelPlan, index: usize) -> TravelPlan {
    with_days(list::remove(&plan.plan, index))
}

pub fn move_day_up(plan: &TravelPlan, index: usize) -> TravelPlan {
    with_days(list::move_up(&plan.plan, index))
}

pub fn move_day_down(plan: &TravelPlan, index: usize) -> TravelPlan {
    with_days(list::move_down(&plan.plan, index))
}

pub fn add_schedule_item(plan: &TravelPlan, day: usize, item: ScheduleItem) -> TravelPlan {
    with_schedule(plan, day, |s| list::append(s, item))
}

pub fn remove_schedule_item(plan: &TravelPlan, day: usize, item: usize) -> TravelPlan {
    with_schedule(plan, day, |s| list::remove(s, item))
}

pub fn move_schedule_item_up(plan: &TravelPlan, day: usize, item: usize) -> TravelPlan {
    with_schedule(plan, day, |s| list::move_up(s, item))
}

pub fn move_schedule_item_down(plan: &TravelPlan, day: usize, item: usize) -> TravelPlan {
    with_schedule(plan, day, |s| list::move_down(s, item))
}

pub fn reorder_schedule(plan: &TravelPlan, day: usize, from: usize, to: usize) -> TravelPlan {
    with_schedule(plan, day, |s| list::reorder(s, from, to))
}

pub fn set_time_range(plan: &TravelPlan, day: usize, item: usize, value: &str) -> TravelPlan {
    with_item(plan, day, item, |i| i.time_range = value.to_string())
}

pub fn set_spot_name(plan: &TravelPlan, day: usize, item: usize, value: &str) -> TravelPlan {
    with_item(plan, day, item, |i| i.spot_name = value.to_string())
}

pub fn set_description(plan: &TravelPlan, day: usize, item: usize, value: &str) -> TravelPlan {
    with_item(plan, day, item, |i| i.description = value.to_string())
}
