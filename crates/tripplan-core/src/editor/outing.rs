//! Transitions over a single-day item list.

use tripplan_store::ScheduleItem;

use super::list;

pub fn add_item(items: &[ScheduleItem], item: ScheduleItem) -> Vec<ScheduleItem> {
    list::append(items, item)
}

pub fn remove_item(items: &[ScheduleItem], index: usize) -> Vec<ScheduleItem> {
    list::remove(items, index)
}

pub fn move_item_up(items: &[ScheduleItem], index: usize) -> Vec<ScheduleItem> {
    list::move_up(items, index)
}

pub fn move_item_down(items: &[ScheduleItem], index: usize) -> Vec<ScheduleItem> {
    list::move_down(items, index)
}

pub fn reorder_items(items: &[ScheduleItem], from: usize, to: usize) -> Vec<ScheduleItem> {
    list::reorder(items, from, to)
}

pub fn set_time_range(items: &[ScheduleItem], index: usize, value: &str) -> Vec<ScheduleItem> {
    list::update(items, index, |i| i.time_range = value.to_string())
}

pub fn set_spot_name(items: &[ScheduleItem], index: usize, value: &str) -> Vec<ScheduleItem> {
    list::update(items, index, |i| i.spot_name = value.to_string())
}

pub fn set_description(items: &[ScheduleItem], index: usize, value: &str) -> Vec<ScheduleItem> {
    list::update(items, index, |i| i.description = value.to_string())
}
