//! Plain-text and HTML rendering of plans.

use std::fmt::Write as _;

use tripplan_store::{DayPlan, Plan, ScheduleItem};

// -----------------------------------------------------------------------
// Text
// -----------------------------------------------------------------------

fn write_item(out: &mut String, indent: &str, index: usize, item: &ScheduleItem) {
    let _ = writeln!(out, "{indent}{index}. {}  {}", item.time_range, item.spot_name);
    if !item.description.is_empty() {
        let _ = writeln!(out, "{indent}   {}", item.description);
    }
}

fn write_day(out: &mut String, index: usize, day: &DayPlan) {
    let _ = write!(out, "Day {} ({})", index + 1, day.date);
    let w = &day.weather;
    if !w.icon.is_empty() || !w.high_temp.is_empty() || !w.low_temp.is_empty() {
        let _ = write!(out, "  {} {}/{}", w.icon, w.high_temp, w.low_temp);
    }
    out.push('\n');

    if day.schedule.is_empty() {
        out.push_str("  (no activities)\n");
    }
    for (i, item) in day.schedule.iter().enumerate() {
        write_item(out, "  ", i, item);
    }
    if let Some(stay) = &day.accommodation {
        let _ = write!(out, "  Stay: {}", stay.name);
        if !stay.description.is_empty() {
            let _ = write!(out, " ({})", stay.description);
        }
        out.push('\n');
    }
}

/// Render a plan for the terminal. Indices shown are the ones edit
/// commands take.
pub fn plan_text(plan: &Plan) -> String {
    let mut out = String::new();
    match plan {
        Plan::Outing(items) => {
            if items.is_empty() {
                out.push_str("(empty plan)\n");
            }
            for (i, item) in items.iter().enumerate() {
                write_item(&mut out, "", i, item);
            }
        }
        Plan::Trip(trip) => {
            if trip.plan.is_empty() {
                out.push_str("(empty plan)\n");
            }
            for (i, day) in trip.plan.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                write_day(&mut out, i, day);
            }
        }
    }
    out
}

// -----------------------------------------------------------------------
// HTML
// -----------------------------------------------------------------------

/// Escape text for inclusion in HTML element content or attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn items_html(items: &[ScheduleItem]) -> String {
    if items.is_empty() {
        return "<p>No activities.</p>".to_string();
    }
    let rows: String = items
        .iter()
        .map(|i| {
            format!(
                "<li><strong>{}</strong> {}<br><small>{}</small></li>",
                escape_html(&i.time_range),
                escape_html(&i.spot_name),
                escape_html(&i.description),
            )
        })
        .collect();
    format!("<ol>{rows}</ol>")
}

/// Read-only HTML body for a plan.
pub fn plan_html(plan: &Plan) -> String {
    match plan {
        Plan::Outing(items) => items_html(items),
        Plan::Trip(trip) => trip
            .plan
            .iter()
            .enumerate()
            .map(|(i, day)| {
                let w = &day.weather;
                let stay = day
                    .accommodation
                    .as_ref()
                    .map(|a| {
                        format!(
                            "<p>Stay: {} <small>{}</small></p>",
                            escape_html(&a.name),
                            escape_html(&a.description)
                        )
                    })
                    .unwrap_or_default();
                format!(
                    "<section><h2>Day {n} ({date})</h2><p>{icon} {high}/{low}</p>{items}{stay}</section>",
                    n = i + 1,
                    date = escape_html(&day.date),
                    icon = escape_html(&w.icon),
                    high = escape_html(&w.high_temp),
                    low = escape_html(&w.low_temp),
                    items = items_html(&day.schedule),
                )
            })
            .collect(),
    }
}
