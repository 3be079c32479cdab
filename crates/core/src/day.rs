use std::collections::BTreeMap;

use itinerary_api_types::Stop;

/// Per-day aggregate shown as a badge in the day-progress panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySummary {
    pub day_number: u32,
    /// True if any stop of the day is active.
    pub active: bool,
    pub stop_count: usize,
}

impl DaySummary {
    pub fn badge_text(&self) -> String {
        format!("Day {}", self.day_number)
    }

    pub fn badge_title(&self) -> String {
        format!("{} stops", self.stop_count)
    }

    pub fn badge_class(&self) -> &'static str {
        if self.active { "active" } else { "inactive" }
    }
}

/// Groups stops by day, ascending by day number.
pub fn summarize_days(stops: &[Stop]) -> Vec<DaySummary> {
    let mut days: BTreeMap<u32, DaySummary> = BTreeMap::new();

    for stop in stops {
        let day = days.entry(stop.day_number).or_insert(DaySummary {
            day_number: stop.day_number,
            active: false,
            stop_count: 0,
        });
        day.stop_count += 1;
        day.active |= stop.is_day_active;
    }

    days.into_values().collect()
}
