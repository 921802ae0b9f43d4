//! Turns parsed section records into minute ranges on the 24-hour ring.

use crate::document::SectionRecord;

pub const MINUTES_PER_DAY: f64 = 1440.0;

/// A section placed on the day ring.
///
/// `start_minute` is in `[0, 1440)` for well-formed input and `end_minute` is
/// the next section's start, pushed forward a day when the section crosses
/// midnight. Malformed start times leave both as NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledSection {
    pub name: String,
    pub color: String,
    pub start_minute: f64,
    pub end_minute: f64,
}

impl ScheduledSection {
    /// Whether `minute` (minute-of-day) falls inside `[start, end)`.
    ///
    /// The section that wraps past midnight is also checked one day later,
    /// so 01:00 lands in a 22:00 to 06:00 section.
    pub fn contains(&self, minute: f64) -> bool {
        let within = |m: f64| self.start_minute <= m && m < self.end_minute;
        within(minute) || within(minute + MINUTES_PER_DAY)
    }

    pub fn span(&self) -> f64 {
        self.end_minute - self.start_minute
    }
}

/// Parses an `HH:MM` start time into minutes since midnight.
///
/// Hours and minutes are decimal numbers and ranges are not checked, so
/// `-1:30` is -30 and `7.5:00` is 450. An empty field counts as zero and
/// anything after a second colon is ignored. Text without a colon, or with a
/// field that is not a finite number, yields NaN.
pub fn parse_start_time(text: &str) -> f64 {
    let mut fields = text.split(':');
    let hours = time_field(fields.next());
    let minutes = time_field(fields.next());
    hours * 60.0 + minutes
}

fn time_field(field: Option<&str>) -> f64 {
    let Some(field) = field.map(str::trim) else {
        return f64::NAN;
    };
    if field.is_empty() {
        return 0.0;
    }
    field
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(f64::NAN)
}

/// Places every record on the ring. Each section ends where the next one (in
/// document order, wrapping to the first) starts.
pub fn build_schedule(records: &[SectionRecord]) -> Vec<ScheduledSection> {
    let starts: Vec<f64> = records
        .iter()
        .map(|r| r.started.as_deref().map_or(f64::NAN, parse_start_time))
        .collect();

    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let start_minute = starts[i];
            let mut end_minute = starts[(i + 1) % starts.len()];
            if end_minute <= start_minute {
                end_minute += MINUTES_PER_DAY;
            }
            ScheduledSection {
                name: record.name.clone().unwrap_or_default(),
                color: record.color.clone().unwrap_or_default(),
                start_minute,
                end_minute,
            }
        })
        .collect()
}
