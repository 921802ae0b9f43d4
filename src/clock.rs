use crate::schedule::{ScheduledSection, MINUTES_PER_DAY};
use chrono::{Local, NaiveTime, Timelike};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Source of the current minute-of-day.
pub trait Clock {
    fn minute_of_day(&self) -> f64;
}

/// Local wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn minute_of_day(&self) -> f64 {
        minute_of_day(Local::now().time())
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock(pub f64);

impl FixedClock {
    pub fn at(hours: u32, minutes: u32) -> Self {
        Self(f64::from(hours) * 60.0 + f64::from(minutes))
    }
}

impl Clock for FixedClock {
    fn minute_of_day(&self) -> f64 {
        self.0
    }
}

/// Whole seconds count as fractions of a minute.
pub fn minute_of_day(time: NaiveTime) -> f64 {
    f64::from(time.hour() * 60 + time.minute()) + f64::from(time.second()) / 60.0
}

/// Maps minute-of-day onto the dial, with midnight at the top.
pub fn minute_to_angle(minute: f64) -> f64 {
    minute / MINUTES_PER_DAY * TAU - FRAC_PI_2
}

/// Per-frame clock state derived from one reading of the clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockState {
    pub minute_of_day: f64,
    pub angle: f64,
    /// Index of the section containing `minute_of_day`, `None` only when the
    /// schedule is empty.
    pub active: Option<usize>,
}

impl ClockState {
    pub fn at(schedule: &[ScheduledSection], minute_of_day: f64) -> Self {
        // A schedule with no match (NaN start times) highlights the last section.
        let active = schedule
            .iter()
            .position(|s| s.contains(minute_of_day))
            .or_else(|| schedule.len().checked_sub(1));
        Self {
            minute_of_day,
            angle: minute_to_angle(minute_of_day),
            active,
        }
    }
}
