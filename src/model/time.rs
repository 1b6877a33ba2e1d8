use chrono::{NaiveTime, TimeDelta};

/// Wire format for study start and end times.
const WIRE_FORMAT: &str = "%H:%M";

/// Minutes moved by [`TimeSelector::step`].
pub const STEP_MINUTES: i64 = 30;

/// Holds one time field as an `HH:MM` string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeSelector {
    value: Option<String>,
}

impl TimeSelector {
    /// Creates a selector with no time set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `time` as zero-padded 24-hour `HH:MM`.
    ///
    /// `None` leaves any previously selected time in place.
    pub fn select(&mut self, time: Option<NaiveTime>) {
        if let Some(time) = time {
            self.value = Some(time.format(WIRE_FORMAT).to_string());
        }
    }

    /// Stores an already formatted wire value, e.g. from a fetched record.
    pub fn hydrate(&mut self, value: &str) {
        self.select(parse_time(value));
    }

    /// Moves the selected time by [`STEP_MINUTES`], wrapping at midnight.
    ///
    /// With nothing selected yet, stepping starts from 00:00.
    pub fn step(&mut self, forward: bool) {
        let current = self.time().unwrap_or_default();
        let delta = TimeDelta::minutes(if forward { STEP_MINUTES } else { -STEP_MINUTES });
        let (next, _) = current.overflowing_add_signed(delta);
        self.select(Some(next));
    }

    /// Returns the stored `HH:MM` value.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns the stored value as a time of day.
    pub fn time(&self) -> Option<NaiveTime> {
        self.value.as_deref().and_then(parse_time)
    }
}

/// Parses user input as a time of day.
///
/// Accepts `H:MM`, `HH:MM` and `HHMM`. Anything else, including out-of-range
/// hours or minutes, yields `None`.
pub fn parse_time(input: &str) -> Option<NaiveTime> {
    let input = input.trim();
    let (hour, minute) = match input.split_once(':') {
        Some((h, m)) => (h, m),
        None if input.len() == 4 && input.is_ascii() => input.split_at(2),
        None => return None,
    };
    if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
        return None;
    }
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}
