//! Wall-clock derivation for the local and city clocks

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::DeviceInstant;
use crate::timers::ClockSource;

/// Formatted date and time, as the clock card shows them
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClockReading {
    pub date: String,
    pub time: String,
}

impl ClockReading {
    pub fn from_datetime(datetime: NaiveDateTime) -> Self {
        Self {
            date: datetime.format("%A, %B %-d, %Y").to_string(),
            time: datetime.format("%H:%M:%S").to_string(),
        }
    }

    /// Read the clock named by `source` at `now`.
    pub fn read(source: ClockSource, now: DeviceInstant) -> Self {
        let datetime = match source {
            ClockSource::Local => local_time(now),
            ClockSource::City { utc_offset_secs } => city_time(now, utc_offset_secs),
        };
        Self::from_datetime(datetime)
    }
}

fn utc_time(now: DeviceInstant) -> NaiveDateTime {
    DateTime::<Utc>::from_timestamp_millis(now.utc_millis)
        .unwrap_or_default()
        .naive_utc()
}

fn shifted(datetime: NaiveDateTime, offset_secs: i32) -> NaiveDateTime {
    datetime
        .checked_add_signed(Duration::seconds(i64::from(offset_secs)))
        .unwrap_or(datetime)
}

/// Device wall time: the UTC instant shifted by the device's own offset.
pub fn local_time(now: DeviceInstant) -> NaiveDateTime {
    shifted(utc_time(now), now.utc_offset_secs)
}

/// City wall time: the UTC instant shifted by the city's offset.
///
/// The device offset plays no part; only the absolute instant matters.
pub fn city_time(now: DeviceInstant, city_offset_secs: i32) -> NaiveDateTime {
    shifted(utc_time(now), city_offset_secs)
}
