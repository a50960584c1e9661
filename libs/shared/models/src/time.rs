use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

const FORMAT_24_HOUR: &str = "%H:%M";
const FORMAT_12_HOUR: &str = "%I:%M %p";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid time format: {input:?} (expected HH:mm or hh:mm AM/PM)")]
pub struct TimeParseError {
    pub input: String,
}

/// Wall-clock time of day at minute resolution, held as minutes since
/// midnight (`0..=1439`). No date, no timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(hour * 60 + minute))
        } else {
            None
        }
    }

    /// Parses either `HH:mm` (24-hour) or `hh:mm AM` (12-hour, meridiem in
    /// any case). Both fields are exactly two digits and the 12-hour form
    /// has exactly one space before the meridiem. Surrounding whitespace is
    /// ignored.
    pub fn parse(input: &str) -> Result<Self, TimeParseError> {
        let trimmed = input.trim();
        let invalid = || TimeParseError {
            input: input.to_string(),
        };

        let format = match trimmed.as_bytes() {
            [clock @ .., b' ', m, b'M' | b'm']
                if is_clock_shape(clock) && matches!(m, b'A' | b'a' | b'P' | b'p') =>
            {
                FORMAT_12_HOUR
            }
            clock if is_clock_shape(clock) => FORMAT_24_HOUR,
            _ => return Err(invalid()),
        };

        NaiveTime::parse_from_str(trimmed, format)
            .map(Self::from)
            .map_err(|_| invalid())
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// `hh:mm AM` display form, e.g. `05:00 PM`.
    pub fn to_12_hour(self) -> String {
        let meridiem = if self.hour() < 12 { "AM" } else { "PM" };
        let hour = match self.hour() % 12 {
            0 => 12,
            h => h,
        };
        format!("{:02}:{:02} {}", hour, self.minute(), meridiem)
    }
}

/// `DD:DD`
fn is_clock_shape(bytes: &[u8]) -> bool {
    matches!(bytes, [h1, h2, b':', m1, m2] if [h1, h2, m1, m2].iter().all(|b| b.is_ascii_digit()))
}

impl From<NaiveTime> for TimeOfDay {
    fn from(time: NaiveTime) -> Self {
        Self((time.hour() * 60 + time.minute()) as u16)
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}
