//! Reference time of a SAC file.
//!
//! SAC stores its reference time as six integers: year, day of year,
//! hour, minute, second and millisecond. [`RefTime`] only exists for
//! combinations that name a real calendar instant.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::{Result, SacError};

/// Validated SAC reference time (`nzyear`, `nzjday`, `nzhour`, `nzmin`,
/// `nzsec`, `nzmsec`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefTime {
    pub year: i32,
    pub day: u32,         // 1-366
    pub hour: u32,        // 0-23
    pub minute: u32,      // 0-59
    pub second: u32,      // 0-59
    pub millisecond: u32, // 0-999
}

impl RefTime {
    /// Build a reference time, failing with a content error if the fields
    /// do not form a calendar timestamp.
    pub fn new(
        year: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
        millisecond: i32,
    ) -> Result<Self> {
        let invalid = || {
            SacError::content(format!(
                "invalid reference time: {year:04}-{day:03} {hour:02}:{minute:02}:{second:02}.{millisecond:03}"
            ))
        };
        let field = |v: i32| u32::try_from(v).map_err(|_| invalid());

        let t = Self {
            year,
            day: field(day)?,
            hour: field(hour)?,
            minute: field(minute)?,
            second: field(second)?,
            millisecond: field(millisecond)?,
        };
        if t.millisecond > 999 {
            return Err(invalid());
        }
        t.checked_datetime().ok_or_else(invalid)?;
        Ok(t)
    }

    fn checked_datetime(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::from_yo_opt(self.year, self.day)?;
        let time =
            NaiveTime::from_hms_milli_opt(self.hour, self.minute, self.second, self.millisecond)?;
        Some(date.and_time(time))
    }

    /// The reference time as a chrono timestamp.
    pub fn to_datetime(self) -> NaiveDateTime {
        // Fields were range-checked in `new`.
        self.checked_datetime().unwrap_or_default()
    }
}

impl fmt::Display for RefTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:03} {:02}:{:02}:{:02}.{:03}",
            self.year, self.day, self.hour, self.minute, self.second, self.millisecond
        )
    }
}

impl From<RefTime> for NaiveDateTime {
    fn from(t: RefTime) -> Self {
        t.to_datetime()
    }
}
