//! 100-nanosecond tick timestamps
//!
//! DateTime values travel on the wire as a signed 64-bit count of
//! 100-nanosecond intervals since 0001-01-01 00:00:00 (proleptic
//! Gregorian calendar, no time zone). Both sides of the codec must agree
//! on this epoch and resolution.
//!
//! ```
//! use verscodec_core::Ticks;
//!
//! let t = Ticks::from_ymd_hms(2024, 3, 1, 12, 30, 0).unwrap();
//! let dt = t.to_naive().unwrap();
//! assert_eq!(Ticks::from_naive(dt), Some(t));
//! ```

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ticks in one second
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Nanoseconds in one tick
const NANOS_PER_TICK: i64 = 100;

/// A point in time as 100-ns ticks since 0001-01-01
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Ticks(i64);

impl Ticks {
    /// 0001-01-01 00:00:00
    pub const EPOCH: Ticks = Ticks(0);

    /// 9999-12-31 23:59:59.9999999
    pub const MAX: Ticks = Ticks(3_155_378_975_999_999_999);

    /// Wrap a raw tick count
    pub const fn from_raw(ticks: i64) -> Self {
        Ticks(ticks)
    }

    /// Raw tick count
    pub const fn as_raw(&self) -> i64 {
        self.0
    }

    fn epoch_naive() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(1, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or(NaiveDateTime::MIN)
    }

    /// Convert a calendar date-time; `None` if it precedes the epoch
    pub fn from_naive(dt: NaiveDateTime) -> Option<Self> {
        let delta = dt.signed_duration_since(Self::epoch_naive());
        let secs = delta.num_seconds();
        let sub_ticks = i64::from(delta.subsec_nanos()) / NANOS_PER_TICK;
        let ticks = secs.checked_mul(TICKS_PER_SECOND)?.checked_add(sub_ticks)?;
        if ticks < 0 {
            return None;
        }
        Some(Ticks(ticks))
    }

    /// Calendar date-time; `None` if the tick count is out of chrono's range
    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        let secs = self.0.div_euclid(TICKS_PER_SECOND);
        let sub_ticks = self.0.rem_euclid(TICKS_PER_SECOND);
        let delta = TimeDelta::try_seconds(secs)?
            .checked_add(&TimeDelta::nanoseconds(sub_ticks * NANOS_PER_TICK))?;
        Self::epoch_naive().checked_add_signed(delta)
    }

    /// Convenience constructor from calendar fields
    pub fn from_ymd_hms(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<Self> {
        let dt = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, min, sec)?;
        Self::from_naive(dt)
    }
}

impl From<i64> for Ticks {
    fn from(ticks: i64) -> Self {
        Ticks(ticks)
    }
}

impl From<Ticks> for i64 {
    fn from(t: Ticks) -> i64 {
        t.0
    }
}

impl fmt::Display for Ticks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_naive() {
            Some(dt) => write!(f, "{}", dt),
            None => write!(f, "{} ticks", self.0),
        }
    }
}
