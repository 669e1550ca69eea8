// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Time-to-live values handed to cache stores.
//!
//! A [`Ttl`] is a signed whole number of seconds. It is signed so that a caller-supplied
//! negative ttl survives until the point where it is consumed and can be rejected with
//! [`ErrorKind::InvalidTtl`](crate::ErrorKind::InvalidTtl) instead of silently wrapping.

use std::time::Duration;

use crate::{Error, Result};

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3_600;
const SECONDS_PER_DAY: u64 = 86_400;
const SECONDS_PER_MONTH: u64 = 2_592_000;
const SECONDS_PER_YEAR: u64 = 31_536_000;

/// A time-to-live expressed in whole seconds.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use freshet_tier::{Interval, Ttl};
///
/// assert_eq!(Ttl::from_secs(90).to_secs()?, 90);
/// assert_eq!(Ttl::from(Duration::from_millis(2_500)).to_secs()?, 2);
/// assert_eq!(Ttl::from(Interval::new().hours(1).minutes(30)).to_secs()?, 5_400);
/// assert!(Ttl::from_secs(-1).to_secs().is_err());
/// # Ok::<(), freshet_tier::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ttl(i64);

impl Ttl {
    /// Creates a ttl from a number of seconds. Negative values are representable but invalid.
    #[must_use]
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    /// Returns the raw number of seconds.
    #[must_use]
    pub const fn as_secs(self) -> i64 {
        self.0
    }

    /// Returns the ttl as a non-negative number of seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidTtl`](crate::ErrorKind::InvalidTtl) if the ttl is negative.
    pub fn to_secs(self) -> Result<u64> {
        u64::try_from(self.0).map_err(|e| Error::invalid_ttl(format!("ttl must not be negative, got {}s ({e})", self.0)))
    }

    /// Returns the ttl as a [`Duration`].
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidTtl`](crate::ErrorKind::InvalidTtl) if the ttl is negative.
    pub fn to_duration(self) -> Result<Duration> {
        self.to_secs().map(Duration::from_secs)
    }

    /// Returns this ttl extended by `secs` seconds, saturating on overflow.
    #[must_use]
    pub fn saturating_add_secs(self, secs: u64) -> Self {
        Self(self.0.saturating_add(i64::try_from(secs).unwrap_or(i64::MAX)))
    }
}

impl From<Duration> for Ttl {
    /// Truncates any sub-second part and saturates at `i64::MAX` seconds.
    fn from(duration: Duration) -> Self {
        Self(i64::try_from(duration.as_secs()).unwrap_or(i64::MAX))
    }
}

impl From<Interval> for Ttl {
    fn from(interval: Interval) -> Self {
        Self(i64::try_from(interval.to_secs()).unwrap_or(i64::MAX))
    }
}

/// A calendar-style interval converted to seconds with fixed unit lengths.
///
/// A year counts as 365 days and a month as 30 days, which keeps the conversion
/// independent of any particular date.
///
/// # Examples
///
/// ```
/// use freshet_tier::Interval;
///
/// let interval = Interval::new().days(1).seconds(5);
/// assert_eq!(interval.to_secs(), 86_405);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Interval {
    years: u64,
    months: u64,
    days: u64,
    hours: u64,
    minutes: u64,
    seconds: u64,
}

impl Interval {
    /// Creates an empty interval.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            years: 0,
            months: 0,
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }

    /// Sets the number of years.
    #[must_use]
    pub const fn years(mut self, years: u64) -> Self {
        self.years = years;
        self
    }

    /// Sets the number of months.
    #[must_use]
    pub const fn months(mut self, months: u64) -> Self {
        self.months = months;
        self
    }

    /// Sets the number of days.
    #[must_use]
    pub const fn days(mut self, days: u64) -> Self {
        self.days = days;
        self
    }

    /// Sets the number of hours.
    #[must_use]
    pub const fn hours(mut self, hours: u64) -> Self {
        self.hours = hours;
        self
    }

    /// Sets the number of minutes.
    #[must_use]
    pub const fn minutes(mut self, minutes: u64) -> Self {
        self.minutes = minutes;
        self
    }

    /// Sets the number of seconds.
    #[must_use]
    pub const fn seconds(mut self, seconds: u64) -> Self {
        self.seconds = seconds;
        self
    }

    /// Returns the total number of seconds, saturating on overflow.
    #[must_use]
    pub const fn to_secs(&self) -> u64 {
        self.years
            .saturating_mul(SECONDS_PER_YEAR)
            .saturating_add(self.months.saturating_mul(SECONDS_PER_MONTH))
            .saturating_add(self.days.saturating_mul(SECONDS_PER_DAY))
            .saturating_add(self.hours.saturating_mul(SECONDS_PER_HOUR))
            .saturating_add(self.minutes.saturating_mul(SECONDS_PER_MINUTE))
            .saturating_add(self.seconds)
    }
}
