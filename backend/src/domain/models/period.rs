use chrono::NaiveDate;
use std::fmt;

use crate::domain::errors::RecapError;

/// Latest accepted year. Dates are stored as ISO text, so four-digit years
/// keep them ordered.
pub const MAX_YEAR: i32 = 9999;

/// A calendar month, the key of every recap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    // Field order matters: derived Ord compares year first
    year: i32,
    month: u32,
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl Period {
    /// Build a period, rejecting months outside 1-12 and years outside 1-9999
    pub fn new(month: u32, year: i32) -> Result<Self, RecapError> {
        let invalid = || RecapError::InvalidPeriod { month, year };
        if !(1..=12).contains(&month) || !(1..=MAX_YEAR).contains(&year) {
            return Err(invalid());
        }
        let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let last_day = NaiveDate::from_ymd_opt(year, month, days_in_month(month, year)).ok_or_else(invalid)?;
        Ok(Self { year, month, first_day, last_day })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    /// Get the number of days in this month
    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.month, self.year)
    }

    /// The month before, or `None` before January of year 1
    pub fn previous(&self) -> Option<Self> {
        if self.month == 1 {
            Self::new(12, self.year.checked_sub(1)?).ok()
        } else {
            Self::new(self.month - 1, self.year).ok()
        }
    }

    /// The month after, or `None` past December of the last accepted year
    pub fn next(&self) -> Option<Self> {
        if self.month == 12 {
            Self::new(1, self.year.checked_add(1)?).ok()
        } else {
            Self::new(self.month + 1, self.year).ok()
        }
    }

    /// All periods from `self` to `end`, both inclusive; empty when `end` is earlier
    pub fn through(&self, end: Period) -> Vec<Period> {
        let mut periods = Vec::new();
        let mut current = Some(*self);
        while let Some(period) = current.filter(|p| *p <= end) {
            periods.push(period);
            current = period.next();
        }
        periods
    }

    pub fn month_name(&self) -> &'static str {
        month_name(self.month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}

fn days_in_month(month: u32, year: i32) -> u32 {
    match month {
        2 => if is_leap_year(year) { 29 } else { 28 },
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Check if a year is a leap year
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Get the English name for a month number
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January", 2 => "February", 3 => "March", 4 => "April",
        5 => "May", 6 => "June", 7 => "July", 8 => "August",
        9 => "September", 10 => "October", 11 => "November", 12 => "December",
        _ => "Invalid Month",
    }
}
