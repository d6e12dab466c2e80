//! Calendar helpers shared by the zone rule implementations.

pub(crate) mod neri_schneider;

use crate::epoch_seconds::SECONDS_PER_DAY;
use crate::provider::ZoneProviderResult;
use crate::ZoneProviderError;

pub use neri_schneider::{epoch_days_from_gregorian_date, ymd_from_epoch_days};

/// The earliest year calendar conversions accept.
pub const MIN_YEAR: i32 = -9_999;
/// The latest year calendar conversions accept.
pub const MAX_YEAR: i32 = 9_999;

/// Rejects years outside [`MIN_YEAR`]..=[`MAX_YEAR`].
///
/// Day arithmetic wraps silently far outside this range.
pub fn check_year(year: i32) -> ZoneProviderResult<i32> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(year)
    } else {
        Err(ZoneProviderError::Range("year is outside the supported range"))
    }
}

/// Returns whether `year` is a leap year in the proleptic Gregorian calendar.
#[inline]
pub const fn is_leap(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub const fn iso_days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ if is_leap(year) => 29,
        _ => 28,
    }
}

/// The number of days in the year before the zero-based `month0`.
pub const fn month_to_day(month0: u8, is_leap: bool) -> u16 {
    let leap_day = is_leap as u16;
    match month0 {
        0 => 0,
        1 => 31,
        2 => 59 + leap_day,
        3 => 90 + leap_day,
        4 => 120 + leap_day,
        5 => 151 + leap_day,
        6 => 181 + leap_day,
        7 => 212 + leap_day,
        8 => 243 + leap_day,
        9 => 273 + leap_day,
        10 => 304 + leap_day,
        _ => 334 + leap_day,
    }
}

/// Epoch days of January 1st of `year`.
#[inline]
pub const fn epoch_days_for_year(year: i32) -> i64 {
    epoch_days_from_gregorian_date(year, 1, 1)
}

/// Day of the week, where 0 is Sunday (the POSIX convention).
#[inline]
pub const fn day_of_week_for_epoch_days(epoch_days: i64) -> u8 {
    // 1970-01-01 was a Thursday
    (epoch_days + 4).rem_euclid(7) as u8
}

/// The Gregorian year containing the provided seconds since 1970.
///
/// The seconds may be exact or local seconds.
#[inline]
pub const fn year_for_epoch_seconds(seconds: i64) -> i32 {
    let (year, _, _) = ymd_from_epoch_days(seconds.div_euclid(SECONDS_PER_DAY) as i32);
    year
}
