//! The `ZoneProvider` trait.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use crate::epoch_seconds::{EpochSeconds, SECONDS_PER_DAY};
use crate::utils;
use crate::ZoneProviderError;

pub type ZoneProviderResult<T> = Result<T, ZoneProviderError>;

/// `UtcOffsetSeconds` represents the amount of seconds we need to add to the UTC to reach the local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UtcOffsetSeconds(pub i64);

/// A wall-clock date and time without an offset, to the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoDateTime {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl IsoDateTime {
    pub const fn new(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Midnight on the first day of `month`.
    pub const fn start_of_month(year: i32, month: u8) -> Self {
        Self::new(year, month, 1, 0, 0, 0)
    }

    fn time_to_seconds(self) -> i64 {
        i64::from(self.hour) * 3_600 + i64::from(self.minute) * 60 + i64::from(self.second)
    }

    /// Convert this datetime to seconds since 1970-01-01T00:00:00 as if it
    /// were a UTC wall clock.
    pub fn to_local_seconds(self) -> i64 {
        utils::epoch_days_from_gregorian_date(self.year, self.month, self.day) * SECONDS_PER_DAY
            + self.time_to_seconds()
    }

    /// The inverse of [`IsoDateTime::to_local_seconds`].
    pub fn from_local_seconds(local_seconds: i64) -> Self {
        let days = local_seconds.div_euclid(SECONDS_PER_DAY);
        let time = local_seconds.rem_euclid(SECONDS_PER_DAY);
        let (year, month, day) = utils::ymd_from_epoch_days(days as i32);
        Self::new(
            year,
            month,
            day,
            (time / 3_600) as u8,
            ((time % 3_600) / 60) as u8,
            (time % 60) as u8,
        )
    }

    /// The wall clock reading of `instant` under `offset`.
    pub fn from_epoch_and_offset(instant: EpochSeconds, offset: UtcOffsetSeconds) -> Self {
        Self::from_local_seconds(instant.0 + offset.0)
    }
}

/// A local time type: the observed offset, whether it is daylight saving
/// time, and the abbreviation in use.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalTimeType {
    pub offset: UtcOffsetSeconds,
    pub is_dst: bool,
    pub abbreviation: String,
}

impl LocalTimeType {
    pub fn new(offset: i64, is_dst: bool, abbreviation: impl Into<String>) -> Self {
        Self {
            offset: UtcOffsetSeconds(offset),
            is_dst,
            abbreviation: abbreviation.into(),
        }
    }
}

/// A maximal span of time during which a zone's total offset, DST offset,
/// and abbreviation are constant.
///
/// `start` is inclusive and `end` is exclusive. A missing bound means the
/// interval is unbounded in that direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneInterval {
    pub start: Option<EpochSeconds>,
    pub end: Option<EpochSeconds>,
    /// The total UTC offset, standard plus daylight saving.
    pub offset: UtcOffsetSeconds,
    /// The daylight saving portion of `offset`.
    pub dst_offset: UtcOffsetSeconds,
    pub abbreviation: String,
}

impl ZoneInterval {
    pub fn has_start(&self) -> bool {
        self.start.is_some()
    }

    pub fn contains(&self, instant: EpochSeconds) -> bool {
        self.start.is_none_or(|start| start <= instant) && self.end.is_none_or(|end| instant < end)
    }

    /// The wall clock reading at the start of this interval, using this
    /// interval's own offset.
    pub fn local_start(&self) -> Option<IsoDateTime> {
        self.start
            .map(|start| IsoDateTime::from_epoch_and_offset(start, self.offset))
    }

    /// The interval start in local seconds, `None` for the initial interval.
    pub(crate) fn local_start_seconds(&self) -> Option<i64> {
        self.start.map(|start| start.0 + self.offset.0)
    }

    /// The interval end in local seconds, `None` for the final interval.
    pub(crate) fn local_end_seconds(&self) -> Option<i64> {
        self.end.map(|end| end.0 + self.offset.0)
    }
}

/// The `ZoneProvider` trait provides the zone interval queries that the
/// validation data generator needs from a time zone database.
///
/// All instants are whole seconds. Implementations used across worker
/// threads must also be `Sync`.
pub trait ZoneProvider {
    /// The version string of the underlying time zone database.
    fn database_version(&self) -> Cow<'_, str>;

    /// The ordered zone intervals that overlap `[start, until)`.
    ///
    /// Returns an empty list when `until <= start`.
    fn zone_intervals(
        &self,
        zone: &str,
        start: EpochSeconds,
        until: EpochSeconds,
    ) -> ZoneProviderResult<Vec<ZoneInterval>>;

    /// The zone interval containing `instant`.
    fn zone_interval_at(&self, zone: &str, instant: EpochSeconds)
        -> ZoneProviderResult<ZoneInterval>;

    /// Resolves a wall clock value to an instant.
    ///
    /// A wall clock value inside a gap is shifted forward by the length of
    /// the gap. An ambiguous value resolves to the earlier instant.
    fn localize_leniently(&self, zone: &str, local: IsoDateTime)
        -> ZoneProviderResult<EpochSeconds>;
}

#[cfg(test)]
mod tests {
    use super::{IsoDateTime, UtcOffsetSeconds, ZoneInterval};
    use crate::EpochSeconds;

    #[test]
    fn local_seconds_round_trip() {
        let dt = IsoDateTime::new(2000, 4, 2, 2, 0, 0);
        assert_eq!(dt.to_local_seconds(), 954_640_800);
        assert_eq!(IsoDateTime::from_local_seconds(954_640_800), dt);

        let before_epoch = IsoDateTime::new(1969, 12, 31, 23, 59, 1);
        assert_eq!(before_epoch.to_local_seconds(), -59);
        assert_eq!(IsoDateTime::from_local_seconds(-59), before_epoch);
    }

    #[test]
    fn interval_bounds() {
        let interval = ZoneInterval {
            start: Some(EpochSeconds(100)),
            end: Some(EpochSeconds(200)),
            offset: UtcOffsetSeconds(-3_600),
            dst_offset: UtcOffsetSeconds(0),
            abbreviation: "X".into(),
        };
        assert!(interval.contains(EpochSeconds(100)));
        assert!(interval.contains(EpochSeconds(199)));
        assert!(!interval.contains(EpochSeconds(200)));
        assert!(!interval.contains(EpochSeconds(99)));
        assert_eq!(
            interval.local_start(),
            Some(IsoDateTime::new(1969, 12, 31, 23, 1, 40))
        );
    }
}
