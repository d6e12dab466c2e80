//! Transition detection.

use zone_provider::{utils, EpochSeconds, IsoDateTime, ZoneProvider};

use crate::item::{Probe, TestItemKind};
use crate::{DatasetError, DatasetResult};

/// Seconds between the `A` probe and the transition it brackets.
const BEFORE_TRANSITION_SECONDS: i64 = 60;

/// A year range resolved to instants in one zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRange {
    pub start_year: i32,
    pub until_year: i32,
    /// Local `start_year-01-01T00:00:00`, resolved leniently.
    pub start_instant: EpochSeconds,
    /// Local `until_year-01-01T00:00:00`, resolved leniently.
    pub until_instant: EpochSeconds,
}

impl ScanRange {
    /// Resolves the local new year of both bounds.
    ///
    /// Years outside the supported calendar range are rejected before the
    /// provider is asked anything.
    pub fn resolve<P: ZoneProvider + ?Sized>(
        provider: &P,
        zone: &str,
        start_year: i32,
        until_year: i32,
    ) -> DatasetResult<Self> {
        for year in [start_year, until_year] {
            utils::check_year(year).map_err(|err| DatasetError::from_provider(zone, err))?;
        }
        let localize = |year| {
            provider
                .localize_leniently(zone, IsoDateTime::start_of_month(year, 1))
                .map_err(|err| DatasetError::from_provider(zone, err))
        };
        Ok(Self {
            start_year,
            until_year,
            start_instant: localize(start_year)?,
            until_instant: localize(until_year)?,
        })
    }
}

/// Returns an `A` and a `B` probe around the start of every zone interval
/// that begins inside `range`, in chronological order.
///
/// The interval already in effect at the start of the range is skipped,
/// since its start is not a transition inside the range.
pub fn scan_transitions<P: ZoneProvider + ?Sized>(
    provider: &P,
    zone: &str,
    range: &ScanRange,
) -> DatasetResult<Vec<Probe>> {
    let intervals = provider
        .zone_intervals(zone, range.start_instant, range.until_instant)
        .map_err(|err| DatasetError::from_provider(zone, err))?;

    let mut probes = Vec::with_capacity(intervals.len() * 2);
    for start in intervals.iter().filter_map(|interval| interval.start) {
        if start < range.start_instant {
            continue;
        }
        let before = start
            .checked_add_seconds(-BEFORE_TRANSITION_SECONDS)
            .map_err(|err| DatasetError::from_provider(zone, err))?;
        probes.push(Probe::new(before, TestItemKind::BeforeTransition));
        probes.push(Probe::new(start, TestItemKind::AtTransition));
    }
    Ok(probes)
}
