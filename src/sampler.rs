//! Calendar sampling.

use zone_provider::{EpochSeconds, IsoDateTime, ZoneProvider};

use crate::item::{Probe, TestItemKind};
use crate::scanner::ScanRange;
use crate::{DatasetError, DatasetResult};

/// Returns the monthly `S` and year end `Y` probes for every local year in
/// `range`, ordered by year, then month, then the year end sample.
pub fn sample_calendar<P: ZoneProvider + ?Sized>(
    provider: &P,
    zone: &str,
    range: &ScanRange,
) -> DatasetResult<Vec<Probe>> {
    let local_year = |instant: EpochSeconds| {
        provider
            .zone_interval_at(zone, instant)
            .map(|interval| IsoDateTime::from_epoch_and_offset(instant, interval.offset).year)
            .map_err(|err| DatasetError::from_provider(zone, err))
    };
    let localize = |local: IsoDateTime| {
        provider
            .localize_leniently(zone, local)
            .map_err(|err| DatasetError::from_provider(zone, err))
    };

    let first_year = local_year(range.start_instant)?;
    let until_year = local_year(range.until_instant)?;

    let years = usize::try_from(until_year - first_year).unwrap_or(0);
    let mut probes = Vec::with_capacity(years * 13);
    for year in first_year..until_year {
        for month in 1..=12 {
            let instant = localize(IsoDateTime::start_of_month(year, month))?;
            probes.push(Probe::new(instant, TestItemKind::Sample));
        }
        let instant = localize(IsoDateTime::new(year, 12, 31, 23, 0, 0))?;
        probes.push(Probe::new(instant, TestItemKind::YearEnd));
    }
    Ok(probes)
}
