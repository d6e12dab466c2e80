//! Materialized zone rules.
//!
//! A [`ZoneRules`] value is a zone compiled down to a contiguous, ordered
//! list of [`ZoneInterval`]s. Every provider in this crate answers queries
//! from one of these, which keeps the interval search and the lenient
//! local time resolution in one place.

use alloc::vec::Vec;

use crate::epoch_seconds::{EpochSeconds, SECONDS_PER_DAY};
use crate::provider::{IsoDateTime, LocalTimeType, UtcOffsetSeconds, ZoneInterval, ZoneProviderResult};
use crate::utils;
use crate::ZoneProviderError;

// Offsets never exceed a day in either direction, so a local time can only
// fall into intervals whose bounds are within this window.
const LOCAL_SEARCH_WINDOW: i64 = 2 * SECONDS_PER_DAY;

/// A single transition into a new local time type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub at: EpochSeconds,
    pub local_type: LocalTimeType,
}

impl Transition {
    pub fn new(at: impl Into<EpochSeconds>, local_type: LocalTimeType) -> Self {
        Self {
            at: at.into(),
            local_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRules {
    intervals: Vec<ZoneInterval>,
    valid_until: Option<EpochSeconds>,
}

impl ZoneRules {
    /// Builds rules from the local time type in effect before the first
    /// transition and the ordered transitions that follow it.
    ///
    /// Transitions that do not change the local time type are dropped.
    pub fn new(initial: LocalTimeType, transitions: Vec<Transition>) -> ZoneProviderResult<Self> {
        let mut types = Vec::with_capacity(transitions.len() + 1);
        let mut starts = Vec::with_capacity(transitions.len() + 1);
        types.push(initial);
        starts.push(None);

        let mut last_at: Option<EpochSeconds> = None;
        for transition in transitions {
            if last_at.is_some_and(|previous| previous >= transition.at) {
                return Err(ZoneProviderError::Assert(
                    "zone transitions must be strictly increasing",
                ));
            }
            last_at = Some(transition.at);
            if types.last() == Some(&transition.local_type) {
                continue;
            }
            types.push(transition.local_type);
            starts.push(Some(transition.at));
        }

        let dst_offsets = dst_offsets(&types);
        let intervals = types
            .into_iter()
            .zip(dst_offsets)
            .enumerate()
            .map(|(idx, (local_type, dst_offset))| ZoneInterval {
                start: starts[idx],
                end: starts.get(idx + 1).copied().flatten(),
                offset: local_type.offset,
                dst_offset,
                abbreviation: local_type.abbreviation,
            })
            .collect();

        Ok(Self {
            intervals,
            valid_until: None,
        })
    }

    /// Rules for a zone that never changes.
    pub fn fixed(local_type: LocalTimeType) -> Self {
        // With no standard time to measure against, the DST portion is zero.
        Self {
            intervals: alloc::vec![ZoneInterval {
                start: None,
                end: None,
                offset: local_type.offset,
                dst_offset: UtcOffsetSeconds(0),
                abbreviation: local_type.abbreviation,
            }],
            valid_until: None,
        }
    }

    /// Marks every instant at or after `valid_until` as unknown.
    ///
    /// Used when a recurring rule was only expanded up to a horizon.
    #[must_use]
    pub fn with_valid_until(mut self, valid_until: EpochSeconds) -> Self {
        self.valid_until = Some(valid_until);
        self
    }

    pub fn valid_until(&self) -> Option<EpochSeconds> {
        self.valid_until
    }

    pub fn intervals(&self) -> &[ZoneInterval] {
        &self.intervals
    }

    fn check_instant(&self, instant: EpochSeconds) -> ZoneProviderResult<()> {
        match self.valid_until {
            Some(valid_until) if instant >= valid_until => {
                Err(ZoneProviderError::InstantOutOfRange)
            }
            _ => Ok(()),
        }
    }

    fn index_at(&self, instant: EpochSeconds) -> usize {
        // The first interval has no start, so the partition point is at least 1.
        self.intervals
            .partition_point(|interval| interval.start.is_none_or(|start| start <= instant))
            .saturating_sub(1)
    }

    /// The interval containing `instant`.
    pub fn interval_at(&self, instant: EpochSeconds) -> ZoneProviderResult<&ZoneInterval> {
        self.check_instant(instant)?;
        self.intervals
            .get(self.index_at(instant))
            .ok_or(ZoneProviderError::Assert("zone rules contain no intervals"))
    }

    /// The intervals overlapping `[start, until)`, in chronological order.
    pub fn intervals_between(
        &self,
        start: EpochSeconds,
        until: EpochSeconds,
    ) -> ZoneProviderResult<&[ZoneInterval]> {
        if until <= start {
            return Ok(&[]);
        }
        self.check_instant(EpochSeconds(until.0 - 1))?;
        let first = self.index_at(start);
        let last = self.index_at(EpochSeconds(until.0 - 1));
        self.intervals
            .get(first..=last)
            .ok_or(ZoneProviderError::Assert("zone rules contain no intervals"))
    }

    /// Resolves a wall clock value leniently.
    ///
    /// - exactly one candidate: that instant.
    /// - two candidates (an overlap): the earlier instant.
    /// - no candidates (a gap): the wall clock is shifted forward by the
    ///   gap length, i.e. it is read with the offset from before the gap.
    pub fn localize_leniently(&self, local: IsoDateTime) -> ZoneProviderResult<EpochSeconds> {
        utils::check_year(local.year)?;
        let local_seconds = local.to_local_seconds();

        // Only intervals near the local value can contain it.
        let lo = self.intervals.partition_point(|interval| {
            interval
                .end
                .is_some_and(|end| end.0 <= local_seconds - LOCAL_SEARCH_WINDOW)
        });
        let hi = self.intervals.partition_point(|interval| {
            interval
                .start
                .is_none_or(|start| start.0 <= local_seconds + LOCAL_SEARCH_WINDOW)
        });
        let window = self
            .intervals
            .get(lo..hi)
            .ok_or(ZoneProviderError::Assert("zone rules contain no intervals"))?;

        let earliest_candidate = window
            .iter()
            .filter(|interval| {
                interval
                    .local_start_seconds()
                    .is_none_or(|start| start <= local_seconds)
                    && interval
                        .local_end_seconds()
                        .is_none_or(|end| local_seconds < end)
            })
            .map(|interval| EpochSeconds(local_seconds - interval.offset.0))
            .min();

        let instant = match earliest_candidate {
            Some(instant) => instant,
            None => {
                // A gap: read the wall clock with the offset from before it.
                let before_gap = window
                    .windows(2)
                    .find(|pair| {
                        pair[0]
                            .local_end_seconds()
                            .is_some_and(|end| end <= local_seconds)
                            && pair[1]
                                .local_start_seconds()
                                .is_some_and(|start| local_seconds < start)
                    })
                    .map(|pair| &pair[0])
                    .ok_or(ZoneProviderError::Assert(
                        "local time is neither valid nor in a gap",
                    ))?;
                EpochSeconds(local_seconds - before_gap.offset.0)
            }
        };

        self.check_instant(instant)?;
        Ok(instant)
    }
}

/// Computes the daylight saving portion of each type's offset.
///
/// Daylight saving time is measured against the nearest standard time type
/// before it. When that gives no positive saving, which happens when the
/// standard offset changes together with the start of DST, the nearest
/// standard type after it is used instead.
fn dst_offsets(types: &[LocalTimeType]) -> Vec<UtcOffsetSeconds> {
    types
        .iter()
        .enumerate()
        .map(|(idx, local_type)| {
            if !local_type.is_dst {
                return UtcOffsetSeconds(0);
            }
            let saving_against = |standard: Option<&LocalTimeType>| {
                standard.map(|standard| local_type.offset.0 - standard.offset.0)
            };
            let before = saving_against(types[..idx].iter().rev().find(|t| !t.is_dst));
            let after = saving_against(types[idx + 1..].iter().find(|t| !t.is_dst));
            let saving = match (before, after) {
                (Some(before), _) if before > 0 => before,
                (_, Some(after)) if after > 0 => after,
                (before, after) => before.or(after).unwrap_or(0),
            };
            UtcOffsetSeconds(saving)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::{Transition, ZoneRules};
    use crate::provider::{IsoDateTime, LocalTimeType, UtcOffsetSeconds};
    use crate::{EpochSeconds, ZoneProviderError};

    // America/Los_Angeles around 2000
    const SPRING_2000: i64 = 954_669_600;
    const FALL_2000: i64 = 972_810_000;

    fn pst() -> LocalTimeType {
        LocalTimeType::new(-28_800, false, "PST")
    }

    fn pdt() -> LocalTimeType {
        LocalTimeType::new(-25_200, true, "PDT")
    }

    fn los_angeles_2000() -> ZoneRules {
        ZoneRules::new(
            pst(),
            vec![
                Transition::new(SPRING_2000, pdt()),
                Transition::new(FALL_2000, pst()),
            ],
        )
        .unwrap()
    }

    #[test]
    fn intervals_are_contiguous() {
        let rules = los_angeles_2000();
        let intervals = rules.intervals();
        assert_eq!(intervals.len(), 3);
        assert_eq!(intervals[0].start, None);
        assert_eq!(intervals[0].end, Some(EpochSeconds(SPRING_2000)));
        assert_eq!(intervals[1].start, Some(EpochSeconds(SPRING_2000)));
        assert_eq!(intervals[1].end, Some(EpochSeconds(FALL_2000)));
        assert_eq!(intervals[2].end, None);
    }

    #[test]
    fn dst_portion_is_measured_against_standard_time() {
        let rules = los_angeles_2000();
        let summer = rules.interval_at(EpochSeconds(SPRING_2000)).unwrap();
        assert_eq!(summer.offset, UtcOffsetSeconds(-25_200));
        assert_eq!(summer.dst_offset, UtcOffsetSeconds(3_600));
        assert_eq!(summer.abbreviation, "PDT");

        let winter = rules.interval_at(EpochSeconds(SPRING_2000 - 60)).unwrap();
        assert_eq!(winter.dst_offset, UtcOffsetSeconds(0));
        assert_eq!(winter.abbreviation, "PST");
    }

    #[test]
    fn double_summer_time_uses_preceding_standard_time() {
        let gmt = LocalTimeType::new(0, false, "GMT");
        let bst = LocalTimeType::new(3_600, true, "BST");
        let bdst = LocalTimeType::new(7_200, true, "BDST");
        let rules = ZoneRules::new(
            gmt,
            vec![Transition::new(1_000, bst), Transition::new(2_000, bdst)],
        )
        .unwrap();
        let interval = rules.interval_at(EpochSeconds(2_500)).unwrap();
        assert_eq!(interval.dst_offset, UtcOffsetSeconds(7_200));
    }

    #[test]
    fn standard_offset_change_at_dst_start_uses_following_standard_time() {
        // Asia/Anadyr in 2010: +12 standard became +11 standard with DST,
        // keeping the total offset at +12.
        let before = LocalTimeType::new(43_200, false, "+12");
        let summer = LocalTimeType::new(43_200, true, "+12");
        let winter = LocalTimeType::new(39_600, false, "+11");
        let rules = ZoneRules::new(
            before,
            vec![
                Transition::new(1_269_698_400, summer),
                Transition::new(1_288_450_800, winter),
            ],
        )
        .unwrap();
        let interval = rules.interval_at(EpochSeconds(1_269_698_400)).unwrap();
        assert_eq!(interval.offset, UtcOffsetSeconds(43_200));
        assert_eq!(interval.dst_offset, UtcOffsetSeconds(3_600));
    }

    #[test]
    fn negative_saving_is_kept() {
        // Europe/Dublin marks winter as DST with a negative saving.
        let ist = LocalTimeType::new(3_600, false, "IST");
        let gmt = LocalTimeType::new(0, true, "GMT");
        let rules = ZoneRules::new(
            ist.clone(),
            vec![Transition::new(1_000, gmt), Transition::new(2_000, ist)],
        )
        .unwrap();
        let interval = rules.interval_at(EpochSeconds(1_500)).unwrap();
        assert_eq!(interval.dst_offset, UtcOffsetSeconds(-3_600));
    }

    #[test]
    fn out_of_range_years_are_rejected() {
        let rules = los_angeles_2000();
        for year in [-3_000_000, 10_000, i32::MAX] {
            assert!(matches!(
                rules.localize_leniently(IsoDateTime::start_of_month(year, 1)),
                Err(ZoneProviderError::Range(_))
            ));
        }
    }

    #[test]
    fn redundant_transitions_are_coalesced() {
        let rules = ZoneRules::new(
            pst(),
            vec![
                Transition::new(100, pst()),
                Transition::new(SPRING_2000, pdt()),
                Transition::new(SPRING_2000 + 100, pdt()),
            ],
        )
        .unwrap();
        assert_eq!(rules.intervals().len(), 2);
    }

    #[test]
    fn unordered_transitions_are_rejected() {
        let result = ZoneRules::new(
            pst(),
            vec![Transition::new(200, pdt()), Transition::new(100, pst())],
        );
        assert!(matches!(result, Err(ZoneProviderError::Assert(_))));
    }

    #[test]
    fn intervals_between_is_half_open() {
        let rules = los_angeles_2000();
        let all = rules
            .intervals_between(EpochSeconds(0), EpochSeconds(2_000_000_000))
            .unwrap();
        assert_eq!(all.len(), 3);

        // Ends exactly at the spring transition, so the PDT interval is excluded.
        let winter_only = rules
            .intervals_between(EpochSeconds(0), EpochSeconds(SPRING_2000))
            .unwrap();
        assert_eq!(winter_only.len(), 1);

        let empty = rules
            .intervals_between(EpochSeconds(SPRING_2000), EpochSeconds(SPRING_2000))
            .unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn lenient_gap_shifts_forward() {
        let rules = los_angeles_2000();
        // 02:30 does not exist on 2000-04-02; it resolves to 03:30 PDT.
        let instant = rules
            .localize_leniently(IsoDateTime::new(2000, 4, 2, 2, 30, 0))
            .unwrap();
        assert_eq!(instant, EpochSeconds(SPRING_2000 + 1_800));

        // Exactly at the start of the gap.
        let instant = rules
            .localize_leniently(IsoDateTime::new(2000, 4, 2, 2, 0, 0))
            .unwrap();
        assert_eq!(instant, EpochSeconds(SPRING_2000));
    }

    #[test]
    fn lenient_overlap_takes_earlier() {
        let rules = los_angeles_2000();
        // 01:30 happens twice on 2000-10-29; the PDT reading comes first.
        let instant = rules
            .localize_leniently(IsoDateTime::new(2000, 10, 29, 1, 30, 0))
            .unwrap();
        assert_eq!(instant, EpochSeconds(FALL_2000 - 1_800));
    }

    #[test]
    fn lenient_unambiguous() {
        let rules = los_angeles_2000();
        let instant = rules
            .localize_leniently(IsoDateTime::new(2000, 1, 1, 0, 0, 0))
            .unwrap();
        assert_eq!(instant, EpochSeconds(946_684_800 + 28_800));
    }

    #[test]
    fn horizon_is_enforced() {
        let rules = los_angeles_2000().with_valid_until(EpochSeconds(FALL_2000));
        assert_eq!(
            rules.interval_at(EpochSeconds(FALL_2000)),
            Err(ZoneProviderError::InstantOutOfRange)
        );
        assert!(rules
            .intervals_between(EpochSeconds(0), EpochSeconds(FALL_2000 + 1))
            .is_err());
        assert!(rules
            .intervals_between(EpochSeconds(0), EpochSeconds(FALL_2000))
            .is_ok());
    }

    #[test]
    fn fixed_zone() {
        let rules = ZoneRules::fixed(LocalTimeType::new(0, false, "UTC"));
        let intervals: Vec<_> = rules
            .intervals_between(EpochSeconds(-1_000), EpochSeconds(1_000))
            .unwrap()
            .to_vec();
        assert_eq!(intervals.len(), 1);
        assert!(!intervals[0].has_start());
    }
}
