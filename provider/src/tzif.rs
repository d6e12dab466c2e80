//! Compiling `TZif` data into [`ZoneRules`].

use alloc::borrow::ToOwned;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use combine::Parser;
use tzif::data::{
    posix::{PosixTzString, TransitionDate, TransitionDay},
    tzif::{DataBlock, TzifData, TzifHeader},
};

use crate::epoch_seconds::{EpochSeconds, SECONDS_PER_DAY};
use crate::provider::{LocalTimeType, UtcOffsetSeconds, ZoneProviderResult};
use crate::rules::{Transition, ZoneRules};
use crate::utils;
use crate::ZoneProviderError;

/// The last year for which recurring footer rules are expanded by default.
pub const DEFAULT_HORIZON_YEAR: i32 = 2200;

// Zones that only carry a footer are expanded from this year on.
const FOOTER_ONLY_FIRST_YEAR: i32 = 1900;

/// `TZif` stands for Time zone information format is laid out by [RFC 8536][rfc8536] and
/// laid out by the [tzdata manual][tzif-manual]
///
/// This wraps the parsed type from the `tzif` [rust crate][tzif-crate] so it
/// can be compiled into a list of zone intervals.
///
/// [rfc8536]: https://datatracker.ietf.org/doc/html/rfc8536
/// [tzif-manual]: https://man7.org/linux/man-pages/man5/tzfile.5.html
/// [tzif-crate]: https://docs.rs/tzif/latest/tzif/
#[derive(Debug, Clone)]
pub struct Tzif {
    pub header1: TzifHeader,
    pub data_block1: DataBlock,
    pub header2: Option<TzifHeader>,
    pub data_block2: Option<DataBlock>,
    pub footer: Option<PosixTzString>,
}

impl From<TzifData> for Tzif {
    fn from(value: TzifData) -> Self {
        let TzifData {
            header1,
            data_block1,
            header2,
            data_block2,
            footer,
        } = value;

        Self {
            header1,
            data_block1,
            header2,
            data_block2,
            footer,
        }
    }
}

impl Tzif {
    pub fn from_bytes(data: &[u8]) -> ZoneProviderResult<Self> {
        let Ok((parse_result, _)) = tzif::parse::tzif::tzif().parse(data) else {
            return Err(ZoneProviderError::Assert("Illformed Tzif data."));
        };
        Ok(Self::from(parse_result))
    }

    pub fn posix_tz_string(&self) -> Option<&PosixTzString> {
        self.footer.as_ref()
    }

    pub fn get_data_block2(&self) -> ZoneProviderResult<&DataBlock> {
        self.data_block2
            .as_ref()
            .ok_or(ZoneProviderError::Assert("Only Tzif V2+ is supported."))
    }

    /// Compiles this `TZif` into zone rules.
    ///
    /// The transition table is used as is. A footer with daylight saving
    /// rules is expanded year by year after the last table transition up to
    /// and including `horizon_year`, and the resulting rules are only valid
    /// before the start of the following year.
    pub fn compile(&self, horizon_year: i32) -> ZoneProviderResult<ZoneRules> {
        if !(FOOTER_ONLY_FIRST_YEAR..=utils::MAX_YEAR + 1).contains(&horizon_year) {
            return Err(ZoneProviderError::Range("horizon year is out of range"));
        }
        let db = self.get_data_block2()?;
        let designations = designation_block(db);

        let local_types: Vec<LocalTimeType> = db
            .local_time_type_records
            .iter()
            .map(|record| {
                LocalTimeType::new(
                    record.utoff.0,
                    record.is_dst,
                    designation_at(&designations, record.idx),
                )
            })
            .collect();

        let initial = local_types
            .first()
            .cloned()
            .ok_or(ZoneProviderError::Assert("Tzif has no local time types."))?;

        let table = db
            .transition_times
            .iter()
            .zip(db.transition_types.iter())
            .map(|(at, idx)| {
                local_types
                    .get(*idx)
                    .cloned()
                    .map(|local_type| Transition::new(at.0, local_type))
                    .ok_or(ZoneProviderError::Assert(
                        "Tzif transition type is out of range.",
                    ))
            })
            .collect::<ZoneProviderResult<Vec<_>>>()?;

        let Some(footer) = self.posix_tz_string() else {
            return ZoneRules::new(initial, table);
        };
        let Some(dst_info) = &footer.dst_info else {
            // A footer without daylight saving time continues the last type.
            return ZoneRules::new(initial, table);
        };

        // POSIX offsets are west-positive.
        let std_offset = UtcOffsetSeconds(-footer.std_info.offset.0);
        let dst_offset = UtcOffsetSeconds(-dst_info.variant_info.offset.0);
        let std = LocalTimeType {
            abbreviation: footer_abbreviation(
                &footer.std_info.name.to_string(),
                &table,
                &local_types,
                std_offset,
                false,
            ),
            offset: std_offset,
            is_dst: false,
        };
        let dst = LocalTimeType {
            abbreviation: footer_abbreviation(
                &dst_info.variant_info.name.to_string(),
                &table,
                &local_types,
                dst_offset,
                true,
            ),
            offset: dst_offset,
            is_dst: true,
        };

        let last_table_at = table.last().map(|transition| transition.at);
        let first_year = last_table_at.map_or(FOOTER_ONLY_FIRST_YEAR, |at| {
            utils::year_for_epoch_seconds(at.0)
        });

        let mut expanded: Vec<Transition> = Vec::new();
        for year in first_year..=horizon_year {
            let dst_start = transition_seconds_for_year(year, dst_info.start_date, std_offset);
            let dst_end = transition_seconds_for_year(year, dst_info.end_date, dst_offset);
            let mut pair = [
                Transition::new(dst_start, dst.clone()),
                Transition::new(dst_end, std.clone()),
            ];
            pair.sort_by_key(|transition| transition.at);

            for transition in pair {
                if last_table_at.is_some_and(|last| transition.at <= last) {
                    continue;
                }
                // Rules like "all year DST" produce an end that meets the
                // next start; the later transition replaces the earlier one.
                while expanded
                    .last()
                    .is_some_and(|previous| transition.at <= previous.at)
                {
                    expanded.pop();
                }
                let previous_type = expanded
                    .last()
                    .or(table.last())
                    .map(|previous| &previous.local_type);
                if previous_type == Some(&transition.local_type) {
                    continue;
                }
                expanded.push(transition);
            }
        }

        let mut transitions = table;
        transitions.extend(expanded);
        let valid_until =
            EpochSeconds(utils::epoch_days_for_year(horizon_year + 1) * SECONDS_PER_DAY);
        Ok(ZoneRules::new(initial, transitions)?.with_valid_until(valid_until))
    }
}

/// Reassembles the NUL separated designation block.
fn designation_block(db: &DataBlock) -> String {
    let mut block = db.time_zone_designations.join("\0");
    block.push('\0');
    block
}

/// Reads the designation starting at byte `idx` of the block.
///
/// Designations may share a suffix, so `idx` can point into the middle of
/// another designation.
fn designation_at(block: &str, idx: usize) -> String {
    block
        .get(idx..)
        .and_then(|rest| rest.split('\0').next())
        .unwrap_or_default()
        .to_owned()
}

/// The designation for a footer variant.
///
/// The POSIX name is used when the footer has one. Otherwise the most recent
/// table type with the same offset and DST flag lends its designation.
fn footer_abbreviation(
    posix_name: &str,
    table: &[Transition],
    local_types: &[LocalTimeType],
    offset: UtcOffsetSeconds,
    is_dst: bool,
) -> String {
    // Quoted names such as `<+0330>` keep their angle brackets in some parsers.
    let posix_name = posix_name.trim_start_matches('<').trim_end_matches('>');
    if !posix_name.is_empty() {
        return posix_name.to_owned();
    }
    table
        .iter()
        .rev()
        .map(|transition| &transition.local_type)
        .chain(local_types.iter().rev())
        .find(|local_type| local_type.offset == offset && local_type.is_dst == is_dst)
        .map(|local_type| local_type.abbreviation.clone())
        .unwrap_or_else(|| numeric_abbreviation(offset))
}

/// A `+HH` or `+HHMM` designation for zones without a named one.
fn numeric_abbreviation(offset: UtcOffsetSeconds) -> String {
    let sign = if offset.0 < 0 { '-' } else { '+' };
    let minutes = offset.0.abs() / 60;
    let (hours, minutes) = (minutes / 60, minutes % 60);
    if minutes == 0 {
        format!("{sign}{hours:02}")
    } else {
        format!("{sign}{hours:02}{minutes:02}")
    }
}

/// The UTC epoch seconds of a POSIX rule date in `year`.
///
/// The rule time is local time under `offset`.
fn transition_seconds_for_year(
    year: i32,
    transition_date: TransitionDate,
    offset: UtcOffsetSeconds,
) -> i64 {
    let year_epoch_days = utils::epoch_days_for_year(year);
    let is_leap = utils::is_leap(year);

    // Zero-indexed day in the year.
    let days = match transition_date.day {
        TransitionDay::NoLeap(day) if day > 59 => i64::from(day) - 1 + i64::from(is_leap),
        TransitionDay::NoLeap(day) => i64::from(day) - 1,
        TransitionDay::WithLeap(day) => i64::from(day),
        TransitionDay::Mwd(month, week, day) => {
            let month = u8::try_from(month).unwrap_or(1);
            let (week, day) = (i64::from(week), i64::from(day));
            let days_to_month = i64::from(utils::month_to_day(month.saturating_sub(1), is_leap));
            let days_in_month = i64::from(utils::iso_days_in_month(year, month));

            // Day of week of the first of the month.
            let day_offset =
                i64::from(utils::day_of_week_for_epoch_days(year_epoch_days + days_to_month));

            // Note: this day_of_month is zero-indexed!
            let mut day_of_month = (week - i64::from(day_offset <= day)) * 7 + day - day_offset;

            // Week 5 means the last such weekday of the month.
            if day_of_month + 1 > days_in_month {
                day_of_month -= 7;
            }

            days_to_month + day_of_month
        }
    };

    (year_epoch_days + days) * SECONDS_PER_DAY + transition_date.time.0 - offset.0
}

#[cfg(test)]
mod tests {
    use super::{
        designation_at, footer_abbreviation, numeric_abbreviation, Tzif, DEFAULT_HORIZON_YEAR,
    };
    use crate::provider::{IsoDateTime, LocalTimeType, UtcOffsetSeconds};
    use crate::rules::Transition;
    use crate::{EpochSeconds, ZoneProviderError};

    fn compiled(identifier: &str) -> crate::ZoneRules {
        let (_, data) = jiff_tzdb::get(identifier).unwrap();
        Tzif::from_bytes(data)
            .unwrap()
            .compile(DEFAULT_HORIZON_YEAR)
            .unwrap()
    }

    #[test]
    fn designations_with_shared_suffix() {
        let block = "LMT\0AEDT\0AEST\0";
        assert_eq!(designation_at(block, 0), "LMT");
        assert_eq!(designation_at(block, 4), "AEDT");
        assert_eq!(designation_at(block, 5), "EDT");
        assert_eq!(designation_at(block, 9), "AEST");
        assert_eq!(designation_at(block, 100), "");
    }

    #[test]
    fn numeric_designations() {
        assert_eq!(numeric_abbreviation(UtcOffsetSeconds(-10_800)), "-03");
        assert_eq!(numeric_abbreviation(UtcOffsetSeconds(19_800)), "+0530");
        assert_eq!(numeric_abbreviation(UtcOffsetSeconds(0)), "+00");
    }

    #[test]
    fn footer_names_come_first() {
        let table = [Transition::new(0, LocalTimeType::new(-14_400, false, "CLT"))];
        let offset = UtcOffsetSeconds(-14_400);
        assert_eq!(footer_abbreviation("-04", &table, &[], offset, false), "-04");
        assert_eq!(footer_abbreviation("<-04>", &table, &[], offset, false), "-04");
        assert_eq!(footer_abbreviation("", &table, &[], offset, false), "CLT");
        assert_eq!(
            footer_abbreviation("", &[], &[], UtcOffsetSeconds(-10_800), true),
            "-03"
        );
    }

    #[test]
    fn quoted_footer_designations() {
        let rules = compiled("America/Santiago");
        // 2030-01-15T00:00:00Z, southern summer
        let summer = rules.interval_at(EpochSeconds(1_894_665_600)).unwrap();
        assert_eq!(summer.offset, UtcOffsetSeconds(-10_800));
        assert_eq!(summer.dst_offset, UtcOffsetSeconds(3_600));
        assert_eq!(summer.abbreviation, "-03");
    }

    #[test]
    fn horizon_year_is_validated() {
        let (_, data) = jiff_tzdb::get("America/New_York").unwrap();
        let tzif = Tzif::from_bytes(data).unwrap();
        for horizon_year in [1_000, 10_001, i32::MAX] {
            assert!(matches!(
                tzif.compile(horizon_year),
                Err(ZoneProviderError::Range(_))
            ));
        }
        assert!(tzif.compile(10_000).is_ok());
    }

    #[test]
    fn illformed_data() {
        assert!(matches!(
            Tzif::from_bytes(b"not a tzif"),
            Err(ZoneProviderError::Assert(_))
        ));
    }

    #[test]
    fn berlin_footer_transitions() {
        let rules = compiled("Europe/Berlin");

        // 2028-03-26T01:00:00Z
        let summer = rules.interval_at(EpochSeconds(1_837_645_200)).unwrap();
        assert_eq!(summer.start, Some(EpochSeconds(1_837_645_200)));
        assert_eq!(summer.end, Some(EpochSeconds(1_856_394_000)));
        assert_eq!(summer.offset, UtcOffsetSeconds(7_200));
        assert_eq!(summer.dst_offset, UtcOffsetSeconds(3_600));
        assert_eq!(summer.abbreviation, "CEST");

        let winter = rules.interval_at(EpochSeconds(1_856_394_000)).unwrap();
        assert_eq!(winter.offset, UtcOffsetSeconds(3_600));
        assert_eq!(winter.dst_offset, UtcOffsetSeconds(0));
        assert_eq!(winter.abbreviation, "CET");
    }

    #[test]
    fn new_york_lenient_resolution() {
        let rules = compiled("America/New_York");

        let gap = rules
            .localize_leniently(IsoDateTime::new(2017, 3, 12, 2, 30, 0))
            .unwrap();
        assert_eq!(gap, EpochSeconds(1_489_303_800));

        let overlap = rules
            .localize_leniently(IsoDateTime::new(2017, 11, 5, 1, 30, 0))
            .unwrap();
        assert_eq!(overlap, EpochSeconds(1_509_859_800));
    }

    #[test]
    fn horizon_limits_rules() {
        let (_, data) = jiff_tzdb::get("America/New_York").unwrap();
        let rules = Tzif::from_bytes(data).unwrap().compile(2030).unwrap();
        // 2031-01-01T00:00:00Z
        assert_eq!(rules.valid_until(), Some(EpochSeconds(1_924_992_000)));
        assert_eq!(
            rules.interval_at(EpochSeconds(1_924_992_000)),
            Err(ZoneProviderError::InstantOutOfRange)
        );
    }

    #[test]
    fn zone_without_dst_is_unbounded() {
        let rules = compiled("Asia/Tokyo");
        assert_eq!(rules.valid_until(), None);
        let interval = rules.interval_at(EpochSeconds(4_000_000_000)).unwrap();
        assert_eq!(interval.offset, UtcOffsetSeconds(32_400));
        assert_eq!(interval.abbreviation, "JST");
        assert_eq!(interval.end, None);
    }
}
