//! Test items and the builder that fills them in from a zone provider.

use serde::{Serialize, Serializer};
use zone_provider::{EpochSeconds, IsoDateTime, ZoneProvider};

use crate::{DatasetError, DatasetResult};

/// The reason an instant was probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TestItemKind {
    /// One minute before a transition.
    BeforeTransition,
    /// The transition instant itself.
    AtTransition,
    /// Midnight on the first of a month.
    Sample,
    /// 23:00 on December 31st.
    YearEnd,
}

impl TestItemKind {
    pub const fn as_char(self) -> char {
        match self {
            Self::BeforeTransition => 'A',
            Self::AtTransition => 'B',
            Self::Sample => 'S',
            Self::YearEnd => 'Y',
        }
    }
}

impl Serialize for TestItemKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_char(self.as_char())
    }
}

/// An instant to probe and the reason for probing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub instant: EpochSeconds,
    pub kind: TestItemKind,
}

impl Probe {
    pub const fn new(instant: EpochSeconds, kind: TestItemKind) -> Self {
        Self { instant, kind }
    }
}

/// The expected result of converting one instant in one zone.
///
/// Field order is the order of the keys in the JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestItem {
    /// Seconds since 2000-01-01T00:00:00Z.
    pub epoch: i64,
    pub total_offset: i64,
    pub dst_offset: i64,
    #[serde(rename = "y")]
    pub year: i32,
    #[serde(rename = "M")]
    pub month: u8,
    #[serde(rename = "d")]
    pub day: u8,
    #[serde(rename = "h")]
    pub hour: u8,
    #[serde(rename = "m")]
    pub minute: u8,
    #[serde(rename = "s")]
    pub second: u8,
    pub abbrev: String,
    #[serde(rename = "type")]
    pub kind: TestItemKind,
}

impl TestItem {
    /// The local wall clock reading of this item.
    pub fn local_date_time(&self) -> IsoDateTime {
        IsoDateTime::new(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        )
    }

    /// The probed instant as Unix seconds.
    pub fn instant(&self) -> EpochSeconds {
        EpochSeconds::from_custom_epoch(self.epoch)
    }
}

/// Builds the test item for `instant` in `zone`.
pub fn build_item<P: ZoneProvider + ?Sized>(
    provider: &P,
    zone: &str,
    instant: EpochSeconds,
    kind: TestItemKind,
) -> DatasetResult<TestItem> {
    let interval = provider
        .zone_interval_at(zone, instant)
        .map_err(|err| DatasetError::from_provider(zone, err))?;
    let local = IsoDateTime::from_epoch_and_offset(instant, interval.offset);

    Ok(TestItem {
        epoch: instant.to_custom_epoch(),
        total_offset: interval.offset.0,
        dst_offset: interval.dst_offset.0,
        year: local.year,
        month: local.month,
        day: local.day,
        hour: local.hour,
        minute: local.minute,
        second: local.second,
        abbrev: interval.abbreviation,
        kind,
    })
}
