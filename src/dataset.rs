//! Dataset assembly and serialization.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Serialize, Serializer};
use zone_provider::ZoneProvider;

use crate::config::GeneratorConfig;
use crate::item::{build_item, Probe, TestItem};
use crate::merge::ItemMerger;
use crate::sampler::sample_calendar;
use crate::scanner::{scan_transitions, ScanRange};
use crate::DatasetResult;

/// One zone's ordered test items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneDataset {
    pub zone: String,
    pub items: Vec<TestItem>,
}

// A zone serializes as its item list; the zone name is the map key.
impl Serialize for ZoneDataset {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.items.serialize(serializer)
    }
}

/// The complete validation dataset.
///
/// Field order is the order of the keys in the JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dataset {
    pub start_year: i32,
    pub until_year: i32,
    pub source: String,
    pub version: String,
    pub tz_version: String,
    pub has_valid_abbrev: bool,
    pub has_valid_dst: bool,
    pub test_data: BTreeMap<String, ZoneDataset>,
}

impl Dataset {
    /// Renders the dataset as pretty printed JSON with a trailing newline.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Writes the complete document to `writer` in a single write.
    pub fn write_json<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        let json = self.to_json()?;
        writer.write_all(json.as_bytes())?;
        writer.flush()
    }
}

/// Generates the merged test items for one zone.
pub fn generate_zone<P: ZoneProvider + ?Sized>(
    provider: &P,
    zone: &str,
    start_year: i32,
    until_year: i32,
) -> DatasetResult<ZoneDataset> {
    let range = ScanRange::resolve(provider, zone, start_year, until_year)?;
    let transitions = scan_transitions(provider, zone, &range)?;
    let samples = sample_calendar(provider, zone, &range)?;

    let mut merger = ItemMerger::new();
    for Probe { instant, kind } in transitions.iter().chain(samples.iter()).copied() {
        merger.insert(build_item(provider, zone, instant, kind)?);
    }

    debug!(
        "{zone}: {} transition probes, {} samples, {} items",
        transitions.len(),
        samples.len(),
        merger.len()
    );

    Ok(ZoneDataset {
        zone: zone.to_owned(),
        items: merger.into_items(),
    })
}

/// Generates the dataset for `zones`.
///
/// Duplicate zone identifiers are generated once. The first failing zone
/// aborts the run.
pub fn generate_dataset<P, Z>(
    provider: &P,
    zones: &[Z],
    config: &GeneratorConfig,
) -> DatasetResult<Dataset>
where
    P: ZoneProvider + Sync + ?Sized,
    Z: AsRef<str>,
{
    let mut unique = BTreeSet::new();
    for zone in zones.iter().map(AsRef::as_ref) {
        if !unique.insert(zone) {
            warn!("zone `{zone}` is listed more than once");
        }
    }
    let unique: Vec<&str> = unique.into_iter().collect();

    info!(
        "generating {} zones for [{}, {})",
        unique.len(),
        config.start_year,
        config.until_year
    );

    let generate = |zone: &&str| generate_zone(provider, zone, config.start_year, config.until_year);
    let zone_datasets: DatasetResult<Vec<ZoneDataset>> = if config.parallel {
        unique.par_iter().map(generate).collect()
    } else {
        unique.iter().map(generate).collect()
    };

    let test_data: BTreeMap<String, ZoneDataset> = zone_datasets?
        .into_iter()
        .map(|dataset| (dataset.zone.clone(), dataset))
        .collect();

    let tz_version = config
        .tz_version
        .clone()
        .unwrap_or_else(|| provider.database_version().into_owned());

    info!("generated {} zones", test_data.len());

    Ok(Dataset {
        start_year: config.start_year,
        until_year: config.until_year,
        source: config.source.clone(),
        version: config.version.clone(),
        tz_version,
        has_valid_abbrev: true,
        has_valid_dst: true,
        test_data,
    })
}
