//! Providers backed by the IANA time zone database in `TZif` form.

use alloc::borrow::{Cow, ToOwned};
use alloc::string::String;
use alloc::vec::Vec;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use rustc_hash::FxHashMap;

use crate::epoch_seconds::EpochSeconds;
use crate::provider::{IsoDateTime, ZoneInterval, ZoneProvider, ZoneProviderResult};
use crate::rules::ZoneRules;
use crate::tzif::{Tzif, DEFAULT_HORIZON_YEAR};
use crate::ZoneProviderError;

const ZONEINFO_DIR: &str = "/usr/share/zoneinfo/";
const UNKNOWN_VERSION: &str = "unknown";

/// A provider that uses `TZif` data compiled into the binary via
/// [`jiff_tzdb`].
pub type CompiledTzdbProvider = TzdbProvider<CompiledTzdb>;

/// A provider that reads `TZif` files from a zoneinfo directory.
///
/// Parsed zones are cached, which offsets the parsing cost on repeated
/// requests.
pub type FsTzdbProvider = TzdbProvider<FsTzdb>;

mod sealed {
    pub trait Sealed {}
}

pub trait TzdbBackend: sealed::Sealed {
    /// Looks up the raw `TZif` bytes for a zone identifier.
    fn load(&self, identifier: &str) -> ZoneProviderResult<Cow<'_, [u8]>>;

    /// The database version, if the source records one.
    fn version(&self) -> Option<String>;
}

/// `TZif` data bundled with the `jiff-tzdb` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct CompiledTzdb;

impl sealed::Sealed for CompiledTzdb {}
impl TzdbBackend for CompiledTzdb {
    fn load(&self, identifier: &str) -> ZoneProviderResult<Cow<'_, [u8]>> {
        let Some((_, tzif_bytes)) = jiff_tzdb::get(identifier) else {
            return Err(ZoneProviderError::UnknownZone(identifier.to_owned()));
        };
        Ok(Cow::Borrowed(tzif_bytes))
    }

    fn version(&self) -> Option<String> {
        jiff_tzdb::VERSION.map(ToOwned::to_owned)
    }
}

/// A zoneinfo directory, `/usr/share/zoneinfo` by default.
#[derive(Debug, Clone)]
pub struct FsTzdb {
    root: PathBuf,
}

impl Default for FsTzdb {
    fn default() -> Self {
        Self::new(ZONEINFO_DIR)
    }
}

impl FsTzdb {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl sealed::Sealed for FsTzdb {}
impl TzdbBackend for FsTzdb {
    fn load(&self, identifier: &str) -> ZoneProviderResult<Cow<'_, [u8]>> {
        // Protect from path traversal attacks
        if identifier.is_empty() || identifier.starts_with('/') || identifier.contains('.') {
            return Err(ZoneProviderError::UnknownZone(identifier.to_owned()));
        }
        let path = self.root.join(identifier);
        if !path.is_file() {
            return Err(ZoneProviderError::UnknownZone(identifier.to_owned()));
        }
        fs::read(&path)
            .map(Cow::Owned)
            .map_err(|err| ZoneProviderError::Io(alloc::format!("{}: {err}", path.display())))
    }

    fn version(&self) -> Option<String> {
        // `tzdata.zi` starts with a "# version 2024a" line.
        let from_zi = fs::read_to_string(self.root.join("tzdata.zi"))
            .ok()
            .and_then(|zi| {
                zi.lines()
                    .next()
                    .and_then(|line| line.strip_prefix("# version "))
                    .map(|version| version.trim().to_owned())
            });
        from_zi
            .or_else(|| {
                fs::read_to_string(self.root.join("+VERSION"))
                    .ok()
                    .map(|version| version.trim().to_owned())
            })
            .filter(|version| !version.is_empty())
    }
}

/// A [`ZoneProvider`] over `TZif` data from a [`TzdbBackend`].
///
/// Zones are parsed and compiled on first use and shared afterwards. The
/// provider can be used from several threads at once.
#[derive(Debug)]
pub struct TzdbProvider<Backend> {
    cache: RwLock<FxHashMap<String, Arc<ZoneRules>>>,
    backend: Backend,
    version: Option<String>,
    horizon_year: i32,
}

impl<Backend: Default> Default for TzdbProvider<Backend> {
    fn default() -> Self {
        Self::new(Backend::default())
    }
}

impl<Backend> TzdbProvider<Backend> {
    pub fn new(backend: Backend) -> Self {
        Self {
            cache: RwLock::default(),
            backend,
            version: None,
            horizon_year: DEFAULT_HORIZON_YEAR,
        }
    }

    /// Overrides the reported database version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the last year recurring rules are expanded for.
    #[must_use]
    pub fn with_horizon_year(mut self, horizon_year: i32) -> Self {
        self.horizon_year = horizon_year;
        self
    }
}

impl FsTzdbProvider {
    /// A provider reading from the zoneinfo directory at `root`.
    pub fn from_directory(root: impl Into<PathBuf>) -> Self {
        Self::new(FsTzdb::new(root))
    }
}

impl<Backend: TzdbBackend> TzdbProvider<Backend> {
    /// The compiled rules for `zone`.
    pub fn rules(&self, zone: &str) -> ZoneProviderResult<Arc<ZoneRules>> {
        if let Some(rules) = self
            .cache
            .read()
            .map_err(|_| ZoneProviderError::Assert("poisoned RwLock"))?
            .get(zone)
        {
            log::trace!("reusing cached rules for {zone}");
            return Ok(rules.clone());
        }

        let bytes = self.backend.load(zone)?;
        let rules = Arc::new(Tzif::from_bytes(&bytes)?.compile(self.horizon_year)?);
        log::debug!(
            "compiled {} zone intervals for {zone}",
            rules.intervals().len()
        );

        Ok(self
            .cache
            .write()
            .map_err(|_| ZoneProviderError::Assert("poisoned RwLock"))?
            .entry(zone.to_owned())
            .or_insert(rules)
            .clone())
    }
}

impl<Backend: TzdbBackend> ZoneProvider for TzdbProvider<Backend> {
    fn database_version(&self) -> Cow<'_, str> {
        if let Some(version) = &self.version {
            return Cow::Borrowed(version);
        }
        match self.backend.version() {
            Some(version) => Cow::Owned(version),
            None => Cow::Borrowed(UNKNOWN_VERSION),
        }
    }

    fn zone_intervals(
        &self,
        zone: &str,
        start: EpochSeconds,
        until: EpochSeconds,
    ) -> ZoneProviderResult<Vec<ZoneInterval>> {
        Ok(self.rules(zone)?.intervals_between(start, until)?.to_vec())
    }

    fn zone_interval_at(
        &self,
        zone: &str,
        instant: EpochSeconds,
    ) -> ZoneProviderResult<ZoneInterval> {
        self.rules(zone)?.interval_at(instant).cloned()
    }

    fn localize_leniently(
        &self,
        zone: &str,
        local: IsoDateTime,
    ) -> ZoneProviderResult<EpochSeconds> {
        self.rules(zone)?.localize_leniently(local)
    }
}
