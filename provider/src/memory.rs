use alloc::borrow::{Cow, ToOwned};
use alloc::string::String;
use alloc::vec::Vec;

use rustc_hash::FxHashMap;

use crate::epoch_seconds::EpochSeconds;
use crate::provider::{IsoDateTime, ZoneInterval, ZoneProvider, ZoneProviderResult};
use crate::rules::ZoneRules;
use crate::ZoneProviderError;

/// A provider over zone rules built in memory.
///
/// Useful for tests and for data that did not come from a `TZif` source.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    version: String,
    zones: FxHashMap<String, ZoneRules>,
}

impl InMemoryProvider {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            zones: FxHashMap::default(),
        }
    }

    /// Adds or replaces the rules for `zone`.
    #[must_use]
    pub fn with_zone(mut self, zone: impl Into<String>, rules: ZoneRules) -> Self {
        self.insert(zone, rules);
        self
    }

    pub fn insert(&mut self, zone: impl Into<String>, rules: ZoneRules) {
        self.zones.insert(zone.into(), rules);
    }

    fn rules(&self, zone: &str) -> ZoneProviderResult<&ZoneRules> {
        self.zones
            .get(zone)
            .ok_or_else(|| ZoneProviderError::UnknownZone(zone.to_owned()))
    }
}

impl ZoneProvider for InMemoryProvider {
    fn database_version(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.version)
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

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::InMemoryProvider;
    use crate::provider::{LocalTimeType, ZoneProvider};
    use crate::rules::{Transition, ZoneRules};
    use crate::{EpochSeconds, ZoneProviderError};

    #[test]
    fn lookup_by_identifier() {
        let rules = ZoneRules::new(
            LocalTimeType::new(0, false, "GMT"),
            vec![Transition::new(1_000, LocalTimeType::new(3_600, true, "BST"))],
        )
        .unwrap();
        let provider = InMemoryProvider::new("test").with_zone("Europe/London", rules);

        assert_eq!(provider.database_version(), "test");
        let interval = provider
            .zone_interval_at("Europe/London", EpochSeconds(1_000))
            .unwrap();
        assert_eq!(interval.abbreviation, "BST");
        assert_eq!(
            provider.zone_intervals("Europe/London", EpochSeconds(0), EpochSeconds(2_000))
                .unwrap()
                .len(),
            2
        );
        assert_eq!(
            provider.zone_interval_at("Europe/Paris", EpochSeconds(0)),
            Err(ZoneProviderError::UnknownZone("Europe/Paris".into()))
        );
    }
}
