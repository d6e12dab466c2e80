//! Generator configuration.

/// The default first year of the generated range.
pub const DEFAULT_START_YEAR: i32 = 2000;
/// The default exclusive end year of the generated range.
pub const DEFAULT_UNTIL_YEAR: i32 = 2050;
/// The default `source` tag written to the dataset.
pub const DEFAULT_SOURCE: &str = "tzvalidation";

/// Settings for a single generator run.
///
/// The year range is half open: `[start_year, until_year)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub start_year: i32,
    pub until_year: i32,
    /// Name of the generator, written as `source`.
    pub source: String,
    /// Version of the generator, written as `version`.
    pub version: String,
    /// Replaces the zone provider's database version when set.
    pub tz_version: Option<String>,
    /// Generate zones on the rayon thread pool.
    pub parallel: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            start_year: DEFAULT_START_YEAR,
            until_year: DEFAULT_UNTIL_YEAR,
            source: DEFAULT_SOURCE.to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            tz_version: None,
            parallel: true,
        }
    }
}

impl GeneratorConfig {
    #[must_use]
    pub fn with_years(mut self, start_year: i32, until_year: i32) -> Self {
        self.start_year = start_year;
        self.until_year = until_year;
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    #[must_use]
    pub fn with_tz_version(mut self, tz_version: impl Into<String>) -> Self {
        self.tz_version = Some(tz_version.into());
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::GeneratorConfig;

    #[test]
    fn defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.start_year, 2000);
        assert_eq!(config.until_year, 2050);
        assert_eq!(config.source, "tzvalidation");
        assert_eq!(config.version, env!("CARGO_PKG_VERSION"));
        assert!(config.parallel);
        assert!(config.tz_version.is_none());
    }

    #[test]
    fn builders() {
        let config = GeneratorConfig::default()
            .with_years(2020, 2020)
            .with_tz_version("2024a")
            .with_parallel(false);
        assert_eq!((config.start_year, config.until_year), (2020, 2020));
        assert_eq!(config.tz_version.as_deref(), Some("2024a"));
        assert!(!config.parallel);
    }
}
