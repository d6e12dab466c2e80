//! This module implements `DatasetError`.

use core::fmt;

use zone_provider::ZoneProviderError;

/// The error type for dataset generation.
///
/// Every variant names the zone that was being generated when the failure
/// happened.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DatasetError {
    /// The zone provider does not know the zone identifier.
    UnknownZone { zone: String },
    /// Any other provider lookup failed.
    Provider {
        zone: String,
        source: ZoneProviderError,
    },
}

impl DatasetError {
    /// Attaches `zone` to a provider error.
    pub(crate) fn from_provider(zone: &str, source: ZoneProviderError) -> Self {
        match source {
            ZoneProviderError::UnknownZone(_) => Self::UnknownZone {
                zone: zone.to_owned(),
            },
            source => Self::Provider {
                zone: zone.to_owned(),
                source,
            },
        }
    }

    /// The zone identifier this error is about.
    pub fn zone(&self) -> &str {
        match self {
            Self::UnknownZone { zone } | Self::Provider { zone, .. } => zone,
        }
    }
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownZone { zone } => write!(f, "unknown time zone `{zone}`"),
            Self::Provider { zone, source } => {
                write!(f, "zone provider failed for `{zone}`: {source}")
            }
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnknownZone { .. } => None,
            Self::Provider { source, .. } => Some(source),
        }
    }
}
