use alloc::string::String;
use core::fmt;

/// An error returned while resolving time zone data.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ZoneProviderError {
    /// The provider has no data for the requested zone identifier.
    UnknownZone(String),
    /// The instant falls outside the range covered by the zone's rules.
    InstantOutOfRange,
    /// The zone data violated an internal invariant.
    Assert(&'static str),
    /// A value was outside of its valid range.
    Range(&'static str),
    /// Zone data could not be read from its source.
    Io(String),
}

impl fmt::Display for ZoneProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownZone(zone) => write!(f, "unknown time zone identifier `{zone}`"),
            Self::InstantOutOfRange => f.write_str("instant is outside the range of the zone data"),
            Self::Assert(message) => write!(f, "zone data assertion failed: {message}"),
            Self::Range(message) => write!(f, "range error: {message}"),
            Self::Io(message) => write!(f, "failed to read zone data: {message}"),
        }
    }
}

impl std::error::Error for ZoneProviderError {}
