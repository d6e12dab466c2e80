use crate::ZoneProviderError;

/// Seconds between the Unix epoch and 2000-01-01T00:00:00Z.
pub const SECONDS_FROM_UNIX_TO_CUSTOM_EPOCH: i64 = 946_684_800;

/// Seconds per day constant: 86_400
pub const SECONDS_PER_DAY: i64 = 86_400;

/// An exact instant, as whole seconds since 1970-01-01T00:00:00Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct EpochSeconds(pub i64);

impl From<i64> for EpochSeconds {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl EpochSeconds {
    pub fn checked_add_seconds(self, seconds: i64) -> Result<Self, ZoneProviderError> {
        self.0
            .checked_add(seconds)
            .map(Self)
            .ok_or(ZoneProviderError::InstantOutOfRange)
    }

    /// Seconds since 2000-01-01T00:00:00Z.
    #[inline]
    #[must_use]
    pub fn to_custom_epoch(self) -> i64 {
        self.0 - SECONDS_FROM_UNIX_TO_CUSTOM_EPOCH
    }

    /// The inverse of [`EpochSeconds::to_custom_epoch`].
    #[inline]
    #[must_use]
    pub fn from_custom_epoch(seconds: i64) -> Self {
        Self(seconds + SECONDS_FROM_UNIX_TO_CUSTOM_EPOCH)
    }
}

#[cfg(test)]
mod tests {
    use super::EpochSeconds;

    #[test]
    fn custom_epoch_offset() {
        assert_eq!(EpochSeconds(946_684_800).to_custom_epoch(), 0);
        assert_eq!(EpochSeconds(0).to_custom_epoch(), -946_684_800);
        assert_eq!(EpochSeconds::from_custom_epoch(60), EpochSeconds(946_684_860));
    }

    #[test]
    fn overflow_is_an_error() {
        assert!(EpochSeconds(i64::MAX).checked_add_seconds(1).is_err());
        assert_eq!(
            EpochSeconds(100).checked_add_seconds(-60),
            Ok(EpochSeconds(40))
        );
    }
}
