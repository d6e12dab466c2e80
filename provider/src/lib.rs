//! Zone interval providers.
//!
//! This crate answers the three questions a validation data generator asks
//! of a time zone database:
//!
//!  - Which zone intervals overlap a span of instants?
//!  - Which zone interval contains an instant?
//!  - Which instant does a wall clock value leniently resolve to?
//!
//! The [`ZoneProvider`] trait is the seam between data and consumers. With
//! the `tzif` feature enabled, [`CompiledTzdbProvider`] and
//! [`FsTzdbProvider`] implement it over IANA `TZif` data.

#![cfg_attr(not(test), warn(clippy::unwrap_used, clippy::expect_used))]

extern crate alloc;

mod epoch_seconds;
mod error;
mod memory;
mod rules;

pub mod provider;
pub mod utils;

#[cfg(feature = "tzif")]
pub mod tzdb;
#[cfg(feature = "tzif")]
pub mod tzif;

pub use epoch_seconds::{EpochSeconds, SECONDS_FROM_UNIX_TO_CUSTOM_EPOCH, SECONDS_PER_DAY};
pub use error::ZoneProviderError;
pub use memory::InMemoryProvider;
pub use provider::{
    IsoDateTime, LocalTimeType, UtcOffsetSeconds, ZoneInterval, ZoneProvider, ZoneProviderResult,
};
pub use rules::{Transition, ZoneRules};

#[cfg(feature = "tzif")]
pub use tzdb::{CompiledTzdb, CompiledTzdbProvider, FsTzdb, FsTzdbProvider, TzdbProvider};
#[cfg(feature = "tzif")]
pub use tzif::DEFAULT_HORIZON_YEAR;
