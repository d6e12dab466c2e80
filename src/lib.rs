//! The `tzvalidation` crate generates reference validation datasets for
//! time zone conversion libraries.
//!
//! For each requested zone and a half open year range, it probes the
//! instants around every offset transition plus a fixed set of calendar
//! samples, and records what a correct conversion returns for each one.
//!
//! ```rust
//! use tzvalidation::{generate_dataset, GeneratorConfig};
//! use zone_provider::{InMemoryProvider, LocalTimeType, ZoneRules};
//!
//! let utc = ZoneRules::fixed(LocalTimeType::new(0, false, "UTC"));
//! let provider = InMemoryProvider::new("2024a").with_zone("Etc/UTC", utc);
//!
//! let config = GeneratorConfig::default().with_years(2000, 2001);
//! let dataset = generate_dataset(&provider, &["Etc/UTC"], &config).unwrap();
//! assert_eq!(dataset.test_data["Etc/UTC"].items.len(), 13);
//! ```
#![cfg_attr(not(test), warn(clippy::unwrap_used, clippy::expect_used))]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod config;
pub mod dataset;
pub mod error;
pub mod item;
pub mod merge;
pub mod sampler;
pub mod scanner;
pub mod zones;

#[doc(inline)]
pub use error::DatasetError;

/// The dataset generation result type
pub type DatasetResult<T> = Result<T, DatasetError>;

pub use config::GeneratorConfig;
pub use dataset::{generate_dataset, generate_zone, Dataset, ZoneDataset};
pub use item::{build_item, Probe, TestItem, TestItemKind};
pub use merge::ItemMerger;
pub use scanner::ScanRange;
pub use zones::read_zone_identifiers;
