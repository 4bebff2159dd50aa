//! The `tzsource` crate selects where time zone and country metadata comes
//! from.
//!
//! Data sources themselves live in [`tzsource_provider`]. This crate adds a
//! [`DataSourceRegistry`] that holds the active source and, when none has
//! been chosen, detects one: the time zone database bundled into the binary
//! if available, otherwise the first valid zoneinfo directory on the search
//! path.
//!
//! ```no_run
//! let source = tzsource::current_data_source().unwrap();
//! let paris = source.lookup_timezone("Europe/Paris").unwrap();
//! assert_eq!(paris.identifier(), "Europe/Paris");
//! assert!(source.valid_timezone_identifier("europe/paris").unwrap().is_none());
//! ```
//!
//! A registry can also be configured and used directly, which keeps tests
//! independent of the process wide one.
//!
//! ```no_run
//! use tzsource::{DataSourceKind, DataSourceRegistry, DetectionConfig};
//!
//! let registry = DataSourceRegistry::new(DetectionConfig::default().with_bundled(false));
//! registry
//!     .set_kind(DataSourceKind::Zoneinfo, &["/usr/share/zoneinfo"])
//!     .unwrap();
//! ```
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]

mod config;
mod kind;
mod registry;

use std::{
    path::Path,
    sync::{Arc, LazyLock},
};

pub use config::DetectionConfig;
pub use kind::DataSourceKind;
pub use registry::DataSourceRegistry;

#[doc(inline)]
pub use tzsource_provider::{
    CountryInfo, CountryTimezone, DataSource, DataSourceBackend, DataSourceError,
    DataSourceResult, Identifiers, Timezone, TimezoneInfo,
};

/// The process wide registry, configured from the environment on first use.
pub static DATA_SOURCE_REGISTRY: LazyLock<DataSourceRegistry> =
    LazyLock::new(|| DataSourceRegistry::new(DetectionConfig::from_env()));

/// Returns the process wide data source, detecting one on first use.
pub fn current_data_source() -> DataSourceResult<Arc<DataSource>> {
    DATA_SOURCE_REGISTRY.get()
}

/// Installs `source` as the process wide data source.
pub fn set_data_source(source: impl Into<Arc<DataSource>>) -> DataSourceResult<()> {
    DATA_SOURCE_REGISTRY.set(source)
}

/// Constructs a data source of `kind` and installs it process wide.
pub fn set_data_source_kind<P: AsRef<Path>>(
    kind: DataSourceKind,
    args: &[P],
) -> DataSourceResult<()> {
    DATA_SOURCE_REGISTRY.set_kind(kind, args)
}
