//! Data sources for time zone and country metadata
//!
//! A data source answers four questions: which time zones exist, which
//! countries exist, what is known about a given time zone, and what is known
//! about a given country. This crate splits that into two layers.
//!
//! The lower layer is the [`DataSourceBackend`][crate::provider::DataSourceBackend]
//! trait. A backend enumerates identifiers and country codes and loads
//! individual records. It does no caching of its own.
//!
//! The upper layer is [`DataSource`][crate::provider::DataSource], which wraps
//! a backend and provides the operations consumers use:
//!
//! - `lookup_timezone` and `lookup_country` load a record once per key and
//!   hand out the same shared record afterwards.
//! - `timezone_identifiers` merges data and linked identifiers into one
//!   sorted sequence, computed once.
//! - `valid_timezone_identifier` checks a candidate against that sequence
//!   and returns the stored instance.
//!
//! ## Available backends
//!
//! - `BundledDataSource`: the time zone database compiled into the binary
//!   (enable with the `bundled` feature flag). It carries no country data.
//! - `ZoneinfoDataSource`: a zoneinfo directory on the host file system,
//!   such as `/usr/share/zoneinfo`, including its country tables.
//!
//! Choosing between them at runtime is left to the `tzsource` crate.

#![cfg_attr(
    not(test),
    warn(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)
)]

#[macro_use]
mod logging;

mod cache;
mod error;
pub mod index;
pub mod info;
pub mod provider;
pub mod tzif;

pub mod bundled;
pub mod zoneinfo;

pub use error::{DataSourceError, DataSourceResult, DirectoryDefect};
pub use index::Identifiers;
pub use info::{CountryInfo, CountryTimezone, Record, Timezone, TimezoneData, TimezoneInfo};
pub use provider::{DataSource, DataSourceBackend, NeverBackend};

pub use bundled::BundledDataSource;
pub use zoneinfo::{
    ZoneinfoDataSource, DEFAULT_ALTERNATE_ISO3166_TAB_SEARCH_PATH, DEFAULT_SEARCH_PATH,
};
