//! A data source backed by the time zone database compiled into the binary.
//!
//! The data comes from `jiff-tzdb` when the `bundled` feature is enabled.
//! Without it, [`BundledDataSource::new`] reports the missing dependency.

pub use self::inner::*;

#[cfg(not(feature = "bundled"))]
#[path = "disabled.rs"]
mod inner;
#[cfg(feature = "bundled")]
#[path = "enabled.rs"]
mod inner;
