//! The `DataSourceBackend` trait and the cached `DataSource` built on it.

use core::fmt;
use std::{
    collections::BTreeSet,
    path::Path,
    sync::{Arc, OnceLock},
};

use crate::{
    cache::LookupCache,
    index::{self, IdentifierIndex, Identifiers},
    info::{CountryInfo, TimezoneInfo},
    DataSourceError, DataSourceResult,
};

/// The capabilities a concrete source of time zone data provides.
///
/// Every method has a default that fails with
/// [`DataSourceError::NotImplemented`], so a backend only overrides what it
/// supports. Consumers should go through [`DataSource`], which caches the
/// results of these calls.
pub trait DataSourceBackend: fmt::Debug + Send + Sync {
    /// A human readable description used in diagnostics.
    fn name(&self) -> String {
        String::from("Default DataSource")
    }

    /// The directory data is read from, for file based backends.
    fn zoneinfo_dir(&self) -> Option<&Path> {
        None
    }

    /// Identifiers that have their own data, sorted and without duplicates.
    fn data_timezone_identifiers(&self) -> DataSourceResult<Identifiers> {
        Err(DataSourceError::NotImplemented("data_timezone_identifiers"))
    }

    /// Identifiers that alias another identifier, sorted, without
    /// duplicates and disjoint from the data identifiers.
    fn linked_timezone_identifiers(&self) -> DataSourceResult<Identifiers> {
        Err(DataSourceError::NotImplemented("linked_timezone_identifiers"))
    }

    fn country_codes(&self) -> DataSourceResult<BTreeSet<String>> {
        Err(DataSourceError::NotImplemented("country_codes"))
    }

    /// Loads the record for exactly `identifier`, failing with
    /// [`DataSourceError::UnknownTimezone`] when there is none.
    fn load_timezone_info(&self, identifier: &str) -> DataSourceResult<TimezoneInfo> {
        let _ = identifier;
        Err(DataSourceError::NotImplemented("load_timezone_info"))
    }

    /// Loads the record for exactly `code`, failing with
    /// [`DataSourceError::UnknownCountry`] when there is none.
    fn load_country_info(&self, code: &str) -> DataSourceResult<CountryInfo> {
        let _ = code;
        Err(DataSourceError::NotImplemented("load_country_info"))
    }
}

/// A backend that provides nothing. Every capability is not implemented.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverBackend;

impl DataSourceBackend for NeverBackend {}

/// A data source: a backend plus the caches shared by every caller.
///
/// Records are loaded once per key and shared as `Arc`s. Identifier
/// sequences and country codes are enumerated once and then frozen.
pub struct DataSource {
    backend: Box<dyn DataSourceBackend>,
    timezones: LookupCache<TimezoneInfo>,
    countries: LookupCache<CountryInfo>,
    identifiers: IdentifierIndex,
    country_codes: OnceLock<Arc<BTreeSet<String>>>,
}

impl DataSource {
    pub fn new(backend: impl DataSourceBackend + 'static) -> Self {
        Self::from_boxed(Box::new(backend))
    }

    pub fn from_boxed(backend: Box<dyn DataSourceBackend>) -> Self {
        Self {
            backend,
            timezones: LookupCache::default(),
            countries: LookupCache::default(),
            identifiers: IdentifierIndex::default(),
            country_codes: OnceLock::new(),
        }
    }

    pub fn backend(&self) -> &dyn DataSourceBackend {
        &*self.backend
    }

    pub fn name(&self) -> String {
        self.backend.name()
    }

    pub fn zoneinfo_dir(&self) -> Option<&Path> {
        self.backend.zoneinfo_dir()
    }

    /// Returns the record for `identifier`, loading it on first use.
    pub fn lookup_timezone(&self, identifier: &str) -> DataSourceResult<Arc<TimezoneInfo>> {
        self.timezones.get_or_load(identifier, |identifier| {
            self.backend.load_timezone_info(identifier)
        })
    }

    /// Returns the record for `code`, loading it on first use.
    pub fn lookup_country(&self, code: &str) -> DataSourceResult<Arc<CountryInfo>> {
        self.countries
            .get_or_load(code, |code| self.backend.load_country_info(code))
    }

    pub fn data_timezone_identifiers(&self) -> DataSourceResult<Identifiers> {
        self.identifiers
            .data(|| self.backend.data_timezone_identifiers())
    }

    pub fn linked_timezone_identifiers(&self) -> DataSourceResult<Identifiers> {
        self.identifiers
            .linked(|| self.backend.linked_timezone_identifiers())
    }

    /// All supported identifiers, data and linked, in sorted order.
    ///
    /// When the backend has no linked identifiers this is the data
    /// identifier sequence itself. Every call returns the same sequence.
    pub fn timezone_identifiers(&self) -> DataSourceResult<Identifiers> {
        self.identifiers.all(
            || self.backend.data_timezone_identifiers(),
            || self.backend.linked_timezone_identifiers(),
        )
    }

    /// Returns the stored instance of `candidate` if it is a supported
    /// identifier.
    ///
    /// The match is exact and case sensitive. Candidates that are not UTF-8
    /// are never valid.
    pub fn valid_timezone_identifier(
        &self,
        candidate: impl AsRef<[u8]>,
    ) -> DataSourceResult<Option<Arc<str>>> {
        let identifiers = self.timezone_identifiers()?;
        Ok(index::valid_identifier(&identifiers, candidate.as_ref()))
    }

    pub fn country_codes(&self) -> DataSourceResult<Arc<BTreeSet<String>>> {
        index::get_or_try_init(&self.country_codes, || {
            self.backend.country_codes().map(Arc::new)
        })
    }
}

impl fmt::Debug for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSource")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
