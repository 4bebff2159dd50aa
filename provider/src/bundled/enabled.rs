use std::{collections::BTreeSet, sync::Arc};

use crate::{
    index::{find_identifier, Identifiers},
    info::{CountryInfo, TimezoneData, TimezoneInfo},
    provider::DataSourceBackend,
    tzif::Tzif,
    DataSourceError, DataSourceResult,
};

/// Serves time zones from the compiled-in database.
///
/// The bundled database carries no country tables, so there are no
/// country codes and every country lookup fails. Backward compatible names
/// are stored as full copies of their target's data, which makes every
/// identifier a data identifier.
#[derive(Debug)]
pub struct BundledDataSource {
    identifiers: Identifiers,
}

impl BundledDataSource {
    pub fn new() -> DataSourceResult<Self> {
        let mut identifiers: Vec<Arc<str>> = jiff_tzdb::available().map(Arc::from).collect();
        identifiers.sort();
        identifiers.dedup();
        debug!(
            "bundled time zone database has {} identifiers",
            identifiers.len()
        );
        Ok(Self {
            identifiers: identifiers.into(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }
}

impl DataSourceBackend for BundledDataSource {
    fn name(&self) -> String {
        String::from("Bundled DataSource")
    }

    fn data_timezone_identifiers(&self) -> DataSourceResult<Identifiers> {
        Ok(Arc::clone(&self.identifiers))
    }

    fn linked_timezone_identifiers(&self) -> DataSourceResult<Identifiers> {
        Ok(Arc::from([]))
    }

    fn country_codes(&self) -> DataSourceResult<BTreeSet<String>> {
        Ok(BTreeSet::new())
    }

    fn load_timezone_info(&self, identifier: &str) -> DataSourceResult<TimezoneInfo> {
        // `jiff_tzdb::get` ignores case, lookups here must not.
        let unknown = || DataSourceError::UnknownTimezone(identifier.into());
        let identifier = find_identifier(&self.identifiers, identifier)
            .ok_or_else(unknown)?;
        let (_, data) = jiff_tzdb::get(&identifier).ok_or_else(unknown)?;
        let tzif = Tzif::from_bytes(data).map_err(|reason| {
            warn!("bundled data for {identifier} is invalid: {reason}");
            unknown()
        })?;
        Ok(TimezoneInfo::new(
            identifier,
            TimezoneData::Transitions(Box::new(tzif)),
        ))
    }

    fn load_country_info(&self, code: &str) -> DataSourceResult<CountryInfo> {
        Err(DataSourceError::UnknownCountry(code.into()))
    }
}
