//! A data source reading a system zoneinfo directory.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    index::{find_identifier, Identifiers},
    info::{CountryInfo, TimezoneData, TimezoneInfo},
    provider::DataSourceBackend,
    tzif::Tzif,
    DataSourceError, DataSourceResult, DirectoryDefect,
};

mod directory;
mod tab;

use directory::Tables;

/// The directories searched for zoneinfo data, in order.
pub const DEFAULT_SEARCH_PATH: &[&str] = &[
    "/usr/share/zoneinfo",
    "/usr/share/lib/zoneinfo",
    "/etc/zoneinfo",
];

/// Country tables tried when a searched directory lacks `iso3166.tab`.
pub const DEFAULT_ALTERNATE_ISO3166_TAB_SEARCH_PATH: &[&str] =
    &["/usr/share/misc/iso3166.tab", "/usr/share/misc/iso3166"];

/// Serves time zones and countries from a zoneinfo directory.
///
/// The directory must hold an `iso3166.tab` country table and either a
/// `zone1970.tab` or a `zone.tab` zone table. Identifiers and countries are
/// read when the source is constructed. TZif files are read on lookup.
pub struct ZoneinfoDataSource {
    dir: PathBuf,
    tables: Tables,
    data: Identifiers,
    linked: Identifiers,
    links: BTreeMap<Arc<str>, Arc<str>>,
    countries: BTreeMap<String, CountryInfo>,
}

impl ZoneinfoDataSource {
    /// Opens `dir`, failing with [`DataSourceError::InvalidDirectory`] when
    /// it is not a zoneinfo directory.
    ///
    /// `iso3166` overrides the location of the country table.
    pub fn from_dir(dir: impl AsRef<Path>, iso3166: Option<&Path>) -> DataSourceResult<Self> {
        let dir = dir.as_ref();
        let tables = directory::validate(dir, iso3166).map_err(|defect| {
            DataSourceError::InvalidDirectory {
                path: dir.to_path_buf(),
                defect,
            }
        })?;
        Self::load(dir, tables)
    }

    /// Opens the first valid directory in `search_path`.
    ///
    /// A candidate lacking only its country table is retried with the first
    /// existing file in `alternate_iso3166`. Fails with
    /// [`DataSourceError::DirectoryNotFound`] when no candidate is valid.
    pub fn search<P: AsRef<Path>, Q: AsRef<Path>>(
        search_path: &[P],
        alternate_iso3166: &[Q],
    ) -> DataSourceResult<Self> {
        let alternate = alternate_iso3166
            .iter()
            .map(|path| -> &Path { path.as_ref() })
            .find(|path| path.is_file());

        for dir in search_path.iter().map(|dir| -> &Path { dir.as_ref() }) {
            let tables = match directory::validate(dir, None) {
                Ok(tables) => tables,
                Err(DirectoryDefect::MissingTables(_)) if alternate.is_some() => {
                    match directory::validate(dir, alternate) {
                        Ok(tables) => tables,
                        Err(defect) => {
                            debug!("skipping {}: {defect}", dir.display());
                            continue;
                        }
                    }
                }
                Err(defect) => {
                    debug!("skipping {}: {defect}", dir.display());
                    continue;
                }
            };
            debug!("using zoneinfo directory {}", dir.display());
            return Self::load(dir, tables);
        }

        Err(DataSourceError::DirectoryNotFound {
            searched: search_path
                .iter()
                .map(|dir| dir.as_ref().to_path_buf())
                .collect(),
        })
    }

    fn load(dir: &Path, tables: Tables) -> DataSourceResult<Self> {
        let listing = directory::walk(dir)?;
        let countries = tab::read_countries(&tables.iso3166, &tables.zone)?;
        let links: BTreeMap<_, _> = listing.links.into_iter().collect();
        let linked = links.keys().cloned().collect();

        Ok(Self {
            dir: dir.to_path_buf(),
            tables,
            data: listing.data.into(),
            linked,
            links,
            countries,
        })
    }

    /// The country table in use.
    pub fn iso3166_tab_path(&self) -> &Path {
        &self.tables.iso3166
    }

    /// The zone table in use: `zone1970.tab` or `zone.tab`.
    pub fn zone_tab_path(&self) -> &Path {
        &self.tables.zone
    }
}

impl DataSourceBackend for ZoneinfoDataSource {
    fn name(&self) -> String {
        format!("Zoneinfo DataSource: {}", self.dir.display())
    }

    fn zoneinfo_dir(&self) -> Option<&Path> {
        Some(&self.dir)
    }

    fn data_timezone_identifiers(&self) -> DataSourceResult<Identifiers> {
        Ok(Arc::clone(&self.data))
    }

    fn linked_timezone_identifiers(&self) -> DataSourceResult<Identifiers> {
        Ok(Arc::clone(&self.linked))
    }

    fn country_codes(&self) -> DataSourceResult<BTreeSet<String>> {
        Ok(self.countries.keys().cloned().collect())
    }

    fn load_timezone_info(&self, identifier: &str) -> DataSourceResult<TimezoneInfo> {
        if let Some((identifier, target)) = self.links.get_key_value(identifier) {
            return Ok(TimezoneInfo::linked(
                Arc::clone(identifier),
                Arc::clone(target),
            ));
        }

        // Only listed identifiers are joined onto the directory.
        let unknown = || DataSourceError::UnknownTimezone(identifier.into());
        let identifier = find_identifier(&self.data, identifier)
            .ok_or_else(unknown)?;
        let path = self.dir.join(&*identifier);
        let tzif = Tzif::from_path(&path).map_err(|reason| {
            warn!("failed to load {}: {reason}", path.display());
            unknown()
        })?;
        Ok(TimezoneInfo::new(
            identifier,
            TimezoneData::Transitions(Box::new(tzif)),
        ))
    }

    fn load_country_info(&self, code: &str) -> DataSourceResult<CountryInfo> {
        self.countries
            .get(code)
            .cloned()
            .ok_or_else(|| DataSourceError::UnknownCountry(code.into()))
    }
}

impl fmt::Debug for ZoneinfoDataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoneinfoDataSource")
            .field("dir", &self.dir)
            .field("iso3166", &self.tables.iso3166)
            .field("zone", &self.tables.zone)
            .field("data", &self.data.len())
            .field("linked", &self.linked.len())
            .field("countries", &self.countries.len())
            .finish()
    }
}
