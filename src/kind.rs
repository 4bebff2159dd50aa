//! Selecting a data source backend by name.

use core::{fmt, str::FromStr};
use std::path::Path;

use tzsource_provider::{
    BundledDataSource, DataSource, DataSourceError, DataSourceResult, ZoneinfoDataSource,
};

use crate::DetectionConfig;

/// The backends a data source can be constructed from by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSourceKind {
    /// The database compiled into the binary. Takes no arguments.
    Bundled,
    /// A zoneinfo directory.
    ///
    /// Takes no arguments to search the configured search path, a directory,
    /// or a directory followed by the country table to use with it.
    Zoneinfo,
}

impl DataSourceKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bundled => "bundled",
            Self::Zoneinfo => "zoneinfo",
        }
    }

    /// Constructs the backend for this kind.
    ///
    /// The argument count is checked before anything is read.
    pub fn create<P: AsRef<Path>>(
        self,
        args: &[P],
        config: &DetectionConfig,
    ) -> DataSourceResult<DataSource> {
        match (self, args) {
            (Self::Bundled, []) => BundledDataSource::new().map(DataSource::new),
            (Self::Zoneinfo, []) => ZoneinfoDataSource::search(
                &config.search_path,
                &config.alternate_iso3166_tab_search_path,
            )
            .map(DataSource::new),
            (Self::Zoneinfo, [dir]) => ZoneinfoDataSource::from_dir(dir, None).map(DataSource::new),
            (Self::Zoneinfo, [dir, iso3166]) => {
                ZoneinfoDataSource::from_dir(dir, Some(iso3166.as_ref()))
                    .map(DataSource::new)
            }
            (kind, args) => Err(DataSourceError::Config(format!(
                "wrong number of arguments for {kind} (given {}, expected {})",
                args.len(),
                kind.expected_arguments()
            ))),
        }
    }

    const fn expected_arguments(self) -> &'static str {
        match self {
            Self::Bundled => "0",
            Self::Zoneinfo => "0..2",
        }
    }
}

impl fmt::Display for DataSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSourceKind {
    type Err = DataSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bundled" => Ok(Self::Bundled),
            "zoneinfo" => Ok(Self::Zoneinfo),
            _ => Err(DataSourceError::Config(format!(
                "data source must be \"bundled\" or \"zoneinfo\", got {s:?}"
            ))),
        }
    }
}
