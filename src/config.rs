//! Runtime configuration for data source detection.

use std::{env, path::PathBuf};

use tzsource_provider::{DEFAULT_ALTERNATE_ISO3166_TAB_SEARCH_PATH, DEFAULT_SEARCH_PATH};

/// Where and how a [`DataSourceRegistry`][crate::DataSourceRegistry] looks
/// for time zone data when none has been set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionConfig {
    /// Candidate zoneinfo directories, tried in order.
    pub search_path: Vec<PathBuf>,
    /// Country tables used for a candidate directory without its own
    /// `iso3166.tab`. The first existing file is used.
    pub alternate_iso3166_tab_search_path: Vec<PathBuf>,
    /// Whether the bundled database is tried before the search path.
    ///
    /// Builds without the `bundled` feature skip it either way.
    pub use_bundled: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            search_path: DEFAULT_SEARCH_PATH.iter().map(PathBuf::from).collect(),
            alternate_iso3166_tab_search_path: DEFAULT_ALTERNATE_ISO3166_TAB_SEARCH_PATH
                .iter()
                .map(PathBuf::from)
                .collect(),
            use_bundled: true,
        }
    }
}

impl DetectionConfig {
    /// The default configuration, with the directory named by `TZDIR`
    /// searched first when it is set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(tzdir) = env::var_os("TZDIR").filter(|dir| !dir.is_empty()) {
            #[cfg(feature = "log")]
            log::debug!("searching TZDIR={} first", PathBuf::from(&tzdir).display());
            config.search_path.insert(0, PathBuf::from(tzdir));
        }
        config
    }

    pub fn with_search_path<I, P>(mut self, search_path: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_path = search_path.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_alternate_iso3166_tab_search_path<I, P>(mut self, search_path: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.alternate_iso3166_tab_search_path = search_path.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_bundled(mut self, use_bundled: bool) -> Self {
        self.use_bundled = use_bundled;
        self
    }
}
