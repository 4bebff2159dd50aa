//! The registry holding the active data source.

use std::{
    path::Path,
    sync::{Arc, RwLock},
};

use tzsource_provider::{
    BundledDataSource, DataSource, DataSourceError, DataSourceResult, ZoneinfoDataSource,
};

use crate::{DataSourceKind, DetectionConfig};

/// Holds the active [`DataSource`].
///
/// A data source is either installed explicitly with one of the `set`
/// methods or detected on the first call to [`get`][Self::get]. Detection
/// runs at most once: concurrent first calls wait for it and all receive
/// the same instance.
///
/// Installing replaces the active source atomically. A failed `set` leaves
/// the previous source in place.
#[derive(Debug)]
pub struct DataSourceRegistry {
    current: RwLock<Option<Arc<DataSource>>>,
    config: DetectionConfig,
}

impl Default for DataSourceRegistry {
    fn default() -> Self {
        Self::new(DetectionConfig::default())
    }
}

impl DataSourceRegistry {
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            current: RwLock::new(None),
            config,
        }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Returns the active data source, detecting one if none is set.
    ///
    /// Fails with [`DataSourceError::DataSourceNotFound`] when nothing is set
    /// and no data can be found. A failed detection is not remembered; the
    /// next call detects again.
    pub fn get(&self) -> DataSourceResult<Arc<DataSource>> {
        self.get_or_detect(|| self.detect())
    }

    /// Returns the active data source, installing the result of `detect`
    /// if none is set. `detect` runs while the write lock is held.
    fn get_or_detect(
        &self,
        detect: impl FnOnce() -> DataSourceResult<DataSource>,
    ) -> DataSourceResult<Arc<DataSource>> {
        if let Some(current) = self.read()? {
            return Ok(current);
        }

        let mut current = self
            .current
            .write()
            .map_err(|_| DataSourceError::poisoned())?;
        if let Some(current) = current.as_ref() {
            return Ok(Arc::clone(current));
        }
        let detected = Arc::new(detect()?);
        *current = Some(Arc::clone(&detected));
        Ok(detected)
    }

    /// Returns the active data source without detecting one.
    pub fn get_if_set(&self) -> DataSourceResult<Option<Arc<DataSource>>> {
        self.read()
    }

    /// Installs `source` as the active data source.
    pub fn set(&self, source: impl Into<Arc<DataSource>>) -> DataSourceResult<()> {
        let source = source.into();
        #[cfg(feature = "log")]
        log::debug!("installing data source: {source}");
        *self
            .current
            .write()
            .map_err(|_| DataSourceError::poisoned())? = Some(source);
        Ok(())
    }

    /// Constructs a data source of `kind` from `args` and installs it.
    ///
    /// See [`DataSourceKind::create`] for the accepted arguments.
    pub fn set_kind<P: AsRef<Path>>(
        &self,
        kind: DataSourceKind,
        args: &[P],
    ) -> DataSourceResult<()> {
        let source = kind.create(args, &self.config)?;
        self.set(source)
    }

    /// Like [`set_kind`][Self::set_kind], with the kind given by name.
    pub fn set_named<P: AsRef<Path>>(&self, kind: &str, args: &[P]) -> DataSourceResult<()> {
        self.set_kind(kind.parse()?, args)
    }

    /// Forgets the active data source. The next [`get`][Self::get] detects
    /// again.
    pub fn reset(&self) -> DataSourceResult<()> {
        *self
            .current
            .write()
            .map_err(|_| DataSourceError::poisoned())? = None;
        Ok(())
    }

    /// Constructs the data source that [`get`][Self::get] would install,
    /// without installing it.
    ///
    /// The bundled database is used when it is enabled and not empty.
    /// Otherwise the search path is searched for a zoneinfo directory.
    pub fn detect(&self) -> DataSourceResult<DataSource> {
        let bundled = self
            .config
            .use_bundled
            .then(|| BundledDataSource::new().map(DataSource::new));
        self.detect_with(bundled)
    }

    /// Picks between `bundled`, the outcome of trying the bundled database,
    /// and a search of the configured search path.
    fn detect_with(
        &self,
        bundled: Option<DataSourceResult<DataSource>>,
    ) -> DataSourceResult<DataSource> {
        match bundled {
            Some(Ok(source)) if has_data(&source) => {
                #[cfg(feature = "log")]
                log::debug!("detected {source}");
                return Ok(source);
            }
            Some(Ok(_source)) => {
                #[cfg(feature = "log")]
                log::debug!("{_source} has no time zones");
            }
            Some(Err(_err)) => {
                #[cfg(feature = "log")]
                log::debug!("bundled time zone database unavailable: {_err}");
            }
            None => {}
        }

        match ZoneinfoDataSource::search(
            &self.config.search_path,
            &self.config.alternate_iso3166_tab_search_path,
        ) {
            Ok(zoneinfo) => {
                let source = DataSource::new(zoneinfo);
                #[cfg(feature = "log")]
                log::debug!("detected {source}");
                Ok(source)
            }
            Err(DataSourceError::DirectoryNotFound { .. }) => {
                #[cfg(feature = "log")]
                log::warn!("no source of time zone data found");
                Err(DataSourceError::DataSourceNotFound)
            }
            Err(err) => Err(err),
        }
    }

    fn read(&self) -> DataSourceResult<Option<Arc<DataSource>>> {
        Ok(self
            .current
            .read()
            .map_err(|_| DataSourceError::poisoned())?
            .clone())
    }
}

fn has_data(source: &DataSource) -> bool {
    source
        .data_timezone_identifiers()
        .is_ok_and(|identifiers| !identifiers.is_empty())
}
