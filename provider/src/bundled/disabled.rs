use crate::{provider::DataSourceBackend, DataSourceError, DataSourceResult};

#[derive(Debug)]
pub struct BundledDataSource(());

impl BundledDataSource {
    pub fn new() -> DataSourceResult<Self> {
        Err(DataSourceError::RequiredDependencyMissing("jiff-tzdb"))
    }

    pub fn is_empty(&self) -> bool {
        true
    }
}

impl DataSourceBackend for BundledDataSource {
    fn name(&self) -> String {
        String::from("Bundled DataSource")
    }
}
