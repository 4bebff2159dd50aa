//! Memoizing record lookup keyed by the caller's exact string.

use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use crate::{DataSourceError, DataSourceResult};

/// A cache that loads each key's record at most once and shares it.
///
/// Keys are stored exactly as given: no case folding, no trimming. Failed
/// loads are not cached, so a later lookup of the same key loads again.
///
/// Loading happens outside the lock. Two threads missing the same key at
/// the same time may both load it; the first insert wins and both receive
/// that instance.
#[derive(Debug)]
pub(crate) struct LookupCache<V> {
    entries: RwLock<BTreeMap<String, Arc<V>>>,
}

impl<V> Default for LookupCache<V> {
    fn default() -> Self {
        Self {
            entries: RwLock::default(),
        }
    }
}

impl<V> LookupCache<V> {
    pub(crate) fn get_or_load(
        &self,
        key: &str,
        load: impl FnOnce(&str) -> DataSourceResult<V>,
    ) -> DataSourceResult<Arc<V>> {
        if let Some(value) = self
            .entries
            .read()
            .map_err(|_| DataSourceError::poisoned())?
            .get(key)
        {
            return Ok(Arc::clone(value));
        }

        trace!("cache miss for {key:?}");
        let loaded = load(key)?;

        let mut entries = self
            .entries
            .write()
            .map_err(|_| DataSourceError::poisoned())?;
        Ok(Arc::clone(
            entries
                .entry(key.into())
                .or_insert_with(|| Arc::new(loaded)),
        ))
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.read().map_or(0, |entries| entries.len())
    }
}
