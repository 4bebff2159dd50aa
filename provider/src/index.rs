//! The sorted time zone identifier index and the membership test built on it.

use std::sync::{Arc, OnceLock};

use crate::DataSourceResult;

/// An immutable, sorted sequence of identifiers.
///
/// Identifiers are shared `Arc<str>` values, so the instance stored in an
/// index can be handed out and later compared with [`Arc::ptr_eq`].
pub type Identifiers = Arc<[Arc<str>]>;

/// Combines data and linked identifiers into one sorted sequence.
///
/// When there are no linked identifiers the data sequence itself is
/// returned. It must already be sorted.
pub(crate) fn merge_identifiers(data: &Identifiers, linked: &Identifiers) -> Identifiers {
    debug_assert!(is_sorted(data), "data identifiers must be sorted");
    if linked.is_empty() {
        return Arc::clone(data);
    }
    let mut merged = Vec::with_capacity(data.len() + linked.len());
    merged.extend(data.iter().cloned());
    merged.extend(linked.iter().cloned());
    merged.sort();
    merged.into()
}

/// Binary searches `sorted` for `candidate`, returning the stored instance.
pub fn find_identifier(sorted: &[Arc<str>], candidate: &str) -> Option<Arc<str>> {
    sorted
        .binary_search_by(|probe| (**probe).cmp(candidate))
        .ok()
        .and_then(|idx| sorted.get(idx))
        .cloned()
}

/// Checks an arbitrary candidate against a sorted identifier sequence.
///
/// Bytes that are not UTF-8 can never name a time zone and are reported as
/// absent, the same as an unknown identifier.
pub fn valid_identifier(sorted: &[Arc<str>], candidate: &[u8]) -> Option<Arc<str>> {
    let candidate = core::str::from_utf8(candidate).ok()?;
    find_identifier(sorted, candidate)
}

fn is_sorted(identifiers: &[Arc<str>]) -> bool {
    identifiers
        .windows(2)
        .all(|pair| matches!(pair, [a, b] if a <= b))
}

/// Per data source cache of the identifier sequences.
///
/// Each sequence is produced at most once on a single thread. Racing first
/// calls may both run the producer; the first stored value wins and is the
/// one every caller receives.
#[derive(Debug, Default)]
pub(crate) struct IdentifierIndex {
    data: OnceLock<Identifiers>,
    linked: OnceLock<Identifiers>,
    all: OnceLock<Identifiers>,
}

impl IdentifierIndex {
    pub(crate) fn data(
        &self,
        produce: impl FnOnce() -> DataSourceResult<Identifiers>,
    ) -> DataSourceResult<Identifiers> {
        get_or_try_init(&self.data, produce)
    }

    pub(crate) fn linked(
        &self,
        produce: impl FnOnce() -> DataSourceResult<Identifiers>,
    ) -> DataSourceResult<Identifiers> {
        get_or_try_init(&self.linked, produce)
    }

    pub(crate) fn all(
        &self,
        data: impl FnOnce() -> DataSourceResult<Identifiers>,
        linked: impl FnOnce() -> DataSourceResult<Identifiers>,
    ) -> DataSourceResult<Identifiers> {
        get_or_try_init(&self.all, || {
            let data = self.data(data)?;
            let linked = self.linked(linked)?;
            Ok(merge_identifiers(&data, &linked))
        })
    }
}

pub(crate) fn get_or_try_init<T: Clone>(
    cell: &OnceLock<T>,
    init: impl FnOnce() -> DataSourceResult<T>,
) -> DataSourceResult<T> {
    if let Some(value) = cell.get() {
        return Ok(value.clone());
    }
    let value = init()?;
    Ok(cell.get_or_init(|| value).clone())
}
