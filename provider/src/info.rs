//! The metadata records a data source loads for one time zone or one country.

use std::sync::Arc;

use crate::tzif::Tzif;

/// The capability shared by every record: an immutable identifying key.
pub trait Record {
    fn key(&self) -> &str;
}

/// What a data source knows about a time zone.
#[derive(Debug)]
pub enum TimezoneData {
    /// Transition data read from a TZif file.
    Transitions(Box<Tzif>),
    /// An alias of another identifier.
    Linked { link_to_identifier: Arc<str> },
}

/// A time zone as defined by a data source.
#[derive(Debug)]
pub struct TimezoneInfo {
    identifier: Arc<str>,
    data: TimezoneData,
}

impl TimezoneInfo {
    pub fn new(identifier: impl Into<Arc<str>>, data: TimezoneData) -> Self {
        Self {
            identifier: identifier.into(),
            data,
        }
    }

    pub fn linked(
        identifier: impl Into<Arc<str>>,
        link_to_identifier: impl Into<Arc<str>>,
    ) -> Self {
        Self::new(
            identifier,
            TimezoneData::Linked {
                link_to_identifier: link_to_identifier.into(),
            },
        )
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn data(&self) -> &TimezoneData {
        &self.data
    }

    /// Builds the time zone value for this record.
    pub fn create_timezone(self: &Arc<Self>) -> Timezone {
        Timezone {
            info: Arc::clone(self),
        }
    }
}

impl Record for TimezoneInfo {
    fn key(&self) -> &str {
        &self.identifier
    }
}

/// A time zone handle sharing the record it was created from.
#[derive(Debug, Clone)]
pub struct Timezone {
    info: Arc<TimezoneInfo>,
}

impl Timezone {
    pub fn identifier(&self) -> &str {
        self.info.identifier()
    }

    /// The identifier holding the data: the link target for linked zones.
    pub fn canonical_identifier(&self) -> &str {
        match &self.info.data {
            TimezoneData::Linked { link_to_identifier } => &**link_to_identifier,
            TimezoneData::Transitions(_) => self.info.identifier(),
        }
    }

    pub fn is_linked(&self) -> bool {
        matches!(self.info.data, TimezoneData::Linked { .. })
    }

    pub fn tzif(&self) -> Option<&Tzif> {
        match &self.info.data {
            TimezoneData::Transitions(tzif) => Some(&**tzif),
            TimezoneData::Linked { .. } => None,
        }
    }

    pub fn info(&self) -> &Arc<TimezoneInfo> {
        &self.info
    }
}

impl PartialEq for Timezone {
    fn eq(&self, other: &Self) -> bool {
        self.identifier() == other.identifier()
    }
}

impl Eq for Timezone {}

/// A time zone observed in a country, as listed by a zone table.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryTimezone {
    pub identifier: Arc<str>,
    /// Degrees north of the equator.
    pub latitude: f64,
    /// Degrees east of the prime meridian.
    pub longitude: f64,
    pub description: Option<String>,
}

/// A country as defined by a data source.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryInfo {
    code: Arc<str>,
    name: String,
    zones: Vec<CountryTimezone>,
}

impl CountryInfo {
    pub fn new(
        code: impl Into<Arc<str>>,
        name: impl Into<String>,
        zones: Vec<CountryTimezone>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            zones,
        }
    }

    /// The ISO 3166-1 alpha-2 code.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn zones(&self) -> &[CountryTimezone] {
        &self.zones
    }

    pub fn zone_identifiers(&self) -> impl Iterator<Item = &str> {
        self.zones.iter().map(|zone| &*zone.identifier)
    }
}

impl Record for CountryInfo {
    fn key(&self) -> &str {
        &self.code
    }
}
