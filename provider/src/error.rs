//! The error type shared by every data source.

use core::fmt;
use std::{io, path::PathBuf};

/// The `tzsource_provider` result type
pub type DataSourceResult<T> = Result<T, DataSourceError>;

/// Why a directory was rejected as a zoneinfo directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryDefect {
    /// The path does not exist or is not a directory.
    NotADirectory,
    /// The directory exists but the listed tables could not be found.
    MissingTables(Vec<String>),
}

/// Errors returned by data sources and the registry.
#[derive(Debug)]
#[non_exhaustive]
pub enum DataSourceError {
    /// The data source has no time zone with this exact identifier.
    UnknownTimezone(String),
    /// The data source has no country with this exact code.
    UnknownCountry(String),
    /// A data source capability was invoked on a backend that does not
    /// provide it.
    NotImplemented(&'static str),
    /// A data source was selected with an unknown kind or the wrong
    /// arguments.
    Config(String),
    /// The data a backend depends on is not available in this build.
    RequiredDependencyMissing(&'static str),
    /// An explicitly selected zoneinfo directory failed validation.
    InvalidDirectory {
        path: PathBuf,
        defect: DirectoryDefect,
    },
    /// None of the search path candidates is a valid zoneinfo directory.
    DirectoryNotFound {
        searched: Vec<PathBuf>,
    },
    /// No data source was configured and none could be detected.
    DataSourceNotFound,
    /// A zoneinfo table file has malformed content.
    InvalidZoneinfoFile {
        path: PathBuf,
        reason: String,
    },
    /// Reading a table file or directory failed.
    Io {
        path: PathBuf,
        source: io::Error,
    },
    /// An internal invariant was violated, such as a poisoned lock.
    Assert(&'static str),
}

impl DataSourceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_file(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidZoneinfoFile {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// The error for a lock poisoned by a panicking writer.
    pub const fn poisoned() -> Self {
        Self::Assert("poisoned RwLock")
    }
}

impl fmt::Display for DirectoryDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotADirectory => f.write_str("is not a directory"),
            Self::MissingTables(missing) => write!(f, "is missing {}", missing.join(" and ")),
        }
    }
}

impl fmt::Display for DataSourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTimezone(identifier) => f.write_str(identifier),
            Self::UnknownCountry(code) => f.write_str(code),
            Self::NotImplemented(method) => write!(f, "{method} not defined"),
            Self::Config(msg) => f.write_str(msg),
            Self::RequiredDependencyMissing(msg) => f.write_str(msg),
            Self::InvalidDirectory { path, defect } => write!(f, "{} {defect}", path.display()),
            Self::DirectoryNotFound { .. } => f.write_str(
                "None of the paths included in the search path are valid zoneinfo directories.",
            ),
            Self::DataSourceNotFound => f.write_str("No source of time zone data could be found."),
            Self::InvalidZoneinfoFile { path, reason } => write!(f, "{}: {reason}", path.display()),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Assert(msg) => write!(f, "implementation error: {msg}"),
        }
    }
}

impl std::error::Error for DataSourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn not_implemented_names_method() {
        let err = DataSourceError::NotImplemented("load_country_info");
        assert_eq!(err.to_string(), "load_country_info not defined");
    }

    #[test]
    fn invalid_directory_names_missing_tables() {
        let err = DataSourceError::InvalidDirectory {
            path: Path::new("/tmp/tz").into(),
            defect: DirectoryDefect::MissingTables(vec![
                "iso3166.tab".into(),
                "zone1970.tab or zone.tab".into(),
            ]),
        };
        assert_eq!(
            err.to_string(),
            "/tmp/tz is missing iso3166.tab and zone1970.tab or zone.tab"
        );

        let err = DataSourceError::InvalidDirectory {
            path: Path::new("/tmp/tz").into(),
            defect: DirectoryDefect::NotADirectory,
        };
        assert_eq!(err.to_string(), "/tmp/tz is not a directory");
    }

    #[test]
    fn unknown_identifier_message_is_identifier() {
        assert_eq!(
            DataSourceError::UnknownTimezone("Test/Invalid".into()).to_string(),
            "Test/Invalid"
        );
        assert_eq!(
            DataSourceError::UnknownCountry("XX".into()).to_string(),
            "XX"
        );
    }

    #[test]
    fn poisoned_is_an_assertion() {
        let err = DataSourceError::poisoned();
        assert!(matches!(err, DataSourceError::Assert("poisoned RwLock")));
        assert_eq!(err.to_string(), "implementation error: poisoned RwLock");
    }
}
