//! Validation and enumeration of a zoneinfo directory.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    index::find_identifier, tzif::file_is_possibly_tzif, DataSourceError, DataSourceResult,
    DirectoryDefect,
};

pub(crate) const ISO3166_TAB: &str = "iso3166.tab";
pub(crate) const ZONE1970_TAB: &str = "zone1970.tab";
pub(crate) const ZONE_TAB: &str = "zone.tab";

/// Top level entries that are never time zones.
const EXCLUDED_TOP_LEVEL: &[&str] = &[
    "+VERSION",
    "leapseconds",
    "localtime",
    "posix",
    "posixrules",
    "right",
    "SECURITY",
    "src",
    "timeconfig",
];

/// The table files a valid zoneinfo directory provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Tables {
    pub(crate) iso3166: PathBuf,
    pub(crate) zone: PathBuf,
}

/// Checks that `dir` is a directory holding a country table and a zone
/// table.
///
/// `iso3166` replaces `dir/iso3166.tab` when given. `zone1970.tab` is
/// preferred over `zone.tab`.
pub(crate) fn validate(dir: &Path, iso3166: Option<&Path>) -> Result<Tables, DirectoryDefect> {
    if !dir.is_dir() {
        return Err(DirectoryDefect::NotADirectory);
    }

    let iso3166 = iso3166.map_or_else(|| dir.join(ISO3166_TAB), Path::to_path_buf);
    let zone = [ZONE1970_TAB, ZONE_TAB]
        .into_iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file());

    let mut missing = Vec::new();
    if !iso3166.is_file() {
        missing.push(iso3166.display().to_string());
    }
    if zone.is_none() {
        missing.push(format!("{ZONE1970_TAB} or {ZONE_TAB}"));
    }

    match zone {
        Some(zone) if missing.is_empty() => Ok(Tables { iso3166, zone }),
        _ => Err(DirectoryDefect::MissingTables(missing)),
    }
}

/// The identifiers found in a zoneinfo directory.
#[derive(Debug, Default)]
pub(crate) struct Listing {
    /// Sorted, without duplicates.
    pub(crate) data: Vec<Arc<str>>,
    /// Sorted by identifier. The target is always one of `data`.
    pub(crate) links: Vec<(Arc<str>, Arc<str>)>,
}

/// Walks `dir` for TZif files.
///
/// Entries whose name contains a `.` are skipped, as are the top level
/// entries that hold alternate or auxiliary data. A symbolic link that
/// resolves to another listed file inside `dir` becomes a link to that
/// file's identifier.
pub(crate) fn walk(dir: &Path) -> DataSourceResult<Listing> {
    let root = fs::canonicalize(dir)
        .map_err(|err| DataSourceError::io(dir, err))?;

    let mut files = Vec::new();
    let mut symlinks = Vec::new();
    let mut stack = vec![(dir.to_path_buf(), String::new())];
    while let Some((path, prefix)) = stack.pop() {
        let entries = match path.read_dir() {
            Ok(entries) => entries,
            Err(err) if prefix.is_empty() => return Err(DataSourceError::io(path, err)),
            Err(err) => {
                warn!(
                    "error when reading {} as a directory: {err}",
                    path.display()
                );
                continue;
            }
        };
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("error when reading entry from {}: {err}", path.display());
                    continue;
                }
            };
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                trace!("skipping non UTF-8 name {:?}", entry.path());
                continue;
            };
            if name.contains('.') || (prefix.is_empty() && EXCLUDED_TOP_LEVEL.contains(&name)) {
                continue;
            }
            let identifier = format!("{prefix}{name}");
            let entry_path = entry.path();
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(err) => {
                    warn!(
                        "error when reading file type of {}: {err}",
                        entry_path.display()
                    );
                    continue;
                }
            };

            if file_type.is_dir() {
                stack.push((entry_path, format!("{identifier}/")));
            } else if file_type.is_symlink() {
                symlinks.push((identifier, entry_path));
            } else if is_tzif_file(&entry_path) {
                files.push(Arc::<str>::from(identifier));
            }
        }
    }

    files.sort();
    files.dedup();

    let mut data = files;
    let mut links = Vec::new();
    for (identifier, path) in symlinks {
        // Symlinked directories are not followed.
        if path.is_dir() || !is_tzif_file(&path) {
            continue;
        }
        let target = fs::canonicalize(&path)
            .ok()
            .and_then(|target| relative_identifier(&root, &target))
            .and_then(|target| find_identifier(&data, &target));
        match target {
            Some(target) if *target != *identifier => links.push((Arc::from(identifier), target)),
            _ => {
                trace!(
                    "treating symbolic link {} as a time zone file",
                    path.display()
                );
                let identifier = Arc::<str>::from(identifier);
                if let Err(idx) = data.binary_search(&identifier) {
                    data.insert(idx, identifier);
                }
            }
        }
    }
    links.sort();
    debug!(
        "found {} data and {} linked identifiers in {}",
        data.len(),
        links.len(),
        dir.display()
    );

    Ok(Listing { data, links })
}

fn is_tzif_file(path: &Path) -> bool {
    match file_is_possibly_tzif(path) {
        Ok(is_tzif) => {
            if !is_tzif {
                trace!("skipping {} since it is not TZif", path.display());
            }
            is_tzif
        }
        Err(err) => {
            warn!("failed to read {}: {err}", path.display());
            false
        }
    }
}

/// The `/` separated identifier of `path` relative to `root`.
fn relative_identifier(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut components = Vec::new();
    for component in relative.components() {
        components.push(component.as_os_str().to_str()?);
    }
    (!components.is_empty()).then(|| components.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc_bytes() -> &'static [u8] {
        jiff_tzdb::get("UTC").unwrap().1
    }

    #[test]
    fn validate_reports_missing_tables() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            validate(&dir.path().join("absent"), None),
            Err(DirectoryDefect::NotADirectory)
        );

        let Err(DirectoryDefect::MissingTables(missing)) = validate(dir.path(), None) else {
            panic!("empty directory accepted");
        };
        assert_eq!(missing.len(), 2);
        assert!(missing[0].ends_with(ISO3166_TAB));
        assert_eq!(missing[1], "zone1970.tab or zone.tab");

        fs::write(dir.path().join(ZONE_TAB), "").unwrap();
        let Err(DirectoryDefect::MissingTables(missing)) = validate(dir.path(), None) else {
            panic!("directory without iso3166.tab accepted");
        };
        assert_eq!(missing.len(), 1);
    }

    #[test]
    fn validate_prefers_zone1970() {
        let dir = tempfile::tempdir().unwrap();
        for name in [ISO3166_TAB, ZONE1970_TAB, ZONE_TAB] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let tables = validate(dir.path(), None).unwrap();
        assert_eq!(tables.zone, dir.path().join(ZONE1970_TAB));
        assert_eq!(tables.iso3166, dir.path().join(ISO3166_TAB));
    }

    #[test]
    fn validate_uses_explicit_iso3166() {
        let dir = tempfile::tempdir().unwrap();
        let other = tempfile::tempdir().unwrap();
        let iso3166 = other.path().join("iso3166");
        fs::write(dir.path().join(ZONE_TAB), "").unwrap();
        fs::write(&iso3166, "").unwrap();
        let tables = validate(dir.path(), Some(&iso3166)).unwrap();
        assert_eq!(tables.iso3166, iso3166);
    }

    #[test]
    fn walk_skips_auxiliary_entries() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("right/Europe")).unwrap();
        for name in [
            "UTC",
            "Europe/Paris",
            "right/Europe/Paris",
            "posixrules",
            "Europe/Paris.bak",
        ] {
            fs::write(root.join(name), utc_bytes()).unwrap();
        }
        fs::write(root.join("zone.tab"), "").unwrap();
        fs::write(root.join("Factory"), "not tzif").unwrap();

        let listing = walk(root).unwrap();
        assert_eq!(
            listing.data.iter().map(|id| &**id).collect::<Vec<_>>(),
            ["Europe/Paris", "UTC"]
        );
        assert!(listing.links.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn walk_resolves_symlinks_inside_directory() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let root = dir.path();
        let outside_zone = outside.path().join("Zone");
        fs::create_dir_all(root.join("America")).unwrap();
        fs::create_dir_all(root.join("US")).unwrap();
        fs::write(root.join("America/New_York"), utc_bytes())
            .unwrap();
        fs::write(&outside_zone, utc_bytes()).unwrap();
        symlink("../America/New_York", root.join("US/Eastern")).unwrap();
        symlink("US/Eastern", root.join("EST5EDT")).unwrap();
        symlink(&outside_zone, root.join("Outside")).unwrap();
        symlink("America", root.join("Alias")).unwrap();

        let listing = walk(root).unwrap();
        assert_eq!(
            listing.data.iter().map(|id| &**id).collect::<Vec<_>>(),
            ["America/New_York", "Outside"]
        );
        let links: Vec<_> = listing
            .links
            .iter()
            .map(|(id, target)| (&**id, &**target))
            .collect();
        assert_eq!(
            links,
            [
                ("EST5EDT", "America/New_York"),
                ("US/Eastern", "America/New_York")
            ]
        );
    }

    #[test]
    fn walk_fails_on_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            walk(&dir.path().join("absent")),
            Err(DataSourceError::Io { .. })
        ));
    }
}
