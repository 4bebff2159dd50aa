use std::{
    fs,
    path::Path,
    sync::{Arc, Barrier},
    thread,
};

use tzsource::{DataSource, DataSourceError, DataSourceKind, DataSourceRegistry, DetectionConfig};
use tzsource_provider::NeverBackend;

const ISO3166: &str = "FR\tFrance\nUS\tUnited States\n";
const ZONE: &str = "\
FR\t+4852+00220\tEurope/Paris
US\t+404251-0740023\tAmerica/New_York\tEastern (most areas)
";

fn tzif(identifier: &str) -> &'static [u8] {
    jiff_tzdb::get(identifier).unwrap().1
}

fn write_zoneinfo(dir: &Path) {
    fs::create_dir_all(dir.join("Europe")).unwrap();
    for identifier in ["Europe/Paris", "UTC"] {
        fs::write(dir.join(identifier), tzif(identifier)).unwrap();
    }
    fs::write(dir.join("iso3166.tab"), ISO3166).unwrap();
    fs::write(dir.join("zone.tab"), ZONE).unwrap();
}

fn config(search_path: &[&Path]) -> DetectionConfig {
    DetectionConfig::default()
        .with_search_path(search_path.iter().copied())
        .with_alternate_iso3166_tab_search_path(Vec::<&Path>::new())
        .with_bundled(false)
}

fn never() -> Arc<DataSource> {
    Arc::new(DataSource::new(NeverBackend))
}

#[test]
fn get_fails_without_any_data() {
    let empty = tempfile::tempdir().unwrap();
    let registry = DataSourceRegistry::new(config(&[empty.path()]));
    assert!(matches!(
        registry.get(),
        Err(DataSourceError::DataSourceNotFound)
    ));
}

#[test]
fn get_detects_zoneinfo_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("iso3166.tab"), ISO3166).unwrap();
    fs::write(dir.path().join("zone.tab"), ZONE).unwrap();
    let registry = DataSourceRegistry::new(config(&[dir.path()]));

    let source = registry.get().unwrap();
    assert_eq!(source.zoneinfo_dir(), Some(dir.path()));
    assert!(Arc::ptr_eq(&source, &registry.get().unwrap()));
}

#[test]
fn get_searches_in_order() {
    let invalid = tempfile::tempdir().unwrap();
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    write_zoneinfo(first.path());
    write_zoneinfo(second.path());
    let registry =
        DataSourceRegistry::new(config(&[invalid.path(), first.path(), second.path()]));

    let source = registry.get().unwrap();
    assert_eq!(source.zoneinfo_dir(), Some(first.path()));
    assert_eq!(source.lookup_country("US").unwrap().name(), "United States");
}

#[cfg(feature = "bundled")]
#[test]
fn bundled_takes_precedence() {
    let dir = tempfile::tempdir().unwrap();
    write_zoneinfo(dir.path());
    let registry = DataSourceRegistry::new(config(&[dir.path()]).with_bundled(true));

    let source = registry.get().unwrap();
    assert_eq!(source.to_string(), "Bundled DataSource");
    assert_eq!(source.zoneinfo_dir(), None);
    assert!(source.lookup_timezone("America/New_York").is_ok());
}

#[cfg(not(feature = "bundled"))]
#[test]
fn missing_bundled_falls_back_to_zoneinfo() {
    let dir = tempfile::tempdir().unwrap();
    write_zoneinfo(dir.path());
    let registry = DataSourceRegistry::new(config(&[dir.path()]).with_bundled(true));

    let source = registry.get().unwrap();
    assert_eq!(source.zoneinfo_dir(), Some(dir.path()));
    assert!(matches!(
        registry.set_kind(DataSourceKind::Bundled, &[] as &[&str]),
        Err(DataSourceError::RequiredDependencyMissing(_))
    ));
    assert!(Arc::ptr_eq(&source, &registry.get().unwrap()));
}

#[test]
fn set_zoneinfo_explicit() {
    let dir = tempfile::tempdir().unwrap();
    write_zoneinfo(dir.path());
    let registry = DataSourceRegistry::new(config(&[]));

    registry
        .set_kind(DataSourceKind::Zoneinfo, &[dir.path()])
        .unwrap();
    let source = registry.get().unwrap();
    assert_eq!(source.zoneinfo_dir(), Some(dir.path()));
    assert!(source
        .valid_timezone_identifier("Europe/Paris")
        .unwrap()
        .is_some());
}

#[test]
fn set_zoneinfo_alternate_iso3166() {
    let dir = tempfile::tempdir().unwrap();
    write_zoneinfo(dir.path());
    fs::remove_file(dir.path().join("iso3166.tab")).unwrap();
    let misc = tempfile::tempdir().unwrap();
    let iso3166 = misc.path().join("iso3166");
    fs::write(&iso3166, "FR\tFRA\t250\tFrench Republic\n").unwrap();
    let registry = DataSourceRegistry::new(config(&[]));

    registry
        .set_named("zoneinfo", &[dir.path(), iso3166.as_path()])
        .unwrap();
    let source = registry.get().unwrap();
    assert_eq!(
        source.lookup_country("FR").unwrap().name(),
        "French Republic"
    );
}

#[test]
fn set_zoneinfo_search() {
    let invalid = tempfile::tempdir().unwrap();
    let dir = tempfile::tempdir().unwrap();
    write_zoneinfo(dir.path());
    let registry = DataSourceRegistry::new(config(&[invalid.path(), dir.path()]));

    registry
        .set_kind(DataSourceKind::Zoneinfo, &[] as &[&str])
        .unwrap();
    assert_eq!(registry.get().unwrap().zoneinfo_dir(), Some(dir.path()));
}

#[test]
fn set_zoneinfo_search_not_found() {
    let invalid = tempfile::tempdir().unwrap();
    let registry = DataSourceRegistry::new(config(&[invalid.path()]));
    let previous = never();
    registry.set(Arc::clone(&previous)).unwrap();

    assert!(matches!(
        registry.set_kind(DataSourceKind::Zoneinfo, &[] as &[&str]),
        Err(DataSourceError::DirectoryNotFound { .. })
    ));
    assert!(Arc::ptr_eq(&previous, &registry.get().unwrap()));
}

#[test]
fn set_zoneinfo_explicit_invalid() {
    let invalid = tempfile::tempdir().unwrap();
    let registry = DataSourceRegistry::new(config(&[]));
    let previous = never();
    registry.set(Arc::clone(&previous)).unwrap();

    let err = registry
        .set_kind(DataSourceKind::Zoneinfo, &[invalid.path()])
        .unwrap_err();
    assert!(matches!(err, DataSourceError::InvalidDirectory { .. }));
    let message = err.to_string();
    assert!(message.starts_with(&invalid.path().display().to_string()));
    assert!(message.contains("iso3166.tab"));
    assert!(message.contains("zone1970.tab or zone.tab"));
    assert!(Arc::ptr_eq(&previous, &registry.get().unwrap()));
}

#[test]
fn set_zoneinfo_wrong_argument_count() {
    let dir = tempfile::tempdir().unwrap();
    write_zoneinfo(dir.path());
    let registry = DataSourceRegistry::new(config(&[]));
    let previous = never();
    registry.set(Arc::clone(&previous)).unwrap();

    let path = dir.path();
    assert!(matches!(
        registry.set_kind(DataSourceKind::Zoneinfo, &[path, path, path]),
        Err(DataSourceError::Config(_))
    ));
    assert!(matches!(
        registry.set_kind(DataSourceKind::Bundled, &[path]),
        Err(DataSourceError::Config(_))
    ));
    assert!(Arc::ptr_eq(&previous, &registry.get().unwrap()));
}

#[test]
fn set_invalid_kind() {
    let registry = DataSourceRegistry::new(config(&[]));
    let previous = never();
    registry.set(Arc::clone(&previous)).unwrap();

    let err = registry
        .set_named("zoneinfo64", &[] as &[&str])
        .unwrap_err();
    assert!(matches!(err, DataSourceError::Config(_)));
    assert!(Arc::ptr_eq(&previous, &registry.get().unwrap()));
}

#[test]
fn concurrent_first_get_installs_one_source() {
    let dir = tempfile::tempdir().unwrap();
    write_zoneinfo(dir.path());
    let registry = Arc::new(DataSourceRegistry::new(config(&[dir.path()])));
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                registry.get().unwrap()
            })
        })
        .collect();
    let sources: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(sources
        .iter()
        .all(|source| Arc::ptr_eq(source, &sources[0])));
}

#[test]
fn reset_detects_again() {
    let dir = tempfile::tempdir().unwrap();
    write_zoneinfo(dir.path());
    let registry = DataSourceRegistry::new(config(&[dir.path()]));

    let first = registry.get().unwrap();
    registry.reset().unwrap();
    let second = registry.get().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(second.zoneinfo_dir(), Some(dir.path()));
}
