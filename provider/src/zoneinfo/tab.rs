//! Parsing of the `iso3166.tab`, `zone1970.tab` and `zone.tab` tables.

use std::{collections::BTreeMap, fs, path::Path, sync::Arc};

use crate::{
    info::{CountryInfo, CountryTimezone},
    DataSourceError, DataSourceResult,
};

/// Reads the country table and the zone table into country records keyed
/// by code.
///
/// Every country in the country table gets a record, with no zones if the
/// zone table does not mention it. Zone table rows for codes missing from
/// the country table are ignored.
pub(crate) fn read_countries(
    iso3166: &Path,
    zone: &Path,
) -> DataSourceResult<BTreeMap<String, CountryInfo>> {
    let names = parse_iso3166(iso3166, &read(iso3166)?)?;
    let mut zones = parse_zone_tab(zone, &read(zone)?)?;

    let countries: BTreeMap<_, _> = names
        .into_iter()
        .map(|(code, name)| {
            let zones = zones.remove(&code).unwrap_or_default();
            let info = CountryInfo::new(&*code, name, zones);
            (code, info)
        })
        .collect();
    if !zones.is_empty() {
        debug!(
            "{} lists zones for {} codes missing from {}",
            zone.display(),
            zones.len(),
            iso3166.display()
        );
    }
    Ok(countries)
}

fn read(path: &Path) -> DataSourceResult<String> {
    fs::read_to_string(path)
        .map_err(|err| DataSourceError::io(path, err))
}

/// Non-empty lines that are not comments, with their one-based line number.
fn rows(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty() && !line.starts_with('#'))
}

fn is_country_code(code: &str) -> bool {
    code.len() == 2 && code.bytes().all(|b| b.is_ascii_uppercase())
}

/// Parses `CODE\tName` rows, or the `CODE\tAAA\tNNN\tName` rows of the
/// alternate iso3166 file some systems install.
fn parse_iso3166(path: &Path, content: &str) -> DataSourceResult<BTreeMap<String, String>> {
    let mut names = BTreeMap::new();
    for (line_no, line) in rows(content) {
        let fields: Vec<&str> = line.split('\t').collect();
        let (code, name) = match fields.as_slice() {
            [code, name] => (*code, *name),
            [code, alpha3, numeric, name]
                if alpha3.len() == 3 && numeric.bytes().all(|b| b.is_ascii_digit()) =>
            {
                (*code, *name)
            }
            _ => {
                return Err(DataSourceError::invalid_file(
                    path,
                    format!("line {line_no}: expected a country code and name"),
                ))
            }
        };
        if !is_country_code(code) {
            return Err(DataSourceError::invalid_file(
                path,
                format!("line {line_no}: invalid country code {code:?}"),
            ));
        }
        names.insert(code.to_owned(), name.trim().to_owned());
    }
    Ok(names)
}

/// Parses `CODES\tCOORDINATES\tTZ[\tCOMMENTS]` rows.
///
/// `zone1970.tab` lists comma separated codes, `zone.tab` a single code.
fn parse_zone_tab(
    path: &Path,
    content: &str,
) -> DataSourceResult<BTreeMap<String, Vec<CountryTimezone>>> {
    let invalid = |line_no: usize, what: &str| {
        DataSourceError::invalid_file(path, format!("line {line_no}: {what}"))
    };

    let mut zones: BTreeMap<String, Vec<CountryTimezone>> = BTreeMap::new();
    for (line_no, line) in rows(content) {
        let mut fields = line.split('\t');
        let (Some(codes), Some(coordinates), Some(identifier)) =
            (fields.next(), fields.next(), fields.next())
        else {
            return Err(invalid(
                line_no,
                "expected codes, coordinates and a time zone",
            ));
        };
        let description = fields
            .next()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from);
        let (latitude, longitude) = parse_iso6709(coordinates)
            .ok_or_else(|| invalid(line_no, "invalid coordinates"))?;
        let identifier: Arc<str> = Arc::from(identifier);

        for code in codes.split(',') {
            if !is_country_code(code) {
                return Err(invalid(line_no, "invalid country code"));
            }
            zones
                .entry(code.to_owned())
                .or_default()
                .push(CountryTimezone {
                    identifier: Arc::clone(&identifier),
                    latitude,
                    longitude,
                    description: description.clone(),
                });
        }
    }
    Ok(zones)
}

/// Parses `±DDMM±DDDMM` or `±DDMMSS±DDDMMSS` into degrees north and east.
fn parse_iso6709(coordinates: &str) -> Option<(f64, f64)> {
    let split = coordinates
        .char_indices()
        .skip(1)
        .find(|(_, c)| matches!(c, '+' | '-'))
        .map(|(idx, _)| idx)?;
    let (latitude, longitude) = coordinates.split_at(split);
    Some((parse_angle(latitude, 2)?, parse_angle(longitude, 3)?))
}

fn parse_angle(angle: &str, degree_digits: usize) -> Option<f64> {
    let (sign, digits) = match angle.as_bytes().first()? {
        b'+' => (1.0, angle.get(1..)?),
        b'-' => (-1.0, angle.get(1..)?),
        _ => return None,
    };
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let field = |range: core::ops::Range<usize>| -> Option<f64> {
        digits.get(range)?.parse::<u32>().ok().map(f64::from)
    };
    let degrees = field(0..degree_digits)?;
    let minutes = field(degree_digits..degree_digits + 2)?;
    let seconds = match digits.len() - degree_digits {
        2 => 0.0,
        4 => field(degree_digits + 2..degree_digits + 4)?,
        _ => return None,
    };
    Some(sign * (degrees + minutes / 60.0 + seconds / 3600.0))
}
