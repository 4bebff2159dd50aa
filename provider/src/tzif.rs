//! A thin wrapper around TZif data parsed by the `tzif` crate.

use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

use combine::Parser;
use tzif::data::{
    posix::PosixTzString,
    tzif::{DataBlock, TzifData, TzifHeader},
};

/// Every TZif file starts with these four bytes.
const TZIF_MAGIC: &[u8; 4] = b"TZif";

/// `TZif` stands for Time zone information format and is laid out by
/// [RFC 8536][rfc8536].
///
/// This layer does not interpret the transitions it holds. The type exists
/// so a loaded record carries validated, parsed data for the value objects
/// built on top of it.
///
/// [rfc8536]: https://datatracker.ietf.org/doc/html/rfc8536
#[derive(Debug, Clone)]
pub struct Tzif {
    pub header1: TzifHeader,
    pub data_block1: DataBlock,
    pub header2: Option<TzifHeader>,
    pub data_block2: Option<DataBlock>,
    pub footer: Option<PosixTzString>,
}

impl From<TzifData> for Tzif {
    fn from(value: TzifData) -> Self {
        let TzifData {
            header1,
            data_block1,
            header2,
            data_block2,
            footer,
        } = value;

        Self {
            header1,
            data_block1,
            header2,
            data_block2,
            footer,
        }
    }
}

impl Tzif {
    pub fn from_bytes(data: &[u8]) -> Result<Self, &'static str> {
        if !is_possibly_tzif(data) {
            return Err("missing TZif magic");
        }
        let Ok((parse_result, _)) = tzif::parse::tzif::tzif().parse(data) else {
            return Err("ill-formed TZif data");
        };
        Ok(Self::from(parse_result))
    }

    pub fn from_path(path: &Path) -> Result<Self, &'static str> {
        tzif::parse_tzif_file(path)
            .map(Into::into)
            .map_err(|_| "TZif parsing error")
    }

    pub fn posix_tz_string(&self) -> Option<&PosixTzString> {
        self.footer.as_ref()
    }

    /// The most precise data block: the 64-bit v2+ block when present.
    pub fn data_block(&self) -> &DataBlock {
        self.data_block2.as_ref().unwrap_or(&self.data_block1)
    }
}

pub(crate) fn is_possibly_tzif(data: &[u8]) -> bool {
    data.starts_with(TZIF_MAGIC)
}

/// Reads only the first bytes of `path` to check for the TZif magic.
pub(crate) fn file_is_possibly_tzif(path: &Path) -> io::Result<bool> {
    let mut magic = [0; 4];
    let mut file = File::open(path)?;
    match file.read_exact(&mut magic) {
        Ok(()) => Ok(is_possibly_tzif(&magic)),
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Ok(false),
        Err(err) => Err(err),
    }
}
