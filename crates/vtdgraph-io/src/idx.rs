//! `.idx` files on disk.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use vtdgraph_core::format::{self, HEADER_LEN};
use vtdgraph_core::{CompiledGraph, DecodedGraph, Header, checksum_reader};

use crate::atomic::write_atomic;
use crate::{Error, Result};

/// Encodes `graph` and writes it atomically, returning the byte count.
pub fn write_idx(path: impl AsRef<Path>, graph: &CompiledGraph) -> Result<u64> {
    let bytes = format::encode(graph)?;
    write_atomic(path, &bytes)
}

/// Reads and fully validates an `.idx` file, checksum included.
pub fn read_idx(path: impl AsRef<Path>) -> Result<DecodedGraph> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| Error::read(path, e))?;
    Ok(format::decode(&bytes)?)
}

/// Header of an `.idx` file plus the checksum its payload actually hashes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdxScan {
    /// Parsed header.
    pub header: Header,
    /// CRC-32 recomputed over everything after the header.
    pub actual_checksum: u32,
    /// File size in bytes.
    pub len: u64,
}

impl IdxScan {
    /// Whether the stored and recomputed checksums agree.
    pub fn checksum_ok(&self) -> bool {
        self.header.checksum == self.actual_checksum
    }
}

/// Parses the header and streams the payload through the checksum without
/// holding the file in memory.
pub fn scan_idx(path: impl AsRef<Path>) -> Result<IdxScan> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::read(path, e))?;
    let len = file.metadata().map_err(|e| Error::read(path, e))?.len();
    let mut reader = BufReader::new(file);

    let mut head = Vec::with_capacity(HEADER_LEN);
    (&mut reader)
        .take(HEADER_LEN as u64)
        .read_to_end(&mut head)
        .map_err(|e| Error::read(path, e))?;
    let header = Header::parse(&head)?;
    let actual_checksum = checksum_reader(reader).map_err(|e| Error::read(path, e))?;

    Ok(IdxScan {
        header,
        actual_checksum,
        len,
    })
}
