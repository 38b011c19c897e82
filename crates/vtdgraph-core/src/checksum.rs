//! Payload checksum.
//!
//! The `.idx` header carries a CRC-32 (IEEE polynomial, as computed by
//! `crc32fast`) over the node-record table and node-data section, i.e.
//! everything after the 18-byte header. Readers must recompute it and reject
//! the file on mismatch.

use std::io::{self, Read};

/// Bytes hashed per update call.
pub const CHUNK_SIZE: usize = 1 << 20;

/// Incremental checksum state.
#[derive(Clone, Default)]
pub struct Checksum {
    hasher: crc32fast::Hasher,
}

impl std::fmt::Debug for Checksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checksum").finish_non_exhaustive()
    }
}

impl Checksum {
    /// Starts a new checksum.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds more bytes.
    pub fn update(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Finishes and returns the 32-bit value.
    pub fn finalize(self) -> u32 {
        self.hasher.finalize()
    }
}

/// Checksum of an in-memory payload, fed in [`CHUNK_SIZE`] pieces.
pub fn checksum(payload: &[u8]) -> u32 {
    let mut sum = Checksum::new();
    for chunk in payload.chunks(CHUNK_SIZE) {
        sum.update(chunk);
    }
    sum.finalize()
}

/// Checksum of everything a reader yields, without buffering it whole.
pub fn checksum_reader<R: Read>(mut reader: R) -> io::Result<u32> {
    let mut sum = Checksum::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        sum.update(&buf[..n]);
    }
    Ok(sum.finalize())
}
