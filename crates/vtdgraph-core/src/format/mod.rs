//! The `.idx` binary layout.
//!
//! Every field is a big-endian `u32` except the two state-code bytes.
//!
//! ```text
//! header (18 bytes)
//!   magic          u32   0xBEEFCAFE
//!   checksum       u32   CRC-32 of everything after the header
//!   state code     2 x u8
//!   node count     u32
//!   district count u32
//! node-record table (8 bytes x N, id order)
//!   neighbor count u32
//!   offset         u32   relative to the start of the node-data section
//! node data (id order)
//!   id             u32
//!   area           u32   land + water
//!   neighbors      u32 x neighbor count
//!   demographics   u32 x 6   total, black, native american, asian, white, other
//! ```
//!
//! Offsets obey `offset(0) = 0` and
//! `offset(i + 1) = offset(i) + 8 + 4 * neighbor_count(i) + 24`.
//!
//! The encoder builds the record table and node data first, hashes them,
//! then prepends the header. [`decode`] is an independent reader that checks
//! the checksum and every structural law before returning anything.

mod decode;
mod encode;

pub use decode::{DecodedGraph, DecodedNode, IdxReader, decode};
pub use encode::{encode, encode_payload, node_layout};

use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use crate::precinct::{Demographics, StateCode};

/// Leading constant identifying the format.
pub const MAGIC: u32 = 0xBEEF_CAFE;

/// Header size in bytes.
pub const HEADER_LEN: usize = 18;

/// Size of one node-record table entry.
pub const RECORD_LEN: usize = 8;

/// Node id + area.
pub const NODE_FIXED_LEN: usize = 8;

/// Six demographic counts.
pub const DEMOGRAPHICS_LEN: usize = 24;

/// Bytes one node occupies in the node-data section.
pub const fn node_data_len(neighbor_count: usize) -> usize {
    NODE_FIXED_LEN + 4 * neighbor_count + DEMOGRAPHICS_LEN
}

/// Converts a count or offset into its 32-bit field.
pub(crate) fn fit_u32(field: &'static str, value: u64) -> Result<u32, FormatError> {
    u32::try_from(value).map_err(|_| FormatError::Overflow { field, value })
}

/// An entry of the node-record table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Number of neighbor ids in the node's data.
    #[serde(rename = "numNeighbors")]
    pub neighbor_count: u32,
    /// Byte offset of the node's data, relative to the node-data section.
    pub offset: u32,
}

/// The fixed 18-byte header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    /// Always [`MAGIC`] in a valid file.
    pub magic: u32,
    /// CRC-32 of the record table and node data.
    pub checksum: u32,
    /// State postal code.
    pub state: StateCode,
    /// Number of nodes.
    pub node_count: u32,
    /// Number of districts.
    pub district_count: u32,
}

impl Header {
    /// Serializes the header.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..4].copy_from_slice(&self.magic.to_be_bytes());
        out[4..8].copy_from_slice(&self.checksum.to_be_bytes());
        out[8..10].copy_from_slice(&self.state.as_bytes());
        out[10..14].copy_from_slice(&self.node_count.to_be_bytes());
        out[14..18].copy_from_slice(&self.district_count.to_be_bytes());
        out
    }

    /// Parses the header from the start of `bytes`.
    ///
    /// Checks length, magic and state code; the checksum is left to the caller.
    pub fn parse(bytes: &[u8]) -> Result<Self, FormatError> {
        let Some(head) = bytes.get(..HEADER_LEN) else {
            return Err(FormatError::Truncated {
                at: 0,
                needed: HEADER_LEN,
                available: bytes.len(),
            });
        };
        let word = |at: usize| u32::from_be_bytes([head[at], head[at + 1], head[at + 2], head[at + 3]]);

        let magic = word(0);
        if magic != MAGIC {
            return Err(FormatError::BadMagic(magic));
        }
        let code = [head[8], head[9]];
        let state = StateCode::from_bytes(code).ok_or(FormatError::InvalidStateCode(code))?;

        Ok(Self {
            magic,
            checksum: word(4),
            state,
            node_count: word(10),
            district_count: word(14),
        })
    }
}

/// The demographic sextuple as written to disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedDemographics {
    /// Total population.
    pub total: u32,
    /// Black.
    pub black: u32,
    /// Native American.
    pub native_american: u32,
    /// Asian.
    pub asian: u32,
    /// White.
    pub white: u32,
    /// Other + Pacific Islander + multiracial.
    pub other: u32,
}

impl EncodedDemographics {
    const FIELDS: [&'static str; 6] = [
        "total",
        "black",
        "native american",
        "asian",
        "white",
        "other",
    ];

    /// Narrows raw counts to the encoded sextuple.
    pub fn encode(demographics: &Demographics) -> Result<Self, FormatError> {
        let wide = demographics.sextuple();
        let mut narrow = [0u32; 6];
        for ((slot, &value), field) in narrow.iter_mut().zip(&wide).zip(Self::FIELDS) {
            *slot = fit_u32(field, value)?;
        }
        Ok(Self::from_array(narrow))
    }

    /// Values in encoded order.
    pub const fn to_array(&self) -> [u32; 6] {
        [
            self.total,
            self.black,
            self.native_american,
            self.asian,
            self.white,
            self.other,
        ]
    }

    /// Inverse of [`to_array`](Self::to_array).
    pub const fn from_array(v: [u32; 6]) -> Self {
        Self {
            total: v[0],
            black: v[1],
            native_american: v[2],
            asian: v[3],
            white: v[4],
            other: v[5],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout_is_big_endian() {
        let header = Header {
            magic: MAGIC,
            checksum: 0x0102_0304,
            state: StateCode::new("WA").unwrap(),
            node_count: 7,
            district_count: 10,
        };
        let bytes = header.to_bytes();
        assert_eq!(
            bytes,
            [
                0xBE, 0xEF, 0xCA, 0xFE, 1, 2, 3, 4, b'W', b'A', 0, 0, 0, 7, 0, 0, 0, 10
            ]
        );
        assert_eq!(Header::parse(&bytes).unwrap(), header);
    }

    #[test]
    fn header_parse_rejects_bad_input() {
        assert!(matches!(
            Header::parse(&[0xBE, 0xEF]),
            Err(FormatError::Truncated {
                at: 0,
                needed: HEADER_LEN,
                available: 2
            })
        ));

        let mut bytes = [0u8; HEADER_LEN];
        assert_eq!(Header::parse(&bytes), Err(FormatError::BadMagic(0)));

        bytes[..4].copy_from_slice(&MAGIC.to_be_bytes());
        bytes[8..10].copy_from_slice(b"w1");
        assert_eq!(
            Header::parse(&bytes),
            Err(FormatError::InvalidStateCode(*b"w1"))
        );
    }

    #[test]
    fn node_data_len_follows_offset_law() {
        assert_eq!(node_data_len(0), 32);
        assert_eq!(node_data_len(3), 44);
    }

    #[test]
    fn demographics_fold_other_buckets() {
        let raw = Demographics {
            total: 10,
            white: 5,
            black: 2,
            native_american: 1,
            asian: 0,
            pacific_islander: 1,
            other: 0,
            multiracial: 1,
        };
        let encoded = EncodedDemographics::encode(&raw).unwrap();
        assert_eq!(encoded.to_array(), [10, 2, 1, 0, 5, 2]);
    }

    #[test]
    fn demographics_overflow_names_the_field() {
        let raw = Demographics {
            white: u64::from(u32::MAX) + 1,
            ..Demographics::default()
        };
        assert_eq!(
            EncodedDemographics::encode(&raw),
            Err(FormatError::Overflow {
                field: "white",
                value: u64::from(u32::MAX) + 1
            })
        );
    }
}
