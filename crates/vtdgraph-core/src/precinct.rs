//! Precinct records, demographics and the dense id arena.
//!
//! A [`PrecinctCollection`] owns every precinct of one state for the lifetime
//! of a compilation run. Ids are assigned from row order when the collection
//! is built and never change afterwards, so every other stage addresses
//! precincts by [`PrecinctId`] instead of holding references.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CompileError;
use crate::geometry::{GeometryEngine, Ring};

/// Dense node identifier, equal to the precinct's row position.
///
/// This is the id written into the `.idx` file, not the census GEOID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrecinctId(pub(crate) u32);

impl PrecinctId {
    /// Wraps a raw id.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric identifier.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Returns the id as a slice index.
    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PrecinctId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Census race counts for one region.
///
/// Field names follow the P003 table: total population, then the seven
/// single-race categories and "two or more races".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Demographics {
    /// Total population.
    pub total: u64,
    /// White alone.
    pub white: u64,
    /// Black or African American alone.
    pub black: u64,
    /// American Indian and Alaska Native alone.
    pub native_american: u64,
    /// Asian alone.
    pub asian: u64,
    /// Native Hawaiian and Other Pacific Islander alone.
    pub pacific_islander: u64,
    /// Some other race alone.
    pub other: u64,
    /// Two or more races.
    pub multiracial: u64,
}

impl Demographics {
    /// Number of raw attributes carried per region.
    pub const FIELD_COUNT: usize = 8;

    /// Raw attributes in declaration order.
    pub const fn to_array(&self) -> [u64; Self::FIELD_COUNT] {
        [
            self.total,
            self.white,
            self.black,
            self.native_american,
            self.asian,
            self.pacific_islander,
            self.other,
            self.multiracial,
        ]
    }

    /// Inverse of [`to_array`](Self::to_array).
    pub const fn from_array(values: [u64; Self::FIELD_COUNT]) -> Self {
        Self {
            total: values[0],
            white: values[1],
            black: values[2],
            native_american: values[3],
            asian: values[4],
            pacific_islander: values[5],
            other: values[6],
            multiracial: values[7],
        }
    }

    /// The "other" bucket written to the binary: other + pacific islander + multiracial.
    pub const fn other_combined(&self) -> u64 {
        self.other
            .saturating_add(self.pacific_islander)
            .saturating_add(self.multiracial)
    }

    /// The six values in encoded order: total, black, native american, asian,
    /// white, other-combined.
    pub const fn sextuple(&self) -> [u64; 6] {
        [
            self.total,
            self.black,
            self.native_american,
            self.asian,
            self.white,
            self.other_combined(),
        ]
    }
}

/// Two-letter postal code stored in the `.idx` header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateCode([u8; 2]);

impl StateCode {
    /// Parses a postal code; lowercase input is upper-cased.
    pub fn new(code: &str) -> Result<Self, CompileError> {
        match code.as_bytes() {
            [a, b] if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => {
                Ok(Self([a.to_ascii_uppercase(), b.to_ascii_uppercase()]))
            }
            _ => Err(CompileError::InvalidStateCode(code.to_string())),
        }
    }

    /// Accepts raw header bytes if they are two ASCII uppercase letters.
    pub fn from_bytes(bytes: [u8; 2]) -> Option<Self> {
        bytes
            .iter()
            .all(u8::is_ascii_uppercase)
            .then_some(Self(bytes))
    }

    /// Raw bytes as written to the header.
    pub const fn as_bytes(&self) -> [u8; 2] {
        self.0
    }

    /// The code as text.
    pub fn as_str(&self) -> &str {
        // Both bytes are ASCII uppercase by construction.
        core::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateCode {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for StateCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StateCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::new(&text).map_err(serde::de::Error::custom)
    }
}

/// A precinct as handed over by the upstream preparation stage, before it
/// has been given an id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrecinctRecord {
    /// Human-readable name (census NAMELSAD).
    pub name: String,
    /// Land area in square meters.
    #[serde(default)]
    pub land: u64,
    /// Water area in square meters.
    #[serde(default)]
    pub water: u64,
    /// Apportioned race counts.
    #[serde(default)]
    pub demographics: Demographics,
    /// Assigned district, 0 when no district overlaps.
    #[serde(default)]
    pub district: u32,
    /// Exterior ring as `[x, y]` (longitude, latitude) pairs.
    pub vertices: Ring,
}

/// One graph node's attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct Precinct {
    /// Dense id, equal to row order.
    pub id: PrecinctId,
    /// Human-readable name.
    pub name: String,
    /// Exterior ring.
    pub geometry: Ring,
    /// Land area in square meters.
    pub land: u64,
    /// Water area in square meters.
    pub water: u64,
    /// Race counts.
    pub demographics: Demographics,
    /// Assigned district, 0 = unassigned.
    pub district: u32,
}

impl Precinct {
    /// Node area as written to the binary: land + water.
    pub fn area(&self) -> u64 {
        self.land.saturating_add(self.water)
    }
}

/// Arena of precincts addressed by dense [`PrecinctId`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrecinctCollection {
    precincts: Vec<Precinct>,
}

impl PrecinctCollection {
    /// Builds the arena, assigning ids `0..N` in iteration order.
    pub fn from_records(
        records: impl IntoIterator<Item = PrecinctRecord>,
    ) -> Result<Self, CompileError> {
        let mut precincts = Vec::new();
        for (row, record) in records.into_iter().enumerate() {
            let id = u32::try_from(row).map_err(|_| crate::FormatError::Overflow {
                field: "node count",
                value: row as u64,
            })?;
            precincts.push(Precinct {
                id: PrecinctId(id),
                name: record.name,
                geometry: record.vertices,
                land: record.land,
                water: record.water,
                demographics: record.demographics,
                district: record.district,
            });
        }
        Ok(Self { precincts })
    }

    /// Number of precincts.
    pub fn len(&self) -> usize {
        self.precincts.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.precincts.is_empty()
    }

    /// Looks up a precinct by id.
    pub fn get(&self, id: PrecinctId) -> Option<&Precinct> {
        self.precincts.get(id.as_usize())
    }

    /// Iterates in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Precinct> {
        self.precincts.iter()
    }

    /// Overwrites every precinct's district from a per-id list.
    ///
    /// # Panics
    ///
    /// Panics if `districts.len()` differs from the collection length.
    pub fn set_districts(&mut self, districts: &[u32]) {
        assert_eq!(districts.len(), self.precincts.len());
        for (precinct, &district) in self.precincts.iter_mut().zip(districts) {
            precinct.district = district;
        }
    }

    /// Overwrites every precinct's demographics from a per-id list.
    ///
    /// # Panics
    ///
    /// Panics if `values.len()` differs from the collection length.
    pub fn set_demographics(&mut self, values: &[Demographics]) {
        assert_eq!(values.len(), self.precincts.len());
        for (precinct, value) in self.precincts.iter_mut().zip(values) {
            precinct.demographics = *value;
        }
    }

    /// Hands every ring to the geometry engine, in id order.
    pub fn prepare_shapes<E: GeometryEngine>(
        &self,
        engine: &E,
    ) -> Result<Vec<E::Shape>, CompileError> {
        self.precincts
            .iter()
            .enumerate()
            .map(|(index, p)| {
                engine
                    .prepare(&p.geometry)
                    .map_err(|source| CompileError::Geometry { index, source })
            })
            .collect()
    }
}
