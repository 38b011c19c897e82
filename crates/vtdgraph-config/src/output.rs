//! Output kinds and the set selected for a run.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One artifact a compilation can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputKind {
    /// `{state}.idx`, the binary graph.
    Binary,
    /// `{state}.idx.json`, the debug mirror of the binary.
    Readable,
    /// `{state}.json`, render payload with vertices.
    FullJson,
    /// `{state}.novert.json`, render payload without vertices.
    VertexFreeJson,
    /// `{state}.districts.json`, precinct to district map.
    DistrictMapping,
}

impl OutputKind {
    /// Every kind, in emission order.
    pub const ALL: [Self; 5] = [
        Self::Binary,
        Self::Readable,
        Self::FullJson,
        Self::VertexFreeJson,
        Self::DistrictMapping,
    ];

    /// Name used in config files and on the command line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Readable => "readable",
            Self::FullJson => "full-json",
            Self::VertexFreeJson => "vertex-free-json",
            Self::DistrictMapping => "district-mapping",
        }
    }

    /// File name suffix appended to the state slug.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Binary => ".idx",
            Self::Readable => ".idx.json",
            Self::FullJson => ".json",
            Self::VertexFreeJson => ".novert.json",
            Self::DistrictMapping => ".districts.json",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownOutputKind(wanted.to_string()))
    }
}

/// Ordered, duplicate-free selection of [`OutputKind`]s.
///
/// Defaults to every kind. Serializes as a list of kind names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputSet {
    kinds: BTreeSet<OutputKind>,
}

impl Default for OutputSet {
    fn default() -> Self {
        Self::all()
    }
}

impl OutputSet {
    /// Every output kind.
    pub fn all() -> Self {
        Self {
            kinds: OutputKind::ALL.into_iter().collect(),
        }
    }

    /// A set with no kinds.
    pub fn empty() -> Self {
        Self {
            kinds: BTreeSet::new(),
        }
    }

    /// Parses comma-separated kind names, e.g. `"binary,district-mapping"`.
    ///
    /// Blank items are skipped; an input with no kinds at all is rejected.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let kinds = text
            .split(',')
            .filter(|item| !item.trim().is_empty())
            .map(str::parse::<OutputKind>)
            .collect::<Result<BTreeSet<_>, _>>()?;
        if kinds.is_empty() {
            return Err(ConfigError::EmptyOutputSet);
        }
        Ok(Self { kinds })
    }

    /// Adds a kind.
    pub fn insert(&mut self, kind: OutputKind) {
        self.kinds.insert(kind);
    }

    /// Whether `kind` is selected.
    pub fn contains(&self, kind: OutputKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Selected kinds in emission order.
    pub fn iter(&self) -> impl Iterator<Item = OutputKind> + '_ {
        self.kinds.iter().copied()
    }

    /// Number of selected kinds.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl FromIterator<OutputKind> for OutputSet {
    fn from_iter<I: IntoIterator<Item = OutputKind>>(iter: I) -> Self {
        Self {
            kinds: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for OutputSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, kind) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(kind.as_str())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selects_everything() {
        let set = OutputSet::default();
        assert_eq!(set.len(), 5);
        assert!(OutputKind::ALL.iter().all(|&k| set.contains(k)));
    }

    #[test]
    fn parse_trims_dedups_and_orders() {
        let set = OutputSet::parse(" district-mapping, binary,,BINARY ").unwrap();
        assert_eq!(
            set.iter().collect::<Vec<_>>(),
            vec![OutputKind::Binary, OutputKind::DistrictMapping]
        );
        assert_eq!(set.to_string(), "binary,district-mapping");
    }

    #[test]
    fn parse_rejects_unknown_and_empty() {
        assert!(matches!(
            OutputSet::parse("binary,svg"),
            Err(ConfigError::UnknownOutputKind(ref name)) if name == "svg"
        ));
        assert!(matches!(
            OutputSet::parse(" , "),
            Err(ConfigError::EmptyOutputSet)
        ));
    }

    #[test]
    fn suffixes_are_distinct() {
        let suffixes: BTreeSet<_> = OutputKind::ALL.iter().map(|k| k.suffix()).collect();
        assert_eq!(suffixes.len(), OutputKind::ALL.len());
    }
}
