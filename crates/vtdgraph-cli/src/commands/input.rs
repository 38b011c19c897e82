//! JSON inputs handed over by the upstream preparation stage.
//!
//! Every file is a JSON array. Rings are `[[x, y], ...]` with x = longitude
//! and y = latitude.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use vtdgraph_core::{
    CompileError, Demographics, DistrictRegion, GeometryEngine, PrecinctRecord, Ring,
    SourceRegion,
};

/// One district polygon or district part.
#[derive(Debug, Deserialize)]
pub struct DistrictInput {
    /// District id, 1-based.
    pub id: u32,
    /// Exterior ring.
    pub vertices: Ring,
}

/// One census region carrying counts to apportion.
#[derive(Debug, Deserialize)]
pub struct SourceInput {
    /// Raw counts.
    pub demographics: Demographics,
    /// Exterior ring.
    pub vertices: Ring,
}

fn read_array<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

/// Loads precinct rows in file order.
pub fn load_precincts(path: &Path) -> anyhow::Result<Vec<PrecinctRecord>> {
    read_array(path)
}

/// Loads and prepares district polygons.
pub fn load_districts<E: GeometryEngine>(
    engine: &E,
    path: &Path,
) -> anyhow::Result<Vec<DistrictRegion<E::Shape>>> {
    let inputs: Vec<DistrictInput> = read_array(path)?;
    let regions = inputs
        .into_iter()
        .enumerate()
        .map(|(index, d)| -> Result<_, CompileError> {
            let shape = engine
                .prepare(&d.vertices)
                .map_err(|source| CompileError::DistrictGeometry { index, source })?;
            Ok(DistrictRegion { id: d.id, shape })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(regions)
}

/// Loads and prepares source regions.
pub fn load_sources<E: GeometryEngine>(
    engine: &E,
    path: &Path,
) -> anyhow::Result<Vec<SourceRegion<E::Shape>>> {
    let inputs: Vec<SourceInput> = read_array(path)?;
    inputs
        .into_iter()
        .enumerate()
        .map(|(index, s)| -> anyhow::Result<_> {
            let shape = engine
                .prepare(&s.vertices)
                .with_context(|| format!("source region {index} in {}", path.display()))?;
            Ok(SourceRegion {
                shape,
                demographics: s.demographics,
            })
        })
        .collect()
}
