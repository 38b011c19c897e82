//! District assignment by greatest overlap.

use std::collections::BTreeMap;

use crate::error::CompileError;
use crate::geometry::GeometryEngine;
use crate::spatial::SpatialIndex;

/// District id for precincts that overlap no district.
pub const UNASSIGNED_DISTRICT: u32 = 0;

/// A district polygon (or one part of a multi-part district).
#[derive(Clone, Debug)]
pub struct DistrictRegion<S> {
    /// District id, `1..=max_districts`. Several regions may share an id.
    pub id: u32,
    /// Prepared geometry.
    pub shape: S,
}

/// Assigns every precinct the district it overlaps most.
///
/// Overlap is summed per district id, so a district split into several
/// regions competes with its total. Ties go to the lowest district id.
/// Precincts with no positive overlap get [`UNASSIGNED_DISTRICT`].
pub fn assign_districts<E: GeometryEngine>(
    engine: &E,
    precincts: &[E::Shape],
    districts: &[DistrictRegion<E::Shape>],
) -> Result<Vec<u32>, CompileError> {
    if let Some(index) = districts.iter().position(|d| d.id == UNASSIGNED_DISTRICT) {
        return Err(CompileError::ReservedDistrictId { index });
    }

    let index = SpatialIndex::bulk_load(districts.iter().map(|d| engine.envelope(&d.shape)));

    let assignment: Vec<u32> = precincts
        .iter()
        .map(|precinct| {
            let mut overlap_by_id: BTreeMap<u32, f64> = BTreeMap::new();
            for d in index.candidates(&engine.envelope(precinct)) {
                let region = &districts[d];
                let area = engine.intersection_area(precinct, &region.shape);
                if area.is_finite() && area > 0.0 {
                    *overlap_by_id.entry(region.id).or_default() += area;
                }
            }

            // Ascending id order plus strict comparison keeps the lowest id on ties.
            let mut best: Option<(u32, f64)> = None;
            for (&id, &area) in &overlap_by_id {
                if best.is_none_or(|(_, best_area)| area > best_area) {
                    best = Some((id, area));
                }
            }
            best.map_or(UNASSIGNED_DISTRICT, |(id, _)| id)
        })
        .collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "districts: {} precincts, {} regions, {} unassigned",
        precincts.len(),
        districts.len(),
        assignment.iter().filter(|&&d| d == UNASSIGNED_DISTRICT).count()
    );

    Ok(assignment)
}
