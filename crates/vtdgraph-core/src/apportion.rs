//! Area-weighted apportionment of source demographics onto precincts.
//!
//! Census counts arrive per tract (or block group), not per precinct. Each
//! target precinct receives, for every attribute,
//!
//! ```text
//! Σ over overlapping sources  (overlapArea / sourceArea) × sourceValue
//! ```
//!
//! accumulated in `f64` and rounded to the nearest integer exactly once,
//! after the sum is complete. Overlap areas come from the [`GeometryEngine`];
//! this module only does the bookkeeping.
//!
//! Sources that overlap no target, and targets that no source overlaps, are
//! not errors. They are counted in an [`ApportionmentReport`] and logged as a
//! warning so the population that fell through the cracks can be reviewed.

use crate::geometry::GeometryEngine;
use crate::precinct::Demographics;
use crate::spatial::SpatialIndex;

/// A region carrying known demographics, e.g. a census tract.
#[derive(Clone, Debug)]
pub struct SourceRegion<S> {
    /// Prepared geometry.
    pub shape: S,
    /// Counts to distribute.
    pub demographics: Demographics,
}

/// Regions that did not take part in apportionment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApportionmentReport {
    /// Sources that overlap no target.
    pub unmatched_sources: usize,
    /// Total population of those sources.
    pub unmatched_source_population: u64,
    /// Targets that no source overlaps.
    pub unmatched_targets: usize,
}

impl ApportionmentReport {
    /// Whether every source and target matched something.
    pub fn is_clean(&self) -> bool {
        self.unmatched_sources == 0 && self.unmatched_targets == 0
    }
}

/// Result of [`apportion`].
#[derive(Clone, Debug, PartialEq)]
pub struct Apportionment {
    /// Apportioned counts, one per target in input order.
    pub per_target: Vec<Demographics>,
    /// Unmatched-region summary.
    pub report: ApportionmentReport,
}

/// Distributes `sources` onto `targets` by overlap area.
pub fn apportion<E: GeometryEngine>(
    engine: &E,
    targets: &[E::Shape],
    sources: &[SourceRegion<E::Shape>],
) -> Apportionment {
    let index = SpatialIndex::bulk_load(targets.iter().map(|t| engine.envelope(t)));
    let mut sums = vec![[0.0f64; Demographics::FIELD_COUNT]; targets.len()];
    let mut target_matched = vec![false; targets.len()];
    let mut report = ApportionmentReport::default();

    for source in sources {
        let source_area = engine.area(&source.shape);
        let values = source.demographics.to_array();
        let mut matched = false;

        if source_area.is_finite() && source_area > 0.0 {
            for t in index.candidates(&engine.envelope(&source.shape)) {
                let overlap = engine.intersection_area(&targets[t], &source.shape);
                if !overlap.is_finite() || overlap <= 0.0 {
                    continue;
                }
                let share = overlap.min(source_area) / source_area;
                for (sum, &value) in sums[t].iter_mut().zip(&values) {
                    *sum += share * value as f64;
                }
                matched = true;
                target_matched[t] = true;
            }
        }

        if !matched {
            report.unmatched_sources += 1;
            report.unmatched_source_population = report
                .unmatched_source_population
                .saturating_add(source.demographics.total);
        }
    }
    report.unmatched_targets = target_matched.iter().filter(|m| !**m).count();

    #[cfg(feature = "tracing")]
    if !report.is_clean() {
        tracing::warn!(
            unmatched_sources = report.unmatched_sources,
            unmatched_population = report.unmatched_source_population,
            unmatched_targets = report.unmatched_targets,
            "apportionment left regions unmatched"
        );
    }

    let per_target = sums
        .into_iter()
        .map(|sum| Demographics::from_array(sum.map(round_count)))
        .collect();

    Apportionment { per_target, report }
}

/// Rounds a finished sum half away from zero.
fn round_count(sum: f64) -> u64 {
    if sum.is_finite() && sum > 0.0 {
        sum.round() as u64
    } else {
        0
    }
}
