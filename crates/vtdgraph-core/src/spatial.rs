//! R-tree over shape envelopes for candidate pruning.
//!
//! Uses `rstar` so the all-pairs stages only hand the geometry engine pairs
//! whose bounding boxes meet. Pruning never changes a result: a pair the
//! index drops cannot touch or overlap.

use rstar::{AABB, RTree, RTreeObject};

use crate::geometry::BoundingBox;

/// Index entry: position in the source slice plus its envelope.
#[derive(Debug, Clone)]
struct Entry {
    index: usize,
    bounds: AABB<[f64; 2]>,
}

impl RTreeObject for Entry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.bounds
    }
}

/// Envelope index addressed by slice position.
pub struct SpatialIndex {
    tree: RTree<Entry>,
    count: usize,
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

impl SpatialIndex {
    /// Bulk-loads envelopes; entry `i` refers to the `i`th envelope.
    pub fn bulk_load(envelopes: impl IntoIterator<Item = BoundingBox>) -> Self {
        let entries: Vec<Entry> = envelopes
            .into_iter()
            .enumerate()
            .map(|(index, bbox)| Entry {
                index,
                bounds: AABB::from_corners(bbox.min, bbox.max),
            })
            .collect();
        let count = entries.len();
        Self {
            tree: RTree::bulk_load(entries),
            count,
        }
    }

    /// Positions whose envelopes meet `bbox` (edges inclusive), ascending.
    pub fn candidates(&self, bbox: &BoundingBox) -> Vec<usize> {
        let query = AABB::from_corners(bbox.min, bbox.max);
        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&query)
            .map(|e| e.index)
            .collect();
        hits.sort_unstable();
        hits
    }

    /// Number of indexed envelopes.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
