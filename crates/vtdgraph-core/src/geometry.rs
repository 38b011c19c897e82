//! Geometry boundary between the compiler and the GIS engine.
//!
//! The compiler never computes polygon predicates itself. Everything it needs
//! from computational geometry goes through [`GeometryEngine`]: preparing a
//! ring into the engine's own shape type, envelopes, areas, the "touches"
//! predicate and intersection areas.
//!
//! [`PlanarEngine`] is the bundled implementation, backed by the `geo` crate.
//! It treats coordinates as planar, which is what the census shapefiles'
//! lat/lng degrees amount to once areas only need to be compared, not reported.

use geo::line_intersection::{LineIntersection, line_intersection};
use geo::{Area, BooleanOps, Line, LineString, Polygon, Relate};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::spatial::SpatialIndex;

/// DE-9IM pattern for "boundaries share a segment, interiors are disjoint".
///
/// Plain `touches` also accepts a shared corner point; precinct adjacency
/// requires a shared edge.
const SHARED_EDGE_PATTERN: &str = "F***1****";

/// A vertex: `x` is longitude, `y` is latitude.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coord {
    /// Longitude (easting).
    pub x: f64,
    /// Latitude (northing).
    pub y: f64,
}

impl Coord {
    /// Creates a coordinate.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Latitude component.
    pub const fn lat(&self) -> f64 {
        self.y
    }

    /// Longitude component.
    pub const fn lng(&self) -> f64 {
        self.x
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Coord {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Coord> for [f64; 2] {
    fn from(c: Coord) -> Self {
        [c.x, c.y]
    }
}

/// Exterior ring of a single polygon. The closing vertex may be repeated or omitted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ring {
    vertices: Vec<Coord>,
}

impl Ring {
    /// Wraps a vertex list.
    pub fn new(vertices: Vec<Coord>) -> Self {
        Self { vertices }
    }

    /// Axis-aligned rectangle, handy for fixtures and grid layouts.
    pub fn rectangle(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(vec![
            Coord::new(min_x, min_y),
            Coord::new(max_x, min_y),
            Coord::new(max_x, max_y),
            Coord::new(min_x, max_y),
            Coord::new(min_x, min_y),
        ])
    }

    /// Vertices as stored, including any closing vertex.
    pub fn vertices(&self) -> &[Coord] {
        &self.vertices
    }

    /// Number of stored vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the ring has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of distinct vertices, ignoring repeats and the closing vertex.
    pub fn distinct_vertex_count(&self) -> usize {
        self.open_vertices().len()
    }

    /// Vertices with consecutive repeats and the closing vertex removed.
    fn open_vertices(&self) -> Vec<Coord> {
        let mut open: Vec<Coord> = Vec::with_capacity(self.vertices.len());
        for &v in &self.vertices {
            if open.last() != Some(&v) {
                open.push(v);
            }
        }
        if open.len() > 1 && open.first() == open.last() {
            open.pop();
        }
        open
    }

    /// First pair of edges `(i, j)`, `i < j`, that cross, touch or overlap
    /// anywhere other than a shared corner. Edge `k` runs from vertex `k` to
    /// vertex `k + 1` of the open ring.
    ///
    /// Neighboring edges may meet at their common vertex, and may continue
    /// in a straight line, but may not fold back over each other.
    pub fn self_intersection(&self) -> Option<(usize, usize)> {
        let open = self.open_vertices();
        let n = open.len();
        if n < 3 {
            return None;
        }
        let edges: Vec<Line<f64>> = (0..n)
            .map(|k| {
                let (a, b) = (open[k], open[(k + 1) % n]);
                Line::new((a.x, a.y), (b.x, b.y))
            })
            .collect();
        let bounds = |k: usize| {
            let mut bbox = BoundingBox::point(open[k]);
            bbox.include(open[(k + 1) % n]);
            bbox
        };
        let index = SpatialIndex::bulk_load((0..n).map(bounds));

        for i in 0..n {
            for j in index.candidates(&bounds(i)) {
                if j <= i {
                    continue;
                }
                let neighboring = j == i + 1 || (i == 0 && j == n - 1);
                match line_intersection(edges[i], edges[j]) {
                    None => {}
                    Some(LineIntersection::SinglePoint { .. }) if neighboring => {}
                    Some(_) => return Some((i, j)),
                }
            }
        }
        None
    }

    /// Bounding box of the vertices, `None` for an empty ring.
    pub fn envelope(&self) -> Option<BoundingBox> {
        let first = self.vertices.first()?;
        let mut bbox = BoundingBox::point(*first);
        for v in &self.vertices[1..] {
            bbox.include(*v);
        }
        Some(bbox)
    }
}

/// Axis-aligned bounding box. Edges are inclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Lower-left corner `[x, y]`.
    pub min: [f64; 2],
    /// Upper-right corner `[x, y]`.
    pub max: [f64; 2],
}

impl BoundingBox {
    /// Degenerate box around one point.
    pub const fn point(c: Coord) -> Self {
        Self {
            min: [c.x, c.y],
            max: [c.x, c.y],
        }
    }

    /// Grows the box to contain `c`.
    pub fn include(&mut self, c: Coord) {
        self.min[0] = self.min[0].min(c.x);
        self.min[1] = self.min[1].min(c.y);
        self.max[0] = self.max[0].max(c.x);
        self.max[1] = self.max[1].max(c.y);
    }

    /// Whether two boxes overlap or share an edge.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min[0] <= other.max[0]
            && other.min[0] <= self.max[0]
            && self.min[1] <= other.max[1]
            && other.min[1] <= self.max[1]
    }
}

/// Contract with the external computational-geometry engine.
///
/// Implementations must be deterministic: the same inputs always give the
/// same answers, whatever order pairs are asked in.
pub trait GeometryEngine: Sync {
    /// Engine-specific prepared form of a ring.
    type Shape: Send + Sync;

    /// Validates a ring and converts it into the engine's shape type.
    fn prepare(&self, ring: &Ring) -> Result<Self::Shape, GeometryError>;

    /// Bounding box of a prepared shape.
    fn envelope(&self, shape: &Self::Shape) -> BoundingBox;

    /// Area enclosed by a shape (non-negative).
    fn area(&self, shape: &Self::Shape) -> f64;

    /// Whether the shapes share a boundary segment without overlapping.
    fn touches(&self, a: &Self::Shape, b: &Self::Shape) -> bool;

    /// Area of the overlap between two shapes; 0 when disjoint or only touching.
    fn intersection_area(&self, a: &Self::Shape, b: &Self::Shape) -> f64;
}

/// [`GeometryEngine`] over planar coordinates, backed by `geo`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlanarEngine;

impl PlanarEngine {
    /// Creates the engine.
    pub const fn new() -> Self {
        Self
    }
}

/// A ring prepared by [`PlanarEngine`].
#[derive(Clone, Debug)]
pub struct PlanarShape {
    polygon: Polygon<f64>,
    envelope: BoundingBox,
    area: f64,
}

impl PlanarShape {
    /// The underlying `geo` polygon.
    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }
}

impl GeometryEngine for PlanarEngine {
    type Shape = PlanarShape;

    fn prepare(&self, ring: &Ring) -> Result<PlanarShape, GeometryError> {
        if let Some(vertex) = ring.vertices().iter().position(|v| !v.is_finite()) {
            return Err(GeometryError::NonFinite { vertex });
        }
        let count = ring.distinct_vertex_count();
        if count < 3 {
            return Err(GeometryError::TooFewVertices { count });
        }
        let Some(envelope) = ring.envelope() else {
            return Err(GeometryError::TooFewVertices { count: 0 });
        };

        let exterior: LineString<f64> = ring.vertices().iter().map(|c| (c.x, c.y)).collect();
        let polygon = Polygon::new(exterior, Vec::new());
        let area = polygon.unsigned_area();
        if area.is_nan() || area <= 0.0 {
            return Err(GeometryError::ZeroArea);
        }
        if let Some((first, second)) = ring.self_intersection() {
            return Err(GeometryError::SelfIntersecting { first, second });
        }

        Ok(PlanarShape {
            polygon,
            envelope,
            area,
        })
    }

    fn envelope(&self, shape: &PlanarShape) -> BoundingBox {
        shape.envelope
    }

    fn area(&self, shape: &PlanarShape) -> f64 {
        shape.area
    }

    fn touches(&self, a: &PlanarShape, b: &PlanarShape) -> bool {
        if !a.envelope.intersects(&b.envelope) {
            return false;
        }
        a.polygon
            .relate(&b.polygon)
            .matches(SHARED_EDGE_PATTERN)
            .unwrap_or(false)
    }

    fn intersection_area(&self, a: &PlanarShape, b: &PlanarShape) -> f64 {
        if !a.envelope.intersects(&b.envelope) {
            return 0.0;
        }
        a.polygon.intersection(&b.polygon).unsigned_area()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: f64, y: f64) -> PlanarShape {
        PlanarEngine
            .prepare(&Ring::rectangle(x, y, x + 1.0, y + 1.0))
            .unwrap()
    }

    #[test]
    fn shared_edge_touches() {
        let engine = PlanarEngine::new();
        assert!(engine.touches(&square(0.0, 0.0), &square(1.0, 0.0)));
        assert!(engine.touches(&square(0.0, 0.0), &square(0.0, -1.0)));
    }

    #[test]
    fn shared_corner_does_not_touch() {
        let engine = PlanarEngine::new();
        assert!(!engine.touches(&square(0.0, 0.0), &square(1.0, 1.0)));
    }

    #[test]
    fn overlap_does_not_touch() {
        let engine = PlanarEngine::new();
        let a = square(0.0, 0.0);
        let b = square(0.5, 0.0);
        assert!(!engine.touches(&a, &b));
        assert!((engine.intersection_area(&a, &b) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn disjoint_has_zero_overlap() {
        let engine = PlanarEngine::new();
        assert_eq!(
            engine.intersection_area(&square(0.0, 0.0), &square(5.0, 5.0)),
            0.0
        );
    }

    #[test]
    fn touching_has_zero_overlap() {
        let engine = PlanarEngine::new();
        let overlap = engine.intersection_area(&square(0.0, 0.0), &square(1.0, 0.0));
        assert!(overlap.abs() < 1e-12);
    }

    #[test]
    fn area_and_envelope() {
        let engine = PlanarEngine::new();
        let shape = engine.prepare(&Ring::rectangle(1.0, 2.0, 4.0, 4.0)).unwrap();
        assert_eq!(engine.area(&shape), 6.0);
        let bbox = engine.envelope(&shape);
        assert_eq!(bbox.min, [1.0, 2.0]);
        assert_eq!(bbox.max, [4.0, 4.0]);
    }

    #[test]
    fn rejects_degenerate_rings() {
        let engine = PlanarEngine::new();

        let two = Ring::new(vec![Coord::new(0.0, 0.0), Coord::new(1.0, 1.0)]);
        assert_eq!(
            engine.prepare(&two).unwrap_err(),
            GeometryError::TooFewVertices { count: 2 }
        );

        let closed_triangle_with_repeat = Ring::new(vec![
            Coord::new(0.0, 0.0),
            Coord::new(0.0, 0.0),
            Coord::new(1.0, 0.0),
            Coord::new(0.0, 0.0),
        ]);
        assert!(matches!(
            engine.prepare(&closed_triangle_with_repeat),
            Err(GeometryError::TooFewVertices { count: 2 })
        ));

        let collinear = Ring::new(vec![
            Coord::new(0.0, 0.0),
            Coord::new(1.0, 0.0),
            Coord::new(2.0, 0.0),
        ]);
        assert_eq!(engine.prepare(&collinear).unwrap_err(), GeometryError::ZeroArea);

        let nan = Ring::new(vec![
            Coord::new(0.0, 0.0),
            Coord::new(f64::NAN, 0.0),
            Coord::new(1.0, 1.0),
        ]);
        assert_eq!(
            engine.prepare(&nan).unwrap_err(),
            GeometryError::NonFinite { vertex: 1 }
        );
    }

    #[test]
    fn rejects_self_intersecting_rings() {
        let engine = PlanarEngine::new();

        let bowtie = Ring::new(vec![
            Coord::new(0.0, 0.0),
            Coord::new(2.0, 2.0),
            Coord::new(2.0, 0.0),
            Coord::new(0.0, 3.0),
            Coord::new(0.0, 0.0),
        ]);
        assert_eq!(
            engine.prepare(&bowtie).unwrap_err(),
            GeometryError::SelfIntersecting { first: 0, second: 2 }
        );

        // Edge 3 doubles back over edge 2 and runs past its start.
        let spike = Ring::new(vec![
            Coord::new(0.0, 0.0),
            Coord::new(2.0, 0.0),
            Coord::new(2.0, 2.0),
            Coord::new(1.0, 2.0),
            Coord::new(3.0, 2.0),
            Coord::new(0.0, 2.0),
        ]);
        assert!(matches!(
            engine.prepare(&spike),
            Err(GeometryError::SelfIntersecting { .. })
        ));

        // Ring passes through one of its own vertices.
        let pinched = Ring::new(vec![
            Coord::new(0.0, 0.0),
            Coord::new(4.0, 0.0),
            Coord::new(4.0, 4.0),
            Coord::new(2.0, 0.0),
            Coord::new(0.0, 4.0),
        ]);
        assert!(matches!(
            engine.prepare(&pinched),
            Err(GeometryError::SelfIntersecting { .. })
        ));
    }

    #[test]
    fn collinear_vertices_are_simple() {
        let engine = PlanarEngine::new();
        let ring = Ring::new(vec![
            Coord::new(0.0, 0.0),
            Coord::new(1.0, 0.0),
            Coord::new(2.0, 0.0),
            Coord::new(2.0, 1.0),
            Coord::new(2.0, 2.0),
            Coord::new(0.0, 2.0),
        ]);
        assert_eq!(ring.self_intersection(), None);
        assert_eq!(engine.area(&engine.prepare(&ring).unwrap()), 4.0);
    }

    #[test]
    fn bounding_boxes_sharing_an_edge_intersect() {
        let a = Ring::rectangle(0.0, 0.0, 1.0, 1.0).envelope().unwrap();
        let b = Ring::rectangle(1.0, 0.0, 2.0, 1.0).envelope().unwrap();
        let c = Ring::rectangle(2.5, 0.0, 3.0, 1.0).envelope().unwrap();
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn coord_serializes_as_pair() {
        let json = serde_json::to_string(&Coord::new(-93.5, 41.9)).unwrap();
        assert_eq!(json, "[-93.5,41.9]");
        let ring: Ring = serde_json::from_str("[[0,0],[1,0],[1,1]]").unwrap();
        assert_eq!(ring.distinct_vertex_count(), 3);
    }
}
