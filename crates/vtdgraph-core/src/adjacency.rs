//! Precinct touch-graph construction.
//!
//! The builder asks the [`GeometryEngine`] about every unordered pair `(i, j)`
//! with `i < j` and records the pairs that touch. Per-node neighbor sets are
//! only built afterwards, by merging the pair list, so no worker ever mutates
//! shared state:
//!
//! 1. **Candidates** - either every `j > i` ([`CandidateStrategy::Exhaustive`])
//!    or the `j > i` whose envelopes meet row `i`'s ([`CandidateStrategy::Indexed`]).
//! 2. **Rows** - each outer index `i` yields a local `Vec<(i, j)>`. With
//!    [`parallel`](AdjacencyBuilder::parallel) enabled the rows are sharded
//!    across `rayon` workers.
//! 3. **Merge** - [`Adjacency::from_pairs`] inserts both directions of every
//!    pair into ascending `BTreeSet`s.
//!
//! Both strategies produce the same [`Adjacency`]; the index only skips pairs
//! whose envelopes are disjoint, which can never touch.

use std::collections::BTreeSet;

use rayon::prelude::*;

use crate::cancel::CancelToken;
use crate::error::CompileError;
use crate::geometry::GeometryEngine;
use crate::precinct::PrecinctId;
use crate::spatial::SpatialIndex;

/// How candidate pairs are chosen before the touch predicate runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CandidateStrategy {
    /// Every unordered pair. O(N²) predicate calls.
    Exhaustive,
    /// Only pairs whose envelopes meet, found through an R-tree.
    #[default]
    Indexed,
}

/// Symmetric neighbor sets addressed by [`PrecinctId`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Adjacency {
    neighbors: Vec<BTreeSet<PrecinctId>>,
}

impl Adjacency {
    /// Merges an explicit pair list into per-node sets.
    ///
    /// Each pair is inserted in both directions. Self-pairs are ignored.
    ///
    /// # Panics
    ///
    /// Panics if a pair names an id `>= node_count`.
    pub fn from_pairs(
        node_count: usize,
        pairs: impl IntoIterator<Item = (PrecinctId, PrecinctId)>,
    ) -> Self {
        let mut neighbors = vec![BTreeSet::new(); node_count];
        for (a, b) in pairs {
            if a == b {
                continue;
            }
            neighbors[a.as_usize()].insert(b);
            neighbors[b.as_usize()].insert(a);
        }
        Self { neighbors }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Neighbors of `id` in ascending order.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range.
    pub fn neighbors(&self, id: PrecinctId) -> &BTreeSet<PrecinctId> {
        &self.neighbors[id.as_usize()]
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Whether `j ∈ neighbors(i) ⟺ i ∈ neighbors(j)` holds for every pair.
    pub fn is_symmetric(&self) -> bool {
        self.neighbors.iter().enumerate().all(|(i, set)| {
            set.iter().all(|j| {
                self.neighbors
                    .get(j.as_usize())
                    .is_some_and(|back| back.contains(&PrecinctId::new(i as u32)))
            })
        })
    }

    /// Neighbor lists in id order, each ascending.
    pub fn to_lists(&self) -> Vec<Vec<PrecinctId>> {
        self.neighbors
            .iter()
            .map(|set| set.iter().copied().collect())
            .collect()
    }
}

/// Builds the touch-graph of a slice of prepared shapes.
#[derive(Debug)]
pub struct AdjacencyBuilder<'e, E> {
    engine: &'e E,
    strategy: CandidateStrategy,
    parallel: bool,
}

impl<'e, E: GeometryEngine> AdjacencyBuilder<'e, E> {
    /// Creates a sequential, index-pruned builder.
    pub fn new(engine: &'e E) -> Self {
        Self {
            engine,
            strategy: CandidateStrategy::default(),
            parallel: false,
        }
    }

    /// Selects the candidate strategy.
    pub fn strategy(mut self, strategy: CandidateStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Shards rows across the `rayon` thread pool when `true`.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Computes the adjacency of `shapes`, whose positions are their ids.
    ///
    /// `cancel` is polled before every row; a cancelled build returns
    /// [`CompileError::Cancelled`] and discards the partial pair list.
    pub fn build(
        &self,
        shapes: &[E::Shape],
        cancel: &CancelToken,
    ) -> Result<Adjacency, CompileError> {
        cancel.check()?;
        let n = shapes.len();
        let index = match self.strategy {
            CandidateStrategy::Exhaustive => None,
            CandidateStrategy::Indexed => Some(SpatialIndex::bulk_load(
                shapes.iter().map(|s| self.engine.envelope(s)),
            )),
        };

        let row = |i: usize| -> Result<Vec<(PrecinctId, PrecinctId)>, CompileError> {
            cancel.check()?;
            Ok(self.row_pairs(i, shapes, index.as_ref()))
        };

        let rows: Vec<Vec<(PrecinctId, PrecinctId)>> = if self.parallel {
            (0..n).into_par_iter().map(row).collect::<Result<_, _>>()?
        } else {
            (0..n).map(row).collect::<Result<_, _>>()?
        };

        let pair_count: usize = rows.iter().map(Vec::len).sum();
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "adjacency: {n} shapes, {pair_count} touching pairs ({:?}, parallel={})",
            self.strategy,
            self.parallel
        );

        let mut pairs = Vec::with_capacity(pair_count);
        for local in rows {
            pairs.extend(local);
        }
        Ok(Adjacency::from_pairs(n, pairs))
    }

    /// Touching pairs `(i, j)` with `j > i`.
    fn row_pairs(
        &self,
        i: usize,
        shapes: &[E::Shape],
        index: Option<&SpatialIndex>,
    ) -> Vec<(PrecinctId, PrecinctId)> {
        let a = &shapes[i];
        let touches = |j: &usize| self.engine.touches(a, &shapes[*j]);
        let id = |k: usize| PrecinctId::new(k as u32);

        match index {
            Some(index) => index
                .candidates(&self.engine.envelope(a))
                .into_iter()
                .filter(|&j| j > i)
                .filter(touches)
                .map(|j| (id(i), id(j)))
                .collect(),
            None => (i + 1..shapes.len())
                .filter(touches)
                .map(|j| (id(i), id(j)))
                .collect(),
        }
    }
}
