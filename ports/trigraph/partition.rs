/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Applying a solver's triangle decomposition back onto the live graph.
//!
//! Two passes over the result matrix `R`:
//! 1. Prune: drop every edge `(i, j)` that `R` does not mark.
//! 2. Color: walk vertices in index order; an unvisited vertex `i` takes the
//!    first two unvisited `j` with `R[i][j]` set, and the three edges of
//!    `{i, j1, j2}` share one random color.
//!
//! The coloring pass is greedy and never backtracks. An unlucky index order
//! can leave a vertex without a free pair even when a valid decomposition
//! exists; such vertices stay uncolored.

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

use crate::graph::{GraphEngine, Rgb};
use crate::matrix::AdjacencyMatrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PartitionError {
    #[error("solver returned a {found}-row matrix for a graph of {expected} vertices")]
    MatrixDimensionMismatch { expected: usize, found: usize },

    #[error("solver returned a {dimension}-row matrix whose rows are not all {dimension} wide")]
    MatrixNotSquare { dimension: usize },
}

/// Outcome of one `apply`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionReport {
    /// Edges removed because the result did not mark them
    pub pruned_edges: usize,

    /// Colored triples, `[i, j1, j2]` with `i` the scanning vertex
    pub triangles: Vec<[usize; 3]>,

    /// Vertices that ended the scan without a triangle
    pub uncolored_vertices: Vec<usize>,
}

/// Prunes non-triangle edges and colors each triangle
pub struct TrianglePartitioner {
    rng: StdRng,
}

impl TrianglePartitioner {
    /// Partitioner with an entropy-seeded color source
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Partitioner whose colors are reproducible
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Apply `result` to `engine`.
    ///
    /// `result` must be a square matrix with one row per live vertex;
    /// otherwise the graph is left untouched.
    pub fn apply(
        &mut self,
        engine: &mut GraphEngine,
        result: &AdjacencyMatrix,
    ) -> Result<PartitionReport, PartitionError> {
        let n = result.dimension();
        if n != engine.vertex_count() {
            return Err(PartitionError::MatrixDimensionMismatch {
                expected: engine.vertex_count(),
                found: n,
            });
        }
        if !result.is_square() {
            return Err(PartitionError::MatrixNotSquare { dimension: n });
        }

        let pruned_edges = Self::prune(engine, result);
        let (triangles, uncolored_vertices) = self.color(engine, result);
        info!(
            "Partition applied: {pruned_edges} edges pruned, {} triangles colored, {} vertices uncolored",
            triangles.len(),
            uncolored_vertices.len()
        );

        Ok(PartitionReport {
            pruned_edges,
            triangles,
            uncolored_vertices,
        })
    }

    fn prune(engine: &mut GraphEngine, result: &AdjacencyMatrix) -> usize {
        let n = result.dimension();
        engine.retain_edges(|edge| edge.start < n && edge.end < n && result.get(edge.start, edge.end))
    }

    fn color(&mut self, engine: &mut GraphEngine, result: &AdjacencyMatrix) -> (Vec<[usize; 3]>, Vec<usize>) {
        let n = result.dimension();
        let mut visited = vec![false; n];
        let mut triangles = Vec::new();

        for i in 0..n {
            if visited[i] {
                continue;
            }

            let mut partners = [0usize; 2];
            let mut found = 0;
            for j in 0..n {
                if result.get(i, j) && !visited[j] {
                    partners[found] = j;
                    found += 1;
                    if found == 2 {
                        break;
                    }
                }
            }
            if found < 2 {
                debug!("Vertex {i} has no free pair of partners");
                continue;
            }

            let [j1, j2] = partners;
            let color = Rgb::random(&mut self.rng);
            for (a, b) in [(i, j1), (i, j2), (j1, j2)] {
                if let Some(edge) = engine.find_edge(a, b) {
                    engine.set_edge_color(edge, color);
                }
            }
            visited[i] = true;
            visited[j1] = true;
            visited[j2] = true;
            triangles.push([i, j1, j2]);
        }

        let uncolored = (0..n).filter(|&v| !visited[v]).collect();
        (triangles, uncolored)
    }
}

impl Default for TrianglePartitioner {
    fn default() -> Self {
        Self::new()
    }
}
