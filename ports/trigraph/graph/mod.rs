/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Graph state engine.
//!
//! Core structures:
//! - `GraphEngine`: owns the vertex and edge stores and performs every mutation
//! - `Vertex`: positioned disc, identified by its dense index
//! - `Edge`: unordered pair of distinct vertex indices with a display color
//!
//! Every edge endpoint is kept `< vertex_count()` after each mutation. Deleting
//! a vertex shifts all higher vertex indices down by one, and the engine
//! rewrites surviving edge endpoints to match.

use std::fmt;

use euclid::default::Point2D;
use log::{debug, warn};
use rand::Rng;
use thiserror::Error;

use crate::history::snapshot::GraphSnapshot;
use crate::matrix::AdjacencyMatrix;

pub mod spatial;
pub mod store;

pub use store::{EdgeStore, VertexStore};

/// 8-bit RGB display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Draw a uniformly random color
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(
            rng.gen_range(0..=255),
            rng.gen_range(0..=255),
            rng.gen_range(0..=255),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// A vertex: a disc in scene coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Center of the disc
    pub position: Point2D<f64>,

    /// Disc radius, also the hit-test radius
    pub radius: f64,
}

impl Vertex {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            position: Point2D::new(x, y),
            radius,
        }
    }

    /// Whether `point` lies inside or on the disc
    pub fn contains(&self, point: Point2D<f64>) -> bool {
        (point - self.position).length() <= self.radius
    }
}

/// An undirected edge between two distinct vertex indices.
///
/// `start`/`end` keep the order the edge was created in; lookups ignore it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub start: usize,
    pub end: usize,
    pub color: Rgb,
}

impl Edge {
    pub fn new(start: usize, end: usize, color: Rgb) -> Self {
        Self { start, end, color }
    }

    /// Whether this edge joins `a` and `b` in either order
    pub fn connects(&self, a: usize, b: usize) -> bool {
        (self.start == a && self.end == b) || (self.start == b && self.end == a)
    }

    /// Whether `vertex` is one of the endpoints
    pub fn touches(&self, vertex: usize) -> bool {
        self.start == vertex || self.end == vertex
    }
}

/// Rejections from edge creation. Neither variant changes graph state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EdgeError {
    #[error("cannot connect vertex {start} to vertex {end} in a graph of {vertex_count} vertices")]
    InvalidEndpoints {
        start: usize,
        end: usize,
        vertex_count: usize,
    },

    #[error("vertices {start} and {end} are already connected by edge {existing}")]
    EdgeExists {
        start: usize,
        end: usize,
        existing: usize,
    },
}

/// Hooks for the rendering collaborator, invoked while a snapshot is restored.
///
/// All methods default to no-ops.
pub trait SceneObserver {
    /// The live scene was emptied ahead of a restore
    fn scene_cleared(&mut self) {}

    /// A vertex was materialized at `index`; drag handling should be set up again
    fn vertex_restored(&mut self, _index: usize, _vertex: &Vertex) {}

    /// An edge was materialized at `index`
    fn edge_restored(&mut self, _index: usize, _edge: &Edge) {}
}

impl SceneObserver for () {}

/// Owner of all vertex and edge state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphEngine {
    vertices: VertexStore,
    edges: EdgeStore,
}

impl GraphEngine {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex; the returned index equals the previous vertex count
    pub fn add_vertex(&mut self, x: f64, y: f64, radius: f64) -> usize {
        let index = self.vertices.push(Vertex::new(x, y, radius));
        debug!("Added vertex {index} at ({x}, {y})");
        index
    }

    /// Remove a vertex with its incident edges and close the index gap.
    ///
    /// Returns false, changing nothing, when `index` is out of range.
    pub fn delete_vertex(&mut self, index: usize) -> bool {
        if self.vertices.remove(index).is_none() {
            return false;
        }
        let removed_edges = self.edges.detach_vertex(index);
        debug!("Deleted vertex {index} and {removed_edges} incident edges");
        true
    }

    /// Move a vertex. Callers refresh drawn geometry via `edges_incident`.
    pub fn move_vertex(&mut self, index: usize, x: f64, y: f64) -> bool {
        match self.vertices.get_mut(index) {
            Some(vertex) => {
                vertex.position = Point2D::new(x, y);
                true
            },
            None => false,
        }
    }

    /// Give every vertex the same radius
    pub fn resize_all_vertices(&mut self, radius: f64) {
        for vertex in self.vertices.iter_mut() {
            vertex.radius = radius;
        }
    }

    /// Connect `a` and `b` with a black edge
    pub fn add_edge(&mut self, a: usize, b: usize) -> Result<usize, EdgeError> {
        self.add_edge_with_color(a, b, Rgb::BLACK)
    }

    /// Connect `a` and `b`, keeping that endpoint order in storage
    pub fn add_edge_with_color(&mut self, a: usize, b: usize, color: Rgb) -> Result<usize, EdgeError> {
        self.check_endpoints(a, b)?;
        if let Some(existing) = self.edges.find(a, b) {
            return Err(EdgeError::EdgeExists {
                start: a,
                end: b,
                existing,
            });
        }
        let index = self.edges.push(Edge::new(a, b, color));
        debug!("Added edge {index} between {a} and {b}");
        Ok(index)
    }

    /// Validate a prospective edge without creating it
    pub fn check_endpoints(&self, a: usize, b: usize) -> Result<(), EdgeError> {
        let vertex_count = self.vertex_count();
        if a == b || a >= vertex_count || b >= vertex_count {
            return Err(EdgeError::InvalidEndpoints {
                start: a,
                end: b,
                vertex_count,
            });
        }
        Ok(())
    }

    /// Order-independent membership test
    pub fn edge_exists(&self, a: usize, b: usize) -> bool {
        self.edges.find(a, b).is_some()
    }

    /// Index of the edge joining `a` and `b`, in either order
    pub fn find_edge(&self, a: usize, b: usize) -> Option<usize> {
        self.edges.find(a, b)
    }

    /// Indices of edges touching `index`
    pub fn edges_incident(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges.incident(index)
    }

    /// Recolor one edge; false if `edge_index` is out of range
    pub fn set_edge_color(&mut self, edge_index: usize, color: Rgb) -> bool {
        match self.edges.get_mut(edge_index) {
            Some(edge) => {
                edge.color = color;
                true
            },
            None => false,
        }
    }

    /// Keep only edges matching `keep`; returns the number removed
    pub fn retain_edges<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&Edge) -> bool,
    {
        self.edges.retain(keep)
    }

    /// Remove every vertex and edge
    pub fn clear(&mut self) {
        self.edges.clear();
        self.vertices.clear();
    }

    /// Symmetric adjacency matrix over the current vertex indices
    pub fn build_adjacency_matrix(&self) -> AdjacencyMatrix {
        let mut matrix = AdjacencyMatrix::new(self.vertex_count());
        for edge in self.edges.iter() {
            matrix.connect(edge.start, edge.end);
        }
        matrix
    }

    /// Replace the whole graph with the contents of `snapshot`.
    ///
    /// Edges whose endpoints do not fit the restored vertex set are skipped.
    /// Returns the number of skipped edges.
    pub fn restore(&mut self, snapshot: &GraphSnapshot, observer: &mut dyn SceneObserver) -> usize {
        self.clear();
        observer.scene_cleared();

        for vertex in snapshot.vertices() {
            let index = self.vertices.push(*vertex);
            observer.vertex_restored(index, vertex);
        }

        let vertex_count = self.vertex_count();
        let mut skipped = 0;
        for edge in snapshot.edges() {
            if edge.start >= vertex_count || edge.end >= vertex_count || edge.start == edge.end {
                warn!(
                    "Skipping edge ({}, {}) while restoring a graph of {vertex_count} vertices",
                    edge.start, edge.end
                );
                skipped += 1;
                continue;
            }
            let index = self.edges.push(*edge);
            observer.edge_restored(index, edge);
        }
        skipped
    }

    pub fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    pub fn edge(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    pub fn vertices(&self) -> &[Vertex] {
        self.vertices.as_slice()
    }

    pub fn edges(&self) -> &[Edge] {
        self.edges.as_slice()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use proptest::collection::vec;
    use proptest::prelude::{Just, Strategy, prop_assert, prop_assert_eq, prop_oneof, proptest};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn assert_endpoints_valid(engine: &GraphEngine) {
        for edge in engine.edges() {
            assert!(edge.start < engine.vertex_count());
            assert!(edge.end < engine.vertex_count());
            assert_ne!(edge.start, edge.end);
        }
    }

    fn pairs(engine: &GraphEngine) -> Vec<(usize, usize)> {
        engine.edges().iter().map(|e| (e.start, e.end)).collect()
    }

    fn path_graph(n: usize) -> GraphEngine {
        let mut engine = GraphEngine::new();
        for i in 0..n {
            engine.add_vertex(i as f64 * 10.0, 0.0, 10.0);
        }
        for i in 1..n {
            engine.add_edge(i - 1, i).unwrap();
        }
        engine
    }

    #[test]
    fn test_graph_new() {
        let engine = GraphEngine::new();
        assert_eq!(engine.vertex_count(), 0);
        assert_eq!(engine.edge_count(), 0);
        assert!(engine.is_empty());
    }

    #[test]
    fn test_add_vertex_returns_previous_count() {
        let mut engine = GraphEngine::new();
        assert_eq!(engine.add_vertex(1.0, 2.0, 10.0), 0);
        assert_eq!(engine.add_vertex(3.0, 4.0, 10.0), 1);

        let vertex = engine.vertex(1).unwrap();
        assert_eq!(vertex.position.x, 3.0);
        assert_eq!(vertex.position.y, 4.0);
        assert_eq!(vertex.radius, 10.0);
    }

    #[test]
    fn test_delete_vertex_removes_incident_and_reindexes() {
        let mut engine = GraphEngine::new();
        for i in 0..5 {
            engine.add_vertex(i as f64, 0.0, 10.0);
        }
        engine.add_edge(0, 1).unwrap();
        engine.add_edge(2, 1).unwrap();
        engine.add_edge(3, 4).unwrap();
        engine.add_edge(4, 0).unwrap();
        engine.add_edge(2, 3).unwrap();

        assert!(engine.delete_vertex(1));

        assert_eq!(engine.vertex_count(), 4);
        assert_eq!(pairs(&engine), vec![(2, 3), (3, 0), (1, 2)]);
        assert_eq!(engine.vertex(1).unwrap().position.x, 2.0);
        assert_endpoints_valid(&engine);
    }

    #[test]
    fn test_delete_vertex_out_of_range_is_noop() {
        let mut engine = path_graph(3);
        let before = engine.clone();

        assert!(!engine.delete_vertex(3));
        assert!(!engine.delete_vertex(100));
        assert_eq!(engine, before);
    }

    #[test]
    fn test_endpoints_stay_valid_across_deletions() {
        let mut engine = GraphEngine::new();
        for i in 0..9 {
            engine.add_vertex(i as f64, i as f64, 10.0);
        }
        for a in 0..9 {
            for b in (a + 1)..9 {
                if (a + b) % 3 != 0 {
                    engine.add_edge(a, b).unwrap();
                }
            }
        }

        for index in [4, 0, 6, 2, 10, 1] {
            let incident = engine.edges_incident(index).count();
            let edges_before = engine.edge_count();
            let deleted = engine.delete_vertex(index);
            assert_endpoints_valid(&engine);
            if deleted {
                assert_eq!(engine.edge_count(), edges_before - incident);
            } else {
                assert_eq!(engine.edge_count(), edges_before);
            }
        }
        assert_eq!(engine.vertex_count(), 4);
    }

    #[test]
    fn test_delete_keeps_every_surviving_pair() {
        let mut engine = GraphEngine::new();
        for i in 0..6 {
            engine.add_vertex(i as f64, 0.0, 10.0);
        }
        for (a, b) in [(0, 5), (1, 4), (2, 3), (5, 3), (2, 0)] {
            engine.add_edge(a, b).unwrap();
        }

        engine.delete_vertex(2);

        // Edges touching 2 are gone; the rest survive with endpoints > 2 shifted.
        assert_eq!(pairs(&engine), vec![(0, 4), (1, 3), (4, 2)]);
    }

    #[test]
    fn test_add_edge_reverse_reports_exists() {
        let mut engine = path_graph(2);
        let result = engine.add_edge(1, 0);
        assert_eq!(
            result,
            Err(EdgeError::EdgeExists {
                start: 1,
                end: 0,
                existing: 0
            })
        );
        assert_eq!(engine.edge_count(), 1);
    }

    #[test]
    fn test_add_edge_invalid_endpoints() {
        let mut engine = path_graph(2);
        assert!(matches!(
            engine.add_edge(0, 0),
            Err(EdgeError::InvalidEndpoints { .. })
        ));
        assert!(matches!(
            engine.add_edge(0, 2),
            Err(EdgeError::InvalidEndpoints { vertex_count: 2, .. })
        ));
        assert_eq!(engine.edge_count(), 1);
    }

    #[test]
    fn test_add_edge_preserves_stored_order() {
        let mut engine = path_graph(3);
        let index = engine.add_edge(2, 0).unwrap();
        let edge = engine.edge(index).unwrap();
        assert_eq!((edge.start, edge.end), (2, 0));
        assert_eq!(edge.color, Rgb::BLACK);
        assert!(engine.edge_exists(0, 2));
        assert_eq!(engine.find_edge(0, 2), Some(index));
    }

    #[test]
    fn test_move_vertex_and_incident_edges() {
        let mut engine = path_graph(4);
        assert!(engine.move_vertex(1, 50.0, 60.0));
        assert!(!engine.move_vertex(9, 0.0, 0.0));

        let vertex = engine.vertex(1).unwrap();
        assert_eq!(vertex.position, Point2D::new(50.0, 60.0));

        let incident: Vec<usize> = engine.edges_incident(1).collect();
        assert_eq!(incident, vec![0, 1]);
    }

    #[test]
    fn test_resize_all_vertices() {
        let mut engine = path_graph(3);
        engine.resize_all_vertices(25.0);
        assert!(engine.vertices().iter().all(|v| v.radius == 25.0));
    }

    #[test]
    fn test_set_edge_color() {
        let mut engine = path_graph(3);
        let red = Rgb::new(255, 0, 0);
        assert!(engine.set_edge_color(1, red));
        assert!(!engine.set_edge_color(7, red));
        assert_eq!(engine.edge(1).unwrap().color, red);
        assert_eq!(engine.edge(0).unwrap().color, Rgb::BLACK);
    }

    #[test]
    fn test_build_adjacency_matrix_is_symmetric() {
        let mut engine = path_graph(4);
        engine.add_edge(3, 0).unwrap();

        let matrix = engine.build_adjacency_matrix();
        assert_eq!(matrix.dimension(), 4);
        assert!(matrix.is_symmetric());
        assert!(matrix.get(0, 3) && matrix.get(3, 0));
        assert!(matrix.get(1, 2) && matrix.get(2, 1));
        assert!(!matrix.get(0, 2));
        for i in 0..4 {
            assert!(!matrix.get(i, i));
        }
    }

    #[test]
    fn test_restore_skips_corrupt_edges() {
        let snapshot = GraphSnapshot::from_parts(
            vec![Vertex::new(0.0, 0.0, 10.0), Vertex::new(5.0, 5.0, 10.0)],
            vec![
                Edge::new(0, 1, Rgb::new(1, 2, 3)),
                Edge::new(1, 4, Rgb::BLACK),
                Edge::new(1, 1, Rgb::BLACK),
            ],
        );

        #[derive(Default)]
        struct Recorder {
            cleared: usize,
            vertices: Vec<usize>,
            edges: Vec<usize>,
        }

        impl SceneObserver for Recorder {
            fn scene_cleared(&mut self) {
                self.cleared += 1;
            }
            fn vertex_restored(&mut self, index: usize, _vertex: &Vertex) {
                self.vertices.push(index);
            }
            fn edge_restored(&mut self, index: usize, _edge: &Edge) {
                self.edges.push(index);
            }
        }

        let mut engine = path_graph(5);
        let mut recorder = Recorder::default();
        let skipped = engine.restore(&snapshot, &mut recorder);

        assert_eq!(skipped, 2);
        assert_eq!(engine.vertex_count(), 2);
        assert_eq!(pairs(&engine), vec![(0, 1)]);
        assert_eq!(engine.edge(0).unwrap().color, Rgb::new(1, 2, 3));
        assert_eq!(recorder.cleared, 1);
        assert_eq!(recorder.vertices, vec![0, 1]);
        assert_eq!(recorder.edges, vec![0]);
    }

    #[test]
    fn test_clear() {
        let mut engine = path_graph(4);
        engine.clear();
        assert!(engine.is_empty());
        assert_eq!(engine.edge_count(), 0);
    }

    #[test]
    fn test_random_color_is_deterministic_for_seed() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        assert_eq!(Rgb::random(&mut a), Rgb::random(&mut b));
    }

    #[test]
    fn test_rgb_display() {
        assert_eq!(Rgb::new(255, 16, 0).to_string(), "#ff1000");
        assert_eq!(Rgb::BLACK.to_string(), "#000000");
    }

    #[derive(Debug, Clone)]
    enum Edit {
        AddVertex,
        AddEdge(usize, usize),
        DeleteVertex(usize),
    }

    /// Indices range past the live vertex count so rejected edges and
    /// out-of-range deletes are generated too.
    fn edit() -> impl Strategy<Value = Edit> {
        prop_oneof![
            2 => Just(Edit::AddVertex),
            3 => (0usize..12, 0usize..12).prop_map(|(a, b)| Edit::AddEdge(a, b)),
            1 => (0usize..14).prop_map(Edit::DeleteVertex),
        ]
    }

    proptest! {
        #[test]
        fn test_edit_sequences_keep_endpoints_valid(edits in vec(edit(), 0..80)) {
            let mut engine = GraphEngine::new();

            for step in edits {
                match step {
                    Edit::AddVertex => {
                        let expected = engine.vertex_count();
                        prop_assert_eq!(engine.add_vertex(expected as f64, 0.0, 10.0), expected);
                    },
                    Edit::AddEdge(a, b) => {
                        let before = engine.edge_count();
                        let added = engine.add_edge(a, b).is_ok();
                        prop_assert_eq!(engine.edge_count(), before + usize::from(added));
                    },
                    Edit::DeleteVertex(v) => {
                        let in_range = v < engine.vertex_count();
                        let vertices_before = engine.vertex_count();
                        let shift = |i: usize| if i > v { i - 1 } else { i };
                        let survivors: Vec<(usize, usize)> = pairs(&engine)
                            .into_iter()
                            .filter(|&(a, b)| !in_range || (a != v && b != v))
                            .map(|(a, b)| if in_range { (shift(a), shift(b)) } else { (a, b) })
                            .collect();

                        prop_assert_eq!(engine.delete_vertex(v), in_range);
                        prop_assert_eq!(
                            engine.vertex_count(),
                            vertices_before - usize::from(in_range)
                        );
                        prop_assert_eq!(pairs(&engine), survivors);
                    },
                }

                let mut seen = HashSet::new();
                for edge in engine.edges() {
                    prop_assert!(edge.start < engine.vertex_count());
                    prop_assert!(edge.end < engine.vertex_count());
                    prop_assert!(edge.start != edge.end);
                    prop_assert!(seen.insert((edge.start.min(edge.end), edge.start.max(edge.end))));
                }
            }
        }
    }
}
