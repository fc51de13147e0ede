/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Application state for the triangle-partition editor.
//!
//! `TrigraphApp` is the only place that mutates the graph on behalf of the
//! user, so it is also the only place that records undo history.

use euclid::default::Point2D;
use log::{debug, info, warn};
use thiserror::Error;

use crate::config::{TrigraphConfig, VertexConfig};
use crate::graph::{EdgeError, GraphEngine, SceneObserver};
use crate::history::SnapshotHistory;
use crate::history::snapshot::GraphSnapshot;
use crate::partition::{PartitionError, PartitionReport, TrianglePartitioner};
use crate::solver::{PartitionSolver, ProcessSolver, SolverError};

/// Where a solve currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStage {
    Idle,

    /// Adjacency matrix of the live graph handed to the solver
    MatrixExported,

    /// Waiting on the solver
    SolverRunning,

    /// Solver answer decoded into a matrix
    ResultDecoded,

    /// Non-triangle edges removed and triangles colored
    PrunedAndColored,
}

/// Progress of the two-click edge gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeSelection {
    NoSelection,

    /// First endpoint chosen, waiting for the second
    PendingEndpoint(usize),
}

#[derive(Debug, Error)]
pub enum SolveError {
    #[error("vertex count must be a multiple of 3, current count: {count}")]
    VertexCountNotMultipleOfThree { count: usize },

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Partition(#[from] PartitionError),
}

/// Main application state
pub struct TrigraphApp {
    graph: GraphEngine,
    history: SnapshotHistory,
    partitioner: TrianglePartitioner,
    solver: Box<dyn PartitionSolver>,

    /// Notified when undo/redo rebuilds the scene
    observer: Box<dyn SceneObserver>,

    vertex_config: VertexConfig,

    /// Radius given to new vertices
    vertex_radius: f64,

    selection: EdgeSelection,
    solve_stage: SolveStage,
}

impl TrigraphApp {
    /// Create an app that runs the configured external solver
    pub fn new(config: &TrigraphConfig) -> Self {
        Self::with_solver(config, ProcessSolver::from_config(&config.solver))
    }

    /// Create an app around any solver strategy
    pub fn with_solver(config: &TrigraphConfig, solver: impl PartitionSolver + 'static) -> Self {
        let partitioner = match config.color_seed {
            Some(seed) => TrianglePartitioner::with_seed(seed),
            None => TrianglePartitioner::new(),
        };
        let vertex_radius = config.vertex.clamp_radius(config.vertex.default_radius);

        Self {
            graph: GraphEngine::new(),
            history: SnapshotHistory::new(config.history_depth),
            partitioner,
            solver: Box::new(solver),
            observer: Box::new(()),
            vertex_config: config.vertex.clone(),
            vertex_radius,
            selection: EdgeSelection::NoSelection,
            solve_stage: SolveStage::Idle,
        }
    }

    /// Replace the observer told about undo/redo rebuilds
    pub fn set_observer(&mut self, observer: impl SceneObserver + 'static) {
        self.observer = Box::new(observer);
    }

    /// App whose solver echoes the exported matrix back
    #[cfg(test)]
    pub(crate) fn new_for_testing() -> Self {
        let config = TrigraphConfig {
            color_seed: Some(7),
            ..TrigraphConfig::default()
        };
        Self::with_solver(&config, |matrix: &crate::matrix::AdjacencyMatrix| {
            Ok::<_, SolverError>(matrix.clone())
        })
    }

    pub fn graph(&self) -> &GraphEngine {
        &self.graph
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    pub fn selection(&self) -> EdgeSelection {
        self.selection
    }

    pub(crate) fn set_selection(&mut self, selection: EdgeSelection) {
        self.selection = selection;
    }

    pub fn solve_stage(&self) -> SolveStage {
        self.solve_stage
    }

    pub fn vertex_radius(&self) -> f64 {
        self.vertex_radius
    }

    /// Place a vertex at `point` with the current radius.
    /// Points with a non-finite coordinate are refused.
    pub fn add_vertex_at(&mut self, point: Point2D<f64>) -> Option<usize> {
        if !is_finite(point) {
            warn!("Refusing to place a vertex at ({}, {})", point.x, point.y);
            return None;
        }
        self.history.save_state(&self.graph);
        self.selection = EdgeSelection::NoSelection;
        Some(self.graph.add_vertex(point.x, point.y, self.vertex_radius))
    }

    /// Delete a vertex and its edges. Out-of-range indices change nothing.
    pub fn delete_vertex(&mut self, index: usize) -> bool {
        if self.graph.vertex(index).is_none() {
            return false;
        }
        self.history.save_state(&self.graph);
        self.selection = EdgeSelection::NoSelection;
        self.graph.delete_vertex(index)
    }

    /// Start dragging a vertex; the whole drag is one undo step
    pub fn begin_vertex_drag(&mut self, index: usize) -> bool {
        if self.graph.vertex(index).is_none() {
            return false;
        }
        self.history.save_state(&self.graph);
        true
    }

    /// Move a vertex mid-drag, returning the edges that need redrawing
    pub fn drag_vertex(&mut self, index: usize, point: Point2D<f64>) -> Vec<usize> {
        if !is_finite(point) || !self.graph.move_vertex(index, point.x, point.y) {
            return Vec::new();
        }
        self.graph.edges_incident(index).collect()
    }

    /// Connect two vertices. Rejected edges leave no history entry.
    pub fn connect(&mut self, a: usize, b: usize) -> Result<usize, EdgeError> {
        let before = GraphSnapshot::capture(&self.graph);
        let index = self.graph.add_edge(a, b)?;
        self.history.record(before);
        self.selection = EdgeSelection::NoSelection;
        Ok(index)
    }

    /// Resize every vertex, clamped to the configured bounds.
    /// The applied radius is also used for vertices placed afterwards.
    /// Non-finite radii are refused and change nothing.
    pub fn set_vertex_radius(&mut self, radius: f64) -> Option<f64> {
        if !radius.is_finite() {
            warn!("Refusing vertex radius {radius}");
            return None;
        }
        let radius = self.vertex_config.clamp_radius(radius);
        self.history.save_state(&self.graph);
        self.graph.resize_all_vertices(radius);
        self.vertex_radius = radius;
        Some(radius)
    }

    pub fn clear_scene(&mut self) {
        self.history.save_state(&self.graph);
        self.selection = EdgeSelection::NoSelection;
        self.graph.clear();
    }

    pub fn undo(&mut self) -> bool {
        self.selection = EdgeSelection::NoSelection;
        self.history.undo_with(&mut self.graph, &mut *self.observer)
    }

    pub fn redo(&mut self) -> bool {
        self.selection = EdgeSelection::NoSelection;
        self.history.redo_with(&mut self.graph, &mut *self.observer)
    }

    /// Ask the solver for a triangle partition and apply it.
    ///
    /// The graph is snapshotted before anything is exported, so a single
    /// undo returns to the pre-solve state. On failure the graph is left as
    /// it was and the snapshot stays on the undo stack.
    pub fn solve(&mut self) -> Result<PartitionReport, SolveError> {
        let count = self.graph.vertex_count();
        if count % 3 != 0 {
            return Err(SolveError::VertexCountNotMultipleOfThree { count });
        }

        self.history.save_state(&self.graph);
        self.selection = EdgeSelection::NoSelection;

        let result = self.run_solve();
        if let Err(e) = &result {
            warn!("Solve failed during {:?}: {e}", self.solve_stage);
        }
        self.set_stage(SolveStage::Idle);
        result
    }

    fn run_solve(&mut self) -> Result<PartitionReport, SolveError> {
        let matrix = self.graph.build_adjacency_matrix();
        self.solver.export(&matrix)?;
        self.set_stage(SolveStage::MatrixExported);

        self.set_stage(SolveStage::SolverRunning);
        let result = self.solver.run(&matrix)?;
        self.set_stage(SolveStage::ResultDecoded);

        let report = self.partitioner.apply(&mut self.graph, &result)?;
        self.set_stage(SolveStage::PrunedAndColored);
        info!(
            "Solved {} vertices into {} triangles",
            matrix.dimension(),
            report.triangles.len()
        );
        Ok(report)
    }

    fn set_stage(&mut self, stage: SolveStage) {
        debug!("Solve stage {:?} -> {:?}", self.solve_stage, stage);
        self.solve_stage = stage;
    }
}

fn is_finite(point: Point2D<f64>) -> bool {
    point.x.is_finite() && point.y.is_finite()
}

impl Default for TrigraphApp {
    fn default() -> Self {
        Self::new(&TrigraphConfig::default())
    }
}
