/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Immutable full copies of graph state.

use crate::graph::{Edge, GraphEngine, Vertex};

/// Deep copy of every vertex and every edge at one instant.
///
/// Never shares storage with a live engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraphSnapshot {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
}

impl GraphSnapshot {
    /// Copy the current contents of `engine`
    pub fn capture(engine: &GraphEngine) -> Self {
        Self {
            vertices: engine.vertices().to_vec(),
            edges: engine.edges().to_vec(),
        }
    }

    /// Build a snapshot from raw records; edges are validated only on restore
    pub fn from_parts(vertices: Vec<Vertex>, edges: Vec<Edge>) -> Self {
        Self { vertices, edges }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
