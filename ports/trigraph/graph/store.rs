/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Dense, index-addressed storage for vertices and edges.
//!
//! Both stores are plain vectors: a record's identity is its position. The
//! engine in the parent module is responsible for keeping edge endpoints
//! valid when the vertex store shrinks.

use super::{Edge, Vertex};

/// Ordered vertex records addressed by dense index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexStore {
    vertices: Vec<Vertex>,
}

impl VertexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex and return its index
    pub fn push(&mut self, vertex: Vertex) -> usize {
        self.vertices.push(vertex);
        self.vertices.len() - 1
    }

    /// Remove the vertex at `index`, shifting every later vertex down by one
    pub fn remove(&mut self, index: usize) -> Option<Vertex> {
        if index < self.vertices.len() {
            Some(self.vertices.remove(index))
        } else {
            None
        }
    }

    pub fn get(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Vertex> {
        self.vertices.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Vertex> {
        self.vertices.iter_mut()
    }

    pub fn as_slice(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }
}

/// Ordered edge records addressed by dense index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeStore {
    edges: Vec<Edge>,
}

impl EdgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an edge and return its index
    pub fn push(&mut self, edge: Edge) -> usize {
        self.edges.push(edge);
        self.edges.len() - 1
    }

    /// Index of the edge joining `a` and `b`, in either stored order
    pub fn find(&self, a: usize, b: usize) -> Option<usize> {
        self.edges.iter().position(|edge| edge.connects(a, b))
    }

    /// Indices of edges touching `vertex`, in storage order
    pub fn incident(&self, vertex: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(move |(_, edge)| edge.touches(vertex))
            .map(|(index, _)| index)
    }

    /// Drop every edge touching `vertex` and close the index gap it leaves.
    ///
    /// Returns the number of edges removed.
    pub fn detach_vertex(&mut self, vertex: usize) -> usize {
        let before = self.edges.len();
        self.edges.retain(|edge| !edge.touches(vertex));
        for edge in &mut self.edges {
            if edge.start > vertex {
                edge.start -= 1;
            }
            if edge.end > vertex {
                edge.end -= 1;
            }
        }
        before - self.edges.len()
    }

    /// Keep only edges for which `keep` returns true; returns how many were dropped
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&Edge) -> bool,
    {
        let before = self.edges.len();
        self.edges.retain(|edge| keep(edge));
        before - self.edges.len()
    }

    pub fn get(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Edge> {
        self.edges.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Edge> {
        self.edges.iter()
    }

    pub fn as_slice(&self) -> &[Edge] {
        &self.edges
    }

    pub fn clear(&mut self) {
        self.edges.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Rgb;

    fn edge(start: usize, end: usize) -> Edge {
        Edge::new(start, end, Rgb::BLACK)
    }

    #[test]
    fn test_vertex_store_push_returns_dense_index() {
        let mut store = VertexStore::new();
        assert_eq!(store.push(Vertex::new(0.0, 0.0, 10.0)), 0);
        assert_eq!(store.push(Vertex::new(1.0, 1.0, 10.0)), 1);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_vertex_store_remove_shifts_later_vertices() {
        let mut store = VertexStore::new();
        store.push(Vertex::new(0.0, 0.0, 10.0));
        store.push(Vertex::new(1.0, 0.0, 10.0));
        store.push(Vertex::new(2.0, 0.0, 10.0));

        let removed = store.remove(1).unwrap();
        assert_eq!(removed.position.x, 1.0);
        assert_eq!(store.get(1).unwrap().position.x, 2.0);
        assert!(store.remove(5).is_none());
    }

    #[test]
    fn test_edge_store_find_is_order_independent() {
        let mut store = EdgeStore::new();
        store.push(edge(0, 1));
        store.push(edge(2, 1));

        assert_eq!(store.find(1, 0), Some(0));
        assert_eq!(store.find(1, 2), Some(1));
        assert_eq!(store.find(0, 2), None);
    }

    #[test]
    fn test_edge_store_incident() {
        let mut store = EdgeStore::new();
        store.push(edge(0, 1));
        store.push(edge(1, 2));
        store.push(edge(2, 3));

        let incident: Vec<usize> = store.incident(2).collect();
        assert_eq!(incident, vec![1, 2]);
        assert_eq!(store.incident(7).count(), 0);
    }

    #[test]
    fn test_detach_vertex_reindexes_both_endpoints() {
        let mut store = EdgeStore::new();
        store.push(edge(0, 1));
        store.push(edge(3, 4));
        store.push(edge(4, 0));
        store.push(edge(2, 3));

        let removed = store.detach_vertex(1);
        assert_eq!(removed, 1);

        let pairs: Vec<(usize, usize)> = store.iter().map(|e| (e.start, e.end)).collect();
        assert_eq!(pairs, vec![(2, 3), (3, 0), (1, 2)]);
    }
}
