/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Linear undo/redo over full graph snapshots.
//!
//! Strategy:
//! - Every user mutation calls `save_state` before it touches the engine
//! - Undo/redo capture the current state onto the opposite stack, then
//!   replace the engine contents with the popped snapshot
//! - Both stacks are bounded; the oldest entry is evicted first

pub mod snapshot;

use std::collections::VecDeque;

use log::debug;

use crate::graph::{GraphEngine, SceneObserver};
use snapshot::GraphSnapshot;

pub const DEFAULT_HISTORY_DEPTH: usize = 100;

/// Bounded undo and redo stacks
#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    undo: VecDeque<GraphSnapshot>,
    redo: VecDeque<GraphSnapshot>,
    depth: usize,
}

impl SnapshotHistory {
    /// Create a history holding at most `depth` entries per stack (minimum 1)
    pub fn new(depth: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            depth: depth.max(1),
        }
    }

    /// Record the current state ahead of a mutation; discards any redo branch
    pub fn save_state(&mut self, engine: &GraphEngine) {
        self.record(GraphSnapshot::capture(engine));
    }

    /// Push an already captured pre-mutation state; discards any redo branch
    pub fn record(&mut self, snapshot: GraphSnapshot) {
        Self::push_bounded(&mut self.undo, snapshot, self.depth);
        self.redo.clear();
    }

    /// Step back one state. Returns false when there is nothing to undo.
    pub fn undo(&mut self, engine: &mut GraphEngine) -> bool {
        self.undo_with(engine, &mut ())
    }

    /// Step forward one state. Returns false when there is nothing to redo.
    pub fn redo(&mut self, engine: &mut GraphEngine) -> bool {
        self.redo_with(engine, &mut ())
    }

    /// `undo`, notifying `observer` as the restored scene is rebuilt
    pub fn undo_with(&mut self, engine: &mut GraphEngine, observer: &mut dyn SceneObserver) -> bool {
        let Some(previous) = self.undo.pop_back() else {
            return false;
        };
        Self::push_bounded(&mut self.redo, GraphSnapshot::capture(engine), self.depth);
        engine.restore(&previous, observer);
        debug!(
            "Undo restored {} vertices and {} edges",
            engine.vertex_count(),
            engine.edge_count()
        );
        true
    }

    /// `redo`, notifying `observer` as the restored scene is rebuilt
    pub fn redo_with(&mut self, engine: &mut GraphEngine, observer: &mut dyn SceneObserver) -> bool {
        let Some(next) = self.redo.pop_back() else {
            return false;
        };
        Self::push_bounded(&mut self.undo, GraphSnapshot::capture(engine), self.depth);
        engine.restore(&next, observer);
        debug!(
            "Redo restored {} vertices and {} edges",
            engine.vertex_count(),
            engine.edge_count()
        );
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// Maximum entries per stack
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Forget all recorded states
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    fn push_bounded(stack: &mut VecDeque<GraphSnapshot>, snapshot: GraphSnapshot, depth: usize) {
        if stack.len() == depth {
            stack.pop_front();
        }
        stack.push_back(snapshot);
    }
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}
