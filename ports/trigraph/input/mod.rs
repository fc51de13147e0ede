/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Pointer handling for the editor canvas.
//!
//! Button mapping:
//! - Primary on empty space places a vertex; on a vertex it does nothing
//! - Secondary on a vertex deletes it
//! - Middle picks edge endpoints, one click each

use euclid::default::Point2D;
use log::debug;

use crate::app::{EdgeSelection, TrigraphApp};
use crate::graph::EdgeError;
use crate::graph::spatial::vertex_at;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// What a click did to the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    VertexAdded(usize),
    VertexDeleted(usize),

    /// First edge endpoint chosen
    EndpointSelected(usize),

    EdgeAdded(usize),

    /// Nothing under the pointer to act on
    Ignored,
}

/// Apply a click at `point` (testable without a windowing toolkit).
///
/// Completing an edge on the same vertex twice, or onto an existing edge,
/// returns the rejection; the pending endpoint is cleared either way.
pub fn handle_click(
    app: &mut TrigraphApp,
    button: PointerButton,
    point: Point2D<f64>,
) -> Result<ClickOutcome, EdgeError> {
    let hit = vertex_at(app.graph(), point);
    match (button, hit) {
        (PointerButton::Primary, None) => Ok(app
            .add_vertex_at(point)
            .map_or(ClickOutcome::Ignored, ClickOutcome::VertexAdded)),
        (PointerButton::Primary, Some(_)) => Ok(ClickOutcome::Ignored),
        (PointerButton::Secondary, Some(index)) => {
            app.delete_vertex(index);
            Ok(ClickOutcome::VertexDeleted(index))
        },
        (PointerButton::Secondary, None) => Ok(ClickOutcome::Ignored),
        (PointerButton::Middle, Some(index)) => select_endpoint(app, index),
        (PointerButton::Middle, None) => Ok(ClickOutcome::Ignored),
    }
}

fn select_endpoint(app: &mut TrigraphApp, index: usize) -> Result<ClickOutcome, EdgeError> {
    match app.selection() {
        EdgeSelection::NoSelection => {
            debug!("Edge start selected: {index}");
            app.set_selection(EdgeSelection::PendingEndpoint(index));
            Ok(ClickOutcome::EndpointSelected(index))
        },
        EdgeSelection::PendingEndpoint(start) => {
            app.set_selection(EdgeSelection::NoSelection);
            app.connect(start, index).map(ClickOutcome::EdgeAdded)
        },
    }
}
