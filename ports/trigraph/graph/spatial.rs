/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Pointer hit testing against vertex discs.
//!
//! A linear scan is enough here: clicks are rare and graphs are small enough
//! to be drawn by hand.

use euclid::default::Point2D;

use super::GraphEngine;

/// Index of the first vertex whose disc contains `point`.
///
/// Overlapping discs resolve to the lowest index.
pub fn vertex_at(engine: &GraphEngine, point: Point2D<f64>) -> Option<usize> {
    engine
        .vertices()
        .iter()
        .position(|vertex| vertex.contains(point))
}
