/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Interactive graph editor that partitions graphs into vertex-disjoint
//! triangles with the help of an external solver.

pub mod app;
pub mod config;
pub mod graph;
pub mod history;
pub mod input;
pub mod matrix;
pub mod partition;
pub mod shell;
pub mod solver;

pub use app::{SolveError, TrigraphApp};
pub use config::TrigraphConfig;
