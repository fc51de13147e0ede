/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Line-oriented command shell driving a `TrigraphApp`.
//!
//! One command per line. Blank lines and lines starting with `#` are skipped,
//! which lets editing sessions be replayed from a script file.

use std::str::FromStr;

use euclid::default::Point2D;
use thiserror::Error;

use crate::app::TrigraphApp;
use crate::input::{ClickOutcome, PointerButton, handle_click};

pub const HELP_TEXT: &str = "\
Commands:
  vertex X Y            place a vertex at (X, Y)
  click BUTTON X Y      click at (X, Y) with left, right or middle
                          left on empty space places a vertex
                          right on a vertex deletes it and its edges
                          middle on two vertices in turn connects them
  edge A B              connect vertices A and B
  move I X Y            drag vertex I to (X, Y)
  delete I              delete vertex I and its edges
  radius R              resize every vertex (clamped to the configured range)
  clear                 remove all vertices and edges
  undo / redo           step through history
  solve                 partition the graph into triangles with the solver;
                          the vertex count must be a multiple of 3
  show                  list vertices and edges
  matrix                print the adjacency matrix
  help                  show this text";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("unknown command `{0}`, type `help` for a list")]
    Unknown(String),

    #[error("`{command}` expects {expected}")]
    Arity {
        command: &'static str,
        expected: &'static str,
    },

    #[error("`{0}` is not a valid number")]
    InvalidNumber(String),

    #[error("`{0}` is not a mouse button, use left, right or middle")]
    InvalidButton(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Vertex { x: f64, y: f64 },
    Click { button: PointerButton, x: f64, y: f64 },
    Edge { a: usize, b: usize },
    Move { index: usize, x: f64, y: f64 },
    Delete { index: usize },
    Radius { radius: f64 },
    Clear,
    Undo,
    Redo,
    Solve,
    Show,
    Matrix,
    Help,
}

impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();

        let command = match name {
            "vertex" => {
                let [x, y] = expect_args(&args, "vertex", "X Y")?;
                Command::Vertex {
                    x: finite(x)?,
                    y: finite(y)?,
                }
            },
            "click" => {
                let [button, x, y] = expect_args(&args, "click", "BUTTON X Y")?;
                Command::Click {
                    button: parse_button(button)?,
                    x: finite(x)?,
                    y: finite(y)?,
                }
            },
            "edge" => {
                let [a, b] = expect_args(&args, "edge", "A B")?;
                Command::Edge {
                    a: number(a)?,
                    b: number(b)?,
                }
            },
            "move" => {
                let [index, x, y] = expect_args(&args, "move", "I X Y")?;
                Command::Move {
                    index: number(index)?,
                    x: finite(x)?,
                    y: finite(y)?,
                }
            },
            "delete" => {
                let [index] = expect_args(&args, "delete", "I")?;
                Command::Delete {
                    index: number(index)?,
                }
            },
            "radius" => {
                let [radius] = expect_args(&args, "radius", "R")?;
                Command::Radius {
                    radius: finite(radius)?,
                }
            },
            "clear" => no_args(&args, "clear", Command::Clear)?,
            "undo" => no_args(&args, "undo", Command::Undo)?,
            "redo" => no_args(&args, "redo", Command::Redo)?,
            "solve" => no_args(&args, "solve", Command::Solve)?,
            "show" => no_args(&args, "show", Command::Show)?,
            "matrix" => no_args(&args, "matrix", Command::Matrix)?,
            "help" => no_args(&args, "help", Command::Help)?,
            other => return Err(CommandParseError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn expect_args<'a, const N: usize>(
    args: &[&'a str],
    command: &'static str,
    expected: &'static str,
) -> Result<[&'a str; N], CommandParseError> {
    <[&str; N]>::try_from(args).map_err(|_| CommandParseError::Arity { command, expected })
}

fn no_args(args: &[&str], command: &'static str, parsed: Command) -> Result<Command, CommandParseError> {
    expect_args::<0>(args, command, "no arguments")?;
    Ok(parsed)
}

fn number<T: FromStr>(token: &str) -> Result<T, CommandParseError> {
    token
        .parse()
        .map_err(|_| CommandParseError::InvalidNumber(token.to_string()))
}

/// A finite floating point value; `NaN` and infinities are refused
fn finite(token: &str) -> Result<f64, CommandParseError> {
    let value: f64 = number(token)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CommandParseError::InvalidNumber(token.to_string()))
    }
}

fn parse_button(token: &str) -> Result<PointerButton, CommandParseError> {
    match token {
        "left" => Ok(PointerButton::Primary),
        "right" => Ok(PointerButton::Secondary),
        "middle" => Ok(PointerButton::Middle),
        other => Err(CommandParseError::InvalidButton(other.to_string())),
    }
}

/// Parse a script line. `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<Command>, CommandParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    line.parse().map(Some)
}

/// Run one command and describe what happened
pub fn execute(app: &mut TrigraphApp, command: Command) -> String {
    match command {
        Command::Vertex { x, y } => {
            match app.add_vertex_at(Point2D::new(x, y)) {
                Some(index) => format!("added vertex {index}"),
                None => format!("cannot place a vertex at ({x}, {y})"),
            }
        },
        Command::Click { button, x, y } => match handle_click(app, button, Point2D::new(x, y)) {
            Ok(outcome) => describe_click(outcome),
            Err(e) => format!("error: {e}"),
        },
        Command::Edge { a, b } => match app.connect(a, b) {
            Ok(index) => format!("added edge {index} between {a} and {b}"),
            Err(e) => format!("error: {e}"),
        },
        Command::Move { index, x, y } => {
            if !app.begin_vertex_drag(index) {
                return format!("no vertex {index}");
            }
            let redraw = app.drag_vertex(index, Point2D::new(x, y));
            format!("moved vertex {index}, {} incident edges", redraw.len())
        },
        Command::Delete { index } => {
            if app.delete_vertex(index) {
                format!("deleted vertex {index}")
            } else {
                format!("no vertex {index}")
            }
        },
        Command::Radius { radius } => {
            match app.set_vertex_radius(radius) {
                Some(applied) => format!("vertex radius set to {applied}"),
                None => format!("cannot use radius {radius}"),
            }
        },
        Command::Clear => {
            app.clear_scene();
            "scene cleared".to_string()
        },
        Command::Undo => {
            if app.undo() {
                "undone".to_string()
            } else {
                "nothing to undo".to_string()
            }
        },
        Command::Redo => {
            if app.redo() {
                "redone".to_string()
            } else {
                "nothing to redo".to_string()
            }
        },
        Command::Solve => match app.solve() {
            Ok(report) => {
                let mut lines = vec![format!(
                    "{} triangles, {} edges pruned",
                    report.triangles.len(),
                    report.pruned_edges
                )];
                lines.extend(
                    report
                        .triangles
                        .iter()
                        .map(|[i, j, k]| format!("  triangle {i} {j} {k}")),
                );
                if !report.uncolored_vertices.is_empty() {
                    lines.push(format!("  uncolored vertices: {:?}", report.uncolored_vertices));
                }
                lines.join("\n")
            },
            Err(e) => format!("error: {e}"),
        },
        Command::Show => show(app),
        Command::Matrix => {
            let encoded = app.graph().build_adjacency_matrix().encode();
            encoded.trim_end().to_string()
        },
        Command::Help => HELP_TEXT.to_string(),
    }
}

/// Parse and run one script line. `None` for blank lines and comments.
pub fn run_line(app: &mut TrigraphApp, line: &str) -> Option<String> {
    match parse_line(line) {
        Ok(Some(command)) => Some(execute(app, command)),
        Ok(None) => None,
        Err(e) => Some(format!("error: {e}")),
    }
}

fn describe_click(outcome: ClickOutcome) -> String {
    match outcome {
        ClickOutcome::VertexAdded(index) => format!("added vertex {index}"),
        ClickOutcome::VertexDeleted(index) => format!("deleted vertex {index}"),
        ClickOutcome::EndpointSelected(index) => format!("selected vertex {index}, pick the other end"),
        ClickOutcome::EdgeAdded(index) => format!("added edge {index}"),
        ClickOutcome::Ignored => "nothing to do here".to_string(),
    }
}

fn show(app: &TrigraphApp) -> String {
    let graph = app.graph();
    let mut lines = vec![format!(
        "{} vertices, {} edges (undo {}, redo {})",
        graph.vertex_count(),
        graph.edge_count(),
        app.history().undo_depth(),
        app.history().redo_depth()
    )];
    lines.extend(graph.vertices().iter().enumerate().map(|(index, vertex)| {
        format!(
            "  vertex {index} at ({}, {}) radius {}",
            vertex.position.x, vertex.position.y, vertex.radius
        )
    }));
    lines.extend(
        graph
            .edges()
            .iter()
            .enumerate()
            .map(|(index, edge)| format!("  edge {index}: {} - {} {}", edge.start, edge.end, edge.color)),
    );
    lines.join("\n")
}
