/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Adjacency matrices and their plain-text exchange format.
//!
//! One row per line, cells `0`/`1` separated by single spaces, every row
//! terminated by `\n`. Decoding splits on any whitespace, tolerates trailing
//! spaces and blank lines, and rejects any other token.

use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

/// Failure to parse solver output
#[derive(Debug, Error)]
pub enum MatrixParseError {
    #[error("line {line}: `{token}` is not a number")]
    NotANumber { line: usize, token: String },

    #[error("line {line}: `{token}` is neither 0 nor 1")]
    NotBinary { line: usize, token: String },

    #[error("failed to read matrix text: {0}")]
    Io(#[from] io::Error),
}

/// Boolean adjacency matrix addressed by vertex index.
///
/// Matrices built from a graph are square and symmetric. Decoded matrices are
/// whatever the text contained: the dimension is the row count and rows may
/// have any length. Reads outside a row are `false`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdjacencyMatrix {
    rows: Vec<Vec<bool>>,
}

impl AdjacencyMatrix {
    /// All-zero square matrix of side `dimension`
    pub fn new(dimension: usize) -> Self {
        Self {
            rows: vec![vec![false; dimension]; dimension],
        }
    }

    pub fn from_rows(rows: Vec<Vec<bool>>) -> Self {
        Self { rows }
    }

    /// Set both `(i, j)` and `(j, i)`; out-of-range cells are ignored
    pub fn connect(&mut self, i: usize, j: usize) {
        self.set(i, j, true);
        self.set(j, i, true);
    }

    /// Set a single cell; out-of-range cells are ignored
    pub fn set(&mut self, i: usize, j: usize, value: bool) {
        if let Some(cell) = self.rows.get_mut(i).and_then(|row| row.get_mut(j)) {
            *cell = value;
        }
    }

    pub fn get(&self, i: usize, j: usize) -> bool {
        self.rows
            .get(i)
            .and_then(|row| row.get(j))
            .copied()
            .unwrap_or(false)
    }

    /// Number of rows
    pub fn dimension(&self) -> usize {
        self.rows.len()
    }

    /// Whether every row is as long as the matrix is tall
    pub fn is_square(&self) -> bool {
        let n = self.rows.len();
        self.rows.iter().all(|row| row.len() == n)
    }

    pub fn is_symmetric(&self) -> bool {
        self.is_square() &&
            (0..self.dimension()).all(|i| (0..i).all(|j| self.get(i, j) == self.get(j, i)))
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    /// Render in exchange format
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(self.rows.len() * (self.rows.len() * 2 + 1));
        for row in &self.rows {
            for (j, &cell) in row.iter().enumerate() {
                if j > 0 {
                    out.push(' ');
                }
                out.push(if cell { '1' } else { '0' });
            }
            out.push('\n');
        }
        out
    }

    /// Parse exchange-format text
    pub fn decode(text: &str) -> Result<Self, MatrixParseError> {
        let mut rows = Vec::new();
        for (number, line) in text.lines().enumerate() {
            if let Some(row) = parse_row(number + 1, line)? {
                rows.push(row);
            }
        }
        Ok(Self { rows })
    }

    /// Parse exchange-format text line by line until end of stream
    pub fn decode_reader<R: BufRead>(reader: R) -> Result<Self, MatrixParseError> {
        let mut rows = Vec::new();
        for (number, line) in reader.lines().enumerate() {
            if let Some(row) = parse_row(number + 1, &line?)? {
                rows.push(row);
            }
        }
        Ok(Self { rows })
    }

    /// Write the exchange file consumed by the external solver
    pub fn write_exchange_file(&self, path: &Path) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(self.encode().as_bytes())?;
        writer.flush()
    }
}

fn parse_row(line: usize, text: &str) -> Result<Option<Vec<bool>>, MatrixParseError> {
    let mut row = Vec::new();
    for token in text.split_whitespace() {
        let value: i64 = token.parse().map_err(|_| MatrixParseError::NotANumber {
            line,
            token: token.to_string(),
        })?;
        match value {
            0 => row.push(false),
            1 => row.push(true),
            _ => {
                return Err(MatrixParseError::NotBinary {
                    line,
                    token: token.to_string(),
                });
            },
        }
    }
    Ok(if row.is_empty() { None } else { Some(row) })
}
