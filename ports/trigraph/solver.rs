/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Transport to the external triangle-partitioning solver.
//!
//! The solver is a black box that receives an adjacency matrix and answers
//! with the matrix of edges that belong to its triangle decomposition. The
//! `PartitionSolver` trait hides how the matrix gets there, so the
//! subprocess transport can be swapped for an in-process closure.

use std::ffi::OsString;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::{debug, info, warn};
use thiserror::Error;

use crate::config::SolverConfig;
use crate::matrix::{AdjacencyMatrix, MatrixParseError};

/// Failures while handing a matrix to the solver and reading its answer
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("failed to write exchange file {path}: {source}")]
    Export { path: PathBuf, source: io::Error },

    #[error("could not start solver, check the path: {path}")]
    Launch { path: PathBuf, source: io::Error },

    #[error("failed to read solver output: {0}")]
    Read(io::Error),

    #[error("malformed solver output: {0}")]
    Parse(#[from] MatrixParseError),
}

/// Something that partitions a graph into triangles.
///
/// A solve is two steps: `export` hands the matrix over, `run` produces the
/// answer. Transports with nothing to hand over keep the default `export`.
pub trait PartitionSolver {
    /// Make `matrix` available to the solver
    fn export(&mut self, _matrix: &AdjacencyMatrix) -> Result<(), SolverError> {
        Ok(())
    }

    /// Compute the triangle decomposition of an exported `matrix`
    fn run(&mut self, matrix: &AdjacencyMatrix) -> Result<AdjacencyMatrix, SolverError>;

    /// `export` followed by `run`
    fn partition(&mut self, matrix: &AdjacencyMatrix) -> Result<AdjacencyMatrix, SolverError> {
        self.export(matrix)?;
        self.run(matrix)
    }
}

impl<F> PartitionSolver for F
where
    F: FnMut(&AdjacencyMatrix) -> Result<AdjacencyMatrix, SolverError>,
{
    fn run(&mut self, matrix: &AdjacencyMatrix) -> Result<AdjacencyMatrix, SolverError> {
        self(matrix)
    }
}

/// Runs the solver as a child process.
///
/// `export` writes the matrix to the exchange file. `run` starts the
/// executable with stdin closed and decodes its stdout once the stream ends. The exit
/// status is logged but does not fail the call.
#[derive(Debug, Clone)]
pub struct ProcessSolver {
    executable: PathBuf,
    args: Vec<OsString>,
    exchange_file: PathBuf,
}

impl ProcessSolver {
    pub fn new(executable: impl Into<PathBuf>, exchange_file: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            args: Vec::new(),
            exchange_file: exchange_file.into(),
        }
    }

    pub fn from_config(config: &SolverConfig) -> Self {
        Self::new(&config.executable, &config.exchange_file).with_args(&config.args)
    }

    /// Extra command-line arguments; none by default
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn exchange_file(&self) -> &Path {
        &self.exchange_file
    }

    fn resolved_executable(&self) -> PathBuf {
        std::path::absolute(&self.executable).unwrap_or_else(|_| self.executable.clone())
    }
}

impl PartitionSolver for ProcessSolver {
    fn export(&mut self, matrix: &AdjacencyMatrix) -> Result<(), SolverError> {
        matrix
            .write_exchange_file(&self.exchange_file)
            .map_err(|source| SolverError::Export {
                path: self.exchange_file.clone(),
                source,
            })?;
        info!(
            "Matrix of {} vertices written to {}",
            matrix.dimension(),
            self.exchange_file.display()
        );
        Ok(())
    }

    fn run(&mut self, _matrix: &AdjacencyMatrix) -> Result<AdjacencyMatrix, SolverError> {
        let mut child = Command::new(&self.executable)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|source| SolverError::Launch {
                path: self.resolved_executable(),
                source,
            })?;
        debug!("Solver {} started", self.executable.display());

        let decoded = match child.stdout.take() {
            Some(stdout) => AdjacencyMatrix::decode_reader(BufReader::new(stdout)),
            None => Ok(AdjacencyMatrix::default()),
        };

        match child.wait() {
            Ok(status) if !status.success() => {
                warn!("Solver exited with {status}; using the output it produced");
            },
            Ok(_) => {},
            Err(e) => warn!("Failed to wait for solver: {e}"),
        }

        match decoded {
            Ok(result) => Ok(result),
            Err(MatrixParseError::Io(e)) => Err(SolverError::Read(e)),
            Err(e) => Err(SolverError::Parse(e)),
        }
    }
}
