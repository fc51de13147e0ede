/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use bpaf::Bpaf;
use log::{error, info};
use trigraph::TrigraphApp;
use trigraph::config::TrigraphConfig;
use trigraph::shell::run_line;
use trigraph::solver::ProcessSolver;

/// Edit a graph from a command script and partition it into triangles
#[derive(Debug, Clone, Bpaf)]
#[bpaf(options, version)]
struct Options {
    /// Configuration file to use instead of the default location
    #[bpaf(long, argument("PATH"))]
    config: Option<PathBuf>,

    /// Solver executable
    #[bpaf(long, argument("PATH"))]
    solver: Option<PathBuf>,

    /// File the adjacency matrix is written to for the solver
    #[bpaf(long, argument("PATH"))]
    exchange_file: Option<PathBuf>,

    /// Command script to run; reads standard input when absent
    #[bpaf(positional("SCRIPT"))]
    script: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opts = options().run();

    let mut config = match &opts.config {
        Some(path) => match TrigraphConfig::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                error!("{e}");
                return ExitCode::FAILURE;
            },
        },
        None => TrigraphConfig::load(),
    };
    if let Some(solver) = opts.solver {
        config.solver.executable = solver;
    }
    if let Some(exchange_file) = opts.exchange_file {
        config.solver.exchange_file = exchange_file;
    }

    let input: Box<dyn BufRead> = match &opts.script {
        Some(path) => match File::open(path) {
            Ok(file) => Box::new(BufReader::new(file)),
            Err(e) => {
                error!("Failed to open script {}: {e}", path.display());
                return ExitCode::FAILURE;
            },
        },
        None => Box::new(io::stdin().lock()),
    };

    let solver = ProcessSolver::from_config(&config.solver);
    info!(
        "Using solver {} with exchange file {}",
        solver.executable().display(),
        solver.exchange_file().display()
    );
    let mut app = TrigraphApp::with_solver(&config, solver);
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read command: {e}");
                return ExitCode::FAILURE;
            },
        };
        if let Some(response) = run_line(&mut app, &line) {
            println!("{response}");
        }
    }
    ExitCode::SUCCESS
}
