//! deploy-ready - pre-deployment readiness checks
//! This library runs a fixed checklist (project layout, dependency manifest,
//! entry point import, example env file, start script) against a project
//! directory and reports whether it is ready to ship.

pub mod checks;
pub mod config;
pub mod error;
pub mod output;
pub mod runner;
pub mod utils;

use std::path::Path;

// Re-export main types for convenience
pub use checks::{CheckResult, Diagnostic, Loader, PythonLoader, Severity, CHECKS};
pub use config::Checklist;
pub use error::CheckError;
pub use output::{JsonReporter, OutputFormat, Reporter, TextReporter};
pub use runner::{Aggregator, RunReport, RunState};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run every check against `root` and return the process exit code
pub fn check_project(root: &Path, checklist: &Checklist, reporter: &mut dyn Reporter) -> i32 {
    let loader = PythonLoader::from_config(&checklist.import);
    let mut aggregator = Aggregator::new(root, checklist, &loader);
    aggregator.run(reporter).exit_code()
}
