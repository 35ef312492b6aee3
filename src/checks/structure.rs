use anyhow::Result;
use std::path::Path;

use super::{CheckContext, CheckResult, Diagnostic, Severity};
use crate::config::Checklist;
use crate::error::CheckError;

pub const NAME: &str = "structure";

pub fn title(_checklist: &Checklist) -> String {
    "Checking project structure...".to_string()
}

/// Whether a path exists. Probe errors (e.g. permission denied on a parent)
/// count as missing.
fn path_exists(root: &Path, rel: &str) -> bool {
    let path = root.join(rel);
    match path.try_exists() {
        Ok(exists) => exists,
        Err(e) => {
            tracing::debug!("cannot probe {}: {}", path.display(), e);
            false
        }
    }
}

fn missing(root: &Path, paths: &[String], is_dir: bool) -> Vec<CheckError> {
    paths
        .iter()
        .filter(|p| !path_exists(root, p))
        .map(|p| CheckError::MissingPath {
            path: p.clone(),
            is_dir,
        })
        .collect()
}

pub fn run(ctx: &CheckContext<'_>) -> Result<CheckResult> {
    let structure = &ctx.checklist.structure;

    let missing_files = missing(ctx.root, &structure.files, false);
    let missing_dirs = missing(ctx.root, &structure.dirs, true);

    if missing_files.is_empty() && missing_dirs.is_empty() {
        return Ok(CheckResult::pass(NAME)
            .with(Diagnostic::ok("All required files and directories present")));
    }

    let mut result = CheckResult::fail(NAME);
    if !missing_files.is_empty() {
        result = result.with(Diagnostic::listing(
            Severity::Error,
            "Missing required files:",
            &missing_files,
        ));
    }
    if !missing_dirs.is_empty() {
        result = result.with(Diagnostic::listing(
            Severity::Error,
            "Missing required directories:",
            &missing_dirs,
        ));
    }
    Ok(result)
}
