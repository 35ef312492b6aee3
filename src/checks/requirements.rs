use anyhow::Result;
use std::fs;

use super::{CheckContext, CheckResult, Diagnostic, Severity};
use crate::config::Checklist;
use crate::error::CheckError;

pub const NAME: &str = "requirements";

pub fn title(checklist: &Checklist) -> String {
    format!("Checking {}...", checklist.requirements.manifest)
}

/// Critical packages not found in the manifest.
///
/// Plain case-insensitive substring search over the whole file, so names
/// inside comments or longer package names also count as present.
fn missing_packages(content: &str, packages: &[String]) -> Vec<CheckError> {
    let haystack = content.to_lowercase();
    packages
        .iter()
        .filter(|pkg| !haystack.contains(&pkg.to_lowercase()))
        .map(|pkg| CheckError::MissingCriticalPackage {
            package: pkg.clone(),
        })
        .collect()
}

pub fn run(ctx: &CheckContext<'_>) -> Result<CheckResult> {
    let config = &ctx.checklist.requirements;
    let path = ctx.root.join(&config.manifest);

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            let err = CheckError::ManifestMissing {
                manifest: config.manifest.clone(),
                reason: e.to_string(),
            };
            return Ok(CheckResult::fail(NAME).with(Diagnostic::from_error(&err)));
        }
    };

    let line_count = content.lines().count();
    if line_count == 0 {
        let err = CheckError::ManifestEmpty {
            manifest: config.manifest.clone(),
        };
        return Ok(CheckResult::fail(NAME).with(Diagnostic::from_error(&err)));
    }

    let missing = missing_packages(&content, &config.critical_packages);
    if !missing.is_empty() {
        return Ok(CheckResult::fail(NAME).with(Diagnostic::listing(
            Severity::Warning,
            &format!("Missing critical packages in {}:", config.manifest),
            &missing,
        )));
    }

    Ok(CheckResult::pass(NAME).with(Diagnostic::ok(format!(
        "{} valid ({} packages)",
        config.manifest, line_count
    ))))
}
