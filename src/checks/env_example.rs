//! Example environment file check.
//!
//! This check is advisory and always passes: a missing file, missing
//! recommended variables and an unreadable file are reported as notes or
//! warnings only, so it can never fail a run.

use anyhow::Result;
use std::fs;

use super::{CheckContext, CheckResult, Diagnostic};
use crate::config::Checklist;

pub const NAME: &str = "env_example";

pub fn title(checklist: &Checklist) -> String {
    format!("Checking {}...", checklist.env_example.file)
}

pub fn run(ctx: &CheckContext<'_>) -> Result<CheckResult> {
    let config = &ctx.checklist.env_example;
    let path = ctx.root.join(&config.file);
    let result = CheckResult::pass(NAME).advisory();

    if !path.exists() {
        return Ok(result.with(Diagnostic::warning(format!(
            "{} not found (optional but recommended)",
            config.file
        ))));
    }

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("cannot read {}: {}", path.display(), e);
            return Ok(result.with(Diagnostic::warning(format!(
                "Error reading {}: {}",
                config.file, e
            ))));
        }
    };

    let missing: Vec<String> = config
        .recommended_vars
        .iter()
        .filter(|var| !content.contains(var.as_str()))
        .cloned()
        .collect();

    if missing.is_empty() {
        Ok(result.with(Diagnostic::ok(format!("{} looks good", config.file))))
    } else {
        Ok(result.with(
            Diagnostic::warning("Missing recommended environment variables:").with_items(missing),
        ))
    }
}
