use anyhow::{Context, Result};
use std::fs;

use super::{CheckContext, CheckResult, Diagnostic};
use crate::config::Checklist;
use crate::error::CheckError;

pub const NAME: &str = "start_script";

pub fn title(checklist: &Checklist) -> String {
    format!("Checking {}...", checklist.start_script.path)
}

pub fn run(ctx: &CheckContext<'_>) -> Result<CheckResult> {
    let config = &ctx.checklist.start_script;
    let path = ctx.root.join(&config.path);

    if !path.exists() {
        let err = CheckError::MissingStartScript {
            path: config.path.clone(),
        };
        return Ok(CheckResult::fail(NAME).with(Diagnostic::from_error(&err)));
    }

    // An existing but unreadable script is unexpected; the runner records it as a failure.
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let length = content.chars().count();
    if length < config.min_length {
        let err = CheckError::EmptyOrTooShort {
            path: config.path.clone(),
            length,
            min_length: config.min_length,
        };
        return Ok(CheckResult::fail(NAME).with(Diagnostic::from_error(&err)));
    }

    if !content.contains(config.process_manager.as_str()) {
        let err = CheckError::MissingProcessManagerReference {
            path: config.path.clone(),
            token: config.process_manager.clone(),
        };
        return Ok(CheckResult::fail(NAME).with(Diagnostic::from_error(&err)));
    }

    Ok(CheckResult::pass(NAME).with(Diagnostic::ok(format!("{} looks good", config.path))))
}
