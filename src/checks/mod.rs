pub mod env_example;
pub mod import;
pub mod requirements;
pub mod start_script;
pub mod structure;

use anyhow::Result;
use serde::Serialize;
use std::path::Path;

use crate::config::Checklist;
use crate::error::CheckError;

pub use import::{Loader, PythonLoader};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Warning,
    Error,
}

/// One human-readable line of check output, optionally followed by a list of items
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
}

impl Diagnostic {
    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(Severity::Ok, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            items: Vec::new(),
            kind: None,
        }
    }

    /// A single failure line built from a typed check error
    pub fn from_error(err: &CheckError) -> Self {
        Self::error(err.to_string()).with_kind(err.kind())
    }

    /// A heading followed by one bullet per error
    pub fn listing(severity: Severity, heading: &str, errors: &[CheckError]) -> Self {
        let mut diagnostic = Self::new(severity, heading);
        diagnostic.items = errors.iter().map(|e| e.to_string()).collect();
        diagnostic.kind = errors.first().map(CheckError::kind);
        diagnostic
    }

    pub fn with_items(mut self, items: Vec<String>) -> Self {
        self.items = items;
        self
    }

    pub fn with_kind(mut self, kind: &'static str) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    /// Advisory results are reported but never affect the overall outcome
    pub advisory: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckResult {
    pub fn pass(name: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            advisory: false,
            diagnostics: Vec::new(),
        }
    }

    pub fn fail(name: &str) -> Self {
        Self {
            passed: false,
            ..Self::pass(name)
        }
    }

    pub fn advisory(mut self) -> Self {
        self.advisory = true;
        self
    }

    pub fn with(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostics.push(diagnostic);
        self
    }

    /// Whether this result counts against the overall outcome
    pub fn is_blocking_failure(&self) -> bool {
        !self.passed && !self.advisory
    }

    /// Messages of every error-level diagnostic, items included
    pub fn errors(&self) -> Vec<String> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .flat_map(|d| std::iter::once(d.message.clone()).chain(d.items.iter().cloned()))
            .collect()
    }
}

/// Inputs shared by every check during one run
pub struct CheckContext<'a> {
    pub root: &'a Path,
    pub checklist: &'a Checklist,
    pub loader: &'a dyn Loader,
}

/// A registered check: its identity, header text and entry point
pub struct Check {
    pub name: &'static str,
    pub advisory: bool,
    pub title: fn(&Checklist) -> String,
    pub run: fn(&CheckContext<'_>) -> Result<CheckResult>,
}

/// Every check, in the order they run
pub static CHECKS: [Check; 5] = [
    Check {
        name: structure::NAME,
        advisory: false,
        title: structure::title,
        run: structure::run,
    },
    Check {
        name: requirements::NAME,
        advisory: false,
        title: requirements::title,
        run: requirements::run,
    },
    Check {
        name: import::NAME,
        advisory: false,
        title: import::title,
        run: import::run,
    },
    Check {
        name: env_example::NAME,
        advisory: true,
        title: env_example::title,
        run: env_example::run,
    },
    Check {
        name: start_script::NAME,
        advisory: false,
        title: start_script::title,
        run: start_script::run,
    },
];
