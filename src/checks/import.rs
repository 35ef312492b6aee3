use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::{CheckContext, CheckResult, Diagnostic};
use crate::config::{Checklist, ImportConfig};
use crate::error::CheckError;
use crate::utils::{run_command_in, CommandResult};

pub const NAME: &str = "import";

/// Interpreters searched on PATH when none is configured
const DEFAULT_INTERPRETERS: [&str; 2] = ["python3", "python"];

pub fn title(_checklist: &Checklist) -> String {
    "Testing app imports...".to_string()
}

/// Loads the target application's entry point and resolves its exported
/// application object.
///
/// Loading may run the application's top-level initialization code, so
/// implementations must not assume it is free of side effects.
pub trait Loader {
    fn load_entry_point(&self, root: &Path, module: &str, symbol: &str) -> Result<(), CheckError>;
}

/// Imports the entry point in a child Python interpreter rooted at the project.
#[derive(Debug, Clone)]
pub struct PythonLoader {
    interpreter: Option<String>,
    timeout: Duration,
}

impl PythonLoader {
    pub fn new(interpreter: Option<String>, timeout: Duration) -> Self {
        Self {
            interpreter,
            timeout,
        }
    }

    pub fn from_config(config: &ImportConfig) -> Self {
        Self::new(
            config.interpreter.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    fn find_interpreter(&self, root: &Path) -> Result<PathBuf, String> {
        let path_var = std::env::var_os("PATH");
        match &self.interpreter {
            Some(name) => which::which_in(name, path_var, root)
                .map_err(|e| format!("interpreter '{}' not found: {}", name, e)),
            None => DEFAULT_INTERPRETERS
                .iter()
                .find_map(|name| which::which_in(name, path_var.clone(), root).ok())
                .ok_or_else(|| {
                    "no Python interpreter found on PATH (tried python3, python)".to_string()
                }),
        }
    }
}

fn is_dotted_identifier(s: &str) -> bool {
    !s.is_empty()
        && s.split('.').all(|part| {
            !part.is_empty()
                && !part.starts_with(|c: char| c.is_ascii_digit())
                && part.chars().all(|c| c.is_alphanumeric() || c == '_')
        })
}

/// The last non-empty stderr line, which for a Python traceback is the exception itself
fn last_stderr_line(stderr: &str) -> Option<String> {
    stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

impl Loader for PythonLoader {
    fn load_entry_point(&self, root: &Path, module: &str, symbol: &str) -> Result<(), CheckError> {
        let load_error = |message: String| CheckError::LoadError {
            module: module.to_string(),
            symbol: symbol.to_string(),
            message,
        };

        if !is_dotted_identifier(module) || symbol.contains('.') || !is_dotted_identifier(symbol) {
            return Err(load_error("invalid module or symbol name".to_string()));
        }

        let interpreter = self.find_interpreter(root).map_err(load_error)?;
        let script = format!("from {} import {}", module, symbol);

        let result = run_command_in(&interpreter, &["-c", &script], root, self.timeout);
        match &result {
            CommandResult::Success(_) => Ok(()),
            CommandResult::Failed(output) => {
                let message = result
                    .stderr_string()
                    .as_deref()
                    .and_then(last_stderr_line)
                    .unwrap_or_else(|| format!("interpreter exited with {}", output.status));
                Err(load_error(message))
            }
            CommandResult::TimedOut => Err(load_error(format!(
                "timed out after {}s",
                self.timeout.as_secs()
            ))),
            CommandResult::SpawnError(e) => Err(load_error(e.clone())),
        }
    }
}

pub fn run(ctx: &CheckContext<'_>) -> Result<CheckResult> {
    let config = &ctx.checklist.import;

    match ctx
        .loader
        .load_entry_point(ctx.root, &config.module, &config.symbol)
    {
        Ok(()) => Ok(CheckResult::pass(NAME).with(Diagnostic::ok("App successfully imported"))),
        Err(err) => {
            tracing::debug!("entry point load failed: {}", err);
            Ok(CheckResult::fail(NAME).with(Diagnostic::from_error(&err)))
        }
    }
}
