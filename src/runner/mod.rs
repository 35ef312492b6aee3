//! Runs every registered check in order and aggregates the outcome.
//!
//! Each check runs inside a failure boundary: an `Err` or a panic from a
//! check becomes a failing [`CheckResult`] for that check, so the run always
//! produces exactly one result per registered check.

use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::checks::{Check, CheckContext, CheckResult, Diagnostic, Loader, CHECKS};
use crate::config::Checklist;
use crate::output::Reporter;

/// Aggregate outcome of one run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub results: Vec<CheckResult>,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Checks that passed, advisory ones included
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// True when no required check failed
    pub fn overall(&self) -> bool {
        !self.results.iter().any(CheckResult::is_blocking_failure)
    }

    /// Process exit code: 0 when ready to deploy, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.overall() {
            0
        } else {
            1
        }
    }
}

#[derive(Debug)]
pub enum RunState {
    NotStarted,
    Running { completed: usize },
    Completed(RunReport),
}

pub struct Aggregator<'a> {
    root: &'a Path,
    checklist: &'a Checklist,
    loader: &'a dyn Loader,
    state: RunState,
}

impl<'a> Aggregator<'a> {
    pub fn new(root: &'a Path, checklist: &'a Checklist, loader: &'a dyn Loader) -> Self {
        Self {
            root,
            checklist,
            loader,
            state: RunState::NotStarted,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Run every check once, streaming results to `reporter` as they finish
    ///
    /// Calling this again after completion returns the existing report
    /// without re-running anything.
    pub fn run(&mut self, reporter: &mut dyn Reporter) -> &RunReport {
        if !matches!(self.state, RunState::Completed(_)) {
            let report = self.run_checks(reporter);
            reporter.run_finished(&report, self.checklist);
            self.state = RunState::Completed(report);
        }

        match &self.state {
            RunState::Completed(report) => report,
            _ => unreachable!("state is Completed after a run"),
        }
    }

    fn run_checks(&mut self, reporter: &mut dyn Reporter) -> RunReport {
        reporter.run_started(self.checklist);

        let ctx = CheckContext {
            root: self.root,
            checklist: self.checklist,
            loader: self.loader,
        };

        let mut results = Vec::with_capacity(CHECKS.len());
        for check in CHECKS.iter() {
            self.state = RunState::Running {
                completed: results.len(),
            };
            reporter.check_started(check.name, &(check.title)(self.checklist));

            let result = run_guarded(check, &ctx);
            tracing::debug!(check = check.name, passed = result.passed, "check finished");

            reporter.check_finished(&result);
            results.push(result);
        }

        RunReport { results }
    }
}

/// Invoke one check, converting errors and panics into a failing result
fn run_guarded(check: &Check, ctx: &CheckContext<'_>) -> CheckResult {
    tracing::debug!(check = check.name, "running check");

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| (check.run)(ctx)));
    let mut result = match outcome {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            tracing::debug!(check = check.name, "check errored: {:#}", e);
            CheckResult::fail(check.name)
                .with(Diagnostic::error(format!("Check failed with error: {:#}", e)))
        }
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            CheckResult::fail(check.name)
                .with(Diagnostic::error(format!("Check failed with exception: {}", message)))
        }
    };

    // Advisory status comes from the registry, not from the check body
    result.advisory = check.advisory;
    if result.advisory {
        result.passed = true;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testing::{write, StubLoader};
    use crate::output::Reporter;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl Reporter for Recorder {
        fn run_started(&mut self, _checklist: &Checklist) {
            self.events.push("start".to_string());
        }

        fn check_started(&mut self, name: &str, _title: &str) {
            self.events.push(format!("begin {}", name));
        }

        fn check_finished(&mut self, result: &CheckResult) {
            self.events.push(format!("end {} {}", result.name, result.passed));
        }

        fn run_finished(&mut self, report: &RunReport, _checklist: &Checklist) {
            self.events.push(format!("done {}/{}", report.passed(), report.total()));
        }
    }

    fn ready_project() -> TempDir {
        let checklist = Checklist::default();
        let dir = TempDir::new().unwrap();
        for file in &checklist.structure.files {
            write(dir.path(), file, "");
        }
        for d in &checklist.structure.dirs {
            fs::create_dir_all(dir.path().join(d)).unwrap();
        }
        write(
            dir.path(),
            "requirements.txt",
            "fastapi\nuvicorn\ngunicorn\nsqlalchemy\nalembic\npsycopg-binary\njinja2\n",
        );
        write(
            dir.path(),
            "start.sh",
            "#!/bin/bash\nexec gunicorn app.main:app --bind 0.0.0.0:$PORT --workers 2\n",
        );
        dir
    }

    #[test]
    fn test_ready_project_exits_zero() {
        let dir = ready_project();
        let checklist = Checklist::default();
        let loader = StubLoader(None);
        let mut recorder = Recorder::default();

        let mut aggregator = Aggregator::new(dir.path(), &checklist, &loader);
        let report = aggregator.run(&mut recorder);

        assert_eq!(report.total(), 5);
        assert_eq!(report.passed(), 5);
        assert!(report.overall());
        assert_eq!(report.exit_code(), 0);
        assert_eq!(recorder.events.first().map(String::as_str), Some("start"));
        assert_eq!(recorder.events.last().map(String::as_str), Some("done 5/5"));
    }

    #[test]
    fn test_results_stream_in_order() {
        let dir = ready_project();
        let checklist = Checklist::default();
        let loader = StubLoader(None);
        let mut recorder = Recorder::default();

        Aggregator::new(dir.path(), &checklist, &loader).run(&mut recorder);

        assert_eq!(
            &recorder.events[1..5],
            ["begin structure", "end structure true", "begin requirements", "end requirements true"]
        );
    }

    #[test]
    fn test_load_error_fails_run() {
        let dir = ready_project();
        let checklist = Checklist::default();
        let loader = StubLoader(Some("RuntimeError: DATABASE_URL not set".to_string()));

        let mut aggregator = Aggregator::new(dir.path(), &checklist, &loader);
        let report = aggregator.run(&mut Recorder::default());

        assert_eq!(report.total(), 5);
        assert_eq!(report.passed(), 4);
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_empty_project_keeps_every_result() {
        let dir = TempDir::new().unwrap();
        let checklist = Checklist::default();
        let loader = StubLoader(None);

        let mut aggregator = Aggregator::new(dir.path(), &checklist, &loader);
        let report = aggregator.run(&mut Recorder::default());

        assert_eq!(report.total(), 5);
        let env = report.results.iter().find(|r| r.name == "env_example").unwrap();
        assert!(env.passed);
        assert!(!report.overall());
    }

    #[test]
    fn test_check_error_becomes_failure() {
        let dir = ready_project();
        fs::remove_file(dir.path().join("start.sh")).unwrap();
        fs::create_dir(dir.path().join("start.sh")).unwrap();
        let checklist = Checklist::default();
        let loader = StubLoader(None);

        let mut aggregator = Aggregator::new(dir.path(), &checklist, &loader);
        let report = aggregator.run(&mut Recorder::default());

        let start = report.results.iter().find(|r| r.name == "start_script").unwrap();
        assert!(!start.passed);
        assert!(start.errors()[0].starts_with("Check failed with error: Failed to read"));
        assert_eq!(report.total(), 5);
    }

    #[test]
    fn test_panic_becomes_failure() {
        fn exploding(_ctx: &CheckContext<'_>) -> anyhow::Result<CheckResult> {
            panic!("boom");
        }
        let check = Check {
            name: "exploding",
            advisory: false,
            title: |_| String::new(),
            run: exploding,
        };
        let dir = TempDir::new().unwrap();
        let checklist = Checklist::default();
        let ctx = CheckContext {
            root: dir.path(),
            checklist: &checklist,
            loader: &StubLoader(None),
        };

        let result = run_guarded(&check, &ctx);
        assert!(!result.passed);
        assert_eq!(result.errors(), ["Check failed with exception: boom"]);
    }

    #[test]
    fn test_state_transitions() {
        let dir = ready_project();
        let checklist = Checklist::default();
        let loader = StubLoader(None);
        let mut aggregator = Aggregator::new(dir.path(), &checklist, &loader);
        assert!(matches!(aggregator.state(), RunState::NotStarted));

        let mut recorder = Recorder::default();
        aggregator.run(&mut recorder);
        aggregator.run(&mut recorder);

        assert!(matches!(aggregator.state(), RunState::Completed(_)));
        assert_eq!(recorder.events.iter().filter(|e| e.starts_with("done")).count(), 1);
    }

    #[test]
    fn test_overall_ignores_advisory_failure() {
        let report = RunReport {
            results: vec![
                CheckResult::pass("structure"),
                CheckResult::fail("env_example").advisory(),
            ],
        };
        assert!(report.overall());
        assert_eq!(report.passed(), 1);
    }
}
