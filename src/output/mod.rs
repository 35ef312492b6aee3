use chrono::Utc;
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};

use crate::checks::{CheckResult, Severity};
use crate::config::Checklist;
use crate::runner::RunReport;

const RULE_WIDTH: usize = 60;

/// Output format for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

/// Receives run events from the aggregator as they happen
pub trait Reporter {
    fn run_started(&mut self, checklist: &Checklist);
    fn check_started(&mut self, name: &str, title: &str);
    fn check_finished(&mut self, result: &CheckResult);
    fn run_finished(&mut self, report: &RunReport, checklist: &Checklist);
}

/// Build the reporter for a format, writing to stdout
pub fn reporter_for(format: OutputFormat) -> Box<dyn Reporter> {
    match format {
        OutputFormat::Text => Box::new(TextReporter::new(io::stdout())),
        OutputFormat::Json => Box::new(JsonReporter::new(io::stdout())),
    }
}

/// Line-oriented human output, written as soon as each check finishes.
///
/// Write failures (e.g. a closed pipe) are ignored; the exit code still
/// carries the outcome.
pub struct TextReporter<W: Write> {
    out: W,
    checks_seen: usize,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            checks_seen: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: impl std::fmt::Display) {
        let _ = writeln!(self.out, "{}", text);
    }

    fn rule(&mut self) {
        self.line("=".repeat(RULE_WIDTH));
    }
}

fn marker(severity: Severity) -> colored::ColoredString {
    match severity {
        Severity::Ok => "[OK]".green(),
        Severity::Warning => "[!]".yellow(),
        Severity::Error => "[X]".red(),
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn run_started(&mut self, checklist: &Checklist) {
        self.rule();
        self.line(
            format!(
                "{} DEPLOYMENT READINESS CHECK",
                checklist.platform.to_uppercase()
            )
            .bold(),
        );
        self.rule();
    }

    fn check_started(&mut self, _name: &str, title: &str) {
        if self.checks_seen > 0 {
            self.line("");
        }
        self.checks_seen += 1;
        self.line(format!("{} {}", "[*]".cyan(), title));
        let _ = self.out.flush();
    }

    fn check_finished(&mut self, result: &CheckResult) {
        for diagnostic in &result.diagnostics {
            self.line(format!("{} {}", marker(diagnostic.severity), diagnostic.message));
            for item in &diagnostic.items {
                self.line(format!("   - {}", item));
            }
        }
        let _ = self.out.flush();
    }

    fn run_finished(&mut self, report: &RunReport, checklist: &Checklist) {
        self.line("");
        self.rule();

        if report.overall() {
            self.line(format!(
                "{} ALL CHECKS PASSED ({}/{})",
                "[OK]".green(),
                report.passed(),
                report.total()
            ));
            self.line("");
            self.line(format!(
                "{} Your project is ready for {} deployment!",
                "[SUCCESS]".green().bold(),
                checklist.platform
            ));
            if !checklist.next_steps.is_empty() {
                self.line("");
                self.line("Next steps:");
                for (i, step) in checklist.next_steps.iter().enumerate() {
                    self.line(format!("{}. {}", i + 1, step));
                }
            }
        } else {
            self.line(format!(
                "{} SOME CHECKS FAILED ({}/{} passed)",
                "[!]".yellow(),
                report.passed(),
                report.total()
            ));
            self.line("");
            self.line(format!(
                "{} Please fix the issues above before deploying",
                "[X]".red().bold()
            ));
        }
        let _ = self.out.flush();
    }
}

/// Standardized JSON document for one run
#[derive(Debug, Clone, Serialize)]
pub struct ReadyOutput {
    pub command: String,
    pub success: bool,
    pub timestamp: String,
    pub platform: String,
    pub checks: Vec<CheckResult>,
    pub summary: Summary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl ReadyOutput {
    pub fn from_report(report: &RunReport, checklist: &Checklist) -> Self {
        let success = report.overall();
        Self {
            command: "check".to_string(),
            success,
            timestamp: Utc::now().to_rfc3339(),
            platform: checklist.platform.clone(),
            checks: report.results.clone(),
            summary: Summary {
                total: report.total(),
                passed: report.passed(),
                failed: report.total() - report.passed(),
            },
            next_steps: if success {
                checklist.next_steps.clone()
            } else {
                Vec::new()
            },
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Emits a single JSON document once the run completes
pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn run_started(&mut self, _checklist: &Checklist) {}

    fn check_started(&mut self, _name: &str, _title: &str) {}

    fn check_finished(&mut self, _result: &CheckResult) {}

    fn run_finished(&mut self, report: &RunReport, checklist: &Checklist) {
        match ReadyOutput::from_report(report, checklist).to_json() {
            Ok(json) => {
                let _ = writeln!(self.out, "{}", json);
            }
            Err(e) => tracing::error!("failed to serialize report: {}", e),
        }
    }
}
