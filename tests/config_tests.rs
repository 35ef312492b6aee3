//! Configuration tests for deploy-ready
//!
//! Tests for loading checklist overrides from TOML and their effect on a run.

use deploy_ready::{check_project, Checklist, TextReporter};
use std::fs;
use tempfile::TempDir;

/// Helper to set up a test directory
fn setup_test_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Helper to create a config file
fn create_config_file(dir: &TempDir, content: &str) {
    let path = dir.path().join(".deploy-ready.toml");
    fs::write(path, content).expect("Failed to write config file");
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_no_config_uses_builtin_checklist() {
    let dir = setup_test_dir();
    let checklist = Checklist::load(dir.path()).unwrap();

    assert_eq!(checklist.platform, "Railway");
    assert_eq!(checklist.requirements.manifest, "requirements.txt");
    assert_eq!(
        checklist.env_example.recommended_vars,
        ["SECRET_KEY", "DATABASE_URL", "ENV"]
    );
}

#[test]
fn test_full_config() {
    let dir = setup_test_dir();
    create_config_file(
        &dir,
        r#"
platform = "Render"
next_steps = ["git push render main"]

[structure]
files = ["main.py", "render.yaml"]
dirs = ["static"]

[requirements]
manifest = "requirements/prod.txt"
critical_packages = ["flask", "gunicorn"]

[import]
module = "main"
symbol = "application"
interpreter = "python3.12"
timeout_seconds = 10

[env_example]
file = ".env.sample"
recommended_vars = ["FLASK_SECRET"]

[start_script]
path = "bin/start"
min_length = 20
process_manager = "gunicorn"
"#,
    );

    let checklist = Checklist::load(dir.path()).unwrap();
    assert_eq!(checklist.platform, "Render");
    assert_eq!(checklist.structure.files, ["main.py", "render.yaml"]);
    assert_eq!(checklist.requirements.manifest, "requirements/prod.txt");
    assert_eq!(checklist.import.symbol, "application");
    assert_eq!(checklist.import.interpreter.as_deref(), Some("python3.12"));
    assert_eq!(checklist.import.timeout_seconds, 10);
    assert_eq!(checklist.env_example.file, ".env.sample");
    assert_eq!(checklist.start_script.min_length, 20);
    assert_eq!(checklist.next_steps, ["git push render main"]);
}

#[test]
fn test_config_with_comments() {
    let dir = setup_test_dir();
    create_config_file(
        &dir,
        r#"
# Deploying to a different host
platform = "Heroku"  # inline comment
"#,
    );

    let checklist = Checklist::load(dir.path()).unwrap();
    assert_eq!(checklist.platform, "Heroku");
    assert_eq!(checklist.structure.dirs.len(), 9);
}

#[test]
fn test_wrong_type_is_rejected() {
    let dir = setup_test_dir();
    create_config_file(&dir, "[start_script]\nmin_length = \"fifty\"\n");

    let err = Checklist::load(dir.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse config file"));
}

#[test]
fn test_explicit_path() {
    let dir = setup_test_dir();
    let path = dir.path().join("custom.toml");
    fs::write(&path, "platform = \"Fly.io\"\n").unwrap();

    let checklist = Checklist::load_from(&path).unwrap();
    assert_eq!(checklist.platform, "Fly.io");
}

// ============================================================================
// Overrides applied to a run
// ============================================================================

#[cfg(unix)]
#[test]
fn test_custom_checklist_drives_run() {
    let dir = setup_test_dir();
    create_config_file(
        &dir,
        r#"
platform = "Render"

[structure]
files = ["main.py"]
dirs = []

[requirements]
critical_packages = ["flask"]

[import]
interpreter = "true"

[start_script]
path = "start"
min_length = 5
process_manager = "waitress"
"#,
    );
    fs::write(dir.path().join("main.py"), "").unwrap();
    fs::write(dir.path().join("requirements.txt"), "Flask==3.0\n").unwrap();
    fs::write(dir.path().join("start"), "waitress-serve main:app\n").unwrap();

    let checklist = Checklist::load(dir.path()).unwrap();
    let mut reporter = TextReporter::new(Vec::new());
    let code = check_project(dir.path(), &checklist, &mut reporter);

    let text = String::from_utf8(reporter.into_inner()).unwrap();
    assert_eq!(code, 0, "{}", text);
    assert!(text.contains("RENDER DEPLOYMENT READINESS CHECK"));
    assert!(text.contains("Your project is ready for Render deployment!"));
}
