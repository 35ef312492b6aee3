//! Checklist configuration for deploy-ready
//! Holds the fixed readiness checklist and loads optional overrides from
//! a `.deploy-ready.toml` file in the project root.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default configuration file name
pub const CONFIG_FILE: &str = ".deploy-ready.toml";

/// Everything the checks validate against.
///
/// Built once at startup and only ever shared by reference afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checklist {
    /// Hosting platform name shown in the banner and next steps
    #[serde(default = "default_platform")]
    pub platform: String,

    #[serde(default)]
    pub structure: StructureConfig,

    #[serde(default)]
    pub requirements: RequirementsConfig,

    #[serde(default)]
    pub import: ImportConfig,

    #[serde(default)]
    pub env_example: EnvExampleConfig,

    #[serde(default)]
    pub start_script: StartScriptConfig,

    /// Suggested follow-up commands printed after a successful run
    #[serde(default = "default_next_steps")]
    pub next_steps: Vec<String>,
}

/// Required project layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureConfig {
    #[serde(default = "default_required_files")]
    pub files: Vec<String>,

    #[serde(default = "default_required_dirs")]
    pub dirs: Vec<String>,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            files: default_required_files(),
            dirs: default_required_dirs(),
        }
    }
}

/// Dependency manifest settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementsConfig {
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// Package names that must appear (case-insensitive substring) in the manifest
    #[serde(default = "default_critical_packages")]
    pub critical_packages: Vec<String>,
}

impl Default for RequirementsConfig {
    fn default() -> Self {
        Self {
            manifest: default_manifest(),
            critical_packages: default_critical_packages(),
        }
    }
}

/// Entry point smoke test settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Dotted module path of the application entry point
    #[serde(default = "default_module")]
    pub module: String,

    /// Name of the application object exported by the module
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Interpreter to use instead of searching PATH for python3/python
    #[serde(default)]
    pub interpreter: Option<String>,

    #[serde(default = "default_import_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            module: default_module(),
            symbol: default_symbol(),
            interpreter: None,
            timeout_seconds: default_import_timeout(),
        }
    }
}

/// Example environment file settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvExampleConfig {
    #[serde(default = "default_env_file")]
    pub file: String,

    #[serde(default = "default_recommended_vars")]
    pub recommended_vars: Vec<String>,
}

impl Default for EnvExampleConfig {
    fn default() -> Self {
        Self {
            file: default_env_file(),
            recommended_vars: default_recommended_vars(),
        }
    }
}

/// Start script settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartScriptConfig {
    #[serde(default = "default_start_script")]
    pub path: String,

    /// Minimum content length in characters
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    /// Substring identifying the production process manager
    #[serde(default = "default_process_manager")]
    pub process_manager: String,
}

impl Default for StartScriptConfig {
    fn default() -> Self {
        Self {
            path: default_start_script(),
            min_length: default_min_length(),
            process_manager: default_process_manager(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_platform() -> String {
    "Railway".to_string()
}

fn default_required_files() -> Vec<String> {
    strings(&[
        "app/__init__.py",
        "app/main.py",
        "app/config.py",
        "app/database.py",
        "requirements.txt",
        "alembic.ini",
        "Procfile",
        "start.sh",
        "railway.toml",
        "nixpacks.toml",
    ])
}

fn default_required_dirs() -> Vec<String> {
    strings(&[
        "app",
        "app/models",
        "app/routers",
        "app/services",
        "templates",
        "static",
        "alembic",
        "storage/books",
        "storage/covers",
    ])
}

fn default_manifest() -> String {
    "requirements.txt".to_string()
}

fn default_critical_packages() -> Vec<String> {
    strings(&[
        "fastapi",
        "uvicorn",
        "gunicorn",
        "sqlalchemy",
        "alembic",
        "psycopg-binary",
        "jinja2",
    ])
}

fn default_module() -> String {
    "app.main".to_string()
}

fn default_symbol() -> String {
    "app".to_string()
}

fn default_import_timeout() -> u64 {
    60
}

fn default_env_file() -> String {
    ".env.example".to_string()
}

fn default_recommended_vars() -> Vec<String> {
    strings(&["SECRET_KEY", "DATABASE_URL", "ENV"])
}

fn default_start_script() -> String {
    "start.sh".to_string()
}

fn default_min_length() -> usize {
    50
}

fn default_process_manager() -> String {
    "gunicorn".to_string()
}

fn default_next_steps() -> Vec<String> {
    strings(&[
        "git add .",
        "git commit -m 'Ready for Railway'",
        "git push origin main",
        "Deploy on Railway (see RAILWAY-README.md)",
    ])
}

impl Default for Checklist {
    fn default() -> Self {
        Self {
            platform: default_platform(),
            structure: StructureConfig::default(),
            requirements: RequirementsConfig::default(),
            import: ImportConfig::default(),
            env_example: EnvExampleConfig::default(),
            start_script: StartScriptConfig::default(),
            next_steps: default_next_steps(),
        }
    }
}

impl Checklist {
    /// Load the checklist for a project root, applying `.deploy-ready.toml` if present
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!("no config at {}, using built-in checklist", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load the checklist from an explicitly given file, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let checklist: Checklist = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        checklist
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        tracing::debug!("loaded checklist overrides from {}", path.display());
        Ok(checklist)
    }

    /// Validate the checklist
    pub fn validate(&self) -> Result<()> {
        if self.requirements.critical_packages.is_empty() {
            anyhow::bail!("requirements.critical_packages must not be empty");
        }
        if self.start_script.process_manager.trim().is_empty() {
            anyhow::bail!("start_script.process_manager must not be empty");
        }
        if self.import.module.trim().is_empty() || self.import.symbol.trim().is_empty() {
            anyhow::bail!("import.module and import.symbol must not be empty");
        }
        Ok(())
    }
}
