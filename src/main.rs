use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use deploy_ready::output::reporter_for;
use deploy_ready::{check_project, Checklist, OutputFormat};

/// deploy-ready - check a project is ready to ship before deploying it
/// Exits 0 when every required check passes, 1 otherwise.
#[derive(Parser)]
#[command(name = "deploy-ready")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project root to check (defaults to the current directory)
    #[arg(short = 'C', long)]
    project: Option<PathBuf>,

    /// Checklist overrides file (defaults to <project>/.deploy-ready.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    format: String,

    /// Enable debug logging on stderr
    #[arg(long)]
    debug: bool,
}

/// Log level comes from `--debug`, then `RUST_LOG`, else warnings only.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("deploy_ready=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("deploy_ready=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: &Cli, format: OutputFormat) -> anyhow::Result<i32> {
    let root = match &cli.project {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };

    let checklist = match &cli.config {
        Some(path) => Checklist::load_from(path)?,
        None => Checklist::load(&root)?,
    };

    tracing::debug!("checking {} against the {} checklist", root.display(), checklist.platform);

    let mut reporter = reporter_for(format);
    Ok(check_project(&root, &checklist, reporter.as_mut()))
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    let format = OutputFormat::from_str(&cli.format);

    match run(&cli, format) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            if format == OutputFormat::Json {
                let error_output = serde_json::json!({
                    "success": false,
                    "error": format!("{:#}", e),
                    "timestamp": chrono::Utc::now().to_rfc3339()
                });
                eprintln!("{}", serde_json::to_string_pretty(&error_output).unwrap_or_default());
            } else {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            }
            std::process::exit(1);
        }
    }
}
