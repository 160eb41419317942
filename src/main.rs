use clap::Parser;
use erpnav::core::config::{self, CliOverrides, ErpNavConfig, ResolvedConfig};
use erpnav::tui;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "erpnav", about = "Navigation shell for the ERP front-end")]
struct Args {
    /// Route to open at startup (e.g. /compras/recebimento)
    #[arg(short, long)]
    route: Option<String>,

    /// Config file to use instead of ~/.erpnav/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// File holding persisted UI state
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Keep UI state in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Validate the navigation tree and exit
    #[arg(long)]
    check: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = match &args.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    };
    let file_config = match file_config {
        Ok(c) => c,
        Err(e) => {
            eprintln!("erpnav: {e}");
            return ExitCode::FAILURE;
        }
    };

    let cli = CliOverrides {
        route: args.route.as_deref(),
        state_file: args.state_file.as_deref(),
        ephemeral: args.ephemeral,
    };
    let resolved = config::resolve(&file_config, &cli);

    if args.check {
        return check_tree(&resolved);
    }

    init_logging(&resolved);
    log::info!("erpnav starting at {}", resolved.initial_route);
    log_config_summary(&file_config, &resolved);

    match tui::run(resolved) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::warn!("Terminal error: {}", e);
            eprintln!("erpnav: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize file logger - writes to erpnav.log in current directory
fn init_logging(resolved: &ResolvedConfig) {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("erpnav.log") {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }
}

fn log_config_summary(file_config: &ErpNavConfig, resolved: &ResolvedConfig) {
    let source = if file_config.navigation.is_empty() {
        "built-in"
    } else {
        "config file"
    };
    log::info!(
        "Navigation tree: {} ({} top-level entries), fallback '{}'",
        source,
        resolved.tree.entries.len(),
        resolved.fallback_id
    );
}

fn check_tree(resolved: &ResolvedConfig) -> ExitCode {
    let mut problems: Vec<String> = resolved
        .tree
        .validate()
        .iter()
        .map(ToString::to_string)
        .collect();
    if resolved.tree.find(&resolved.fallback_id).is_none() {
        problems.push(format!(
            "fallback id '{}' is not in the tree",
            resolved.fallback_id
        ));
    }

    if problems.is_empty() {
        println!("navigation tree OK");
        return ExitCode::SUCCESS;
    }
    for problem in &problems {
        println!("- {problem}");
    }
    ExitCode::FAILURE
}
