// SPDX-FileCopyrightText: 2025 Jörg Thalheim
// SPDX-License-Identifier: MIT

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use harmonia_path_info::closure::closure_of_all;
use harmonia_path_info::config::Config;
use harmonia_path_info::error::{IoContext, Result};
use harmonia_path_info::local::LocalStore;
use harmonia_path_info::path_info::HashFormat;
use harmonia_path_info::report::{ReportOptions, report};
use harmonia_path_info::store::PathInfoStore;

/// Query information about store paths
#[derive(Parser, Debug)]
#[command(name = "harmonia-path-info", version, disable_help_flag = true)]
struct Cli {
    /// Print the NAR size of each path
    #[arg(short = 's', long)]
    size: bool,

    /// Print the total NAR size of each path's closure
    #[arg(short = 'S', long)]
    closure_size: bool,

    /// Print sizes with a K/M/G/... suffix
    #[arg(short = 'h', long)]
    human_readable: bool,

    /// Print the ultimate flag, content address and signatures
    #[arg(long)]
    sigs: bool,

    /// Only list paths that no substituter can provide
    #[arg(long)]
    filter_substitutable: bool,

    /// Print a JSON array instead of text
    #[arg(long)]
    json: bool,

    /// Report on the closure of the given paths
    #[arg(short = 'r', long)]
    recursive: bool,

    /// Print NAR hashes as stored instead of as SRI hashes (JSON only)
    #[arg(long)]
    stored_hash: bool,

    /// Configuration file, defaults to $HARMONIA_PATH_INFO_CONFIG
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print help
    #[arg(long, action = clap::ArgAction::Help)]
    help: Option<bool>,

    /// Store paths, or paths inside the store
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<String>,
}

impl Cli {
    fn report_options(&self) -> ReportOptions {
        ReportOptions {
            show_size: self.size,
            show_closure_size: self.closure_size,
            human_readable: self.human_readable,
            show_sigs: self.sigs,
            show_sub_status: self.filter_substitutable,
            json: self.json,
            hash_format: if self.stored_hash {
                HashFormat::Stored
            } else {
                HashFormat::Sri
            },
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    debug!("store directory: {}", config.store_dir.display());
    debug!("database path: {}", config.db_path.display());

    let store = LocalStore::open(&config)?;
    let mut paths = cli
        .paths
        .iter()
        .map(|arg| store.store_dir().follow_path(arg))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    if cli.recursive {
        paths = closure_of_all(&store, &paths).await?;
    }

    let output = report(&store, &paths, &cli.report_options()).await?;
    std::io::stdout()
        .lock()
        .write_all(output.as_bytes())
        .io_context(|| "Failed to write report".to_owned())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
