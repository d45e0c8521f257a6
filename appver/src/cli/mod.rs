mod get;
mod list;
mod rollback;

pub use self::rollback::*;

use crate::conf::{Config, General, LogFormat};
use crate::history::{VersionHistoryView, VersionRow};
use crate::models::AppVersions;
use anyhow::{bail, Context, Result};
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser, Clone)]
#[clap(name = "appver")]
#[clap(about = "Inspect an application's deployment history and roll back to a previous version.")]
#[clap(version)]
struct Args {
    /// Set configuration path; if empty default paths are used
    #[clap(long, value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,

    /// Version history document to read; overrides history.path from the configuration.
    #[clap(short, long, value_name = "PATH", global = true)]
    file: Option<PathBuf>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand, Clone)]
enum Commands {
    /// List the version history, newest deployment first.
    List {
        /// Which page to show, starting at 1.
        #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
        page: u64,

        /// Versions per page; overrides display.page_size from the configuration.
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        page_size: Option<u64>,

        /// Print relative deploy times and full git hashes.
        #[arg(long, default_value = "false")]
        hints: bool,
    },

    /// Get details about a single version.
    Get {
        /// Version number.
        version: u64,
    },

    /// Roll the application back to a previously deployed version.
    ///
    /// The request is only forwarded after you confirm it. A version that is
    /// currently live or whose deploy failed cannot be rolled back to.
    ///
    /// Confirmed requests are written as JSON to rollback.request_path, or to stdout when
    /// unset. The prompt and status lines go to stderr.
    Rollback {
        /// Version number.
        version: u64,

        /// Skip the confirmation prompt.
        #[arg(short, long, default_value = "false")]
        yes: bool,
    },
}

pub struct Cli {
    conf: Config,
    args: Args,
}

impl Cli {
    pub fn new() -> Result<Self> {
        let args = Args::parse();

        let conf = Config::load(args.config_path.as_deref())
            .context("Could not successfully load configuration")?;

        init_logging(&conf.general);
        debug!(config = ?conf, "configuration loaded");

        Ok(Self { conf, args })
    }

    pub fn run(&self) -> Result<()> {
        match self.args.command.clone() {
            Commands::List {
                page,
                page_size,
                hints,
            } => self.version_list(page as usize, page_size.map(|size| size as usize), hints),
            Commands::Get { version } => self.version_get(version),
            Commands::Rollback { version, yes } => self.version_rollback(version, yes),
        }
    }

    /// Reads the history document, preferring the path given on the command line.
    fn load_history(&self) -> Result<AppVersions> {
        let Some(path) = self
            .args
            .file
            .as_ref()
            .or(self.conf.history.path.as_ref())
        else {
            bail!("No version history file given; pass --file or set history.path in the configuration");
        };

        debug!(path = %path.display(), "loading version history");

        AppVersions::load(path).context("Could not successfully load version history")
    }

    /// Formats the view's rows in the timezone the user asked for.
    fn rows(&self, view: &VersionHistoryView) -> Vec<VersionRow> {
        let now = Utc::now();
        if self.conf.display.utc {
            view.rows(now, &Utc)
        } else {
            view.rows(now, &Local)
        }
    }
}

/// Installs the global tracing subscriber. `RUST_LOG` wins over the configured level.
fn init_logging(general: &General) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&general.log_level))
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // A subscriber may already be installed; the first one stays in place.
    let _ = match general.log_format {
        LogFormat::Plain => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
