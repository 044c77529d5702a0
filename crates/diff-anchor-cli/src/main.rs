mod commands;
mod logger;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use diff_anchor::{DiffFile, DiffRefs, LineCode, Position};
use diff_anchor_config::AppConfig;
use diff_anchor_git::GitRepository;

#[derive(Parser)]
#[command(name = "diff-anchor", about = "Stable line anchors for file diffs")]
struct Cli {
    /// Config file (defaults to .diff-anchor.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// The commits a patch was taken between
#[derive(Args)]
struct RefArgs {
    #[arg(long)]
    base: Option<String>,
    #[arg(long)]
    start: Option<String>,
    /// Without a head commit, lines have codes but no positions
    #[arg(long)]
    head: Option<String>,
}

impl RefArgs {
    fn diff_refs(&self) -> Result<Option<DiffRefs>> {
        let Some(head) = &self.head else {
            return Ok(None);
        };
        let refs = DiffRefs::new(
            self.base.clone().unwrap_or_default(),
            self.start.clone().unwrap_or_default(),
            head.clone(),
        )?;
        Ok(Some(refs))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List every line of a patch with its line code
    Lines {
        /// Single-file git patch, or - for stdin
        #[arg(default_value = "-")]
        patch: PathBuf,
        #[command(flatten)]
        refs: RefArgs,
    },
    /// Find the line for a line code
    Locate {
        #[arg(default_value = "-")]
        patch: PathBuf,
        #[arg(long)]
        code: String,
        #[command(flatten)]
        refs: RefArgs,
    },
    /// Print the line code for a stored position (JSON)
    Code {
        #[arg(default_value = "-")]
        patch: PathBuf,
        #[arg(long)]
        position: String,
    },
    /// Print a file's content at head, or before the change with --old
    Show {
        #[arg(long)]
        start: String,
        #[arg(long)]
        head: String,
        #[arg(long)]
        path: String,
        #[arg(long)]
        old: bool,
    },
}

/// Exit status when the lookup found something
const EXIT_FOUND: u8 = 0;
/// Exit status when nothing matched
const EXIT_NOT_FOUND: u8 = 1;
/// Exit status for any error, including a broken config file
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = load_config(cli.config.as_deref()).and_then(|config| {
        logger::init(&config.log_level);
        run(cli.command, &config)
    });
    if let Err(e) = &result {
        eprintln!("error: {e:#}");
    }

    ExitCode::from(exit_status(&result))
}

/// An explicit `--config` must load; otherwise fall back to the defaults
fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(path),
        None => Ok(AppConfig::load()),
    }
}

fn exit_status(result: &Result<bool>) -> u8 {
    match result {
        Ok(true) => EXIT_FOUND,
        Ok(false) => EXIT_NOT_FOUND,
        Err(_) => EXIT_ERROR,
    }
}

fn run(command: Commands, config: &AppConfig) -> Result<bool> {
    let mut stdout = std::io::stdout().lock();

    match command {
        Commands::Lines { patch, refs } => {
            let diff = commands::load_diff(&commands::read_patch(&patch)?, config.max_diff_bytes);
            let mut file = DiffFile::new(diff);
            if let Some(refs) = refs.diff_refs()? {
                file = file.with_diff_refs(refs);
            }
            commands::lines(&file, &mut stdout)?;
            Ok(true)
        }
        Commands::Locate { patch, code, refs } => {
            let code: LineCode = code.parse()?;
            let diff = commands::load_diff(&commands::read_patch(&patch)?, config.max_diff_bytes);
            let mut file = DiffFile::new(diff);
            if let Some(refs) = refs.diff_refs()? {
                file = file.with_diff_refs(refs);
            }
            commands::locate(&file, &code, &mut stdout)
        }
        Commands::Code { patch, position } => {
            let position = Position::from_json(&position).context("Invalid position JSON")?;
            let diff = commands::load_diff(&commands::read_patch(&patch)?, config.max_diff_bytes);
            commands::code(diff, &position, &mut stdout)
        }
        Commands::Show {
            start,
            head,
            path,
            old,
        } => {
            let git = GitRepository::open(&config.repository)
                .with_git_command(config.git_command.as_str());
            commands::show(git, &start, &head, &path, old, &mut stdout)
        }
    }
}
