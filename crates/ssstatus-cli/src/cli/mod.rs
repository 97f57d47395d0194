//! CLI entry and dispatch.

use std::fs;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use ssstatus_core::config::paths::Paths;
use ssstatus_core::controller::StatusController;
use ssstatus_core::interrupt;
use ssstatus_core::lock::{self, FileLock, LockPolicy};
use ssstatus_core::logging;
use ssstatus_core::store::FileStore;

mod commands;

/// Overrides the unbounded wait for the lock file, in milliseconds.
const LOCK_TIMEOUT_ENV: &str = "SSSTATUS_LOCK_TIMEOUT_MS";

#[derive(Parser)]
#[command(name = "ssstatus")]
#[command(version)]
#[command(about = "Super Simple Status")]
#[command(
    long_about = "Super Simple Status\n\n\
    Keeps a status text split into lines and prints one line at a time,\n\
    for status bars that run `ssstatus show` periodically."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Set the body of your status; it is split into lines automatically
    Set {
        /// The status text
        #[arg(value_name = "STATUS", allow_hyphen_values = true)]
        text: String,
    },
    /// Set the maximum length of a status line (default 80 characters)
    Setlength {
        /// New maximum length, clamped to 1..=10000
        #[arg(value_name = "LENGTH", allow_hyphen_values = true)]
        length: String,
    },
    /// Set the status to an empty string
    Clear,
    /// Print the current status line (line 1 after every set)
    Show,
    /// Scroll to the previous status line
    Up,
    /// Scroll to the next status line
    Down,
    /// Reset status, config and log in the ssstatus home (overwrites them)
    Setup,
}

pub fn run() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return usage_fallback(&err),
    };

    let Some(command) = cli.command else {
        return print_usage();
    };

    let paths = Paths::resolve()?;
    fs::create_dir_all(&paths.home)
        .with_context(|| format!("create ssstatus home {}", paths.home.display()))?;

    // Missing diagnostics must not stop the bar from rendering.
    if let Err(err) = logging::init(&paths.log()) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    interrupt::init()?;

    let lock_file = FileLock::new(paths.lock());
    let _guard = lock::acquire(&lock_file, &lock_policy()?)?;

    let mut controller = StatusController::new(FileStore::new(paths.clone()));
    dispatch(command, &mut controller, &paths)
}

fn dispatch(
    command: Commands,
    controller: &mut StatusController<FileStore>,
    paths: &Paths,
) -> Result<()> {
    match command {
        Commands::Set { text } => commands::status::set(controller, &text),
        Commands::Setlength { length } => commands::status::set_length(controller, &length),
        Commands::Clear => commands::status::clear(controller),
        Commands::Show => commands::status::show(controller),
        Commands::Up => commands::scroll::up(controller),
        Commands::Down => commands::scroll::down(controller),
        Commands::Setup => commands::setup::run(controller, paths),
    }
}

/// Unknown commands and wrong argument counts print the usage, not an error.
fn usage_fallback(err: &clap::Error) -> Result<()> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            err.print().context("print help")?;
            Ok(())
        }
        _ => print_usage(),
    }
}

fn print_usage() -> Result<()> {
    Cli::command().print_help().context("print help")?;
    println!();
    Ok(())
}

fn lock_policy() -> Result<LockPolicy> {
    let policy = LockPolicy::default();
    match std::env::var(LOCK_TIMEOUT_ENV) {
        Ok(raw) => {
            let millis: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid {LOCK_TIMEOUT_ENV} value '{raw}'"))?;
            Ok(policy.with_timeout(Duration::from_millis(millis)))
        }
        Err(_) => Ok(policy),
    }
}
