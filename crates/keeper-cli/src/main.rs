//! # skill-keeper
//!
//! Keeps per-service `SKILL.md` documentation in sync with the source it
//! describes. Management commands edit the registry and regenerate
//! artifacts; `hook` subcommands are wired into git and the coding agent.

#![deny(unsafe_code)]

mod cli;
mod commands;
mod hooks;
mod install;
mod project;

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use keeper_core::logging::{DEFAULT_LEVEL, init_subscriber};

use crate::cli::{Cli, Command};
use crate::project::Project;

/// Exit code for configuration and input errors.
const EXIT_ERROR: u8 = 2;

fn main() -> ExitCode {
    let args = Cli::parse();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    match args.command {
        Command::Hook(hook) => {
            let level = args
                .log_level
                .or_else(|| std::env::var("KEEPER_LOG").ok())
                .unwrap_or_else(|| DEFAULT_LEVEL.to_string());
            init_subscriber(&level);
            let stdin = if hook.reads_stdin() {
                read_stdin()
            } else {
                String::new()
            };
            let mut stdout = std::io::stdout().lock();
            let code = hooks::run(hook, args.root.as_deref(), &cwd, &stdin, &mut stdout);
            let _ = stdout.flush();
            ExitCode::from(code)
        }
        command => match manage(args.root.as_deref(), args.log_level.as_deref(), command, &cwd) {
            Ok(code) => ExitCode::from(code),
            Err(e) => {
                eprintln!("skill-keeper: {e:#}");
                ExitCode::from(EXIT_ERROR)
            }
        },
    }
}

fn manage(root: Option<&Path>, log_level: Option<&str>, command: Command, cwd: &Path) -> Result<u8> {
    let project = Project::resolve(root, cwd);
    let level = log_level.map_or_else(
        || {
            project
                .as_ref()
                .map_or(DEFAULT_LEVEL.to_string(), |p| p.settings.logging.level.clone())
        },
        ToString::to_string,
    );
    init_subscriber(&level);
    let project = project?;
    debug!(?command, "running command");

    let mut stdout = std::io::stdout().lock();
    let code = commands::run(&project, command, cwd, &mut stdout)?;
    stdout.flush().context("failed to flush stdout")?;
    Ok(code)
}

/// Hook stdin. A read failure yields an empty string, which the hook then
/// rejects as invalid input.
fn read_stdin() -> String {
    let mut buf = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
        debug!(error = %e, "failed to read stdin");
    }
    buf
}
