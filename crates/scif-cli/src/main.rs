// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! scif - The Scientific Filesystem CLI

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::Result;

mod cmd_apps;
mod cmd_exec;
mod cmd_help;
mod cmd_inspect;
mod cmd_install;
mod cmd_preview;
mod cmd_run;
mod cmd_shell;
mod cmd_test;

use cmd_apps::CmdApps;
use cmd_exec::CmdExec;
use cmd_help::CmdHelp;
use cmd_inspect::CmdInspect;
use cmd_install::CmdInstall;
use cmd_preview::CmdPreview;
use cmd_run::CmdRun;
use cmd_shell::CmdShell;
use cmd_test::CmdTest;


#[derive(Parser)]
#[clap(
    name = "scif",
    about = "The Scientific Filesystem",
    version,
    long_about = "Install, inspect and run self-describing apps under a single filesystem root",
    disable_help_subcommand = true
)]
struct Opt {
    #[clap(flatten)]
    logging: Logging,

    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Parser)]
struct Logging {
    /// Increase verbosity (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[clap(short, long, global = true)]
    quiet: bool,
}

#[derive(Parser, Clone, Debug, Default)]
pub struct BaseFlags {
    /// Root of the scientific filesystem
    #[clap(long, env = "SCIF_BASE")]
    pub base: Option<PathBuf>,
}

impl BaseFlags {
    /// A client for the selected base that exports to this process.
    pub fn client(&self) -> scif::ScifClient {
        let mut vars: scif::EnvMap = std::env::vars().collect();
        if let Some(base) = &self.base {
            vars.insert("SCIF_BASE".to_string(), base.display().to_string());
        }
        scif::ScifClient::from_vars(vars)
    }
}

#[derive(Subcommand)]
enum Command {
    /// List installed apps
    Apps(CmdApps),

    /// Install apps from a recipe
    Install(CmdInstall),

    /// Show what installing a recipe would create
    Preview(CmdPreview),

    /// Show the sections of an installed app
    Inspect(CmdInspect),

    /// Run an app's runscript
    Run(CmdRun),

    /// Run a command inside an app's environment
    Exec(CmdExec),

    /// Run an app's tests
    Test(CmdTest),

    /// Open a shell in the base or inside an app
    Shell(CmdShell),

    /// Show the help of an installed app
    Help(CmdHelp),
}

impl Opt {
    fn run(self) -> Result<i32> {
        // Setup logging
        let log_level = match (self.logging.quiet, self.logging.verbose) {
            (true, _) => tracing::Level::ERROR,
            (false, 0) => tracing::Level::WARN,
            (false, 1) => tracing::Level::INFO,
            (false, 2) => tracing::Level::DEBUG,
            (false, _) => tracing::Level::TRACE,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .init();

        // Dispatch to command
        match self.cmd {
            Command::Apps(mut cmd) => cmd.run(),
            Command::Install(mut cmd) => cmd.run(),
            Command::Preview(mut cmd) => cmd.run(),
            Command::Inspect(mut cmd) => cmd.run(),
            Command::Run(mut cmd) => cmd.run(),
            Command::Exec(mut cmd) => cmd.run(),
            Command::Test(mut cmd) => cmd.run(),
            Command::Shell(mut cmd) => cmd.run(),
            Command::Help(mut cmd) => cmd.run(),
        }
    }
}

/// Exit code for a finished app: a failing app passes its own code through,
/// any other error is reported.
pub fn app_exit_code(result: scif::Result<()>) -> Result<i32> {
    match result {
        Ok(()) => Ok(0),
        Err(err @ scif::Error::AppFailed { .. }) => {
            tracing::debug!("{err}");
            Ok(err.exit_code())
        }
        Err(err) => Err(err.into()),
    }
}

fn main() -> Result<()> {
    let opt = Opt::parse();
    let code = opt.run()?;
    std::process::exit(code);
}
