// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Child processes: install scripts and app entrypoints.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use crate::environment::EnvMap;
use crate::{Error, Result};

#[cfg(test)]
#[path = "./process_test.rs"]
mod process_test;

/// Interpreter for install scripts.
pub const SCRIPT_SHELL: &str = "/bin/sh";

/// Run `script` with `sh -c` in `cwd`.
///
/// The script is recipe content and runs with the full rights of the
/// caller. Its output is passed through.
pub fn run_script(script: &str, cwd: &Path, env: &EnvMap) -> Result<ExitStatus> {
    tracing::trace!("{SCRIPT_SHELL} -c {script:?} in {}", cwd.display());
    Command::new(SCRIPT_SHELL)
        .arg("-c")
        .arg(script)
        .current_dir(cwd)
        .envs(env)
        .status()
        .map_err(|error| Error::SpawnFailed {
            program: PathBuf::from(SCRIPT_SHELL),
            error,
        })
}

/// Resolve `program` against a `PATH` value, relative to `cwd`.
pub fn find_executable(program: &str, path_var: Option<&str>, cwd: &Path) -> Result<PathBuf> {
    which::which_in(program, path_var, cwd).map_err(|error| Error::ExecutableNotFound {
        program: program.to_string(),
        error,
    })
}

/// Spawn `program` with inherited stdio and wait for it.
pub fn spawn(program: &Path, args: &[String], cwd: &Path, env: &EnvMap) -> Result<ExitStatus> {
    tracing::debug!("Spawning {} {args:?} in {}", program.display(), cwd.display());
    Command::new(program)
        .args(args)
        .current_dir(cwd)
        .envs(env)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|error| Error::SpawnFailed {
            program: program.to_path_buf(),
            error,
        })
}
