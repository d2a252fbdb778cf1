// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for scif operations.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience Result type with scif Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during scif operations.
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Recipe file given to install/preview does not exist
    #[error("Recipe {0:?} does not exist")]
    #[diagnostic(
        code(scif::recipe_not_found),
        help("Check the path to the .scif recipe file")
    )]
    RecipeNotFound(PathBuf),

    /// Failed to read file
    #[error("Failed to read file: {path:?}")]
    #[diagnostic(code(scif::read_failed))]
    ReadFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Failed to write file or create a directory
    #[error("Failed to write {path:?}")]
    #[diagnostic(code(scif::write_failed))]
    WriteFailed {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Install requested a writable base that is not writable
    #[error("No write access to {0:?}")]
    #[diagnostic(
        code(scif::no_write_access),
        help("Choose another base with SCIF_BASE or run with sufficient permissions")
    )]
    NoWriteAccess(PathBuf),

    /// A section header without an app name
    #[error("Section header on line {line} has no app name: {header:?}")]
    #[diagnostic(
        code(scif::unnamed_section),
        help("Every section needs an app name, e.g. '%apprun hello-world'")
    )]
    UnnamedSection { line: usize, header: String },

    /// App name is not part of the loaded configuration
    #[error("{name} is not a valid app")]
    #[diagnostic(code(scif::unknown_app), help("{}", suggestion_message(similar)))]
    UnknownApp { name: String, similar: Vec<String> },

    /// Malformed %appfiles entry
    #[error("Invalid appfiles entry for {app}: {entry:?}")]
    #[diagnostic(
        code(scif::invalid_files_entry),
        help("Each %appfiles line must be a 'source destination' pair")
    )]
    InvalidFilesEntry { app: String, entry: String },

    /// Source of an %appfiles entry is missing
    #[error("File to copy does not exist: {0:?}")]
    #[diagnostic(code(scif::source_not_found))]
    SourceNotFound(PathBuf),

    /// Install commands exited with non-zero status
    #[error("Install commands for {app} failed (exit code: {code:?})")]
    #[diagnostic(code(scif::command_failed))]
    CommandFailed { app: String, code: Option<i32> },

    /// Entrypoint string could not be split into words
    #[error("Cannot parse entrypoint {entrypoint:?}")]
    #[diagnostic(code(scif::invalid_entrypoint), help("Check for unbalanced quotes"))]
    InvalidEntrypoint {
        entrypoint: String,
        #[source]
        error: shell_words::ParseError,
    },

    /// Entrypoint resolved to no command at all
    #[error("Entrypoint for {0} is empty")]
    #[diagnostic(code(scif::empty_entrypoint))]
    EmptyEntrypoint(String),

    /// The command to execute was not found on the search path
    #[error("Executable not found: {program}")]
    #[diagnostic(code(scif::executable_not_found))]
    ExecutableNotFound {
        program: String,
        #[source]
        error: which::Error,
    },

    /// The child process could not be started
    #[error("Failed to start {program:?}")]
    #[diagnostic(code(scif::spawn_failed))]
    SpawnFailed {
        program: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// The app itself ran and exited non-zero
    #[error("{name} exited with code {code:?}")]
    #[diagnostic(code(scif::app_failed))]
    AppFailed { name: String, code: Option<i32> },

    /// Serialization of labels or inspect output
    #[error(transparent)]
    #[diagnostic(code(scif::json_error))]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(code(scif::yaml_error))]
    Yaml(#[from] serde_yaml::Error),

    /// IO error passthrough
    #[error(transparent)]
    #[diagnostic(code(scif::io_error))]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Exit code that the command line should use for this error.
    ///
    /// A failing app keeps its own exit code so callers can tell
    /// "scif failed" apart from "the app failed".
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AppFailed { code: Some(code), .. } => *code,
            _ => 1,
        }
    }
}

fn suggestion_message(similar: &[String]) -> String {
    if similar.is_empty() {
        "Run 'scif apps' to list installed apps".to_string()
    } else {
        format!("Did you mean one of: {}?", similar.join(", "))
    }
}
