// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! scif - The Scientific Filesystem
//!
//! This crate provides the core library for installing and running
//! self-describing applications that share one filesystem root.
//!
//! # Overview
//!
//! A recipe declares apps by section. Installing it lays every app out under
//! `<base>/apps/<name>`, with its own `bin`, `lib`, data folder and the
//! scripts the recipe defined. Activating an app makes its paths the
//! "current" ones in the environment, exclusive of any other app.
//!
//! # Example
//!
//! ```text
//! # hello-world.scif
//! %appenv hello-world
//!     THEBESTFRUIT=avocado
//! %apprun hello-world
//!     echo "The best fruit is $THEBESTFRUIT"
//! %apptest hello-world
//!     test -n "$THEBESTFRUIT"
//! ```
//!
//! ```no_run
//! let mut client = scif::ScifClient::from_env();
//! client.install("hello-world.scif", &[], false)?;
//! client.run("hello-world", &[])?;
//! # Ok::<(), scif::Error>(())
//! ```

pub mod client;
pub mod config;
pub mod defaults;
mod dispatch;
pub mod entrypoint;
pub mod environment;
pub mod error;
pub mod inspect;
mod install;
pub mod lookup;
mod preview;
pub mod process;
pub mod recipe;
pub mod section;

pub use client::ScifClient;
pub use config::Configuration;
pub use defaults::ScifSettings;
pub use environment::{EnvMap, Exporter, NoopExporter, ProcessExporter};
pub use error::{Error, Result};
pub use inspect::{InspectFormat, InspectSelection};
pub use lookup::AppLookup;
pub use section::{AppSettings, SectionKind};
