// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `scif inspect` command.

use clap::Args;
use colored::Colorize;
use miette::Result;
use scif::{InspectFormat, InspectSelection};

/// Show the sections of an installed app
#[derive(Debug, Args)]
pub struct CmdInspect {
    /// App to inspect
    app: String,

    /// Show the runscript and its help
    #[clap(short, long)]
    runscript: bool,

    /// Show the environment section
    #[clap(short, long)]
    environ: bool,

    /// Show labels (the default)
    #[clap(short, long)]
    labels: bool,

    /// Show install commands
    #[clap(short, long)]
    install: bool,

    /// Show files to copy
    #[clap(short, long)]
    files: bool,

    /// Show the test script
    #[clap(short, long)]
    test: bool,

    /// Show every section
    #[clap(short, long)]
    all: bool,

    /// Output format: text, json, yaml
    #[clap(long, default_value = "text")]
    format: InspectFormat,

    #[clap(flatten)]
    base: crate::BaseFlags,
}

impl CmdInspect {
    pub fn run(&mut self) -> Result<i32> {
        let mut client = self.base.client();
        client.load(None)?;

        let output = client.inspect(&self.app, &self.selection(), self.format)?;
        if self.format == InspectFormat::Text {
            for line in output.lines() {
                if line.starts_with('%') {
                    println!("{}", line.bold());
                } else {
                    println!("{line}");
                }
            }
        } else {
            print!("{output}");
        }
        Ok(0)
    }

    fn selection(&self) -> InspectSelection {
        let selection = InspectSelection {
            runscript: self.runscript,
            environ: self.environ,
            labels: self.labels,
            install: self.install,
            files: self.files,
            test: self.test,
            all: self.all,
        };
        if selection == InspectSelection::default() {
            InspectSelection {
                labels: true,
                ..selection
            }
        } else {
            selection
        }
    }
}
