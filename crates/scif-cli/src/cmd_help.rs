// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `scif help` command.

use clap::Args;
use colored::Colorize;
use miette::Result;

/// Show the help of an installed app
#[derive(Debug, Args)]
pub struct CmdHelp {
    /// App to show help for
    app: String,

    #[clap(flatten)]
    base: crate::BaseFlags,
}

impl CmdHelp {
    pub fn run(&mut self) -> Result<i32> {
        let mut client = self.base.client();
        client.load(None)?;

        let help = client.help(&self.app)?;
        if !help.is_empty() {
            println!("{}", format!("%apphelp {}", self.app).bold());
            print!("{help}");
        }
        Ok(0)
    }
}
