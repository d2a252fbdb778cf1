// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `scif apps` command.

use clap::Args;
use miette::Result;

/// List installed apps
#[derive(Debug, Args)]
pub struct CmdApps {
    /// Also print each app's root folder
    #[clap(short, long)]
    longlist: bool,

    #[clap(flatten)]
    base: crate::BaseFlags,
}

impl CmdApps {
    pub fn run(&mut self) -> Result<i32> {
        let mut client = self.base.client();
        client.load(None)?;
        print!("{}", client.list_apps(self.longlist)?);
        Ok(0)
    }
}
