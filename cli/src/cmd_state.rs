// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{Arg, ArgMatches, Command};
use colored::Colorize;
use radisync_core::{GoogleToken, SyncEngine, checkpoint, connect, keys};

#[derive(Debug, Clone)]
pub struct CmdConnect {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub calendar_id: String,
}

impl CmdConnect {
    pub const NAME: &str = "connect";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Store the Google access token and target calendar")
            .arg(
                Arg::new("access_token")
                    .long("access-token")
                    .value_name("TOKEN")
                    .required(true)
                    .help("OAuth access token for the Calendar API"),
            )
            .arg(
                Arg::new("refresh_token")
                    .long("refresh-token")
                    .value_name("TOKEN")
                    .help("OAuth refresh token, kept alongside the access token"),
            )
            .arg(
                Arg::new("calendar_id")
                    .long("calendar-id")
                    .value_name("ID")
                    .required(true)
                    .help("Identifier of the Google calendar to sync with"),
            )
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let access_token = matches
            .get_one::<String>("access_token")
            .cloned()
            .ok_or("Access token is required")?;
        let calendar_id = matches
            .get_one::<String>("calendar_id")
            .cloned()
            .ok_or("Calendar id is required")?;
        Ok(Self {
            access_token,
            refresh_token: matches.get_one::<String>("refresh_token").cloned(),
            calendar_id,
        })
    }

    pub async fn run(self, engine: &SyncEngine) -> Result<(), Box<dyn Error>> {
        tracing::debug!(calendar_id = %self.calendar_id, "connecting...");
        let token = GoogleToken {
            refresh_token: self.refresh_token,
            ..GoogleToken::new(self.access_token)
        };
        connect(engine.store(), &token, &self.calendar_id).await?;
        println!("{} connected to {}", "✔".green(), self.calendar_id.bold());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CmdStatus;

impl CmdStatus {
    pub const NAME: &str = "status";

    pub fn command() -> Command {
        Command::new(Self::NAME).about("Show which connection and checkpoint values are stored")
    }

    pub fn from(_matches: &ArgMatches) -> Self {
        Self
    }

    pub async fn run(self, engine: &SyncEngine) -> Result<(), Box<dyn Error>> {
        tracing::debug!("reading state...");
        for key in keys::ALL {
            let present = engine.store().get(key).await?.is_some();
            let state = match present {
                true => "present".green(),
                false => "missing".dimmed(),
            };
            println!("{key:<20} {state}");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CmdReset;

impl CmdReset {
    pub const NAME: &str = "reset";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Forget the Google connection and both checkpoints")
            .long_about(
                "Forget the Google connection and both checkpoints. \
The next sync after reconnecting starts from a full baseline on both sides.",
            )
    }

    pub fn from(_matches: &ArgMatches) -> Self {
        Self
    }

    pub async fn run(self, engine: &SyncEngine) -> Result<(), Box<dyn Error>> {
        tracing::debug!("resetting state...");
        checkpoint::reset(engine.store()).await?;
        println!("{} state cleared", "✔".green());
        Ok(())
    }
}
