// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, ValueEnum, arg, value_parser};
use colored::Colorize;
use radisync_core::{Direction, PassReport, SyncEngine, SyncError};

#[derive(Debug, Clone, Copy)]
pub struct CmdSync {
    pub direction: SyncDirection,
}

impl CmdSync {
    pub const NAME: &str = "sync";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Sync changes since the last successful pass")
            .arg(
                arg!([direction] "Which direction to sync")
                    .value_parser(value_parser!(SyncDirection))
                    .default_value("all"),
            )
    }

    pub fn from(matches: &ArgMatches) -> Self {
        let direction = matches
            .get_one::<SyncDirection>("direction")
            .copied()
            .unwrap_or(SyncDirection::All);
        Self { direction }
    }

    pub async fn run(self, engine: &SyncEngine) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "running sync...");
        let passes = match self.direction {
            SyncDirection::CaldavToGoogle => {
                let report = engine.run(Direction::CalDavToGoogle).await;
                vec![(Direction::CalDavToGoogle, report)]
            }
            SyncDirection::GoogleToCaldav => {
                let report = engine.run(Direction::GoogleToCalDav).await;
                vec![(Direction::GoogleToCalDav, report)]
            }
            SyncDirection::All => {
                let pair = engine
                    .run_pair()
                    .await?
                    .ok_or("Google calendar is not connected, run `radisync connect` first")?;
                vec![
                    (Direction::CalDavToGoogle, pair.caldav_to_google),
                    (Direction::GoogleToCalDav, pair.google_to_caldav),
                ]
            }
        };

        let mut failed = 0;
        for (direction, result) in &passes {
            if !print_pass(*direction, result) {
                failed += 1;
            }
        }

        match failed {
            0 => Ok(()),
            n => Err(format!("{n} of {} sync passes failed", passes.len()).into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SyncDirection {
    /// Copy `CalDAV` changes into Google
    CaldavToGoogle,
    /// Copy Google changes into `CalDAV`
    GoogleToCaldav,
    /// Both directions, `CalDAV` first
    All,
}

#[derive(Debug, Clone, Copy)]
pub struct CmdImport;

impl CmdImport {
    pub const NAME: &str = "import";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Create every CalDAV event in an empty Google calendar")
            .long_about(
                "Create every CalDAV event in Google without looking for existing copies. \
Meant for seeding an empty calendar; no sync checkpoint is read or written.",
            )
    }

    pub fn from(_matches: &ArgMatches) -> Self {
        Self
    }

    pub async fn run(self, engine: &SyncEngine) -> Result<(), Box<dyn Error>> {
        tracing::debug!("importing events...");
        let result = engine.import().await?;

        println!(
            "{} imported: created={}, errors={}",
            "✔".green(),
            result.created,
            result.errors.len()
        );
        print_errors(&result.errors);
        Ok(())
    }
}

/// Prints the outcome of one pass, returning false if it failed fatally.
fn print_pass(direction: Direction, result: &Result<PassReport, SyncError>) -> bool {
    match result {
        Ok(report) => {
            let mark = match report.is_clean() {
                true => "✔".green(),
                false => "!".yellow(),
            };
            println!("{mark} {}: {report}", direction.to_string().bold());
            if report.checkpoint_saved {
                println!("  checkpoint advanced");
            } else {
                println!("  {}", "checkpoint kept, failed items will be retried".yellow());
            }
            print_errors(&report.errors().map(str::to_string).collect::<Vec<_>>());
            true
        }
        Err(e) => {
            println!("{} {}: {}", "✘".red(), direction.to_string().bold(), e);
            false
        }
    }
}

fn print_errors(errors: &[String]) {
    for error in errors {
        println!("  {} {error}", "-".red());
    }
}
