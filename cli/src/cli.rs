// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, ffi::OsString, path::PathBuf, process::ExitCode, sync::Arc};

use clap::{ArgMatches, Command, ValueHint, arg, builder::styling, crate_version, value_parser};
use colored::Colorize;
use futures::{FutureExt, future::LocalBoxFuture};
use radisync_caldav::CalDavClient;
use radisync_core::{APP_NAME, FileStore, SyncEngine};
use tracing_subscriber::EnvFilter;

use crate::cmd_state::{CmdConnect, CmdReset, CmdStatus};
use crate::cmd_sync::{CmdImport, CmdSync};
use crate::config::parse_config;

/// Run the radisync command-line interface.
pub async fn run() -> ExitCode {
    let result = match Cli::parse() {
        Ok(cli) => {
            init_tracing(cli.verbose);
            cli.run().await
        }
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default filter.
fn init_tracing(verbose: bool) {
    let default = match verbose {
        true => "warn,radisync=debug,radisync_core=debug,radisync_caldav=debug,radisync_google=debug,radisync_cli=debug",
        false => "warn,radisync=info,radisync_core=info,radisync_caldav=info,radisync_google=info,radisync_cli=info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        tracing::debug!("tracing subscriber already installed: {e}");
    }
}

/// Command-line interface
#[derive(Debug)]
pub struct Cli {
    /// Path to the configuration file
    pub config: Option<PathBuf>,

    /// Whether to log debug output
    pub verbose: bool,

    /// The command to execute
    pub command: Commands,
}

impl Cli {
    /// Create the command-line interface
    pub fn command() -> Command {
        const STYLES: styling::Styles = styling::Styles::styled()
            .header(styling::AnsiColor::Green.on_default().bold())
            .usage(styling::AnsiColor::Green.on_default().bold())
            .literal(styling::AnsiColor::Blue.on_default().bold())
            .placeholder(styling::AnsiColor::Cyan.on_default());

        Command::new(APP_NAME)
            .about("Keep a CalDAV collection and a Google calendar in sync.")
            .author("Zexin Yuan <aim@yzx9.xyz>")
            .version(crate_version!())
            .styles(STYLES)
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                arg!(-c --config [CONFIG] "Path to the configuration file")
                    .long_help(
                        "\
Path to the configuration file. Defaults to $RADISYNC_CONFIG, then \
$XDG_CONFIG_HOME/radisync/config.toml on Linux and MacOS, \
%LOCALAPPDATA%/radisync/config.toml on Windows.",
                    )
                    .global(true)
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .arg(arg!(-v --verbose "Show debug logs").global(true))
            .subcommand(CmdSync::command())
            .subcommand(CmdImport::command())
            .subcommand(CmdConnect::command())
            .subcommand(CmdStatus::command())
            .subcommand(CmdReset::command())
    }

    /// Parse the command-line arguments
    pub fn parse() -> Result<Self, Box<dyn Error>> {
        let commands = Self::command();
        let matches = commands.get_matches();
        Self::from(&matches)
    }

    /// Parse the specified arguments
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, Box<dyn Error>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let commands = Self::command();
        let matches = commands.try_get_matches_from(args)?;
        Self::from(&matches)
    }

    /// Create a CLI instance from the `ArgMatches`
    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        use Commands::{Connect, Import, Reset, Status, Sync};
        let command = match matches.subcommand() {
            Some((CmdSync::NAME, matches)) => Sync(CmdSync::from(matches)),
            Some((CmdImport::NAME, matches)) => Import(CmdImport::from(matches)),
            Some((CmdConnect::NAME, matches)) => Connect(CmdConnect::from(matches)?),
            Some((CmdStatus::NAME, matches)) => Status(CmdStatus::from(matches)),
            Some((CmdReset::NAME, matches)) => Reset(CmdReset::from(matches)),
            _ => return Err("No command given".into()),
        };

        let config = matches.get_one("config").cloned();
        let verbose = matches.get_flag("verbose");
        Ok(Cli {
            config,
            verbose,
            command,
        })
    }

    /// Run the command
    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        self.command.run(self.config).await
    }
}

/// The commands available in the CLI
#[derive(Debug, Clone)]
pub enum Commands {
    /// Run sync passes
    Sync(CmdSync),

    /// Copy every `CalDAV` event into Google
    Import(CmdImport),

    /// Store the Google credential and calendar
    Connect(CmdConnect),

    /// Show the stored state
    Status(CmdStatus),

    /// Forget the stored state
    Reset(CmdReset),
}

impl Commands {
    /// Run the command with the given configuration
    #[rustfmt::skip]
    pub async fn run(self, config: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
        use Commands::{Connect, Import, Reset, Status, Sync};
        match self {
            Sync(a)    => Self::run_with(config, |x| a.run(x).boxed_local()).await,
            Import(a)  => Self::run_with(config, |x| a.run(x).boxed_local()).await,
            Connect(a) => Self::run_with(config, |x| a.run(x).boxed_local()).await,
            Status(a)  => Self::run_with(config, |x| a.run(x).boxed_local()).await,
            Reset(a)   => Self::run_with(config, |x| a.run(x).boxed_local()).await,
        }
    }

    async fn run_with<F>(config: Option<PathBuf>, f: F) -> Result<(), Box<dyn Error>>
    where
        F: for<'a> FnOnce(&'a SyncEngine) -> LocalBoxFuture<'a, Result<(), Box<dyn Error>>>,
    {
        tracing::debug!("parsing configuration...");
        let config = parse_config(config).await?;
        let state_file = config
            .core
            .state_file()
            .ok_or("No state directory configured and none could be determined")?;
        tracing::debug!(path = %state_file.display(), "opening state file");

        let caldav = CalDavClient::new(config.caldav)?;
        let store = Arc::new(FileStore::new(state_file));
        let engine = SyncEngine::new(caldav, config.google, store);

        f(&engine).await
    }
}
