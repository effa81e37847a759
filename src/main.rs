//! Tagdrive CLI application entry point
//!
//! Command-line client for a tag-based file drive. Every command loads the
//! tag catalog and the file listing, performs its operation and prints the
//! resulting notifications.
//!
//! # Usage
//!
//! ```bash
//! # List files tagged both "tax" and "work"
//! tagdrive files -t tax work
//!
//! # Files with any of the tags, newest first
//! tagdrive files -t tax work --any --sort time --desc
//!
//! # Tag several files at once
//! tagdrive bulk add invoice.pdf receipt.pdf -t tax
//!
//! # Try it without a server
//! tagdrive --offline files
//!
//! # Quiet mode (only output results)
//! tagdrive -q files -s invoice
//! ```
//!
//! # Configuration
//!
//! On first run, tagdrive will prompt for the server address. Configuration
//! is stored in the user's config directory (`~/.config/tagdrive/config.toml`
//! on Linux) and can be overridden with `TAGDRIVE_*` environment variables.

use std::process::ExitCode;
use tagdrive::{
    TagdriveError,
    api::{HttpApi, MockApi},
    cli::Cli,
    commands,
    config::ClientConfig,
    drive::Drive,
    logging,
};

type Result<T> = std::result::Result<T, TagdriveError>;

fn run(cli: &Cli) -> Result<()> {
    let mut config = if cli.offline {
        ClientConfig::default()
    } else {
        ClientConfig::load_or_setup()?
    };
    if let Some(server) = &cli.server {
        config.server_url.clone_from(server);
    }
    let quiet = cli.quiet || config.quiet;
    let settings = config.notifications.settings();

    if cli.offline {
        tracing::info!("using built-in demo data");
        let mut drive = Drive::new(MockApi::demo(), config.refresh_policy, settings);
        return commands::execute(&mut drive, &cli.command, quiet);
    }

    tracing::info!(server = %config.server_url, "connecting");
    let api = HttpApi::new(&config.server_url, config.cookie.clone(), config.request_timeout())?;
    let mut drive = Drive::new(api, config.refresh_policy, settings);
    commands::execute(&mut drive, &cli.command, quiet)
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(TagdriveError::OperationsFailed(_)) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
