//! cmdmock - inspect and install command-output mocks.
//!
//! Usage:
//!   cmdmock rules                          # print every mock's rule table
//!   cmdmock resolve smartctl -- --info ada0
//!   cmdmock check --platform freebsd       # report fixture coverage
//!   cmdmock install --bin-dir ./mock-bin   # link the mocks for PATH use

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, error, info};

use cmdmock::check::check_store;
use cmdmock::commands::MockCommand;
use cmdmock::config::{MockConfig, default_platform};
use cmdmock::dispatch::{Dispatcher, EXIT_FAILURE};
use cmdmock::fixture::{FixtureStore, RealFs};
#[cfg(unix)]
use cmdmock::install::{install_links, search_path_with, sibling_bin_dir};
use cmdmock::logging::init_cli_logging;
use cmdmock::platform::Platform;
use cmdmock::rules::Rule;

/// Inspect and install command-output mocks.
#[derive(Parser)]
#[command(name = "cmdmock", about = "Inspect and install command-output mocks", version)]
struct Args {
    /// Fixture root (`<test-root>/data/mock-output`).
    #[arg(long, env = "CMDMOCK_FIXTURE_ROOT", global = true, value_name = "PATH")]
    fixture_root: Option<PathBuf>,

    /// Platform directory to read fixtures from. Defaults to the host OS.
    #[arg(long, env = "CMDMOCK_PLATFORM", global = true, value_name = "NAME")]
    platform: Option<Platform>,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the fixture path a mock would replay for an invocation.
    Resolve {
        /// Also fail if the fixture file does not exist.
        #[arg(long)]
        check: bool,

        /// Mocked command name (smartctl, zfs, zpool, df).
        mock: MockCommand,

        /// Arguments as the code under test would pass them. Use `--` before
        /// arguments that start with a dash.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Print every mock's rules in evaluation order.
    Rules {
        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Report which fixtures exist for the configured platform.
    Check {
        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Link the mock executables into a directory for use on PATH.
    Install {
        /// Directory to create the links in.
        #[arg(long, value_name = "DIR")]
        bin_dir: PathBuf,

        /// Directory holding the built mocks. Defaults to this binary's directory.
        #[arg(long, value_name = "DIR")]
        from: Option<PathBuf>,

        /// Replace existing entries.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Serialize)]
struct RuleTable {
    command: MockCommand,
    rules: &'static [Rule],
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_cli_logging(args.verbose, args.quiet);

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(args: Args) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match args.command {
        Command::Resolve { check, mock, args: mock_args } => {
            let config = config(args.fixture_root, args.platform)?;
            let dispatcher = Dispatcher::from_config(mock, &config);
            let path = dispatcher.resolve(&mock_args)?;
            if check && !path.is_file() {
                error!("fixture does not exist: {}", path.display());
                return Ok(ExitCode::from(EXIT_FAILURE));
            }
            println!("{}", path.display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Rules { json } => {
            print_rules(json)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { json } => {
            let config = config(args.fixture_root, args.platform)?;
            info!(
                "Checking {} fixtures under {}",
                config.platform,
                config.fixture_root.display()
            );
            let store = FixtureStore::new(RealFs::new(), config.fixture_root);
            let report = check_store(&store, config.platform);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report);
            }

            let missing = report.missing();
            if missing.is_empty() {
                Ok(ExitCode::SUCCESS)
            } else {
                error!("{} fixed fixtures missing", missing.len());
                Ok(ExitCode::from(EXIT_FAILURE))
            }
        }
        Command::Install {
            bin_dir,
            from,
            force,
        } => install(bin_dir, from, force),
    }
}

fn config(
    fixture_root: Option<PathBuf>,
    platform: Option<Platform>,
) -> Result<MockConfig, Box<dyn std::error::Error>> {
    let fixture_root =
        fixture_root.ok_or("fixture root not set (use --fixture-root or CMDMOCK_FIXTURE_ROOT)")?;
    let platform = match platform {
        Some(platform) => platform,
        None => default_platform()?,
    };
    debug!("Config: root={}, platform={}", fixture_root.display(), platform);
    Ok(MockConfig::new(fixture_root, platform))
}

fn print_rules(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let tables: Vec<RuleTable> = MockCommand::ALL
        .into_iter()
        .map(|command| RuleTable {
            command,
            rules: command.rules().rules(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&tables)?);
        return Ok(());
    }

    for table in &tables {
        println!("{}:", table.command);
        for (i, rule) in table.rules.iter().enumerate() {
            println!(
                "  {:>2}. {:<48} -> {}",
                i + 1,
                rule.describe(),
                rule.describe_target()
            );
        }
    }
    Ok(())
}

#[cfg(unix)]
fn install(
    bin_dir: PathBuf,
    from: Option<PathBuf>,
    force: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let from = match from {
        Some(dir) => dir,
        None => sibling_bin_dir()?,
    };
    let links = install_links(&bin_dir, &from, force)?;
    for link in &links {
        debug!("{}", link.display());
    }

    let path = search_path_with(&bin_dir, std::env::var_os("PATH"))?;
    println!("PATH={}", path.to_string_lossy());
    Ok(ExitCode::SUCCESS)
}

#[cfg(not(unix))]
fn install(
    _bin_dir: PathBuf,
    _from: Option<PathBuf>,
    _force: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    Err("install is only supported on Unix".into())
}
