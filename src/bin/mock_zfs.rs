//! zfs - replays recorded `zfs list` output.

use std::process::ExitCode;

use cmdmock::commands::MockCommand;

fn main() -> ExitCode {
    cmdmock::dispatch::run(MockCommand::Zfs)
}
