//! df - generic fixture playback: `df <platform> <command>` prints `<root>/<platform>/<command>`.

use std::process::ExitCode;

use cmdmock::commands::MockCommand;

fn main() -> ExitCode {
    cmdmock::dispatch::run(MockCommand::Generic)
}
