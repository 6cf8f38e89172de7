//! Runs commands for real, inheriting stdio

use super::{CommandOutcome, CommandRunner, Invocation};
use log::{debug, warn};
use std::process::Command;

/// Spawns each invocation and waits for it to exit
///
/// The helper itself is detached by `screen -d -m`, so waiting here only
/// waits for `screen` to fork the session.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&mut self, invocation: &Invocation) -> CommandOutcome {
        debug!("exec {:?}", invocation.argv());
        match Command::new(&invocation.program)
            .args(&invocation.args)
            .status()
        {
            Ok(status) => CommandOutcome::Exited {
                code: status.code(),
            },
            Err(e) => {
                warn!("could not start {}: {}", invocation.program, e);
                CommandOutcome::SpawnFailed(e.to_string())
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_are_reported() {
        let mut runner = SystemRunner::new();
        assert_eq!(
            runner.run(&Invocation::new("true", Vec::<String>::new())),
            CommandOutcome::Exited { code: Some(0) }
        );
        assert_eq!(
            runner.run(&Invocation::new("sh", ["-c", "exit 3"])),
            CommandOutcome::Exited { code: Some(3) }
        );
    }

    #[test]
    fn test_missing_binary_is_an_outcome() {
        let mut runner = SystemRunner::new();
        let outcome = runner.run(&Invocation::new(
            "/nonexistent/slcan_attach_for_tests",
            ["-c", "/dev/ttyUSB0"],
        ));
        assert!(matches!(outcome, CommandOutcome::SpawnFailed(_)));
    }
}
