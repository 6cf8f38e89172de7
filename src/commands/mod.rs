//! External command execution
//!
//! The bring-up only ever talks to the system through `CommandRunner`, so the
//! same sequence can run for real, as a dry run, or against a recorder in
//! tests.

pub mod dry_run;
#[cfg(test)]
pub mod recording;
pub mod system;

pub use dry_run::DryRunRunner;
pub use system::SystemRunner;

use std::fmt;

/// A program and its argument vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Run `program args...` through `prefix` (e.g. sudo) when one is given
    pub fn privileged<I, S>(prefix: Option<&str>, program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match prefix {
            Some(p) => {
                let mut full = vec![program.to_string()];
                full.extend(args.into_iter().map(Into::into));
                Self::new(p, full)
            }
            None => Self::new(program, args),
        }
    }

    /// Program followed by its arguments
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.argv().join(" "))
    }
}

/// What happened when a command was issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Ran to completion; `None` when terminated by a signal
    Exited { code: Option<i32> },
    /// Could not be started (missing binary, permissions, ...)
    SpawnFailed(String),
    /// Not executed (dry run)
    Skipped,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        matches!(self, CommandOutcome::Exited { code: Some(0) })
    }
}

impl fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOutcome::Exited { code: Some(c) } => write!(f, "exit status {}", c),
            CommandOutcome::Exited { code: None } => write!(f, "terminated by signal"),
            CommandOutcome::SpawnFailed(reason) => write!(f, "failed to start: {}", reason),
            CommandOutcome::Skipped => write!(f, "skipped"),
        }
    }
}

/// Issues external commands. Never fails: problems are reported in the outcome.
pub trait CommandRunner {
    fn run(&mut self, invocation: &Invocation) -> CommandOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privileged_prefix() {
        let inv = Invocation::privileged(Some("sudo"), "killall", ["slcan_attach"]);
        assert_eq!(inv.program, "sudo");
        assert_eq!(inv.argv(), vec!["sudo", "killall", "slcan_attach"]);

        let inv = Invocation::privileged(None, "killall", ["slcan_attach"]);
        assert_eq!(inv.argv(), vec!["killall", "slcan_attach"]);
    }

    #[test]
    fn test_display() {
        let inv = Invocation::new("ifconfig", ["slcan0", "up"]);
        assert_eq!(inv.to_string(), "ifconfig slcan0 up");
    }

    #[test]
    fn test_outcome_success() {
        assert!(CommandOutcome::Exited { code: Some(0) }.success());
        assert!(!CommandOutcome::Exited { code: Some(1) }.success());
        assert!(!CommandOutcome::Exited { code: None }.success());
        assert!(!CommandOutcome::SpawnFailed("nope".to_string()).success());
        assert!(!CommandOutcome::Skipped.success());
    }
}
