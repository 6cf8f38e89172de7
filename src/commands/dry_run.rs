//! Prints commands instead of running them

use super::{CommandOutcome, CommandRunner, Invocation};
use colored::Colorize;

#[derive(Debug, Default)]
pub struct DryRunRunner;

impl DryRunRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for DryRunRunner {
    fn run(&mut self, invocation: &Invocation) -> CommandOutcome {
        println!("{} {}", "[DRY-RUN]".magenta().bold(), invocation);
        CommandOutcome::Skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_without_running() {
        let mut runner = DryRunRunner::new();
        let inv = Invocation::new("/nonexistent/binary", ["arg"]);
        assert_eq!(runner.run(&inv), CommandOutcome::Skipped);
    }
}
