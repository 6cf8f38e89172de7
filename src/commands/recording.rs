//! Test runner that records invocations and replays scripted outcomes

use super::{CommandOutcome, CommandRunner, Invocation};
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub calls: Vec<Invocation>,
    script: VecDeque<CommandOutcome>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outcomes returned in order; exit status 0 once exhausted
    pub fn with_outcomes(outcomes: Vec<CommandOutcome>) -> Self {
        Self {
            calls: Vec::new(),
            script: outcomes.into(),
        }
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.calls.iter().map(|c| c.to_string()).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, invocation: &Invocation) -> CommandOutcome {
        self.calls.push(invocation.clone());
        self.script
            .pop_front()
            .unwrap_or(CommandOutcome::Exited { code: Some(0) })
    }
}
