//! Adapter bring-up sequence
//!
//! Terminate the old helper, launch a new one against the resolved device,
//! wait for the interface and set it up. Every step runs regardless of how
//! the previous one went; outcomes are collected into a `BringupReport`.

pub mod plan;
pub mod readiness;

pub use plan::CommandPlan;
pub use readiness::{
    wait_for_interface, wait_for_interface_removal, InterfaceProbe, Readiness, Removal,
    SysfsNetProbe,
};

use crate::commands::{CommandOutcome, CommandRunner, Invocation};
use crate::config::BringupConfig;
use crate::discovery::{DeviceOrigin, ResolvedDevice};
use colored::Colorize;
use log::{info, warn};
use std::fmt;
use std::thread;

/// Steps that issue an external command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Terminate,
    Launch,
    Activate,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Terminate => write!(f, "killing old slcan"),
            Step::Launch => write!(f, "starting new slcan"),
            Step::Activate => write!(f, "bringing up interface"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepResult {
    pub step: Step,
    pub invocation: Invocation,
    pub outcome: CommandOutcome,
}

/// Everything that happened during one bring-up
#[derive(Debug, Clone)]
pub struct BringupReport {
    pub device: ResolvedDevice,
    pub interface: String,
    pub steps: Vec<StepResult>,
    /// Old interface gone before the new helper started
    pub removal: Removal,
    pub readiness: Readiness,
    /// Interface operstate read after activation
    pub operstate: Option<String>,
}

impl BringupReport {
    pub fn outcome(&self, step: Step) -> Option<&CommandOutcome> {
        self.steps
            .iter()
            .find(|r| r.step == step)
            .map(|r| &r.outcome)
    }

    /// The activation command ran and exited 0
    pub fn activated(&self) -> bool {
        self.outcome(Step::Activate).map_or(false, CommandOutcome::success)
    }

    pub fn print_summary(&self) {
        println!("\n{}", "=".repeat(60));
        println!("{}", "Bring-up Summary".cyan().bold());
        println!("{}", "=".repeat(60));

        let device = if self.device.is_missing() {
            "(none)".yellow().to_string()
        } else {
            self.device.path.display().to_string().white().bold().to_string()
        };
        println!("  Device: {}", device);
        if let DeviceOrigin::Discovered { ref passed_over } = self.device.origin {
            if !passed_over.is_empty() {
                println!("  Also matching (ignored): {}", passed_over.join(", ").yellow());
            }
        }

        for result in &self.steps {
            // killall reporting "no process found" is the normal case
            let tag = match (&result.outcome, result.step) {
                (o, _) if o.success() => "[OK]".green(),
                (CommandOutcome::Skipped, _) => "[SKIP]".dimmed(),
                (CommandOutcome::Exited { .. }, Step::Terminate) => "[INFO]".cyan(),
                (CommandOutcome::Exited { .. }, _) => "[WARNING]".yellow(),
                (CommandOutcome::SpawnFailed(_), _) => "[ERROR]".red(),
            };
            println!("  {} {}: {}", tag, result.invocation, result.outcome);
        }

        if let Removal::StillPresent { waited } = self.removal {
            println!(
                "  Old {}: {} after {} ms",
                self.interface.white(),
                "still present".yellow(),
                waited.as_millis()
            );
        }

        match self.readiness {
            Readiness::Appeared { after } => println!(
                "  Interface {}: appeared after {} ms",
                self.interface.white(),
                after.as_millis()
            ),
            Readiness::TimedOut { waited } => println!(
                "  Interface {}: {} after {} ms",
                self.interface.white(),
                "not seen".yellow(),
                waited.as_millis()
            ),
        }
        if let Some(ref state) = self.operstate {
            println!("  Operstate: {}", state);
        }

        println!("{}", "=".repeat(60));
    }
}

/// Runs the bring-up against injected command and interface back ends
pub struct Bootstrapper<'a> {
    config: &'a BringupConfig,
    runner: &'a mut dyn CommandRunner,
    probe: &'a dyn InterfaceProbe,
}

impl<'a> Bootstrapper<'a> {
    pub fn new(
        config: &'a BringupConfig,
        runner: &'a mut dyn CommandRunner,
        probe: &'a dyn InterfaceProbe,
    ) -> Self {
        Self {
            config,
            runner,
            probe,
        }
    }

    pub fn run(&mut self, device: &ResolvedDevice) -> BringupReport {
        let plan = CommandPlan::build(self.config, &device.path);
        let interface = &self.config.interface;
        let mut steps = Vec::with_capacity(3);

        steps.push(self.issue(Step::Terminate, plan.terminate));

        let removal = wait_for_interface_removal(
            self.probe,
            &interface.name,
            interface.wait_timeout(),
            interface.poll_interval(),
        );
        if let Removal::StillPresent { waited } = removal {
            warn!(
                "old {} still present after {} ms, launching anyway",
                interface.name,
                waited.as_millis()
            );
        }

        steps.push(self.issue(Step::Launch, plan.launch));

        status(&format!("waiting for {}", interface.name));
        let readiness = wait_for_interface(
            self.probe,
            &interface.name,
            interface.wait_timeout(),
            interface.poll_interval(),
        );
        match readiness {
            Readiness::Appeared { .. } => {
                if !interface.settle().is_zero() {
                    thread::sleep(interface.settle());
                }
            }
            Readiness::TimedOut { waited } => warn!(
                "{} did not appear within {} ms, activating anyway",
                interface.name,
                waited.as_millis()
            ),
        }

        steps.push(self.issue(Step::Activate, plan.activate));

        BringupReport {
            device: device.clone(),
            interface: interface.name.clone(),
            steps,
            removal,
            readiness,
            operstate: self.probe.operstate(&interface.name),
        }
    }

    fn issue(&mut self, step: Step, invocation: Invocation) -> StepResult {
        status(&step.to_string());
        info!("{}: {}", step, invocation);

        let outcome = self.runner.run(&invocation);
        match (&outcome, step) {
            (CommandOutcome::SpawnFailed(_), _) => warn!("{}: {}", invocation.program, outcome),
            (CommandOutcome::Exited { .. }, Step::Terminate) => {
                info!("{}: {}", invocation.program, outcome)
            }
            (o, _) if !o.success() && *o != CommandOutcome::Skipped => {
                warn!("{}: {}", invocation.program, outcome)
            }
            _ => info!("{}: {}", invocation.program, outcome),
        }

        StepResult {
            step,
            invocation,
            outcome,
        }
    }
}

fn status(message: &str) {
    println!("{} {}", "[*]".cyan().bold(), message);
}
