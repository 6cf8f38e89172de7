//! The three external commands of a bring-up

use crate::commands::Invocation;
use crate::config::BringupConfig;
use std::path::Path;

/// Flags handed to `slcan_attach` before the bitrate: wait for data (-w),
/// open the line discipline at start (-o), flush the adapter's buffers (-f)
const HELPER_FLAGS: &[&str] = &["-w", "-o", "-f"];

/// Commands in the order they are issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPlan {
    /// Kill any helper left from a previous run
    pub terminate: Invocation,
    /// Start the helper in a detached screen session
    pub launch: Invocation,
    /// Set the interface administratively up
    pub activate: Invocation,
}

impl CommandPlan {
    pub fn build(config: &BringupConfig, device_path: &Path) -> Self {
        let prefix = config.privilege_prefix();
        let helper = &config.helper;

        let terminate = Invocation::privileged(
            prefix,
            &helper.kill_command,
            [helper_process_name(&helper.binary)],
        );

        let mut launch_args: Vec<String> = vec![
            "-d".to_string(),
            "-m".to_string(),
            "-S".to_string(),
            helper.session.clone(),
        ];
        if let Some(p) = prefix {
            launch_args.push(p.to_string());
        }
        launch_args.push(helper.binary.clone());
        launch_args.extend(HELPER_FLAGS.iter().map(|f| f.to_string()));
        launch_args.push(format!("-s{}", helper.bitrate_code));
        launch_args.push("-c".to_string());
        launch_args.push(device_path.to_string_lossy().to_string());
        let launch = Invocation::new(&helper.multiplexer, launch_args);

        let activate = Invocation::privileged(
            prefix,
            &config.interface.activate_command,
            [config.interface.name.as_str(), "up"],
        );

        Self {
            terminate,
            launch,
            activate,
        }
    }
}

/// killall matches on the process name, not the path it was started from
fn helper_process_name(binary: &str) -> String {
    Path::new(binary)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| binary.to_string())
}
