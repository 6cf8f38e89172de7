//! SLCAN Bring-up
//!
//! Finds a USB-serial CAN adapter, restarts `slcan_attach` against it and
//! brings the resulting SocketCAN interface up.
//!
//! # Usage
//!
//! ```bash
//! # Full bring-up with built-in defaults (FTDI adapter, slcan0, 500 kbit/s)
//! slcan-bringup
//!
//! # Show what would be run
//! slcan-bringup --dry-run
//!
//! # Show which TTY would be picked
//! slcan-bringup detect
//!
//! # Use a Prolific adapter at 1 Mbit/s
//! slcan-bringup up --adapter pl2303 --bitrate-code 8
//!
//! # Write the default configuration for editing
//! slcan-bringup generate config -o /etc/slcan-bringup.toml
//! ```

mod adapters;
mod bringup;
mod commands;
mod config;
mod discovery;
mod error;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use adapters::{adapter_names, get_adapter, AdapterProfile};
use bringup::{Bootstrapper, SysfsNetProbe};
use commands::{DryRunRunner, SystemRunner};
use config::{BringupConfig, Overrides};
use discovery::{locate_device, DeviceSource, SysfsTtySource};

/// SLCAN Bring-up
///
/// Attach a USB-serial CAN adapter as a SocketCAN interface
#[derive(Parser)]
#[command(name = "slcan-bringup")]
#[command(author = "Prasanna Gautam")]
#[command(version = "0.1.0")]
#[command(about = "Detect a serial CAN adapter, restart slcan_attach and bring the interface up")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: OverrideArgs,
}

#[derive(Args, Debug, Default)]
struct OverrideArgs {
    /// Serial port to use instead of scanning (e.g., ttyUSB1 or /dev/ttyUSB1)
    #[arg(short, long, global = true)]
    port: Option<String>,

    /// Adapter profile (ftdi, pl2303, cp210x, ch341)
    #[arg(short, long, global = true)]
    adapter: Option<String>,

    /// Network interface created by the helper
    #[arg(short, long, global = true)]
    interface: Option<String>,

    /// slcan_attach bitrate code, 0 (10 kbit/s) to 8 (1 Mbit/s)
    #[arg(short, long, global = true)]
    bitrate_code: Option<u8>,

    /// slcan_attach binary
    #[arg(long, global = true)]
    binary: Option<String>,

    /// Continue without a device when none matches
    #[arg(long, global = true)]
    allow_missing: bool,

    /// Print the commands instead of running them
    #[arg(long, global = true)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Restart the helper and bring the interface up (default)
    Up,

    /// Show TTY candidates and which one would be used
    Detect,

    /// Adapter profile operations
    #[command(subcommand)]
    Adapters(AdapterCommands),

    /// Generate configuration files
    #[command(subcommand)]
    Generate(GenerateCommands),
}

#[derive(Subcommand)]
enum AdapterCommands {
    /// List all supported adapter profiles
    List,

    /// Show details of an adapter profile
    Show {
        /// Adapter profile name (e.g., ftdi, pl2303)
        name: String,
    },
}

#[derive(Subcommand)]
enum GenerateCommands {
    /// Generate a configuration file with the current settings
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl OverrideArgs {
    fn to_overrides(&self) -> Overrides {
        Overrides {
            port: self.port.clone(),
            adapter: self.adapter.clone(),
            interface: self.interface.clone(),
            bitrate_code: self.bitrate_code,
            binary: self.binary.clone(),
            allow_missing: self.allow_missing,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = BringupConfig::load_or_default(cli.config.as_deref())?;
    config
        .apply_overrides(&cli.overrides.to_overrides())
        .with_context(|| "Invalid command-line override")?;

    match cli.command.unwrap_or(Commands::Up) {
        Commands::Up => handle_up(config, cli.overrides.dry_run),
        Commands::Detect => handle_detect(&config),
        Commands::Adapters(cmd) => handle_adapters(cmd),
        Commands::Generate(cmd) => handle_generate(cmd, &config),
    }
}

fn handle_up(mut config: BringupConfig, dry_run: bool) -> Result<()> {
    let rule = config.match_rule()?;
    let source = SysfsTtySource::new(&config.device.tty_root);

    println!(
        "{} Looking for {}* with {}",
        "[*]".cyan().bold(),
        rule.name_prefix,
        rule.driver.white()
    );
    let device = locate_device(&source, &rule, &config.device)
        .with_context(|| "Cannot pick a serial device for slcan_attach")?;

    if device.is_missing() {
        println!("{} No adapter found, continuing", "[WARNING]".yellow().bold());
    } else {
        println!(
            "{} Using {}",
            "[OK]".green().bold(),
            device.path.display().to_string().white()
        );
    }

    let probe = SysfsNetProbe::new(&config.interface.net_root);
    let report = if dry_run {
        // nothing will create the interface, don't wait for it
        config.interface.wait_timeout_ms = 0;
        let mut runner = DryRunRunner::new();
        Bootstrapper::new(&config, &mut runner, &probe).run(&device)
    } else {
        let mut runner = SystemRunner::new();
        Bootstrapper::new(&config, &mut runner, &probe).run(&device)
    };

    report.print_summary();

    if dry_run {
        println!(
            "\n{} Dry run, nothing was executed; {} left as it was",
            "[*]".cyan().bold(),
            report.interface.white().bold()
        );
        Ok(())
    } else if report.activated() {
        println!(
            "\n{} {} is up",
            "[OK]".green().bold(),
            report.interface.white().bold()
        );
        Ok(())
    } else {
        eprintln!(
            "\n{} Could not bring up {}",
            "[ERROR]".red().bold(),
            report.interface
        );
        std::process::exit(1);
    }
}

fn handle_detect(config: &BringupConfig) -> Result<()> {
    let rule = config.match_rule()?;
    let source = SysfsTtySource::new(&config.device.tty_root);
    let candidates = source.candidates()?;
    let selected = discovery::find_device(&candidates, &rule).map(|c| c.name.clone());

    println!("{}", "=".repeat(60));
    println!(
        "{}",
        format!("TTY candidates under {}", config.device.tty_root.display())
            .cyan()
            .bold()
    );
    println!("{}", "=".repeat(60));
    println!("  Prefix: {}", rule.name_prefix);
    println!("  Driver: {}", rule.driver);

    let considered: Vec<_> = candidates.iter().filter(|c| rule.considers(c)).collect();
    if considered.is_empty() {
        println!("\n{}", format!("No {}* devices present", rule.name_prefix).yellow());
        println!("\n{}", "Troubleshooting:".white().bold());
        println!("  1. Connect the CAN adapter");
        println!("  2. Check dmesg for the USB serial driver binding");
        println!("  3. Try another profile: slcan-bringup adapters list");
    }

    for candidate in &considered {
        let driver = candidate.driver.as_deref().unwrap_or("(no driver)");
        let tag = if selected.as_deref() == Some(candidate.name.as_str()) {
            "[SELECTED]".green().bold()
        } else if rule.matches(candidate) {
            "[MATCH]".cyan()
        } else {
            "[skip]".dimmed()
        };
        println!("\n  {} {}", tag, candidate.name.white().bold());
        println!("    Driver: {}", driver);

        #[cfg(feature = "serial")]
        {
            let path = candidate.device_path(&config.device.dev_root);
            if let Ok(Some(usb)) = discovery::usb::usb_details(&path.to_string_lossy()) {
                println!("    VID:PID: {:04x}:{:04x}", usb.vid, usb.pid);
                if let Some(ref mfg) = usb.manufacturer {
                    println!("    Manufacturer: {}", mfg);
                }
                if let Some(ref prod) = usb.product {
                    println!("    Product: {}", prod);
                }
                if let Some(ref sn) = usb.serial_number {
                    println!("    Serial: {}", sn);
                }
            }
        }
    }

    println!("\n{}", "=".repeat(60));
    match selected {
        Some(name) => println!(
            "Would use {}",
            config.device.dev_root.join(name).display().to_string().white().bold()
        ),
        None => println!("{}", "No matching adapter".yellow()),
    }

    Ok(())
}

fn handle_adapters(cmd: AdapterCommands) -> Result<()> {
    match cmd {
        AdapterCommands::List => {
            println!("{}", "=".repeat(60));
            println!("{}", "Supported Adapter Profiles".cyan().bold());
            println!("{}", "=".repeat(60));

            for name in adapter_names() {
                if let Some(profile) = get_adapter(name) {
                    println!("\n  {}: {}", name.white().bold(), profile.description);
                    println!("    Driver identity: {}", profile.driver_identity());
                    println!("    TTY prefix: {}", profile.tty_prefix);
                }
            }

            println!("\n{}", "=".repeat(60));
            println!(
                "Use {} to see profile details",
                "slcan-bringup adapters show <adapter>".cyan()
            );
        }

        AdapterCommands::Show { name } => {
            let profile = get_adapter(&name)
                .ok_or_else(|| error::BringupError::UnknownAdapter(name.clone()))?;
            print_adapter_profile(profile);
        }
    }

    Ok(())
}

fn print_adapter_profile(profile: &AdapterProfile) {
    println!("{}", "=".repeat(60));
    println!("{}", format!("Adapter Profile: {}", profile.name).cyan().bold());
    println!("{}", "=".repeat(60));
    println!("  ID: {}", profile.id);
    println!("  Description: {}", profile.description);
    println!("  Kernel driver: {}", profile.kernel_driver);
    println!("  Driver identity: {}", profile.driver_identity());
    println!("  TTY prefix: {}", profile.tty_prefix);
    let vids: Vec<String> = profile
        .usb_vendor_ids
        .iter()
        .map(|v| format!("{:04x}", v))
        .collect();
    println!("  USB vendor IDs: {}", vids.join(", "));
    println!("{}", "=".repeat(60));
}

fn handle_generate(cmd: GenerateCommands, config: &BringupConfig) -> Result<()> {
    match cmd {
        GenerateCommands::Config { output } => {
            let content = config.to_toml_string()?;

            if let Some(path) = output {
                std::fs::write(&path, &content)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!(
                    "{} Configuration written to {}",
                    "[OK]".green().bold(),
                    path.display()
                );
            } else {
                println!("{}", content);
            }
        }
    }

    Ok(())
}
