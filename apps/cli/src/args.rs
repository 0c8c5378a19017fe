//! # CLI Argument Definitions
//!
//! Every command operates on the session stored under `storage.data_dir`; `--data-dir`
//! overrides it for a single invocation.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use vaudit::domain::{ComponentId, Domain};

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "vaudit")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Drives a vehicle visual inspection session stored on disk")]
pub struct Cli {
    /// Configuration file (defaults to `vaudit.{toml,json,yaml}` in the working directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Session data directory, overrides `storage.data_dir`
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

/// A component of one domain, e.g. `exterior Tyre`.
#[derive(Debug, Clone, Args)]
pub struct ComponentArgs {
    /// interior, exterior or loose
    pub domain: Domain,
    pub component: ComponentId,
}

/// A part of a component, e.g. `exterior Tyre 2`.
#[derive(Debug, Clone, Args)]
pub struct PartArgs {
    #[command(flatten)]
    pub target: ComponentArgs,
    /// Zero-based part index
    pub part: usize,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start a session from a verified vehicle identity and its case configuration
    Init {
        /// JSON file with the vehicle identity
        #[arg(long)]
        identity: PathBuf,
        /// JSON file with the case configuration (component catalog)
        #[arg(long)]
        case: PathBuf,
        /// JSON file with the inspector record
        #[arg(long)]
        inspector: Option<PathBuf>,
        /// Replace an existing session (the new case is validated first)
        #[arg(long)]
        force: bool,
    },
    /// Begin (or restart) the inspection pass of a component
    Begin(ComponentArgs),
    /// Record a verified part as ok
    #[command(name = "ok")]
    RecordOk(PartArgs),
    /// Register a failed verification of a part
    Fail(PartArgs),
    /// Supervisor bypass: record the part as notok and lock the component
    Bypass {
        #[command(flatten)]
        part: PartArgs,
        /// Supervisor PIN
        #[arg(long)]
        pin: String,
    },
    /// Reopen a resolved component for re-inspection
    Reopen(ComponentArgs),
    /// Show counters and component statuses
    Status {
        /// Limit the listing to one domain
        #[arg(long)]
        domain: Option<Domain>,
    },
    /// Verify counters against component statuses and repair drift
    Check,
    /// Write the final report and tear the session down
    Finalize {
        /// Report directory; one sub-directory per vehicle is created
        #[arg(long)]
        out: PathBuf,
    },
    /// Discard the session
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_commands_take_domain_component_and_index() {
        let cli = Cli::try_parse_from(["vaudit", "ok", "Exterior", "Tyre", "3"]).unwrap();
        let Command::RecordOk(args) = cli.command else { panic!("expected ok") };
        assert_eq!(args.target.domain, Domain::Exterior);
        assert_eq!(args.target.component, ComponentId::from("Tyre"));
        assert_eq!(args.part, 3);
    }

    #[test]
    fn bypass_requires_a_pin() {
        assert!(Cli::try_parse_from(["vaudit", "bypass", "loose", "Jack", "0"]).is_err());
        let cli = Cli::try_parse_from(["vaudit", "bypass", "loose", "Jack", "0", "--pin", "4711"]).unwrap();
        assert!(matches!(cli.command, Command::Bypass { ref pin, .. } if pin == "4711"));
    }

    #[test]
    fn unknown_domain_is_rejected() {
        assert!(Cli::try_parse_from(["vaudit", "begin", "trunk", "Jack"]).is_err());
    }

    #[test]
    fn global_options_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["vaudit", "status", "--data-dir", "/tmp/s", "--domain", "loose"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/s")));
        assert!(matches!(cli.command, Command::Status { domain: Some(Domain::Loose) }));
    }
}
