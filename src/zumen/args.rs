use clap::{Parser, Subcommand};
use std::path::PathBuf;
use zumen::model::MachineType;

fn long_version() -> String {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");

    if GIT_HASH.is_empty() {
        VERSION.to_string()
    } else {
        format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
    }
}

#[derive(Parser, Debug)]
#[command(name = "zumen")]
#[command(about = "Maintenance tool for the work-instruction record store", long_about = None)]
#[command(version = long_version())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Record store root (overrides the configured data root)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List drawings in the store
    #[command(alias = "ls")]
    List,

    /// Audit drawings for empty instruction content
    Audit {
        /// Drawing ids (e.g. 12750800122 or drawing-12750800122)
        #[arg(required_unless_present = "all")]
        ids: Vec<String>,

        /// Audit every drawing in the store
        #[arg(long, conflicts_with = "ids")]
        all: bool,
    },

    /// Migrate legacy step folders to machine-qualified names
    Migrate {
        /// Target machine type (machining, turning, yokonaka, radial, other)
        #[arg(short, long)]
        machine: MachineType,

        /// Drawing ids to migrate
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Validate an authored source record file
    Validate {
        /// Path to the record JSON (sections of table rows)
        record: PathBuf,
    },

    /// Normalize machine-type metadata values to canonical keys
    Normalize {
        /// Drawing ids to normalize
        #[arg(required_unless_present = "all")]
        ids: Vec<String>,

        /// Normalize every drawing in the store
        #[arg(long, conflicts_with = "ids")]
        all: bool,

        /// Report changes without writing
        #[arg(long)]
        dry_run: bool,

        /// Skip the .bak copy before rewriting
        #[arg(long)]
        no_backup: bool,
    },

    /// Archive drawings into a timestamped tar.gz
    Export {
        /// Drawing ids to export
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Show or set configuration values
    Config {
        /// Config key (data_root, backup_on_normalize)
        key: Option<String>,

        /// New value for the key
        value: Option<String>,
    },
}
