//! Clap derive structures for the `parkvision` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use parkvision_core::{DEFAULT_TOP_N, LotId, SpotId, SpotStatus, StatusFilter, UserId};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// parkvision -- admin CLI for ParkVision parking-occupancy backends
#[derive(Debug, Parser)]
#[command(
    name = "parkvision",
    version,
    about = "Administer ParkVision parking lots from the command line",
    long_about = "Manage parking lots, spots and user accounts on a ParkVision backend,\n\
        and view live occupancy statistics aggregated across every lot.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "PARKVISION_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 'S', env = "PARKVISION_SERVER", global = true)]
    pub server: Option<String>,

    /// Bearer token (overrides keyring and profile)
    #[arg(long, env = "PARKVISION_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PARKVISION_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "PARKVISION_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "PARKVISION_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the access token in the system keyring
    Login(LoginArgs),

    /// Forget the stored access token
    Logout,

    /// Manage parking lots
    #[command(alias = "lot", alias = "l")]
    Lots(LotsArgs),

    /// Inspect and change spot status
    #[command(alias = "spot", alias = "s")]
    Spots(SpotsArgs),

    /// Manage user accounts
    #[command(alias = "user", alias = "u")]
    Users(UsersArgs),

    /// Occupancy statistics
    Stats(StatsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (defaults to the profile's username, else prompts)
    #[arg(long, short = 'u')]
    pub username: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LOTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LotsArgs {
    #[command(subcommand)]
    pub command: LotsCommand,
}

/// Lot fields shared by `create` and `update`.
#[derive(Debug, Args)]
pub struct LotFields {
    /// Street address
    #[arg(long)]
    pub address: Option<String>,

    /// Free-form description
    #[arg(long)]
    pub description: Option<String>,

    /// Path of the camera video on the backend host
    #[arg(long)]
    pub video_path: Option<String>,

    /// Path of the frame used to annotate spots
    #[arg(long)]
    pub init_frame_path: Option<String>,

    /// Offset into the video, in seconds
    #[arg(long)]
    pub video_start_time: Option<f64>,
}

#[derive(Debug, Subcommand)]
pub enum LotsCommand {
    /// List all lots
    #[command(alias = "ls")]
    List,

    /// Show one lot
    Get {
        /// Lot ID
        id: LotId,
    },

    /// Create a lot
    Create {
        /// Lot name
        #[arg(long, required_unless_present = "from_file")]
        name: Option<String>,

        /// Configured capacity
        #[arg(long, default_value = "0")]
        total_spaces: u32,

        #[command(flatten)]
        fields: LotFields,

        /// Read the lot as JSON from a file instead
        #[arg(long, short = 'F', conflicts_with = "name")]
        from_file: Option<PathBuf>,
    },

    /// Update a lot (only the given fields change)
    Update {
        /// Lot ID
        id: LotId,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New capacity
        #[arg(long)]
        total_spaces: Option<u32>,

        #[command(flatten)]
        fields: LotFields,

        /// Read the changes as JSON from a file instead
        #[arg(long, short = 'F')]
        from_file: Option<PathBuf>,
    },

    /// Delete a lot and its spots
    #[command(alias = "rm")]
    Delete {
        /// Lot ID
        id: LotId,
    },

    /// Occupancy counts for one lot
    Status {
        /// Lot ID
        id: LotId,
    },

    /// List a lot's spots with their current status
    Spots {
        /// Lot ID
        id: LotId,

        /// Only show spots in this status (all, vacant, occupied, reserved, unknown)
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },

    /// Create a lot's spots from polygon annotations
    Init {
        /// Lot ID
        id: LotId,

        /// JSON file: `[{"points": [[x, y], ...]}, ...]`
        #[arg(long, short = 'F', required = true)]
        from_file: PathBuf,
    },

    /// Set many spot statuses at once
    BulkUpdate {
        /// Lot ID
        id: LotId,

        /// JSON file: `[{"spot_id": 1, "status": "occupied"}, ...]`
        #[arg(long, short = 'F', required = true)]
        from_file: PathBuf,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SPOTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SpotsArgs {
    #[command(subcommand)]
    pub command: SpotsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SpotsCommand {
    /// Set a spot's status
    Set {
        /// Lot ID
        lot: LotId,
        /// Spot ID
        spot: SpotId,
        /// vacant, occupied or reserved
        status: SpotStatus,
        /// Extra JSON metadata stored with the reading
        #[arg(long)]
        meta: Option<String>,
    },

    /// Advance a spot to the next status (vacant → occupied → reserved)
    Cycle {
        /// Lot ID
        lot: LotId,
        /// Spot ID
        spot: SpotId,
    },

    /// Latest recorded status of a spot
    Status {
        /// Lot ID
        lot: LotId,
        /// Spot ID
        spot: SpotId,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List user accounts
    #[command(alias = "ls")]
    List,

    /// Show one user
    Get {
        /// User ID
        id: UserId,
    },

    /// Create a user (password is prompted)
    Create {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
    },

    /// Update a user
    Update {
        /// User ID
        id: UserId,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Prompt for a new password
        #[arg(long)]
        password: bool,
    },

    /// Delete a user
    #[command(alias = "rm")]
    Delete {
        /// User ID
        id: UserId,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  STATS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[command(subcommand)]
    pub command: StatsCommand,
}

#[derive(Debug, Subcommand)]
pub enum StatsCommand {
    /// Occupancy across every lot, with the busiest lots ranked
    Overview {
        /// How many lots to rank
        #[arg(long, default_value_t = DEFAULT_TOP_N)]
        top: usize,
    },

    /// Occupancy of one lot
    Lot {
        /// Lot ID
        id: LotId,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Key: server, username, token_env, ca_cert, insecure, timeout
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn status_filter_parses_from_flag() {
        let cli =
            Cli::try_parse_from(["parkvision", "lots", "spots", "3", "--status", "vacant"]).unwrap();
        match cli.command {
            Command::Lots(LotsArgs {
                command: LotsCommand::Spots { id, status },
            }) => {
                assert_eq!(id, LotId(3));
                assert_eq!(status, StatusFilter::Only(SpotStatus::Vacant));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_spot_status_is_rejected() {
        assert!(
            Cli::try_parse_from(["parkvision", "spots", "set", "1", "2", "parked"]).is_err()
        );
    }
}
