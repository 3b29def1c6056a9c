//! Clap derive structures for the `huectl` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// huectl -- control Philips Hue lights from the command line
#[derive(Debug, Parser)]
#[command(
    name = "huectl",
    version,
    about = "Control Hue lights, rooms, and scenes from the command line",
    long_about = "A CLI client for the Hue bridge.\n\n\
        Talks to the bridge's local CLIP v2 API over TLS, pairs via the\n\
        link-button handshake, and caches bridge resources locally so\n\
        repeated invocations stay fast.",
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
#[allow(clippy::struct_excessive_bools)]
pub struct GlobalOpts {
    /// Bridge address (IP or host[:port]); skips cloud discovery
    #[arg(long, short = 'b', env = "HUE_BRIDGE", global = true)]
    pub bridge: Option<String>,

    /// Directory for the connection record and resource cache
    #[arg(long, env = "HUE_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verify the bridge certificate against the system trust store
    /// (default accepts the bridge's self-signed certificate)
    #[arg(long, env = "HUE_VERIFY_TLS", global = true)]
    pub verify_tls: bool,

    /// Verify the bridge certificate against a custom CA (PEM file)
    #[arg(long, env = "HUE_CA_CERT", global = true, conflicts_with = "verify_tls")]
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, env = "HUE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Mirror every bridge exchange to diagnostic files in the data dir
    #[arg(long, env = "HUE_DEBUG_FILES", global = true)]
    pub debug_files: bool,

    /// Bypass the resource cache for this invocation
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Output format
    #[arg(long, short = 'o', env = "HUE_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
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
    /// List and control individual lights
    #[command(alias = "l")]
    Light(LightArgs),

    /// List rooms and control all lights in a room
    #[command(alias = "r")]
    Room(RoomArgs),

    /// Overview of the bridge, lights, rooms, and scenes
    Ls,

    /// Refresh the local resource cache from the bridge
    RefreshCache(RefreshCacheArgs),

    /// Pair with the bridge (press the link button first)
    Pair(PairArgs),

    /// Rename a light or room
    Rename(RenameArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── light ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LightArgs {
    #[command(subcommand)]
    pub command: LightCommand,
}

#[derive(Debug, Subcommand)]
pub enum LightCommand {
    /// List known lights
    #[command(alias = "ls")]
    List,

    /// Set a light's color and brightness
    Set {
        /// Light name (case-insensitive)
        name: String,

        /// Color as RRGGBB hex (e.g. ff8800), '#' optional
        #[arg(long, short = 'c', default_value = "ffffff")]
        color: String,

        /// Brightness percentage (0-100)
        #[arg(long, short = 'B')]
        brightness: Option<f64>,
    },

    /// Turn a light off
    Off {
        /// Light name (case-insensitive)
        name: String,
    },
}

// ── room ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RoomArgs {
    #[command(subcommand)]
    pub command: RoomCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoomCommand {
    /// List known rooms
    #[command(alias = "ls")]
    List,

    /// Set every light in a room to a color and brightness
    Set {
        /// Room name (case-insensitive)
        name: String,

        /// Color as RRGGBB hex (e.g. ff8800), '#' optional
        #[arg(long, short = 'c', default_value = "ffffff")]
        color: String,

        /// Brightness percentage (0-100)
        #[arg(long, short = 'B')]
        brightness: Option<f64>,
    },

    /// Turn every light in a room off
    Off {
        /// Room name (case-insensitive)
        name: String,
    },
}

// ── refresh-cache ────────────────────────────────────────────────────

#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct RefreshCacheArgs {
    /// Delete the cache file before refreshing
    #[arg(long)]
    pub wipe: bool,

    /// Refresh the device and light records
    #[arg(long)]
    pub device: bool,

    /// Refresh the room records
    #[arg(long)]
    pub rooms: bool,

    /// Refresh the scene records
    #[arg(long)]
    pub scenes: bool,
}

// ── pair ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PairArgs {
    /// Re-pair even if credentials already exist
    #[arg(long, short = 'f')]
    pub force: bool,
}

// ── rename ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RenameArgs {
    /// Resource id
    pub id: String,

    /// New name
    pub name: String,
}

// ── completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
