//! Clap derive structures for the `mirrorctl` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// mirrorctl -- drive a MagicMirror² from the command line
#[derive(Debug, Parser)]
#[command(
    name = "mirrorctl",
    version,
    about = "Control a MagicMirror² through MMM-Remote-Control",
    long_about = "Show and hide modules, run system actions, adjust brightness,\n\
        and send notifications to a MagicMirror² running the\n\
        MMM-Remote-Control module.",
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
    /// Mirror profile to use
    #[arg(long, short = 'p', env = "MIRRORCTL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Mirror base URL (overrides profile)
    #[arg(long, short = 'u', env = "MIRROR_API_URL", global = true)]
    pub url: Option<String>,

    /// MMM-Remote-Control API key
    #[arg(long, env = "MIRRORCTL_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MIRRORCTL_OUTPUT",
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
    #[arg(long, short = 'y', env = "MIRRORCTL_YES", global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (0 waits indefinitely)
    #[arg(long, env = "MIRRORCTL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Keep module state in memory; nothing is read from or written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,
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
    /// Check that the remote-control API answers
    Ping,

    /// Manage mirror modules
    #[command(alias = "mod", alias = "m")]
    Modules(ModulesArgs),

    /// Manage which modules appear on the dashboard
    #[command(alias = "dash", alias = "d")]
    Dashboard(DashboardArgs),

    /// Device and process actions
    #[command(alias = "sys")]
    System(SystemArgs),

    /// Switch the attached display on or off
    Monitor(MonitorArgs),

    /// Set display brightness
    Brightness(BrightnessArgs),

    /// Inspect and edit the mirror's running configuration
    #[command(alias = "rc")]
    RemoteConfig(RemoteConfigArgs),

    /// Broadcast a notification to all modules
    Notify(NotifyArgs),

    /// Run a custom command defined in the remote-control config
    #[command(name = "command")]
    CustomCommand(ValueArgs),

    /// Apply a class of show/hide rules from the remote-control config
    Class(ValueArgs),

    /// Set user presence
    Presence(ValueArgs),

    /// Show the remote-control UI translations
    Translations,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  MODULES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ModulesArgs {
    #[command(subcommand)]
    pub command: ModulesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ModulesCommand {
    /// List active modules with their visibility
    #[command(alias = "ls")]
    List,

    /// List modules installed on disk
    Installed,

    /// List modules available from the third-party registry
    Available,

    /// Show a module on the mirror
    Show {
        /// Module id, name, or long name
        module: String,
    },

    /// Hide a module on the mirror
    Hide {
        /// Module id, name, or long name
        module: String,
    },

    /// Flip a module's mirror visibility
    Toggle {
        /// Module id, name, or long name
        module: String,
    },

    /// List the actions a module advertises
    Actions {
        /// Module name
        module: String,
    },

    /// Run a module action
    Exec {
        /// Module name
        module: String,
        /// Action name (e.g. "stop")
        action: String,
    },

    /// Update an installed module
    Update {
        /// Module name
        module: String,
    },

    /// Install a module
    Install {
        /// Git repository URL of the module
        #[arg(required_unless_present = "from_file")]
        url: Option<String>,

        /// Send a JSON module description instead
        #[arg(long, short = 'F', conflicts_with = "url")]
        from_file: Option<PathBuf>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DASHBOARD
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DashboardArgs {
    #[command(subcommand)]
    pub command: DashboardCommand,
}

#[derive(Debug, Subcommand)]
pub enum DashboardCommand {
    /// List modules shown on the dashboard
    #[command(alias = "ls")]
    List {
        /// Include modules hidden from the dashboard
        #[arg(long, short = 'a')]
        all: bool,
    },

    /// Hide a module from the dashboard (local only)
    Hide {
        /// Module id, name, or long name
        module: String,
    },

    /// Show a hidden module on the dashboard again (local only)
    Unhide {
        /// Module id, name, or long name
        module: String,
    },

    /// Re-list dashboard modules on an interval until interrupted
    Watch {
        /// Refresh interval (e.g. "10s", "1m")
        #[arg(long, short = 'i', default_value = "30s", value_parser = humantime::parse_duration)]
        interval: Duration,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SYSTEM
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SystemArgs {
    #[command(subcommand)]
    pub command: SystemCommand,
}

#[derive(Debug, Subcommand)]
pub enum SystemCommand {
    /// Reload all modules and their configurations
    Refresh,

    /// Restart the MagicMirror application
    Restart,

    /// Reboot the device
    Reboot,

    /// Power off the device
    Shutdown,

    /// Minimize the mirror window
    Minimize,

    /// Toggle fullscreen
    Fullscreen,

    /// Toggle the browser developer tools
    Devtools,

    /// Mirror summary derived from its running configuration
    Info,
}

#[derive(Debug, Args)]
pub struct MonitorArgs {
    #[command(subcommand)]
    pub command: MonitorCommand,
}

#[derive(Debug, Subcommand)]
pub enum MonitorCommand {
    /// Wake the display
    On,
    /// Put the display to sleep
    Off,
}

#[derive(Debug, Args)]
pub struct BrightnessArgs {
    /// Brightness value, sent as-is (the mirror accepts 0-100)
    #[arg(allow_negative_numbers = true)]
    pub value: i64,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  REMOTE CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RemoteConfigArgs {
    #[command(subcommand)]
    pub command: RemoteConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum RemoteConfigCommand {
    /// Print the mirror's running configuration
    Show,

    /// List saved configuration backups
    Backups,

    /// Save the current configuration as the default
    SaveDefaults,

    /// Replace the mirror configuration with a JSON file
    Edit {
        /// JSON file holding the full configuration
        #[arg(long, short = 'F')]
        from_file: PathBuf,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NOTIFICATIONS & COMMANDS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NotifyArgs {
    /// Notification name (e.g. "SHOW_ALERT")
    pub name: String,

    /// Payload, usually a JSON object
    pub payload: Option<String>,
}

#[derive(Debug, Args)]
pub struct ValueArgs {
    /// Name as defined in the remote-control config
    pub value: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG & COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a profile with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Print the config file location
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn brightness_accepts_negative_values() {
        let cli = Cli::try_parse_from(["mirrorctl", "brightness", "-5"]).expect("parse");
        match cli.command {
            Command::Brightness(args) => assert_eq!(args.value, -5),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn watch_interval_parses_humantime() {
        let cli = Cli::try_parse_from(["mirrorctl", "dashboard", "watch", "-i", "1m"]).expect("parse");
        match cli.command {
            Command::Dashboard(DashboardArgs {
                command: DashboardCommand::Watch { interval },
            }) => assert_eq!(interval, Duration::from_secs(60)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn install_needs_url_or_file() {
        assert!(Cli::try_parse_from(["mirrorctl", "modules", "install"]).is_err());
        assert!(Cli::try_parse_from(["mirrorctl", "modules", "install", "https://github.com/a/MMM-b"]).is_ok());
    }
}
