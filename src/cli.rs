//! CLI argument parsing via clap.

use clap::{Parser, Subcommand};
use jat_dash::build_info;

/// Local dashboard core: terminal sessions and hook previews.
#[derive(Debug, Parser)]
#[command(
    name = "jat-dash",
    disable_version_flag = true,
    after_help = build_info::HELP_BUILD_METADATA
)]
pub struct Args {
    /// Path to config file (default: ./jat-dash.toml or ~/.config/jat/jat-dash.toml).
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// Disable color output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Print version and build metadata.
    #[arg(short = 'V', long = "version")]
    pub version: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the JSON API.
    Serve {
        /// Override `server.bind`.
        #[arg(long = "bind", value_name = "ADDR")]
        bind: Option<String>,
    },
    /// Manage dashboard-owned tmux sessions.
    Sessions {
        #[command(subcommand)]
        action: SessionsCommand,
    },
    /// Match and preview hooks.
    Hooks {
        #[command(subcommand)]
        action: HooksCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum SessionsCommand {
    /// List sessions in the dashboard namespace.
    List,
    /// Create a detached session, or report the existing one.
    Create {
        /// Identifier hint; a random one is generated when omitted.
        #[arg(long = "name")]
        name: Option<String>,
        /// Working directory; falls back to the default project path.
        #[arg(long = "path")]
        path: Option<String>,
    },
    /// Kill a session by its full name.
    Kill {
        #[arg(value_name = "NAME")]
        name: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum HooksCommand {
    /// Run one hook command in preview mode against a sample event.
    Run {
        #[arg(long = "command", value_name = "CMD")]
        command: String,
        /// Built-in scenario supplying the event.
        #[arg(long = "scenario", default_value = "bash-pre")]
        scenario: String,
        /// Timeout in milliseconds.
        #[arg(long = "timeout", value_name = "MS")]
        timeout: Option<u64>,
    },
    /// Show which settings entries match an event.
    Match {
        /// Claude-style settings.json to read hooks from.
        #[arg(long = "settings", value_name = "FILE")]
        settings: String,
        #[arg(long = "event-type", value_name = "TYPE")]
        event_type: String,
        /// Tool name to match (tool-scoped event types only).
        #[arg(long = "tool", value_name = "NAME")]
        tool: Option<String>,
    },
    /// List built-in sample events.
    Scenarios,
}
