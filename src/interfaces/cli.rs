use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "saathi")]
#[command(about = "A terminal client for the RouteSaathi fleet coordination API.")]
#[command(version)]
pub struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Choose color theme
    #[arg(short = 'T', long, global = true)]
    pub theme: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in as coordinator or conductor
    Login {
        /// Role to log in as (coordinator or conductor)
        #[arg(short, long)]
        role: String,

        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },

    /// Clear the stored session
    Logout,

    /// Show configuration and session status
    Status,

    /// Coordinator dashboard: stats, alerts and route load
    Dashboard,

    /// Live bus tracking view
    Buses {
        /// Only buses on this route
        #[arg(long)]
        route: Option<String>,

        /// Only buses with this status (ontime, delay, congestion)
        #[arg(long)]
        status: Option<String>,

        /// Free-text search over number, conductor, route and location
        #[arg(short, long)]
        search: Option<String>,

        /// Refresh every N seconds until interrupted
        #[arg(short, long, value_name = "SECS")]
        watch: Option<u64>,

        /// Write the current view to a CSV file
        #[arg(long, value_name = "PATH")]
        export: Option<std::path::PathBuf>,
    },

    /// Conductor roster, optionally with one chat thread
    Conductors {
        /// Free-text search over name, bus and route
        #[arg(short, long)]
        search: Option<String>,

        /// Only conductors currently online
        #[arg(long)]
        online: bool,

        /// Show the chat thread with this conductor id
        #[arg(long, value_name = "ID")]
        thread: Option<u32>,
    },

    /// Recent messages (coordinator view)
    Messages,

    /// Send a message
    Send {
        /// Target conductor id (coordinator only; conductors always
        /// message the coordinator)
        #[arg(short, long, value_name = "ID")]
        conductor: Option<u32>,

        #[arg(short, long)]
        message: String,
    },

    /// Report an issue to the coordinator (conductor only)
    Report {
        /// Issue type: breakdown, traffic, accident or crowding
        #[arg(short, long)]
        issue: String,

        /// Free-form description; without it a canned urgent report is sent
        #[arg(short, long)]
        note: Option<String>,
    },

    /// Broadcast a message to all conductors
    Broadcast {
        #[arg(short, long)]
        message: String,

        /// Prefix the broadcast with a route tag
        #[arg(long)]
        route: Option<String>,
    },

    /// ML route recommendations
    Recommendations {
        /// Only recommendations with this priority (HIGH, MEDIUM, LOW)
        #[arg(long)]
        priority: Option<String>,

        /// Apply the recommendation whose route matches this text
        #[arg(long, value_name = "ROUTE")]
        apply: Option<String>,

        /// Apply every recommendation with a non-zero change
        #[arg(long)]
        apply_all: bool,
    },

    /// Generate config sample
    GenerateConfig,
}
