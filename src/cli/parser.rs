use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for paddock
/// Motorsport event staffing dashboard backed by Airtable
#[derive(Parser)]
#[command(
    name = "paddock",
    version = env!("CARGO_PKG_VERSION"),
    about = "Motorsport event staffing: reconcile Airtable data, detect conflicts and travel gaps, publish reports",
    long_about = None
)]
pub struct Cli {
    /// Use a configuration file other than ~/.paddock/paddock.yaml
    #[arg(global = true, long = "config", value_name = "FILE")]
    pub config: Option<String>,

    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db", value_name = "FILE")]
    pub db: Option<String>,

    /// Read records from JSON files in DIR instead of Airtable
    #[arg(global = true, long = "fixtures", value_name = "DIR", hide = true)]
    pub fixtures: Option<String>,

    /// Reference date (YYYY-MM-DD) used instead of the system date
    #[arg(global = true, long = "today", value_name = "DATE", hide = true)]
    pub today: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view, edit or set a key)
    Config {
        #[arg(long = "print", help = "Print the current configuration (token masked)")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,

        #[arg(
            long = "set",
            value_name = "KEY=VALUE",
            help = "Set a single key, e.g. server.port=8080"
        )]
        set: Vec<String>,
    },

    /// Fetch, reconcile, write the workbook and log the result
    Refresh,

    /// List reconciled events
    List {
        #[arg(long = "unassigned", help = "Only confirmed events without staff")]
        unassigned: bool,

        #[arg(long = "set", value_name = "NAME", help = "Only events of this SET")]
        set: Option<String>,
    },

    /// Show staff booked on overlapping events
    Conflicts,

    /// Show material shipment and flight booking alerts
    Alerts,

    /// Show staff with no reservation in a date range
    Staff {
        #[arg(long = "from", value_name = "YYYY-MM-DD")]
        from: String,

        #[arg(long = "to", value_name = "YYYY-MM-DD")]
        to: String,

        #[arg(long = "role", help = "Filter by position (substring, case-insensitive)")]
        role: Option<String>,
    },

    /// Export the reconciled calendar
    Export {
        #[arg(long, value_enum, default_value = "xlsx")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Print the update log
    Log {
        #[arg(long = "print", help = "Print rows from the update log")]
        print: bool,

        #[arg(long = "limit", default_value_t = 20, help = "Number of rows to show")]
        limit: usize,
    },

    /// Run the web dashboard and the automatic updates
    Serve {
        #[arg(long = "bind", help = "Address to listen on (default from config)")]
        bind: Option<String>,

        #[arg(long = "port", help = "Port to listen on (default from config)")]
        port: Option<u16>,
    },
}
