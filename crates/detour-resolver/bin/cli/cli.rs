use clap::{Parser, Subcommand, ValueEnum};
use detour_telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const STORAGE_BACKEND_ENV: &str = "DETOUR_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "DETOUR_MYSQL_DSN";
pub const SEED_FILE_ENV: &str = "DETOUR_SEED_FILE";
pub const LOG_FORMAT_ENV: &str = "DETOUR_LOG_FORMAT";
pub const GLOBAL_FALLBACK_ENV: &str = "DETOUR_GLOBAL_FALLBACK";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "detour", about = "Manage and resolve URL redirects")]
pub struct CLI {
    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"))]
    pub mysql_dsn: Option<String>,

    /// JSON-lines file loaded into the store before the command runs.
    #[arg(long, env = SEED_FILE_ENV)]
    pub seed: Option<PathBuf>,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the redirect destination for a request path, or `null`.
    Resolve {
        path: String,
        /// Site id; 0 or absent means the global scope.
        #[arg(long)]
        site: Option<u64>,
        /// Retry a miss in the site against the global scope.
        #[arg(long, env = GLOBAL_FALLBACK_ENV)]
        global_fallback: bool,
    },
    /// Load redirects from a JSON-lines file.
    Import {
        file: PathBuf,
        /// Keep existing redirects instead of replacing them.
        #[arg(long)]
        skip_existing: bool,
    },
    /// Print stored redirects as JSON lines.
    List {
        /// Case-insensitive text matched against from and to paths.
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        site: Option<u64>,
    },
    /// Delete a redirect.
    Remove {
        from: String,
        #[arg(long)]
        site: Option<u64>,
    },
}
