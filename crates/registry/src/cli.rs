use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run hash registry functions against a local ledger")]
pub struct Cli {
    /// Directory holding the ledger write-ahead log.
    #[arg(long, env = "REGISTRY_DATA_DIR", default_value = "ledger-data")]
    pub data_dir: PathBuf,

    /// Log line format written to stderr.
    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run one function as a single block and print its payload.
    Invoke {
        /// Function name, e.g. queryHash.
        function: String,
        /// Positional string arguments.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Run every invocation of a JSON file (`[{"function": .., "args": [..]}]`) as one block.
    Block { file: PathBuf },
    /// Print the ledger version and application hash.
    Status,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}
