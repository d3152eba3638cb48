use crate::strategy::BatchConfig;
use crate::types::AccountId;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Points ledger and token issuer
#[derive(Parser, Debug)]
#[command(name = "points-ledger")]
#[command(about = "Apply points requests to accounts and issue access tokens", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply points requests and print the resulting accounts as CSV
    Apply(ApplyArgs),
    /// Issue an access/refresh token pair for an account
    Token(TokenArgs),
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Accounts CSV file
    #[arg(long = "accounts", value_name = "FILE")]
    pub accounts_file: PathBuf,

    /// Points requests CSV file
    #[arg(value_name = "REQUESTS", help = "Path to the points requests CSV file")]
    pub requests_file: PathBuf,

    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for synchronous or 'async' for asynchronous"
    )]
    pub strategy: StrategyType,

    /// Number of requests per batch (async mode only)
    #[arg(long = "batch-size", value_name = "SIZE")]
    pub batch_size: Option<usize>,

    /// Runtime worker threads (async mode only, default: CPU cores)
    #[arg(long = "max-concurrent", value_name = "COUNT")]
    pub max_concurrent_batches: Option<usize>,

    /// Also write every ledger entry to this CSV file
    #[arg(long = "history", value_name = "FILE")]
    pub history_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct TokenArgs {
    /// Accounts CSV file
    #[arg(long = "accounts", value_name = "FILE")]
    pub accounts_file: PathBuf,

    /// ID of the account to issue tokens for
    #[arg(long = "account", value_name = "ID")]
    pub account: u64,

    /// Secrets file, overriding the one selected by LEDGER_ENV
    #[arg(long = "secrets", value_name = "FILE")]
    pub secrets_file: Option<PathBuf>,
}

/// Available processing strategies
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl ApplyArgs {
    /// Batch settings from the arguments, falling back to defaults
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_none() && self.max_concurrent_batches.is_none() {
            return BatchConfig::default();
        }

        let default = BatchConfig::default();
        BatchConfig::new(
            self.batch_size.unwrap_or(default.batch_size),
            self.max_concurrent_batches
                .unwrap_or(default.max_concurrent_batches),
        )
    }
}

impl TokenArgs {
    pub fn account_id(&self) -> AccountId {
        AccountId(self.account)
    }
}
