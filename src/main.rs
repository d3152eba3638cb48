//! Points Ledger CLI
//!
//! # Usage
//!
//! ```bash
//! cargo run -- apply --accounts accounts.csv requests.csv > accounts_out.csv
//! cargo run -- apply --accounts accounts.csv --strategy sync --history history.csv requests.csv
//! cargo run -- apply --accounts accounts.csv --batch-size 2000 --max-concurrent 8 requests.csv
//! cargo run -- token --accounts accounts.csv --account 7
//! ```
//!
//! `apply` writes the resulting accounts to stdout. `token` prints a JSON
//! object with `refresh` and `access` tokens signed with `DJANGO_SECRET_KEY`
//! from the secrets file. Their lifetimes come from
//! `ACCESS_TOKEN_LIFETIME_MINUTES` (default 5) and
//! `REFRESH_TOKEN_LIFETIME_HOURS` (default 24). Logs go to stderr; set
//! `LOG_LEVEL` and `LOG_FORMAT=json` to adjust them.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing file, unknown account, bad secrets, etc.)

use points_ledger::auth::TokenIssuer;
use points_ledger::cli::{self, ApplyArgs, Command, StrategyType, TokenArgs};
use points_ledger::config::{Config, Secrets};
use points_ledger::io::SyncReader;
use points_ledger::strategy;
use points_ledger::types::{Account, LedgerError};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::process;
use tracing::{info, warn};

fn init_tracing(config: &Config) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if config.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn run_apply(args: ApplyArgs) -> Result<(), LedgerError> {
    let config = matches!(args.strategy, StrategyType::Async).then(|| args.to_batch_config());
    let strategy = strategy::create_strategy(args.strategy.clone(), config);

    let mut history = args
        .history_file
        .as_ref()
        .map(|path| File::create(path).map(BufWriter::new))
        .transpose()?;

    let mut output = std::io::stdout();
    strategy.process(
        &args.accounts_file,
        &args.requests_file,
        &mut output,
        history.as_mut().map(|writer| writer as &mut dyn Write),
    )?;

    if let Some(mut writer) = history {
        writer.flush()?;
    }
    Ok(())
}

fn run_token(config: &Config, args: TokenArgs) -> Result<(), LedgerError> {
    let secrets_path = args
        .secrets_file
        .clone()
        .unwrap_or_else(|| config.secrets_path());
    let secrets = Secrets::load(&secrets_path)?;
    info!(
        env = %config.env,
        database = %secrets.database.redacted_url(),
        "Loaded secrets"
    );

    let wanted = args.account_id();
    let mut account = None;
    for result in SyncReader::<Account>::new(&args.accounts_file)? {
        match result {
            Ok(row) if row.id == wanted => account = Some(row),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Skipping account row"),
        }
    }
    let account = account.ok_or_else(|| LedgerError::account_not_found(wanted))?;

    let (access_lifetime, refresh_lifetime) = config.token_lifetimes();
    let pair = TokenIssuer::new(secrets.secret_key.as_bytes())
        .with_lifetimes(access_lifetime, refresh_lifetime)
        .issue(&account)?;
    let json = serde_json::to_string_pretty(&pair).map_err(|e| LedgerError::TokenError {
        message: e.to_string(),
    })?;
    println!("{}", json);
    Ok(())
}

fn main() {
    let config = Config::from_env();
    init_tracing(&config);

    let args = cli::parse_args();
    let result = match args.command {
        Command::Apply(apply) => run_apply(apply),
        Command::Token(token) => run_token(&config, token),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
