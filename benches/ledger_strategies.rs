//! Benchmark suite comparing processing strategies
//!
//! ```bash
//! cargo bench
//! ```
//!
//! Inputs are generated into temporary files: a fixed set of accounts and a
//! stream of alternating adds and spends spread across them, with every
//! tenth request invalid.

use points_ledger::cli::StrategyType;
use points_ledger::strategy::{create_strategy, BatchConfig};
use std::io::Write;
use tempfile::NamedTempFile;

const ACCOUNTS: u64 = 100;

fn main() {
    divan::main();
}

struct Inputs {
    accounts: NamedTempFile,
    requests: NamedTempFile,
}

fn generate(requests: u64) -> Inputs {
    let mut accounts = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(accounts, "id,username,email,points,is_superuser,is_staff,is_active").unwrap();
    for id in 1..=ACCOUNTS {
        writeln!(accounts, "{id},user{id},user{id}@example.com,1000,false,false,true").unwrap();
    }

    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "account,points_spent,points_added").unwrap();
    for n in 0..requests {
        let account = n % ACCOUNTS + 1;
        let row = match n % 10 {
            9 => format!("{account},abc,"),
            k if k % 2 == 0 => format!("{account},,{}", n % 50 + 1),
            _ => format!("{account},{},", n % 40 + 1),
        };
        writeln!(file, "{row}").unwrap();
    }

    accounts.flush().unwrap();
    file.flush().unwrap();
    Inputs {
        accounts,
        requests: file,
    }
}

fn run(bencher: divan::Bencher, strategy_type: StrategyType, requests: u64) {
    let inputs = generate(requests);
    let config = matches!(strategy_type, StrategyType::Async).then(BatchConfig::default);
    let strategy = create_strategy(strategy_type, config);

    bencher.bench(|| {
        let mut output = Vec::new();
        strategy
            .process(inputs.accounts.path(), inputs.requests.path(), &mut output, None)
            .expect("Processing failed");
        output
    });
}

#[divan::bench(args = [1_000, 100_000])]
fn sync_strategy(bencher: divan::Bencher, requests: u64) {
    run(bencher, StrategyType::Sync, requests);
}

#[divan::bench(args = [1_000, 100_000])]
fn async_strategy(bencher: divan::Bencher, requests: u64) {
    run(bencher, StrategyType::Async, requests);
}
