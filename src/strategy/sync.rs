//! Synchronous processing strategy
//!
//! Single-threaded pipeline: [`SyncReader`] streams rows, [`PointsLedger`]
//! applies them one at a time in file order.

use crate::core::PointsLedger;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{write_results, ProcessingStrategy, ProcessingSummary};
use crate::types::{Account, LedgerError, LedgerRecord};
use std::io::Write;
use std::path::Path;
use tracing::{error, info, warn};

/// Synchronous processing strategy
///
/// ```no_run
/// use points_ledger::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let mut output = io::stdout();
/// SyncProcessingStrategy
///     .process(Path::new("accounts.csv"), Path::new("requests.csv"), &mut output, None)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl SyncProcessingStrategy {
    fn load_accounts(path: &Path) -> Result<Vec<Account>, LedgerError> {
        let mut accounts = Vec::new();
        for result in SyncReader::<Account>::new(path)? {
            match result {
                Ok(account) => accounts.push(account),
                Err(e) => warn!(error = %e, "Skipping account row"),
            }
        }
        Ok(accounts)
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(
        &self,
        accounts_path: &Path,
        requests_path: &Path,
        output: &mut dyn Write,
        history: Option<&mut dyn Write>,
    ) -> Result<(), LedgerError> {
        let accounts = Self::load_accounts(accounts_path)?;
        info!(accounts = accounts.len(), "Loaded accounts");

        let mut ledger = PointsLedger::with_accounts(accounts);
        let reader = SyncReader::<LedgerRecord>::new(requests_path)?;

        let mut summary = ProcessingSummary::default();
        for result in reader {
            match result {
                Ok(record) => {
                    let outcome = ledger.process(record.account, &record.request);
                    match &outcome {
                        Err(e) if e.is_validation() => {
                            warn!(account = %record.account, error = %e, "Points request rejected")
                        }
                        Err(e) => {
                            error!(account = %record.account, error = %e, "Points request failed")
                        }
                        Ok(_) => {}
                    }
                    summary.record(&outcome);
                }
                Err(e) => {
                    summary.malformed += 1;
                    warn!(error = %e, "Skipping request row");
                }
            }
        }
        summary.log();

        write_results(&ledger, output, history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ACCOUNTS: &str = "id,username,email,points,is_superuser,is_staff,is_active\n\
                            1,alice,alice@example.com,100,false,false,true\n\
                            2,bob,bob@example.com,0,false,true,true\n";

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn run(requests: &str) -> (String, String) {
        let accounts = create_temp_csv(ACCOUNTS);
        let requests = create_temp_csv(requests);
        let mut output = Vec::new();
        let mut history = Vec::new();

        SyncProcessingStrategy
            .process(accounts.path(), requests.path(), &mut output, Some(&mut history))
            .unwrap();

        (String::from_utf8(output).unwrap(), String::from_utf8(history).unwrap())
    }

    #[test]
    fn test_spend_then_add() {
        let (output, history) = run("account,points_spent,points_added\n1,30,\n1,,50\n");

        assert_eq!(
            output,
            "id,username,email,points\n1,alice,alice@example.com,120\n2,bob,bob@example.com,0\n"
        );
        let rows: Vec<&str> = history.lines().skip(1).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("1,30,0,"));
        assert!(rows[1].starts_with("1,0,50,"));
    }

    #[test]
    fn test_rejected_requests_leave_no_trace() {
        let (output, history) = run(
            "account,points_spent,points_added\n\
             1,500,\n\
             1,5,5\n\
             1,,\n\
             1,-3,\n\
             1,abc,\n\
             9,1,\n\
             2,,7\n",
        );

        assert!(output.contains("1,alice,alice@example.com,100"));
        assert!(output.contains("2,bob,bob@example.com,7"));
        assert_eq!(history.lines().count(), 2);
    }

    #[test]
    fn test_missing_requests_file() {
        let accounts = create_temp_csv(ACCOUNTS);
        let mut output = Vec::new();

        let result = SyncProcessingStrategy.process(
            accounts.path(),
            Path::new("nonexistent.csv"),
            &mut output,
            None,
        );
        assert!(matches!(result, Err(LedgerError::FileNotFound { .. })));
    }

    #[test]
    fn test_strategy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SyncProcessingStrategy>();
    }
}
