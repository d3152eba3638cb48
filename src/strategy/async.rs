//! Asynchronous batch processing strategy
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BatchProcessor (account partitioning + tasks)
//!     └── AsyncPointsLedger
//!         └── AsyncAccountManager (account + entries per DashMap entry)
//! ```
//!
//! Batches are processed one after another so that an account's requests
//! keep file order even when they span batches. Within a batch, different
//! accounts run in parallel on the tokio multi-threaded runtime.

use crate::core::r#async::{AsyncAccountManager, AsyncPointsLedger, BatchProcessor};
use crate::io::async_reader::AsyncReader;
use crate::strategy::{write_results, ProcessingStrategy, ProcessingSummary};
use crate::types::{Account, LedgerError, LedgerRecord};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};
use tracing::warn;

/// Configuration for batch processing
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of requests per batch
    pub batch_size: usize,
    /// Worker threads for the runtime
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a config, replacing zero values with the defaults
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(default = default.batch_size, "Invalid batch_size 0, using default");
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            warn!(
                default = default.max_concurrent_batches,
                "Invalid max_concurrent_batches 0, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

async fn open(path: &Path) -> Result<Compat<tokio::fs::File>, LedgerError> {
    let file = tokio::fs::File::open(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LedgerError::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            LedgerError::IoError {
                message: format!("Failed to open file '{}': {}", path.display(), e),
            }
        }
    })?;
    Ok(file.compat())
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(
        &self,
        accounts_path: &Path,
        requests_path: &Path,
        output: &mut dyn Write,
        history: Option<&mut dyn Write>,
    ) -> Result<(), LedgerError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| LedgerError::RuntimeError {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        let account_manager = Arc::new(AsyncAccountManager::new());
        let ledger = AsyncPointsLedger::new(Arc::clone(&account_manager));
        let processor = BatchProcessor::new(ledger.clone());

        runtime.block_on(async {
            let mut accounts: AsyncReader<_, Account> = AsyncReader::new(open(accounts_path).await?);
            loop {
                let batch = accounts.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }
                for account in batch {
                    account_manager.register(account);
                }
            }

            let mut requests: AsyncReader<_, LedgerRecord> =
                AsyncReader::new(open(requests_path).await?);
            let mut summary = ProcessingSummary::default();
            loop {
                let batch = requests.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                // Wait for the whole batch before reading the next one
                for outcome in processor.process_batch(batch).await {
                    summary.record(&outcome.result);
                }
            }
            summary.log();

            Ok::<(), LedgerError>(())
        })?;

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
                            2,bob,bob@example.com,50,false,false,true\n";

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_zero_config_falls_back_to_defaults() {
        let config = BatchConfig::new(0, 0);
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.max_concurrent_batches, num_cpus::get());
    }

    #[test]
    fn test_maintains_ordering_across_batches() {
        // Account 1 can only afford the final spend after the add in the
        // previous batch has been applied
        let accounts = create_temp_csv(ACCOUNTS);
        let requests = create_temp_csv(
            "account,points_spent,points_added\n\
             1,30,\n\
             2,,25\n\
             1,,100\n\
             2,75,\n\
             1,170,\n",
        );

        let strategy = AsyncProcessingStrategy::new(BatchConfig::new(2, num_cpus::get()));
        let mut output = Vec::new();
        let mut history = Vec::new();

        strategy
            .process(accounts.path(), requests.path(), &mut output, Some(&mut history))
            .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "id,username,email,points\n1,alice,alice@example.com,0\n2,bob,bob@example.com,0\n"
        );
        assert_eq!(String::from_utf8(history).unwrap().lines().count(), 6);
    }

    #[test]
    fn test_missing_accounts_file() {
        let requests = create_temp_csv("account,points_spent,points_added\n");
        let strategy = AsyncProcessingStrategy::new(BatchConfig::default());
        let mut output = Vec::new();

        let result = strategy.process(Path::new("nonexistent.csv"), requests.path(), &mut output, None);
        assert!(matches!(result, Err(LedgerError::FileNotFound { .. })));
    }
}
