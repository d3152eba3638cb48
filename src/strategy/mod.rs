//! Processing strategy module
//!
//! A strategy is a complete pipeline: load accounts, apply every points
//! request from a CSV file, then write the resulting account views (and
//! optionally the ledger history). Implementations are selected at runtime.

use crate::cli::StrategyType;
use crate::core::LedgerStore;
use crate::io::csv_format::{write_accounts_csv, write_history_csv};
use crate::types::LedgerError;
use std::io::Write;
use std::path::Path;
use tracing::info;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Complete points processing pipeline
pub trait ProcessingStrategy: Send + Sync {
    /// Apply the requests in `requests_path` to the accounts in `accounts_path`
    ///
    /// # Arguments
    ///
    /// * `accounts_path` - CSV with one account per row (`id,username,email,points,...`)
    /// * `requests_path` - CSV with one points request per row
    ///   (`account,points_spent,points_added`), applied in file order per account
    /// * `output` - receives the resulting account views, sorted by ID
    /// * `history` - when given, receives every ledger entry written during the run
    ///
    /// # Returns
    ///
    /// `Ok(())` once both outputs are fully written.
    ///
    /// # Errors
    ///
    /// Returns an error if an input file cannot be opened, the runtime cannot
    /// start, or output cannot be written.
    ///
    /// Malformed rows and rejected requests are logged and skipped; they do
    /// not fail the run.
    fn process(
        &self,
        accounts_path: &Path,
        requests_path: &Path,
        output: &mut dyn Write,
        history: Option<&mut dyn Write>,
    ) -> Result<(), LedgerError>;
}

/// Create a processing strategy for the given type
///
/// `config` only applies to the async strategy.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(config.unwrap_or_default())),
    }
}

/// Outcome counts for one run
///
/// `rejected` requests failed validation or had too few points; `failed`
/// requests hit an unknown account or an overflowing balance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ProcessingSummary {
    pub applied: usize,
    pub rejected: usize,
    pub failed: usize,
    pub malformed: usize,
}

impl ProcessingSummary {
    pub fn record<T>(&mut self, outcome: &Result<T, LedgerError>) {
        match outcome {
            Ok(_) => self.applied += 1,
            Err(e) if e.is_validation() => self.rejected += 1,
            Err(_) => self.failed += 1,
        }
    }

    pub fn log(&self) {
        info!(
            applied = self.applied,
            rejected = self.rejected,
            failed = self.failed,
            malformed = self.malformed,
            "Finished processing requests"
        );
    }
}

/// Write the final state of a store
pub(crate) fn write_results(
    store: &dyn LedgerStore,
    output: &mut dyn Write,
    history: Option<&mut dyn Write>,
) -> Result<(), LedgerError> {
    write_accounts_csv(&store.accounts(), output)?;

    if let Some(history) = history {
        write_history_csv(&store.entries(), history)?;
    }

    Ok(())
}
