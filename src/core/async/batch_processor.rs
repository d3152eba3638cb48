//! Batch processing with account-based partitioning
//!
//! This module provides the `BatchProcessor` struct, which runs a batch of
//! points requests concurrently while keeping each account's requests in
//! input order.
//!
//! # Design
//!
//! A batch is partitioned by account ID. Each partition runs sequentially on
//! its own tokio task, so requests for different accounts proceed in parallel
//! and a spend that depends on an earlier add for the same account still sees
//! that add.

use std::collections::HashMap;

use tracing::{error, warn};

use super::AsyncPointsLedger;
use crate::types::{AccountId, LedgerError, LedgerRecord, PointsResponse};

/// Result of processing a single ledger record
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The record that was processed
    pub record: LedgerRecord,

    /// The outcome
    pub result: Result<PointsResponse, LedgerError>,
}

/// Batch processor with account-based partitioning
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    /// Shared thread-safe ledger
    ledger: AsyncPointsLedger,
}

impl BatchProcessor {
    /// Create a new BatchProcessor
    pub fn new(ledger: AsyncPointsLedger) -> Self {
        Self { ledger }
    }

    /// Partition a batch by account ID
    ///
    /// Every record lands in exactly one partition, and each partition keeps
    /// the input order of its records.
    pub fn partition_by_account(
        &self,
        batch: Vec<LedgerRecord>,
    ) -> HashMap<AccountId, Vec<LedgerRecord>> {
        let mut account_batches: HashMap<AccountId, Vec<LedgerRecord>> = HashMap::new();

        for record in batch {
            account_batches
                .entry(record.account)
                .or_default()
                .push(record);
        }

        account_batches
    }

    /// Process one account's records in order
    ///
    /// Failed records are captured in the results and do not stop the rest.
    pub async fn process_account_records(&self, records: Vec<LedgerRecord>) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(records.len());

        for record in records {
            let result = self.ledger.process_request(record.account, &record.request);
            match &result {
                Err(e) if e.is_validation() => {
                    warn!(account = %record.account, error = %e, "Points request rejected")
                }
                Err(e) => error!(account = %record.account, error = %e, "Points request failed"),
                Ok(_) => {}
            }
            results.push(ProcessingResult { record, result });
        }

        results
    }

    /// Process a batch with account-based partitioning
    ///
    /// Spawns one task per account and waits for all of them. The returned
    /// results are grouped by account, not in input order.
    pub async fn process_batch(&self, batch: Vec<LedgerRecord>) -> Vec<ProcessingResult> {
        let account_batches = self.partition_by_account(batch);

        let mut tasks = Vec::with_capacity(account_batches.len());
        for (_account, records) in account_batches {
            let processor = self.clone();
            tasks.push(tokio::spawn(async move {
                processor.process_account_records(records).await
            }));
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(account_results) => results.extend(account_results),
                Err(e) => error!(error = ?e, "Ledger task panicked"),
            }
        }

        results
    }
}
