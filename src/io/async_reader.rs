//! Asynchronous CSV reader with batch interface
//!
//! Reads rows through csv-async and hands them out in batches for the
//! concurrent strategy.
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of T
//!                  ↓
//!           csv_format::CsvInput
//! ```

use crate::io::csv_format::CsvInput;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use std::marker::PhantomData;
use tracing::warn;

/// Asynchronous CSV reader yielding batches of `T`
pub struct AsyncReader<R: AsyncRead + Unpin, T> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: u64,
    _record: PhantomData<T>,
}

impl<R, T> AsyncReader<R, T>
where
    R: AsyncRead + Unpin + Send + 'static,
    T: CsvInput,
    T::Raw: 'static,
{
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 1,
            _record: PhantomData,
        }
    }

    /// Read up to `batch_size` records
    ///
    /// Rows that fail to parse or convert are logged and skipped.
    ///
    /// # Arguments
    ///
    /// * `batch_size` - Maximum number of records to return
    ///
    /// # Returns
    ///
    /// The parsed records in file order. Fewer than `batch_size` means the
    /// input ran out; an empty vector means end of input.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<T> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut rows = self.csv_reader.deserialize::<T::Raw>();

        while batch.len() < batch_size {
            let Some(row) = rows.next().await else {
                break;
            };
            self.line_num += 1;

            match row {
                Ok(raw) => match T::from_raw(raw) {
                    Ok(record) => batch.push(record),
                    Err(e) => warn!(line = self.line_num, error = %e, "Record conversion error"),
                },
                Err(e) => warn!(line = self.line_num, error = %e, "CSV parse error"),
            }
        }

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Account, AccountId, LedgerRecord};
    use futures::io::Cursor;
    use serde_json::Value;

    fn requests(csv: &'static str) -> AsyncReader<Cursor<&'static [u8]>, LedgerRecord> {
        AsyncReader::new(Cursor::new(csv.as_bytes()))
    }

    #[tokio::test]
    async fn test_read_batches() {
        let mut reader = requests(
            "account,points_spent,points_added\n1,30,\n1,,50\n2,5,\n3,,1\n4,2,\n",
        );

        let first = reader.read_batch(2).await;
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].account, AccountId(1));
        assert_eq!(first[1].request.points_added, Some(Value::String("50".into())));

        assert_eq!(reader.read_batch(2).await.len(), 2);

        let last = reader.read_batch(2).await;
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].account, AccountId(4));

        assert!(reader.read_batch(2).await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_csv() {
        let mut reader = requests("account,points_spent,points_added\n");
        assert!(reader.read_batch(10).await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_row_is_skipped() {
        let mut reader = requests("account,points_spent,points_added\nabc,1,\n2,,50\n");

        let batch = reader.read_batch(10).await;
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].account, AccountId(2));
    }

    #[tokio::test]
    async fn test_whitespace_handling() {
        let mut reader = requests("account,points_spent,points_added\n  7  ,  12  ,\n");

        let batch = reader.read_batch(10).await;
        assert_eq!(batch[0].account, AccountId(7));
        assert_eq!(batch[0].request.points_spent, Some(Value::String("12".into())));
        assert_eq!(batch[0].request.points_added, None);
    }

    #[tokio::test]
    async fn test_reads_accounts() {
        let csv = "id,username,email,points,is_superuser,is_staff,is_active\n\
                   1,alice,alice@example.com,100,true,false,true\n";
        let mut reader: AsyncReader<_, Account> = AsyncReader::new(Cursor::new(csv.as_bytes()));

        let batch = reader.read_batch(10).await;
        assert_eq!(batch.len(), 1);
        assert!(batch[0].is_superuser);
        assert_eq!(batch[0].points, 100);
    }
}
