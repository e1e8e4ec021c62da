use crate::domain::ports::{KeyValueStore, WriteRequest};
use crate::utils::error::{Result, ServiceError};

/// The store accepts at most this many requests per batch write.
pub const MAX_BATCH_SIZE: usize = 25;

/// Write any number of requests: drain in groups of [`MAX_BATCH_SIZE`],
/// re-submitting whatever the store reports as unprocessed. Each group gets
/// `retry_limit` submissions before the leftovers surface as an error.
pub async fn write_all<S: KeyValueStore + ?Sized>(
    store: &S,
    mut writes: Vec<WriteRequest>,
    retry_limit: usize,
) -> Result<()> {
    while !writes.is_empty() {
        let batch: Vec<_> = writes
            .drain(..writes.len().min(MAX_BATCH_SIZE))
            .collect();

        let mut pending = batch;
        let mut attempts = 0;
        while !pending.is_empty() {
            if attempts >= retry_limit {
                return Err(ServiceError::store(format!(
                    "{} writes still unprocessed after {} attempts",
                    pending.len(),
                    attempts
                )));
            }
            attempts += 1;
            let submitted = pending.len();
            pending = store.batch_write(pending).await?;
            if !pending.is_empty() {
                tracing::warn!(
                    submitted,
                    unprocessed = pending.len(),
                    attempt = attempts,
                    "batch write returned unprocessed items, retrying"
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{Item, ItemKey, PageRequest, QueryPage};
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Store that records batch sizes and leaves the tail of each batch
    /// unprocessed for the first `failures` calls.
    struct CountingStore {
        batch_sizes: Arc<Mutex<Vec<usize>>>,
        failures: Arc<Mutex<usize>>,
    }

    impl CountingStore {
        fn new(failures: usize) -> Self {
            Self {
                batch_sizes: Arc::new(Mutex::new(Vec::new())),
                failures: Arc::new(Mutex::new(failures)),
            }
        }
    }

    #[async_trait]
    impl KeyValueStore for CountingStore {
        async fn get(&self, _key: &ItemKey) -> Result<Option<Item>> {
            Ok(None)
        }

        async fn put(&self, _item: Item) -> Result<()> {
            Ok(())
        }

        async fn query(
            &self,
            _pk: &str,
            _sk_prefix: &str,
            _page: PageRequest,
        ) -> Result<QueryPage> {
            Ok(QueryPage::default())
        }

        async fn batch_write(&self, writes: Vec<WriteRequest>) -> Result<Vec<WriteRequest>> {
            self.batch_sizes.lock().await.push(writes.len());
            let mut failures = self.failures.lock().await;
            if *failures > 0 {
                *failures -= 1;
                // leave the second half unprocessed
                let half = writes.len() / 2;
                Ok(writes.into_iter().skip(half).collect())
            } else {
                Ok(Vec::new())
            }
        }
    }

    fn puts(n: usize) -> Vec<WriteRequest> {
        (0..n)
            .map(|i| WriteRequest::Put(Item::new(ItemKey::new("PK", format!("SK#{:04}", i)))))
            .collect()
    }

    #[tokio::test]
    async fn test_writes_split_into_groups_of_25() {
        let store = CountingStore::new(0);
        write_all(&store, puts(60), 3).await.unwrap();

        let sizes = store.batch_sizes.lock().await.clone();
        assert_eq!(sizes, vec![25, 25, 10]);
    }

    #[tokio::test]
    async fn test_unprocessed_items_are_retried() {
        let store = CountingStore::new(1);
        write_all(&store, puts(10), 3).await.unwrap();

        let sizes = store.batch_sizes.lock().await.clone();
        // first submission of 10 leaves 5 unprocessed, second clears them
        assert_eq!(sizes, vec![10, 5]);
    }

    #[tokio::test]
    async fn test_retry_budget_is_bounded() {
        // every call leaves something unprocessed
        let store = CountingStore::new(usize::MAX);
        let err = write_all(&store, puts(8), 3).await.unwrap_err();
        assert!(matches!(err, ServiceError::Store { .. }));

        let sizes = store.batch_sizes.lock().await.clone();
        assert_eq!(sizes.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_write_set_is_a_noop() {
        let store = CountingStore::new(0);
        write_all(&store, Vec::new(), 3).await.unwrap();
        assert!(store.batch_sizes.lock().await.is_empty());
    }
}
