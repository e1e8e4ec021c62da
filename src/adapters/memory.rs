use crate::adapters::batch::MAX_BATCH_SIZE;
use crate::domain::ports::{Item, ItemKey, KeyValueStore, PageRequest, QueryPage, WriteRequest};
use crate::utils::error::{Result, ServiceError};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// In-memory [`KeyValueStore`] backing the demo binary and the test suites.
/// Items live in a BTreeMap keyed by (pk, sk), so range queries come out in
/// sort-key order just like the managed store.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    items: Arc<Mutex<BTreeMap<(String, String), Item>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &ItemKey) -> Result<Option<Item>> {
        let items = self.items.lock().await;
        Ok(items.get(&(key.pk.clone(), key.sk.clone())).cloned())
    }

    async fn put(&self, item: Item) -> Result<()> {
        let mut items = self.items.lock().await;
        items.insert((item.key.pk.clone(), item.key.sk.clone()), item);
        Ok(())
    }

    async fn query(&self, pk: &str, sk_prefix: &str, page: PageRequest) -> Result<QueryPage> {
        let items = self.items.lock().await;
        let start_after = page.start_after.unwrap_or_default();

        let mut matched: Vec<Item> = items
            .range((pk.to_string(), String::new())..(format!("{}\u{10FFFF}", pk), String::new()))
            .filter(|((item_pk, item_sk), _)| {
                item_pk == pk && item_sk.starts_with(sk_prefix) && item_sk.as_str() > start_after.as_str()
            })
            .map(|(_, item)| item.clone())
            .collect();

        let next = match page.limit {
            Some(limit) if matched.len() > limit => {
                matched.truncate(limit);
                matched.last().map(|item| item.key.sk.clone())
            }
            _ => None,
        };

        Ok(QueryPage {
            items: matched,
            next,
        })
    }

    async fn batch_write(&self, writes: Vec<WriteRequest>) -> Result<Vec<WriteRequest>> {
        if writes.len() > MAX_BATCH_SIZE {
            return Err(ServiceError::store(format!(
                "batch of {} exceeds the {} item limit",
                writes.len(),
                MAX_BATCH_SIZE
            )));
        }
        let mut items = self.items.lock().await;
        for write in writes {
            match write {
                WriteRequest::Put(item) => {
                    items.insert((item.key.pk.clone(), item.key.sk.clone()), item);
                }
                WriteRequest::Delete(key) => {
                    items.remove(&(key.pk, key.sk));
                }
            }
        }
        Ok(Vec::new())
    }
}
