//! Repositories: translate entities to/from the pk/sk item shape and issue
//! get/put/query/batch-write calls against the store port.

pub mod poll;
pub mod report;
pub mod user;

pub use poll::PollItems;
pub use report::ReportItems;
pub use user::UserItems;

use crate::domain::ports::{Item, KeyValueStore, PageRequest};
use crate::utils::error::{Result, ServiceError};
use serde::de::DeserializeOwned;

/// Read a required attribute. Absence means a corrupt item, which surfaces
/// as the unknown error kind, not as a caller mistake.
pub(crate) fn attr<T: DeserializeOwned>(item: &Item, name: &str) -> Result<T> {
    let value = item.attributes.get(name).ok_or_else(|| {
        ServiceError::store(format!(
            "item {}/{} missing attribute '{}'",
            item.key.pk, item.key.sk, name
        ))
    })?;
    Ok(serde_json::from_value(value.clone())?)
}

pub(crate) fn opt_attr<T: DeserializeOwned>(item: &Item, name: &str) -> Result<Option<T>> {
    match item.attributes.get(name) {
        None => Ok(None),
        Some(serde_json::Value::Null) => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
    }
}

/// Drain a whole sort-key range one page at a time. Reads of more than one
/// store page go through here so no repository forgets the token loop.
pub(crate) async fn query_all<S: KeyValueStore + ?Sized>(
    store: &S,
    pk: &str,
    sk_prefix: &str,
    page_size: usize,
) -> Result<Vec<Item>> {
    let mut items = Vec::new();
    let mut token = None;
    loop {
        let page = store
            .query(pk, sk_prefix, PageRequest::limited(page_size, token))
            .await?;
        items.extend(page.items);
        match page.next {
            Some(next) => token = Some(next),
            None => break,
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::ports::ItemKey;

    #[tokio::test]
    async fn test_attr_missing_is_store_error() {
        let item = Item::new(ItemKey::new("POLL#1", "METADATA"));
        let err = attr::<String>(&item, "title").unwrap_err();
        assert!(matches!(err, ServiceError::Store { .. }));
    }

    #[tokio::test]
    async fn test_opt_attr_treats_null_as_absent() {
        let item = Item::new(ItemKey::new("POLL#1", "METADATA"))
            .with("last_vote_at", serde_json::Value::Null);
        assert_eq!(opt_attr::<String>(&item, "last_vote_at").unwrap(), None);
        assert_eq!(opt_attr::<String>(&item, "absent").unwrap(), None);
    }

    #[tokio::test]
    async fn test_query_all_crosses_page_boundaries() {
        let store = InMemoryStore::new();
        for i in 0..7 {
            store
                .put(Item::new(ItemKey::new(
                    "POLL#1",
                    format!("QUESTION#{:04}", i),
                )))
                .await
                .unwrap();
        }
        let items = query_all(&store, "POLL#1", "QUESTION#", 3).await.unwrap();
        assert_eq!(items.len(), 7);
    }
}
