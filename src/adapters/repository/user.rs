use crate::adapters::repository::attr;
use crate::domain::model::{user_partition_key, User};
use crate::domain::ports::{Item, ItemKey, KeyValueStore, UserRepository};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;

pub struct UserItems<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> UserItems<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn to_item(user: &User) -> Result<Item> {
        Ok(Item::new(ItemKey::new(user.pk(), User::sk()))
            .with("id", json!(user.id()))
            .with("name", json!(user.name()))
            .with("email", json!(user.email()))
            .with("created_at", serde_json::to_value(user.created_at())?))
    }

    fn from_item(item: &Item) -> Result<User> {
        Ok(User::from_parts(
            attr(item, "id")?,
            attr(item, "name")?,
            attr(item, "email")?,
            attr::<DateTime<Utc>>(item, "created_at")?,
        ))
    }
}

#[async_trait]
impl<S: KeyValueStore> UserRepository for UserItems<S> {
    async fn save(&self, user: &User) -> Result<()> {
        self.store.put(Self::to_item(user)?).await
    }

    async fn find(&self, user_id: &str) -> Result<Option<User>> {
        let key = ItemKey::new(user_partition_key(user_id), User::sk());
        match self.store.get(&key).await? {
            Some(item) => Ok(Some(Self::from_item(&item)?)),
            None => Ok(None),
        }
    }
}
