//! Ports: the store boundary and the repository interfaces the use-cases
//! are written against. The managed key-value store itself is a black box
//! reached through [`KeyValueStore`].

use crate::domain::model::{
    AnswerReport, Draft, DraftSummary, OverviewReport, ReleasedPoll, User, Version, VoterReport,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Composite primary key of a single-table item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub pk: String,
    pub sk: String,
}

impl ItemKey {
    pub fn new(pk: impl Into<String>, sk: impl Into<String>) -> Self {
        Self {
            pk: pk.into(),
            sk: sk.into(),
        }
    }
}

/// Flat attribute map, the document shape the store deals in.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub key: ItemKey,
    pub attributes: HashMap<String, serde_json::Value>,
}

impl Item {
    pub fn new(key: ItemKey) -> Self {
        Self {
            key,
            attributes: HashMap::new(),
        }
    }

    pub fn with(mut self, name: &str, value: serde_json::Value) -> Self {
        self.attributes.insert(name.to_string(), value);
        self
    }
}

/// Opaque pagination token handed back by [`KeyValueStore::query`].
pub type PageToken = String;

#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    pub limit: Option<usize>,
    pub start_after: Option<PageToken>,
}

impl PageRequest {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn limited(limit: usize, start_after: Option<PageToken>) -> Self {
        Self {
            limit: Some(limit),
            start_after,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryPage {
    pub items: Vec<Item>,
    pub next: Option<PageToken>,
}

/// One element of a batch write. Mirrors the store's put/delete requests.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteRequest {
    Put(Item),
    Delete(ItemKey),
}

/// The managed single-table store, reduced to the four operations the
/// repositories need. `batch_write` applies at most 25 requests and returns
/// the unprocessed subset; callers own the retry.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &ItemKey) -> Result<Option<Item>>;

    async fn put(&self, item: Item) -> Result<()>;

    async fn query(&self, pk: &str, sk_prefix: &str, page: PageRequest) -> Result<QueryPage>;

    async fn batch_write(&self, writes: Vec<WriteRequest>) -> Result<Vec<WriteRequest>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save(&self, user: &User) -> Result<()>;

    async fn find(&self, user_id: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait PollRepository: Send + Sync {
    async fn save_draft(&self, draft: &Draft) -> Result<()>;

    /// Replace an existing draft. `stale_positions` are question slots from
    /// the previous revision with no successor; they are deleted in the same
    /// batch.
    async fn replace_draft(&self, draft: &Draft, stale_positions: &[u32]) -> Result<()>;

    async fn find_draft(&self, poll_id: &str) -> Result<Option<Draft>>;

    async fn drafts_for_owner(&self, owner_id: &str) -> Result<Vec<DraftSummary>>;

    /// Highest released version number for a poll, 0 when none exist.
    async fn latest_version(&self, poll_id: &str) -> Result<u32>;

    /// Persist a release snapshot together with its audit marker and the
    /// zeroed report items, in one batched write.
    async fn save_release(
        &self,
        release: &ReleasedPoll,
        marker: &Version,
        overview: &OverviewReport,
        answers: &[AnswerReport],
    ) -> Result<()>;

    async fn find_release(&self, poll_id: &str, version: u32) -> Result<Option<ReleasedPoll>>;

    async fn update_release(&self, release: &ReleasedPoll) -> Result<()>;
}

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn find_overview(&self, poll_id: &str, version: u32) -> Result<Option<OverviewReport>>;

    async fn find_answers(&self, poll_id: &str, version: u32) -> Result<Vec<AnswerReport>>;

    async fn find_voter(
        &self,
        poll_id: &str,
        version: u32,
        voter_id: &str,
    ) -> Result<Option<VoterReport>>;

    /// One page of voter reports; the store's pagination token passes
    /// through untouched.
    async fn voters(
        &self,
        poll_id: &str,
        version: u32,
        page: PageRequest,
    ) -> Result<(Vec<VoterReport>, Option<PageToken>)>;

    /// Persist a ballot: the voter report plus the updated overview and
    /// answer reports, in one batched write.
    async fn record_ballot(
        &self,
        voter: &VoterReport,
        overview: &OverviewReport,
        answers: &[AnswerReport],
    ) -> Result<()>;
}
