use crate::adapters::batch::write_all;
use crate::adapters::repository::{attr, opt_attr, query_all};
use crate::domain::model::{poll_partition_key, AnswerReport, OverviewReport, VoterReport};
use crate::domain::ports::{
    Item, ItemKey, KeyValueStore, PageRequest, PageToken, ReportRepository, WriteRequest,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;

pub(crate) fn overview_item(report: &OverviewReport) -> Result<Item> {
    Ok(Item::new(ItemKey::new(report.pk(), report.sk()))
        .with("poll_id", json!(report.poll_id()))
        .with("version", json!(report.version()))
        .with("question_count", json!(report.question_count()))
        .with("total_voters", json!(report.total_voters()))
        .with("last_vote_at", serde_json::to_value(report.last_vote_at())?))
}

pub(crate) fn answer_item(report: &AnswerReport) -> Item {
    Item::new(ItemKey::new(report.pk(), report.sk()))
        .with("poll_id", json!(report.poll_id()))
        .with("version", json!(report.version()))
        .with("position", json!(report.position()))
        .with("text", json!(report.text()))
        .with("counts", json!(report.counts()))
}

fn overview_from_item(item: &Item) -> Result<OverviewReport> {
    Ok(OverviewReport::from_parts(
        attr(item, "poll_id")?,
        attr(item, "version")?,
        attr(item, "question_count")?,
        attr(item, "total_voters")?,
        opt_attr::<DateTime<Utc>>(item, "last_vote_at")?,
    ))
}

fn answer_from_item(item: &Item) -> Result<AnswerReport> {
    Ok(AnswerReport::from_parts(
        attr(item, "poll_id")?,
        attr(item, "version")?,
        attr(item, "position")?,
        attr(item, "text")?,
        attr(item, "counts")?,
    ))
}

fn voter_item(report: &VoterReport) -> Result<Item> {
    Ok(Item::new(ItemKey::new(report.pk(), report.sk()))
        .with("poll_id", json!(report.poll_id()))
        .with("version", json!(report.version()))
        .with("voter_id", json!(report.voter_id()))
        .with("selections", json!(report.selections()))
        .with("voted_at", serde_json::to_value(report.voted_at())?))
}

fn voter_from_item(item: &Item) -> Result<VoterReport> {
    Ok(VoterReport::from_parts(
        attr(item, "poll_id")?,
        attr(item, "version")?,
        attr(item, "voter_id")?,
        attr(item, "selections")?,
        attr::<DateTime<Utc>>(item, "voted_at")?,
    ))
}

pub struct ReportItems<S: KeyValueStore> {
    store: S,
    page_size: usize,
    retry_limit: usize,
}

impl<S: KeyValueStore> ReportItems<S> {
    pub fn new(store: S, page_size: usize, retry_limit: usize) -> Self {
        Self {
            store,
            page_size,
            retry_limit,
        }
    }
}

#[async_trait]
impl<S: KeyValueStore> ReportRepository for ReportItems<S> {
    async fn find_overview(&self, poll_id: &str, version: u32) -> Result<Option<OverviewReport>> {
        let key = ItemKey::new(
            poll_partition_key(poll_id),
            OverviewReport::sort_key(version),
        );
        match self.store.get(&key).await? {
            Some(item) => Ok(Some(overview_from_item(&item)?)),
            None => Ok(None),
        }
    }

    async fn find_answers(&self, poll_id: &str, version: u32) -> Result<Vec<AnswerReport>> {
        let items = query_all(
            &self.store,
            &poll_partition_key(poll_id),
            &AnswerReport::sort_key_prefix(version),
            self.page_size,
        )
        .await?;
        items.iter().map(answer_from_item).collect()
    }

    async fn find_voter(
        &self,
        poll_id: &str,
        version: u32,
        voter_id: &str,
    ) -> Result<Option<VoterReport>> {
        let key = ItemKey::new(
            poll_partition_key(poll_id),
            VoterReport::sort_key(version, voter_id),
        );
        match self.store.get(&key).await? {
            Some(item) => Ok(Some(voter_from_item(&item)?)),
            None => Ok(None),
        }
    }

    async fn voters(
        &self,
        poll_id: &str,
        version: u32,
        page: PageRequest,
    ) -> Result<(Vec<VoterReport>, Option<PageToken>)> {
        let result = self
            .store
            .query(
                &poll_partition_key(poll_id),
                &VoterReport::sort_key_prefix(version),
                page,
            )
            .await?;
        let voters = result
            .items
            .iter()
            .map(voter_from_item)
            .collect::<Result<Vec<_>>>()?;
        Ok((voters, result.next))
    }

    async fn record_ballot(
        &self,
        voter: &VoterReport,
        overview: &OverviewReport,
        answers: &[AnswerReport],
    ) -> Result<()> {
        let mut writes = vec![
            WriteRequest::Put(voter_item(voter)?),
            WriteRequest::Put(overview_item(overview)?),
        ];
        for answer in answers {
            writes.push(WriteRequest::Put(answer_item(answer)));
        }
        write_all(&self.store, writes, self.retry_limit).await
    }
}
