use crate::adapters::batch::write_all;
use crate::adapters::repository::report::{answer_item, overview_item};
use crate::adapters::repository::{attr, query_all};
use crate::domain::model::{
    poll_partition_key, user_partition_key, AnswerReport, Draft, DraftSummary, OverviewReport,
    Poll, Question, ReleasedPoll, Version,
};
use crate::domain::ports::{Item, ItemKey, KeyValueStore, PollRepository, WriteRequest};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Question shape embedded in a release snapshot item.
#[derive(Debug, Serialize, Deserialize)]
struct QuestionAttr {
    position: u32,
    text: String,
    answers: Vec<String>,
}

pub struct PollItems<S: KeyValueStore> {
    store: S,
    page_size: usize,
    retry_limit: usize,
}

impl<S: KeyValueStore> PollItems<S> {
    pub fn new(store: S, page_size: usize, retry_limit: usize) -> Self {
        Self {
            store,
            page_size,
            retry_limit,
        }
    }

    fn metadata_item(poll: &Poll) -> Result<Item> {
        Ok(Item::new(ItemKey::new(poll.pk(), Poll::sk()))
            .with("id", json!(poll.id()))
            .with("owner_id", json!(poll.owner_id()))
            .with("title", json!(poll.title()))
            .with("created_at", serde_json::to_value(poll.created_at())?))
    }

    fn poll_from_item(item: &Item) -> Result<Poll> {
        Ok(Poll::from_parts(
            attr(item, "id")?,
            attr(item, "owner_id")?,
            attr(item, "title")?,
            attr::<DateTime<Utc>>(item, "created_at")?,
        ))
    }

    fn question_item(question: &Question) -> Item {
        Item::new(ItemKey::new(question.pk(), question.sk()))
            .with("poll_id", json!(question.poll_id()))
            .with("position", json!(question.position()))
            .with("text", json!(question.text()))
            .with("answers", json!(question.answers()))
    }

    fn question_from_item(item: &Item) -> Result<Question> {
        Ok(Question::from_parts(
            attr(item, "poll_id")?,
            attr(item, "position")?,
            attr(item, "text")?,
            attr(item, "answers")?,
        ))
    }

    fn pointer_item(draft: &Draft) -> Item {
        Item::new(ItemKey::new(draft.pointer_pk(), draft.pointer_sk()))
            .with("poll_id", json!(draft.poll().id()))
            .with("title", json!(draft.poll().title()))
    }

    fn version_item(marker: &Version) -> Result<Item> {
        Ok(Item::new(ItemKey::new(marker.pk(), marker.sk()))
            .with("poll_id", json!(marker.poll_id()))
            .with("version", json!(marker.number()))
            .with("created_at", serde_json::to_value(marker.created_at())?))
    }

    fn release_item(release: &ReleasedPoll) -> Result<Item> {
        let questions: Vec<QuestionAttr> = release
            .questions()
            .iter()
            .map(|q| QuestionAttr {
                position: q.position(),
                text: q.text().to_string(),
                answers: q.answers().to_vec(),
            })
            .collect();
        Ok(Item::new(ItemKey::new(release.pk(), release.sk()))
            .with("poll_id", json!(release.poll_id()))
            .with("version", json!(release.version()))
            .with("title", json!(release.title()))
            .with("questions", serde_json::to_value(questions)?)
            .with("released_at", serde_json::to_value(release.released_at())?)
            .with("open", json!(release.is_open())))
    }

    fn release_from_item(item: &Item) -> Result<ReleasedPoll> {
        let poll_id: String = attr(item, "poll_id")?;
        let questions = attr::<Vec<QuestionAttr>>(item, "questions")?
            .into_iter()
            .map(|q| Question::from_parts(poll_id.clone(), q.position, q.text, q.answers))
            .collect();
        Ok(ReleasedPoll::from_parts(
            poll_id,
            attr(item, "version")?,
            attr(item, "title")?,
            questions,
            attr::<DateTime<Utc>>(item, "released_at")?,
            attr(item, "open")?,
        ))
    }

    fn draft_writes(draft: &Draft) -> Result<Vec<WriteRequest>> {
        let mut writes = vec![WriteRequest::Put(Self::metadata_item(draft.poll())?)];
        for question in draft.questions() {
            writes.push(WriteRequest::Put(Self::question_item(question)));
        }
        writes.push(WriteRequest::Put(Self::pointer_item(draft)));
        Ok(writes)
    }
}

#[async_trait]
impl<S: KeyValueStore> PollRepository for PollItems<S> {
    async fn save_draft(&self, draft: &Draft) -> Result<()> {
        write_all(&self.store, Self::draft_writes(draft)?, self.retry_limit).await
    }

    async fn replace_draft(&self, draft: &Draft, stale_positions: &[u32]) -> Result<()> {
        let mut writes = Self::draft_writes(draft)?;
        for position in stale_positions {
            writes.push(WriteRequest::Delete(ItemKey::new(
                poll_partition_key(draft.poll().id()),
                Question::sort_key(*position),
            )));
        }
        write_all(&self.store, writes, self.retry_limit).await
    }

    async fn find_draft(&self, poll_id: &str) -> Result<Option<Draft>> {
        let pk = poll_partition_key(poll_id);
        let metadata = match self.store.get(&ItemKey::new(pk.clone(), Poll::sk())).await? {
            Some(item) => item,
            None => return Ok(None),
        };
        let poll = Self::poll_from_item(&metadata)?;
        let questions = query_all(
            &self.store,
            &pk,
            Question::sort_key_prefix(),
            self.page_size,
        )
        .await?
        .iter()
        .map(Self::question_from_item)
        .collect::<Result<Vec<_>>>()?;
        Ok(Some(Draft::new(poll, questions)))
    }

    async fn drafts_for_owner(&self, owner_id: &str) -> Result<Vec<DraftSummary>> {
        let items = query_all(
            &self.store,
            &user_partition_key(owner_id),
            Draft::pointer_sort_key_prefix(),
            self.page_size,
        )
        .await?;
        items
            .iter()
            .map(|item| {
                Ok(DraftSummary {
                    poll_id: attr(item, "poll_id")?,
                    title: attr(item, "title")?,
                })
            })
            .collect()
    }

    async fn latest_version(&self, poll_id: &str) -> Result<u32> {
        // Zero-padded sort keys keep releases in numeric order, so the last
        // item of the range is the newest.
        let items = query_all(
            &self.store,
            &poll_partition_key(poll_id),
            ReleasedPoll::sort_key_prefix(),
            self.page_size,
        )
        .await?;
        match items.last() {
            Some(item) => attr(item, "version"),
            None => Ok(0),
        }
    }

    async fn save_release(
        &self,
        release: &ReleasedPoll,
        marker: &Version,
        overview: &OverviewReport,
        answers: &[AnswerReport],
    ) -> Result<()> {
        let mut writes = vec![
            WriteRequest::Put(Self::release_item(release)?),
            WriteRequest::Put(Self::version_item(marker)?),
            WriteRequest::Put(overview_item(overview)?),
        ];
        for answer in answers {
            writes.push(WriteRequest::Put(answer_item(answer)));
        }
        write_all(&self.store, writes, self.retry_limit).await
    }

    async fn find_release(&self, poll_id: &str, version: u32) -> Result<Option<ReleasedPoll>> {
        let key = ItemKey::new(
            poll_partition_key(poll_id),
            ReleasedPoll::sort_key(version),
        );
        match self.store.get(&key).await? {
            Some(item) => Ok(Some(Self::release_from_item(&item)?)),
            None => Ok(None),
        }
    }

    async fn update_release(&self, release: &ReleasedPoll) -> Result<()> {
        self.store.put(Self::release_item(release)?).await
    }
}
