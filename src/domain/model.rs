//! Domain entities: constructor-validated value objects with getters, simple
//! mutators and the key-space formatting for the single-table layout.
//!
//! Key hierarchy (pk / sk):
//!   USER#{id}    / PROFILE
//!   USER#{id}    / DRAFT#{poll_id}
//!   POLL#{id}    / METADATA
//!   POLL#{id}    / QUESTION#{position}
//!   POLL#{id}    / VERSION#{version}
//!   POLL#{id}    / RELEASE#{version}
//!   POLL#{id}    / REPORT#{version}#OVERVIEW
//!   POLL#{id}    / REPORT#{version}#ANSWER#{position}
//!   POLL#{id}    / REPORT#{version}#VOTER#{voter_id}
//!
//! Numeric sort-key components are zero-padded so lexicographic order matches
//! numeric order.

use crate::utils::error::Result;
use crate::utils::validation::{validate_email, validate_min_len, validate_non_empty_string};
use chrono::{DateTime, Utc};
use uuid::Uuid;

fn pad(n: u32) -> String {
    format!("{:04}", n)
}

pub fn user_partition_key(user_id: &str) -> String {
    format!("USER#{}", user_id)
}

pub fn poll_partition_key(poll_id: &str) -> String {
    format!("POLL#{}", poll_id)
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: String,
    name: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: &str, email: &str) -> Result<Self> {
        validate_non_empty_string("name", name)?;
        validate_email("email", email)?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            created_at: Utc::now(),
        })
    }

    /// Rehydrate from stored attributes. Validation happened on the way in.
    pub fn from_parts(
        id: String,
        name: String,
        email: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn pk(&self) -> String {
        user_partition_key(&self.id)
    }

    pub fn sk() -> String {
        "PROFILE".to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Poll {
    id: String,
    owner_id: String,
    title: String,
    created_at: DateTime<Utc>,
}

impl Poll {
    pub fn new(owner_id: &str, title: &str) -> Result<Self> {
        validate_non_empty_string("owner_id", owner_id)?;
        validate_non_empty_string("title", title)?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            title: title.trim().to_string(),
            created_at: Utc::now(),
        })
    }

    pub fn from_parts(
        id: String,
        owner_id: String,
        title: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner_id,
            title,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        validate_non_empty_string("title", title)?;
        self.title = title.trim().to_string();
        Ok(())
    }

    pub fn pk(&self) -> String {
        poll_partition_key(&self.id)
    }

    pub fn sk() -> String {
        "METADATA".to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    poll_id: String,
    position: u32,
    text: String,
    answers: Vec<String>,
}

impl Question {
    pub fn new(poll_id: &str, position: u32, text: &str, answers: Vec<String>) -> Result<Self> {
        validate_non_empty_string("text", text)?;
        validate_min_len("answers", &answers, 2)?;
        for answer in &answers {
            validate_non_empty_string("answers", answer)?;
        }
        Ok(Self {
            poll_id: poll_id.to_string(),
            position,
            text: text.trim().to_string(),
            answers,
        })
    }

    pub fn from_parts(poll_id: String, position: u32, text: String, answers: Vec<String>) -> Self {
        Self {
            poll_id,
            position,
            text,
            answers,
        }
    }

    pub fn poll_id(&self) -> &str {
        &self.poll_id
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn pk(&self) -> String {
        poll_partition_key(&self.poll_id)
    }

    pub fn sk(&self) -> String {
        Self::sort_key(self.position)
    }

    pub fn sort_key(position: u32) -> String {
        format!("QUESTION#{}", pad(position))
    }

    pub fn sort_key_prefix() -> &'static str {
        "QUESTION#"
    }
}

/// Editable poll aggregate: metadata plus the current question set.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    poll: Poll,
    questions: Vec<Question>,
}

impl Draft {
    pub fn new(poll: Poll, questions: Vec<Question>) -> Self {
        Self { poll, questions }
    }

    pub fn poll(&self) -> &Poll {
        &self.poll
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn rename(&mut self, title: &str) -> Result<()> {
        self.poll.set_title(title)
    }

    pub fn replace_questions(&mut self, questions: Vec<Question>) {
        self.questions = questions;
    }

    /// Pointer item under the owner's partition, so drafts can be listed
    /// without knowing their poll ids.
    pub fn pointer_pk(&self) -> String {
        user_partition_key(self.poll.owner_id())
    }

    pub fn pointer_sk(&self) -> String {
        Self::pointer_sort_key(self.poll.id())
    }

    pub fn pointer_sort_key(poll_id: &str) -> String {
        format!("DRAFT#{}", poll_id)
    }

    pub fn pointer_sort_key_prefix() -> &'static str {
        "DRAFT#"
    }
}

/// Listing projection of a draft pointer item.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftSummary {
    pub poll_id: String,
    pub title: String,
}

/// Release audit marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Version {
    poll_id: String,
    number: u32,
    created_at: DateTime<Utc>,
}

impl Version {
    pub fn new(poll_id: &str, number: u32) -> Self {
        Self {
            poll_id: poll_id.to_string(),
            number,
            created_at: Utc::now(),
        }
    }

    pub fn from_parts(poll_id: String, number: u32, created_at: DateTime<Utc>) -> Self {
        Self {
            poll_id,
            number,
            created_at,
        }
    }

    pub fn poll_id(&self) -> &str {
        &self.poll_id
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn pk(&self) -> String {
        poll_partition_key(&self.poll_id)
    }

    pub fn sk(&self) -> String {
        Self::sort_key(self.number)
    }

    pub fn sort_key(number: u32) -> String {
        format!("VERSION#{}", pad(number))
    }
}

/// Immutable snapshot voters vote against.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleasedPoll {
    poll_id: String,
    version: u32,
    title: String,
    questions: Vec<Question>,
    released_at: DateTime<Utc>,
    open: bool,
}

impl ReleasedPoll {
    pub fn new(draft: &Draft, version: u32) -> Self {
        Self {
            poll_id: draft.poll().id().to_string(),
            version,
            title: draft.poll().title().to_string(),
            questions: draft.questions().to_vec(),
            released_at: Utc::now(),
            open: true,
        }
    }

    pub fn from_parts(
        poll_id: String,
        version: u32,
        title: String,
        questions: Vec<Question>,
        released_at: DateTime<Utc>,
        open: bool,
    ) -> Self {
        Self {
            poll_id,
            version,
            title,
            questions,
            released_at,
            open,
        }
    }

    pub fn poll_id(&self) -> &str {
        &self.poll_id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn released_at(&self) -> DateTime<Utc> {
        self.released_at
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn pk(&self) -> String {
        poll_partition_key(&self.poll_id)
    }

    pub fn sk(&self) -> String {
        Self::sort_key(self.version)
    }

    pub fn sort_key(version: u32) -> String {
        format!("RELEASE#{}", pad(version))
    }

    pub fn sort_key_prefix() -> &'static str {
        "RELEASE#"
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverviewReport {
    poll_id: String,
    version: u32,
    question_count: u32,
    total_voters: u64,
    last_vote_at: Option<DateTime<Utc>>,
}

impl OverviewReport {
    pub fn new(poll_id: &str, version: u32, question_count: u32) -> Self {
        Self {
            poll_id: poll_id.to_string(),
            version,
            question_count,
            total_voters: 0,
            last_vote_at: None,
        }
    }

    pub fn from_parts(
        poll_id: String,
        version: u32,
        question_count: u32,
        total_voters: u64,
        last_vote_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            poll_id,
            version,
            question_count,
            total_voters,
            last_vote_at,
        }
    }

    pub fn poll_id(&self) -> &str {
        &self.poll_id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    pub fn total_voters(&self) -> u64 {
        self.total_voters
    }

    pub fn last_vote_at(&self) -> Option<DateTime<Utc>> {
        self.last_vote_at
    }

    pub fn record_voter(&mut self, at: DateTime<Utc>) {
        self.total_voters += 1;
        self.last_vote_at = Some(at);
    }

    pub fn pk(&self) -> String {
        poll_partition_key(&self.poll_id)
    }

    pub fn sk(&self) -> String {
        Self::sort_key(self.version)
    }

    pub fn sort_key(version: u32) -> String {
        format!("REPORT#{}#OVERVIEW", pad(version))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnswerReport {
    poll_id: String,
    version: u32,
    position: u32,
    text: String,
    counts: Vec<u64>,
}

impl AnswerReport {
    pub fn new(question: &Question, version: u32) -> Self {
        Self {
            poll_id: question.poll_id().to_string(),
            version,
            position: question.position(),
            text: question.text().to_string(),
            counts: vec![0; question.answers().len()],
        }
    }

    pub fn from_parts(
        poll_id: String,
        version: u32,
        position: u32,
        text: String,
        counts: Vec<u64>,
    ) -> Self {
        Self {
            poll_id,
            version,
            position,
            text,
            counts,
        }
    }

    pub fn poll_id(&self) -> &str {
        &self.poll_id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn record_selection(&mut self, answer_index: u32) {
        if let Some(count) = self.counts.get_mut(answer_index as usize) {
            *count += 1;
        }
    }

    pub fn pk(&self) -> String {
        poll_partition_key(&self.poll_id)
    }

    pub fn sk(&self) -> String {
        Self::sort_key(self.version, self.position)
    }

    pub fn sort_key(version: u32, position: u32) -> String {
        format!("REPORT#{}#ANSWER#{}", pad(version), pad(position))
    }

    pub fn sort_key_prefix(version: u32) -> String {
        format!("REPORT#{}#ANSWER#", pad(version))
    }
}

/// One voter's recorded ballot for a release.
#[derive(Debug, Clone, PartialEq)]
pub struct VoterReport {
    poll_id: String,
    version: u32,
    voter_id: String,
    selections: Vec<u32>,
    voted_at: DateTime<Utc>,
}

impl VoterReport {
    pub fn new(poll_id: &str, version: u32, voter_id: &str, selections: Vec<u32>) -> Result<Self> {
        validate_non_empty_string("voter_id", voter_id)?;
        validate_min_len("selections", &selections, 1)?;
        Ok(Self {
            poll_id: poll_id.to_string(),
            version,
            voter_id: voter_id.to_string(),
            selections,
            voted_at: Utc::now(),
        })
    }

    pub fn from_parts(
        poll_id: String,
        version: u32,
        voter_id: String,
        selections: Vec<u32>,
        voted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            poll_id,
            version,
            voter_id,
            selections,
            voted_at,
        }
    }

    pub fn poll_id(&self) -> &str {
        &self.poll_id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn voter_id(&self) -> &str {
        &self.voter_id
    }

    pub fn selections(&self) -> &[u32] {
        &self.selections
    }

    pub fn voted_at(&self) -> DateTime<Utc> {
        self.voted_at
    }

    pub fn pk(&self) -> String {
        poll_partition_key(&self.poll_id)
    }

    pub fn sk(&self) -> String {
        Self::sort_key(self.version, &self.voter_id)
    }

    pub fn sort_key(version: u32, voter_id: &str) -> String {
        format!("REPORT#{}#VOTER#{}", pad(version), voter_id)
    }

    pub fn sort_key_prefix(version: u32) -> String {
        format!("REPORT#{}#VOTER#", pad(version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_validation() {
        assert!(User::new("Ada", "ada@example.com").is_ok());
        assert!(User::new("", "ada@example.com").is_err());
        assert!(User::new("Ada", "nope").is_err());
    }

    #[test]
    fn test_question_requires_two_answers() {
        assert!(Question::new("p1", 0, "Soup or salad?", vec!["soup".into()]).is_err());
        assert!(Question::new(
            "p1",
            0,
            "Soup or salad?",
            vec!["soup".into(), "salad".into()]
        )
        .is_ok());
        assert!(Question::new("p1", 0, "", vec!["a".into(), "b".into()]).is_err());
    }

    #[test]
    fn test_sort_keys_are_zero_padded() {
        assert_eq!(Question::sort_key(7), "QUESTION#0007");
        assert_eq!(ReleasedPoll::sort_key(12), "RELEASE#0012");
        assert_eq!(AnswerReport::sort_key(1, 3), "REPORT#0001#ANSWER#0003");
        assert_eq!(VoterReport::sort_key(2, "v-9"), "REPORT#0002#VOTER#v-9");
        // lexicographic order must match numeric order
        assert!(Question::sort_key(9) < Question::sort_key(10));
    }

    #[test]
    fn test_answer_report_counts() {
        let question = Question::new(
            "p1",
            0,
            "Soup or salad?",
            vec!["soup".into(), "salad".into()],
        )
        .unwrap();
        let mut report = AnswerReport::new(&question, 1);
        assert_eq!(report.counts(), &[0, 0]);
        report.record_selection(1);
        report.record_selection(1);
        report.record_selection(0);
        assert_eq!(report.counts(), &[1, 2]);
        // out-of-range index is ignored; the use-case validates bounds first
        report.record_selection(9);
        assert_eq!(report.counts(), &[1, 2]);
    }

    #[test]
    fn test_overview_report_records_voters() {
        let mut report = OverviewReport::new("p1", 1, 2);
        assert_eq!(report.total_voters(), 0);
        assert!(report.last_vote_at().is_none());
        let at = Utc::now();
        report.record_voter(at);
        assert_eq!(report.total_voters(), 1);
        assert_eq!(report.last_vote_at(), Some(at));
    }

    #[test]
    fn test_released_poll_close() {
        let poll = Poll::new("owner-1", "Lunch").unwrap();
        let question = Question::new(poll.id(), 0, "Soup?", vec!["yes".into(), "no".into()])
            .unwrap();
        let draft = Draft::new(poll, vec![question]);
        let mut release = ReleasedPoll::new(&draft, 1);
        assert!(release.is_open());
        release.close();
        assert!(!release.is_open());
    }
}
