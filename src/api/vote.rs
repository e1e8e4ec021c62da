use crate::api::response::{parse_payload, respond, ApiResponse};
use crate::core::VoteService;
use crate::domain::ports::{PollRepository, ReportRepository};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct CastBallotRequest {
    voter_id: String,
    selections: Vec<u32>,
}

pub struct VoteController<P: PollRepository, R: ReportRepository> {
    service: VoteService<P, R>,
}

impl<P: PollRepository, R: ReportRepository> VoteController<P, R> {
    pub fn new(service: VoteService<P, R>) -> Self {
        Self { service }
    }

    pub async fn cast(
        &self,
        poll_id: &str,
        version: u32,
        payload: serde_json::Value,
    ) -> ApiResponse {
        let result = async {
            let req: CastBallotRequest = parse_payload(payload)?;
            let voter = self
                .service
                .cast_ballot(poll_id, version, &req.voter_id, &req.selections)
                .await?;
            Ok(json!({
                "poll_id": voter.poll_id(),
                "version": voter.version(),
                "voter_id": voter.voter_id(),
                "selections": voter.selections(),
                "voted_at": voter.voted_at(),
            }))
        }
        .await;
        respond(result, 201)
    }
}
