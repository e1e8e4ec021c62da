use anyhow::{bail, Context, Result};
use clap::Parser;
use quickpoll::utils::logger;
use quickpoll::{
    ApiResponse, AppConfig, CliConfig, InMemoryStore, PollController, PollItems, PollService,
    ReportController, ReportItems, ReportService, UserController, UserItems, UserService,
    VoteController, VoteService,
};
use serde_json::json;

fn expect(step: &str, response: &ApiResponse, status: u16) -> Result<()> {
    if response.status != status {
        bail!(
            "{}: expected status {}, got {} ({})",
            step,
            status,
            response.status,
            response.body
        );
    }
    tracing::debug!(step, status = response.status, body = %response.body, "step ok");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliConfig::parse();
    logger::init_cli_logger(cli.verbose);
    let config: AppConfig = cli.into();

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Starting quickpoll demo run");

    let store = InMemoryStore::new();
    let users = UserController::new(UserService::new(UserItems::new(store.clone())));
    let polls = PollController::new(PollService::new(
        PollItems::new(store.clone(), config.page_size, config.batch_retry_limit),
        UserItems::new(store.clone()),
    ));
    let votes = VoteController::new(VoteService::new(
        PollItems::new(store.clone(), config.page_size, config.batch_retry_limit),
        ReportItems::new(store.clone(), config.page_size, config.batch_retry_limit),
    ));
    let reports = ReportController::new(ReportService::new(
        ReportItems::new(store.clone(), config.page_size, config.batch_retry_limit),
        config.page_size,
    ));

    // user service
    let created = users
        .create(json!({ "name": "Ada", "email": "ada@example.com" }))
        .await;
    expect("create user", &created, 201)?;
    let owner_id = created.body["id"]
        .as_str()
        .context("user id missing from response")?
        .to_string();

    // poll service: draft, then release
    let draft = polls
        .create_draft(json!({
            "owner_id": owner_id,
            "title": "Team lunch",
            "questions": [
                { "text": "Soup or salad?", "answers": ["soup", "salad"] },
                { "text": "Dessert?", "answers": ["yes", "no", "maybe"] },
            ],
        }))
        .await;
    expect("create draft", &draft, 201)?;
    let poll_id = draft.body["poll_id"]
        .as_str()
        .context("poll id missing from response")?
        .to_string();

    let released = polls.release(&poll_id).await;
    expect("release poll", &released, 201)?;

    // vote service
    for (voter, selections) in [("alice", [0, 0]), ("bob", [1, 2]), ("carol", [0, 1])] {
        let ballot = votes
            .cast(
                &poll_id,
                1,
                json!({ "voter_id": voter, "selections": selections }),
            )
            .await;
        expect("cast ballot", &ballot, 201)?;
    }

    // a duplicate ballot must bounce
    let duplicate = votes
        .cast(&poll_id, 1, json!({ "voter_id": "alice", "selections": [1, 1] }))
        .await;
    expect("duplicate ballot rejected", &duplicate, 400)?;

    // report service
    let overview = reports.overview(&poll_id, 1).await;
    expect("overview report", &overview, 200)?;
    let answers = reports.answers(&poll_id, 1).await;
    expect("answer report", &answers, 200)?;
    let voters = reports.voters(&poll_id, 1, None).await;
    expect("voter report", &voters, 200)?;

    tracing::info!(
        total_voters = overview.body["total_voters"].as_u64().unwrap_or(0),
        "demo run completed"
    );
    println!("overview: {}", overview.body);
    println!("answers:  {}", answers.body);
    println!("voters:   {}", voters.body);

    Ok(())
}
