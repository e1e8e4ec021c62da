// Controllers: payload in, status + JSON body out. The HTTP framework and
// router live outside this crate.

pub mod poll;
pub mod report;
pub mod response;
pub mod user;
pub mod vote;

pub use poll::PollController;
pub use report::ReportController;
pub use response::ApiResponse;
pub use user::UserController;
pub use vote::VoteController;
