pub mod poll;
pub mod report;
pub mod user;
pub mod vote;

pub use poll::{PollService, QuestionSpec};
pub use report::ReportService;
pub use user::UserService;
pub use vote::VoteService;
