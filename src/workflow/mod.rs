pub mod game_session;
pub mod question_flow;

pub use game_session::{AnswerFeedback, GameSession, LoadTicket};
pub use question_flow::{ContentSource, QuestionFlow};
