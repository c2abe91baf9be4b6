pub mod bank;
pub mod question;
pub mod subject;
pub mod visual;

pub use bank::{bank, BankEntry};
pub use question::{Arithmetic, Operator, Question, QuestionId, MAX_OPERAND, OPTION_COUNT};
pub use subject::{GameMode, Subject};
