//! 游戏会话
//!
//! 持有当前题目、本局得分、连对次数和累计总分。
//! 每次加载题目都领一张递增的票据，只有最新票据对应的题目才会被装入，
//! 切换科目或模式后到达的旧响应直接丢弃。

use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt::Display;
use tracing::{debug, info, warn};

use crate::infrastructure::ScoreBook;
use crate::models::question::Question;
use crate::models::subject::{GameMode, Subject};

/// 答对时随机选用的鼓励语
pub const PRAISE: [&str; 4] = ["Great Job!", "Awesome!", "You did it!", "Super star!"];
/// 答错时的提示
pub const TRY_AGAIN: &str = "Try again!";

/// 题目加载票据
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// 提交答案后的反馈
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerFeedback {
    /// 答对，本轮结束，调用方应加载下一题
    Correct { score: u64, streak: u64, total: u64 },
    /// 答错，题目保持不变
    Wrong,
    /// 当前没有题目（加载中）
    NoQuestion,
}

impl AnswerFeedback {
    pub fn is_correct(&self) -> bool {
        matches!(self, AnswerFeedback::Correct { .. })
    }

    /// 反馈语（答对时随机挑一句鼓励）
    pub fn message<R: Rng + ?Sized>(&self, rng: &mut R) -> &'static str {
        match self {
            AnswerFeedback::Correct { .. } => PRAISE.choose(rng).copied().unwrap_or(PRAISE[0]),
            AnswerFeedback::Wrong => TRY_AGAIN,
            AnswerFeedback::NoQuestion => "",
        }
    }
}

/// 游戏会话
pub struct GameSession {
    subject: Subject,
    mode: GameMode,
    current: Option<Question>,
    score: u64,
    streak: u64,
    best_streak: u64,
    total_score: u64,
    latest_ticket: u64,
    score_book: ScoreBook,
}

impl GameSession {
    /// 创建会话，从存储中读取累计总分
    pub fn new(subject: Subject, mode: GameMode, score_book: ScoreBook) -> Self {
        let total_score = score_book.load();
        Self {
            subject,
            mode,
            current: None,
            score: 0,
            streak: 0,
            best_streak: 0,
            total_score,
            latest_ticket: 0,
            score_book,
        }
    }

    pub fn subject(&self) -> Subject {
        self.subject
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn current(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn streak(&self) -> u64 {
        self.streak
    }

    pub fn best_streak(&self) -> u64 {
        self.best_streak
    }

    pub fn total_score(&self) -> u64 {
        self.total_score
    }

    /// 切换科目/模式：作废未完成的加载，重置本局得分
    pub fn switch_to(&mut self, subject: Subject, mode: GameMode) {
        info!("切换到 {} / {}", subject, mode);
        self.subject = subject;
        self.mode = mode;
        self.score = 0;
        self.streak = 0;
        self.best_streak = 0;
        self.current = None;
        self.latest_ticket += 1;
    }

    /// 开始加载下一题
    pub fn begin_load(&mut self) -> LoadTicket {
        self.latest_ticket += 1;
        self.current = None;
        debug!("开始加载题目，票据 #{}", self.latest_ticket);
        LoadTicket(self.latest_ticket)
    }

    /// 装入加载结果；票据过期或科目不符时丢弃并返回 false
    pub fn finish_load(&mut self, ticket: LoadTicket, question: Question) -> bool {
        if ticket.0 != self.latest_ticket {
            debug!(
                "丢弃过期题目 (票据 #{}，最新 #{})",
                ticket.0, self.latest_ticket
            );
            return false;
        }
        if question.subject != self.subject {
            warn!(
                "⚠️ 丢弃科目不符的题目: 期望 {}，实际 {}",
                self.subject, question.subject
            );
            return false;
        }
        self.current = Some(question);
        true
    }

    /// 提交答案文本
    pub fn submit(&mut self, answer: &str) -> AnswerFeedback {
        let correct = match &self.current {
            Some(question) => question.is_correct(answer),
            None => return AnswerFeedback::NoQuestion,
        };

        if !correct {
            self.streak = 0;
            return AnswerFeedback::Wrong;
        }

        // 本轮结束，题目交还
        self.current = None;
        self.score += 1;
        self.streak += 1;
        self.best_streak = self.best_streak.max(self.streak);
        self.total_score += 1;

        if let Err(e) = self.score_book.save(self.total_score) {
            warn!("⚠️ 保存总分失败: {}", e);
        }

        AnswerFeedback::Correct {
            score: self.score,
            streak: self.streak,
            total: self.total_score,
        }
    }

    /// 按选项下标提交（0 开始）
    pub fn submit_option(&mut self, index: usize) -> AnswerFeedback {
        let option = match self.current.as_ref().and_then(|q| q.options.get(index)) {
            Some(option) => option.clone(),
            None if self.current.is_none() => return AnswerFeedback::NoQuestion,
            None => {
                self.streak = 0;
                return AnswerFeedback::Wrong;
            }
        };
        self.submit(&option)
    }
}

impl Display for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{} / {} 得分#{} 连对#{} 总分#{}]",
            self.subject, self.mode, self.score, self.streak, self.total_score
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{KeyValueStore, MemoryStore, TOTAL_SCORE_KEY};
    use crate::models::bank::ENGLISH_BANK;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn session_with_store() -> (GameSession, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        store.set(TOTAL_SCORE_KEY, "10").unwrap();
        let session = GameSession::new(
            Subject::English,
            GameMode::Classic,
            ScoreBook::new(store.clone()),
        );
        (session, store)
    }

    fn dog_question() -> Question {
        ENGLISH_BANK[2].to_question(Subject::English)
    }

    #[test]
    fn test_correct_answer_scores_and_persists() {
        let (mut session, store) = session_with_store();
        assert_eq!(session.total_score(), 10);

        let ticket = session.begin_load();
        assert!(session.finish_load(ticket, dog_question()));

        let feedback = session.submit("dog");
        assert_eq!(
            feedback,
            AnswerFeedback::Correct {
                score: 1,
                streak: 1,
                total: 11
            }
        );
        assert!(session.current().is_none());
        assert_eq!(store.get(TOTAL_SCORE_KEY).unwrap().as_deref(), Some("11"));

        // 题目已结束，重复提交不再计分
        assert_eq!(session.submit("dog"), AnswerFeedback::NoQuestion);
    }

    #[test]
    fn test_wrong_answer_keeps_question_and_resets_streak() {
        let (mut session, _store) = session_with_store();

        let ticket = session.begin_load();
        session.finish_load(ticket, dog_question());
        assert!(session.submit("Dog").is_correct());

        let ticket = session.begin_load();
        let question = dog_question();
        let id = question.id;
        session.finish_load(ticket, question);

        assert_eq!(session.submit("Car"), AnswerFeedback::Wrong);
        assert_eq!(session.streak(), 0);
        assert_eq!(session.best_streak(), 1);
        assert_eq!(session.current().map(|q| q.id), Some(id));
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn test_submit_option_by_index() {
        let (mut session, _store) = session_with_store();
        let ticket = session.begin_load();
        session.finish_load(ticket, dog_question());

        assert_eq!(session.submit_option(9), AnswerFeedback::Wrong);
        assert_eq!(session.submit_option(1), AnswerFeedback::Wrong);
        assert!(session.submit_option(0).is_correct());
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let (mut session, _store) = session_with_store();

        let stale = session.begin_load();
        session.switch_to(Subject::Science, GameMode::Story);
        let fresh = session.begin_load();

        assert!(!session.finish_load(stale, dog_question()));
        assert!(session.current().is_none());

        // 科目不符也丢弃
        assert!(!session.finish_load(fresh, dog_question()));

        let science = crate::models::bank::SCIENCE_BANK[0].to_question(Subject::Science);
        assert!(session.finish_load(fresh, science));
        assert!(session.current().is_some());
    }

    #[test]
    fn test_feedback_messages() {
        let mut rng = StdRng::seed_from_u64(1);
        let correct = AnswerFeedback::Correct {
            score: 1,
            streak: 1,
            total: 1,
        };
        assert!(PRAISE.contains(&correct.message(&mut rng)));
        assert_eq!(AnswerFeedback::Wrong.message(&mut rng), TRY_AGAIN);
    }
}
