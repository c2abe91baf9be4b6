use anyhow::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use little_learners::infrastructure::TOTAL_SCORE_KEY;
use little_learners::models::bank::ENGLISH_BANK;
use little_learners::services::{MathFact, StoryBackend, StoryRequest};
use little_learners::{
    App, ClassicGenerator, ContentSource, FileStore, GameMode, GameSession, KeyValueStore,
    QuestionFlow, ScoreBook, StartOptions, StoryService, Subject,
};

const FISH_STORY: &str = r#"```json
{"prompt":"How many fish are there now?","narrative":"Mia has 2 fish. Her friend gives her 1 more.","answer":3,"options":[3,2,4],"visualHint":"fish","arithmetic":{"num1":2,"num2":1,"operator":"+"}}
```"#;

/// 返回固定内容并记录调用次数
struct ScriptedBackend {
    reply: &'static str,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl StoryBackend for ScriptedBackend {
    async fn complete(&self, _request: &StoryRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.to_string())
    }
}

fn scripted_flow(
    reply: &'static str,
    has_credentials: bool,
) -> (QuestionFlow<ScriptedBackend>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let backend = ScriptedBackend {
        reply,
        calls: calls.clone(),
    };
    let flow = QuestionFlow::from_parts(
        ClassicGenerator::seeded(7),
        StoryService::with_backend(backend, has_credentials, Duration::from_secs(2)),
    );
    (flow, calls)
}

#[test]
fn test_forced_math_draw() {
    let mut generator = ClassicGenerator::seeded(1);
    let question = generator.generate_math_from(MathFact::from_draw(true, 3, 4));

    assert_eq!(question.subject, Subject::Math);
    assert_eq!(question.prompt, "What is 3 + 4?");
    assert_eq!(question.answer, "7");
    assert_eq!(question.options.len(), 3);
    assert!(question.options.contains(&"7".to_string()));
    assert_eq!(question.validate(), Ok(()));
}

#[test]
fn test_english_classic_comes_from_bank() {
    let mut generator = ClassicGenerator::seeded(99);
    let first = generator.generate(Subject::English);
    let second = generator.generate(Subject::English);

    for q in [&first, &second] {
        let entry = ENGLISH_BANK
            .iter()
            .find(|e| e.prompt == q.prompt)
            .expect("题目应来自英语题库");
        assert_eq!(q.answer, entry.answer);
        assert_eq!(q.options, entry.options.to_vec());
        assert!(q.narrative.is_none());
    }
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn test_story_without_key_skips_backend() {
    let (mut flow, calls) = scripted_flow(FISH_STORY, false);
    let (question, source) = flow
        .get_question_with_source(Subject::Math, GameMode::Story)
        .await;

    assert_eq!(source, ContentSource::Fallback("unavailable"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(question.arithmetic.is_some());
    assert_eq!(question.validate(), Ok(()));
}

#[tokio::test]
async fn test_story_with_bad_answer_falls_back() {
    let reply = r#"{"prompt":"Which one?","narrative":"A tale.","answer":"Moon","options":["Sun","Star","Cloud"],"visualHint":"sun"}"#;
    let (mut flow, calls) = scripted_flow(reply, true);
    let (question, source) = flow
        .get_question_with_source(Subject::Science, GameMode::Story)
        .await;

    assert_eq!(source, ContentSource::Fallback("malformed"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(question.subject, Subject::Science);
    assert!(question.narrative.is_none());
}

#[test]
fn test_session_persists_total_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("score.json");

    let store = Arc::new(FileStore::new(&path));
    store.set(TOTAL_SCORE_KEY, "41").unwrap();

    let mut session = GameSession::new(
        Subject::English,
        GameMode::Classic,
        ScoreBook::new(store),
    );
    let ticket = session.begin_load();
    assert!(session.finish_load(ticket, ENGLISH_BANK[0].to_question(Subject::English)));

    assert!(!session.submit("d").is_correct());
    assert!(session.submit("b").is_correct());

    // 重新打开文件，总分应已写入
    let reopened = ScoreBook::new(Arc::new(FileStore::new(&path)));
    assert_eq!(reopened.load(), 42);
}

#[test]
fn test_missing_score_file_starts_at_zero() {
    let dir = tempfile::tempdir().unwrap();
    let book = ScoreBook::new(Arc::new(FileStore::new(dir.path().join("none.json"))));
    assert_eq!(book.load(), 0);
}

#[test]
fn test_story_round_through_app() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("score.json");
    let (flow, calls) = scripted_flow(FISH_STORY, true);
    let score_book = ScoreBook::new(Arc::new(FileStore::new(&path)));
    let mut app = App::from_parts(flow, score_book, StdRng::seed_from_u64(3));

    let input: &[u8] = b"4\n1\nq\n";
    let mut output: Vec<u8> = Vec::new();
    let start = StartOptions {
        subject: Some(Subject::Math),
        mode: Some(GameMode::Story),
    };

    tokio_test::block_on(app.run_with_io(start, input, &mut output)).unwrap();

    let screen = String::from_utf8(output).unwrap();
    assert!(screen.contains("📖 Mia has 2 fish."));
    assert!(screen.contains("🐟🐟 + 🐟"));
    assert!(screen.contains("Try again!"));
    assert!(screen.contains("👋 Bye!"));
    // 答对一次后加载下一题，第二次 q 退出
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let reopened = ScoreBook::new(Arc::new(FileStore::new(&path)));
    assert_eq!(reopened.load(), 1);
}

#[tokio::test]
async fn test_menu_navigation() {
    let store = Arc::new(little_learners::MemoryStore::new());
    let (flow, calls) = scripted_flow(FISH_STORY, true);
    let mut app = App::from_parts(flow, ScoreBook::new(store), StdRng::seed_from_u64(5));

    // 选英语 → 选 Classic → 回菜单 → 退出
    let input: &[u8] = b"2\n1\nm\nq\n";
    let mut output: Vec<u8> = Vec::new();
    app.run_with_io(StartOptions::default(), input, &mut output)
        .await
        .unwrap();

    let screen = String::from_utf8(output).unwrap();
    assert!(screen.contains("English Fun"));
    assert!(ENGLISH_BANK.iter().any(|e| screen.contains(e.prompt)));
    assert_eq!(screen.matches("pick a world").count(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
