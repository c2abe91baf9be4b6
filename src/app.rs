//! 终端答题程序
//!
//! 菜单 → 选科目 → 选模式 → 答题。输入输出可注入，便于测试。

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tracing::{debug, info};

use crate::config::Config;
use crate::infrastructure::{FileStore, ScoreBook};
use crate::models::question::Question;
use crate::models::subject::{GameMode, Subject};
use crate::models::visual::{icon_for, render_arithmetic};
use crate::services::{ClassicGenerator, OpenAiStoryBackend, StoryBackend, StoryService};
use crate::utils::logging::{log_game_start, log_startup, print_game_stats};
use crate::workflow::{AnswerFeedback, GameSession, QuestionFlow};

/// 启动时预选的科目和模式
#[derive(Debug, Clone, Copy, Default)]
pub struct StartOptions {
    pub subject: Option<Subject>,
    pub mode: Option<GameMode>,
}

/// 一局游戏结束的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameExit {
    Menu,
    Quit,
}

/// 应用主结构
pub struct App<B = OpenAiStoryBackend> {
    flow: QuestionFlow<B>,
    score_book: ScoreBook,
    rng: StdRng,
}

impl App<OpenAiStoryBackend> {
    /// 初始化应用
    pub fn initialize(config: Config, seed: Option<u64>) -> Self {
        let store = Arc::new(FileStore::new(&config.score_file));
        let score_book = ScoreBook::new(store);

        log_startup(&config, score_book.load());

        let (classic, rng) = match seed {
            Some(seed) => (ClassicGenerator::seeded(seed), StdRng::seed_from_u64(seed)),
            None => (ClassicGenerator::new(), StdRng::from_entropy()),
        };
        let flow = QuestionFlow::from_parts(classic, StoryService::new(&config));

        Self {
            flow,
            score_book,
            rng,
        }
    }

    /// 使用标准输入输出运行
    pub async fn run(&mut self, start: StartOptions) -> Result<()> {
        let input = BufReader::new(tokio::io::stdin());
        let output = tokio::io::stdout();
        self.run_with_io(start, input, output).await
    }
}

impl<B: StoryBackend> App<B> {
    pub fn from_parts(flow: QuestionFlow<B>, score_book: ScoreBook, rng: StdRng) -> Self {
        Self {
            flow,
            score_book,
            rng,
        }
    }

    /// 运行主循环，直到输入结束或用户退出
    pub async fn run_with_io<R, W>(&mut self, start: StartOptions, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut preset = start;

        loop {
            let subject = match preset.subject.take() {
                Some(subject) => subject,
                None => match choose_subject(&mut lines, &mut output).await? {
                    Some(subject) => subject,
                    None => break,
                },
            };
            let mode = match preset.mode.take() {
                Some(mode) => mode,
                None => match choose_mode(subject, &mut lines, &mut output).await? {
                    Some(mode) => mode,
                    None => break,
                },
            };

            let mut session = GameSession::new(subject, mode, self.score_book.clone());
            log_game_start(subject, mode);

            let exit = self.play(&mut session, &mut lines, &mut output).await?;
            print_game_stats(session.score(), session.best_streak(), session.total_score());

            if exit == GameExit::Quit {
                break;
            }
        }

        say(&mut output, "👋 Bye!").await?;
        Ok(())
    }

    /// 一局游戏：加载题目 → 答题 → 答对后加载下一题
    async fn play<R, W>(
        &mut self,
        session: &mut GameSession,
        lines: &mut Lines<R>,
        output: &mut W,
    ) -> Result<GameExit>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        loop {
            let ticket = session.begin_load();
            say(output, "✨ Thinking...").await?;
            let question = self
                .flow
                .get_question(session.subject(), session.mode())
                .await;
            if !session.finish_load(ticket, question) {
                continue;
            }

            loop {
                let question = match session.current() {
                    Some(q) => q,
                    None => break,
                };
                debug!("朗读: {}", question.spoken_text());
                let screen = render_question(question, session);
                say(output, &screen).await?;

                let line = match lines.next_line().await? {
                    Some(line) => line,
                    None => return Ok(GameExit::Quit),
                };
                let line = line.trim();
                match line.to_lowercase().as_str() {
                    "q" | "quit" => return Ok(GameExit::Quit),
                    "m" | "menu" => return Ok(GameExit::Menu),
                    "" => continue,
                    _ => {}
                }

                let feedback = match line.parse::<usize>() {
                    Ok(n) if n >= 1 => session.submit_option(n - 1),
                    _ => session.submit(line),
                };

                let message = feedback.message(&mut self.rng);
                match feedback {
                    AnswerFeedback::Correct { .. } => {
                        info!("✓ 答对 {}", session);
                        say(output, &format!("🎉 {}", message)).await?;
                    }
                    AnswerFeedback::Wrong => {
                        info!("✗ 答错 {}", session);
                        say(output, &format!("🙈 {}", message)).await?;
                    }
                    AnswerFeedback::NoQuestion => break,
                }
            }
        }
    }
}

/// 渲染一道题
fn render_question(question: &Question, session: &GameSession) -> String {
    let mut screen = String::new();
    screen.push_str(&format!(
        "\n{}  🏆 {}  🔥 {}\n",
        session.subject().display_name(),
        session.score(),
        session.streak()
    ));

    if let Some(story) = &question.narrative {
        screen.push_str(&format!("📖 {}\n", story));
    }

    let hint = question.visual_hint.as_deref();
    match &question.arithmetic {
        Some(arith) => screen.push_str(&format!("{}\n", render_arithmetic(arith, hint))),
        None if hint.is_some() => screen.push_str(&format!("{}\n", icon_for(hint))),
        None => {}
    }

    screen.push_str(&format!("❓ {}\n", question.prompt));
    for (i, opt) in question.options.iter().enumerate() {
        screen.push_str(&format!("  {}) {}\n", i + 1, opt));
    }
    screen.push_str("(type 1-3 or the answer, m = menu, q = quit)");
    screen
}

async fn choose_subject<R, W>(lines: &mut Lines<R>, output: &mut W) -> Result<Option<Subject>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut menu = String::from("\n🌈 Little Learners - pick a world:\n");
    for (i, subject) in Subject::ALL.iter().enumerate() {
        menu.push_str(&format!(
            "  {}) {} - {}\n",
            i + 1,
            subject.display_name(),
            subject.tagline()
        ));
    }
    menu.push_str("(q = quit)");

    loop {
        say(output, &menu).await?;
        let line = match lines.next_line().await? {
            Some(line) => line,
            None => return Ok(None),
        };
        if is_quit(&line) {
            return Ok(None);
        }
        if let Some(subject) = Subject::find(&line) {
            return Ok(Some(subject));
        }
    }
}

async fn choose_mode<R, W>(
    subject: Subject,
    lines: &mut Lines<R>,
    output: &mut W,
) -> Result<Option<GameMode>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let menu = format!(
        "\n{} - choose your adventure:\n  1) {} - Fast & Fun Questions\n  2) {} - Magical tales & learning\n(q = quit)",
        subject.display_name(),
        GameMode::Classic.display_name(),
        GameMode::Story.display_name()
    );

    loop {
        say(output, &menu).await?;
        let line = match lines.next_line().await? {
            Some(line) => line,
            None => return Ok(None),
        };
        if is_quit(&line) {
            return Ok(None);
        }
        if let Some(mode) = GameMode::from_str(&line) {
            return Ok(Some(mode));
        }
    }
}

fn is_quit(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "q" | "quit")
}

async fn say<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}
