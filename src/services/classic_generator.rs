//! 程序出题服务 - 业务能力层
//!
//! 不依赖网络，任何科目都能立即出一道合法的题，是 Story 模式的兜底。

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::models::bank::bank;
use crate::models::question::{Arithmetic, Operator, Question, QuestionId, OPTION_COUNT};
use crate::models::subject::Subject;

/// 加法出现的概率
pub const ADDITION_PROBABILITY: f64 = 0.7;
/// 干扰项的取值上限（含）
pub const MAX_OPTION_VALUE: i64 = 20;
/// 随机抽取干扰项的最大次数，超过后改用顺序补齐
const MAX_DISTRACTOR_DRAWS: usize = 64;
/// 干扰项相对答案的最大偏移
const DISTRACTOR_SPREAD: i64 = 2;

/// 数学题可用的视觉提示
pub const MATH_VISUALS: [&str; 5] = ["apple", "fish", "star", "cookie", "rocket"];

/// 一道算术事实：操作数已按运算符整理好
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MathFact {
    pub num1: i64,
    pub num2: i64,
    pub operator: Operator,
    pub answer: i64,
}

impl MathFact {
    /// 由一次抽样构造；减法时大数在前，结果不为负
    pub fn from_draw(is_addition: bool, num1: i64, num2: i64) -> Self {
        if is_addition {
            Self {
                num1,
                num2,
                operator: Operator::Plus,
                answer: num1 + num2,
            }
        } else {
            let (big, small) = (num1.max(num2), num1.min(num2));
            Self {
                num1: big,
                num2: small,
                operator: Operator::Minus,
                answer: big - small,
            }
        }
    }

    pub fn prompt(&self) -> String {
        format!("What is {} {} {}?", self.num1, self.operator, self.num2)
    }

    pub fn arithmetic(&self) -> Arithmetic {
        Arithmetic {
            num1: self.num1,
            num2: self.num2,
            operator: self.operator,
        }
    }
}

/// 程序出题器
///
/// 随机源可注入，便于复现。
pub struct ClassicGenerator<R = StdRng> {
    rng: R,
}

impl ClassicGenerator<StdRng> {
    /// 使用系统熵初始化
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// 使用固定种子初始化
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for ClassicGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> ClassicGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// 为指定科目出一道题
    pub fn generate(&mut self, subject: Subject) -> Question {
        match subject {
            Subject::Math => self.generate_math(),
            Subject::English | Subject::Science => self.pick_from_bank(subject),
        }
    }

    /// 抽一道算术事实：70% 加法，num1 ∈ [1,6]，num2 ∈ [1,5]
    pub fn draw_math_fact(&mut self) -> MathFact {
        let is_addition = self.rng.gen_bool(ADDITION_PROBABILITY);
        let num1 = self.rng.gen_range(1..=6);
        let num2 = self.rng.gen_range(1..=5);
        MathFact::from_draw(is_addition, num1, num2)
    }

    pub fn generate_math(&mut self) -> Question {
        let fact = self.draw_math_fact();
        self.generate_math_from(fact)
    }

    /// 用给定的算术事实出题（干扰项、顺序和视觉提示仍然随机）
    pub fn generate_math_from(&mut self, fact: MathFact) -> Question {
        let options = self.build_options(fact.answer);
        let visual = MATH_VISUALS
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(MATH_VISUALS[0]);

        debug!("生成数学题: {} = {}", fact.prompt(), fact.answer);

        Question {
            id: QuestionId::fresh(),
            subject: Subject::Math,
            prompt: fact.prompt(),
            narrative: None,
            answer: fact.answer.to_string(),
            options,
            visual_hint: Some(visual.to_string()),
            arithmetic: Some(fact.arithmetic()),
        }
    }

    /// 从固定题库中等概率抽一道
    fn pick_from_bank(&mut self, subject: Subject) -> Question {
        let entries = bank(subject);
        match entries.choose(&mut self.rng) {
            Some(entry) => entry.to_question(subject),
            // 数学没有题库，走到这里只可能是调用方传错了科目
            None => self.generate_math(),
        }
    }

    /// 生成打乱顺序的 3 个选项（含答案）
    fn build_options(&mut self, answer: i64) -> Vec<String> {
        let mut values = vec![answer];

        let mut draws = 0;
        while values.len() < OPTION_COUNT && draws < MAX_DISTRACTOR_DRAWS {
            draws += 1;
            let candidate = answer + self.rng.gen_range(-DISTRACTOR_SPREAD..=DISTRACTOR_SPREAD);
            if (0..=MAX_OPTION_VALUE).contains(&candidate) && !values.contains(&candidate) {
                values.push(candidate);
            }
        }

        if values.len() < OPTION_COUNT {
            debug!("干扰项随机抽取未收敛 (答案 {})，顺序补齐", answer);
            fill_nearby(&mut values, answer);
        }

        values.shuffle(&mut self.rng);
        values.into_iter().map(|v| v.to_string()).collect()
    }
}

/// 按 answer+1, answer-1, answer+2, ... 的顺序补齐到 3 个选项
fn fill_nearby(values: &mut Vec<i64>, answer: i64) {
    let nearby = (1..=MAX_OPTION_VALUE).flat_map(|d| [answer + d, answer - d]);
    for candidate in nearby {
        if values.len() >= OPTION_COUNT {
            break;
        }
        if (0..=MAX_OPTION_VALUE).contains(&candidate) && !values.contains(&candidate) {
            values.push(candidate);
        }
    }
}
