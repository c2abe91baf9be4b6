//! 固定题库
//!
//! English / Science 的 Classic 题目只从这里抽取，内容在编写时已经满足题目约束。

use crate::models::question::{Question, QuestionId};
use crate::models::subject::Subject;

/// 题库条目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankEntry {
    pub prompt: &'static str,
    pub answer: &'static str,
    pub options: [&'static str; 3],
    pub visual_hint: &'static str,
}

impl BankEntry {
    /// 盖上新的 ID 和科目，生成题目
    pub fn to_question(&self, subject: Subject) -> Question {
        Question {
            id: QuestionId::fresh(),
            subject,
            prompt: self.prompt.to_string(),
            narrative: None,
            answer: self.answer.to_string(),
            options: self.options.iter().map(|s| s.to_string()).collect(),
            visual_hint: Some(self.visual_hint.to_string()),
            arithmetic: None,
        }
    }
}

pub const ENGLISH_BANK: &[BankEntry] = &[
    BankEntry {
        prompt: "Which letter comes after A?",
        answer: "B",
        options: ["B", "D", "C"],
        visual_hint: "alphabet",
    },
    BankEntry {
        prompt: "Which word rhymes with Cat?",
        answer: "Bat",
        options: ["Bat", "Dog", "Fish"],
        visual_hint: "cat",
    },
    BankEntry {
        prompt: "Find the animal:",
        answer: "Dog",
        options: ["Dog", "Car", "Ball"],
        visual_hint: "dog",
    },
    BankEntry {
        prompt: "What is the opposite of Up?",
        answer: "Down",
        options: ["Down", "Left", "Right"],
        visual_hint: "arrow",
    },
    BankEntry {
        prompt: "Which letter starts the word Apple?",
        answer: "A",
        options: ["A", "P", "L"],
        visual_hint: "apple",
    },
];

pub const SCIENCE_BANK: &[BankEntry] = &[
    BankEntry {
        prompt: "Which one is an animal?",
        answer: "Cow",
        options: ["Cow", "Car", "Rock"],
        visual_hint: "cow",
    },
    BankEntry {
        prompt: "Where does rain come from?",
        answer: "Clouds",
        options: ["Clouds", "Ground", "Trees"],
        visual_hint: "cloud",
    },
    BankEntry {
        prompt: "What color is the Sun?",
        answer: "Yellow",
        options: ["Yellow", "Purple", "Green"],
        visual_hint: "sun",
    },
    BankEntry {
        prompt: "Which animal can fly?",
        answer: "Bird",
        options: ["Bird", "Dog", "Fish"],
        visual_hint: "bird",
    },
    BankEntry {
        prompt: "What do plants need to grow?",
        answer: "Water",
        options: ["Water", "Candy", "Toys"],
        visual_hint: "leaf",
    },
];

/// 获取科目的固定题库（数学没有题库，返回空）
pub fn bank(subject: Subject) -> &'static [BankEntry] {
    match subject {
        Subject::Math => &[],
        Subject::English => ENGLISH_BANK,
        Subject::Science => SCIENCE_BANK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_bank_entry_is_valid() {
        for subject in Subject::ALL {
            for entry in bank(subject) {
                let q = entry.to_question(subject);
                assert_eq!(q.validate(), Ok(()), "invalid entry: {}", entry.prompt);
            }
        }
    }

    #[test]
    fn test_math_has_no_bank() {
        assert!(bank(Subject::Math).is_empty());
        assert_eq!(bank(Subject::English).len(), 5);
        assert_eq!(bank(Subject::Science).len(), 5);
    }
}
