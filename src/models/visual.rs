//! 视觉提示 → 图标
//!
//! 关键词不做校验，未知关键词一律退化为占位图标。

use crate::models::question::{Arithmetic, MAX_OPERAND};

/// 未识别关键词时使用的占位图标
pub const PLACEHOLDER_ICON: &str = "❓";

/// 按顺序匹配：先命中的优先
const ICON_TABLE: &[(&[&str], &str)] = &[
    (&["apple"], "🍎"),
    (&["fish"], "🐟"),
    (&["star"], "⭐"),
    (&["cookie"], "🍪"),
    (&["rocket"], "🚀"),
    (&["cat"], "🐱"),
    (&["dog"], "🐶"),
    (&["book"], "📘"),
    (&["pencil"], "✏️"),
    (&["alphabet", "letter"], "🔤"),
    (&["bird"], "🐦"),
    (&["cloud", "rain"], "☁️"),
    (&["sun"], "☀️"),
    (&["leaf", "plant"], "🌿"),
    (&["atom", "science"], "⚛️"),
    (&["cow"], "🐮"),
];

/// 根据视觉提示关键词选择图标（包含匹配，忽略大小写）
pub fn icon_for(hint: Option<&str>) -> &'static str {
    let hint = match hint {
        Some(h) if !h.trim().is_empty() => h.to_lowercase(),
        _ => return PLACEHOLDER_ICON,
    };

    ICON_TABLE
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| hint.contains(k)))
        .map(|(_, icon)| *icon)
        .unwrap_or(PLACEHOLDER_ICON)
}

/// 把算式画成图标：`🍎🍎🍎 + 🍎🍎🍎🍎`
///
/// 操作数截断到 0..=MAX_OPERAND 个图标。
pub fn render_arithmetic(arith: &Arithmetic, hint: Option<&str>) -> String {
    let icon = icon_for(hint);
    let repeat = |n: i64| icon.repeat(n.clamp(0, MAX_OPERAND) as usize);
    format!(
        "{} {} {}",
        repeat(arith.num1),
        arith.operator,
        repeat(arith.num2)
    )
}
