//! 跳棋 / 国际象棋 AI 引擎
//!
//! 包含:
//! - 子力评估函数
//! - 随机、贪心吃子、Minimax + Alpha-Beta 三种选步策略

mod evaluate;
mod search;

pub use evaluate::Evaluator;
pub use search::{AiConfig, AiEngine};
