//! 搜索引擎
//!
//! 三种选步策略：随机、贪心吃子、Minimax + Alpha-Beta 剪枝。
//! 推演只在克隆出的对局上进行，从不修改传入的对局。

use protocol::{
    AiSettings, Color, GameError, GameState, Move, MoveGenerator, MoveOutcome, Strategy, Variant,
    MAX_CHECKERS_DEPTH, MAX_CHESS_DEPTH, MIN_SEARCH_DEPTH, WIN_SCORE,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::evaluate::Evaluator;

/// AI 配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiConfig {
    pub strategy: Strategy,
    /// 请求的搜索深度（实际使用前按游戏类型截断）
    pub depth: i64,
}

impl AiConfig {
    pub fn new(strategy: Strategy, depth: i64) -> Self {
        Self { strategy, depth }
    }

    /// 截断后的搜索深度：最少 1 层，国际象棋最多 2 层，跳棋最多 4 层
    pub fn clamped_depth(&self, variant: Variant) -> u8 {
        let max_depth = match variant {
            Variant::Chess => MAX_CHESS_DEPTH,
            Variant::Checkers => MAX_CHECKERS_DEPTH,
        };
        // 截断后必然落在 u8 范围内
        self.depth
            .clamp(i64::from(MIN_SEARCH_DEPTH), i64::from(max_depth)) as u8
    }
}

impl From<AiSettings> for AiConfig {
    fn from(settings: AiSettings) -> Self {
        Self::new(settings.strategy, settings.depth)
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        AiSettings::default().into()
    }
}

/// AI 引擎
pub struct AiEngine {
    config: AiConfig,
    rng: ChaCha8Rng,
    nodes_searched: u64,
}

impl AiEngine {
    /// 创建新的 AI 引擎（随机种子）
    pub fn new(config: AiConfig) -> Self {
        Self::with_rng(config, ChaCha8Rng::from_entropy())
    }

    /// 使用固定种子创建（结果可复现）
    pub fn with_seed(config: AiConfig, seed: u64) -> Self {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(config: AiConfig, rng: ChaCha8Rng) -> Self {
        Self {
            config,
            rng,
            nodes_searched: 0,
        }
    }

    /// 获取上次搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// 为当前走子方选一步并执行
    ///
    /// 无子可动时判走子方负，返回 `NoLegalMoves`。
    pub fn ai_move(&mut self, state: &mut GameState) -> Result<MoveOutcome, GameError> {
        if state.is_finished() {
            return Err(GameError::GameOver);
        }

        match self.select_move(state) {
            Some(mv) => state.apply_move(mv.from, mv.to),
            None => {
                let loser = state.turn();
                let winner = state.forfeit(loser);
                warn!("{} 无子可动，判 {} 获胜", loser, winner);
                Err(GameError::NoLegalMoves { winner })
            }
        }
    }

    /// 为当前走子方选择走法，没有合法走法时返回 None
    pub fn select_move(&mut self, state: &GameState) -> Option<Move> {
        self.nodes_searched = 0;

        let moves = state.legal_moves(None);
        if moves.is_empty() {
            return None;
        }

        let chosen = match self.config.strategy {
            Strategy::Random => moves.choose(&mut self.rng).copied(),
            Strategy::Greedy => self.greedy(state, &moves),
            Strategy::Minimax => {
                let depth = self.config.clamped_depth(state.variant());
                self.minimax_root(state, &moves, depth)
            }
        };

        if let Some(mv) = &chosen {
            debug!(
                "AI ({:?}) 为 {} 选择 {}，候选 {} 个，搜索节点 {}",
                self.config.strategy,
                state.turn(),
                mv,
                moves.len(),
                self.nodes_searched
            );
        }

        chosen
    }

    /// 贪心：在吃子走法中随机，没有吃子走法时在全部走法中随机
    fn greedy(&mut self, state: &GameState, moves: &[Move]) -> Option<Move> {
        let captures: Vec<Move> = moves
            .iter()
            .filter(|mv| MoveGenerator::is_capture(state.board(), mv))
            .copied()
            .collect();

        if captures.is_empty() {
            moves.choose(&mut self.rng).copied()
        } else {
            captures.choose(&mut self.rng).copied()
        }
    }

    /// 根节点：逐个走法推演打分，同分走法中随机选一个
    fn minimax_root(&mut self, state: &GameState, moves: &[Move], depth: u8) -> Option<Move> {
        let maximizing = state.turn();
        let mut best_score = -WIN_SCORE;
        let mut best_moves = Vec::new();

        for mv in moves {
            let Some(child) = Self::simulate(state, mv) else {
                continue;
            };
            let score = self.minimax(&child, depth - 1, maximizing, -WIN_SCORE, WIN_SCORE);

            if score > best_score {
                best_score = score;
                best_moves.clear();
                best_moves.push(*mv);
            } else if score == best_score {
                best_moves.push(*mv);
            }
        }

        best_moves
            .choose(&mut self.rng)
            .or_else(|| moves.first())
            .copied()
    }

    /// Minimax + Alpha-Beta 搜索，分数始终以 `maximizing` 一方为视角
    fn minimax(
        &mut self,
        state: &GameState,
        depth: u8,
        maximizing: Color,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.nodes_searched += 1;

        if let Some(winner) = state.winner() {
            return if winner == maximizing { WIN_SCORE } else { -WIN_SCORE };
        }

        // 到达深度限制，返回子力评估
        if depth == 0 {
            return Evaluator::material(state.board(), maximizing);
        }

        // 无子可动按走子方负处理（不区分困毙）
        let moves = state.legal_moves(None);
        if moves.is_empty() {
            return if state.turn() == maximizing { -WIN_SCORE } else { WIN_SCORE };
        }

        let is_maximizing = state.turn() == maximizing;
        let mut best = if is_maximizing { -WIN_SCORE } else { WIN_SCORE };

        for mv in &moves {
            let Some(child) = Self::simulate(state, mv) else {
                continue;
            };
            let score = self.minimax(&child, depth - 1, maximizing, alpha, beta);

            if is_maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }

            if beta <= alpha {
                break;
            }
        }

        best
    }

    /// 在独立克隆上执行走法（检查走子方）
    fn simulate(state: &GameState, mv: &Move) -> Option<GameState> {
        let mut child = state.clone();
        match child.apply_move(mv.from, mv.to) {
            Ok(_) => Some(child),
            Err(err) => {
                debug!("推演走法 {} 失败: {}", mv, err);
                None
            }
        }
    }
}
