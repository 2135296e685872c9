//! 对局状态与走法执行
//!
//! 状态机：进行中 → 已结束（单向，不可逆）。所有棋盘修改都经过这里。

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::Board;
use crate::error::GameError;
use crate::moves::{Move, MoveGenerator};
use crate::piece::{Color, Piece, PieceKind, Position, Variant};

/// 对局阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// 进行中
    InProgress,
    /// 已结束（胜方）
    Finished(Color),
}

/// 走子方检查策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnCheck {
    /// 只允许当前走子方走棋
    #[default]
    Enforce,
    /// 跳过走子方检查（仅用于模拟推演）
    Skip,
}

/// 一步走棋的结果，执行成功后生成，之后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    pub from: Position,
    pub to: Position,
    /// 走完后的棋子（可能已升王）
    pub piece: Piece,
    pub captured: bool,
    pub promoted: bool,
    /// 走完后的走子方
    pub next_turn: Color,
    pub winner: Option<Color>,
}

/// 超时跳过回合的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutOutcome {
    /// 被跳过的一方
    #[serde(rename = "skipped_color")]
    pub skipped: Color,
    pub next_turn: Color,
    pub winner: Option<Color>,
}

/// 对局状态
///
/// 独占一个棋盘。搜索推演需要显式 `clone()`，克隆之间不共享任何数据。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    variant: Variant,
    turn: Color,
    winner: Option<Color>,
}

impl GameState {
    /// 创建标准开局，白方先走
    pub fn new(variant: Variant) -> Self {
        Self::from_board(variant, Board::initial(variant), Color::White)
    }

    /// 按游戏类型名称创建，未知名称返回 `InvalidVariant`
    pub fn from_name(name: &str) -> Result<Self, GameError> {
        Ok(Self::new(name.parse()?))
    }

    /// 从任意棋盘创建（用于残局设置和测试）
    pub fn from_board(variant: Variant, board: Board, turn: Color) -> Self {
        Self {
            board,
            variant,
            turn,
            winner: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// 当前走子方
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// 胜方（进行中为 None）
    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn status(&self) -> GameStatus {
        match self.winner {
            Some(color) => GameStatus::Finished(color),
            None => GameStatus::InProgress,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    /// 指定阵营（默认当前走子方）的所有伪合法走法，按棋盘扫描顺序
    pub fn legal_moves(&self, color: Option<Color>) -> Vec<Move> {
        MoveGenerator::generate(&self.board, color.unwrap_or(self.turn))
    }

    /// 执行走法（检查走子方）
    pub fn apply_move(&mut self, from: Position, to: Position) -> Result<MoveOutcome, GameError> {
        self.apply_move_with(from, to, TurnCheck::Enforce)
    }

    /// 执行走法
    ///
    /// 检查顺序：越界 → 起点无子 → 已结束 → 非走子方 → 非法走法。
    /// 成功后移除被吃棋子、移动、升王、判定胜负；未分胜负时切换走子方。
    pub fn apply_move_with(
        &mut self,
        from: Position,
        to: Position,
        turn_check: TurnCheck,
    ) -> Result<MoveOutcome, GameError> {
        for pos in [from, to] {
            if !pos.is_valid() {
                return Err(GameError::OutOfBounds {
                    row: pos.row as i32,
                    col: pos.col as i32,
                });
            }
        }

        let piece = self.board.get(from).ok_or(GameError::NoPieceAtStart {
            row: from.row,
            col: from.col,
        })?;

        if self.is_finished() {
            return Err(GameError::GameOver);
        }

        if turn_check == TurnCheck::Enforce && piece.color != self.turn {
            return Err(GameError::WrongTurn { expected: self.turn });
        }

        let mv = Move::new(from, to);
        if !MoveGenerator::piece_moves(&self.board, from).contains(&mv) {
            return Err(GameError::IllegalMove {
                from_row: from.row,
                from_col: from.col,
                to_row: to.row,
                to_col: to.col,
            });
        }

        let captured = self.remove_captured(&mv, piece);
        self.board.move_piece(from, to);

        let promoted = piece.is_man() && to.row == piece.color.promotion_row();
        let piece = if promoted {
            let king = piece.promoted();
            self.board.set(to, Some(king));
            king
        } else {
            piece
        };

        let winner = self.check_winner();
        if winner.is_none() {
            self.turn = self.turn.opponent();
        }

        debug!(
            "{} {} {}: captured={} promoted={} next={}",
            self.variant, piece, mv, captured, promoted, self.turn
        );

        Ok(MoveOutcome {
            from,
            to,
            piece,
            captured,
            promoted,
            next_turn: self.turn,
            winner,
        })
    }

    /// 移除被吃的棋子（跳棋为越过的棋子，国际象棋为目标格棋子）
    fn remove_captured(&mut self, mv: &Move, piece: Piece) -> bool {
        if !MoveGenerator::is_capture(&self.board, mv) {
            return false;
        }
        let square = match piece.kind {
            PieceKind::Checkers(_) => MoveGenerator::jumped_square(mv),
            PieceKind::Chess(_) => Some(mv.to),
        };
        square.and_then(|pos| self.board.remove(pos)).is_some()
    }

    /// 超时跳过当前走子方的回合，不改动棋盘，不检查走法
    pub fn timeout_turn(&mut self) -> Result<TimeoutOutcome, GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }

        let skipped = self.turn;
        self.turn = skipped.opponent();
        debug!("{} 超时，轮到 {}", skipped, self.turn);

        Ok(TimeoutOutcome {
            skipped,
            next_turn: self.turn,
            winner: self.winner,
        })
    }

    /// 判定胜负：一方棋子全部被吃则对方获胜
    ///
    /// 这是唯一的胜负条件（无将死、无困毙）。已结束的对局保持原胜方。
    pub fn check_winner(&mut self) -> Option<Color> {
        if self.winner.is_none() {
            if self.board.count(Color::White) == 0 {
                self.winner = Some(Color::Black);
            } else if self.board.count(Color::Black) == 0 {
                self.winner = Some(Color::White);
            }
        }
        self.winner
    }

    /// 判负：指定一方输掉对局，返回胜方
    ///
    /// 已结束的对局不会改变胜方。
    pub fn forfeit(&mut self, loser: Color) -> Color {
        *self.winner.get_or_insert(loser.opponent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{CheckersKind, ChessKind};

    fn pos(row: u8, col: u8) -> Position {
        Position::new_unchecked(row, col)
    }

    fn empty_checkers(turn: Color) -> GameState {
        GameState::from_board(Variant::Checkers, Board::empty(), turn)
    }

    #[test]
    fn test_new_game() {
        for variant in [Variant::Checkers, Variant::Chess] {
            let game = GameState::new(variant);
            assert_eq!(game.turn(), Color::White);
            assert_eq!(game.winner(), None);
            assert_eq!(game.status(), GameStatus::InProgress);
            assert_eq!(game.variant(), variant);
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(GameState::from_name("Chess").unwrap(), GameState::new(Variant::Chess));
        assert_eq!(
            GameState::from_name("go"),
            Err(GameError::InvalidVariant {
                name: "go".to_string()
            })
        );
    }

    #[test]
    fn test_checkers_first_move() {
        let mut game = GameState::new(Variant::Checkers);
        let outcome = game.apply_move(pos(5, 0), pos(4, 1)).unwrap();

        assert!(!outcome.captured);
        assert!(!outcome.promoted);
        assert_eq!(outcome.next_turn, Color::Black);
        assert_eq!(outcome.piece, Piece::man(Color::White));
        assert_eq!(game.turn(), Color::Black);
    }

    #[test]
    fn test_turn_alternation() {
        let mut game = GameState::new(Variant::Checkers);
        assert_eq!(game.turn(), Color::White);

        game.apply_move(pos(5, 0), pos(4, 1)).unwrap();
        assert_eq!(game.turn(), Color::Black);

        game.apply_move(pos(2, 1), pos(3, 2)).unwrap();
        assert_eq!(game.turn(), Color::White);
    }

    #[test]
    fn test_every_generated_move_applies() {
        for variant in [Variant::Checkers, Variant::Chess] {
            let game = GameState::new(variant);
            for mv in game.legal_moves(None) {
                let mut sim = game.clone();
                assert!(sim.apply_move(mv.from, mv.to).is_ok(), "{} {}", variant, mv);
            }
        }
    }

    #[test]
    fn test_playout_applies_every_chosen_move() {
        for variant in [Variant::Checkers, Variant::Chess] {
            for seed in 0..5u64 {
                let mut game = GameState::new(variant);
                let mut lcg = seed;

                for ply in 0..200 {
                    let moves = game.legal_moves(None);
                    if game.is_finished() || moves.is_empty() {
                        break;
                    }
                    lcg = lcg
                        .wrapping_mul(6364136223846793005)
                        .wrapping_add(1442695040888963407);
                    let mv = moves[(lcg >> 33) as usize % moves.len()];
                    let turn = game.turn();

                    let outcome = game
                        .apply_move(mv.from, mv.to)
                        .unwrap_or_else(|err| panic!("{} seed {} ply {} {}: {}", variant, seed, ply, mv, err));
                    if outcome.winner.is_none() {
                        assert_eq!(game.turn(), turn.opponent());
                    }
                }
            }
        }
    }

    #[test]
    fn test_deserialize_rejects_short_board() {
        let json = r#"{"board":[null],"variant":"checkers","turn":"white","winner":null}"#;
        assert!(serde_json::from_str::<GameState>(json).is_err());

        let game = GameState::new(Variant::Chess);
        let json = serde_json::to_string(&game).unwrap();
        assert_eq!(serde_json::from_str::<GameState>(&json).unwrap(), game);
    }

    #[test]
    fn test_white_promotion() {
        let mut game = empty_checkers(Color::White);
        game.board.set(pos(1, 2), Some(Piece::man(Color::White)));
        game.board.set(pos(7, 0), Some(Piece::man(Color::Black)));

        let outcome = game.apply_move(pos(1, 2), pos(0, 1)).unwrap();
        assert!(outcome.promoted);
        assert_eq!(outcome.piece, Piece::checkers_king(Color::White));
        assert_eq!(game.board().get(pos(0, 1)), Some(Piece::checkers_king(Color::White)));
    }

    #[test]
    fn test_promotion_on_otherwise_empty_board() {
        let mut game = empty_checkers(Color::White);
        game.board.set(pos(1, 2), Some(Piece::man(Color::White)));

        let outcome = game.apply_move(pos(1, 2), pos(0, 1)).unwrap();
        assert!(outcome.promoted);
        assert_eq!(
            game.board().get(pos(0, 1)).map(|p| p.kind),
            Some(PieceKind::Checkers(CheckersKind::King))
        );
        // 黑方没有棋子，白方直接获胜
        assert_eq!(outcome.winner, Some(Color::White));
    }

    #[test]
    fn test_black_promotion() {
        let mut game = empty_checkers(Color::Black);
        game.board.set(pos(6, 3), Some(Piece::man(Color::Black)));
        game.board.set(pos(0, 1), Some(Piece::man(Color::White)));

        let outcome = game.apply_move(pos(6, 3), pos(7, 4)).unwrap();
        assert!(outcome.promoted);
        assert_eq!(outcome.piece, Piece::checkers_king(Color::Black));
        assert_eq!(outcome.next_turn, Color::White);
    }

    #[test]
    fn test_king_moves_backward() {
        let mut game = empty_checkers(Color::White);
        game.board.set(pos(3, 2), Some(Piece::checkers_king(Color::White)));
        game.board.set(pos(0, 7), Some(Piece::man(Color::Black)));

        let outcome = game.apply_move(pos(3, 2), pos(4, 3)).unwrap();
        assert!(!outcome.promoted);
        assert_eq!(game.board().get(pos(4, 3)), Some(Piece::checkers_king(Color::White)));

        // 同色普通棋子不能后退
        let mut game = empty_checkers(Color::White);
        game.board.set(pos(3, 2), Some(Piece::man(Color::White)));
        game.board.set(pos(0, 7), Some(Piece::man(Color::Black)));
        assert!(matches!(
            game.apply_move(pos(3, 2), pos(4, 3)),
            Err(GameError::IllegalMove { .. })
        ));
    }

    #[test]
    fn test_checkers_capture_and_win() {
        let mut game = empty_checkers(Color::White);
        game.board.set(pos(5, 2), Some(Piece::man(Color::White)));
        game.board.set(pos(4, 3), Some(Piece::man(Color::Black)));

        let outcome = game.apply_move(pos(5, 2), pos(3, 4)).unwrap();
        assert!(outcome.captured);
        assert!(game.board().get(pos(4, 3)).is_none());
        assert_eq!(outcome.winner, Some(Color::White));
        // 产生胜方时不切换走子方
        assert_eq!(outcome.next_turn, Color::White);
        assert_eq!(game.status(), GameStatus::Finished(Color::White));

        assert_eq!(game.apply_move(pos(3, 4), pos(2, 3)), Err(GameError::GameOver));
    }

    #[test]
    fn test_capture_does_not_chain() {
        let mut game = empty_checkers(Color::White);
        game.board.set(pos(5, 0), Some(Piece::man(Color::White)));
        game.board.set(pos(4, 1), Some(Piece::man(Color::Black)));
        game.board.set(pos(2, 3), Some(Piece::man(Color::Black)));

        let outcome = game.apply_move(pos(5, 0), pos(3, 2)).unwrap();
        assert!(outcome.captured);
        // 还能继续跳，但回合照常交给黑方
        assert_eq!(outcome.next_turn, Color::Black);
        assert_eq!(game.board().get(pos(2, 3)), Some(Piece::man(Color::Black)));
    }

    #[test]
    fn test_chess_capture() {
        let mut board = Board::empty();
        board.set(pos(4, 4), Some(Piece::chess(ChessKind::Rook, Color::White)));
        board.set(pos(1, 4), Some(Piece::chess(ChessKind::Knight, Color::Black)));
        board.set(pos(0, 0), Some(Piece::chess(ChessKind::King, Color::Black)));
        let mut game = GameState::from_board(Variant::Chess, board, Color::White);

        let outcome = game.apply_move(pos(4, 4), pos(1, 4)).unwrap();
        assert!(outcome.captured);
        assert_eq!(outcome.piece, Piece::chess(ChessKind::Rook, Color::White));
        assert_eq!(game.board().count(Color::Black), 1);
        assert_eq!(outcome.winner, None);
        assert_eq!(outcome.next_turn, Color::Black);
    }

    #[test]
    fn test_chess_pawn_is_not_promoted() {
        let mut board = Board::empty();
        board.set(pos(1, 0), Some(Piece::chess(ChessKind::Pawn, Color::White)));
        board.set(pos(7, 7), Some(Piece::chess(ChessKind::King, Color::Black)));
        let mut game = GameState::from_board(Variant::Chess, board, Color::White);

        let outcome = game.apply_move(pos(1, 0), pos(0, 0)).unwrap();
        assert!(!outcome.promoted);
        assert_eq!(outcome.piece, Piece::chess(ChessKind::Pawn, Color::White));
    }

    #[test]
    fn test_apply_errors() {
        let mut game = GameState::new(Variant::Checkers);

        assert_eq!(
            game.apply_move(pos(8, 0), pos(4, 1)),
            Err(GameError::OutOfBounds { row: 8, col: 0 })
        );
        assert_eq!(
            game.apply_move(pos(5, 0), pos(4, 9)),
            Err(GameError::OutOfBounds { row: 4, col: 9 })
        );
        assert_eq!(
            game.apply_move(pos(4, 4), pos(3, 3)),
            Err(GameError::NoPieceAtStart { row: 4, col: 4 })
        );
        assert_eq!(
            game.apply_move(pos(2, 1), pos(3, 2)),
            Err(GameError::WrongTurn { expected: Color::White })
        );
        assert_eq!(
            game.apply_move(pos(5, 0), pos(3, 2)),
            Err(GameError::IllegalMove {
                from_row: 5,
                from_col: 0,
                to_row: 3,
                to_col: 2
            })
        );
        // 失败不改变状态
        assert_eq!(game, GameState::new(Variant::Checkers));
    }

    #[test]
    fn test_skip_turn_check() {
        let mut game = GameState::new(Variant::Checkers);
        let outcome = game
            .apply_move_with(pos(2, 1), pos(3, 2), TurnCheck::Skip)
            .unwrap();

        // 走子方按当前回合切换
        assert_eq!(outcome.next_turn, Color::Black);
    }

    #[test]
    fn test_timeout_turn() {
        let mut game = GameState::new(Variant::Chess);
        let before = game.board().clone();

        let outcome = game.timeout_turn().unwrap();
        assert_eq!(outcome.skipped, Color::White);
        assert_eq!(outcome.next_turn, Color::Black);
        assert_eq!(outcome.winner, None);
        assert_eq!(game.board(), &before);

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["skipped_color"], "white");
        assert_eq!(json["next_turn"], "black");

        game.forfeit(Color::Black);
        assert_eq!(game.timeout_turn(), Err(GameError::GameOver));
    }

    #[test]
    fn test_check_winner_after_clearing_color() {
        let mut game = GameState::new(Variant::Checkers);
        for (pos, _) in game.board().pieces(Color::White) {
            game.board.set(pos, None);
        }

        assert_eq!(game.check_winner(), Some(Color::Black));
        assert_eq!(game.winner(), Some(Color::Black));
        assert_eq!(game.apply_move(pos(2, 1), pos(3, 2)), Err(GameError::GameOver));
    }

    #[test]
    fn test_forfeit_is_one_way() {
        let mut game = GameState::new(Variant::Checkers);
        assert_eq!(game.forfeit(Color::White), Color::Black);
        assert_eq!(game.forfeit(Color::Black), Color::Black);
        assert_eq!(game.status(), GameStatus::Finished(Color::Black));
    }

    #[test]
    fn test_clone_is_independent() {
        let game = GameState::new(Variant::Checkers);
        let mut sim = game.clone();
        sim.apply_move(pos(5, 0), pos(4, 1)).unwrap();

        assert_eq!(game.turn(), Color::White);
        assert!(game.board().get(pos(4, 1)).is_none());
        assert_ne!(game, sim);
    }
}
