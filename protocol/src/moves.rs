//! 走法生成
//!
//! 只生成伪合法走法：遵守棋子走法、阻挡和吃子规则，不考虑将军等更高层条件。

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::piece::{CheckersKind, ChessKind, Color, Piece, PieceKind, Position};

/// 走法
///
/// 不携带棋子信息，执行时从棋盘读取，只对生成它的局面有意义。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// 起始位置
    pub from: Position,
    /// 目标位置
    pub to: Position,
}

impl Move {
    /// 创建新走法
    pub fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

const STRAIGHTS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// 走法生成器
pub struct MoveGenerator;

impl MoveGenerator {
    /// 生成指定阵营的所有伪合法走法
    ///
    /// 顺序为棋盘扫描顺序（先行后列），AI 平局取舍依赖该顺序。
    pub fn generate(board: &Board, color: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(48);

        for (pos, piece) in board.pieces(color) {
            Self::generate_piece_moves(board, pos, piece, &mut moves);
        }

        moves
    }

    /// 生成指定位置棋子的所有伪合法走法，空位或越界返回空集合
    pub fn piece_moves(board: &Board, pos: Position) -> Vec<Move> {
        let mut moves = Vec::new();
        if let Some(piece) = board.get(pos) {
            Self::generate_piece_moves(board, pos, piece, &mut moves);
        }
        moves
    }

    /// 判断走法是否吃子
    ///
    /// 跳棋：斜跳两格且越过对方棋子；国际象棋：目标格为对方棋子。
    pub fn is_capture(board: &Board, mv: &Move) -> bool {
        let Some(piece) = board.get(mv.from) else {
            return false;
        };

        match piece.kind {
            PieceKind::Checkers(_) => Self::jumped_square(mv)
                .and_then(|middle| board.get(middle))
                .is_some_and(|middle| middle.color != piece.color),
            PieceKind::Chess(_) => board
                .get(mv.to)
                .is_some_and(|target| target.color != piece.color),
        }
    }

    /// 跳棋吃子时被越过的格子（非两格斜跳返回 None）
    pub fn jumped_square(mv: &Move) -> Option<Position> {
        let dr = mv.to.row as i8 - mv.from.row as i8;
        let dc = mv.to.col as i8 - mv.from.col as i8;
        if dr.abs() == 2 && dc.abs() == 2 {
            mv.from.offset(dr / 2, dc / 2)
        } else {
            None
        }
    }

    fn generate_piece_moves(board: &Board, pos: Position, piece: Piece, moves: &mut Vec<Move>) {
        match piece.kind {
            PieceKind::Checkers(kind) => {
                Self::generate_checkers_moves(board, pos, kind, piece.color, moves)
            }
            PieceKind::Chess(ChessKind::Pawn) => {
                Self::generate_pawn_moves(board, pos, piece.color, moves)
            }
            PieceKind::Chess(ChessKind::Knight) => {
                Self::generate_step_moves(board, pos, piece.color, &KNIGHT_JUMPS, moves)
            }
            PieceKind::Chess(ChessKind::Bishop) => {
                Self::generate_slide_moves(board, pos, piece.color, &DIAGONALS, moves)
            }
            PieceKind::Chess(ChessKind::Rook) => {
                Self::generate_slide_moves(board, pos, piece.color, &STRAIGHTS, moves)
            }
            PieceKind::Chess(ChessKind::Queen) => {
                Self::generate_slide_moves(board, pos, piece.color, &DIAGONALS, moves);
                Self::generate_slide_moves(board, pos, piece.color, &STRAIGHTS, moves);
            }
            PieceKind::Chess(ChessKind::King) => {
                Self::generate_king_moves(board, pos, piece.color, moves)
            }
        }
    }

    /// 生成跳棋走法
    ///
    /// 普通棋子只能斜向前一格，王可前后。吃子为越过相邻对方棋子落到空格，
    /// 不强制、不连跳。
    fn generate_checkers_moves(
        board: &Board,
        pos: Position,
        kind: CheckersKind,
        color: Color,
        moves: &mut Vec<Move>,
    ) {
        let forward = color.forward();
        let row_steps: &[i8] = match kind {
            CheckersKind::King => &[-1, 1],
            CheckersKind::Man => &[forward],
        };

        for &dr in row_steps {
            for dc in [-1i8, 1i8] {
                // 斜走一格
                if let Some(to) = pos.offset(dr, dc) {
                    if board.get(to).is_none() {
                        moves.push(Move::new(pos, to));
                    }
                }

                // 斜跳两格
                let Some(landing) = pos.offset(2 * dr, 2 * dc) else {
                    continue;
                };
                let jumps_opponent = pos
                    .offset(dr, dc)
                    .and_then(|middle| board.get(middle))
                    .is_some_and(|middle| middle.color != color);
                if jumps_opponent && board.get(landing).is_none() {
                    moves.push(Move::new(pos, landing));
                }
            }
        }
    }

    /// 生成兵的走法（无吃过路兵，无升变）
    fn generate_pawn_moves(board: &Board, pos: Position, color: Color, moves: &mut Vec<Move>) {
        let forward = color.forward();

        // 前进一格，起始行可前进两格
        if let Some(one) = pos.offset(forward, 0) {
            if board.get(one).is_none() {
                moves.push(Move::new(pos, one));

                if pos.row == color.pawn_row() {
                    if let Some(two) = pos.offset(2 * forward, 0) {
                        if board.get(two).is_none() {
                            moves.push(Move::new(pos, two));
                        }
                    }
                }
            }
        }

        // 斜向吃子
        for dc in [-1i8, 1i8] {
            if let Some(to) = pos.offset(forward, dc) {
                if board.get(to).is_some_and(|target| target.color != color) {
                    moves.push(Move::new(pos, to));
                }
            }
        }
    }

    /// 生成王的走法（无王车易位）
    fn generate_king_moves(board: &Board, pos: Position, color: Color, moves: &mut Vec<Move>) {
        for dr in -1i8..=1 {
            for dc in -1i8..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                if let Some(to) = pos.offset(dr, dc) {
                    Self::try_add_move(board, pos, to, color, moves);
                }
            }
        }
    }

    /// 生成固定偏移的走法（马）
    fn generate_step_moves(
        board: &Board,
        pos: Position,
        color: Color,
        offsets: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(dr, dc) in offsets {
            if let Some(to) = pos.offset(dr, dc) {
                Self::try_add_move(board, pos, to, color, moves);
            }
        }
    }

    /// 生成滑行走法（象、车、后）
    fn generate_slide_moves(
        board: &Board,
        pos: Position,
        color: Color,
        directions: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(dr, dc) in directions {
            let mut current = pos;
            while let Some(to) = current.offset(dr, dc) {
                if let Some(target) = board.get(to) {
                    // 遇到对方棋子可以吃，之后停止
                    if target.color != color {
                        moves.push(Move::new(pos, to));
                    }
                    break;
                }
                moves.push(Move::new(pos, to));
                current = to;
            }
        }
    }

    /// 尝试添加走法（目标为空或对方棋子）
    fn try_add_move(board: &Board, from: Position, to: Position, color: Color, moves: &mut Vec<Move>) {
        match board.get(to) {
            Some(target) if target.color == color => {}
            _ => moves.push(Move::new(from, to)),
        }
    }
}
