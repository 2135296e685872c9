//! 棋盘状态

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_SIZE, CHECKERS_HOME_ROWS, SQUARE_COUNT};
use crate::piece::{ChessKind, Color, Piece, Position, Variant};

/// 棋盘
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Option<Piece>>", into = "Vec<Option<Piece>>")]
pub struct Board {
    /// 8x8 棋盘，索引为 row * 8 + col，长度恒为 64
    squares: Vec<Option<Piece>>,
}

impl TryFrom<Vec<Option<Piece>>> for Board {
    type Error = String;

    fn try_from(squares: Vec<Option<Piece>>) -> Result<Self, Self::Error> {
        if squares.len() == SQUARE_COUNT {
            Ok(Self { squares })
        } else {
            Err(format!(
                "board must have {} squares, got {}",
                SQUARE_COUNT,
                squares.len()
            ))
        }
    }
}

impl From<Board> for Vec<Option<Piece>> {
    fn from(board: Board) -> Self {
        board.squares
    }
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: vec![None; SQUARE_COUNT],
        }
    }

    /// 创建指定游戏类型的初始棋盘
    pub fn initial(variant: Variant) -> Self {
        match variant {
            Variant::Checkers => Self::checkers(),
            Variant::Chess => Self::chess(),
        }
    }

    /// 跳棋初始布局：上三行深色格为黑子，下三行深色格为白子
    fn checkers() -> Self {
        let mut board = Self::empty();
        let size = BOARD_SIZE as u8;
        let home = CHECKERS_HOME_ROWS as u8;

        for row in 0..size {
            let color = if row < home {
                Color::Black
            } else if row >= size - home {
                Color::White
            } else {
                continue;
            };
            for col in 0..size {
                let pos = Position::new_unchecked(row, col);
                if pos.is_dark() {
                    board.set(pos, Some(Piece::man(color)));
                }
            }
        }

        board
    }

    /// 国际象棋初始布局：第 0 行黑方底线，第 7 行白方底线
    fn chess() -> Self {
        let mut board = Self::empty();

        for (col, kind) in ChessKind::BACK_RANK.iter().enumerate() {
            let col = col as u8;
            board.set(Position::new_unchecked(0, col), Some(Piece::chess(*kind, Color::Black)));
            board.set(
                Position::new_unchecked(Color::Black.pawn_row(), col),
                Some(Piece::chess(ChessKind::Pawn, Color::Black)),
            );
            board.set(
                Position::new_unchecked(Color::White.pawn_row(), col),
                Some(Piece::chess(ChessKind::Pawn, Color::White)),
            );
            board.set(
                Position::new_unchecked(BOARD_SIZE as u8 - 1, col),
                Some(Piece::chess(*kind, Color::White)),
            );
        }

        board
    }

    /// 获取指定位置的棋子
    pub fn get(&self, pos: Position) -> Option<Piece> {
        if pos.is_valid() {
            self.squares[pos.to_index()]
        } else {
            None
        }
    }

    /// 设置指定位置的棋子
    pub fn set(&mut self, pos: Position, piece: Option<Piece>) {
        if pos.is_valid() {
            self.squares[pos.to_index()] = piece;
        }
    }

    /// 移除指定位置的棋子
    pub fn remove(&mut self, pos: Position) -> Option<Piece> {
        let piece = self.get(pos);
        self.set(pos, None);
        piece
    }

    /// 移动棋子（不检查规则），返回目标位置原有的棋子
    pub fn move_piece(&mut self, from: Position, to: Position) -> Option<Piece> {
        let piece = self.remove(from);
        let captured = self.get(to);
        self.set(to, piece);
        captured
    }

    /// 获取指定阵营的所有棋子位置（按行优先扫描顺序）
    pub fn pieces(&self, color: Color) -> Vec<(Position, Piece)> {
        self.all_pieces()
            .into_iter()
            .filter(|(_, piece)| piece.color == color)
            .collect()
    }

    /// 获取所有棋子（按行优先扫描顺序）
    pub fn all_pieces(&self) -> Vec<(Position, Piece)> {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(index, square)| {
                let piece = (*square)?;
                Position::from_index(index).map(|pos| (pos, piece))
            })
            .collect()
    }

    /// 统计指定阵营的棋子数量
    pub fn count(&self, color: Color) -> usize {
        self.squares
            .iter()
            .flatten()
            .filter(|piece| piece.color == color)
            .count()
    }

    /// 导出为棋子代码网格，空格为 `""`
    pub fn to_codes(&self) -> Vec<Vec<String>> {
        self.squares
            .chunks(BOARD_SIZE)
            .map(|row| {
                row.iter()
                    .map(|square| square.map(|piece| piece.code()).unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.squares.chunks(BOARD_SIZE) {
            let line: String = row
                .iter()
                .map(|square| {
                    let code = square.map(|piece| piece.code()).unwrap_or_else(|| ".".to_string());
                    format!("{:<3}", code)
                })
                .collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
