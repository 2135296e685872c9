//! 棋子定义

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::BOARD_SIZE;
use crate::error::GameError;

/// 游戏类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// 跳棋
    Checkers,
    /// 国际象棋（简化规则）
    Chess,
}

impl Variant {
    /// 名称（小写）
    pub fn name(&self) -> &'static str {
        match self {
            Variant::Checkers => "checkers",
            Variant::Chess => "chess",
        }
    }
}

impl FromStr for Variant {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "checkers" => Ok(Variant::Checkers),
            "chess" => Ok(Variant::Chess),
            _ => Err(GameError::InvalidVariant {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// 白方（先手，在下方）
    White,
    /// 黑方（后手，在上方）
    Black,
}

impl Color {
    /// 获取对方阵营
    pub fn opponent(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// 前进方向的行增量（白方向上，黑方向下）
    pub fn forward(&self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// 跳棋升王行（离己方起始最远的一行）
    pub fn promotion_row(&self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => (BOARD_SIZE - 1) as u8,
        }
    }

    /// 国际象棋兵的起始行
    pub fn pawn_row(&self) -> u8 {
        match self {
            Color::White => (BOARD_SIZE - 2) as u8,
            Color::Black => 1,
        }
    }

    /// 棋子代码前缀
    pub fn code(&self) -> char {
        match self {
            Color::White => 'W',
            Color::Black => 'B',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => f.write_str("white"),
            Color::Black => f.write_str("black"),
        }
    }
}

/// 跳棋棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckersKind {
    /// 普通棋子，只能斜向前进
    Man,
    /// 王，可以斜向前后移动
    King,
}

/// 国际象棋棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChessKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl ChessKind {
    /// 底线排列顺序
    pub const BACK_RANK: [ChessKind; BOARD_SIZE] = [
        ChessKind::Rook,
        ChessKind::Knight,
        ChessKind::Bishop,
        ChessKind::Queen,
        ChessKind::King,
        ChessKind::Bishop,
        ChessKind::Knight,
        ChessKind::Rook,
    ];

    fn code(&self) -> char {
        match self {
            ChessKind::Pawn => 'P',
            ChessKind::Knight => 'N',
            ChessKind::Bishop => 'B',
            ChessKind::Rook => 'R',
            ChessKind::Queen => 'Q',
            ChessKind::King => 'K',
        }
    }
}

/// 棋子种类，按游戏类型封闭
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Checkers(CheckersKind),
    Chess(ChessKind),
}

impl PieceKind {
    /// 获取棋子的子力分值（用于 AI 评估）
    pub fn value(&self) -> i32 {
        match self {
            PieceKind::Checkers(CheckersKind::Man) => 1,
            PieceKind::Checkers(CheckersKind::King) => 2,
            PieceKind::Chess(ChessKind::Pawn) => 1,
            PieceKind::Chess(ChessKind::Knight) => 3,
            PieceKind::Chess(ChessKind::Bishop) => 3,
            PieceKind::Chess(ChessKind::Rook) => 5,
            PieceKind::Chess(ChessKind::Queen) => 9,
            PieceKind::Chess(ChessKind::King) => 200,
        }
    }
}

/// 棋子
///
/// 颜色放置后不可变，只有种类可能改变（跳棋升王）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    /// 创建新棋子
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    /// 跳棋普通棋子
    pub fn man(color: Color) -> Self {
        Self::new(PieceKind::Checkers(CheckersKind::Man), color)
    }

    /// 跳棋王
    pub fn checkers_king(color: Color) -> Self {
        Self::new(PieceKind::Checkers(CheckersKind::King), color)
    }

    /// 国际象棋棋子
    pub fn chess(kind: ChessKind, color: Color) -> Self {
        Self::new(PieceKind::Chess(kind), color)
    }

    /// 是否为跳棋普通棋子
    pub fn is_man(&self) -> bool {
        self.kind == PieceKind::Checkers(CheckersKind::Man)
    }

    /// 升王后的棋子（颜色不变）
    pub fn promoted(&self) -> Self {
        Self::checkers_king(self.color)
    }

    /// 获取棋子分值
    pub fn value(&self) -> i32 {
        self.kind.value()
    }

    /// 棋子代码：颜色前缀 + 种类（跳棋普通棋子只有前缀）
    ///
    /// 例如 `W`、`BK`、`WP`、`BR`。
    pub fn code(&self) -> String {
        let mut code = String::with_capacity(2);
        code.push(self.color.code());
        match self.kind {
            PieceKind::Checkers(CheckersKind::Man) => {}
            PieceKind::Checkers(CheckersKind::King) => code.push('K'),
            PieceKind::Chess(kind) => code.push(kind.code()),
        }
        code
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

/// 棋盘位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// 行 (0-7)，0 为黑方底线
    pub row: u8,
    /// 列 (0-7)
    pub col: u8,
}

impl Position {
    /// 创建新位置
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// 创建新位置（不检查边界，内部使用）
    pub const fn new_unchecked(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// 从调用方提供的整数坐标创建，越界返回 `OutOfBounds`
    pub fn from_coords(row: i32, col: i32) -> Result<Self, GameError> {
        if (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col) {
            Ok(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            Err(GameError::OutOfBounds { row, col })
        }
    }

    /// 检查位置是否在棋盘内
    pub fn is_valid(&self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }

    /// 是否为深色格（跳棋落子格）
    pub fn is_dark(&self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    /// 获取偏移后的位置
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Position> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if row >= 0 && (row as usize) < BOARD_SIZE && col >= 0 && (col as usize) < BOARD_SIZE {
            Some(Position {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// 转换为数组索引
    pub fn to_index(&self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    /// 从数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_SIZE * BOARD_SIZE {
            Some(Position {
                row: (index / BOARD_SIZE) as u8,
                col: (index % BOARD_SIZE) as u8,
            })
        } else {
            None
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
