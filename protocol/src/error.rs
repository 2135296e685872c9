//! 错误类型定义

use thiserror::Error;

use crate::piece::Color;

/// 规则引擎错误
///
/// 全部为可恢复的调用方错误，不代表内部状态损坏。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// 未知的游戏类型
    #[error("Invalid game type: {name}")]
    InvalidVariant { name: String },

    /// 坐标超出棋盘
    #[error("Move out of bounds: ({row}, {col})")]
    OutOfBounds { row: i32, col: i32 },

    /// 起点没有棋子
    #[error("No piece at start: ({row}, {col})")]
    NoPieceAtStart { row: u8, col: u8 },

    /// 游戏已结束
    #[error("Game already over")]
    GameOver,

    /// 不是该棋子一方的回合
    #[error("It is {expected}'s turn")]
    WrongTurn { expected: Color },

    /// 走法不在合法走法集合中
    #[error("Illegal move: ({from_row}, {from_col}) -> ({to_row}, {to_col})")]
    IllegalMove {
        from_row: u8,
        from_col: u8,
        to_row: u8,
        to_col: u8,
    },

    /// 走子方无子可动，对方直接获胜
    #[error("No legal moves, {winner} wins")]
    NoLegalMoves { winner: Color },
}

/// 协议错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// JSON 序列化错误
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// 规则引擎错误
    #[error("Game error: {0}")]
    Game(#[from] GameError),
}

/// 协议操作结果类型
pub type Result<T> = std::result::Result<T, ProtocolError>;
