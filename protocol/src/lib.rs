//! 跳棋 / 国际象棋共享协议库
//!
//! 包含:
//! - 棋子、棋盘、位置等核心数据结构
//! - 走法生成（伪合法走法）
//! - 对局状态机与走法执行
//! - 请求/响应消息类型 (ClientRequest, ServerResponse)

mod board;
mod constants;
mod error;
mod game;
mod message;
mod moves;
mod piece;

pub use board::Board;
pub use constants::*;
pub use error::{GameError, ProtocolError, Result};
pub use game::{GameState, GameStatus, MoveOutcome, TimeoutOutcome, TurnCheck};
pub use message::{
    AiReply, AiSettings, BoardSnapshot, ClientRequest, Coords, ErrorCode, RoomId, RoomInfo,
    RoomMode, ServerResponse, Strategy,
};
pub use moves::{Move, MoveGenerator};
pub use piece::{CheckersKind, ChessKind, Color, Piece, PieceKind, Position, Variant};
