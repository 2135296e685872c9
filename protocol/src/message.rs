//! 消息类型定义
//!
//! 宿主层与规则引擎之间的请求/响应约定，坐标一律为 `[row, col]`。

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_AI_DEPTH;
use crate::error::{GameError, Result};
use crate::game::{GameState, MoveOutcome, TimeoutOutcome};
use crate::moves::Move;
use crate::piece::{Color, Variant};

/// 房间 ID
pub type RoomId = String;

/// 坐标对 `[row, col]`
pub type Coords = [i32; 2];

/// AI 选步策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// 在全部合法走法中均匀随机
    Random,
    /// 优先随机选择吃子走法
    Greedy,
    /// Minimax + Alpha-Beta
    Minimax,
}

impl Strategy {
    /// 按名称解析，未知名称按随机策略处理
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "greedy" => Strategy::Greedy,
            "minimax" => Strategy::Minimax,
            _ => Strategy::Random,
        }
    }
}

/// AI 设置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub strategy: Strategy,
    /// 请求的搜索深度，超出范围的值在搜索前截断
    pub depth: i64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            strategy: Strategy::Minimax,
            depth: i64::from(DEFAULT_AI_DEPTH),
        }
    }
}

/// 房间类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RoomMode {
    /// 玩家对战
    #[default]
    #[serde(rename = "pvp")]
    PvP,
    /// 人机对战，AI 执 `ai_side`
    #[serde(rename = "pve")]
    PvE {
        ai_side: Color,
        #[serde(default)]
        settings: AiSettings,
    },
}

/// 客户端请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientRequest {
    /// 创建房间
    CreateRoom {
        room: RoomId,
        variant: Option<String>,
        #[serde(default)]
        mode: RoomMode,
    },
    /// 重开对局（整体替换对局状态）
    ResetRoom {
        room: RoomId,
        variant: Option<String>,
    },
    /// 关闭房间
    CloseRoom { room: RoomId },
    /// 获取房间列表
    ListRooms,
    /// 获取棋盘快照
    Board { room: RoomId },
    /// 获取合法走法
    LegalMoves { room: RoomId, color: Option<Color> },
    /// 走棋
    MakeMove {
        room: RoomId,
        start: Coords,
        end: Coords,
    },
    /// 计时器超时，跳过当前回合
    TimeoutTurn { room: RoomId },
    /// 让 AI 替当前走子方走一步
    AiMove {
        room: RoomId,
        strategy: Option<String>,
        depth: Option<i64>,
    },
}

impl ClientRequest {
    /// 从 JSON 解析
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// 棋盘快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub variant: Variant,
    /// 棋子代码网格，空格为 `""`
    pub board: Vec<Vec<String>>,
    pub turn: Color,
    pub winner: Option<Color>,
}

impl From<&GameState> for BoardSnapshot {
    fn from(game: &GameState) -> Self {
        Self {
            variant: game.variant(),
            board: game.board().to_codes(),
            turn: game.turn(),
            winner: game.winner(),
        }
    }
}

/// 房间信息（用于列表展示）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInfo {
    pub id: RoomId,
    pub variant: Variant,
    pub mode: RoomMode,
    pub turn: Color,
    pub winner: Option<Color>,
    /// RFC 3339 创建时间
    pub created_at: String,
}

/// AI 走棋结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum AiReply {
    /// AI 正常走了一步
    Moved {
        strategy: Strategy,
        outcome: MoveOutcome,
    },
    /// AI 无子可动，对方获胜
    NoLegalMoves { winner: Color },
}

/// 错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidVariant,
    OutOfBounds,
    NoPieceAtStart,
    GameOver,
    WrongTurn,
    IllegalMove,
    NoLegalMoves,
    RoomExists,
    RoomNotFound,
    BadRequest,
}

impl From<&GameError> for ErrorCode {
    fn from(err: &GameError) -> Self {
        match err {
            GameError::InvalidVariant { .. } => ErrorCode::InvalidVariant,
            GameError::OutOfBounds { .. } => ErrorCode::OutOfBounds,
            GameError::NoPieceAtStart { .. } => ErrorCode::NoPieceAtStart,
            GameError::GameOver => ErrorCode::GameOver,
            GameError::WrongTurn { .. } => ErrorCode::WrongTurn,
            GameError::IllegalMove { .. } => ErrorCode::IllegalMove,
            GameError::NoLegalMoves { .. } => ErrorCode::NoLegalMoves,
        }
    }
}

/// 服务端响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerResponse {
    /// 房间已创建 / 已重开（AI 执白时附带 AI 开局第一步）
    RoomReady {
        room: RoomId,
        mode: RoomMode,
        ai_move: Option<AiReply>,
        snapshot: BoardSnapshot,
    },
    /// 房间已关闭
    RoomClosed { room: RoomId },
    /// 房间列表
    RoomList { rooms: Vec<RoomInfo> },
    /// 棋盘快照
    Board { snapshot: BoardSnapshot },
    /// 合法走法
    LegalMoves { color: Color, moves: Vec<Move> },
    /// 玩家走棋结果（人机对战时附带 AI 应着）
    MoveMade {
        player_move: MoveOutcome,
        ai_move: Option<AiReply>,
        snapshot: BoardSnapshot,
    },
    /// 超时跳过结果（轮到 AI 时附带 AI 应着）
    TurnSkipped {
        timeout: TimeoutOutcome,
        ai_move: Option<AiReply>,
        snapshot: BoardSnapshot,
    },
    /// AI 走棋结果
    AiMoved {
        reply: AiReply,
        snapshot: BoardSnapshot,
    },
    /// 错误
    Error { code: ErrorCode, message: String },
}

impl ServerResponse {
    /// 由错误码和信息构造错误响应
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerResponse::Error {
            code,
            message: message.into(),
        }
    }

    /// 序列化为 JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<&GameError> for ServerResponse {
    fn from(err: &GameError) -> Self {
        ServerResponse::error(ErrorCode::from(err), err.to_string())
    }
}
