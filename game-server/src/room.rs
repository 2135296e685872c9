//! 房间系统
//!
//! 每个房间独占一局对局，按房间 ID 索引。人机房间在轮到 AI 时自动应着。

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use game_ai::AiEngine;
use protocol::{
    AiReply, AiSettings, BoardSnapshot, Color, Coords, GameError, GameState, Move, MoveOutcome,
    Position, RoomId, RoomInfo, RoomMode, TimeoutOutcome, Variant,
};
use tracing::{debug, info, warn};

use crate::clock::TurnClock;
use crate::error::ServerError;

/// 房间
#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub mode: RoomMode,
    /// 对局状态
    pub game: GameState,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 回合计时器（未设置限时则为 None）
    clock: Option<TurnClock>,
}

impl Room {
    /// 创建新房间（标准开局）
    pub fn new(id: RoomId, variant: Variant, mode: RoomMode) -> Self {
        Self::with_game(id, GameState::new(variant), mode)
    }

    /// 使用指定对局创建房间
    pub fn with_game(id: RoomId, game: GameState, mode: RoomMode) -> Self {
        Self {
            id,
            mode,
            game,
            created_at: Utc::now(),
            clock: None,
        }
    }

    /// 启用每步限时
    pub fn with_turn_limit(mut self, limit: Duration) -> Self {
        self.clock = Some(TurnClock::new(limit, Instant::now()));
        self
    }

    /// 获取房间信息（用于列表展示）
    pub fn info(&self) -> RoomInfo {
        RoomInfo {
            id: self.id.clone(),
            variant: self.game.variant(),
            mode: self.mode,
            turn: self.game.turn(),
            winner: self.game.winner(),
            created_at: self.created_at.to_rfc3339(),
        }
    }

    /// 棋盘快照
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::from(&self.game)
    }

    /// 当前回合剩余时间
    pub fn turn_remaining(&self, now: Instant) -> Option<Duration> {
        self.clock.as_ref().map(|clock| clock.remaining(now))
    }

    /// 重开对局，整体替换对局状态
    pub fn reset(&mut self, variant: Variant) -> Option<AiReply> {
        self.game = GameState::new(variant);
        self.restart_clock();
        info!("房间 {} 重开 ({})", self.id, variant);
        self.take_ai_turn()
    }

    /// 合法走法，未指定颜色时为当前走子方
    pub fn legal_moves(&self, color: Option<Color>) -> Vec<Move> {
        self.game.legal_moves(color)
    }

    /// 玩家走棋，人机房间随后由 AI 应着
    pub fn make_move(
        &mut self,
        start: Coords,
        end: Coords,
    ) -> Result<(MoveOutcome, Option<AiReply>), GameError> {
        let from = Position::from_coords(start[0], start[1])?;
        let to = Position::from_coords(end[0], end[1])?;

        let outcome = self.game.apply_move(from, to)?;
        self.restart_clock();
        debug!("房间 {}: {} 走 {} -> {}", self.id, outcome.piece.color, from, to);

        let reply = self.take_ai_turn();
        Ok((outcome, reply))
    }

    /// 超时跳过当前回合，轮到 AI 时由 AI 应着
    pub fn timeout_turn(&mut self) -> Result<(TimeoutOutcome, Option<AiReply>), GameError> {
        let timeout = self.game.timeout_turn()?;
        self.restart_clock();
        info!("房间 {}: {} 超时", self.id, timeout.skipped);

        let reply = self.take_ai_turn();
        Ok((timeout, reply))
    }

    /// 回合超时检查，超时则执行跳过
    pub fn expire_turn(&mut self, now: Instant) -> Option<(TimeoutOutcome, Option<AiReply>)> {
        let expired = self.clock.as_ref().is_some_and(|clock| clock.is_expired(now));
        if !expired || self.game.is_finished() {
            return None;
        }
        self.timeout_turn().ok()
    }

    /// 让 AI 替当前走子方走一步
    pub fn ai_move(&mut self, settings: AiSettings) -> Result<AiReply, GameError> {
        let mut engine = AiEngine::new(settings.into());
        let reply = match engine.ai_move(&mut self.game) {
            Ok(outcome) => AiReply::Moved {
                strategy: settings.strategy,
                outcome,
            },
            Err(GameError::NoLegalMoves { winner }) => AiReply::NoLegalMoves { winner },
            Err(err) => return Err(err),
        };
        self.restart_clock();
        Ok(reply)
    }

    /// 人机房间且轮到 AI 时，AI 走一步
    pub fn take_ai_turn(&mut self) -> Option<AiReply> {
        let RoomMode::PvE { ai_side, settings } = self.mode else {
            return None;
        };
        if self.game.is_finished() || self.game.turn() != ai_side {
            return None;
        }

        match self.ai_move(settings) {
            Ok(reply) => Some(reply),
            Err(err) => {
                warn!("房间 {} AI 应着失败: {}", self.id, err);
                None
            }
        }
    }

    fn restart_clock(&mut self) {
        if let Some(clock) = self.clock.as_mut() {
            clock.restart(Instant::now());
        }
    }
}

/// 房间管理器
#[derive(Debug, Default)]
pub struct RoomManager {
    rooms: HashMap<RoomId, Room>,
    /// 新房间的每步限时
    turn_limit: Option<Duration>,
}

impl RoomManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_turn_limit(turn_limit: Option<Duration>) -> Self {
        Self {
            rooms: HashMap::new(),
            turn_limit,
        }
    }

    /// 创建房间，ID 已存在时失败
    pub fn create(
        &mut self,
        id: RoomId,
        variant: Variant,
        mode: RoomMode,
    ) -> Result<&mut Room, ServerError> {
        match self.rooms.entry(id) {
            Entry::Occupied(entry) => Err(ServerError::RoomExists(entry.key().clone())),
            Entry::Vacant(entry) => {
                let mut room = Room::new(entry.key().clone(), variant, mode);
                if let Some(limit) = self.turn_limit {
                    room = room.with_turn_limit(limit);
                }
                info!("创建房间 {} ({}, {:?})", room.id, variant, mode);
                Ok(entry.insert(room))
            }
        }
    }

    /// 获取房间
    pub fn get(&self, id: &str) -> Result<&Room, ServerError> {
        self.rooms
            .get(id)
            .ok_or_else(|| ServerError::RoomNotFound(id.to_string()))
    }

    /// 获取可变房间
    pub fn get_mut(&mut self, id: &str) -> Result<&mut Room, ServerError> {
        self.rooms
            .get_mut(id)
            .ok_or_else(|| ServerError::RoomNotFound(id.to_string()))
    }

    /// 移除房间
    pub fn remove(&mut self, id: &str) -> Result<Room, ServerError> {
        let room = self
            .rooms
            .remove(id)
            .ok_or_else(|| ServerError::RoomNotFound(id.to_string()))?;
        info!("关闭房间 {}", id);
        Ok(room)
    }

    /// 重开房间对局，未指定游戏类型时沿用原类型
    pub fn reset(
        &mut self,
        id: &str,
        variant: Option<Variant>,
    ) -> Result<(&Room, Option<AiReply>), ServerError> {
        let room = self.get_mut(id)?;
        let variant = variant.unwrap_or_else(|| room.game.variant());
        let reply = room.reset(variant);
        Ok((&*room, reply))
    }

    /// 房间列表（按 ID 排序）
    pub fn list(&self) -> Vec<RoomInfo> {
        let mut rooms: Vec<RoomInfo> = self.rooms.values().map(Room::info).collect();
        rooms.sort_by(|a, b| a.id.cmp(&b.id));
        rooms
    }

    /// 获取房间数量
    pub fn count(&self) -> usize {
        self.rooms.len()
    }
}
