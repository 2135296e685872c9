//! 服务器主逻辑
//!
//! 同步处理请求：每个请求对应一个响应，所有失败都转换为错误响应。

use std::time::Instant;

use protocol::{
    AiReply, AiSettings, ClientRequest, Color, Coords, ErrorCode, RoomId, RoomMode, ServerResponse,
    Strategy, Variant,
};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::room::{Room, RoomManager};

/// 服务器状态
#[derive(Debug)]
pub struct ServerState {
    pub rooms: RoomManager,
    pub config: ServerConfig,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            rooms: RoomManager::with_turn_limit(config.turn_time_limit()),
            config,
        }
    }

    /// 解析游戏类型，未指定时使用配置默认值
    fn variant(&self, name: Option<String>) -> Result<Variant, ServerError> {
        match name {
            Some(name) => Ok(name.parse()?),
            None => Ok(self.config.default_variant),
        }
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

/// 请求处理器
pub struct RequestHandler;

impl RequestHandler {
    /// 处理一行 JSON 请求
    pub fn handle_line(state: &mut ServerState, line: &str) -> ServerResponse {
        match ClientRequest::from_json(line) {
            Ok(request) => Self::handle(state, request),
            Err(err) => {
                warn!("无法解析请求: {}", err);
                ServerResponse::error(ErrorCode::BadRequest, err.to_string())
            }
        }
    }

    /// 处理客户端请求
    pub fn handle(state: &mut ServerState, request: ClientRequest) -> ServerResponse {
        debug!("收到请求: {:?}", request);

        let result = match request {
            ClientRequest::CreateRoom { room, variant, mode } => {
                Self::handle_create_room(state, room, variant, mode)
            }
            ClientRequest::ResetRoom { room, variant } => {
                Self::handle_reset_room(state, room, variant)
            }
            ClientRequest::CloseRoom { room } => Self::handle_close_room(state, room),
            ClientRequest::ListRooms => Ok(ServerResponse::RoomList {
                rooms: state.rooms.list(),
            }),
            ClientRequest::Board { room } => Self::handle_board(state, &room),
            ClientRequest::LegalMoves { room, color } => {
                Self::handle_legal_moves(state, &room, color)
            }
            ClientRequest::MakeMove { room, start, end } => {
                Self::handle_make_move(state, &room, start, end)
            }
            ClientRequest::TimeoutTurn { room } => Self::handle_timeout_turn(state, &room),
            ClientRequest::AiMove {
                room,
                strategy,
                depth,
            } => Self::handle_ai_move(state, &room, strategy, depth),
        };

        result.unwrap_or_else(|err| {
            warn!("请求失败: {}", err);
            ServerResponse::from(&err)
        })
    }

    fn handle_create_room(
        state: &mut ServerState,
        room_id: RoomId,
        variant: Option<String>,
        mode: RoomMode,
    ) -> Result<ServerResponse, ServerError> {
        let variant = state.variant(variant)?;
        let room = state.rooms.create(room_id, variant, mode)?;
        let ai_move = room.take_ai_turn();

        Ok(Self::room_ready(room, ai_move))
    }

    fn handle_reset_room(
        state: &mut ServerState,
        room_id: RoomId,
        variant: Option<String>,
    ) -> Result<ServerResponse, ServerError> {
        let variant = variant.map(|name| name.parse::<Variant>()).transpose()?;
        let (room, ai_move) = state.rooms.reset(&room_id, variant)?;

        Ok(Self::room_ready(room, ai_move))
    }

    fn handle_close_room(
        state: &mut ServerState,
        room_id: RoomId,
    ) -> Result<ServerResponse, ServerError> {
        let room = state.rooms.remove(&room_id)?;
        Ok(ServerResponse::RoomClosed { room: room.id })
    }

    fn handle_board(state: &ServerState, room_id: &str) -> Result<ServerResponse, ServerError> {
        let room = state.rooms.get(room_id)?;
        Ok(ServerResponse::Board {
            snapshot: room.snapshot(),
        })
    }

    fn handle_legal_moves(
        state: &ServerState,
        room_id: &str,
        color: Option<Color>,
    ) -> Result<ServerResponse, ServerError> {
        let room = state.rooms.get(room_id)?;
        let color = color.unwrap_or_else(|| room.game.turn());

        Ok(ServerResponse::LegalMoves {
            color,
            moves: room.legal_moves(Some(color)),
        })
    }

    fn handle_make_move(
        state: &mut ServerState,
        room_id: &str,
        start: Coords,
        end: Coords,
    ) -> Result<ServerResponse, ServerError> {
        let room = state.rooms.get_mut(room_id)?;
        if let Some(skipped) = Self::expire_turn(room) {
            return Ok(skipped);
        }

        let (player_move, ai_move) = room.make_move(start, end)?;
        Ok(ServerResponse::MoveMade {
            player_move,
            ai_move,
            snapshot: room.snapshot(),
        })
    }

    fn handle_timeout_turn(
        state: &mut ServerState,
        room_id: &str,
    ) -> Result<ServerResponse, ServerError> {
        let room = state.rooms.get_mut(room_id)?;
        let (timeout, ai_move) = room.timeout_turn()?;

        Ok(ServerResponse::TurnSkipped {
            timeout,
            ai_move,
            snapshot: room.snapshot(),
        })
    }

    fn handle_ai_move(
        state: &mut ServerState,
        room_id: &str,
        strategy: Option<String>,
        depth: Option<i64>,
    ) -> Result<ServerResponse, ServerError> {
        let defaults = state.config.default_ai;
        let settings = AiSettings {
            strategy: strategy
                .map(|name| Strategy::from_name(&name))
                .unwrap_or(defaults.strategy),
            depth: depth.unwrap_or(defaults.depth),
        };

        let room = state.rooms.get_mut(room_id)?;
        if let Some(skipped) = Self::expire_turn(room) {
            return Ok(skipped);
        }

        let reply = room.ai_move(settings)?;
        Ok(ServerResponse::AiMoved {
            reply,
            snapshot: room.snapshot(),
        })
    }

    /// 当前回合已超时则先执行跳过，请求本身不再处理
    fn expire_turn(room: &mut Room) -> Option<ServerResponse> {
        let (timeout, ai_move) = room.expire_turn(Instant::now())?;
        info!("房间 {}: {} 回合超时，请求未执行", room.id, timeout.skipped);

        Some(ServerResponse::TurnSkipped {
            timeout,
            ai_move,
            snapshot: room.snapshot(),
        })
    }

    fn room_ready(room: &Room, ai_move: Option<AiReply>) -> ServerResponse {
        ServerResponse::RoomReady {
            room: room.id.clone(),
            mode: room.mode,
            ai_move,
            snapshot: room.snapshot(),
        }
    }
}
