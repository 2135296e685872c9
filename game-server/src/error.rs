//! 服务端错误类型

use protocol::{ErrorCode, GameError, RoomId, ServerResponse};
use thiserror::Error;

/// 服务端错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServerError {
    #[error("Room {0} already exists")]
    RoomExists(RoomId),

    #[error("Room {0} not found")]
    RoomNotFound(RoomId),

    #[error(transparent)]
    Game(#[from] GameError),
}

impl ServerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ServerError::RoomExists(_) => ErrorCode::RoomExists,
            ServerError::RoomNotFound(_) => ErrorCode::RoomNotFound,
            ServerError::Game(err) => ErrorCode::from(err),
        }
    }
}

impl From<&ServerError> for ServerResponse {
    fn from(err: &ServerError) -> Self {
        ServerResponse::error(err.code(), err.to_string())
    }
}
