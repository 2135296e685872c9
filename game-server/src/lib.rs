//! 跳棋 / 国际象棋服务端
//!
//! 包含:
//! - 房间系统（按房间 ID 索引）
//! - 回合计时
//! - AI 集成（人机房间自动应着）
//! - 服务端配置

pub mod clock;
pub mod config;
pub mod error;
pub mod room;
pub mod server;

pub use clock::TurnClock;
pub use config::ServerConfig;
pub use error::ServerError;
pub use room::{Room, RoomManager};
pub use server::{RequestHandler, ServerState};
