//! 服务端配置
//!
//! JSON 文件，缺省字段使用默认值。

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use protocol::{AiSettings, Variant};
use serde::{Deserialize, Serialize};

/// 服务端配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 请求未指定游戏类型时使用
    pub default_variant: Variant,
    /// AI 走棋请求未指定策略/深度时使用
    pub default_ai: AiSettings,
    /// 每步限时（秒），None 表示不限时
    pub turn_time_limit_secs: Option<u64>,
    /// 日志过滤指令（EnvFilter 语法）
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            default_variant: Variant::Checkers,
            default_ai: AiSettings::default(),
            turn_time_limit_secs: None,
            log_filter: "game_server=info".to_string(),
        }
    }
}

impl ServerConfig {
    /// 默认配置文件路径
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("board-games");
            path.push("server.json");
            path
        })
    }

    /// 从指定文件加载
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {:?}", path))?;
        serde_json::from_str(&content).with_context(|| format!("解析配置文件失败: {:?}", path))
    }

    /// 加载配置
    ///
    /// 显式指定的路径必须存在；默认路径不存在时使用默认配置。
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// 每步限时
    pub fn turn_time_limit(&self) -> Option<Duration> {
        self.turn_time_limit_secs.map(Duration::from_secs)
    }
}
