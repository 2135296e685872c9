use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use game_server::{RequestHandler, ServerConfig, ServerState};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // 可选参数：配置文件路径
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = ServerConfig::load(config_path.as_deref())?;

    // 初始化日志（标准输出留给响应）
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(config.log_filter.parse()
                .with_context(|| format!("无效的日志过滤指令: {}", config.log_filter))?))
        .init();

    info!("棋类服务端启动中...");
    debug!("配置: {:?}", config);

    let mut state = ServerState::new(config);
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = line.context("读取标准输入失败")?;
        if line.trim().is_empty() {
            continue;
        }

        let response = RequestHandler::handle_line(&mut state, &line);
        writeln!(stdout, "{}", response.to_json()?)?;
        stdout.flush()?;
    }

    info!("输入结束，服务端退出 (房间数 {})", state.rooms.count());
    Ok(())
}
