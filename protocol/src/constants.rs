//! 协议常量定义

/// 棋盘边长（行数 = 列数）
pub const BOARD_SIZE: usize = 8;

/// 棋盘格子总数
pub const SQUARE_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// 跳棋开局每方占据的行数
pub const CHECKERS_HOME_ROWS: usize = 3;

/// 搜索深度下限
pub const MIN_SEARCH_DEPTH: u8 = 1;

/// 国际象棋搜索深度上限（分支因子大，同步搜索只能浅搜）
pub const MAX_CHESS_DEPTH: u8 = 2;

/// 跳棋搜索深度上限
pub const MAX_CHECKERS_DEPTH: u8 = 4;

/// 默认 AI 搜索深度
pub const DEFAULT_AI_DEPTH: u8 = 2;

/// 胜负已分局面的评分（正无穷 / 负无穷）
pub const WIN_SCORE: i32 = 1_000_000_000;
