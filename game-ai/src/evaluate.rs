//! 棋局评估函数

use protocol::{Board, Color};

/// 评估器
pub struct Evaluator;

impl Evaluator {
    /// 子力评估：己方子力之和减去对方子力之和
    ///
    /// 跳棋：普通棋子 1，王 2；国际象棋：兵 1，马象 3，车 5，后 9，王 200。
    pub fn material(board: &Board, perspective: Color) -> i32 {
        board
            .all_pieces()
            .into_iter()
            .map(|(_, piece)| {
                if piece.color == perspective {
                    piece.value()
                } else {
                    -piece.value()
                }
            })
            .sum()
    }
}
