//! 回合计时
//!
//! 每个回合单独计时，超过限时后由宿主层执行超时跳过。

use std::time::{Duration, Instant};

/// 回合计时器
#[derive(Debug, Clone)]
pub struct TurnClock {
    /// 每步限时
    limit: Duration,
    /// 当前回合开始时间
    turn_start: Instant,
}

impl TurnClock {
    pub fn new(limit: Duration, now: Instant) -> Self {
        Self {
            limit,
            turn_start: now,
        }
    }

    /// 当前回合剩余时间
    pub fn remaining(&self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.turn_start);
        self.limit.saturating_sub(elapsed)
    }

    /// 检查是否超时
    pub fn is_expired(&self, now: Instant) -> bool {
        self.remaining(now).is_zero()
    }

    /// 开始新回合
    pub fn restart(&mut self, now: Instant) {
        self.turn_start = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_initial() {
        let now = Instant::now();
        let clock = TurnClock::new(Duration::from_secs(30), now);

        assert_eq!(clock.remaining(now), Duration::from_secs(30));
        assert!(!clock.is_expired(now));
    }

    #[test]
    fn test_clock_expires() {
        let start = Instant::now();
        let clock = TurnClock::new(Duration::from_secs(10), start);

        assert_eq!(clock.remaining(start + Duration::from_secs(4)), Duration::from_secs(6));
        assert!(!clock.is_expired(start + Duration::from_secs(9)));
        assert!(clock.is_expired(start + Duration::from_secs(10)));
        assert!(clock.is_expired(start + Duration::from_secs(60)));
    }

    #[test]
    fn test_clock_restart() {
        let start = Instant::now();
        let mut clock = TurnClock::new(Duration::from_secs(10), start);

        let later = start + Duration::from_secs(12);
        assert!(clock.is_expired(later));

        clock.restart(later);
        assert!(!clock.is_expired(later));
        assert_eq!(clock.remaining(later + Duration::from_secs(3)), Duration::from_secs(7));
    }

    #[test]
    fn test_clock_before_start() {
        // 早于回合开始的时间点按未流逝处理
        let start = Instant::now() + Duration::from_secs(5);
        let clock = TurnClock::new(Duration::from_secs(10), start);

        assert_eq!(clock.remaining(Instant::now()), Duration::from_secs(10));
    }
}
