//! 上限付きポーリング

use crate::error::{Result, ScrapeError};
use std::thread;
use std::time::{Duration, Instant};

/// `probe` が `Some` を返すまで `interval` 間隔で繰り返す
///
/// 参照切れ（StaleElement）は「まだ準備できていない」とみなして続行する。
/// それ以外のエラーはそのまま返し、`timeout` を超えたら `Timeout`。
pub fn poll_until<T, F>(timeout: Duration, interval: Duration, what: &str, mut probe: F) -> Result<T>
where
    F: FnMut() -> Result<Option<T>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        match probe() {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(ScrapeError::StaleElement(detail)) => {
                tracing::trace!(what, %detail, "stale while polling");
            }
            Err(e) => return Err(e),
        }

        if Instant::now() >= deadline {
            return Err(ScrapeError::Timeout(format!("{} ({}ms)", what, timeout.as_millis())));
        }
        thread::sleep(interval);
    }
}

/// 固定待機（0なら何もしない）
pub fn settle(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}
