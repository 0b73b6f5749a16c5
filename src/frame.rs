use crate::browser::Session;
use crate::config::{Selectors, Timings};
use crate::error::Result;
use crate::wait::poll_until;

/// トップレベルに戻ってからレポートのフレームに入る
///
/// トップレベル遷移（履歴戻りなど）の後は必ず呼ぶこと。
/// フレームが現れなければ `Timeout`。
pub fn enter_content_frame<S: Session + ?Sized>(
    session: &mut S,
    selectors: &Selectors,
    timings: &Timings,
) -> Result<()> {
    session.switch_to_default()?;
    poll_until(timings.wait_timeout(), timings.poll_interval(), "content frame", || {
        Ok(session.switch_to_frame(&selectors.frame)?.then_some(()))
    })
}
