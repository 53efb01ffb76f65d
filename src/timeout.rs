//! Timeout guard for awaiting a deferred value with a deadline.
//!
//! Races the resolution of a [`Deferred`] against an independent deadline
//! timer. The guard only gives up waiting from the caller's perspective: the
//! underlying deferred is never mutated or cancelled by an expiry and may
//! still resolve later for other awaiters.
//!
//! 带截止时间等待延迟值的超时守卫。
//!
//! 将 [`Deferred`] 的解析与独立的截止时间计时器竞速。守卫只是让调用者
//! 放弃等待：底层延迟值不会因超时而被修改或取消，之后仍可为其他等待者
//! 解析。

use std::time::Duration;

use thiserror::Error;

use crate::deferred::Deferred;

/// Error returned when the deadline elapses before the deferred resolves.
///
/// Carries the configured timeout budget for diagnostics. Recoverable: the
/// caller may race again with a fresh deadline, fall back to a default, or
/// propagate.
///
/// 截止时间在延迟值解析之前到期时返回的错误。
///
/// 携带配置的超时预算用于诊断。可恢复：调用者可以用新的截止时间重新竞速、
/// 回退到默认值或向上传播。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("timeout of {}ms exceeded while awaiting deferred value", .duration.as_millis())]
pub struct TimeoutError {
    duration: Duration,
}

impl TimeoutError {
    #[inline]
    pub(crate) fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// The configured timeout budget.
    ///
    /// 配置的超时预算。
    #[inline]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// The configured timeout budget in whole milliseconds.
    ///
    /// 配置的超时预算（整毫秒）。
    #[inline]
    pub fn as_millis(&self) -> u128 {
        self.duration.as_millis()
    }
}

impl<T: Clone> Deferred<T> {
    /// Wait for the value, failing if it does not resolve within `timeout`.
    ///
    /// Each call starts its own deadline clock when the guard begins
    /// executing; concurrent guards on the same instance race independently
    /// and never interfere with one another's timers or outcomes. Whichever
    /// side loses the race is dropped, releasing its timer.
    ///
    /// A [`Duration::ZERO`] deadline on a pending deferred fails immediately;
    /// an already-resolved deferred still returns its value.
    ///
    /// 等待值，若在 `timeout` 内未解析则失败。
    ///
    /// 每次调用在守卫开始执行时启动自己的截止时钟；同一实例上的并发守卫
    /// 独立竞速，互不影响对方的计时器或结果。竞速失败的一方被丢弃，其
    /// 计时器随之释放。
    ///
    /// # Example
    ///
    /// ```
    /// use lite_lazy::Deferred;
    /// use std::time::Duration;
    ///
    /// # tokio_test::block_on(async {
    /// let d = Deferred::<u32>::new();
    ///
    /// let err = d.with_timeout(Duration::from_millis(5)).await.unwrap_err();
    /// assert_eq!(err.as_millis(), 5);
    ///
    /// // The deferred itself is untouched and can still resolve
    /// d.resolve(9);
    /// assert_eq!(d.with_timeout(Duration::from_millis(5)).await, Ok(9));
    /// # });
    /// ```
    pub async fn with_timeout(&self, timeout: Duration) -> Result<T, TimeoutError> {
        match tokio::time::timeout(timeout, self.wait()).await {
            Ok(value) => Ok(value),
            Err(_elapsed) => Err(TimeoutError::new(timeout)),
        }
    }
}
