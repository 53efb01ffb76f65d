//! Single-assignment deferred value with broadcast wakeup.
//!
//! A [`Deferred`] starts empty, is resolved at most once by any producer, and
//! can be awaited by any number of consumers before or after resolution.
//! Resolution is a single atomic state transition; every awaiter observes the
//! same value, and awaiters that join after resolution complete immediately.
//!
//! 带广播唤醒的单次赋值延迟值。
//!
//! [`Deferred`] 创建时为空，最多被任意生产者解析一次，并可在解析前后被
//! 任意数量的消费者等待。解析是单次原子状态转换；每个等待者观察到相同的值，
//! 解析后加入的等待者立即完成。

use std::fmt;
use std::future::Future;
use std::mem::MaybeUninit;
use std::pin::Pin;
use std::task::{Context, Poll, Waker};

use crate::shim::atomic::{AtomicU8, Ordering};
use crate::shim::cell::UnsafeCell;
use crate::shim::sync::{Arc, Mutex};

// States for the value cell
const PENDING: u8 = 0; // No value stored, waiters may register
const RESOLVING: u8 = 1; // A producer won the CAS and is writing the value
const RESOLVED: u8 = 2; // Value is published (terminal)

// ============================================================================
// Inner State
// ============================================================================

/// Waker slots for registered awaiters, drained exactly once on resolution.
///
/// A dropped awaiter clears its slot and pushes the index onto the free list,
/// so a long-pending deferred does not accumulate tombstones across abandoned
/// awaits (expired timeout guards in a retry loop, for example).
///
/// 已注册等待者的 waker 槽位，在解析时恰好排空一次。
///
/// 被丢弃的等待者会清空其槽位并将索引压入空闲列表，因此长期待定的延迟值
/// 不会因被放弃的等待（例如重试循环中超时的守卫）而累积墓碑槽位。
#[derive(Default)]
struct WaiterList {
    slots: Vec<Option<Waker>>,
    free: Vec<usize>,
}

/// Shared state behind every handle to one deferred value.
///
/// 每个延迟值句柄背后的共享状态。
struct Inner<T> {
    state: AtomicU8,
    value: UnsafeCell<MaybeUninit<T>>,
    waiters: Mutex<WaiterList>,
}

// SAFETY: Inner<T> is Send when T is Send: the value moves in through resolve
// and out through clone. It is Sync only when T is also Sync, because once
// RESOLVED multiple awaiters clone from a shared reference concurrently.
// The UnsafeCell is protected by the atomic state machine: the single writer
// holds RESOLVING exclusively, and readers only touch the cell after an
// Acquire load of RESOLVED.
unsafe impl<T: Send> Send for Inner<T> {}
unsafe impl<T: Send + Sync> Sync for Inner<T> {}

impl<T> Inner<T> {
    #[inline]
    fn new() -> Self {
        Self {
            state: AtomicU8::new(PENDING),
            value: UnsafeCell::new(MaybeUninit::uninit()),
            waiters: Mutex::new(WaiterList::default()),
        }
    }

    #[inline]
    fn is_resolved(&self) -> bool {
        self.state.load(Ordering::Acquire) == RESOLVED
    }

    /// Attempt the Pending -> Resolved transition, waking all waiters.
    ///
    /// Returns `false` without side effects if another producer already won.
    ///
    /// 尝试 Pending -> Resolved 转换，唤醒所有等待者。
    /// 如果其他生产者已经胜出，则无副作用地返回 `false`。
    fn resolve(&self, value: T) -> bool {
        if self
            .state
            .compare_exchange(PENDING, RESOLVING, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            // First resolution wins; the losing value is dropped here.
            return false;
        }

        // SAFETY: The CAS above grants exclusive write access to the cell.
        self.value.with_mut(|v| unsafe {
            (*v).write(value);
        });
        self.state.store(RESOLVED, Ordering::Release);

        // Drain the waiter list exactly once. Registrations racing with this
        // drain either land in the list before we take it (and get woken
        // here) or observe RESOLVED under the lock and never register.
        let waiters = {
            let mut waiters = self.waiters.lock().unwrap();
            std::mem::take(&mut *waiters)
        };
        for waker in waiters.slots.into_iter().flatten() {
            waker.wake();
        }
        true
    }

    /// Clone the stored value out of the cell.
    ///
    /// 从单元中克隆出已存储的值。
    #[inline]
    fn clone_value(&self) -> T
    where
        T: Clone,
    {
        // SAFETY: Only called after an Acquire load observed RESOLVED, which
        // happens-after the value write. Readers share the value immutably.
        self.value.with(|v| unsafe { (*v).assume_init_ref().clone() })
    }
}

impl<T> Drop for Inner<T> {
    fn drop(&mut self) {
        // Clean up the value if it was resolved but the payload type owns heap
        if self.state.load(Ordering::Acquire) == RESOLVED {
            self.value.with_mut(|v| unsafe {
                (*v).assume_init_drop();
            });
        }
    }
}

impl<T> fmt::Debug for Inner<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inner").finish_non_exhaustive()
    }
}

// ============================================================================
// Deferred Handle
// ============================================================================

/// A single-assignment container for a future result.
///
/// Resolvable at most once, awaitable by multiple consumers. Handles are
/// cheaply cloneable and all clones refer to the same underlying instance;
/// resolution through any handle is observed by awaiters on every handle.
///
/// 未来结果的单次赋值容器。
///
/// 最多可解析一次，可被多个消费者等待。句柄可廉价克隆，所有克隆都指向
/// 同一底层实例；通过任一句柄的解析会被所有句柄上的等待者观察到。
///
/// # Example
///
/// ```
/// use lite_lazy::Deferred;
///
/// # tokio_test::block_on(async {
/// let d = Deferred::<u32>::new();
/// let waiter = d.clone();
///
/// tokio::spawn(async move {
///     waiter.resolve(42);
/// });
///
/// assert_eq!(d.wait().await, 42);
/// # });
/// ```
pub struct Deferred<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Deferred<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Deferred<T> {
    /// Create a new deferred value in the pending state with zero waiters.
    ///
    /// 创建一个处于待定状态、零等待者的新延迟值。
    #[inline]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner::new()),
        }
    }

    /// Resolve the deferred value, waking every current awaiter.
    ///
    /// Returns `true` if this call performed the resolution. Resolving an
    /// already-resolved instance is an idempotent no-op: it returns `false`,
    /// drops `value`, and never re-fires waiters: the first resolution wins.
    ///
    /// This never suspends and may be called from any execution context,
    /// including timer callbacks.
    ///
    /// 解析延迟值，唤醒当前所有等待者。
    ///
    /// 如果本次调用完成了解析则返回 `true`。对已解析实例再次解析是幂等的
    /// 空操作：返回 `false`，丢弃 `value`，且绝不重新触发等待者，首次
    /// 解析胜出。
    #[inline]
    pub fn resolve(&self, value: T) -> bool {
        self.inner.resolve(value)
    }

    /// Check whether the value has been resolved.
    ///
    /// 检查值是否已被解析。
    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.inner.is_resolved()
    }

    /// Returns `true` if both handles refer to the same underlying instance.
    ///
    /// Resolution is scoped to exactly the instance a handle was created
    /// from; clones of one handle all denote that instance.
    ///
    /// 如果两个句柄指向同一底层实例则返回 `true`。
    #[inline]
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Clone> Deferred<T> {
    /// Wait for the value asynchronously.
    ///
    /// Suspends until the deferred is resolved, then yields a clone of the
    /// stored value. Awaiting an already-resolved deferred returns immediately
    /// without suspension, and any number of concurrent awaiters all observe
    /// the same resolution.
    ///
    /// A deferred that is never resolved pends forever; bound the wait with
    /// [`with_timeout`](Deferred::with_timeout) when a deadline is needed.
    ///
    /// 异步等待值。
    ///
    /// 挂起直到延迟值被解析，然后产出所存储值的克隆。等待已解析的延迟值
    /// 会立即返回而不挂起，任意数量的并发等待者都观察到同一次解析。
    #[inline]
    pub fn wait(&self) -> Wait<'_, T> {
        Wait {
            deferred: self,
            slot: None,
        }
    }

    /// Try to read the value without suspending.
    ///
    /// Returns `None` while pending.
    ///
    /// 尝试读取值而不挂起。待定时返回 `None`。
    #[inline]
    pub fn try_get(&self) -> Option<T> {
        if self.inner.is_resolved() {
            Some(self.inner.clone_value())
        } else {
            None
        }
    }
}

impl<T> Default for Deferred<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

// ============================================================================
// Wait Future
// ============================================================================

/// Future returned by [`Deferred::wait`].
///
/// Each `Wait` owns one waker slot in the deferred's waiter list; re-polling
/// updates the slot in place so a single awaiter is never woken twice, and
/// dropping a pending `Wait` clears its slot and releases it for reuse by a
/// later awaiter.
///
/// [`Deferred::wait`] 返回的 Future。
///
/// 每个 `Wait` 在等待者列表中占有一个 waker 槽位；重新轮询会原地更新槽位，
/// 因此单个等待者不会被唤醒两次，丢弃待定的 `Wait` 会清除其槽位并释放给
/// 之后的等待者复用。
pub struct Wait<'a, T> {
    deferred: &'a Deferred<T>,
    slot: Option<usize>,
}

impl<T> Unpin for Wait<'_, T> {}

impl<T: Clone> Future for Wait<'_, T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let this = self.get_mut();
        let inner = &this.deferred.inner;

        // Fast path: already resolved, no registration needed
        if inner.is_resolved() {
            return Poll::Ready(inner.clone_value());
        }

        // Slow path: register (or refresh) our waker slot. The state is
        // re-checked under the lock: the resolver publishes RESOLVED before
        // draining the list, so either our waker lands in the list before the
        // drain, or we observe RESOLVED here. No wakeup can be missed.
        {
            let mut waiters = inner.waiters.lock().unwrap();
            if inner.is_resolved() {
                drop(waiters);
                return Poll::Ready(inner.clone_value());
            }
            match this.slot {
                Some(index) => waiters.slots[index] = Some(cx.waker().clone()),
                None => {
                    let waker = Some(cx.waker().clone());
                    let index = match waiters.free.pop() {
                        Some(index) => {
                            waiters.slots[index] = waker;
                            index
                        }
                        None => {
                            waiters.slots.push(waker);
                            waiters.slots.len() - 1
                        }
                    };
                    this.slot = Some(index);
                }
            }
        }

        Poll::Pending
    }
}

impl<T> Drop for Wait<'_, T> {
    fn drop(&mut self) {
        if let Some(index) = self.slot {
            // Clear our slot so resolution does not wake a dead awaiter, and
            // free the index so abandoned awaits do not grow the list.
            // After the drain the list is empty and there is nothing to clear.
            if let Ok(mut waiters) = self.deferred.inner.waiters.lock() {
                if let Some(slot) = waiters.slots.get_mut(index) {
                    *slot = None;
                    waiters.free.push(index);
                }
            }
        }
    }
}

impl<T> fmt::Debug for Wait<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wait")
            .field("registered", &self.slot.is_some())
            .finish()
    }
}
