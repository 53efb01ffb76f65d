//! # lite-lazy
//!
//! Lightweight single-assignment deferred values for async Rust.
//!
//! 轻量级的 Rust 异步单次赋值延迟值库。
//!
//! ## Overview / 概述
//!
//! `lite-lazy` provides one primitive: the [`Deferred`] value, a container
//! that is created empty, resolved exactly once by any producer, and awaited
//! by any number of consumers, optionally bounded by a per-call timeout.
//!
//! `lite-lazy` 提供一个原语：[`Deferred`] 延迟值，即一个创建时为空、
//! 由任意生产者恰好解析一次、可被任意数量消费者等待的容器，并可为每次
//! 等待附加超时限制。
//!
//! ## Key Features / 主要特性
//!
//! - **Single assignment**: the first resolution wins; later attempts are
//!   idempotent no-ops
//! - **Broadcast wakeup**: one resolution wakes every awaiter exactly once,
//!   and late joiners complete immediately
//! - **Independent timeouts**: each [`Deferred::with_timeout`] call races its
//!   own deadline without touching the deferred or other awaiters
//! - **Lock-free fast paths**: atomic state machine for resolution and
//!   already-resolved reads; the waiter list is the only locked structure
//!
//! - **单次赋值**：首次解析胜出；后续尝试是幂等空操作
//! - **广播唤醒**：一次解析将每个等待者恰好唤醒一次，晚加入者立即完成
//! - **独立超时**：每次 [`Deferred::with_timeout`] 调用独立竞速自己的
//!   截止时间，不影响延迟值或其他等待者
//! - **无锁快速路径**：解析与已解析读取走原子状态机；等待者列表是唯一
//!   加锁的结构
//!
//! ## Modules / 模块
//!
//! ### [`deferred`]
//!
//! The [`Deferred`] core: atomic Pending → Resolved state machine, waiter
//! list, and the [`Wait`](deferred::Wait) future.
//!
//! [`Deferred`] 核心：原子 Pending → Resolved 状态机、等待者列表以及
//! [`Wait`](deferred::Wait) future。
//!
//! ### [`factory`]
//!
//! Typed constructors ([`factory::number`], [`factory::string`],
//! [`factory::boolean`], [`factory::array`], [`factory::signal`]), pure
//! type-parameter-fixing sugar over [`lazy`], plus the dynamically typed
//! [`factory::resolve`] entry point.
//!
//! 类型化构造器（[`lazy`] 之上固定类型参数的纯语法糖），以及动态类型的
//! [`factory::resolve`] 入口。
//!
//! ### [`timeout`]
//!
//! The timeout guard: [`Deferred::with_timeout`] and [`TimeoutError`].
//!
//! 超时守卫：[`Deferred::with_timeout`] 与 [`TimeoutError`]。
//!
//! ## Examples / 示例
//!
//! ### Produce on one task, consume on many
//!
//! ```
//! use lite_lazy::Deferred;
//!
//! # tokio_test::block_on(async {
//! let d = Deferred::<u32>::new();
//!
//! let a = d.clone();
//! let b = d.clone();
//! let consumers = vec![
//!     tokio::spawn(async move { a.wait().await }),
//!     tokio::spawn(async move { b.wait().await }),
//! ];
//!
//! d.resolve(42);
//!
//! for consumer in consumers {
//!     assert_eq!(consumer.await.unwrap(), 42);
//! }
//! # });
//! ```
//!
//! ### Typed constructors and the signal variant
//!
//! ```
//! use lite_lazy::factory;
//!
//! # tokio_test::block_on(async {
//! let ready = factory::signal();
//! let count = factory::number();
//!
//! let waiter = ready.clone();
//! tokio::spawn(async move {
//!     waiter.resolve(());
//! });
//!
//! ready.wait().await;
//! count.resolve(3.0);
//! assert_eq!(count.wait().await, 3.0);
//! # });
//! ```
//!
//! ### Awaiting with a deadline
//!
//! ```
//! use lite_lazy::Deferred;
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let d = Deferred::<u32>::new();
//!
//! // Nobody resolves in time: the guard fails, the deferred stays pending
//! let err = d.with_timeout(Duration::from_millis(5)).await.unwrap_err();
//! assert_eq!(err.as_millis(), 5);
//! assert!(!d.is_resolved());
//! # });
//! ```
//!
//! ## Safety / 安全性
//!
//! The deferred core uses `unsafe` internally for the inline value cell but
//! exposes a safe API. Safety is guaranteed through:
//!
//! 延迟值核心在内部为内联值单元使用 `unsafe`，但暴露安全的 API。
//! 安全性通过以下方式保证：
//!
//! - An atomic state machine granting the resolving producer exclusive write
//!   access and readers access only after the Release/Acquire handoff
//! - Mutex-serialized waiter registration with a state re-check under the
//!   lock, so no wakeup can be missed
//! - Loom model checking of the resolve/wait races (`--features loom`)
//!
//! - 原子状态机授予解析生产者独占写入权限，读取者仅在 Release/Acquire
//!   交接后访问
//! - 互斥锁串行化的等待者注册，并在锁内重新检查状态，因此不会丢失唤醒
//! - 对解析/等待竞争的 Loom 模型检查（`--features loom`）

mod shim;

pub mod deferred;
pub mod factory;
pub mod timeout;

pub use deferred::Deferred;
pub use factory::{lazy, InvalidTargetError};
pub use timeout::TimeoutError;
