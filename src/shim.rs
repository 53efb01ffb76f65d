//! Shim module to abstract over std and loom primitives.
//!
//! Provides a unified interface for the synchronization primitives used by the
//! deferred core, transparently switching between the `std` implementation
//! (for production) and the `loom` implementation (for model checking).
//!
//! 用于在 std 和 loom 原语之间抽象的 shim 模块。
//!
//! 为 deferred 核心使用的同步原语提供统一接口，在 `std` 实现（生产环境）
//! 和 `loom` 实现（模型检查）之间透明切换。

#[cfg(not(feature = "loom"))]
pub mod atomic {
    pub use core::sync::atomic::*;
}

#[cfg(feature = "loom")]
pub mod atomic {
    pub use loom::sync::atomic::*;
}

#[cfg(not(feature = "loom"))]
pub mod cell {
    #[derive(Debug)]
    #[repr(transparent)]
    pub struct UnsafeCell<T: ?Sized>(core::cell::UnsafeCell<T>);

    impl<T> UnsafeCell<T> {
        #[inline]
        pub const fn new(data: T) -> UnsafeCell<T> {
            UnsafeCell(core::cell::UnsafeCell::new(data))
        }
    }

    impl<T: ?Sized> UnsafeCell<T> {
        #[inline]
        pub fn with<F, R>(&self, f: F) -> R
        where
            F: FnOnce(*const T) -> R,
        {
            f(self.0.get())
        }

        #[inline]
        pub fn with_mut<F, R>(&self, f: F) -> R
        where
            F: FnOnce(*mut T) -> R,
        {
            f(self.0.get())
        }
    }
}

#[cfg(feature = "loom")]
pub mod cell {
    pub use loom::cell::UnsafeCell;
}

#[cfg(not(feature = "loom"))]
pub mod sync {
    pub use std::sync::{Arc, Mutex};
}

#[cfg(feature = "loom")]
pub mod sync {
    pub use loom::sync::{Arc, Mutex};
}
