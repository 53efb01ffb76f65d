//! Typed constructors and the dynamic resolve entry point.
//!
//! The helpers here are pure syntactic sugar over [`lazy`]: each one fixes the
//! type parameter as call-site documentation and changes nothing at runtime.
//! No runtime type checking of the eventual resolved value happens anywhere;
//! type safety is a compile-time contract only.
//!
//! 类型化构造器与动态解析入口。
//!
//! 这里的辅助函数是 [`lazy`] 之上的纯语法糖：每个函数只固定类型参数作为
//! 调用处的文档，运行时行为完全相同。任何地方都不会对最终解析的值做运行时
//! 类型检查；类型安全仅是编译期契约。

use std::any::{type_name, Any};

use thiserror::Error;

use crate::deferred::Deferred;

/// Error returned when the dynamic resolver is handed something that is not
/// a deferred handle of the expected payload type.
///
/// This is a programmer-error signal (a contract violation), surfaced
/// immediately and never retried.
///
/// 当动态解析器收到的不是预期载荷类型的延迟值句柄时返回的错误。
///
/// 这是程序员错误信号（契约违规），立即暴露且不会重试。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot resolve a non-deferred value: expected a handle of type Deferred<{expected}>")]
pub struct InvalidTargetError {
    expected: &'static str,
}

impl InvalidTargetError {
    fn new<T>() -> Self {
        Self {
            expected: type_name::<T>(),
        }
    }

    /// Name of the payload type the resolver expected.
    ///
    /// 解析器期望的载荷类型名称。
    pub fn expected(&self) -> &'static str {
        self.expected
    }
}

/// Create a deferred value with an unconstrained payload type.
///
/// 创建载荷类型不受约束的延迟值。
///
/// # Example
///
/// ```
/// use lite_lazy::factory;
///
/// # tokio_test::block_on(async {
/// let d = factory::lazy::<u32>();
/// d.resolve(1);
/// assert_eq!(d.wait().await, 1);
/// # });
/// ```
#[inline]
pub fn lazy<T>() -> Deferred<T> {
    Deferred::new()
}

/// Create a deferred value that should resolve to a number.
///
/// 创建应解析为数字的延迟值。
#[inline]
pub fn number() -> Deferred<f64> {
    lazy()
}

/// Create a deferred value that should resolve to a string.
///
/// 创建应解析为字符串的延迟值。
#[inline]
pub fn string() -> Deferred<String> {
    lazy()
}

/// Create a deferred value that should resolve to a boolean.
///
/// 创建应解析为布尔值的延迟值。
#[inline]
pub fn boolean() -> Deferred<bool> {
    lazy()
}

/// Create a deferred value that should resolve to an array.
///
/// 创建应解析为数组的延迟值。
#[inline]
pub fn array<T>() -> Deferred<Vec<T>> {
    lazy()
}

/// Create a deferred value that resolves to nothing: a completion signal.
///
/// 创建不携带任何值的延迟值，仅作完成信号。
#[inline]
pub fn signal() -> Deferred<()> {
    lazy()
}

/// Resolve a deferred value through a dynamically typed handle.
///
/// Downcasts `target` to [`Deferred<T>`] and resolves it with `value`. Fails
/// with [`InvalidTargetError`] if `target` is anything else, including a
/// deferred of a different payload type. Resolving an already-resolved
/// instance through this path is still `Ok(())`: the idempotent no-op rule of
/// [`Deferred::resolve`] applies unchanged.
///
/// Statically typed call sites should prefer [`Deferred::resolve`] directly;
/// this entry point exists for call sites that only hold an erased handle.
///
/// 通过动态类型句柄解析延迟值。
///
/// 将 `target` 向下转型为 [`Deferred<T>`] 并用 `value` 解析。如果 `target`
/// 是其他任何类型（包括载荷类型不同的延迟值），则以 [`InvalidTargetError`]
/// 失败。通过此路径解析已解析的实例仍返回 `Ok(())`：[`Deferred::resolve`]
/// 的幂等空操作规则不变。
///
/// # Example
///
/// ```
/// use lite_lazy::factory;
///
/// let d = factory::number();
/// factory::resolve(&d, 123.0).unwrap();
///
/// assert!(factory::resolve(&"not deferred", 1.0).is_err());
/// ```
pub fn resolve<T: 'static>(target: &dyn Any, value: T) -> Result<(), InvalidTargetError> {
    let Some(deferred) = target.downcast_ref::<Deferred<T>>() else {
        return Err(InvalidTargetError::new::<T>());
    };
    deferred.resolve(value);
    Ok(())
}

/// Resolve a signal deferred with no payload.
///
/// The value-omitted overload of [`resolve`], valid only for the
/// [`signal`] variant.
///
/// [`resolve`] 的省略值重载，仅对 [`signal`] 变体有效。
#[inline]
pub fn resolve_signal(target: &dyn Any) -> Result<(), InvalidTargetError> {
    resolve(target, ())
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;

    #[test]
    fn test_helpers_create_pending_values() {
        assert!(!lazy::<u8>().is_resolved());
        assert!(!number().is_resolved());
        assert!(!string().is_resolved());
        assert!(!boolean().is_resolved());
        assert!(!array::<u8>().is_resolved());
        assert!(!signal().is_resolved());
    }

    #[tokio::test]
    async fn test_typed_variants_resolve() {
        let anything = lazy::<&'static str>();
        let number = number();
        let string = string();
        let boolean = boolean();
        let array = array::<i32>();
        let signal = signal();

        resolve(&anything, "anything").unwrap();
        resolve(&number, 123.0).unwrap();
        resolve(&string, "string".to_string()).unwrap();
        resolve(&boolean, true).unwrap();
        resolve(&array, vec![1, 2, 3]).unwrap();
        resolve_signal(&signal).unwrap();

        assert_eq!(anything.wait().await, "anything");
        assert_eq!(number.wait().await, 123.0);
        assert_eq!(string.wait().await, "string");
        assert!(boolean.wait().await);
        assert_eq!(array.wait().await, vec![1, 2, 3]);
        signal.wait().await;
        assert!(signal.is_resolved());
    }

    #[test]
    fn test_invalid_target() {
        let err = resolve(&42_i32, 1_u32).unwrap_err();
        assert_eq!(err.expected(), std::any::type_name::<u32>());

        // A deferred of a different payload type is not a valid target either
        let d = lazy::<String>();
        assert!(resolve(&d, 1_u32).is_err());
        assert!(!d.is_resolved());
    }

    #[test]
    fn test_resolve_already_resolved_is_noop() {
        let d = number();
        resolve(&d, 1.0).unwrap();
        resolve(&d, 2.0).unwrap();

        assert_eq!(d.try_get(), Some(1.0));
    }

    #[test]
    fn test_resolve_signal_rejects_non_signal() {
        let d = number();
        assert!(resolve_signal(&d).is_err());
    }

    #[test]
    fn test_invalid_target_message() {
        let err = resolve(&(), 5_u8).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("non-deferred"));
        assert!(message.contains("u8"));
    }
}
