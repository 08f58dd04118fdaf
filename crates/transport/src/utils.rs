//! Internal helper macros.

/// Returns early with `$error` when `$predicate` doesn't hold.
///
/// Like `assert!`, but for validation that reports an error instead of panicking.
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
