//! Internal helper macros.

/// Returns early with `$error` unless `$predicate` holds.
///
/// Like `assert!`, but produces an `Err` instead of panicking.
///
/// ```ignore
/// ensure!(read_buffer_size > 0, ServerBuildError::ZeroReadBufferSize);
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
