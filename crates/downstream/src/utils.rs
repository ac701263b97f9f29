//! Internal helpers for the arena and field store limit checks.

/// Returns `Err($error)` from the enclosing function unless `$predicate` holds.
///
/// Limit checks read as the condition that must be true:
///
/// ```ignore
/// ensure!(self.num_fields() < max_fields, HeaderError::too_many_fields(max_fields));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
