//! Stack growth for deeply nested programs.
//!
//! Statement and expression dispatch recurse on the native stack, once per
//! tree level and once per interpreted call. Every dispatch goes through
//! [`ensure_sufficient_stack`], which moves evaluation onto a fresh segment
//! when the current one runs low.

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    /// Grow once less than this much stack remains.
    const RED_ZONE: usize = 128 * 1024;

    /// Size of each newly allocated segment.
    const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// wasm manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
