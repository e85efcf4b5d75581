//! Stack safety for recursive walks over type and expression trees.
//!
//! Checked trees can nest arbitrarily deep (nested composite literals,
//! long binary chains, structs embedding structs), so the recursive
//! walks grow the stack on demand instead of overflowing.

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
///
/// ```text
/// fn zero_value(cx: &PackageCx<'_>, ty: &Type) -> String {
///     ensure_sufficient_stack(|| match ty { ... })
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly (WASM has its own stack management).
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
