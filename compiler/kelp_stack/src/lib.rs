//! Native stack growth for deep recursion.
//!
//! The reader and the evaluator both recurse once per level of source
//! nesting, and the evaluator recurses again for every interpreted call.
//! A program like `(bind f (func (n) (if (= n 0) 0 (f (- n 1))))) (f 50000)`
//! would exhaust a default 8MB thread stack long before the call-depth
//! limit trips, so every recursive entry point wraps its body in
//! [`ensure_sufficient_stack`].
//!
//! - **Native targets**: `stacker` allocates a fresh segment when the
//!   remaining stack drops below the red zone.
//! - **WASM targets**: plain passthrough.

/// Remaining stack below which a new segment is allocated (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (2MB).
///
/// Evaluator frames are larger than parser frames (guards, small vectors of
/// argument slots), so segments are sized for a few thousand frames each.
const STACK_PER_RECURSION: usize = 2 * 1024 * 1024;

/// Run `f`, growing the native stack first if it is close to exhaustion.
///
/// ```text
/// fn eval(&mut self, expr: &Expr) -> EvalResult {
///     ensure_sufficient_stack(|| self.eval_inner(expr))
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version: call directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
