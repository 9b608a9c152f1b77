//! cflat: a compiler for a small statically typed imperative language,
//! targeting SPIM-compatible MIPS assembly.
//!
//! The pipeline is three passes over the AST produced by `syntax`:
//! 1. Name analysis (`sema::resolver`) links identifiers to symbols and lays
//!    out stack frames.
//! 2. Type checking (`sema::typecheck`) computes the type of every expression.
//! 3. Code generation (`codegen`) emits assembly text.

pub mod codegen;
pub mod sema;
pub mod syntax;

mod tests;
