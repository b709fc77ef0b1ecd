//! hexdict-core: blockMeshDict parser and validator library.
//!
//! Turns a structured-mesh dictionary (C-style comments, macro
//! definitions, `#eval` arithmetic, nested bracketed sections) into a
//! validated in-memory geometry model. The pipeline:
//!
//! 1. [`source::normalize`] -- strip comments, split into trimmed lines
//!    with exact original line numbers.
//! 2. [`macros::preprocess`] -- extract `name value;` and
//!    `name #eval{...};` lines into a symbol table.
//! 3. [`parser::parse`] -- dispatch-by-keyword structural parse of the six
//!    sections (scale, vertices, edges, blocks, boundary,
//!    mergePatchPairs) with best-effort recovery.
//! 4. [`validate::validate`] -- referential and structural checks over the
//!    finished [`MeshDict`].
//!
//! Both [`parse()`] and [`validate()`] are total: malformed input becomes
//! ordered, line-annotated [`Diagnostic`]s, never a panic or an `Err`.
//! Each parse call owns a fresh context; nothing is shared across calls.

pub mod error;
pub mod expr;
pub mod macros;
pub mod model;
pub mod parser;
pub mod source;
pub mod validate;

// ── Convenience re-exports: key types ────────────────────────────────

pub use error::{Diagnostic, Stage};
pub use model::{Block, Edge, EdgeKind, GradingType, MergePatchPair, MeshDict, Patch, Vertex};

// ── Convenience re-exports: pipeline entry points ────────────────────

pub use parser::parse;
pub use validate::validate;
