//! # bolide
//!
//! Compiler-extension scaffolding and criteria-driven syntax tree rewriting.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! extension → extension traits, phase-driven registry and runner
//!   ↓
//! scaffold  → marker expansion: binding, synthesized members, check rewriting
//!   ↓
//! check     → label-grouped statement check engine
//!   ↓
//! rewrite   → match-or-recurse rewrite engine
//!   ↓
//! criteria  → predicate values over typed nodes
//!   ↓
//! phase     → compile-phase registries (global and local orderings)
//!   ↓
//! tree      → syntax tree model and fragment builders
//! ```

/// Syntax tree model: modules, declarations, statements, expressions.
pub mod tree;

/// Compile-phase registries and tag resolution.
pub mod phase;

/// Criteria: composable predicates over typed nodes.
pub mod criteria;

/// The match-or-recurse rewrite engine.
pub mod rewrite;

/// The label-grouped statement check engine.
pub mod check;

/// The annotation scaffolding generator.
pub mod scaffold;

/// Extension traits and the phase-driven registry.
pub mod extension;

// Re-export the types most embeddings touch
pub use criteria::{all, any_of, Criteria, InvalidCriteria};
pub use extension::{ExtensionError, ExtensionRegistry, GlobalExtension, LocalExtension};
pub use phase::{GlobalPhase, InvalidPhaseTag, LocalPhase};
pub use rewrite::{ExpressionRewriter, MethodRewriter, StatementRewriter, Transformer, TypeRewriter};
pub use scaffold::{AnnotationBinding, GlobalBinding, ScaffoldError, TargetKind};
pub use tree::{Declaration, Expression, Module, ModuleMeta, Statement, SyntaxNode, TypeDecl};
