//! Syntax tree primitives.
//!
//! This module provides the closed node model the rest of the crate operates on:
//! - [`SyntaxNode`] - tagged union over the four node kinds
//! - [`Declaration`], [`TypeDecl`], [`MethodDecl`] - declaration-level nodes
//! - [`Statement`], [`StatementLabel`] - statement-level nodes
//! - [`Expression`], [`BinaryOp`] - expression-level nodes
//! - [`AnnotationUse`] - an attached marker plus its key/value members
//! - [`Module`], [`ModuleMeta`] - compilation unit root
//!
//! Every node owns its children; trees are rewritten by value and never shared
//! across modules. This module has NO dependencies on other bolide modules.

mod annotation;
pub mod build;
mod decl;
mod expr;
mod module;
mod node;
mod stmt;

pub use annotation::AnnotationUse;
pub use decl::{ConstructorDecl, Declaration, DeclKind, FieldDecl, MethodDecl, Parameter, SuperRef, TypeDecl};
pub use expr::{BinaryOp, Constant, ExprKind, Expression};
pub use module::{Module, ModuleMeta};
pub use node::{NodeKind, SyntaxNode};
pub use stmt::{Statement, StatementLabel, StmtKind};
