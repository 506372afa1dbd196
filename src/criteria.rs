//! Criteria — predicate values over typed nodes.
//!
//! A [`Criteria`] is an immutable, side-effect-free predicate closed over one
//! node kind. Criteria are values, not control flow: they clone cheaply, compose
//! with [`all`] / [`any_of`], and are evaluated by the rewrite engine to decide
//! which nodes a transformer touches.
//!
//! Built-in factories live in submodules named after the entity they inspect
//! ([`ty`], [`method`], [`decl`], [`expr`], [`stmt`]).
//!
//! Name-based criteria operate on the node's declared name string and work at
//! any phase. Criteria matching annotations by exact (qualified) type name must
//! not be used before semantic analysis, when type information first exists;
//! use the simple-name form in earlier phases. This is a documented misuse, not
//! a runtime-checked invariant.

use std::rc::Rc;

use thiserror::Error;

/// Zero-operand combinator construction. Fails fast, at construction time.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("`{combinator}` requires at least one criteria")]
pub struct InvalidCriteria {
    pub combinator: &'static str,
}

/// An immutable predicate over nodes of kind `K`.
pub struct Criteria<K: ?Sized> {
    pred: Rc<dyn Fn(&K) -> bool>,
}

impl<K: ?Sized> std::fmt::Debug for Criteria<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Criteria").finish_non_exhaustive()
    }
}

impl<K: ?Sized> Clone for Criteria<K> {
    fn clone(&self) -> Self {
        Self {
            pred: Rc::clone(&self.pred),
        }
    }
}

impl<K: ?Sized> Criteria<K> {
    /// Wrap a predicate function as a criteria value.
    pub fn new(pred: impl Fn(&K) -> bool + 'static) -> Self {
        Self { pred: Rc::new(pred) }
    }

    /// A criteria that matches every node of its kind.
    pub fn everything() -> Self {
        Self::new(|_| true)
    }

    /// Evaluate this criteria against a node.
    pub fn matches(&self, node: &K) -> bool {
        (self.pred)(node)
    }
}

/// Conjunction. Short-circuits at the first non-matching criteria, evaluating
/// in declaration order.
pub fn all<K: ?Sized + 'static>(
    criterias: impl IntoIterator<Item = Criteria<K>>,
) -> Result<Criteria<K>, InvalidCriteria> {
    let cs: Vec<Criteria<K>> = criterias.into_iter().collect();
    if cs.is_empty() {
        return Err(InvalidCriteria { combinator: "all" });
    }
    Ok(Criteria::new(move |node| cs.iter().all(|c| c.matches(node))))
}

/// Disjunction. Short-circuits at the first matching criteria, evaluating in
/// declaration order.
pub fn any_of<K: ?Sized + 'static>(
    criterias: impl IntoIterator<Item = Criteria<K>>,
) -> Result<Criteria<K>, InvalidCriteria> {
    let cs: Vec<Criteria<K>> = criterias.into_iter().collect();
    if cs.is_empty() {
        return Err(InvalidCriteria { combinator: "any_of" });
    }
    Ok(Criteria::new(move |node| cs.iter().any(|c| c.matches(node))))
}

/// Criteria over type declarations.
pub mod ty {
    use smol_str::SmolStr;

    use super::Criteria;
    use crate::tree::TypeDecl;

    pub fn name_eq(name: impl Into<SmolStr>) -> Criteria<TypeDecl> {
        let name = name.into();
        Criteria::new(move |t: &TypeDecl| t.name == name)
    }

    pub fn name_contains(term: impl Into<SmolStr>) -> Criteria<TypeDecl> {
        let term = term.into();
        Criteria::new(move |t: &TypeDecl| t.name.contains(term.as_str()))
    }

    pub fn name_starts_with(prefix: impl Into<SmolStr>) -> Criteria<TypeDecl> {
        let prefix = prefix.into();
        Criteria::new(move |t: &TypeDecl| t.name.starts_with(prefix.as_str()))
    }

    pub fn name_ends_with(suffix: impl Into<SmolStr>) -> Criteria<TypeDecl> {
        let suffix = suffix.into();
        Criteria::new(move |t: &TypeDecl| t.name.ends_with(suffix.as_str()))
    }

    /// Matches types carrying an annotation with the given simple name. Safe at
    /// any phase.
    pub fn annotated_with_simple(simple_name: impl Into<SmolStr>) -> Criteria<TypeDecl> {
        let simple_name = simple_name.into();
        Criteria::new(move |t: &TypeDecl| {
            t.annotations.iter().any(|a| a.simple_name() == simple_name)
        })
    }

    /// Matches types carrying an annotation with the given exact (qualified)
    /// name. Requires resolved type information: semantic analysis onward.
    pub fn annotated_with(qualified_name: impl Into<SmolStr>) -> Criteria<TypeDecl> {
        let qualified_name = qualified_name.into();
        Criteria::new(move |t: &TypeDecl| t.annotations.iter().any(|a| a.name == qualified_name))
    }
}

/// Criteria over method declarations.
pub mod method {
    use smol_str::SmolStr;

    use super::Criteria;
    use crate::tree::MethodDecl;

    pub fn name_eq(name: impl Into<SmolStr>) -> Criteria<MethodDecl> {
        let name = name.into();
        Criteria::new(move |m: &MethodDecl| m.name == name)
    }

    pub fn name_contains(term: impl Into<SmolStr>) -> Criteria<MethodDecl> {
        let term = term.into();
        Criteria::new(move |m: &MethodDecl| m.name.contains(term.as_str()))
    }

    pub fn name_starts_with(prefix: impl Into<SmolStr>) -> Criteria<MethodDecl> {
        let prefix = prefix.into();
        Criteria::new(move |m: &MethodDecl| m.name.starts_with(prefix.as_str()))
    }

    pub fn name_ends_with(suffix: impl Into<SmolStr>) -> Criteria<MethodDecl> {
        let suffix = suffix.into();
        Criteria::new(move |m: &MethodDecl| m.name.ends_with(suffix.as_str()))
    }

    /// Matches methods carrying an annotation with the given simple name.
    pub fn annotated_with_simple(simple_name: impl Into<SmolStr>) -> Criteria<MethodDecl> {
        let simple_name = simple_name.into();
        Criteria::new(move |m: &MethodDecl| {
            m.annotations.iter().any(|a| a.simple_name() == simple_name)
        })
    }
}

/// Criteria over declarations of any kind.
pub mod decl {
    use smol_str::SmolStr;

    use super::Criteria;
    use crate::tree::{DeclKind, Declaration};

    pub fn name_eq(name: impl Into<SmolStr>) -> Criteria<Declaration> {
        let name = name.into();
        Criteria::new(move |d: &Declaration| d.name() == name)
    }

    pub fn name_contains(term: impl Into<SmolStr>) -> Criteria<Declaration> {
        let term = term.into();
        Criteria::new(move |d: &Declaration| d.name().contains(term.as_str()))
    }

    pub fn of_kind(kind: DeclKind) -> Criteria<Declaration> {
        Criteria::new(move |d: &Declaration| d.kind() == kind)
    }

    /// Matches declarations carrying an annotation with the given simple name.
    pub fn annotated_with_simple(simple_name: impl Into<SmolStr>) -> Criteria<Declaration> {
        let simple_name = simple_name.into();
        Criteria::new(move |d: &Declaration| {
            d.annotations().iter().any(|a| a.simple_name() == simple_name)
        })
    }

    /// Matches declarations carrying an annotation with the given exact
    /// (qualified) name. Semantic analysis onward.
    pub fn annotated_with(qualified_name: impl Into<SmolStr>) -> Criteria<Declaration> {
        let qualified_name = qualified_name.into();
        Criteria::new(move |d: &Declaration| d.annotations().iter().any(|a| a.name == qualified_name))
    }
}

/// Criteria over expressions.
pub mod expr {
    use smol_str::SmolStr;

    use super::Criteria;
    use crate::tree::{BinaryOp, ExprKind, Expression};

    /// Matches every expression.
    pub fn any() -> Criteria<Expression> {
        Criteria::everything()
    }

    pub fn of_kind(kind: ExprKind) -> Criteria<Expression> {
        Criteria::new(move |e: &Expression| e.kind() == kind)
    }

    /// Matches method-call expressions whose callee name equals `name`.
    pub fn method_call_named(name: impl Into<SmolStr>) -> Criteria<Expression> {
        let name = name.into();
        Criteria::new(move |e: &Expression| e.method_name() == Some(name.as_str()))
    }

    /// Matches binary expressions using the given operator token.
    pub fn binary_with_op(op: BinaryOp) -> Criteria<Expression> {
        Criteria::new(move |e: &Expression| matches!(e, Expression::Binary { op: found, .. } if *found == op))
    }
}

/// Criteria over statements.
pub mod stmt {
    use super::Criteria;
    use crate::tree::{Statement, StmtKind};

    pub fn of_kind(kind: StmtKind) -> Criteria<Statement> {
        Criteria::new(move |s: &Statement| s.kind() == kind)
    }

    /// Matches statements carrying any label.
    pub fn labeled() -> Criteria<Statement> {
        Criteria::new(|s: &Statement| s.label().is_some())
    }
}
