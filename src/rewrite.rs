//! The match-or-recurse rewrite engine.
//!
//! Every rewriter pairs a [`Criteria`] with a rewrite action and follows the
//! same protocol: when the criteria matches a node, the rewrite runs and its
//! output is returned **without** descending into the original node's children
//! (a rewrite that wants further traversal recurses into its own output);
//! otherwise the node is rebuilt with every child replaced by the transform of
//! that child. Each node on any root-to-leaf path is therefore visited exactly
//! once.
//!
//! Declaration-level rewriters perform a single shallow visit per declaration
//! and never recurse into a type's members automatically; a whole-module
//! extension that wants every method of every type iterates the module's
//! declaration list explicitly.
//!
//! A rewrite that panics propagates; the engine adds no retry or suppression.
//! Criteria must pin the variant shape a rewrite expects - the engine does not
//! re-validate it.

use crate::criteria::Criteria;
use crate::tree::{Expression, MethodDecl, ModuleMeta, Statement, TypeDecl};

/// A pass applied to every type declaration of a module by a whole-module
/// extension. Implementations receive the module metadata alongside the
/// declaration so they can touch imports or the package name.
pub trait Transformer {
    fn visit_type(&mut self, decl: &mut TypeDecl, meta: &mut ModuleMeta);
}

// ============================================================================
// DECLARATION REWRITERS (shallow visit)
// ============================================================================

/// Rewrites type declarations selected by a discovery criteria.
pub struct TypeRewriter<F> {
    criteria: Criteria<TypeDecl>,
    action: F,
}

impl<F: FnMut(&mut TypeDecl, &mut ModuleMeta)> TypeRewriter<F> {
    pub fn new(criteria: Criteria<TypeDecl>, action: F) -> Self {
        Self { criteria, action }
    }
}

impl<F: FnMut(&mut TypeDecl, &mut ModuleMeta)> Transformer for TypeRewriter<F> {
    fn visit_type(&mut self, decl: &mut TypeDecl, meta: &mut ModuleMeta) {
        if self.criteria.matches(decl) {
            (self.action)(decl, meta);
        }
    }
}

/// Rewrites the direct methods of every visited type, selected by a discovery
/// criteria. Does not descend into nested types.
pub struct MethodRewriter<F> {
    criteria: Criteria<MethodDecl>,
    action: F,
}

impl<F: FnMut(&mut MethodDecl, &mut ModuleMeta)> MethodRewriter<F> {
    pub fn new(criteria: Criteria<MethodDecl>, action: F) -> Self {
        Self { criteria, action }
    }
}

impl<F: FnMut(&mut MethodDecl, &mut ModuleMeta)> Transformer for MethodRewriter<F> {
    fn visit_type(&mut self, decl: &mut TypeDecl, meta: &mut ModuleMeta) {
        for method in decl.methods_mut() {
            if self.criteria.matches(method) {
                (self.action)(method, meta);
            }
        }
    }
}

// ============================================================================
// EXPRESSION REWRITER (full tree walk)
// ============================================================================

/// Match-or-recurse rewriting over expression trees.
pub struct ExpressionRewriter<F> {
    criteria: Criteria<Expression>,
    rewrite: F,
}

impl<F: FnMut(Expression) -> Expression> ExpressionRewriter<F> {
    pub fn new(criteria: Criteria<Expression>, rewrite: F) -> Self {
        Self { criteria, rewrite }
    }

    /// Transform one expression tree.
    ///
    /// The walk covers operands, call receivers and arguments, list elements,
    /// lambda bodies, and coercion operands.
    pub fn transform(&mut self, expr: Expression) -> Expression {
        if self.criteria.matches(&expr) {
            return (self.rewrite)(expr);
        }

        match expr {
            leaf @ (Expression::Constant(_) | Expression::Variable(_) | Expression::ClassRef(_)) => leaf,
            Expression::Property { object, property } => Expression::Property {
                object: Box::new(self.transform(*object)),
                property,
            },
            Expression::Binary { op, left, right } => Expression::Binary {
                op,
                left: Box::new(self.transform(*left)),
                right: Box::new(self.transform(*right)),
            },
            Expression::MethodCall { receiver, method, args } => Expression::MethodCall {
                receiver: Box::new(self.transform(*receiver)),
                method,
                args: args.into_iter().map(|a| self.transform(a)).collect(),
            },
            Expression::List(items) => {
                Expression::List(items.into_iter().map(|i| self.transform(i)).collect())
            }
            Expression::Lambda { params, body } => Expression::Lambda {
                params,
                body: Box::new(self.transform(*body)),
            },
            Expression::BoolCoerce(inner) => Expression::BoolCoerce(Box::new(self.transform(*inner))),
        }
    }

    /// Absent-node no-op: `None` in, `None` out.
    pub fn transform_opt(&mut self, expr: Option<Expression>) -> Option<Expression> {
        expr.map(|e| self.transform(e))
    }

    /// Transform every expression slot of a statement, recursing through nested
    /// statements. Used when an expression rewriter runs as a module pass.
    fn transform_in_stmt(&mut self, stmt: Statement) -> Statement {
        match stmt {
            Statement::Expression { label, expr } => Statement::Expression {
                label,
                expr: self.transform(expr),
            },
            Statement::Assert { condition, message } => Statement::Assert {
                condition: self.transform(condition),
                message,
            },
            Statement::Block(stmts) => {
                Statement::Block(stmts.into_iter().map(|s| self.transform_in_stmt(s)).collect())
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => Statement::If {
                condition: self.transform(condition),
                then_branch: then_branch.into_iter().map(|s| self.transform_in_stmt(s)).collect(),
                else_branch: else_branch.into_iter().map(|s| self.transform_in_stmt(s)).collect(),
            },
            Statement::While { condition, body } => Statement::While {
                condition: self.transform(condition),
                body: body.into_iter().map(|s| self.transform_in_stmt(s)).collect(),
            },
            Statement::Return(value) => Statement::Return(self.transform_opt(value)),
            Statement::SuperCall(args) => {
                Statement::SuperCall(args.into_iter().map(|a| self.transform(a)).collect())
            }
        }
    }
}

impl<F: FnMut(Expression) -> Expression> Transformer for ExpressionRewriter<F> {
    fn visit_type(&mut self, decl: &mut TypeDecl, _meta: &mut ModuleMeta) {
        for method in decl.methods_mut() {
            let body = std::mem::take(&mut method.body);
            method.body = body.into_iter().map(|s| self.transform_in_stmt(s)).collect();
        }
    }
}

// ============================================================================
// STATEMENT REWRITER (structural walk)
// ============================================================================

/// Match-or-recurse rewriting over statement trees.
///
/// The walk covers nested blocks, loop bodies, and branch arms; it does not
/// descend into embedded expressions.
pub struct StatementRewriter<F> {
    criteria: Criteria<Statement>,
    rewrite: F,
}

impl<F: FnMut(Statement) -> Statement> StatementRewriter<F> {
    pub fn new(criteria: Criteria<Statement>, rewrite: F) -> Self {
        Self { criteria, rewrite }
    }

    /// Transform one statement tree.
    pub fn transform(&mut self, stmt: Statement) -> Statement {
        if self.criteria.matches(&stmt) {
            return (self.rewrite)(stmt);
        }

        match stmt {
            Statement::Block(stmts) => {
                Statement::Block(stmts.into_iter().map(|s| self.transform(s)).collect())
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => Statement::If {
                condition,
                then_branch: then_branch.into_iter().map(|s| self.transform(s)).collect(),
                else_branch: else_branch.into_iter().map(|s| self.transform(s)).collect(),
            },
            Statement::While { condition, body } => Statement::While {
                condition,
                body: body.into_iter().map(|s| self.transform(s)).collect(),
            },
            leaf => leaf,
        }
    }
}

impl<F: FnMut(Statement) -> Statement> Transformer for StatementRewriter<F> {
    fn visit_type(&mut self, decl: &mut TypeDecl, _meta: &mut ModuleMeta) {
        for method in decl.methods_mut() {
            let body = std::mem::take(&mut method.body);
            method.body = body.into_iter().map(|s| self.transform(s)).collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::criteria;
    use crate::criteria::Criteria;
    use crate::tree::build::{expr, node, stmt};
    use crate::tree::{BinaryOp, StmtKind};

    fn sample_tree() -> Expression {
        // max(x + 1, f(y)) > 0
        expr::binary(
            BinaryOp::Gt,
            expr::call(
                expr::var("this"),
                "max",
                vec![
                    expr::binary(BinaryOp::Plus, expr::var("x"), expr::lit_int(1)),
                    expr::call(expr::var("this"), "f", vec![expr::var("y")]),
                ],
            ),
            expr::lit_int(0),
        )
    }

    #[test]
    fn test_non_matching_transform_is_identity() {
        let tree = sample_tree();
        let mut tx = ExpressionRewriter::new(Criteria::new(|_: &Expression| false), |e| e);
        assert_eq!(tx.transform(tree.clone()), tree);
    }

    #[test]
    fn test_every_node_visited_exactly_once() {
        let tree = sample_tree();
        let expected = tree.node_count();

        let visits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&visits);
        let never = Criteria::new(move |_: &Expression| {
            counter.set(counter.get() + 1);
            false
        });

        let mut tx = ExpressionRewriter::new(never, |e| e);
        tx.transform(tree);

        assert_eq!(visits.get(), expected);
    }

    #[test]
    fn test_match_stops_descent() {
        // Rewrite every method call to a constant; the inner call f(y) sits
        // below the outer one and must not be visited.
        let rewritten = Rc::new(Cell::new(0));
        let counter = Rc::clone(&rewritten);
        let mut tx = ExpressionRewriter::new(criteria::expr::of_kind(crate::tree::ExprKind::MethodCall), move |_| {
            counter.set(counter.get() + 1);
            expr::null()
        });

        let out = tx.transform(sample_tree());

        assert_eq!(rewritten.get(), 1);
        assert_eq!(
            out,
            expr::binary(BinaryOp::Gt, expr::null(), expr::lit_int(0))
        );
    }

    #[test]
    fn test_rename_method_calls() {
        let mut tx = ExpressionRewriter::new(criteria::expr::method_call_named("println"), |e| {
            match e {
                Expression::MethodCall { receiver, args, .. } => Expression::MethodCall {
                    receiver,
                    method: "log".into(),
                    args,
                },
                other => other,
            }
        });

        let tree = expr::call(
            expr::var("this"),
            "println",
            vec![expr::call(expr::var("this"), "describe", vec![])],
        );
        let out = tx.transform(tree);

        assert_eq!(out.method_name(), Some("log"));
        // children of the rewritten node were not descended into
        if let Expression::MethodCall { args, .. } = &out {
            assert_eq!(args[0].method_name(), Some("describe"));
        } else {
            panic!("expected a method call");
        }
    }

    #[test]
    fn test_transform_opt_none_is_noop() {
        let mut tx = ExpressionRewriter::new(Criteria::everything(), |_| expr::null());
        assert_eq!(tx.transform_opt(None), None);
    }

    #[test]
    fn test_statement_walk_covers_branches_and_loops() {
        let body = vec![stmt::if_else(
            expr::var("flag"),
            vec![stmt::block(vec![stmt::ret(None)])],
            vec![stmt::while_loop(expr::var("flag"), vec![stmt::ret(None)])],
        )];

        let replaced = Rc::new(Cell::new(0));
        let counter = Rc::clone(&replaced);
        let mut tx = StatementRewriter::new(criteria::stmt::of_kind(StmtKind::Return), move |_| {
            counter.set(counter.get() + 1);
            stmt::expression(expr::null())
        });

        let out: Vec<Statement> = body.into_iter().map(|s| tx.transform(s)).collect();

        assert_eq!(replaced.get(), 2);
        assert!(!format!("{out:?}").contains("Return"));
    }

    #[test]
    fn test_type_rewriter_shallow_visit() {
        let mut module_meta = ModuleMeta::default();
        let mut outer = node::type_decl("OuterSpec")
            .member(crate::tree::Declaration::Type(
                node::type_decl("InnerSpec").build(),
            ))
            .build();

        let visited = Rc::new(Cell::new(0));
        let counter = Rc::clone(&visited);
        let mut tx = TypeRewriter::new(criteria::ty::name_ends_with("Spec"), move |_t: &mut TypeDecl, _m: &mut ModuleMeta| {
            counter.set(counter.get() + 1);
        });

        tx.visit_type(&mut outer, &mut module_meta);

        // the nested type is not visited automatically
        assert_eq!(visited.get(), 1);
    }

    #[test]
    fn test_method_rewriter_selects_by_criteria() {
        let mut meta = ModuleMeta::default();
        let mut ty = node::type_decl("Repo")
            .method(node::method("find_by_id").build())
            .method(node::method("save").build())
            .build();

        let mut tx = MethodRewriter::new(
            criteria::method::name_starts_with("find"),
            |m: &mut MethodDecl, _: &mut ModuleMeta| {
                m.body.push(stmt::ret(None));
            },
        );
        tx.visit_type(&mut ty, &mut meta);

        assert_eq!(ty.find_method("find_by_id").unwrap().body.len(), 1);
        assert!(ty.find_method("save").unwrap().body.is_empty());
    }

    #[test]
    fn test_expression_rewriter_as_module_pass() {
        let mut meta = ModuleMeta::default();
        let mut ty = node::type_decl("Service")
            .method(
                node::method("run")
                    .body(vec![
                        stmt::expression(expr::call(expr::var("this"), "println", vec![expr::lit_str("hi")])),
                        stmt::ret(Some(expr::call(expr::var("this"), "println", vec![]))),
                    ])
                    .build(),
            )
            .build();

        let mut tx = ExpressionRewriter::new(criteria::expr::method_call_named("println"), |e| match e {
            Expression::MethodCall { receiver, args, .. } => Expression::MethodCall {
                receiver,
                method: "log".into(),
                args,
            },
            other => other,
        });
        tx.visit_type(&mut ty, &mut meta);

        let body = &ty.find_method("run").unwrap().body;
        assert_eq!(body[0].expression().unwrap().method_name(), Some("log"));
        assert!(matches!(&body[1], Statement::Return(Some(e)) if e.method_name() == Some("log")));
    }
}
