//! Thin tree-fragment builders.
//!
//! Value constructors for the handful of node shapes the scaffolding generator
//! and the check engine synthesize, grouped by the entity they build. Nothing
//! here contains logic beyond assembling a node.

/// Expression factories.
pub mod expr {
    use smol_str::SmolStr;

    use crate::tree::expr::{BinaryOp, Constant, Expression};

    pub fn lit_str(value: impl Into<SmolStr>) -> Expression {
        Expression::Constant(Constant::Str(value.into()))
    }

    pub fn lit_int(value: i64) -> Expression {
        Expression::Constant(Constant::Int(value))
    }

    pub fn lit_bool(value: bool) -> Expression {
        Expression::Constant(Constant::Bool(value))
    }

    pub fn null() -> Expression {
        Expression::Constant(Constant::Null)
    }

    pub fn var(name: impl Into<SmolStr>) -> Expression {
        Expression::Variable(name.into())
    }

    pub fn class_ref(name: impl Into<SmolStr>) -> Expression {
        Expression::ClassRef(name.into())
    }

    pub fn prop(object: Expression, property: impl Into<SmolStr>) -> Expression {
        Expression::Property {
            object: Box::new(object),
            property: property.into(),
        }
    }

    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Expression {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn call(receiver: Expression, method: impl Into<SmolStr>, args: Vec<Expression>) -> Expression {
        Expression::MethodCall {
            receiver: Box::new(receiver),
            method: method.into(),
            args,
        }
    }

    pub fn list(items: Vec<Expression>) -> Expression {
        Expression::List(items)
    }

    pub fn lambda(params: Vec<SmolStr>, body: Expression) -> Expression {
        Expression::Lambda {
            params,
            body: Box::new(body),
        }
    }

    pub fn bool_coerce(inner: Expression) -> Expression {
        Expression::BoolCoerce(Box::new(inner))
    }
}

/// Statement factories.
pub mod stmt {
    use smol_str::SmolStr;

    use crate::tree::expr::Expression;
    use crate::tree::stmt::{Statement, StatementLabel};

    pub fn expression(expr: Expression) -> Statement {
        Statement::Expression { label: None, expr }
    }

    pub fn labeled(tag: impl Into<SmolStr>, text: Option<SmolStr>, expr: Expression) -> Statement {
        Statement::Expression {
            label: Some(StatementLabel::new(tag, text)),
            expr,
        }
    }

    pub fn assertion(condition: Expression, message: Option<SmolStr>) -> Statement {
        Statement::Assert { condition, message }
    }

    pub fn block(statements: Vec<Statement>) -> Statement {
        Statement::Block(statements)
    }

    pub fn if_else(condition: Expression, then_branch: Vec<Statement>, else_branch: Vec<Statement>) -> Statement {
        Statement::If {
            condition,
            then_branch,
            else_branch,
        }
    }

    pub fn while_loop(condition: Expression, body: Vec<Statement>) -> Statement {
        Statement::While { condition, body }
    }

    pub fn ret(value: Option<Expression>) -> Statement {
        Statement::Return(value)
    }

    pub fn super_call(args: Vec<Expression>) -> Statement {
        Statement::SuperCall(args)
    }
}

/// Composite node builders.
pub mod node {
    use smol_str::SmolStr;

    use crate::tree::annotation::AnnotationUse;
    use crate::tree::decl::{ConstructorDecl, Declaration, MethodDecl, Parameter, SuperRef, TypeDecl};
    use crate::tree::expr::Expression;
    use crate::tree::stmt::Statement;

    /// Builder for [`AnnotationUse`].
    pub struct AnnotationBuilder {
        inner: AnnotationUse,
    }

    pub fn annotation(name: impl Into<SmolStr>) -> AnnotationBuilder {
        AnnotationBuilder {
            inner: AnnotationUse::new(name),
        }
    }

    impl AnnotationBuilder {
        pub fn member(mut self, name: impl Into<SmolStr>, value: Expression) -> Self {
            self.inner.members.insert(name.into(), value);
            self
        }

        pub fn build(self) -> AnnotationUse {
            self.inner
        }
    }

    /// Builder for [`MethodDecl`].
    pub struct MethodBuilder {
        inner: MethodDecl,
    }

    pub fn method(name: impl Into<SmolStr>) -> MethodBuilder {
        MethodBuilder {
            inner: MethodDecl {
                name: name.into(),
                params: Vec::new(),
                return_type: None,
                annotations: Vec::new(),
                body: Vec::new(),
            },
        }
    }

    impl MethodBuilder {
        pub fn param(mut self, name: impl Into<SmolStr>, type_name: impl Into<SmolStr>) -> Self {
            self.inner.params.push(Parameter::new(name, type_name));
            self
        }

        pub fn returns(mut self, type_name: impl Into<SmolStr>) -> Self {
            self.inner.return_type = Some(type_name.into());
            self
        }

        pub fn annotation(mut self, annotation: AnnotationUse) -> Self {
            self.inner.annotations.push(annotation);
            self
        }

        pub fn body(mut self, statements: Vec<Statement>) -> Self {
            self.inner.body = statements;
            self
        }

        pub fn build(self) -> MethodDecl {
            self.inner
        }
    }

    /// Builder for [`ConstructorDecl`].
    pub struct ConstructorBuilder {
        inner: ConstructorDecl,
    }

    pub fn constructor() -> ConstructorBuilder {
        ConstructorBuilder {
            inner: ConstructorDecl {
                params: Vec::new(),
                body: Vec::new(),
            },
        }
    }

    impl ConstructorBuilder {
        pub fn param(mut self, name: impl Into<SmolStr>, type_name: impl Into<SmolStr>) -> Self {
            self.inner.params.push(Parameter::new(name, type_name));
            self
        }

        pub fn code(mut self, statements: Vec<Statement>) -> Self {
            self.inner.body = statements;
            self
        }

        pub fn build(self) -> ConstructorDecl {
            self.inner
        }
    }

    /// Builder for [`TypeDecl`].
    pub struct TypeBuilder {
        inner: TypeDecl,
    }

    pub fn type_decl(name: impl Into<SmolStr>) -> TypeBuilder {
        TypeBuilder {
            inner: TypeDecl::new(name),
        }
    }

    /// Builder for an annotation type declaration.
    pub fn annotation_decl(name: impl Into<SmolStr>) -> TypeBuilder {
        let mut builder = type_decl(name);
        builder.inner.is_annotation = true;
        builder
    }

    impl TypeBuilder {
        pub fn annotation(mut self, annotation: AnnotationUse) -> Self {
            self.inner.annotations.push(annotation);
            self
        }

        pub fn extends(mut self, name: impl Into<SmolStr>, type_args: Vec<SmolStr>) -> Self {
            self.inner.superclass = Some(SuperRef::new(name).with_type_args(type_args));
            self
        }

        pub fn method(mut self, method: MethodDecl) -> Self {
            self.inner.members.push(Declaration::Method(method));
            self
        }

        pub fn member(mut self, member: Declaration) -> Self {
            self.inner.members.push(member);
            self
        }

        pub fn build(self) -> TypeDecl {
            self.inner
        }
    }
}
