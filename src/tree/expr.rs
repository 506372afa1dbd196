//! Expression nodes.

use smol_str::SmolStr;

/// A literal value carried by a constant expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Constant {
    Null,
    Bool(bool),
    Int(i64),
    Str(SmolStr),
}

/// Binary operator tokens.
///
/// Stands in for the host language's token-type table; criteria can match on a
/// specific operator without inspecting operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Assign,
    Plus,
    Minus,
    Multiply,
    Divide,
    Eq,
    NotEq,
    Lt,
    Lte,
    Gt,
    Gte,
    And,
    Or,
}

/// An expression node.
///
/// A closed variant set: transformers match exhaustively instead of downcasting.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Constant(Constant),
    /// A variable reference by name.
    Variable(SmolStr),
    /// A reference to a type by (possibly qualified) name.
    ClassRef(SmolStr),
    /// Property access, e.g. `Phase.CANONICALIZATION`.
    Property {
        object: Box<Expression>,
        property: SmolStr,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// A method call with an explicit receiver.
    MethodCall {
        receiver: Box<Expression>,
        method: SmolStr,
        args: Vec<Expression>,
    },
    List(Vec<Expression>),
    /// An anonymous function whose body is a single expression.
    Lambda {
        params: Vec<SmolStr>,
        body: Box<Expression>,
    },
    /// Coercion of the wrapped expression to a boolean, host-language style.
    BoolCoerce(Box<Expression>),
}

/// Discriminant-only view of [`Expression`], used by kind criteria.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExprKind {
    Constant,
    Variable,
    ClassRef,
    Property,
    Binary,
    MethodCall,
    List,
    Lambda,
    BoolCoerce,
}

impl Expression {
    /// The variant kind of this expression.
    pub const fn kind(&self) -> ExprKind {
        match self {
            Expression::Constant(_) => ExprKind::Constant,
            Expression::Variable(_) => ExprKind::Variable,
            Expression::ClassRef(_) => ExprKind::ClassRef,
            Expression::Property { .. } => ExprKind::Property,
            Expression::Binary { .. } => ExprKind::Binary,
            Expression::MethodCall { .. } => ExprKind::MethodCall,
            Expression::List(_) => ExprKind::List,
            Expression::Lambda { .. } => ExprKind::Lambda,
            Expression::BoolCoerce(_) => ExprKind::BoolCoerce,
        }
    }

    /// The callee name when this is a method call.
    pub fn method_name(&self) -> Option<&str> {
        match self {
            Expression::MethodCall { method, .. } => Some(method.as_str()),
            _ => None,
        }
    }

    /// Number of nodes in this expression tree, the node itself included.
    pub fn node_count(&self) -> usize {
        1 + match self {
            Expression::Constant(_) | Expression::Variable(_) | Expression::ClassRef(_) => 0,
            Expression::Property { object, .. } => object.node_count(),
            Expression::Binary { left, right, .. } => left.node_count() + right.node_count(),
            Expression::MethodCall { receiver, args, .. } => {
                receiver.node_count() + args.iter().map(Expression::node_count).sum::<usize>()
            }
            Expression::List(items) => items.iter().map(Expression::node_count).sum(),
            Expression::Lambda { body, .. } => body.node_count(),
            Expression::BoolCoerce(inner) => inner.node_count(),
        }
    }
}
