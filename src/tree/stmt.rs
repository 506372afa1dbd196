//! Statement nodes.

use smol_str::SmolStr;

use super::expr::Expression;

/// A leading tag attached to an expression statement, plus optional free-form
/// descriptive text: `check: 'x must be positive'`.
#[derive(Clone, Debug, PartialEq)]
pub struct StatementLabel {
    pub tag: SmolStr,
    pub text: Option<SmolStr>,
}

impl StatementLabel {
    pub fn new(tag: impl Into<SmolStr>, text: Option<SmolStr>) -> Self {
        Self { tag: tag.into(), text }
    }
}

/// A statement node.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    /// An expression evaluated for effect. Only this variant may carry a label;
    /// the check engine keys its grouping off it.
    Expression {
        label: Option<StatementLabel>,
        expr: Expression,
    },
    /// A guarded runtime assertion with an optional failure message.
    Assert {
        condition: Expression,
        message: Option<SmolStr>,
    },
    Block(Vec<Statement>),
    If {
        condition: Expression,
        then_branch: Vec<Statement>,
        else_branch: Vec<Statement>,
    },
    While {
        condition: Expression,
        body: Vec<Statement>,
    },
    Return(Option<Expression>),
    /// Delegation to the superclass constructor.
    SuperCall(Vec<Expression>),
}

/// Discriminant-only view of [`Statement`], used by kind criteria.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StmtKind {
    Expression,
    Assert,
    Block,
    If,
    While,
    Return,
    SuperCall,
}

impl Statement {
    /// The variant kind of this statement.
    pub const fn kind(&self) -> StmtKind {
        match self {
            Statement::Expression { .. } => StmtKind::Expression,
            Statement::Assert { .. } => StmtKind::Assert,
            Statement::Block(_) => StmtKind::Block,
            Statement::If { .. } => StmtKind::If,
            Statement::While { .. } => StmtKind::While,
            Statement::Return(_) => StmtKind::Return,
            Statement::SuperCall(_) => StmtKind::SuperCall,
        }
    }

    /// The label on this statement, when it is a labeled expression statement.
    pub fn label(&self) -> Option<&StatementLabel> {
        match self {
            Statement::Expression { label, .. } => label.as_ref(),
            _ => None,
        }
    }

    /// The underlying expression of an expression statement.
    pub fn expression(&self) -> Option<&Expression> {
        match self {
            Statement::Expression { expr, .. } => Some(expr),
            _ => None,
        }
    }
}
