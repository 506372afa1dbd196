//! The tagged union over the four node kinds.

use super::annotation::AnnotationUse;
use super::decl::Declaration;
use super::expr::Expression;
use super::stmt::Statement;

/// A syntax tree node of any kind.
///
/// Host-compiler callbacks deliver heterogeneous node sequences; this union is
/// what crosses that boundary. Inside the crate, engines work on the typed
/// variants directly.
#[derive(Clone, Debug, PartialEq)]
pub enum SyntaxNode {
    Declaration(Declaration),
    Statement(Statement),
    Expression(Expression),
    Annotation(AnnotationUse),
}

/// The four node kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Declaration,
    Statement,
    Expression,
    Annotation,
}

impl SyntaxNode {
    /// The kind tag of this node.
    pub const fn kind(&self) -> NodeKind {
        match self {
            SyntaxNode::Declaration(_) => NodeKind::Declaration,
            SyntaxNode::Statement(_) => NodeKind::Statement,
            SyntaxNode::Expression(_) => NodeKind::Expression,
            SyntaxNode::Annotation(_) => NodeKind::Annotation,
        }
    }

    pub fn as_annotation(&self) -> Option<&AnnotationUse> {
        match self {
            SyntaxNode::Annotation(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_declaration(&self) -> Option<&Declaration> {
        match self {
            SyntaxNode::Declaration(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_declaration_mut(&mut self) -> Option<&mut Declaration> {
        match self {
            SyntaxNode::Declaration(d) => Some(d),
            _ => None,
        }
    }
}
