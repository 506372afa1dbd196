//! Declaration nodes: types, methods, fields, constructors.

use smol_str::SmolStr;

use super::annotation::AnnotationUse;
use super::expr::Expression;
use super::stmt::Statement;

/// A formal parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: SmolStr,
    pub type_name: SmolStr,
}

impl Parameter {
    pub fn new(name: impl Into<SmolStr>, type_name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A reference to a superclass, carrying any type arguments so scaffolding can
/// read them back.
#[derive(Clone, Debug, PartialEq)]
pub struct SuperRef {
    pub name: SmolStr,
    pub type_args: Vec<SmolStr>,
}

impl SuperRef {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            type_args: Vec::new(),
        }
    }

    pub fn with_type_args(mut self, args: Vec<SmolStr>) -> Self {
        self.type_args = args;
        self
    }
}

/// A method declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct MethodDecl {
    pub name: SmolStr,
    pub params: Vec<Parameter>,
    pub return_type: Option<SmolStr>,
    pub annotations: Vec<AnnotationUse>,
    pub body: Vec<Statement>,
}

/// A field declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDecl {
    pub name: SmolStr,
    pub type_name: SmolStr,
    pub annotations: Vec<AnnotationUse>,
    pub init: Option<Expression>,
}

/// A constructor declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstructorDecl {
    pub params: Vec<Parameter>,
    pub body: Vec<Statement>,
}

/// A type declaration: a class, or an annotation type when `is_annotation`.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeDecl {
    pub name: SmolStr,
    pub annotations: Vec<AnnotationUse>,
    pub superclass: Option<SuperRef>,
    pub members: Vec<Declaration>,
    pub is_annotation: bool,
}

impl TypeDecl {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            annotations: Vec::new(),
            superclass: None,
            members: Vec::new(),
            is_annotation: false,
        }
    }

    /// Find a direct method member by name. Does not search nested types.
    pub fn find_method(&self, name: &str) -> Option<&MethodDecl> {
        self.members.iter().find_map(|m| match m {
            Declaration::Method(method) if method.name == name => Some(method),
            _ => None,
        })
    }

    /// Mutable counterpart of [`TypeDecl::find_method`].
    pub fn find_method_mut(&mut self, name: &str) -> Option<&mut MethodDecl> {
        self.members.iter_mut().find_map(|m| match m {
            Declaration::Method(method) if method.name == name => Some(method),
            _ => None,
        })
    }

    /// Iterate the type's direct methods.
    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|m| match m {
            Declaration::Method(method) => Some(method),
            _ => None,
        })
    }

    /// Mutable counterpart of [`TypeDecl::methods`].
    pub fn methods_mut(&mut self) -> impl Iterator<Item = &mut MethodDecl> {
        self.members.iter_mut().filter_map(|m| match m {
            Declaration::Method(method) => Some(method),
            _ => None,
        })
    }

    /// The first attached annotation with the given simple name.
    pub fn annotation_named(&self, simple_name: &str) -> Option<&AnnotationUse> {
        self.annotations.iter().find(|a| a.simple_name() == simple_name)
    }

    /// Whether this type declares `name` as its direct superclass.
    pub fn extends(&self, name: &str) -> bool {
        self.superclass.as_ref().is_some_and(|s| s.name == name)
    }

    pub fn add_annotation(&mut self, annotation: AnnotationUse) {
        self.annotations.push(annotation);
    }

    pub fn add_constructor(&mut self, ctor: ConstructorDecl) {
        self.members.push(Declaration::Constructor(ctor));
    }
}

/// A declaration-level node.
#[derive(Clone, Debug, PartialEq)]
pub enum Declaration {
    Type(TypeDecl),
    Method(MethodDecl),
    Field(FieldDecl),
    Constructor(ConstructorDecl),
}

/// Discriminant-only view of [`Declaration`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Type,
    Method,
    Field,
    Constructor,
}

impl Declaration {
    /// The variant kind of this declaration.
    pub const fn kind(&self) -> DeclKind {
        match self {
            Declaration::Type(_) => DeclKind::Type,
            Declaration::Method(_) => DeclKind::Method,
            Declaration::Field(_) => DeclKind::Field,
            Declaration::Constructor(_) => DeclKind::Constructor,
        }
    }

    /// The declared name. Constructors report the conventional `<init>`.
    pub fn name(&self) -> &str {
        match self {
            Declaration::Type(t) => t.name.as_str(),
            Declaration::Method(m) => m.name.as_str(),
            Declaration::Field(f) => f.name.as_str(),
            Declaration::Constructor(_) => "<init>",
        }
    }

    /// The annotations attached to this declaration. Constructors carry none.
    pub fn annotations(&self) -> &[AnnotationUse] {
        match self {
            Declaration::Type(t) => &t.annotations,
            Declaration::Method(m) => &m.annotations,
            Declaration::Field(f) => &f.annotations,
            Declaration::Constructor(_) => &[],
        }
    }

    pub fn as_type(&self) -> Option<&TypeDecl> {
        match self {
            Declaration::Type(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_type_mut(&mut self) -> Option<&mut TypeDecl> {
        match self {
            Declaration::Type(t) => Some(t),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build::node;

    #[test]
    fn test_find_method() {
        let ty = node::type_decl("Service")
            .method(node::method("run").build())
            .method(node::method("stop").build())
            .build();

        assert!(ty.find_method("run").is_some());
        assert!(ty.find_method("missing").is_none());
    }

    #[test]
    fn test_annotation_named_uses_simple_name() {
        let ty = node::type_decl("Service")
            .annotation(AnnotationUse::new("my.pkg.Marker"))
            .build();

        assert!(ty.annotation_named("Marker").is_some());
        assert!(ty.annotation_named("my.pkg.Marker").is_none());
    }

    #[test]
    fn test_declaration_name() {
        let decl = Declaration::Constructor(ConstructorDecl {
            params: vec![],
            body: vec![],
        });
        assert_eq!(decl.name(), "<init>");
        assert_eq!(decl.kind(), DeclKind::Constructor);
    }
}
