//! Annotation uses — an attached marker plus its key/value members.

use indexmap::IndexMap;
use smol_str::SmolStr;

use super::expr::{Constant, Expression};

/// An annotation attached to a declaration: a (possibly qualified) type name
/// plus ordered key/value members.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationUse {
    pub name: SmolStr,
    pub members: IndexMap<SmolStr, Expression>,
}

impl AnnotationUse {
    /// An annotation with no members.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            members: IndexMap::new(),
        }
    }

    /// The unqualified part of the annotation name. Name-based matching uses
    /// this in phases where full type information is unavailable.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(self.name.as_str())
    }

    /// Raw member lookup.
    pub fn member(&self, name: &str) -> Option<&Expression> {
        self.members.get(name)
    }

    /// A member value resolved to a string the way the host language would:
    /// string constants verbatim, class references by name, property accesses
    /// by property name. Anything else resolves to `None`.
    pub fn string_member(&self, name: &str) -> Option<SmolStr> {
        match self.members.get(name)? {
            Expression::Constant(Constant::Str(s)) => Some(s.clone()),
            Expression::ClassRef(name) => Some(name.clone()),
            Expression::Property { property, .. } => Some(property.clone()),
            _ => None,
        }
    }

    /// Number of declared members.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build::expr;

    #[test]
    fn test_simple_name() {
        assert_eq!(AnnotationUse::new("my.pkg.Marker").simple_name(), "Marker");
        assert_eq!(AnnotationUse::new("Marker").simple_name(), "Marker");
    }

    #[test]
    fn test_string_member_resolution() {
        let mut ann = AnnotationUse::new("Local");
        ann.members.insert("phase".into(), expr::lit_str("CANONICALIZATION"));
        ann.members.insert("impl".into(), expr::class_ref("my.Tx"));
        ann.members
            .insert("tag".into(), expr::prop(expr::class_ref("Phase"), "OUTPUT"));
        ann.members.insert("count".into(), expr::lit_int(2));

        assert_eq!(ann.string_member("phase").as_deref(), Some("CANONICALIZATION"));
        assert_eq!(ann.string_member("impl").as_deref(), Some("my.Tx"));
        assert_eq!(ann.string_member("tag").as_deref(), Some("OUTPUT"));
        assert_eq!(ann.string_member("count"), None);
        assert_eq!(ann.string_member("missing"), None);
    }
}
