//! The phase-gated annotation scaffolding generator.
//!
//! A user declares an extension by attaching one of the built-in markers to an
//! implementation type:
//!
//! ```text
//! @Local(phase: 'CANONICALIZATION', to: 'METHOD')
//! class AddTrace extends LocalExtension<Trace, Method> { do_visit(...) }
//! ```
//!
//! Expansion runs once, at canonicalization, and moves the declaration through
//! a small state machine: *unbound* (no phase read yet) to *bound-local* /
//! *bound-global* on a tag that resolves in the applicable registry, or
//! *invalid* on anything else. Binding attaches to the host declaration:
//!
//! - a synthesized public constructor forwarding the marker's own type to the
//!   superclass constructor,
//! - a registration annotation recording the resolved phase (and, for local
//!   extensions, the target kind),
//!
//! and, for local extensions, rewrites check blocks in the host's `do_visit`
//! method. A tag that does not resolve is a build-breaking internal error, not
//! a recoverable user condition.

use smol_str::SmolStr;
use thiserror::Error;

use crate::check;
use crate::phase::{GlobalPhase, InvalidPhaseTag, LocalPhase};
use crate::tree::build::{expr, node, stmt};
use crate::tree::{AnnotationUse, DeclKind, Declaration, Module, SyntaxNode, TypeDecl};

/// Simple name of the built-in marker binding a local extension.
pub const LOCAL_MARKER: &str = "Local";
/// Simple name of the built-in marker binding a global extension.
pub const GLOBAL_MARKER: &str = "Global";
/// The required phase-tag member.
pub const PHASE_MEMBER: &str = "phase";
/// The optional node-kind-target member.
pub const TARGET_MEMBER: &str = "to";
/// Name of the synthesized registration annotation.
pub const REGISTRATION: &str = "Transformation";
/// The primary dispatch method of a local extension implementation.
pub const DISPATCH_METHOD: &str = "do_visit";

/// Fatal scaffolding failures. Everything here aborts processing of the
/// offending declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScaffoldError {
    #[error(transparent)]
    Phase(#[from] InvalidPhaseTag),
    #[error("marker `{marker}` must declare exactly one `phase` member and at most a `to` member")]
    MalformedMarker { marker: SmolStr },
    #[error("unknown target kind `{tag}` on marker `{marker}`")]
    UnknownTarget { marker: SmolStr, tag: SmolStr },
    #[error("implementation `{implementation}` names no marker type on its superclass")]
    MissingMarkerType { implementation: SmolStr },
}

/// The node kind a local extension applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Type,
    Method,
    Field,
    Constructor,
    /// Parameters are not declarations in this model, so a parameter-targeted
    /// binding never matches a declaration host.
    Parameter,
    Any,
}

impl TargetKind {
    pub const fn tag(self) -> &'static str {
        match self {
            TargetKind::Type => "TYPE",
            TargetKind::Method => "METHOD",
            TargetKind::Field => "FIELD",
            TargetKind::Constructor => "CONSTRUCTOR",
            TargetKind::Parameter => "PARAMETER",
            TargetKind::Any => "ANY",
        }
    }

    /// Resolve a node-kind string, taken verbatim from the marker member.
    pub fn from_tag(tag: &str) -> Option<Self> {
        [
            TargetKind::Type,
            TargetKind::Method,
            TargetKind::Field,
            TargetKind::Constructor,
            TargetKind::Parameter,
            TargetKind::Any,
        ]
        .into_iter()
        .find(|t| t.tag() == tag)
    }

    /// Whether a declaration of the given shape is an acceptable host.
    pub const fn accepts(self, decl: &Declaration) -> bool {
        match (self, decl.kind()) {
            (TargetKind::Any, _) => true,
            (TargetKind::Type, DeclKind::Type) => true,
            (TargetKind::Method, DeclKind::Method) => true,
            (TargetKind::Field, DeclKind::Field) => true,
            (TargetKind::Constructor, DeclKind::Constructor) => true,
            _ => false,
        }
    }
}

/// The phase a marker resolved to, tagged by which registry bound it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundPhase {
    Local(LocalPhase),
    Global(GlobalPhase),
}

impl BoundPhase {
    /// The position of the bound phase in the global ordering.
    pub const fn to_global(self) -> GlobalPhase {
        match self {
            BoundPhase::Local(p) => p.to_global(),
            BoundPhase::Global(p) => p,
        }
    }
}

/// Links a user marker annotation to the implementation that runs when the
/// marker is seen. Created once per expanded declaration, consumed by the
/// extension registry every time the marker is used.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotationBinding {
    /// The user marker annotation's type name.
    pub marker: SmolStr,
    /// The implementation type the marker delegates to.
    pub implementation: SmolStr,
    pub phase: BoundPhase,
    pub target: TargetKind,
}

/// Registration of a whole-module extension: no marker, no target.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalBinding {
    pub implementation: SmolStr,
    pub phase: GlobalPhase,
}

/// All bindings produced by expanding one module.
#[derive(Debug, Default, PartialEq)]
pub struct ExpandedMarkers {
    pub local: Vec<AnnotationBinding>,
    pub global: Vec<GlobalBinding>,
}

// ============================================================================
// EXPANSION
// ============================================================================

/// Expand a `Local` marker attached to an implementation type.
///
/// Reads the phase tag against the local registry, resolves the target kind
/// (default `TYPE`), attaches the registration annotation and the synthesized
/// forwarding constructor, and rewrites check blocks in `do_visit`.
pub fn expand_local(marker: &AnnotationUse, host: &mut TypeDecl) -> Result<AnnotationBinding, ScaffoldError> {
    let tag = phase_tag(marker)?;
    let phase = LocalPhase::from_tag(&tag).inspect_err(|e| {
        tracing::error!(implementation = %host.name, "{e}");
    })?;

    let target = match marker.string_member(TARGET_MEMBER) {
        None => TargetKind::Type,
        Some(tag) => TargetKind::from_tag(&tag).ok_or_else(|| ScaffoldError::UnknownTarget {
            marker: marker.name.clone(),
            tag,
        })?,
    };

    let marker_type = marker_type_of(host)?;
    tracing::debug!(
        implementation = %host.name,
        marker = %marker_type,
        phase = tag.as_str(),
        target = target.tag(),
        "binding local extension"
    );

    host.add_annotation(
        node::annotation(REGISTRATION)
            .member(PHASE_MEMBER, expr::lit_str(tag))
            .member(TARGET_MEMBER, expr::lit_str(target.tag()))
            .build(),
    );
    add_forwarding_constructor(host, &marker_type);

    if let Some(dispatch) = host.find_method_mut(DISPATCH_METHOD) {
        check::add_checks_to(dispatch);
    }

    Ok(AnnotationBinding {
        marker: marker_type,
        implementation: host.name.clone(),
        phase: BoundPhase::Local(phase),
        target,
    })
}

/// Expand a `Global` marker attached to an implementation type.
///
/// Reads the phase tag against the global registry and attaches the
/// registration annotation. Whole-module extensions take no marker target and
/// get no check rewriting.
pub fn expand_global(marker: &AnnotationUse, host: &mut TypeDecl) -> Result<GlobalBinding, ScaffoldError> {
    let tag = phase_tag(marker)?;
    let phase = GlobalPhase::from_tag(&tag).inspect_err(|e| {
        tracing::error!(implementation = %host.name, "{e}");
    })?;

    tracing::debug!(implementation = %host.name, phase = tag.as_str(), "binding global extension");

    host.add_annotation(
        node::annotation(REGISTRATION)
            .member(PHASE_MEMBER, expr::lit_str(tag))
            .build(),
    );

    Ok(GlobalBinding {
        implementation: host.name.clone(),
        phase,
    })
}

/// Expand every built-in marker found on the module's type declarations.
pub fn expand_module(module: &mut Module) -> Result<ExpandedMarkers, ScaffoldError> {
    let mut expanded = ExpandedMarkers::default();

    for decl in &mut module.declarations {
        let Some(ty) = decl.as_type_mut() else { continue };

        if let Some(marker) = ty.annotation_named(LOCAL_MARKER).cloned() {
            expanded.local.push(expand_local(&marker, ty)?);
        } else if let Some(marker) = ty.annotation_named(GLOBAL_MARKER).cloned() {
            expanded.global.push(expand_global(&marker, ty)?);
        }
    }

    Ok(expanded)
}

/// The host-callback surface: a (marker, host) node pair exactly as the
/// compiler's transformation visitor delivers it. Any shape other than an
/// annotation use followed by a type declaration is not applicable and skipped
/// silently; only phase and member failures are errors.
pub fn expand_local_pair(nodes: &mut [SyntaxNode]) -> Result<Option<AnnotationBinding>, ScaffoldError> {
    if nodes.len() != 2 {
        return Ok(None);
    }
    let (head, tail) = nodes.split_at_mut(1);
    let Some(marker) = head[0].as_annotation() else {
        return Ok(None);
    };
    if marker.simple_name() != LOCAL_MARKER {
        return Ok(None);
    }
    let Some(Declaration::Type(host)) = tail[0].as_declaration_mut() else {
        return Ok(None);
    };

    expand_local(marker, host).map(Some)
}

fn phase_tag(marker: &AnnotationUse) -> Result<SmolStr, ScaffoldError> {
    let malformed = || ScaffoldError::MalformedMarker {
        marker: marker.name.clone(),
    };

    if marker
        .members
        .keys()
        .any(|k| k.as_str() != PHASE_MEMBER && k.as_str() != TARGET_MEMBER)
    {
        return Err(malformed());
    }

    marker.string_member(PHASE_MEMBER).ok_or_else(malformed)
}

fn marker_type_of(host: &TypeDecl) -> Result<SmolStr, ScaffoldError> {
    host.superclass
        .as_ref()
        .and_then(|s| s.type_args.first())
        .cloned()
        .ok_or_else(|| ScaffoldError::MissingMarkerType {
            implementation: host.name.clone(),
        })
}

fn add_forwarding_constructor(host: &mut TypeDecl, marker_type: &str) {
    let ctor = node::constructor()
        .code(vec![stmt::super_call(vec![expr::class_ref(marker_type)])])
        .build();
    host.add_constructor(ctor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::Registry;
    use crate::tree::Statement;

    fn local_marker(phase: &str, target: Option<&str>) -> AnnotationUse {
        let mut builder = node::annotation(LOCAL_MARKER).member(PHASE_MEMBER, expr::lit_str(phase));
        if let Some(target) = target {
            builder = builder.member(TARGET_MEMBER, expr::lit_str(target));
        }
        builder.build()
    }

    fn implementation() -> TypeDecl {
        node::type_decl("AddTrace")
            .extends("LocalExtension", vec!["Trace".into(), "Method".into()])
            .method(node::method(DISPATCH_METHOD).build())
            .build()
    }

    #[test]
    fn test_local_binding_records_phase_and_target() {
        let mut host = implementation();
        let binding = expand_local(&local_marker("CANONICALIZATION", Some("METHOD")), &mut host).unwrap();

        assert_eq!(binding.phase, BoundPhase::Local(LocalPhase::Canonicalization));
        assert_eq!(binding.target, TargetKind::Method);
        assert_eq!(binding.marker, "Trace");
        assert_eq!(binding.implementation, "AddTrace");

        let registration = host.annotation_named(REGISTRATION).unwrap();
        assert_eq!(registration.string_member(PHASE_MEMBER).as_deref(), Some("CANONICALIZATION"));
        assert_eq!(registration.string_member(TARGET_MEMBER).as_deref(), Some("METHOD"));
    }

    #[test]
    fn test_synthesized_constructor_forwards_marker_type() {
        let mut host = implementation();
        expand_local(&local_marker("CANONICALIZATION", Some("METHOD")), &mut host).unwrap();

        let ctor = host
            .members
            .iter()
            .find_map(|m| match m {
                Declaration::Constructor(c) => Some(c),
                _ => None,
            })
            .expect("constructor was synthesized");

        assert_eq!(
            ctor.body,
            vec![Statement::SuperCall(vec![expr::class_ref("Trace")])]
        );
        assert!(ctor.params.is_empty());
    }

    #[test]
    fn test_target_defaults_to_type() {
        let mut host = implementation();
        let binding = expand_local(&local_marker("SEMANTIC_ANALYSIS", None), &mut host).unwrap();
        assert_eq!(binding.target, TargetKind::Type);
    }

    #[test]
    fn test_local_rejects_global_only_phase() {
        let mut host = implementation();
        let err = expand_local(&local_marker("PARSING", None), &mut host).unwrap_err();

        match err {
            ScaffoldError::Phase(e) => {
                assert_eq!(e.tag, "PARSING");
                assert_eq!(e.registry, Registry::Local);
            }
            other => panic!("expected a phase error, got {other:?}"),
        }
    }

    #[test]
    fn test_bogus_tag_is_fatal_in_both_scopes() {
        let mut host = implementation();
        assert!(matches!(
            expand_local(&local_marker("BOGUS", None), &mut host),
            Err(ScaffoldError::Phase(_))
        ));
        assert!(matches!(
            expand_global(&local_marker("BOGUS", None), &mut host),
            Err(ScaffoldError::Phase(_))
        ));
    }

    #[test]
    fn test_extra_members_are_malformed() {
        let marker = node::annotation(LOCAL_MARKER)
            .member(PHASE_MEMBER, expr::lit_str("OUTPUT"))
            .member("extra", expr::lit_str("nope"))
            .build();
        let mut host = implementation();

        assert!(matches!(
            expand_local(&marker, &mut host),
            Err(ScaffoldError::MalformedMarker { .. })
        ));
    }

    #[test]
    fn test_missing_phase_member_is_malformed() {
        let marker = node::annotation(LOCAL_MARKER).build();
        let mut host = implementation();

        assert!(matches!(
            expand_local(&marker, &mut host),
            Err(ScaffoldError::MalformedMarker { .. })
        ));
    }

    #[test]
    fn test_unknown_target_is_fatal() {
        let mut host = implementation();
        let err = expand_local(&local_marker("OUTPUT", Some("BANANA")), &mut host).unwrap_err();
        assert!(matches!(err, ScaffoldError::UnknownTarget { ref tag, .. } if tag == "BANANA"));
    }

    #[test]
    fn test_check_blocks_rewritten_in_dispatch_method() {
        use crate::tree::build::stmt as build_stmt;
        use crate::tree::BinaryOp;

        let condition = expr::binary(BinaryOp::Gt, expr::var("x"), expr::lit_int(0));
        let mut host = node::type_decl("AddTrace")
            .extends("LocalExtension", vec!["Trace".into()])
            .method(
                node::method(DISPATCH_METHOD)
                    .body(vec![build_stmt::labeled(
                        "check",
                        Some("x > 0".into()),
                        condition.clone(),
                    )])
                    .build(),
            )
            .build();

        expand_local(&local_marker("OUTPUT", None), &mut host).unwrap();

        let body = &host.find_method(DISPATCH_METHOD).unwrap().body;
        assert_eq!(
            body,
            &vec![build_stmt::assertion(expr::bool_coerce(condition), Some("x > 0".into()))]
        );
    }

    #[test]
    fn test_global_binding() {
        let mut host = node::type_decl("CollectImports").build();
        let binding = expand_global(&local_marker("CONVERSION", None), &mut host).unwrap();

        assert_eq!(binding.phase, GlobalPhase::Conversion);
        let registration = host.annotation_named(REGISTRATION).unwrap();
        assert_eq!(registration.string_member(PHASE_MEMBER).as_deref(), Some("CONVERSION"));
        assert_eq!(registration.member(TARGET_MEMBER), None);
    }

    #[test]
    fn test_missing_marker_type_is_fatal() {
        let mut host = node::type_decl("NoSuper").build();
        assert!(matches!(
            expand_local(&local_marker("OUTPUT", None), &mut host),
            Err(ScaffoldError::MissingMarkerType { .. })
        ));
    }

    #[test]
    fn test_pair_gate_skips_wrong_shapes() {
        // wrong arity
        let mut nodes = vec![SyntaxNode::Annotation(local_marker("OUTPUT", None))];
        assert_eq!(expand_local_pair(&mut nodes).unwrap(), None);

        // first element not an annotation
        let mut nodes = vec![
            SyntaxNode::Declaration(Declaration::Type(implementation())),
            SyntaxNode::Declaration(Declaration::Type(implementation())),
        ];
        assert_eq!(expand_local_pair(&mut nodes).unwrap(), None);

        // well-formed pair expands
        let mut nodes = vec![
            SyntaxNode::Annotation(local_marker("OUTPUT", None)),
            SyntaxNode::Declaration(Declaration::Type(implementation())),
        ];
        let binding = expand_local_pair(&mut nodes).unwrap().unwrap();
        assert_eq!(binding.marker, "Trace");
    }
}
