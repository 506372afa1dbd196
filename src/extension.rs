//! Extension traits and the phase-driven registry.
//!
//! Two extension shapes exist:
//! - [`LocalExtension`] runs once per use of its marker annotation, receiving
//!   the marker and the annotated declaration.
//! - [`GlobalExtension`] runs once per module, contributing a list of
//!   [`Transformer`]s applied to every type declaration.
//!
//! [`ExtensionRegistry`] holds the bindings produced by scaffold expansion and
//! drives both shapes through the global phase ordering: for each phase, the
//! whole-module extensions registered at that phase run first, then every
//! declaration carrying a marker bound at that phase is dispatched to its
//! local extension. Dispatch is gated, not validated: a declaration whose
//! shape does not match the binding's target kind is skipped silently.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use thiserror::Error;

use crate::rewrite::Transformer;
use crate::scaffold::{AnnotationBinding, GlobalBinding, ScaffoldError};
use crate::phase::GlobalPhase;
use crate::tree::{AnnotationUse, Declaration, Module, ModuleMeta, SyntaxNode};

/// Failures raised while running extensions.
#[derive(Debug, Error)]
pub enum ExtensionError {
    #[error(transparent)]
    Scaffold(#[from] ScaffoldError),
    /// An extension body reported a failure of its own.
    #[error("extension `{extension}` failed: {message}")]
    Failed { extension: SmolStr, message: String },
}

/// A marker-driven extension: invoked once for each declaration annotated with
/// the marker it is bound to.
pub trait LocalExtension {
    fn do_visit(
        &mut self,
        marker: &AnnotationUse,
        host: &mut Declaration,
        meta: &mut ModuleMeta,
    ) -> Result<(), ExtensionError>;
}

/// A whole-module extension: contributes criteria-gated transformers that the
/// runner applies to every type declaration of the module.
pub trait GlobalExtension {
    fn transformers(&self) -> Vec<Box<dyn Transformer>>;
}

/// Apply a whole-module extension to a module.
///
/// Transformers are created once and carried across declarations, so a
/// transformer may accumulate state over the whole module.
pub fn apply_global(ext: &dyn GlobalExtension, module: &mut Module) {
    let mut transformers = ext.transformers();
    for decl in &mut module.declarations {
        if let Some(ty) = decl.as_type_mut() {
            for transformer in &mut transformers {
                transformer.visit_type(ty, &mut module.meta);
            }
        }
    }
}

/// The host-callback surface for local extensions: a (marker, host) node pair
/// exactly as the compiler's visitor delivers it. Any other shape, and any
/// marker name other than the expected one, is not applicable and skipped
/// silently.
pub fn dispatch_pair(
    ext: &mut dyn LocalExtension,
    expected_marker: &str,
    nodes: &mut [SyntaxNode],
    meta: &mut ModuleMeta,
) -> Result<(), ExtensionError> {
    if nodes.len() != 2 {
        return Ok(());
    }
    let (head, tail) = nodes.split_at_mut(1);
    let Some(marker) = head[0].as_annotation() else {
        return Ok(());
    };
    if marker.simple_name() != expected_marker {
        return Ok(());
    }
    let Some(host) = tail[0].as_declaration_mut() else {
        return Ok(());
    };

    ext.do_visit(marker, host, meta)
}

type LocalFactory = Box<dyn Fn() -> Box<dyn LocalExtension>>;
type GlobalFactory = Box<dyn Fn() -> Box<dyn GlobalExtension>>;

struct LocalEntry {
    binding: AnnotationBinding,
    factory: LocalFactory,
}

struct GlobalEntry {
    binding: GlobalBinding,
    factory: GlobalFactory,
}

/// Marker-name-keyed registry of extension bindings.
///
/// The reflection-free counterpart of classpath scanning: scaffold expansion
/// produces bindings, the embedding host registers them here together with a
/// factory for the implementation, and [`run`](Self::run) drives a module
/// through every compile phase.
#[derive(Default)]
pub struct ExtensionRegistry {
    local: FxHashMap<SmolStr, LocalEntry>,
    global: Vec<GlobalEntry>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a local extension under its binding's marker name. A later
    /// registration for the same marker replaces the earlier one.
    pub fn register_local<F>(&mut self, binding: AnnotationBinding, factory: F)
    where
        F: Fn() -> Box<dyn LocalExtension> + 'static,
    {
        tracing::debug!(marker = %binding.marker, implementation = %binding.implementation, "registering local extension");
        self.local.insert(
            binding.marker.clone(),
            LocalEntry {
                binding,
                factory: Box::new(factory),
            },
        );
    }

    /// Register a whole-module extension.
    pub fn register_global<F>(&mut self, binding: GlobalBinding, factory: F)
    where
        F: Fn() -> Box<dyn GlobalExtension> + 'static,
    {
        tracing::debug!(implementation = %binding.implementation, "registering global extension");
        self.global.push(GlobalEntry {
            binding,
            factory: Box::new(factory),
        });
    }

    /// The binding registered for a marker name, if any.
    pub fn local_binding(&self, marker: &str) -> Option<&AnnotationBinding> {
        self.local.get(marker).map(|e| &e.binding)
    }

    /// Drive a module through every compile phase in order.
    pub fn run(&self, module: &mut Module) -> Result<(), ExtensionError> {
        for phase in GlobalPhase::ALL {
            self.run_phase(module, phase)?;
        }
        Ok(())
    }

    /// Run the extensions bound at a single phase.
    ///
    /// Whole-module extensions run before marker-driven ones so local
    /// extensions observe declarations the global pass may have introduced.
    pub fn run_phase(&self, module: &mut Module, phase: GlobalPhase) -> Result<(), ExtensionError> {
        for entry in self.global.iter().filter(|e| e.binding.phase == phase) {
            tracing::trace!(implementation = %entry.binding.implementation, phase = phase.tag(), "running global extension");
            apply_global(&*(entry.factory)(), module);
        }

        for decl in &mut module.declarations {
            let markers: Vec<AnnotationUse> = decl
                .annotations()
                .iter()
                .filter(|a| {
                    self.local
                        .get(a.simple_name())
                        .is_some_and(|e| e.binding.phase.to_global() == phase)
                })
                .cloned()
                .collect();

            for marker in markers {
                let Some(entry) = self.local.get(marker.simple_name()) else {
                    continue;
                };
                if !entry.binding.target.accepts(decl) {
                    tracing::trace!(
                        marker = %marker.simple_name(),
                        target = entry.binding.target.tag(),
                        "declaration shape does not match target, skipping"
                    );
                    continue;
                }
                tracing::trace!(
                    marker = %marker.simple_name(),
                    implementation = %entry.binding.implementation,
                    phase = phase.tag(),
                    "dispatching local extension"
                );
                let mut ext = (entry.factory)();
                ext.do_visit(&marker, decl, &mut module.meta)?;
            }
        }

        Ok(())
    }
}
