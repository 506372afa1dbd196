//! Compile-phase registries.
//!
//! Two orderings exist:
//! - [`GlobalPhase`] - every stage of the host compiler, usable by whole-module
//!   extensions.
//! - [`LocalPhase`] - the contiguous suffix starting at semantic analysis, the
//!   only stages a single-annotation extension may run at (earlier phases have
//!   no type information to offer).
//!
//! Every local tag exists under the same name in the global ordering.

use std::fmt;

use smol_str::SmolStr;
use thiserror::Error;

/// Which registry a tag was resolved against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registry {
    Local,
    Global,
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Registry::Local => f.write_str("local"),
            Registry::Global => f.write_str("global"),
        }
    }
}

/// A phase tag that does not resolve in the consulted registry.
///
/// This is a compiler-internal inconsistency, not a recoverable user error;
/// callers abort processing of the offending declaration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown compile phase tag `{tag}` in the {registry} registry")]
pub struct InvalidPhaseTag {
    pub tag: SmolStr,
    pub registry: Registry,
}

/// The full, totally ordered stage enumeration of the host compiler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GlobalPhase {
    Initialization,
    Parsing,
    Conversion,
    SemanticAnalysis,
    Canonicalization,
    InstructionSelection,
    ClassGeneration,
    Output,
    Finalization,
}

impl GlobalPhase {
    /// All phases in execution order.
    pub const ALL: [GlobalPhase; 9] = [
        GlobalPhase::Initialization,
        GlobalPhase::Parsing,
        GlobalPhase::Conversion,
        GlobalPhase::SemanticAnalysis,
        GlobalPhase::Canonicalization,
        GlobalPhase::InstructionSelection,
        GlobalPhase::ClassGeneration,
        GlobalPhase::Output,
        GlobalPhase::Finalization,
    ];

    /// The enumerated tag naming this phase.
    pub const fn tag(self) -> &'static str {
        match self {
            GlobalPhase::Initialization => "INITIALIZATION",
            GlobalPhase::Parsing => "PARSING",
            GlobalPhase::Conversion => "CONVERSION",
            GlobalPhase::SemanticAnalysis => "SEMANTIC_ANALYSIS",
            GlobalPhase::Canonicalization => "CANONICALIZATION",
            GlobalPhase::InstructionSelection => "INSTRUCTION_SELECTION",
            GlobalPhase::ClassGeneration => "CLASS_GENERATION",
            GlobalPhase::Output => "OUTPUT",
            GlobalPhase::Finalization => "FINALIZATION",
        }
    }

    /// Resolve a tag against the global registry.
    pub fn from_tag(tag: &str) -> Result<Self, InvalidPhaseTag> {
        Self::ALL
            .into_iter()
            .find(|p| p.tag() == tag)
            .ok_or_else(|| InvalidPhaseTag {
                tag: tag.into(),
                registry: Registry::Global,
            })
    }
}

/// The stages available to single-annotation ("local") extensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LocalPhase {
    SemanticAnalysis,
    Canonicalization,
    InstructionSelection,
    ClassGeneration,
    Output,
    Finalization,
}

impl LocalPhase {
    /// All local phases in execution order.
    pub const ALL: [LocalPhase; 6] = [
        LocalPhase::SemanticAnalysis,
        LocalPhase::Canonicalization,
        LocalPhase::InstructionSelection,
        LocalPhase::ClassGeneration,
        LocalPhase::Output,
        LocalPhase::Finalization,
    ];

    /// The enumerated tag naming this phase. Identical to the global tag.
    pub const fn tag(self) -> &'static str {
        self.to_global().tag()
    }

    /// Resolve a tag against the local registry.
    pub fn from_tag(tag: &str) -> Result<Self, InvalidPhaseTag> {
        Self::ALL
            .into_iter()
            .find(|p| p.tag() == tag)
            .ok_or_else(|| InvalidPhaseTag {
                tag: tag.into(),
                registry: Registry::Local,
            })
    }

    /// The position of this phase in the global ordering.
    pub const fn to_global(self) -> GlobalPhase {
        match self {
            LocalPhase::SemanticAnalysis => GlobalPhase::SemanticAnalysis,
            LocalPhase::Canonicalization => GlobalPhase::Canonicalization,
            LocalPhase::InstructionSelection => GlobalPhase::InstructionSelection,
            LocalPhase::ClassGeneration => GlobalPhase::ClassGeneration,
            LocalPhase::Output => GlobalPhase::Output,
            LocalPhase::Finalization => GlobalPhase::Finalization,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_every_local_tag_exists_in_global_registry() {
        for local in LocalPhase::ALL {
            let global = GlobalPhase::from_tag(local.tag())
                .unwrap_or_else(|_| panic!("local tag {} missing from global registry", local.tag()));
            assert_eq!(global, local.to_global());
        }
    }

    #[test]
    fn test_local_is_contiguous_suffix_of_global() {
        let suffix = &GlobalPhase::ALL[3..];
        let mapped: Vec<GlobalPhase> = LocalPhase::ALL.into_iter().map(LocalPhase::to_global).collect();
        assert_eq!(mapped, suffix);
        assert_eq!(mapped[0], GlobalPhase::SemanticAnalysis);
    }

    #[rstest]
    #[case("INITIALIZATION", GlobalPhase::Initialization)]
    #[case("INSTRUCTION_SELECTION", GlobalPhase::InstructionSelection)]
    #[case("FINALIZATION", GlobalPhase::Finalization)]
    fn test_global_from_tag(#[case] tag: &str, #[case] expected: GlobalPhase) {
        assert_eq!(GlobalPhase::from_tag(tag), Ok(expected));
    }

    #[test]
    fn test_instruction_selection_resolves_in_both_registries() {
        assert!(GlobalPhase::from_tag("INSTRUCTION_SELECTION").is_ok());
        assert!(LocalPhase::from_tag("INSTRUCTION_SELECTION").is_ok());
    }

    #[test]
    fn test_bogus_tag_fails_in_both_registries() {
        let global = GlobalPhase::from_tag("BOGUS").unwrap_err();
        assert_eq!(global.registry, Registry::Global);
        assert_eq!(global.tag, "BOGUS");

        let local = LocalPhase::from_tag("BOGUS").unwrap_err();
        assert_eq!(local.registry, Registry::Local);
    }

    #[test]
    fn test_early_phases_are_global_only() {
        assert!(LocalPhase::from_tag("PARSING").is_err());
        assert!(LocalPhase::from_tag("INITIALIZATION").is_err());
        assert!(LocalPhase::from_tag("CONVERSION").is_err());
    }

    #[test]
    fn test_phase_ordering() {
        assert!(GlobalPhase::Parsing < GlobalPhase::SemanticAnalysis);
        assert!(LocalPhase::SemanticAnalysis < LocalPhase::Finalization);
    }
}
