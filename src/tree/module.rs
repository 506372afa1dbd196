//! Compilation unit root.

use smol_str::SmolStr;

use super::decl::Declaration;

/// Package and import metadata of a compilation unit.
///
/// Kept apart from the declaration list so a transformer can hold `&mut` to a
/// declaration and to this metadata at the same time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModuleMeta {
    pub package: Option<SmolStr>,
    imports: Vec<SmolStr>,
}

impl ModuleMeta {
    /// Record an import. Duplicates are ignored.
    pub fn add_import(&mut self, target: impl Into<SmolStr>) {
        let target = target.into();
        if !self.imports.contains(&target) {
            self.imports.push(target);
        }
    }

    pub fn imports(&self) -> &[SmolStr] {
        &self.imports
    }
}

/// The single root of one compilation unit's tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Module {
    pub meta: ModuleMeta,
    pub declarations: Vec<Declaration>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_declaration(&mut self, decl: Declaration) {
        self.declarations.push(decl);
    }

    /// Iterate the module's type declarations in declaration order.
    pub fn types(&self) -> impl Iterator<Item = &super::decl::TypeDecl> {
        self.declarations.iter().filter_map(Declaration::as_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imports_deduplicate() {
        let mut meta = ModuleMeta::default();
        meta.add_import("my.pkg.Thing");
        meta.add_import("my.pkg.Thing");
        meta.add_import("my.pkg.Other");

        assert_eq!(meta.imports().len(), 2);
    }
}
