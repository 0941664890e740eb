//! Per-file state shared by the driver and every rewrite unit.

use crate::cjs_imports::CjsImportProcessor;
use crate::helpers::HelperManager;
use crate::name_manager::NameManager;
use crate::token_processor::TokenProcessor;
use crate::util::DeclarationInfo;
use fixedbitset::FixedBitSet;
use rustc_hash::FxHashSet;
use zest_common::{Transform, TransformOptions};

pub struct TransformContext<'a> {
    pub options: &'a TransformOptions,
    pub tokens: TokenProcessor<'a>,
    pub names: NameManager,
    pub helpers: HelperManager,
    /// Present only when the `imports` transform is on.
    pub imports: Option<CjsImportProcessor>,
    /// Tokens that refer to a nested redeclaration of an imported or
    /// exported name.
    pub shadowed: FixedBitSet,
    pub declaration_info: DeclarationInfo,
    /// Names read in value positions; empty unless import elision applies.
    pub non_type_identifiers: FxHashSet<String>,
    /// Declared with `var` in the prefix.
    pub generated_variables: Vec<String>,
    /// `_default` when `export default <expr>` was aliased for registration.
    pub extracted_default_export_name: Option<String>,
}

impl<'a> TransformContext<'a> {
    pub fn is_typescript(&self) -> bool {
        self.options.has(Transform::Typescript)
    }

    pub fn is_flow(&self) -> bool {
        self.options.has(Transform::Flow)
    }

    pub fn is_shadowed(&self, index: usize) -> bool {
        self.shadowed.contains(index)
    }

    pub fn current_is_shadowed(&self) -> bool {
        self.is_shadowed(self.tokens.current_index())
    }

    /// An imported binding that is never read outside type positions.
    pub fn should_elide_imported_name(&self, name: &str) -> bool {
        self.is_typescript()
            && !self.options.keep_unused_imports
            && !self.non_type_identifiers.contains(name)
    }

    /// A name in `export {...}` that only names a type.
    pub fn should_elide_exported_name(&self, name: &str) -> bool {
        self.is_typescript()
            && !self.options.keep_unused_imports
            && self.declaration_info.is_type_only(name)
    }

    /// Module substitution for `name`, e.g. `_m.a`.
    pub fn identifier_replacement(&self, name: &str) -> Option<String> {
        self.imports
            .as_ref()
            .and_then(|imports| imports.get_identifier_replacement(name))
            .map(str::to_string)
    }

    /// Export alias chain for an exported local, e.g. `exports.a = exports.b`.
    pub fn export_binding(&self, name: &str) -> Option<String> {
        self.imports
            .as_ref()
            .and_then(|imports| imports.resolve_export_binding(name))
    }
}
