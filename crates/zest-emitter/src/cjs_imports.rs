//! Binding resolution for the CommonJS module rewrite.
//!
//! Before any output is produced, every `import` and `export ... from` in the
//! file is collected into one `ImportInfo` per module path. From that the
//! processor decides, per path, the single load statement that replaces the
//! first import of the path, and the substitution (`a` -> `_m.a`) for every
//! imported binding. Exported locals get an export-binding chain so that
//! later assignments keep `exports.x` in sync.

use crate::helpers::{Helper, HelperManager};
use crate::name_manager::NameManager;
use crate::token_processor::TokenProcessor;
use crate::util::{get_specifier_info, is_simple_export_var};
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use zest_common::{Result, TransformOptions};
use zest_scanner::{ContextualKeyword, TokenType};

#[derive(Debug, Clone, PartialEq, Eq)]
struct NamedImport {
    imported_name: String,
    local_name: String,
}

/// Everything the file pulls from (or re-exports out of) one module path.
#[derive(Debug, Clone, Default)]
struct ImportInfo {
    default_names: SmallVec<[String; 1]>,
    wildcard_names: SmallVec<[String; 1]>,
    named_imports: Vec<NamedImport>,
    named_exports: Vec<NamedImport>,
    has_bare_import: bool,
    export_star_names: SmallVec<[String; 1]>,
    has_star_export: bool,
}

impl ImportInfo {
    fn has_reexports(&self) -> bool {
        self.has_star_export || !self.export_star_names.is_empty() || !self.named_exports.is_empty()
    }

    fn is_unused(&self) -> bool {
        self.default_names.is_empty()
            && self.wildcard_names.is_empty()
            && self.named_imports.is_empty()
            && !self.has_reexports()
    }
}

#[derive(Debug, Default)]
pub struct CjsImportProcessor {
    import_info_by_path: IndexMap<String, ImportInfo>,
    /// Paths whose every binding was elided as type-only.
    pruned_paths: FxHashSet<String>,
    imports_to_replace: FxHashMap<String, String>,
    identifier_replacements: FxHashMap<String, String>,
    export_bindings_by_local_name: FxHashMap<String, SmallVec<[String; 1]>>,
    legacy_typescript_interop: bool,
}

impl CjsImportProcessor {
    pub fn new(options: &TransformOptions) -> Self {
        CjsImportProcessor {
            legacy_typescript_interop: options.enable_legacy_typescript_module_interop,
            ..Default::default()
        }
    }

    /// Collect imports, re-exports and exported locals from the whole file.
    pub fn preprocess_tokens(&mut self, tokens: &TokenProcessor<'_>) -> Result<()> {
        for index in 0..tokens.tokens().len() {
            let token = tokens.token_at(index);
            if token.is_type {
                continue;
            }
            if tokens.matches1_at_index(index, TokenType::IMPORT)
                && !tokens.matches_at_index(index, &[TokenType::IMPORT, TokenType::NAME, TokenType::EQ])
            {
                self.preprocess_import_at_index(tokens, index)?;
            }
            if tokens.matches1_at_index(index, TokenType::EXPORT)
                && !tokens.matches2_at_index(index, TokenType::EXPORT, TokenType::EQ)
            {
                self.preprocess_export_at_index(tokens, index)?;
            }
        }
        tracing::debug!(
            paths = self.import_info_by_path.len(),
            export_bindings = self.export_bindings_by_local_name.len(),
            "collected module bindings"
        );
        Ok(())
    }

    fn preprocess_import_at_index(&mut self, tokens: &TokenProcessor<'_>, import_index: usize) -> Result<()> {
        let mut index = import_index + 1;
        // Dynamic `import()` and `import.meta`.
        if tokens.matches1_at_index(index, TokenType::PAREN_L) || tokens.matches1_at_index(index, TokenType::DOT) {
            return Ok(());
        }
        let mut default_names = SmallVec::<[String; 1]>::new();
        let mut wildcard_names = SmallVec::<[String; 1]>::new();
        let mut named_imports = Vec::new();
        if tokens.matches1_at_index(index, TokenType::NAME) {
            default_names.push(tokens.identifier_name_at_index(index).to_string());
            index += 1;
            if tokens.matches1_at_index(index, TokenType::COMMA) {
                index += 1;
            }
        }
        if tokens.matches1_at_index(index, TokenType::STAR) {
            // * as ns
            index += 2;
            wildcard_names.push(tokens.identifier_name_at_index(index).to_string());
            index += 1;
        }
        if tokens.matches1_at_index(index, TokenType::BRACE_L) {
            let (next_index, named) = self.get_named_imports(tokens, index + 1)?;
            index = next_index;
            for named_import in named {
                // `{default as x}` goes through the default-import interop.
                if named_import.imported_name == "default" {
                    default_names.push(named_import.local_name);
                } else {
                    named_imports.push(named_import);
                }
            }
        }
        if tokens.matches_contextual_at_index(index, ContextualKeyword::From) {
            index += 1;
        }
        if !tokens.matches1_at_index(index, TokenType::STRING) {
            return Err(zest_common::TransformError::unexpected_token(
                tokens.code(),
                tokens.token_at(index).start,
                "Expected string token at the end of import statement",
            ));
        }
        let path = tokens.string_value_at_index(index).to_string();
        let info = self.import_info_by_path.entry(path).or_default();
        if default_names.is_empty() && wildcard_names.is_empty() && named_imports.is_empty() {
            info.has_bare_import = true;
        }
        info.default_names.extend(default_names);
        info.wildcard_names.extend(wildcard_names);
        info.named_imports.extend(named_imports);
        Ok(())
    }

    fn preprocess_export_at_index(&mut self, tokens: &TokenProcessor<'_>, index: usize) -> Result<()> {
        let next = tokens.token_at(index + 1).token_type;
        match next {
            TokenType::VAR | TokenType::LET | TokenType::CONST => {
                if is_simple_export_var(tokens, index) {
                    let name = tokens.identifier_name_at_index(index + 2).to_string();
                    self.add_export_binding(name.clone(), name);
                } else {
                    self.preprocess_var_export_at_index(tokens, index)?;
                }
            }
            TokenType::FUNCTION | TokenType::ASYNC | TokenType::CLASS | TokenType::ABSTRACT => {
                let mut name_index = index + 1;
                while matches!(
                    tokens.token_at(name_index).token_type,
                    TokenType::FUNCTION | TokenType::ASYNC | TokenType::CLASS | TokenType::ABSTRACT | TokenType::STAR
                ) {
                    name_index += 1;
                }
                if tokens.matches1_at_index(name_index, TokenType::NAME) {
                    let name = tokens.identifier_name_at_index(name_index).to_string();
                    self.add_export_binding(name.clone(), name);
                }
            }
            TokenType::BRACE_L => self.preprocess_named_export_at_index(tokens, index)?,
            TokenType::STAR => self.preprocess_export_star_at_index(tokens, index)?,
            _ => {}
        }
        Ok(())
    }

    /// `export let {a, b: [c]} = d;` exports every declared name, and every
    /// later read goes through `exports`.
    fn preprocess_var_export_at_index(&mut self, tokens: &TokenProcessor<'_>, export_index: usize) -> Result<()> {
        let mut depth = 0usize;
        let mut index = export_index + 2;
        while index < tokens.tokens().len() {
            let token = tokens.token_at(index);
            match token.token_type {
                TokenType::BRACE_L | TokenType::DOLLAR_BRACE_L | TokenType::BRACKET_L => depth += 1,
                TokenType::BRACE_R | TokenType::BRACKET_R => depth = depth.saturating_sub(1),
                TokenType::EQ => {
                    let rhs_end = token
                        .rhs_end_index
                        .ok_or_else(|| tokens_error(tokens, index, "Expected = token with an end index"))?;
                    index = rhs_end;
                    continue;
                }
                tt if depth == 0 && tt != TokenType::NAME && tt != TokenType::COMMA && !token.is_type => break,
                TokenType::NAME => {
                    if token.identifier_role.is_some_and(|role| role.is_declaration()) {
                        let name = tokens.identifier_name_at_index(index);
                        self.identifier_replacements
                            .insert(name.to_string(), format!("exports.{name}"));
                    }
                }
                _ => {}
            }
            index += 1;
        }
        Ok(())
    }

    /// `export {a as b}` is a local export binding unless followed by `from`.
    fn preprocess_named_export_at_index(&mut self, tokens: &TokenProcessor<'_>, export_index: usize) -> Result<()> {
        let (mut index, named) = self.get_named_imports(tokens, export_index + 2)?;
        if !tokens.matches_contextual_at_index(index, ContextualKeyword::From) {
            for NamedImport {
                imported_name: local_name,
                local_name: exported_name,
            } in named
            {
                self.add_export_binding(local_name, exported_name);
            }
            return Ok(());
        }
        index += 1;
        if !tokens.matches1_at_index(index, TokenType::STRING) {
            return Err(tokens_error(tokens, index, "Expected string token at the end of export statement"));
        }
        let path = tokens.string_value_at_index(index).to_string();
        self.import_info_by_path
            .entry(path)
            .or_default()
            .named_exports
            .extend(named);
        Ok(())
    }

    fn preprocess_export_star_at_index(&mut self, tokens: &TokenProcessor<'_>, export_index: usize) -> Result<()> {
        let mut index = export_index + 2;
        let mut exported_name = None;
        if tokens.matches1_at_index(index, TokenType::AS) || tokens.matches_contextual_at_index(index, ContextualKeyword::As) {
            exported_name = Some(tokens.identifier_name_at_index(index + 1).to_string());
            index += 2;
        }
        // from
        index += 1;
        if !tokens.matches1_at_index(index, TokenType::STRING) {
            return Err(tokens_error(tokens, index, "Expected string token at the end of star export statement"));
        }
        let path = tokens.string_value_at_index(index).to_string();
        let info = self.import_info_by_path.entry(path).or_default();
        match exported_name {
            Some(name) => info.export_star_names.push(name),
            None => info.has_star_export = true,
        }
        Ok(())
    }

    /// Read a `{...}` specifier list starting after the `{`. Returns the index
    /// after the `}` and the value (non-type) specifiers.
    fn get_named_imports(&self, tokens: &TokenProcessor<'_>, mut index: usize) -> Result<(usize, Vec<NamedImport>)> {
        let mut named = Vec::new();
        loop {
            if tokens.matches1_at_index(index, TokenType::BRACE_R) {
                return Ok((index + 1, named));
            }
            let info = get_specifier_info(tokens, index)?;
            index = info.end_index;
            if !info.is_type {
                named.push(NamedImport {
                    imported_name: info.left_name,
                    local_name: info.right_name,
                });
            }
            if tokens.matches2_at_index(index, TokenType::COMMA, TokenType::BRACE_R) {
                return Ok((index + 2, named));
            } else if tokens.matches1_at_index(index, TokenType::COMMA) {
                index += 1;
            } else if !tokens.matches1_at_index(index, TokenType::BRACE_R) {
                return Err(tokens_error(tokens, index, "Unexpected token in import/export specifiers"));
            }
        }
    }

    fn add_export_binding(&mut self, local_name: String, exported_name: String) {
        self.export_bindings_by_local_name
            .entry(local_name)
            .or_default()
            .push(exported_name);
    }

    /// Drop every path whose imported names are all used only as types.
    /// `import {} from 'm'` counts as type-only; a bare `import 'm'` does not.
    pub fn prune_type_only_imports(&mut self, non_type_identifiers: &FxHashSet<String>) {
        for (path, info) in &self.import_info_by_path {
            if info.has_bare_import || info.has_reexports() {
                continue;
            }
            let all_elided = info
                .default_names
                .iter()
                .chain(info.wildcard_names.iter())
                .chain(info.named_imports.iter().map(|named| &named.local_name))
                .all(|name| !non_type_identifiers.contains(name));
            if all_elided {
                tracing::trace!(path = %path, "pruned type-only import");
                self.pruned_paths.insert(path.clone());
            }
        }
    }

    /// Decide the load statement for every path and the substitution for
    /// every imported binding.
    pub fn generate_import_replacements(&mut self, names: &mut NameManager, helpers: &mut HelperManager) {
        for (path, info) in &self.import_info_by_path {
            if self.pruned_paths.contains(path) {
                self.imports_to_replace.insert(path.clone(), String::new());
                continue;
            }
            if info.is_unused() {
                self.imports_to_replace
                    .insert(path.clone(), format!("require('{path}');"));
                continue;
            }
            let primary_name = Self::get_free_identifier_for_path(names, path);
            let secondary_name = if self.legacy_typescript_interop {
                primary_name.clone()
            } else if let Some(wildcard) = info.wildcard_names.first() {
                wildcard.clone()
            } else {
                Self::get_free_identifier_for_path(names, path)
            };
            let mut require_code = format!("var {primary_name} = require('{path}');");
            if !info.wildcard_names.is_empty() {
                for wildcard_name in &info.wildcard_names {
                    let module_expr = if self.legacy_typescript_interop {
                        primary_name.clone()
                    } else {
                        let helper = helpers.get_helper_name(names, Helper::InteropRequireWildcard);
                        format!("{helper}({primary_name})")
                    };
                    require_code.push_str(&format!(" var {wildcard_name} = {module_expr};"));
                }
            } else if !info.export_star_names.is_empty() && secondary_name != primary_name {
                let helper = helpers.get_helper_name(names, Helper::InteropRequireWildcard);
                require_code.push_str(&format!(" var {secondary_name} = {helper}({primary_name});"));
            } else if !info.default_names.is_empty() && secondary_name != primary_name {
                let helper = helpers.get_helper_name(names, Helper::InteropRequireDefault);
                require_code.push_str(&format!(" var {secondary_name} = {helper}({primary_name});"));
            }
            for NamedImport {
                imported_name,
                local_name,
            } in &info.named_exports
            {
                let helper = helpers.get_helper_name(names, Helper::CreateNamedExportFrom);
                require_code.push_str(&format!(
                    " {helper}({primary_name}, '{local_name}', '{imported_name}');"
                ));
            }
            for export_star_name in &info.export_star_names {
                require_code.push_str(&format!(" exports.{export_star_name} = {secondary_name};"));
            }
            if info.has_star_export {
                let helper = helpers.get_helper_name(names, Helper::CreateStarExport);
                require_code.push_str(&format!(" {helper}({primary_name});"));
            }
            tracing::debug!(path = %path, handle = %primary_name, "generated module load");
            self.imports_to_replace.insert(path.clone(), require_code);
            for default_name in &info.default_names {
                self.identifier_replacements
                    .insert(default_name.clone(), format!("{secondary_name}.default"));
            }
            for NamedImport {
                imported_name,
                local_name,
            } in &info.named_imports
            {
                self.identifier_replacements
                    .insert(local_name.clone(), format!("{primary_name}.{imported_name}"));
            }
        }
    }

    /// `_react` for `react`, `_Button` for `./components/Button.js`.
    pub fn get_free_identifier_for_path(names: &mut NameManager, path: &str) -> String {
        let last_component = path.rsplit('/').next().unwrap_or(path);
        let base_name: String = last_component
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        names.claim_free_name(&format!("_{base_name}"))
    }

    /// The load statement for `path` the first time, `""` afterwards.
    pub fn claim_import_code(&mut self, path: &str) -> String {
        match self.imports_to_replace.get_mut(path) {
            Some(code) => std::mem::take(code),
            None => String::new(),
        }
    }

    pub fn get_identifier_replacement(&self, name: &str) -> Option<&str> {
        self.identifier_replacements.get(name).map(String::as_str)
    }

    /// `exports.a = exports.b` for a local exported as `a` and `b`.
    pub fn resolve_export_binding(&self, local_name: &str) -> Option<String> {
        let exported = self.export_bindings_by_local_name.get(local_name)?;
        if exported.is_empty() {
            return None;
        }
        Some(
            exported
                .iter()
                .map(|name| format!("exports.{name}"))
                .collect::<Vec<_>>()
                .join(" = "),
        )
    }

    /// Names whose nested redeclarations must be tracked by the shadowing scan.
    ///
    /// Import bindings are read from the preprocessed import info, so the set
    /// is complete before any replacement has been generated.
    pub fn get_global_names(&self) -> FxHashSet<String> {
        let import_names = self.import_info_by_path.values().flat_map(|info| {
            info.default_names
                .iter()
                .chain(&info.wildcard_names)
                .chain(info.named_imports.iter().map(|named| &named.local_name))
        });
        import_names
            .chain(self.identifier_replacements.keys())
            .chain(self.export_bindings_by_local_name.keys())
            .cloned()
            .collect()
    }
}

fn tokens_error(tokens: &TokenProcessor<'_>, index: usize, message: &str) -> zest_common::TransformError {
    zest_common::TransformError::unexpected_token(tokens.code(), tokens.token_at(index).start, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zest_common::{Dialect, Transform};

    fn processor_for(code: &str, options: &TransformOptions) -> (CjsImportProcessor, NameManager, HelperManager) {
        let dialect = Dialect {
            typescript: options.has(Transform::Typescript),
            ..Dialect::default()
        };
        let parsed = match zest_scanner::tokenize(code, dialect) {
            Ok(parsed) => parsed,
            Err(err) => panic!("tokenize failed: {err}"),
        };
        let mut names = NameManager::new(code, &parsed.tokens);
        let mut helpers = HelperManager::new();
        let tokens = TokenProcessor::new(code, parsed.tokens, false);
        let mut processor = CjsImportProcessor::new(options);
        if let Err(err) = processor.preprocess_tokens(&tokens) {
            panic!("preprocess failed: {err}");
        }
        if options.has(Transform::Typescript) {
            let shadowed = fixedbitset::FixedBitSet::with_capacity(tokens.tokens().len());
            let non_type = crate::util::get_non_type_identifiers(&tokens, &shadowed, options);
            processor.prune_type_only_imports(&non_type);
        }
        processor.generate_import_replacements(&mut names, &mut helpers);
        (processor, names, helpers)
    }

    #[test]
    fn test_named_import_substitution() {
        let options = TransformOptions::new(&[Transform::Imports]);
        let (mut processor, _, _) = processor_for("import {a, b as c} from 'm';", &options);
        assert_eq!(processor.claim_import_code("m"), "var _m = require('m');");
        assert_eq!(processor.get_identifier_replacement("a"), Some("_m.a"));
        assert_eq!(processor.get_identifier_replacement("c"), Some("_m.b"));
        assert_eq!(processor.get_identifier_replacement("b"), None);
    }

    #[test]
    fn test_claim_import_code_only_once() {
        let options = TransformOptions::new(&[Transform::Imports]);
        let (mut processor, _, _) = processor_for("import a from 'm'; import {b} from 'm';", &options);
        let first = processor.claim_import_code("m");
        assert_eq!(
            first,
            "var _m = require('m'); var _m2 = _interopRequireDefault(_m);"
        );
        assert_eq!(processor.claim_import_code("m"), "");
        assert_eq!(processor.get_identifier_replacement("a"), Some("_m2.default"));
        assert_eq!(processor.get_identifier_replacement("b"), Some("_m.b"));
    }

    #[test]
    fn test_bare_import_requires_module() {
        let options = TransformOptions::new(&[Transform::Imports]);
        let (mut processor, _, _) = processor_for("import './polyfill';", &options);
        assert_eq!(processor.claim_import_code("./polyfill"), "require('./polyfill');");
    }

    #[test]
    fn test_namespace_import_uses_wildcard_interop() {
        let options = TransformOptions::new(&[Transform::Imports]);
        let (mut processor, _, helpers) = processor_for("import * as ns from 'm';", &options);
        assert_eq!(
            processor.claim_import_code("m"),
            "var _m = require('m'); var ns = _interopRequireWildcard(_m);"
        );
        assert!(helpers.is_requested(Helper::InteropRequireWildcard));
        assert_eq!(processor.get_identifier_replacement("ns"), None);
    }

    #[test]
    fn test_reexports() {
        let options = TransformOptions::new(&[Transform::Imports]);
        let (mut processor, _, _) = processor_for("export {a as b} from 'm'; export * from 'n';", &options);
        assert_eq!(
            processor.claim_import_code("m"),
            "var _m = require('m'); _createNamedExportFrom(_m, 'b', 'a');"
        );
        assert_eq!(
            processor.claim_import_code("n"),
            "var _n = require('n'); _createStarExport(_n);"
        );
    }

    #[test]
    fn test_export_bindings() {
        let options = TransformOptions::new(&[Transform::Imports]);
        let (processor, _, _) = processor_for("let a = 1; export {a, a as b}; export function f() {}", &options);
        assert_eq!(
            processor.resolve_export_binding("a").as_deref(),
            Some("exports.a = exports.b")
        );
        assert_eq!(processor.resolve_export_binding("f").as_deref(), Some("exports.f"));
        assert_eq!(processor.resolve_export_binding("zzz"), None);
    }

    #[test]
    fn test_destructured_export_var_reads_through_exports() {
        let options = TransformOptions::new(&[Transform::Imports]);
        let (processor, _, _) = processor_for("export const {a, b: [c]} = obj;", &options);
        assert_eq!(processor.get_identifier_replacement("a"), Some("exports.a"));
        assert_eq!(processor.get_identifier_replacement("c"), Some("exports.c"));
        assert_eq!(processor.get_identifier_replacement("obj"), None);
    }

    #[test]
    fn test_type_only_import_is_pruned() {
        let options = TransformOptions::new(&[Transform::Imports, Transform::Typescript]);
        let (mut processor, _, helpers) =
            processor_for("import A, {B} from 'm'; let x: A = new B();", &options);
        assert_eq!(processor.claim_import_code("m"), "var _m = require('m'); var _m2 = _interopRequireDefault(_m);");
        assert!(helpers.is_requested(Helper::InteropRequireDefault));

        let (mut processor, _, helpers) = processor_for("import A from 'm'; let x: A = 1;", &options);
        assert_eq!(processor.claim_import_code("m"), "");
        assert!(!helpers.is_requested(Helper::InteropRequireDefault));
    }

    #[test]
    fn test_handle_names_avoid_collisions() {
        let options = TransformOptions::new(&[Transform::Imports]);
        let (mut processor, _, _) = processor_for("import {a} from './react'; const _react = 1; a;", &options);
        assert_eq!(processor.claim_import_code("./react"), "var _react2 = require('./react');");
    }
}
