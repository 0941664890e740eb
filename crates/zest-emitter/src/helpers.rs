//! Runtime helper registry.
//!
//! Rewrites that need runtime support (module interop, optional chaining,
//! nullish coalescing, logical assignment) request a helper by kind and get
//! back the local name it will be declared under. Each requested helper is
//! emitted once, minified onto the first line of the output.

use crate::name_manager::NameManager;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Helper {
    /// `require` for ES modules, built with `createRequire`.
    Require,
    InteropRequireWildcard,
    InteropRequireDefault,
    CreateNamedExportFrom,
    CreateStarExport,
    NullishCoalesce,
    AsyncNullishCoalesce,
    OptionalChain,
    AsyncOptionalChain,
    OptionalChainDelete,
    AsyncOptionalChainDelete,
    LogicalAssign,
}

impl Helper {
    /// Emission order.
    pub const ALL: [Helper; 12] = [
        Helper::Require,
        Helper::InteropRequireWildcard,
        Helper::InteropRequireDefault,
        Helper::CreateNamedExportFrom,
        Helper::CreateStarExport,
        Helper::NullishCoalesce,
        Helper::AsyncNullishCoalesce,
        Helper::OptionalChain,
        Helper::AsyncOptionalChain,
        Helper::OptionalChainDelete,
        Helper::AsyncOptionalChainDelete,
        Helper::LogicalAssign,
    ];

    pub fn base_name(self) -> &'static str {
        match self {
            Helper::Require => "require",
            Helper::InteropRequireWildcard => "interopRequireWildcard",
            Helper::InteropRequireDefault => "interopRequireDefault",
            Helper::CreateNamedExportFrom => "createNamedExportFrom",
            Helper::CreateStarExport => "createStarExport",
            Helper::NullishCoalesce => "nullishCoalesce",
            Helper::AsyncNullishCoalesce => "asyncNullishCoalesce",
            Helper::OptionalChain => "optionalChain",
            Helper::AsyncOptionalChain => "asyncOptionalChain",
            Helper::OptionalChainDelete => "optionalChainDelete",
            Helper::AsyncOptionalChainDelete => "asyncOptionalChainDelete",
            Helper::LogicalAssign => "logicalAssign",
        }
    }

    /// The helper another helper calls into, if any.
    fn dependency(self) -> Option<Helper> {
        match self {
            Helper::OptionalChainDelete => Some(Helper::OptionalChain),
            Helper::AsyncOptionalChainDelete => Some(Helper::AsyncOptionalChain),
            _ => None,
        }
    }

    fn template(self) -> &'static str {
        match self {
            Helper::Require => {
                r#"
                import {createRequire as CREATE_REQUIRE_NAME} from "module";
                const require = CREATE_REQUIRE_NAME(import.meta.url);
                "#
            }
            Helper::InteropRequireWildcard => {
                r#"
                function interopRequireWildcard(obj) {
                  if (obj && obj.__esModule) {
                    return obj;
                  } else {
                    var newObj = {};
                    if (obj != null) {
                      for (var key in obj) {
                        if (Object.prototype.hasOwnProperty.call(obj, key)) {
                          newObj[key] = obj[key];
                        }
                      }
                    }
                    newObj.default = obj;
                    return newObj;
                  }
                }
                "#
            }
            Helper::InteropRequireDefault => {
                r#"
                function interopRequireDefault(obj) {
                  return obj && obj.__esModule ? obj : { default: obj };
                }
                "#
            }
            Helper::CreateNamedExportFrom => {
                r#"
                function createNamedExportFrom(obj, localName, importedName) {
                  Object.defineProperty(exports, localName, {enumerable: true, configurable: true, get: () => obj[importedName]});
                }
                "#
            }
            Helper::CreateStarExport => {
                r#"
                function createStarExport(obj) {
                  Object.keys(obj)
                    .filter((key) => key !== "default" && key !== "__esModule")
                    .forEach((key) => {
                      if (exports.hasOwnProperty(key)) {
                        return;
                      }
                      Object.defineProperty(exports, key, {enumerable: true, configurable: true, get: () => obj[key]});
                    });
                }
                "#
            }
            Helper::NullishCoalesce => {
                r#"
                function nullishCoalesce(lhs, rhsFn) {
                  if (lhs != null) {
                    return lhs;
                  } else {
                    return rhsFn();
                  }
                }
                "#
            }
            Helper::AsyncNullishCoalesce => {
                r#"
                async function asyncNullishCoalesce(lhs, rhsFn) {
                  if (lhs != null) {
                    return lhs;
                  } else {
                    return await rhsFn();
                  }
                }
                "#
            }
            Helper::OptionalChain => {
                r#"
                function optionalChain(ops) {
                  let lastAccessLHS = undefined;
                  let value = ops[0];
                  let i = 1;
                  while (i < ops.length) {
                    const op = ops[i];
                    const fn = ops[i + 1];
                    i += 2;
                    if ((op === 'optionalAccess' || op === 'optionalCall') && value == null) {
                      return undefined;
                    }
                    if (op === 'access' || op === 'optionalAccess') {
                      lastAccessLHS = value;
                      value = fn(value);
                    } else if (op === 'call' || op === 'optionalCall') {
                      value = fn((...args) => value.call(lastAccessLHS, ...args));
                      lastAccessLHS = undefined;
                    }
                  }
                  return value;
                }
                "#
            }
            Helper::AsyncOptionalChain => {
                r#"
                async function asyncOptionalChain(ops) {
                  let lastAccessLHS = undefined;
                  let value = ops[0];
                  let i = 1;
                  while (i < ops.length) {
                    const op = ops[i];
                    const fn = ops[i + 1];
                    i += 2;
                    if ((op === 'optionalAccess' || op === 'optionalCall') && value == null) {
                      return undefined;
                    }
                    if (op === 'access' || op === 'optionalAccess') {
                      lastAccessLHS = value;
                      value = await fn(value);
                    } else if (op === 'call' || op === 'optionalCall') {
                      value = await fn((...args) => value.call(lastAccessLHS, ...args));
                      lastAccessLHS = undefined;
                    }
                  }
                  return value;
                }
                "#
            }
            Helper::OptionalChainDelete => {
                r#"
                function optionalChainDelete(ops) {
                  const result = OPTIONAL_CHAIN_NAME(ops);
                  return result == null ? true : result;
                }
                "#
            }
            Helper::AsyncOptionalChainDelete => {
                r#"
                async function asyncOptionalChainDelete(ops) {
                  const result = await OPTIONAL_CHAIN_NAME(ops);
                  return result == null ? true : result;
                }
                "#
            }
            Helper::LogicalAssign => {
                r#"
                function logicalAssign(obj, prop, op, rhsFn) {
                  if (op === '||=') {
                    return obj[prop] || (obj[prop] = rhsFn())
                  } else if (op === '&&=') {
                    return obj[prop] && (obj[prop] = rhsFn())
                  } else if (op === '??=') {
                    const val = obj[prop];
                    if (val == null) {
                      return obj[prop] = rhsFn()
                    }
                    return val
                  }
                }
                "#
            }
        }
    }
}

/// Per-file helper names, claimed on first request.
#[derive(Debug, Default)]
pub struct HelperManager {
    helper_names: FxHashMap<Helper, String>,
    create_require_name: Option<String>,
}

impl HelperManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Local name of `helper`, claiming `_<baseName>` the first time.
    pub fn get_helper_name(&mut self, names: &mut NameManager, helper: Helper) -> String {
        if let Some(name) = self.helper_names.get(&helper) {
            return name.clone();
        }
        let name = names.claim_free_name(&format!("_{}", helper.base_name()));
        tracing::trace!(helper = helper.base_name(), name = %name, "claimed helper");
        self.helper_names.insert(helper, name.clone());
        name
    }

    pub fn is_requested(&self, helper: Helper) -> bool {
        self.helper_names.contains_key(&helper)
    }

    /// Render every requested helper, each preceded by a space, on one line.
    pub fn emit_helpers(&mut self, names: &mut NameManager) -> String {
        for helper in Helper::ALL {
            if self.is_requested(helper)
                && let Some(dependency) = helper.dependency()
            {
                self.get_helper_name(names, dependency);
            }
        }
        let mut result = String::new();
        for helper in Helper::ALL {
            let Some(helper_name) = self.helper_names.get(&helper).cloned() else {
                continue;
            };
            let mut code = helper.template().to_string();
            if let Some(dependency) = helper.dependency()
                && let Some(dependency_name) = self.helper_names.get(&dependency)
            {
                code = code.replace("OPTIONAL_CHAIN_NAME", dependency_name);
            }
            if helper == Helper::Require {
                let create_require = self
                    .create_require_name
                    .get_or_insert_with(|| names.claim_free_name("_createRequire"));
                code = code.replace("CREATE_REQUIRE_NAME", create_require);
            }
            let code = code.replacen(helper.base_name(), &helper_name, 1);
            result.push(' ');
            result.push_str(&minify(&code));
        }
        result
    }
}

fn minify(code: &str) -> String {
    code.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helper_name_is_memoized() {
        let mut names = NameManager::default();
        let mut helpers = HelperManager::new();
        let first = helpers.get_helper_name(&mut names, Helper::NullishCoalesce);
        let second = helpers.get_helper_name(&mut names, Helper::NullishCoalesce);
        assert_eq!(first, "_nullishCoalesce");
        assert_eq!(first, second);
    }

    #[test]
    fn test_emit_only_requested_helpers() {
        let mut names = NameManager::default();
        let mut helpers = HelperManager::new();
        helpers.get_helper_name(&mut names, Helper::InteropRequireDefault);
        let code = helpers.emit_helpers(&mut names);
        assert_eq!(
            code,
            " function _interopRequireDefault(obj) { return obj && obj.__esModule ? obj : { default: obj }; }"
        );
    }

    #[test]
    fn test_delete_helper_pulls_in_base_chain_helper() {
        let mut names = NameManager::default();
        let mut helpers = HelperManager::new();
        helpers.get_helper_name(&mut names, Helper::OptionalChainDelete);
        let code = helpers.emit_helpers(&mut names);
        assert!(code.contains("function _optionalChain(ops)"));
        assert!(code.contains("const result = _optionalChain(ops);"));
        let chain = code.find("function _optionalChain(");
        let delete = code.find("function _optionalChainDelete(");
        assert!(chain < delete);
    }

    #[test]
    fn test_require_helper_uses_create_require() {
        let mut names = NameManager::default();
        let mut helpers = HelperManager::new();
        let name = helpers.get_helper_name(&mut names, Helper::Require);
        assert_eq!(name, "_require");
        let code = helpers.emit_helpers(&mut names);
        assert_eq!(
            code,
            " import {createRequire as _createRequire} from \"module\"; const _require = _createRequire(import.meta.url);"
        );
    }

    #[test]
    fn test_emitted_helpers_are_single_line() {
        let mut names = NameManager::default();
        let mut helpers = HelperManager::new();
        for helper in Helper::ALL {
            helpers.get_helper_name(&mut names, helper);
        }
        assert!(!helpers.emit_helpers(&mut names).contains('\n'));
    }
}
