//! Rewrite units.
//!
//! Each unit looks at the current token and either claims it (emitting
//! whatever replaces it and advancing the cursor) or declines so the next
//! unit gets a chance. Units are offered tokens in a fixed order; see
//! [`crate::RootTransformer::unit_names`].

use crate::context::TransformContext;
use crate::driver::Driver;
use zest_common::Result;

pub mod cjs_imports;
pub mod esm_imports;
pub mod flow;
pub mod jest_hoist;
pub mod jsx;
pub mod logical_assignment;
pub mod numeric_separator;
pub mod optional_catch_binding;
pub mod optional_chaining_nullish;
pub mod react_display_name;
pub mod react_hot_loader;
pub mod typescript;

pub use cjs_imports::CjsImportTransformer;
pub use esm_imports::EsmImportTransformer;
pub use flow::FlowTransformer;
pub use jest_hoist::JestHoistTransformer;
pub use jsx::JsxTransformer;
pub use logical_assignment::LogicalAssignmentTransformer;
pub use numeric_separator::NumericSeparatorTransformer;
pub use optional_catch_binding::OptionalCatchBindingTransformer;
pub use optional_chaining_nullish::OptionalChainingNullishTransformer;
pub use react_display_name::ReactDisplayNameTransformer;
pub use react_hot_loader::ReactHotLoaderTransformer;
pub use typescript::TypeScriptTransformer;

/// One rewrite unit.
///
/// Units keep their own per-file state in `Cell`/`RefCell` fields; anything
/// shared lives in the [`TransformContext`].
pub trait Transformer {
    /// Stable kebab-case name, used in logs and in the unit order contract.
    fn name(&self) -> &'static str;

    /// Try to claim the current token. Returning `false` must leave the
    /// cursor and output untouched.
    fn process(&self, cx: &mut TransformContext<'_>, driver: &Driver) -> Result<bool>;

    /// Code placed before the body, on the first line.
    fn prefix_code(&self, _cx: &TransformContext<'_>) -> String {
        String::new()
    }

    /// Code placed after every prefix, e.g. calls that must run before the
    /// first `require`.
    fn hoisted_code(&self, _cx: &TransformContext<'_>) -> String {
        String::new()
    }

    fn suffix_code(&self, _cx: &TransformContext<'_>) -> String {
        String::new()
    }
}
