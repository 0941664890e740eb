//! Token-stream queries shared by several rewrite units.

pub mod identifiers;
pub mod jsx_entities;
pub mod shadowed_globals;
pub mod specifiers;
pub mod statements;

pub use identifiers::{
    DeclarationInfo, get_declaration_info, get_non_type_identifiers, get_ts_imported_names,
    is_identifier, pragma_base,
};
pub use jsx_entities::lookup_entity;
pub use shadowed_globals::identify_shadowed_globals;
pub use specifiers::{SpecifierInfo, get_specifier_info};
pub use statements::{
    elide_import_equals, is_export_from, is_simple_export_var, remove_maybe_import_attributes,
    should_elide_default_export,
};
