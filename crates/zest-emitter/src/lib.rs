//! Token-rewriting passes for the zest compiler.
//!
//! The emitter walks the annotated token stream once, offering each token to
//! a fixed list of rewrite units:
//! - `TokenProcessor` - Cursor plus output buffer with snapshot/restore
//! - `Driver` - The root loop and the recursion capability handed to units
//! - `transforms` - The rewrite units themselves
//! - `RootTransformer` - Builds the unit list for one file and assembles
//!   prefix, body and suffix
//!
//! Output keeps every input line on its own line; generated code is only
//! ever added to existing lines.

// Output buffer and token cursor
pub mod token_processor;
pub use token_processor::{TokenProcessor, TokenProcessorSnapshot};

// Per-file allocation of fresh identifiers and runtime helpers
pub mod helpers;
pub mod name_manager;
pub use helpers::{Helper, HelperManager};
pub use name_manager::NameManager;

// Token-stream queries
pub mod util;

// Module bookkeeping for the CommonJS rewrite
pub mod cjs_imports;
pub use cjs_imports::CjsImportProcessor;

// Class bodies (fields, constructors, decorators)
pub mod class_info;

// Driver and rewrite units
pub mod context;
pub mod driver;
pub mod transforms;
pub use context::TransformContext;
pub use driver::Driver;
pub use transforms::Transformer;

pub mod root_transformer;
pub use root_transformer::{EmitOutput, RootTransformer};
