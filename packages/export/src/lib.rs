//! Export facade over the code generators.
//!
//! Dispatches a tree to the readable, SQL and Mongo backends, the identity
//! JSON output, or a caller-supplied [`Backend`].

mod backend;
mod error;
mod export;
mod format;

pub use backend::{Backend, CustomBackend, JsonBackend, MongoBackend, ReadableBackend, SqlBackend};
pub use error::{CompileError, CompileResult};
pub use export::{can_export_to_format, export, export_all, export_all_with, ExportBundle, ExportOptions, ExportOutput};
pub use format::ExportFormat;

pub use rulecraft_compiler_mongo as mongo;
pub use rulecraft_compiler_readable as readable;
pub use rulecraft_compiler_sql as sql;
