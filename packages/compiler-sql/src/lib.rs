//! SQL backend: renders a rule tree as the body of a `WHERE` clause.

mod compiler;

#[cfg(test)]
mod tests;

pub use compiler::{compile_to_sql, format_sql, quote_identifier, quote_string, CompileOptions};
