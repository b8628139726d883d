//! MongoDB backend: renders a rule tree as a query filter document.

mod compiler;

#[cfg(test)]
mod tests;

pub use compiler::{compile_to_mongo, format_mongo, CompileOptions};
