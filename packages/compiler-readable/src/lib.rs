//! Readable backend: renders a rule tree as an English sentence such as
//! `Age is greater than 18 AND Name equals "O'Brien"`.

mod compiler;

#[cfg(test)]
mod tests;

pub use compiler::{compile_to_readable, format_readable, operator_phrase, CompileOptions};
