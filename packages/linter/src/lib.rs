//! # Rulecraft Linter
//!
//! Structural and semantic validation of rule trees against a field catalog.
//! Findings are returned, never raised; a tree is valid when none of them is
//! an error.

mod diagnostic;
mod linter;
mod rules;

pub use diagnostic::{Diagnostic, DiagnosticLevel};
pub use linter::{is_valid, lint_tree, LintOptions, UNKNOWN_FIELD_RULE};
pub use rules::{
    ContradictionRule, EmptyGroupRule, FieldConstraintsRule, MissingValueRule,
    OperatorCompatRule, RuleContext, RuleRegistry, ValidationRule, ValueTypeRule,
};
