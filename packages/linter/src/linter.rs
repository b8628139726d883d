use crate::diagnostic::{Diagnostic, DiagnosticLevel};
use crate::rules::{RuleContext, RuleRegistry};
use rulecraft_common::{walk_group, Visitor};
use rulecraft_model::{Condition, FieldCatalog, Group, NodeId, RuleTree};

/// Rule name reported for conditions whose field is not in the catalog
pub const UNKNOWN_FIELD_RULE: &str = "unknown-field";

/// Options for configuring the linter
#[derive(Debug, Default)]
pub struct LintOptions {
    /// Custom rule registry (uses default if None)
    pub registry: Option<RuleRegistry>,

    /// Rule names to skip
    pub disabled: Vec<String>,
}

impl LintOptions {
    pub fn disable(mut self, rule: impl Into<String>) -> Self {
        self.disabled.push(rule.into());
        self
    }
}

/// Lint a rule tree and return diagnostics in depth-first order
///
/// Group findings come before the findings of the group's children.
pub fn lint_tree(tree: &RuleTree, catalog: &FieldCatalog, options: &LintOptions) -> Vec<Diagnostic> {
    let default_registry;
    let registry = match &options.registry {
        Some(registry) => registry,
        None => {
            default_registry = RuleRegistry::default();
            &default_registry
        }
    };

    let mut linter = TreeLinter {
        catalog,
        registry,
        disabled: &options.disabled,
        path: Vec::new(),
        diagnostics: Vec::new(),
    };
    linter.visit_tree(tree);

    tracing::debug!(
        findings = linter.diagnostics.len(),
        root = tree.root_id(),
        "Linted rule tree"
    );
    linter.diagnostics
}

/// True when linting with the default rules finds no errors
pub fn is_valid(tree: &RuleTree, catalog: &FieldCatalog) -> bool {
    lint_tree(tree, catalog, &LintOptions::default())
        .iter()
        .all(|diagnostic| diagnostic.level != DiagnosticLevel::Error)
}

struct TreeLinter<'a> {
    catalog: &'a FieldCatalog,
    registry: &'a RuleRegistry,
    disabled: &'a [String],
    path: Vec<NodeId>,
    diagnostics: Vec<Diagnostic>,
}

impl TreeLinter<'_> {
    fn enabled(&self, rule: &str) -> bool {
        !self.disabled.iter().any(|name| name == rule)
    }
}

impl Visitor for TreeLinter<'_> {
    fn visit_group(&mut self, group: &Group) {
        self.path.push(group.id.clone());

        let ctx = RuleContext {
            catalog: self.catalog,
            path: &self.path,
        };
        let mut found = Vec::new();
        for rule in self.registry.rules() {
            if self.enabled(rule.name()) {
                found.extend(rule.check_group(group, &ctx));
            }
        }
        self.diagnostics.extend(found);

        walk_group(self, group);
        self.path.pop();
    }

    fn visit_condition(&mut self, condition: &Condition) {
        self.path.push(condition.id.clone());

        match self.catalog.get(&condition.field_name) {
            None => {
                if self.enabled(UNKNOWN_FIELD_RULE) {
                    self.diagnostics.push(
                        Diagnostic::error(
                            UNKNOWN_FIELD_RULE,
                            format!("Unknown field '{}'", condition.field_name),
                            &self.path,
                        )
                        .with_suggestion("Pick a field from the catalog"),
                    );
                }
            }
            Some(field) => {
                let ctx = RuleContext {
                    catalog: self.catalog,
                    path: &self.path,
                };
                let mut found = Vec::new();
                for rule in self.registry.rules() {
                    if self.enabled(rule.name()) {
                        found.extend(rule.check_condition(condition, field, &ctx));
                    }
                }
                self.diagnostics.extend(found);
            }
        }

        self.path.pop();
    }
}
