mod contradiction;
mod empty_group;
mod field_constraints;
mod missing_value;
mod operator_compat;
mod value_type;

pub use contradiction::ContradictionRule;
pub use empty_group::EmptyGroupRule;
pub use field_constraints::FieldConstraintsRule;
pub use missing_value::MissingValueRule;
pub use operator_compat::OperatorCompatRule;
pub use value_type::ValueTypeRule;

use crate::diagnostic::Diagnostic;
use rulecraft_model::{Condition, FieldCatalog, FieldDef, Group, NodeId};

/// What a rule can see besides the node under inspection
pub struct RuleContext<'a> {
    pub catalog: &'a FieldCatalog,

    /// Ids from the root down to the node under inspection
    pub path: &'a [NodeId],
}

/// Trait for implementing validation rules
pub trait ValidationRule {
    /// Unique identifier for this rule
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Check a condition whose field exists in the catalog
    fn check_condition(
        &self,
        _condition: &Condition,
        _field: &FieldDef,
        _ctx: &RuleContext,
    ) -> Vec<Diagnostic> {
        Vec::new()
    }

    /// Check a group (the root included)
    fn check_group(&self, _group: &Group, _ctx: &RuleContext) -> Vec<Diagnostic> {
        Vec::new()
    }
}

/// Registry of all available validation rules
pub struct RuleRegistry {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl RuleRegistry {
    /// Create a new registry with all built-in rules, in reporting order
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(OperatorCompatRule),
                Box::new(MissingValueRule),
                Box::new(ValueTypeRule),
                Box::new(FieldConstraintsRule),
                Box::new(EmptyGroupRule),
                Box::new(ContradictionRule),
            ],
        }
    }

    /// Get all registered rules
    pub fn rules(&self) -> &[Box<dyn ValidationRule>] {
        &self.rules
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a custom rule to the registry
    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &format!("{} rules", self.rules.len()))
            .finish()
    }
}

/// Values a condition carries: range/list elements, or the value itself
pub(crate) fn value_items(condition: &Condition) -> Vec<&rulecraft_model::RuleValue> {
    match condition.value.as_list() {
        Some(items) => items.iter().collect(),
        None => vec![&condition.value],
    }
}
