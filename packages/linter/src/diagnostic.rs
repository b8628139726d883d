use rulecraft_model::NodeId;
use serde::{Deserialize, Serialize};

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Error,
    Warning,
}

/// A finding produced by the validator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Stable identifier, derived from the rule and the node(s) involved
    pub id: String,

    /// The severity level
    pub level: DiagnosticLevel,

    /// The rule that generated this diagnostic
    pub rule: String,

    /// Human-readable message
    pub message: String,

    /// Node the finding is attached to
    pub node_id: NodeId,

    /// Node ids from the root down to `node_id`
    pub path: Vec<NodeId>,

    /// Optional suggestion for fixing the issue
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn error(rule: impl Into<String>, message: impl Into<String>, path: &[NodeId]) -> Self {
        Self::new(DiagnosticLevel::Error, rule.into(), message.into(), path)
    }

    pub fn warning(rule: impl Into<String>, message: impl Into<String>, path: &[NodeId]) -> Self {
        Self::new(DiagnosticLevel::Warning, rule.into(), message.into(), path)
    }

    fn new(level: DiagnosticLevel, rule: String, message: String, path: &[NodeId]) -> Self {
        let node_id = path.last().cloned().unwrap_or_default();
        Self {
            id: format!("{}:{}", rule, node_id),
            level,
            rule,
            message,
            node_id,
            path: path.to_vec(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Disambiguate several findings of one rule on one node
    pub fn with_key(mut self, key: &str) -> Self {
        self.id = format!("{}:{}:{}", self.rule, key, self.node_id);
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == DiagnosticLevel::Error
    }
}
