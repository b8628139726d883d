//! Best-effort detection of AND-joined numeric conditions that can never
//! hold together, e.g. `x > 10 AND x < 5`.

use crate::diagnostic::Diagnostic;
use crate::rules::{RuleContext, ValidationRule};
use rulecraft_model::{Combinator, Condition, FieldType, Group, NodeId, Operator};

pub struct ContradictionRule;

impl ValidationRule for ContradictionRule {
    fn name(&self) -> &'static str {
        "contradiction"
    }

    fn description(&self) -> &'static str {
        "Warn about AND-joined numeric conditions with mutually exclusive bounds"
    }

    fn check_group(&self, group: &Group, ctx: &RuleContext) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for run in and_runs(group) {
            let ranges: Vec<(&Condition, Range)> = run
                .into_iter()
                .filter_map(|condition| {
                    let field = ctx.catalog.get(&condition.field_name)?;
                    if field.field_type != FieldType::Number {
                        return None;
                    }
                    Some((condition, Range::of(condition)?))
                })
                .collect();

            for (i, (left, left_range)) in ranges.iter().enumerate() {
                for (right, right_range) in &ranges[i + 1..] {
                    if left.field_name != right.field_name || left_range.overlaps(right_range) {
                        continue;
                    }

                    let mut path: Vec<NodeId> = ctx.path.to_vec();
                    path.push(right.id.clone());
                    let label = ctx.catalog.label_for(&left.field_name);
                    let mut diagnostic = Diagnostic::warning(
                        self.name(),
                        format!(
                            "'{}' cannot satisfy both '{} {}' and '{} {}'",
                            label,
                            left.operator,
                            left.value.to_plain_string(),
                            right.operator,
                            right.value.to_plain_string()
                        ),
                        &path,
                    )
                    .with_suggestion("Join these conditions with OR or adjust the bounds");
                    diagnostic.id = format!("{}:{}:{}", self.name(), left.id, right.id);
                    diagnostics.push(diagnostic);
                }
            }
        }

        diagnostics
    }
}

/// Split a group's conditions into runs joined by unbroken AND connectors
fn and_runs(group: &Group) -> Vec<Vec<&Condition>> {
    let mut runs = Vec::new();
    let mut current: Vec<&Condition> = Vec::new();

    for (index, child) in group.children.iter().enumerate() {
        if let Some(condition) = child.as_condition() {
            current.push(condition);
        }
        if group.effective_connector(index) != Some(Combinator::And) {
            runs.push(std::mem::take(&mut current));
        }
    }

    runs.into_iter().filter(|run| run.len() > 1).collect()
}

#[derive(Debug, Clone, Copy)]
struct Bound {
    value: f64,
    inclusive: bool,
}

/// Interval of values a numeric condition accepts
#[derive(Debug, Clone, Copy)]
struct Range {
    low: Option<Bound>,
    high: Option<Bound>,
}

impl Range {
    fn of(condition: &Condition) -> Option<Self> {
        let at = |inclusive| -> Option<Bound> {
            Some(Bound {
                value: condition.value.as_f64()?,
                inclusive,
            })
        };

        let range = match condition.operator {
            Operator::Equals => {
                let point = at(true)?;
                Range { low: Some(point), high: Some(point) }
            }
            Operator::GreaterThan => Range { low: Some(at(false)?), high: None },
            Operator::GreaterThanOrEqual => Range { low: Some(at(true)?), high: None },
            Operator::LessThan => Range { low: None, high: Some(at(false)?) },
            Operator::LessThanOrEqual => Range { low: None, high: Some(at(true)?) },
            Operator::Between => {
                let (a, b) = condition.value.as_range()?;
                let (a, b) = (a.as_f64()?, b.as_f64()?);
                Range {
                    low: Some(Bound { value: a.min(b), inclusive: true }),
                    high: Some(Bound { value: a.max(b), inclusive: true }),
                }
            }
            _ => return None,
        };
        Some(range)
    }

    fn overlaps(&self, other: &Range) -> bool {
        let low = tighter(self.low, other.low, |a, b| a > b);
        let high = tighter(self.high, other.high, |a, b| a < b);

        match (low, high) {
            (Some(low), Some(high)) => {
                low.value < high.value
                    || (low.value == high.value && low.inclusive && high.inclusive)
            }
            _ => true,
        }
    }
}

/// Pick the more restrictive of two bounds; `stricter(a, b)` is true when `a` wins
fn tighter(a: Option<Bound>, b: Option<Bound>, stricter: fn(f64, f64) -> bool) -> Option<Bound> {
    match (a, b) {
        (Some(a), Some(b)) => {
            if stricter(a.value, b.value) {
                Some(a)
            } else if stricter(b.value, a.value) {
                Some(b)
            } else {
                Some(Bound {
                    value: a.value,
                    inclusive: a.inclusive && b.inclusive,
                })
            }
        }
        (bound, None) | (None, bound) => bound,
    }
}
