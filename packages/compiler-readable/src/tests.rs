use crate::{compile_to_readable, format_readable, operator_phrase, CompileOptions};
use rulecraft_model::{
    Combinator, Condition, FieldCatalog, FieldDef, FieldOption, FieldType, Group, Operator,
    RuleTree, RuleValue,
};

fn catalog() -> FieldCatalog {
    FieldCatalog::new(vec![
        FieldDef::new("age", "Age", FieldType::Number),
        FieldDef::new("name", "Name", FieldType::String),
        FieldDef::new("status", "Status", FieldType::Boolean),
        FieldDef::new("joined", "Joined", FieldType::Date),
        FieldDef::new("tier", "Tier", FieldType::Select).with_options([
            FieldOption::new("gold", "Gold member"),
            FieldOption::new("silver", "Silver member"),
        ]),
    ])
}

#[test]
fn test_compile_flat_and() {
    let tree = RuleTree::new(Group::new("root", Combinator::And).with_children([
        Condition::new("c1", "age", Operator::GreaterThan, 18).into(),
        Condition::new("c2", "name", Operator::Equals, "O'Brien").into(),
    ]));

    let text = format_readable(&tree, &catalog());
    assert_eq!(text, "Age is greater than 18 AND Name equals \"O'Brien\"");
}

#[test]
fn test_compile_negated_root() {
    let tree = RuleTree::new(
        Group::new("root", Combinator::And)
            .negated()
            .with_children([Condition::new("c1", "status", Operator::IsTrue, RuleValue::Null).into()]),
    );

    assert_eq!(format_readable(&tree, &catalog()), "NOT (Status is true)");
}

#[test]
fn test_compile_empty_tree() {
    let tree = RuleTree::empty("root");
    assert_eq!(format_readable(&tree, &catalog()), "");
}

#[test]
fn test_nested_groups_are_parenthesized() {
    let tree = RuleTree::new(Group::new("root", Combinator::Or).with_children([
        Condition::new("c1", "age", Operator::LessThan, 13).into(),
        Group::new("g1", Combinator::And)
            .with_children([
                Condition::new("c2", "age", Operator::GreaterThanOrEqual, 65).into(),
                Condition::new("c3", "status", Operator::IsFalse, RuleValue::Null).into(),
            ])
            .into(),
    ]));

    assert_eq!(
        format_readable(&tree, &catalog()),
        "Age is less than 13 OR (Age is greater than or equal to 65 AND Status is false)"
    );
}

#[test]
fn test_empty_nested_group_drops_its_connector() {
    let tree = RuleTree::new(Group::new("root", Combinator::And).with_children([
        Condition::new("c1", "age", Operator::Equals, 30).into(),
        Group::new("g1", Combinator::Or).into(),
    ]));

    assert_eq!(format_readable(&tree, &catalog()), "Age equals 30");
}

#[test]
fn test_edge_combinator_overrides_default() {
    let tree = RuleTree::new(Group::new("root", Combinator::And).with_children([
        Condition::new("c1", "age", Operator::Equals, 1)
            .with_edge(Combinator::Or)
            .into(),
        Condition::new("c2", "age", Operator::Equals, 2).into(),
        Condition::new("c3", "age", Operator::Equals, 3).into(),
    ]));

    assert_eq!(
        format_readable(&tree, &catalog()),
        "Age equals 1 OR Age equals 2 AND Age equals 3"
    );
}

#[test]
fn test_select_uses_option_labels() {
    let tree = RuleTree::new(Group::new("root", Combinator::And).with_children([
        Condition::new("c1", "tier", Operator::In, vec!["gold", "silver"]).into(),
    ]));

    assert_eq!(
        format_readable(&tree, &catalog()),
        "Tier is one of \"Gold member\", \"Silver member\""
    );
}

#[test]
fn test_dates_and_ranges() {
    let tree = RuleTree::new(Group::new("root", Combinator::And).with_children([
        Condition::new("c1", "joined", Operator::Before, "2024-03-05").into(),
        Condition::new("c2", "age", Operator::Between, vec![18, 30]).into(),
    ]));

    assert_eq!(
        format_readable(&tree, &catalog()),
        "Joined is before March 5, 2024 AND Age is between 18 and 30"
    );

    let iso = CompileOptions {
        date_format: "%Y-%m-%d".to_string(),
    };
    assert!(compile_to_readable(&tree, &catalog(), &iso).starts_with("Joined is before 2024-03-05"));
}

#[test]
fn test_unknown_field_uses_raw_name() {
    let tree = RuleTree::new(Group::new("root", Combinator::And).with_children([
        Condition::new("c1", "nickname", Operator::Contains, "bo").into(),
    ]));

    assert_eq!(format_readable(&tree, &catalog()), "nickname contains \"bo\"");
}

#[test]
fn test_options_from_json() {
    let options: CompileOptions = serde_json::from_str(r#"{"dateFormat":"%d/%m/%Y"}"#).unwrap();
    assert_eq!(options.date_format, "%d/%m/%Y");
}

#[test]
fn test_every_operator_has_a_phrase() {
    for operator in Operator::ALL {
        assert!(!operator_phrase(operator).is_empty());
    }
}
