use crate::{compile_to_sql, format_sql, quote_identifier, quote_string, CompileOptions};
use rulecraft_model::{
    Combinator, Condition, FieldCatalog, FieldDef, FieldType, Group, Operator, RuleTree, RuleValue,
};

fn catalog() -> FieldCatalog {
    FieldCatalog::new(vec![
        FieldDef::new("age", "Age", FieldType::Number),
        FieldDef::new("name", "Name", FieldType::String),
        FieldDef::new("active", "Active", FieldType::Boolean),
        FieldDef::new("joined", "Joined", FieldType::Date),
        FieldDef::new("tier", "Tier", FieldType::Select),
    ])
}

fn single(condition: Condition) -> RuleTree {
    RuleTree::new(Group::new("root", Combinator::And).with_children([condition.into()]))
}

#[test]
fn test_compile_flat_and() {
    let tree = RuleTree::new(Group::new("root", Combinator::And).with_children([
        Condition::new("c1", "age", Operator::GreaterThan, 18).into(),
        Condition::new("c2", "name", Operator::Equals, "O'Brien").into(),
    ]));

    assert_eq!(format_sql(&tree, &catalog()), "age > 18 AND name = 'O''Brien'");
}

#[test]
fn test_compile_empty_tree() {
    assert_eq!(format_sql(&RuleTree::empty("root"), &catalog()), "");
}

#[test]
fn test_nested_and_negated_groups() {
    let tree = RuleTree::new(Group::new("root", Combinator::And).with_children([
        Condition::new("c1", "active", Operator::IsTrue, RuleValue::Null).into(),
        Group::new("g1", Combinator::Or)
            .negated()
            .with_children([
                Condition::new("c2", "age", Operator::LessThan, 18).into(),
                Condition::new("c3", "age", Operator::GreaterThan, 65).into(),
            ])
            .into(),
        Group::new("g2", Combinator::Or)
            .with_children([Condition::new("c4", "name", Operator::StartsWith, "Jo").into()])
            .into(),
    ]));

    assert_eq!(
        format_sql(&tree, &catalog()),
        "active = TRUE AND NOT (age < 18 OR age > 65) AND (name LIKE 'Jo%')"
    );
}

#[test]
fn test_leaf_operators() {
    let cases = [
        (Condition::new("c", "name", Operator::NotEquals, "x"), "name <> 'x'"),
        (Condition::new("c", "name", Operator::Contains, "it's"), "name LIKE '%it''s%'"),
        (Condition::new("c", "name", Operator::EndsWith, "son"), "name LIKE '%son'"),
        (Condition::new("c", "name", Operator::IsEmpty, RuleValue::Null), "(name IS NULL OR name = '')"),
        (
            Condition::new("c", "name", Operator::IsNotEmpty, RuleValue::Null),
            "(name IS NOT NULL AND name <> '')",
        ),
        (Condition::new("c", "age", Operator::GreaterThanOrEqual, 21), "age >= 21"),
        (Condition::new("c", "age", Operator::LessThanOrEqual, 2.5), "age <= 2.5"),
        (Condition::new("c", "age", Operator::Between, vec![18, 30]), "age BETWEEN 18 AND 30"),
        (Condition::new("c", "age", Operator::NotBetween, vec![1, 2]), "age NOT BETWEEN 1 AND 2"),
        (Condition::new("c", "joined", Operator::Before, "2024-01-31"), "joined < '2024-01-31'"),
        (Condition::new("c", "joined", Operator::After, "2024-01-31"), "joined > '2024-01-31'"),
        (Condition::new("c", "active", Operator::IsFalse, RuleValue::Null), "active = FALSE"),
        (Condition::new("c", "tier", Operator::In, vec!["gold", "silver"]), "tier IN ('gold', 'silver')"),
        (Condition::new("c", "tier", Operator::NotIn, vec!["bronze"]), "tier NOT IN ('bronze')"),
    ];

    for (condition, expected) in cases {
        assert_eq!(format_sql(&single(condition), &catalog()), expected);
    }
}

#[test]
fn test_numeric_text_is_emitted_bare() {
    let tree = single(Condition::new("c", "age", Operator::Equals, "42"));
    assert_eq!(format_sql(&tree, &catalog()), "age = 42");
}

#[test]
fn test_identifier_quoting() {
    assert_eq!(quote_identifier("users.age", false), "users.age");
    assert_eq!(quote_identifier("first name", false), "\"first name\"");
    assert_eq!(quote_identifier("age", true), "\"age\"");
    assert_eq!(quote_string("a'b"), "'a''b'");

    let tree = single(Condition::new("c", "first name", Operator::Equals, "Ann"));
    assert_eq!(format_sql(&tree, &catalog()), "\"first name\" = 'Ann'");

    let options = CompileOptions {
        quote_all_identifiers: true,
    };
    let tree = single(Condition::new("c", "age", Operator::Equals, 3));
    assert_eq!(compile_to_sql(&tree, &catalog(), &options), "\"age\" = 3");
}

#[test]
fn test_mixed_connectors_follow_children() {
    let tree = RuleTree::new(Group::new("root", Combinator::Or).with_children([
        Condition::new("c1", "age", Operator::Equals, 1)
            .with_edge(Combinator::And)
            .into(),
        Condition::new("c2", "age", Operator::Equals, 2).into(),
        Condition::new("c3", "age", Operator::Equals, 3).into(),
    ]));

    assert_eq!(format_sql(&tree, &catalog()), "age = 1 AND age = 2 OR age = 3");
}

#[test]
fn test_options_from_json() {
    let options: CompileOptions = serde_json::from_str(r#"{"quoteAllIdentifiers":true}"#).unwrap();
    assert!(options.quote_all_identifiers);
    let defaults: CompileOptions = serde_json::from_str("{}").unwrap();
    assert!(!defaults.quote_all_identifiers);
}
