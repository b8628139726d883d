use crate::{compile_to_mongo, format_mongo, CompileOptions};
use rulecraft_model::{
    Combinator, Condition, FieldCatalog, FieldDef, FieldType, Group, Operator, RuleTree, RuleValue,
};
use serde_json::json;

fn catalog() -> FieldCatalog {
    FieldCatalog::new(vec![
        FieldDef::new("age", "Age", FieldType::Number),
        FieldDef::new("name", "Name", FieldType::String),
        FieldDef::new("status", "Status", FieldType::Boolean),
        FieldDef::new("joined", "Joined", FieldType::Date),
        FieldDef::new("tier", "Tier", FieldType::Select),
    ])
}

fn compile(tree: &RuleTree) -> serde_json::Value {
    compile_to_mongo(tree, &catalog(), &CompileOptions::default())
}

fn single(condition: Condition) -> serde_json::Value {
    compile(&RuleTree::new(
        Group::new("root", Combinator::And).with_children([condition.into()]),
    ))
}

#[test]
fn test_compile_flat_and() {
    let tree = RuleTree::new(Group::new("root", Combinator::And).with_children([
        Condition::new("c1", "age", Operator::GreaterThan, 18).into(),
        Condition::new("c2", "name", Operator::Equals, "O'Brien").into(),
    ]));

    assert_eq!(
        compile(&tree).to_string(),
        r#"{"$and":[{"age":{"$gt":18}},{"name":"O'Brien"}]}"#
    );
}

#[test]
fn test_negated_single_child() {
    let tree = RuleTree::new(
        Group::new("root", Combinator::And)
            .negated()
            .with_children([Condition::new("c1", "status", Operator::IsTrue, RuleValue::Null).into()]),
    );

    assert_eq!(compile(&tree), json!({ "$not": { "status": true } }));
}

#[test]
fn test_empty_tree_is_empty_object() {
    assert_eq!(compile(&RuleTree::empty("root")), json!({}));
}

#[test]
fn test_empty_nested_group_is_skipped() {
    let tree = RuleTree::new(Group::new("root", Combinator::Or).with_children([
        Group::new("g1", Combinator::And).into(),
        Condition::new("c1", "age", Operator::Equals, 5).into(),
    ]));

    assert_eq!(compile(&tree), json!({ "age": 5 }));
}

#[test]
fn test_nested_groups_become_operator_objects() {
    let tree = RuleTree::new(Group::new("root", Combinator::And).with_children([
        Condition::new("c1", "status", Operator::IsFalse, RuleValue::Null).into(),
        Group::new("g1", Combinator::Or)
            .with_children([
                Condition::new("c2", "age", Operator::LessThan, 18).into(),
                Condition::new("c3", "age", Operator::GreaterThanOrEqual, 65).into(),
            ])
            .into(),
    ]));

    assert_eq!(
        compile(&tree),
        json!({ "$and": [
            { "status": false },
            { "$or": [{ "age": { "$lt": 18 } }, { "age": { "$gte": 65 } }] },
        ] })
    );
}

#[test]
fn test_uniform_overrides_win_over_default() {
    let tree = RuleTree::new(Group::new("root", Combinator::Or).with_children([
        Condition::new("c1", "age", Operator::Equals, 1)
            .with_edge(Combinator::And)
            .into(),
        Condition::new("c2", "age", Operator::Equals, 2).into(),
    ]));

    assert_eq!(compile(&tree), json!({ "$and": [{ "age": 1 }, { "age": 2 }] }));
}

#[test]
fn test_mixed_connectors_fall_back_to_default() {
    let tree = RuleTree::new(Group::new("root", Combinator::Or).with_children([
        Condition::new("c1", "age", Operator::Equals, 1)
            .with_edge(Combinator::And)
            .into(),
        Condition::new("c2", "age", Operator::Equals, 2).into(),
        Condition::new("c3", "age", Operator::Equals, 3).into(),
    ]));

    assert_eq!(
        compile(&tree),
        json!({ "$or": [{ "age": 1 }, { "age": 2 }, { "age": 3 }] })
    );
}

#[test]
fn test_text_matches_escape_regex() {
    assert_eq!(
        single(Condition::new("c", "name", Operator::Contains, "a.b")),
        json!({ "name": { "$regex": "a\\.b", "$options": "i" } })
    );
    assert_eq!(
        single(Condition::new("c", "name", Operator::StartsWith, "Jo")),
        json!({ "name": { "$regex": "^Jo", "$options": "i" } })
    );
    assert_eq!(
        single(Condition::new("c", "name", Operator::EndsWith, "son")),
        json!({ "name": { "$regex": "son$", "$options": "i" } })
    );

    let strict = CompileOptions {
        case_insensitive: false,
    };
    let tree = RuleTree::new(
        Group::new("root", Combinator::And)
            .with_children([Condition::new("c", "name", Operator::Contains, "x").into()]),
    );
    assert_eq!(
        compile_to_mongo(&tree, &catalog(), &strict),
        json!({ "name": { "$regex": "x" } })
    );
}

#[test]
fn test_leaf_operators() {
    let cases = [
        (Condition::new("c", "name", Operator::NotEquals, "x"), json!({ "name": { "$ne": "x" } })),
        (Condition::new("c", "age", Operator::LessThanOrEqual, 2.5), json!({ "age": { "$lte": 2.5 } })),
        (
            Condition::new("c", "age", Operator::Between, vec![18, 30]),
            json!({ "age": { "$gte": 18, "$lte": 30 } }),
        ),
        (
            Condition::new("c", "age", Operator::NotBetween, vec![1, 2]),
            json!({ "age": { "$not": { "$gte": 1, "$lte": 2 } } }),
        ),
        (
            Condition::new("c", "joined", Operator::Before, "2024-01-31"),
            json!({ "joined": { "$lt": "2024-01-31" } }),
        ),
        (
            Condition::new("c", "joined", Operator::After, "2024-01-31"),
            json!({ "joined": { "$gt": "2024-01-31" } }),
        ),
        (
            Condition::new("c", "tier", Operator::In, vec!["gold", "silver"]),
            json!({ "tier": { "$in": ["gold", "silver"] } }),
        ),
        (
            Condition::new("c", "tier", Operator::NotIn, vec!["bronze"]),
            json!({ "tier": { "$nin": ["bronze"] } }),
        ),
        (
            Condition::new("c", "name", Operator::IsEmpty, RuleValue::Null),
            json!({ "$or": [{ "name": null }, { "name": "" }] }),
        ),
        (
            Condition::new("c", "name", Operator::IsNotEmpty, RuleValue::Null),
            json!({ "$and": [{ "name": { "$ne": null } }, { "name": { "$ne": "" } }] }),
        ),
        (Condition::new("c", "age", Operator::Equals, "42"), json!({ "age": 42 })),
    ];

    for (condition, expected) in cases {
        assert_eq!(single(condition), expected);
    }
}

#[test]
fn test_format_is_pretty_json() {
    let tree = RuleTree::new(
        Group::new("root", Combinator::And)
            .with_children([Condition::new("c", "age", Operator::Equals, 7).into()]),
    );
    let text = format_mongo(&tree, &catalog());
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, json!({ "age": 7 }));
}
