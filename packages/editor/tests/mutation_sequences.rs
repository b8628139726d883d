//! Comprehensive tests for complex mutation sequences
//!
//! This tests:
//! - Move + clone + delete chains
//! - Undo/redo sequences
//! - Batched mutations
//! - Tree integrity after operations

use rulecraft_editor::{ConditionPatch, Document, DocumentOptions, Mutation};
use rulecraft_model::{
    Combinator, Condition, FieldCatalog, FieldDef, FieldType, Group, Operator, RuleTree, RuleValue,
};
use std::collections::HashSet;

fn catalog() -> FieldCatalog {
    FieldCatalog::new(vec![
        FieldDef::new("age", "Age", FieldType::Number),
        FieldDef::new("name", "Name", FieldType::String),
    ])
}

fn tree() -> RuleTree {
    RuleTree::new(Group::new("root", Combinator::And).with_children([
        Group::new("g1", Combinator::Or)
            .with_children([Condition::new("c1", "age", Operator::Equals, 1).into()])
            .into(),
        Group::new("g2", Combinator::Or)
            .with_children([Condition::new("c2", "age", Operator::Equals, 2).into()])
            .into(),
    ]))
}

fn assert_unique_ids(tree: &RuleTree) {
    let ids = tree.all_ids();
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(ids.len(), unique.len(), "duplicate ids in {:?}", ids);
}

#[test]
fn test_move_then_delete_sequence() {
    let mut doc = Document::new(tree(), catalog());

    // Move g2 into g1
    doc.apply(Mutation::MoveNode {
        node_id: "g2".to_string(),
        target_group_id: "g1".to_string(),
        index: 1,
    })
    .unwrap();
    assert_eq!(doc.tree().find_group("g1").unwrap().children.len(), 2);
    assert_eq!(doc.tree().depth_of("c2"), Some(3));

    // Delete g1 (takes g2 with it)
    doc.apply(Mutation::DeleteNode {
        node_id: "g1".to_string(),
    })
    .unwrap();
    assert!(!doc.tree().contains_id("g2"));
    assert!(doc.tree().is_empty());

    // Undo delete (restores both)
    assert!(doc.undo());
    assert!(doc.tree().contains_id("g1"));
    assert!(doc.tree().contains_id("g2"));

    // Undo move
    assert!(doc.undo());
    assert_eq!(doc.tree(), &tree());
}

#[test]
fn test_multiple_updates_with_undo_redo() {
    let mut doc = Document::new(tree(), catalog());

    for value in 2..=4 {
        doc.apply(Mutation::UpdateCondition {
            node_id: "c1".to_string(),
            patch: ConditionPatch::default().value(value),
        })
        .unwrap();
    }
    let value = |doc: &Document| doc.tree().find_condition("c1").unwrap().value.clone();
    assert_eq!(value(&doc), RuleValue::from(4));

    doc.undo();
    doc.undo();
    assert_eq!(value(&doc), RuleValue::from(2));

    doc.redo();
    assert_eq!(value(&doc), RuleValue::from(3));

    // New edit drops the redo tail
    doc.apply(Mutation::UpdateCondition {
        node_id: "c1".to_string(),
        patch: ConditionPatch::default().value(9),
    })
    .unwrap();
    assert!(!doc.redo());
    assert_eq!(value(&doc), RuleValue::from(9));
}

#[test]
fn test_batched_edits_undo_together() {
    let mut doc = Document::new(tree(), catalog());

    doc.begin_batch("Build adult filter");
    doc.apply(Mutation::AddCondition {
        group_id: "g2".to_string(),
        condition: Some(Condition::new("", "age", Operator::GreaterThan, 18)),
    })
    .unwrap();
    doc.apply(Mutation::SetDefaultCombinator {
        group_id: "g2".to_string(),
        combinator: Combinator::And,
    })
    .unwrap();
    doc.end_batch();

    assert_eq!(doc.history().undo_levels(), 1);
    assert_eq!(doc.history().undo_description(), Some("Build adult filter"));

    doc.undo();
    assert_eq!(doc.tree(), &tree());
}

#[test]
fn test_history_limit_from_options() {
    let options = DocumentOptions {
        history_limit: 3,
        ..Default::default()
    };
    let mut doc = Document::with_options(tree(), catalog(), options);

    for _ in 0..5 {
        doc.apply(Mutation::ToggleNegate {
            group_id: "root".to_string(),
        })
        .unwrap();
    }

    assert_eq!(doc.history().len(), 3);
    assert!(doc.undo());
    assert!(doc.undo());
    assert!(!doc.undo());
}

#[test]
fn test_clone_and_move_keep_ids_unique() {
    let mut doc = Document::new(tree(), catalog());

    doc.apply(Mutation::CloneNode {
        node_id: "g1".to_string(),
        insert_after: true,
    })
    .unwrap();
    doc.apply(Mutation::CloneNode {
        node_id: "g2".to_string(),
        insert_after: false,
    })
    .unwrap();
    assert_unique_ids(doc.tree());

    let copy_id = doc.tree().root().children[1].id().to_string();
    doc.apply(Mutation::MoveNode {
        node_id: copy_id.clone(),
        target_group_id: "g2".to_string(),
        index: 0,
    })
    .unwrap();
    assert_unique_ids(doc.tree());
    assert_eq!(doc.tree().parent_of(&copy_id).map(|g| g.id.as_str()), Some("g2"));

    // Clone after undoing the clone must not reuse freed ids
    doc.undo();
    doc.undo();
    doc.apply(Mutation::CloneNode {
        node_id: "c1".to_string(),
        insert_after: true,
    })
    .unwrap();
    assert_unique_ids(doc.tree());
}

#[test]
fn test_tree_integrity_after_complex_sequence() {
    let mut doc = Document::new(tree(), catalog());

    let steps = vec![
        Mutation::AddGroup {
            group_id: "root".to_string(),
            group: None,
        },
        Mutation::AddCondition {
            group_id: "g1".to_string(),
            condition: None,
        },
        Mutation::SetEdgeCombinator {
            node_id: "g1".to_string(),
            combinator: Some(Combinator::Or),
        },
        Mutation::MoveNode {
            node_id: "c2".to_string(),
            target_group_id: "g1".to_string(),
            index: 0,
        },
        Mutation::ToggleNegate {
            group_id: "g2".to_string(),
        },
        Mutation::DeleteNode {
            node_id: "c1".to_string(),
        },
    ];
    for step in steps {
        doc.apply(step).unwrap();
    }

    let json = serde_json::to_string(doc.tree()).unwrap();
    let back: RuleTree = serde_json::from_str(&json).unwrap();
    assert_eq!(&back, doc.tree());
    assert_unique_ids(doc.tree());
    assert_eq!(doc.tree().root().connectors()[0], Combinator::Or);

    while doc.undo() {}
    assert_eq!(doc.tree(), &tree());
    while doc.redo() {}
    assert_eq!(&back, doc.tree());
}
