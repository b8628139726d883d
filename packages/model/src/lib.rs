//! # Rulecraft Model
//!
//! Data types shared by every Rulecraft crate: the rule tree, the field
//! catalog it is checked and compiled against, node id generation and the
//! persisted saved-query record.
//!
//! A tree is plain serde data. `serde_json` round-trips are faithful deep
//! copies, and nodes are tagged with `kind: "condition" | "group"`.

pub mod catalog;
pub mod id_generator;
pub mod operator;
pub mod resolver;
pub mod saved;
pub mod tree;
pub mod value;

pub use catalog::{
    CustomValidator, FieldCatalog, FieldConstraints, FieldDef, FieldOption, FieldType, OptionPage,
};
pub use id_generator::{namespace_seed, IdGenerator, DEFAULT_NAMESPACE};
pub use operator::Operator;
pub use resolver::{RequestTicket, ResolverGate};
pub use saved::{MemoryQueryStore, QueryStore, SavedQuery, StoreError};
pub use tree::{
    is_condition, is_group, Combinator, Condition, Group, NodeId, NodeRef, RuleTree, TreeNode,
};
pub use value::{format_number, parse_date, RuleValue, DATE_FORMAT};
