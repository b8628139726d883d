use crate::tree::RuleTree;
use crc32fast::Hasher;

/// Namespace used when callers don't pick one
pub const DEFAULT_NAMESPACE: &str = "rulecraft";

/// Generate a short, stable seed from a namespace using CRC32
pub fn namespace_seed(namespace: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(namespace.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for tree nodes
///
/// Ids have the form `<seed>-<n>`.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u64,
}

impl IdGenerator {
    pub fn new(namespace: &str) -> Self {
        Self {
            seed: namespace_seed(namespace),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generator that will not re-issue any id already present in `tree`
    pub fn for_tree(namespace: &str, tree: &RuleTree) -> Self {
        let mut generator = Self::new(namespace);
        generator.observe(tree);
        generator
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Advance the counter past every id in `tree` that carries this seed
    pub fn observe(&mut self, tree: &RuleTree) {
        let prefix = format!("{}-", self.seed);
        let highest = tree
            .all_ids()
            .into_iter()
            .filter_map(|id| id.strip_prefix(&prefix))
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        self.count = self.count.max(highest);
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}
