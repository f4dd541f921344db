//! In-memory source provider for tests, benches, and embedding callers that
//! already hold raw trees.

use std::collections::HashMap;

use crate::domain::block::ModuleName;
use crate::domain::raw::RawNode;
use crate::ports::SourceProvider;

#[derive(Default)]
pub struct StaticProvider {
    modules: HashMap<ModuleName, RawNode>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module tree under the name its `Module` header declares.
    pub fn with_module(self, tree: RawNode) -> Self {
        let name = match &tree {
            RawNode::Module { name, .. } => name.clone(),
            _ => String::new(),
        };
        self.with_named_tree(&name, tree)
    }

    /// Register a tree under an explicit identifier. Lets tests enumerate a
    /// module whose tree is malformed.
    pub fn with_named_tree(mut self, id: &str, tree: RawNode) -> Self {
        self.modules.insert(ModuleName::parse(id), tree);
        self
    }
}

impl SourceProvider for StaticProvider {
    fn enumerate_modules(&self) -> Vec<ModuleName> {
        let mut modules: Vec<ModuleName> = self.modules.keys().cloned().collect();
        modules.sort();
        modules
    }

    fn resolve(&self, id: &ModuleName) -> Option<RawNode> {
        self.modules.get(id).cloned()
    }
}
