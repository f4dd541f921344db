//! Filesystem-backed source provider.
//!
//! Reads one serialized raw tree per module from `<Module.Name>.json` files
//! in a directory. This is a provider, not a parser: whatever produced the
//! JSON documents already did the concrete-grammar work.

use std::fs;
use std::path::PathBuf;

use crate::domain::block::ModuleName;
use crate::domain::raw::RawNode;
use crate::ports::SourceProvider;

pub struct JsonSourceProvider {
    root: PathBuf,
}

impl JsonSourceProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        JsonSourceProvider { root: root.into() }
    }

    fn tree_path(&self, id: &ModuleName) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }
}

impl SourceProvider for JsonSourceProvider {
    fn enumerate_modules(&self) -> Vec<ModuleName> {
        let mut modules = Vec::new();
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                eprintln!("WARN: cannot read source dir {}: {}", self.root.display(), e);
                return modules;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                let id = ModuleName::parse(stem);
                if !id.is_empty() {
                    modules.push(id);
                }
            }
        }
        modules.sort();
        modules
    }

    fn resolve(&self, id: &ModuleName) -> Option<RawNode> {
        let path = self.tree_path(id);
        let text = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&text) {
            Ok(tree) => Some(tree),
            Err(e) => {
                eprintln!("WARN: invalid raw tree in {}: {}", path.display(), e);
                None
            }
        }
    }
}
