//! Concurrent block cache.
//!
//! Single logical writer (the rescan), unbounded concurrent readers. DashMap
//! gives per-key atomic replacement and `Arc<Block>` values mean a reader can
//! never observe a partially built block; last write per key wins when
//! rescans overlap.

use std::sync::Arc;

use dashmap::DashMap;
use rayon::prelude::*;
use thiserror::Error;

use crate::domain::block::{Block, ModuleBlock, ModuleName};
use crate::domain::normalize::AstNormalizer;
use crate::ports::SourceProvider;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("module {module} is not cached")]
    NotFound { module: ModuleName },
}

/// Outcome of one rescan: how many modules landed in the cache and how many
/// were skipped after a resolve or normalization failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RescanReport {
    pub scanned: usize,
    pub failed: usize,
}

#[derive(Default)]
pub struct BlockStore {
    blocks: DashMap<ModuleName, Arc<Block>>,
}

impl BlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concurrent-safe point lookup.
    pub fn lookup(&self, id: &ModuleName) -> Option<Arc<Block>> {
        self.blocks.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// `lookup` as a typed result for callers that treat absence as an error.
    pub fn get(&self, id: &ModuleName) -> Result<Arc<Block>, StoreError> {
        self.lookup(id).ok_or_else(|| StoreError::NotFound {
            module: id.clone(),
        })
    }

    /// Atomically replace the entry for this block's module.
    pub fn insert(&self, block: ModuleBlock) {
        self.blocks
            .insert(block.name.clone(), Arc::new(Block::Module(block)));
    }

    /// Currently cached module identifiers, sorted for deterministic output.
    pub fn list(&self) -> Vec<ModuleName> {
        let mut modules: Vec<ModuleName> =
            self.blocks.iter().map(|entry| entry.key().clone()).collect();
        modules.sort();
        modules
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Enumerate modules through the provider and normalize each in parallel.
    ///
    /// Failures are per-module: a tree that fails to resolve or normalize is
    /// logged and skipped, and the rest of the batch proceeds. Readers keep
    /// running throughout; they only ever see whole blocks.
    pub fn rescan(&self, provider: &dyn SourceProvider) -> RescanReport {
        let modules = provider.enumerate_modules();
        let outcomes: Vec<bool> = modules
            .par_iter()
            .map(|id| match provider.resolve(id) {
                Some(tree) => match AstNormalizer::normalize(&tree) {
                    Ok(block) => {
                        self.insert(block);
                        true
                    }
                    Err(e) => {
                        eprintln!("WARN: skipping module {}: {}", id, e);
                        false
                    }
                },
                None => {
                    eprintln!("WARN: provider returned no tree for {}", id);
                    false
                }
            })
            .collect();

        let scanned = outcomes.iter().filter(|ok| **ok).count();
        RescanReport {
            scanned,
            failed: outcomes.len() - scanned,
        }
    }
}
