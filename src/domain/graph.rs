//! Breadth-first call-graph construction.
//!
//! One `build` call owns its FIFO frontier and visited set exclusively; the
//! only shared state it touches is read-only lookups against the store, so
//! independent builds never interfere.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::block::{Block, Call, FunctionBlock, FunctionRef, ModuleName};
use crate::domain::store::BlockStore;

/// Malformed start reference. Missing modules or unmatched clauses during
/// traversal are never fatal; those nodes simply have no outgoing edges.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TraversalError {
    #[error("start reference has an empty module name")]
    EmptyModule,
    #[error("start reference has an empty function name")]
    EmptyFunction,
}

/// How to treat a clause that carries no arity information at all.
///
/// The reference behavior is `Permissive`: match rather than miss, so
/// incomplete metadata never silently drops edges. `Strict` requires the
/// clause to prove its arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStrictness {
    #[default]
    Permissive,
    Strict,
}

/// Directed call graph. Node and edge vectors preserve insertion order, which
/// the renderers rely on; the builder guarantees set semantics (no duplicate
/// nodes, no duplicate ordered edge pairs, start always present).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub start: FunctionRef,
    pub nodes: Vec<FunctionRef>,
    pub edges: Vec<(FunctionRef, FunctionRef)>,
}

pub struct GraphBuilder<'a> {
    store: &'a BlockStore,
    strictness: MatchStrictness,
    max_nodes: Option<usize>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(store: &'a BlockStore) -> Self {
        GraphBuilder {
            store,
            strictness: MatchStrictness::default(),
            max_nodes: None,
        }
    }

    pub fn strictness(mut self, strictness: MatchStrictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Cap the node set. Once reached, no new node is admitted and the
    /// frontier drains; edges between already-admitted nodes still land.
    pub fn max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }

    /// Breadth-first expansion from `start`. Terminates under direct and
    /// mutual recursion: the visited set only grows, and a node is expanded
    /// at most once.
    pub fn build(&self, start: FunctionRef) -> Result<Graph, TraversalError> {
        if start.module.is_empty() {
            return Err(TraversalError::EmptyModule);
        }
        if start.name.is_empty() {
            return Err(TraversalError::EmptyFunction);
        }

        let mut frontier: VecDeque<FunctionRef> = VecDeque::from([start.clone()]);
        let mut visited: HashSet<FunctionRef> = HashSet::from([start.clone()]);
        let mut nodes: Vec<FunctionRef> = vec![start.clone()];
        let mut edges: Vec<(FunctionRef, FunctionRef)> = Vec::new();
        let mut edge_set: HashSet<(FunctionRef, FunctionRef)> = HashSet::new();

        while let Some(current) = frontier.pop_front() {
            for call in self.outgoing_calls(&current) {
                let target_module: ModuleName = match &call.module {
                    Some(module) => module.clone(),
                    // Unqualified calls are assumed local to the caller.
                    None => current.module.clone(),
                };
                let target = FunctionRef {
                    module: target_module,
                    name: call.name.clone(),
                    arity: call.arity,
                };

                if !visited.contains(&target) {
                    let budget_open = self.max_nodes.map_or(true, |cap| nodes.len() < cap);
                    if !budget_open {
                        // Budget exhausted: the target never becomes a node,
                        // so the edge to it is dropped too.
                        continue;
                    }
                    visited.insert(target.clone());
                    nodes.push(target.clone());
                    frontier.push_back(target.clone());
                }

                let edge = (current.clone(), target);
                if edge_set.insert(edge.clone()) {
                    edges.push(edge);
                }
            }
        }

        Ok(Graph {
            start,
            nodes,
            edges,
        })
    }

    /// Calls flowing out of one node, concatenated over every matching
    /// clause in declaration order. Absent module or no matching clause
    /// means zero calls.
    fn outgoing_calls(&self, node: &FunctionRef) -> Vec<Call> {
        let Some(block) = self.store.lookup(&node.module) else {
            eprintln!("WARN: module {} not cached; {} is a leaf", node.module, node);
            return Vec::new();
        };
        let Block::Module(module) = block.as_ref() else {
            return Vec::new();
        };

        let mut calls = Vec::new();
        let mut matched = false;
        for clause in &module.functions {
            if clause.name == node.name && self.clause_matches(clause, node.arity) {
                matched = true;
                calls.extend(clause.calls.iter().cloned());
            }
        }
        if !matched {
            eprintln!("WARN: no clause matches {}; treating as a leaf", node);
        }
        calls
    }

    /// Arity matching tiers: explicit arity, then parameter count, then the
    /// configured fallback for clauses with no information at all.
    fn clause_matches(&self, clause: &FunctionBlock, arity: usize) -> bool {
        if let Some(declared) = clause.arity {
            return declared == arity;
        }
        if let Some(params) = &clause.params {
            return params.len() == arity;
        }
        self.strictness == MatchStrictness::Permissive
    }
}
