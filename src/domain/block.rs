// Canonical structural model produced by normalization.
// A Block is immutable once built; rescans replace it wholesale.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::raw::Position;

/// Hierarchical module identifier, e.g. `MyApp.Worker`.
///
/// Stored as its dotted segments; serialized as the dotted string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ModuleName(Vec<String>);

impl ModuleName {
    /// Parse a dotted name. Empty input yields an empty (invalid) name,
    /// which the graph builder rejects as a start reference.
    pub fn parse(dotted: &str) -> Self {
        let segments = dotted
            .split('.')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        ModuleName(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if the name is a single bare segment (alias-table candidate).
    pub fn is_bare(&self) -> bool {
        self.0.len() == 1
    }

    pub fn last_segment(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Append another name's segments, e.g. `Prefix` + `A` -> `Prefix.A`.
    pub fn join(&self, suffix: &ModuleName) -> ModuleName {
        let mut segments = self.0.clone();
        segments.extend(suffix.0.iter().cloned());
        ModuleName(segments)
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl From<&str> for ModuleName {
    fn from(s: &str) -> Self {
        ModuleName::parse(s)
    }
}

impl From<String> for ModuleName {
    fn from(s: String) -> Self {
        ModuleName::parse(&s)
    }
}

impl From<ModuleName> for String {
    fn from(name: ModuleName) -> String {
        name.to_string()
    }
}

/// A recorded invocation extracted from a function body.
/// `module == None` means unqualified: resolved to the enclosing module at
/// traversal time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub module: Option<ModuleName>,
    pub name: String,
    pub arity: usize,
    #[serde(default)]
    pub position: Option<Position>,
}

/// Key/value module attribute. Informational only; graph construction
/// never reads these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

/// One function clause with its extracted calls, in call-site order.
///
/// `arity` and `params` are both optional so the clause matcher can fall back
/// through explicit arity, then parameter count, then the configured default.
/// The normalizer always fills both; providers feeding blocks from other
/// sources may not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionBlock {
    pub name: String,
    #[serde(default)]
    pub arity: Option<usize>,
    #[serde(default)]
    pub params: Option<Vec<String>>,
    pub calls: Vec<Call>,
}

/// Normalized module: child function clauses and attributes in source
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleBlock {
    pub name: ModuleName,
    pub functions: Vec<FunctionBlock>,
    pub attributes: Vec<Attribute>,
}

/// Canonical block, tagged by what it describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Block {
    Module(ModuleBlock),
    Function(FunctionBlock),
}

/// Call-graph node identity: (module, function name, arity).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionRef {
    pub module: ModuleName,
    pub name: String,
    pub arity: usize,
}

impl FunctionRef {
    pub fn new(module: impl Into<ModuleName>, name: impl Into<String>, arity: usize) -> Self {
        FunctionRef {
            module: module.into(),
            name: name.into(),
            arity,
        }
    }
}

impl fmt::Display for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}/{}", self.module, self.name, self.arity)
    }
}
