// Raw syntax tree consumed by the normalizer.
// Providers hand modules over in this shape; how they obtain it (parsing,
// compilation artifacts, ...) is their concern, not ours.

use serde::{Deserialize, Serialize};

/// Source position of a call site, when the provider knows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// One clause of a conditional-binding chain: an optional bound pattern and
/// the right-hand expression that produces the value being matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithClause {
    #[serde(default)]
    pub pattern: Option<String>,
    pub expr: RawNode,
}

/// A node of the provider-facing raw tree.
///
/// This is a closed set: every concrete call-site shape the analyzer
/// understands maps onto exactly one of these variants, and extraction logic
/// dispatches over them exhaustively. Anything a provider cannot express ends
/// up as `Literal` and contributes no calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawNode {
    /// Module declaration: dotted name plus top-level statements.
    Module { name: String, body: Vec<RawNode> },
    /// `alias A.B` or `alias A.B as: X`.
    Alias {
        target: String,
        #[serde(default)]
        rename: Option<String>,
    },
    /// Grouped alias: `alias Prefix.{A, B}`.
    AliasGroup { prefix: String, suffixes: Vec<String> },
    /// Module attribute (documentation and the like).
    Attribute { key: String, value: String },
    /// One function clause. Clauses sharing a name stay separate nodes.
    Function {
        name: String,
        params: Vec<String>,
        body: Vec<RawNode>,
    },
    /// `Mod.func(args)`.
    QualifiedCall {
        module: String,
        name: String,
        args: Vec<RawNode>,
        #[serde(default)]
        position: Option<Position>,
    },
    /// Bare `func(args)` with no module qualifier.
    Call {
        name: String,
        args: Vec<RawNode>,
        #[serde(default)]
        position: Option<Position>,
    },
    /// Pipeline `lhs |> rhs`; the piped value becomes the rhs's first argument.
    Pipe { lhs: Box<RawNode>, rhs: Box<RawNode> },
    /// Conditional-binding chain with a success body and optional else body.
    With {
        clauses: Vec<WithClause>,
        body: Vec<RawNode>,
        #[serde(default)]
        else_body: Option<Vec<RawNode>>,
    },
    /// Tuple-like grouped literal.
    Tuple { items: Vec<RawNode> },
    /// List-like sequence literal.
    List { items: Vec<RawNode> },
    /// Nested statement block.
    Block { body: Vec<RawNode> },
    /// Bare variable reference.
    Var { name: String },
    /// Opaque leaf; never yields calls.
    Literal { value: serde_json::Value },
}

impl RawNode {
    /// Variant name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            RawNode::Module { .. } => "module",
            RawNode::Alias { .. } => "alias",
            RawNode::AliasGroup { .. } => "alias_group",
            RawNode::Attribute { .. } => "attribute",
            RawNode::Function { .. } => "function",
            RawNode::QualifiedCall { .. } => "qualified_call",
            RawNode::Call { .. } => "call",
            RawNode::Pipe { .. } => "pipe",
            RawNode::With { .. } => "with",
            RawNode::Tuple { .. } => "tuple",
            RawNode::List { .. } => "list",
            RawNode::Block { .. } => "block",
            RawNode::Var { .. } => "var",
            RawNode::Literal { .. } => "literal",
        }
    }
}
