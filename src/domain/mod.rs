// Core domain: raw trees in, canonical blocks and call graphs out.

pub mod block;
pub mod graph;
pub mod normalize;
pub mod raw;
pub mod store;

pub use block::{Attribute, Block, Call, FunctionBlock, FunctionRef, ModuleBlock, ModuleName};
pub use graph::{Graph, GraphBuilder, MatchStrictness, TraversalError};
pub use normalize::{AstNormalizer, NormalizeError};
pub use raw::{Position, RawNode, WithClause};
pub use store::{BlockStore, RescanReport, StoreError};
