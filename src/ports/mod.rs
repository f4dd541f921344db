use std::path::Path;

use crate::domain::block::ModuleName;
use crate::domain::graph::Graph;
use crate::domain::raw::RawNode;

pub mod mermaid_exporter;
pub mod text_renderer;

/// External collaborator that supplies raw syntax trees. How it obtains them
/// (filesystem, compiler artifacts, a server) is outside this crate.
pub trait SourceProvider: Send + Sync {
    /// Modules the provider currently knows about; drives `rescan`.
    fn enumerate_modules(&self) -> Vec<ModuleName>;

    /// Raw tree for one module, or `None` if the provider cannot produce it.
    fn resolve(&self, id: &ModuleName) -> Option<RawNode>;
}

/// Writes a rendered graph to a file.
pub trait GraphExporter {
    fn export(&self, graph: &Graph, path: &Path) -> std::io::Result<()>;
}
