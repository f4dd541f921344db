//! Application facade tying the store, builder, and renderers together.

use std::sync::Arc;
use std::thread;

use crate::api::dto::GraphDto;
use crate::domain::block::{Block, FunctionRef, ModuleName};
use crate::domain::graph::{Graph, GraphBuilder, TraversalError};
use crate::domain::store::{BlockStore, RescanReport, StoreError};
use crate::ports::SourceProvider;
use crate::ports::mermaid_exporter::MermaidExporter;
use crate::ports::text_renderer::TextRenderer;

pub struct Analyzer {
    store: Arc<BlockStore>,
    provider: Arc<dyn SourceProvider>,
}

impl Analyzer {
    pub fn new(provider: Arc<dyn SourceProvider>) -> Self {
        Analyzer {
            store: Arc::new(BlockStore::new()),
            provider,
        }
    }

    pub fn store(&self) -> &BlockStore {
        &self.store
    }

    pub fn get_block(&self, id: &ModuleName) -> Result<Arc<Block>, StoreError> {
        self.store.get(id)
    }

    pub fn list_modules(&self) -> Vec<ModuleName> {
        self.store.list()
    }

    /// Fire-and-forget rescan on a background thread. Lookups keep working
    /// while it runs; per-key swaps land atomically.
    pub fn rescan(&self) {
        let store = Arc::clone(&self.store);
        let provider = Arc::clone(&self.provider);
        thread::spawn(move || {
            let report = store.rescan(provider.as_ref());
            println!(
                "[callscope] rescan complete: {} modules cached, {} skipped",
                report.scanned, report.failed
            );
        });
    }

    /// Synchronous rescan for callers that need the result before moving on.
    pub fn rescan_blocking(&self) -> RescanReport {
        self.store.rescan(self.provider.as_ref())
    }

    pub fn build_call_graph(
        &self,
        module: ModuleName,
        function: &str,
        arity: usize,
    ) -> Result<Graph, TraversalError> {
        GraphBuilder::new(&self.store).build(FunctionRef {
            module,
            name: function.to_string(),
            arity,
        })
    }

    pub fn render_text(&self, graph: &Graph) -> String {
        TextRenderer::render(graph)
    }

    pub fn render_diagram(&self, graph: &Graph) -> String {
        MermaidExporter::to_mermaid(graph)
    }

    pub fn render_json(&self, graph: &Graph) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&GraphDto::from(graph))
    }
}
