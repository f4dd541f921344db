//! Plain-text graph rendering: header, counts, then node and edge lists in
//! the graph's insertion order.

use std::path::Path;

use crate::domain::graph::Graph;
use crate::ports::GraphExporter;

pub struct TextRenderer;

impl TextRenderer {
    pub fn render(graph: &Graph) -> String {
        let mut lines = Vec::new();
        lines.push(format!("call graph from {}", graph.start));
        lines.push(format!(
            "{} nodes, {} edges",
            graph.nodes.len(),
            graph.edges.len()
        ));
        lines.push("nodes:".to_string());
        for node in &graph.nodes {
            lines.push(format!("  {}", node));
        }
        lines.push("edges:".to_string());
        for (from, to) in &graph.edges {
            lines.push(format!("  {} -> {}", from, to));
        }
        lines.join("\n")
    }
}

impl GraphExporter for TextRenderer {
    fn export(&self, graph: &Graph, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, Self::render(graph))
    }
}
