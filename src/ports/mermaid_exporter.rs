//! Mermaid Diagram Exporter
//!
//! Renders a call graph as a Mermaid `graph TD` description. Node identifiers
//! come from an FNV-1a hash of the rendered ref so repeated runs diff cleanly.

use std::path::Path;

use crate::domain::block::FunctionRef;
use crate::domain::graph::Graph;
use crate::ports::GraphExporter;

pub struct MermaidExporter;

impl MermaidExporter {
    /// Export a graph to a Mermaid file.
    pub fn export_to(graph: &Graph, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, Self::to_mermaid(graph))
    }

    /// Convert a graph to a Mermaid description string.
    pub fn to_mermaid(graph: &Graph) -> String {
        let mut lines = Vec::new();
        lines.push("graph TD".to_string());

        for node in &graph.nodes {
            lines.push(format!(
                "    {}[\"{}\"]",
                Self::node_id(node),
                Self::escape_label(&node.to_string())
            ));
        }

        for (from, to) in &graph.edges {
            lines.push(format!(
                "    {} --> {}",
                Self::node_id(from),
                Self::node_id(to)
            ));
        }

        lines.join("\n")
    }

    /// Stable identifier for one node across runs.
    fn node_id(node: &FunctionRef) -> String {
        format!("n{:016x}", fnv1a64(node.to_string().as_bytes()))
    }

    /// Substitute characters Mermaid treats as delimiters inside labels.
    fn escape_label(label: &str) -> String {
        label
            .chars()
            .map(|c| match c {
                '"' => '\'',
                '[' | '{' => '(',
                ']' | '}' => ')',
                other => other,
            })
            .collect()
    }
}

impl GraphExporter for MermaidExporter {
    fn export(&self, graph: &Graph, path: &Path) -> std::io::Result<()> {
        Self::export_to(graph, path)
    }
}

/// FNV-1a 64-bit. DefaultHasher is not stable across Rust releases, and the
/// identifiers must not churn between runs of different builds.
fn fnv1a64(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    let mut hash = OFFSET;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}
