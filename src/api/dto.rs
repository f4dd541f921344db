use serde::{Deserialize, Serialize};

use crate::domain::graph::Graph;

/// JSON projection of a built call graph for machine consumers.
#[derive(Debug, Serialize, Deserialize)]
pub struct GraphDto {
    pub start: String,
    pub nodes: Vec<NodeDto>,
    pub edges: Vec<EdgeDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NodeDto {
    pub id: String,
    pub module: String,
    pub function: String,
    pub arity: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EdgeDto {
    pub from: String,
    pub to: String,
}

impl From<&Graph> for GraphDto {
    fn from(graph: &Graph) -> Self {
        let nodes = graph
            .nodes
            .iter()
            .map(|n| NodeDto {
                id: n.to_string(),
                module: n.module.to_string(),
                function: n.name.clone(),
                arity: n.arity,
            })
            .collect();

        let edges = graph
            .edges
            .iter()
            .map(|(from, to)| EdgeDto {
                from: from.to_string(),
                to: to.to_string(),
            })
            .collect();

        GraphDto {
            start: graph.start.to_string(),
            nodes,
            edges,
        }
    }
}
