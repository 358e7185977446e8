//! Edge-list ingestion.
//!
//! One edge per line, whitespace separated: `<u> <v> [ignored...]`. Blank lines and lines
//! with a single token are skipped. Self-loops add their node but no edge, since the
//! pipeline works on loop-free graphs.

use tracing::{info, warn};

use crate::connectivity::{component_count, largest_component};
use crate::graph::{GraphRef, NodeLabel, UndirectedGraph};
use crate::{Error, Result};

pub fn parse_edge_list(text: &str) -> Result<UndirectedGraph> {
    let mut graph = UndirectedGraph::new();
    for (lineno, line) in text.lines().enumerate() {
        let mut parts = line.split_whitespace();
        let (Some(a), Some(b)) = (parts.next(), parts.next()) else {
            continue;
        };
        let a = parse_label(a, lineno + 1)?;
        let b = parse_label(b, lineno + 1)?;
        match graph.add_edge(a, b) {
            Ok(_) => {}
            Err(Error::SelfLoop(node)) => {
                warn!(line = lineno + 1, node, "self-loop dropped");
                graph.add_node(node);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(graph)
}

fn parse_label(token: &str, line: usize) -> Result<NodeLabel> {
    token.parse::<NodeLabel>().map_err(|e| Error::Parse {
        line,
        message: format!("invalid node id {token:?}: {e}"),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedGraph {
    pub graph: UndirectedGraph,
    /// Node count of the parsed graph before any reduction.
    pub parsed_nodes: usize,
    /// Whether the graph was reduced to its largest component.
    pub reduced: bool,
}

/// Parse an edge list and, if it is disconnected, keep only its largest component.
pub fn load_connected(text: &str) -> Result<LoadedGraph> {
    let parsed = parse_edge_list(text)?;
    let parsed_nodes = parsed.node_count();
    if component_count(&parsed) <= 1 {
        return Ok(LoadedGraph {
            graph: parsed,
            parsed_nodes,
            reduced: false,
        });
    }
    let graph = largest_component(&parsed);
    info!(
        parsed_nodes,
        kept_nodes = graph.node_count(),
        "using largest connected component"
    );
    Ok(LoadedGraph {
        graph,
        parsed_nodes,
        reduced: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_edges_skipping_noise() {
        let text = "1 2\n\n2 3 0.5 extra\n7\n  3   1  \n";
        let g = parse_edge_list(text).unwrap();
        assert_eq!(g.labels(), &[1, 2, 3]);
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn bad_token_reports_line() {
        let err = parse_edge_list("1 2\n2 x\n").unwrap_err();
        match err {
            Error::Parse { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("\"x\""), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn self_loop_keeps_node_only() {
        let g = parse_edge_list("4 4\n4 5\n").unwrap();
        assert_eq!(g.labels(), &[4, 5]);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn load_connected_reduces_to_largest_component() {
        let loaded = load_connected("1 2\n3 4\n4 5\n").unwrap();
        assert!(loaded.reduced);
        assert_eq!(loaded.parsed_nodes, 5);
        assert_eq!(loaded.graph.labels(), &[3, 4, 5]);

        let whole = load_connected("1 2\n2 3\n").unwrap();
        assert!(!whole.reduced);
        assert_eq!(whole.graph.node_count(), 3);
    }
}
