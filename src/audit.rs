//! Audit report of a pruning run.
//!
//! The report is a plain serialization of the removed-edge record: entries appear in the
//! order they were removed and nothing is filtered. Only the critical node list is sorted.

use std::fmt;
use std::io;

use chrono::{NaiveDateTime, Timelike};

use crate::graph::{GraphRef, NodeLabel, UndirectedGraph};
use crate::prune::NodeRemovals;

const RULE: &str = "----------------------------------------";

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReportEdge {
    pub source: NodeLabel,
    pub target: NodeLabel,
    pub resistance: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReportNode {
    pub node: NodeLabel,
    pub edges: Vec<ReportEdge>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuditReport {
    pub generated_at: NaiveDateTime,
    pub node_count: usize,
    pub edges_before: usize,
    pub edges_after: usize,
    pub edges_removed: usize,
    /// Labels, ascending.
    pub critical_nodes: Vec<NodeLabel>,
    pub removals: Vec<ReportNode>,
}

/// Build the report for `graph` after pruning.
///
/// `critical` and `record` use dense indices of `graph`; they are resolved to labels here.
pub fn write_report(
    graph: &UndirectedGraph,
    critical: &[usize],
    record: &[NodeRemovals],
    initial_edge_count: usize,
    generated_at: NaiveDateTime,
) -> AuditReport {
    let label = |i: usize| graph.label(i).unwrap_or(i as NodeLabel);

    let mut critical_nodes: Vec<NodeLabel> = critical.iter().map(|&i| label(i)).collect();
    critical_nodes.sort_unstable();

    let removals = record
        .iter()
        .map(|r| ReportNode {
            node: label(r.node),
            edges: r
                .edges
                .iter()
                .map(|e| ReportEdge {
                    source: label(e.source),
                    target: label(e.target),
                    resistance: e.resistance,
                })
                .collect(),
        })
        .collect();

    let edges_after = graph.edge_count();
    AuditReport {
        generated_at,
        node_count: graph.node_count(),
        edges_before: initial_edge_count,
        edges_after,
        edges_removed: initial_edge_count.saturating_sub(edges_after),
        critical_nodes,
        removals,
    }
}

impl AuditReport {
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    pub fn write_to<W: io::Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "{self}")
    }
}

/// `YYYY-mm-dd HH:MM:SS[.ffffff]`; the fraction is omitted when it is zero.
fn format_timestamp(ts: &NaiveDateTime) -> String {
    if ts.nanosecond() / 1_000 == 0 {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Critical Node Edge Removal Log ===")?;
        writeln!(f)?;
        writeln!(f, "Analysis performed at: {}", format_timestamp(&self.generated_at))?;
        writeln!(f)?;
        writeln!(f, "Total Nodes: {}", self.node_count)?;
        writeln!(f, "Total Edges Before Removal: {}", self.edges_before)?;
        writeln!(f, "Total Edges After Removal: {}", self.edges_after)?;
        writeln!(f, "Total Removed Edges: {}", self.edges_removed)?;
        let critical: Vec<String> = self.critical_nodes.iter().map(|n| n.to_string()).collect();
        writeln!(f, "Identified Critical Nodes: [{}]", critical.join(", "))?;
        writeln!(f)?;

        for node in &self.removals {
            writeln!(f, "Node {} - Removed {} edges:", node.node, node.edges.len())?;
            for e in &node.edges {
                writeln!(
                    f,
                    "  Removed Edge: ({}, {}), Effective Resistance: {:.4}",
                    e.source, e.target, e.resistance
                )?;
            }
            writeln!(f, "{RULE}")?;
        }
        Ok(())
    }
}
