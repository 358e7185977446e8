//! Graph model and adapter traits.
//!
//! Operators read graphs through [`GraphRef`], which exposes dense node indices `0..n` and
//! borrowed neighbor slices. [`UndirectedGraph`] is the concrete graph the pipeline owns and
//! mutates: nodes carry opaque [`NodeLabel`]s, their dense index is their insertion order,
//! and neighbor lists stay in insertion order across edge removals.

use std::collections::HashMap;

use crate::{Error, Result};

/// Caller-facing node identifier.
pub type NodeLabel = u64;

/// Borrowed adjacency view over dense node indices.
pub trait GraphRef {
    fn node_count(&self) -> usize;
    fn neighbors_ref(&self, node: usize) -> &[usize];

    fn degree(&self, node: usize) -> usize {
        self.neighbors_ref(node).len()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UndirectedGraph {
    labels: Vec<NodeLabel>,
    index: HashMap<NodeLabel, usize>,
    adj: Vec<Vec<usize>>,
    edge_count: usize,
}

impl UndirectedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            labels: Vec::with_capacity(nodes),
            index: HashMap::with_capacity(nodes),
            adj: Vec::with_capacity(nodes),
            edge_count: 0,
        }
    }

    /// Build from labelled edges, adding nodes in first-seen order.
    pub fn from_edges(edges: &[(NodeLabel, NodeLabel)]) -> Result<Self> {
        let mut g = Self::new();
        for &(a, b) in edges {
            g.add_edge(a, b)?;
        }
        Ok(g)
    }

    /// Nodes labelled `0..n` with no edges.
    pub fn with_nodes(n: usize) -> Self {
        let mut g = Self::with_capacity(n);
        for label in 0..n as NodeLabel {
            g.add_node(label);
        }
        g
    }

    /// Insert `label` if absent; returns its dense index either way.
    pub fn add_node(&mut self, label: NodeLabel) -> usize {
        if let Some(&idx) = self.index.get(&label) {
            return idx;
        }
        let idx = self.labels.len();
        self.labels.push(label);
        self.adj.push(Vec::new());
        self.index.insert(label, idx);
        idx
    }

    /// Insert an undirected edge between two labels, adding missing nodes.
    ///
    /// Returns `Ok(false)` if the edge already existed (the graph stays simple).
    pub fn add_edge(&mut self, a: NodeLabel, b: NodeLabel) -> Result<bool> {
        if a == b {
            return Err(Error::SelfLoop(a));
        }
        let u = self.add_node(a);
        let v = self.add_node(b);
        Ok(self.add_edge_indices(u, v))
    }

    pub(crate) fn add_edge_indices(&mut self, u: usize, v: usize) -> bool {
        if u == v || self.has_edge(u, v) {
            return false;
        }
        self.adj[u].push(v);
        self.adj[v].push(u);
        self.edge_count += 1;
        true
    }

    /// Remove the edge `u - v` (dense indices). Remaining neighbors keep their order.
    pub fn remove_edge(&mut self, u: usize, v: usize) -> bool {
        let n = self.adj.len();
        if u >= n || v >= n {
            return false;
        }
        let Some(pos_u) = self.adj[u].iter().position(|&x| x == v) else {
            return false;
        };
        self.adj[u].remove(pos_u);
        if let Some(pos_v) = self.adj[v].iter().position(|&x| x == u) {
            self.adj[v].remove(pos_v);
        }
        self.edge_count -= 1;
        true
    }

    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.adj.get(u).is_some_and(|ns| ns.contains(&v))
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[NodeLabel] {
        &self.labels
    }

    pub fn label(&self, node: usize) -> Option<NodeLabel> {
        self.labels.get(node).copied()
    }

    pub fn index_of(&self, label: NodeLabel) -> Option<usize> {
        self.index.get(&label).copied()
    }

    /// Each edge once as `(u, v)` with `u < v`, ordered by `u` then by `u`'s neighbor order.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(self.edge_count);
        for (u, ns) in self.adj.iter().enumerate() {
            out.extend(ns.iter().filter(|&&v| v > u).map(|&v| (u, v)));
        }
        out
    }

    /// Same as [`edges`](Self::edges), resolved to labels.
    pub fn labelled_edges(&self) -> Vec<(NodeLabel, NodeLabel)> {
        self.edges()
            .into_iter()
            .map(|(u, v)| (self.labels[u], self.labels[v]))
            .collect()
    }

    /// Subgraph induced by `nodes` (dense indices, any order).
    ///
    /// Nodes keep their relative native order and neighbor lists keep their order.
    pub fn induced_subgraph(&self, nodes: &[usize]) -> Self {
        let n = self.adj.len();
        let mut keep = vec![false; n];
        for &u in nodes {
            if u < n {
                keep[u] = true;
            }
        }
        let mut remap = vec![usize::MAX; n];
        let mut out = Self::with_capacity(nodes.len());
        for u in (0..n).filter(|&u| keep[u]) {
            remap[u] = out.add_node(self.labels[u]);
        }
        for u in (0..n).filter(|&u| keep[u]) {
            let nu = remap[u];
            out.adj[nu] = self.adj[u]
                .iter()
                .filter(|&&v| keep[v])
                .map(|&v| remap[v])
                .collect();
        }
        out.edge_count = out.adj.iter().map(Vec::len).sum::<usize>() / 2;
        out
    }
}

impl GraphRef for UndirectedGraph {
    fn node_count(&self) -> usize {
        self.labels.len()
    }

    fn neighbors_ref(&self, node: usize) -> &[usize] {
        self.adj.get(node).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(feature = "petgraph")]
impl UndirectedGraph {
    /// Convert a petgraph undirected graph, labelling nodes by `NodeIndex::index()`.
    ///
    /// Self-loops and parallel edges are dropped.
    pub fn from_petgraph<N, E>(graph: &petgraph::graph::UnGraph<N, E>) -> Self {
        let mut out = Self::with_capacity(graph.node_count());
        for idx in graph.node_indices() {
            out.add_node(idx.index() as NodeLabel);
        }
        for edge in graph.raw_edges() {
            out.add_edge_indices(edge.source().index(), edge.target().index());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_follow_first_seen_order() {
        let g = UndirectedGraph::from_edges(&[(10, 3), (3, 7), (7, 10)]).unwrap();
        assert_eq!(g.labels(), &[10, 3, 7]);
        assert_eq!(g.index_of(7), Some(2));
        assert_eq!(g.edge_count(), 3);
    }

    #[test]
    fn duplicate_edges_are_ignored_and_self_loops_rejected() {
        let mut g = UndirectedGraph::new();
        assert!(g.add_edge(1, 2).unwrap());
        assert!(!g.add_edge(2, 1).unwrap());
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.add_edge(4, 4).unwrap_err(), Error::SelfLoop(4));
    }

    #[test]
    fn remove_edge_preserves_neighbor_order() {
        let g0 = UndirectedGraph::from_edges(&[(0, 1), (0, 2), (0, 3), (0, 4)]).unwrap();
        let mut g = g0.clone();
        assert!(g.remove_edge(0, 2));
        assert_eq!(g.neighbors_ref(0), &[1, 3, 4]);
        assert_eq!(g.edge_count(), 3);
        assert!(!g.remove_edge(0, 2));
        assert!(!g.remove_edge(0, 99));
    }

    #[test]
    fn induced_subgraph_keeps_order() {
        // 0-1-2 and 3-4
        let g = UndirectedGraph::from_edges(&[(5, 6), (6, 7), (8, 9)]).unwrap();
        let sub = g.induced_subgraph(&[2, 0, 1]);
        assert_eq!(sub.labels(), &[5, 6, 7]);
        assert_eq!(sub.edge_count(), 2);
        assert_eq!(sub.labelled_edges(), vec![(5, 6), (6, 7)]);
    }
}
