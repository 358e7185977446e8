//! Connectivity queries.
//!
//! The pruner's gate: an edge may only be removed if the graph stays connected without it.
//! Everything here is BFS over [`GraphRef`] adjacency, so no per-query graph copies are made.
//!
//! Invariants:
//! - `connected_components` output length equals `graph.node_count()`.
//! - Labels are contiguous in `0..k`, numbered in order of each component's smallest node.

use std::collections::VecDeque;

use crate::graph::{GraphRef, UndirectedGraph};

/// Connected components of an undirected graph, using BFS.
pub fn connected_components<G: GraphRef>(graph: &G) -> Vec<usize> {
    let n = graph.node_count();
    let mut labels = vec![usize::MAX; n];
    let mut queue: VecDeque<usize> = VecDeque::new();

    let mut comp = 0usize;
    for start in 0..n {
        if labels[start] != usize::MAX {
            continue;
        }
        labels[start] = comp;
        queue.push_back(start);
        while let Some(u) = queue.pop_front() {
            for &v in graph.neighbors_ref(u) {
                if v >= n {
                    // Adapter contract violation; ignore out-of-range neighbor.
                    continue;
                }
                if labels[v] == usize::MAX {
                    labels[v] = comp;
                    queue.push_back(v);
                }
            }
        }
        comp += 1;
    }

    labels
}

pub fn component_count<G: GraphRef>(graph: &G) -> usize {
    connected_components(graph)
        .into_iter()
        .max()
        .map_or(0, |k| k + 1)
}

/// The empty graph counts as connected.
pub fn is_connected<G: GraphRef>(graph: &G) -> bool {
    reached_without(graph, None) == graph.node_count()
}

/// Whether `graph` would stay connected if the edge `u - v` were removed.
///
/// Returns `false` if the graph is already disconnected.
pub fn is_connected_without_edge<G: GraphRef>(graph: &G, u: usize, v: usize) -> bool {
    reached_without(graph, Some((u, v))) == graph.node_count()
}

/// Number of nodes reachable from node 0, treating `skip` (either direction) as absent.
fn reached_without<G: GraphRef>(graph: &G, skip: Option<(usize, usize)>) -> usize {
    let n = graph.node_count();
    if n == 0 {
        return 0;
    }
    let is_skipped = |a: usize, b: usize| match skip {
        Some((u, v)) => (a == u && b == v) || (a == v && b == u),
        None => false,
    };

    let mut seen = vec![false; n];
    let mut queue = VecDeque::from([0usize]);
    seen[0] = true;
    let mut reached = 1usize;
    while let Some(a) = queue.pop_front() {
        for &b in graph.neighbors_ref(a) {
            if b >= n || seen[b] || is_skipped(a, b) {
                continue;
            }
            seen[b] = true;
            reached += 1;
            queue.push_back(b);
        }
    }
    reached
}

/// Subgraph induced by the largest connected component.
///
/// Ties go to the component containing the smallest node index. Nodes and neighbor lists
/// keep their native order.
pub fn largest_component(graph: &UndirectedGraph) -> UndirectedGraph {
    let labels = connected_components(graph);
    let k = labels.iter().max().map_or(0, |m| m + 1);
    if k <= 1 {
        return graph.clone();
    }
    let mut sizes = vec![0usize; k];
    for &c in &labels {
        sizes[c] += 1;
    }
    let mut best = 0usize;
    for (c, &size) in sizes.iter().enumerate() {
        if size > sizes[best] {
            best = c;
        }
    }
    let keep: Vec<usize> = (0..labels.len()).filter(|&i| labels[i] == best).collect();
    graph.induced_subgraph(&keep)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct VecGraph {
        adj: Vec<Vec<usize>>,
    }

    impl GraphRef for VecGraph {
        fn node_count(&self) -> usize {
            self.adj.len()
        }
        fn neighbors_ref(&self, node: usize) -> &[usize] {
            &self.adj[node]
        }
    }

    #[test]
    fn connected_components_two_components() {
        // 0-1-2 and 3-4
        let g = VecGraph {
            adj: vec![vec![1], vec![0, 2], vec![1], vec![4], vec![3]],
        };
        let labels = connected_components(&g);
        assert_eq!(labels, vec![0, 0, 0, 1, 1]);
        assert_eq!(component_count(&g), 2);
        assert!(!is_connected(&g));
    }

    #[test]
    fn bridge_removal_is_detected() {
        // triangle 0-1-2 with pendant 3 hanging off 2
        let g = VecGraph {
            adj: vec![vec![1, 2], vec![0, 2], vec![0, 1, 3], vec![2]],
        };
        assert!(is_connected(&g));
        assert!(is_connected_without_edge(&g, 0, 1));
        assert!(is_connected_without_edge(&g, 1, 0));
        assert!(!is_connected_without_edge(&g, 2, 3));
        assert!(!is_connected_without_edge(&g, 3, 2));
    }

    #[test]
    fn empty_and_singleton_are_connected() {
        let empty = VecGraph { adj: vec![] };
        assert!(is_connected(&empty));
        assert_eq!(component_count(&empty), 0);
        let one = VecGraph { adj: vec![vec![]] };
        assert!(is_connected(&one));
    }

    #[test]
    fn largest_component_picks_biggest() {
        let g = UndirectedGraph::from_edges(&[(1, 2), (3, 4), (4, 5), (5, 3), (6, 7)]).unwrap();
        let big = largest_component(&g);
        assert_eq!(big.labels(), &[3, 4, 5]);
        assert_eq!(big.edge_count(), 3);
        assert!(is_connected(&big));
    }
}
