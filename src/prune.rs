//! Connectivity-preserving edge pruning around critical nodes.
//!
//! For each critical node, in the order given:
//! 1. take its current incident edges;
//! 2. score each by effective resistance against the shared \(L^+\). A score that fell back
//!    to zero because the on-demand inversion failed stays a candidate, ranked last; any
//!    other degraded score leaves the edge alone;
//! 3. walk them once, highest resistance first (stable on ties), removing every edge whose
//!    removal keeps the graph connected.
//!
//! Later nodes see the edges earlier nodes removed. Under [`PinvPolicy::ComputeOnce`] they
//! do not see an updated \(L^+\): resistances come from the graph as it was before pruning.
//!
//! Invariants:
//! - a connected input stays connected after every single removal;
//! - only edges are removed, so the output is a subgraph of the input;
//! - the result is a deterministic function of graph, order, and \(L^+\).

use std::borrow::Cow;

use tracing::{debug, warn};

use crate::connectivity::is_connected_without_edge;
use crate::graph::{GraphRef, UndirectedGraph};
use crate::laplacian::{laplacian_pinv, LaplacianPinv};
use crate::outcome::Outcome;
use crate::resistance::effective_resistance;
use crate::{Error, Result};

/// How the pseudo-inverse evolves while edges are removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PinvPolicy {
    /// Reuse the pre-pruning \(L^+\) for the whole run.
    #[default]
    ComputeOnce,
    /// Recompute \(L^+\) from the current graph before each critical node.
    RefreshPerNode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PruneConfig {
    pub pinv_policy: PinvPolicy,
}

/// A committed removal. `source` is the critical node; both ends are dense indices.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RemovedEdge {
    pub source: usize,
    pub target: usize,
    /// Effective resistance at the time of removal.
    pub resistance: f64,
}

/// Removals for one critical node, in removal order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeRemovals {
    pub node: usize,
    pub edges: Vec<RemovedEdge>,
}

/// What happened while processing a single critical node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodePass {
    pub node: usize,
    /// Incident edges considered for removal, neutral ones included.
    pub candidates: usize,
    /// Candidates scored with the neutral zero after a failed inversion.
    pub neutral: usize,
    /// Incident edges skipped because their resistance degraded.
    pub excluded: usize,
    pub removed: Vec<RemovedEdge>,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PruneRun {
    /// Only nodes that lost at least one edge, in processing order.
    pub removed: Vec<NodeRemovals>,
    pub total_removed: usize,
    pub nodes_processed: usize,
    pub pinv_refreshes: usize,
}

/// Step-wise pruner over a borrowed graph.
///
/// Each [`step`](Pruner::step) processes one critical node completely, so stopping between
/// steps leaves a connected graph and a consistent record.
pub struct Pruner<'g, 'p> {
    graph: &'g mut UndirectedGraph,
    order: Vec<usize>,
    cursor: usize,
    pinv: Option<Cow<'p, LaplacianPinv>>,
    config: PruneConfig,
    run: PruneRun,
}

impl<'g, 'p> Pruner<'g, 'p> {
    pub fn new(
        graph: &'g mut UndirectedGraph,
        critical: &[usize],
        pinv: Option<&'p LaplacianPinv>,
        config: PruneConfig,
    ) -> Self {
        Self {
            graph,
            order: critical.to_vec(),
            cursor: 0,
            pinv: pinv.map(Cow::Borrowed),
            config,
            run: PruneRun::default(),
        }
    }

    pub fn graph(&self) -> &UndirectedGraph {
        &*self.graph
    }

    pub fn remaining(&self) -> usize {
        self.order.len() - self.cursor
    }

    /// The run so far.
    pub fn run(&self) -> &PruneRun {
        &self.run
    }

    /// Process the next critical node; `None` once all have been processed.
    pub fn step(&mut self) -> Option<NodePass> {
        let node = *self.order.get(self.cursor)?;
        self.cursor += 1;
        self.run.nodes_processed += 1;

        if node >= self.graph.node_count() {
            warn!(node, "critical node index out of range; skipped");
            return Some(NodePass {
                node,
                candidates: 0,
                neutral: 0,
                excluded: 0,
                removed: Vec::new(),
            });
        }

        if self.config.pinv_policy == PinvPolicy::RefreshPerNode {
            self.refresh_pinv(node);
        }

        let pass = self.process(node);
        if !pass.removed.is_empty() {
            self.run.total_removed += pass.removed.len();
            self.run.removed.push(NodeRemovals {
                node,
                edges: pass.removed.clone(),
            });
        }
        Some(pass)
    }

    /// Process every remaining node and return the full run.
    pub fn finish(mut self) -> PruneRun {
        while self.step().is_some() {}
        self.run
    }

    fn refresh_pinv(&mut self, node: usize) {
        match laplacian_pinv(&*self.graph) {
            Ok(fresh) => {
                self.pinv = Some(Cow::Owned(fresh));
                self.run.pinv_refreshes += 1;
            }
            Err(cause) => {
                warn!(node, %cause, "pseudo-inverse refresh failed; keeping previous");
            }
        }
    }

    fn process(&mut self, node: usize) -> NodePass {
        let incident: Vec<usize> = self.graph.neighbors_ref(node).to_vec();
        let mut pass = NodePass {
            node,
            candidates: 0,
            neutral: 0,
            excluded: 0,
            removed: Vec::new(),
        };
        if incident.is_empty() {
            debug!(node, "no incident edges");
            return pass;
        }

        let pinv = self.pinv.as_deref();
        // (target, resistance, neutral)
        let mut scored: Vec<(usize, f64, bool)> = Vec::with_capacity(incident.len());
        for target in incident {
            match effective_resistance(&*self.graph, node, target, pinv) {
                Outcome::Computed(r) => scored.push((target, r, false)),
                Outcome::Degraded { value, cause } if is_neutral(&cause) => {
                    debug!(node, target, %cause, "neutral resistance; edge ranked last");
                    pass.neutral += 1;
                    scored.push((target, value, true));
                }
                Outcome::Degraded { cause, .. } => {
                    warn!(node, target, %cause, "resistance unavailable; edge kept");
                    pass.excluded += 1;
                }
            }
        }
        pass.candidates = scored.len();

        scored.sort_by(|a, b| a.2.cmp(&b.2).then_with(|| b.1.total_cmp(&a.1)));

        for (target, resistance, _) in scored {
            if !is_connected_without_edge(&*self.graph, node, target) {
                continue;
            }
            self.graph.remove_edge(node, target);
            debug!(node, target, resistance, "edge removed");
            pass.removed.push(RemovedEdge {
                source: node,
                target,
                resistance,
            });
        }

        debug!(
            node,
            candidates = pass.candidates,
            removed = pass.removed.len(),
            "critical node processed"
        );
        pass
    }
}

/// Only a failed inversion of the graph itself yields the neutral zero; bad indices and a
/// mismatched or non-finite \(L^+\) exclude the edge.
fn is_neutral(cause: &Error) -> bool {
    matches!(cause, Error::SingularMatrix { .. })
}

/// Prune edges around `critical` (processed in slice order), mutating `graph` in place.
pub fn prune(
    graph: &mut UndirectedGraph,
    critical: &[usize],
    pinv: Option<&LaplacianPinv>,
    config: &PruneConfig,
) -> PruneRun {
    Pruner::new(graph, critical, pinv, *config).finish()
}

/// Checked pruning.
///
/// Rejects out-of-range critical indices and a `pinv` sized for a different graph before
/// touching `graph`.
pub fn prune_checked(
    graph: &mut UndirectedGraph,
    critical: &[usize],
    pinv: Option<&LaplacianPinv>,
    config: &PruneConfig,
) -> Result<PruneRun> {
    let n = graph.node_count();
    if let Some(&bad) = critical.iter().find(|&&v| v >= n) {
        return Err(Error::IndexOutOfBounds(bad));
    }
    if let Some(p) = pinv {
        if p.dim() != n {
            return Err(Error::DimensionMismatch {
                expected: n,
                actual: p.dim(),
            });
        }
    }
    Ok(prune(graph, critical, pinv, config))
}
