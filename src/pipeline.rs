//! End-to-end run: centrality → critical selection → pruning → audit report.
//!
//! A [`Pipeline`] is an explicit context object: all tunables live in its
//! [`PipelineConfig`], and every run returns everything it produced in a [`PipelineRun`].
//! Nothing is retained between runs. The input graph is cloned; the caller's graph is never
//! mutated.

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use crate::audit::{write_report, AuditReport};
use crate::centrality::{information_centrality_with_pinv, CentralityConfig};
use crate::connectivity::component_count;
use crate::critical::{select_critical_run, CriticalSelection, SelectorConfig};
use crate::graph::{GraphRef, NodeLabel, UndirectedGraph};
use crate::laplacian::laplacian_pinv;
use crate::outcome::Outcome;
use crate::prune::{prune, PruneConfig, PruneRun};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    pub centrality: CentralityConfig,
    pub selector: SelectorConfig,
    pub prune: PruneConfig,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        self.centrality.validate()?;
        self.selector.validate()
    }
}

#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// The pruned graph.
    pub graph: UndirectedGraph,
    pub initial_edge_count: usize,
    pub centrality: Outcome<Vec<f64>>,
    pub selection: CriticalSelection,
    /// `false` when the shared pseudo-inverse could not be computed and every resistance
    /// query fell back to computing its own.
    pub shared_pinv: bool,
    pub prune: PruneRun,
    pub report: AuditReport,
}

impl PipelineRun {
    /// Critical nodes as labels, in pruning order.
    pub fn critical_labels(&self) -> Vec<NodeLabel> {
        self.selection
            .nodes
            .iter()
            .filter_map(|&i| self.graph.label(i))
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run on `graph`, stamping the report with the local time.
    pub fn run(&self, graph: &UndirectedGraph) -> PipelineRun {
        self.run_at(graph, Local::now().naive_local())
    }

    /// Run on `graph` with a caller-chosen report timestamp.
    ///
    /// With a fixed timestamp the whole run, report text included, is deterministic.
    pub fn run_at(&self, graph: &UndirectedGraph, generated_at: NaiveDateTime) -> PipelineRun {
        let n = graph.node_count();
        let initial_edge_count = graph.edge_count();

        // One L⁺ serves both the centrality scores and the pruner.
        let pinv = laplacian_pinv(graph);
        let centrality = match &pinv {
            Ok(p) => information_centrality_with_pinv(graph, p, &self.config.centrality),
            Err(cause) => {
                warn!(n, %cause, "pseudo-inverse unavailable; uniform centrality");
                Outcome::degraded(vec![1.0; n], cause.clone())
            }
        };
        let selection = select_critical_run(graph, centrality.value(), &self.config.selector);

        let mut pruned = graph.clone();
        let shared = pinv.as_ref().ok();
        let prune_run = prune(&mut pruned, &selection.nodes, shared, &self.config.prune);

        let report = write_report(
            &pruned,
            &selection.nodes,
            &prune_run.removed,
            initial_edge_count,
            generated_at,
        );
        info!(
            nodes = n,
            edges_before = initial_edge_count,
            edges_after = pruned.edge_count(),
            critical = selection.nodes.len(),
            selection = ?selection.selection,
            degraded = centrality.is_degraded(),
            "pipeline run complete"
        );

        PipelineRun {
            graph: pruned,
            initial_edge_count,
            centrality,
            selection,
            shared_pinv: shared.is_some(),
            prune: prune_run,
            report,
        }
    }

    /// Checked run: validates the config and rejects disconnected input.
    pub fn run_checked(&self, graph: &UndirectedGraph) -> Result<PipelineRun> {
        self.run_checked_at(graph, Local::now().naive_local())
    }

    pub fn run_checked_at(
        &self,
        graph: &UndirectedGraph,
        generated_at: NaiveDateTime,
    ) -> Result<PipelineRun> {
        self.config.validate()?;
        let components = component_count(graph);
        if components > 1 {
            return Err(Error::Disconnected { components });
        }
        Ok(self.run_at(graph, generated_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::is_connected;
    use crate::critical::Selection;
    use chrono::NaiveDate;

    fn fixed() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 2)
            .and_then(|d| d.and_hms_opt(3, 4, 5))
            .unwrap()
    }

    fn star(leaves: u64) -> UndirectedGraph {
        let edges: Vec<(u64, u64)> = (1..=leaves).map(|i| (0, i)).collect();
        UndirectedGraph::from_edges(&edges).unwrap()
    }

    #[test]
    fn star_hub_is_critical_and_tree_survives() {
        let g = star(8);
        let run = Pipeline::default().run_at(&g, fixed());
        assert_eq!(run.selection.selection, Selection::Threshold);
        assert_eq!(run.critical_labels(), vec![0]);
        assert_eq!(run.prune.total_removed, 0);
        assert_eq!(run.graph, g);
    }

    #[test]
    fn cycle_uses_uniform_branch() {
        let n = 12u64;
        let edges: Vec<(u64, u64)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
        let g = UndirectedGraph::from_edges(&edges).unwrap();
        let run = Pipeline::default().run_at(&g, fixed());
        assert_eq!(run.selection.selection, Selection::Uniform);
        assert_eq!(run.selection.nodes, (0..10).collect::<Vec<_>>());
        // a cycle can lose exactly one edge and stay connected
        assert_eq!(run.prune.total_removed, 1);
        assert!(is_connected(&run.graph));
    }

    #[test]
    fn identical_inputs_give_identical_reports() {
        let g = UndirectedGraph::from_edges(&[
            (0, 1),
            (0, 2),
            (0, 3),
            (1, 2),
            (2, 3),
            (3, 4),
            (4, 5),
            (5, 3),
            (2, 5),
        ])
        .unwrap();
        let a = Pipeline::default().run_at(&g, fixed());
        let b = Pipeline::default().run_at(&g, fixed());
        assert_eq!(a.report.to_text(), b.report.to_text());
        assert_eq!(a.report.edges_removed, a.prune.total_removed);
    }

    #[test]
    fn disconnected_input_degrades_unchecked_and_fails_checked() {
        let g = UndirectedGraph::from_edges(&[(0, 1), (1, 2), (3, 4)]).unwrap();
        let run = Pipeline::default().run_at(&g, fixed());
        assert!(run.centrality.is_degraded());
        assert!(!run.shared_pinv);
        assert_eq!(run.graph.edge_count(), 3);

        let err = Pipeline::default().run_checked_at(&g, fixed()).unwrap_err();
        assert_eq!(err, Error::Disconnected { components: 2 });
    }

    #[test]
    fn checked_run_rejects_bad_config() {
        let config = PipelineConfig {
            selector: SelectorConfig {
                std_epsilon: f64::NAN,
                ..SelectorConfig::default()
            },
            ..PipelineConfig::default()
        };
        let err = Pipeline::new(config).run_checked_at(&star(3), fixed()).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_loads_from_partial_json() {
        use crate::prune::PinvPolicy;
        let config = PipelineConfig {
            prune: PruneConfig {
                pinv_policy: PinvPolicy::RefreshPerNode,
            },
            ..PipelineConfig::default()
        };
        let partial: PipelineConfig =
            serde_json::from_str(r#"{"prune":{"pinv_policy":"RefreshPerNode"}}"#).unwrap();
        assert_eq!(partial, config);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<PipelineConfig>(&json).unwrap(), config);
    }

    #[test]
    fn empty_graph_is_a_noop() {
        let run = Pipeline::default().run_at(&UndirectedGraph::new(), fixed());
        assert_eq!(run.selection.selection, Selection::Empty);
        assert_eq!(run.prune, PruneRun::default());
        assert!(run.report.removals.is_empty());
    }
}
