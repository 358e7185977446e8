//! Critical node selection.
//!
//! A node is critical when its centrality lies more than `threshold_k` standard deviations
//! above the mean. Degenerate distributions fall back to a fixed-size prefix:
//!
//! 1. no scores: nothing is critical;
//! 2. `std < std_epsilon` (uniform scores): the first `fallback_count` nodes in native order;
//! 3. otherwise every node with `score > mean + threshold_k * std`, in native order;
//! 4. if that is empty: the `fallback_count` highest scores, ties in native order.
//!
//! The returned order is the order the pruner processes nodes in.

use crate::graph::GraphRef;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectorConfig {
    pub std_epsilon: f64,
    pub threshold_k: f64,
    pub fallback_count: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            std_epsilon: 1e-6,
            threshold_k: 0.5,
            fallback_count: 10,
        }
    }
}

impl SelectorConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.std_epsilon.is_finite() || self.std_epsilon < 0.0 {
            return Err(Error::InvalidParameter(
                "std_epsilon must be finite and >= 0".to_string(),
            ));
        }
        if !self.threshold_k.is_finite() {
            return Err(Error::InvalidParameter(
                "threshold_k must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Which rule produced the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    Empty,
    Uniform,
    Threshold,
    TopRanked,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CriticalSelection {
    /// Dense node indices, in pruning order.
    pub nodes: Vec<usize>,
    pub selection: Selection,
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    /// Set only when the statistical threshold was evaluated.
    pub threshold: Option<f64>,
}

pub fn select_critical<G: GraphRef>(
    graph: &G,
    centrality: &[f64],
    config: &SelectorConfig,
) -> Vec<usize> {
    select_critical_run(graph, centrality, config).nodes
}

/// Checked selection.
///
/// Rejects an invalid `config` and a centrality vector whose length is not the node count.
pub fn select_critical_checked<G: GraphRef>(
    graph: &G,
    centrality: &[f64],
    config: &SelectorConfig,
) -> Result<CriticalSelection> {
    config.validate()?;
    let n = graph.node_count();
    if centrality.len() != n {
        return Err(Error::DimensionMismatch {
            expected: n,
            actual: centrality.len(),
        });
    }
    Ok(select_critical_run(graph, centrality, config))
}

/// Selection with the branch taken and the distribution statistics.
///
/// Scores past `graph.node_count()` are ignored.
pub fn select_critical_run<G: GraphRef>(
    graph: &G,
    centrality: &[f64],
    config: &SelectorConfig,
) -> CriticalSelection {
    let n = graph.node_count();
    let scores = &centrality[..centrality.len().min(n)];
    if scores.is_empty() {
        return CriticalSelection {
            nodes: Vec::new(),
            selection: Selection::Empty,
            mean: 0.0,
            std: 0.0,
            threshold: None,
        };
    }

    let len = scores.len() as f64;
    let mean = scores.iter().sum::<f64>() / len;
    let var = scores.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / len;
    let std = var.sqrt();
    let k = config.fallback_count.min(n);

    if std < config.std_epsilon {
        return CriticalSelection {
            nodes: (0..k).collect(),
            selection: Selection::Uniform,
            mean,
            std,
            threshold: None,
        };
    }

    let threshold = mean + config.threshold_k * std;
    let above: Vec<usize> = scores
        .iter()
        .enumerate()
        .filter(|(_, &c)| c > threshold)
        .map(|(i, _)| i)
        .collect();
    if !above.is_empty() {
        return CriticalSelection {
            nodes: above,
            selection: Selection::Threshold,
            mean,
            std,
            threshold: Some(threshold),
        };
    }

    let mut ranked: Vec<usize> = (0..scores.len()).collect();
    // stable: equal scores keep native order
    ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    ranked.truncate(k);
    CriticalSelection {
        nodes: ranked,
        selection: Selection::TopRanked,
        mean,
        std,
        threshold: Some(threshold),
    }
}
