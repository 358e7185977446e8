//! Information centrality.
//!
//! For node \(i\) on a graph with \(n\) nodes,
//! \[
//!   C(i) = \frac{1}{n L^+_{ii} - \sum_j L^+_{ij}}
//! \]
//! Nodes with small \(L^+_{ii}\) sit on many low-resistance paths and score high.

use tracing::warn;

use crate::graph::GraphRef;
use crate::laplacian::{laplacian_pinv, LaplacianPinv};
use crate::outcome::Outcome;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CentralityConfig {
    /// Denominators with magnitude below this are replaced by it.
    pub denominator_epsilon: f64,
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self {
            denominator_epsilon: 1e-10,
        }
    }
}

impl CentralityConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.denominator_epsilon.is_finite() || self.denominator_epsilon <= 0.0 {
            return Err(Error::InvalidParameter(
                "denominator_epsilon must be finite and > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Information centrality of every node, indexed by dense node index.
///
/// Never fails: if the pseudo-inverse cannot be computed or a score comes out non-finite,
/// every node is mapped to `1.0` and the result is `Outcome::Degraded`.
pub fn information_centrality<G: GraphRef>(
    graph: &G,
    config: &CentralityConfig,
) -> Outcome<Vec<f64>> {
    let scores = laplacian_pinv(graph).and_then(|pinv| scores_from_pinv(graph, &pinv, config));
    degrade_to_uniform(graph.node_count(), scores)
}

/// Same as [`information_centrality`], reusing an already computed pseudo-inverse.
pub fn information_centrality_with_pinv<G: GraphRef>(
    graph: &G,
    pinv: &LaplacianPinv,
    config: &CentralityConfig,
) -> Outcome<Vec<f64>> {
    degrade_to_uniform(graph.node_count(), scores_from_pinv(graph, pinv, config))
}

/// Checked information centrality: validates `config` and reports failures as errors.
pub fn information_centrality_checked<G: GraphRef>(
    graph: &G,
    config: &CentralityConfig,
) -> Result<Vec<f64>> {
    config.validate()?;
    let pinv = laplacian_pinv(graph)?;
    scores_from_pinv(graph, &pinv, config)
}

fn degrade_to_uniform(n: usize, scores: Result<Vec<f64>>) -> Outcome<Vec<f64>> {
    let out = Outcome::from_result(scores, || vec![1.0; n]);
    if let Some(cause) = out.cause() {
        warn!(n, %cause, "information centrality degraded to uniform scores");
    }
    out
}

fn scores_from_pinv<G: GraphRef>(
    graph: &G,
    pinv: &LaplacianPinv,
    config: &CentralityConfig,
) -> Result<Vec<f64>> {
    let n = graph.node_count();
    if pinv.dim() != n {
        return Err(Error::DimensionMismatch {
            expected: n,
            actual: pinv.dim(),
        });
    }
    let eps = config.denominator_epsilon;
    let n_f64 = n as f64;

    let mut scores = Vec::with_capacity(n);
    for i in 0..n {
        let row = pinv.row(i).ok_or(Error::IndexOutOfBounds(i))?;
        let mut denom = n_f64 * row[i] - row.iter().sum::<f64>();
        if denom.abs() < eps {
            denom = eps;
        }
        let c = 1.0 / denom;
        if !c.is_finite() {
            return Err(Error::NonFinite(format!("centrality of node {i} = {c}")));
        }
        scores.push(c);
    }
    Ok(scores)
}
