//! Effective resistance between node pairs.

use tracing::debug;

use crate::graph::GraphRef;
use crate::laplacian::{laplacian_pinv, LaplacianPinv};
use crate::outcome::Outcome;
use crate::{Error, Result};

/// Effective resistance between `u` and `v` (dense indices).
///
/// Uses `pinv` when supplied; otherwise computes \(L^+\) from `graph` on the spot, which
/// costs a full dense inversion per call. Any failure (out-of-range index, a `pinv` sized for
/// a different graph, a failed inversion, a non-finite result) yields
/// `Outcome::Degraded` with value `0.0`. Treat that zero as "no preference", not as a
/// measured resistance.
pub fn effective_resistance<G: GraphRef>(
    graph: &G,
    u: usize,
    v: usize,
    pinv: Option<&LaplacianPinv>,
) -> Outcome<f64> {
    match effective_resistance_checked(graph, u, v, pinv) {
        Ok(r) => Outcome::Computed(r),
        Err(cause) => {
            debug!(u, v, %cause, "effective resistance degraded to 0");
            Outcome::degraded(0.0, cause)
        }
    }
}

/// Checked effective resistance: the same computation, with failures as errors.
pub fn effective_resistance_checked<G: GraphRef>(
    graph: &G,
    u: usize,
    v: usize,
    pinv: Option<&LaplacianPinv>,
) -> Result<f64> {
    let n = graph.node_count();
    for idx in [u, v] {
        if idx >= n {
            return Err(Error::IndexOutOfBounds(idx));
        }
    }

    let owned;
    let pinv = match pinv {
        Some(p) => p,
        None => {
            debug!(n, "no pseudo-inverse supplied; computing from graph");
            owned = laplacian_pinv(graph)?;
            &owned
        }
    };
    if pinv.dim() != n {
        return Err(Error::DimensionMismatch {
            expected: n,
            actual: pinv.dim(),
        });
    }

    let r = pinv.resistance(u, v).ok_or(Error::IndexOutOfBounds(u.max(v)))?;
    if !r.is_finite() {
        return Err(Error::NonFinite(format!("resistance({u}, {v}) = {r}")));
    }
    Ok(r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::UndirectedGraph;

    fn cycle(n: u64) -> UndirectedGraph {
        let edges: Vec<(u64, u64)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
        UndirectedGraph::from_edges(&edges).unwrap()
    }

    #[test]
    fn cycle_edge_resistance_matches_parallel_paths() {
        // Adjacent nodes on C_n: 1 ohm in parallel with (n-1) ohms.
        let g = cycle(6);
        let pinv = laplacian_pinv(&g).unwrap();
        let r = effective_resistance(&g, 0, 1, Some(&pinv));
        assert!(!r.is_degraded());
        assert!((r.value() - 5.0 / 6.0).abs() < 1e-9, "r={}", r.value());
    }

    #[test]
    fn repeated_calls_agree() {
        let g = cycle(7);
        let pinv = laplacian_pinv(&g).unwrap();
        let a = effective_resistance(&g, 2, 5, Some(&pinv));
        let b = effective_resistance(&g, 2, 5, Some(&pinv));
        assert_eq!(a, b);
    }

    #[test]
    fn missing_pinv_falls_back_to_fresh_computation() {
        let g = cycle(5);
        let pinv = laplacian_pinv(&g).unwrap();
        let with = effective_resistance(&g, 0, 2, Some(&pinv));
        let without = effective_resistance(&g, 0, 2, None);
        assert!(!without.is_degraded());
        assert!((with.value() - without.value()).abs() < 1e-12);
    }

    #[test]
    fn failures_degrade_to_zero() {
        let g = cycle(4);
        let pinv = laplacian_pinv(&g).unwrap();

        let oob = effective_resistance(&g, 0, 9, Some(&pinv));
        assert_eq!(*oob.value(), 0.0);
        assert_eq!(oob.cause(), Some(&Error::IndexOutOfBounds(9)));

        let stale = laplacian_pinv(&cycle(5)).unwrap();
        let mismatch = effective_resistance(&g, 0, 1, Some(&stale));
        assert!(matches!(
            mismatch.cause(),
            Some(Error::DimensionMismatch {
                expected: 4,
                actual: 5
            })
        ));

        let split = UndirectedGraph::from_edges(&[(0, 1), (2, 3)]).unwrap();
        let singular = effective_resistance(&split, 0, 1, None);
        assert!(singular.is_degraded());
        assert_eq!(*singular.value(), 0.0);
    }
}
