//! Graph Laplacian and its Moore–Penrose pseudo-inverse.
//!
//! For a connected graph on \(n\) nodes the Laplacian \(L = D - A\) has a one-dimensional
//! null space spanned by the constant vector, so
//! \[
//!   L^+ = \left(L + \tfrac{1}{n} J\right)^{-1} - \tfrac{1}{n} J
//! \]
//! where \(J\) is the all-ones matrix. The shifted matrix is inverted with Gauss–Jordan
//! elimination and partial pivoting. On a disconnected graph the shifted matrix is itself
//! singular, which surfaces as [`Error::SingularMatrix`].

use crate::graph::GraphRef;
use crate::{Error, Result};

/// Pivots smaller than this (relative to the largest entry) count as zero.
const PIVOT_TOLERANCE: f64 = 1e-12;

/// Dense `L⁺`, row-major, indexed by the dense node order it was computed from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawPinv"))]
pub struct LaplacianPinv {
    dim: usize,
    data: Vec<f64>,
}

/// Wire shape of [`LaplacianPinv`]; checked by `from_row_major` on the way in.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawPinv {
    dim: usize,
    data: Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawPinv> for LaplacianPinv {
    type Error = Error;

    fn try_from(raw: RawPinv) -> Result<Self> {
        Self::from_row_major(raw.dim, raw.data)
    }
}

impl LaplacianPinv {
    /// Wrap an externally computed `dim×dim` row-major matrix.
    pub fn from_row_major(dim: usize, data: Vec<f64>) -> Result<Self> {
        let expected = dim
            .checked_mul(dim)
            .ok_or_else(|| Error::InvalidParameter(format!("dimension {dim} overflows")))?;
        if data.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { dim, data })
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.dim && j < self.dim {
            self.data.get(i * self.dim + j).copied()
        } else {
            None
        }
    }

    pub fn row(&self, i: usize) -> Option<&[f64]> {
        if i < self.dim {
            self.data.get(i * self.dim..(i + 1) * self.dim)
        } else {
            None
        }
    }

    /// Diagonal entries; stops early if the buffer is shorter than `dim×dim`.
    pub fn diagonal(&self) -> Vec<f64> {
        (0..self.dim).map_while(|i| self.get(i, i)).collect()
    }

    /// \(L^+_{uu} + L^+_{vv} - 2 L^+_{uv}\), or `None` if an index is out of range.
    pub fn resistance(&self, u: usize, v: usize) -> Option<f64> {
        Some(self.get(u, u)? + self.get(v, v)? - 2.0 * self.get(u, v)?)
    }
}

/// Dense Laplacian \(D - A\) of an unweighted undirected graph.
pub fn laplacian_matrix<G: GraphRef>(graph: &G) -> Vec<Vec<f64>> {
    let n = graph.node_count();
    let mut lap = vec![vec![0.0_f64; n]; n];
    for (u, row) in lap.iter_mut().enumerate() {
        for &v in graph.neighbors_ref(u) {
            if v >= n || v == u {
                continue;
            }
            row[v] -= 1.0;
            row[u] += 1.0;
        }
    }
    lap
}

/// Pseudo-inverse of the graph Laplacian.
///
/// Fails with [`Error::SingularMatrix`] when the graph is disconnected or the elimination
/// hits a numerically zero pivot, and [`Error::NonFinite`] if the result overflowed.
pub fn laplacian_pinv<G: GraphRef>(graph: &G) -> Result<LaplacianPinv> {
    let n = graph.node_count();
    if n == 0 {
        return Ok(LaplacianPinv {
            dim: 0,
            data: Vec::new(),
        });
    }
    let shift = 1.0 / n as f64;
    let mut shifted: Vec<f64> = laplacian_matrix(graph)
        .into_iter()
        .flatten()
        .map(|x| x + shift)
        .collect();

    let mut inv = invert(&mut shifted, n)?;
    for x in inv.iter_mut() {
        *x -= shift;
    }
    if inv.iter().any(|x| !x.is_finite()) {
        return Err(Error::NonFinite(
            "laplacian pseudo-inverse has non-finite entries".to_string(),
        ));
    }
    Ok(LaplacianPinv { dim: n, data: inv })
}

/// Gauss–Jordan inverse of the row-major `n×n` matrix `a` (consumed as scratch space).
fn invert(a: &mut [f64], n: usize) -> Result<Vec<f64>> {
    let scale = a.iter().fold(0.0_f64, |m, x| m.max(x.abs())).max(1.0);
    let tol = PIVOT_TOLERANCE * scale;

    let mut inv = vec![0.0_f64; n * n];
    for i in 0..n {
        inv[i * n + i] = 1.0;
    }

    for col in 0..n {
        let mut pivot_row = col;
        let mut pivot_abs = a[col * n + col].abs();
        for r in (col + 1)..n {
            let x = a[r * n + col].abs();
            if x > pivot_abs {
                pivot_abs = x;
                pivot_row = r;
            }
        }
        if pivot_abs.is_nan() || pivot_abs <= tol {
            return Err(Error::SingularMatrix {
                column: col,
                pivot: pivot_abs,
            });
        }
        if pivot_row != col {
            swap_rows(a, n, col, pivot_row);
            swap_rows(&mut inv, n, col, pivot_row);
        }

        let p = a[col * n + col];
        for j in 0..n {
            a[col * n + j] /= p;
            inv[col * n + j] /= p;
        }

        for r in 0..n {
            if r == col {
                continue;
            }
            let factor = a[r * n + col];
            if factor == 0.0 {
                continue;
            }
            for j in 0..n {
                a[r * n + j] -= factor * a[col * n + j];
                inv[r * n + j] -= factor * inv[col * n + j];
            }
        }
    }
    Ok(inv)
}

fn swap_rows(m: &mut [f64], n: usize, a: usize, b: usize) {
    for j in 0..n {
        m.swap(a * n + j, b * n + j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::UndirectedGraph;

    fn path(n: u64) -> UndirectedGraph {
        let edges: Vec<(u64, u64)> = (0..n - 1).map(|i| (i, i + 1)).collect();
        UndirectedGraph::from_edges(&edges).unwrap()
    }

    #[test]
    fn laplacian_rows_sum_to_zero() {
        let g = UndirectedGraph::from_edges(&[(0, 1), (1, 2), (2, 0), (2, 3)]).unwrap();
        let lap = laplacian_matrix(&g);
        assert_eq!(lap[2][2], 3.0);
        assert_eq!(lap[2][3], -1.0);
        for row in &lap {
            assert_eq!(row.iter().sum::<f64>(), 0.0);
        }
    }

    #[test]
    fn pinv_satisfies_penrose_identity() {
        // L L⁺ L = L
        let g = UndirectedGraph::from_edges(&[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]).unwrap();
        let n = g.node_count();
        let lap = laplacian_matrix(&g);
        let pinv = laplacian_pinv(&g).unwrap();
        for i in 0..n {
            for j in 0..n {
                let mut acc = 0.0;
                for k in 0..n {
                    for m in 0..n {
                        acc += lap[i][k] * pinv.get(k, m).unwrap() * lap[m][j];
                    }
                }
                assert!((acc - lap[i][j]).abs() < 1e-9, "({i},{j}) {acc} vs {}", lap[i][j]);
            }
        }
    }

    #[test]
    fn path_resistance_is_path_length() {
        // Series resistors: R(0, k) = k on a path.
        let g = path(5);
        let pinv = laplacian_pinv(&g).unwrap();
        for k in 1..5 {
            let r = pinv.resistance(0, k).unwrap();
            assert!((r - k as f64).abs() < 1e-9, "k={k} r={r}");
        }
        assert_eq!(pinv.resistance(0, 5), None);
    }

    #[test]
    fn disconnected_graph_is_singular() {
        let g = UndirectedGraph::from_edges(&[(0, 1), (2, 3)]).unwrap();
        let err = laplacian_pinv(&g).unwrap_err();
        assert!(matches!(err, Error::SingularMatrix { .. }), "{err}");
    }

    #[test]
    fn short_buffer_reads_as_missing() {
        let pinv = LaplacianPinv {
            dim: 3,
            data: vec![0.5, -0.25],
        };
        assert_eq!(pinv.get(0, 1), Some(-0.25));
        assert_eq!(pinv.get(1, 1), None);
        assert_eq!(pinv.row(0), None);
        assert_eq!(pinv.diagonal(), vec![0.5]);
        assert_eq!(pinv.resistance(0, 1), None);

        assert!(matches!(
            LaplacianPinv::from_row_major(3, vec![0.0; 4]),
            Err(Error::DimensionMismatch {
                expected: 9,
                actual: 4
            })
        ));
    }

    #[test]
    fn nan_pivot_is_singular() {
        let mut a = vec![f64::NAN, 0.0, 0.0, 1.0];
        assert!(matches!(
            invert(&mut a, 2),
            Err(Error::SingularMatrix { column: 0, .. })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialize_rejects_wrong_buffer_length() {
        let err = serde_json::from_str::<LaplacianPinv>(r#"{"dim":3,"data":[]}"#);
        assert!(err.is_err());

        let pinv = laplacian_pinv(&path(3)).unwrap();
        let json = serde_json::to_string(&pinv).unwrap();
        let back: LaplacianPinv = serde_json::from_str(&json).unwrap();
        assert_eq!(back.dim(), 3);
        let r = back.resistance(0, 2).unwrap();
        assert!((r - 2.0).abs() < 1e-9, "r={r}");
    }

    #[test]
    fn empty_graph_has_empty_pinv() {
        let pinv = laplacian_pinv(&UndirectedGraph::new()).unwrap();
        assert_eq!(pinv.dim(), 0);
        assert!(pinv.diagonal().is_empty());
    }
}
