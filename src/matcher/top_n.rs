use std::{cmp::{Ordering, Reverse}, collections::{BinaryHeap, HashMap}, ops::AddAssign};

use ahash::RandomState;
use num::Float;
use rayon::prelude::*;

use crate::{error::{FuzzRushError, Result}, utils::{sort::radix_sort_u32_soa, sparse::{CsrMatrix, SparseRow}}};

/// One top-n candidate.
/// Ordered by score, and for equal scores the lower column ranks higher.
#[derive(Debug, Clone, Copy)]
struct Candidate<N> {
    score: N,
    col: u32,
}

impl<N: Float> PartialEq for Candidate<N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N: Float> Eq for Candidate<N> {}

impl<N: Float> PartialOrd for Candidate<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N: Float> Ord for Candidate<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        // scores are finite sums of non-negative products
        self.score
            .partial_cmp(&other.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.col.cmp(&self.col))
    }
}

/// Row-scoped sparse accumulator plus a bounded min-heap.
///
/// The map holds one entry per target reachable from the current row,
/// the heap never grows beyond `ntop`. Both are cleared, not freed,
/// between rows so their allocations are reused.
#[derive(Debug)]
pub struct TopNAccumulator<N> {
    scores: HashMap<u32, N, RandomState>,
    heap: BinaryHeap<Reverse<Candidate<N>>>,
    ntop: usize,
    lower_bound: N,
}

impl<N> TopNAccumulator<N>
where
    N: Float + AddAssign,
{
    pub fn new(ntop: usize, lower_bound: N) -> Self {
        Self {
            scores: HashMap::with_hasher(RandomState::new()),
            heap: BinaryHeap::with_capacity(ntop.min(1024) + 1),
            ntop,
            lower_bound,
        }
    }

    /// Score one source row against every target of `b_t`
    ///
    /// # Arguments
    /// * `row` - source row (terms of one source string)
    /// * `b_t` - transposed target matrix, row `k` lists the targets holding term `k`
    ///
    /// # Returns
    /// * `(Vec<u32>, Vec<N>)` - at most `ntop` (target column, score) pairs sorted by column
    pub fn process_row(&mut self, row: SparseRow<'_, N>, b_t: &CsrMatrix<N>) -> (Vec<u32>, Vec<N>) {
        self.scores.clear();
        self.heap.clear();

        for (term, a) in row.iter() {
            for (col, b) in b_t.row(term as usize).iter() {
                *self.scores.entry(col).or_insert_with(N::zero) += a * b;
            }
        }
        let reachable = self.scores.len();

        for (&col, &score) in self.scores.iter() {
            if score < self.lower_bound {
                continue;
            }
            let candidate = Candidate { score: score.min(N::one()), col };
            if self.heap.len() < self.ntop {
                self.heap.push(Reverse(candidate));
            } else if let Some(mut worst) = self.heap.peek_mut() {
                if candidate > worst.0 {
                    worst.0 = candidate;
                }
            }
        }

        let mut inds = Vec::with_capacity(self.heap.len());
        let mut vals = Vec::with_capacity(self.heap.len());
        for Reverse(c) in self.heap.drain() {
            inds.push(c.col);
            vals.push(c.score);
        }
        radix_sort_u32_soa(&mut inds, &mut vals);
        tracing::trace!(reachable, kept = inds.len(), "scored row");
        (inds, vals)
    }

    /// entries currently held by the accumulator map
    #[inline]
    pub fn reachable(&self) -> usize {
        self.scores.len()
    }
}

fn check_args<N: Float>(a: &CsrMatrix<N>, b_t: &CsrMatrix<N>, ntop: usize, lower_bound: N) -> Result<()> {
    if ntop == 0 {
        return Err(FuzzRushError::invalid("ntop", "must be at least 1"));
    }
    if !(lower_bound >= N::zero() && lower_bound < N::one()) {
        return Err(FuzzRushError::invalid(
            "lower_bound",
            format!("{} is outside [0, 1)", lower_bound.to_f64().unwrap_or(f64::NAN)),
        ));
    }
    a.validate()?;
    b_t.validate()?;
    if a.n_cols() != b_t.n_rows() {
        return Err(FuzzRushError::DimensionMismatch {
            left: a.n_cols(),
            right: b_t.n_rows(),
        });
    }
    Ok(())
}

/// Sparse top-n product `A * B_T`
///
/// For each row of `a` keeps only the `ntop` highest dot products that are
/// `>= lower_bound`. Scores are accumulated sparsely per row, so the dense
/// `M x N` product is never built. Equal scores keep the lower target index.
///
/// # Arguments
/// * `a` - `M x K` source rows
/// * `b_t` - `K x N` transposed target rows
/// * `ntop` - max entries per result row, `>= 1`
/// * `lower_bound` - score threshold in `[0, 1)`
///
/// # Returns
/// * `CsrMatrix<N>` - `M x N`, rows sorted by column
pub fn sparse_dot_topn<N>(a: &CsrMatrix<N>, b_t: &CsrMatrix<N>, ntop: usize, lower_bound: N) -> Result<CsrMatrix<N>>
where
    N: Float + AddAssign,
{
    check_args(a, b_t, ntop, lower_bound)?;
    let (m, k) = a.shape();
    let n = b_t.n_cols();
    tracing::debug!(
        m,
        n,
        k,
        ntop,
        lower_bound = lower_bound.to_f64().unwrap_or(f64::NAN),
        "sparse top-n product"
    );

    let mut acc = TopNAccumulator::new(ntop, lower_bound);
    let mut result = CsrMatrix::with_capacity(n, m, m.saturating_mul(ntop.min(n)));
    for row in a.rows() {
        let (inds, vals) = acc.process_row(row, b_t);
        result.push_row(&inds, &vals);
    }
    tracing::debug!(nnz = result.nnz(), "top-n product done");
    Ok(result)
}

/// Same as [`sparse_dot_topn`] with rows spread over the rayon pool.
/// Each worker owns its accumulator; rows are reassembled in order,
/// so the output is identical to the sequential version.
pub fn par_sparse_dot_topn<N>(a: &CsrMatrix<N>, b_t: &CsrMatrix<N>, ntop: usize, lower_bound: N) -> Result<CsrMatrix<N>>
where
    N: Float + AddAssign + Send + Sync,
{
    check_args(a, b_t, ntop, lower_bound)?;
    let (m, k) = a.shape();
    let n = b_t.n_cols();
    tracing::debug!(
        m,
        n,
        k,
        ntop,
        lower_bound = lower_bound.to_f64().unwrap_or(f64::NAN),
        threads = rayon::current_num_threads(),
        "parallel sparse top-n product"
    );

    let rows: Vec<(Vec<u32>, Vec<N>)> = (0..m)
        .into_par_iter()
        .map_init(
            || TopNAccumulator::new(ntop, lower_bound),
            |acc, i| acc.process_row(a.row(i), b_t),
        )
        .collect();

    let nnz = rows.iter().map(|(inds, _)| inds.len()).sum();
    let mut result = CsrMatrix::with_capacity(n, m, nnz);
    for (inds, vals) in &rows {
        result.push_row(inds, vals);
    }
    tracing::debug!(nnz = result.nnz(), "top-n product done");
    Ok(result)
}
