use std::ops::{AddAssign, Mul};

use num::Num;
use serde::Serialize;

use crate::error::{FuzzRushError, Result};

/// Borrowed view of one sparse row
/// `indices` are strictly increasing column indices, `values` the matching weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparseRow<'a, N> {
    pub indices: &'a [u32],
    pub values: &'a [N],
}

impl<'a, N> SparseRow<'a, N>
where
    N: Num + Copy,
{
    #[inline]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// (column, value) pairs in column order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (u32, N)> + 'a {
        let (indices, values) = (self.indices, self.values);
        indices.iter().copied().zip(values.iter().copied())
    }

    /// Value stored at column `col`, zero when absent
    pub fn get(&self, col: u32) -> N {
        match self.indices.binary_search(&col) {
            Ok(pos) => self.values[pos],
            Err(_) => N::zero(),
        }
    }

    /// Dot product by merging the two sorted index lists
    pub fn dot(&self, other: &SparseRow<'_, N>) -> N
    where
        N: AddAssign + Mul<Output = N>,
    {
        let mut i = 0;
        let mut j = 0;
        let mut sum = N::zero();
        while i < self.indices.len() && j < other.indices.len() {
            let a = self.indices[i];
            let b = other.indices[j];
            if a == b {
                sum += self.values[i] * other.values[j];
                i += 1;
                j += 1;
            } else if a < b {
                i += 1;
            } else {
                j += 1;
            }
        }
        sum
    }

    /// sum of squared values
    pub fn squared_norm(&self) -> N
    where
        N: AddAssign,
    {
        let mut sum = N::zero();
        for &v in self.values {
            sum += v * v;
        }
        sum
    }
}

/// Compressed sparse row matrix
///
/// Row `i` occupies `indices[indptr[i]..indptr[i + 1]]` / `data[..]`.
/// Within a row the column indices are strictly increasing; this is checked
/// on every `push_row` in debug builds. Matrices from raw parts go through
/// [`CsrMatrix::from_parts`], and the engine re-checks its inputs with
/// [`CsrMatrix::validate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsrMatrix<N> {
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<u32>,
    data: Vec<N>,
}

impl<N> CsrMatrix<N>
where
    N: Num + Copy,
{
    /// Empty matrix with zero rows and `n_cols` columns
    pub fn new(n_cols: usize) -> Self {
        Self {
            n_cols,
            indptr: vec![0],
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    pub fn with_capacity(n_cols: usize, rows: usize, nnz: usize) -> Self {
        let mut indptr = Vec::with_capacity(rows + 1);
        indptr.push(0);
        Self {
            n_cols,
            indptr,
            indices: Vec::with_capacity(nnz),
            data: Vec::with_capacity(nnz),
        }
    }

    /// Append a row
    ///
    /// # Arguments
    /// * `indices` - strictly increasing column indices, each `< n_cols`
    /// * `values` - weights, same length as `indices`
    pub fn push_row(&mut self, indices: &[u32], values: &[N]) {
        debug_assert_eq!(indices.len(), values.len(), "indices and values must have the same length");
        debug_assert!(
            indices.windows(2).all(|w| w[0] < w[1]),
            "row indices must be strictly increasing"
        );
        debug_assert!(
            indices.last().map_or(true, |&c| (c as usize) < self.n_cols),
            "column index out of range"
        );
        self.indices.extend_from_slice(indices);
        self.data.extend_from_slice(values);
        self.indptr.push(self.indices.len());
    }

    /// Build from rows given as (column, value) lists
    pub fn from_rows<R>(n_cols: usize, rows: R) -> Self
    where
        R: IntoIterator<Item = Vec<(u32, N)>>,
    {
        let mut m = Self::new(n_cols);
        for row in rows {
            let (inds, vals): (Vec<u32>, Vec<N>) = row.into_iter().unzip();
            m.push_row(&inds, &vals);
        }
        m
    }

    /// Checked constructor from raw CSR parts
    pub fn from_parts(n_cols: usize, indptr: Vec<usize>, indices: Vec<u32>, data: Vec<N>) -> Result<Self> {
        let m = Self {
            n_cols,
            indptr,
            indices,
            data,
        };
        m.validate()?;
        Ok(m)
    }

    #[cfg(test)]
    pub(crate) fn from_parts_unchecked(n_cols: usize, indptr: Vec<usize>, indices: Vec<u32>, data: Vec<N>) -> Self {
        Self {
            n_cols,
            indptr,
            indices,
            data,
        }
    }

    /// Check the CSR invariants
    ///
    /// `indptr` starts at 0, never decreases and ends at `nnz`;
    /// every row holds strictly increasing columns below `n_cols`.
    pub fn validate(&self) -> Result<()> {
        let nnz = self.indices.len();
        if self.data.len() != nnz {
            return Err(FuzzRushError::malformed(format!(
                "{} indices but {} values",
                nnz,
                self.data.len()
            )));
        }
        if self.indptr.first() != Some(&0) {
            return Err(FuzzRushError::malformed("indptr must start at 0"));
        }
        if self.indptr.last() != Some(&nnz) {
            return Err(FuzzRushError::malformed(format!("indptr must end at nnz {}", nnz)));
        }
        for (r, w) in self.indptr.windows(2).enumerate() {
            let (start, end) = (w[0], w[1]);
            if start > end || end > nnz {
                return Err(FuzzRushError::malformed(format!("indptr is not monotone at row {}", r)));
            }
            let cols = &self.indices[start..end];
            if !cols.windows(2).all(|p| p[0] < p[1]) {
                return Err(FuzzRushError::malformed(format!("row {} columns are not strictly increasing", r)));
            }
            if let Some(&c) = cols.last() {
                if c as usize >= self.n_cols {
                    return Err(FuzzRushError::malformed(format!(
                        "row {} has column {} but the matrix has {} columns",
                        r, c, self.n_cols
                    )));
                }
            }
        }
        Ok(())
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.indptr.len() - 1
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// (rows, cols)
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols)
    }

    #[inline]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Row `i`; panics when out of range like slice indexing
    #[inline]
    pub fn row(&self, i: usize) -> SparseRow<'_, N> {
        let (start, end) = (self.indptr[i], self.indptr[i + 1]);
        SparseRow {
            indices: &self.indices[start..end],
            values: &self.data[start..end],
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = SparseRow<'_, N>> + '_ {
        (0..self.n_rows()).map(move |i| self.row(i))
    }

    /// (row, column, value) triplets in row-major storage order
    pub fn triplets(&self) -> impl Iterator<Item = (usize, u32, N)> + '_ {
        self.rows()
            .enumerate()
            .flat_map(|(r, row)| row.iter().map(move |(c, v)| (r, c, v)))
    }

    /// Transposed copy (`n_cols x n_rows`)
    /// Counting pass over the columns, then a stable scatter,
    /// so rows of the result come out sorted by column as well.
    pub fn transpose(&self) -> Self {
        let n_rows = self.n_rows();
        let mut indptr = vec![0usize; self.n_cols + 1];
        for &c in &self.indices {
            indptr[c as usize + 1] += 1;
        }
        for k in 0..self.n_cols {
            indptr[k + 1] += indptr[k];
        }

        let mut next = indptr.clone();
        let mut indices = vec![0u32; self.nnz()];
        let mut data = vec![N::zero(); self.nnz()];
        for r in 0..n_rows {
            for (c, v) in self.row(r).iter() {
                let pos = next[c as usize];
                next[c as usize] = pos + 1;
                indices[pos] = r as u32;
                data[pos] = v;
            }
        }
        Self {
            n_cols: n_rows,
            indptr,
            indices,
            data,
        }
    }

    /// Dense copy, rows of `n_cols` values
    pub fn to_dense(&self) -> Vec<Vec<N>> {
        self.rows()
            .map(|row| {
                let mut dense = vec![N::zero(); self.n_cols];
                for (c, v) in row.iter() {
                    dense[c as usize] = v;
                }
                dense
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CsrMatrix<f64> {
        // [1 0 2]
        // [0 0 0]
        // [0 3 4]
        CsrMatrix::from_rows(3, vec![
            vec![(0, 1.0), (2, 2.0)],
            vec![],
            vec![(1, 3.0), (2, 4.0)],
        ])
    }

    #[test]
    fn shape_and_rows() {
        let m = sample();
        assert_eq!(m.shape(), (3, 3));
        assert_eq!(m.nnz(), 4);
        assert!(m.row(1).is_empty());
        assert_eq!(m.row(2).get(2), 4.0);
        assert_eq!(m.row(2).get(0), 0.0);
        assert_eq!(
            m.triplets().collect::<Vec<_>>(),
            vec![(0, 0, 1.0), (0, 2, 2.0), (2, 1, 3.0), (2, 2, 4.0)]
        );
    }

    #[test]
    fn transpose_matches_dense() {
        let m = sample();
        let t = m.transpose();
        assert_eq!(t.shape(), (3, 3));
        let d = m.to_dense();
        let td = t.to_dense();
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(d[i][j], td[j][i]);
            }
        }
        for row in t.rows() {
            assert!(row.indices.windows(2).all(|w| w[0] < w[1]));
        }
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn transpose_non_square_and_empty() {
        let m = CsrMatrix::from_rows(4, vec![vec![(3, 1.0f64)]]);
        let t = m.transpose();
        assert_eq!(t.shape(), (4, 1));
        assert_eq!(t.row(3).iter().collect::<Vec<_>>(), vec![(0, 1.0)]);

        let e: CsrMatrix<f64> = CsrMatrix::new(5);
        assert_eq!(e.transpose().shape(), (5, 0));
    }

    #[test]
    fn from_parts_checks_invariants() {
        let m = CsrMatrix::from_parts(3, vec![0, 2, 2, 4], vec![0, 2, 1, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(m, sample());
        assert!(sample().validate().is_ok());
        assert!(CsrMatrix::<f64>::new(0).validate().is_ok());

        let bad: [(usize, Vec<usize>, Vec<u32>, Vec<f64>); 7] = [
            // column past n_cols
            (2, vec![0, 1], vec![7], vec![1.0]),
            // empty indptr
            (2, vec![], vec![], vec![]),
            // indptr not starting at 0
            (2, vec![1, 1], vec![0], vec![1.0]),
            // indptr not ending at nnz
            (2, vec![0, 1], vec![0, 1], vec![1.0, 1.0]),
            // decreasing indptr, reaching past nnz first
            (2, vec![0, 5, 1], vec![0], vec![1.0]),
            // unsorted row
            (3, vec![0, 2], vec![2, 0], vec![1.0, 1.0]),
            // values missing
            (3, vec![0, 1], vec![0], vec![]),
        ];
        for (n_cols, indptr, indices, data) in bad {
            let err = CsrMatrix::from_parts(n_cols, indptr, indices, data).unwrap_err();
            assert!(matches!(err, FuzzRushError::MalformedMatrix { .. }), "{:?}", err);
        }
    }

    #[test]
    fn row_dot_and_norm() {
        let m = sample();
        assert_eq!(m.row(0).dot(&m.row(2)), 8.0);
        assert_eq!(m.row(0).dot(&m.row(1)), 0.0);
        assert_eq!(m.row(2).squared_norm(), 25.0);
    }
}
