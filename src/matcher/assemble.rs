use std::fmt::{self, Debug};

use indexmap::IndexMap;
use num::Num;
use serde::{Deserialize, Serialize};

use crate::{
    config::OutputFormat,
    error::{FuzzRushError, Result},
    utils::sparse::CsrMatrix,
};

/// Names must line up with the result shape and the result must be well formed
fn check_shape<N: Num + Copy>(result: &CsrMatrix<N>, sources: usize, targets: usize) -> Result<()> {
    result.validate()?;
    let (rows, cols) = result.shape();
    if (rows, cols) != (sources, targets) {
        return Err(FuzzRushError::ShapeMismatch {
            rows,
            cols,
            sources,
            targets,
        });
    }
    Ok(())
}

/// One match between a source string and a target string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub source_index: usize,
    pub source_name: String,
    pub target_index: usize,
    pub target_name: String,
    pub score: f64,
}

/// Flat list of matches, row-major over the result matrix
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatMatches {
    pub list: Vec<MatchRecord>,
}

impl FlatMatches {
    /// Build one record per stored entry of `result`
    ///
    /// # Arguments
    /// * `result` - `M x N` result matrix
    /// * `source_names` - `M` source strings
    /// * `target_names` - `N` target strings
    ///
    /// # Errors
    /// * `ShapeMismatch` - name counts differ from the matrix shape
    /// * `MalformedMatrix` - `result` breaks the CSR invariants
    pub fn from_matrix<N, S, T>(result: &CsrMatrix<N>, source_names: &[S], target_names: &[T]) -> Result<Self>
    where
        N: Num + Copy + Into<f64>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        check_shape(result, source_names.len(), target_names.len())?;
        let list = result
            .triplets()
            .map(|(row, col, score)| MatchRecord {
                source_index: row,
                source_name: source_names[row].as_ref().to_string(),
                target_index: col as usize,
                target_name: target_names[col as usize].as_ref().to_string(),
                score: score.into(),
            })
            .collect();
        Ok(Self { list })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchRecord> {
        self.list.iter()
    }
}

impl Debug for FlatMatches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // one record per line
            writeln!(f, "FlatMatches [")?;
            for r in &self.list {
                writeln!(
                    f,
                    "    {} {:?} -> {} {:?}: {:.6}",
                    r.source_index, r.source_name, r.target_index, r.target_name, r.score
                )?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

/// Matches grouped by source index
/// Only rows holding at least one match appear, in row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupedMatches {
    pub groups: IndexMap<usize, Vec<(usize, f64)>>,
}

impl GroupedMatches {
    pub fn from_matrix<N>(result: &CsrMatrix<N>) -> Self
    where
        N: Num + Copy + Into<f64>,
    {
        let mut groups: IndexMap<usize, Vec<(usize, f64)>> = IndexMap::new();
        for (row, col, score) in result.triplets() {
            groups.entry(row).or_default().push((col as usize, score.into()));
        }
        Self { groups }
    }

    /// matches of source row `source_index`
    pub fn get(&self, source_index: usize) -> Option<&[(usize, f64)]> {
        self.groups.get(&source_index).map(|v| v.as_slice())
    }

    /// number of source rows with at least one match
    #[inline]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Result of a match call in the requested `OutputFormat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MatchOutput {
    Flat(FlatMatches),
    Grouped(GroupedMatches),
}

impl MatchOutput {
    /// Convert a result matrix into the requested shape.
    /// Pure transformation, `result` is left untouched.
    /// Fails with `ShapeMismatch` when the names do not match `result`'s shape.
    pub fn assemble<N, S, T>(
        result: &CsrMatrix<N>,
        source_names: &[S],
        target_names: &[T],
        format: OutputFormat,
    ) -> Result<Self>
    where
        N: Num + Copy + Into<f64>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        match format {
            OutputFormat::Flat => FlatMatches::from_matrix(result, source_names, target_names).map(MatchOutput::Flat),
            OutputFormat::Grouped => {
                check_shape(result, source_names.len(), target_names.len())?;
                Ok(MatchOutput::Grouped(GroupedMatches::from_matrix(result)))
            }
        }
    }

    /// total number of matches
    pub fn match_count(&self) -> usize {
        match self {
            MatchOutput::Flat(flat) => flat.len(),
            MatchOutput::Grouped(grouped) => grouped.groups.values().map(Vec::len).sum(),
        }
    }

    pub fn as_flat(&self) -> Option<&FlatMatches> {
        match self {
            MatchOutput::Flat(flat) => Some(flat),
            MatchOutput::Grouped(_) => None,
        }
    }

    pub fn as_grouped(&self) -> Option<&GroupedMatches> {
        match self {
            MatchOutput::Grouped(grouped) => Some(grouped),
            MatchOutput::Flat(_) => None,
        }
    }

    pub fn into_flat(self) -> Option<FlatMatches> {
        match self {
            MatchOutput::Flat(flat) => Some(flat),
            MatchOutput::Grouped(_) => None,
        }
    }

    pub fn into_grouped(self) -> Option<GroupedMatches> {
        match self {
            MatchOutput::Grouped(grouped) => Some(grouped),
            MatchOutput::Flat(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> CsrMatrix<f64> {
        CsrMatrix::from_rows(3, vec![
            vec![(0, 0.9), (2, 0.4)],
            vec![],
            vec![(1, 0.7)],
        ])
    }

    #[test]
    fn flat_is_row_major() {
        let src = ["a", "b", "c"];
        let tgt = vec!["x".to_string(), "y".to_string(), "z".to_string()];
        let flat = FlatMatches::from_matrix(&result(), &src, &tgt).unwrap();
        let keys: Vec<(usize, usize)> = flat.iter().map(|r| (r.source_index, r.target_index)).collect();
        assert_eq!(keys, vec![(0, 0), (0, 2), (2, 1)]);
        assert_eq!(flat.list[2].source_name, "c");
        assert_eq!(flat.list[2].target_name, "y");
        assert_eq!(flat.list[1].score, 0.4);

        let pretty = format!("{:#?}", flat);
        assert!(pretty.contains("2 \"c\" -> 1 \"y\": 0.700000"));
    }

    #[test]
    fn grouped_skips_empty_rows() {
        let grouped = GroupedMatches::from_matrix(&result());
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped.get(0), Some(&[(0, 0.9), (2, 0.4)][..]));
        assert!(grouped.get(1).is_none());
        assert_eq!(grouped.groups.keys().copied().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn assemble_dispatches_on_format() {
        let m = result();
        let src = ["a", "b", "c"];
        let tgt = ["x", "y", "z"];
        let flat = MatchOutput::assemble(&m, &src, &tgt, OutputFormat::Flat).unwrap();
        let grouped = MatchOutput::assemble(&m, &src, &tgt, OutputFormat::Grouped).unwrap();
        assert_eq!(flat.match_count(), 3);
        assert_eq!(grouped.match_count(), 3);
        assert!(flat.as_flat().is_some() && flat.as_grouped().is_none());
        assert!(grouped.into_grouped().is_some());
        // input matrix untouched
        assert_eq!(m, result());
    }

    #[test]
    fn names_must_match_shape() {
        let m = result();
        let expected = FuzzRushError::ShapeMismatch {
            rows: 3,
            cols: 3,
            sources: 0,
            targets: 3,
        };
        let empty: [&str; 0] = [];
        let tgt = ["x", "y", "z"];
        assert_eq!(FlatMatches::from_matrix(&m, &empty, &tgt).unwrap_err(), expected);
        for format in [OutputFormat::Flat, OutputFormat::Grouped] {
            assert_eq!(MatchOutput::assemble(&m, &empty, &tgt, format).unwrap_err(), expected);
        }
        // too few targets
        let err = MatchOutput::assemble(&m, &["a", "b", "c"], &["x"], OutputFormat::Flat).unwrap_err();
        assert!(matches!(err, FuzzRushError::ShapeMismatch { targets: 1, .. }));

        // 1 x 1 result with no source names
        let one = CsrMatrix::from_rows(1, vec![vec![(0, 1.0f64)]]);
        assert!(FlatMatches::from_matrix(&one, &empty, &["x"]).is_err());
    }

    #[test]
    fn malformed_result_is_rejected() {
        let bad = CsrMatrix::from_parts_unchecked(1, vec![0, 1], vec![4], vec![0.5f64]);
        let err = FlatMatches::from_matrix(&bad, &["a"], &["x"]).unwrap_err();
        assert!(matches!(err, FuzzRushError::MalformedMatrix { .. }));
    }
}
