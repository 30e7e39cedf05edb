//! Term frequencies, document frequencies and information content of the columns of a
//! document-term (or group-term) matrix.
//!
//! The public functions mirror each other: the absolute variants count, the relative ones divide by
//! the relevant total. All of them fail with [`VectorizerError::EmptyMatrix`] on a matrix without
//! stored entries. Matrices in CSC storage are converted to CSR first.
use std::borrow::Cow;

use ndarray::Array1;
use num_traits::AsPrimitive;
use sprs::CsMat;

use crate::error::{Result, VectorizerError};

/// Number of rows with a stored entry in each column.
///
/// The weighting of the matrix doesn't matter, only its sparsity pattern.
pub fn doc_freqs<N: Clone + Default>(mat: &CsMat<N>) -> Result<Array1<usize>> {
    ensure_entries(mat)?;
    Ok(document_counts(&*row_major(mat)))
}

/// Fraction of rows with a stored entry in each column
pub fn relative_doc_freqs<N: Clone + Default>(mat: &CsMat<N>) -> Result<Array1<f64>> {
    let n_rows = mat.rows() as f64;
    Ok(doc_freqs(mat)?.mapv(|df| df as f64 / n_rows))
}

/// Sum of the values in each column.
///
/// Only meaningful on raw counts: weighted values produce weighted sums.
pub fn term_freqs<N: AsPrimitive<f64> + Default>(mat: &CsMat<N>) -> Result<Array1<f64>> {
    ensure_entries(mat)?;
    Ok(column_sums(&*row_major(mat)))
}

/// Sum of the values in each column divided by the sum of all values, so that the result sums to
/// one.
///
/// This is not the per-column normalization `term_freqs / n_columns`: each frequency is relative
/// to the total count of the matrix.
pub fn relative_term_freqs<N: AsPrimitive<f64> + Default>(mat: &CsMat<N>) -> Result<Array1<f64>> {
    let tfs = term_freqs(mat)?;
    let total = tfs.sum();
    Ok(tfs / total)
}

/// Information content of each column, a value in `[0, 1]` defined as
/// `-p * log2(p) - (1 - p) * log2(1 - p)` where `p` is the relative document frequency.
///
/// Columns present in no row or in every row carry no information and get zero.
pub fn information_content<N: Clone + Default>(mat: &CsMat<N>) -> Result<Array1<f64>> {
    ensure_entries(mat)?;
    Ok(column_information(&*row_major(mat)))
}

/// Borrows `mat` if it is stored by rows, otherwise converts it
pub(crate) fn row_major<N: Clone + Default>(mat: &CsMat<N>) -> Cow<'_, CsMat<N>> {
    if mat.is_csr() {
        Cow::Borrowed(mat)
    } else {
        Cow::Owned(mat.to_csr())
    }
}

fn ensure_entries<N>(mat: &CsMat<N>) -> Result<()> {
    if mat.nnz() == 0 {
        Err(VectorizerError::EmptyMatrix)
    } else {
        Ok(())
    }
}

/// Expects CSR storage
pub(crate) fn document_counts<N>(mat: &CsMat<N>) -> Array1<usize> {
    let mut dfs = Array1::zeros(mat.cols());
    for row in mat.outer_iterator() {
        for (col, _) in row.iter() {
            dfs[col] += 1;
        }
    }
    dfs
}

pub(crate) fn column_sums<N: AsPrimitive<f64>>(mat: &CsMat<N>) -> Array1<f64> {
    let mut tfs = Array1::zeros(mat.cols());
    for row in mat.outer_iterator() {
        for (col, value) in row.iter() {
            tfs[col] += (*value).as_();
        }
    }
    tfs
}

pub(crate) fn column_information<N>(mat: &CsMat<N>) -> Array1<f64> {
    let n_rows = mat.rows();
    document_counts(mat).mapv(|df| {
        if n_rows == 0 {
            return 0.;
        }
        let p = df as f64 / n_rows as f64;
        if p <= 0. || p >= 1. {
            0.
        } else {
            -p * p.log2() - (1. - p) * (1. - p).log2()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn counts() -> CsMat<usize> {
        // [[2, 1, 0, 0],
        //  [0, 1, 1, 0],
        //  [0, 3, 0, 0],
        //  [1, 1, 0, 0]]
        CsMat::new(
            (4, 4),
            vec![0, 2, 4, 5, 7],
            vec![0, 1, 1, 2, 1, 0, 1],
            vec![2, 1, 1, 1, 3, 1, 1],
        )
    }

    #[test]
    fn document_and_term_frequencies() {
        let mat = counts();
        assert_eq!(doc_freqs(&mat).unwrap(), array![2, 4, 1, 0]);
        assert_abs_diff_eq!(
            relative_doc_freqs(&mat).unwrap(),
            array![0.5, 1.0, 0.25, 0.0]
        );
        assert_abs_diff_eq!(term_freqs(&mat).unwrap(), array![3., 6., 1., 0.]);
        assert_abs_diff_eq!(
            relative_term_freqs(&mat).unwrap(),
            array![0.3, 0.6, 0.1, 0.0],
            epsilon = 1e-12
        );
    }

    #[test]
    fn information_content_is_zero_for_absent_and_universal_terms() {
        let ics = information_content(&counts()).unwrap();
        assert_abs_diff_eq!(ics[0], 1.0);
        assert_abs_diff_eq!(ics[1], 0.0);
        assert_abs_diff_eq!(ics[2], 0.811278, epsilon = 1e-6);
        assert_abs_diff_eq!(ics[3], 0.0);
        assert!(ics.iter().all(|ic| ic.is_finite()));
    }

    #[test]
    fn empty_matrix_is_an_error() {
        let mat: CsMat<usize> = CsMat::new((3, 2), vec![0, 0, 0, 0], Vec::new(), Vec::new());
        assert_eq!(doc_freqs(&mat).unwrap_err(), VectorizerError::EmptyMatrix);
        assert_eq!(term_freqs(&mat).unwrap_err(), VectorizerError::EmptyMatrix);
        assert_eq!(
            information_content(&mat).unwrap_err(),
            VectorizerError::EmptyMatrix
        );
    }

    #[test]
    fn column_major_input() {
        let csc = counts().to_csc();
        assert!(csc.is_csc());
        assert_eq!(doc_freqs(&csc).unwrap(), array![2, 4, 1, 0]);
        assert_abs_diff_eq!(term_freqs(&csc).unwrap(), array![3., 6., 1., 0.]);
        assert_abs_diff_eq!(
            information_content(&csc).unwrap(),
            information_content(&counts()).unwrap()
        );

        // more rows than columns
        let tall = CsMat::new((3, 2), vec![0, 1, 2, 4], vec![0, 1, 0, 1], vec![1usize, 1, 2, 1]);
        assert_eq!(doc_freqs(&tall.to_csc()).unwrap(), array![2, 2]);
    }
}
