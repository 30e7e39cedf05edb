//! Re-weighting of counted matrices: binary, sublinear term frequency, inverse document frequency
//! and row normalization.

use sprs::CsMat;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::frequencies::document_counts;
use crate::vectorizer::VectorizerValidParams;

/// Weighting applied to the counts of a document-term (or group-term) matrix
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Weighting {
    /// Raw term frequencies, i.e. occurrence counts
    Tf,
    /// Term frequencies multiplied by the inverse document frequency of their column
    TfIdf,
    /// One for every term present in a row, regardless of its count
    Binary,
}

impl Default for Weighting {
    fn default() -> Self {
        Weighting::Tf
    }
}

impl std::fmt::Display for Weighting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Weighting::Tf => write!(f, "tf"),
            Weighting::TfIdf => write!(f, "tfidf"),
            Weighting::Binary => write!(f, "binary"),
        }
    }
}

/// Applies the weighting configured in `params` to a count matrix.
///
/// Binary weighting excludes sublinear scaling and idf. When both are enabled, idf multiplies the
/// sublinear-scaled values. Normalization always comes last.
pub(crate) fn reweight(counts: &CsMat<usize>, params: &VectorizerValidParams) -> CsMat<f64> {
    let mut mat = counts.map(|&count| count as f64);
    match params.weighting() {
        Weighting::Binary => binarize(&mut mat),
        weighting => {
            if params.sublinear_tf() {
                apply_sublinear_tf(&mut mat);
            }
            if weighting == Weighting::TfIdf {
                scale_by_idf(&mut mat, params.smooth_idf());
            }
        }
    }
    if params.normalize() {
        normalize_rows(&mut mat);
    }
    mat
}

/// Applies inverse document frequency weighting to a term frequency weighted matrix.
///
/// The idf of column `j` is `ln(n_rows / df(j)) + 1`. If `smooth_idf` is true, one is added to both
/// the number of rows and every document frequency, as if an extra row containing every term had
/// been counted. Without smoothing, columns with no entries get an infinite idf, which is never
/// applied since they store no value.
///
/// The result is always in CSR storage.
pub fn apply_idf_weighting(mat: &CsMat<f64>, smooth_idf: bool) -> CsMat<f64> {
    let mut weighted = mat.to_csr();
    scale_by_idf(&mut weighted, smooth_idf);
    weighted
}

fn binarize(mat: &mut CsMat<f64>) {
    mat.map_inplace(|_| 1.);
}

fn apply_sublinear_tf(mat: &mut CsMat<f64>) {
    // stored counts are at least one, so the logarithm is well defined and non-negative
    mat.map_inplace(|count| 1. + count.ln());
}

/// Expects CSR storage
fn scale_by_idf(mat: &mut CsMat<f64>, smooth_idf: bool) {
    let (n_rows, smoothing) = if smooth_idf {
        (mat.rows() as f64 + 1., 1.)
    } else {
        (mat.rows() as f64, 0.)
    };
    let idfs = document_counts(mat).mapv(|df| (n_rows / (df as f64 + smoothing)).ln() + 1.);
    for mut row in mat.outer_iterator_mut() {
        for (col, value) in row.iter_mut() {
            *value *= idfs[col];
        }
    }
}

fn normalize_rows(mat: &mut CsMat<f64>) {
    for mut row in mat.outer_iterator_mut() {
        let norm = row.iter().map(|(_, value)| value * value).sum::<f64>().sqrt();
        if norm > 0. {
            for (_, value) in row.iter_mut() {
                *value /= norm;
            }
        }
    }
}
