//! Vocabulary filtering by document frequency and by information content
//!
//! Both filters drop columns of a count matrix, renumber the surviving terms compactly (keeping
//! their relative order) and return the column-sliced matrix together with the rewritten vocabulary.
use std::cmp::Ordering;

use log::{debug, trace};
use ndarray::Array1;
use sprs::CsMat;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{Result, VectorizerError};
use crate::frequencies::{column_information, column_sums, document_counts};
use crate::reindex::{compact_ids, n_kept, slice_columns};
use crate::vectorizer::VectorizerValidParams;
use crate::vocabulary::Vocabulary;

/// Bound on the number of rows a term must (or may) appear in.
///
/// Relative bounds are fractions of the total number of rows and are resolved as
/// `floor(fraction * n_rows)`.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DocumentFrequency {
    Absolute(usize),
    Relative(f64),
}

impl DocumentFrequency {
    /// The absolute number of rows corresponding to this bound in a matrix with `n_rows` rows
    pub fn resolve(&self, n_rows: usize) -> usize {
        match *self {
            DocumentFrequency::Absolute(count) => count,
            DocumentFrequency::Relative(fraction) => (fraction * n_rows as f64).floor() as usize,
        }
    }

    pub(crate) fn is_valid(&self) -> bool {
        match *self {
            DocumentFrequency::Absolute(_) => true,
            DocumentFrequency::Relative(fraction) => (0.0..=1.0).contains(&fraction),
        }
    }
}

impl From<usize> for DocumentFrequency {
    fn from(count: usize) -> Self {
        DocumentFrequency::Absolute(count)
    }
}

impl From<f64> for DocumentFrequency {
    fn from(fraction: f64) -> Self {
        DocumentFrequency::Relative(fraction)
    }
}

impl std::fmt::Display for DocumentFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFrequency::Absolute(count) => write!(f, "{} rows", count),
            DocumentFrequency::Relative(fraction) => write!(f, "{} of rows", fraction),
        }
    }
}

/// Runs the filters enabled in `params` on a freshly counted matrix and its learned vocabulary:
/// first by document frequency, then by information content.
pub(crate) fn filter_terms(
    counts: CsMat<usize>,
    vocabulary: Vocabulary,
    params: &VectorizerValidParams,
) -> Result<(CsMat<usize>, Vocabulary)> {
    let (counts, vocabulary) = filter_terms_by_df(
        counts,
        vocabulary,
        params.min_df(),
        params.max_df(),
        params.max_n_terms(),
    )?;
    if params.min_ic() != 0. {
        filter_terms_by_ic(counts, vocabulary, params.min_ic(), params.max_n_terms())
    } else {
        Ok((counts, vocabulary))
    }
}

/// Filters out terms that are too common and/or too rare by document frequency, keeping the
/// columns whose document frequency lies in `[min_df, max_df]`.
///
/// If `max_n_terms` is given and more terms survive, only the `max_n_terms` terms with the highest
/// total count are kept, ties broken by column order.
///
/// The matrix is returned untouched when `min_df` is one row, `max_df` is all rows and no
/// `max_n_terms` is given. Otherwise the result is in CSR storage.
///
/// Returns an error if:
/// * a relative bound lies outside `[0, 1]`, or `max_df` resolves to fewer rows than `min_df`
/// * no term survives the filtering
pub fn filter_terms_by_df(
    counts: CsMat<usize>,
    vocabulary: Vocabulary,
    min_df: DocumentFrequency,
    max_df: DocumentFrequency,
    max_n_terms: Option<usize>,
) -> Result<(CsMat<usize>, Vocabulary)> {
    if min_df == DocumentFrequency::Absolute(1)
        && max_df == DocumentFrequency::Relative(1.)
        && max_n_terms.is_none()
    {
        trace!("document frequency filter disabled");
        return Ok((counts, vocabulary));
    }
    if !min_df.is_valid() || !max_df.is_valid() {
        return Err(VectorizerError::InvalidFilterBounds(format!(
            "relative document frequencies must lie in [0, 1] (min_df = {}, max_df = {})",
            min_df, max_df
        )));
    }
    check_shape(&counts, &vocabulary)?;
    let counts = into_row_major(counts);

    let n_rows = counts.rows();
    let (min_count, max_count) = (min_df.resolve(n_rows), max_df.resolve(n_rows));
    if max_count < min_count {
        return Err(VectorizerError::InvalidFilterBounds(format!(
            "max_df corresponds to fewer rows ({}) than min_df ({})",
            max_count, min_count
        )));
    }

    let mut mask: Vec<bool> = document_counts(&counts)
        .iter()
        .map(|&df| df >= min_count && df <= max_count)
        .collect();
    if let Some(max_n_terms) = max_n_terms {
        keep_top(&mut mask, &column_sums(&counts), max_n_terms);
    }
    apply_mask(
        counts,
        vocabulary,
        &mask,
        "try a lower `min_df` or a higher `max_df`",
    )
}

/// Filters out terms whose information content is below `min_ic`.
///
/// If `max_n_terms` is given and more terms survive, only the `max_n_terms` terms with the highest
/// information content are kept, ties broken by column order.
///
/// Returns an error if `min_ic` lies outside `[0, 1]` or if no term survives the filtering. The
/// result is in CSR storage unless the filter is disabled.
pub fn filter_terms_by_ic(
    counts: CsMat<usize>,
    vocabulary: Vocabulary,
    min_ic: f64,
    max_n_terms: Option<usize>,
) -> Result<(CsMat<usize>, Vocabulary)> {
    if min_ic == 0. && max_n_terms.is_none() {
        trace!("information content filter disabled");
        return Ok((counts, vocabulary));
    }
    if !(0.0..=1.0).contains(&min_ic) {
        return Err(VectorizerError::InvalidFilterBounds(format!(
            "min_ic must lie in [0, 1], but is {}",
            min_ic
        )));
    }
    check_shape(&counts, &vocabulary)?;
    let counts = into_row_major(counts);

    let ics = column_information(&counts);
    let mut mask: Vec<bool> = ics.iter().map(|&ic| ic >= min_ic).collect();
    if let Some(max_n_terms) = max_n_terms {
        keep_top(&mut mask, &ics, max_n_terms);
    }
    apply_mask(counts, vocabulary, &mask, "try a lower `min_ic`")
}

fn into_row_major(counts: CsMat<usize>) -> CsMat<usize> {
    if counts.is_csr() {
        counts
    } else {
        counts.to_csr()
    }
}

fn check_shape(counts: &CsMat<usize>, vocabulary: &Vocabulary) -> Result<()> {
    if counts.cols() != vocabulary.len() {
        return Err(VectorizerError::InvalidVocabulary(format!(
            "vocabulary has {} terms, but the matrix has {} columns",
            vocabulary.len(),
            counts.cols()
        )));
    }
    Ok(())
}

/// Restricts `mask` to the `max_n_terms` kept columns with the highest `scores`
fn keep_top(mask: &mut [bool], scores: &Array1<f64>, max_n_terms: usize) {
    let mut kept: Vec<usize> = (0..mask.len()).filter(|&col| mask[col]).collect();
    if kept.len() <= max_n_terms {
        return;
    }
    // stable sort, so equal scores keep their column order
    kept.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal));
    for &col in &kept[max_n_terms..] {
        mask[col] = false;
    }
}

fn apply_mask(
    counts: CsMat<usize>,
    vocabulary: Vocabulary,
    mask: &[bool],
    hint: &str,
) -> Result<(CsMat<usize>, Vocabulary)> {
    let new_ids = compact_ids(mask);
    let n_terms = n_kept(&new_ids);
    if n_terms == 0 {
        return Err(VectorizerError::NoTermsRemain(hint.to_string()));
    }
    debug!("filtering kept {} of {} terms", n_terms, mask.len());
    Ok((
        slice_columns(&counts, &new_ids),
        vocabulary.reindexed(&new_ids),
    ))
}
