use linfa::ParamGuard;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{Result, VectorizerError};
use crate::filtering::DocumentFrequency;
use crate::vocabulary::VocabularySource;
use crate::weighting::Weighting;

/// Vectorizer: counts the terms of tokenized documents into a sparse document-term matrix,
/// optionally filters the learned vocabulary and re-weights the counts, producing a
/// [Vectorizer](crate::Vectorizer) that remembers the vocabulary for later transformations.
///
/// ### Attributes
///
/// The filtering attributes are only considered while learning a vocabulary: a user supplied
/// vocabulary is never filtered.
///
/// * `weighting`: how the counts are weighted, one of [`Weighting::Tf`], [`Weighting::TfIdf`] or
///   [`Weighting::Binary`]. Defaults to `Tf`.
/// * `normalize`: if true, every non-empty row is scaled to unit L2 norm. Defaults to `false`.
/// * `sublinear_tf`: if true, counts are replaced by `1 + ln(count)`. Ignored by binary
///   weighting. Defaults to `false`.
/// * `smooth_idf`: if true, idf is computed as if an extra row containing every term had been
///   counted. Defaults to `true`.
/// * `min_df` / `max_df`: minimum and maximum number (or fraction) of documents a term must appear
///   in. Default to one document and all documents.
/// * `min_ic`: minimum information content of a term, in `[0, 1]`. Defaults to `0`.
/// * `max_n_terms`: if set, only the most frequent (or informative) terms are kept. Defaults to
///   `None`.
/// * `vocabulary_terms`: a fixed vocabulary to use instead of learning one. Defaults to `None`.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct VectorizerValidParams {
    weighting: Weighting,
    normalize: bool,
    sublinear_tf: bool,
    smooth_idf: bool,
    min_df: DocumentFrequency,
    max_df: DocumentFrequency,
    min_ic: f64,
    max_n_terms: Option<usize>,
    vocabulary_terms: Option<VocabularySource>,
}

impl VectorizerValidParams {
    pub fn weighting(&self) -> Weighting {
        self.weighting
    }

    pub fn normalize(&self) -> bool {
        self.normalize
    }

    pub fn sublinear_tf(&self) -> bool {
        self.sublinear_tf
    }

    pub fn smooth_idf(&self) -> bool {
        self.smooth_idf
    }

    pub fn min_df(&self) -> DocumentFrequency {
        self.min_df
    }

    pub fn max_df(&self) -> DocumentFrequency {
        self.max_df
    }

    pub fn min_ic(&self) -> f64 {
        self.min_ic
    }

    pub fn max_n_terms(&self) -> Option<usize> {
        self.max_n_terms
    }

    pub fn vocabulary_terms(&self) -> Option<&VocabularySource> {
        self.vocabulary_terms.as_ref()
    }

    /// Checks the numeric bounds, shared with the group vectorizer parameters
    pub(crate) fn verify(&self) -> Result<()> {
        if !self.min_df.is_valid() || !self.max_df.is_valid() {
            Err(VectorizerError::InvalidConfiguration(format!(
                "relative document frequencies must lie in [0, 1], got min_df = {} and max_df = {}",
                self.min_df, self.max_df
            )))
        } else if !(0.0..=1.0).contains(&self.min_ic) {
            Err(VectorizerError::InvalidConfiguration(format!(
                "min_ic must lie in [0, 1], got {}",
                self.min_ic
            )))
        } else {
            Ok(())
        }
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct VectorizerParams(pub(crate) VectorizerValidParams);

impl std::default::Default for VectorizerParams {
    fn default() -> Self {
        Self(VectorizerValidParams {
            weighting: Weighting::Tf,
            normalize: false,
            sublinear_tf: false,
            smooth_idf: true,
            min_df: DocumentFrequency::Absolute(1),
            max_df: DocumentFrequency::Relative(1.),
            min_ic: 0.,
            max_n_terms: None,
            vocabulary_terms: None,
        })
    }
}

impl VectorizerParams {
    /// Sets the weighting applied to the counts
    pub fn weighting(mut self, weighting: Weighting) -> Self {
        self.0.weighting = weighting;
        self
    }

    /// If true, every non-empty row of the output has unit L2 norm
    pub fn normalize(mut self, normalize: bool) -> Self {
        self.0.normalize = normalize;
        self
    }

    /// If true, counts are replaced by `1 + ln(count)` before idf weighting
    pub fn sublinear_tf(mut self, sublinear_tf: bool) -> Self {
        self.0.sublinear_tf = sublinear_tf;
        self
    }

    pub fn smooth_idf(mut self, smooth_idf: bool) -> Self {
        self.0.smooth_idf = smooth_idf;
        self
    }

    /// Minimum document frequency of the learned terms, either a number of documents (`usize`) or a
    /// fraction of them (`f64` in `[0, 1]`)
    pub fn min_df<F: Into<DocumentFrequency>>(mut self, min_df: F) -> Self {
        self.0.min_df = min_df.into();
        self
    }

    /// Maximum document frequency of the learned terms, either a number of documents (`usize`) or a
    /// fraction of them (`f64` in `[0, 1]`)
    pub fn max_df<F: Into<DocumentFrequency>>(mut self, max_df: F) -> Self {
        self.0.max_df = max_df.into();
        self
    }

    /// Minimum information content of the learned terms. `min_ic` must lie in `[0, 1]`
    pub fn min_ic(mut self, min_ic: f64) -> Self {
        self.0.min_ic = min_ic;
        self
    }

    /// Keeps at most `max_n_terms` learned terms
    pub fn max_n_terms(mut self, max_n_terms: Option<usize>) -> Self {
        self.0.max_n_terms = max_n_terms;
        self
    }

    /// Fixed vocabulary: either a mapping of terms to compact ids, or a list of unique terms which
    /// are numbered in sorted order
    pub fn vocabulary_terms<V: Into<VocabularySource>>(mut self, vocabulary: V) -> Self {
        self.0.vocabulary_terms = Some(vocabulary.into());
        self
    }
}

impl ParamGuard for VectorizerParams {
    type Checked = VectorizerValidParams;
    type Error = VectorizerError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        self.0.verify()?;
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
