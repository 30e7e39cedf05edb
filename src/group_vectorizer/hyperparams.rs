use linfa::ParamGuard;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{Result, VectorizerError};
use crate::filtering::DocumentFrequency;
use crate::vectorizer::{VectorizerParams, VectorizerValidParams};
use crate::vocabulary::VocabularySource;
use crate::weighting::Weighting;

/// Group vectorizer: aggregates the term counts of tokenized documents by group label into a sparse
/// group-term matrix, producing a [GroupVectorizer](crate::GroupVectorizer).
///
/// ### Attributes
///
/// All the attributes of [`VectorizerValidParams`] apply, with document frequencies counted over
/// groups instead of documents. In addition:
///
/// * `vocabulary_grps`: a fixed group vocabulary to use instead of learning one. Documents whose
///   group is missing from it are skipped. Defaults to `None`.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct GroupVectorizerValidParams {
    vectorizer: VectorizerValidParams,
    vocabulary_grps: Option<VocabularySource>,
}

impl GroupVectorizerValidParams {
    /// Counting, filtering and weighting parameters shared with [`VectorizerValidParams`]
    pub fn vectorizer(&self) -> &VectorizerValidParams {
        &self.vectorizer
    }

    pub fn vocabulary_grps(&self) -> Option<&VocabularySource> {
        self.vocabulary_grps.as_ref()
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct GroupVectorizerParams(GroupVectorizerValidParams);

impl std::default::Default for GroupVectorizerParams {
    fn default() -> Self {
        Self(GroupVectorizerValidParams {
            vectorizer: VectorizerParams::default().0,
            vocabulary_grps: None,
        })
    }
}

impl GroupVectorizerParams {
    fn with_vectorizer<F>(mut self, update: F) -> Self
    where
        F: FnOnce(VectorizerParams) -> VectorizerParams,
    {
        self.0.vectorizer = update(VectorizerParams(self.0.vectorizer)).0;
        self
    }

    /// Sets the weighting applied to the counts
    pub fn weighting(self, weighting: Weighting) -> Self {
        self.with_vectorizer(|params| params.weighting(weighting))
    }

    /// If true, every non-empty row of the output has unit L2 norm
    pub fn normalize(self, normalize: bool) -> Self {
        self.with_vectorizer(|params| params.normalize(normalize))
    }

    pub fn sublinear_tf(self, sublinear_tf: bool) -> Self {
        self.with_vectorizer(|params| params.sublinear_tf(sublinear_tf))
    }

    pub fn smooth_idf(self, smooth_idf: bool) -> Self {
        self.with_vectorizer(|params| params.smooth_idf(smooth_idf))
    }

    /// Minimum number (`usize`) or fraction (`f64`) of groups a learned term must appear in
    pub fn min_df<F: Into<DocumentFrequency>>(self, min_df: F) -> Self {
        self.with_vectorizer(|params| params.min_df(min_df))
    }

    /// Maximum number (`usize`) or fraction (`f64`) of groups a learned term may appear in
    pub fn max_df<F: Into<DocumentFrequency>>(self, max_df: F) -> Self {
        self.with_vectorizer(|params| params.max_df(max_df))
    }

    pub fn min_ic(self, min_ic: f64) -> Self {
        self.with_vectorizer(|params| params.min_ic(min_ic))
    }

    pub fn max_n_terms(self, max_n_terms: Option<usize>) -> Self {
        self.with_vectorizer(|params| params.max_n_terms(max_n_terms))
    }

    /// Fixed term vocabulary
    pub fn vocabulary_terms<V: Into<VocabularySource>>(self, vocabulary: V) -> Self {
        self.with_vectorizer(|params| params.vocabulary_terms(vocabulary))
    }

    /// Fixed group vocabulary: either a mapping of group labels to compact ids, or a list of unique
    /// labels which are numbered in sorted order
    pub fn vocabulary_grps<V: Into<VocabularySource>>(mut self, vocabulary: V) -> Self {
        self.0.vocabulary_grps = Some(vocabulary.into());
        self
    }
}

impl ParamGuard for GroupVectorizerParams {
    type Checked = GroupVectorizerValidParams;
    type Error = VectorizerError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        self.0.vectorizer.verify()?;
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
