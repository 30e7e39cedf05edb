//! Group-term vectorization
//!
//! A [`GroupVectorizer`] sums the term counts of all documents sharing a group label, producing a
//! sparse matrix with one row per group and one column per term.

use std::cell::Ref;

use linfa::ParamGuard;
use log::debug;
use sprs::CsMat;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::counting::count_groups;
use crate::error::Result;
use crate::filtering::filter_terms;
use crate::vocabulary::{IdAssigner, Vocabulary};
use crate::weighting::reweight;

mod hyperparams;

pub use hyperparams::{GroupVectorizerParams, GroupVectorizerValidParams};

impl GroupVectorizerParams {
    /// Checks the parameters and validates the optional fixed vocabularies, producing a
    /// [`GroupVectorizer`] ready to be fitted.
    pub fn build(self) -> Result<GroupVectorizer> {
        GroupVectorizer::new(self.check()?)
    }
}

/// Maps tokenized documents, each labelled with a group, to rows of a sparse group-term matrix.
///
/// Terms and groups each have their own vocabulary, learned in order of first appearance unless
/// supplied. Rows follow the group ids and columns the term ids.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct GroupVectorizer {
    params: GroupVectorizerValidParams,
    vocabulary_terms: Option<Vocabulary>,
    fixed_terms: bool,
    vocabulary_grps: Option<Vocabulary>,
    fixed_grps: bool,
}

impl GroupVectorizer {
    /// Construct a new set of parameters
    pub fn params() -> GroupVectorizerParams {
        GroupVectorizerParams::default()
    }

    pub fn new(params: GroupVectorizerValidParams) -> Result<Self> {
        let (vocabulary_terms, fixed_terms) =
            Vocabulary::validate(params.vectorizer().vocabulary_terms().cloned())?;
        let (vocabulary_grps, fixed_grps) =
            Vocabulary::validate(params.vocabulary_grps().cloned())?;
        Ok(Self {
            params,
            vocabulary_terms,
            fixed_terms,
            vocabulary_grps,
            fixed_grps,
        })
    }

    /// Learns the term and group vocabularies of `tokenized_docs` labelled by `grps`.
    pub fn fit<I, D, T, G, S>(&mut self, tokenized_docs: I, grps: G) -> Result<&mut Self>
    where
        I: IntoIterator<Item = D>,
        D: IntoIterator<Item = T>,
        T: AsRef<str>,
        G: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.fit_transform(tokenized_docs, grps)?;
        Ok(self)
    }

    /// Learns the term and group vocabularies and returns the weighted group-term matrix of shape
    /// `(n_groups, n_terms)`.
    ///
    /// Only the term vocabulary is filtered, with document frequencies counted over groups. Both
    /// learned vocabularies replace the current ones only if the whole operation succeeds.
    ///
    /// Returns an error if `tokenized_docs` and `grps` have different lengths, or if filtering
    /// leaves no term.
    pub fn fit_transform<I, D, T, G, S>(&mut self, tokenized_docs: I, grps: G) -> Result<CsMat<f64>>
    where
        I: IntoIterator<Item = D>,
        D: IntoIterator<Item = T>,
        T: AsRef<str>,
        G: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut terms = IdAssigner::with(self.vocabulary_terms.as_ref(), self.fixed_terms);
        let mut groups = IdAssigner::with(self.vocabulary_grps.as_ref(), self.fixed_grps);
        let counts = count_groups(tokenized_docs, grps, &mut terms, &mut groups)?;
        debug!(
            "counted {} groups over {} terms",
            counts.rows(),
            counts.cols()
        );

        let learned_grps = groups.into_learned();
        let (counts, learned_terms) = match terms.into_learned() {
            Some(vocabulary) => {
                let (counts, vocabulary) =
                    filter_terms(counts, vocabulary, self.params.vectorizer())?;
                (counts, Some(vocabulary))
            }
            None => (counts, None),
        };
        let weighted = reweight(&counts, self.params.vectorizer());
        if let Some(vocabulary) = learned_terms {
            self.vocabulary_terms = Some(vocabulary);
        }
        if let Some(vocabulary) = learned_grps {
            self.vocabulary_grps = Some(vocabulary);
        }
        Ok(weighted)
    }

    /// Returns the weighted group-term matrix over the current vocabularies. Unknown terms are
    /// skipped, as are whole documents with an unknown group.
    ///
    /// Returns an error if either vocabulary is missing or empty, or if `tokenized_docs` and `grps`
    /// have different lengths.
    pub fn transform<I, D, T, G, S>(&self, tokenized_docs: I, grps: G) -> Result<CsMat<f64>>
    where
        I: IntoIterator<Item = D>,
        D: IntoIterator<Item = T>,
        T: AsRef<str>,
        G: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let vocabulary_terms = Vocabulary::require_nonempty(self.vocabulary_terms.as_ref())?;
        let vocabulary_grps = Vocabulary::require_nonempty(self.vocabulary_grps.as_ref())?;
        let counts = count_groups(
            tokenized_docs,
            grps,
            &mut IdAssigner::fixed(vocabulary_terms),
            &mut IdAssigner::fixed(vocabulary_grps),
        )?;
        Ok(reweight(&counts, self.params.vectorizer()))
    }

    pub fn vocabulary_terms(&self) -> Option<&Vocabulary> {
        self.vocabulary_terms.as_ref()
    }

    pub fn vocabulary_grps(&self) -> Option<&Vocabulary> {
        self.vocabulary_grps.as_ref()
    }

    /// All terms in column order
    pub fn terms_list(&self) -> Result<Vec<String>> {
        Ok(Vocabulary::require_nonempty(self.vocabulary_terms.as_ref())?.terms_in_id_order())
    }

    /// All groups in row order
    pub fn grps_list(&self) -> Result<Vec<String>> {
        Ok(Vocabulary::require_nonempty(self.vocabulary_grps.as_ref())?.terms_in_id_order())
    }

    pub fn id_to_term(&self) -> Result<Ref<'_, [String]>> {
        Ok(Vocabulary::require_nonempty(self.vocabulary_terms.as_ref())?.inverse())
    }

    pub fn id_to_grp(&self) -> Result<Ref<'_, [String]>> {
        Ok(Vocabulary::require_nonempty(self.vocabulary_grps.as_ref())?.inverse())
    }

    pub fn nterms(&self) -> usize {
        self.vocabulary_terms.as_ref().map_or(0, Vocabulary::len)
    }

    pub fn ngrps(&self) -> usize {
        self.vocabulary_grps.as_ref().map_or(0, Vocabulary::len)
    }

    /// Whether the term vocabulary was supplied by the user
    pub fn is_fixed(&self) -> bool {
        self.fixed_terms
    }

    /// Whether the group vocabulary was supplied by the user
    pub fn is_fixed_grps(&self) -> bool {
        self.fixed_grps
    }
}
