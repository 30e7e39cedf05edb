//! Document-term vectorization
//!
//! A [`Vectorizer`] learns (or is given) a vocabulary and turns tokenized documents into a sparse
//! matrix with one row per document and one column per vocabulary term.

use std::cell::Ref;

use linfa::ParamGuard;
use log::debug;
use sprs::CsMat;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::counting::count_documents;
use crate::error::Result;
use crate::filtering::filter_terms;
use crate::vocabulary::{IdAssigner, Vocabulary};
use crate::weighting::reweight;

mod hyperparams;

pub use hyperparams::{VectorizerParams, VectorizerValidParams};

impl VectorizerParams {
    /// Checks the parameters and validates the optional fixed vocabulary, producing a
    /// [`Vectorizer`] ready to be fitted.
    ///
    /// Returns an error if:
    /// * a relative document frequency or `min_ic` lies outside `[0, 1]`
    /// * the fixed vocabulary is empty, has duplicate terms or non compact ids
    pub fn build(self) -> Result<Vectorizer> {
        Vectorizer::new(self.check()?)
    }
}

/// Maps tokenized documents to rows of a sparse document-term matrix.
///
/// Without a fixed vocabulary, the vocabulary is learned by [`fit`](Vectorizer::fit) or
/// [`fit_transform`](Vectorizer::fit_transform), numbering terms in order of first appearance and
/// then filtering them as configured. Every later call to [`transform`](Vectorizer::transform)
/// drops the terms missing from it.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct Vectorizer {
    params: VectorizerValidParams,
    vocabulary_terms: Option<Vocabulary>,
    fixed_terms: bool,
}

impl Vectorizer {
    /// Construct a new set of parameters
    pub fn params() -> VectorizerParams {
        VectorizerParams::default()
    }

    /// Builds an unfitted vectorizer, or a fitted one if the parameters carry a fixed vocabulary.
    pub fn new(params: VectorizerValidParams) -> Result<Self> {
        let (vocabulary_terms, fixed_terms) =
            Vocabulary::validate(params.vocabulary_terms().cloned())?;
        Ok(Self {
            params,
            vocabulary_terms,
            fixed_terms,
        })
    }

    /// Learns the vocabulary of `tokenized_docs`, discarding any previously learned one.
    ///
    /// A fixed vocabulary is kept as it is.
    pub fn fit<I, D, T>(&mut self, tokenized_docs: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = D>,
        D: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.fit_transform(tokenized_docs)?;
        Ok(self)
    }

    /// Learns the vocabulary of `tokenized_docs` and returns their weighted document-term matrix of
    /// shape `(n_documents, n_terms)`.
    ///
    /// The learned vocabulary is filtered by document frequency, then by information content, and
    /// only replaces the current one if the whole operation succeeds. With a fixed vocabulary,
    /// unknown terms are skipped and nothing is filtered.
    pub fn fit_transform<I, D, T>(&mut self, tokenized_docs: I) -> Result<CsMat<f64>>
    where
        I: IntoIterator<Item = D>,
        D: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut terms = IdAssigner::with(self.vocabulary_terms.as_ref(), self.fixed_terms);
        let counts = count_documents(tokenized_docs, &mut terms);
        debug!(
            "counted {} documents over {} terms",
            counts.rows(),
            counts.cols()
        );

        let (counts, learned) = match terms.into_learned() {
            Some(vocabulary) => {
                let (counts, vocabulary) = filter_terms(counts, vocabulary, &self.params)?;
                (counts, Some(vocabulary))
            }
            None => (counts, None),
        };
        let weighted = reweight(&counts, &self.params);
        if let Some(vocabulary) = learned {
            self.vocabulary_terms = Some(vocabulary);
        }
        Ok(weighted)
    }

    /// Returns the weighted document-term matrix of `tokenized_docs` over the current vocabulary,
    /// skipping unknown terms. The matrix always has one column per vocabulary term.
    ///
    /// Returns an error if the vectorizer has neither been fitted nor given a fixed vocabulary.
    pub fn transform<I, D, T>(&self, tokenized_docs: I) -> Result<CsMat<f64>>
    where
        I: IntoIterator<Item = D>,
        D: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let vocabulary = Vocabulary::require_nonempty(self.vocabulary_terms.as_ref())?;
        let counts = count_documents(tokenized_docs, &mut IdAssigner::fixed(vocabulary));
        Ok(reweight(&counts, &self.params))
    }

    /// The current term vocabulary, `None` before fitting without a fixed vocabulary
    pub fn vocabulary_terms(&self) -> Option<&Vocabulary> {
        self.vocabulary_terms.as_ref()
    }

    /// All terms in column order
    pub fn terms_list(&self) -> Result<Vec<String>> {
        Ok(Vocabulary::require_nonempty(self.vocabulary_terms.as_ref())?.terms_in_id_order())
    }

    /// Mapping from column index to term
    pub fn id_to_term(&self) -> Result<Ref<'_, [String]>> {
        Ok(Vocabulary::require_nonempty(self.vocabulary_terms.as_ref())?.inverse())
    }

    /// Number of terms, i.e. of matrix columns, zero before fitting
    pub fn nterms(&self) -> usize {
        self.vocabulary_terms.as_ref().map_or(0, Vocabulary::len)
    }

    /// Whether the term vocabulary was supplied by the user
    pub fn is_fixed(&self) -> bool {
        self.fixed_terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VectorizerError;
    use crate::weighting::Weighting;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};
    use std::collections::HashMap;

    macro_rules! column_for_term {
        ($vectorizer:expr, $counts:expr, $term:expr) => {
            $counts.column(
                $vectorizer
                    .vocabulary_terms()
                    .unwrap()
                    .get($term)
                    .unwrap(),
            )
        };
    }

    #[test]
    fn learns_terms_in_order_of_appearance() {
        let docs = vec![vec!["a", "b", "a"], vec!["b", "c"]];
        let mut vectorizer = Vectorizer::params().build().unwrap();
        let counts = vectorizer.fit_transform(&docs).unwrap().to_dense();
        assert_eq!(vectorizer.terms_list().unwrap(), vec!["a", "b", "c"]);
        assert_abs_diff_eq!(counts, array![[2., 1., 0.], [0., 1., 1.]]);
        assert_eq!(vectorizer.nterms(), 3);
        assert!(!vectorizer.is_fixed());
    }

    #[test]
    fn min_df_filters_learned_terms() {
        let docs = vec![vec!["a", "b", "a"], vec!["b", "c"]];
        let mut vectorizer = Vectorizer::params().min_df(2usize).build().unwrap();
        let counts = vectorizer.fit_transform(&docs).unwrap().to_dense();
        assert_eq!(vectorizer.terms_list().unwrap(), vec!["b"]);
        assert_eq!(vectorizer.vocabulary_terms().unwrap().get("b"), Some(0));
        assert_abs_diff_eq!(counts, array![[1.], [1.]]);
    }

    #[test]
    fn fixed_vocabulary_drops_unknown_terms() {
        let mapping: HashMap<&str, usize> = vec![("x", 0), ("y", 1)].into_iter().collect();
        let vectorizer = Vectorizer::params()
            .vocabulary_terms(mapping)
            .build()
            .unwrap();
        assert!(vectorizer.is_fixed());
        let counts = vectorizer.transform(&[vec!["x", "z"]]).unwrap();
        assert_abs_diff_eq!(counts.to_dense(), array![[1., 0.]]);

        let empty: Vec<Vec<&str>> = Vec::new();
        let counts = vectorizer.transform(empty).unwrap();
        assert_eq!(counts.shape(), (0, 2));
        let counts = vectorizer.transform(&[vec!["w"], vec![]]).unwrap();
        assert_eq!(counts.shape(), (2, 2));
        assert_eq!(counts.nnz(), 0);
    }

    #[test]
    fn fixed_vocabulary_is_never_filtered() {
        let docs = vec![vec!["b", "a"], vec!["a"]];
        let mut vectorizer = Vectorizer::params()
            .vocabulary_terms(vec!["c", "b", "a"])
            .min_df(2usize)
            .build()
            .unwrap();
        let counts = vectorizer.fit_transform(&docs).unwrap().to_dense();
        assert_eq!(vectorizer.terms_list().unwrap(), vec!["a", "b", "c"]);
        assert_eq!(column_for_term!(vectorizer, counts, "a"), array![1., 1.]);
        assert_eq!(column_for_term!(vectorizer, counts, "b"), array![1., 0.]);
        assert_eq!(column_for_term!(vectorizer, counts, "c"), array![0., 0.]);
    }

    #[test]
    fn transform_before_fit() {
        let vectorizer = Vectorizer::params().build().unwrap();
        assert_eq!(
            vectorizer.transform(&[vec!["a"]]).unwrap_err(),
            VectorizerError::VocabularyNotFit
        );
        assert_eq!(
            vectorizer.terms_list().unwrap_err(),
            VectorizerError::VocabularyNotFit
        );
        assert_eq!(vectorizer.nterms(), 0);
    }

    #[test]
    fn transform_reuses_learned_vocabulary() {
        let mut vectorizer = Vectorizer::params().build().unwrap();
        vectorizer
            .fit(vec![vec!["one", "two"], vec!["two", "three"]])
            .unwrap();
        let counts: Array2<f64> = vectorizer
            .transform(vec![vec!["three", "four", "three"]])
            .unwrap()
            .to_dense();
        assert_abs_diff_eq!(counts, array![[0., 0., 2.]]);
        // transforming never extends the vocabulary
        assert_eq!(vectorizer.nterms(), 3);
    }

    #[test]
    fn refitting_replaces_the_vocabulary() {
        let mut vectorizer = Vectorizer::params().build().unwrap();
        vectorizer.fit(vec![vec!["a", "b"]]).unwrap();
        vectorizer.fit(vec![vec!["c"], vec!["b"]]).unwrap();
        assert_eq!(vectorizer.terms_list().unwrap(), vec!["c", "b"]);
        assert_eq!(&*vectorizer.id_to_term().unwrap(), &["c", "b"]);
    }

    #[test]
    fn failed_fit_keeps_the_previous_vocabulary() {
        let mut vectorizer = Vectorizer::params().min_df(2usize).build().unwrap();
        vectorizer.fit(vec![vec!["a"], vec!["a", "b"]]).unwrap();
        let res = vectorizer.fit(vec![vec!["x"], vec!["y"]]);
        assert!(matches!(res, Err(VectorizerError::NoTermsRemain(_))));
        assert_eq!(vectorizer.terms_list().unwrap(), vec!["a"]);
    }

    #[test]
    fn empty_learned_vocabulary() {
        let mut vectorizer = Vectorizer::params().build().unwrap();
        let counts = vectorizer.fit_transform(vec![Vec::<&str>::new()]).unwrap();
        assert_eq!(counts.shape(), (1, 0));
        assert_eq!(
            vectorizer.transform(vec![vec!["a"]]).unwrap_err(),
            VectorizerError::EmptyVocabulary
        );
    }

    #[test]
    fn information_content_filters_what_document_frequency_kept() {
        let docs = vec![
            vec!["a", "b", "c"],
            vec!["a", "b"],
            vec!["a", "d"],
            vec!["a"],
        ];
        // df keeps a (4 documents) and b (2), then a carries no information
        let mut vectorizer = Vectorizer::params()
            .min_df(2usize)
            .min_ic(0.9)
            .build()
            .unwrap();
        let counts = vectorizer.fit_transform(&docs).unwrap().to_dense();
        assert_eq!(vectorizer.terms_list().unwrap(), vec!["b"]);
        assert_abs_diff_eq!(counts, array![[1.], [1.], [0.], [0.]]);
    }

    #[test]
    fn max_n_terms_applies_before_information_content() {
        // totals: a 4, b 3, c 4; document frequencies: a 4, b 3, c 2
        let docs = vec![
            vec!["a", "b", "c", "c", "c"],
            vec!["a", "b", "c"],
            vec!["a", "b"],
            vec!["a"],
        ];
        let mut vectorizer = Vectorizer::params()
            .max_n_terms(Some(2))
            .min_ic(0.5)
            .build()
            .unwrap();
        let counts = vectorizer.fit_transform(&docs).unwrap().to_dense();
        // b is informative enough, but the two most frequent terms are a and c
        assert_eq!(vectorizer.terms_list().unwrap(), vec!["c"]);
        assert_abs_diff_eq!(counts, array![[3.], [1.], [0.], [0.]]);
    }

    #[test]
    fn zero_max_n_terms_keeps_nothing() {
        let mut vectorizer = Vectorizer::params()
            .max_n_terms(Some(0))
            .build()
            .unwrap();
        let res = vectorizer.fit(vec![vec!["a", "b"]]);
        assert!(matches!(res, Err(VectorizerError::NoTermsRemain(_))));
        assert!(vectorizer.vocabulary_terms().is_none());
    }

    #[test]
    fn invalid_fixed_vocabulary() {
        let res = Vectorizer::params()
            .vocabulary_terms(vec!["a", "a"])
            .build();
        assert!(matches!(res, Err(VectorizerError::InvalidVocabulary(_))));
        let res = Vectorizer::params().min_ic(2.).build();
        assert!(matches!(res, Err(VectorizerError::InvalidConfiguration(_))));
    }

    #[test]
    fn tfidf_with_normalization() {
        let docs = vec![vec!["a", "b"], vec!["a"]];
        let mut vectorizer = Vectorizer::params()
            .weighting(Weighting::TfIdf)
            .normalize(true)
            .build()
            .unwrap();
        let weighted = vectorizer.fit_transform(&docs).unwrap().to_dense();
        // a: idf = ln(3 / 3) + 1 = 1, b: idf = ln(3 / 2) + 1
        let idf_b = (1.5f64).ln() + 1.;
        let norm = (1. + idf_b * idf_b).sqrt();
        assert_abs_diff_eq!(
            weighted,
            array![[1. / norm, idf_b / norm], [1., 0.]],
            epsilon = 1e-12
        );
    }
}
