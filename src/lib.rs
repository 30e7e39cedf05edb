//! # Vector space models for tokenized text
//!
//! ## The Big Picture
//!
//! `textvsm` turns streams of tokenized documents into sparse [`sprs`] matrices, ready for
//! statistical analysis or for the learning algorithms of the [`linfa`](https://crates.io/crates/linfa)
//! ecosystem. Tokenization is left to the caller: a document is any sequence of strings.
//!
//! ## Current state
//!
//! Two vectorizers are provided:
//!
//! * [`Vectorizer`] produces a document-term matrix, with one row per document.
//! * [`GroupVectorizer`] produces a group-term matrix, summing the counts of all documents sharing
//!   a group label into a single row.
//!
//! Both learn a vocabulary while fitting (or use a fixed one), can filter the learned terms by
//! document frequency and information content, and weight the counts as raw term frequencies,
//! tf-idf or binary indicators, optionally with sublinear scaling and L2 row normalization.
//!
//! The statistics and filters used internally are also exposed as free functions in
//! [`frequencies`], [`filtering`] and [`weighting`].
//!
//! ## Example
//!
//! ```
//! use textvsm::{Vectorizer, Weighting};
//!
//! let docs = vec![vec!["a", "b", "a"], vec!["b", "c"]];
//! let mut vectorizer = Vectorizer::params()
//!     .weighting(Weighting::TfIdf)
//!     .build()
//!     .unwrap();
//! let tfidf = vectorizer.fit_transform(&docs).unwrap();
//! assert_eq!(tfidf.shape(), (2, 3));
//! assert_eq!(vectorizer.terms_list().unwrap(), vec!["a", "b", "c"]);
//!
//! // unknown terms are dropped
//! let tfidf = vectorizer.transform(vec![vec!["c", "d"]]).unwrap();
//! assert_eq!(tfidf.nnz(), 1);
//! ```

mod counting;
pub mod error;
pub mod filtering;
pub mod frequencies;
mod group_vectorizer;
mod reindex;
mod vectorizer;
pub mod vocabulary;
pub mod weighting;

pub use error::{Result, VectorizerError};
pub use filtering::{filter_terms_by_df, filter_terms_by_ic, DocumentFrequency};
pub use frequencies::{
    doc_freqs, information_content, relative_doc_freqs, relative_term_freqs, term_freqs,
};
pub use group_vectorizer::{
    GroupVectorizer, GroupVectorizerParams, GroupVectorizerValidParams,
};
pub use vectorizer::{Vectorizer, VectorizerParams, VectorizerValidParams};
pub use vocabulary::{Vocabulary, VocabularySource};
pub use weighting::{apply_idf_weighting, Weighting};
