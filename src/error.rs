//! Error definitions for vectorization
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VectorizerError>;

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VectorizerError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid vocabulary: {0}")]
    InvalidVocabulary(String),
    #[error("vocabulary hasn't been built; call `fit` or provide a fixed vocabulary")]
    VocabularyNotFit,
    #[error("vocabulary is empty")]
    EmptyVocabulary,
    #[error("invalid filter bounds: {0}")]
    InvalidFilterBounds(String),
    #[error("after filtering, no terms remain; {0}")]
    NoTermsRemain(String),
    #[error("term-document matrix must have at least 1 non-zero entry")]
    EmptyMatrix,
    #[error("documents and groups must have the same length ({docs} documents, {grps} groups)")]
    LengthMismatch { docs: usize, grps: usize },
}
