//! Bidirectional mappings between strings (terms or group labels) and compact integer ids

use std::cell::{Ref, RefCell};
use std::collections::{HashMap, HashSet};
use std::convert::TryFrom;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{Result, VectorizerError};

/// A user supplied vocabulary, either as an explicit string to id mapping or as a collection
/// of strings which will be sorted and numbered in ascending order.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub enum VocabularySource {
    Mapping(HashMap<String, usize>),
    Terms(Vec<String>),
}

impl<K: Into<String>> From<HashMap<K, usize>> for VocabularySource {
    fn from(mapping: HashMap<K, usize>) -> Self {
        VocabularySource::Mapping(mapping.into_iter().map(|(k, id)| (k.into(), id)).collect())
    }
}

impl<T: ToString> From<Vec<T>> for VocabularySource {
    fn from(terms: Vec<T>) -> Self {
        VocabularySource::Terms(terms.iter().map(|t| t.to_string()).collect())
    }
}

impl<T: ToString> From<&[T]> for VocabularySource {
    fn from(terms: &[T]) -> Self {
        VocabularySource::Terms(terms.iter().map(|t| t.to_string()).collect())
    }
}

impl<T: ToString, const N: usize> From<[T; N]> for VocabularySource {
    fn from(terms: [T; N]) -> Self {
        VocabularySource::Terms(terms.iter().map(|t| t.to_string()).collect())
    }
}

/// Mapping of unique strings to unique, compact integer ids starting at zero.
///
/// The inverse mapping (id to string) is only built when requested and is cached until the
/// size of the forward mapping changes. Only the forward mapping is serialized, and deserializing
/// checks that its ids are compact.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(
        crate = "serde_crate",
        try_from = "HashMap<String, usize>",
        into = "HashMap<String, usize>"
    )
)]
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
    ids: HashMap<String, usize>,
    inverse: RefCell<Vec<String>>,
}

impl TryFrom<HashMap<String, usize>> for Vocabulary {
    type Error = VectorizerError;

    /// Fails if the ids are not unique or leave gaps in `0..len`. An empty mapping is accepted.
    fn try_from(ids: HashMap<String, usize>) -> Result<Self> {
        check_compact_ids(&ids)?;
        Ok(Vocabulary::from_compact_ids(ids))
    }
}

impl From<Vocabulary> for HashMap<String, usize> {
    fn from(vocabulary: Vocabulary) -> Self {
        vocabulary.ids
    }
}

impl PartialEq for Vocabulary {
    fn eq(&self, other: &Self) -> bool {
        self.ids == other.ids
    }
}

impl Vocabulary {
    /// Validates an optional user supplied vocabulary.
    ///
    /// Returns `(None, false)` when no vocabulary is given, meaning that one will be learned
    /// while fitting. Any supplied vocabulary is returned as fixed.
    ///
    /// Returns an error if:
    /// * the ids of a mapping are not unique, or leave gaps in `0..len`
    /// * a collection of terms contains the same term more than once
    /// * the supplied vocabulary is empty
    pub fn validate(source: Option<VocabularySource>) -> Result<(Option<Vocabulary>, bool)> {
        let source = match source {
            None => return Ok((None, false)),
            Some(source) => source,
        };
        let ids = match source {
            VocabularySource::Mapping(ids) => {
                check_compact_ids(&ids)?;
                ids
            }
            VocabularySource::Terms(mut terms) => {
                terms.sort();
                if let Some(pair) = terms.windows(2).find(|pair| pair[0] == pair[1]) {
                    return Err(VectorizerError::InvalidVocabulary(format!(
                        "terms must be unique, but \"{}\" was found more than once",
                        pair[0]
                    )));
                }
                terms
                    .into_iter()
                    .enumerate()
                    .map(|(id, term)| (term, id))
                    .collect()
            }
        };
        if ids.is_empty() {
            return Err(VectorizerError::InvalidVocabulary(
                "vocabulary must not be empty".to_string(),
            ));
        }
        Ok((Some(Vocabulary::from_compact_ids(ids)), true))
    }

    /// Checks that a vocabulary has been built and holds at least one entry.
    pub fn require_nonempty(vocabulary: Option<&Vocabulary>) -> Result<&Vocabulary> {
        match vocabulary {
            None => Err(VectorizerError::VocabularyNotFit),
            Some(vocabulary) if vocabulary.is_empty() => Err(VectorizerError::EmptyVocabulary),
            Some(vocabulary) => Ok(vocabulary),
        }
    }

    /// Builds a vocabulary from ids already known to be unique and compact.
    pub(crate) fn from_compact_ids(ids: HashMap<String, usize>) -> Self {
        Self {
            ids,
            inverse: RefCell::new(Vec::new()),
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The id assigned to `key`, if any
    pub fn get(&self, key: &str) -> Option<usize> {
        self.ids.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.ids.contains_key(key)
    }

    /// Iterates over `(string, id)` pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.ids.iter().map(|(key, id)| (key.as_str(), *id))
    }

    /// The forward mapping from strings to ids
    pub fn ids(&self) -> &HashMap<String, usize> {
        &self.ids
    }

    /// All entries sorted by ascending id, i.e. in the column (or row) order of the produced matrices
    pub fn terms_in_id_order(&self) -> Vec<String> {
        self.inverse().to_vec()
    }

    /// Inverse mapping, where the string with id `i` is found at position `i`.
    ///
    /// The mapping is rebuilt whenever its length differs from the number of entries.
    pub fn inverse(&self) -> Ref<'_, [String]> {
        if self.inverse.borrow().len() != self.ids.len() {
            let mut inverse = vec![String::new(); self.ids.len()];
            for (key, &id) in &self.ids {
                inverse[id] = key.clone();
            }
            *self.inverse.borrow_mut() = inverse;
        }
        Ref::map(self.inverse.borrow(), |inverse| inverse.as_slice())
    }

    /// Keeps only the entries whose id maps to `Some(new_id)` in `new_ids`, renumbered accordingly
    pub(crate) fn reindexed(&self, new_ids: &[Option<usize>]) -> Vocabulary {
        let ids = self
            .ids
            .iter()
            .filter_map(|(key, &old_id)| new_ids[old_id].map(|new_id| (key.clone(), new_id)))
            .collect();
        Vocabulary::from_compact_ids(ids)
    }
}

fn check_compact_ids(ids: &HashMap<String, usize>) -> Result<()> {
    let mut seen = HashSet::with_capacity(ids.len());
    let n_dupe_ids = ids
        .values()
        .filter(|&&id| !seen.insert(id))
        .collect::<HashSet<_>>()
        .len();
    if n_dupe_ids > 0 {
        return Err(VectorizerError::InvalidVocabulary(format!(
            "ids must be unique, but {} ids were assigned to more than one term",
            n_dupe_ids
        )));
    }
    if let Some(missing) = (0..ids.len()).find(|id| !seen.contains(id)) {
        return Err(VectorizerError::InvalidVocabulary(format!(
            "ids must be compact, i.e. not have any gaps, but id {} is missing from a vocabulary of {} terms",
            missing,
            ids.len()
        )));
    }
    Ok(())
}

/// Assigns ids to strings while counting.
///
/// An open assigner hands out the next sequential id on first sight of a string, while a fixed one
/// only resolves strings already present in its vocabulary.
pub(crate) enum IdAssigner<'a> {
    Open {
        ids: HashMap<String, usize>,
        next_id: usize,
    },
    Fixed(&'a Vocabulary),
}

impl<'a> IdAssigner<'a> {
    pub(crate) fn open() -> Self {
        IdAssigner::Open {
            ids: HashMap::new(),
            next_id: 0,
        }
    }

    pub(crate) fn fixed(vocabulary: &'a Vocabulary) -> Self {
        IdAssigner::Fixed(vocabulary)
    }

    /// Either a learned vocabulary or `None` when no vocabulary is available yet
    pub(crate) fn with(vocabulary: Option<&'a Vocabulary>, fixed: bool) -> Self {
        match vocabulary {
            Some(vocabulary) if fixed => IdAssigner::fixed(vocabulary),
            _ => IdAssigner::open(),
        }
    }

    pub(crate) fn id(&mut self, key: &str) -> Option<usize> {
        match self {
            IdAssigner::Open { ids, next_id } => match ids.get(key) {
                Some(&id) => Some(id),
                None => {
                    let id = *next_id;
                    ids.insert(key.to_string(), id);
                    *next_id += 1;
                    Some(id)
                }
            },
            IdAssigner::Fixed(vocabulary) => vocabulary.get(key),
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            IdAssigner::Open { next_id, .. } => *next_id,
            IdAssigner::Fixed(vocabulary) => vocabulary.len(),
        }
    }

    /// The vocabulary learned by an open assigner, `None` for a fixed one
    pub(crate) fn into_learned(self) -> Option<Vocabulary> {
        match self {
            IdAssigner::Open { ids, .. } => Some(Vocabulary::from_compact_ids(ids)),
            IdAssigner::Fixed(_) => None,
        }
    }
}
