//! Single pass term counting into compressed sparse row matrices

use std::collections::BTreeMap;

use sprs::{CsMat, TriMat};

use crate::error::{Result, VectorizerError};
use crate::vocabulary::IdAssigner;

/// Counts the terms of each document into one row of a `(n_documents, n_terms)` matrix.
///
/// New terms are numbered on first sight when `terms` is open, otherwise they are skipped. Every
/// document yields exactly one row, which may be empty.
pub(crate) fn count_documents<I, D, T>(tokenized_docs: I, terms: &mut IdAssigner) -> CsMat<usize>
where
    I: IntoIterator<Item = D>,
    D: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut indptr = vec![0];
    let mut indices = Vec::new();
    let mut data = Vec::new();
    for doc in tokenized_docs {
        for (term_id, count) in count_terms(doc, terms) {
            indices.push(term_id);
            data.push(count);
        }
        indptr.push(indices.len());
    }
    let n_documents = indptr.len() - 1;
    CsMat::new((n_documents, terms.len()), indptr, indices, data)
}

/// Counts the terms of each document into the row of its group, producing a `(n_groups, n_terms)`
/// matrix with rows in group id order.
///
/// Documents belonging to a group unknown to a fixed group vocabulary are skipped entirely. Returns
/// an error if `grps` and `tokenized_docs` have different lengths.
pub(crate) fn count_groups<I, D, T, G, S>(
    tokenized_docs: I,
    grps: G,
    terms: &mut IdAssigner,
    groups: &mut IdAssigner,
) -> Result<CsMat<usize>>
where
    I: IntoIterator<Item = D>,
    D: IntoIterator<Item = T>,
    T: AsRef<str>,
    G: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut docs = tokenized_docs.into_iter();
    let mut grps = grps.into_iter();
    let mut rows = Vec::new();
    let mut cols = Vec::new();
    let mut data = Vec::new();
    let mut n_pairs = 0;
    loop {
        let (doc, grp) = match (docs.next(), grps.next()) {
            (Some(doc), Some(grp)) => (doc, grp),
            (None, None) => break,
            (Some(_), None) => {
                return Err(VectorizerError::LengthMismatch {
                    docs: n_pairs + 1 + docs.count(),
                    grps: n_pairs,
                })
            }
            (None, Some(_)) => {
                return Err(VectorizerError::LengthMismatch {
                    docs: n_pairs,
                    grps: n_pairs + 1 + grps.count(),
                })
            }
        };
        n_pairs += 1;
        let grp_id = match groups.id(grp.as_ref()) {
            Some(grp_id) => grp_id,
            None => continue,
        };
        for (term_id, count) in count_terms(doc, terms) {
            rows.push(grp_id);
            cols.push(term_id);
            data.push(count);
        }
    }
    // documents of the same group produce repeated (row, col) triplets, which are summed
    let triplets = TriMat::from_triplets((groups.len(), terms.len()), rows, cols, data);
    Ok(triplets.to_csr())
}

/// Local count table of a single document, ordered by term id
fn count_terms<D, T>(doc: D, terms: &mut IdAssigner) -> BTreeMap<usize, usize>
where
    D: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut counts = BTreeMap::new();
    for term in doc {
        if let Some(term_id) = terms.id(term.as_ref()) {
            *counts.entry(term_id).or_insert(0) += 1;
        }
    }
    counts
}
