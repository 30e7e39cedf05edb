//! Column renumbering shared by the filtering passes

use sprs::CsMat;

/// Maps every original column id to its new compact id, or to `None` if the column is dropped.
///
/// The i-th kept column is renumbered to the number of kept columns up to and including it, minus one,
/// so the relative order of the kept columns is preserved.
pub(crate) fn compact_ids(mask: &[bool]) -> Vec<Option<usize>> {
    let mut n_kept = 0;
    mask.iter()
        .map(|&keep| {
            if keep {
                n_kept += 1;
                Some(n_kept - 1)
            } else {
                None
            }
        })
        .collect()
}

/// Number of columns surviving a renumbering produced by [`compact_ids`]
pub(crate) fn n_kept(new_ids: &[Option<usize>]) -> usize {
    new_ids.iter().filter(|id| id.is_some()).count()
}

/// Builds a new CSR matrix holding only the kept columns of `mat`, renumbered according to `new_ids`.
pub(crate) fn slice_columns<N: Copy>(mat: &CsMat<N>, new_ids: &[Option<usize>]) -> CsMat<N> {
    let mut indptr = Vec::with_capacity(mat.rows() + 1);
    let mut indices = Vec::with_capacity(mat.nnz());
    let mut data = Vec::with_capacity(mat.nnz());
    indptr.push(0);
    for row in mat.outer_iterator() {
        for (col, &value) in row.iter() {
            // the renumbering is monotonic, so indices stay sorted within each row
            if let Some(new_col) = new_ids[col] {
                indices.push(new_col);
                data.push(value);
            }
        }
        indptr.push(indices.len());
    }
    CsMat::new((mat.rows(), n_kept(new_ids)), indptr, indices, data)
}
