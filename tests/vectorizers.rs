use std::collections::HashMap;

use approx::assert_abs_diff_eq;
use ndarray::{array, Array2};
use sprs::CsMat;
use textvsm::{
    apply_idf_weighting, doc_freqs, filter_terms_by_df, information_content, term_freqs,
    DocumentFrequency, GroupVectorizer, Vectorizer, VectorizerError, Weighting,
};

macro_rules! column_for_term {
    ($terms:expr, $weights:expr, $term:expr) => {
        $weights.column($terms.iter().position(|t| t == $term).unwrap())
    };
}

macro_rules! assert_weights_for_term {
    ($terms:expr, $weights:expr, $(($term:expr, $expected:expr)),*) => {
        $(
            assert_abs_diff_eq!(column_for_term!($terms, $weights, $term), $expected, epsilon = 1e-12);
        )*
    }
}

fn corpus() -> Vec<Vec<&'static str>> {
    vec![
        vec!["one", "two", "three", "four"],
        vec!["two", "three", "four"],
        vec!["three", "four"],
        vec!["four"],
    ]
}

#[test]
fn counts_and_vocabulary() {
    let mut vectorizer = Vectorizer::params().build().unwrap();
    let counts: Array2<f64> = vectorizer.fit_transform(&corpus()).unwrap().to_dense();
    let terms = vectorizer.terms_list().unwrap();
    assert_eq!(terms, vec!["one", "two", "three", "four"]);
    assert_weights_for_term!(
        terms,
        counts,
        ("one", array![1., 0., 0., 0.]),
        ("two", array![1., 1., 0., 0.]),
        ("three", array![1., 1., 1., 0.]),
        ("four", array![1., 1., 1., 1.])
    );
    for (term, id) in vectorizer.vocabulary_terms().unwrap().iter() {
        assert_eq!(terms[id], term);
    }
}

#[test]
fn relative_document_frequency_bounds() {
    let mut vectorizer = Vectorizer::params()
        .min_df(0.5)
        .max_df(0.75)
        .build()
        .unwrap();
    let counts = vectorizer.fit_transform(&corpus()).unwrap().to_dense();
    // "one" appears in 1 of 4 documents and "four" in all of them
    let terms = vectorizer.terms_list().unwrap();
    assert_eq!(terms, vec!["two", "three"]);
    assert_weights_for_term!(
        terms,
        counts,
        ("two", array![1., 1., 0., 0.]),
        ("three", array![1., 1., 1., 0.])
    );
}

#[test]
fn tf_idf_matches_manual_computation() {
    let mut vectorizer = Vectorizer::params()
        .weighting(Weighting::TfIdf)
        .smooth_idf(false)
        .build()
        .unwrap();
    let weights = vectorizer.fit_transform(&corpus()).unwrap().to_dense();
    let terms = vectorizer.terms_list().unwrap();
    let idf = |df: f64| (4. / df).ln() + 1.;
    assert_weights_for_term!(
        terms,
        weights,
        ("one", array![idf(1.), 0., 0., 0.]),
        ("two", array![idf(2.), idf(2.), 0., 0.]),
        ("four", array![1., 1., 1., 1.])
    );

    // the same weights through the public building blocks
    let mut counter = Vectorizer::params().build().unwrap();
    let counts = counter.fit_transform(&corpus()).unwrap();
    assert_abs_diff_eq!(
        apply_idf_weighting(&counts, false).to_dense(),
        weights,
        epsilon = 1e-12
    );
}

#[test]
fn binary_normalized_rows() {
    let docs = vec![vec!["a", "a", "a", "b"], vec!["c"], vec![]];
    let mut vectorizer = Vectorizer::params()
        .weighting(Weighting::Binary)
        .normalize(true)
        .build()
        .unwrap();
    let weights = vectorizer.fit_transform(&docs).unwrap().to_dense();
    let h = 1. / 2f64.sqrt();
    assert_abs_diff_eq!(
        weights,
        array![[h, h, 0.], [0., 0., 1.], [0., 0., 0.]],
        epsilon = 1e-12
    );
}

#[test]
fn fixed_vocabulary_round_trip() {
    let mapping: HashMap<String, usize> = vec![("x".to_string(), 0), ("y".to_string(), 1)]
        .into_iter()
        .collect();
    let mut vectorizer = Vectorizer::params()
        .vocabulary_terms(mapping)
        .build()
        .unwrap();
    assert_eq!(
        vectorizer.transform(&[vec!["x", "z"]]).unwrap().to_dense(),
        array![[1., 0.]]
    );
    // fitting never changes a fixed vocabulary
    let counts = vectorizer.fit_transform(&[vec!["z", "w"]]).unwrap();
    assert_eq!(counts.shape(), (1, 2));
    assert_eq!(vectorizer.terms_list().unwrap(), vec!["x", "y"]);
}

#[test]
fn group_matrix_from_labelled_documents() {
    let docs = vec![vec!["a"], vec!["a", "b"], vec!["c"], vec!["b", "c", "c"]];
    let grps = vec!["g1", "g1", "g2", "g2"];
    let mut vectorizer = GroupVectorizer::params().build().unwrap();
    let counts = vectorizer.fit_transform(&docs, &grps).unwrap();
    assert_eq!(vectorizer.grps_list().unwrap(), vec!["g1", "g2"]);
    assert_eq!(vectorizer.terms_list().unwrap(), vec!["a", "b", "c"]);
    assert_abs_diff_eq!(counts.to_dense(), array![[2., 1., 0.], [0., 1., 3.]]);

    let res = vectorizer.transform(&docs, &grps[..3]);
    assert_eq!(
        res.unwrap_err(),
        VectorizerError::LengthMismatch { docs: 4, grps: 3 }
    );
}

#[test]
fn statistics_of_a_count_matrix() {
    let mut vectorizer = Vectorizer::params().build().unwrap();
    let counts = vectorizer.fit_transform(&corpus()).unwrap();
    assert_eq!(doc_freqs(&counts).unwrap(), array![1, 2, 3, 4]);
    assert_abs_diff_eq!(term_freqs(&counts).unwrap(), array![1., 2., 3., 4.]);
    let ics = information_content(&counts).unwrap();
    assert_abs_diff_eq!(ics[1], 1.);
    assert_abs_diff_eq!(ics[3], 0.);
}

#[test]
fn filters_on_raw_counts() {
    let mut vectorizer = Vectorizer::params().build().unwrap();
    vectorizer.fit(&corpus()).unwrap();
    let counts = CsMat::new(
        (4, 4),
        vec![0, 4, 7, 9, 10],
        vec![0, 1, 2, 3, 1, 2, 3, 2, 3, 3],
        vec![1usize; 10],
    );
    let (filtered, vocabulary) = filter_terms_by_df(
        counts,
        vectorizer.vocabulary_terms().unwrap().clone(),
        DocumentFrequency::Absolute(3),
        DocumentFrequency::Absolute(4),
        None,
    )
    .unwrap();
    assert_eq!(vocabulary.terms_in_id_order(), vec!["three", "four"]);
    assert_eq!(filtered.to_dense(), array![[1, 1], [1, 1], [1, 1], [0, 1]]);
}
