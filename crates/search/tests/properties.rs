//! Property tests for index maintenance and query ranking.

use fuzzysearch::{
    build, ngrams, normalize, Index, IndexConfig, Query, RecordId, Scorer,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
enum Op {
    Add(RecordId, String),
    Remove(RecordId),
    Replace(RecordId, String),
}

fn word() -> impl Strategy<Value = String> {
    "[a-eé]{1,6}"
}

fn text() -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 0..4).prop_map(|words| words.join(" "))
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..20u64, text()).prop_map(|(id, t)| Op::Add(id, t)),
        (0..20u64).prop_map(Op::Remove),
        (0..20u64, text()).prop_map(|(id, t)| Op::Replace(id, t)),
    ]
}

/// Apply ops to an index and to a plain map; failed ops must leave both alone.
fn apply(ops: &[Op]) -> (Index, BTreeMap<RecordId, String>) {
    let mut index = Index::new();
    let mut live = BTreeMap::new();
    for op in ops {
        let before = index.clone();
        let ok = match op {
            Op::Add(id, t) => index.add(*id, t.clone()).is_ok(),
            Op::Remove(id) => index.remove(*id).is_ok(),
            Op::Replace(id, t) => index.replace(*id, t.clone()).is_ok(),
        };
        if ok {
            match op {
                Op::Add(id, t) | Op::Replace(id, t) => {
                    live.insert(*id, t.clone());
                }
                Op::Remove(id) => {
                    live.remove(id);
                }
            }
        } else {
            assert_eq!(index, before, "failed {:?} mutated the index", op);
        }
    }
    (index, live)
}

proptest! {
    #[test]
    fn incremental_equals_fresh_build(ops in prop::collection::vec(op(), 0..40)) {
        let (mut index, live) = apply(&ops);
        let fresh = build(live.clone()).unwrap();
        prop_assert_eq!(&index, &fresh);

        index.rebuild();
        prop_assert_eq!(&index, &fresh);
    }

    #[test]
    fn persistence_round_trips(ops in prop::collection::vec(op(), 0..30)) {
        let (index, _) = apply(&ops);
        let restored = Index::from_json(&index.to_json().unwrap()).unwrap();
        prop_assert_eq!(restored, index);
    }

    #[test]
    fn queries_are_deterministic_and_ordered(
        ops in prop::collection::vec(op(), 0..40),
        q in text(),
        max_results in 1usize..8,
    ) {
        let (index, _) = apply(&ops);
        let query = Query::new(q).with_max_results(max_results);
        let first = index.query(&query).unwrap();
        prop_assert_eq!(&index.query(&query).unwrap(), &first);
        prop_assert!(first.len() <= max_results);

        for m in &first {
            prop_assert!((0.0..=1.0).contains(&m.score));
        }
        for pair in first.windows(2) {
            prop_assert!(
                pair[0].score > pair[1].score
                    || (pair[0].score == pair[1].score && pair[0].id < pair[1].id)
            );
        }
    }

    #[test]
    fn scores_stay_in_unit_range(a in text(), b in text()) {
        for scorer in [Scorer::NGramOverlap, Scorer::EditDistance] {
            let score = scorer.score(&normalize(&a), &normalize(&b), 3);
            prop_assert!((0.0..=1.0).contains(&score));
            if score == 1.0 {
                prop_assert_eq!(normalize(&a), normalize(&b));
            }
        }
    }

    #[test]
    fn disjoint_records_never_cross_match(a in "[a-m]{1,8}", b in "[n-z]{1,8}") {
        let index = build([(1, a.clone()), (2, b)]).unwrap();
        let matches = index.query(&Query::new(a).with_min_score(0.5)).unwrap();
        prop_assert!(matches.iter().all(|m| m.id != 2));
    }

    #[test]
    fn self_query_scores_one(t in "[a-z]{1,8}( [a-z]{1,8}){0,2}") {
        let config = IndexConfig::default().with_gram_size(2);
        let index = fuzzysearch::build_with_config(config, [(7, t.clone())]).unwrap();
        let matches = index.query(&Query::new(t)).unwrap();
        prop_assert_eq!(matches.len(), 1);
        prop_assert_eq!(matches[0].score, 1.0);
    }

    #[test]
    fn postings_only_reference_containing_records(ops in prop::collection::vec(op(), 0..30)) {
        let (index, _) = apply(&ops);
        for record in index.records() {
            let expected = ngrams(record.normalized_tokens(), index.config().gram_size);
            prop_assert_eq!(record.grams(), &expected);
            for gram in record.grams() {
                prop_assert!(index.postings(gram).unwrap().contains(&record.id()));
            }
        }
    }
}
