use augur_core::{Category, PatternCandidate, PatternPayload};
use augur_patterns::PatternStore;
use chrono::{Duration, Utc};
use proptest::prelude::*;

fn arb_category() -> impl Strategy<Value = Category> {
    prop_oneof![Just(Category::A), Just(Category::B), Just(Category::C)]
}

fn arb_candidate() -> impl Strategy<Value = PatternCandidate> {
    (arb_category(), 3usize..12, 0.0f64..1.0).prop_map(|(category, run, base)| {
        PatternCandidate::new(
            PatternPayload::Sequence {
                category,
                run_length: run,
            },
            base,
            run as u32,
            "run",
        )
    })
}

proptest! {
    #[test]
    fn confidence_stays_in_unit_interval(
        candidates in prop::collection::vec(arb_candidate(), 1..30),
        factor in 0.01f64..1.0,
    ) {
        let mut store = PatternStore::default();
        let now = Utc::now();
        for c in &candidates {
            store.upsert(c, now);
            store.decay(factor);
        }
        for p in store.snapshot() {
            prop_assert!((0.0..=1.0).contains(&p.confidence.value()));
        }
    }

    #[test]
    fn correct_never_exceeds_total(outcomes in prop::collection::vec(any::<bool>(), 0..50)) {
        let mut store = PatternStore::default();
        let now = Utc::now();
        let candidate = PatternCandidate::new(
            PatternPayload::Sequence { category: Category::A, run_length: 4 },
            0.7,
            4,
            "run",
        );
        let upsert = store.upsert(&candidate, now);
        let id = upsert.id().unwrap().to_string();
        for correct in outcomes {
            store.record_outcome(&id, correct, now).unwrap();
            let p = store.get(&id).unwrap();
            prop_assert!(p.correct_predictions <= p.total_predictions);
            prop_assert!((0.0..=1.0).contains(&p.success_rate));
        }
    }

    #[test]
    fn decay_strictly_decreases_until_pruned(
        candidates in prop::collection::vec(arb_candidate(), 1..10),
        factor in 0.5f64..0.99,
    ) {
        let mut store = PatternStore::default();
        let now = Utc::now();
        for c in &candidates {
            store.upsert(c, now);
        }
        store.prune(0.1, Duration::days(7), now);
        for _ in 0..100 {
            let before: Vec<(String, f64)> = store
                .snapshot()
                .into_iter()
                .map(|p| (p.id, p.confidence.value()))
                .collect();
            if before.is_empty() {
                break;
            }
            store.decay(factor);
            for (id, old) in before {
                let new = store.get(&id).unwrap().confidence.value();
                prop_assert!(new < old);
            }
            store.prune(0.1, Duration::days(7), now);
        }
    }

    #[test]
    fn prune_twice_is_a_noop(
        candidates in prop::collection::vec(arb_candidate(), 0..30),
        factor in 0.01f64..1.0,
    ) {
        let mut store = PatternStore::default();
        let now = Utc::now();
        for c in &candidates {
            store.upsert(c, now);
        }
        store.decay(factor);
        store.prune(0.1, Duration::days(7), now);
        let ids = store.ids();
        let second = store.prune(0.1, Duration::days(7), now);
        prop_assert!(second.is_empty());
        prop_assert_eq!(store.ids(), ids);
    }
}
