use std::collections::BTreeSet;

use movie_charts::error::ChartResult;
use movie_charts::join::{
    ChartState, MarkAttributes, MarkInstruction, MarkPhase, TransitionTiming, reconcile,
};
use movie_charts::render::Color;
use proptest::prelude::*;

fn encode(value: &(u8, u16), index: usize) -> ChartResult<MarkAttributes> {
    Ok(MarkAttributes::rect(
        0.0,
        index as f64 * 12.0,
        f64::from(value.1),
        10.0,
        Color::DODGER_BLUE,
    ))
}

fn key_of(value: &(u8, u16)) -> String {
    format!("k{}", value.0)
}

fn batch_strategy() -> impl Strategy<Value = Vec<(u8, u16)>> {
    proptest::collection::vec((0u8..16, 0u16..1_000), 0..20)
}

proptest! {
    #[test]
    fn settled_marks_match_the_last_batch(
        batches in proptest::collection::vec((batch_strategy(), 0.0f64..1_500.0), 1..6)
    ) {
        let mut state = ChartState::default();
        let mut now = 0.0;
        let mut last = Vec::new();
        for (batch, gap) in batches {
            now += gap;
            reconcile(&mut state, &batch, key_of, &encode, now);
            last = batch;
        }
        state.settle();

        let mut expected = BTreeSet::new();
        let mut first_values = Vec::new();
        // The encoder sees the raw batch index, duplicates included.
        for (index, datum) in last.iter().enumerate() {
            if expected.insert(key_of(datum)) {
                first_values.push((index, *datum));
            }
        }
        let live: BTreeSet<String> = state.keys().map(str::to_owned).collect();
        prop_assert_eq!(&live, &expected);
        prop_assert_eq!(state.len(), expected.len());
        prop_assert!(state.is_idle());

        for (index, datum) in &first_values {
            let mark = state.mark(&key_of(datum)).expect("live mark");
            prop_assert_eq!(mark.phase(), MarkPhase::Live);
            prop_assert_eq!(mark.attributes().width, f64::from(datum.1));
            prop_assert_eq!(mark.attributes().y, *index as f64 * 12.0);
            prop_assert_eq!(mark.attributes().opacity, 1.0);
        }
    }

    #[test]
    fn repeated_reconcile_is_idempotent(batch in batch_strategy(), gap in 0.0f64..2_000.0) {
        let mut once = ChartState::default();
        reconcile(&mut once, &batch, key_of, &encode, 0.0);
        once.settle();

        let mut twice = once.clone();
        let now = twice.now_ms() + gap;
        reconcile(&mut twice, &batch, key_of, &encode, now);
        twice.settle();

        let snapshot = |state: &ChartState| -> Vec<(String, MarkAttributes)> {
            state.marks().map(|mark| (mark.key().to_owned(), *mark.attributes())).collect()
        };
        prop_assert_eq!(snapshot(&once), snapshot(&twice));
    }

    #[test]
    fn mark_ids_are_never_reused(
        batches in proptest::collection::vec(batch_strategy(), 1..6)
    ) {
        let mut state = ChartState::new(TransitionTiming::immediate());
        let mut seen = BTreeSet::new();
        let mut created = 0usize;
        for batch in &batches {
            let report = reconcile(&mut state, batch, key_of, &encode, 0.0);
            for instruction in &report.instructions {
                if let MarkInstruction::Create { id, .. } = instruction {
                    created += 1;
                    seen.insert(id.get());
                }
            }
        }
        prop_assert_eq!(seen.len(), created);
    }
}
