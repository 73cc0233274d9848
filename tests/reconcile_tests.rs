use movie_charts::error::{ChartError, ChartResult};
use movie_charts::join::{
    AxisPosition, AxisTick, ChartState, Easing, MarkAttributes, MarkInstruction, MarkPhase,
    TransitionTiming, reconcile,
};
use movie_charts::render::Color;

#[derive(Debug, Clone)]
struct Datum {
    key: &'static str,
    value: f64,
}

fn datum(key: &'static str, value: f64) -> Datum {
    Datum { key, value }
}

fn encode(datum: &Datum, index: usize) -> ChartResult<MarkAttributes> {
    Ok(MarkAttributes::rect(
        0.0,
        index as f64 * 10.0,
        datum.value,
        8.0,
        Color::DODGER_BLUE,
    ))
}

fn key_of(datum: &Datum) -> String {
    datum.key.to_owned()
}

fn sorted_keys(state: &ChartState) -> Vec<String> {
    let mut keys: Vec<String> = state.keys().map(str::to_owned).collect();
    keys.sort();
    keys
}

#[test]
fn enter_update_exit_partition_settles_to_new_keys() {
    let mut state = ChartState::default();
    let first = [datum("A", 10.0), datum("B", 20.0)];
    let report = reconcile(&mut state, &first, key_of, &encode, 0.0);
    assert_eq!(report.entered, vec!["A".to_owned(), "B".to_owned()]);
    state.settle();

    let b_id = state.mark("B").expect("B mark").id();
    let now = state.now_ms();
    let second = [datum("B", 30.0), datum("C", 5.0)];
    let report = reconcile(&mut state, &second, key_of, &encode, now);
    assert_eq!(report.entered, vec!["C".to_owned()]);
    assert_eq!(report.updated, vec!["B".to_owned()]);
    assert_eq!(report.exited, vec!["A".to_owned()]);

    let removed = state.settle();
    assert!(removed.iter().any(
        |instruction| matches!(instruction, MarkInstruction::Remove { key, .. } if key == "A")
    ));
    assert_eq!(sorted_keys(&state), vec!["B".to_owned(), "C".to_owned()]);

    let b = state.mark("B").expect("B mark");
    assert_eq!(b.id(), b_id);
    assert_eq!(b.phase(), MarkPhase::Live);
    assert!((b.attributes().width - 30.0).abs() <= 1e-9);
    assert!((b.attributes().y - 0.0).abs() <= 1e-9);
}

#[test]
fn new_marks_start_from_initial_attributes() {
    let mut state = ChartState::default();
    let report = reconcile(&mut state, &[datum("A", 10.0)], key_of, &encode, 0.0);
    match &report.instructions[0] {
        MarkInstruction::Create { key, attributes, .. } => {
            assert_eq!(key, "A");
            assert_eq!(attributes.opacity, 0.0);
            assert_eq!(attributes.width, 10.0);
        }
        other => panic!("expected create instruction, got {other:?}"),
    }
    assert_eq!(state.mark("A").expect("A").phase(), MarkPhase::Entering);
}

#[test]
fn reconciling_identical_data_twice_is_idempotent() {
    let data = [datum("A", 10.0), datum("B", 20.0), datum("C", 30.0)];
    let mut state = ChartState::default();
    reconcile(&mut state, &data, key_of, &encode, 0.0);
    state.settle();
    let before: Vec<(String, MarkAttributes)> = state
        .marks()
        .map(|mark| (mark.key().to_owned(), *mark.attributes()))
        .collect();

    let now = state.now_ms();
    let report = reconcile(&mut state, &data, key_of, &encode, now);
    assert!(report.entered.is_empty());
    assert!(report.exited.is_empty());
    state.settle();

    let after: Vec<(String, MarkAttributes)> = state
        .marks()
        .map(|mark| (mark.key().to_owned(), *mark.attributes()))
        .collect();
    assert_eq!(before, after);
    assert!(state.is_idle());
}

#[test]
fn back_to_back_reconciles_never_duplicate_marks() {
    let mut state = ChartState::default();
    reconcile(&mut state, &[datum("A", 10.0), datum("B", 20.0)], key_of, &encode, 0.0);
    reconcile(&mut state, &[datum("B", 5.0), datum("A", 50.0)], key_of, &encode, 100.0);
    reconcile(&mut state, &[datum("A", 1.0), datum("B", 2.0)], key_of, &encode, 150.0);
    assert_eq!(state.len(), 2);

    state.settle();
    assert_eq!(state.len(), 2);
    assert!((state.mark("A").expect("A").attributes().width - 1.0).abs() <= 1e-9);
    assert!((state.mark("B").expect("B").attributes().width - 2.0).abs() <= 1e-9);
}

#[test]
fn interrupted_exit_revives_the_same_mark() {
    let mut state = ChartState::default();
    reconcile(&mut state, &[datum("A", 10.0), datum("B", 20.0)], key_of, &encode, 0.0);
    state.settle();
    let a_id = state.mark("A").expect("A").id();
    let start = state.now_ms();

    reconcile(&mut state, &[datum("B", 20.0)], key_of, &encode, start);
    assert_eq!(state.mark("A").expect("A").phase(), MarkPhase::Exiting);
    state.advance(start + 200.0);
    let fading = state.mark("A").expect("A").attributes().opacity;
    assert!(fading > 0.0 && fading < 1.0);

    let report = reconcile(
        &mut state,
        &[datum("A", 10.0), datum("B", 20.0)],
        key_of,
        &encode,
        start + 200.0,
    );
    assert_eq!(report.revived, vec!["A".to_owned()]);
    assert!(report.entered.is_empty());

    state.settle();
    let a = state.mark("A").expect("A survives");
    assert_eq!(a.id(), a_id);
    assert_eq!(a.phase(), MarkPhase::Live);
    assert_eq!(a.attributes().opacity, 1.0);
    assert_eq!(state.len(), 2);
}

#[test]
fn updates_are_staggered_by_position() {
    let mut state = ChartState::new(TransitionTiming::default().with_stagger_ms(20.0));
    let data = [datum("A", 1.0), datum("B", 2.0), datum("C", 3.0)];
    reconcile(&mut state, &data, key_of, &encode, 0.0);
    state.settle();
    let now = state.now_ms();

    let next = [datum("A", 4.0), datum("B", 5.0), datum("C", 6.0)];
    reconcile(&mut state, &next, key_of, &encode, now);
    for (index, key) in ["A", "B", "C"].into_iter().enumerate() {
        let transition = state
            .mark(key)
            .and_then(|mark| mark.transition())
            .expect("update transition");
        assert!((transition.start_ms - (now + 20.0 * index as f64)).abs() <= 1e-9);
        assert!((transition.duration_ms - 1_000.0).abs() <= 1e-9);
    }

    // C has not started yet 30ms in.
    state.advance(now + 30.0);
    assert!((state.mark("C").expect("C").attributes().width - 3.0).abs() <= 1e-9);
}

#[test]
fn linear_easing_interpolates_proportionally() {
    let timing = TransitionTiming::default()
        .with_stagger_ms(0.0)
        .with_easing(Easing::Linear);
    let mut state = ChartState::new(timing);
    reconcile(&mut state, &[datum("A", 0.0)], key_of, &encode, 0.0);
    state.settle();
    assert!(!state.mark("A").expect("A").is_animating());
    let now = state.now_ms();

    reconcile(&mut state, &[datum("A", 100.0)], key_of, &encode, now);
    assert!(state.mark("A").expect("A").is_animating());

    state.advance(now + 250.0);
    assert!((state.mark("A").expect("A").attributes().width - 25.0).abs() <= 1e-9);

    state.settle();
    let mark = state.mark("A").expect("A");
    assert!(!mark.is_animating());
    assert!((mark.attributes().width - 100.0).abs() <= 1e-9);
}

#[test]
fn exit_completes_after_exit_ratio_of_duration() {
    let timing = TransitionTiming::default()
        .with_duration_ms(1_000.0)
        .with_exit_ratio(0.5);
    let mut state = ChartState::with_timing(timing).expect("timing");
    reconcile(&mut state, &[datum("A", 1.0)], key_of, &encode, 0.0);
    state.settle();
    let start = state.now_ms();

    reconcile(&mut state, &[], key_of, &encode, start);
    let instructions = state.advance(start + 499.0);
    assert!(state.mark("A").is_some());
    assert!(!instructions
        .iter()
        .any(|instruction| matches!(instruction, MarkInstruction::Remove { .. })));

    let instructions = state.advance(start + 500.0);
    assert!(state.mark("A").is_none());
    assert!(state.is_empty());
    assert!(instructions
        .iter()
        .any(|instruction| matches!(instruction, MarkInstruction::Remove { key, .. } if key == "A")));
}

#[test]
fn immediate_timing_lands_within_the_call() {
    let mut state = ChartState::new(TransitionTiming::immediate());
    reconcile(&mut state, &[datum("A", 7.0)], key_of, &encode, 0.0);
    let a = state.mark("A").expect("A");
    assert_eq!(a.phase(), MarkPhase::Live);
    assert_eq!(a.attributes().width, 7.0);

    let report = reconcile(&mut state, &[], key_of, &encode, 0.0);
    assert!(state.is_empty());
    assert!(report
        .instructions
        .iter()
        .any(|instruction| matches!(instruction, MarkInstruction::Remove { .. })));
}

#[test]
fn failing_encoder_degrades_only_the_bad_mark() {
    let encoder = |datum: &Datum, index: usize| -> ChartResult<MarkAttributes> {
        match datum.key {
            "bad" => Err(ChartError::InvalidData("missing field".to_owned())),
            "nan" => Ok(MarkAttributes::rect(0.0, 0.0, f64::NAN, 8.0, Color::DODGER_BLUE)),
            _ => encode(datum, index),
        }
    };
    let mut state = ChartState::default();
    let data = [datum("A", 1.0), datum("bad", 2.0), datum("nan", 3.0), datum("C", 4.0)];
    let report = reconcile(&mut state, &data, key_of, &encoder, 0.0);
    assert_eq!(report.degraded, vec!["bad".to_owned(), "nan".to_owned()]);
    assert_eq!(state.len(), 4);

    state.settle();
    assert_eq!(*state.mark("bad").expect("bad").attributes(), MarkAttributes::default());
    assert_eq!(state.mark("nan").expect("nan").attributes().width, 0.0);
    assert!((state.mark("C").expect("C").attributes().width - 4.0).abs() <= 1e-9);
}

#[test]
fn duplicate_keys_keep_the_first_datum() {
    let mut state = ChartState::default();
    let report = reconcile(
        &mut state,
        &[datum("A", 1.0), datum("A", 99.0), datum("B", 2.0)],
        key_of,
        &encode,
        0.0,
    );
    assert_eq!(report.duplicates, vec!["A".to_owned()]);
    state.settle();
    assert_eq!(state.len(), 2);
    assert_eq!(state.mark("A").expect("A").attributes().width, 1.0);
    assert_eq!(state.mark("B").expect("B").index(), 1);
}

#[test]
fn marks_follow_new_data_order_with_exiting_marks_last() {
    let mut state = ChartState::default();
    reconcile(
        &mut state,
        &[datum("A", 1.0), datum("B", 2.0), datum("C", 3.0)],
        key_of,
        &encode,
        0.0,
    );
    state.settle();
    let now = state.now_ms();
    reconcile(&mut state, &[datum("C", 3.0), datum("D", 4.0)], key_of, &encode, now);
    let order: Vec<&str> = state.keys().collect();
    assert_eq!(order, vec!["C", "D", "A", "B"]);
}

#[test]
fn clock_never_moves_backwards() {
    let mut state = ChartState::default();
    reconcile(&mut state, &[datum("A", 1.0)], key_of, &encode, 500.0);
    state.advance(100.0);
    assert_eq!(state.now_ms(), 500.0);
    state.advance(f64::NAN);
    assert_eq!(state.now_ms(), 500.0);
    assert_eq!(state.generation(), 1);
}

#[test]
fn axis_ticks_settle_on_new_positions() {
    let mut state = ChartState::default();
    state.retarget_axis(
        AxisPosition::Left,
        &[AxisTick::new("0", 300.0), AxisTick::new("1 mil", 0.0)],
    );
    state.settle();
    let now = state.now_ms();
    reconcile(&mut state, &[datum("A", 1.0)], key_of, &encode, now);
    state.retarget_axis(
        AxisPosition::Left,
        &[AxisTick::new("0", 300.0), AxisTick::new("2 mil", 0.0)],
    );
    assert!(!state.is_idle());

    state.settle();
    assert!(state.is_idle());
    let ticks: Vec<_> = state.axis(AxisPosition::Left).expect("axis").ticks().collect();
    assert_eq!(ticks.len(), 2);
    assert!(ticks.iter().all(|tick| tick.opacity == 1.0));
    let moved = ticks
        .iter()
        .find(|tick| tick.label == "2 mil")
        .expect("new tick");
    assert!(moved.position.abs() <= 1e-9);
    assert!(!ticks.iter().any(|tick| tick.label == "1 mil"));
}

#[test]
fn invalid_timing_is_rejected() {
    let err = ChartState::with_timing(TransitionTiming::default().with_duration_ms(-1.0))
        .expect_err("negative duration");
    assert!(matches!(err, ChartError::InvalidTiming(_)));
}
