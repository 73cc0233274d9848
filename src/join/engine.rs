use std::cmp::Ordering;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{ChartError, ChartResult};

use super::axis::{AxisPosition, AxisState, AxisTick};
use super::mark::{MarkAttributes, MarkId, MarkInstruction, MarkPhase, VisualMark};
use super::timing::TransitionTiming;
use super::transition::Transition;

/// Computes mark attributes for one datum.
///
/// `index` is the datum's position in the reconciled sequence.
pub trait MarkEncoder<D: ?Sized> {
    /// Final attributes of the mark bound to `datum`.
    fn target(&self, datum: &D, index: usize) -> ChartResult<MarkAttributes>;

    /// Pre-animation attributes of a newly created mark. Defaults to a fade-in.
    fn initial(&self, _datum: &D, _index: usize, target: &MarkAttributes) -> MarkAttributes {
        target.with_opacity(0.0)
    }

    /// Attributes an exiting mark fades toward.
    fn exit(&self, current: &MarkAttributes) -> MarkAttributes {
        current.with_opacity(0.0)
    }
}

impl<D: ?Sized, F> MarkEncoder<D> for F
where
    F: Fn(&D, usize) -> ChartResult<MarkAttributes>,
{
    fn target(&self, datum: &D, index: usize) -> ChartResult<MarkAttributes> {
        self(datum, index)
    }
}

/// Outcome of one `reconcile` call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub entered: Vec<String>,
    pub updated: Vec<String>,
    pub exited: Vec<String>,
    /// Updated keys whose marks were mid-exit and got redirected back.
    pub revived: Vec<String>,
    /// Keys rendered with default attributes after an encoder failure.
    pub degraded: Vec<String>,
    /// Keys dropped because they repeated an earlier datum's key.
    pub duplicates: Vec<String>,
    /// Mutations produced by this call, in render order.
    pub instructions: Vec<MarkInstruction>,
}

/// Per-chart reconciliation state: live marks, axes and the animation clock.
///
/// Owned by the caller and handed to `reconcile`/`advance`; nothing else
/// reads or writes the live mark set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartState {
    marks: IndexMap<String, VisualMark>,
    axes: IndexMap<AxisPosition, AxisState>,
    timing: TransitionTiming,
    now_ms: f64,
    next_mark_id: u64,
    generation: u64,
}

impl Default for ChartState {
    fn default() -> Self {
        Self::new(TransitionTiming::default())
    }
}

impl ChartState {
    #[must_use]
    pub fn new(timing: TransitionTiming) -> Self {
        Self {
            marks: IndexMap::new(),
            axes: IndexMap::new(),
            timing,
            now_ms: 0.0,
            next_mark_id: 0,
            generation: 0,
        }
    }

    pub fn with_timing(timing: TransitionTiming) -> ChartResult<Self> {
        Ok(Self::new(timing.validate()?))
    }

    #[must_use]
    pub fn timing(&self) -> TransitionTiming {
        self.timing
    }

    /// Replaces timing for transitions scheduled from now on.
    pub fn set_timing(&mut self, timing: TransitionTiming) -> ChartResult<()> {
        self.timing = timing.validate()?;
        Ok(())
    }

    #[must_use]
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Number of completed `reconcile` calls.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    #[must_use]
    pub fn mark(&self, key: &str) -> Option<&VisualMark> {
        self.marks.get(key)
    }

    /// Live marks in render order: current data order, exiting marks last.
    pub fn marks(&self) -> impl Iterator<Item = &VisualMark> {
        self.marks.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.marks.keys().map(String::as_str)
    }

    #[must_use]
    pub fn axis(&self, position: AxisPosition) -> Option<&AxisState> {
        self.axes.get(&position)
    }

    /// Moves an axis to new ticks on the same schedule as the marks.
    pub fn retarget_axis(&mut self, position: AxisPosition, ticks: &[AxisTick]) {
        let now_ms = self.now_ms;
        let timing = self.timing;
        self.axes
            .entry(position)
            .or_insert_with(|| AxisState::new(position))
            .retarget(ticks, now_ms, timing.duration_ms, timing.easing);
    }

    /// True when no mark or axis transition is pending.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.marks.values().all(|mark| mark.transition.is_none())
            && self.axes.values().all(AxisState::is_idle)
    }

    /// Steps the clock and returns the resulting render mutations.
    ///
    /// Clock values older than the current one are clamped.
    pub fn advance(&mut self, now_ms: f64) -> Vec<MarkInstruction> {
        let now_ms = self.clamp_clock(now_ms);
        let instructions = self.step_marks(now_ms);
        for axis in self.axes.values_mut() {
            axis.advance(now_ms);
        }
        instructions
    }

    /// Fast-forwards every pending transition to completion.
    pub fn settle(&mut self) -> Vec<MarkInstruction> {
        let mark_end = self
            .marks
            .values()
            .filter_map(|mark| mark.transition.as_ref().map(Transition::end_ms))
            .fold(self.now_ms, f64::max);
        let axis_end = self
            .axes
            .values()
            .filter(|axis| !axis.is_idle())
            .map(AxisState::end_ms)
            .fold(mark_end, f64::max);
        self.advance(axis_end)
    }

    fn clamp_clock(&mut self, now_ms: f64) -> f64 {
        if now_ms.is_finite() && now_ms > self.now_ms {
            self.now_ms = now_ms;
        }
        self.now_ms
    }

    fn allocate_id(&mut self) -> MarkId {
        let id = MarkId::new(self.next_mark_id);
        self.next_mark_id += 1;
        id
    }

    fn step_marks(&mut self, now_ms: f64) -> Vec<MarkInstruction> {
        let mut instructions = Vec::new();
        let mut removed = Vec::new();

        for mark in self.marks.values_mut() {
            let Some(transition) = mark.transition else {
                continue;
            };
            let next = transition.sample(now_ms);
            if transition.is_complete(now_ms) {
                mark.transition = None;
                mark.phase = mark.phase.settled();
            }
            if mark.phase == MarkPhase::Removed {
                removed.push(mark.key.clone());
                continue;
            }
            let changes = mark.attributes.changes_to(&next);
            mark.attributes = next;
            if !changes.is_empty() {
                instructions.push(MarkInstruction::Update {
                    key: mark.key.clone(),
                    id: mark.id,
                    changes,
                });
            }
        }

        for key in removed {
            if let Some(mark) = self.marks.shift_remove(&key) {
                trace!(key = %mark.key, id = mark.id.get(), "mark removed");
                instructions.push(MarkInstruction::Remove {
                    key: mark.key,
                    id: mark.id,
                });
            }
        }
        instructions
    }
}

/// Brings `state`'s marks in sync with `data`.
///
/// New keys enter from the encoder's initial attributes, surviving keys are
/// redirected from their current attributes with a per-index stagger, and
/// missing keys fade out over the exit duration before removal. Transitions
/// already in flight are redirected, never stacked.
pub fn reconcile<D, K, E>(
    state: &mut ChartState,
    data: &[D],
    key_fn: K,
    encoder: &E,
    now_ms: f64,
) -> ReconcileReport
where
    K: Fn(&D) -> String,
    E: MarkEncoder<D> + ?Sized,
{
    let mut report = ReconcileReport::default();
    let now_ms = state.clamp_clock(now_ms);
    report.instructions = state.step_marks(now_ms);
    let timing = state.timing;

    let mut new_keys: IndexSet<String> = IndexSet::with_capacity(data.len());
    for (index, datum) in data.iter().enumerate() {
        let key = key_fn(datum);
        if new_keys.contains(&key) {
            warn!(key = %key, "duplicate key in reconciled data; keeping first datum");
            report.duplicates.push(key);
            continue;
        }
        let position = new_keys.len();
        new_keys.insert(key.clone());

        let target = match encode_target(encoder, datum, index, &key) {
            Ok(target) => target,
            Err(err) => {
                warn!(error = %err, "using default attributes for mark");
                report.degraded.push(key.clone());
                MarkAttributes::default()
            }
        };

        match state.marks.get_mut(&key) {
            Some(mark) => {
                if mark.phase == MarkPhase::Exiting {
                    report.revived.push(key.clone());
                }
                let delay = timing.update_delay_ms(position);
                mark.transition = Some(Transition::new(
                    mark.attributes,
                    target,
                    now_ms + delay,
                    timing.duration_ms,
                    timing.easing,
                ));
                mark.phase = MarkPhase::Updating;
                mark.index = position;
                report.updated.push(key);
            }
            None => {
                let initial = encoder.initial(datum, index, &target);
                let id = state.allocate_id();
                report.instructions.push(MarkInstruction::Create {
                    key: key.clone(),
                    id,
                    attributes: initial,
                });
                state.marks.insert(
                    key.clone(),
                    VisualMark {
                        id,
                        key: key.clone(),
                        index: position,
                        attributes: initial,
                        phase: MarkPhase::Entering,
                        transition: Some(Transition::new(
                            initial,
                            target,
                            now_ms,
                            timing.duration_ms,
                            timing.easing,
                        )),
                    },
                );
                report.entered.push(key);
            }
        }
    }

    for mark in state.marks.values_mut() {
        if new_keys.contains(&mark.key) || mark.phase == MarkPhase::Exiting {
            continue;
        }
        let faded = encoder.exit(&mark.attributes);
        mark.transition = Some(Transition::new(
            mark.attributes,
            faded,
            now_ms,
            timing.exit_duration_ms(),
            timing.easing,
        ));
        mark.phase = MarkPhase::Exiting;
        report.exited.push(mark.key.clone());
    }

    // Render order: new data order, then exiting marks in their prior order.
    state.marks.sort_by(|left_key, _, right_key, _| {
        match (
            new_keys.get_index_of(left_key),
            new_keys.get_index_of(right_key),
        ) {
            (Some(left_rank), Some(right_rank)) => left_rank.cmp(&right_rank),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });

    // Zero-length transitions land in the same call.
    report.instructions.extend(state.step_marks(now_ms));
    state.generation += 1;

    debug!(
        generation = state.generation,
        entered = report.entered.len(),
        updated = report.updated.len(),
        exited = report.exited.len(),
        revived = report.revived.len(),
        degraded = report.degraded.len(),
        live = state.marks.len(),
        "reconciled marks"
    );
    report
}

fn encode_target<D, E>(encoder: &E, datum: &D, index: usize, key: &str) -> ChartResult<MarkAttributes>
where
    E: MarkEncoder<D> + ?Sized,
{
    let target = encoder.target(datum, index).map_err(|err| ChartError::Attribute {
        key: key.to_owned(),
        reason: err.to_string(),
    })?;
    let invalid = target.invalid_fields();
    if !invalid.is_empty() {
        return Err(ChartError::Attribute {
            key: key.to_owned(),
            reason: format!("invalid attribute values: {}", invalid.join(", ")),
        });
    }
    Ok(target)
}
