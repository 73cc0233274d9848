use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::timing::Easing;

/// Edge of the plot area an axis is drawn along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisPosition {
    Top,
    Right,
    Bottom,
    Left,
}

/// Target tick produced from a scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    pub label: String,
    /// Pixel offset along the axis, relative to the plot area.
    pub position: f64,
}

impl AxisTick {
    #[must_use]
    pub fn new(label: impl Into<String>, position: f64) -> Self {
        Self {
            label: label.into(),
            position,
        }
    }
}

/// Tick as currently drawn, mid-transition values included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedTick {
    pub label: String,
    pub position: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct AnimatedTick {
    from_position: f64,
    to_position: f64,
    from_opacity: f64,
    to_opacity: f64,
    position: f64,
    opacity: f64,
}

impl AnimatedTick {
    fn entering(position: f64) -> Self {
        Self {
            from_position: position,
            to_position: position,
            from_opacity: 0.0,
            to_opacity: 1.0,
            position,
            opacity: 0.0,
        }
    }

    fn retarget(&mut self, position: f64, opacity: f64) {
        self.from_position = self.position;
        self.from_opacity = self.opacity;
        self.to_position = position;
        self.to_opacity = opacity;
    }

    fn sample(&mut self, t: f64) {
        self.position = self.from_position + (self.to_position - self.from_position) * t;
        self.opacity = self.from_opacity + (self.to_opacity - self.from_opacity) * t;
        if t >= 1.0 {
            self.position = self.to_position;
            self.opacity = self.to_opacity;
        }
    }

    fn is_leaving(&self) -> bool {
        self.to_opacity == 0.0
    }
}

/// Animated tick set of one axis, keyed by label.
///
/// Retargeting moves surviving ticks to their new positions, fades new
/// ticks in and fades vanished ticks out, all on one shared schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisState {
    position: AxisPosition,
    ticks: IndexMap<String, AnimatedTick>,
    start_ms: f64,
    duration_ms: f64,
    easing: Easing,
    animating: bool,
}

impl AxisState {
    #[must_use]
    pub fn new(position: AxisPosition) -> Self {
        Self {
            position,
            ticks: IndexMap::new(),
            start_ms: 0.0,
            duration_ms: 0.0,
            easing: Easing::default(),
            animating: false,
        }
    }

    #[must_use]
    pub fn position(&self) -> AxisPosition {
        self.position
    }

    pub fn retarget(&mut self, ticks: &[AxisTick], now_ms: f64, duration_ms: f64, easing: Easing) {
        self.advance(now_ms);

        for animated in self.ticks.values_mut() {
            let position = animated.position;
            animated.retarget(position, 0.0);
        }
        for tick in ticks {
            match self.ticks.get_mut(&tick.label) {
                Some(animated) => animated.retarget(tick.position, 1.0),
                None => {
                    let mut animated = AnimatedTick::entering(tick.position);
                    animated.retarget(tick.position, 1.0);
                    self.ticks.insert(tick.label.clone(), animated);
                }
            }
        }

        self.start_ms = now_ms;
        self.duration_ms = duration_ms.max(0.0);
        self.easing = easing;
        self.animating = true;
        self.advance(now_ms);
    }

    pub fn advance(&mut self, now_ms: f64) {
        if !self.animating {
            return;
        }
        let progress = if self.duration_ms <= 0.0 {
            1.0
        } else {
            ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
        };
        let eased = if progress >= 1.0 {
            1.0
        } else {
            self.easing.apply(progress)
        };
        for animated in self.ticks.values_mut() {
            animated.sample(eased);
        }
        if progress >= 1.0 {
            self.ticks.retain(|_, animated| !animated.is_leaving());
            self.animating = false;
        }
    }

    #[must_use]
    pub fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        !self.animating
    }

    pub fn ticks(&self) -> impl Iterator<Item = RenderedTick> + '_ {
        self.ticks.iter().map(|(label, animated)| RenderedTick {
            label: label.clone(),
            position: animated.position,
            opacity: animated.opacity,
        })
    }
}
