use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::render::Color;

use super::transition::Transition;

/// Geometric and paint attributes of one visual mark.
///
/// Rect marks use `x/y/width/height`; circle marks use `x/y` as the center
/// plus `radius`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkAttributes {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub fill: Color,
    pub opacity: f64,
}

impl Default for MarkAttributes {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            radius: 0.0,
            fill: Color::LABEL_GREY,
            opacity: 1.0,
        }
    }
}

impl MarkAttributes {
    #[must_use]
    pub fn rect(x: f64, y: f64, width: f64, height: f64, fill: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn circle(cx: f64, cy: f64, radius: f64, fill: Color) -> Self {
        Self {
            x: cx,
            y: cy,
            radius,
            fill,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    #[must_use]
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }

    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Interpolates every attribute toward `target` by eased progress `t`.
    #[must_use]
    pub fn lerp(&self, target: &MarkAttributes, t: f64) -> Self {
        if t >= 1.0 {
            return *target;
        }
        let t = t.max(0.0);
        let mix = |from: f64, to: f64| from + (to - from) * t;
        Self {
            x: mix(self.x, target.x),
            y: mix(self.y, target.y),
            width: mix(self.width, target.width),
            height: mix(self.height, target.height),
            radius: mix(self.radius, target.radius),
            fill: self.fill.lerp(target.fill, t),
            opacity: mix(self.opacity, target.opacity),
        }
    }

    /// Names of attributes holding a non-finite or out-of-range value.
    #[must_use]
    pub fn invalid_fields(&self) -> SmallVec<[&'static str; 4]> {
        let mut invalid = SmallVec::new();
        for (name, value) in [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
            ("radius", self.radius),
        ] {
            if !value.is_finite() {
                invalid.push(name);
            }
        }
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            invalid.push("opacity");
        }
        if self.fill.validate().is_err() {
            invalid.push("fill");
        }
        invalid
    }

    /// Attribute assignments needed to turn `self` into `next`.
    #[must_use]
    pub fn changes_to(&self, next: &MarkAttributes) -> SmallVec<[AttributeChange; 4]> {
        let mut changes = SmallVec::new();
        if self.x != next.x {
            changes.push(AttributeChange::X(next.x));
        }
        if self.y != next.y {
            changes.push(AttributeChange::Y(next.y));
        }
        if self.width != next.width {
            changes.push(AttributeChange::Width(next.width));
        }
        if self.height != next.height {
            changes.push(AttributeChange::Height(next.height));
        }
        if self.radius != next.radius {
            changes.push(AttributeChange::Radius(next.radius));
        }
        if self.fill != next.fill {
            changes.push(AttributeChange::Fill(next.fill));
        }
        if self.opacity != next.opacity {
            changes.push(AttributeChange::Opacity(next.opacity));
        }
        changes
    }
}

/// One attribute assignment on a rendered mark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AttributeChange {
    X(f64),
    Y(f64),
    Width(f64),
    Height(f64),
    Radius(f64),
    Fill(Color),
    Opacity(f64),
}

/// Lifecycle phase of a mark.
///
/// `Entering`/`Updating` settle into `Live`; `Exiting` settles into `Removed`,
/// after which the mark leaves the live set. A reconcile that brings an
/// exiting key back moves the mark to `Updating`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkPhase {
    Entering,
    Live,
    Updating,
    Exiting,
    Removed,
}

impl MarkPhase {
    /// Phase reached once the in-flight transition completes.
    #[must_use]
    pub const fn settled(self) -> Self {
        match self {
            Self::Entering | Self::Updating | Self::Live => Self::Live,
            Self::Exiting | Self::Removed => Self::Removed,
        }
    }
}

/// Identity of one mark instance; never reused within a `ChartState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarkId(u64);

impl MarkId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Persistent visual representation of one data key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualMark {
    pub(super) id: MarkId,
    pub(super) key: String,
    pub(super) index: usize,
    pub(super) attributes: MarkAttributes,
    pub(super) phase: MarkPhase,
    pub(super) transition: Option<Transition>,
}

impl VisualMark {
    #[must_use]
    pub fn id(&self) -> MarkId {
        self.id
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Position of the bound datum in the latest reconciled sequence.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Attributes as currently rendered.
    #[must_use]
    pub fn attributes(&self) -> &MarkAttributes {
        &self.attributes
    }

    /// Attributes the mark is heading to (current ones when idle).
    #[must_use]
    pub fn target(&self) -> &MarkAttributes {
        self.transition
            .as_ref()
            .map_or(&self.attributes, |transition| &transition.to)
    }

    #[must_use]
    pub fn phase(&self) -> MarkPhase {
        self.phase
    }

    #[must_use]
    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }
}

/// Explicit render-tree mutation emitted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MarkInstruction {
    Create {
        key: String,
        id: MarkId,
        attributes: MarkAttributes,
    },
    Update {
        key: String,
        id: MarkId,
        changes: SmallVec<[AttributeChange; 4]>,
    },
    Remove {
        key: String,
        id: MarkId,
    },
}

impl MarkInstruction {
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Create { key, .. } | Self::Update { key, .. } | Self::Remove { key, .. } => key,
        }
    }

    #[must_use]
    pub fn id(&self) -> MarkId {
        match self {
            Self::Create { id, .. } | Self::Update { id, .. } | Self::Remove { id, .. } => *id,
        }
    }
}
