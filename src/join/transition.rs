use serde::{Deserialize, Serialize};

use super::mark::MarkAttributes;
use super::timing::Easing;

/// Scheduled interpolation between two attribute sets.
///
/// Before `start_ms` the mark holds `from`; after `start_ms + duration_ms`
/// it holds `to`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub from: MarkAttributes,
    pub to: MarkAttributes,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Transition {
    #[must_use]
    pub fn new(
        from: MarkAttributes,
        to: MarkAttributes,
        start_ms: f64,
        duration_ms: f64,
        easing: Easing,
    ) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms: duration_ms.max(0.0),
            easing,
        }
    }

    #[must_use]
    pub fn end_ms(&self) -> f64 {
        self.start_ms + self.duration_ms
    }

    /// Linear progress in `[0, 1]` at `now_ms`.
    #[must_use]
    pub fn progress(&self, now_ms: f64) -> f64 {
        if now_ms < self.start_ms {
            return 0.0;
        }
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn is_complete(&self, now_ms: f64) -> bool {
        now_ms >= self.end_ms()
    }

    #[must_use]
    pub fn sample(&self, now_ms: f64) -> MarkAttributes {
        if self.is_complete(now_ms) {
            return self.to;
        }
        self.from
            .lerp(&self.to, self.easing.apply(self.progress(now_ms)))
    }
}
