//! Majority-vote gesture debouncing
//!
//! Per-frame hand detection flickers: single-frame misses and false hits are
//! common. Each tracked label keeps a short presence history and only counts
//! as stable while it holds a strict majority of that window.

use crate::detection::Detection;
use crate::error::ConfigError;
use crate::gesture::{Gesture, HandLabel};
use crate::ring::BoundedHistory;
use std::num::NonZeroUsize;
use tracing::debug;

/// Strict majority of `true` entries. Ties and empty windows are not stable.
pub fn is_majority(history: &BoundedHistory<bool>) -> bool {
    let present = history.iter().filter(|&&seen| seen).count();
    present * 2 > history.len()
}

/// Highest-priority stable label, if any.
pub fn resolve<F>(is_stable: F) -> Gesture
where
    F: Fn(HandLabel) -> bool,
{
    HandLabel::PRIORITY
        .into_iter()
        .find(|&label| is_stable(label))
        .map(Gesture::from)
        .unwrap_or(Gesture::None)
}

/// Debounces raw detection sets into a single [`Gesture`] per cycle.
#[derive(Debug, Clone)]
pub struct GestureStabilizer {
    histories: [BoundedHistory<bool>; 3],
    current: Gesture,
}

impl GestureStabilizer {
    pub fn new(history_size: usize) -> Result<Self, ConfigError> {
        let capacity = NonZeroUsize::new(history_size).ok_or(ConfigError::ZeroGestureHistory)?;

        Ok(Self {
            histories: std::array::from_fn(|_| BoundedHistory::new(capacity)),
            current: Gesture::None,
        })
    }

    /// Record this frame's detections and return the stabilized gesture.
    ///
    /// An empty slice is a regular frame with every label absent.
    pub fn classify(&mut self, detections: &[Detection]) -> Gesture {
        let mut seen = [false; 3];
        for label in detections.iter().filter_map(Detection::hand_label) {
            seen[label.index()] = true;
        }

        for (history, present) in self.histories.iter_mut().zip(seen) {
            history.push(present);
        }

        let gesture = resolve(|label| self.is_stable(label));
        if gesture != self.current {
            debug!(from = %self.current, to = %gesture, "stabilized gesture changed");
            self.current = gesture;
        }
        gesture
    }

    pub fn is_stable(&self, label: HandLabel) -> bool {
        is_majority(&self.histories[label.index()])
    }

    /// Gesture reported by the latest [`classify`](Self::classify) call.
    pub fn current(&self) -> Gesture {
        self.current
    }

    pub fn history(&self, label: HandLabel) -> &BoundedHistory<bool> {
        &self.histories[label.index()]
    }

    pub fn reset(&mut self) {
        for history in &mut self.histories {
            history.clear();
        }
        self.current = Gesture::None;
    }
}
