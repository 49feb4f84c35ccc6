#![forbid(unsafe_code)]

//! Pinning policy: the discrete widths a side-by-side pane can rest at.
//!
//! # Invariants
//!
//! 1. [`width_for`] is pure and never negative for non-negative input.
//! 2. [`closest_state`] prefers earlier states in [`PinningState::ALL`] on
//!    ties; a later state wins only when strictly closer.
//! 3. For any side-by-side width, `closest_state(width_for(s, w), w, m) == s`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Resting width of the secondary pane in side-by-side mode, ordered by
/// openness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinningState {
    /// Pane is exactly the configured minimum width.
    OpenDefault,
    /// Pane takes half of the available width.
    OpenHalf,
    /// Pane is hidden.
    #[default]
    Closed,
}

impl PinningState {
    /// All states in tie-break order.
    pub const ALL: [Self; 3] = [Self::OpenDefault, Self::OpenHalf, Self::Closed];

    /// Target pane width for this state.
    #[must_use]
    pub fn width(self, available_width: f64, minimum_width: f64) -> f64 {
        width_for(self, available_width, minimum_width)
    }

    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Closed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenDefault => "open_default",
            Self::OpenHalf => "open_half",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for PinningState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target pane width for `state` within `available_width`.
#[must_use]
pub fn width_for(state: PinningState, available_width: f64, minimum_width: f64) -> f64 {
    match state {
        PinningState::OpenDefault => minimum_width,
        PinningState::OpenHalf => available_width / 2.0,
        PinningState::Closed => 0.0,
    }
}

/// Pinning state whose target width is nearest to `current_width`.
///
/// Used to pick the snap target when a side-by-side drag is released.
#[must_use]
pub fn closest_state(current_width: f64, available_width: f64, minimum_width: f64) -> PinningState {
    let distance = |state: PinningState| {
        (current_width - width_for(state, available_width, minimum_width)).abs()
    };

    let mut best = PinningState::ALL[0];
    let mut best_distance = distance(best);
    for state in PinningState::ALL.into_iter().skip(1) {
        let candidate = distance(state);
        if candidate < best_distance {
            best = state;
            best_distance = candidate;
        }
    }
    best
}
