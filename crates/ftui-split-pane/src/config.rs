#![forbid(unsafe_code)]

//! Static controller configuration.
//!
//! All fields have defaults, so a partial TOML document only overrides the
//! keys it names:
//!
//! ```ignore
//! let config = SplitPaneConfig::from_toml_str("minimum_width = 280.0")?;
//! assert_eq!(config.modal_gap, 20.0);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Default minimum pane width in points.
pub const DEFAULT_MINIMUM_WIDTH: f64 = 320.0;

/// Default gap left uncovered on the leading side of an open modal pane.
pub const DEFAULT_MODAL_GAP: f64 = 20.0;

/// Behavior knobs for one split pane controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitPaneConfig {
    /// Width of the pane when pinned `OpenDefault`; also the floor while
    /// dragging side-by-side.
    pub minimum_width: f64,
    /// Uncovered strip to the leading side of an open modal pane.
    pub modal_gap: f64,
    /// Allow a swipe to open the pane while it is closed.
    pub can_open_with_swipe: bool,
    /// Allow dragging the modal pane by its body, not only by its handle.
    pub allow_drag_modal: bool,
    /// Blur both panes while the side-by-side width animates.
    pub blur_on_resize: bool,
    pub animation: AnimationTiming,
    pub handles: HandleMetrics,
}

impl Default for SplitPaneConfig {
    fn default() -> Self {
        Self {
            minimum_width: DEFAULT_MINIMUM_WIDTH,
            modal_gap: DEFAULT_MODAL_GAP,
            can_open_with_swipe: true,
            allow_drag_modal: true,
            blur_on_resize: true,
            animation: AnimationTiming::default(),
            handles: HandleMetrics::default(),
        }
    }
}

impl SplitPaneConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigurationError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the geometry arithmetic cannot work with.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.minimum_width.is_finite() || self.minimum_width <= 0.0 {
            return Err(ConfigurationError::InvalidMinimumWidth {
                value: self.minimum_width,
            });
        }
        if !self.modal_gap.is_finite() || self.modal_gap < 0.0 {
            return Err(ConfigurationError::InvalidModalGap {
                value: self.modal_gap,
            });
        }
        self.handles.validate()
    }

    /// Narrowest view width that still shows both panes side by side.
    #[must_use]
    pub fn side_by_side_threshold(&self) -> f64 {
        crate::presentation::side_by_side_threshold(self.minimum_width, self.modal_gap)
    }
}

/// Animation durations, in milliseconds so TOML stays readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationTiming {
    /// Show, dismiss and snap transitions.
    pub transition_ms: u32,
    /// Fade in/out of the resize blur.
    pub blur_fade_ms: u32,
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            transition_ms: 300,
            blur_fade_ms: 100,
        }
    }
}

impl AnimationTiming {
    #[must_use]
    pub fn transition(self) -> Duration {
        Duration::from_millis(u64::from(self.transition_ms))
    }

    #[must_use]
    pub fn blur_fade(self) -> Duration {
        Duration::from_millis(u64::from(self.blur_fade_ms))
    }
}

/// Touch target sizes for the drag handles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandleMetrics {
    /// Width of the touch area centered on the side-by-side grip.
    pub side_handle_width: f64,
    /// Width of the touch area along the modal pane's leading edge.
    pub modal_handle_width: f64,
    /// How far the modal touch area extends past the modal's leading edge.
    pub modal_handle_overhang: f64,
    /// Offset of the visible grip's center from the side container's
    /// leading edge.
    pub side_grip_inset: f64,
}

impl Default for HandleMetrics {
    fn default() -> Self {
        Self {
            side_handle_width: 88.0,
            modal_handle_width: 110.0,
            modal_handle_overhang: 44.0,
            side_grip_inset: 5.0,
        }
    }
}

impl HandleMetrics {
    fn validate(&self) -> Result<(), ConfigurationError> {
        for (field, value) in [
            ("side_handle_width", self.side_handle_width),
            ("modal_handle_width", self.modal_handle_width),
            ("modal_handle_overhang", self.modal_handle_overhang),
            ("side_grip_inset", self.side_grip_inset),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidHandleMetric { field, value });
            }
        }
        Ok(())
    }
}
