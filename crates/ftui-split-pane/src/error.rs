#![forbid(unsafe_code)]

//! Construction-time failures.
//!
//! The geometry state machine itself never fails at runtime: out-of-range
//! input is clamped and malformed gesture sequences are reported as no-op
//! effects. Only building a controller (from config, a builder, or a decoded
//! snapshot) can be rejected.

use thiserror::Error;

use crate::ViewId;

/// Rejected controller configuration or construction input.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("invalid minimum_width {value} (must be finite and > 0)")]
    InvalidMinimumWidth { value: f64 },

    #[error("invalid modal_gap {value} (must be finite and >= 0)")]
    InvalidModalGap { value: f64 },

    #[error("invalid {field} {value} (must be finite and >= 0)")]
    InvalidHandleMetric { field: &'static str, value: f64 },

    #[error("invalid bounds {width}x{height} (must be finite and non-negative)")]
    InvalidBounds { width: f64, height: f64 },

    #[error("primary view is required")]
    MissingPrimaryView,

    #[error("secondary view is required")]
    MissingSecondaryView,

    #[error("initial bounds are required")]
    MissingBounds,

    #[error("primary and secondary views must differ (both {view})")]
    DuplicateView { view: ViewId },

    #[error("view id 0 is reserved")]
    ReservedViewId,

    #[error("failed to parse split pane config: {0}")]
    Parse(#[from] toml::de::Error),
}
