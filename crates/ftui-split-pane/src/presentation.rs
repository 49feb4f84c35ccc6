#![forbid(unsafe_code)]

//! Presentation mode selection and modal travel limits.
//!
//! A view wide enough to hold two minimum-width panes plus the modal gap
//! shows the secondary pane beside the primary one; anything narrower
//! presents it as a modal sheet sliding in from the trailing edge.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Size;

/// How the secondary pane is laid out relative to the primary pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationMode {
    /// Both panes visible in adjacent columns.
    SideBySide,
    /// Secondary pane overlays the primary pane.
    #[default]
    Modal,
}

impl PresentationMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SideBySide => "side_by_side",
            Self::Modal => "modal",
        }
    }
}

impl fmt::Display for PresentationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Narrowest width that qualifies for side-by-side presentation.
#[must_use]
pub fn side_by_side_threshold(minimum_width: f64, modal_gap: f64) -> f64 {
    2.0 * minimum_width + modal_gap
}

/// Presentation mode for a view `available_width` points wide.
#[must_use]
pub fn mode_for(available_width: f64, minimum_width: f64, modal_gap: f64) -> PresentationMode {
    if available_width >= side_by_side_threshold(minimum_width, modal_gap) {
        PresentationMode::SideBySide
    } else {
        PresentationMode::Modal
    }
}

/// Leading offset of a fully open modal pane.
///
/// When the narrow dimension of the view is below the side-by-side
/// threshold, the modal only travels in as far as the narrowest side, so it
/// keeps the same width in either orientation. Otherwise it may cover the
/// whole view (clamp 0).
#[must_use]
pub fn modal_open_clamp(view_width: f64, view_height: f64, side_by_side_threshold: f64) -> f64 {
    let narrowest = view_width.min(view_height);
    if narrowest < side_by_side_threshold {
        (view_width - narrowest).max(0.0)
    } else {
        0.0
    }
}

/// Placement limits for the modal container at a given view size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModalExtent {
    /// Leading offset when fully open.
    pub open_clamp_location: f64,
    /// Width of the modal container.
    pub container_width: f64,
}

impl ModalExtent {
    /// Compute the modal limits for `size`.
    #[must_use]
    pub fn for_size(size: Size, side_by_side_threshold: f64) -> Self {
        let narrowest = size.narrowest_side();
        if narrowest < side_by_side_threshold {
            Self {
                open_clamp_location: modal_open_clamp(
                    size.width,
                    size.height,
                    side_by_side_threshold,
                ),
                container_width: narrowest,
            }
        } else {
            Self {
                open_clamp_location: 0.0,
                container_width: size.width,
            }
        }
    }
}
