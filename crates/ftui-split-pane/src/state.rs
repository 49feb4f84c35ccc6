#![forbid(unsafe_code)]

//! The single mutable geometry record owned by a controller.
//!
//! # Invariants
//!
//! 1. `dragging_width` is `Some` only while a side-by-side drag is live, and
//!    then it (not `current_width`) drives the rendered width.
//! 2. With no drag live, `is_secondary_showing` agrees with
//!    `pinning_state != Closed` in side-by-side mode and with
//!    `leading_offset == open_clamp_location` in modal mode.
//! 3. Widths stay within `[0, view_width]`; opacities within `[0, 1]`.
//!
//! Mutators are crate-private: only the gesture engine and the controller's
//! presentation operations change geometry.

use serde::{Deserialize, Serialize};

use crate::config::HandleMetrics;
use crate::geometry::{Point, Rect, Size};
use crate::pinning::{PinningState, width_for};
use crate::presentation::{ModalExtent, PresentationMode};

/// Current pane geometry plus the presentation and pinning it was derived
/// from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryState {
    presentation_mode: PresentationMode,
    is_secondary_showing: bool,
    pinning_state: PinningState,
    current_width: f64,
    dragging_width: Option<f64>,
    trailing_offset: f64,
    leading_offset: f64,
    open_clamp_location: f64,
    modal_width: f64,
    shadow_opacity: f64,
    edge_shadow_opacity: f64,
    blur_active: bool,
}

impl GeometryState {
    /// Initial geometry: modal, closed, hidden past the trailing edge.
    #[must_use]
    pub fn new(bounds: Size) -> Self {
        Self {
            presentation_mode: PresentationMode::Modal,
            is_secondary_showing: false,
            pinning_state: PinningState::Closed,
            current_width: 0.0,
            dragging_width: None,
            trailing_offset: 0.0,
            leading_offset: bounds.width,
            open_clamp_location: 0.0,
            modal_width: bounds.width,
            shadow_opacity: 0.0,
            edge_shadow_opacity: 0.0,
            blur_active: false,
        }
    }

    #[must_use]
    pub const fn presentation_mode(&self) -> PresentationMode {
        self.presentation_mode
    }

    #[must_use]
    pub const fn is_secondary_showing(&self) -> bool {
        self.is_secondary_showing
    }

    /// Active pinning state; remembered across presentation mode switches.
    #[must_use]
    pub const fn pinning_state(&self) -> PinningState {
        self.pinning_state
    }

    /// Resting side-by-side width.
    #[must_use]
    pub const fn current_width(&self) -> f64 {
        self.current_width
    }

    /// Side-by-side width while a drag is live.
    #[must_use]
    pub const fn dragging_width(&self) -> Option<f64> {
        self.dragging_width
    }

    /// How far the side container's trailing edge is pushed past the view's
    /// trailing edge.
    #[must_use]
    pub const fn trailing_offset(&self) -> f64 {
        self.trailing_offset
    }

    /// Leading edge of the modal container.
    #[must_use]
    pub const fn leading_offset(&self) -> f64 {
        self.leading_offset
    }

    /// Leading offset of a fully open modal.
    #[must_use]
    pub const fn open_clamp_location(&self) -> f64 {
        self.open_clamp_location
    }

    #[must_use]
    pub const fn modal_width(&self) -> f64 {
        self.modal_width
    }

    /// Opacity of the dimming layer over the primary pane.
    #[must_use]
    pub const fn shadow_opacity(&self) -> f64 {
        self.shadow_opacity
    }

    /// Opacity of the modal container's edge shadow; 1 while the modal is
    /// live on screen.
    #[must_use]
    pub const fn edge_shadow_opacity(&self) -> f64 {
        self.edge_shadow_opacity
    }

    #[must_use]
    pub const fn blur_active(&self) -> bool {
        self.blur_active
    }

    /// Width the side container is rendered at right now.
    #[must_use]
    pub fn rendered_width(&self) -> f64 {
        self.dragging_width.unwrap_or(self.current_width)
    }

    /// Width used to pick a snap target when a side-by-side drag ends.
    ///
    /// Once the rubber band has pushed the container more than half its
    /// minimum width off screen, the visible part is what counts.
    #[must_use]
    pub fn tracked_width(&self, minimum_width: f64) -> f64 {
        if self.trailing_offset > minimum_width / 2.0 {
            minimum_width - self.trailing_offset
        } else {
            self.rendered_width()
        }
    }

    /// Whether each drag handle should accept taps.
    #[must_use]
    pub fn handle_interactivity(&self) -> HandleInteractivity {
        HandleInteractivity {
            side: self.is_secondary_showing
                && self.presentation_mode == PresentationMode::SideBySide,
            modal: self.is_secondary_showing && self.presentation_mode == PresentationMode::Modal,
        }
    }

    /// Check invariant 2 for a settled (not dragging) state.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        if self.dragging_width.is_some() {
            return true;
        }
        match self.presentation_mode {
            PresentationMode::SideBySide => {
                self.is_secondary_showing == self.pinning_state.is_open()
            }
            PresentationMode::Modal => {
                self.is_secondary_showing == (self.leading_offset == self.open_clamp_location)
            }
        }
    }

    /// Derive container and handle frames for `bounds`.
    #[must_use]
    pub fn frames(&self, bounds: Size, handles: &HandleMetrics) -> PaneFrames {
        let w = bounds.width;
        let h = bounds.height;
        match self.presentation_mode {
            PresentationMode::SideBySide => {
                let width = self.rendered_width();
                let side_x = w + self.trailing_offset - width;
                let side_container = Rect::new(side_x, 0.0, width, h);
                let grip_center = side_x + handles.side_grip_inset;
                PaneFrames {
                    primary: Rect::new(0.0, 0.0, side_x.clamp(0.0, w), h),
                    side_container,
                    modal_container: Rect::new(w, 0.0, self.modal_width, h),
                    side_handle: Rect::new(
                        grip_center - handles.side_handle_width / 2.0,
                        0.0,
                        handles.side_handle_width,
                        h,
                    ),
                    modal_handle: Rect::new(w, 0.0, 0.0, h),
                }
            }
            PresentationMode::Modal => {
                let modal_container = Rect::new(self.leading_offset, 0.0, self.modal_width, h);
                PaneFrames {
                    primary: Rect::from_size(bounds),
                    side_container: Rect::new(w, 0.0, 0.0, h),
                    modal_container,
                    side_handle: Rect::new(w, 0.0, 0.0, h),
                    modal_handle: Rect::new(
                        self.leading_offset - handles.modal_handle_overhang,
                        0.0,
                        handles.modal_handle_width,
                        h,
                    ),
                }
            }
        }
    }

    pub(crate) fn set_presentation_mode(&mut self, mode: PresentationMode) {
        self.presentation_mode = mode;
    }

    pub(crate) fn set_showing(&mut self, showing: bool) {
        self.is_secondary_showing = showing;
    }

    pub(crate) fn set_pinning_state(&mut self, state: PinningState) {
        self.pinning_state = state;
    }

    pub(crate) fn set_blur_active(&mut self, active: bool) {
        self.blur_active = active;
    }

    pub(crate) fn set_edge_shadow_opacity(&mut self, opacity: f64) {
        self.edge_shadow_opacity = opacity.clamp(0.0, 1.0);
    }

    /// Rest the side container at `state`'s width.
    pub(crate) fn apply_pinning(
        &mut self,
        state: PinningState,
        available_width: f64,
        minimum_width: f64,
    ) {
        self.pinning_state = state;
        self.dragging_width = None;
        self.current_width =
            width_for(state, available_width, minimum_width).clamp(0.0, available_width);
        self.trailing_offset = 0.0;
        self.is_secondary_showing = state.is_open();
    }

    /// Start tracking a side-by-side drag from the rendered width.
    pub(crate) fn begin_side_drag(&mut self) {
        self.dragging_width = Some(self.rendered_width());
    }

    /// Follow the touch; below the minimum width the container keeps its
    /// minimum and slides off the trailing edge instead.
    pub(crate) fn apply_side_drag(&mut self, touch_x: f64, view_width: f64, minimum_width: f64) {
        let distance = (touch_x - view_width).abs().min(view_width);
        if distance < minimum_width {
            self.dragging_width = Some(minimum_width);
            self.trailing_offset = minimum_width - distance;
        } else {
            self.dragging_width = Some(distance);
            self.trailing_offset = 0.0;
        }
    }

    pub(crate) fn end_side_drag(&mut self) {
        self.dragging_width = None;
    }

    /// Put the modal fully open at the clamp.
    pub(crate) fn present_modal(&mut self) {
        self.is_secondary_showing = true;
        self.leading_offset = self.open_clamp_location;
        self.shadow_opacity = 1.0;
        self.edge_shadow_opacity = 1.0;
    }

    /// Move the modal past the trailing edge.
    pub(crate) fn hide_modal(&mut self, view_width: f64) {
        self.is_secondary_showing = false;
        self.leading_offset = view_width;
        self.shadow_opacity = 0.0;
    }

    /// Make a closed modal live at the trailing edge so a drag can pull it in.
    pub(crate) fn begin_modal_drag_from_closed(&mut self, view_width: f64) {
        self.is_secondary_showing = true;
        self.edge_shadow_opacity = 1.0;
        self.leading_offset = view_width;
    }

    pub(crate) fn apply_modal_drag(
        &mut self,
        touch_x: f64,
        view_width: f64,
        modal_gap: f64,
        modal_start_x: f64,
    ) {
        self.leading_offset = (touch_x - modal_gap - modal_start_x).max(self.open_clamp_location);
        self.shadow_opacity = if view_width > 0.0 {
            (1.0 - touch_x / view_width).clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    /// Adopt new modal limits; a settled modal follows them.
    pub(crate) fn set_modal_extent(&mut self, extent: ModalExtent, view_width: f64) {
        self.open_clamp_location = extent.open_clamp_location;
        self.modal_width = extent.container_width;
        if self.is_secondary_showing {
            if self.presentation_mode == PresentationMode::Modal {
                self.leading_offset = self.open_clamp_location;
            }
        } else {
            self.leading_offset = view_width;
        }
    }

    /// Collapse the side container without touching pinning.
    pub(crate) fn clear_side_width(&mut self) {
        self.current_width = 0.0;
        self.dragging_width = None;
        self.trailing_offset = 0.0;
    }
}

/// Which drag handles accept touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HandleInteractivity {
    pub side: bool,
    pub modal: bool,
}

/// Frames of every region the controller lays out, in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaneFrames {
    pub primary: Rect,
    pub side_container: Rect,
    pub modal_container: Rect,
    /// Touch area around the side-by-side grip.
    pub side_handle: Rect,
    /// Touch area straddling the modal's leading edge.
    pub modal_handle: Rect,
}

/// Pane a point belongs to for content hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaneTarget {
    Primary,
    Secondary,
}

impl PaneFrames {
    /// Route `point` to the pane whose content should receive it.
    #[must_use]
    pub fn route(&self, point: Point) -> PaneTarget {
        if self.modal_container.contains(point) || self.side_container.contains(point) {
            PaneTarget::Secondary
        } else {
            PaneTarget::Primary
        }
    }
}
