#![forbid(unsafe_code)]

//! The split pane controller: presentation operations plus gesture routing.
//!
//! [`SplitPaneController`] owns the [`GeometryState`], the [`GestureEngine`],
//! the pending animations, and the observer registry. Every operation is an
//! explicit transition: it mutates geometry, then returns the ordered list of
//! [`SplitPaneEffect`]s it produced (after delivering notifications and
//! delegate callbacks to the registry).
//!
//! # Animation contract
//!
//! An animated operation returns immediately with an
//! [`SplitPaneEffect::AnimationStarted`] carrying an [`AnimationId`]. The host
//! animates to the last reported geometry and calls
//! [`SplitPaneController::complete_animation`] when done; "did change"
//! notifications and blur cleanup are emitted from that call. Unanimated
//! operations run their completion inline.
//!
//! Callers must not start a new show/dismiss or gesture while an animation
//! from a previous call is still pending; a size change settles any pending
//! animations before rebuilding geometry.

use std::collections::BTreeMap;
use std::rc::Weak;

use serde::{Deserialize, Serialize};

use crate::config::SplitPaneConfig;
use crate::effect::{
    AnimationId, AnimationPurpose, NotificationKind, PaneContainer, SplitPaneEffect,
    SplitPaneNoopReason, SplitPaneNotification, ViewId,
};
use crate::error::ConfigurationError;
use crate::geometry::{Point, Size};
use crate::gesture::{
    GestureContext, GestureEngine, GestureEvent, GestureResolution, GestureState,
    GestureTransition, HitTester,
};
use crate::observer::{SplitPaneDelegate, SplitPaneObservers, SubscriptionId};
use crate::pinning::PinningState;
use crate::presentation::{ModalExtent, PresentationMode, mode_for};
use crate::state::{GeometryState, HandleInteractivity, PaneFrames, PaneTarget};

/// Builder for [`SplitPaneController`].
///
/// Both views and the initial bounds are required; [`build`](Self::build)
/// fails fast without them.
#[derive(Debug, Default)]
pub struct SplitPaneBuilder {
    config: SplitPaneConfig,
    primary_view: Option<ViewId>,
    secondary_view: Option<ViewId>,
    bounds: Option<Size>,
    delegate: Option<Weak<dyn SplitPaneDelegate>>,
}

impl SplitPaneBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn config(mut self, config: SplitPaneConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn primary_view(mut self, view: ViewId) -> Self {
        self.primary_view = Some(view);
        self
    }

    #[must_use]
    pub fn secondary_view(mut self, view: ViewId) -> Self {
        self.secondary_view = Some(view);
        self
    }

    #[must_use]
    pub fn bounds(mut self, bounds: Size) -> Self {
        self.bounds = Some(bounds);
        self
    }

    #[must_use]
    pub fn delegate(mut self, delegate: Weak<dyn SplitPaneDelegate>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    pub fn build(self) -> Result<SplitPaneController, ConfigurationError> {
        self.config.validate()?;
        let primary_view = self.primary_view.ok_or(ConfigurationError::MissingPrimaryView)?;
        let secondary_view = self
            .secondary_view
            .ok_or(ConfigurationError::MissingSecondaryView)?;
        if primary_view == secondary_view {
            return Err(ConfigurationError::DuplicateView { view: primary_view });
        }
        let bounds = self.bounds.ok_or(ConfigurationError::MissingBounds)?;
        if !bounds.is_valid() {
            return Err(ConfigurationError::InvalidBounds {
                width: bounds.width,
                height: bounds.height,
            });
        }

        let mut observers = SplitPaneObservers::new();
        observers.set_delegate(self.delegate);

        let mut controller = SplitPaneController {
            config: self.config,
            primary_view,
            secondary_view,
            bounds,
            geometry: GeometryState::new(bounds),
            gesture: GestureEngine::new(),
            last_gesture_transition: None,
            pending: BTreeMap::new(),
            next_animation: 0,
            observers,
        };
        controller.adopt_bounds(bounds, &mut Vec::new());
        tracing::debug!(
            target: "ftui.split_pane",
            width = bounds.width,
            height = bounds.height,
            mode = %controller.geometry.presentation_mode(),
            "split pane controller created"
        );
        Ok(controller)
    }
}

/// Serializable controller state for restoring a layout.
///
/// Fields are optional on the wire so that a truncated document is reported
/// as a [`ConfigurationError`] rather than silently defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitPaneSnapshot {
    #[serde(default)]
    pub config: SplitPaneConfig,
    #[serde(default)]
    pub primary_view: Option<ViewId>,
    #[serde(default)]
    pub secondary_view: Option<ViewId>,
    #[serde(default)]
    pub bounds: Option<Size>,
    #[serde(default)]
    pub pinning_state: PinningState,
    #[serde(default)]
    pub secondary_showing: bool,
}

/// Two-pane presentation controller.
#[derive(Debug)]
pub struct SplitPaneController {
    config: SplitPaneConfig,
    primary_view: ViewId,
    secondary_view: ViewId,
    bounds: Size,
    geometry: GeometryState,
    gesture: GestureEngine,
    last_gesture_transition: Option<GestureTransition>,
    pending: BTreeMap<AnimationId, AnimationPurpose>,
    next_animation: u64,
    observers: SplitPaneObservers,
}

impl SplitPaneController {
    /// Shorthand for the builder with all required inputs.
    pub fn new(
        config: SplitPaneConfig,
        primary_view: ViewId,
        secondary_view: ViewId,
        bounds: Size,
    ) -> Result<Self, ConfigurationError> {
        SplitPaneBuilder::new()
            .config(config)
            .primary_view(primary_view)
            .secondary_view(secondary_view)
            .bounds(bounds)
            .build()
    }

    /// Rebuild a controller from a decoded snapshot.
    pub fn from_snapshot(snapshot: SplitPaneSnapshot) -> Result<Self, ConfigurationError> {
        let primary = snapshot
            .primary_view
            .ok_or(ConfigurationError::MissingPrimaryView)?;
        let secondary = snapshot
            .secondary_view
            .ok_or(ConfigurationError::MissingSecondaryView)?;
        let bounds = snapshot.bounds.ok_or(ConfigurationError::MissingBounds)?;
        let mut controller = Self::new(snapshot.config, primary, secondary, bounds)?;
        if snapshot.secondary_showing {
            let pinning = if snapshot.pinning_state.is_open() {
                snapshot.pinning_state
            } else {
                PinningState::OpenDefault
            };
            controller.show_pinned(false, pinning);
        }
        Ok(controller)
    }

    /// Capture what [`from_snapshot`](Self::from_snapshot) needs.
    #[must_use]
    pub fn to_snapshot(&self) -> SplitPaneSnapshot {
        SplitPaneSnapshot {
            config: self.config.clone(),
            primary_view: Some(self.primary_view),
            secondary_view: Some(self.secondary_view),
            bounds: Some(self.bounds),
            pinning_state: self.geometry.pinning_state(),
            secondary_showing: self.geometry.is_secondary_showing(),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &SplitPaneConfig {
        &self.config
    }

    #[must_use]
    pub const fn bounds(&self) -> Size {
        self.bounds
    }

    #[must_use]
    pub const fn primary_view(&self) -> ViewId {
        self.primary_view
    }

    #[must_use]
    pub const fn secondary_view(&self) -> ViewId {
        self.secondary_view
    }

    #[must_use]
    pub const fn geometry(&self) -> &GeometryState {
        &self.geometry
    }

    #[must_use]
    pub const fn presentation_mode(&self) -> PresentationMode {
        self.geometry.presentation_mode()
    }

    #[must_use]
    pub const fn is_secondary_showing(&self) -> bool {
        self.geometry.is_secondary_showing()
    }

    #[must_use]
    pub const fn pinning_state(&self) -> PinningState {
        self.geometry.pinning_state()
    }

    #[must_use]
    pub const fn gesture_state(&self) -> GestureState {
        self.gesture.state()
    }

    #[must_use]
    pub fn last_gesture_transition(&self) -> Option<&GestureTransition> {
        self.last_gesture_transition.as_ref()
    }

    /// Animations started but not yet completed, oldest first.
    pub fn pending_animations(&self) -> impl Iterator<Item = (AnimationId, AnimationPurpose)> + '_ {
        self.pending.iter().map(|(id, purpose)| (*id, *purpose))
    }

    #[must_use]
    pub fn frames(&self) -> PaneFrames {
        self.geometry.frames(self.bounds, &self.config.handles)
    }

    /// Which drag handle accepts taps right now.
    #[must_use]
    pub fn handle_interactivity(&self) -> HandleInteractivity {
        self.geometry.handle_interactivity()
    }

    /// Pane whose content should receive a touch at `point`.
    #[must_use]
    pub fn route_point(&self, point: Point) -> PaneTarget {
        self.frames().route(point)
    }

    /// Whether the platform pan recognizer should begin at all.
    #[must_use]
    pub const fn should_begin_gesture(&self) -> bool {
        self.config.can_open_with_swipe || self.geometry.is_secondary_showing()
    }

    // ------------------------------------------------------------------
    // Observers
    // ------------------------------------------------------------------

    pub fn subscribe<F>(&mut self, kind: NotificationKind, listener: F) -> SubscriptionId
    where
        F: FnMut(&SplitPaneNotification) + 'static,
    {
        self.observers.subscribe(kind, listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn set_delegate(&mut self, delegate: Option<Weak<dyn SplitPaneDelegate>>) {
        self.observers.set_delegate(delegate);
    }

    // ------------------------------------------------------------------
    // Presentation API
    // ------------------------------------------------------------------

    /// Show the secondary pane pinned `OpenDefault`.
    pub fn show(&mut self, animated: bool) -> Vec<SplitPaneEffect> {
        self.show_pinned(animated, PinningState::OpenDefault)
    }

    /// Show the secondary pane. No-op while it is already showing.
    pub fn show_pinned(&mut self, animated: bool, pinning: PinningState) -> Vec<SplitPaneEffect> {
        let mut effects = Vec::new();
        self.show_inner(animated, pinning, &mut effects);
        self.emit(effects)
    }

    /// Hide the secondary pane. No-op while it is not showing.
    ///
    /// `SecondaryDidClose` is only emitted for animated dismissals.
    pub fn dismiss(&mut self, animated: bool) -> Vec<SplitPaneEffect> {
        let mut effects = Vec::new();
        self.dismiss_inner(animated, &mut effects);
        self.emit(effects)
    }

    /// Re-derive the layout for a new view width, keeping the height.
    pub fn handle_width_change(&mut self, new_width: f64) -> Vec<SplitPaneEffect> {
        self.handle_size_change(Size::new(new_width, self.bounds.height))
    }

    /// Re-derive the layout for a new view size (rotation, window resize).
    ///
    /// A showing pane is dismissed and re-shown without animation so the new
    /// layout is built from scratch rather than interpolated from stale
    /// geometry. A live drag is cancelled first.
    pub fn handle_size_change(&mut self, size: Size) -> Vec<SplitPaneEffect> {
        let mut effects = Vec::new();
        if !size.is_valid() {
            effects.push(SplitPaneEffect::Noop {
                reason: SplitPaneNoopReason::InvalidSize,
            });
            return self.emit(effects);
        }

        if let Some(transition) = self.gesture.force_cancel(&mut self.geometry, &mut effects) {
            // A modal pulled in from closed was never really shown.
            if let GestureState::Dragging { session } = transition.from {
                if session.mode == PresentationMode::Modal && !session.started_with_secondary_open {
                    self.geometry.hide_modal(self.bounds.width);
                    self.geometry.set_edge_shadow_opacity(0.0);
                }
            }
            self.end_blur(&mut effects);
            self.last_gesture_transition = Some(transition);
        }
        self.settle_pending(&mut effects);

        let was_showing = self.geometry.is_secondary_showing();
        let remembered = self.remembered_open_pinning();
        if was_showing {
            self.dismiss_inner(false, &mut effects);
        }
        self.adopt_bounds(size, &mut effects);
        if was_showing {
            self.show_inner(false, remembered, &mut effects);
        } else {
            effects.push(self.geometry_changed());
        }
        self.emit(effects)
    }

    /// Refresh the modal travel limits after a layout pass.
    ///
    /// Deferred while a drag is live or a touch is armed on a handle. Any
    /// width change is handled as a full size change so the primary pane's
    /// width notifications are posted.
    pub fn handle_layout(&mut self, size: Size) -> Vec<SplitPaneEffect> {
        if !size.is_valid() {
            return self.emit(vec![SplitPaneEffect::Noop {
                reason: SplitPaneNoopReason::InvalidSize,
            }]);
        }
        let live = self.gesture.is_dragging()
            || self.gesture.state().session().is_some_and(|session| session.armed);
        if live {
            return self.emit(vec![SplitPaneEffect::Noop {
                reason: SplitPaneNoopReason::GestureInProgress,
            }]);
        }
        if size.width != self.bounds.width {
            return self.handle_size_change(size);
        }
        self.bounds = size;
        self.geometry.set_modal_extent(self.modal_extent(), size.width);
        let effects = vec![self.geometry_changed()];
        self.emit(effects)
    }

    /// A tap landed at `point`.
    ///
    /// In modal mode a tap on the dimmed primary pane or on the modal handle
    /// dismisses the pane (animated).
    pub fn tap(&mut self, point: Point) -> Vec<SplitPaneEffect> {
        let mut effects = Vec::new();
        if !self.geometry.is_secondary_showing() {
            effects.push(SplitPaneEffect::Noop {
                reason: SplitPaneNoopReason::NotShowing,
            });
        } else if self.gesture.is_dragging() {
            effects.push(SplitPaneEffect::Noop {
                reason: SplitPaneNoopReason::GestureAlreadyActive,
            });
        } else {
            let frames = self.frames();
            let on_target = self.geometry.presentation_mode() == PresentationMode::Modal
                && (frames.modal_handle.contains(point) || !frames.modal_container.contains(point));
            if on_target {
                self.dismiss_inner(true, &mut effects);
            } else {
                effects.push(SplitPaneEffect::Noop {
                    reason: SplitPaneNoopReason::TapOutsideTargets,
                });
            }
        }
        self.emit(effects)
    }

    /// Feed one pan-gesture event, hit testing against the controller's own
    /// frames.
    pub fn handle_gesture(&mut self, event: GestureEvent) -> Vec<SplitPaneEffect> {
        let frames = self.frames();
        self.handle_gesture_with(event, &frames)
    }

    /// Feed one pan-gesture event with a host-provided hit tester.
    pub fn handle_gesture_with(
        &mut self,
        event: GestureEvent,
        hits: &dyn HitTester,
    ) -> Vec<SplitPaneEffect> {
        let _span = tracing::debug_span!(
            "split_pane.gesture",
            phase = ?event.phase,
            mode = %self.geometry.presentation_mode(),
        )
        .entered();

        let mut effects = Vec::new();
        let ctx = GestureContext {
            config: &self.config,
            bounds: self.bounds,
            primary_view: self.primary_view,
        };
        let transition = self
            .gesture
            .apply(&event, &mut self.geometry, &ctx, hits, &mut effects);
        if let Some(resolution) = transition.resolution {
            self.resolve_gesture(resolution, &mut effects);
        }
        self.last_gesture_transition = Some(transition);
        self.emit(effects)
    }

    /// Report that the animation `id` finished.
    pub fn complete_animation(&mut self, id: AnimationId) -> Vec<SplitPaneEffect> {
        let mut effects = Vec::new();
        match self.pending.remove(&id) {
            Some(purpose) => self.complete(purpose, true, &mut effects),
            None => effects.push(SplitPaneEffect::Noop {
                reason: SplitPaneNoopReason::UnknownAnimation,
            }),
        }
        self.emit(effects)
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    fn show_inner(
        &mut self,
        animated: bool,
        pinning: PinningState,
        effects: &mut Vec<SplitPaneEffect>,
    ) {
        if self.geometry.is_secondary_showing() {
            effects.push(SplitPaneEffect::Noop {
                reason: SplitPaneNoopReason::AlreadyShowing,
            });
            return;
        }
        if !pinning.is_open() {
            effects.push(SplitPaneEffect::Noop {
                reason: SplitPaneNoopReason::ShowWithClosedPinning,
            });
            return;
        }

        let mode = self.geometry.presentation_mode();
        self.geometry.set_showing(true);
        self.geometry.set_pinning_state(pinning);
        match mode {
            PresentationMode::SideBySide => {
                if animated {
                    self.begin_blur(effects);
                }
                effects.push(SplitPaneEffect::Notify(
                    SplitPaneNotification::PrimaryWillChangeWidth { view: self.primary_view },
                ));
                self.geometry
                    .apply_pinning(pinning, self.bounds.width, self.config.minimum_width);
                self.geometry.set_edge_shadow_opacity(0.0);
            }
            PresentationMode::Modal => {
                self.geometry.present_modal();
            }
        }
        tracing::debug!(
            target: "ftui.split_pane",
            mode = %mode,
            pinning = %pinning,
            animated,
            "secondary pane shown"
        );
        effects.push(self.geometry_changed());
        self.finish(animated, AnimationPurpose::Show { mode }, effects);
    }

    fn dismiss_inner(&mut self, animated: bool, effects: &mut Vec<SplitPaneEffect>) {
        if !self.geometry.is_secondary_showing() {
            effects.push(SplitPaneEffect::Noop {
                reason: SplitPaneNoopReason::NotShowing,
            });
            return;
        }

        let mode = self.geometry.presentation_mode();
        match mode {
            PresentationMode::SideBySide => {
                if animated {
                    self.begin_blur(effects);
                }
                effects.push(SplitPaneEffect::Notify(
                    SplitPaneNotification::PrimaryWillChangeWidth { view: self.primary_view },
                ));
                self.geometry.apply_pinning(
                    PinningState::Closed,
                    self.bounds.width,
                    self.config.minimum_width,
                );
            }
            PresentationMode::Modal => {
                self.geometry.set_pinning_state(PinningState::Closed);
                self.geometry.clear_side_width();
                self.geometry.hide_modal(self.bounds.width);
            }
        }
        tracing::debug!(
            target: "ftui.split_pane",
            mode = %mode,
            animated,
            "secondary pane dismissed"
        );
        effects.push(self.geometry_changed());
        self.finish(animated, AnimationPurpose::Dismiss { mode }, effects);
    }

    fn resolve_gesture(
        &mut self,
        resolution: GestureResolution,
        effects: &mut Vec<SplitPaneEffect>,
    ) {
        match resolution {
            GestureResolution::Snap { target } => {
                self.geometry
                    .apply_pinning(target, self.bounds.width, self.config.minimum_width);
                tracing::debug!(
                    target: "ftui.split_pane",
                    pinning = %target,
                    width = self.geometry.current_width(),
                    "side pane snapped"
                );
                effects.push(self.geometry_changed());
                self.finish(true, AnimationPurpose::Snap { target }, effects);
            }
            GestureResolution::CloseModal => {
                self.dismiss_inner(true, effects);
            }
            GestureResolution::ReopenModal => {
                let pinning = self.remembered_open_pinning();
                // Pretend the pane was hidden so show animates it back in.
                self.geometry.set_showing(false);
                self.show_inner(true, pinning, effects);
            }
        }
    }

    /// Start an animation for `purpose`, or complete it inline.
    fn finish(
        &mut self,
        animated: bool,
        purpose: AnimationPurpose,
        effects: &mut Vec<SplitPaneEffect>,
    ) {
        if animated {
            self.next_animation += 1;
            let id = AnimationId::new(self.next_animation);
            self.pending.insert(id, purpose);
            effects.push(SplitPaneEffect::AnimationStarted {
                id,
                duration: self.config.animation.transition(),
                purpose,
            });
        } else {
            self.complete(purpose, false, effects);
        }
    }

    fn complete(
        &mut self,
        purpose: AnimationPurpose,
        animated: bool,
        effects: &mut Vec<SplitPaneEffect>,
    ) {
        let primary = self.primary_view;
        match purpose {
            AnimationPurpose::Show { mode } => {
                self.end_blur(effects);
                if mode == PresentationMode::SideBySide {
                    effects.push(SplitPaneEffect::Notify(
                        SplitPaneNotification::PrimaryDidChangeWidth { view: primary },
                    ));
                }
            }
            AnimationPurpose::Dismiss { mode } => {
                if self.geometry.edge_shadow_opacity() != 0.0 {
                    self.geometry.set_edge_shadow_opacity(0.0);
                    effects.push(self.geometry_changed());
                }
                self.end_blur(effects);
                if mode == PresentationMode::SideBySide {
                    effects.push(SplitPaneEffect::Notify(
                        SplitPaneNotification::PrimaryDidChangeWidth { view: primary },
                    ));
                }
                if animated {
                    effects.push(SplitPaneEffect::Notify(
                        SplitPaneNotification::SecondaryDidClose { view: self.secondary_view },
                    ));
                }
            }
            AnimationPurpose::Snap { target } => {
                self.end_blur(effects);
                effects.push(SplitPaneEffect::Notify(
                    SplitPaneNotification::PrimaryDidChangeWidth { view: primary },
                ));
                if animated && !target.is_open() {
                    effects.push(SplitPaneEffect::Notify(
                        SplitPaneNotification::SecondaryDidClose { view: self.secondary_view },
                    ));
                }
            }
        }
        tracing::debug!(
            target: "ftui.split_pane",
            purpose = ?purpose,
            animated,
            "pane transition completed"
        );
    }

    /// Complete every pending animation now, oldest first.
    fn settle_pending(&mut self, effects: &mut Vec<SplitPaneEffect>) {
        while let Some((_, purpose)) = self.pending.pop_first() {
            self.complete(purpose, true, effects);
        }
    }

    /// Take on new bounds: presentation mode, container ownership and modal
    /// limits.
    fn adopt_bounds(&mut self, size: Size, effects: &mut Vec<SplitPaneEffect>) {
        self.bounds = size;
        let mode = mode_for(size.width, self.config.minimum_width, self.config.modal_gap);
        if mode != self.geometry.presentation_mode() {
            tracing::debug!(
                target: "ftui.split_pane",
                from = %self.geometry.presentation_mode(),
                to = %mode,
                width = size.width,
                "presentation mode changed"
            );
            self.geometry.set_presentation_mode(mode);
            effects.push(SplitPaneEffect::SecondaryReparented {
                container: PaneContainer::from(mode),
            });
        }
        self.geometry.set_modal_extent(self.modal_extent(), size.width);
    }

    fn modal_extent(&self) -> ModalExtent {
        ModalExtent::for_size(self.bounds, self.config.side_by_side_threshold())
    }

    fn remembered_open_pinning(&self) -> PinningState {
        let pinning = self.geometry.pinning_state();
        if pinning.is_open() {
            pinning
        } else {
            PinningState::OpenDefault
        }
    }

    fn begin_blur(&mut self, effects: &mut Vec<SplitPaneEffect>) {
        if self.config.blur_on_resize && !self.geometry.blur_active() {
            self.geometry.set_blur_active(true);
            effects.push(SplitPaneEffect::BlurStarted {
                fade: self.config.animation.blur_fade(),
            });
        }
    }

    fn end_blur(&mut self, effects: &mut Vec<SplitPaneEffect>) {
        if self.geometry.blur_active() {
            self.geometry.set_blur_active(false);
            effects.push(SplitPaneEffect::BlurEnded {
                fade: self.config.animation.blur_fade(),
            });
        }
    }

    fn geometry_changed(&self) -> SplitPaneEffect {
        SplitPaneEffect::GeometryChanged {
            geometry: self.geometry,
        }
    }

    fn emit(&mut self, effects: Vec<SplitPaneEffect>) -> Vec<SplitPaneEffect> {
        self.observers.dispatch(&effects);
        effects
    }
}
