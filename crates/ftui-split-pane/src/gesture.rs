#![forbid(unsafe_code)]

//! Drag gesture engine for the secondary pane.
//!
//! [`GestureEngine`] consumes pan-gesture phase events and turns them into
//! continuous [`GeometryState`] updates. When a drag is released it returns a
//! [`GestureResolution`]; the controller carries that out through its
//! presentation operations.
//!
//! # State Machine
//!
//! ```text
//! Idle -> Armed -> Dragging -> (snap | resolve modal) -> Idle
//!    \------> Idle (ended/cancelled from Armed)
//! ```
//!
//! A gesture that begins outside the drag handles is still Armed, but inert:
//! its `Changed` events only ask the platform recognizer to reset.
//!
//! # Failure Modes
//!
//! Physical gesture sources cannot be fully trusted. `Changed` or `Ended`
//! without a preceding `Began`, a second `Began` mid-gesture, and non-finite
//! coordinates are all reported as [`SplitPaneEffect::Noop`] and leave the
//! state untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::SplitPaneConfig;
use crate::effect::{SplitPaneEffect, SplitPaneNoopReason, SplitPaneNotification, ViewId};
use crate::geometry::{Point, Size, Velocity};
use crate::pinning::{PinningState, closest_state};
use crate::presentation::PresentationMode;
use crate::state::{GeometryState, PaneFrames};

/// Horizontal release speed (points/sec) past which a modal drag counts as a
/// flick regardless of position.
pub const MODAL_FLICK_VELOCITY: f64 = 10.0;

/// Fraction of the view a modal that started open must be dragged to close.
pub const MODAL_CLOSE_FRACTION_FROM_OPEN: f64 = 0.25;

/// Fraction of the view a modal that started closed may stay beyond and
/// still be closed on release.
pub const MODAL_CLOSE_FRACTION_FROM_CLOSED: f64 = 0.75;

/// Phase reported by the platform pan recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
    Failed,
}

impl GesturePhase {
    /// Ended, cancelled or failed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ended | Self::Cancelled | Self::Failed)
    }
}

/// One pan-gesture sample in the controller's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureEvent {
    pub phase: GesturePhase,
    pub position: Point,
    pub velocity: Velocity,
}

impl GestureEvent {
    pub const fn new(phase: GesturePhase, position: Point, velocity: Velocity) -> Self {
        Self {
            phase,
            position,
            velocity,
        }
    }

    pub const fn began(position: Point, velocity: Velocity) -> Self {
        Self::new(GesturePhase::Began, position, velocity)
    }

    pub const fn changed(position: Point) -> Self {
        Self::new(GesturePhase::Changed, position, Velocity::ZERO)
    }

    pub const fn ended(position: Point, velocity: Velocity) -> Self {
        Self::new(GesturePhase::Ended, position, velocity)
    }

    pub const fn cancelled(position: Point) -> Self {
        Self::new(GesturePhase::Cancelled, position, Velocity::ZERO)
    }

    /// Horizontal release velocity; cancelled and failed gestures carry no
    /// direction.
    #[must_use]
    pub fn release_velocity(&self) -> f64 {
        match self.phase {
            GesturePhase::Ended => self.velocity.x,
            _ => 0.0,
        }
    }
}

/// Regions a gesture may start in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitRegion {
    SideHandle,
    ModalHandle,
    ModalContainer,
}

/// Hit testing seam for the host's view hierarchy.
///
/// [`PaneFrames`] implements it from the controller's own geometry; hosts
/// with custom handle views can supply their own.
pub trait HitTester {
    fn hit(&self, region: HitRegion, point: Point) -> bool;
}

impl HitTester for PaneFrames {
    fn hit(&self, region: HitRegion, point: Point) -> bool {
        match region {
            HitRegion::SideHandle => self.side_handle.contains(point),
            HitRegion::ModalHandle => self.modal_handle.contains(point),
            HitRegion::ModalContainer => self.modal_container.contains(point),
        }
    }
}

/// Per-gesture bookkeeping, created on `Began` and dropped at the end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureSession {
    pub started_with_secondary_open: bool,
    /// Touch x relative to the secondary view's leading edge (modal only).
    pub modal_start_x: Option<f64>,
    /// The touch landed on a drag handle.
    pub armed: bool,
    pub mode: PresentationMode,
    pub origin: Point,
}

/// Lifecycle state of the gesture engine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GestureState {
    #[default]
    Idle,
    Armed { session: GestureSession },
    Dragging { session: GestureSession },
}

impl GestureState {
    #[must_use]
    pub const fn session(&self) -> Option<&GestureSession> {
        match self {
            Self::Idle => None,
            Self::Armed { session } | Self::Dragging { session } => Some(session),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Armed { .. } => "armed",
            Self::Dragging { .. } => "dragging",
        }
    }
}

impl fmt::Display for GestureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a released drag asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "resolution", rename_all = "snake_case")]
pub enum GestureResolution {
    /// Animate the side-by-side pane to `target`.
    Snap { target: PinningState },
    /// Dismiss the modal pane.
    CloseModal,
    /// Animate the modal pane back to fully open.
    ReopenModal,
}

/// One engine step with deterministic telemetry fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureTransition {
    pub transition_id: u64,
    pub phase: GesturePhase,
    pub from: GestureState,
    pub to: GestureState,
    pub resolution: Option<GestureResolution>,
}

/// Read-only inputs the engine needs besides geometry.
#[derive(Debug, Clone, Copy)]
pub struct GestureContext<'a> {
    pub config: &'a SplitPaneConfig,
    pub bounds: Size,
    pub primary_view: ViewId,
}

/// Decide whether a released modal drag closes or re-opens the pane.
///
/// Closing an open pane takes a quarter-screen drag; a pane pulled in from
/// closed must come most of the way before release keeps it open.
#[must_use]
pub fn modal_release_decision(
    velocity_x: f64,
    leading_offset: f64,
    view_width: f64,
    open_clamp_location: f64,
    started_with_secondary_open: bool,
) -> GestureResolution {
    let fraction = if started_with_secondary_open {
        MODAL_CLOSE_FRACTION_FROM_OPEN
    } else {
        MODAL_CLOSE_FRACTION_FROM_CLOSED
    };
    let threshold = view_width * fraction + open_clamp_location;
    if velocity_x > MODAL_FLICK_VELOCITY
        || (velocity_x > -MODAL_FLICK_VELOCITY && leading_offset > threshold)
    {
        GestureResolution::CloseModal
    } else {
        GestureResolution::ReopenModal
    }
}

/// Runtime state machine for pane drags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GestureEngine {
    state: GestureState,
    transition_counter: u64,
}

impl GestureEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> GestureState {
        self.state
    }

    /// Whether a gesture is in progress (Armed or Dragging).
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.state, GestureState::Idle)
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// Apply one gesture event, mutating `geometry` and appending effects.
    pub fn apply(
        &mut self,
        event: &GestureEvent,
        geometry: &mut GeometryState,
        ctx: &GestureContext<'_>,
        hits: &dyn HitTester,
        effects: &mut Vec<SplitPaneEffect>,
    ) -> GestureTransition {
        let from = self.state;
        let mut resolution = None;

        if !event.position.is_finite()
            || !event.velocity.x.is_finite()
            || !event.velocity.y.is_finite()
        {
            effects.push(noop(SplitPaneNoopReason::NonFiniteInput));
            return self.record(event.phase, from, None);
        }

        match (self.state, event.phase) {
            (GestureState::Idle, GesturePhase::Began) => {
                self.begin(event, geometry, ctx, hits, effects);
            }
            (GestureState::Idle, _) => {
                effects.push(noop(SplitPaneNoopReason::IdleWithoutActiveGesture));
            }
            (_, GesturePhase::Began) => {
                effects.push(noop(SplitPaneNoopReason::GestureAlreadyActive));
            }
            (GestureState::Armed { session }, GesturePhase::Changed) => {
                if session.armed {
                    start_drag(&session, geometry, ctx, effects);
                    self.state = GestureState::Dragging { session };
                    update_drag(&session, event.position, geometry, ctx, effects);
                } else {
                    effects.push(SplitPaneEffect::RecognizerReset);
                }
            }
            (GestureState::Armed { .. }, _) => {
                self.state = GestureState::Idle;
                effects.push(noop(SplitPaneNoopReason::EndedBeforeDragging));
            }
            (GestureState::Dragging { session }, GesturePhase::Changed) => {
                update_drag(&session, event.position, geometry, ctx, effects);
            }
            (GestureState::Dragging { session }, _) => {
                self.state = GestureState::Idle;
                effects.push(SplitPaneEffect::PanFinished);
                let decided = resolve(&session, event.release_velocity(), geometry, ctx);
                tracing::debug!(
                    target: "ftui.split_pane",
                    mode = %session.mode,
                    phase = ?event.phase,
                    velocity = event.release_velocity(),
                    resolution = ?decided,
                    "pane drag released"
                );
                resolution = Some(decided);
            }
        }

        self.record(event.phase, from, resolution)
    }

    /// Drop any live gesture without resolving it.
    ///
    /// Used when the view resizes mid-drag: the geometry is about to be
    /// rebuilt, so snapping to the old layout would be wrong. Emits
    /// `PanFinished` if a drag had started.
    pub fn force_cancel(
        &mut self,
        geometry: &mut GeometryState,
        effects: &mut Vec<SplitPaneEffect>,
    ) -> Option<GestureTransition> {
        let from = self.state;
        match from {
            GestureState::Idle => None,
            GestureState::Armed { .. } => {
                self.state = GestureState::Idle;
                Some(self.record(GesturePhase::Cancelled, from, None))
            }
            GestureState::Dragging { .. } => {
                self.state = GestureState::Idle;
                geometry.end_side_drag();
                effects.push(SplitPaneEffect::PanFinished);
                tracing::debug!(target: "ftui.split_pane", "pane drag force-cancelled");
                Some(self.record(GesturePhase::Cancelled, from, None))
            }
        }
    }

    fn begin(
        &mut self,
        event: &GestureEvent,
        geometry: &GeometryState,
        ctx: &GestureContext<'_>,
        hits: &dyn HitTester,
        effects: &mut Vec<SplitPaneEffect>,
    ) {
        if !event.velocity.is_horizontal() {
            effects.push(noop(SplitPaneNoopReason::VerticalGesture));
            return;
        }
        let showing = geometry.is_secondary_showing();
        if !showing && !ctx.config.can_open_with_swipe {
            effects.push(noop(SplitPaneNoopReason::SwipeToOpenDisabled));
            return;
        }

        let mode = geometry.presentation_mode();
        let point = event.position;
        let (armed, modal_start_x) = match mode {
            PresentationMode::SideBySide => (hits.hit(HitRegion::SideHandle, point), None),
            PresentationMode::Modal => {
                let start_x = point.x - geometry.leading_offset() - ctx.config.modal_gap;
                let armed = hits.hit(HitRegion::ModalHandle, point)
                    || (ctx.config.allow_drag_modal && hits.hit(HitRegion::ModalContainer, point));
                (armed, Some(start_x))
            }
        };

        let session = GestureSession {
            started_with_secondary_open: showing,
            modal_start_x,
            armed,
            mode,
            origin: point,
        };
        self.state = GestureState::Armed { session };

        if armed {
            tracing::debug!(
                target: "ftui.split_pane",
                mode = %mode,
                showing,
                x = point.x,
                "pane gesture armed"
            );
        } else {
            effects.push(noop(SplitPaneNoopReason::OutsideHitRegion));
        }
    }

    fn record(
        &mut self,
        phase: GesturePhase,
        from: GestureState,
        resolution: Option<GestureResolution>,
    ) -> GestureTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        GestureTransition {
            transition_id: self.transition_counter,
            phase,
            from,
            to: self.state,
            resolution,
        }
    }
}

fn noop(reason: SplitPaneNoopReason) -> SplitPaneEffect {
    SplitPaneEffect::Noop { reason }
}

fn start_drag(
    session: &GestureSession,
    geometry: &mut GeometryState,
    ctx: &GestureContext<'_>,
    effects: &mut Vec<SplitPaneEffect>,
) {
    effects.push(SplitPaneEffect::PanStarted);
    match session.mode {
        PresentationMode::SideBySide => {
            effects.push(SplitPaneEffect::Notify(
                SplitPaneNotification::PrimaryWillChangeWidth {
                    view: ctx.primary_view,
                },
            ));
            if ctx.config.blur_on_resize && !geometry.blur_active() {
                geometry.set_blur_active(true);
                effects.push(SplitPaneEffect::BlurStarted {
                    fade: ctx.config.animation.blur_fade(),
                });
            }
            geometry.begin_side_drag();
        }
        PresentationMode::Modal => {
            if !geometry.is_secondary_showing() {
                geometry.begin_modal_drag_from_closed(ctx.bounds.width);
            }
        }
    }
    tracing::debug!(target: "ftui.split_pane", mode = %session.mode, "pane drag started");
}

fn update_drag(
    session: &GestureSession,
    position: Point,
    geometry: &mut GeometryState,
    ctx: &GestureContext<'_>,
    effects: &mut Vec<SplitPaneEffect>,
) {
    let view_width = ctx.bounds.width;
    match session.mode {
        PresentationMode::SideBySide => {
            geometry.apply_side_drag(position.x, view_width, ctx.config.minimum_width);
        }
        PresentationMode::Modal => {
            geometry.apply_modal_drag(
                position.x,
                view_width,
                ctx.config.modal_gap,
                session.modal_start_x.unwrap_or(0.0),
            );
        }
    }
    tracing::trace!(
        target: "ftui.split_pane",
        x = position.x,
        width = geometry.rendered_width(),
        leading = geometry.leading_offset(),
        "pane drag updated"
    );
    effects.push(SplitPaneEffect::GeometryChanged {
        geometry: *geometry,
    });
}

fn resolve(
    session: &GestureSession,
    velocity_x: f64,
    geometry: &GeometryState,
    ctx: &GestureContext<'_>,
) -> GestureResolution {
    match session.mode {
        PresentationMode::SideBySide => {
            let minimum = ctx.config.minimum_width;
            GestureResolution::Snap {
                target: closest_state(geometry.tracked_width(minimum), ctx.bounds.width, minimum),
            }
        }
        PresentationMode::Modal => modal_release_decision(
            velocity_x,
            geometry.leading_offset(),
            ctx.bounds.width,
            geometry.open_clamp_location(),
            session.started_with_secondary_open,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::ModalExtent;

    const W: f64 = 900.0;

    fn primary() -> ViewId {
        ViewId::new(1).expect("non-zero")
    }

    struct Harness {
        config: SplitPaneConfig,
        bounds: Size,
        geometry: GeometryState,
        engine: GestureEngine,
    }

    impl Harness {
        fn side_by_side(pinning: PinningState) -> Self {
            let bounds = Size::new(W, 700.0);
            let config = SplitPaneConfig::default();
            let mut geometry = GeometryState::new(bounds);
            geometry.set_presentation_mode(PresentationMode::SideBySide);
            geometry.apply_pinning(pinning, W, config.minimum_width);
            Self {
                config,
                bounds,
                geometry,
                engine: GestureEngine::new(),
            }
        }

        fn modal(width: f64, open: bool) -> Self {
            let bounds = Size::new(width, 800.0);
            let config = SplitPaneConfig::default();
            let mut geometry = GeometryState::new(bounds);
            geometry.set_modal_extent(
                ModalExtent::for_size(bounds, config.side_by_side_threshold()),
                width,
            );
            if open {
                geometry.present_modal();
            }
            Self {
                config,
                bounds,
                geometry,
                engine: GestureEngine::new(),
            }
        }

        fn send(&mut self, event: GestureEvent) -> (GestureTransition, Vec<SplitPaneEffect>) {
            let frames = self.geometry.frames(self.bounds, &self.config.handles);
            let ctx = GestureContext {
                config: &self.config,
                bounds: self.bounds,
                primary_view: primary(),
            };
            let mut effects = Vec::new();
            let transition =
                self.engine
                    .apply(&event, &mut self.geometry, &ctx, &frames, &mut effects);
            (transition, effects)
        }
    }

    fn swipe() -> Velocity {
        Velocity::new(-200.0, 10.0)
    }

    #[test]
    fn vertical_gesture_is_rejected() {
        let mut h = Harness::side_by_side(PinningState::OpenDefault);
        let (t, effects) = h.send(GestureEvent::began(
            Point::new(580.0, 100.0),
            Velocity::new(10.0, 300.0),
        ));
        assert_eq!(t.to, GestureState::Idle);
        assert_eq!(
            effects,
            vec![SplitPaneEffect::Noop {
                reason: SplitPaneNoopReason::VerticalGesture
            }]
        );
    }

    #[test]
    fn swipe_to_open_can_be_disabled() {
        let mut h = Harness::side_by_side(PinningState::Closed);
        h.config.can_open_with_swipe = false;
        let (t, effects) = h.send(GestureEvent::began(Point::new(890.0, 100.0), swipe()));
        assert_eq!(t.to, GestureState::Idle);
        assert!(effects.contains(&SplitPaneEffect::Noop {
            reason: SplitPaneNoopReason::SwipeToOpenDisabled
        }));
    }

    #[test]
    fn touch_outside_handle_is_inert() {
        let mut h = Harness::side_by_side(PinningState::OpenDefault);
        let (t, _) = h.send(GestureEvent::began(Point::new(100.0, 100.0), swipe()));
        assert!(matches!(
            t.to,
            GestureState::Armed { session } if !session.armed
        ));
        let before = h.geometry;
        let (t, effects) = h.send(GestureEvent::changed(Point::new(50.0, 100.0)));
        assert_eq!(effects, vec![SplitPaneEffect::RecognizerReset]);
        assert!(matches!(t.to, GestureState::Armed { .. }));
        assert_eq!(h.geometry, before);
        let (t, _) = h.send(GestureEvent::cancelled(Point::new(50.0, 100.0)));
        assert_eq!(t.to, GestureState::Idle);
        assert_eq!(t.resolution, None);
    }

    #[test]
    fn changed_without_began_is_noop() {
        let mut h = Harness::side_by_side(PinningState::OpenDefault);
        let before = h.geometry;
        let (t, effects) = h.send(GestureEvent::changed(Point::new(400.0, 100.0)));
        assert_eq!(t.from, GestureState::Idle);
        assert_eq!(t.to, GestureState::Idle);
        assert_eq!(
            effects,
            vec![SplitPaneEffect::Noop {
                reason: SplitPaneNoopReason::IdleWithoutActiveGesture
            }]
        );
        assert_eq!(h.geometry, before);
    }

    #[test]
    fn ended_before_dragging_has_no_resolution() {
        let mut h = Harness::side_by_side(PinningState::OpenDefault);
        h.send(GestureEvent::began(Point::new(585.0, 100.0), swipe()));
        let (t, effects) = h.send(GestureEvent::ended(Point::new(585.0, 100.0), swipe()));
        assert_eq!(t.resolution, None);
        assert_eq!(t.to, GestureState::Idle);
        assert!(!effects.contains(&SplitPaneEffect::PanFinished));
    }

    #[test]
    fn side_drag_announces_width_change_before_geometry() {
        let mut h = Harness::side_by_side(PinningState::OpenDefault);
        h.send(GestureEvent::began(Point::new(585.0, 100.0), swipe()));
        let (t, effects) = h.send(GestureEvent::changed(Point::new(400.0, 100.0)));
        assert!(matches!(t.to, GestureState::Dragging { .. }));
        assert_eq!(effects[0], SplitPaneEffect::PanStarted);
        assert_eq!(
            effects[1],
            SplitPaneEffect::Notify(SplitPaneNotification::PrimaryWillChangeWidth {
                view: primary()
            })
        );
        assert!(matches!(effects[2], SplitPaneEffect::BlurStarted { .. }));
        assert!(matches!(
            effects.last(),
            Some(SplitPaneEffect::GeometryChanged { .. })
        ));
        assert_eq!(h.geometry.dragging_width(), Some(500.0));
    }

    #[test]
    fn side_drag_release_snaps_to_closest_state() {
        let mut h = Harness::side_by_side(PinningState::OpenDefault);
        h.send(GestureEvent::began(Point::new(585.0, 100.0), swipe()));
        h.send(GestureEvent::changed(Point::new(400.0, 100.0)));
        h.send(GestureEvent::changed(Point::new(440.0, 100.0)));
        let (t, effects) = h.send(GestureEvent::ended(Point::new(440.0, 100.0), swipe()));
        assert_eq!(
            t.resolution,
            Some(GestureResolution::Snap {
                target: PinningState::OpenHalf
            })
        );
        assert_eq!(effects, vec![SplitPaneEffect::PanFinished]);
    }

    #[test]
    fn rubber_band_far_past_minimum_snaps_closed() {
        let mut h = Harness::side_by_side(PinningState::OpenDefault);
        h.send(GestureEvent::began(Point::new(585.0, 100.0), swipe()));
        h.send(GestureEvent::changed(Point::new(880.0, 100.0)));
        assert_eq!(h.geometry.rendered_width(), 320.0);
        let (t, _) = h.send(GestureEvent::ended(Point::new(880.0, 100.0), Velocity::ZERO));
        assert_eq!(
            t.resolution,
            Some(GestureResolution::Snap {
                target: PinningState::Closed
            })
        );
    }

    #[test]
    fn modal_open_from_closed_goes_live_first() {
        let mut h = Harness::modal(400.0, false);
        let (t, _) = h.send(GestureEvent::began(Point::new(395.0, 300.0), swipe()));
        let session = *t.to.session().expect("session");
        assert!(session.armed);
        assert!(!session.started_with_secondary_open);
        assert_eq!(session.modal_start_x, Some(395.0 - 400.0 - 20.0));
        let (_, effects) = h.send(GestureEvent::changed(Point::new(300.0, 300.0)));
        assert_eq!(effects[0], SplitPaneEffect::PanStarted);
        assert!(h.geometry.is_secondary_showing());
        assert_eq!(h.geometry.edge_shadow_opacity(), 1.0);
        assert_eq!(h.geometry.leading_offset(), 305.0);
        assert!((h.geometry.shadow_opacity() - 0.25).abs() < 1e-9);
    }

    #[test]
    fn modal_drag_respects_clamp_in_landscape() {
        let mut h = Harness::modal(844.0, true);
        h.bounds = Size::new(844.0, 390.0);
        h.geometry.set_modal_extent(ModalExtent::for_size(h.bounds, 660.0), 844.0);
        assert_eq!(h.geometry.leading_offset(), 454.0);
        h.send(GestureEvent::began(Point::new(460.0, 200.0), swipe()));
        h.send(GestureEvent::changed(Point::new(10.0, 200.0)));
        assert_eq!(h.geometry.leading_offset(), 454.0);
    }

    #[test]
    fn modal_open_small_drag_slow_release_closes_past_quarter() {
        // Started open, v = 5, leading 0.3W with clamp 0: past 0.25W, closes.
        assert_eq!(
            modal_release_decision(5.0, 0.3 * 400.0, 400.0, 0.0, true),
            GestureResolution::CloseModal
        );
    }

    #[test]
    fn modal_closed_half_drag_reopens() {
        // Started closed, v = -5, leading 0.5W: below 0.75W, re-opens.
        assert_eq!(
            modal_release_decision(-5.0, 0.5 * 400.0, 400.0, 0.0, false),
            GestureResolution::ReopenModal
        );
    }

    #[test]
    fn modal_flicks_override_position() {
        assert_eq!(
            modal_release_decision(11.0, 0.0, 400.0, 0.0, true),
            GestureResolution::CloseModal
        );
        assert_eq!(
            modal_release_decision(-11.0, 390.0, 400.0, 0.0, true),
            GestureResolution::ReopenModal
        );
    }

    #[test]
    fn cancelled_modal_drag_ignores_velocity() {
        let mut h = Harness::modal(400.0, true);
        h.send(GestureEvent::began(Point::new(100.0, 300.0), swipe()));
        h.send(GestureEvent::changed(Point::new(150.0, 300.0)));
        let (t, _) = h.send(GestureEvent::new(
            GesturePhase::Cancelled,
            Point::new(150.0, 300.0),
            Velocity::new(500.0, 0.0),
        ));
        // Leading offset 50 is below 0.25W = 100; a neutral velocity re-opens.
        assert_eq!(t.resolution, Some(GestureResolution::ReopenModal));
    }

    #[test]
    fn second_began_is_ignored() {
        let mut h = Harness::side_by_side(PinningState::OpenDefault);
        h.send(GestureEvent::began(Point::new(585.0, 100.0), swipe()));
        let (t, effects) = h.send(GestureEvent::began(Point::new(100.0, 100.0), swipe()));
        assert_eq!(t.from, t.to);
        assert!(effects.contains(&SplitPaneEffect::Noop {
            reason: SplitPaneNoopReason::GestureAlreadyActive
        }));
    }

    #[test]
    fn non_finite_input_is_noop() {
        let mut h = Harness::side_by_side(PinningState::OpenDefault);
        let (t, effects) = h.send(GestureEvent::began(Point::new(f64::NAN, 1.0), swipe()));
        assert_eq!(t.to, GestureState::Idle);
        assert_eq!(
            effects,
            vec![SplitPaneEffect::Noop {
                reason: SplitPaneNoopReason::NonFiniteInput
            }]
        );
    }

    #[test]
    fn force_cancel_finishes_live_drag() {
        let mut h = Harness::side_by_side(PinningState::OpenDefault);
        let mut effects = Vec::new();
        assert!(h.engine.force_cancel(&mut h.geometry, &mut effects).is_none());
        h.send(GestureEvent::began(Point::new(585.0, 100.0), swipe()));
        h.send(GestureEvent::changed(Point::new(400.0, 100.0)));
        let t = h
            .engine
            .force_cancel(&mut h.geometry, &mut effects)
            .expect("active drag");
        assert_eq!(t.to, GestureState::Idle);
        assert_eq!(effects, vec![SplitPaneEffect::PanFinished]);
        assert_eq!(h.geometry.dragging_width(), None);
    }

    #[test]
    fn transition_ids_increase() {
        let mut h = Harness::side_by_side(PinningState::OpenDefault);
        let (a, _) = h.send(GestureEvent::began(Point::new(585.0, 100.0), swipe()));
        let (b, _) = h.send(GestureEvent::changed(Point::new(500.0, 100.0)));
        assert!(b.transition_id > a.transition_id);
    }
}
