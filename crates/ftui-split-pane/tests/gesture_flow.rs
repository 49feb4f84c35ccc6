#![forbid(unsafe_code)]

//! Full drag flows through the controller: arm, drag, release, animate.
//!
//! Run:
//!   cargo test -p ftui-split-pane --test gesture_flow

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use ftui_split_pane::{
    AnimationId, GestureEvent, GestureResolution, GestureState, HitRegion, HitTester,
    NotificationKind, PinningState, Point, PresentationMode, Size, SplitPaneBuilder,
    SplitPaneConfig, SplitPaneController, SplitPaneDelegate, SplitPaneEffect, SplitPaneNoopReason,
    SplitPaneNotification, Velocity, ViewId,
};

/// Horizontal velocity reported when a drag begins.
const SWIPE: Velocity = Velocity::new(-200.0, 0.0);

#[derive(Default)]
struct RecordingDelegate {
    started: Cell<u32>,
    finished: Cell<u32>,
}

impl SplitPaneDelegate for RecordingDelegate {
    fn on_pan_start(&self) {
        self.started.set(self.started.get() + 1);
    }

    fn on_pan_finish(&self) {
        self.finished.set(self.finished.get() + 1);
    }
}

struct Harness {
    controller: SplitPaneController,
    delegate: Rc<RecordingDelegate>,
    notifications: Rc<RefCell<Vec<SplitPaneNotification>>>,
}

impl Harness {
    fn new(width: f64, height: f64) -> Self {
        Self::with_config(SplitPaneConfig::default(), width, height)
    }

    fn with_config(config: SplitPaneConfig, width: f64, height: f64) -> Self {
        let delegate = Rc::new(RecordingDelegate::default());
        let weak: Weak<dyn SplitPaneDelegate> = {
            let strong: Rc<dyn SplitPaneDelegate> = delegate.clone();
            Rc::downgrade(&strong)
        };
        let mut controller = SplitPaneBuilder::new()
            .config(config)
            .primary_view(ViewId::new(1).expect("non-zero"))
            .secondary_view(ViewId::new(2).expect("non-zero"))
            .bounds(Size::new(width, height))
            .delegate(weak)
            .build()
            .expect("valid controller");

        let notifications = Rc::new(RefCell::new(Vec::new()));
        for kind in [
            NotificationKind::PrimaryWillChangeWidth,
            NotificationKind::PrimaryDidChangeWidth,
            NotificationKind::SecondaryDidClose,
        ] {
            let sink = Rc::clone(&notifications);
            controller.subscribe(kind, move |n| sink.borrow_mut().push(*n));
        }

        Self {
            controller,
            delegate,
            notifications,
        }
    }

    fn kinds(&self) -> Vec<NotificationKind> {
        self.notifications.borrow().iter().map(|n| n.kind()).collect()
    }

    fn clear(&self) {
        self.notifications.borrow_mut().clear();
    }

    /// Run a complete drag and finish any animation it starts.
    fn drag(&mut self, from: Point, path: &[f64], release_velocity: f64) -> Vec<SplitPaneEffect> {
        let c = &mut self.controller;
        c.handle_gesture(GestureEvent::began(from, SWIPE));
        for &x in path {
            c.handle_gesture(GestureEvent::changed(Point::new(x, from.y)));
        }
        let last_x = path.last().copied().unwrap_or(from.x);
        let effects = c.handle_gesture(GestureEvent::ended(
            Point::new(last_x, from.y),
            Velocity::new(release_velocity, 0.0),
        ));
        if let Some(id) = animation(&effects) {
            c.complete_animation(id);
        }
        effects
    }
}

fn animation(effects: &[SplitPaneEffect]) -> Option<AnimationId> {
    effects.iter().find_map(|effect| match effect {
        SplitPaneEffect::AnimationStarted { id, .. } => Some(*id),
        _ => None,
    })
}

fn resolution(c: &SplitPaneController) -> Option<GestureResolution> {
    c.last_gesture_transition().and_then(|t| t.resolution)
}

#[test]
fn side_drag_snaps_to_half_width() {
    let mut h = Harness::new(1024.0, 768.0);
    h.controller.show(false);
    h.clear();

    // The grip sits 5pt inside the container's leading edge at x = 704.
    h.drag(Point::new(709.0, 300.0), &[600.0, 520.0], -100.0);

    assert_eq!(
        resolution(&h.controller),
        Some(GestureResolution::Snap {
            target: PinningState::OpenHalf
        })
    );
    assert_eq!(h.controller.pinning_state(), PinningState::OpenHalf);
    assert_eq!(h.controller.geometry().current_width(), 512.0);
    assert_eq!(h.controller.geometry().dragging_width(), None);
    assert!(!h.controller.geometry().blur_active());
    assert_eq!(
        h.kinds(),
        vec![
            NotificationKind::PrimaryWillChangeWidth,
            NotificationKind::PrimaryDidChangeWidth,
        ]
    );
    assert_eq!(h.delegate.started.get(), 1);
    assert_eq!(h.delegate.finished.get(), 1);
}

#[test]
fn side_rubber_band_past_half_minimum_closes() {
    let mut h = Harness::new(1024.0, 768.0);
    h.controller.show(false);
    h.clear();

    h.controller
        .handle_gesture(GestureEvent::began(Point::new(709.0, 300.0), Velocity::new(500.0, 0.0)));
    h.controller
        .handle_gesture(GestureEvent::changed(Point::new(1000.0, 300.0)));
    let geometry = *h.controller.geometry();
    assert_eq!(geometry.dragging_width(), Some(320.0));
    assert_eq!(geometry.trailing_offset(), 296.0);

    let effects = h.controller.handle_gesture(GestureEvent::ended(
        Point::new(1000.0, 300.0),
        Velocity::new(500.0, 0.0),
    ));
    assert_eq!(
        resolution(&h.controller),
        Some(GestureResolution::Snap {
            target: PinningState::Closed
        })
    );
    assert!(!h.controller.is_secondary_showing());
    h.controller
        .complete_animation(animation(&effects).expect("snap animates"));
    assert_eq!(
        h.kinds(),
        vec![
            NotificationKind::PrimaryWillChangeWidth,
            NotificationKind::PrimaryDidChangeWidth,
            NotificationKind::SecondaryDidClose,
        ]
    );
}

#[test]
fn side_touch_outside_handle_resets_recognizer() {
    let mut h = Harness::new(1024.0, 768.0);
    h.controller.show(false);
    let effects = h
        .controller
        .handle_gesture(GestureEvent::began(Point::new(300.0, 300.0), Velocity::new(200.0, 0.0)));
    assert_eq!(
        effects,
        vec![SplitPaneEffect::Noop {
            reason: SplitPaneNoopReason::OutsideHitRegion
        }]
    );
    let effects = h
        .controller
        .handle_gesture(GestureEvent::changed(Point::new(320.0, 300.0)));
    assert_eq!(effects, vec![SplitPaneEffect::RecognizerReset]);
    assert_eq!(h.controller.geometry().current_width(), 320.0);
    assert_eq!(h.delegate.started.get(), 0);
}

#[test]
fn modal_flick_closes() {
    let mut h = Harness::new(500.0, 900.0);
    h.controller.show(false);
    h.clear();

    h.drag(Point::new(30.0, 400.0), &[300.0], 300.0);

    assert_eq!(resolution(&h.controller), Some(GestureResolution::CloseModal));
    assert!(!h.controller.is_secondary_showing());
    assert_eq!(h.controller.geometry().leading_offset(), 500.0);
    assert_eq!(h.kinds(), vec![NotificationKind::SecondaryDidClose]);
}

#[test]
fn modal_tracks_touch_and_dims_primary() {
    let mut h = Harness::new(500.0, 900.0);
    h.controller.show(false);
    h.controller
        .handle_gesture(GestureEvent::began(Point::new(30.0, 400.0), Velocity::new(300.0, 0.0)));
    h.controller
        .handle_gesture(GestureEvent::changed(Point::new(300.0, 400.0)));
    let geometry = h.controller.geometry();
    // start offset = 30 - 0 - 20
    assert_eq!(geometry.leading_offset(), 270.0);
    assert!((geometry.shadow_opacity() - 0.4).abs() < 1e-9);
}

#[test]
fn modal_short_slow_drag_reopens() {
    let mut h = Harness::new(500.0, 900.0);
    h.controller.show(false);
    h.clear();

    let effects = h.drag(Point::new(30.0, 400.0), &[130.0], 0.0);
    assert!(matches!(
        h.controller.gesture_state(),
        GestureState::Idle
    ));
    assert_eq!(resolution(&h.controller), Some(GestureResolution::ReopenModal));
    assert!(animation(&effects).is_some());
    assert!(h.controller.is_secondary_showing());
    assert_eq!(h.controller.geometry().leading_offset(), 0.0);
    assert_eq!(h.controller.pinning_state(), PinningState::OpenDefault);
    assert!(h.kinds().is_empty());
}

#[test]
fn modal_swipe_open_from_closed() {
    let mut h = Harness::new(600.0, 390.0);
    // Closed modal handle straddles the trailing edge.
    h.controller
        .handle_gesture(GestureEvent::began(Point::new(590.0, 200.0), Velocity::new(-400.0, 0.0)));
    h.controller
        .handle_gesture(GestureEvent::changed(Point::new(560.0, 200.0)));
    assert!(h.controller.is_secondary_showing());
    assert_eq!(h.controller.geometry().edge_shadow_opacity(), 1.0);

    h.controller
        .handle_gesture(GestureEvent::changed(Point::new(100.0, 200.0)));
    // Never past the landscape clamp.
    assert_eq!(h.controller.geometry().leading_offset(), 210.0);

    let effects = h.controller.handle_gesture(GestureEvent::ended(
        Point::new(100.0, 200.0),
        Velocity::new(-400.0, 0.0),
    ));
    assert_eq!(resolution(&h.controller), Some(GestureResolution::ReopenModal));
    h.controller
        .complete_animation(animation(&effects).expect("reopen animates"));
    assert!(h.controller.is_secondary_showing());
    assert!(h.controller.geometry().is_consistent());
}

#[test]
fn swipe_open_disabled_keeps_pane_closed() {
    let config = SplitPaneConfig {
        can_open_with_swipe: false,
        ..SplitPaneConfig::default()
    };
    let mut h = Harness::with_config(config, 500.0, 900.0);
    let effects = h
        .controller
        .handle_gesture(GestureEvent::began(Point::new(490.0, 200.0), Velocity::new(-400.0, 0.0)));
    assert_eq!(
        effects,
        vec![SplitPaneEffect::Noop {
            reason: SplitPaneNoopReason::SwipeToOpenDisabled
        }]
    );
    assert!(matches!(h.controller.gesture_state(), GestureState::Idle));
}

#[test]
fn size_change_mid_drag_cancels_gesture() {
    let mut h = Harness::new(1024.0, 768.0);
    h.controller.show(false);
    h.controller
        .handle_gesture(GestureEvent::began(Point::new(709.0, 300.0), Velocity::new(-300.0, 0.0)));
    h.controller
        .handle_gesture(GestureEvent::changed(Point::new(600.0, 300.0)));
    assert!(h.controller.geometry().blur_active());

    let effects = h.controller.handle_width_change(500.0);
    assert!(effects.contains(&SplitPaneEffect::PanFinished));
    assert_eq!(h.delegate.finished.get(), 1);
    assert!(matches!(h.controller.gesture_state(), GestureState::Idle));
    assert!(!h.controller.geometry().blur_active());
    assert_eq!(h.controller.presentation_mode(), PresentationMode::Modal);
    assert!(h.controller.is_secondary_showing());

    // The stale release is ignored.
    let effects = h.controller.handle_gesture(GestureEvent::ended(
        Point::new(600.0, 300.0),
        Velocity::new(-300.0, 0.0),
    ));
    assert_eq!(
        effects,
        vec![SplitPaneEffect::Noop {
            reason: SplitPaneNoopReason::IdleWithoutActiveGesture
        }]
    );
}

#[test]
fn size_change_mid_open_swipe_leaves_modal_closed() {
    let mut h = Harness::new(500.0, 900.0);
    h.controller
        .handle_gesture(GestureEvent::began(Point::new(490.0, 200.0), Velocity::new(-400.0, 0.0)));
    h.controller
        .handle_gesture(GestureEvent::changed(Point::new(300.0, 200.0)));
    assert!(h.controller.is_secondary_showing());

    assert_eq!(h.controller.geometry().edge_shadow_opacity(), 1.0);

    h.controller.handle_size_change(Size::new(900.0, 500.0));
    assert!(!h.controller.is_secondary_showing());
    assert_eq!(h.controller.presentation_mode(), PresentationMode::SideBySide);
    assert_eq!(h.controller.geometry().edge_shadow_opacity(), 0.0);
    assert!(h.kinds().is_empty());
}

#[test]
fn drag_during_animated_show_keeps_single_blur() {
    let mut h = Harness::new(1024.0, 768.0);
    let shown = h.controller.show(true);
    let show_id = animation(&shown).expect("show animates");
    assert!(h.controller.geometry().blur_active());

    let blur_started = |effects: &[SplitPaneEffect]| {
        effects
            .iter()
            .filter(|e| matches!(e, SplitPaneEffect::BlurStarted { .. }))
            .count()
    };
    let blur_ended = |effects: &[SplitPaneEffect]| {
        effects
            .iter()
            .filter(|e| matches!(e, SplitPaneEffect::BlurEnded { .. }))
            .count()
    };

    let mut effects = h
        .controller
        .handle_gesture(GestureEvent::began(Point::new(709.0, 300.0), SWIPE));
    effects.extend(
        h.controller
            .handle_gesture(GestureEvent::changed(Point::new(600.0, 300.0))),
    );
    assert!(matches!(
        h.controller.gesture_state(),
        GestureState::Dragging { .. }
    ));
    assert_eq!(blur_started(&effects), 0);

    let released = h.controller.handle_gesture(GestureEvent::ended(
        Point::new(600.0, 300.0),
        Velocity::new(-100.0, 0.0),
    ));
    let snapped = h
        .controller
        .complete_animation(animation(&released).expect("snap animates"));
    assert_eq!(blur_ended(&snapped), 1);
    let finished = h.controller.complete_animation(show_id);
    assert_eq!(blur_ended(&finished), 0);
    assert_eq!(blur_started(&released) + blur_started(&snapped), 0);
    assert!(!h.controller.geometry().blur_active());
}

struct OnlyModalHandle;

impl HitTester for OnlyModalHandle {
    fn hit(&self, region: HitRegion, _point: Point) -> bool {
        region == HitRegion::ModalHandle
    }
}

#[test]
fn host_hit_tester_overrides_frames() {
    let mut h = Harness::new(500.0, 900.0);
    h.controller.show(false);
    h.controller.handle_gesture_with(
        GestureEvent::began(Point::new(250.0, 400.0), Velocity::new(300.0, 0.0)),
        &OnlyModalHandle,
    );
    assert!(matches!(
        h.controller.gesture_state(),
        GestureState::Armed { session } if session.armed
    ));
}
