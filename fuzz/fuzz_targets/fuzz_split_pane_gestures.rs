#![no_main]

use arbitrary::Arbitrary;
use ftui_split_pane::{
    GestureEvent, GesturePhase, PinningState, Point, PresentationMode, Size, SplitPaneConfig,
    SplitPaneController, SplitPaneEffect, Velocity, ViewId,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Show { animated: bool, half: bool },
    Dismiss { animated: bool },
    Resize { width: u16, height: u16 },
    Layout { width: u16, height: u16 },
    Tap { x: i16, y: i16 },
    Gesture { phase: u8, x: i16, y: i16, vx: i16, vy: i16 },
    CompletePending,
}

#[derive(Debug, Arbitrary)]
struct Input {
    width: u16,
    height: u16,
    ops: Vec<Op>,
}

fn phase(raw: u8) -> GesturePhase {
    match raw % 5 {
        0 => GesturePhase::Began,
        1 => GesturePhase::Changed,
        2 => GesturePhase::Ended,
        3 => GesturePhase::Cancelled,
        _ => GesturePhase::Failed,
    }
}

// Degenerate zero-extent views are excluded: hidden and open modal offsets coincide.
fn size(width: u16, height: u16) -> Size {
    Size::new(f64::from(width % 2048 + 1), f64::from(height % 2048 + 1))
}

fuzz_target!(|input: Input| {
    let Ok(primary) = ViewId::new(1) else { return };
    let Ok(secondary) = ViewId::new(2) else { return };
    let Ok(mut controller) = SplitPaneController::new(
        SplitPaneConfig::default(),
        primary,
        secondary,
        size(input.width, input.height),
    ) else {
        return;
    };

    for op in input.ops.into_iter().take(256) {
        let effects = match op {
            Op::Show { animated, half } => {
                let pinning = if half {
                    PinningState::OpenHalf
                } else {
                    PinningState::OpenDefault
                };
                controller.show_pinned(animated, pinning)
            }
            Op::Dismiss { animated } => controller.dismiss(animated),
            Op::Resize { width, height } => controller.handle_size_change(size(width, height)),
            Op::Layout { width, height } => controller.handle_layout(size(width, height)),
            Op::Tap { x, y } => controller.tap(Point::new(f64::from(x), f64::from(y))),
            Op::Gesture { phase: p, x, y, vx, vy } => controller.handle_gesture(GestureEvent::new(
                phase(p),
                Point::new(f64::from(x), f64::from(y)),
                Velocity::new(f64::from(vx), f64::from(vy)),
            )),
            Op::CompletePending => {
                let pending: Vec<_> = controller.pending_animations().map(|(id, _)| id).collect();
                pending
                    .into_iter()
                    .flat_map(|id| controller.complete_animation(id))
                    .collect()
            }
        };

        // Post-conditions that must always hold:
        let geometry = *controller.geometry();
        for effect in &effects {
            if let SplitPaneEffect::GeometryChanged { geometry } = effect {
                assert!(geometry.leading_offset().is_finite(), "leading offset not finite");
                assert!(geometry.rendered_width() >= 0.0, "negative pane width");
            }
        }
        assert!(geometry.current_width() <= controller.bounds().width, "pane wider than view");
        assert!(
            (0.0..=1.0).contains(&geometry.shadow_opacity()),
            "shadow opacity out of range"
        );
        if controller.presentation_mode() == PresentationMode::Modal {
            assert_eq!(geometry.current_width(), 0.0, "side width in modal mode");
        }
        if controller.gesture_state().session().is_none() {
            assert!(geometry.is_consistent(), "settled geometry inconsistent");
        }
    }
});
