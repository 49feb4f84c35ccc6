#![forbid(unsafe_code)]

//! FrankenTUI Split Pane
//!
//! A two-pane layout controller for touch surfaces. A primary pane fills the
//! view; a secondary pane either sits beside it (side-by-side) or slides over
//! it from the trailing edge (modal), depending on the available width.
//!
//! # Key Components
//!
//! - [`SplitPaneController`] - Presentation API: show, dismiss, resize, gestures
//! - [`GeometryState`] - Renderer-agnostic pane geometry
//! - [`GestureEngine`] - Pan-gesture state machine with snap/close resolution
//! - [`PinningState`] - Resting widths of a side-by-side pane
//! - [`SplitPaneEffect`] - Ordered side effects returned by every operation
//! - [`SplitPaneConfig`] - Tunables, loadable from TOML
//!
//! # How it fits in the system
//! The controller owns no views. Hosts feed it sizes, taps and gesture
//! phases, render the returned [`GeometryState`], run the requested
//! animations, and report completion back through
//! [`SplitPaneController::complete_animation`].

pub mod config;
pub mod controller;
pub mod effect;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod observer;
pub mod pinning;
pub mod presentation;
pub mod state;

pub use config::{AnimationTiming, HandleMetrics, SplitPaneConfig};
pub use controller::{SplitPaneBuilder, SplitPaneController, SplitPaneSnapshot};
pub use effect::{
    AnimationId, AnimationPurpose, NotificationKind, PaneContainer, SplitPaneEffect,
    SplitPaneNoopReason, SplitPaneNotification, ViewId,
};
pub use error::ConfigurationError;
pub use geometry::{Point, Rect, Size, Velocity};
pub use gesture::{
    GestureEngine, GestureEvent, GesturePhase, GestureResolution, GestureState,
    GestureTransition, HitRegion, HitTester,
};
pub use observer::{SplitPaneDelegate, SplitPaneObservers, SubscriptionId};
pub use pinning::{PinningState, closest_state, width_for};
pub use presentation::{ModalExtent, PresentationMode, mode_for, side_by_side_threshold};
pub use state::{GeometryState, HandleInteractivity, PaneFrames, PaneTarget};
