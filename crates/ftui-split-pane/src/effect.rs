#![forbid(unsafe_code)]

//! Side effects emitted by controller transitions.
//!
//! Every public controller operation returns the ordered list of effects it
//! produced. The rendering layer applies geometry and animation effects; the
//! controller's observer registry delivers notifications and delegate
//! callbacks. Ordering within one list is significant:
//!
//! - `PrimaryWillChangeWidth` precedes the `GeometryChanged` it announces.
//! - `PrimaryDidChangeWidth` follows the animation's completion (or the
//!   geometry change directly when unanimated).
//! - `SecondaryDidClose` follows the completion and only for animated closes.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::pinning::PinningState;
use crate::presentation::PresentationMode;
use crate::state::GeometryState;

/// Identity of a hosted view, carried by notifications.
///
/// `0` is reserved/invalid so IDs are always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(u64);

impl ViewId {
    pub fn new(raw: u64) -> Result<Self, ConfigurationError> {
        if raw == 0 {
            return Err(ConfigurationError::ReservedViewId);
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// Lifecycle notifications delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "notification", rename_all = "snake_case")]
pub enum SplitPaneNotification {
    PrimaryWillChangeWidth { view: ViewId },
    PrimaryDidChangeWidth { view: ViewId },
    SecondaryDidClose { view: ViewId },
}

impl SplitPaneNotification {
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        match self {
            Self::PrimaryWillChangeWidth { .. } => NotificationKind::PrimaryWillChangeWidth,
            Self::PrimaryDidChangeWidth { .. } => NotificationKind::PrimaryDidChangeWidth,
            Self::SecondaryDidClose { .. } => NotificationKind::SecondaryDidClose,
        }
    }

    #[must_use]
    pub const fn view(&self) -> ViewId {
        match self {
            Self::PrimaryWillChangeWidth { view }
            | Self::PrimaryDidChangeWidth { view }
            | Self::SecondaryDidClose { view } => *view,
        }
    }
}

/// Subscription key for [`SplitPaneNotification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    PrimaryWillChangeWidth,
    PrimaryDidChangeWidth,
    SecondaryDidClose,
}

/// Handle for a pending animation; pass it back to
/// `SplitPaneController::complete_animation` when the animation finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationId(u64);

impl AnimationId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// What a pending animation finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "purpose", rename_all = "snake_case")]
pub enum AnimationPurpose {
    Show { mode: PresentationMode },
    Dismiss { mode: PresentationMode },
    Snap { target: PinningState },
}

/// Which container currently hosts the secondary view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaneContainer {
    SideBySide,
    Modal,
}

impl From<PresentationMode> for PaneContainer {
    fn from(mode: PresentationMode) -> Self {
        match mode {
            PresentationMode::SideBySide => Self::SideBySide,
            PresentationMode::Modal => Self::Modal,
        }
    }
}

/// Explicit diagnostics for input that was safely ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitPaneNoopReason {
    AlreadyShowing,
    NotShowing,
    ShowWithClosedPinning,
    VerticalGesture,
    SwipeToOpenDisabled,
    GestureAlreadyActive,
    IdleWithoutActiveGesture,
    OutsideHitRegion,
    EndedBeforeDragging,
    UnknownAnimation,
    InvalidSize,
    NonFiniteInput,
    TapOutsideTargets,
    GestureInProgress,
}

/// One side effect of a controller transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum SplitPaneEffect {
    /// Deliver a lifecycle notification to subscribers.
    Notify(SplitPaneNotification),
    /// Delegate: a pane drag started.
    PanStarted,
    /// Delegate: a pane drag was resolved.
    PanFinished,
    /// Geometry the rendering layer should now reflect.
    GeometryChanged { geometry: GeometryState },
    /// Animate from the previous geometry to the last `GeometryChanged`.
    AnimationStarted {
        id: AnimationId,
        duration: Duration,
        purpose: AnimationPurpose,
    },
    /// Fade in the resize blur over both panes.
    BlurStarted { fade: Duration },
    /// Fade out and remove the resize blur.
    BlurEnded { fade: Duration },
    /// The secondary view moved to another container.
    SecondaryReparented { container: PaneContainer },
    /// The platform gesture recognizer should drop the current touch.
    RecognizerReset,
    Noop { reason: SplitPaneNoopReason },
}

impl SplitPaneEffect {
    /// The notification carried by this effect, if any.
    #[must_use]
    pub const fn notification(&self) -> Option<SplitPaneNotification> {
        match self {
            Self::Notify(notification) => Some(*notification),
            _ => None,
        }
    }
}
