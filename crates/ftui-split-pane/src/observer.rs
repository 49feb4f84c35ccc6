#![forbid(unsafe_code)]

//! Per-controller notification registry and delegate hook.
//!
//! Each controller owns one [`SplitPaneObservers`]; subscriptions never leak
//! between controllers living in the same process. The delegate is held
//! weakly: the controller reports pan start/finish to it but never keeps it
//! alive.

use std::fmt;
use std::rc::Weak;

use crate::effect::{NotificationKind, SplitPaneEffect, SplitPaneNotification};

/// Receives pan lifecycle callbacks.
pub trait SplitPaneDelegate {
    /// A drag on the pane started moving it.
    fn on_pan_start(&self) {}
    /// The drag was released and its resolution has begun.
    fn on_pan_finish(&self) {}
}

/// Token returned by [`SplitPaneObservers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&SplitPaneNotification)>;

struct Subscription {
    id: SubscriptionId,
    kind: NotificationKind,
    listener: Listener,
}

/// Notification subscribers plus the optional delegate.
#[derive(Default)]
pub struct SplitPaneObservers {
    next_id: u64,
    subscriptions: Vec<Subscription>,
    delegate: Option<Weak<dyn SplitPaneDelegate>>,
}

impl fmt::Debug for SplitPaneObservers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplitPaneObservers")
            .field("subscriptions", &self.subscriptions.len())
            .field("has_delegate", &self.delegate.is_some())
            .finish()
    }
}

impl SplitPaneObservers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `listener` for every notification of `kind`, in subscription
    /// order.
    pub fn subscribe<F>(&mut self, kind: NotificationKind, listener: F) -> SubscriptionId
    where
        F: FnMut(&SplitPaneNotification) + 'static,
    {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscriptions.push(Subscription {
            id,
            kind,
            listener: Box::new(listener),
        });
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn set_delegate(&mut self, delegate: Option<Weak<dyn SplitPaneDelegate>>) {
        self.delegate = delegate;
    }

    /// Deliver notifications and delegate callbacks found in `effects`.
    pub fn dispatch(&mut self, effects: &[SplitPaneEffect]) {
        for effect in effects {
            match effect {
                SplitPaneEffect::Notify(notification) => {
                    let kind = notification.kind();
                    for subscription in self.subscriptions.iter_mut().filter(|s| s.kind == kind) {
                        (subscription.listener)(notification);
                    }
                }
                SplitPaneEffect::PanStarted => {
                    if let Some(delegate) = self.delegate.as_ref().and_then(Weak::upgrade) {
                        delegate.on_pan_start();
                    }
                }
                SplitPaneEffect::PanFinished => {
                    if let Some(delegate) = self.delegate.as_ref().and_then(Weak::upgrade) {
                        delegate.on_pan_finish();
                    }
                }
                _ => {}
            }
        }
    }
}
