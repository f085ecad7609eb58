//! Viewport visibility tracking for a single element.

use crate::intersection::{IntersectionEntry, IntersectionSource, ObserveOptions, RootMargin};
use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

#[derive(Clone, Debug, PartialEq)]
pub struct VisibilityOptions {
    pub threshold: f64,
    pub root_margin: RootMargin,
    pub trigger_once: bool,
}

impl Default for VisibilityOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            root_margin: RootMargin::default(),
            trigger_once: false,
        }
    }
}

impl VisibilityOptions {
    fn observe_options(&self) -> ObserveOptions {
        ObserveOptions {
            threshold: self.threshold,
            root_margin: self.root_margin,
        }
    }
}

/// What an entry did to the signal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Applied {
    pub changed: bool,
    pub stop_observing: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisibilityState {
    pub is_intersecting: bool,
    latched: bool,
}

impl VisibilityState {
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Folds one entry into the signal. A latched signal ignores everything.
    pub fn apply(&mut self, entry: IntersectionEntry, options: &VisibilityOptions) -> Applied {
        if self.latched {
            return Applied::default();
        }

        let was = self.is_intersecting;
        if entry.meets(options.threshold) {
            self.is_intersecting = true;
            self.latched = options.trigger_once;
            Applied {
                changed: !was,
                stop_observing: self.latched,
            }
        } else {
            self.is_intersecting = false;
            Applied {
                changed: was,
                stop_observing: false,
            }
        }
    }
}

struct Shared<S: IntersectionSource> {
    state: VisibilityState,
    subscription: Option<S::Subscription>,
}

/// Tracks whether one bound element is visible and reports every change.
///
/// Rebinding tears the previous observation down before the next one starts;
/// dropping the tracker releases it unconditionally.
pub struct VisibilityTracker<S: IntersectionSource> {
    source: S,
    options: VisibilityOptions,
    target: Option<S::Target>,
    shared: Rc<RefCell<Shared<S>>>,
    on_change: Rc<dyn Fn(bool)>,
}

impl<S: IntersectionSource> VisibilityTracker<S> {
    pub fn new(source: S, options: VisibilityOptions, on_change: Rc<dyn Fn(bool)>) -> Self {
        Self {
            source,
            options,
            target: None,
            shared: Rc::new(RefCell::new(Shared {
                state: VisibilityState::default(),
                subscription: None,
            })),
            on_change,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.shared.borrow().state.is_intersecting
    }

    pub fn is_observing(&self) -> bool {
        self.shared.borrow().subscription.is_some()
    }

    /// Points the tracker at `target`; `None` only tears down.
    pub fn bind(&mut self, target: Option<S::Target>) {
        if target.is_some() && target == self.target && self.is_observing() {
            return;
        }

        self.unbind();
        self.target = target;

        let Some(target) = self.target.as_ref() else {
            return;
        };
        if self.shared.borrow().state.is_latched() {
            return;
        }

        let on_entry = entry_handler(
            Rc::downgrade(&self.shared),
            self.options.clone(),
            self.on_change.clone(),
        );
        let subscription = self
            .source
            .observe(target, &self.options.observe_options(), on_entry);
        if subscription.is_none() {
            log::debug!("visibility observer unavailable; element stays hidden");
        }
        self.shared.borrow_mut().subscription = subscription;
    }

    pub fn unbind(&mut self) {
        let released = self.shared.borrow_mut().subscription.take();
        drop(released);
        self.target = None;
    }
}

impl<S: IntersectionSource> Drop for VisibilityTracker<S> {
    fn drop(&mut self) {
        self.unbind();
    }
}

fn entry_handler<S: IntersectionSource>(
    shared: Weak<RefCell<Shared<S>>>,
    options: VisibilityOptions,
    on_change: Rc<dyn Fn(bool)>,
) -> Rc<dyn Fn(IntersectionEntry)> {
    Rc::new(move |entry: IntersectionEntry| {
        let Some(shared) = shared.upgrade() else {
            return;
        };

        let (applied, visible, released) = {
            let mut shared = shared.borrow_mut();
            let applied = shared.state.apply(entry, &options);
            let released = if applied.stop_observing {
                shared.subscription.take()
            } else {
                None
            };
            (applied, shared.state.is_intersecting, released)
        };
        drop(released);

        if applied.changed {
            on_change(visible);
        }
    })
}
