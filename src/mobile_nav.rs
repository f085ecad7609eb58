//! Mobile navigation drawer lifecycle.
//!
//! `hidden → opening → open → closing → hidden`, with `opening → closing`
//! allowed so a second tap can cancel an opening drawer. The two animated
//! states advance on their own after a fixed duration.

use crate::timers::TimerHost;
use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NavDisplayState {
    #[default]
    Hidden,
    Opening,
    Open,
    Closing,
}

impl NavDisplayState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::Opening => "opening",
            Self::Open => "open",
            Self::Closing => "closing",
        }
    }

    /// Opening counts as open for toggle and link handling.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Opening | Self::Open)
    }

    /// Whether the drawer needs to be in the tree at all.
    pub fn is_rendered(self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavEvent {
    Toggle,
    LinkSelected,
    OpenElapsed,
    CloseElapsed,
}

/// The legal edges. `None` means the event is ignored in this state.
pub fn transition(state: NavDisplayState, event: NavEvent) -> Option<NavDisplayState> {
    use NavDisplayState::*;
    use NavEvent::*;

    match (state, event) {
        (Hidden, Toggle) => Some(Opening),
        (Opening | Open, Toggle | LinkSelected) => Some(Closing),
        (Opening, OpenElapsed) => Some(Open),
        (Closing, CloseElapsed) => Some(Hidden),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavDurations {
    pub open_ms: u32,
    pub close_ms: u32,
}

impl Default for NavDurations {
    fn default() -> Self {
        Self {
            open_ms: 600,
            close_ms: 500,
        }
    }
}

/// Screen point the reveal animation grows from.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RippleOrigin {
    pub x: f64,
    pub y: f64,
}

impl RippleOrigin {
    pub fn css_vars(&self) -> String {
        format!("--ripple-x: {:.2}px; --ripple-y: {:.2}px;", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NavSnapshot {
    pub state: NavDisplayState,
    pub ripple: Option<RippleOrigin>,
}

struct Inner<T: TimerHost> {
    snapshot: NavSnapshot,
    pending: Option<T::Timeout>,
    disposed: bool,
}

/// Drawer state machine that owns its auto-advance timer.
pub struct MobileNav<T: TimerHost> {
    timers: T,
    durations: NavDurations,
    inner: Rc<RefCell<Inner<T>>>,
    on_change: Rc<dyn Fn(NavSnapshot)>,
}

impl<T: TimerHost> MobileNav<T> {
    pub fn new(timers: T, durations: NavDurations, on_change: Rc<dyn Fn(NavSnapshot)>) -> Self {
        Self {
            timers,
            durations,
            inner: Rc::new(RefCell::new(Inner {
                snapshot: NavSnapshot::default(),
                pending: None,
                disposed: false,
            })),
            on_change,
        }
    }

    pub fn state(&self) -> NavDisplayState {
        self.inner.borrow().snapshot.state
    }

    pub fn snapshot(&self) -> NavSnapshot {
        self.inner.borrow().snapshot
    }

    /// Opens from `hidden` (remembering where the toggle sits) or closes an
    /// opening/open drawer. Ignored while closing.
    pub fn toggle(&self, origin: RippleOrigin) {
        let opening = self.state() == NavDisplayState::Hidden;
        if opening {
            self.inner.borrow_mut().snapshot.ripple = Some(origin);
        }
        dispatch(&self.timers, self.durations, &self.inner, &self.on_change, NavEvent::Toggle);
    }

    /// Scrolls to the chosen section and closes the drawer if it was open.
    /// Returns true when a close was requested.
    pub fn select_link<Id>(&self, section: Id, navigate: impl FnOnce(Id)) -> bool {
        navigate(section);
        if self.state().is_open() {
            dispatch(
                &self.timers,
                self.durations,
                &self.inner,
                &self.on_change,
                NavEvent::LinkSelected,
            );
            true
        } else {
            false
        }
    }

    /// Cancels the pending timer; every later event is ignored.
    pub fn dispose(&self) {
        let pending = {
            let mut inner = self.inner.borrow_mut();
            inner.disposed = true;
            inner.pending.take()
        };
        drop(pending);
    }
}

impl<T: TimerHost> Drop for MobileNav<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn dispatch<T: TimerHost>(
    timers: &T,
    durations: NavDurations,
    inner: &Rc<RefCell<Inner<T>>>,
    on_change: &Rc<dyn Fn(NavSnapshot)>,
    event: NavEvent,
) {
    let (snapshot, stale) = {
        let mut guard = inner.borrow_mut();
        if guard.disposed {
            return;
        }
        let Some(next) = transition(guard.snapshot.state, event) else {
            log::debug!(
                "nav drawer ignored {event:?} while {}",
                guard.snapshot.state.as_str()
            );
            return;
        };
        log::debug!(
            "nav drawer {} -> {}",
            guard.snapshot.state.as_str(),
            next.as_str()
        );
        guard.snapshot.state = next;
        (guard.snapshot, guard.pending.take())
    };
    drop(stale);

    let advance = match snapshot.state {
        NavDisplayState::Opening => Some((durations.open_ms, NavEvent::OpenElapsed)),
        NavDisplayState::Closing => Some((durations.close_ms, NavEvent::CloseElapsed)),
        NavDisplayState::Open | NavDisplayState::Hidden => None,
    };

    if let Some((delay_ms, event)) = advance {
        let task = {
            let timers = timers.clone();
            let weak: Weak<RefCell<Inner<T>>> = Rc::downgrade(inner);
            let on_change = on_change.clone();
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    let fired = inner.borrow_mut().pending.take();
                    drop(fired);
                    dispatch(&timers, durations, &inner, &on_change, event);
                }
            }) as Box<dyn FnOnce()>
        };
        let timeout = timers.set_timeout(delay_ms, task);
        inner.borrow_mut().pending = Some(timeout);
    }

    on_change(snapshot);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timers::ManualTimers;
    use NavDisplayState::*;

    fn nav(timers: &ManualTimers) -> (MobileNav<ManualTimers>, Rc<RefCell<Vec<NavDisplayState>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let nav = MobileNav::new(
            timers.clone(),
            NavDurations::default(),
            Rc::new(move |snapshot: NavSnapshot| sink.borrow_mut().push(snapshot.state)),
        );
        (nav, seen)
    }

    fn origin() -> RippleOrigin {
        RippleOrigin { x: 320.0, y: 24.0 }
    }

    #[test]
    fn transitions_follow_the_cycle_only() {
        let states = [Hidden, Opening, Open, Closing];
        let events = [
            NavEvent::Toggle,
            NavEvent::LinkSelected,
            NavEvent::OpenElapsed,
            NavEvent::CloseElapsed,
        ];
        let legal = [
            (Hidden, Opening),
            (Opening, Open),
            (Opening, Closing),
            (Open, Closing),
            (Closing, Hidden),
        ];

        for state in states {
            for event in events {
                if let Some(next) = transition(state, event) {
                    assert!(legal.contains(&(state, next)), "{state:?} --{event:?}--> {next:?}");
                }
            }
        }
        assert_eq!(transition(Closing, NavEvent::Toggle), None);
        assert_eq!(transition(Hidden, NavEvent::LinkSelected), None);
    }

    #[test]
    fn toggle_opens_then_settles_after_exactly_600ms() {
        let timers = ManualTimers::new();
        let (nav, seen) = nav(&timers);

        nav.toggle(origin());
        assert_eq!(nav.state(), Opening);
        assert_eq!(nav.snapshot().ripple, Some(origin()));

        timers.advance(599);
        assert_eq!(nav.state(), Opening);
        timers.advance(1);
        assert_eq!(nav.state(), Open);
        assert_eq!(*seen.borrow(), vec![Opening, Open]);
    }

    #[test]
    fn toggle_during_opening_forces_closing() {
        let timers = ManualTimers::new();
        let (nav, seen) = nav(&timers);

        nav.toggle(origin());
        timers.advance(300);
        nav.toggle(origin());
        assert_eq!(nav.state(), Closing);

        timers.advance(499);
        assert_eq!(nav.state(), Closing);
        timers.advance(1);
        assert_eq!(nav.state(), Hidden);

        timers.advance(1_000);
        assert_eq!(*seen.borrow(), vec![Opening, Closing, Hidden]);
    }

    #[test]
    fn toggle_while_closing_is_ignored() {
        let timers = ManualTimers::new();
        let (nav, _) = nav(&timers);

        nav.toggle(origin());
        timers.advance(600);
        nav.toggle(origin());
        nav.toggle(origin());
        assert_eq!(nav.state(), Closing);

        timers.advance(500);
        assert_eq!(nav.state(), Hidden);
    }

    #[test]
    fn ripple_origin_is_recorded_only_when_opening() {
        let timers = ManualTimers::new();
        let (nav, _) = nav(&timers);

        nav.toggle(origin());
        timers.advance(600);
        nav.toggle(RippleOrigin { x: 1.0, y: 1.0 });
        assert_eq!(nav.snapshot().ripple, Some(origin()));
        assert_eq!(
            origin().css_vars(),
            "--ripple-x: 320.00px; --ripple-y: 24.00px;"
        );
    }

    #[test]
    fn selecting_a_link_always_navigates_and_closes_when_open() {
        let timers = ManualTimers::new();
        let (nav, _) = nav(&timers);
        let visited = RefCell::new(Vec::new());

        assert!(!nav.select_link("about", |id| visited.borrow_mut().push(id)));
        assert_eq!(nav.state(), Hidden);

        nav.toggle(origin());
        timers.advance(600);
        assert!(nav.select_link("skills", |id| visited.borrow_mut().push(id)));
        assert_eq!(nav.state(), Closing);

        assert!(!nav.select_link("contact", |id| visited.borrow_mut().push(id)));
        assert_eq!(*visited.borrow(), vec!["about", "skills", "contact"]);
    }

    #[test]
    fn dispose_mid_transition_cancels_the_timer() {
        let timers = ManualTimers::new();
        let (nav, seen) = nav(&timers);

        nav.toggle(origin());
        nav.dispose();
        assert_eq!(timers.pending(), 0);

        timers.advance(1_000);
        nav.toggle(origin());
        assert_eq!(nav.state(), Opening);
        assert_eq!(*seen.borrow(), vec![Opening]);
    }
}
