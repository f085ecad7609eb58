//! Rate limiting for high-frequency callbacks such as pointer movement.

use crate::timers::{delay_to_u32, TimerHost};
use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

#[derive(Debug, PartialEq)]
pub enum ThrottleStep<A> {
    /// Execute now with these arguments.
    Run(A),
    /// Check again after this many milliseconds.
    Wait(f64),
    Idle,
}

/// Clock-driven throttle state. Holds at most one deferred call, always the
/// latest.
#[derive(Debug)]
pub struct Throttle<A> {
    interval_ms: f64,
    last_run: Option<f64>,
    pending: Option<A>,
}

impl<A> Throttle<A> {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            last_run: None,
            pending: None,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// A call outside the cooldown runs immediately and supersedes anything
    /// pending; a call inside it replaces the pending arguments and asks for a
    /// trailing check when the cooldown ends.
    pub fn call(&mut self, now_ms: f64, args: A) -> ThrottleStep<A> {
        match self.last_run {
            Some(last) if now_ms - last < self.interval_ms => {
                self.pending = Some(args);
                ThrottleStep::Wait(self.remaining(now_ms - last))
            }
            _ => {
                self.pending = None;
                self.last_run = Some(now_ms);
                ThrottleStep::Run(args)
            }
        }
    }

    /// Trailing check. Runs the pending call only once a full interval has
    /// passed since the last execution, otherwise waits out the remainder.
    pub fn fire(&mut self, now_ms: f64) -> ThrottleStep<A> {
        if self.pending.is_none() {
            return ThrottleStep::Idle;
        }

        let elapsed = self.last_run.map_or(self.interval_ms, |last| now_ms - last);
        if elapsed >= self.interval_ms {
            self.last_run = Some(now_ms);
            match self.pending.take() {
                Some(args) => ThrottleStep::Run(args),
                None => ThrottleStep::Idle,
            }
        } else {
            ThrottleStep::Wait(self.remaining(elapsed))
        }
    }

    /// Cooldown left after `elapsed`; never more than one interval, even if
    /// the clock stepped backwards.
    fn remaining(&self, elapsed: f64) -> f64 {
        (self.interval_ms - elapsed).clamp(0.0, self.interval_ms)
    }
}

struct Inner<T: TimerHost, A> {
    throttle: Throttle<A>,
    trailing: Option<T::Timeout>,
}

/// A callback wrapped in a [`Throttle`] and driven by real timers. Dropping it
/// cancels any trailing call.
pub struct Throttled<T: TimerHost, A: 'static> {
    timers: T,
    inner: Rc<RefCell<Inner<T, A>>>,
    callback: Rc<dyn Fn(A)>,
}

impl<T: TimerHost, A: 'static> Throttled<T, A> {
    pub fn new(timers: T, interval_ms: u32, callback: Rc<dyn Fn(A)>) -> Self {
        Self {
            timers,
            inner: Rc::new(RefCell::new(Inner {
                throttle: Throttle::new(f64::from(interval_ms)),
                trailing: None,
            })),
            callback,
        }
    }

    pub fn call(&self, args: A) {
        let step = self
            .inner
            .borrow_mut()
            .throttle
            .call(self.timers.now_ms(), args);
        settle(&self.timers, &self.inner, &self.callback, step);
    }
}

fn settle<T: TimerHost, A: 'static>(
    timers: &T,
    inner: &Rc<RefCell<Inner<T, A>>>,
    callback: &Rc<dyn Fn(A)>,
    step: ThrottleStep<A>,
) {
    match step {
        ThrottleStep::Run(args) => {
            let superseded = inner.borrow_mut().trailing.take();
            drop(superseded);
            callback(args);
        }
        ThrottleStep::Wait(delay_ms) => {
            let timeout = timers.set_timeout(
                delay_to_u32(delay_ms),
                trailing_task(timers.clone(), Rc::downgrade(inner), callback.clone()),
            );
            let replaced = inner.borrow_mut().trailing.replace(timeout);
            drop(replaced);
        }
        ThrottleStep::Idle => {}
    }
}

fn trailing_task<T: TimerHost, A: 'static>(
    timers: T,
    inner: Weak<RefCell<Inner<T, A>>>,
    callback: Rc<dyn Fn(A)>,
) -> Box<dyn FnOnce()> {
    Box::new(move || {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        let step = {
            let mut guard = inner.borrow_mut();
            let fired = guard.trailing.take();
            let step = guard.throttle.fire(timers.now_ms());
            drop(guard);
            drop(fired);
            step
        };
        settle(&timers, &inner, &callback, step);
    })
}
