//! Clock and one-shot timer abstraction shared by every animated component.
//!
//! Dropping a [`TimerHost::Timeout`] cancels it, so a component releases all
//! pending work by dropping the handles it owns.

/// Source of wall-clock time and cancellable one-shot timeouts.
pub trait TimerHost: Clone + 'static {
    type Timeout;

    /// Milliseconds on a monotonic-enough clock.
    fn now_ms(&self) -> f64;

    fn set_timeout(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Self::Timeout;
}

/// Rounds a millisecond delay into the range accepted by `setTimeout`.
pub fn delay_to_u32(delay_ms: f64) -> u32 {
    if delay_ms.is_nan() || delay_ms <= 0.0 {
        0
    } else {
        delay_ms.ceil().min(f64::from(u32::MAX)) as u32
    }
}

#[cfg(test)]
pub use manual::ManualTimers;


#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    #[test]
    fn delays_are_rounded_up_and_never_negative() {
        assert_eq!(delay_to_u32(-5.0), 0);
        assert_eq!(delay_to_u32(f64::NAN), 0);
        assert_eq!(delay_to_u32(29.2), 30);
        assert_eq!(delay_to_u32(50.0), 50);
    }

    #[test]
    fn manual_timers_fire_in_deadline_order() {
        let timers = ManualTimers::new();
        let fired = Rc::new(RefCell::new(Vec::new()));

        let log = fired.clone();
        let _late = timers.set_timeout(30, Box::new(move || log.borrow_mut().push("late")));
        let log = fired.clone();
        let _early = timers.set_timeout(10, Box::new(move || log.borrow_mut().push("early")));

        timers.advance(9);
        assert!(fired.borrow().is_empty());
        timers.advance(21);
        assert_eq!(*fired.borrow(), vec!["early", "late"]);
        assert_eq!(timers.now(), 30);
    }

    #[test]
    fn dropping_a_timeout_cancels_it() {
        let timers = ManualTimers::new();
        let fired = Rc::new(RefCell::new(false));

        let flag = fired.clone();
        let timeout = timers.set_timeout(10, Box::new(move || *flag.borrow_mut() = true));
        drop(timeout);

        timers.advance(100);
        assert!(!*fired.borrow());
        assert_eq!(timers.pending(), 0);
    }
}
