//! Endless type-and-delete animation over a fixed string.

use crate::timers::TimerHost;
use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypewriterTiming {
    pub typing_ms: u32,
    pub deleting_ms: u32,
    pub pause_ms: u32,
}

impl Default for TypewriterTiming {
    fn default() -> Self {
        Self {
            typing_ms: 120,
            deleting_ms: 70,
            pause_ms: 1500,
        }
    }
}

/// Progress through one string: how many characters are shown and which way
/// the cursor is heading. Direction flips only at the two ends.
#[derive(Clone, Debug)]
pub struct Typewriter {
    text: String,
    // byte offset of every character boundary, including 0 and text.len()
    boundaries: Vec<usize>,
    emitted: usize,
    direction: Direction,
}

impl Typewriter {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let boundaries = text
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(text.len()))
            .collect();

        Self {
            text,
            boundaries,
            emitted: 0,
            direction: Direction::Forward,
        }
    }

    pub fn char_count(&self) -> usize {
        self.boundaries.len() - 1
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn shown(&self) -> &str {
        &self.text[..self.boundaries[self.emitted]]
    }

    /// Milliseconds to wait before the next [`Typewriter::step`].
    pub fn delay_ms(&self, timing: &TypewriterTiming) -> u32 {
        match self.direction {
            Direction::Forward if self.emitted == self.char_count() => timing.pause_ms,
            Direction::Forward => timing.typing_ms,
            Direction::Backward if self.emitted == 0 => timing.pause_ms,
            Direction::Backward => timing.deleting_ms,
        }
    }

    /// Adds or removes exactly one character, turning around at either end.
    pub fn step(&mut self) {
        let full = self.char_count();
        if full == 0 {
            return;
        }

        match self.direction {
            Direction::Forward if self.emitted < full => self.emitted += 1,
            Direction::Forward => {
                self.direction = Direction::Backward;
                self.emitted -= 1;
            }
            Direction::Backward if self.emitted > 0 => self.emitted -= 1,
            Direction::Backward => {
                self.direction = Direction::Forward;
                self.emitted += 1;
            }
        }
    }
}

struct Inner<T: TimerHost> {
    typewriter: Typewriter,
    timing: TypewriterTiming,
    pending: Option<T::Timeout>,
}

/// Runs a [`Typewriter`] on real timers until dropped.
pub struct TypewriterDriver<T: TimerHost> {
    timers: T,
    inner: Rc<RefCell<Inner<T>>>,
    on_change: Rc<dyn Fn(&str)>,
}

impl<T: TimerHost> TypewriterDriver<T> {
    pub fn start(
        timers: T,
        text: impl Into<String>,
        timing: TypewriterTiming,
        on_change: Rc<dyn Fn(&str)>,
    ) -> Self {
        let driver = Self {
            timers,
            inner: Rc::new(RefCell::new(Inner {
                typewriter: Typewriter::new(text),
                timing,
                pending: None,
            })),
            on_change,
        };
        schedule(&driver.timers, &driver.inner, &driver.on_change);
        driver
    }

    pub fn shown(&self) -> String {
        self.inner.borrow().typewriter.shown().to_string()
    }

    /// Swaps the timing without losing progress. The pending tick is cancelled
    /// and rescheduled with the new delays.
    pub fn retime(&self, timing: TypewriterTiming) {
        let stale = {
            let mut inner = self.inner.borrow_mut();
            if inner.timing == timing {
                return;
            }
            inner.timing = timing;
            inner.pending.take()
        };
        drop(stale);
        schedule(&self.timers, &self.inner, &self.on_change);
    }

    pub fn stop(&self) {
        let pending = self.inner.borrow_mut().pending.take();
        drop(pending);
    }
}

impl<T: TimerHost> Drop for TypewriterDriver<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn schedule<T: TimerHost>(timers: &T, inner: &Rc<RefCell<Inner<T>>>, on_change: &Rc<dyn Fn(&str)>) {
    let delay_ms = {
        let inner = inner.borrow();
        inner.typewriter.delay_ms(&inner.timing)
    };

    let task = {
        let timers = timers.clone();
        let inner: Weak<RefCell<Inner<T>>> = Rc::downgrade(inner);
        let on_change = on_change.clone();
        Box::new(move || {
            let Some(inner) = inner.upgrade() else {
                return;
            };
            let shown = {
                let mut guard = inner.borrow_mut();
                guard.pending = None;
                guard.typewriter.step();
                guard.typewriter.shown().to_string()
            };
            on_change(&shown);
            schedule(&timers, &inner, &on_change);
        }) as Box<dyn FnOnce()>
    };

    let timeout = timers.set_timeout(delay_ms, task);
    inner.borrow_mut().pending = Some(timeout);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timers::ManualTimers;

    type Frames = Rc<RefCell<Vec<(u64, String)>>>;

    fn record(timers: &ManualTimers, text: &str) -> (TypewriterDriver<ManualTimers>, Frames) {
        let frames = Rc::new(RefCell::new(Vec::new()));
        let sink = frames.clone();
        let clock = timers.clone();
        let driver = TypewriterDriver::start(
            timers.clone(),
            text,
            TypewriterTiming::default(),
            Rc::new(move |shown: &str| sink.borrow_mut().push((clock.now(), shown.to_string()))),
        );
        (driver, frames)
    }

    #[test]
    fn cycles_through_typing_pause_and_deletion() {
        let timers = ManualTimers::new();
        let (driver, frames) = record(&timers, "Hi");
        assert_eq!(driver.shown(), "");

        timers.advance(120 + 120 + 1500 + 70 + 1500 + 120);

        let expected = vec![
            (120, "H"),
            (240, "Hi"),
            (1740, "H"),
            (1810, ""),
            (3310, "H"),
            (3430, "Hi"),
        ];
        let frames: Vec<_> = frames
            .borrow()
            .iter()
            .map(|(at, shown)| (*at, shown.clone()))
            .collect();
        assert_eq!(
            frames,
            expected
                .into_iter()
                .map(|(at, shown)| (at, shown.to_string()))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn prefix_stays_within_bounds_and_flips_only_at_ends() {
        let mut typewriter = Typewriter::new("Hey");
        let mut previous = (typewriter.emitted(), typewriter.direction());

        for _ in 0..50 {
            typewriter.step();
            let current = (typewriter.emitted(), typewriter.direction());
            assert!(current.0 <= 3);
            if current.1 != previous.1 {
                assert!(previous.0 == 0 || previous.0 == 3);
            } else if current.1 == Direction::Forward {
                assert_eq!(current.0, previous.0 + 1);
            } else {
                assert_eq!(current.0 + 1, previous.0);
            }
            previous = current;
        }
    }

    #[test]
    fn steps_whole_characters() {
        let mut typewriter = Typewriter::new("né✓");
        typewriter.step();
        typewriter.step();
        assert_eq!(typewriter.shown(), "né");
        typewriter.step();
        assert_eq!(typewriter.shown(), "né✓");
    }

    #[test]
    fn empty_text_never_advances() {
        let timers = ManualTimers::new();
        let (driver, frames) = record(&timers, "");
        timers.advance(10_000);
        assert_eq!(driver.shown(), "");
        assert!(frames.borrow().iter().all(|(_, shown)| shown.is_empty()));
    }

    #[test]
    fn retiming_cancels_the_stale_tick() {
        let timers = ManualTimers::new();
        let (driver, frames) = record(&timers, "Hi");

        timers.advance(100);
        driver.retime(TypewriterTiming {
            typing_ms: 30,
            ..TypewriterTiming::default()
        });
        timers.advance(30);
        assert_eq!(frames.borrow().as_slice(), &[(130, "H".to_string())]);

        timers.advance(30);
        assert_eq!(driver.shown(), "Hi");
        assert_eq!(timers.pending(), 1);
    }

    #[test]
    fn dropping_the_driver_stops_the_cycle() {
        let timers = ManualTimers::new();
        let (driver, frames) = record(&timers, "Hi");
        timers.advance(120);
        drop(driver);
        timers.advance(10_000);

        assert_eq!(frames.borrow().len(), 1);
        assert_eq!(timers.pending(), 0);
    }
}
