//! Tracks which registered region owns the middle of the viewport.

use crate::intersection::{IntersectionEntry, IntersectionSource, ObserveOptions, RootMargin};
use std::{
    cell::RefCell,
    collections::HashMap,
    hash::Hash,
    rc::{Rc, Weak},
};

/// The active id. Once set it is only ever replaced, never cleared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveSection<Id> {
    active: Id,
}

impl<Id: Clone + PartialEq> ActiveSection<Id> {
    pub fn new(initial: Id) -> Self {
        Self { active: initial }
    }

    pub fn active(&self) -> &Id {
        &self.active
    }

    /// Last intersecting report wins. Returns true when the id changed.
    pub fn report(&mut self, id: &Id, entry: IntersectionEntry) -> bool {
        if !entry.is_intersecting || *id == self.active {
            return false;
        }
        self.active = id.clone();
        true
    }
}

pub fn central_band_options() -> ObserveOptions {
    ObserveOptions {
        threshold: 0.0,
        root_margin: RootMargin::central_band(),
    }
}

/// Observes a changing set of regions against the central band.
pub struct ActiveSectionTracker<S: IntersectionSource, Id> {
    source: S,
    state: Rc<RefCell<ActiveSection<Id>>>,
    regions: HashMap<Id, S::Subscription>,
    on_change: Rc<dyn Fn(Id)>,
}

impl<S, Id> ActiveSectionTracker<S, Id>
where
    S: IntersectionSource,
    Id: Clone + Eq + Hash + std::fmt::Debug + 'static,
{
    pub fn new(source: S, initial: Id, on_change: Rc<dyn Fn(Id)>) -> Self {
        Self {
            source,
            state: Rc::new(RefCell::new(ActiveSection::new(initial))),
            regions: HashMap::new(),
            on_change,
        }
    }

    pub fn active(&self) -> Id {
        self.state.borrow().active().clone()
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Starts observing `target` as region `id`, replacing any earlier
    /// registration under the same id.
    pub fn register(&mut self, id: Id, target: &S::Target) {
        self.unregister(&id);

        let on_entry = {
            let state: Weak<RefCell<ActiveSection<Id>>> = Rc::downgrade(&self.state);
            let on_change = self.on_change.clone();
            let id = id.clone();
            Rc::new(move |entry: IntersectionEntry| {
                let Some(state) = state.upgrade() else {
                    return;
                };
                let changed = state.borrow_mut().report(&id, entry);
                if changed {
                    log::debug!("active section -> {id:?}");
                    on_change(id.clone());
                }
            }) as Rc<dyn Fn(IntersectionEntry)>
        };

        match self.source.observe(target, &central_band_options(), on_entry) {
            Some(subscription) => {
                self.regions.insert(id, subscription);
            }
            None => log::debug!("section {id:?} cannot be observed; skipping"),
        }
    }

    pub fn unregister(&mut self, id: &Id) {
        self.regions.remove(id);
    }

    pub fn dispose(&mut self) {
        self.regions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intersection::{FakeIntersections, Rect, Viewport};

    const VIEWPORT: Viewport = Viewport {
        width: 1200.0,
        height: 1000.0,
    };

    fn tracker(
        source: &FakeIntersections,
    ) -> (
        ActiveSectionTracker<FakeIntersections, &'static str>,
        Rc<RefCell<Vec<&'static str>>>,
    ) {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = changes.clone();
        let tracker = ActiveSectionTracker::new(
            source.clone(),
            "hero",
            Rc::new(move |id: &'static str| sink.borrow_mut().push(id)),
        );
        (tracker, changes)
    }

    fn layout_scrolled_by(scroll: f64) -> Vec<(&'static str, Rect)> {
        ["about", "skills", "projects"]
            .into_iter()
            .enumerate()
            .map(|(index, id)| {
                let top = index as f64 * 700.0 - scroll;
                (id, Rect::new(top, 0.0, 1200.0, 650.0))
            })
            .collect()
    }

    #[test]
    fn starts_at_the_default_section() {
        let source = FakeIntersections::new();
        let (tracker, changes) = tracker(&source);
        assert_eq!(tracker.active(), "hero");
        assert!(changes.borrow().is_empty());
    }

    #[test]
    fn region_inside_central_band_becomes_active() {
        let source = FakeIntersections::new();
        let (mut tracker, _) = tracker(&source);
        for id in ["about", "skills", "projects"] {
            tracker.register(id, &id);
        }
        assert_eq!(
            source.options_for("skills").map(|o| o.root_margin),
            Some(RootMargin::central_band())
        );

        // skills spans 300..950, so only it overlaps the 400..600 band
        source.layout(VIEWPORT, &layout_scrolled_by(400.0));
        assert_eq!(tracker.active(), "skills");
    }

    #[test]
    fn keeps_last_active_when_nothing_overlaps() {
        let source = FakeIntersections::new();
        let (mut tracker, changes) = tracker(&source);
        for id in ["about", "skills", "projects"] {
            tracker.register(id, &id);
        }

        source.layout(VIEWPORT, &layout_scrolled_by(400.0));
        // nothing reaches into the 400..600 band
        source.layout(
            VIEWPORT,
            &[
                ("about", Rect::new(-600.0, 0.0, 1200.0, 650.0)),
                ("skills", Rect::new(-500.0, 0.0, 1200.0, 890.0)),
                ("projects", Rect::new(610.0, 0.0, 1200.0, 650.0)),
            ],
        );

        assert_eq!(tracker.active(), "skills");
        assert_eq!(*changes.borrow(), vec!["skills"]);
    }

    #[test]
    fn last_report_wins_when_two_regions_qualify() {
        let source = FakeIntersections::new();
        let (mut tracker, _) = tracker(&source);
        tracker.register("about", &"about");
        tracker.register("skills", &"skills");

        let hit = IntersectionEntry {
            is_intersecting: true,
            ratio: 0.2,
        };
        source.deliver("skills", hit);
        source.deliver("about", hit);
        assert_eq!(tracker.active(), "about");
    }

    #[test]
    fn unregistered_regions_are_no_longer_considered() {
        let source = FakeIntersections::new();
        let (mut tracker, _) = tracker(&source);
        tracker.register("contact", &"contact");
        tracker.register("contact", &"contact");
        assert_eq!(source.observer_count("contact"), 1);

        tracker.unregister(&"contact");
        source.deliver(
            "contact",
            IntersectionEntry {
                is_intersecting: true,
                ratio: 1.0,
            },
        );
        assert_eq!(tracker.active(), "hero");

        tracker.register("about", &"about");
        tracker.dispose();
        assert_eq!(tracker.region_count(), 0);
        assert_eq!(source.observer_count("about"), 0);
    }
}
