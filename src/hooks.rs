use crate::{
    browser::{BrowserIntersections, BrowserTimers},
    config::SiteConfig,
    throttle::Throttled,
    typewriter::{TypewriterDriver, TypewriterTiming},
    visibility::{VisibilityOptions, VisibilityTracker},
};
use std::rc::Rc;
use web_sys::Element;
use yew::prelude::*;

#[hook]
pub fn use_config() -> Rc<SiteConfig> {
    use_context::<Rc<SiteConfig>>().unwrap_or_default()
}

/// Whether the element behind `node` is on screen. The observer is torn down
/// with the component or when the options change.
#[hook]
pub fn use_visibility(node: NodeRef, options: VisibilityOptions) -> bool {
    let visible = use_state_eq(|| false);

    {
        let visible = visible.clone();
        use_effect_with((node, options), move |(node, options)| {
            let mut tracker = VisibilityTracker::new(
                BrowserIntersections,
                options.clone(),
                Rc::new(move |is_visible: bool| visible.set(is_visible)),
            );
            tracker.bind(node.cast::<Element>());
            move || drop(tracker)
        });
    }

    *visible
}

/// Text currently shown by the typewriter. A new `text` restarts the cycle; a
/// new `timing` only reschedules the pending tick.
#[hook]
pub fn use_typewriter(text: AttrValue, timing: TypewriterTiming) -> String {
    let shown = use_state_eq(String::new);
    let driver = use_mut_ref(|| None::<TypewriterDriver<BrowserTimers>>);

    {
        let shown = shown.clone();
        let driver = driver.clone();
        use_effect_with(text, move |text| {
            shown.set(String::new());
            let sink = shown.clone();
            *driver.borrow_mut() = Some(TypewriterDriver::start(
                BrowserTimers,
                text.to_string(),
                timing,
                Rc::new(move |prefix: &str| sink.set(prefix.to_string())),
            ));
            move || drop(driver.borrow_mut().take())
        });
    }

    {
        let driver = driver.clone();
        use_effect_with(timing, move |timing| {
            if let Some(driver) = driver.borrow().as_ref() {
                driver.retime(*timing);
            }
            || ()
        });
    }

    (*shown).clone()
}

/// Wraps `callback` so it runs at most once per `interval_ms`. Pass a stable
/// callback (from `use_callback`) or the throttle restarts on every render.
#[hook]
pub fn use_throttled<A: 'static>(interval_ms: u32, callback: Callback<A>) -> Callback<A> {
    let throttled = use_mut_ref(|| None::<Throttled<BrowserTimers, A>>);

    {
        let throttled = throttled.clone();
        use_effect_with((interval_ms, callback), move |(interval_ms, callback)| {
            let callback = callback.clone();
            *throttled.borrow_mut() = Some(Throttled::new(
                BrowserTimers,
                *interval_ms,
                Rc::new(move |args: A| callback.emit(args)),
            ));
            move || drop(throttled.borrow_mut().take())
        });
    }

    Callback::from(move |args: A| {
        if let Some(throttled) = throttled.borrow().as_ref() {
            throttled.call(args);
        }
    })
}
