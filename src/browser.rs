use crate::{
    config::CONFIG_ELEMENT_ID,
    error::PlatformError,
    intersection::{IntersectionEntry, IntersectionSource, ObserveOptions, Viewport},
    mobile_nav::RippleOrigin,
    section::SectionId,
    theme::{PreferenceStore, Theme},
    timers::TimerHost,
};
use js_sys::{Array, Function, Reflect};
use std::rc::Rc;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, Document, Element, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, ScrollBehavior, ScrollIntoViewOptions, Storage,
};

impl PlatformError {
    fn js(context: &'static str, value: JsValue) -> Self {
        let message = value.as_string().unwrap_or_else(|| format!("{value:?}"));
        Self::Js { context, message }
    }
}

#[derive(Clone, Copy, Default)]
pub struct BrowserTimers;

/// A scheduled `setTimeout`; dropping it clears the timer.
pub struct BrowserTimeout {
    handle: Option<i32>,
    _callback: Closure<dyn FnMut()>,
}

impl Drop for BrowserTimeout {
    fn drop(&mut self) {
        if let (Some(handle), Some(win)) = (self.handle, window()) {
            win.clear_timeout_with_handle(handle);
        }
    }
}

impl TimerHost for BrowserTimers {
    type Timeout = BrowserTimeout;

    /// Monotonic page clock, so throttle arithmetic survives wall-clock jumps.
    fn now_ms(&self) -> f64 {
        window()
            .and_then(|win| win.performance())
            .map_or_else(js_sys::Date::now, |performance| performance.now())
    }

    fn set_timeout(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> BrowserTimeout {
        let callback = Closure::once(move || task());
        let handle = schedule_timeout(&callback, delay_ms)
            .map_err(|error| log::warn!("{error}; timer dropped"))
            .ok();

        BrowserTimeout {
            handle,
            _callback: callback,
        }
    }
}

fn schedule_timeout(callback: &Closure<dyn FnMut()>, delay_ms: u32) -> Result<i32, PlatformError> {
    let win = window().ok_or(PlatformError::NoWindow)?;
    win.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        i32::try_from(delay_ms).unwrap_or(i32::MAX),
    )
    .map_err(|value| PlatformError::js("setTimeout", value))
}

#[derive(Clone, Copy, Default)]
pub struct BrowserIntersections;

/// Live `IntersectionObserver` for one element; dropping it disconnects.
pub struct BrowserSubscription {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl Drop for BrowserSubscription {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

impl IntersectionSource for BrowserIntersections {
    type Target = Element;
    type Subscription = BrowserSubscription;

    fn observe(
        &self,
        target: &Element,
        options: &ObserveOptions,
        on_entry: Rc<dyn Fn(IntersectionEntry)>,
    ) -> Option<BrowserSubscription> {
        observe_element(target, options, on_entry)
            .map_err(|error| log::warn!("{error}; element will not be tracked"))
            .ok()
    }
}

fn observe_element(
    target: &Element,
    options: &ObserveOptions,
    on_entry: Rc<dyn Fn(IntersectionEntry)>,
) -> Result<BrowserSubscription, PlatformError> {
    let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, _observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                on_entry(IntersectionEntry {
                    is_intersecting: entry.is_intersecting(),
                    ratio: entry.intersection_ratio(),
                });
            }
        },
    );

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    init.set_root_margin(&options.root_margin.to_css());

    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
            .map_err(|value| PlatformError::js("IntersectionObserver", value))?;
    observer.observe(target);

    Ok(BrowserSubscription {
        observer,
        _callback: callback,
    })
}

#[derive(Clone, Copy, Default)]
pub struct LocalStorage;

fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok().flatten()
}

impl PreferenceStore for LocalStorage {
    fn read(&self, key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok().flatten()
    }

    fn write(&self, key: &str, value: &str) {
        let Some(storage) = local_storage() else {
            log::debug!("localStorage unavailable; `{key}` not persisted");
            return;
        };
        if let Err(value) = storage.set_item(key, value) {
            log::warn!("{}", PlatformError::js("localStorage.setItem", value));
        }
    }
}

fn media_matches(query: &str) -> Option<bool> {
    window()?
        .match_media(query)
        .ok()
        .flatten()
        .map(|list| list.matches())
}

/// `None` when the media query cannot be evaluated.
pub fn system_prefers_dark() -> Option<bool> {
    media_matches("(prefers-color-scheme: dark)")
}

fn document() -> Result<Document, PlatformError> {
    window()
        .ok_or(PlatformError::NoWindow)?
        .document()
        .ok_or(PlatformError::NoDocument)
}

fn publish_theme(theme: Theme) -> Result<(), PlatformError> {
    let Some(root) = document()?.document_element() else {
        return Err(PlatformError::NoDocument);
    };
    root.set_attribute("data-theme", theme.as_str())
        .map_err(|value| PlatformError::js("setAttribute", value))
}

/// Sets `data-theme` on the root element.
pub fn apply_theme(theme: Theme) {
    if let Err(error) = publish_theme(theme) {
        log::warn!("{error}; theme `{}` not applied", theme.as_str());
    }
}

/// Runs `update` inside `document.startViewTransition`. `Ok(false)` means the
/// browser has no view transitions and nothing was run.
fn with_view_transition(update: impl FnOnce() + 'static) -> Result<bool, PlatformError> {
    let document: JsValue = document()?.into();
    let start = Reflect::get(&document, &JsValue::from_str("startViewTransition"))
        .map_err(|value| PlatformError::js("startViewTransition", value))?;
    let Some(start) = start.dyn_ref::<Function>() else {
        return Ok(false);
    };

    start
        .call1(&document, &Closure::once_into_js(update))
        .map(|_| true)
        .map_err(|value| PlatformError::js("startViewTransition", value))
}

/// Animates the theme change unless reduced motion is requested.
pub fn apply_theme_with_transition(theme: Theme) {
    if media_matches("(prefers-reduced-motion: reduce)").unwrap_or(false) {
        apply_theme(theme);
        return;
    }

    match with_view_transition(move || apply_theme(theme)) {
        Ok(true) => {}
        Ok(false) => apply_theme(theme),
        Err(error) => {
            log::debug!("{error}; applying theme without transition");
            apply_theme(theme);
        }
    }
}

pub fn viewport() -> Viewport {
    let Some(win) = window() else {
        return Viewport::FALLBACK;
    };
    let measure = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64());
    Viewport::or_fallback(measure(win.inner_width()), measure(win.inner_height()))
}

pub fn element_center(element: &Element) -> RippleOrigin {
    let rect = element.get_bounding_client_rect();
    RippleOrigin {
        x: rect.x() + rect.width() / 2.0,
        y: rect.y() + rect.height() / 2.0,
    }
}

pub fn scroll_to_section(section: SectionId) {
    let Some(element) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(section.anchor()))
    else {
        log::debug!("no element for #{}", section.anchor());
        return;
    };

    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    element.scroll_into_view_with_scroll_into_view_options(&options);
}

pub fn config_source() -> Option<String> {
    window()?
        .document()?
        .get_element_by_id(CONFIG_ELEMENT_ID)?
        .text_content()
}

pub fn mount_point() -> Result<Element, PlatformError> {
    document()?
        .get_element_by_id("app")
        .ok_or_else(|| PlatformError::Js {
            context: "getElementById",
            message: "missing #app mount point".to_string(),
        })
}
