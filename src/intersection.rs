//! Viewport intersection primitives: the observer seam, CSS root margins and
//! the geometry the browser applies when it reports an entry.

use crate::error::ConfigError;
use std::rc::Rc;

/// One observation report for a single target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    pub is_intersecting: bool,
    pub ratio: f64,
}

impl IntersectionEntry {
    pub fn outside() -> Self {
        Self {
            is_intersecting: false,
            ratio: 0.0,
        }
    }

    /// Reproduces the observer's report for `target` against a viewport
    /// shrunk or grown by `margin`.
    pub fn measure(target: Rect, viewport: Viewport, margin: &RootMargin) -> Self {
        let root = margin.root_box(viewport);
        let overlap_x = (target.right().min(root.right()) - target.left.max(root.left)).max(0.0);
        let overlap_y = (target.bottom().min(root.bottom()) - target.top.max(root.top)).max(0.0);
        let area = target.width * target.height;

        Self {
            is_intersecting: overlap_x > 0.0 && overlap_y > 0.0,
            ratio: if area > 0.0 {
                (overlap_x * overlap_y / area).min(1.0)
            } else {
                0.0
            },
        }
    }

    /// True when the entry crosses `threshold`.
    pub fn meets(&self, threshold: f64) -> bool {
        self.is_intersecting && self.ratio >= threshold
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Assumed when the host cannot report its size.
    pub const FALLBACK: Self = Self {
        width: 1280.0,
        height: 720.0,
    };

    /// Keeps each measured dimension that is usable, falling back per axis.
    pub fn or_fallback(width: Option<f64>, height: Option<f64>) -> Self {
        let usable = |value: Option<f64>| value.filter(|v| v.is_finite() && *v > 0.0);
        Self {
            width: usable(width).unwrap_or(Self::FALLBACK.width),
            height: usable(height).unwrap_or(Self::FALLBACK.height),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MarginLength {
    Px(f64),
    Percent(f64),
}

impl MarginLength {
    fn parse(token: &str, source: &str) -> Result<Self, ConfigError> {
        let number = |raw: &str| {
            raw.parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| ConfigError::root_margin(source, "lengths must be numeric"))
        };

        if let Some(raw) = token.strip_suffix('%') {
            Ok(Self::Percent(number(raw)?))
        } else if let Some(raw) = token.strip_suffix("px") {
            Ok(Self::Px(number(raw)?))
        } else if token == "0" {
            Ok(Self::Px(0.0))
        } else {
            Err(ConfigError::root_margin(source, "lengths must be in px or %"))
        }
    }

    fn resolve(self, extent: f64) -> f64 {
        match self {
            Self::Px(value) => value,
            Self::Percent(value) => extent * value / 100.0,
        }
    }

    fn to_css(self) -> String {
        match self {
            Self::Px(value) => format!("{value}px"),
            Self::Percent(value) => format!("{value}%"),
        }
    }
}

/// CSS `rootMargin`: top, right, bottom, left. Positive values grow the root
/// box, negative values shrink it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootMargin {
    pub top: MarginLength,
    pub right: MarginLength,
    pub bottom: MarginLength,
    pub left: MarginLength,
}

impl Default for RootMargin {
    fn default() -> Self {
        Self::uniform(MarginLength::Px(0.0))
    }
}

impl RootMargin {
    pub fn uniform(length: MarginLength) -> Self {
        Self {
            top: length,
            right: length,
            bottom: length,
            left: length,
        }
    }

    /// Band covering the middle 20% of the viewport height.
    pub fn central_band() -> Self {
        Self {
            top: MarginLength::Percent(-40.0),
            right: MarginLength::Px(0.0),
            bottom: MarginLength::Percent(-40.0),
            left: MarginLength::Px(0.0),
        }
    }

    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let lengths = value
            .split_whitespace()
            .map(|token| MarginLength::parse(token, value))
            .collect::<Result<Vec<_>, _>>()?;

        match lengths.as_slice() {
            [all] => Ok(Self::uniform(*all)),
            [vertical, horizontal] => Ok(Self {
                top: *vertical,
                right: *horizontal,
                bottom: *vertical,
                left: *horizontal,
            }),
            [top, horizontal, bottom] => Ok(Self {
                top: *top,
                right: *horizontal,
                bottom: *bottom,
                left: *horizontal,
            }),
            [top, right, bottom, left] => Ok(Self {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
            }),
            _ => Err(ConfigError::root_margin(value, "expected one to four values")),
        }
    }

    pub fn to_css(&self) -> String {
        format!(
            "{} {} {} {}",
            self.top.to_css(),
            self.right.to_css(),
            self.bottom.to_css(),
            self.left.to_css()
        )
    }

    pub fn root_box(&self, viewport: Viewport) -> Rect {
        let top = -self.top.resolve(viewport.height);
        let left = -self.left.resolve(viewport.width);
        let bottom = viewport.height + self.bottom.resolve(viewport.height);
        let right = viewport.width + self.right.resolve(viewport.width);

        Rect::new(top, left, (right - left).max(0.0), (bottom - top).max(0.0))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ObserveOptions {
    pub threshold: f64,
    pub root_margin: RootMargin,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            root_margin: RootMargin::default(),
        }
    }
}

/// Platform seam for viewport observation.
///
/// `observe` returns `None` when the platform cannot observe the target; the
/// caller treats that as "never reported". Dropping the subscription stops
/// delivery.
pub trait IntersectionSource: Clone + 'static {
    type Target: Clone + PartialEq + 'static;
    type Subscription: 'static;

    fn observe(
        &self,
        target: &Self::Target,
        options: &ObserveOptions,
        on_entry: Rc<dyn Fn(IntersectionEntry)>,
    ) -> Option<Self::Subscription>;
}

#[cfg(test)]
pub use fake::FakeIntersections;
