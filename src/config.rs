//! Motion and logging settings read from the host page.

use crate::{
    error::ConfigError,
    intersection::RootMargin,
    mobile_nav::NavDurations,
    typewriter::TypewriterTiming,
    visibility::VisibilityOptions,
};
use serde::Deserialize;

pub const CONFIG_ELEMENT_ID: &str = "site-config";

const DEFAULT_TYPING_SPEED_MS: u32 = 120;
const DEFAULT_DELETING_SPEED_MS: u32 = 70;
const DEFAULT_PAUSE_MS: u32 = 1_500;
const DEFAULT_NAV_OPEN_MS: u32 = 600;
const DEFAULT_NAV_CLOSE_MS: u32 = 500;
const DEFAULT_POINTER_THROTTLE_MS: u32 = 16;
const DEFAULT_REVEAL_THRESHOLD: f64 = 0.1;
const DEFAULT_REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";

const SPEED_MS_BOUNDS: (u32, u32) = (10, 2_000);
const PAUSE_MS_BOUNDS: (u32, u32) = (0, 10_000);
const NAV_MS_BOUNDS: (u32, u32) = (0, 5_000);
const POINTER_THROTTLE_MS_BOUNDS: (u32, u32) = (1, 1_000);
const REVEAL_THRESHOLD_BOUNDS: (f64, f64) = (0.0, 1.0);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
        }
    }

    pub fn to_level(self) -> log::Level {
        match self {
            Self::Debug => log::Level::Debug,
            Self::Info => log::Level::Info,
            Self::Warn => log::Level::Warn,
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" => Some(Self::Warn),
            _ => None,
        }
    }
}

/// Raw document shape; every field optional so partial configs are fine.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSiteConfig {
    typing_speed_ms: Option<u32>,
    deleting_speed_ms: Option<u32>,
    pause_ms: Option<u32>,
    nav_open_ms: Option<u32>,
    nav_close_ms: Option<u32>,
    pointer_throttle_ms: Option<u32>,
    reveal_threshold: Option<f64>,
    reveal_root_margin: Option<String>,
    log_level: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SiteConfig {
    pub typewriter: TypewriterTiming,
    pub nav: NavDurations,
    pub pointer_throttle_ms: u32,
    pub reveal_threshold: f64,
    pub reveal_root_margin: RootMargin,
    pub log_level: LogLevel,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            typewriter: TypewriterTiming {
                typing_ms: DEFAULT_TYPING_SPEED_MS,
                deleting_ms: DEFAULT_DELETING_SPEED_MS,
                pause_ms: DEFAULT_PAUSE_MS,
            },
            nav: NavDurations {
                open_ms: DEFAULT_NAV_OPEN_MS,
                close_ms: DEFAULT_NAV_CLOSE_MS,
            },
            pointer_throttle_ms: DEFAULT_POINTER_THROTTLE_MS,
            reveal_threshold: DEFAULT_REVEAL_THRESHOLD,
            reveal_root_margin: default_reveal_margin(),
            log_level: LogLevel::default(),
        }
    }
}

impl SiteConfig {
    /// Parses and clamps a config document. Out-of-range numbers are pulled
    /// into bounds; an unusable root margin or log level keeps its default.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let raw: RawSiteConfig = serde_json::from_str(source)?;

        let reveal_root_margin = match raw.reveal_root_margin.as_deref() {
            Some(value) => RootMargin::parse(value).unwrap_or_else(|error| {
                log::warn!("{error}; using {DEFAULT_REVEAL_ROOT_MARGIN}");
                default_reveal_margin()
            }),
            None => default_reveal_margin(),
        };

        let log_level = raw
            .log_level
            .as_deref()
            .map(|value| {
                LogLevel::parse(value).unwrap_or_else(|| {
                    log::warn!("unknown log level `{value}`; using info");
                    LogLevel::default()
                })
            })
            .unwrap_or_default();

        Ok(Self {
            typewriter: TypewriterTiming {
                typing_ms: clamp_ms(raw.typing_speed_ms, DEFAULT_TYPING_SPEED_MS, SPEED_MS_BOUNDS),
                deleting_ms: clamp_ms(
                    raw.deleting_speed_ms,
                    DEFAULT_DELETING_SPEED_MS,
                    SPEED_MS_BOUNDS,
                ),
                pause_ms: clamp_ms(raw.pause_ms, DEFAULT_PAUSE_MS, PAUSE_MS_BOUNDS),
            },
            nav: NavDurations {
                open_ms: clamp_ms(raw.nav_open_ms, DEFAULT_NAV_OPEN_MS, NAV_MS_BOUNDS),
                close_ms: clamp_ms(raw.nav_close_ms, DEFAULT_NAV_CLOSE_MS, NAV_MS_BOUNDS),
            },
            pointer_throttle_ms: clamp_ms(
                raw.pointer_throttle_ms,
                DEFAULT_POINTER_THROTTLE_MS,
                POINTER_THROTTLE_MS_BOUNDS,
            ),
            reveal_threshold: raw
                .reveal_threshold
                .filter(|value| value.is_finite())
                .unwrap_or(DEFAULT_REVEAL_THRESHOLD)
                .clamp(REVEAL_THRESHOLD_BOUNDS.0, REVEAL_THRESHOLD_BOUNDS.1),
            reveal_root_margin,
            log_level,
        })
    }

    /// Missing document means defaults; a broken one is logged and ignored.
    pub fn load(source: Option<&str>) -> Self {
        let Some(source) = source.map(str::trim).filter(|value| !value.is_empty()) else {
            return Self::default();
        };

        Self::from_json(source).unwrap_or_else(|error| {
            log::warn!("{error}; using default site config");
            Self::default()
        })
    }

    /// Options for sections and cards that animate in once.
    pub fn reveal_options(&self) -> VisibilityOptions {
        VisibilityOptions {
            threshold: self.reveal_threshold,
            root_margin: self.reveal_root_margin,
            trigger_once: true,
        }
    }
}

fn default_reveal_margin() -> RootMargin {
    RootMargin::parse(DEFAULT_REVEAL_ROOT_MARGIN).unwrap_or_default()
}

fn clamp_ms(value: Option<u32>, default: u32, bounds: (u32, u32)) -> u32 {
    value.unwrap_or(default).clamp(bounds.0, bounds.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intersection::MarginLength;

    #[test]
    fn missing_or_blank_document_yields_defaults() {
        assert_eq!(SiteConfig::load(None), SiteConfig::default());
        assert_eq!(SiteConfig::load(Some("  \n")), SiteConfig::default());
        assert_eq!(SiteConfig::default().nav, NavDurations::default());
        assert_eq!(SiteConfig::default().typewriter, TypewriterTiming::default());
    }

    #[test]
    fn malformed_json_falls_back_to_defaults() {
        assert!(matches!(
            SiteConfig::from_json("{ nope"),
            Err(ConfigError::Json(_))
        ));
        assert_eq!(SiteConfig::load(Some("{ nope")), SiteConfig::default());
    }

    #[test]
    fn partial_document_overrides_only_named_fields() {
        let config = SiteConfig::from_json(r#"{ "typingSpeedMs": 90, "logLevel": "DEBUG" }"#)
            .expect("valid config");
        assert_eq!(config.typewriter.typing_ms, 90);
        assert_eq!(config.typewriter.deleting_ms, DEFAULT_DELETING_SPEED_MS);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn values_are_clamped_to_bounds() {
        let config = SiteConfig::from_json(
            r#"{ "typingSpeedMs": 1, "pauseMs": 999999, "pointerThrottleMs": 0, "revealThreshold": 4.5 }"#,
        )
        .expect("valid config");
        assert_eq!(config.typewriter.typing_ms, 10);
        assert_eq!(config.typewriter.pause_ms, 10_000);
        assert_eq!(config.pointer_throttle_ms, 1);
        assert_eq!(config.reveal_threshold, 1.0);
    }

    #[test]
    fn bad_margin_and_level_keep_defaults() {
        let config = SiteConfig::from_json(r#"{ "revealRootMargin": "5em", "logLevel": "loud" }"#)
            .expect("valid config");
        assert_eq!(config.reveal_root_margin.bottom, MarginLength::Px(-50.0));
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn reveal_options_trigger_once() {
        let options = SiteConfig::default().reveal_options();
        assert!(options.trigger_once);
        assert_eq!(options.threshold, DEFAULT_REVEAL_THRESHOLD);
    }
}
