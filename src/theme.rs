pub const THEME_KEY: &str = "portfolio-theme";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// How the header switch presents itself while this theme is active.
    pub fn switch(self) -> ThemeSwitch {
        ThemeSwitch {
            aria_label: match self.opposite() {
                Self::Light => "Use light theme",
                Self::Dark => "Use dark theme",
            },
            pressed: self == Self::Dark,
            glyph: match self {
                Self::Light => "☾",
                Self::Dark => "☀",
            },
        }
    }
}

/// Accessible rendering of the theme switch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemeSwitch {
    pub aria_label: &'static str,
    pub pressed: bool,
    pub glyph: &'static str,
}

/// Durable key-value storage for the preference.
pub trait PreferenceStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str);
}

/// Sole writer of the theme: resolves it once, then flips and persists it.
pub struct ThemeController<S: PreferenceStore> {
    store: S,
    theme: Theme,
}

impl<S: PreferenceStore> ThemeController<S> {
    /// Stored value first, then the system preference, then light.
    pub fn resolve(store: S, system_prefers_dark: Option<bool>) -> Self {
        let stored = store.read(THEME_KEY).as_deref().and_then(Theme::parse);
        let theme = stored.unwrap_or(match system_prefers_dark {
            Some(true) => Theme::Dark,
            Some(false) | None => Theme::Light,
        });
        log::debug!(
            "theme resolved to {} (stored: {})",
            theme.as_str(),
            stored.is_some()
        );

        Self { store, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Flips the theme and writes it through before returning it.
    pub fn toggle(&mut self) -> Theme {
        self.theme = self.theme.opposite();
        self.store.write(THEME_KEY, self.theme.as_str());
        log::debug!("theme toggled to {}", self.theme.as_str());
        self.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, collections::HashMap, rc::Rc};

    #[derive(Clone, Default)]
    struct MemoryStore(Rc<RefCell<HashMap<String, String>>>);

    impl PreferenceStore for MemoryStore {
        fn read(&self, key: &str) -> Option<String> {
            self.0.borrow().get(key).cloned()
        }

        fn write(&self, key: &str, value: &str) {
            self.0.borrow_mut().insert(key.to_string(), value.to_string());
        }
    }

    #[test]
    fn system_dark_preference_applies_without_stored_value() {
        let store = MemoryStore::default();
        let mut controller = ThemeController::resolve(store.clone(), Some(true));
        assert_eq!(controller.theme(), Theme::Dark);

        assert_eq!(controller.toggle(), Theme::Light);
        assert_eq!(store.read(THEME_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn stored_value_wins_over_system_preference() {
        let store = MemoryStore::default();
        store.write(THEME_KEY, "light");
        let controller = ThemeController::resolve(store, Some(true));
        assert_eq!(controller.theme(), Theme::Light);
    }

    #[test]
    fn falls_back_to_light() {
        let store = MemoryStore::default();
        store.write(THEME_KEY, "sepia");
        assert_eq!(ThemeController::resolve(store, None).theme(), Theme::Light);
        assert_eq!(
            ThemeController::resolve(MemoryStore::default(), Some(false)).theme(),
            Theme::Light
        );
    }

    #[test]
    fn every_toggle_is_persisted() {
        let store = MemoryStore::default();
        let mut controller = ThemeController::resolve(store.clone(), None);
        controller.toggle();
        assert_eq!(store.read(THEME_KEY).as_deref(), Some("dark"));
        controller.toggle();
        assert_eq!(store.read(THEME_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn switch_announces_the_theme_it_leads_to() {
        let light = Theme::Light.switch();
        assert_eq!(light.aria_label, "Use dark theme");
        assert!(!light.pressed);

        let dark = Theme::Dark.switch();
        assert_eq!(dark.aria_label, "Use light theme");
        assert!(dark.pressed);
        assert_ne!(light.glyph, dark.glyph);
    }
}
