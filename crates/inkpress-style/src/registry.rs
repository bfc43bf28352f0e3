//! Named themes with one active theme.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::color::Rgb;
use crate::error::ThemeError;
use crate::theme::{Theme, themes};
use inkpress_core::token::TokenKind;

/// Registry of immutable themes. Names are case-insensitive.
///
/// Themes are shared behind `Arc`; a render can hold the theme it started
/// with while the registry's active theme changes.
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: Vec<Arc<Theme>>,
    by_name: FxHashMap<String, usize>,
    active: usize,
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl ThemeRegistry {
    /// A registry holding only `initial`, which is active.
    #[must_use]
    pub fn new(initial: Theme) -> Self {
        let mut by_name = FxHashMap::default();
        by_name.insert(initial.name().to_lowercase(), 0);
        Self {
            themes: vec![Arc::new(initial)],
            by_name,
            active: 0,
        }
    }

    /// The built-in themes, with `dark` active.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut builtins = themes::all().into_iter();
        let mut registry = Self::new(builtins.next().unwrap_or_else(themes::dark));
        for theme in builtins {
            if let Err(err) = registry.register(theme) {
                warn!(error = %err, "built-in theme skipped");
            }
        }
        registry
    }

    /// Add a theme. Registered themes cannot be replaced.
    pub fn register(&mut self, theme: Theme) -> Result<(), ThemeError> {
        let key = theme.name().to_lowercase();
        if self.by_name.contains_key(&key) {
            return Err(ThemeError::DuplicateTheme(theme.name().to_string()));
        }
        debug!(theme = theme.name(), "theme registered");
        self.by_name.insert(key, self.themes.len());
        self.themes.push(Arc::new(theme));
        Ok(())
    }

    /// Make `name` the active theme. Returns `false`, leaving the active
    /// theme unchanged, when no such theme is registered.
    pub fn activate(&mut self, name: &str) -> bool {
        match self.by_name.get(&name.trim().to_lowercase()) {
            Some(&index) => {
                self.active = index;
                debug!(theme = self.themes[index].name(), "theme activated");
                true
            }
            None => {
                warn!(theme = name, "unknown theme, active theme unchanged");
                false
            }
        }
    }

    /// The active theme.
    #[must_use]
    pub fn active(&self) -> &Arc<Theme> {
        &self.themes[self.active]
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Theme>> {
        let index = self.by_name.get(&name.trim().to_lowercase())?;
        self.themes.get(*index)
    }

    /// Registered names, in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.themes.iter().map(|t| t.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.themes.len()
    }

    /// Always false: a registry holds at least one theme.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    /// Color of `kind` in the active theme.
    #[inline]
    #[must_use]
    pub fn resolve(&self, kind: TokenKind) -> Rgb {
        self.active().color(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeBuilder;
    use tracing_test::traced_test;

    #[test]
    fn builtins_default_to_dark() {
        let registry = ThemeRegistry::with_builtins();
        assert_eq!(registry.names(), vec!["dark", "light", "eink"]);
        assert_eq!(registry.active().name(), "dark");
        assert_eq!(
            registry.resolve(TokenKind::Keyword),
            themes::dark().color(TokenKind::Keyword)
        );
        assert!(!registry.is_empty());
    }

    #[test]
    fn every_builtin_is_registered() {
        let registry = ThemeRegistry::with_builtins();
        let expected: Vec<String> = themes::all().iter().map(|t| t.name().to_string()).collect();
        assert_eq!(registry.len(), expected.len());
        for name in &expected {
            assert!(registry.get(name).is_some(), "{name} missing");
        }
    }

    #[test]
    fn activate_switches_resolution() {
        let mut registry = ThemeRegistry::default();
        assert!(registry.activate("Light"));
        assert_eq!(registry.active().name(), "light");
        assert_eq!(
            registry.resolve(TokenKind::String),
            themes::light().color(TokenKind::String)
        );
    }

    #[test]
    #[traced_test]
    fn activating_unknown_theme_keeps_previous() {
        let mut registry = ThemeRegistry::with_builtins();
        assert!(registry.activate("eink"));
        assert!(!registry.activate("solarized"));
        assert_eq!(registry.active().name(), "eink");
        assert!(logs_contain("unknown theme"));
    }

    #[test]
    fn custom_theme_registration() {
        let mut registry = ThemeRegistry::with_builtins();
        let custom = ThemeBuilder::from_theme(&themes::light(), "paper")
            .color(TokenKind::Keyword, Rgb::BLACK)
            .build()
            .unwrap();
        registry.register(custom).unwrap();
        assert!(registry.activate("paper"));
        assert_eq!(registry.resolve(TokenKind::Keyword), Rgb::BLACK);
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = ThemeRegistry::with_builtins();
        let err = registry
            .register(ThemeBuilder::from_theme(&themes::dark(), "DARK").build().unwrap())
            .unwrap_err();
        assert_eq!(err, ThemeError::DuplicateTheme("DARK".into()));
        assert_eq!(registry.get("dark").map(|t| t.background()), Some(themes::dark().background()));
    }

    #[test]
    fn held_theme_survives_switch() {
        let mut registry = ThemeRegistry::with_builtins();
        let held = Arc::clone(registry.active());
        registry.activate("light");
        assert_eq!(held.name(), "dark");
    }

    #[test]
    fn registry_is_shareable_across_threads() {
        let registry = ThemeRegistry::with_builtins();
        std::thread::scope(|s| {
            for kind in TokenKind::ALL {
                let registry = &registry;
                s.spawn(move || assert_eq!(registry.resolve(kind), themes::dark().color(kind)));
            }
        });
    }
}
