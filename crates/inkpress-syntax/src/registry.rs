#![forbid(unsafe_code)]

//! Language lookup by name, alias or file extension.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{RuleError, ScanError};
use crate::languages;
use crate::rule::RuleSet;
use crate::scanner::{ScanOutput, Scanner};

/// Registry of rule sets. Lookups are case-insensitive.
///
/// Later registrations for the same name, alias or extension override
/// earlier ones. Re-registering a name replaces that language outright: the
/// aliases and extensions of the replaced set stop resolving. Rule sets are shared behind `Arc` so a registry can be
/// cloned cheaply into worker threads.
#[derive(Debug, Clone, Default)]
pub struct LanguageRegistry {
    languages: Vec<Arc<RuleSet>>,
    by_name: FxHashMap<String, usize>,
    by_extension: FxHashMap<String, usize>,
}

impl LanguageRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in language.
    pub fn with_builtins() -> Result<Self, RuleError> {
        let mut registry = Self::new();
        for rules in languages::builtins()? {
            registry.register(rules);
        }
        Ok(registry)
    }

    /// Add a language.
    pub fn register(&mut self, rules: RuleSet) {
        let rules = Arc::new(rules);
        let index = self.languages.len();
        debug!(language = rules.name(), rules = rules.len(), "language registered");

        if let Some(&replaced) = self.by_name.get(&rules.name().to_lowercase()) {
            self.by_name.retain(|_, i| *i != replaced);
            self.by_extension.retain(|_, i| *i != replaced);
            debug!(language = rules.name(), "previous registration replaced");
        }
        self.by_name.insert(rules.name().to_lowercase(), index);
        for alias in rules.aliases() {
            self.by_name.insert(alias.to_lowercase(), index);
        }
        for ext in rules.extensions() {
            let key = ext.trim_start_matches('.').to_lowercase();
            if !key.is_empty() {
                self.by_extension.insert(key, index);
            }
        }
        self.languages.push(rules);
    }

    /// Look up by name or alias.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<RuleSet>> {
        let index = self.by_name.get(&name.trim().to_lowercase())?;
        self.languages.get(*index)
    }

    /// Look up by file extension (dot optional).
    #[must_use]
    pub fn for_extension(&self, ext: &str) -> Option<&Arc<RuleSet>> {
        let key = ext.trim().trim_start_matches('.').to_lowercase();
        let index = self.by_extension.get(&key)?;
        self.languages.get(*index)
    }

    /// Look up by name or alias, falling back to treating `key` as an
    /// extension.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<&Arc<RuleSet>> {
        self.get(key).or_else(|| self.for_extension(key))
    }

    /// Names of the languages reachable through [`LanguageRegistry::get`],
    /// in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names = Vec::with_capacity(self.languages.len());
        for (index, rules) in self.languages.iter().enumerate() {
            let current = self.by_name.get(&rules.name().to_lowercase());
            if current == Some(&index) {
                names.push(rules.name());
            }
        }
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Scan `source` with the language registered under `language`.
    pub fn scan<'src>(
        &self,
        source: &'src str,
        language: &str,
    ) -> Result<ScanOutput<'src>, ScanError> {
        let rules = self
            .resolve(language)
            .ok_or_else(|| ScanError::UnknownLanguage(language.to_string()))?;
        Ok(Scanner::new(rules).scan(source))
    }
}
