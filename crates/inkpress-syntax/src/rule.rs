#![forbid(unsafe_code)]

//! Scanner rules and per-language rule sets.
//!
//! Rules are data. Each one pairs a regex with a classification and a
//! priority; a [`RuleSet`] keeps them sorted by descending priority, with
//! ties broken by insertion order. Patterns are compiled anchored (`^(?:...)`)
//! and matched against the unscanned remainder of the source, so a rule can
//! only ever match at the scanner's current offset.

use regex::Regex;

use crate::error::RuleError;
use inkpress_core::token::TokenKind;

// ---------------------------------------------------------------------------
// ScannerRule
// ---------------------------------------------------------------------------

/// A single compiled scanning rule.
#[derive(Debug, Clone)]
pub struct ScannerRule {
    source: String,
    pattern: Regex,
    classification: TokenKind,
    priority: i32,
    multiline: bool,
    end_pattern: Option<String>,
    end_regex: Option<Regex>,
    escape: Option<char>,
    insertion: usize,
}

impl ScannerRule {
    /// Length in bytes of this rule's match at the start of `rest`.
    ///
    /// Empty matches are ignored: a rule that matches nothing cannot advance
    /// the scanner.
    #[must_use]
    pub fn match_len(&self, rest: &str) -> Option<usize> {
        self.pattern
            .find(rest)
            .filter(|m| m.start() == 0 && !m.is_empty())
            .map(|m| m.end())
    }

    /// The pattern as written, without the anchoring wrapper.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn classification(&self) -> TokenKind {
        self.classification
    }

    #[must_use]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Whether a match opens a multi-line run.
    #[must_use]
    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    /// Source of the closing pattern, when the rule declares one.
    #[must_use]
    pub fn end_pattern(&self) -> Option<&str> {
        self.end_pattern.as_deref()
    }

    /// Compiled closing pattern (unanchored; it is searched for).
    #[must_use]
    pub fn end_regex(&self) -> Option<&Regex> {
        self.end_regex.as_ref()
    }

    /// Escape character that keeps a closing delimiter from closing the run.
    #[must_use]
    pub fn escape(&self) -> Option<char> {
        self.escape
    }

    /// Position in which the rule was added to its builder.
    #[must_use]
    pub fn insertion(&self) -> usize {
        self.insertion
    }
}

// ---------------------------------------------------------------------------
// RuleSet
// ---------------------------------------------------------------------------

/// An immutable, priority-ordered list of rules for one language.
#[derive(Debug, Clone)]
pub struct RuleSet {
    name: String,
    aliases: Vec<String>,
    extensions: Vec<String>,
    rules: Vec<ScannerRule>,
}

impl RuleSet {
    /// Start building a rule set for `name`.
    pub fn builder(name: impl Into<String>) -> RuleSetBuilder {
        RuleSetBuilder::new(name)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Alternative names the registry accepts for this language.
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// File extensions (without dots).
    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Rules in the order the scanner tries them.
    #[must_use]
    pub fn rules(&self) -> &[ScannerRule] {
        &self.rules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// ---------------------------------------------------------------------------
// RuleSetBuilder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct RuleSpec {
    pattern: String,
    classification: TokenKind,
    priority: i32,
    multiline: bool,
    end_pattern: Option<String>,
    escape: Option<char>,
}

/// Builder for [`RuleSet`]. Patterns are compiled and checked in
/// [`RuleSetBuilder::build`].
#[derive(Debug, Clone)]
pub struct RuleSetBuilder {
    name: String,
    aliases: Vec<String>,
    extensions: Vec<String>,
    specs: Vec<RuleSpec>,
}

impl RuleSetBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            extensions: Vec::new(),
            specs: Vec::new(),
        }
    }

    /// Add alternative names.
    #[must_use]
    pub fn aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases.extend(aliases.iter().map(|a| (*a).to_string()));
        self
    }

    /// Add file extensions (leading dots are stripped).
    #[must_use]
    pub fn extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions.extend(
            extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_string()),
        );
        self
    }

    /// Add a single-span rule.
    #[must_use]
    pub fn rule(mut self, classification: TokenKind, priority: i32, pattern: &str) -> Self {
        self.specs.push(RuleSpec {
            pattern: pattern.to_string(),
            classification,
            priority,
            multiline: false,
            end_pattern: None,
            escape: None,
        });
        self
    }

    /// Add a rule whose match opens a multi-line run.
    ///
    /// `open` matches the opening delimiter. The run closes at the first
    /// match of `end`, or at the next occurrence of the opening text when
    /// `end` is `None`.
    #[must_use]
    pub fn multiline(
        mut self,
        classification: TokenKind,
        priority: i32,
        open: &str,
        end: Option<&str>,
    ) -> Self {
        self.specs.push(RuleSpec {
            pattern: open.to_string(),
            classification,
            priority,
            multiline: true,
            end_pattern: end.map(str::to_string),
            escape: None,
        });
        self
    }

    /// Like [`RuleSetBuilder::multiline`], but a closing delimiter preceded by
    /// an odd number of `escape` characters does not close the run.
    #[must_use]
    pub fn multiline_escaped(
        self,
        classification: TokenKind,
        priority: i32,
        open: &str,
        end: Option<&str>,
        escape: char,
    ) -> Self {
        let mut builder = self.multiline(classification, priority, open, end);
        if let Some(spec) = builder.specs.last_mut() {
            spec.escape = Some(escape);
        }
        builder
    }

    /// Add a rule matching any of `words` as a whole word.
    #[must_use]
    pub fn words(self, classification: TokenKind, priority: i32, words: &[&str]) -> Self {
        let alternation = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        self.rule(classification, priority, &format!(r"(?:{alternation})\b"))
    }

    /// Compile every rule and sort by descending priority.
    pub fn build(self) -> Result<RuleSet, RuleError> {
        let mut rules = Vec::with_capacity(self.specs.len());
        for (insertion, spec) in self.specs.into_iter().enumerate() {
            rules.push(compile(&self.name, spec, insertion)?);
        }
        // Stable: equal priorities keep insertion order.
        rules.sort_by_key(|rule| std::cmp::Reverse(rule.priority));
        Ok(RuleSet {
            name: self.name,
            aliases: self.aliases,
            extensions: self.extensions,
            rules,
        })
    }
}

fn compile(language: &str, spec: RuleSpec, insertion: usize) -> Result<ScannerRule, RuleError> {
    let pattern = Regex::new(&format!("^(?:{})", spec.pattern)).map_err(|e| {
        RuleError::InvalidPattern {
            language: language.to_string(),
            pattern: spec.pattern.clone(),
            message: e.to_string(),
        }
    })?;
    if pattern.is_match("") {
        return Err(RuleError::EmptyMatch {
            language: language.to_string(),
            pattern: spec.pattern,
        });
    }

    let end_regex = match &spec.end_pattern {
        Some(end) => {
            let regex = Regex::new(end).map_err(|e| RuleError::InvalidEndPattern {
                language: language.to_string(),
                pattern: end.clone(),
                message: e.to_string(),
            })?;
            if regex.is_match("") {
                return Err(RuleError::EmptyMatch {
                    language: language.to_string(),
                    pattern: end.clone(),
                });
            }
            Some(regex)
        }
        None => None,
    };

    Ok(ScannerRule {
        source: spec.pattern,
        pattern,
        classification: spec.classification,
        priority: spec.priority,
        multiline: spec.multiline,
        end_pattern: spec.end_pattern,
        end_regex,
        escape: spec.escape,
        insertion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_sorted_by_descending_priority() {
        let set = RuleSet::builder("t")
            .rule(TokenKind::Identifier, 10, "[a-z]+")
            .rule(TokenKind::Keyword, 50, "if")
            .rule(TokenKind::Number, 30, "[0-9]+")
            .build()
            .unwrap();
        let priorities: Vec<_> = set.rules().iter().map(ScannerRule::priority).collect();
        assert_eq!(priorities, vec![50, 30, 10]);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let set = RuleSet::builder("t")
            .rule(TokenKind::Keyword, 5, "a")
            .rule(TokenKind::Identifier, 5, "b")
            .rule(TokenKind::Number, 5, "c")
            .build()
            .unwrap();
        let order: Vec<_> = set.rules().iter().map(ScannerRule::insertion).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn match_is_anchored() {
        let set = RuleSet::builder("t")
            .rule(TokenKind::Number, 1, "[0-9]+")
            .build()
            .unwrap();
        let rule = &set.rules()[0];
        assert_eq!(rule.match_len("123abc"), Some(3));
        assert_eq!(rule.match_len("abc123"), None);
    }

    #[test]
    fn alternation_is_grouped_by_anchor() {
        // Without the group, `^a|b` would also match a `b` anywhere.
        let set = RuleSet::builder("t")
            .rule(TokenKind::Keyword, 1, "a|b")
            .build()
            .unwrap();
        assert_eq!(set.rules()[0].match_len("xb"), None);
        assert_eq!(set.rules()[0].match_len("b"), Some(1));
    }

    #[test]
    fn words_require_word_boundary() {
        let set = RuleSet::builder("t")
            .words(TokenKind::Keyword, 1, &["if", "in"])
            .build()
            .unwrap();
        let rule = &set.rules()[0];
        assert_eq!(rule.match_len("if x"), Some(2));
        assert_eq!(rule.match_len("iffy"), None);
        assert_eq!(rule.match_len("in"), Some(2));
    }

    #[test]
    fn words_are_regex_escaped() {
        let set = RuleSet::builder("t")
            .words(TokenKind::Builtin, 1, &["a.b"])
            .build()
            .unwrap();
        assert_eq!(set.rules()[0].match_len("axb"), None);
        assert_eq!(set.rules()[0].match_len("a.b"), Some(3));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = RuleSet::builder("broken")
            .rule(TokenKind::Keyword, 1, "(")
            .build()
            .unwrap_err();
        assert!(matches!(err, RuleError::InvalidPattern { ref language, .. } if language == "broken"));
    }

    #[test]
    fn empty_matching_pattern_is_rejected() {
        let err = RuleSet::builder("t")
            .rule(TokenKind::Whitespace, 1, r"\s*")
            .build()
            .unwrap_err();
        assert!(matches!(err, RuleError::EmptyMatch { .. }));
    }

    #[test]
    fn invalid_end_pattern_is_reported() {
        let err = RuleSet::builder("t")
            .multiline(TokenKind::Comment, 1, r"/\*", Some("[unclosed"))
            .build()
            .unwrap_err();
        assert!(matches!(err, RuleError::InvalidEndPattern { .. }));
    }

    #[test]
    fn multiline_rule_metadata() {
        let set = RuleSet::builder("t")
            .extensions(&[".t", "tt"])
            .aliases(&["tee"])
            .multiline_escaped(TokenKind::String, 9, "`", Some("`"), '\\')
            .build()
            .unwrap();
        let rule = &set.rules()[0];
        assert!(rule.is_multiline());
        assert_eq!(rule.end_pattern(), Some("`"));
        assert!(rule.end_regex().is_some());
        assert_eq!(rule.escape(), Some('\\'));
        assert_eq!(set.extensions(), ["t".to_string(), "tt".to_string()]);
        assert_eq!(set.aliases(), ["tee".to_string()]);
        assert_eq!(set.len(), 1);
        assert!(!set.is_empty());
    }
}
