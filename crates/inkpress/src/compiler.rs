#![forbid(unsafe_code)]

//! The compile pipeline: tab expansion, scan, layout and render.

use std::borrow::Cow;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use inkpress_layout::{CodeMetadata, FontMetrics, LayoutConfig, layout, split_lines};
use inkpress_render::{RenderOptions, Renderer};
use inkpress_style::{Theme, ThemeRegistry};
use inkpress_syntax::{LanguageRegistry, ScanError, Scanner};
use tracing::{debug, info, info_span};

use crate::config::CompileConfig;
use crate::document::{CompiledDocument, DocumentSummary};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Compiler
// ---------------------------------------------------------------------------

/// Language and theme registries plus the settings every compilation uses.
///
/// A `Compiler` is immutable during [`compile`](Compiler::compile), so one
/// instance can serve many threads.
#[derive(Debug, Clone)]
pub struct Compiler {
    languages: LanguageRegistry,
    themes: ThemeRegistry,
    config: CompileConfig,
}

impl Compiler {
    /// Build a compiler with the built-in languages and themes.
    ///
    /// An unknown `config.theme` is logged and leaves `dark` active.
    pub fn new(config: CompileConfig) -> Result<Self> {
        config.validate()?;
        let languages = LanguageRegistry::with_builtins()?;
        let mut themes = ThemeRegistry::with_builtins();
        themes.activate(&config.theme);
        debug!(config = %config.summary_short(), "compiler ready");
        Ok(Self {
            languages,
            themes,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &CompileConfig {
        &self.config
    }

    #[must_use]
    pub fn languages(&self) -> &LanguageRegistry {
        &self.languages
    }

    pub fn languages_mut(&mut self) -> &mut LanguageRegistry {
        &mut self.languages
    }

    #[must_use]
    pub fn themes(&self) -> &ThemeRegistry {
        &self.themes
    }

    pub fn themes_mut(&mut self) -> &mut ThemeRegistry {
        &mut self.themes
    }

    /// Switch the active theme. Returns `false` and keeps the current theme
    /// when `name` is not registered.
    pub fn activate_theme(&mut self, name: &str) -> bool {
        self.themes.activate(name)
    }

    /// Layout settings for `theme`: config overrides win over the theme's
    /// font size and line height.
    #[must_use]
    pub fn layout_config(&self, theme: &Theme) -> LayoutConfig {
        let metrics = FontMetrics::new(
            self.config.font_size.unwrap_or(theme.font_size()),
            self.config
                .line_height
                .unwrap_or(theme.line_height_multiplier()),
            self.config.char_width_ratio,
        );
        LayoutConfig::default()
            .with_page_size(self.config.page_size)
            .with_margins(self.config.margins)
            .with_metrics(metrics)
            .with_line_numbers(self.config.show_line_numbers)
            .with_metadata(self.config.show_metadata)
    }

    fn render_options(&self) -> RenderOptions {
        RenderOptions {
            debug_outlines: self.config.debug,
            color_profile: self.config.color_profile,
            escape: self.config.escape,
        }
    }

    /// Compile `source` with the language registered under `language` (a
    /// name, alias or file extension) and the active theme.
    ///
    /// Geometry errors are reported before anything is scanned. Scanner
    /// problems never fail a compilation; they are returned as
    /// [`CompiledDocument::diagnostics`].
    pub fn compile(
        &self,
        source: &str,
        language: &str,
        metadata: Option<&CodeMetadata>,
    ) -> Result<CompiledDocument> {
        let theme = Arc::clone(self.themes.active());
        let _span = info_span!("inkpress.compile", language, theme = theme.name()).entered();

        let rules = self
            .languages
            .resolve(language)
            .ok_or_else(|| ScanError::UnknownLanguage(language.to_string()))?;

        let source = expand_tabs(source, self.config.tab_width).into_owned();
        let lines = split_lines(&source);
        let pages = layout(&lines, metadata, &self.layout_config(&theme))?;

        let output = Scanner::new(rules).scan(&source);
        let primitives =
            Renderer::new(self.render_options()).render(&source, &output.tokens, &pages, &theme);

        let summary = DocumentSummary::new(&pages, &primitives, output.tokens.len());
        info!(
            pages = summary.page_count,
            lines = summary.line_count,
            primitives = summary.primitive_count,
            diagnostics = output.diagnostics.len(),
            "document compiled"
        );

        let diagnostics = output.diagnostics;
        Ok(CompiledDocument {
            language: rules.name().to_string(),
            source,
            theme,
            pages,
            primitives,
            summary,
            diagnostics,
        })
    }

    pub fn compile_job(&self, job: &CompileJob) -> Result<CompiledDocument> {
        self.compile(&job.source, &job.language, job.metadata.as_ref())
    }
}

// ---------------------------------------------------------------------------
// Batches
// ---------------------------------------------------------------------------

/// One document of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileJob {
    pub source: String,
    pub language: String,
    pub metadata: Option<CodeMetadata>,
}

impl CompileJob {
    pub fn new(source: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            language: language.into(),
            metadata: None,
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: CodeMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Compile independent documents on scoped worker threads.
///
/// Each document is compiled whole by one worker. Results are returned in
/// job order.
pub fn compile_many(compiler: &Compiler, jobs: &[CompileJob]) -> Vec<Result<CompiledDocument>> {
    let workers = thread::available_parallelism()
        .map_or(1, NonZeroUsize::get)
        .min(jobs.len());
    if workers <= 1 {
        return jobs.iter().map(|job| compiler.compile_job(job)).collect();
    }

    let next = &AtomicUsize::new(0);
    let mut results: Vec<Option<Result<CompiledDocument>>> = jobs.iter().map(|_| None).collect();
    thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|_| {
                s.spawn(move || {
                    let mut done = Vec::new();
                    loop {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(job) = jobs.get(index) else {
                            break;
                        };
                        done.push((index, compiler.compile_job(job)));
                    }
                    done
                })
            })
            .collect();
        for handle in handles {
            match handle.join() {
                Ok(done) => {
                    for (index, result) in done {
                        results[index] = Some(result);
                    }
                }
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
    });
    results.into_iter().flatten().collect()
}

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

/// Replace tabs with spaces up to the next multiple of `tab_width` columns.
/// Columns count characters and restart after each `\n`.
#[must_use]
pub fn expand_tabs(source: &str, tab_width: usize) -> Cow<'_, str> {
    if !source.contains('\t') {
        return Cow::Borrowed(source);
    }
    let width = tab_width.max(1);
    let mut out = String::with_capacity(source.len() + 8 * width);
    let mut column = 0;
    for ch in source.chars() {
        match ch {
            '\t' => {
                let pad = width - column % width;
                out.extend(std::iter::repeat_n(' ', pad));
                column += pad;
            }
            '\n' => {
                out.push(ch);
                column = 0;
            }
            _ => {
                out.push(ch);
                column += 1;
            }
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use inkpress_core::token::TokenKind;
    use inkpress_layout::{LayoutError, PageSize};
    use inkpress_render::RunRole;
    use tracing_test::traced_test;

    fn compiler() -> Compiler {
        Compiler::new(CompileConfig::default()).unwrap()
    }

    // -- tabs ---------------------------------------------------------------

    #[test]
    fn tabs_expand_to_next_stop() {
        assert_eq!(expand_tabs("\tx", 4), "    x");
        assert_eq!(expand_tabs("ab\tc", 4), "ab  c");
        assert_eq!(expand_tabs("abcd\te", 4), "abcd    e");
        assert_eq!(expand_tabs("a\n\tb", 2), "a\n  b");
        assert!(matches!(expand_tabs("no tabs", 4), Cow::Borrowed(_)));
    }

    // -- construction -------------------------------------------------------

    #[test]
    fn invalid_config_is_rejected() {
        let err = Compiler::new(CompileConfig::default().with_tab_width(0)).unwrap_err();
        assert!(matches!(err, Error::Config(ref errors) if errors[0].field == "tab_width"));
    }

    #[test]
    #[traced_test]
    fn unknown_theme_keeps_default() {
        let compiler = Compiler::new(CompileConfig::default().with_theme("neon")).unwrap();
        assert_eq!(compiler.themes().active().name(), "dark");
        assert!(logs_contain("unknown theme"));
    }

    #[test]
    fn configured_theme_is_active() {
        let compiler = Compiler::new(CompileConfig::default().with_theme("EINK")).unwrap();
        assert_eq!(compiler.themes().active().name(), "eink");
    }

    #[test]
    fn activate_theme_switches_colors() {
        let mut compiler = compiler();
        let dark = compiler.compile("def f", "python", None).unwrap();
        assert!(compiler.activate_theme("light"));
        assert!(!compiler.activate_theme("missing"));
        let light = compiler.compile("def f", "python", None).unwrap();
        let first = |doc: &CompiledDocument| doc.text_runs().find(|r| r.value == "def").map(|r| r.color);
        assert_ne!(first(&dark), first(&light));
        assert_eq!(light.theme.name(), "light");
    }

    // -- compile ------------------------------------------------------------

    #[test]
    fn unknown_language_fails() {
        let err = compiler().compile("x", "cobol", None).unwrap_err();
        assert_eq!(err, Error::Scan(ScanError::UnknownLanguage("cobol".into())));
    }

    #[test]
    fn language_resolves_by_extension() {
        let doc = compiler().compile("let x = 1;", "rs", None).unwrap();
        assert_eq!(doc.language, "rust");
    }

    #[test]
    fn geometry_errors_surface() {
        let config = CompileConfig::default()
            .with_page_size(PageSize::Custom {
                width: 200,
                height: 200,
            })
            .with_margins(90)
            .with_font_size(40);
        let err = Compiler::new(config).unwrap().compile("x", "python", None).unwrap_err();
        assert!(matches!(err, Error::Layout(LayoutError::RegionTooNarrow { .. })));
    }

    #[test]
    fn tabs_are_expanded_before_scanning() {
        let doc = compiler().compile("if x:\n\treturn 1", "python", None).unwrap();
        assert_eq!(doc.source, "if x:\n    return 1");
        let ret = doc.text_runs().find(|r| r.value == "return").unwrap();
        let code_x = doc.pages[0].code_region().x;
        let metrics = doc.pages[0].metrics;
        assert_eq!(ret.x, code_x + metrics.cells_to_px(4));
    }

    #[test]
    fn font_overrides_beat_theme() {
        let compiler = Compiler::new(CompileConfig::default().with_font_size(40)).unwrap();
        let doc = compiler.compile("x", "python", None).unwrap();
        assert_eq!(doc.pages[0].metrics.font_size, 40);
        assert!(doc.text_runs().all(|r| r.size == 40));
    }

    #[test]
    fn diagnostics_do_not_fail_compilation() {
        let doc = compiler().compile("s = '''open", "python", None).unwrap();
        assert_eq!(doc.diagnostics.len(), 1);
        let kinds: Vec<_> = doc
            .text_runs()
            .filter_map(|r| match r.role {
                RunRole::Code(kind) => Some(kind),
                _ => None,
            })
            .collect();
        assert_eq!(kinds.last(), Some(&TokenKind::String));
    }

    #[test]
    #[traced_test]
    fn compile_logs_summary() {
        let doc = compiler().compile("x = 1\ny = 2\n", "python", None).unwrap();
        assert_eq!(doc.summary.line_count, 2);
        assert_eq!(doc.summary.page_count, 1);
        assert!(logs_contain("document compiled"));
    }

    // -- batches ------------------------------------------------------------

    #[test]
    fn compile_many_preserves_order() {
        let compiler = compiler();
        let jobs: Vec<_> = (0..6)
            .map(|i| CompileJob::new(format!("x = {i}"), "python"))
            .chain(std::iter::once(CompileJob::new("x", "cobol")))
            .collect();
        let results = compile_many(&compiler, &jobs);
        assert_eq!(results.len(), 7);
        for (i, result) in results.iter().take(6).enumerate() {
            let doc = result.as_ref().unwrap();
            assert_eq!(doc.source, format!("x = {i}"));
        }
        assert!(results[6].is_err());
    }

    #[test]
    fn compile_many_empty() {
        assert!(compile_many(&compiler(), &[]).is_empty());
    }
}
