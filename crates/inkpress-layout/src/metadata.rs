//! Descriptive metadata printed in the first page's header.

/// Where a code excerpt came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeMetadata {
    pub filename: String,
    pub language: String,
    pub author: Option<String>,
    /// First source line number of the excerpt (0 when unknown).
    pub line_start: usize,
    /// Last source line number of the excerpt (0 when unknown).
    pub line_end: usize,
    pub tags: Vec<String>,
}

impl CodeMetadata {
    pub fn new(filename: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            language: language.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    #[must_use]
    pub fn with_lines(mut self, start: usize, end: usize) -> Self {
        self.line_start = start;
        self.line_end = end;
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// One header line per populated field.
    #[must_use]
    pub fn populated_fields(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(5);
        if !self.filename.trim().is_empty() {
            fields.push(format!("File: {}", self.filename.trim()));
        }
        if !self.language.trim().is_empty() {
            fields.push(format!("Language: {}", self.language.trim()));
        }
        if let Some(author) = self.author.as_deref().map(str::trim)
            && !author.is_empty()
        {
            fields.push(format!("Author: {author}"));
        }
        if self.line_end > 0 {
            let start = self.line_start.max(1);
            fields.push(format!("Lines {start}-{}", self.line_end));
        }
        let tags: Vec<&str> = self
            .tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if !tags.is_empty() {
            fields.push(format!("Tags: {}", tags.join(", ")));
        }
        fields
    }

    /// First line number to print, 1 when unknown.
    #[must_use]
    pub fn first_line_number(&self) -> usize {
        self.line_start.max(1)
    }
}
