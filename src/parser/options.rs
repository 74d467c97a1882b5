//! Options for turning PDF pages into positioned text lines.

/// Options for reading PDF documents into a [`SourceDocument`](crate::SourceDocument).
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// What to do when a page's content stream cannot be decoded
    pub error_mode: ErrorMode,

    /// Extract lines from pages on the rayon pool
    pub parallel: bool,
}

impl ParseOptions {
    /// Strict, parallel extraction.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip pages whose content cannot be read).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Read pages one after another, e.g. when documents are already
    /// processed in parallel.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            parallel: true,
        }
    }
}

/// How page-level extraction failures are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Propagate the first page error
    #[default]
    Strict,
    /// Log the failure; the page contributes no lines
    Lenient,
}
