//! User-facing notices
//!
//! Deprecation shims report to the user through a [`NoticeSink`], the host's
//! message surface. Notices are sequences of styled chunks so hosts can
//! colorize the legacy and replacement field names.

use std::cell::RefCell;
use std::fmt;

/// Style of a notice chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeStyle {
    Normal,
    Warning,
    Highlight,
}

impl NoticeStyle {
    /// Host highlight-group name for this style
    pub fn tag(&self) -> &'static str {
        match self {
            NoticeStyle::Normal => "Normal",
            NoticeStyle::Warning => "WarningMsg",
            NoticeStyle::Highlight => "Special",
        }
    }
}

/// One styled piece of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeChunk {
    pub text: String,
    pub style: NoticeStyle,
}

/// A user-facing message
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Notice {
    pub chunks: Vec<NoticeChunk>,
}

impl Notice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk (builder style)
    pub fn push(mut self, text: impl Into<String>, style: NoticeStyle) -> Self {
        self.chunks.push(NoticeChunk {
            text: text.into(),
            style,
        });
        self
    }

    /// `[cmp] <old> is deprecated.\nUse <new> instead.`
    pub fn deprecated(old: &str, new: &str) -> Self {
        Self::new()
            .push("[cmp] ", NoticeStyle::Normal)
            .push(old, NoticeStyle::Warning)
            .push(" is deprecated.\n", NoticeStyle::Normal)
            .push("Use ", NoticeStyle::Normal)
            .push(new, NoticeStyle::Highlight)
            .push(" instead.", NoticeStyle::Normal)
    }

    /// `(text, tag)` pairs in the shape host echo APIs expect
    pub fn lines(&self) -> Vec<(&str, &'static str)> {
        self.chunks
            .iter()
            .map(|c| (c.text.as_str(), c.style.tag()))
            .collect()
    }

    /// Unstyled text
    pub fn plain(&self) -> String {
        self.chunks.iter().map(|c| c.text.as_str()).collect()
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.plain())
    }
}

/// Fire-and-forget destination for notices
pub trait NoticeSink {
    fn emit(&self, notice: &Notice);
}

/// Forwards notices to the `tracing` logger at `warn` level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NoticeSink for TracingSink {
    fn emit(&self, notice: &Notice) {
        tracing::warn!(target: "cmp_config::notice", "{}", notice.plain().replace('\n', " "));
    }
}

/// Collects notices in memory
#[derive(Debug, Default)]
pub struct BufferedSink {
    notices: RefCell<Vec<Notice>>,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything collected so far
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.notices.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.borrow().is_empty()
    }
}

impl NoticeSink for BufferedSink {
    fn emit(&self, notice: &Notice) {
        self.notices.borrow_mut().push(notice.clone());
    }
}

impl<T: NoticeSink + ?Sized> NoticeSink for std::rc::Rc<T> {
    fn emit(&self, notice: &Notice) {
        (**self).emit(notice)
    }
}

impl<T: NoticeSink + ?Sized> NoticeSink for std::sync::Arc<T> {
    fn emit(&self, notice: &Notice) {
        (**self).emit(notice)
    }
}
