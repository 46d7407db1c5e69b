//! Colorized notice output on stderr

use cmp_config::{Notice, NoticeSink, NoticeStyle};
use colored::{ColoredString, Colorize};

/// Prints each notice to stderr, styling field names the way the host would
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalSink;

impl TerminalSink {
    pub fn render(notice: &Notice) -> String {
        notice
            .chunks
            .iter()
            .map(|chunk| styled(&chunk.text, chunk.style).to_string())
            .collect()
    }
}

fn styled(text: &str, style: NoticeStyle) -> ColoredString {
    match style {
        NoticeStyle::Normal => text.normal(),
        NoticeStyle::Warning => text.yellow().bold(),
        NoticeStyle::Highlight => text.cyan(),
    }
}

impl NoticeSink for TerminalSink {
    fn emit(&self, notice: &Notice) {
        eprintln!("{}", Self::render(notice));
    }
}
