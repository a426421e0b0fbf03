//! Comment-syntax adapters.
//!
//! Each adapter owns one family of comment conventions: where a header
//! block begins and ends in its syntax, how to peel the comment decoration
//! off to get the raw header text, and how to render corrected text back.
//! Adapters are tried in a fixed order; the first whose `supports` returns
//! true handles the file.

mod asciidoc;
mod block;
mod line;
mod markdown;

use std::ops::Range;
use std::path::Path;

use crate::config::YearSeparator;
use crate::header::{COPYRIGHT_PATTERN, add_copyright_date};

pub use asciidoc::AsciidocSyntax;
pub use block::BlockSyntax;
pub use line::LineSyntax;
pub use markdown::MarkdownSyntax;

/// Where the pieces of a file's head live.
pub struct HeaderLayout {
    /// Shebang and editor-mode lines that stay ahead of any header.
    pub preamble: String,
    /// Byte range of the leading comment block, decoration included.
    pub block: Option<Range<usize>>,
    /// Offset where the remainder of the file starts.
    pub rest: usize,
}

pub trait HeaderSyntax: Sync {
    fn name(&self) -> &'static str;

    /// Does this adapter handle this file? May probe the content.
    fn supports(&self, path: &Path, content: &str) -> bool;

    /// Locate the preamble, leading comment block, and remainder.
    fn layout(&self, content: &str) -> HeaderLayout;

    /// Peel the comment decoration off a block, one line per line, each
    /// terminated by a newline.
    fn decomment(&self, block: &str) -> String;

    /// Render header text into this syntax, ending with one blank line.
    fn render(&self, header: &str) -> String;

    /// The normalized header text of the file, if it has a leading comment.
    fn extract(&self, content: &str) -> Option<String> {
        let layout = self.layout(content);
        let block = layout.block?;
        let mut text = self.decomment(&content[block]);
        if text.ends_with("\n\n") {
            text.pop();
        }
        Some(text)
    }

    /// Update the year token of the first copyright line inside the leading
    /// comment, leaving every other byte of the file untouched. `None` when
    /// there is no comment or no copyright line to update.
    fn update_year(
        &self,
        content: &str,
        last_changed: &str,
        sep: YearSeparator,
    ) -> Option<String> {
        let block = self.layout(content).block?;
        for (offset, line) in lines_with_offsets(&content[block.clone()]) {
            if !line.contains("Copyright") {
                continue;
            }
            if let Some(year) = COPYRIGHT_PATTERN.captures(line).and_then(|c| c.name("year")) {
                let merged = add_copyright_date(year.as_str(), last_changed, sep);
                let start = block.start + offset + year.start();
                let end = block.start + offset + year.end();
                return Some(format!(
                    "{}{}{}",
                    &content[..start],
                    merged,
                    &content[end..]
                ));
            }
        }
        None
    }
}

static ADAPTERS: [&(dyn HeaderSyntax); 4] =
    [&BlockSyntax, &MarkdownSyntax, &AsciidocSyntax, &LineSyntax];

/// Pick the adapter for a file, or `None` if no syntax claims it.
pub fn adapter_for(path: &Path, content: &str) -> Option<&'static dyn HeaderSyntax> {
    ADAPTERS
        .iter()
        .find(|a| a.supports(path, content))
        .copied()
}

/// Year token of the first copyright statement inside a comment block.
pub fn harvest_year(block: &str) -> Option<String> {
    for line in block.lines() {
        if !line.contains("Copyright") {
            continue;
        }
        if let Some(year) = COPYRIGHT_PATTERN.captures(line).and_then(|c| c.name("year")) {
            return Some(year.as_str().to_string());
        }
    }
    None
}

/// Strip trailing spaces, tabs, and a stray carriage return.
pub(crate) fn rstrip(line: &str) -> &str {
    line.trim_end_matches([' ', '\t', '\r'])
}

/// Each line of `text` (newline excluded) with its byte offset.
pub(crate) fn lines_with_offsets(text: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut pos = 0;
    for raw in text.split_inclusive('\n') {
        out.push((pos, raw.strip_suffix('\n').unwrap_or(raw)));
        pos += raw.len();
    }
    out
}
