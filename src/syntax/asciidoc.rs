//! Asciidoc comment syntax: a block fenced by lines of four or more
//! slashes, with a four-space body indent.

use std::path::Path;

use super::{HeaderLayout, HeaderSyntax, lines_with_offsets, rstrip};

const PREFIX: &str = "    ";
const DELIMITER: &str = "///////////////////////////////////////////////////////////////////////////////";

fn is_delimiter(line: &str) -> bool {
    line.len() >= 4 && line.bytes().all(|b| b == b'/')
}

pub struct AsciidocSyntax;

impl HeaderSyntax for AsciidocSyntax {
    fn name(&self) -> &'static str {
        "asciidoc"
    }

    fn supports(&self, path: &Path, _content: &str) -> bool {
        path.extension().and_then(|e| e.to_str()) == Some("adoc")
    }

    fn layout(&self, content: &str) -> HeaderLayout {
        let lines = lines_with_offsets(content);
        let mut i = 0;
        while i < lines.len() && rstrip(lines[i].1).is_empty() {
            i += 1;
        }
        if i >= lines.len() || !is_delimiter(rstrip(lines[i].1)) {
            return HeaderLayout {
                preamble: String::new(),
                block: None,
                rest: lines.get(i).map(|l| l.0).unwrap_or(content.len()),
            };
        }
        let start = lines[i].0;
        let fence = rstrip(lines[i].1).to_string();
        i += 1;
        while i < lines.len() && rstrip(lines[i].1) != fence {
            i += 1;
        }
        // include the closing fence when present
        let end = lines
            .get(i)
            .and_then(|_| lines.get(i + 1).map(|l| l.0))
            .unwrap_or(content.len());
        HeaderLayout {
            preamble: String::new(),
            block: Some(start..end),
            rest: end,
        }
    }

    fn decomment(&self, block: &str) -> String {
        let lines: Vec<&str> = block.lines().collect();
        let mut out = String::new();
        for (idx, raw) in lines.iter().enumerate() {
            let line = rstrip(raw);
            if idx == 0 || (idx == lines.len() - 1 && is_delimiter(line)) {
                continue;
            }
            let text = line.strip_prefix(PREFIX).unwrap_or(line);
            out.push_str(rstrip(text));
            out.push('\n');
        }
        out
    }

    fn render(&self, header: &str) -> String {
        let mut out = String::from(DELIMITER);
        out.push('\n');
        for line in header.lines() {
            if line.is_empty() {
                out.push('\n');
            } else {
                let decorated = format!("{PREFIX}{line}");
                out.push_str(rstrip(&decorated));
                out.push('\n');
            }
        }
        out.push_str(DELIMITER);
        out.push_str("\n\n");
        out
    }
}
