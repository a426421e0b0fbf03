//! Block-comment syntax: `/* ... */` headers with a ` * ` line prefix.
//! The common case for Java, C-family, JavaScript, and CSS-like files.

use std::path::Path;

use super::{HeaderLayout, HeaderSyntax, lines_with_offsets, rstrip};

const EXTENSIONS: [&str; 23] = [
    "java", "c", "h", "cc", "cpp", "hpp", "cxx", "hxx", "cs", "js", "jsx", "ts", "tsx", "css",
    "scss", "less", "go", "swift", "kt", "kts", "scala", "groovy", "aj",
];

pub struct BlockSyntax;

impl HeaderSyntax for BlockSyntax {
    fn name(&self) -> &'static str {
        "block"
    }

    fn supports(&self, path: &Path, content: &str) -> bool {
        let by_extension = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
        by_extension || content.starts_with("/*")
    }

    fn layout(&self, content: &str) -> HeaderLayout {
        let lines = lines_with_offsets(content);
        let mut i = 0;
        while i < lines.len() && rstrip(lines[i].1).is_empty() {
            i += 1;
        }
        let none = HeaderLayout {
            preamble: String::new(),
            block: None,
            rest: lines.get(i).map(|l| l.0).unwrap_or(content.len()),
        };
        if i >= lines.len() || !rstrip(lines[i].1).starts_with("/*") {
            return none;
        }
        let start = lines[i].0;
        let mut end = content.len();
        for j in i..lines.len() {
            if rstrip(lines[j].1).ends_with("*/") {
                end = lines.get(j + 1).map(|l| l.0).unwrap_or(content.len());
                break;
            }
        }
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
            if idx == 0 {
                // the opening delimiter line carries no header text
                continue;
            }
            if idx == lines.len() - 1 && line.ends_with("*/") {
                break;
            }
            let trimmed = line.trim_start();
            let text = if let Some(rest) = trimmed.strip_prefix("* ") {
                rest
            } else if trimmed == "*" {
                ""
            } else if let Some(rest) = trimmed.strip_prefix('*') {
                rest
            } else {
                line
            };
            out.push_str(rstrip(text));
            out.push('\n');
        }
        out
    }

    fn render(&self, header: &str) -> String {
        let mut out = String::from("/*\n");
        for line in header.lines() {
            if line.is_empty() {
                out.push_str(" *\n");
            } else {
                let decorated = format!(" * {line}");
                out.push_str(rstrip(&decorated));
                out.push('\n');
            }
        }
        out.push_str(" */\n\n");
        out
    }
}
