//! Markdown comment syntax: `[//]: # ( ... )` link-reference lines.

use std::path::Path;

use super::{HeaderLayout, HeaderSyntax, lines_with_offsets, rstrip};

const PREFIX: &str = "[//]: # ( ";
const SUFFIX: &str = " )";

pub struct MarkdownSyntax;

impl HeaderSyntax for MarkdownSyntax {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn supports(&self, path: &Path, _content: &str) -> bool {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        name.ends_with(".md") || name.ends_with(".md.vm")
    }

    fn layout(&self, content: &str) -> HeaderLayout {
        let lines = lines_with_offsets(content);
        let mut i = 0;
        while i < lines.len() && rstrip(lines[i].1).is_empty() {
            i += 1;
        }
        if i >= lines.len() || !lines[i].1.starts_with(PREFIX) {
            return HeaderLayout {
                preamble: String::new(),
                block: None,
                rest: lines.get(i).map(|l| l.0).unwrap_or(content.len()),
            };
        }
        let start = lines[i].0;
        while i < lines.len() {
            let line = rstrip(lines[i].1);
            if line.is_empty() || !line.starts_with(PREFIX) {
                break;
            }
            i += 1;
        }
        let end = lines.get(i).map(|l| l.0).unwrap_or(content.len());
        let rest = if i < lines.len() && rstrip(lines[i].1).is_empty() {
            lines.get(i + 1).map(|l| l.0).unwrap_or(content.len())
        } else {
            end
        };
        HeaderLayout {
            preamble: String::new(),
            block: Some(start..end),
            rest,
        }
    }

    fn decomment(&self, block: &str) -> String {
        let mut out = String::new();
        for raw in block.lines() {
            let mut line = rstrip(raw);
            if let Some(stripped) = line.strip_prefix(PREFIX) {
                line = stripped;
            }
            if let Some(stripped) = line.strip_suffix(SUFFIX) {
                line = stripped;
            }
            out.push_str(rstrip(line));
            out.push('\n');
        }
        out
    }

    fn render(&self, header: &str) -> String {
        let mut out = String::new();
        for line in header.lines() {
            out.push_str(PREFIX);
            out.push_str(rstrip(line));
            out.push_str(SUFFIX);
            out.push('\n');
        }
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = "\
[//]: # ( Copyright (c) 2015 Oracle and/or its affiliates. All rights reserved. )
[//]: # (  )
[//]: # ( Use is subject to license terms. )

# Title
";

    #[test]
    fn test_extract() {
        let header = MarkdownSyntax.extract(FILE).unwrap();
        assert_eq!(
            header,
            "Copyright (c) 2015 Oracle and/or its affiliates. All rights reserved.\n\
             \nUse is subject to license terms.\n"
        );
    }

    #[test]
    fn test_markdown_heading_is_not_a_header() {
        assert!(MarkdownSyntax.extract("# Title\n\nBody.\n").is_none());
    }

    #[test]
    fn test_render_round_trip() {
        let header = "Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.\n\
                      \nUse is subject to license terms.\n";
        let rendered = MarkdownSyntax.render(header);
        assert_eq!(MarkdownSyntax.extract(&rendered).as_deref(), Some(header));
    }

    #[test]
    fn test_rest_begins_at_body() {
        let layout = MarkdownSyntax.layout(FILE);
        assert!(FILE[layout.rest..].starts_with("# Title"));
    }
}
