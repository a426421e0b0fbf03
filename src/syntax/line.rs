//! Hash-comment syntax: `#`-prefixed headers, as in properties files,
//! shell scripts, python, and makefiles. Shebang and editor-mode lines
//! stay ahead of the header; unknown files are probed for a leading `#`.

use std::path::Path;

use super::{HeaderLayout, HeaderSyntax, lines_with_offsets, rstrip};

const EXTENSIONS: [&str; 5] = ["properties", "prefs", "py", "sh", "ksh"];
const NAME_PREFIXES: [&str; 3] = ["Makefile", "GNUmakefile", "Rakefile"];

fn is_preamble(line: &str) -> bool {
    line.starts_with("#!") || line.starts_with("# -*-")
}

pub struct LineSyntax;

impl HeaderSyntax for LineSyntax {
    fn name(&self) -> &'static str {
        "line"
    }

    fn supports(&self, path: &Path, content: &str) -> bool {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| EXTENSIONS.contains(&e))
        {
            return true;
        }
        if NAME_PREFIXES.iter().any(|p| name.starts_with(p)) || name == "osgi.bundle" {
            return true;
        }
        content.starts_with('#')
    }

    fn layout(&self, content: &str) -> HeaderLayout {
        let lines = lines_with_offsets(content);
        let mut preamble = String::new();
        let mut i = 0;
        while i < lines.len() {
            let line = rstrip(lines[i].1);
            if is_preamble(line) {
                preamble.push_str(line);
                preamble.push('\n');
                i += 1;
            } else if line.is_empty() {
                i += 1;
            } else {
                break;
            }
        }
        // bare "#" lines are decoration around the header, not header text
        let deco_start = i;
        while i < lines.len() && rstrip(lines[i].1) == "#" {
            i += 1;
        }
        if i >= lines.len() || !rstrip(lines[i].1).starts_with('#') {
            return HeaderLayout {
                preamble,
                block: None,
                rest: lines.get(deco_start).map(|l| l.0).unwrap_or(content.len()),
            };
        }
        let start = lines[deco_start].0;
        while i < lines.len() {
            let line = rstrip(lines[i].1);
            if line.is_empty() || !line.starts_with('#') {
                break;
            }
            i += 1;
        }
        let end = lines.get(i).map(|l| l.0).unwrap_or(content.len());
        // one terminating blank line belongs to the block
        let rest = if i < lines.len() && rstrip(lines[i].1).is_empty() {
            lines.get(i + 1).map(|l| l.0).unwrap_or(content.len())
        } else {
            end
        };
        HeaderLayout {
            preamble,
            block: Some(start..end),
            rest,
        }
    }

    fn decomment(&self, block: &str) -> String {
        let mut out = String::new();
        let mut at_start = true;
        for raw in block.lines() {
            let line = rstrip(raw);
            // leading bare "#" lines are decoration, not header text
            if at_start && line == "#" {
                continue;
            }
            at_start = false;
            let text = if let Some(rest) = line.strip_prefix("# ") {
                rest
            } else if line == "#" {
                ""
            } else {
                line
            };
            out.push_str(rstrip(text));
            out.push('\n');
        }
        out
    }

    fn render(&self, header: &str) -> String {
        let mut out = String::from("#\n");
        for line in header.lines() {
            if line.is_empty() {
                out.push_str("#\n");
            } else {
                let decorated = format!("# {line}");
                out.push_str(rstrip(&decorated));
                out.push('\n');
            }
        }
        out.push_str("#\n\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::YearSeparator;

    const FILE: &str = "\
#
# Copyright (c) 2015 Oracle and/or its affiliates. All rights reserved.
#
# Use is subject to license terms.
#

key=value
";

    #[test]
    fn test_extract() {
        let header = LineSyntax.extract(FILE).unwrap();
        assert_eq!(
            header,
            "Copyright (c) 2015 Oracle and/or its affiliates. All rights reserved.\n\
             \nUse is subject to license terms.\n"
        );
    }

    #[test]
    fn test_extract_skips_shebang() {
        let content = "#!/bin/sh\n\n# Copyright (c) 2001 Acme. All rights reserved.\n\nset -e\n";
        let header = LineSyntax.extract(content).unwrap();
        assert_eq!(header, "Copyright (c) 2001 Acme. All rights reserved.\n");
        let layout = LineSyntax.layout(content);
        assert_eq!(layout.preamble, "#!/bin/sh\n");
        assert!(content[layout.rest..].starts_with("set -e"));
    }

    #[test]
    fn test_extract_none_for_plain_content() {
        assert!(LineSyntax.extract("key=value\n").is_none());
    }

    #[test]
    fn test_render_round_trip() {
        let header = "Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.\n\
                      \nUse is subject to license terms.\n";
        let rendered = LineSyntax.render(header);
        assert_eq!(LineSyntax.extract(&rendered).as_deref(), Some(header));
    }

    #[test]
    fn test_update_year_leaves_everything_else() {
        let updated = LineSyntax
            .update_year(FILE, "2022", YearSeparator::Hyphen)
            .unwrap();
        assert_eq!(updated, FILE.replace("2015", "2015-2022"));
    }

    #[test]
    fn test_update_year_without_copyright_line() {
        assert!(
            LineSyntax
                .update_year("# just a note\nkey=value\n", "2022", YearSeparator::Hyphen)
                .is_none()
        );
    }
}
