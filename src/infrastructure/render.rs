//! Terminal echo of the generated markdown.
//!
//! A light line-oriented pass: headings bold, fenced code dim, the rest
//! as-is. The file on disk always receives the raw text; this only
//! affects what the operator sees.

use console::style;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Heading,
    Fence,
    Code,
    Plain,
}

fn classify(line: &str, in_code: bool) -> LineKind {
    if line.trim_start().starts_with("```") {
        return LineKind::Fence;
    }
    if in_code {
        return LineKind::Code;
    }
    if line.starts_with('#') {
        return LineKind::Heading;
    }
    LineKind::Plain
}

/// Print the markdown document to stdout with terminal styling
pub fn echo_markdown(output: &str) {
    let mut in_code = false;
    for line in output.lines() {
        match classify(line, in_code) {
            LineKind::Fence => {
                in_code = !in_code;
                println!("{}", style(line).dim());
            }
            LineKind::Code => println!("{}", style(line).dim()),
            LineKind::Heading => println!("{}", style(line).bold().cyan()),
            LineKind::Plain => println!("{line}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_are_recognized_outside_code() {
        assert_eq!(classify("# Module", false), LineKind::Heading);
        assert_eq!(classify("## Requirements", false), LineKind::Heading);
    }

    #[test]
    fn fences_toggle_and_contents_are_code() {
        assert_eq!(classify("```hcl", false), LineKind::Fence);
        assert_eq!(classify("resource \"google_sql\" {}", true), LineKind::Code);
        assert_eq!(classify("# not a heading inside a fence", true), LineKind::Code);
        assert_eq!(classify("```", true), LineKind::Fence);
    }

    #[test]
    fn everything_else_is_plain() {
        assert_eq!(classify("plain prose", false), LineKind::Plain);
        assert_eq!(classify("- bullet", false), LineKind::Plain);
    }
}
