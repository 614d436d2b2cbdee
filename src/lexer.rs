//! Annotation Lexer
//!
//! Finds delimited annotation blocks in raw source text. Blocks are the
//! regions between a start and an end marker (triple-quoted docstrings by
//! default). Each block is returned dedented, together with the 1-based line
//! on which its opening marker sits so warnings can point at real lines.

use crate::config::BlockConfig;

/// One annotation block found in a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    /// Block text, delimiters stripped and common indentation removed
    pub text: String,
    /// 1-based line of the opening delimiter
    pub start_line: usize,
}

impl RawBlock {
    /// Block text with leading blank space removed
    pub fn trimmed(&self) -> &str {
        self.text.trim_start()
    }
}

/// Lazy iterator over the blocks of one source text.
///
/// Created by [`blocks`]. An unterminated trailing block ends the iteration.
pub struct Blocks<'a> {
    source: &'a str,
    start_marker: &'a str,
    end_marker: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = RawBlock;

    fn next(&mut self) -> Option<Self::Item> {
        if self.start_marker.is_empty() || self.end_marker.is_empty() {
            return None;
        }

        let rest = &self.source[self.pos..];
        let open = rest.find(self.start_marker)?;
        self.line += count_newlines(&rest[..open]);
        let start_line = self.line;

        let content_start = self.pos + open + self.start_marker.len();
        let after_open = &self.source[content_start..];
        let close = after_open.find(self.end_marker)?;
        let content = &after_open[..close];

        self.line += count_newlines(content);
        self.pos = content_start + close + self.end_marker.len();

        Some(RawBlock {
            text: dedent(content),
            start_line,
        })
    }
}

/// Scan `source` for blocks delimited by the configured markers
pub fn blocks<'a>(source: &'a str, delimiters: &'a BlockConfig) -> Blocks<'a> {
    Blocks {
        source,
        start_marker: &delimiters.start,
        end_marker: &delimiters.end,
        pos: 0,
        line: 1,
    }
}

fn count_newlines(text: &str) -> usize {
    text.bytes().filter(|b| *b == b'\n').count()
}

/// Remove the common leading whitespace of every non-blank line.
///
/// Whitespace-only lines become empty; line count is preserved.
pub fn dedent(text: &str) -> String {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .collect();

    let margin = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|l| if l.trim().is_empty() { "" } else { &l[margin..] })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"

class Seller:

    def post(self):
        """
        @api {post} /seller Post a seller
        @apiVersion 1.0.0
        """
        return self

    def get(self):
        """@api {get} /seller Get sellers"""
"#;

    #[test]
    fn test_finds_blocks_with_start_lines() {
        let delimiters = BlockConfig::default();
        let found: Vec<RawBlock> = blocks(SOURCE, &delimiters).collect();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].start_line, 6);
        assert_eq!(found[0].text, "\n@api {post} /seller Post a seller\n@apiVersion 1.0.0\n");
        assert_eq!(found[1].start_line, 13);
        assert_eq!(found[1].text, "@api {get} /seller Get sellers");
    }

    #[test]
    fn test_unterminated_block_is_dropped() {
        let delimiters = BlockConfig::default();
        let source = "\"\"\"\n@api {get} /a A\n\"\"\"\n\"\"\"\n@api {get} /b B\n";
        let found: Vec<RawBlock> = blocks(source, &delimiters).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].start_line, 1);
    }

    #[test]
    fn test_custom_delimiters() {
        let delimiters = BlockConfig {
            start: "/**".to_string(),
            end: "*/".to_string(),
        };
        let source = "fn a() {}\n/**\n  @apiDefine Auth\n*/\n";
        let found: Vec<RawBlock> = blocks(source, &delimiters).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].start_line, 2);
        assert_eq!(found[0].trimmed(), "@apiDefine Auth\n");
    }

    #[test]
    fn test_dedent_keeps_relative_indentation() {
        let text = "    @apiDescription\n    Delete a product\n            marked as deleted.\n   \n";
        assert_eq!(
            dedent(text),
            "@apiDescription\nDelete a product\n        marked as deleted.\n\n"
        );
    }
}
