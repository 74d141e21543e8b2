//! @ai:module:intent Locate SCSS documentation comments and the construct following each
//! @ai:module:layer application
//! @ai:module:public_api CommentExtractor, Comment, CommentRange
//! @ai:module:depends_on context
//! @ai:module:stateless true

use crate::context::Context;
use serde::{Deserialize, Serialize};

/// @ai:intent First and last source line (1-based, inclusive) of a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommentRange {
    pub start: usize,
    pub end: usize,
}

/// @ai:intent A documentation comment with its cleaned lines and classified context
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub lines: Vec<String>,
    pub comment_range: CommentRange,
    pub context: Context,
}

/// @ai:intent Extract documentation comments, classifying the code after each one
///
/// Recognises `/** ... */` blocks and runs of consecutive `///` lines.
/// Plain `//` and `/* */` comments are not documentation and are skipped,
/// including any `///` or `/**` text that appears inside a plain block.
#[derive(Debug, Clone)]
pub struct CommentExtractor<F> {
    classify: F,
}

/// Comment being accumulated while walking the source.
enum Pending {
    Block {
        start: usize,
        lines: Vec<String>,
    },
    LineRun {
        start: usize,
        end: usize,
        lines: Vec<String>,
    },
}

impl<F> CommentExtractor<F>
where
    F: Fn(&str) -> Context,
{
    /// @ai:intent Create an extractor using `classify` to build each comment's context
    pub fn new(classify: F) -> Self {
        Self { classify }
    }

    /// @ai:intent Extract all documentation comments from source text
    /// @ai:post comments are in source order
    /// @ai:post each context is classified from the text right after its comment
    /// @ai:effects pure
    pub fn extract(&self, source: &str) -> Vec<Comment> {
        let mut comments = Vec::new();
        let mut pending: Option<Pending> = None;
        let mut in_plain_comment = false;
        let mut offset = 0;

        for (line_idx, raw_line) in source.split_inclusive('\n').enumerate() {
            let line_number = line_idx + 1;
            let line_start = offset;
            offset += raw_line.len();
            let line = raw_line.trim_end_matches(['\n', '\r']);
            let trimmed = line.trim_start();

            if in_plain_comment {
                in_plain_comment = !line.contains("*/");
                continue;
            }

            match pending.take() {
                Some(Pending::Block { start, mut lines }) => {
                    if let Some(close) = line.find("*/") {
                        push_nonempty(&mut lines, strip_block_prefix(&line[..close]));
                        let code_start = line_start + close + 2;
                        comments.push(self.finish(source, lines, start, line_number, code_start));
                    } else {
                        lines.push(strip_block_prefix(line).to_string());
                        pending = Some(Pending::Block { start, lines });
                    }
                    continue;
                }
                Some(Pending::LineRun { start, end, mut lines }) => {
                    if let Some(content) = doc_line_content(trimmed) {
                        lines.push(content.to_string());
                        pending = Some(Pending::LineRun {
                            start,
                            end: line_number,
                            lines,
                        });
                        continue;
                    }
                    comments.push(self.finish(source, lines, start, end, line_start));
                }
                None => {}
            }

            if let Some(content) = doc_line_content(trimmed) {
                pending = Some(Pending::LineRun {
                    start: line_number,
                    end: line_number,
                    lines: vec![content.to_string()],
                });
            } else if let Some(after_open) = block_opening(trimmed) {
                let open_offset = line_start + (line.len() - trimmed.len()) + 3;
                let mut lines = Vec::new();

                if let Some(close) = after_open.find("*/") {
                    push_nonempty(&mut lines, after_open[..close].trim());
                    let code_start = open_offset + close + 2;
                    comments.push(self.finish(source, lines, line_number, line_number, code_start));
                } else {
                    push_nonempty(&mut lines, after_open.trim());
                    pending = Some(Pending::Block {
                        start: line_number,
                        lines,
                    });
                }
            } else {
                in_plain_comment = opens_plain_comment(line);
            }
        }

        match pending {
            Some(Pending::LineRun { start, end, lines }) => {
                comments.push(self.finish(source, lines, start, end, source.len()));
            }
            Some(Pending::Block { start, lines }) => {
                tracing::debug!("Unterminated documentation comment starting at line {}", start);
                let end = source.lines().count().max(start);
                comments.push(self.finish(source, lines, start, end, source.len()));
            }
            None => {}
        }

        comments
    }

    fn finish(
        &self,
        source: &str,
        lines: Vec<String>,
        start: usize,
        end: usize,
        code_start: usize,
    ) -> Comment {
        Comment {
            lines,
            comment_range: CommentRange { start, end },
            context: (self.classify)(&source[code_start..]),
        }
    }
}

/// @ai:intent Get the content of a `///` line, None for anything else
/// @ai:example ("/// text") -> Some("text")
/// @ai:example ("//// poster") -> None
/// @ai:effects pure
fn doc_line_content(trimmed: &str) -> Option<&str> {
    if trimmed.starts_with("////") {
        return None;
    }
    let content = trimmed.strip_prefix("///")?;
    Some(content.strip_prefix(' ').unwrap_or(content).trim_end())
}

/// True when `line` leaves a plain `/* */` comment open at its end.
fn opens_plain_comment(line: &str) -> bool {
    let Some(open) = line.rfind("/*") else {
        return false;
    };
    if line[..open].contains("//") {
        return false;
    }
    !line[open + 2..].contains("*/")
}

/// Text after `/**` when the line opens a documentation block.
fn block_opening(trimmed: &str) -> Option<&str> {
    if trimmed.starts_with("/**/") {
        return None;
    }
    trimmed.strip_prefix("/**")
}

/// @ai:intent Remove the leading ` * ` decoration of a block comment line
/// @ai:example ("   * text") -> "text"
/// @ai:example ("   *   indented") -> "  indented"
/// @ai:example ("plain") -> "plain"
/// @ai:effects pure
fn strip_block_prefix(line: &str) -> &str {
    let trimmed = line.trim_start();
    let content = match trimmed.strip_prefix('*') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => trimmed,
    };
    content.trim_end()
}

fn push_nonempty(lines: &mut Vec<String>, content: &str) {
    if !content.is_empty() {
        lines.push(content.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::classify;
    use pretty_assertions::assert_eq;

    fn extract(source: &str) -> Vec<Comment> {
        CommentExtractor::new(classify).extract(source)
    }

    #[test]
    fn test_block_comment() {
        let scss = "/**\n * Test a mixin\n * @author Me\n */\n@mixin test { a: b; }\n";
        let comments = extract(scss);

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].lines, vec!["Test a mixin", "@author Me"]);
        assert_eq!(comments[0].comment_range, CommentRange { start: 1, end: 4 });
        assert_eq!(comments[0].context.name(), Some("test"));
    }

    #[test]
    fn test_triple_slash_run() {
        let scss = "// plain\n/// Spacing unit\n///   @type Number\n$unit: 4px;\n";
        let comments = extract(scss);

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].lines, vec!["Spacing unit", "  @type Number"]);
        assert_eq!(comments[0].comment_range, CommentRange { start: 2, end: 3 });
        assert_eq!(comments[0].context.name(), Some("unit"));
    }

    #[test]
    fn test_single_line_block_and_inline_close() {
        let scss = "/** Short */ $a: 1;\n/**\n * Long\n */ %ph { }\n";
        let comments = extract(scss);

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].lines, vec!["Short"]);
        assert_eq!(comments[0].context.name(), Some("a"));
        assert_eq!(comments[1].lines, vec!["Long"]);
        assert_eq!(comments[1].comment_range, CommentRange { start: 2, end: 4 });
        assert_eq!(comments[1].context.name(), Some("ph"));
    }

    #[test]
    fn test_plain_comments_and_posters_are_ignored() {
        let scss = "////\n//// @group core\n////\n/* not doc */\n/**/\n// nope\n$a: 1;\n";
        assert!(extract(scss).is_empty());
    }

    #[test]
    fn test_doc_markers_inside_plain_block_comment_are_ignored() {
        assert!(extract("/*\n/// not a doc\n*/\n$a: 1;").is_empty());
        assert!(extract("$a: 1; /* trailing\n/** still plain */\n$b: 2;").is_empty());

        let scss = "/* one-line */\n// see /* here\n/// Real\n$c: 3;\n";
        let comments = extract(scss);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].comment_range, CommentRange { start: 3, end: 3 });
        assert_eq!(comments[0].context.name(), Some("c"));
    }

    #[test]
    fn test_blank_lines_inside_block_are_kept() {
        let scss = "/**\n * One\n *\n * Two\n */\n$a: 1;";
        let comments = extract(scss);
        assert_eq!(comments[0].lines, vec!["One", "", "Two"]);
    }

    #[test]
    fn test_indentation_after_star_is_kept() {
        let scss = "/**\n * @example\n *   .a { }\n */\n";
        let comments = extract(scss);
        assert_eq!(comments[0].lines, vec!["@example", "  .a { }"]);
        assert_eq!(comments[0].context, Context::Unknown);
    }

    #[test]
    fn test_adjacent_comments_each_get_following_code() {
        let scss = "/// First\n$a: 1;\n\n/// Second\n@function f() { @return 1; }\n";
        let comments = extract(scss);

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].context.name(), Some("a"));
        assert_eq!(comments[1].context.name(), Some("f"));
        assert_eq!(comments[1].comment_range, CommentRange { start: 4, end: 4 });
    }

    #[test]
    fn test_trailing_run_and_crlf() {
        let scss = "$a: 1;\r\n/// Dangling\r\n/// comment";
        let comments = extract(scss);

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].lines, vec!["Dangling", "comment"]);
        assert_eq!(comments[0].context, Context::Unknown);
    }

    #[test]
    fn test_unterminated_block_is_still_emitted() {
        let scss = "/**\n * Never closed\n";
        let comments = extract(scss);

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].lines, vec!["Never closed"]);
        assert_eq!(comments[0].comment_range, CommentRange { start: 1, end: 2 });
        assert_eq!(comments[0].context, Context::Unknown);
    }

    #[test]
    fn test_custom_classifier_receives_following_text() {
        let extractor = CommentExtractor::new(|code: &str| {
            if code.trim_start().starts_with(".btn") {
                Context::Placeholder {
                    name: "btn".to_string(),
                    code: String::new(),
                }
            } else {
                Context::Unknown
            }
        });
        let comments = extractor.extract("/// Button\n.btn { }\n");
        assert_eq!(comments[0].context.name(), Some("btn"));
    }
}
