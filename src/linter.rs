//! @ai:module:intent Check SCSS documentation comments for problems worth reporting
//! @ai:module:layer application
//! @ai:module:public_api check_source, check_file, check_directory, LintResult, LintIssue, Severity
//! @ai:module:depends_on parser, annotation, config, error
//! @ai:module:stateless true

use crate::annotation::ParseResult;
use crate::config::Config;
use crate::context::Context;
use crate::error::Result;
use crate::parser::ScssCommentParser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// @ai:intent Severity level for lint issues
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    #[default]
    Warning,
    Info,
}

/// @ai:intent A single issue found in a documentation comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintIssue {
    pub severity: Severity,
    pub code: String,
    pub message: String,
    pub file: PathBuf,
    pub line: usize,
    pub suggestion: Option<String>,
}

/// @ai:intent Result of checking a file or directory
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LintResult {
    pub files_checked: usize,
    pub comments_checked: usize,
    pub issues: Vec<LintIssue>,
    pub errors: usize,
    pub warnings: usize,
}

impl LintResult {
    /// @ai:intent Check if linting passed (no errors)
    pub fn passed(&self) -> bool {
        self.errors == 0
    }

    /// @ai:intent Merge another lint result into this one
    pub fn merge(&mut self, other: LintResult) {
        self.files_checked += other.files_checked;
        self.comments_checked += other.comments_checked;
        self.issues.extend(other.issues);
        self.errors += other.errors;
        self.warnings += other.warnings;
    }

    fn push(&mut self, issue: LintIssue) {
        match issue.severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Info => {}
        }
        self.issues.push(issue);
    }
}

/// @ai:intent Check SCSS source that was loaded from `path`
/// @ai:effects pure
pub fn check_source(
    path: &Path,
    source: &str,
    parser: &ScssCommentParser,
    config: &Config,
) -> LintResult {
    let parsed = parser.parse(source);
    lint_parsed(path, &parsed, config)
}

/// @ai:intent Check a single SCSS file
/// @ai:effects fs:read
pub fn check_file(path: &Path, parser: &ScssCommentParser, config: &Config) -> Result<LintResult> {
    let parsed = parser.parse_file(path)?;
    Ok(lint_parsed(path, &parsed, config))
}

/// @ai:intent Check every SCSS file below a directory
/// @ai:post unreadable files are reported as E000 issues instead of aborting
/// @ai:effects fs:read
pub fn check_directory(
    path: &Path,
    parser: &ScssCommentParser,
    config: &Config,
) -> Result<LintResult> {
    let mut result = LintResult::default();

    for entry in WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let file_path = entry.path();

        if config.is_source_file(file_path) {
            match check_file(file_path, parser, config) {
                Ok(file_result) => result.merge(file_result),
                Err(e) => {
                    result.push(LintIssue {
                        severity: Severity::Error,
                        code: "E000".to_string(),
                        message: format!("Failed to parse file: {}", e),
                        file: file_path.to_path_buf(),
                        line: 0,
                        suggestion: None,
                    });
                }
            }
        }
    }

    Ok(result)
}

/// @ai:intent Turn a parse result into lint issues
/// @ai:effects pure
fn lint_parsed(path: &Path, parsed: &ParseResult, config: &Config) -> LintResult {
    let mut result = LintResult {
        files_checked: 1,
        comments_checked: parsed.len(),
        ..Default::default()
    };

    for warning in &parsed.warnings {
        result.push(LintIssue {
            severity: if config.strict {
                Severity::Error
            } else {
                Severity::Warning
            },
            code: "W001".to_string(),
            message: format!("Unknown annotation @{}", warning.annotation),
            file: path.to_path_buf(),
            line: warning.comment_line,
            suggestion: Some(format!(
                "Register a handler or add an alias for `{}` in .scssdoc.toml",
                warning.annotation
            )),
        });
    }

    for comment in parsed.comments() {
        let line = comment.comment_range.start;

        match &comment.context {
            Context::Mixin { name, code }
            | Context::Function { name, code }
            | Context::Placeholder { name, code }
                if code.is_empty() =>
            {
                result.push(LintIssue {
                    severity: Severity::Error,
                    code: "E001".to_string(),
                    message: format!(
                        "Body of {} `{}` is unterminated or malformed",
                        comment.context.kind(),
                        name
                    ),
                    file: path.to_path_buf(),
                    line,
                    suggestion: Some("Check for a missing `}` or an unclosed string".to_string()),
                });
            }
            Context::Unknown => {
                result.push(LintIssue {
                    severity: Severity::Info,
                    code: "I001".to_string(),
                    message: "Comment does not document a mixin, function, placeholder or variable"
                        .to_string(),
                    file: path.to_path_buf(),
                    line,
                    suggestion: None,
                });
            }
            _ => {}
        }
    }

    result.issues.sort_by_key(|issue| issue.line);

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn check(source: &str, config: &Config) -> LintResult {
        let parser = ScssCommentParser::new(config.registry());
        check_source(Path::new("test.scss"), source, &parser, config)
    }

    #[test]
    fn test_clean_source_passes() {
        let result = check(
            "/// Double\n/// @param {Number} $n\n@function double($n) { @return $n * 2; }\n",
            &Config::default(),
        );

        assert!(result.passed());
        assert!(result.issues.is_empty());
        assert_eq!(result.comments_checked, 1);
    }

    #[test]
    fn test_unbalanced_block_is_an_error() {
        let result = check("/// Broken\n@mixin broken {\n  a: b;\n", &Config::default());

        assert!(!result.passed());
        assert_eq!(result.issues[0].code, "E001");
        assert_eq!(result.issues[0].line, 1);
    }

    #[test]
    fn test_unknown_annotation_severity_follows_strict() {
        let source = "/// @nope\n$a: 1;\n";

        let lenient = check(source, &Config::default());
        assert!(lenient.passed());
        assert_eq!(lenient.warnings, 1);
        assert_eq!(lenient.issues[0].code, "W001");

        let strict = check(
            source,
            &Config {
                strict: true,
                ..Default::default()
            },
        );
        assert!(!strict.passed());
        assert_eq!(strict.errors, 1);
    }

    #[test]
    fn test_configured_alias_silences_warning() {
        let mut config = Config::default();
        config.aliases.insert("nope".to_string(), "todo".to_string());

        let result = check("/// @nope later\n$a: 1;\n", &config);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_unattached_comment_is_info() {
        let result = check("/// Orphan\n.rule { }\n", &Config::default());

        assert!(result.passed());
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].severity, Severity::Info);
        assert_eq!(result.issues[0].code, "I001");
    }

    #[test]
    fn test_check_file() {
        let mut file = NamedTempFile::with_suffix(".scss").unwrap();
        writeln!(file, "/// Ok\n$a: 1;").unwrap();

        let config = Config::default();
        let parser = ScssCommentParser::new(config.registry());
        let result = check_file(file.path(), &parser, &config).unwrap();

        assert_eq!(result.files_checked, 1);
        assert!(result.passed());
    }

    #[test]
    fn test_check_directory_filters_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.scss"), "/// A\n@mixin a {\n").unwrap();
        fs::write(dir.path().join("b.scss"), "/// B\n$b: 1;\n").unwrap();
        fs::write(dir.path().join("c.css"), "/// C\n@mixin c {\n").unwrap();

        let config = Config::default();
        let parser = ScssCommentParser::new(config.registry());
        let result = check_directory(dir.path(), &parser, &config).unwrap();

        assert_eq!(result.files_checked, 2);
        assert_eq!(result.errors, 1);
    }
}
